//! Tolerant readers over loosely-typed user input.
//!
//! Everything the host hands us is JSON of uncertain shape: numbers may be
//! strings, booleans may be `"true"`, optional fields may be `null` or `""`.
//! These helpers turn that into `Option`s, treating anything unusable as
//! absent so it is omitted from the output rather than serialized as garbage.

use serde_json::{Map, Number, Value};

use crate::elements::ElementKind;
use crate::error::ElementError;

/// Output canvas size, used to resolve percentage geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Coerce a JSON value to a finite number.
///
/// Integers keep their integer representation so `-1` stays `-1`, not `-1.0`.
pub fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(i) = s.parse::<i64>() {
                return Some(Number::from(i));
            }
            // NaN and infinities are rejected by from_f64.
            s.parse::<f64>().ok().and_then(Number::from_f64)
        }
        _ => None,
    }
}

/// Coerce a JSON value to a strictly positive integer.
pub fn coerce_positive_int(value: &Value) -> Option<u32> {
    let n = coerce_number(value)?.as_f64()?;
    if n > 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Non-blank strings only. Numbers are rendered to text.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read-only view over one user-declared element.
#[derive(Debug, Clone, Copy)]
pub struct RawElement<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawElement<'a> {
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    /// A field that is present and not `null`.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
            None => false,
        }
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(coerce_string)
    }

    /// Free text, kept verbatim (no trimming). `None` only when absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => coerce_string(other),
        }
    }

    pub fn number(&self, key: &str) -> Option<Number> {
        self.get(key).and_then(coerce_number)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.number(key).and_then(|n| n.as_f64())
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(coerce_bool)
    }

    /// A number, a non-blank string, or a boolean, passed through as JSON.
    /// Used for settings such as `font-size` that accept `48` or `"3vw"`.
    pub fn scalar(&self, key: &str) -> Option<Value> {
        match self.get(key)? {
            Value::Number(n) => Some(Value::Number(n.clone())),
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) if !s.trim().is_empty() => Some(Value::String(s.trim().to_owned())),
            _ => None,
        }
    }

    /// Geometry in pixels. `"50%"` resolves against `extent`.
    pub fn geometry(&self, key: &str, extent: u32) -> Option<Number> {
        if let Some(Value::String(s)) = self.get(key) {
            if let Some(pct) = s.trim().strip_suffix('%') {
                let pct = pct.trim().parse::<f64>().ok().filter(|p| p.is_finite())?;
                let px = (pct / 100.0 * f64::from(extent)).round();
                return Some(Number::from(px as i64));
            }
        }
        self.number(key)
    }

    /// An object field, accepting either a JSON object or a string holding one.
    ///
    /// # Errors
    /// [`ElementError::InvalidObject`] when a string is present but does not
    /// parse to an object.
    pub fn object(&self, key: &str) -> Result<Option<Map<String, Value>>, ElementError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Ok(Some(map)),
                Ok(_) => Err(ElementError::InvalidObject {
                    field: key.to_owned(),
                    reason: "expected a JSON object".to_owned(),
                }),
                Err(e) => Err(ElementError::InvalidObject {
                    field: key.to_owned(),
                    reason: e.to_string(),
                }),
            },
            Some(_) => Err(ElementError::InvalidObject {
                field: key.to_owned(),
                reason: "expected a JSON object".to_owned(),
            }),
        }
    }

    /// The `type` discriminator.
    ///
    /// # Errors
    /// [`ElementError::MissingType`] or [`ElementError::UnknownType`].
    pub fn kind(&self) -> Result<ElementKind, ElementError> {
        let name = self.string("type").ok_or(ElementError::MissingType)?;
        ElementKind::parse(&name).ok_or(ElementError::UnknownType(name))
    }
}
