//! Structural validation — run this before building a basic-mode request.
//!
//! Rules enforced per element:
//! 1. The entry must be an object with a known `type`.
//! 2. The type must be allowed where the element is placed (no subtitles
//!    inside a scene).
//! 3. Required content must be present (`src` for media, `text` for text and
//!    voice, `component` for components).
//! 4. Text and subtitle parameters must lie within their accepted ranges.
//!
//! Validators never fail fast: they return every problem found, and an
//! empty list means valid.

use serde_json::Value;

use crate::elements::ElementKind;
use crate::error::{EngineError, ValidationGroup};
use crate::fields::RawElement;

/// Inclusive numeric bounds checked on text and subtitle elements.
const RANGES: &[(&str, &str, f64, f64)] = &[
    ("chromaKeyTolerance", "Chroma key tolerance", 1.0, 100.0),
    ("brightness", "Brightness", -1.0, 1.0),
    ("contrast", "Contrast", -1000.0, 1000.0),
    ("gamma", "Gamma", 0.1, 10.0),
    ("saturation", "Saturation", 0.0, 3.0),
    ("panDistance", "Pan distance", 0.01, 0.5),
    ("zoom", "Zoom", -10.0, 10.0),
    ("rotationAngle", "Rotation angle", -360.0, 360.0),
    ("zIndex", "Z-index", -99.0, 99.0),
];

const COLORS: &[(&str, &str)] = &[
    ("fontColor", "Font color"),
    ("backgroundColor", "Background color"),
    ("chromaKeyColor", "Chroma key color"),
];

/// `#RRGGBB`.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Check a text (or subtitle) element's parameters.
///
/// Text content is only required for `text` elements; subtitles may be
/// generated from the audio track.
pub fn validate_text_element_params(raw: &RawElement<'_>, kind: ElementKind) -> Vec<String> {
    let mut errors = Vec::new();

    if kind == ElementKind::Text
        && raw.text("text").map_or(true, |t| t.trim().is_empty())
    {
        errors.push("Text is required".to_owned());
    }

    for (key, label, min, max) in RANGES {
        if let Some(v) = raw.float(key) {
            if !(*min..=*max).contains(&v) {
                errors.push(format!("{label} must be between {min} and {max}"));
            }
        }
    }

    for (key, label) in COLORS {
        if let Some(color) = raw.string(key) {
            if !is_hex_color(&color) {
                errors.push(format!("{label} must be a valid hex color (#RRGGBB)"));
            }
        }
    }

    errors
}

/// Elements placed inside a scene.
pub fn validate_scene_elements(elements: &[Value]) -> Vec<String> {
    validate_elements(elements, true)
}

/// Movie-level elements, overlaid across every scene.
pub fn validate_movie_elements(elements: &[Value]) -> Vec<String> {
    validate_elements(elements, false)
}

fn validate_elements(elements: &[Value], in_scene: bool) -> Vec<String> {
    elements
        .iter()
        .enumerate()
        .flat_map(|(i, value)| validate_element(i + 1, value, None, in_scene))
        .collect()
}

/// Validate a single entry whose type may be implied by where it came from
/// (an overlay without a `type` is text).
pub fn validate_element(
    position: usize,
    value: &Value,
    implied: Option<ElementKind>,
    in_scene: bool,
) -> Vec<String> {
    let Some(raw) = RawElement::from_value(value) else {
        return vec![format!("Element {position}: must be an object")];
    };

    let kind = match (raw.string("type"), implied) {
        (None, Some(kind)) => kind,
        (None, None) => return vec![format!("Element {position}: type is required")],
        (Some(name), _) => match ElementKind::parse(&name) {
            Some(kind) => kind,
            None => return vec![format!("Element {position}: unknown type '{name}'")],
        },
    };

    check_element(position, &raw, kind, in_scene)
}

/// Validate an entry from a fixed scene slot (a video or audio source).
/// Such entries are always built as `kind`, so any `type` they carry is
/// ignored here too.
pub fn validate_slot(position: usize, value: &Value, kind: ElementKind) -> Vec<String> {
    match RawElement::from_value(value) {
        Some(raw) => check_element(position, &raw, kind, true),
        None => vec![format!("Element {position}: must be an object")],
    }
}

fn check_element(
    position: usize,
    raw: &RawElement<'_>,
    kind: ElementKind,
    in_scene: bool,
) -> Vec<String> {
    let mut problems = Vec::new();

    if in_scene && !kind.allowed_in_scene() {
        problems.push(format!("{kind} elements are not allowed in a scene"));
    }

    match kind {
        ElementKind::Video | ElementKind::Audio => {
            if !raw.has("src") {
                problems.push("src is required".to_owned());
            }
        }
        ElementKind::Image => {
            if !raw.has("src") && !raw.has("prompt") {
                problems.push("src or prompt is required".to_owned());
            }
        }
        ElementKind::Voice => {
            if raw.text("text").map_or(true, |t| t.trim().is_empty()) {
                problems.push("Text is required".to_owned());
            }
        }
        ElementKind::Component => {
            if !raw.has("component") {
                problems.push("component is required".to_owned());
            }
        }
        ElementKind::Html => {
            if !raw.has("html") && !raw.has("src") {
                problems.push("html or src is required".to_owned());
            }
        }
        ElementKind::Text | ElementKind::Subtitles => {
            problems.extend(validate_text_element_params(raw, kind));
        }
        ElementKind::Audiogram => {}
    }

    problems
        .into_iter()
        .map(|p| format!("Element {position} ({kind}): {p}"))
        .collect()
}

/// Turn a validator's output into a hard stop.
///
/// # Errors
/// [`EngineError::Validation`] when `messages` is non-empty.
pub fn ensure_valid(group: ValidationGroup, messages: Vec<String>) -> Result<(), EngineError> {
    if messages.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation { group, messages })
    }
}
