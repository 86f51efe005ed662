//! `JsonParameters` — a [`ParameterSource`] backed by one JSON object per item.
//!
//! Used by the CLI (parameters loaded from a file) and by tests. Names are
//! resolved as a literal key first, then as a dotted path
//! (`"movieElements.elementValues"` → `item["movieElements"]["elementValues"]`).

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::{FieldMissing, ParameterSource};

#[derive(Debug, Clone, Default)]
pub struct JsonParameters {
    items: Vec<Map<String, Value>>,
    unregistered: HashSet<String>,
}

impl JsonParameters {
    pub fn new(items: Vec<Map<String, Value>>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// One parameter object for a single item.
    ///
    /// Non-object values produce an item with no parameters.
    pub fn single(item: Value) -> Self {
        Self::new(vec![into_object(item)])
    }

    /// Parse a parameter document: an object (one item) or an array of
    /// objects (one per item).
    pub fn from_value(document: Value) -> Self {
        match document {
            Value::Array(entries) => Self::new(entries.into_iter().map(into_object).collect()),
            other => Self::single(other),
        }
    }

    /// Make `name` behave like a field the host does not register.
    #[must_use]
    pub fn with_unregistered(mut self, name: impl Into<String>) -> Self {
        self.unregistered.insert(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn lookup(&self, name: &str, item: usize) -> Option<&Value> {
        let params = self.items.get(item)?;
        if let Some(value) = params.get(name) {
            return Some(value);
        }

        let mut segments = name.split('.');
        let first = params.get(segments.next()?)?;
        segments.try_fold(first, |current, segment| current.get(segment))
    }
}

impl ParameterSource for JsonParameters {
    fn get_node_parameter(&self, name: &str, item: usize) -> Result<Value, FieldMissing> {
        let missing = || FieldMissing {
            name: name.to_owned(),
            item,
        };

        if self.unregistered.contains(name) || item >= self.items.len() {
            return Err(missing());
        }

        match self.lookup(name, item) {
            Some(value) => Ok(value.clone()),
            None => Ok(Value::Null),
        }
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_paths_resolve_into_nested_objects() {
        let params = JsonParameters::single(json!({
            "movieElements": { "elementValues": [{ "type": "image" }] }
        }));
        let value = params
            .get_node_parameter("movieElements.elementValues", 0)
            .unwrap();
        assert_eq!(value, json!([{ "type": "image" }]));
    }

    #[test]
    fn unset_fields_fall_back_and_unregistered_fields_error() {
        let params = JsonParameters::single(json!({ "recordId": "r1" })).with_unregistered("quality");

        assert_eq!(
            params.get_node_parameter_or("framerate", 0, json!(25)).unwrap(),
            json!(25)
        );
        assert!(params.get_node_parameter("quality", 0).is_err());
        assert!(params.get_node_parameter("recordId", 1).is_err());
    }
}
