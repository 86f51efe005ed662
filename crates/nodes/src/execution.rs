//! Output rows handed back to the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which input item an output row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One output row: `{ "json": ..., "pairedItem": { "item": n } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionItem {
    pub json: Value,
    pub paired_item: PairedItem,
}

impl ExecutionItem {
    pub fn new(json: Value, item: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item },
        }
    }

    /// An error row for a failed item.
    pub fn error(message: impl Into<String>, item: usize) -> Self {
        Self::new(serde_json::json!({ "error": message.into() }), item)
    }
}

/// Split a response into row payloads: an array yields one payload per
/// entry, anything else yields itself.
pub fn return_json_array(response: Value) -> Vec<Value> {
    match response {
        Value::Array(entries) => entries,
        other => vec![other],
    }
}

/// Pair every payload with the input item that produced it.
pub fn construct_execution_meta_data(payloads: Vec<Value>, item: usize) -> Vec<ExecutionItem> {
    payloads
        .into_iter()
        .map(|json| ExecutionItem::new(json, item))
        .collect()
}
