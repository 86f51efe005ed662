//! The contracts between a node and the host runtime.
//!
//! A node reads its configuration through [`ParameterSource`], talks to the
//! outside world through [`HttpRequester`], and is driven by the host through
//! [`ExecutableNode`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::execution::ExecutionItem;
use crate::http::HttpRequest;
use crate::{FieldMissing, HttpError, NodeError};

/// Supplies raw field values by name (or dotted path) for one input item.
///
/// Implementations return `Ok(Value::Null)` for a registered field the user
/// left unset and `Err(FieldMissing)` for a field that does not exist for the
/// current operation or mode.
pub trait ParameterSource: Send + Sync {
    fn get_node_parameter(&self, name: &str, item: usize) -> Result<Value, FieldMissing>;

    /// Like [`get_node_parameter`](Self::get_node_parameter) but substitutes
    /// `fallback` for an unset field. Unregistered fields still error.
    fn get_node_parameter_or(
        &self,
        name: &str,
        item: usize,
        fallback: Value,
    ) -> Result<Value, FieldMissing> {
        match self.get_node_parameter(name, item)? {
            Value::Null => Ok(fallback),
            value => Ok(value),
        }
    }
}

/// Outbound HTTP seam. Resolves to the parsed JSON body.
#[async_trait]
pub trait HttpRequester: Send + Sync {
    async fn request(&self, request: HttpRequest) -> Result<Value, HttpError>;
}

/// Shared context passed to a node for one execution.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Correlates log lines for a single run.
    pub execution_id: Uuid,
    /// Display name of the node inside its workflow.
    pub node_name: String,
    /// Per-item parameter accessor.
    pub parameters: Arc<dyn ParameterSource>,
    /// Credential documents keyed by credential type name.
    pub credentials: HashMap<String, Value>,
    /// Convert item-level failures into error rows instead of aborting.
    pub continue_on_fail: bool,
}

impl ExecutionContext {
    pub fn new(node_name: impl Into<String>, parameters: Arc<dyn ParameterSource>) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            node_name: node_name.into(),
            parameters,
            credentials: HashMap::new(),
            continue_on_fail: false,
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, name: impl Into<String>, document: Value) -> Self {
        self.credentials.insert(name.into(), document);
        self
    }

    #[must_use]
    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    /// Deserialize the credential document registered under `name`.
    ///
    /// # Errors
    /// [`NodeError::Credentials`] if nothing is registered or the document
    /// does not match `T`.
    pub fn get_credentials<T: DeserializeOwned>(&self, name: &str) -> Result<T, NodeError> {
        let document = self
            .credentials
            .get(name)
            .ok_or_else(|| NodeError::Credentials {
                name: name.to_owned(),
                reason: "no credentials configured".to_owned(),
            })?;

        serde_json::from_value(document.clone()).map_err(|e| NodeError::Credentials {
            name: name.to_owned(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credential documents hold secrets; only their names are printed.
        f.debug_struct("ExecutionContext")
            .field("execution_id", &self.execution_id)
            .field("node_name", &self.node_name)
            .field("credentials", &self.credentials.keys().collect::<Vec<_>>())
            .field("continue_on_fail", &self.continue_on_fail)
            .finish_non_exhaustive()
    }
}

/// The core node trait.
///
/// The host hands over the node's input items; the node returns a single
/// output batch of rows, each paired to the input item that produced it.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    async fn execute(
        &self,
        items: Vec<Value>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Vec<ExecutionItem>>, NodeError>;
}
