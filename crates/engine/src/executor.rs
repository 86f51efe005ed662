//! Node execution loop.
//!
//! `Json2VideoNode` processes input items strictly in order:
//! 1. Resolves the item's operation (and advanced-mode flag).
//! 2. Builds the request body, or a status query for `checkStatus`.
//! 3. Sends it with the API key and normalizes the response into rows.
//! 4. On failure, records an error row when continue-on-fail is set, and
//!    otherwise aborts the batch with the first error. Nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};
use url::Url;

use nodes::{
    construct_execution_meta_data, return_json_array, ExecutableNode, ExecutionContext,
    ExecutionItem, HttpRequest, HttpRequester, NodeError,
};

use crate::credentials::{Json2VideoCredentials, API_KEY_HEADER, CREDENTIALS_NAME};
use crate::error::EngineError;
use crate::models::Operation;
use crate::params::Parameters;
use crate::request::{build_request_body, is_advanced_mode};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Credential type looked up in the execution context.
    pub credentials_name: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.json2video.com/v2".to_owned(),
            credentials_name: CREDENTIALS_NAME.to_owned(),
        }
    }
}

impl NodeConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    /// Movie creation endpoint, shared by every building operation.
    pub fn movies_url(&self) -> String {
        format!("{}/movies", self.base_url)
    }

    /// Status endpoint for one job. The id is always a single path segment.
    ///
    /// # Errors
    /// [`EngineError::StatusUrl`] if the base URL does not parse or the id
    /// is a dot segment.
    pub fn status_url(&self, job_id: &str) -> Result<String, EngineError> {
        let invalid = |reason: String| EngineError::StatusUrl {
            job_id: job_id.to_owned(),
            reason,
        };
        if matches!(job_id, "." | "..") {
            return Err(invalid("job id cannot be a dot segment".to_owned()));
        }

        let mut url = Url::parse(&self.movies_url()).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{} cannot be a base URL", self.base_url)))?
            .push(job_id);
        Ok(url.into())
    }
}

// ---------------------------------------------------------------------------
// Json2VideoNode
// ---------------------------------------------------------------------------

pub struct Json2VideoNode {
    http: Arc<dyn HttpRequester>,
    config: NodeConfig,
}

impl Json2VideoNode {
    pub fn new(http: Arc<dyn HttpRequester>, config: NodeConfig) -> Self {
        Self { http, config }
    }

    /// Assemble the outbound request for one item.
    ///
    /// # Errors
    /// Unsupported operation, credential, template, or validation failures.
    pub fn prepare_request(
        &self,
        ctx: &ExecutionContext,
        item: usize,
    ) -> Result<HttpRequest, EngineError> {
        let params = Parameters::new(ctx.parameters.as_ref(), item);
        let operation: Operation = params
            .string("operation")
            .unwrap_or_else(|| Operation::CreateMovie.to_string())
            .parse()?;

        let request = match operation {
            Operation::CheckStatus => {
                let job_id = params.string("jobId").ok_or(EngineError::MissingJobId)?;
                HttpRequest::get(self.config.status_url(&job_id)?)
            }
            _ => {
                let advanced = is_advanced_mode(&params, operation);
                let body = build_request_body(ctx.parameters.as_ref(), operation, item, advanced)?;
                let mut request = HttpRequest::post(self.config.movies_url(), body.to_value()?);
                if let Some(record_id) = params.string("recordId") {
                    request = request.query("id", record_id);
                }
                if let Some(webhook) = params.string("webhookUrl") {
                    request = request.query("webhook", webhook);
                }
                request
            }
        };

        let credentials: Json2VideoCredentials =
            ctx.get_credentials(&self.config.credentials_name)?;

        Ok(request
            .header(API_KEY_HEADER, credentials.api_key.expose_secret().as_str())
            .header("Content-Type", "application/json"))
    }

    #[instrument(skip(self, ctx), fields(execution_id = %ctx.execution_id))]
    async fn execute_item(
        &self,
        ctx: &ExecutionContext,
        item: usize,
    ) -> Result<Vec<ExecutionItem>, EngineError> {
        let request = self.prepare_request(ctx, item)?;
        info!(method = ?request.method, url = %request.url, "calling movie API");

        let response = self.http.request(request).await?;
        Ok(construct_execution_meta_data(return_json_array(response), item))
    }
}

#[async_trait]
impl ExecutableNode for Json2VideoNode {
    #[instrument(skip(self, items, ctx), fields(node = %ctx.node_name, item_count = items.len()))]
    async fn execute(
        &self,
        items: Vec<serde_json::Value>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Vec<ExecutionItem>>, NodeError> {
        let mut rows = Vec::with_capacity(items.len());

        for item in 0..items.len() {
            match self.execute_item(ctx, item).await {
                Ok(output) => rows.extend(output),

                Err(err) if ctx.continue_on_fail => {
                    warn!(item, error = %err, "item failed, continuing");
                    rows.push(ExecutionItem::error(err.user_message(), item));
                }

                Err(err) => {
                    error!(item, error = %err, "item failed, aborting batch");
                    return Err(NodeError::Item {
                        item,
                        message: err.user_message(),
                    });
                }
            }
        }

        Ok(vec![rows])
    }
}
