//! Node-level error types.

use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// There is no retry: any error that escapes `execute` aborts the whole
/// batch, and items processed before it are not returned to the host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// An item failed and the node is not configured to continue on failure.
    #[error("item {item} failed: {message}")]
    Item {
        /// Index of the input item that failed.
        item: usize,
        /// Human-readable cause.
        message: String,
    },

    /// Credentials were missing from the context or had the wrong shape.
    #[error("credentials '{name}' unavailable: {reason}")]
    Credentials { name: String, reason: String },
}

/// Returned by a [`ParameterSource`](crate::ParameterSource) when a field is
/// not registered for the current operation or mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("parameter '{name}' is not available for item {item}")]
pub struct FieldMissing {
    pub name: String,
    pub item: usize,
}

/// Outbound HTTP failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The remote answered with a non-success status code.
    #[error("request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}
