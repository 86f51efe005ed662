//! Engine-level error types.

use std::fmt;

use thiserror::Error;

use nodes::{HttpError, NodeError};

/// Which validator group rejected a request. Its `Display` is the message
/// prefix the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationGroup {
    Scene,
    Movie,
    Text,
}

impl fmt::Display for ValidationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scene => "Scene element validation errors:",
            Self::Movie => "Movie element validation errors:",
            Self::Text => "Text element validation errors:",
        })
    }
}

/// Errors that fail a single input item.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Request construction ------

    /// Advanced-mode template did not parse to a JSON object.
    #[error("Invalid JSON template: {0}")]
    InvalidTemplate(String),

    /// Basic-mode structural validation failed; nothing is sent.
    #[error("{} {}", .group, .messages.join(", "))]
    Validation {
        group: ValidationGroup,
        messages: Vec<String>,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The operation queries the API without building a request body.
    #[error("operation '{0}' does not build a request body")]
    NoRequestBody(String),

    #[error("Job ID is required for checkStatus")]
    MissingJobId,

    #[error("cannot build status URL for job '{job_id}': {reason}")]
    StatusUrl { job_id: String, reason: String },

    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    // ------ Execution ------

    #[error(transparent)]
    Credentials(#[from] NodeError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

impl EngineError {
    /// Wrap a template parser failure, substituting a generic message when
    /// the parser gave none.
    pub fn invalid_template(cause: impl fmt::Display) -> Self {
        let message = cause.to_string();
        if message.trim().is_empty() {
            Self::InvalidTemplate("Unknown parsing error".to_owned())
        } else {
            Self::InvalidTemplate(message)
        }
    }

    /// The text written into an error row. Never empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error occurred".to_owned()
        } else {
            message
        }
    }
}

/// A single element's transform failed. Non-fatal: the element is dropped
/// with a warning and its siblings are kept.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("element is not an object")]
    NotAnObject,

    #[error("element has no type")]
    MissingType,

    #[error("unknown element type '{0}'")]
    UnknownType(String),

    #[error("field '{field}' is not a valid JSON object: {reason}")]
    InvalidObject { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_carries_group_prefix() {
        let err = EngineError::Validation {
            group: ValidationGroup::Scene,
            messages: vec!["Element 1 (video): src is required".into(), "Element 2 (text): Text is required".into()],
        };
        assert_eq!(
            err.to_string(),
            "Scene element validation errors: Element 1 (video): src is required, Element 2 (text): Text is required"
        );
    }

    #[test]
    fn blank_parser_message_becomes_unknown_parsing_error() {
        assert_eq!(
            EngineError::invalid_template("").to_string(),
            "Invalid JSON template: Unknown parsing error"
        );
    }
}
