//! Error types for flowlog-core

use thiserror::Error;

/// Result type alias for flow event operations
pub type Result<T> = std::result::Result<T, FlowEventError>;

/// Errors raised while building, parsing, or decoding flow events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowEventError {
    /// A required field was not set (`correlationId`, `edge.id`, ...)
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A history chain contained characters outside the Base64 basic alphabet
    #[error(
        "History must be a comma- or space-separated list of ids using the Base64 basic alphabet, got {history:?}"
    )]
    InvalidHistoryFormat { history: String },

    /// The input could not be decoded as a flow event document
    #[error("Malformed flow event document: {reason}")]
    MalformedDocument { reason: String },
}

impl FlowEventError {
    pub(crate) fn missing(field: &str) -> Self {
        FlowEventError::MissingRequiredField {
            field: field.to_string(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        FlowEventError::MalformedDocument {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FlowEventError {
    fn from(err: serde_json::Error) -> Self {
        FlowEventError::malformed(err.to_string())
    }
}
