//! Error types for the client module.

use thiserror::Error;

/// Errors returned by remote grant operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The remote API answered with a non-success status.
    #[error("remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request context was cancelled before the call completed.
    #[error("request cancelled")]
    Cancelled,

    /// The request could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Build an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
