//! Error types for the state module.

use playgrant_core::CoreError;
use thiserror::Error;

/// Errors that can occur during state operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// Record encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A key held a record of the other resource kind.
    #[error("state for {key} is not a {expected} record")]
    KindMismatch { key: String, expected: &'static str },
}

impl From<CoreError> for StateError {
    fn from(e: CoreError) -> Self {
        StateError::Serialization(e.to_string())
    }
}

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;
