//! Error types for playgrant core.

use thiserror::Error;

/// A qualified name returned by the remote API did not have the expected shape.
///
/// Segment positions are 1-based, matching the layout
/// `developers/{developerID}/users/{email}/grants/{appID}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("qualified name {name:?} has {found} segments, expected {expected}")]
    SegmentCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("qualified name {name:?} has {found:?} at segment {position}, expected {expected:?}")]
    UnexpectedLiteral {
        name: String,
        position: usize,
        expected: &'static str,
        found: String,
    },

    #[error("qualified name {name:?} has an empty {field} segment")]
    EmptySegment { name: String, field: &'static str },
}

/// Core errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed qualified name: {0}")]
    Name(#[from] NameError),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
