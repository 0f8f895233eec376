//! Error types for reconciliation.

use playgrant_client::ClientError;
use playgrant_core::{CoreError, NameError};
use playgrant_state::StateError;
use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Errors that can occur while reconciling a resource.
///
/// Reconciler operations fold these into [`Diagnostics`](crate::Diagnostics)
/// rather than returning them.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Invalid operator input.
    #[error("{0}")]
    Config(String),

    /// An identity attribute was empty.
    #[error("Attribute '{attribute}' is required to {purpose}.")]
    MissingAttribute {
        attribute: &'static str,
        purpose: &'static str,
    },

    /// The server returned a malformed qualified name.
    #[error("invalid resource name: {0}")]
    Name(#[from] NameError),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Remote call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Persisted state could not be read or written.
    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl ReconcileError {
    /// Whether this error is a cancelled request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReconcileError::Client(ClientError::Cancelled))
    }

    /// Render as an error diagnostic under `summary`.
    ///
    /// Cancellation and malformed names get their own summaries so they are
    /// never mistaken for remote API failures.
    pub fn to_diagnostic(&self, summary: &str) -> Diagnostic {
        match self {
            ReconcileError::Client(ClientError::Cancelled) => {
                Diagnostic::error("Operation cancelled", self.to_string())
            }
            ReconcileError::Name(_) => Diagnostic::error("Invalid resource name", self.to_string()),
            ReconcileError::MissingAttribute { attribute, .. } => {
                Diagnostic::error("Missing required attribute", self.to_string())
                    .with_attribute(*attribute)
            }
            _ => Diagnostic::error(summary, self.to_string()),
        }
    }
}

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, ReconcileError>;
