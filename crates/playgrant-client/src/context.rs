//! Cancellable request context.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};

/// Carried into every remote operation.
///
/// Cloning shares the same cancellation state. A [`child`](Self::child)
/// context is cancelled with its parent but can also be cancelled alone.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
}

impl RequestContext {
    /// A fresh, uncancelled context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context cancelled whenever this one is.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Cancel this context and all children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail fast if already cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        Ok(())
    }

    /// Run `fut` unless the context is cancelled first.
    ///
    /// On cancellation the future is dropped and `Cancelled` is returned,
    /// whatever the future would have produced.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ClientError::Cancelled),
            result = fut => result,
        }
    }
}
