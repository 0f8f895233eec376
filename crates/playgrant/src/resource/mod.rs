//! Declarative resources: users and app-level grants.
//!
//! Each kind implements [`Resource`]. Operations never fail outright; every
//! error and warning is folded into the returned [`Outcome`], and `state`
//! is what should be persisted afterwards.

mod app_iam;
mod user;

use async_trait::async_trait;
use playgrant_client::RequestContext;

use crate::diagnostics::Diagnostics;
use crate::plan::{Plan, PlanAction};

pub use app_iam::{AppIamResource, GrantConfig};
pub use user::{UserConfig, UserResource};

/// Result of one lifecycle operation.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    /// State after the operation. `None` means nothing is persisted.
    pub state: Option<T>,
    pub diagnostics: Diagnostics,
    /// Set by reads that found the remote record different from state.
    pub drifted: bool,
}

impl<T> Outcome<T> {
    /// The operation succeeded and `state` should be persisted.
    pub fn applied(state: T, diagnostics: Diagnostics) -> Self {
        Self {
            state: Some(state),
            diagnostics,
            drifted: false,
        }
    }

    /// The resource no longer exists.
    pub fn removed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
            drifted: false,
        }
    }

    /// The operation failed; `state` is the unchanged pre-operation state.
    pub fn failed(state: Option<T>, diagnostics: Diagnostics) -> Self {
        Self {
            state,
            diagnostics,
            drifted: false,
        }
    }

    pub fn with_drift(mut self, drifted: bool) -> Self {
        self.drifted = drifted;
        self
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

/// Lifecycle of one resource kind.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Declared attributes.
    type Config: Send + Sync;
    /// Persisted state.
    type Record: Clone + Send + Sync;

    /// Resource type name, e.g. `googleplay_user`.
    const TYPE_NAME: &'static str;

    /// Pre-apply validation gate.
    fn validate(&self, config: &Self::Config) -> Diagnostics;

    /// Compute the planned record and the action that reaches it.
    fn plan(&self, prior: Option<&Self::Record>, config: &Self::Config) -> Plan<Self::Record>;

    async fn create(&self, ctx: &RequestContext, config: &Self::Config) -> Outcome<Self::Record>;

    /// Refresh `prior` from the remote list.
    async fn read(&self, ctx: &RequestContext, prior: &Self::Record) -> Outcome<Self::Record>;

    async fn update(
        &self,
        ctx: &RequestContext,
        prior: &Self::Record,
        config: &Self::Config,
    ) -> Outcome<Self::Record>;

    async fn delete(&self, ctx: &RequestContext, prior: &Self::Record) -> Outcome<Self::Record>;

    /// Plan, then run whatever the plan calls for.
    async fn apply(
        &self,
        ctx: &RequestContext,
        prior: Option<&Self::Record>,
        config: &Self::Config,
    ) -> Outcome<Self::Record> {
        let plan = self.plan(prior, config);
        if !plan.is_applicable() {
            return Outcome::failed(prior.cloned(), plan.diagnostics);
        }

        match (plan.action, prior) {
            (PlanAction::Create, _) | (_, None) => self.create(ctx, config).await,
            (PlanAction::Update, Some(prior)) => self.update(ctx, prior, config).await,
            (PlanAction::Replace, Some(prior)) => {
                let deleted = self.delete(ctx, prior).await;
                if deleted.has_error() {
                    return deleted;
                }
                let mut created = self.create(ctx, config).await;
                let mut diagnostics = deleted.diagnostics;
                diagnostics.append(created.diagnostics);
                created.diagnostics = diagnostics;
                created
            }
            (PlanAction::NoOp, Some(prior)) => Outcome::applied(prior.clone(), plan.diagnostics),
        }
    }
}
