//! The Reconciler: maps declared resources onto remote lifecycle calls.
//!
//! A `Reconciler` owns the remote client, the persisted state and the
//! permission catalog. Per-kind behaviour lives in [`crate::resource`];
//! this module holds what the kinds share: committing records to state,
//! forgetting them, and judging drift.

use std::sync::Arc;

use playgrant_client::GrantClient;
use playgrant_core::Catalog;
use playgrant_state::{PutResult, ResourceKey, StateStore, StoredRecord};
use tracing::{debug, info, warn};

use crate::datasource::{UserDataSource, UsersDataSource};
use crate::diagnostics::Diagnostics;
use crate::error::ReconcileError;
use crate::resource::{AppIamResource, UserResource};

const PERSIST_FAILED: &str = "Failed to persist state";

/// Entry point for reconciling users and app grants of one developer
/// account.
///
/// Cloning is cheap; clones share the client, store and catalog.
pub struct Reconciler<C: GrantClient, S: StateStore> {
    client: Arc<C>,
    store: Arc<S>,
    catalog: Arc<Catalog>,
}

impl<C: GrantClient, S: StateStore> Clone for Reconciler<C, S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: Arc::clone(&self.store),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<C: GrantClient, S: StateStore> Reconciler<C, S> {
    /// Create a reconciler over the Play Console permission catalog.
    pub fn new(client: C, store: S) -> Self {
        Self::with_catalog(client, store, Catalog::play_console())
    }

    /// Create a reconciler with a custom catalog.
    pub fn with_catalog(client: C, store: S, catalog: Catalog) -> Self {
        Self::from_shared(Arc::new(client), Arc::new(store), Arc::new(catalog))
    }

    /// Create a reconciler from already-shared parts.
    pub fn from_shared(client: Arc<C>, store: Arc<S>, catalog: Arc<Catalog>) -> Self {
        Self {
            client,
            store,
            catalog,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn developer_id(&self) -> &str {
        self.client.developer_id()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Resources and data sources
    // ─────────────────────────────────────────────────────────────────────────

    /// The user resource.
    pub fn users(&self) -> UserResource<C, S> {
        UserResource::new(self.clone())
    }

    /// The app IAM (grant) resource.
    pub fn app_iam(&self) -> AppIamResource<C, S> {
        AppIamResource::new(self.clone())
    }

    pub fn user_data_source(&self) -> UserDataSource<C> {
        UserDataSource::new(Arc::clone(&self.client))
    }

    pub fn users_data_source(&self) -> UsersDataSource<C> {
        UsersDataSource::new(Arc::clone(&self.client))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    /// Write `record`, removing `prior` first if the server moved it to a
    /// different key. Failures become diagnostics.
    pub(crate) async fn commit(
        &self,
        prior: Option<ResourceKey>,
        record: StoredRecord,
        diagnostics: &mut Diagnostics,
    ) {
        let key = record.key();
        if let Some(prior) = prior.filter(|p| *p != key) {
            debug!(from = %prior, to = %key, "resource identity changed");
            if let Err(e) = self.store.remove(&prior).await {
                diagnostics.push(ReconcileError::from(e).to_diagnostic(PERSIST_FAILED));
            }
        }

        match self.store.put(record).await {
            Ok(PutResult::Inserted) => debug!(%key, "state inserted"),
            Ok(PutResult::Unchanged) => debug!(%key, "state unchanged"),
            Ok(PutResult::Replaced { previous }) => debug!(%key, %previous, "state replaced"),
            Err(e) => {
                warn!(%key, error = %e, "failed to persist state");
                diagnostics.push(ReconcileError::from(e).to_diagnostic(PERSIST_FAILED));
            }
        }
    }

    /// Drop `key` from state after a successful remote delete.
    pub(crate) async fn forget(&self, key: &ResourceKey, diagnostics: &mut Diagnostics) {
        match self.store.remove(key).await {
            Ok(Some(_)) => debug!(%key, "state removed"),
            Ok(None) => debug!(%key, "no state to remove"),
            Err(e) => {
                warn!(%key, error = %e, "failed to remove state");
                diagnostics.push(ReconcileError::from(e).to_diagnostic(PERSIST_FAILED));
            }
        }
    }

    /// Whether `refreshed` differs from what is stored for `prior`.
    ///
    /// Records are compared by value, so permission order is ignored. When
    /// nothing is stored yet, `prior` itself is the baseline.
    pub(crate) async fn detect_drift(
        &self,
        prior: &StoredRecord,
        refreshed: &StoredRecord,
        diagnostics: &mut Diagnostics,
    ) -> bool {
        let baseline = match self.store.get(&prior.key()).await {
            Ok(Some(stored)) => stored,
            Ok(None) => prior.clone(),
            Err(e) => {
                diagnostics.push(ReconcileError::from(e).to_diagnostic(PERSIST_FAILED));
                return false;
            }
        };

        let drifted = baseline != *refreshed;
        if drifted {
            info!(key = %refreshed.key(), "drift detected");
        }
        drifted
    }
}

/// Log every diagnostic of a finished step.
pub(crate) fn log_diagnostics(operation: &str, key: &str, diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        if diagnostic.is_error() {
            warn!(operation, key, summary = %diagnostic.summary, detail = %diagnostic.detail, "reconciliation error");
        } else {
            info!(operation, key, detail = %diagnostic.detail, "{}", diagnostic.summary);
        }
    }
}
