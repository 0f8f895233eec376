//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use playgrant::{GrantConfig, Outcome, Reconciler, Resource, UserConfig};
use playgrant_client::{Grant, MemoryConsole, RequestContext, User};
use playgrant_core::{Catalog, GrantName, GrantRecord, UserName, UserRecord};
use playgrant_state::{MemoryStateStore, StateStore};

/// Developer account used when none is given.
pub const DEFAULT_DEVELOPER_ID: &str = "5166846112789481453";

/// A reconciler over an in-memory console and state store.
pub struct TestFixture {
    pub reconciler: Reconciler<MemoryConsole, MemoryStateStore>,
    pub ctx: RequestContext,
    console: Arc<MemoryConsole>,
    store: Arc<MemoryStateStore>,
}

impl TestFixture {
    /// Create a fixture for [`DEFAULT_DEVELOPER_ID`].
    pub fn new() -> Self {
        Self::with_developer(DEFAULT_DEVELOPER_ID)
    }

    /// Create a fixture for the given developer account.
    pub fn with_developer(developer_id: &str) -> Self {
        Self::with_catalog(developer_id, Catalog::play_console())
    }

    /// Create a fixture with a custom permission catalog.
    pub fn with_catalog(developer_id: &str, catalog: Catalog) -> Self {
        let console = Arc::new(MemoryConsole::new(developer_id));
        let store = Arc::new(MemoryStateStore::new());
        let reconciler =
            Reconciler::from_shared(Arc::clone(&console), Arc::clone(&store), Arc::new(catalog));
        Self {
            reconciler,
            ctx: RequestContext::new(),
            console,
            store,
        }
    }

    /// The fake console behind the reconciler.
    pub fn console(&self) -> &MemoryConsole {
        &self.console
    }

    /// The state store behind the reconciler.
    pub fn store(&self) -> &MemoryStateStore {
        &self.store
    }

    pub fn developer_id(&self) -> &str {
        self.reconciler.developer_id()
    }

    /// Qualified name of a grant in this developer account.
    pub fn grant_name(&self, email: &str, app_id: &str) -> GrantName {
        UserName::new(self.developer_id(), email).grant(app_id)
    }

    /// Put a user on the console without going through the reconciler.
    pub async fn seed_user(&self, email: &str, global_permissions: &[&str]) {
        self.console
            .upsert_user(User {
                email: email.to_owned(),
                developer_account_permissions: to_strings(global_permissions),
                ..User::default()
            })
            .await;
    }

    /// Put a grant on the console without going through the reconciler.
    ///
    /// The user is created if missing; an existing grant on the same app is
    /// replaced.
    pub async fn seed_grant(&self, email: &str, app_id: &str, permissions: &[&str]) {
        let mut user = self.console.user(email).await.unwrap_or_else(|| User {
            email: email.to_owned(),
            ..User::default()
        });
        user.grants.retain(|g| g.package_name != app_id);
        user.grants.push(Grant {
            name: self.grant_name(&email.to_lowercase(), app_id).to_string(),
            package_name: app_id.to_owned(),
            app_level_permissions: to_strings(permissions),
        });
        self.console.upsert_user(user).await;
    }

    /// Create a grant through the reconciler.
    pub async fn create_grant(
        &self,
        email: &str,
        app_id: &str,
        permissions: &[&str],
    ) -> Outcome<GrantRecord> {
        let config = GrantConfig::new(email, app_id, permissions.iter().copied());
        self.reconciler.app_iam().create(&self.ctx, &config).await
    }

    /// Create a user through the reconciler.
    pub async fn create_user(&self, email: &str, global_permissions: &[&str]) -> Outcome<UserRecord> {
        let config = UserConfig::new(email, global_permissions.iter().copied());
        self.reconciler.users().create(&self.ctx, &config).await
    }

    /// The grant record currently persisted, if any.
    pub async fn stored_grant(&self, email: &str, app_id: &str) -> Option<GrantRecord> {
        self.store
            .get_grant(&self.grant_name(email, app_id))
            .await
            .expect("memory store read failed")
    }

    /// The user record currently persisted, if any.
    pub async fn stored_user(&self, email: &str) -> Option<UserRecord> {
        self.store
            .get_user(&UserName::new(self.developer_id(), email))
            .await
            .expect("memory store read failed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn to_strings(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| (*t).to_owned()).collect()
}
