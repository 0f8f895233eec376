//! In-memory console for testing.
//!
//! Behaves like the remote API closely enough to drive the reconciler:
//! emails are normalised to lower case, missing records are 404s,
//! duplicates are 409s. Every call is recorded, and a failure can be
//! queued for the next call of a given operation.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use playgrant_core::name::UserName;
use tokio::sync::RwLock;

use crate::client::GrantClient;
use crate::context::RequestContext;
use crate::error::{ClientError, Result};
use crate::wire::{Grant, User};

/// The operations of [`GrantClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleOp {
    ListUsers,
    CreateUser,
    UpdateUser,
    DeleteUser,
    GrantAccess,
    ModifyAccess,
    RevokeAccess,
}

/// A recorded call, with arguments as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCall {
    ListUsers,
    CreateUser {
        email: String,
        permissions: Vec<String>,
    },
    UpdateUser {
        email: String,
        permissions: Vec<String>,
    },
    DeleteUser {
        email: String,
    },
    GrantAccess {
        email: String,
        app_id: String,
        permissions: Vec<String>,
    },
    ModifyAccess {
        email: String,
        app_id: String,
        permissions: Vec<String>,
    },
    RevokeAccess {
        email: String,
        app_id: String,
    },
}

impl ConsoleCall {
    pub fn op(&self) -> ConsoleOp {
        match self {
            ConsoleCall::ListUsers => ConsoleOp::ListUsers,
            ConsoleCall::CreateUser { .. } => ConsoleOp::CreateUser,
            ConsoleCall::UpdateUser { .. } => ConsoleOp::UpdateUser,
            ConsoleCall::DeleteUser { .. } => ConsoleOp::DeleteUser,
            ConsoleCall::GrantAccess { .. } => ConsoleOp::GrantAccess,
            ConsoleCall::ModifyAccess { .. } => ConsoleOp::ModifyAccess,
            ConsoleCall::RevokeAccess { .. } => ConsoleOp::RevokeAccess,
        }
    }
}

#[derive(Debug, Default)]
struct ConsoleState {
    /// Keyed by lower-cased email.
    users: BTreeMap<String, User>,
    calls: Vec<ConsoleCall>,
    faults: HashMap<ConsoleOp, ClientError>,
}

/// In-memory [`GrantClient`].
#[derive(Debug)]
pub struct MemoryConsole {
    developer_id: String,
    state: RwLock<ConsoleState>,
    latency: Option<Duration>,
}

fn not_found(what: &str) -> ClientError {
    ClientError::api(404, format!("{what} not found"))
}

fn already_exists(what: &str) -> ClientError {
    ClientError::api(409, format!("{what} already exists"))
}

impl MemoryConsole {
    pub fn new(developer_id: impl Into<String>) -> Self {
        Self {
            developer_id: developer_id.into(),
            state: RwLock::new(ConsoleState::default()),
            latency: None,
        }
    }

    /// Delay every call by `latency` before it takes effect.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert or replace a user directly, bypassing the call log.
    ///
    /// Used to seed fixtures and to simulate out-of-band changes.
    pub async fn upsert_user(&self, mut user: User) {
        let email = user.email.to_lowercase();
        user.email = email.clone();
        if user.name.is_empty() {
            user.name = self.user_name(&email).to_string();
        }
        self.state.write().await.users.insert(email, user);
    }

    /// Replace a grant's permissions directly, bypassing the call log.
    pub async fn set_grant_permissions(&self, email: &str, app_id: &str, permissions: &[String]) -> bool {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&email.to_lowercase()) else {
            return false;
        };
        match user.grants.iter_mut().find(|g| g.package_name == app_id) {
            Some(grant) => {
                grant.app_level_permissions = permissions.to_vec();
                true
            }
            None => false,
        }
    }

    /// Remove a user directly, bypassing the call log.
    pub async fn remove_user(&self, email: &str) -> Option<User> {
        self.state.write().await.users.remove(&email.to_lowercase())
    }

    /// Snapshot of a user.
    pub async fn user(&self, email: &str) -> Option<User> {
        self.state.read().await.users.get(&email.to_lowercase()).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<ConsoleCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }

    /// Fail the next call of `op` with `error`.
    pub async fn fail_next(&self, op: ConsoleOp, error: ClientError) {
        self.state.write().await.faults.insert(op, error);
    }

    fn user_name(&self, email: &str) -> UserName {
        UserName::new(&*self.developer_id, email)
    }

    /// Record the call, wait out the latency, then apply any queued fault.
    async fn enter(&self, ctx: &RequestContext, call: ConsoleCall) -> Result<()> {
        ctx.check()?;
        let op = call.op();
        let fault = {
            let mut state = self.state.write().await;
            state.calls.push(call);
            state.faults.remove(&op)
        };

        if let Some(latency) = self.latency {
            ctx.run(async {
                tokio::time::sleep(latency).await;
                Ok(())
            })
            .await?;
        }

        match fault {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GrantClient for MemoryConsole {
    fn developer_id(&self) -> &str {
        &self.developer_id
    }

    async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<User>> {
        self.enter(ctx, ConsoleCall::ListUsers).await?;
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn create_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        global_permissions: &[String],
    ) -> Result<User> {
        self.enter(
            ctx,
            ConsoleCall::CreateUser {
                email: email.to_owned(),
                permissions: global_permissions.to_vec(),
            },
        )
        .await?;

        let email = email.to_lowercase();
        let mut state = self.state.write().await;
        if state.users.contains_key(&email) {
            return Err(already_exists("User"));
        }

        let user = User {
            name: self.user_name(&email).to_string(),
            email: email.clone(),
            access_state: Some("INVITED".to_owned()),
            developer_account_permissions: global_permissions.to_vec(),
            ..User::default()
        };
        state.users.insert(email, user.clone());
        Ok(user)
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        global_permissions: &[String],
    ) -> Result<User> {
        self.enter(
            ctx,
            ConsoleCall::UpdateUser {
                email: email.to_owned(),
                permissions: global_permissions.to_vec(),
            },
        )
        .await?;

        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&email.to_lowercase())
            .ok_or_else(|| not_found("User"))?;
        user.developer_account_permissions = global_permissions.to_vec();
        Ok(user.clone())
    }

    async fn delete_user(&self, ctx: &RequestContext, email: &str) -> Result<()> {
        self.enter(
            ctx,
            ConsoleCall::DeleteUser {
                email: email.to_owned(),
            },
        )
        .await?;

        self.state
            .write()
            .await
            .users
            .remove(&email.to_lowercase())
            .map(|_| ())
            .ok_or_else(|| not_found("User"))
    }

    async fn grant_access(
        &self,
        ctx: &RequestContext,
        email: &str,
        app_id: &str,
        permissions: &[String],
    ) -> Result<Grant> {
        self.enter(
            ctx,
            ConsoleCall::GrantAccess {
                email: email.to_owned(),
                app_id: app_id.to_owned(),
                permissions: permissions.to_vec(),
            },
        )
        .await?;

        let email = email.to_lowercase();
        let name = self.user_name(&email).grant(app_id).to_string();
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&email).ok_or_else(|| not_found("User"))?;
        if user.grant_for(app_id).is_some() {
            return Err(already_exists("Grant"));
        }

        let grant = Grant {
            name,
            package_name: app_id.to_owned(),
            app_level_permissions: permissions.to_vec(),
        };
        user.grants.push(grant.clone());
        Ok(grant)
    }

    async fn modify_access(
        &self,
        ctx: &RequestContext,
        email: &str,
        app_id: &str,
        permissions: &[String],
    ) -> Result<Grant> {
        self.enter(
            ctx,
            ConsoleCall::ModifyAccess {
                email: email.to_owned(),
                app_id: app_id.to_owned(),
                permissions: permissions.to_vec(),
            },
        )
        .await?;

        let mut state = self.state.write().await;
        let grant = state
            .users
            .get_mut(&email.to_lowercase())
            .and_then(|u| u.grants.iter_mut().find(|g| g.package_name == app_id))
            .ok_or_else(|| not_found("Grant"))?;
        grant.app_level_permissions = permissions.to_vec();
        Ok(grant.clone())
    }

    async fn revoke_access(&self, ctx: &RequestContext, email: &str, app_id: &str) -> Result<()> {
        self.enter(
            ctx,
            ConsoleCall::RevokeAccess {
                email: email.to_owned(),
                app_id: app_id.to_owned(),
            },
        )
        .await?;

        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&email.to_lowercase())
            .ok_or_else(|| not_found("Grant"))?;
        let before = user.grants.len();
        user.grants.retain(|g| g.package_name != app_id);
        if user.grants.len() == before {
            return Err(not_found("Grant"));
        }
        Ok(())
    }
}
