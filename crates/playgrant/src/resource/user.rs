//! Users of the developer account and their account-wide permissions.

use async_trait::async_trait;
use playgrant_client::{GrantClient, RequestContext, User};
use playgrant_core::{DeveloperScope, PermissionSet, UserName, UserRecord};
use playgrant_state::{ResourceKey, StateStore, StoredRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Outcome, Resource};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ReconcileError, Result};
use crate::plan::{
    expanded_permissions, same_email, validate_permissions, EmptyPermissions, Plan, PlanAction,
};
use crate::reconciler::{log_diagnostics, Reconciler};

const GLOBAL_PERMISSIONS: &str = "global_permissions";

/// Declared attributes of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub email: String,
    /// Optional; may be empty.
    #[serde(default)]
    pub global_permissions: Vec<String>,
}

impl UserConfig {
    pub fn new<I, T>(email: impl Into<String>, global_permissions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            email: email.into(),
            global_permissions: global_permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permission_set(&self) -> PermissionSet<DeveloperScope> {
        PermissionSet::from_tokens(self.global_permissions.iter())
    }
}

/// The `googleplay_user` resource.
pub struct UserResource<C: GrantClient, S: StateStore> {
    reconciler: Reconciler<C, S>,
}

impl<C: GrantClient, S: StateStore> UserResource<C, S> {
    pub fn new(reconciler: Reconciler<C, S>) -> Self {
        Self { reconciler }
    }

    fn record_from_user(
        &self,
        user: &User,
        global_permissions: PermissionSet<DeveloperScope>,
    ) -> Result<UserRecord> {
        let name = UserName::parse(&user.name)?;
        let returned: PermissionSet<DeveloperScope> =
            PermissionSet::from_tokens(user.developer_account_permissions.iter());

        let mut record = UserRecord {
            developer_id: String::new(),
            email: String::new(),
            name: String::new(),
            global_permissions,
            expanded_permissions: self.reconciler.catalog().expand(&returned),
        };
        record.adopt_identity(name);
        Ok(record)
    }

    async fn commit(
        &self,
        prior: Option<&UserRecord>,
        record: &UserRecord,
        diagnostics: &mut Diagnostics,
    ) {
        let prior_key = prior.map(|p| ResourceKey::User(p.user_name()));
        self.reconciler
            .commit(prior_key, StoredRecord::User(record.clone()), diagnostics)
            .await;
    }
}

fn fail(
    mut diagnostics: Diagnostics,
    summary: &str,
    error: impl Into<ReconcileError>,
    state: Option<&UserRecord>,
) -> Outcome<UserRecord> {
    diagnostics.push(error.into().to_diagnostic(summary));
    Outcome::failed(state.cloned(), diagnostics)
}

#[async_trait]
impl<C: GrantClient, S: StateStore> Resource for UserResource<C, S> {
    type Config = UserConfig;
    type Record = UserRecord;

    const TYPE_NAME: &'static str = "googleplay_user";

    fn validate(&self, config: &UserConfig) -> Diagnostics {
        validate_permissions(
            self.reconciler.catalog(),
            GLOBAL_PERMISSIONS,
            &config.permission_set(),
            EmptyPermissions::Allowed,
        )
    }

    fn plan(&self, prior: Option<&UserRecord>, config: &UserConfig) -> Plan<UserRecord> {
        let global_permissions = config.permission_set();
        let developer_id = self.reconciler.developer_id().to_owned();
        let mut planned = UserRecord {
            name: UserName::new(&*developer_id, &*config.email).to_string(),
            developer_id,
            email: config.email.clone(),
            expanded_permissions: expanded_permissions(self.reconciler.catalog(), &global_permissions),
            global_permissions,
        };

        let action = match prior {
            None => PlanAction::Create,
            Some(p) if !same_email(&p.email, &config.email) => PlanAction::Replace,
            Some(p) => {
                planned.developer_id = p.developer_id.clone();
                planned.email = p.email.clone();
                planned.name = p.name.clone();
                if p.global_permissions == planned.global_permissions {
                    PlanAction::NoOp
                } else {
                    PlanAction::Update
                }
            }
        };

        Plan {
            action,
            planned,
            diagnostics: self.validate(config),
        }
    }

    async fn create(&self, ctx: &RequestContext, config: &UserConfig) -> Outcome<UserRecord> {
        let mut diagnostics = self.validate(config);
        log_diagnostics("create", &config.email, &diagnostics);
        if diagnostics.has_error() {
            return Outcome::failed(None, diagnostics);
        }

        info!(email = %config.email, "creating user");
        let global_permissions = config.permission_set();
        let user = match self
            .reconciler
            .client()
            .create_user(ctx, &config.email, &global_permissions.to_token_vec())
            .await
        {
            Ok(user) => user,
            Err(e) => return fail(diagnostics, "Failed to create user", e, None),
        };

        let record = match self.record_from_user(&user, global_permissions) {
            Ok(record) => record,
            Err(e) => return fail(diagnostics, "Failed to create user", e, None),
        };

        self.commit(None, &record, &mut diagnostics).await;
        Outcome::applied(record, diagnostics)
    }

    async fn read(&self, ctx: &RequestContext, prior: &UserRecord) -> Outcome<UserRecord> {
        let mut diagnostics = Diagnostics::new();
        if prior.email.is_empty() {
            let missing = ReconcileError::MissingAttribute {
                attribute: "email",
                purpose: "fetch user information",
            };
            return fail(diagnostics, "", missing, Some(prior));
        }

        let users = match self.reconciler.client().list_users(ctx).await {
            Ok(users) => users,
            Err(e) => return fail(diagnostics, "Failed to fetch users", e, Some(prior)),
        };

        let Some(user) = users.iter().find(|u| same_email(&u.email, &prior.email)) else {
            info!(email = %prior.email, "user not found remotely; keeping state");
            return Outcome::applied(prior.clone(), diagnostics);
        };

        let observed = PermissionSet::from_tokens(user.developer_account_permissions.iter());
        let record = match self.record_from_user(user, observed) {
            Ok(record) => record,
            Err(e) => return fail(diagnostics, "Failed to fetch users", e, Some(prior)),
        };

        let drifted = self
            .reconciler
            .detect_drift(
                &StoredRecord::User(prior.clone()),
                &StoredRecord::User(record.clone()),
                &mut diagnostics,
            )
            .await;
        if diagnostics.has_error() {
            return Outcome::failed(Some(prior.clone()), diagnostics);
        }
        self.commit(Some(prior), &record, &mut diagnostics).await;
        Outcome::applied(record, diagnostics).with_drift(drifted)
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        prior: &UserRecord,
        config: &UserConfig,
    ) -> Outcome<UserRecord> {
        let mut diagnostics = self.validate(config);
        log_diagnostics("update", &prior.email, &diagnostics);
        if diagnostics.has_error() {
            return Outcome::failed(Some(prior.clone()), diagnostics);
        }
        if !same_email(&prior.email, &config.email) {
            diagnostics.push(Diagnostic::error(
                "Resource requires replacement",
                "email cannot be changed in place.",
            ));
            return Outcome::failed(Some(prior.clone()), diagnostics);
        }

        info!(email = %prior.email, "updating user");
        let global_permissions = config.permission_set();
        let user = match self
            .reconciler
            .client()
            .update_user(ctx, &prior.email, &global_permissions.to_token_vec())
            .await
        {
            Ok(user) => user,
            Err(e) => return fail(diagnostics, "Failed to update user", e, Some(prior)),
        };

        let record = match self.record_from_user(&user, global_permissions) {
            Ok(record) => record,
            Err(e) => return fail(diagnostics, "Failed to update user", e, Some(prior)),
        };

        self.commit(Some(prior), &record, &mut diagnostics).await;
        Outcome::applied(record, diagnostics)
    }

    async fn delete(&self, ctx: &RequestContext, prior: &UserRecord) -> Outcome<UserRecord> {
        let mut diagnostics = Diagnostics::new();
        info!(email = %prior.email, "deleting user");

        if let Err(e) = self.reconciler.client().delete_user(ctx, &prior.email).await {
            let diagnostic = if e.is_cancelled() {
                ReconcileError::from(e).to_diagnostic("Client Error")
            } else {
                Diagnostic::error("Client Error", format!("Unable to delete user, got error: {e}"))
            };
            diagnostics.push(diagnostic);
            log_diagnostics("delete", &prior.email, &diagnostics);
            return Outcome::failed(Some(prior.clone()), diagnostics);
        }

        self.reconciler
            .forget(&ResourceKey::User(prior.user_name()), &mut diagnostics)
            .await;
        Outcome::removed(diagnostics)
    }
}
