//! App-level grants of one user on one app.

use async_trait::async_trait;
use playgrant_client::{Grant, GrantClient, RequestContext, User};
use playgrant_core::{AppScope, GrantName, GrantRecord, PermissionSet};
use playgrant_state::{ResourceKey, StateStore, StoredRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Outcome, Resource};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{ReconcileError, Result};
use crate::plan::{
    expanded_permissions, same_email, validate_permissions, EmptyPermissions, Plan, PlanAction,
};
use crate::reconciler::{log_diagnostics, Reconciler};

const PERMISSIONS: &str = "permissions";

/// Declared attributes of a grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantConfig {
    /// Email of the user receiving access.
    pub user_id: String,
    /// Package name of the app.
    pub app_id: String,
    pub permissions: Vec<String>,
}

impl GrantConfig {
    pub fn new<I, T>(user_id: impl Into<String>, app_id: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            app_id: app_id.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permission_set(&self) -> PermissionSet<AppScope> {
        PermissionSet::from_tokens(self.permissions.iter())
    }
}

/// The `googleplay_app_iam` resource.
pub struct AppIamResource<C: GrantClient, S: StateStore> {
    reconciler: Reconciler<C, S>,
}

impl<C: GrantClient, S: StateStore> AppIamResource<C, S> {
    pub fn new(reconciler: Reconciler<C, S>) -> Self {
        Self { reconciler }
    }

    /// Build state from a server grant. Identity comes from the grant's
    /// qualified name; `expanded_permissions` from what the server returned.
    fn record_from_grant(
        &self,
        grant: &Grant,
        permissions: PermissionSet<AppScope>,
    ) -> Result<GrantRecord> {
        let name = GrantName::parse(&grant.name)?;
        let returned: PermissionSet<AppScope> =
            PermissionSet::from_tokens(grant.app_level_permissions.iter());

        let mut record = GrantRecord {
            developer_id: String::new(),
            user_id: String::new(),
            app_id: String::new(),
            permissions,
            expanded_permissions: self.reconciler.catalog().expand(&returned),
        };
        record.adopt_identity(name);
        Ok(record)
    }

    async fn commit(
        &self,
        prior: Option<&GrantRecord>,
        record: &GrantRecord,
        diagnostics: &mut Diagnostics,
    ) {
        let prior_key = prior.map(|p| ResourceKey::Grant(p.name()));
        self.reconciler
            .commit(prior_key, StoredRecord::Grant(record.clone()), diagnostics)
            .await;
    }
}

/// Find the grant of `user_id` on `app_id` in a full user list.
///
/// Grants are matched by the app id parsed from their qualified name.
fn find_grant<'a>(users: &'a [User], user_id: &str, app_id: &str) -> Result<Option<&'a Grant>> {
    for user in users.iter().filter(|u| same_email(&u.email, user_id)) {
        for grant in &user.grants {
            if GrantName::parse(&grant.name)?.app_id == app_id {
                return Ok(Some(grant));
            }
        }
    }
    Ok(None)
}

fn fail(
    mut diagnostics: Diagnostics,
    summary: &str,
    error: impl Into<ReconcileError>,
    state: Option<&GrantRecord>,
) -> Outcome<GrantRecord> {
    diagnostics.push(error.into().to_diagnostic(summary));
    Outcome::failed(state.cloned(), diagnostics)
}

#[async_trait]
impl<C: GrantClient, S: StateStore> Resource for AppIamResource<C, S> {
    type Config = GrantConfig;
    type Record = GrantRecord;

    const TYPE_NAME: &'static str = "googleplay_app_iam";

    fn validate(&self, config: &GrantConfig) -> Diagnostics {
        validate_permissions(
            self.reconciler.catalog(),
            PERMISSIONS,
            &config.permission_set(),
            EmptyPermissions::Rejected,
        )
    }

    fn plan(&self, prior: Option<&GrantRecord>, config: &GrantConfig) -> Plan<GrantRecord> {
        let permissions = config.permission_set();
        let mut planned = GrantRecord {
            developer_id: self.reconciler.developer_id().to_owned(),
            user_id: config.user_id.clone(),
            app_id: config.app_id.clone(),
            expanded_permissions: expanded_permissions(self.reconciler.catalog(), &permissions),
            permissions,
        };

        let action = match prior {
            None => PlanAction::Create,
            Some(p) if !same_email(&p.user_id, &config.user_id) || p.app_id != config.app_id => {
                PlanAction::Replace
            }
            Some(p) => {
                planned.developer_id = p.developer_id.clone();
                planned.user_id = p.user_id.clone();
                if p.permissions == planned.permissions {
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

    async fn create(&self, ctx: &RequestContext, config: &GrantConfig) -> Outcome<GrantRecord> {
        let key = format!("{}/{}", config.user_id, config.app_id);
        let mut diagnostics = self.validate(config);
        log_diagnostics("create", &key, &diagnostics);
        if diagnostics.has_error() {
            return Outcome::failed(None, diagnostics);
        }

        info!(user = %config.user_id, app = %config.app_id, "granting app access");
        let permissions = config.permission_set();
        let grant = match self
            .reconciler
            .client()
            .grant_access(ctx, &config.user_id, &config.app_id, &permissions.to_token_vec())
            .await
        {
            Ok(grant) => grant,
            Err(e) => return fail(diagnostics, "Failed to grant access to app", e, None),
        };

        let record = match self.record_from_grant(&grant, permissions) {
            Ok(record) => record,
            Err(e) => return fail(diagnostics, "Failed to grant access to app", e, None),
        };

        self.commit(None, &record, &mut diagnostics).await;
        debug!(grant = %record.name(), "created grant");
        Outcome::applied(record, diagnostics)
    }

    async fn read(&self, ctx: &RequestContext, prior: &GrantRecord) -> Outcome<GrantRecord> {
        let mut diagnostics = Diagnostics::new();
        if prior.user_id.is_empty() {
            let missing = ReconcileError::MissingAttribute {
                attribute: "user_id",
                purpose: "fetch user information",
            };
            return fail(diagnostics, "", missing, Some(prior));
        }
        if prior.app_id.is_empty() {
            let missing = ReconcileError::MissingAttribute {
                attribute: "app_id",
                purpose: "fetch IAM information",
            };
            return fail(diagnostics, "", missing, Some(prior));
        }

        let users = match self.reconciler.client().list_users(ctx).await {
            Ok(users) => users,
            Err(e) => return fail(diagnostics, "Failed to fetch users", e, Some(prior)),
        };

        let grant = match find_grant(&users, &prior.user_id, &prior.app_id) {
            Ok(Some(grant)) => grant,
            Ok(None) => {
                info!(grant = %prior.name(), "grant not found remotely; keeping state");
                return Outcome::applied(prior.clone(), diagnostics);
            }
            Err(e) => return fail(diagnostics, "Failed to fetch users", e, Some(prior)),
        };

        let observed = PermissionSet::from_tokens(grant.app_level_permissions.iter());
        let record = match self.record_from_grant(grant, observed) {
            Ok(record) => record,
            Err(e) => return fail(diagnostics, "Failed to fetch users", e, Some(prior)),
        };

        let drifted = self
            .reconciler
            .detect_drift(
                &StoredRecord::Grant(prior.clone()),
                &StoredRecord::Grant(record.clone()),
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
        prior: &GrantRecord,
        config: &GrantConfig,
    ) -> Outcome<GrantRecord> {
        let mut diagnostics = self.validate(config);
        log_diagnostics("update", &prior.name().to_string(), &diagnostics);
        if diagnostics.has_error() {
            return Outcome::failed(Some(prior.clone()), diagnostics);
        }
        if !same_email(&prior.user_id, &config.user_id) || prior.app_id != config.app_id {
            diagnostics.push(Diagnostic::error(
                "Resource requires replacement",
                "user_id and app_id cannot be changed in place.",
            ));
            return Outcome::failed(Some(prior.clone()), diagnostics);
        }

        info!(grant = %prior.name(), "modifying app access");
        let permissions = config.permission_set();
        let grant = match self
            .reconciler
            .client()
            .modify_access(ctx, &prior.user_id, &prior.app_id, &permissions.to_token_vec())
            .await
        {
            Ok(grant) => grant,
            Err(e) => return fail(diagnostics, "Failed to update IAM permissions", e, Some(prior)),
        };

        let record = match self.record_from_grant(&grant, permissions) {
            Ok(record) => record,
            Err(e) => return fail(diagnostics, "Failed to update IAM permissions", e, Some(prior)),
        };

        self.commit(Some(prior), &record, &mut diagnostics).await;
        Outcome::applied(record, diagnostics)
    }

    async fn delete(&self, ctx: &RequestContext, prior: &GrantRecord) -> Outcome<GrantRecord> {
        let mut diagnostics = Diagnostics::new();
        info!(grant = %prior.name(), "revoking app access");

        if let Err(e) = self
            .reconciler
            .client()
            .revoke_access(ctx, &prior.user_id, &prior.app_id)
            .await
        {
            let diagnostic = if e.is_cancelled() {
                ReconcileError::from(e).to_diagnostic("Client Error")
            } else {
                Diagnostic::error(
                    "Client Error",
                    format!("Unable to delete permission, got error: {e}"),
                )
            };
            diagnostics.push(diagnostic);
            log_diagnostics("delete", &prior.name().to_string(), &diagnostics);
            return Outcome::failed(Some(prior.clone()), diagnostics);
        }

        self.reconciler
            .forget(&ResourceKey::Grant(prior.name()), &mut diagnostics)
            .await;
        Outcome::removed(diagnostics)
    }
}
