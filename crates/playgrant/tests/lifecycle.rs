//! End-to-end lifecycle scenarios against the in-memory console.
//!
//! Each test drives the reconciler through create/read/update/delete and
//! checks three things: the calls the console received, the persisted
//! state, and the diagnostics handed back.

use std::time::Duration;

use async_trait::async_trait;
use playgrant::{
    AppIamResource, GrantConfig, PlanAction, Reconciler, Resource, Severity, UserConfig,
    UserResource,
};
use playgrant_client::{ClientError, ConsoleCall, ConsoleOp, MemoryConsole, RequestContext, User};
use playgrant_core::catalog::{app, developer};
use playgrant_core::{Fingerprint, GrantName, GrantRecord, PermissionSet, UserName, UserRecord};
use playgrant_state::{
    MemoryStateStore, PutResult, ResourceKey, StateError, StateStore, StoredRecord,
};

const DEV: &str = "5166846112789481453";
const EMAIL: &str = "dev@example.com";
const APP: &str = "com.example.app";

type TestReconciler = Reconciler<MemoryConsole, MemoryStateStore>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn reconciler_with_user() -> TestReconciler {
    init_tracing();
    let console = MemoryConsole::new(DEV);
    console
        .upsert_user(User {
            email: EMAIL.into(),
            ..User::default()
        })
        .await;
    Reconciler::new(console, MemoryStateStore::new())
}

fn grants(reconciler: &TestReconciler) -> AppIamResource<MemoryConsole, MemoryStateStore> {
    reconciler.app_iam()
}

fn users(reconciler: &TestReconciler) -> UserResource<MemoryConsole, MemoryStateStore> {
    reconciler.users()
}

fn tokens(set: &PermissionSet<impl playgrant_core::Scope>) -> Vec<&str> {
    set.tokens()
}

fn grant_key() -> ResourceKey {
    GrantName::new(DEV, EMAIL, APP).into()
}

fn cancelled() -> RequestContext {
    let ctx = RequestContext::new();
    ctx.cancel();
    ctx
}

/// Memory store whose reads fail.
#[derive(Default)]
struct UnreadableStore {
    inner: MemoryStateStore,
}

#[async_trait]
impl StateStore for UnreadableStore {
    async fn get(&self, _key: &ResourceKey) -> playgrant_state::Result<Option<StoredRecord>> {
        Err(StateError::Serialization("disk unavailable".into()))
    }

    async fn fingerprint(&self, key: &ResourceKey) -> playgrant_state::Result<Option<Fingerprint>> {
        self.inner.fingerprint(key).await
    }

    async fn put(&self, record: StoredRecord) -> playgrant_state::Result<PutResult> {
        self.inner.put(record).await
    }

    async fn remove(&self, key: &ResourceKey) -> playgrant_state::Result<Option<StoredRecord>> {
        self.inner.remove(key).await
    }

    async fn keys(&self) -> playgrant_state::Result<Vec<ResourceKey>> {
        self.inner.keys().await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App grants
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_explicit_only_grant() {
    let reconciler = reconciler_with_user().await;
    let config = GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]);

    let outcome = grants(&reconciler).create(&RequestContext::new(), &config).await;

    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let record = outcome.state.unwrap();
    assert_eq!(record.developer_id, DEV);
    assert_eq!(tokens(&record.expanded_permissions), vec![app::CAN_VIEW_APP_QUALITY]);

    let stored = reconciler.store().get_grant(&record.name()).await.unwrap();
    assert_eq!(stored, Some(record));
}

#[tokio::test]
async fn test_create_implicit_grant_warns_and_expands() {
    let reconciler = reconciler_with_user().await;
    let config = GrantConfig::new(EMAIL, APP, [app::CAN_REPLY_TO_REVIEWS]);

    let outcome = grants(&reconciler).create(&RequestContext::new(), &config).await;

    assert!(!outcome.has_error());
    let warnings: Vec<_> = outcome.diagnostics.warnings().collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| w.severity == Severity::Warning));

    let record = outcome.state.unwrap();
    assert_eq!(tokens(&record.permissions), vec![app::CAN_REPLY_TO_REVIEWS]);
    assert_eq!(
        tokens(&record.expanded_permissions),
        vec![
            app::CAN_REPLY_TO_REVIEWS,
            app::CAN_VIEW_NON_FINANCIAL_DATA,
            app::CAN_VIEW_APP_QUALITY,
        ]
    );

    // Only the explicit set goes over the wire.
    assert!(reconciler
        .client()
        .calls()
        .await
        .contains(&ConsoleCall::GrantAccess {
            email: EMAIL.into(),
            app_id: APP.into(),
            permissions: vec![app::CAN_REPLY_TO_REVIEWS.into()],
        }));
}

#[tokio::test]
async fn test_empty_permissions_block_create() {
    let reconciler = reconciler_with_user().await;
    let config = GrantConfig::new(EMAIL, APP, Vec::<String>::new());

    let outcome = grants(&reconciler).create(&RequestContext::new(), &config).await;

    assert!(outcome.state.is_none());
    let error = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Invalid permissions configuration");
    assert_eq!(error.attribute.as_deref(), Some("permissions"));
    assert!(reconciler.client().calls().await.is_empty());
    assert!(reconciler.store().is_empty().await);
}

#[tokio::test]
async fn test_update_replaces_explicit_set() {
    let reconciler = reconciler_with_user().await;
    let ctx = RequestContext::new();
    let resource = grants(&reconciler);

    let created = resource
        .create(&ctx, &GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]))
        .await
        .state
        .unwrap();

    let desired = GrantConfig::new(EMAIL, APP, [app::CAN_MANAGE_DRAFT_APPS]);
    assert_eq!(resource.plan(Some(&created), &desired).action, PlanAction::Update);

    reconciler.client().clear_calls().await;
    let outcome = resource.update(&ctx, &created, &desired).await;
    let record = outcome.state.unwrap();

    assert_eq!(tokens(&record.permissions), vec![app::CAN_MANAGE_DRAFT_APPS]);
    assert_eq!(
        reconciler.client().calls().await,
        vec![ConsoleCall::ModifyAccess {
            email: EMAIL.into(),
            app_id: APP.into(),
            permissions: vec![app::CAN_MANAGE_DRAFT_APPS.into()],
        }]
    );
    assert_eq!(
        reconciler.store().get_grant(&record.name()).await.unwrap(),
        Some(record)
    );
}

#[tokio::test]
async fn test_apply_dispatches_on_plan() {
    let reconciler = reconciler_with_user().await;
    let ctx = RequestContext::new();
    let resource = grants(&reconciler);
    let config = GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]);

    let created = resource.apply(&ctx, None, &config).await.state.unwrap();
    reconciler.client().clear_calls().await;

    let unchanged = resource.apply(&ctx, Some(&created), &config).await;
    assert_eq!(unchanged.state, Some(created.clone()));
    assert!(reconciler.client().calls().await.is_empty());

    let moved = GrantConfig::new(EMAIL, "com.example.other", [app::CAN_VIEW_APP_QUALITY]);
    let replaced = resource.apply(&ctx, Some(&created), &moved).await;
    assert!(!replaced.has_error(), "{:?}", replaced.diagnostics);

    let ops: Vec<_> = reconciler
        .client()
        .calls()
        .await
        .iter()
        .map(ConsoleCall::op)
        .collect();
    assert_eq!(ops, vec![ConsoleOp::RevokeAccess, ConsoleOp::GrantAccess]);
    assert!(!reconciler.store().contains(&grant_key()).await.unwrap());
}

#[tokio::test]
async fn test_delete_removes_state() {
    let reconciler = reconciler_with_user().await;
    let ctx = RequestContext::new();
    let resource = grants(&reconciler);

    let created = resource
        .create(&ctx, &GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]))
        .await
        .state
        .unwrap();

    let outcome = resource.delete(&ctx, &created).await;
    assert!(outcome.state.is_none());
    assert!(outcome.diagnostics.is_empty());
    assert!(!reconciler.store().contains(&grant_key()).await.unwrap());
    assert!(reconciler.client().user(EMAIL).await.unwrap().grants.is_empty());
}

#[tokio::test]
async fn test_failed_delete_keeps_state() {
    let reconciler = reconciler_with_user().await;
    let ctx = RequestContext::new();
    let resource = grants(&reconciler);

    let created = resource
        .create(&ctx, &GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]))
        .await
        .state
        .unwrap();
    reconciler
        .client()
        .fail_next(ConsoleOp::RevokeAccess, ClientError::api(403, "denied"))
        .await;

    let outcome = resource.delete(&ctx, &created).await;
    assert_eq!(outcome.state, Some(created));
    let error = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Client Error");
    assert_eq!(
        error.detail,
        "Unable to delete permission, got error: remote API error (403): denied"
    );
    assert!(reconciler.store().contains(&grant_key()).await.unwrap());
}

#[tokio::test]
async fn test_api_error_on_update_keeps_prior_state() {
    let reconciler = reconciler_with_user().await;
    let ctx = RequestContext::new();
    let resource = grants(&reconciler);

    let created = resource
        .create(&ctx, &GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]))
        .await
        .state
        .unwrap();
    reconciler
        .client()
        .fail_next(ConsoleOp::ModifyAccess, ClientError::api(500, "backend error"))
        .await;

    let desired = GrantConfig::new(EMAIL, APP, [app::CAN_MANAGE_ORDERS]);
    let outcome = resource.update(&ctx, &created, &desired).await;

    assert_eq!(outcome.state, Some(created.clone()));
    assert_eq!(
        outcome.diagnostics.errors().next().unwrap().summary,
        "Failed to update IAM permissions"
    );
    assert_eq!(
        reconciler.store().get_grant(&created.name()).await.unwrap(),
        Some(created)
    );
}

#[tokio::test]
async fn test_server_normalises_identity() {
    let reconciler = reconciler_with_user().await;
    let config = GrantConfig::new("Dev@Example.COM", APP, [app::CAN_VIEW_APP_QUALITY]);

    let record = grants(&reconciler)
        .create(&RequestContext::new(), &config)
        .await
        .state
        .unwrap();

    assert_eq!(record.user_id, EMAIL);
    assert!(reconciler.store().contains(&grant_key()).await.unwrap());
}

#[tokio::test]
async fn test_read_detects_drift() {
    let reconciler = reconciler_with_user().await;
    let ctx = RequestContext::new();
    let resource = grants(&reconciler);

    let created = resource
        .create(&ctx, &GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]))
        .await
        .state
        .unwrap();

    let quiet = resource.read(&ctx, &created).await;
    assert!(!quiet.drifted);
    assert_eq!(quiet.state, Some(created.clone()));

    reconciler
        .client()
        .set_grant_permissions(EMAIL, APP, &[app::CAN_REPLY_TO_REVIEWS.into()])
        .await;

    let outcome = resource.read(&ctx, &created).await;
    assert!(outcome.drifted);
    let record = outcome.state.unwrap();
    assert_eq!(tokens(&record.permissions), vec![app::CAN_REPLY_TO_REVIEWS]);
    assert_eq!(record.expanded_permissions.len(), 3);
    assert_eq!(
        reconciler.store().get_grant(&record.name()).await.unwrap(),
        Some(record)
    );
}

#[tokio::test]
async fn test_read_miss_leaves_state_unchanged() {
    let reconciler = reconciler_with_user().await;
    let prior = GrantRecord {
        developer_id: DEV.into(),
        user_id: EMAIL.into(),
        app_id: "com.example.gone".into(),
        permissions: PermissionSet::from_tokens([app::CAN_VIEW_APP_QUALITY]),
        expanded_permissions: PermissionSet::from_tokens([app::CAN_VIEW_APP_QUALITY]),
    };

    let outcome = grants(&reconciler).read(&RequestContext::new(), &prior).await;

    assert_eq!(outcome.state, Some(prior));
    assert!(!outcome.drifted);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(reconciler.client().calls().await, vec![ConsoleCall::ListUsers]);
}

#[tokio::test]
async fn test_read_with_missing_identity_skips_api() {
    let reconciler = reconciler_with_user().await;
    let prior = GrantRecord {
        developer_id: DEV.into(),
        user_id: String::new(),
        app_id: APP.into(),
        permissions: PermissionSet::new(),
        expanded_permissions: PermissionSet::new(),
    };

    let outcome = grants(&reconciler).read(&RequestContext::new(), &prior).await;

    let error = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Missing required attribute");
    assert_eq!(error.detail, "Attribute 'user_id' is required to fetch user information.");
    assert!(reconciler.client().calls().await.is_empty());
}

#[tokio::test]
async fn test_malformed_server_name_is_fatal() {
    let reconciler = reconciler_with_user().await;
    let mut user = reconciler.client().user(EMAIL).await.unwrap();
    user.grants.push(playgrant_client::Grant {
        name: format!("developers/{DEV}/users/{EMAIL}"),
        package_name: APP.into(),
        app_level_permissions: vec![app::CAN_VIEW_APP_QUALITY.into()],
    });
    reconciler.client().upsert_user(user).await;

    let prior = GrantRecord {
        developer_id: DEV.into(),
        user_id: EMAIL.into(),
        app_id: APP.into(),
        permissions: PermissionSet::from_tokens([app::CAN_VIEW_APP_QUALITY]),
        expanded_permissions: PermissionSet::from_tokens([app::CAN_VIEW_APP_QUALITY]),
    };
    let outcome = grants(&reconciler).read(&RequestContext::new(), &prior).await;

    assert_eq!(outcome.state, Some(prior));
    let error = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Invalid resource name");
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_is_not_an_api_error() {
    let console = MemoryConsole::new(DEV).with_latency(Duration::from_secs(10));
    console
        .upsert_user(User {
            email: EMAIL.into(),
            ..User::default()
        })
        .await;
    let reconciler = Reconciler::new(console, MemoryStateStore::new());

    let ctx = RequestContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        canceller.cancel();
    });

    let config = GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]);
    let outcome = grants(&reconciler).create(&ctx, &config).await;

    assert!(outcome.state.is_none());
    let error = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Operation cancelled");
    assert!(reconciler.store().is_empty().await);
}

#[tokio::test]
async fn test_reordered_grant_permissions_are_not_drift() {
    let reconciler = reconciler_with_user().await;
    let ctx = RequestContext::new();
    let resource = grants(&reconciler);

    let config = GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY, app::CAN_MANAGE_DRAFT_APPS]);
    let created = resource.create(&ctx, &config).await.state.unwrap();

    reconciler
        .client()
        .set_grant_permissions(
            EMAIL,
            APP,
            &[app::CAN_MANAGE_DRAFT_APPS.into(), app::CAN_VIEW_APP_QUALITY.into()],
        )
        .await;

    let outcome = resource.read(&ctx, &created).await;
    assert!(!outcome.drifted);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.state.unwrap().permissions, created.permissions);
}

#[tokio::test]
async fn test_cancelled_grant_steps_keep_state() {
    let reconciler = reconciler_with_user().await;
    let resource = grants(&reconciler);
    let created = resource
        .create(&RequestContext::new(), &GrantConfig::new(EMAIL, APP, [app::CAN_VIEW_APP_QUALITY]))
        .await
        .state
        .unwrap();
    reconciler.client().clear_calls().await;

    let ctx = cancelled();
    let desired = GrantConfig::new(EMAIL, APP, [app::CAN_MANAGE_ORDERS]);
    let outcomes = [
        resource.read(&ctx, &created).await,
        resource.update(&ctx, &created, &desired).await,
        resource.delete(&ctx, &created).await,
    ];

    for outcome in outcomes {
        assert_eq!(outcome.state.as_ref(), Some(&created));
        let error = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(error.summary, "Operation cancelled");
    }
    assert!(reconciler.client().calls().await.is_empty());
    assert_eq!(
        reconciler.store().get_grant(&created.name()).await.unwrap(),
        Some(created)
    );
}

#[tokio::test]
async fn test_read_does_not_commit_after_state_error() {
    let console = MemoryConsole::new(DEV);
    console
        .upsert_user(User {
            email: EMAIL.into(),
            grants: vec![playgrant_client::Grant {
                name: GrantName::new(DEV, EMAIL, APP).to_string(),
                package_name: APP.into(),
                app_level_permissions: vec![app::CAN_MANAGE_DRAFT_APPS.into()],
            }],
            ..User::default()
        })
        .await;
    let reconciler = Reconciler::new(console, UnreadableStore::default());
    let prior = GrantRecord {
        developer_id: DEV.into(),
        user_id: EMAIL.into(),
        app_id: APP.into(),
        permissions: PermissionSet::from_tokens([app::CAN_VIEW_APP_QUALITY]),
        expanded_permissions: PermissionSet::from_tokens([app::CAN_VIEW_APP_QUALITY]),
    };

    let outcome = reconciler.app_iam().read(&RequestContext::new(), &prior).await;

    assert_eq!(outcome.state, Some(prior));
    assert_eq!(
        outcome.diagnostics.errors().next().unwrap().summary,
        "Failed to persist state"
    );
    assert!(reconciler.store().inner.is_empty().await);
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_user_lifecycle() {
    let reconciler = Reconciler::new(MemoryConsole::new(DEV), MemoryStateStore::new());
    let ctx = RequestContext::new();
    let resource = users(&reconciler);

    let config = UserConfig::new("New.Person@Example.com", [developer::CAN_VIEW_APP_QUALITY_GLOBAL]);
    let created = resource.create(&ctx, &config).await;
    assert!(created.diagnostics.is_empty());
    let record = created.state.unwrap();
    assert_eq!(record.email, "new.person@example.com");
    assert_eq!(record.name, format!("developers/{DEV}/users/new.person@example.com"));

    let read = resource.read(&ctx, &record).await;
    assert!(!read.drifted);
    assert_eq!(read.state.as_ref(), Some(&record));

    let desired = UserConfig::new(&*record.email, [developer::CAN_REPLY_TO_REVIEWS_GLOBAL]);
    let updated = resource.update(&ctx, &record, &desired).await;
    assert_eq!(updated.diagnostics.warnings().count(), 2);
    let record = updated.state.unwrap();
    assert_eq!(
        tokens(&record.global_permissions),
        vec![developer::CAN_REPLY_TO_REVIEWS_GLOBAL]
    );
    assert_eq!(record.expanded_permissions.len(), 3);

    let deleted = resource.delete(&ctx, &record).await;
    assert!(deleted.state.is_none());
    let key: ResourceKey = UserName::new(DEV, "new.person@example.com").into();
    assert!(!reconciler.store().contains(&key).await.unwrap());
    assert_eq!(reconciler.client().user_count().await, 0);
}

#[tokio::test]
async fn test_user_without_permissions_is_valid() {
    let reconciler = Reconciler::new(MemoryConsole::new(DEV), MemoryStateStore::new());
    let outcome = users(&reconciler)
        .create(&RequestContext::new(), &UserConfig::new(EMAIL, Vec::<String>::new()))
        .await;

    assert!(outcome.diagnostics.is_empty());
    assert!(outcome.state.unwrap().global_permissions.is_empty());
}

#[tokio::test]
async fn test_user_create_failure() {
    let reconciler = reconciler_with_user().await;
    let outcome = users(&reconciler)
        .create(&RequestContext::new(), &UserConfig::new(EMAIL, Vec::<String>::new()))
        .await;

    assert!(outcome.state.is_none());
    let error = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(error.summary, "Failed to create user");
    assert_eq!(error.detail, "remote API error (409): User already exists");
}

#[tokio::test]
async fn test_reordered_user_permissions_are_not_drift() {
    let reconciler = Reconciler::new(MemoryConsole::new(DEV), MemoryStateStore::new());
    let ctx = RequestContext::new();
    let resource = users(&reconciler);

    let config = UserConfig::new(
        EMAIL,
        [developer::CAN_VIEW_APP_QUALITY_GLOBAL, developer::CAN_MANAGE_DRAFT_APPS_GLOBAL],
    );
    let created = resource.create(&ctx, &config).await.state.unwrap();

    let mut user = reconciler.client().user(EMAIL).await.unwrap();
    user.developer_account_permissions.reverse();
    reconciler.client().upsert_user(user).await;

    let outcome = resource.read(&ctx, &created).await;
    assert!(!outcome.drifted);
    assert_eq!(outcome.state.unwrap().global_permissions, created.global_permissions);
}

#[tokio::test]
async fn test_user_read_miss_leaves_state_unchanged() {
    let reconciler = Reconciler::new(MemoryConsole::new(DEV), MemoryStateStore::new());
    let email = "gone@example.com";
    let prior = UserRecord {
        developer_id: DEV.into(),
        email: email.into(),
        name: UserName::new(DEV, email).to_string(),
        global_permissions: PermissionSet::from_tokens([developer::CAN_VIEW_APP_QUALITY_GLOBAL]),
        expanded_permissions: PermissionSet::from_tokens([developer::CAN_VIEW_APP_QUALITY_GLOBAL]),
    };

    let outcome = users(&reconciler).read(&RequestContext::new(), &prior).await;

    assert_eq!(outcome.state, Some(prior));
    assert!(!outcome.drifted);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(reconciler.client().calls().await, vec![ConsoleCall::ListUsers]);
}

#[tokio::test]
async fn test_user_update_failure_keeps_prior_state() {
    let reconciler = Reconciler::new(MemoryConsole::new(DEV), MemoryStateStore::new());
    let ctx = RequestContext::new();
    let resource = users(&reconciler);

    let created = resource
        .create(&ctx, &UserConfig::new(EMAIL, [developer::CAN_VIEW_APP_QUALITY_GLOBAL]))
        .await
        .state
        .unwrap();
    reconciler
        .client()
        .fail_next(ConsoleOp::UpdateUser, ClientError::api(500, "backend error"))
        .await;

    let desired = UserConfig::new(EMAIL, [developer::CAN_MANAGE_ORDERS_GLOBAL]);
    let outcome = resource.update(&ctx, &created, &desired).await;

    assert_eq!(outcome.state, Some(created.clone()));
    assert_eq!(
        outcome.diagnostics.errors().next().unwrap().summary,
        "Failed to update user"
    );
    assert_eq!(
        reconciler.store().get_user(&created.user_name()).await.unwrap(),
        Some(created)
    );
}

#[tokio::test]
async fn test_cancelled_user_steps_keep_state() {
    let reconciler = Reconciler::new(MemoryConsole::new(DEV), MemoryStateStore::new());
    let resource = users(&reconciler);
    let created = resource
        .create(&RequestContext::new(), &UserConfig::new(EMAIL, [developer::CAN_VIEW_APP_QUALITY_GLOBAL]))
        .await
        .state
        .unwrap();
    reconciler.client().clear_calls().await;

    let ctx = cancelled();
    let desired = UserConfig::new(EMAIL, [developer::CAN_REPLY_TO_REVIEWS_GLOBAL]);
    let outcomes = [
        resource.read(&ctx, &created).await,
        resource.update(&ctx, &created, &desired).await,
        resource.delete(&ctx, &created).await,
    ];

    for outcome in outcomes {
        assert_eq!(outcome.state.as_ref(), Some(&created));
        let error = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(error.summary, "Operation cancelled");
    }
    assert!(reconciler.client().calls().await.is_empty());
    assert!(reconciler.client().user(EMAIL).await.is_some());
    assert_eq!(
        reconciler.store().get_user(&created.user_name()).await.unwrap(),
        Some(created)
    );
}
