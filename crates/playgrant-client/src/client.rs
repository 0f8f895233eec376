//! Typed grant operations.

use async_trait::async_trait;
use playgrant_core::name::{users_path, UserName};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::context::RequestContext;
use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, ApiResponse, AuthorizedClient};
use crate::wire::{Grant, ListUsersResponse, User};

/// Page size used when listing users.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const UPDATE_MASK: &str = "updateMask";

/// Remote user and grant operations of one developer account.
///
/// Every call takes a [`RequestContext`]; a cancelled context yields
/// [`ClientError::Cancelled`]. Any non-success response is
/// [`ClientError::Api`]. Nothing is retried.
#[async_trait]
pub trait GrantClient: Send + Sync {
    /// The developer account this client operates on.
    fn developer_id(&self) -> &str;

    /// Every user of the account, with embedded grants.
    async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<User>>;

    async fn create_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        global_permissions: &[String],
    ) -> Result<User>;

    /// Replace the user's developer-level permissions.
    async fn update_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        global_permissions: &[String],
    ) -> Result<User>;

    async fn delete_user(&self, ctx: &RequestContext, email: &str) -> Result<()>;

    async fn grant_access(
        &self,
        ctx: &RequestContext,
        email: &str,
        app_id: &str,
        permissions: &[String],
    ) -> Result<Grant>;

    /// Replace the app-level permissions of an existing grant.
    async fn modify_access(
        &self,
        ctx: &RequestContext,
        email: &str,
        app_id: &str,
        permissions: &[String],
    ) -> Result<Grant>;

    async fn revoke_access(&self, ctx: &RequestContext, email: &str, app_id: &str) -> Result<()>;
}

/// [`GrantClient`] that speaks the REST API through an [`AuthorizedClient`].
#[derive(Debug, Clone)]
pub struct ConsoleClient<A: AuthorizedClient> {
    transport: A,
    developer_id: String,
    page_size: u32,
}

impl<A: AuthorizedClient> ConsoleClient<A> {
    pub fn new(transport: A, developer_id: impl Into<String>) -> Self {
        Self {
            transport,
            developer_id: developer_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the page size used by `list_users`. Zero keeps the default.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }

    pub fn transport(&self) -> &A {
        &self.transport
    }

    fn user_path(&self, email: &str) -> String {
        UserName::new(&*self.developer_id, email).to_string()
    }

    fn grant_path(&self, email: &str, app_id: &str) -> String {
        UserName::new(&*self.developer_id, email)
            .grant(app_id)
            .to_string()
    }

    async fn send(&self, ctx: &RequestContext, request: ApiRequest) -> Result<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        let result = ctx.run(self.transport.issue(request)).await;

        match result.and_then(|response| response.error_for_status()) {
            Ok(response) => Ok(response),
            Err(e) => {
                debug!(%method, %path, error = %e, "remote call failed");
                Err(e)
            }
        }
    }

    async fn call<T: DeserializeOwned>(&self, ctx: &RequestContext, request: ApiRequest) -> Result<T> {
        self.send(ctx, request).await?.json()
    }
}

fn body<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl<A: AuthorizedClient> GrantClient for ConsoleClient<A> {
    fn developer_id(&self) -> &str {
        &self.developer_id
    }

    async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<User>> {
        let mut users = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut request = ApiRequest::get(users_path(&self.developer_id))
                .query("pageSize", self.page_size.to_string());
            if let Some(token) = page_token.take() {
                request = request.query("pageToken", token);
            }

            let page: ListUsersResponse = self.call(ctx, request).await?;
            pages += 1;
            users.extend(page.users);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(
            developer_id = %self.developer_id,
            users = users.len(),
            pages,
            "listed users"
        );
        Ok(users)
    }

    async fn create_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        global_permissions: &[String],
    ) -> Result<User> {
        let request = ApiRequest::post(
            users_path(&self.developer_id),
            body(&User::request(email, global_permissions))?,
        );
        self.call(ctx, request).await
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        email: &str,
        global_permissions: &[String],
    ) -> Result<User> {
        let request = ApiRequest::patch(
            self.user_path(email),
            body(&User::request(email, global_permissions))?,
        )
        .query(UPDATE_MASK, "developerAccountPermissions");
        self.call(ctx, request).await
    }

    async fn delete_user(&self, ctx: &RequestContext, email: &str) -> Result<()> {
        self.send(ctx, ApiRequest::delete(self.user_path(email)))
            .await
            .map(|_| ())
    }

    async fn grant_access(
        &self,
        ctx: &RequestContext,
        email: &str,
        app_id: &str,
        permissions: &[String],
    ) -> Result<Grant> {
        let grants_path = UserName::new(&*self.developer_id, email).grants_path();
        let request = ApiRequest::post(grants_path, body(&Grant::request(app_id, permissions))?);
        self.call(ctx, request).await
    }

    async fn modify_access(
        &self,
        ctx: &RequestContext,
        email: &str,
        app_id: &str,
        permissions: &[String],
    ) -> Result<Grant> {
        let request = ApiRequest::patch(
            self.grant_path(email, app_id),
            body(&Grant::request(app_id, permissions))?,
        )
        .query(UPDATE_MASK, "appLevelPermissions");
        self.call(ctx, request).await
    }

    async fn revoke_access(&self, ctx: &RequestContext, email: &str, app_id: &str) -> Result<()> {
        self.send(ctx, ApiRequest::delete(self.grant_path(email, app_id)))
            .await
            .map(|_| ())
    }
}
