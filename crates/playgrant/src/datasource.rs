//! Read-only views of the developer account's users.

use std::sync::Arc;

use playgrant_client::{GrantClient, RequestContext, User};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::error::ReconcileError;
use crate::plan::same_email;
use crate::resource::Outcome;

/// Name and email of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Looks up one user by email.
pub struct UserDataSource<C: GrantClient> {
    client: Arc<C>,
}

impl<C: GrantClient> UserDataSource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn read(&self, ctx: &RequestContext, email: &str) -> Outcome<UserSummary> {
        let mut diagnostics = Diagnostics::new();
        if email.is_empty() {
            let missing = ReconcileError::MissingAttribute {
                attribute: "email",
                purpose: "fetch user information",
            };
            diagnostics.push(missing.to_diagnostic(""));
            return Outcome::failed(None, diagnostics);
        }

        let users = match self.client.list_users(ctx).await {
            Ok(users) => users,
            Err(e) => {
                diagnostics.push(ReconcileError::from(e).to_diagnostic("Failed to fetch users"));
                return Outcome::failed(None, diagnostics);
            }
        };

        match users.iter().find(|u| same_email(&u.email, email)) {
            Some(user) => Outcome::applied(UserSummary::from(user), diagnostics),
            None => {
                debug!(email, "user not found");
                diagnostics.add_error(
                    "User not found",
                    format!(
                        "No user with email '{email}' in developer account {}.",
                        self.client.developer_id()
                    ),
                );
                Outcome::failed(None, diagnostics)
            }
        }
    }
}

/// Lists every user of the developer account.
pub struct UsersDataSource<C: GrantClient> {
    client: Arc<C>,
}

impl<C: GrantClient> UsersDataSource<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn read(&self, ctx: &RequestContext) -> Outcome<Vec<UserSummary>> {
        let mut diagnostics = Diagnostics::new();
        match self.client.list_users(ctx).await {
            Ok(users) => Outcome::applied(users.iter().map(UserSummary::from).collect(), diagnostics),
            Err(e) => {
                diagnostics.push(ReconcileError::from(e).to_diagnostic("Failed to fetch users"));
                Outcome::failed(None, diagnostics)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playgrant_client::{ClientError, ConsoleOp, MemoryConsole};

    async fn console() -> Arc<MemoryConsole> {
        let console = MemoryConsole::new("D");
        for email in ["a@x.io", "b@x.io"] {
            console
                .upsert_user(User {
                    email: email.into(),
                    ..User::default()
                })
                .await;
        }
        Arc::new(console)
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let source = UserDataSource::new(console().await);
        let outcome = source.read(&RequestContext::new(), "B@x.io").await;
        assert_eq!(
            outcome.state,
            Some(UserSummary {
                name: "developers/D/users/b@x.io".into(),
                email: "b@x.io".into(),
            })
        );
        assert!(outcome.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_does_not_call_api() {
        let console = console().await;
        let source = UserDataSource::new(Arc::clone(&console));
        let outcome = source.read(&RequestContext::new(), "").await;

        assert!(outcome.state.is_none());
        assert_eq!(
            outcome.diagnostics.iter().next().unwrap().summary,
            "Missing required attribute"
        );
        assert!(console.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let source = UserDataSource::new(console().await);
        let outcome = source.read(&RequestContext::new(), "nobody@x.io").await;
        assert!(outcome.state.is_none());
        assert_eq!(outcome.diagnostics.errors().next().unwrap().summary, "User not found");
    }

    #[tokio::test]
    async fn test_list_all_users() {
        let source = UsersDataSource::new(console().await);
        let outcome = source.read(&RequestContext::new()).await;
        let emails: Vec<_> = outcome
            .state
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["a@x.io", "b@x.io"]);
    }

    #[tokio::test]
    async fn test_list_failure_reported() {
        let console = console().await;
        console
            .fail_next(ConsoleOp::ListUsers, ClientError::api(500, "internal"))
            .await;
        let outcome = UsersDataSource::new(console).read(&RequestContext::new()).await;
        assert!(outcome.state.is_none());
        assert_eq!(
            outcome.diagnostics.errors().next().unwrap().summary,
            "Failed to fetch users"
        );
    }
}
