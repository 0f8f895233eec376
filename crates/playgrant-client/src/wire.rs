//! JSON shapes of the Play Developer API user and grant resources.

use serde::{Deserialize, Serialize};

/// A user in a developer account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Qualified name `developers/{d}/users/{email}`. Set by the server.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_state: Option<String>,
    /// Always serialized, so an empty list clears permissions on update.
    #[serde(default)]
    pub developer_account_permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grants: Vec<Grant>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

impl User {
    /// Request body for creating or updating a user.
    pub fn request(email: &str, permissions: &[String]) -> Self {
        Self {
            email: email.to_owned(),
            developer_account_permissions: permissions.to_vec(),
            ..Self::default()
        }
    }

    /// The user's grant on `app_id`, matched by package name.
    pub fn grant_for(&self, app_id: &str) -> Option<&Grant> {
        self.grants.iter().find(|g| g.package_name == app_id)
    }
}

/// App-level permissions of one user on one app.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Qualified name `developers/{d}/users/{email}/grants/{app}`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub app_level_permissions: Vec<String>,
}

impl Grant {
    /// Request body for creating or modifying a grant.
    pub fn request(app_id: &str, permissions: &[String]) -> Self {
        Self {
            name: String::new(),
            package_name: app_id.to_owned(),
            app_level_permissions: permissions.to_vec(),
        }
    }
}

/// One page of `users.list`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// `{"error": {...}}` body of a failed call.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub(crate) struct ErrorStatus {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}
