//! Records persisted as resource state.

use serde::{Deserialize, Serialize};

use crate::name::{GrantName, UserName};
use crate::permission::{AppScope, DeveloperScope, PermissionSet};

/// State of an app-level grant.
///
/// Identity key: `(developer_id, user_id, app_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    pub developer_id: String,
    /// The user's email.
    pub user_id: String,
    pub app_id: String,
    /// Permissions the operator asked for.
    pub permissions: PermissionSet<AppScope>,
    /// Closure of `permissions`. Derived only.
    pub expanded_permissions: PermissionSet<AppScope>,
}

impl GrantRecord {
    /// The qualified name of this grant.
    pub fn name(&self) -> GrantName {
        GrantName::new(&*self.developer_id, &*self.user_id, &*self.app_id)
    }

    /// Overwrite the identity fields from a server-returned name.
    pub fn adopt_identity(&mut self, name: GrantName) {
        self.developer_id = name.developer_id;
        self.user_id = name.email;
        self.app_id = name.app_id;
    }
}

/// State of a user in the developer account.
///
/// Identity key: `(developer_id, email)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub developer_id: String,
    pub email: String,
    /// Server-derived qualified name. Not settable.
    pub name: String,
    pub global_permissions: PermissionSet<DeveloperScope>,
    /// Closure of `global_permissions`. Derived only.
    pub expanded_permissions: PermissionSet<DeveloperScope>,
}

impl UserRecord {
    /// The qualified name built from the identity fields.
    pub fn user_name(&self) -> UserName {
        UserName::new(&*self.developer_id, &*self.email)
    }

    /// Overwrite the identity fields from a server-returned name.
    pub fn adopt_identity(&mut self, name: UserName) {
        self.name = name.to_string();
        self.developer_id = name.developer_id;
        self.email = name.email;
    }
}
