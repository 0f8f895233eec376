//! Qualified names: the server-canonical identity of users and grants.
//!
//! ```text
//! developers/{developerID}/users/{email}                   user
//! developers/{developerID}/users/{email}/grants/{appID}    grant
//! ```
//!
//! Parsing is positional. Segments 1, 3 and 5 must be the literals
//! `developers`, `users` and `grants`; segments 2, 4 and 6 are the
//! developer id, email and app id. Anything else is a hard failure: the
//! caller must surface it, never default the identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

pub const DEVELOPERS: &str = "developers";
pub const USERS: &str = "users";
pub const GRANTS: &str = "grants";

const USER_SEGMENTS: usize = 4;
const GRANT_SEGMENTS: usize = 6;

/// Path of a developer account: `developers/{developerID}`.
pub fn developer_path(developer_id: &str) -> String {
    format!("{DEVELOPERS}/{developer_id}")
}

/// Path of the user collection: `developers/{developerID}/users`.
pub fn users_path(developer_id: &str) -> String {
    format!("{DEVELOPERS}/{developer_id}/{USERS}")
}

/// Identity of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct UserName {
    pub developer_id: String,
    pub email: String,
}

/// Identity of an app-level grant record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct GrantName {
    pub developer_id: String,
    pub email: String,
    pub app_id: String,
}

impl UserName {
    pub fn new(developer_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            developer_id: developer_id.into(),
            email: email.into(),
        }
    }

    /// Parse `developers/{developerID}/users/{email}`.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let segments = split_checked(name, USER_SEGMENTS)?;
        Ok(Self {
            developer_id: segments[1].to_owned(),
            email: segments[3].to_owned(),
        })
    }

    /// The grant of this user on `app_id`.
    pub fn grant(&self, app_id: impl Into<String>) -> GrantName {
        GrantName {
            developer_id: self.developer_id.clone(),
            email: self.email.clone(),
            app_id: app_id.into(),
        }
    }

    /// Path of this user's grant collection.
    pub fn grants_path(&self) -> String {
        format!("{self}/{GRANTS}")
    }
}

impl GrantName {
    pub fn new(
        developer_id: impl Into<String>,
        email: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            developer_id: developer_id.into(),
            email: email.into(),
            app_id: app_id.into(),
        }
    }

    /// Parse `developers/{developerID}/users/{email}/grants/{appID}`.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let segments = split_checked(name, GRANT_SEGMENTS)?;
        Ok(Self {
            developer_id: segments[1].to_owned(),
            email: segments[3].to_owned(),
            app_id: segments[5].to_owned(),
        })
    }

    /// The user this grant belongs to.
    pub fn user(&self) -> UserName {
        UserName::new(self.developer_id.clone(), self.email.clone())
    }
}

/// Parse a grant qualified name.
pub fn parse_grant_name(name: &str) -> Result<GrantName, NameError> {
    GrantName::parse(name)
}

/// Parse a user qualified name.
pub fn parse_user_name(name: &str) -> Result<UserName, NameError> {
    UserName::parse(name)
}

/// Split on `/` and check count, literals and non-empty identifiers.
fn split_checked(name: &str, expected: usize) -> Result<Vec<&str>, NameError> {
    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() != expected {
        return Err(NameError::SegmentCount {
            name: name.to_owned(),
            expected,
            found: segments.len(),
        });
    }

    const LAYOUT: [(&str, &str); 3] = [
        (DEVELOPERS, "developer id"),
        (USERS, "email"),
        (GRANTS, "app id"),
    ];

    for (i, (pair, (literal, field))) in segments.chunks(2).zip(LAYOUT).enumerate() {
        let position = 2 * i + 1;
        if pair[0] != literal {
            return Err(NameError::UnexpectedLiteral {
                name: name.to_owned(),
                position,
                expected: literal,
                found: pair[0].to_owned(),
            });
        }
        if pair[1].is_empty() {
            return Err(NameError::EmptySegment {
                name: name.to_owned(),
                field,
            });
        }
    }

    Ok(segments)
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DEVELOPERS}/{}/{USERS}/{}", self.developer_id, self.email)
    }
}

impl fmt::Display for GrantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{DEVELOPERS}/{}/{USERS}/{}/{GRANTS}/{}",
            self.developer_id, self.email, self.app_id
        )
    }
}

impl FromStr for UserName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for GrantName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.to_string()
    }
}

impl From<GrantName> for String {
    fn from(name: GrantName) -> Self {
        name.to_string()
    }
}

impl TryFrom<String> for UserName {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl TryFrom<String> for GrantName {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}
