//! Golden test vectors for name parsing and permission expansion.
//!
//! Expected outputs are written out by hand from the catalog tables. A
//! failing vector means either the tables or the expansion order changed.

use playgrant_core::catalog::{app, developer};
use playgrant_core::{
    AppScope, Catalog, DeveloperScope, GrantName, PermissionSet, Scope, ScopeKind, UserName,
};
use serde::Serialize;

/// Which qualified-name layout a vector exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NameKind {
    User,
    Grant,
}

/// A qualified name and the identifiers it should parse into.
#[derive(Debug, Clone, Serialize)]
pub struct NameVector {
    pub name: &'static str,
    pub kind: NameKind,
    pub input: &'static str,
    /// `[developer_id, email]` or `[developer_id, email, app_id]`;
    /// `None` when parsing must fail.
    pub expected: Option<&'static [&'static str]>,
}

/// An explicit permission set and its expected closure.
#[derive(Debug, Clone, Serialize)]
pub struct ExpansionVector {
    pub name: &'static str,
    pub scope: ScopeKind,
    pub explicit: &'static [&'static str],
    /// Closure in output order.
    pub expected: &'static [&'static str],
    /// Number of implicit-grant warnings.
    pub implicit: usize,
}

pub fn name_vectors() -> Vec<NameVector> {
    vec![
        NameVector {
            name: "user_valid",
            kind: NameKind::User,
            input: "developers/5166846112789481453/users/dev@example.com",
            expected: Some(&["5166846112789481453", "dev@example.com"]),
        },
        NameVector {
            name: "grant_valid",
            kind: NameKind::Grant,
            input: "developers/5166846112789481453/users/dev@example.com/grants/com.example.app",
            expected: Some(&["5166846112789481453", "dev@example.com", "com.example.app"]),
        },
        NameVector {
            name: "grant_as_user",
            kind: NameKind::User,
            input: "developers/1/users/dev@example.com/grants/com.example.app",
            expected: None,
        },
        NameVector {
            name: "user_as_grant",
            kind: NameKind::Grant,
            input: "developers/1/users/dev@example.com",
            expected: None,
        },
        NameVector {
            name: "wrong_literal",
            kind: NameKind::Grant,
            input: "developer/1/users/dev@example.com/grants/com.example.app",
            expected: None,
        },
        NameVector {
            name: "swapped_literals",
            kind: NameKind::Grant,
            input: "developers/1/grants/com.example.app/users/dev@example.com",
            expected: None,
        },
        NameVector {
            name: "empty_email",
            kind: NameKind::Grant,
            input: "developers/1/users//grants/com.example.app",
            expected: None,
        },
        NameVector {
            name: "trailing_slash",
            kind: NameKind::User,
            input: "developers/1/users/dev@example.com/",
            expected: None,
        },
        NameVector {
            name: "empty",
            kind: NameKind::User,
            input: "",
            expected: None,
        },
    ]
}

pub fn expansion_vectors() -> Vec<ExpansionVector> {
    vec![
        ExpansionVector {
            name: "empty",
            scope: ScopeKind::App,
            explicit: &[],
            expected: &[],
            implicit: 0,
        },
        ExpansionVector {
            name: "reply_to_reviews",
            scope: ScopeKind::App,
            explicit: &[app::CAN_REPLY_TO_REVIEWS],
            expected: &[
                app::CAN_REPLY_TO_REVIEWS,
                app::CAN_VIEW_NON_FINANCIAL_DATA,
                app::CAN_VIEW_APP_QUALITY,
            ],
            implicit: 2,
        },
        ExpansionVector {
            name: "manage_orders",
            scope: ScopeKind::App,
            explicit: &[app::CAN_MANAGE_ORDERS],
            expected: &[
                app::CAN_MANAGE_ORDERS,
                app::CAN_VIEW_FINANCIAL_DATA,
                app::CAN_VIEW_NON_FINANCIAL_DATA,
                app::CAN_VIEW_APP_QUALITY,
            ],
            implicit: 3,
        },
        ExpansionVector {
            name: "manage_permissions",
            scope: ScopeKind::App,
            explicit: &[app::CAN_MANAGE_PERMISSIONS],
            expected: &[
                app::CAN_MANAGE_PERMISSIONS,
                app::CAN_VIEW_FINANCIAL_DATA,
                app::CAN_MANAGE_PUBLIC_APKS,
                app::CAN_MANAGE_PUBLIC_LISTING,
                app::CAN_MANAGE_ORDERS,
                app::CAN_REPLY_TO_REVIEWS,
                app::CAN_MANAGE_APP_CONTENT,
                app::CAN_MANAGE_DEEPLINKS,
                app::CAN_VIEW_NON_FINANCIAL_DATA,
                app::CAN_MANAGE_TRACK_APKS,
                app::CAN_VIEW_APP_QUALITY,
                app::CAN_MANAGE_TRACK_USERS,
            ],
            implicit: 11,
        },
        ExpansionVector {
            name: "shared_descendant",
            scope: ScopeKind::App,
            explicit: &[app::CAN_REPLY_TO_REVIEWS, app::CAN_VIEW_FINANCIAL_DATA],
            expected: &[
                app::CAN_REPLY_TO_REVIEWS,
                app::CAN_VIEW_FINANCIAL_DATA,
                app::CAN_VIEW_NON_FINANCIAL_DATA,
                app::CAN_VIEW_APP_QUALITY,
            ],
            implicit: 2,
        },
        ExpansionVector {
            name: "already_closed",
            scope: ScopeKind::App,
            explicit: &[app::CAN_VIEW_NON_FINANCIAL_DATA, app::CAN_VIEW_APP_QUALITY],
            expected: &[app::CAN_VIEW_NON_FINANCIAL_DATA, app::CAN_VIEW_APP_QUALITY],
            implicit: 0,
        },
        ExpansionVector {
            name: "duplicate_input",
            scope: ScopeKind::App,
            explicit: &[app::CAN_REPLY_TO_REVIEWS, app::CAN_REPLY_TO_REVIEWS],
            expected: &[
                app::CAN_REPLY_TO_REVIEWS,
                app::CAN_VIEW_NON_FINANCIAL_DATA,
                app::CAN_VIEW_APP_QUALITY,
            ],
            implicit: 2,
        },
        ExpansionVector {
            name: "unknown_token",
            scope: ScopeKind::App,
            explicit: &["CAN_DO_ANYTHING"],
            expected: &["CAN_DO_ANYTHING"],
            implicit: 0,
        },
        ExpansionVector {
            name: "publish_games_global",
            scope: ScopeKind::Developer,
            explicit: &[developer::CAN_PUBLISH_GAMES_GLOBAL],
            expected: &[
                developer::CAN_PUBLISH_GAMES_GLOBAL,
                developer::CAN_EDIT_GAMES_GLOBAL,
                developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL,
                developer::CAN_VIEW_APP_QUALITY_GLOBAL,
            ],
            implicit: 3,
        },
        ExpansionVector {
            name: "app_token_in_developer_scope",
            scope: ScopeKind::Developer,
            explicit: &[app::CAN_REPLY_TO_REVIEWS],
            expected: &[app::CAN_REPLY_TO_REVIEWS],
            implicit: 0,
        },
    ]
}

/// Parse a name vector's input; `Ok` holds the identifiers in order.
pub fn parse_vector(vector: &NameVector) -> Result<Vec<String>, String> {
    match vector.kind {
        NameKind::User => UserName::parse(vector.input)
            .map(|n| vec![n.developer_id, n.email])
            .map_err(|e| e.to_string()),
        NameKind::Grant => GrantName::parse(vector.input)
            .map(|n| vec![n.developer_id, n.email, n.app_id])
            .map_err(|e| e.to_string()),
    }
}

/// Expand a vector's explicit set over the Play Console catalog.
///
/// Returns the closure tokens and the number of implicit grants.
pub fn expand_vector(catalog: &Catalog, vector: &ExpansionVector) -> (Vec<String>, usize) {
    match vector.scope {
        ScopeKind::App => expand_in::<AppScope>(catalog, vector.explicit),
        ScopeKind::Developer => expand_in::<DeveloperScope>(catalog, vector.explicit),
    }
}

fn expand_in<S: Scope>(catalog: &Catalog, explicit: &[&str]) -> (Vec<String>, usize) {
    let explicit: PermissionSet<S> = PermissionSet::from_tokens(explicit.iter().copied());
    let expansion = catalog.expand_traced(&explicit);
    (expansion.permissions.to_token_vec(), expansion.implicit.len())
}

/// Check every vector against the current implementation.
///
/// Returns `(vector name, matches, observed output)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let catalog = Catalog::play_console();

    let names = name_vectors().into_iter().map(|v| {
        let parsed = parse_vector(&v);
        let matches = match (&parsed, v.expected) {
            (Ok(ids), Some(expected)) => ids.iter().map(String::as_str).eq(expected.iter().copied()),
            (Err(_), None) => true,
            _ => false,
        };
        (format!("name/{}", v.name), matches, format!("{parsed:?}"))
    });

    let expansions = expansion_vectors().into_iter().map(|v| {
        let (tokens, implicit) = expand_vector(&catalog, &v);
        let matches = tokens.iter().map(String::as_str).eq(v.expected.iter().copied())
            && implicit == v.implicit;
        (
            format!("expand/{}", v.name),
            matches,
            format!("{tokens:?} ({implicit} implicit)"),
        )
    });

    names.chain(expansions).collect()
}

/// All vectors as pretty-printed JSON, for sharing with other tooling.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serde_json::json!({
        "names": name_vectors(),
        "expansions": expansion_vectors(),
    }))
}
