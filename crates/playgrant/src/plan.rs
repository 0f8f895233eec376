//! Plan-time computation and the pre-apply validation gate.
//!
//! Both are pure functions of the declared permissions and the catalog.

use playgrant_core::{Catalog, PermissionSet, Scope};

use crate::diagnostics::{Diagnostic, Diagnostics};

/// Whether an empty explicit set is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPermissions {
    Allowed,
    Rejected,
}

/// Validate declared permissions.
///
/// Emits an attribute error when the set is empty and that is rejected, and
/// one "Granting implicit permission" warning per permission the closure
/// adds.
pub fn validate_permissions<S: Scope>(
    catalog: &Catalog,
    attribute: &str,
    explicit: &PermissionSet<S>,
    empty: EmptyPermissions,
) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    if explicit.is_empty() && empty == EmptyPermissions::Rejected {
        diagnostics.add_attribute_error(
            attribute,
            "Invalid permissions configuration",
            format!("{attribute} must contain at least one permission."),
        );
    }

    diagnostics.extend(
        catalog
            .expand_traced(explicit)
            .implicit
            .iter()
            .map(Diagnostic::implicit_grant),
    );
    diagnostics
}

/// Computed value of an `expanded_permissions` attribute.
pub fn expanded_permissions<S: Scope>(
    catalog: &Catalog,
    explicit: &PermissionSet<S>,
) -> PermissionSet<S> {
    catalog.expand(explicit)
}

/// What applying a desired configuration will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    /// No prior state.
    Create,
    /// Permissions differ; identity is the same.
    Update,
    /// An identity attribute changed. Delete then create.
    Replace,
    /// Nothing to do.
    NoOp,
}

/// Result of planning one resource.
#[derive(Debug, Clone)]
pub struct Plan<T> {
    pub action: PlanAction,
    /// The record expected after apply, with computed fields filled.
    pub planned: T,
    pub diagnostics: Diagnostics,
}

impl<T> Plan<T> {
    /// Whether the plan may be applied.
    pub fn is_applicable(&self) -> bool {
        !self.diagnostics.has_error()
    }
}

/// Compare identity attributes. Emails are compared case-insensitively,
/// since the server normalises them.
pub(crate) fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playgrant_core::catalog::{app, developer};
    use playgrant_core::{AppScope, DeveloperScope};
    use proptest::prelude::*;

    fn app_set(tokens: &[&str]) -> PermissionSet<AppScope> {
        PermissionSet::from_tokens(tokens.iter().copied())
    }

    #[test]
    fn test_explicit_only_has_no_warnings() {
        let catalog = Catalog::play_console();
        let diags = validate_permissions(
            &catalog,
            "permissions",
            &app_set(&[app::CAN_VIEW_APP_QUALITY]),
            EmptyPermissions::Rejected,
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_implicit_grant_warnings() {
        let catalog = Catalog::play_console();
        let diags = validate_permissions(
            &catalog,
            "permissions",
            &app_set(&[app::CAN_REPLY_TO_REVIEWS]),
            EmptyPermissions::Rejected,
        );

        assert!(!diags.has_error());
        let details: Vec<_> = diags.warnings().map(|d| d.detail.as_str()).collect();
        assert_eq!(
            details,
            vec![
                "The permission 'CAN_VIEW_NON_FINANCIAL_DATA' is inherited from 'CAN_REPLY_TO_REVIEWS', but it is not explicitly granted.",
                "The permission 'CAN_VIEW_APP_QUALITY' is inherited from 'CAN_REPLY_TO_REVIEWS', but it is not explicitly granted.",
            ]
        );
        assert!(diags
            .iter()
            .all(|d| d.summary == "Granting implicit permission"));
    }

    #[test]
    fn test_fully_declared_closure_has_no_warnings() {
        let catalog = Catalog::play_console();
        let explicit = app_set(&[
            app::CAN_REPLY_TO_REVIEWS,
            app::CAN_VIEW_NON_FINANCIAL_DATA,
            app::CAN_VIEW_APP_QUALITY,
        ]);
        let diags =
            validate_permissions(&catalog, "permissions", &explicit, EmptyPermissions::Rejected);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_empty_set_rejected_or_allowed() {
        let catalog = Catalog::play_console();
        let empty = PermissionSet::<DeveloperScope>::new();

        let rejected =
            validate_permissions(&catalog, "global_permissions", &empty, EmptyPermissions::Rejected);
        let error = rejected.errors().next().unwrap();
        assert_eq!(error.summary, "Invalid permissions configuration");
        assert_eq!(error.attribute.as_deref(), Some("global_permissions"));

        let allowed =
            validate_permissions(&catalog, "global_permissions", &empty, EmptyPermissions::Allowed);
        assert!(allowed.is_empty());
    }

    #[test]
    fn test_expanded_permissions_developer_scope() {
        let catalog = Catalog::play_console();
        let explicit: PermissionSet<DeveloperScope> =
            PermissionSet::from_tokens([developer::CAN_REPLY_TO_REVIEWS_GLOBAL]);
        let expanded = expanded_permissions(&catalog, &explicit);
        assert!(expanded.contains_token(developer::CAN_VIEW_APP_QUALITY_GLOBAL));
        assert!(expanded.is_superset(&explicit));
    }

    #[test]
    fn test_same_email_ignores_case() {
        assert!(same_email("User@Example.com", "user@example.com"));
        assert!(!same_email("a@x.io", "b@x.io"));
    }

    proptest! {
        #[test]
        fn prop_one_warning_per_added_permission(
            picks in proptest::collection::vec(0usize..64, 0..6)
        ) {
            let catalog = Catalog::play_console();
            let universe = catalog.graph::<AppScope>().universe();
            let tokens: Vec<&str> = universe.tokens();
            let explicit: PermissionSet<AppScope> =
                PermissionSet::from_tokens(picks.iter().map(|i| tokens[i % tokens.len()]));

            let diags = validate_permissions(&catalog, "permissions", &explicit, EmptyPermissions::Allowed);
            let expanded = expanded_permissions(&catalog, &explicit);
            prop_assert_eq!(diags.len(), expanded.len() - explicit.len());
        }
    }
}
