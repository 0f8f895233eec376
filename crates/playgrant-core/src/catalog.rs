//! The permission implication catalog.
//!
//! Holding some permissions in the Play Console confers others: replying to
//! reviews requires seeing non-financial data, which in turn requires seeing
//! app quality. The catalog records those edges as one directed graph per
//! scope. It is built once and only ever read, so a shared reference can be
//! handed to any number of concurrent reconciliations.

use std::collections::HashMap;

use crate::expand::{expand, expand_traced, Expansion};
use crate::permission::{AppScope, DeveloperScope, Permission, PermissionSet, Scope};

/// App-level permission tokens.
pub mod app {
    pub const CAN_ACCESS_APP: &str = "CAN_ACCESS_APP";
    pub const CAN_VIEW_FINANCIAL_DATA: &str = "CAN_VIEW_FINANCIAL_DATA";
    pub const CAN_MANAGE_PERMISSIONS: &str = "CAN_MANAGE_PERMISSIONS";
    pub const CAN_REPLY_TO_REVIEWS: &str = "CAN_REPLY_TO_REVIEWS";
    pub const CAN_MANAGE_PUBLIC_APKS: &str = "CAN_MANAGE_PUBLIC_APKS";
    pub const CAN_MANAGE_TRACK_APKS: &str = "CAN_MANAGE_TRACK_APKS";
    pub const CAN_MANAGE_TRACK_USERS: &str = "CAN_MANAGE_TRACK_USERS";
    pub const CAN_MANAGE_PUBLIC_LISTING: &str = "CAN_MANAGE_PUBLIC_LISTING";
    pub const CAN_MANAGE_DRAFT_APPS: &str = "CAN_MANAGE_DRAFT_APPS";
    pub const CAN_MANAGE_ORDERS: &str = "CAN_MANAGE_ORDERS";
    pub const CAN_MANAGE_APP_CONTENT: &str = "CAN_MANAGE_APP_CONTENT";
    pub const CAN_VIEW_NON_FINANCIAL_DATA: &str = "CAN_VIEW_NON_FINANCIAL_DATA";
    pub const CAN_VIEW_APP_QUALITY: &str = "CAN_VIEW_APP_QUALITY";
    pub const CAN_MANAGE_DEEPLINKS: &str = "CAN_MANAGE_DEEPLINKS";
}

/// Developer-level permission tokens.
pub mod developer {
    pub const CAN_SEE_ALL_APPS: &str = "CAN_SEE_ALL_APPS";
    pub const CAN_VIEW_FINANCIAL_DATA_GLOBAL: &str = "CAN_VIEW_FINANCIAL_DATA_GLOBAL";
    pub const CAN_MANAGE_PERMISSIONS_GLOBAL: &str = "CAN_MANAGE_PERMISSIONS_GLOBAL";
    pub const CAN_EDIT_GAMES_GLOBAL: &str = "CAN_EDIT_GAMES_GLOBAL";
    pub const CAN_PUBLISH_GAMES_GLOBAL: &str = "CAN_PUBLISH_GAMES_GLOBAL";
    pub const CAN_REPLY_TO_REVIEWS_GLOBAL: &str = "CAN_REPLY_TO_REVIEWS_GLOBAL";
    pub const CAN_MANAGE_PUBLIC_APKS_GLOBAL: &str = "CAN_MANAGE_PUBLIC_APKS_GLOBAL";
    pub const CAN_MANAGE_TRACK_APKS_GLOBAL: &str = "CAN_MANAGE_TRACK_APKS_GLOBAL";
    pub const CAN_MANAGE_TRACK_USERS_GLOBAL: &str = "CAN_MANAGE_TRACK_USERS_GLOBAL";
    pub const CAN_MANAGE_PUBLIC_LISTING_GLOBAL: &str = "CAN_MANAGE_PUBLIC_LISTING_GLOBAL";
    pub const CAN_MANAGE_DRAFT_APPS_GLOBAL: &str = "CAN_MANAGE_DRAFT_APPS_GLOBAL";
    pub const CAN_CREATE_MANAGED_PLAY_APPS_GLOBAL: &str = "CAN_CREATE_MANAGED_PLAY_APPS_GLOBAL";
    pub const CAN_CHANGE_MANAGED_PLAY_SETTING_GLOBAL: &str =
        "CAN_CHANGE_MANAGED_PLAY_SETTING_GLOBAL";
    pub const CAN_MANAGE_ORDERS_GLOBAL: &str = "CAN_MANAGE_ORDERS_GLOBAL";
    pub const CAN_MANAGE_APP_CONTENT_GLOBAL: &str = "CAN_MANAGE_APP_CONTENT_GLOBAL";
    pub const CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL: &str = "CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL";
    pub const CAN_VIEW_APP_QUALITY_GLOBAL: &str = "CAN_VIEW_APP_QUALITY_GLOBAL";
    pub const CAN_MANAGE_DEEPLINKS_GLOBAL: &str = "CAN_MANAGE_DEEPLINKS_GLOBAL";
}

/// App-level implications: permission -> directly implied permissions.
const APP_IMPLICATIONS: &[(&str, &[&str])] = &[
    (
        app::CAN_MANAGE_PERMISSIONS,
        &[
            app::CAN_VIEW_FINANCIAL_DATA,
            app::CAN_MANAGE_PUBLIC_APKS,
            app::CAN_MANAGE_PUBLIC_LISTING,
            app::CAN_MANAGE_ORDERS,
            app::CAN_REPLY_TO_REVIEWS,
            app::CAN_MANAGE_APP_CONTENT,
            app::CAN_MANAGE_DEEPLINKS,
        ],
    ),
    (app::CAN_VIEW_FINANCIAL_DATA, &[app::CAN_VIEW_NON_FINANCIAL_DATA]),
    (app::CAN_MANAGE_ORDERS, &[app::CAN_VIEW_FINANCIAL_DATA]),
    (app::CAN_REPLY_TO_REVIEWS, &[app::CAN_VIEW_NON_FINANCIAL_DATA]),
    (app::CAN_MANAGE_PUBLIC_APKS, &[app::CAN_MANAGE_TRACK_APKS]),
    (app::CAN_MANAGE_TRACK_APKS, &[app::CAN_MANAGE_TRACK_USERS]),
    (app::CAN_MANAGE_TRACK_USERS, &[app::CAN_VIEW_NON_FINANCIAL_DATA]),
    (app::CAN_MANAGE_PUBLIC_LISTING, &[app::CAN_VIEW_NON_FINANCIAL_DATA]),
    (app::CAN_MANAGE_DRAFT_APPS, &[app::CAN_VIEW_NON_FINANCIAL_DATA]),
    (app::CAN_MANAGE_APP_CONTENT, &[app::CAN_VIEW_NON_FINANCIAL_DATA]),
    (app::CAN_MANAGE_DEEPLINKS, &[app::CAN_VIEW_NON_FINANCIAL_DATA]),
    (app::CAN_VIEW_NON_FINANCIAL_DATA, &[app::CAN_VIEW_APP_QUALITY]),
];

/// Developer-level implications: permission -> directly implied permissions.
const DEVELOPER_IMPLICATIONS: &[(&str, &[&str])] = &[
    (
        developer::CAN_MANAGE_PERMISSIONS_GLOBAL,
        &[
            developer::CAN_VIEW_FINANCIAL_DATA_GLOBAL,
            developer::CAN_MANAGE_PUBLIC_APKS_GLOBAL,
            developer::CAN_MANAGE_PUBLIC_LISTING_GLOBAL,
            developer::CAN_MANAGE_ORDERS_GLOBAL,
            developer::CAN_REPLY_TO_REVIEWS_GLOBAL,
            developer::CAN_MANAGE_APP_CONTENT_GLOBAL,
            developer::CAN_MANAGE_DEEPLINKS_GLOBAL,
            developer::CAN_PUBLISH_GAMES_GLOBAL,
        ],
    ),
    (
        developer::CAN_VIEW_FINANCIAL_DATA_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_ORDERS_GLOBAL,
        &[developer::CAN_VIEW_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_REPLY_TO_REVIEWS_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_PUBLIC_APKS_GLOBAL,
        &[developer::CAN_MANAGE_TRACK_APKS_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_TRACK_APKS_GLOBAL,
        &[developer::CAN_MANAGE_TRACK_USERS_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_TRACK_USERS_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_PUBLIC_LISTING_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_DRAFT_APPS_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_APP_CONTENT_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_MANAGE_DEEPLINKS_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_PUBLISH_GAMES_GLOBAL,
        &[developer::CAN_EDIT_GAMES_GLOBAL],
    ),
    (
        developer::CAN_EDIT_GAMES_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_CREATE_MANAGED_PLAY_APPS_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_CHANGE_MANAGED_PLAY_SETTING_GLOBAL,
        &[developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL],
    ),
    (
        developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL,
        &[developer::CAN_VIEW_APP_QUALITY_GLOBAL],
    ),
];

/// Directed graph: permission -> ordered, directly-implied permissions.
///
/// The graph may contain cycles; expansion tolerates them.
pub struct ImplicationGraph<S: Scope> {
    edges: HashMap<Permission<S>, Vec<Permission<S>>>,
}

impl<S: Scope> ImplicationGraph<S> {
    /// Create a graph with no edges.
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// Build a graph from a static `(permission, implied)` table.
    pub fn from_table(table: &[(&str, &[&str])]) -> Self {
        table
            .iter()
            .fold(Self::new(), |graph, (from, implied)| {
                graph.with_implications(from, implied)
            })
    }

    /// Add edges `from -> implied[i]`, keeping order and skipping duplicates.
    pub fn with_implications(mut self, from: &str, implied: &[&str]) -> Self {
        let targets = self.edges.entry(Permission::new(from)).or_default();
        for token in implied {
            let target = Permission::new(*token);
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        self
    }

    /// Permissions directly implied by `permission`.
    ///
    /// Unknown tokens have no implications; this is not an error.
    pub fn directly_implied(&self, permission: &Permission<S>) -> &[Permission<S>] {
        self.edges
            .get(permission)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `permission` has at least one recorded implication.
    pub fn has_implications(&self, permission: &Permission<S>) -> bool {
        !self.directly_implied(permission).is_empty()
    }

    /// Every permission mentioned by the graph, as source or target.
    pub fn universe(&self) -> PermissionSet<S> {
        let mut sources: Vec<&Permission<S>> = self.edges.keys().collect();
        sources.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut universe = PermissionSet::new();
        for source in sources {
            universe.insert(source.clone());
            universe.extend(self.edges[source].iter().cloned());
        }
        universe
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

impl<S: Scope> Default for ImplicationGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scope> Clone for ImplicationGraph<S> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
        }
    }
}

impl<S: Scope> std::fmt::Debug for ImplicationGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplicationGraph")
            .field("scope", &S::KIND)
            .field("permissions", &self.edges.len())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// One implication graph per scope.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) app: ImplicationGraph<AppScope>,
    pub(crate) developer: ImplicationGraph<DeveloperScope>,
}

impl Catalog {
    /// Assemble a catalog from explicit graphs.
    pub fn new(
        app: ImplicationGraph<AppScope>,
        developer: ImplicationGraph<DeveloperScope>,
    ) -> Self {
        Self { app, developer }
    }

    /// The Play Console permission catalog.
    pub fn play_console() -> Self {
        Self {
            app: ImplicationGraph::from_table(APP_IMPLICATIONS),
            developer: ImplicationGraph::from_table(DEVELOPER_IMPLICATIONS),
        }
    }

    /// The graph for scope `S`.
    pub fn graph<S: Scope>(&self) -> &ImplicationGraph<S> {
        S::graph(self)
    }

    /// Permissions directly implied by `permission` in its own scope.
    pub fn directly_implied<S: Scope>(&self, permission: &Permission<S>) -> &[Permission<S>] {
        self.graph::<S>().directly_implied(permission)
    }

    /// Transitive closure of `explicit` in scope `S`.
    pub fn expand<S: Scope>(&self, explicit: &PermissionSet<S>) -> PermissionSet<S> {
        expand(self.graph::<S>(), explicit)
    }

    /// Transitive closure of `explicit`, with the implicit grants it added.
    pub fn expand_traced<S: Scope>(&self, explicit: &PermissionSet<S>) -> Expansion<S> {
        expand_traced(self.graph::<S>(), explicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{AppPermission, DeveloperPermission};

    #[test]
    fn test_unknown_token_has_no_implications() {
        let catalog = Catalog::play_console();
        let unknown = AppPermission::new("CAN_DO_SOMETHING_NEW");
        assert!(catalog.directly_implied(&unknown).is_empty());
    }

    #[test]
    fn test_review_chain_edges() {
        let catalog = Catalog::play_console();

        let reply = AppPermission::new(app::CAN_REPLY_TO_REVIEWS);
        let view = AppPermission::new(app::CAN_VIEW_NON_FINANCIAL_DATA);
        let quality = AppPermission::new(app::CAN_VIEW_APP_QUALITY);

        assert_eq!(catalog.directly_implied(&reply), &[view.clone()]);
        assert_eq!(catalog.directly_implied(&view), &[quality.clone()]);
        assert!(catalog.directly_implied(&quality).is_empty());
    }

    #[test]
    fn test_scopes_are_separate() {
        let catalog = Catalog::play_console();

        // The app token means nothing in the developer graph.
        let as_developer = DeveloperPermission::new(app::CAN_REPLY_TO_REVIEWS);
        assert!(catalog.directly_implied(&as_developer).is_empty());

        let global = DeveloperPermission::new(developer::CAN_REPLY_TO_REVIEWS_GLOBAL);
        assert_eq!(
            catalog.directly_implied(&global)[0].as_str(),
            developer::CAN_VIEW_NON_FINANCIAL_DATA_GLOBAL
        );
    }

    #[test]
    fn test_builder_skips_duplicate_edges() {
        let graph: ImplicationGraph<AppScope> = ImplicationGraph::new()
            .with_implications("A", &["B", "C"])
            .with_implications("A", &["C", "D"]);

        let targets: Vec<&str> = graph
            .directly_implied(&AppPermission::new("A"))
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(targets, vec!["B", "C", "D"]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_universe_is_deterministic() {
        let catalog = Catalog::play_console();
        let a = catalog.graph::<AppScope>().universe();
        let b = catalog.graph::<AppScope>().universe();
        assert_eq!(a.tokens(), b.tokens());
        assert!(a.contains_token(app::CAN_VIEW_APP_QUALITY));
    }
}
