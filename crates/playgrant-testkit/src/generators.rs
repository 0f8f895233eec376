//! Proptest generators for playgrant types.

use playgrant::{GrantConfig, UserConfig};
use playgrant_core::{
    AppScope, Catalog, DeveloperScope, GrantName, ImplicationGraph, PermissionSet, Scope, UserName,
};
use proptest::prelude::*;

/// Small token pool for random graphs, so edges collide and cycles form.
const GRAPH_TOKENS: &[&str] = &["A", "B", "C", "D", "E", "F", "G", "H"];

/// Strategy for an arbitrary permission-like token.
pub fn token() -> impl Strategy<Value = String> {
    "[A-Z][A-Z_]{0,31}"
}

/// Strategy for a name segment: an id, an email or a package name.
///
/// Never empty and never contains `/`.
pub fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z0-9@._+-]{1,24}"
}

/// Strategy for an email-shaped user id.
pub fn email() -> impl Strategy<Value = String> {
    ("[a-z0-9._+-]{1,16}", "[a-z0-9-]{1,12}\\.[a-z]{2,6}")
        .prop_map(|(local, domain)| format!("{local}@{domain}"))
}

/// Strategy for an app package name.
pub fn package_name() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9_]{0,10}", 2..5).prop_map(|parts| parts.join("."))
}

/// Strategy for a developer account id.
pub fn developer_id() -> impl Strategy<Value = String> {
    "[1-9][0-9]{0,18}"
}

pub fn user_name() -> impl Strategy<Value = UserName> {
    (identifier(), identifier()).prop_map(|(developer_id, email)| UserName::new(developer_id, email))
}

pub fn grant_name() -> impl Strategy<Value = GrantName> {
    (identifier(), identifier(), identifier())
        .prop_map(|(developer_id, email, app_id)| GrantName::new(developer_id, email, app_id))
}

/// Strategy for a token drawn from the small graph pool.
pub fn graph_token() -> impl Strategy<Value = String> {
    prop::sample::select(GRAPH_TOKENS).prop_map(str::to_owned)
}

fn catalog_tokens<S: Scope>(min: usize) -> impl Strategy<Value = Vec<String>> {
    let universe = Catalog::play_console().graph::<S>().universe().to_token_vec();
    let max = universe.len();
    prop::sample::subsequence(universe, min..=max).prop_shuffle()
}

/// App-level tokens drawn from the Play Console catalog, in random order.
pub fn app_permissions() -> impl Strategy<Value = Vec<String>> {
    catalog_tokens::<AppScope>(0)
}

/// Developer-level tokens drawn from the Play Console catalog, in random order.
pub fn developer_permissions() -> impl Strategy<Value = Vec<String>> {
    catalog_tokens::<DeveloperScope>(0)
}

/// A grant config with at least one catalog permission.
pub fn grant_config() -> impl Strategy<Value = GrantConfig> {
    (email(), package_name(), catalog_tokens::<AppScope>(1))
        .prop_map(|(user_id, app_id, permissions)| GrantConfig::new(user_id, app_id, permissions))
}

/// A user config; permissions may be empty.
pub fn user_config() -> impl Strategy<Value = UserConfig> {
    (email(), developer_permissions())
        .prop_map(|(email, permissions)| UserConfig::new(email, permissions))
}

/// A random implication graph plus an explicit set to expand over it.
///
/// Graphs come from a pool of eight tokens, so self-loops, cycles and
/// diamonds are common.
#[derive(Debug, Clone)]
pub struct ExpansionCase {
    pub edges: Vec<(String, Vec<String>)>,
    pub explicit: Vec<String>,
}

impl ExpansionCase {
    pub fn graph<S: Scope>(&self) -> ImplicationGraph<S> {
        self.edges
            .iter()
            .fold(ImplicationGraph::new(), |graph, (from, implied)| {
                let implied: Vec<&str> = implied.iter().map(String::as_str).collect();
                graph.with_implications(from, &implied)
            })
    }

    pub fn explicit<S: Scope>(&self) -> PermissionSet<S> {
        PermissionSet::from_tokens(self.explicit.iter())
    }
}

impl Arbitrary for ExpansionCase {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(
                (graph_token(), prop::collection::vec(graph_token(), 0..4)),
                0..12,
            ),
            prop::collection::vec(graph_token(), 0..6),
        )
            .prop_map(|(edges, explicit)| ExpansionCase { edges, explicit })
            .boxed()
    }
}
