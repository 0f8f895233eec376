//! Transitive expansion of permission sets.
//!
//! `expand(graph, explicit)` is the smallest superset of `explicit` closed
//! under `directly_implied`. The closure is computed breadth-first over a
//! work queue. A permission is enqueued only when it is first inserted into
//! the result, so every permission is visited at most once and the walk
//! terminates on cyclic graphs.
//!
//! Output order is first-seen: the explicit permissions in input order,
//! then newly discovered permissions in discovery order.

use std::collections::VecDeque;
use std::fmt;

use crate::catalog::ImplicationGraph;
use crate::permission::{Permission, PermissionSet, Scope};

/// A permission present in the closure but absent from the explicit input.
#[derive(Clone, PartialEq, Eq)]
pub struct ImplicitGrant<S: Scope> {
    /// The permission that was added.
    pub permission: Permission<S>,
    /// The explicit permission whose closure first reached it.
    pub implied_by: Permission<S>,
}

impl<S: Scope> fmt::Debug for ImplicitGrant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} <- {:?}", self.permission, self.implied_by)
    }
}

impl<S: Scope> fmt::Display for ImplicitGrant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The permission '{}' is inherited from '{}', but it is not explicitly granted.",
            self.permission, self.implied_by
        )
    }
}

/// Result of a traced expansion.
#[derive(Debug, Clone)]
pub struct Expansion<S: Scope> {
    /// The closed permission set.
    pub permissions: PermissionSet<S>,
    /// One entry per permission the closure added, in discovery order.
    pub implicit: Vec<ImplicitGrant<S>>,
}

/// Compute the transitive closure of `explicit` over `graph`.
pub fn expand<S: Scope>(graph: &ImplicationGraph<S>, explicit: &PermissionSet<S>) -> PermissionSet<S> {
    expand_traced(graph, explicit).permissions
}

/// Compute the closure and record which explicit permission added each
/// implicit one.
pub fn expand_traced<S: Scope>(
    graph: &ImplicationGraph<S>,
    explicit: &PermissionSet<S>,
) -> Expansion<S> {
    let mut permissions = explicit.clone();
    let mut implicit = Vec::new();

    // (permission to visit, explicit root it descends from)
    let mut queue: VecDeque<(Permission<S>, Permission<S>)> =
        explicit.iter().map(|p| (p.clone(), p.clone())).collect();

    while let Some((current, root)) = queue.pop_front() {
        for implied in graph.directly_implied(&current) {
            if permissions.insert(implied.clone()) {
                implicit.push(ImplicitGrant {
                    permission: implied.clone(),
                    implied_by: root.clone(),
                });
                queue.push_back((implied.clone(), root.clone()));
            }
        }
    }

    Expansion {
        permissions,
        implicit,
    }
}
