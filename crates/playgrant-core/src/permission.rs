//! Scoped permission tokens and permission sets.
//!
//! A permission is an opaque string token. Tokens are never validated
//! against a live list, so any string is a legal permission. The scope is
//! carried in the type: an app-level permission cannot be compared with, or
//! inserted into a set of, developer-level permissions.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::{Catalog, ImplicationGraph};

/// Runtime discriminator for a permission universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    /// Permissions that apply to a single app (grant resources).
    App,
    /// Permissions that apply across the developer account (user resources).
    Developer,
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level marker for a permission universe.
///
/// Sealed: the two universes are [`AppScope`] and [`DeveloperScope`].
pub trait Scope: sealed::Sealed + fmt::Debug + Copy + Eq + Hash + Send + Sync + 'static {
    /// The runtime discriminator for this scope.
    const KIND: ScopeKind;

    /// The implication graph for this scope inside a catalog.
    fn graph(catalog: &Catalog) -> &ImplicationGraph<Self>;
}

/// App-level permission universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppScope;

/// Developer-level permission universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeveloperScope;

impl sealed::Sealed for AppScope {}
impl sealed::Sealed for DeveloperScope {}

impl Scope for AppScope {
    const KIND: ScopeKind = ScopeKind::App;

    fn graph(catalog: &Catalog) -> &ImplicationGraph<Self> {
        &catalog.app
    }
}

impl Scope for DeveloperScope {
    const KIND: ScopeKind = ScopeKind::Developer;

    fn graph(catalog: &Catalog) -> &ImplicationGraph<Self> {
        &catalog.developer
    }
}

/// A permission token in scope `S`.
///
/// Equality is case-sensitive string equality; the scope is part of the type.
pub struct Permission<S: Scope> {
    token: String,
    scope: PhantomData<S>,
}

/// An app-level permission.
pub type AppPermission = Permission<AppScope>;

/// A developer-level permission.
pub type DeveloperPermission = Permission<DeveloperScope>;

impl<S: Scope> Permission<S> {
    /// Wrap a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scope: PhantomData,
        }
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Consume into the raw token.
    pub fn into_string(self) -> String {
        self.token
    }

    /// The scope this permission belongs to.
    pub fn scope(&self) -> ScopeKind {
        S::KIND
    }
}

impl<S: Scope> Clone for Permission<S> {
    fn clone(&self) -> Self {
        Self::new(self.token.clone())
    }
}

impl<S: Scope> PartialEq for Permission<S> {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl<S: Scope> Eq for Permission<S> {}

// Must hash exactly like `str` so `Borrow<str>` lookups agree.
impl<S: Scope> Hash for Permission<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

impl<S: Scope> Borrow<str> for Permission<S> {
    fn borrow(&self) -> &str {
        &self.token
    }
}

impl<S: Scope> fmt::Debug for Permission<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", S::KIND, self.token)
    }
}

impl<S: Scope> fmt::Display for Permission<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl<S: Scope> From<&str> for Permission<S> {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl<S: Scope> From<String> for Permission<S> {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl<S: Scope> Serialize for Permission<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_str(&self.token)
    }
}

impl<'de, S: Scope> Deserialize<'de> for Permission<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// A duplicate-free set of permissions that remembers first-seen order.
///
/// Equality ignores order. Iteration and serialization follow insertion
/// order, which keeps repeated plan computations byte-stable.
pub struct PermissionSet<S: Scope> {
    order: Vec<Permission<S>>,
    index: HashSet<Permission<S>>,
}

impl<S: Scope> PermissionSet<S> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Build a set from raw tokens, dropping duplicates.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        tokens.into_iter().map(Permission::new).collect()
    }

    /// Insert a permission. Returns `false` if it was already present.
    pub fn insert(&mut self, permission: Permission<S>) -> bool {
        if self.index.contains(&permission) {
            return false;
        }
        self.index.insert(permission.clone());
        self.order.push(permission);
        true
    }

    /// Check membership.
    pub fn contains(&self, permission: &Permission<S>) -> bool {
        self.index.contains(permission)
    }

    /// Check membership by raw token.
    pub fn contains_token(&self, token: &str) -> bool {
        self.index.contains(token)
    }

    /// Number of permissions.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Permission<S>> {
        self.order.iter()
    }

    /// Permissions in `self` that are not in `other`, in first-seen order.
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a Permission<S>> {
        self.order.iter().filter(move |p| !other.contains(p))
    }

    /// Whether every permission of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.iter().all(|p| self.contains(p))
    }

    /// Raw tokens in first-seen order, as sent on the wire.
    pub fn tokens(&self) -> Vec<&str> {
        self.order.iter().map(Permission::as_str).collect()
    }

    /// Owned raw tokens in first-seen order.
    pub fn to_token_vec(&self) -> Vec<String> {
        self.order.iter().map(|p| p.as_str().to_owned()).collect()
    }
}

impl<S: Scope> Default for PermissionSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Scope> Clone for PermissionSet<S> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            index: self.index.clone(),
        }
    }
}

impl<S: Scope> PartialEq for PermissionSet<S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_superset(other)
    }
}

impl<S: Scope> Eq for PermissionSet<S> {}

impl<S: Scope> fmt::Debug for PermissionSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.order.iter()).finish()
    }
}

impl<S: Scope> FromIterator<Permission<S>> for PermissionSet<S> {
    fn from_iter<I: IntoIterator<Item = Permission<S>>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: Scope> Extend<Permission<S>> for PermissionSet<S> {
    fn extend<I: IntoIterator<Item = Permission<S>>>(&mut self, iter: I) {
        for permission in iter {
            self.insert(permission);
        }
    }
}

impl<S: Scope> IntoIterator for PermissionSet<S> {
    type Item = Permission<S>;
    type IntoIter = std::vec::IntoIter<Permission<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl<'a, S: Scope> IntoIterator for &'a PermissionSet<S> {
    type Item = &'a Permission<S>;
    type IntoIter = std::slice::Iter<'a, Permission<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

impl<S: Scope> Serialize for PermissionSet<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.order.iter())
    }
}

impl<'de, S: Scope> Deserialize<'de> for PermissionSet<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Permission<S>>::deserialize(deserializer).map(|v| v.into_iter().collect())
    }
}
