//! StateStore trait: where reconciled records are kept between operations.

use std::fmt;

use async_trait::async_trait;
use playgrant_core::{Fingerprint, GrantName, GrantRecord, UserName, UserRecord};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StateError};

/// Identity key of a persisted resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKey {
    User(UserName),
    Grant(GrantName),
}

impl ResourceKey {
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKey::User(_) => "user",
            ResourceKey::Grant(_) => "grant",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::User(name) => name.fmt(f),
            ResourceKey::Grant(name) => name.fmt(f),
        }
    }
}

impl From<UserName> for ResourceKey {
    fn from(name: UserName) -> Self {
        ResourceKey::User(name)
    }
}

impl From<GrantName> for ResourceKey {
    fn from(name: GrantName) -> Self {
        ResourceKey::Grant(name)
    }
}

/// A persisted record of either resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredRecord {
    User(UserRecord),
    Grant(GrantRecord),
}

impl StoredRecord {
    pub fn key(&self) -> ResourceKey {
        match self {
            StoredRecord::User(record) => ResourceKey::User(record.user_name()),
            StoredRecord::Grant(record) => ResourceKey::Grant(record.name()),
        }
    }

    pub fn into_user(self) -> Option<UserRecord> {
        match self {
            StoredRecord::User(record) => Some(record),
            StoredRecord::Grant(_) => None,
        }
    }

    pub fn into_grant(self) -> Option<GrantRecord> {
        match self {
            StoredRecord::Grant(record) => Some(record),
            StoredRecord::User(_) => None,
        }
    }
}

impl From<UserRecord> for StoredRecord {
    fn from(record: UserRecord) -> Self {
        StoredRecord::User(record)
    }
}

impl From<GrantRecord> for StoredRecord {
    fn from(record: GrantRecord) -> Self {
        StoredRecord::Grant(record)
    }
}

/// Result of writing a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutResult {
    /// No record existed under the key.
    Inserted,
    /// The stored record already had the same fingerprint.
    Unchanged,
    /// A different record was replaced.
    Replaced { previous: Fingerprint },
}

/// Async interface for persisted resource state.
///
/// Writes are keyed by the record's own identity. Stores keep each record's
/// fingerprint alongside it so identical writes are recognised without
/// decoding.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch the record under `key`.
    async fn get(&self, key: &ResourceKey) -> Result<Option<StoredRecord>>;

    /// Fingerprint of the record under `key`.
    async fn fingerprint(&self, key: &ResourceKey) -> Result<Option<Fingerprint>>;

    /// Write a record under its identity key.
    async fn put(&self, record: StoredRecord) -> Result<PutResult>;

    /// Remove and return the record under `key`.
    async fn remove(&self, key: &ResourceKey) -> Result<Option<StoredRecord>>;

    /// All keys, in order.
    async fn keys(&self) -> Result<Vec<ResourceKey>>;

    /// Fetch a grant record.
    async fn get_grant(&self, name: &GrantName) -> Result<Option<GrantRecord>> {
        let key = ResourceKey::Grant(name.clone());
        match self.get(&key).await? {
            None => Ok(None),
            Some(record) => record.into_grant().map(Some).ok_or(StateError::KindMismatch {
                key: key.to_string(),
                expected: "grant",
            }),
        }
    }

    /// Fetch a user record.
    async fn get_user(&self, name: &UserName) -> Result<Option<UserRecord>> {
        let key = ResourceKey::User(name.clone());
        match self.get(&key).await? {
            None => Ok(None),
            Some(record) => record.into_user().map(Some).ok_or(StateError::KindMismatch {
                key: key.to_string(),
                expected: "user",
            }),
        }
    }

    /// Whether anything is stored under `key`.
    async fn contains(&self, key: &ResourceKey) -> Result<bool> {
        Ok(self.fingerprint(key).await?.is_some())
    }
}
