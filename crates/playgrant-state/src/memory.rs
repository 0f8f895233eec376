//! In-memory implementation of the StateStore trait.
//!
//! Records are held as canonical bytes plus their fingerprint, so a value
//! read back has been through the same encoding a durable store would use.

use std::collections::BTreeMap;

use async_trait::async_trait;
use playgrant_core::{canonical_bytes, fingerprint, from_canonical_bytes, Fingerprint};
use tokio::sync::RwLock;
use tracing::trace;

use crate::error::Result;
use crate::traits::{PutResult, ResourceKey, StateStore, StoredRecord};

struct Entry {
    canonical: Vec<u8>,
    fingerprint: Fingerprint,
}

/// In-memory state store.
///
/// All data is lost when the store is dropped.
#[derive(Default)]
pub struct MemoryStateStore {
    inner: RwLock<BTreeMap<ResourceKey, Entry>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &ResourceKey) -> Result<Option<StoredRecord>> {
        let inner = self.inner.read().await;
        match inner.get(key) {
            Some(entry) => Ok(Some(from_canonical_bytes(&entry.canonical)?)),
            None => Ok(None),
        }
    }

    async fn fingerprint(&self, key: &ResourceKey) -> Result<Option<Fingerprint>> {
        Ok(self.inner.read().await.get(key).map(|e| e.fingerprint))
    }

    async fn put(&self, record: StoredRecord) -> Result<PutResult> {
        let key = record.key();
        let canonical = canonical_bytes(&record)?;
        let fingerprint = fingerprint(&record)?;

        let mut inner = self.inner.write().await;
        let result = match inner.get(&key) {
            None => PutResult::Inserted,
            Some(existing) if existing.fingerprint == fingerprint => return Ok(PutResult::Unchanged),
            Some(existing) => PutResult::Replaced {
                previous: existing.fingerprint,
            },
        };

        trace!(%key, %fingerprint, "stored record");
        inner.insert(
            key,
            Entry {
                canonical,
                fingerprint,
            },
        );
        Ok(result)
    }

    async fn remove(&self, key: &ResourceKey) -> Result<Option<StoredRecord>> {
        let removed = self.inner.write().await.remove(key);
        match removed {
            Some(entry) => Ok(Some(from_canonical_bytes(&entry.canonical)?)),
            None => Ok(None),
        }
    }

    async fn keys(&self) -> Result<Vec<ResourceKey>> {
        Ok(self.inner.read().await.keys().cloned().collect())
    }
}
