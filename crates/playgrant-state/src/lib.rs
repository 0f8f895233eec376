//! # Playgrant State
//!
//! Persisted resource state for the reconciler.
//!
//! ## Key Types
//!
//! - [`StateStore`] - the async trait over persisted records
//! - [`MemoryStateStore`] - in-memory implementation
//! - [`ResourceKey`] / [`StoredRecord`] - identity and content of one resource
//! - [`PutResult`] - whether a write changed anything
//!
//! The on-disk format of a durable store is out of scope here; records are
//! encoded canonically and fingerprinted by `playgrant-core`.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StateError};
pub use memory::MemoryStateStore;
pub use traits::{PutResult, ResourceKey, StateStore, StoredRecord};
