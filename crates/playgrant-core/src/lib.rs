//! # Playgrant Core
//!
//! Pure primitives for playgrant: scoped permissions, the permission
//! implication catalog, transitive expansion, and the qualified-name codec
//! used by the Play Console API.
//!
//! This crate contains no I/O, no networking, no logging. It is pure
//! computation over permission tokens and identifiers.
//!
//! ## Key Types
//!
//! - [`Permission`] - An opaque permission token tagged with its [`Scope`]
//! - [`PermissionSet`] - Order-preserving, duplicate-free set of permissions
//! - [`Catalog`] - One [`ImplicationGraph`] per scope
//! - [`GrantName`] / [`UserName`] - Server-canonical composite identifiers
//! - [`GrantRecord`] / [`UserRecord`] - The records persisted as state
//!
//! ## Expansion
//!
//! ```rust
//! use playgrant_core::{catalog::app, expand, AppScope, Catalog, PermissionSet};
//!
//! let catalog = Catalog::play_console();
//! let explicit: PermissionSet<AppScope> = PermissionSet::from_tokens([app::CAN_REPLY_TO_REVIEWS]);
//! let expanded = expand(catalog.graph(), &explicit);
//!
//! assert_eq!(
//!     expanded.tokens(),
//!     vec![
//!         app::CAN_REPLY_TO_REVIEWS,
//!         app::CAN_VIEW_NON_FINANCIAL_DATA,
//!         app::CAN_VIEW_APP_QUALITY,
//!     ]
//! );
//! ```

pub mod canonical;
pub mod catalog;
pub mod error;
pub mod expand;
pub mod name;
pub mod permission;
pub mod record;

pub use canonical::{canonical_bytes, fingerprint, from_canonical_bytes, Fingerprint};
pub use catalog::{Catalog, ImplicationGraph};
pub use error::{CoreError, NameError, Result};
pub use expand::{expand, expand_traced, Expansion, ImplicitGrant};
pub use name::{parse_grant_name, parse_user_name, GrantName, UserName};
pub use permission::{
    AppPermission, AppScope, DeveloperPermission, DeveloperScope, Permission, PermissionSet,
    Scope, ScopeKind,
};
pub use record::{GrantRecord, UserRecord};
