//! # Playgrant
//!
//! Reconciles declared Play Console users and app-level grants against the
//! remote API.
//!
//! ## Overview
//!
//! The [`Reconciler`] combines three parts:
//!
//! - a [`GrantClient`](playgrant_client::GrantClient) for remote calls
//! - a [`StateStore`](playgrant_state::StateStore) for persisted records
//! - the permission [`Catalog`](playgrant_core::Catalog) for expansion
//!
//! and exposes two resources, [`UserResource`] and [`AppIamResource`], plus
//! the [`UserDataSource`] and [`UsersDataSource`] views. Every lifecycle
//! operation returns an [`Outcome`]: the state to persist, the diagnostics
//! gathered along the way, and whether a read detected drift.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use playgrant::{GrantConfig, ProviderConfig, Reconciler, Resource};
//! use playgrant_client::RequestContext;
//! use playgrant_state::MemoryStateStore;
//!
//! async fn example() {
//!     let config = ProviderConfig::new("5166846112789481453");
//!     let client = config.console_client("ya29.token").unwrap();
//!     let reconciler = Reconciler::new(client, MemoryStateStore::new());
//!
//!     let grant = GrantConfig::new("dev@example.com", "com.example.app", ["CAN_REPLY_TO_REVIEWS"]);
//!     let outcome = reconciler.app_iam().create(&RequestContext::new(), &grant).await;
//!     for diagnostic in &outcome.diagnostics {
//!         println!("{diagnostic}");
//!     }
//! }
//! ```

pub mod config;
pub mod datasource;
pub mod diagnostics;
pub mod error;
pub mod plan;
pub mod reconciler;
pub mod resource;

pub use config::ProviderConfig;
pub use datasource::{UserDataSource, UserSummary, UsersDataSource};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ReconcileError, Result};
pub use plan::{expanded_permissions, validate_permissions, EmptyPermissions, Plan, PlanAction};
pub use reconciler::Reconciler;
pub use resource::{AppIamResource, GrantConfig, Outcome, Resource, UserConfig, UserResource};
