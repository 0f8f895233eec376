//! # Playgrant Client
//!
//! Typed user and grant operations against the Play Console API.
//!
//! ## Overview
//!
//! The reconciler talks to the console only through the [`GrantClient`]
//! trait. Two implementations are provided:
//!
//! - [`ConsoleClient`] - maps each operation onto a REST request and sends it
//!   through an [`AuthorizedClient`] (authentication is the transport's job)
//! - [`MemoryConsole`] - an in-memory console for tests
//!
//! Every operation takes a [`RequestContext`]. Cancelling the context aborts
//! the in-flight call and surfaces [`ClientError::Cancelled`], never an API
//! error. Nothing here retries.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use playgrant_client::{ConsoleClient, GrantClient, HttpTransport, RequestContext};
//!
//! async fn example() {
//!     let transport = HttpTransport::new(
//!         "https://androidpublisher.googleapis.com/androidpublisher/v3",
//!         "ya29.token",
//!     )
//!     .unwrap();
//!     let client = ConsoleClient::new(transport, "5166846112789481453");
//!
//!     let ctx = RequestContext::new();
//!     let users = client.list_users(&ctx).await.unwrap();
//!     println!("{} users", users.len());
//! }
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod memory;
pub mod transport;
pub mod wire;

pub use client::{ConsoleClient, GrantClient, DEFAULT_PAGE_SIZE};
pub use context::RequestContext;
pub use error::{ClientError, Result};
pub use memory::{ConsoleCall, ConsoleOp, MemoryConsole};
pub use transport::{ApiRequest, ApiResponse, AuthorizedClient, HttpTransport, Method};
pub use wire::{Grant, ListUsersResponse, User};
