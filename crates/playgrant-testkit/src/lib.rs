//! # Playgrant Testkit
//!
//! Testing utilities for playgrant.
//!
//! ## Contents
//!
//! - **Vectors**: Golden inputs with known outputs for name parsing and
//!   permission expansion
//! - **Generators**: Proptest strategies for tokens, names, implication
//!   graphs and resource configs
//! - **Fixtures**: A reconciler wired to an in-memory console and store
//!
//! ## Golden Vectors
//!
//! Vectors pin the observable behaviour of the pure core. Any change to
//! the catalog tables or to expansion order shows up here first.
//!
//! ```rust
//! use playgrant_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, detail) in verify_all_vectors() {
//!     assert!(ok, "{name}: {detail}");
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::TestFixture;
pub use generators::*;
pub use vectors::*;
