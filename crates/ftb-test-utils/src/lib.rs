//! Shared test utilities for the FTB catalog crates.
//!
//! This crate provides:
//! - [`seeded_store`]: an in-memory store loaded with the standard catalog fixture
//! - [`TracingDocumentStore`]: a store wrapper recording every query, with
//!   failure injection
//! - Builders for one-off dataset, edition and version documents
//!
//! # Example
//!
//! ```rust,ignore
//! use ftb_test_utils::{seeded_store, DATASET_ID};
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let store = seeded_store();
//!     // ... build a reader over the store ...
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
// Test utilities use expect/unwrap for cleaner test code - panics are acceptable in tests
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

pub mod fixtures;
pub mod store;

pub use fixtures::*;
pub use store::*;

/// Initialize test logging (call once per test module).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("ftb=debug".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}
