//! # ftb-core
//!
//! Shared primitives for the FTB dataset catalog service.
//!
//! This crate provides the foundational pieces every other crate builds on:
//!
//! - **Error Types**: Shared error definitions and result types
//! - **Observability**: Logging initialization with JSON or pretty output
//! - **Document Store**: The query/selector contract consumed by the catalog,
//!   with cursors that release their backing resources on drop
//! - **Memory Store**: A thread-safe in-memory document store for development and tests
//!
//! ## Crate Boundary
//!
//! `ftb-core` knows nothing about datasets, editions or versions. Collections
//! hold plain JSON documents; the catalog crate owns their shape.
//!
//! ## Example
//!
//! ```rust
//! use ftb_core::prelude::*;
//!
//! let selector = Selector::new()
//!     .eq("links.dataset.id", "123")
//!     .any_of("state", ["associated", "published"]);
//!
//! assert_eq!(selector.conditions().len(), 2);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod memory;
pub mod observability;
pub mod selector;
pub mod store;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use ftb_core::prelude::*;
///
/// let sort = Sort::descending("version");
/// assert_eq!(sort.path(), "version");
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::memory::MemoryDocumentStore;
    pub use crate::selector::{Condition, Selector, Sort, SortDirection};
    pub use crate::store::{Collection, Document, DocumentCursor, DocumentStore, FindOptions};
}

pub use error::{Error, Result};
pub use memory::{MemoryDocumentStore, SeedDocuments};
pub use selector::{Condition, Selector, Sort, SortDirection};
pub use store::{Collection, Document, DocumentCursor, DocumentStore, FindOptions};
