//! # ftb-catalog
//!
//! Read-side catalog for statistical datasets.
//!
//! Resources form a hierarchy: dataset → edition → version → dimension.
//! Datasets and editions carry two variants of themselves: `current` (the last
//! published snapshot) and `next` (the latest draft). Versions carry a single
//! lifecycle `state` instead.
//!
//! This crate provides:
//!
//! - **Resource Model**: typed documents and the current/next [`Variants`] container
//! - **Visibility**: the query predicates that pick the right variant per request
//! - **State Validation**: the closed set of version states, checked on every read
//! - **Version Resolution**: next sequential version number for an edition
//! - **Metadata Composition**: merging a dataset variant and a version into [`Metadata`]
//!
//! [`CatalogReader`] wires these together over a [`ftb_core::DocumentStore`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ftb_catalog::{CatalogReader, UrlBuilder, Visibility};
//!
//! let reader = CatalogReader::new(store, Arc::new(UrlBuilder::new(api_url, website_url)));
//!
//! let versions = reader
//!     .list_versions("cpih01", "time-series", &Visibility::published())
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod metadata;
pub mod model;
pub mod reader;
pub mod state;
pub mod url;
pub mod versions;
pub mod visibility;

pub use error::{CatalogError, ErrorClass, Result};
pub use metadata::{DistributionFormat, Metadata, MetadataLinks, compose_metadata};
pub use model::{
    Dataset, DatasetDocument, Dimension, DimensionOption, Edition, EditionDocument, LinkObject,
    PagedResultList, ResultList, Variants, Version,
};
pub use reader::{CatalogReader, Page};
pub use state::VersionState;
pub use url::{PublicUrlBuilder, UrlBuilder};
pub use visibility::Visibility;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, ErrorClass};
    pub use crate::metadata::{Metadata, compose_metadata};
    pub use crate::model::{Dataset, Edition, Variants, Version};
    pub use crate::reader::CatalogReader;
    pub use crate::state::VersionState;
    pub use crate::visibility::Visibility;
}
