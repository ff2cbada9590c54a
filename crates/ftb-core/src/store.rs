//! The document store contract consumed by the catalog.
//!
//! The catalog never talks to a database directly. It hands a [`Selector`] to
//! a [`DocumentStore`] and reads documents back, either one at a time or
//! through a [`DocumentCursor`].
//!
//! ## Cursor release
//!
//! Cursors own whatever backing resource the store needs to stream results
//! (a server-side cursor, a session, a snapshot). Implementations must release
//! it in `Drop`, so every exit path of the consumer releases it: normal
//! completion, an early `?` return, a validation failure after the page was
//! read, or the request future being dropped on cancellation.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::selector::{Selector, Sort};

/// A stored JSON document.
pub type Document = Value;

/// Logical collections the catalog reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Dataset documents holding `current`/`next` variants.
    Datasets,
    /// Edition documents holding `current`/`next` variants.
    Editions,
    /// Version (instance) documents with a single `state`.
    Instances,
    /// Dimension option documents keyed by instance and dimension name.
    DimensionOptions,
}

impl Collection {
    /// All collections.
    pub const ALL: [Self; 4] = [
        Self::Datasets,
        Self::Editions,
        Self::Instances,
        Self::DimensionOptions,
    ];

    /// Returns the stored collection name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Datasets => "datasets",
            Self::Editions => "editions",
            Self::Instances => "instances",
            Self::DimensionOptions => "dimension.options",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a multi-document query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Result ordering; store order when absent.
    pub sort: Option<Sort>,
    /// Number of matching documents to skip.
    pub skip: u64,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
}

impl FindOptions {
    /// Sets the sort order.
    #[must_use]
    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets skip and limit.
    #[must_use]
    pub fn page(mut self, skip: u64, limit: u64) -> Self {
        self.skip = skip;
        self.limit = Some(limit);
        self
    }
}

/// A lazily consumed sequence of documents.
///
/// Dropping the cursor releases its backing resources.
#[async_trait]
pub trait DocumentCursor: Send {
    /// Returns the next document, or `None` once the sequence is exhausted.
    async fn next(&mut self) -> Result<Option<Document>>;
}

/// Read access to a document database.
///
/// Every call is independent: implementations provide a fresh logical
/// session per call and callers take no locks of their own.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Returns one document matching the selector.
    async fn find_one(&self, collection: Collection, selector: &Selector)
    -> Result<Option<Document>>;

    /// Returns the first document matching the selector under the given order.
    async fn find_first(
        &self,
        collection: Collection,
        selector: &Selector,
        sort: &Sort,
    ) -> Result<Option<Document>>;

    /// Opens a cursor over every document matching the selector.
    async fn find(
        &self,
        collection: Collection,
        selector: &Selector,
        options: &FindOptions,
    ) -> Result<Box<dyn DocumentCursor>>;

    /// Counts documents matching the selector.
    async fn count(&self, collection: Collection, selector: &Selector) -> Result<u64>;

    /// Checks the store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Drains a cursor into a vector, decoding each document.
///
/// The cursor is consumed by value, so it is dropped (and released) when this
/// returns, including when decoding fails part way through.
///
/// # Errors
///
/// Returns the first cursor or decode error encountered.
pub async fn collect_with<T, F>(mut cursor: Box<dyn DocumentCursor>, mut decode: F) -> Result<Vec<T>>
where
    F: FnMut(Document) -> Result<T> + Send,
    T: Send,
{
    let mut items = Vec::new();
    while let Some(document) = cursor.next().await? {
        items.push(decode(document)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names_match_stored_layout() {
        let names: Vec<_> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            vec!["datasets", "editions", "instances", "dimension.options"]
        );
        assert_eq!(Collection::Instances.to_string(), "instances");
    }

    #[test]
    fn test_find_options_builders() {
        let options = FindOptions::default()
            .sorted(Sort::descending("version"))
            .page(20, 10);

        assert_eq!(options.skip, 20);
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.sort, Some(Sort::descending("version")));
    }
}
