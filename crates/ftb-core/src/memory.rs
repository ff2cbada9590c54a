//! In-memory document store for development and tests.
//!
//! Thread-safe via `RwLock`. Queries evaluate the [`Selector`] directly
//! against stored documents. Cursors iterate over a snapshot taken when the
//! cursor is opened, so concurrent inserts never show up mid-iteration.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::selector::{Selector, Sort};
use crate::store::{Collection, Document, DocumentCursor, DocumentStore, FindOptions};

/// Seed file layout: one array of documents per collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedDocuments {
    /// Dataset documents.
    pub datasets: Vec<Document>,
    /// Edition documents.
    pub editions: Vec<Document>,
    /// Version documents.
    pub instances: Vec<Document>,
    /// Dimension option documents.
    pub dimension_options: Vec<Document>,
}

/// In-memory document store.
#[derive(Debug, Default, Clone)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the seed documents.
    #[must_use]
    pub fn from_seed(seed: SeedDocuments) -> Self {
        let mut collections = HashMap::new();
        collections.insert(Collection::Datasets, seed.datasets);
        collections.insert(Collection::Editions, seed.editions);
        collections.insert(Collection::Instances, seed.instances);
        collections.insert(Collection::DimensionOptions, seed.dimension_options);
        Self {
            collections: Arc::new(RwLock::new(collections)),
            open_cursors: Arc::default(),
        }
    }

    /// Parses a JSON seed document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the JSON does not match the seed layout.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let seed: SeedDocuments = serde_json::from_str(json)?;
        Ok(Self::from_seed(seed))
    }

    /// Loads a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the file cannot be read and
    /// `Error::Serialization` if it is not a valid seed document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::storage_with_source(format!("failed to read seed file {}", path.display()), e)
        })?;
        Self::from_json_str(&json)
    }

    /// Inserts a document into a collection.
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the lock is poisoned.
    pub fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        let mut collections = self.collections.write().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        collections.entry(collection).or_default().push(document);
        Ok(())
    }

    /// Returns the number of cursors opened and not yet dropped.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn matching(&self, collection: Collection, selector: &Selector) -> Result<Vec<Document>> {
        let collections = self.collections.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| selector.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<Option<Document>> {
        Ok(self.matching(collection, selector)?.into_iter().next())
    }

    async fn find_first(
        &self,
        collection: Collection,
        selector: &Selector,
        sort: &Sort,
    ) -> Result<Option<Document>> {
        let mut docs = self.matching(collection, selector)?;
        docs.sort_by(|a, b| sort.compare(a, b));
        Ok(docs.into_iter().next())
    }

    async fn find(
        &self,
        collection: Collection,
        selector: &Selector,
        options: &FindOptions,
    ) -> Result<Box<dyn DocumentCursor>> {
        let mut docs = self.matching(collection, selector)?;
        if let Some(sort) = &options.sort {
            docs.sort_by(|a, b| sort.compare(a, b));
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        let page: VecDeque<_> = docs.into_iter().skip(skip).take(limit).collect();

        Ok(Box::new(MemoryCursor::open(page, Arc::clone(&self.open_cursors))))
    }

    async fn count(&self, collection: Collection, selector: &Selector) -> Result<u64> {
        let matched = self.matching(collection, selector)?.len();
        u64::try_from(matched).map_err(|_| Error::internal("document count overflow"))
    }

    async fn ping(&self) -> Result<()> {
        self.collections.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        Ok(())
    }
}

struct MemoryCursor {
    docs: VecDeque<Document>,
    open: Arc<AtomicUsize>,
}

impl MemoryCursor {
    fn open(docs: VecDeque<Document>, open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self { docs, open }
    }
}

#[async_trait]
impl DocumentCursor for MemoryCursor {
    async fn next(&mut self) -> Result<Option<Document>> {
        Ok(self.docs.pop_front())
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
