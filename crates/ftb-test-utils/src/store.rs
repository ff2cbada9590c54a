//! Instrumented document store for tests.
//!
//! Wraps a [`MemoryDocumentStore`] and records every query so tests can
//! assert which lookups ran and in what order.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ftb_core::error::{Error, Result};
use ftb_core::{
    Collection, Document, DocumentCursor, DocumentStore, FindOptions, MemoryDocumentStore,
    Selector, Sort,
};
use serde_json::Value;

/// Record of a store query for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOp {
    /// Query kind: `find_one`, `find_first`, `find`, `count` or `ping`.
    pub kind: &'static str,
    /// Queried collection; `None` for `ping`.
    pub collection: Option<Collection>,
    /// Rendered filter document.
    pub filter: Value,
    /// Rendered sort document, if the query was ordered.
    pub sort: Option<Value>,
}

/// In-memory store with query recording and failure injection.
#[derive(Debug, Clone, Default)]
pub struct TracingDocumentStore {
    inner: MemoryDocumentStore,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    failing: Arc<Mutex<HashSet<Collection>>>,
    ignored_paths: Arc<Mutex<Vec<String>>>,
}

impl TracingDocumentStore {
    /// Wraps an existing store.
    pub fn new(inner: MemoryDocumentStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }

    /// Makes every query on the collection fail with a storage error.
    pub fn fail_on(&self, collection: Collection) {
        self.failing.lock().expect("lock").insert(collection);
    }

    /// Makes queries ignore conditions on the given path, the way a store
    /// with a loose index or collation would over-match.
    pub fn ignore_condition(&self, path: impl Into<String>) {
        self.ignored_paths.lock().expect("lock").push(path.into());
    }

    /// Returns every recorded operation.
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().expect("lock").clone()
    }

    /// Returns the collections queried, in order.
    pub fn queried_collections(&self) -> Vec<Collection> {
        self.operations()
            .into_iter()
            .filter_map(|op| op.collection)
            .collect()
    }

    /// Returns the number of cursors opened and not yet dropped.
    pub fn open_cursors(&self) -> usize {
        self.inner.open_cursors()
    }

    fn record(
        &self,
        kind: &'static str,
        collection: Collection,
        selector: &Selector,
        sort: Option<&Sort>,
    ) -> Result<Selector> {
        self.operations.lock().expect("lock").push(StoreOp {
            kind,
            collection: Some(collection),
            filter: selector.to_filter(),
            sort: sort.map(Sort::to_document),
        });
        if self.failing.lock().expect("lock").contains(&collection) {
            return Err(Error::storage(format!("injected failure on {collection}")));
        }

        let ignored = self.ignored_paths.lock().expect("lock").clone();
        Ok(ignored
            .iter()
            .fold(selector.clone(), |selector, path| selector.without(path)))
    }
}

#[async_trait]
impl DocumentStore for TracingDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        selector: &Selector,
    ) -> Result<Option<Document>> {
        let selector = self.record("find_one", collection, selector, None)?;
        self.inner.find_one(collection, &selector).await
    }

    async fn find_first(
        &self,
        collection: Collection,
        selector: &Selector,
        sort: &Sort,
    ) -> Result<Option<Document>> {
        let selector = self.record("find_first", collection, selector, Some(sort))?;
        self.inner.find_first(collection, &selector, sort).await
    }

    async fn find(
        &self,
        collection: Collection,
        selector: &Selector,
        options: &FindOptions,
    ) -> Result<Box<dyn DocumentCursor>> {
        let selector = self.record("find", collection, selector, options.sort.as_ref())?;
        self.inner.find(collection, &selector, options).await
    }

    async fn count(&self, collection: Collection, selector: &Selector) -> Result<u64> {
        let selector = self.record("count", collection, selector, None)?;
        self.inner.count(collection, &selector).await
    }

    async fn ping(&self) -> Result<()> {
        self.operations.lock().expect("lock").push(StoreOp {
            kind: "ping",
            collection: None,
            filter: Value::Null,
            sort: None,
        });
        let failing = !self.failing.lock().expect("lock").is_empty();
        if failing {
            return Err(Error::storage("injected failure on ping"));
        }
        self.inner.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_and_injects_failures() {
        let store = TracingDocumentStore::new(crate::seeded_store());
        let selector = Selector::new().eq("_id", "123");

        assert_eq!(store.count(Collection::Datasets, &selector).await.unwrap(), 1);

        store.fail_on(Collection::Editions);
        assert!(store.count(Collection::Editions, &selector).await.is_err());
        assert!(store.ping().await.is_err());

        let ops = store.operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].filter, json!({"_id": "123"}));
        assert!(ops[0].sort.is_none());
        assert_eq!(
            store.queried_collections(),
            vec![Collection::Datasets, Collection::Editions]
        );
    }

    #[tokio::test]
    async fn test_records_sort_order() {
        let store = TracingDocumentStore::new(crate::seeded_store());
        let selector = Selector::new().eq("edition", "2017");

        let found = store
            .find_first(Collection::Instances, &selector, &Sort::descending("version"))
            .await
            .expect("find_first");
        assert!(found.is_some());
        assert_eq!(store.operations()[0].sort, Some(json!({"version": -1})));
    }

    #[tokio::test]
    async fn test_ignored_condition_over_matches() {
        let store = TracingDocumentStore::new(crate::seeded_store());
        let selector = Selector::new().eq("_id", "123").eq("current.state", "nope");
        assert_eq!(store.count(Collection::Datasets, &selector).await.unwrap(), 0);

        store.ignore_condition("current.state");
        assert_eq!(store.count(Collection::Datasets, &selector).await.unwrap(), 1);
        // The recorded filter is the one the caller sent.
        assert_eq!(
            store.operations()[1].filter,
            json!({"_id": "123", "current.state": "nope"})
        );
    }
}
