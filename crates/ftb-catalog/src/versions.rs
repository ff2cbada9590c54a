//! Version numbering.
//!
//! Version numbers are strictly positive and append-only within an edition.
//! Computing the next number is a read of the current maximum; it takes no
//! lock. Two concurrent writers can observe the same maximum, so whoever
//! creates versions must serialize creation or enforce uniqueness on
//! `(links.dataset.id, edition, version)` in the store.

use ftb_core::{Collection, DocumentStore, Sort};

use crate::error::{CatalogError, Result};
use crate::visibility::version_scope;

/// Returns the number following the highest existing one, or 1.
///
/// ```rust
/// use ftb_catalog::versions::next_version_number;
///
/// assert_eq!(next_version_number(None), 1);
/// assert_eq!(next_version_number(Some(3)), 4);
/// ```
#[must_use]
pub const fn next_version_number(highest: Option<u32>) -> u32 {
    match highest {
        None => 1,
        Some(n) => n.saturating_add(1),
    }
}

/// Parses a version path segment.
///
/// # Errors
///
/// Returns `CatalogError::MalformedIdentifier` unless the segment is a
/// positive integer.
pub fn parse_version_number(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(CatalogError::malformed(format!(
            "version must be a positive integer, got {raw:?}"
        ))),
        Ok(n) => Ok(n),
    }
}

/// Reads the highest stored version number of an edition.
///
/// # Errors
///
/// Returns `CatalogError::Collaborator` if the store fails or the stored
/// version number is not a positive integer.
pub async fn highest_version(
    store: &dyn DocumentStore,
    dataset_id: &str,
    edition: &str,
) -> Result<Option<u32>> {
    let latest = store
        .find_first(
            Collection::Instances,
            &version_scope(dataset_id, edition),
            &Sort::descending("version"),
        )
        .await?;

    let Some(document) = latest else {
        return Ok(None);
    };
    document
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .map(Some)
        .ok_or_else(|| {
            CatalogError::Collaborator(ftb_core::Error::serialization(format!(
                "stored version number is not a positive integer for {dataset_id}/{edition}"
            )))
        })
}

/// Computes the number the next version of an edition should take.
///
/// # Errors
///
/// Propagates failures from [`highest_version`].
pub async fn next_version(
    store: &dyn DocumentStore,
    dataset_id: &str,
    edition: &str,
) -> Result<u32> {
    let highest = highest_version(store, dataset_id, edition).await?;
    Ok(next_version_number(highest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftb_core::MemoryDocumentStore;
    use proptest::prelude::*;
    use serde_json::json;

    fn store_with(versions: &[u32]) -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        for v in versions {
            store
                .insert(
                    Collection::Instances,
                    json!({"links": {"dataset": {"id": "123"}}, "edition": "2017", "version": v}),
                )
                .unwrap();
        }
        store
            .insert(
                Collection::Instances,
                json!({"links": {"dataset": {"id": "123"}}, "edition": "2018", "version": 40}),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_parse_version_number() {
        assert_eq!(parse_version_number("7").unwrap(), 7);
        for bad in ["0", "-1", "one", "", "1.5", "99999999999"] {
            assert!(
                matches!(
                    parse_version_number(bad),
                    Err(CatalogError::MalformedIdentifier { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_first_version_is_one() {
        let store = MemoryDocumentStore::new();
        assert_eq!(next_version(&store, "123", "2017").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_next_version_ignores_insertion_order() {
        let store = store_with(&[1, 3, 2]);
        assert_eq!(next_version(&store, "123", "2017").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_next_version_is_scoped_to_edition() {
        let store = store_with(&[1]);
        assert_eq!(next_version(&store, "123", "2017").await.unwrap(), 2);
        assert_eq!(next_version(&store, "456", "2017").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_version_number_is_collaborator_error() {
        let store = MemoryDocumentStore::new();
        store
            .insert(
                Collection::Instances,
                json!({"links": {"dataset": {"id": "123"}}, "edition": "2017", "version": "x"}),
            )
            .unwrap();
        let err = next_version(&store, "123", "2017").await.unwrap_err();
        assert!(matches!(err, CatalogError::Collaborator(_)));
    }

    proptest! {
        #[test]
        fn prop_next_is_max_plus_one(existing in proptest::collection::btree_set(1u32..10_000, 1..20)) {
            let numbers: Vec<u32> = existing.iter().rev().copied().collect();
            let store = store_with(&numbers);
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

            let next = runtime.block_on(next_version(&store, "123", "2017")).unwrap();
            prop_assert_eq!(next, existing.iter().max().unwrap() + 1);
        }
    }
}
