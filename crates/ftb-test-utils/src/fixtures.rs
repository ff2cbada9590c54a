//! The standard catalog fixture and document builders.
//!
//! The fixture holds three datasets:
//!
//! | Dataset | Published | Edition | Versions |
//! |---------|-----------|---------|----------|
//! | `123` | yes (draft pending) | `2017` | 1 `published`, 2 `created` |
//! | `456` | never | `2018` (draft only) | 1 `edition-confirmed` |
//! | `789` | yes | `2019` | 1 `published`, 2 with a corrupt state |

use ftb_core::{Collection, Document, MemoryDocumentStore};
use serde_json::json;

/// Raw JSON of the standard fixture, in seed file layout.
pub const CATALOG_FIXTURE: &str = include_str!("../fixtures/catalog.json");

/// Published dataset with a pending draft.
pub const DATASET_ID: &str = "123";
/// Edition of [`DATASET_ID`].
pub const EDITION: &str = "2017";
/// Internal id of version 1 of [`EDITION`].
pub const PUBLISHED_INSTANCE_ID: &str = "i-123-2017-1";
/// Dataset that has never been published.
pub const UNPUBLISHED_DATASET_ID: &str = "456";
/// Draft edition of [`UNPUBLISHED_DATASET_ID`].
pub const UNPUBLISHED_EDITION: &str = "2018";
/// Published dataset whose edition holds a version with a corrupt state.
pub const CORRUPT_DATASET_ID: &str = "789";
/// Edition of [`CORRUPT_DATASET_ID`].
pub const CORRUPT_EDITION: &str = "2019";

/// Returns an in-memory store loaded with the standard fixture.
pub fn seeded_store() -> MemoryDocumentStore {
    MemoryDocumentStore::from_json_str(CATALOG_FIXTURE).expect("catalog fixture is valid")
}

/// Builds a dataset document. `current_state` of `None` means never published.
pub fn dataset_document(id: &str, current_state: Option<&str>, next_state: &str) -> Document {
    let variant = |state: &str| json!({"id": id, "state": state, "title": format!("Dataset {id}")});
    let mut document = json!({"_id": id, "next": variant(next_state)});
    if let Some(state) = current_state {
        document["current"] = variant(state);
    }
    document
}

/// Builds an edition document. `current_state` of `None` means never published.
pub fn edition_document(
    dataset_id: &str,
    edition: &str,
    current_state: Option<&str>,
    next_state: &str,
) -> Document {
    let id = format!("e-{dataset_id}-{edition}");
    let variant = |state: &str| {
        json!({
            "id": id,
            "edition": edition,
            "state": state,
            "links": {"dataset": {"id": dataset_id}}
        })
    };
    let mut document = json!({"id": id, "next": variant(next_state)});
    if let Some(state) = current_state {
        document["current"] = variant(state);
    }
    document
}

/// Builds a version document with canonical and instance links.
pub fn version_document(dataset_id: &str, edition: &str, version: u32, state: &str) -> Document {
    let id = format!("i-{dataset_id}-{edition}-{version}");
    json!({
        "id": id,
        "edition": edition,
        "version": version,
        "state": state,
        "links": {
            "dataset": {"id": dataset_id},
            "edition": {"id": edition},
            "self": {"href": format!("http://localhost:10400/instances/{id}"), "id": id},
            "version": {
                "href": format!("http://localhost:10400/datasets/{dataset_id}/editions/{edition}/versions/{version}"),
                "id": version.to_string()
            }
        }
    })
}

/// Inserts a published dataset and edition with the given version states,
/// numbered from 1.
pub fn insert_edition_with_versions(
    store: &MemoryDocumentStore,
    dataset_id: &str,
    edition: &str,
    states: &[&str],
) {
    store
        .insert(
            Collection::Datasets,
            dataset_document(dataset_id, Some("published"), "published"),
        )
        .expect("insert dataset");
    store
        .insert(
            Collection::Editions,
            edition_document(dataset_id, edition, Some("published"), "published"),
        )
        .expect("insert edition");
    for (index, state) in states.iter().enumerate() {
        let number = u32::try_from(index + 1).expect("version number fits in u32");
        store
            .insert(
                Collection::Instances,
                version_document(dataset_id, edition, number, state),
            )
            .expect("insert version");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_parses() {
        let _ = seeded_store();
    }

    #[test]
    fn test_builders_omit_current_when_unpublished() {
        let document = dataset_document("1", None, "created");
        assert!(document.get("current").is_none());
        assert_eq!(document["next"]["state"], "created");

        let document = edition_document("1", "2020", Some("published"), "published");
        assert_eq!(document["current"]["links"]["dataset"]["id"], "1");
    }
}
