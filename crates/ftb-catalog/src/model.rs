//! Catalog resource documents.
//!
//! Field names follow the stored JSON documents. Empty strings, empty lists
//! and absent objects are omitted on output so a document serializes back to
//! the shape it was stored in.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::visibility::Visibility;

/// A hyperlink to another resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LinkObject {
    /// Absolute URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Identifier of the linked resource.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

impl LinkObject {
    /// Creates a link with only an href.
    #[must_use]
    pub fn href(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            id: String::new(),
        }
    }
}

/// A resource holding a published snapshot and a draft.
///
/// `next` always exists and reflects the latest write. `current` is absent
/// until the first publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variants<T> {
    /// Last published snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<T>,
    /// Latest draft.
    pub next: T,
}

/// A variant that records its own publication state.
pub trait Stateful {
    /// Returns the stored state string.
    fn state(&self) -> &str;
}

impl<T: Stateful> Variants<T> {
    /// Selects the variant visible at the given visibility.
    ///
    /// Unrestricted reads see `next`. A read narrowed to a state sees
    /// `current` only when it exists and carries that state; there is no
    /// fallback to `next`.
    #[must_use]
    pub fn select(&self, visibility: &Visibility) -> Option<&T> {
        match visibility {
            Visibility::Unrestricted => Some(&self.next),
            Visibility::State(state) => self
                .current
                .as_ref()
                .filter(|current| current.state() == state.as_str()),
        }
    }

    /// Consumes the container, returning the visible variant.
    #[must_use]
    pub fn into_selected(self, visibility: &Visibility) -> Option<T> {
        match visibility {
            Visibility::Unrestricted => Some(self.next),
            Visibility::State(state) => self
                .current
                .filter(|current| current.state() == state.as_str()),
        }
    }
}

/// Contact details for a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactDetails {
    /// Email address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Contact name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Telephone number.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub telephone: String,
}

/// A titled, linked document such as a methodology or publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeneralDetails {
    /// Summary text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Link to the document.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

/// The organisation publishing a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Publisher {
    /// Link to the publisher.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Publisher name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Publisher type.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// Links held by a dataset variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DatasetLinks {
    /// Access rights statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_rights: Option<LinkObject>,
    /// Editions listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editions: Option<LinkObject>,
    /// Most recent version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<LinkObject>,
    /// This dataset.
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<LinkObject>,
    /// Taxonomy page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<LinkObject>,
}

/// One variant of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dataset {
    /// Dataset identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Publishing collection.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub collection_id: String,
    /// Contacts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ContactDetails>,
    /// Description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Search keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// License.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<DatasetLinks>,
    /// Methodology documents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methodologies: Vec<GeneralDetails>,
    /// Whether this is a national statistic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_statistic: Option<bool>,
    /// Next planned release.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_release: String,
    /// Publications.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<GeneralDetails>,
    /// Publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    /// Quality and methodology information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmi: Option<GeneralDetails>,
    /// Related datasets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_datasets: Vec<GeneralDetails>,
    /// Release frequency.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_frequency: String,
    /// Publication state of this variant.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    /// Theme.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub theme: String,
    /// Title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Dataset type.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// FTB dataset type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ftb_type: String,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit_of_measure: String,
    /// Canonical URI.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
}

impl Stateful for Dataset {
    fn state(&self) -> &str {
        &self.state
    }
}

/// A stored dataset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDocument {
    /// Dataset identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Published and draft variants.
    #[serde(flatten)]
    pub variants: Variants<Dataset>,
}

/// Links held by an edition variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EditionLinks {
    /// Parent dataset; `id` holds the dataset identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<LinkObject>,
    /// Most recent version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<LinkObject>,
    /// This edition.
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<LinkObject>,
    /// Versions listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<LinkObject>,
}

/// One variant of an edition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Edition {
    /// Edition identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Edition label, unique within its dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub edition: String,
    /// Publication state of this variant.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<EditionLinks>,
}

impl Stateful for Edition {
    fn state(&self) -> &str {
        &self.state
    }
}

/// A stored edition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionDocument {
    /// Edition identifier.
    pub id: String,
    /// Published and draft variants.
    #[serde(flatten)]
    pub variants: Variants<Edition>,
}

/// A notice attached to a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Alert {
    /// When the alert was raised.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    /// Alert text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Alert type (e.g. `correction`).
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// A source a version is derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IsBasedOn {
    /// Source type.
    #[serde(default, rename = "@type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Source identifier.
    #[serde(default, rename = "@id", skip_serializing_if = "String::is_empty")]
    pub id: String,
}

/// A change since the previous version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LatestChange {
    /// What changed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Short name of the change.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Change type.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// A table published with a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Table {
    /// Table identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Table title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Link to the table.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
}

/// Temporal coverage of a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TemporalFrequency {
    /// First period covered.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub start_date: String,
    /// Last period covered.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_date: String,
    /// Observation frequency.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub frequency: String,
}

/// A usage note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UsageNote {
    /// Note title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Note text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// A downloadable file.
///
/// `public` and `private` are internal storage addresses; only `href` is ever
/// shown in composed metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadObject {
    /// Public download URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Private bucket address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private: String,
    /// Public bucket address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public: String,
    /// File size in bytes, as stored.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size: String,
}

/// Download files of a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadList {
    /// CSV file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<DownloadObject>,
    /// CSV on the Web metadata file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csvw: Option<DownloadObject>,
    /// Excel file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xls: Option<DownloadObject>,
}

/// Links held by a version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VersionLinks {
    /// Parent dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<LinkObject>,
    /// Dimensions listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<LinkObject>,
    /// Parent edition; `id` holds the edition label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<LinkObject>,
    /// This resource.
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<LinkObject>,
    /// Geography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<LinkObject>,
    /// Canonical version URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<LinkObject>,
    /// Version page on the public website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_version: Option<LinkObject>,
}

/// Links held by a dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DimensionLinks {
    /// Code list describing the dimension's codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_list: Option<LinkObject>,
    /// Options listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LinkObject>,
    /// Owning version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<LinkObject>,
}

/// A named axis of a version (e.g. `age`, `sex`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Dimension {
    /// Code list identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Dimension name, unique within the version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Display label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Link to the code list.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Dimension category.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<DimensionLinks>,
    /// Count of distinct options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_options: Option<u64>,
}

/// A version of an edition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Version {
    /// Instance identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Publishing collection.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub collection_id: String,
    /// Alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    /// Dimensions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    /// Download files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<DownloadList>,
    /// Edition label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub edition: String,
    /// FTB dataset type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ftb_type: String,
    /// Source file headers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    /// Sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_based_on: Option<Vec<IsBasedOn>>,
    /// Changes since the previous version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_changes: Option<Vec<LatestChange>>,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<VersionLinks>,
    /// Release date.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_date: String,
    /// Lifecycle state as stored. Validated on every read.
    #[serde(default, deserialize_with = "stored_state")]
    pub state: String,
    /// Tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    /// Temporal coverage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<Vec<TemporalFrequency>>,
    /// Version type.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Usage notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_notes: Option<Vec<UsageNote>>,
    /// Version number, unique and increasing within the edition.
    pub version: u32,
}

/// Reads a stored state of any JSON type as text so that state validation,
/// not decoding, rejects it. `null` reads as the empty string.
fn stored_state<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(state) => state,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl Version {
    /// Points `links.self` at the canonical version URL.
    pub fn rewrite_self_link(&mut self) {
        if let Some(links) = self.links.as_mut() {
            if let Some(version) = &links.version {
                let href = version.href.clone();
                links.self_link.get_or_insert_with(LinkObject::default).href = href;
            }
        }
    }

    /// Returns the edition link identifier, or an empty string.
    #[must_use]
    pub fn edition_link_id(&self) -> &str {
        self.links
            .as_ref()
            .and_then(|l| l.edition.as_ref())
            .map_or("", |e| e.id.as_str())
    }
}

/// Links held by a dimension option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DimensionOptionLinks {
    /// The option's code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<LinkObject>,
    /// The code list containing the code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_list: Option<LinkObject>,
    /// Owning version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<LinkObject>,
}

/// One value a dimension can take.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DimensionOption {
    /// Owning instance.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance_id: String,
    /// Dimension name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Option code.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub option: String,
    /// Display label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<DimensionOptionLinks>,
}

/// A list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultList<T> {
    /// Items.
    pub items: Vec<T>,
    /// Number of items.
    pub count: usize,
}

impl<T> ResultList<T> {
    /// Wraps items, counting them.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

/// A paged list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PagedResultList<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Number of items in this page.
    pub count: usize,
    /// Offset of the first item.
    pub offset: u64,
    /// Requested page size.
    pub limit: u64,
    /// Number of matching items across all pages.
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::VersionState;
    use serde_json::json;

    fn dataset(state: &str) -> Dataset {
        Dataset {
            id: "123".into(),
            state: state.into(),
            ..Dataset::default()
        }
    }

    #[test]
    fn test_unpublished_resource_has_no_published_variant() {
        let variants = Variants {
            current: None,
            next: dataset("created"),
        };
        assert!(variants.select(&Visibility::published()).is_none());
        assert_eq!(
            variants.select(&Visibility::Unrestricted).map(|d| d.state.as_str()),
            Some("created")
        );
    }

    #[test]
    fn test_select_requires_matching_current_state() {
        let variants = Variants {
            current: Some(dataset("published")),
            next: dataset("associated"),
        };
        assert_eq!(
            variants.select(&Visibility::published()).map(|d| d.state.as_str()),
            Some("published")
        );
        assert!(
            variants
                .select(&Visibility::State(VersionState::Associated))
                .is_none()
        );
    }

    #[test]
    fn test_dataset_document_decodes_from_stored_shape() {
        let doc: DatasetDocument = serde_json::from_value(json!({
            "_id": "123",
            "next": {"id": "123", "state": "created", "title": "CPIH"}
        }))
        .unwrap();

        assert_eq!(doc.id, "123");
        assert!(doc.variants.current.is_none());
        assert_eq!(doc.variants.next.title, "CPIH");
    }

    #[test]
    fn test_dataset_document_requires_next() {
        let result = serde_json::from_value::<DatasetDocument>(json!({
            "_id": "123",
            "current": {"state": "published"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_version_state_of_any_type_decodes_as_text() {
        let decode = |state: serde_json::Value| {
            serde_json::from_value::<Version>(json!({"version": 1, "state": state}))
                .unwrap()
                .state
        };

        assert_eq!(decode(json!("published")), "published");
        assert_eq!(decode(json!(null)), "");
        assert_eq!(decode(json!(3)), "3");
        assert_eq!(decode(json!(["published"])), r#"["published"]"#);
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let value = serde_json::to_value(Dataset {
            id: "123".into(),
            ..Dataset::default()
        })
        .unwrap();
        assert_eq!(value, json!({"id": "123"}));
    }

    #[test]
    fn test_rewrite_self_link_copies_version_href() {
        let mut version = Version {
            links: Some(VersionLinks {
                self_link: Some(LinkObject {
                    href: "http://internal/instances/abc".into(),
                    id: "abc".into(),
                }),
                version: Some(LinkObject::href("http://api/datasets/123/editions/2017/versions/1")),
                ..VersionLinks::default()
            }),
            ..Version::default()
        };
        version.rewrite_self_link();

        let links = version.links.unwrap();
        let self_link = links.self_link.unwrap();
        assert_eq!(self_link.href, "http://api/datasets/123/editions/2017/versions/1");
        assert_eq!(self_link.id, "abc");
    }

    #[test]
    fn test_rewrite_self_link_without_version_link_is_noop() {
        let mut version = Version::default();
        version.rewrite_self_link();
        assert!(version.links.is_none());
    }

    #[test]
    fn test_result_list_counts_items() {
        let list = ResultList::new(vec![1, 2, 3]);
        assert_eq!(list.count, 3);
    }
}
