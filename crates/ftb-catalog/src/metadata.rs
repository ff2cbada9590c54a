//! Metadata composition.
//!
//! A [`Metadata`] document is a per-request projection of one dataset variant
//! and one version. It is never stored. Composition is pure: the same inputs
//! always produce the same document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    Alert, ContactDetails, Dataset, DatasetDocument, Dimension, DownloadList, DownloadObject,
    GeneralDetails, IsBasedOn, LatestChange, LinkObject, Publisher, Table, TemporalFrequency,
    UsageNote, Version,
};
use crate::state::VersionState;
use crate::url::PublicUrlBuilder;

/// Links of a composed metadata document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetadataLinks {
    /// Access rights, from the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_rights: Option<LinkObject>,
    /// This metadata document.
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<LinkObject>,
    /// Geography, from the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<LinkObject>,
    /// Canonical version URL, from the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<LinkObject>,
    /// Version page on the public website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_version: Option<LinkObject>,
}

/// Public description of a version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    /// Alerts, from the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<Alert>>,
    /// Contacts, from the dataset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ContactDetails>,
    /// Description, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Dimensions, from the version.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    /// Available output formats. Always starts with `json`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distribution: Vec<DistributionFormat>,
    /// Download files with internal addresses removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<DownloadList>,
    /// FTB dataset type, from the version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ftb_type: String,
    /// Sources, from the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_based_on: Option<Vec<IsBasedOn>>,
    /// Keywords, from the dataset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Changes since the previous version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_changes: Option<Vec<LatestChange>>,
    /// License, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    /// Rewritten links.
    pub links: MetadataLinks,
    /// Methodologies, from the dataset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methodologies: Vec<GeneralDetails>,
    /// National statistic flag, from the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_statistic: Option<bool>,
    /// Next release, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_release: String,
    /// Publications, from the dataset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<GeneralDetails>,
    /// Publisher, from the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    /// Quality and methodology information, from the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmi: Option<GeneralDetails>,
    /// Related datasets, from the dataset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_datasets: Vec<GeneralDetails>,
    /// Release date, from the version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_date: String,
    /// Release frequency, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub release_frequency: String,
    /// Tables, from the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    /// Temporal coverage, from the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<Vec<TemporalFrequency>>,
    /// Theme, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub theme: String,
    /// Title, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Version type.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Unit of measure, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit_of_measure: String,
    /// Canonical URI, from the dataset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Usage notes, from the version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_notes: Option<Vec<UsageNote>>,
}

/// An output format a version is available in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DistributionFormat {
    /// Always available through the API.
    Json,
    /// CSV download.
    Csv,
    /// CSV on the Web metadata.
    Csvw,
    /// Excel download.
    Xls,
}

/// Lists the formats a version can be obtained in.
///
/// `json` comes first, followed by each download whose `href` is set, in the
/// fixed order csv, csvw, xls.
#[must_use]
pub fn distribution(downloads: Option<&DownloadList>) -> Vec<DistributionFormat> {
    let mut formats = vec![DistributionFormat::Json];
    let Some(downloads) = downloads else {
        return formats;
    };

    let available = |file: &Option<DownloadObject>| file.as_ref().is_some_and(|f| !f.href.is_empty());
    if available(&downloads.csv) {
        formats.push(DistributionFormat::Csv);
    }
    if available(&downloads.csvw) {
        formats.push(DistributionFormat::Csvw);
    }
    if available(&downloads.xls) {
        formats.push(DistributionFormat::Xls);
    }
    formats
}

/// Picks the dataset variant that describes a version.
///
/// A published version is described by the published dataset; anything else
/// by the draft. Returns `None` when the version is published but the dataset
/// has no published variant.
#[must_use]
pub fn select_dataset_variant(dataset: &DatasetDocument, version_state: VersionState) -> Option<&Dataset> {
    if version_state == VersionState::Published {
        dataset.variants.current.as_ref()
    } else {
        Some(&dataset.variants.next)
    }
}

/// Merges a dataset variant and a version into a metadata document.
///
/// Never fails and performs no I/O.
#[must_use]
pub fn compose_metadata(dataset: &Dataset, version: &Version, urls: &dyn PublicUrlBuilder) -> Metadata {
    let mut links = MetadataLinks {
        access_rights: dataset
            .links
            .as_ref()
            .and_then(|l| l.access_rights.clone()),
        ..MetadataLinks::default()
    };

    if let Some(version_links) = &version.links {
        links.self_link = version_links
            .version
            .as_ref()
            .filter(|v| !v.href.is_empty())
            .map(|v| LinkObject::href(format!("{}/metadata", v.href)));
        links.spatial.clone_from(&version_links.spatial);
        links.version.clone_from(&version_links.version);
        links.website_version = Some(LinkObject::href(urls.website_version_url(
            &dataset.id,
            version.edition_link_id(),
            version.version,
        )));
    }

    let distribution = distribution(version.downloads.as_ref());
    let downloads = version.downloads.clone().map(strip_internal_addresses);

    Metadata {
        alerts: version.alerts.clone(),
        contacts: dataset.contacts.clone(),
        description: dataset.description.clone(),
        dimensions: version.dimensions.clone(),
        distribution,
        downloads,
        ftb_type: version.ftb_type.clone(),
        is_based_on: version.is_based_on.clone(),
        keywords: dataset.keywords.clone(),
        latest_changes: version.latest_changes.clone(),
        license: dataset.license.clone(),
        links,
        methodologies: dataset.methodologies.clone(),
        national_statistic: dataset.national_statistic,
        next_release: dataset.next_release.clone(),
        publications: dataset.publications.clone(),
        publisher: dataset.publisher.clone(),
        qmi: dataset.qmi.clone(),
        related_datasets: dataset.related_datasets.clone(),
        release_date: version.release_date.clone(),
        release_frequency: dataset.release_frequency.clone(),
        tables: version.tables.clone(),
        temporal: version.temporal.clone(),
        theme: dataset.theme.clone(),
        title: dataset.title.clone(),
        kind: version.kind.clone(),
        unit_of_measure: dataset.unit_of_measure.clone(),
        uri: dataset.uri.clone(),
        usage_notes: version.usage_notes.clone(),
    }
}

fn strip_internal_addresses(mut downloads: DownloadList) -> DownloadList {
    for file in [&mut downloads.csv, &mut downloads.csvw, &mut downloads.xls]
        .into_iter()
        .flatten()
    {
        file.public.clear();
        file.private.clear();
    }
    downloads
}
