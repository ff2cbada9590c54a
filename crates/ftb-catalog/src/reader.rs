//! Read operations over the catalog.
//!
//! Every operation checks its ancestors first, in order dataset → edition →
//! version, and stops at the first one that is missing. Version documents are
//! state-checked before they are returned. Listing cursors are consumed by
//! [`collect_with`], which drops them before any validation runs.

use std::fmt;
use std::sync::Arc;

use ftb_core::store::collect_with;
use ftb_core::{Collection, Document, DocumentStore, FindOptions, Sort};
use serde::de::DeserializeOwned;

use crate::error::{CatalogError, Result};
use crate::metadata::{Metadata, compose_metadata, select_dataset_variant};
use crate::model::{
    Dataset, DatasetDocument, Dimension, DimensionLinks, DimensionOption, Edition,
    EditionDocument, LinkObject, PagedResultList, ResultList, Version,
};
use crate::state::{VersionState, check_all, check_visible};
use crate::url::PublicUrlBuilder;
use crate::versions::{next_version, parse_version_number};
use crate::visibility::{Visibility, dimension_options};

/// Offset and limit of a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: u64,
    limit: u64,
}

impl Page {
    /// Page size when none is requested.
    pub const DEFAULT_LIMIT: u64 = 20;
    /// Largest page size accepted.
    pub const MAX_LIMIT: u64 = 1000;

    /// Builds a page from optional query values.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidParameter` if the limit exceeds
    /// [`Page::MAX_LIMIT`].
    pub fn new(offset: Option<u64>, limit: Option<u64>) -> Result<Self> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if limit > Self::MAX_LIMIT {
            return Err(CatalogError::invalid_parameter(format!(
                "limit must not exceed {}",
                Self::MAX_LIMIT
            )));
        }
        Ok(Self {
            offset: offset.unwrap_or(0),
            limit,
        })
    }

    /// Offset of the first item.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of items.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Reads datasets, editions, versions and their metadata.
#[derive(Clone)]
pub struct CatalogReader {
    store: Arc<dyn DocumentStore>,
    urls: Arc<dyn PublicUrlBuilder>,
}

impl fmt::Debug for CatalogReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogReader")
            .field("store", &"<dyn DocumentStore>")
            .field("urls", &self.urls)
            .finish()
    }
}

impl CatalogReader {
    /// Creates a reader over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, urls: Arc<dyn PublicUrlBuilder>) -> Self {
        Self { store, urls }
    }

    /// Checks the underlying store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if the store ping fails.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await.map_err(Into::into)
    }

    /// Lists every dataset visible at the given visibility.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` on store or decode failure.
    #[tracing::instrument(skip(self))]
    pub async fn list_datasets(&self, visibility: &Visibility) -> Result<ResultList<Dataset>> {
        let cursor = self
            .store
            .find(
                Collection::Datasets,
                &visibility.datasets(),
                &FindOptions::default().sorted(Sort::ascending("_id")),
            )
            .await?;
        let documents: Vec<DatasetDocument> = collect_with(cursor, decode).await?;

        let items: Vec<_> = documents
            .into_iter()
            .filter_map(|d| d.variants.into_selected(visibility))
            .collect();
        tracing::debug!(count = items.len(), "listed datasets");
        Ok(ResultList::new(items))
    }

    /// Returns the visible variant of a dataset.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DatasetNotFound` if the dataset does not exist
    /// or has no variant at this visibility.
    #[tracing::instrument(skip(self))]
    pub async fn get_dataset(&self, dataset_id: &str, visibility: &Visibility) -> Result<Dataset> {
        let document = self
            .store
            .find_one(Collection::Datasets, &visibility.dataset(dataset_id))
            .await?
            .ok_or_else(|| dataset_not_found(dataset_id))?;

        decode::<DatasetDocument>(document)?
            .variants
            .into_selected(visibility)
            .ok_or_else(|| dataset_not_found(dataset_id))
    }

    /// Fails unless the dataset exists at the given visibility.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DatasetNotFound` if no dataset matches.
    pub async fn check_dataset_exists(&self, dataset_id: &str, visibility: &Visibility) -> Result<()> {
        let count = self
            .store
            .count(Collection::Datasets, &visibility.dataset(dataset_id))
            .await?;
        if count == 0 {
            return Err(dataset_not_found(dataset_id));
        }
        Ok(())
    }

    /// Fails unless the edition exists at the given visibility.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EditionNotFound` if no edition matches.
    pub async fn check_edition_exists(
        &self,
        dataset_id: &str,
        edition: &str,
        visibility: &Visibility,
    ) -> Result<()> {
        let count = self
            .store
            .count(Collection::Editions, &visibility.edition(dataset_id, edition))
            .await?;
        if count == 0 {
            tracing::warn!(dataset_id, edition, "edition not found");
            return Err(CatalogError::EditionNotFound);
        }
        Ok(())
    }

    /// Lists the visible editions of a dataset.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DatasetNotFound` if the dataset is missing and
    /// `CatalogError::EditionNotFound` if it has no visible editions.
    #[tracing::instrument(skip(self))]
    pub async fn list_editions(
        &self,
        dataset_id: &str,
        visibility: &Visibility,
    ) -> Result<ResultList<Edition>> {
        self.check_dataset_exists(dataset_id, visibility).await?;

        let cursor = self
            .store
            .find(
                Collection::Editions,
                &visibility.editions(dataset_id),
                &FindOptions::default(),
            )
            .await?;
        let documents: Vec<EditionDocument> = collect_with(cursor, decode).await?;

        let items: Vec<_> = documents
            .into_iter()
            .filter_map(|d| d.variants.into_selected(visibility))
            .collect();
        if items.is_empty() {
            tracing::warn!(dataset_id, "no editions found for dataset");
            return Err(CatalogError::EditionNotFound);
        }
        Ok(ResultList::new(items))
    }

    /// Returns the visible variant of an edition.
    ///
    /// # Errors
    ///
    /// Returns the not-found error of the first missing ancestor.
    #[tracing::instrument(skip(self))]
    pub async fn get_edition(
        &self,
        dataset_id: &str,
        edition: &str,
        visibility: &Visibility,
    ) -> Result<Edition> {
        self.check_dataset_exists(dataset_id, visibility).await?;

        let document = self
            .store
            .find_one(Collection::Editions, &visibility.edition(dataset_id, edition))
            .await?
            .ok_or(CatalogError::EditionNotFound)?;

        decode::<EditionDocument>(document)?
            .variants
            .into_selected(visibility)
            .ok_or(CatalogError::EditionNotFound)
    }

    /// Lists the visible versions of an edition, ordered by version number.
    ///
    /// Each version's self link is rewritten to its canonical version URL.
    /// One version with an invalid state fails the whole listing.
    ///
    /// # Errors
    ///
    /// Returns the not-found error of the first missing ancestor,
    /// `CatalogError::VersionNotFound` if no version is visible and
    /// `CatalogError::InvalidState` if any listed version is corrupt.
    #[tracing::instrument(skip(self))]
    pub async fn list_versions(
        &self,
        dataset_id: &str,
        edition: &str,
        visibility: &Visibility,
    ) -> Result<ResultList<Version>> {
        self.check_dataset_exists(dataset_id, visibility).await?;
        self.check_edition_exists(dataset_id, edition, visibility).await?;

        let cursor = self
            .store
            .find(
                Collection::Instances,
                &visibility.versions(dataset_id, edition),
                &FindOptions::default().sorted(Sort::ascending("version")),
            )
            .await?;
        let mut versions: Vec<Version> = collect_with(cursor, decode).await?;

        if versions.is_empty() {
            tracing::warn!(dataset_id, edition, "no versions found for edition");
            return Err(CatalogError::VersionNotFound);
        }

        check_all(versions.iter().map(|v| v.state.as_str()), visibility).inspect_err(|err| {
            tracing::error!(dataset_id, edition, error = %err, "listed version has an invalid state");
        })?;

        for version in &mut versions {
            version.rewrite_self_link();
        }
        tracing::debug!(dataset_id, edition, count = versions.len(), "listed versions");
        Ok(ResultList::new(versions))
    }

    /// Returns one version with its self link rewritten.
    ///
    /// # Errors
    ///
    /// Returns the not-found error of the first missing ancestor,
    /// `CatalogError::MalformedIdentifier` for a bad version number and
    /// `CatalogError::InvalidState` if the stored state is not legal here.
    #[tracing::instrument(skip(self))]
    pub async fn get_version(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
        visibility: &Visibility,
    ) -> Result<Version> {
        let (mut found, _) = self
            .resolve_version(dataset_id, edition, version, visibility)
            .await?;
        found.rewrite_self_link();
        Ok(found)
    }

    /// Composes the metadata document of a version.
    ///
    /// A published version is described by the published dataset variant,
    /// any other version by the draft.
    ///
    /// # Errors
    ///
    /// As [`CatalogReader::get_version`]; additionally
    /// `CatalogError::DatasetNotFound` if the dataset has no variant to
    /// describe the version with.
    #[tracing::instrument(skip(self))]
    pub async fn get_metadata(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
        visibility: &Visibility,
    ) -> Result<Metadata> {
        let document = self
            .store
            .find_one(
                Collection::Datasets,
                &Visibility::Unrestricted.dataset(dataset_id),
            )
            .await?
            .ok_or_else(|| dataset_not_found(dataset_id))?;
        let dataset: DatasetDocument = decode(document)?;
        if dataset.variants.select(visibility).is_none() {
            return Err(dataset_not_found(dataset_id));
        }

        self.check_edition_exists(dataset_id, edition, visibility).await?;
        let number = parse_version_number(version)?;
        let (found, state) = self
            .fetch_version(dataset_id, edition, number, visibility)
            .await?;

        let variant =
            select_dataset_variant(&dataset, state).ok_or_else(|| dataset_not_found(dataset_id))?;
        Ok(compose_metadata(variant, &found, self.urls.as_ref()))
    }

    /// Lists the dimensions of a version with links to their options.
    ///
    /// # Errors
    ///
    /// As [`CatalogReader::get_version`]; additionally
    /// `CatalogError::DimensionNotFound` if the version has no dimensions.
    #[tracing::instrument(skip(self))]
    pub async fn list_dimensions(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
        visibility: &Visibility,
    ) -> Result<ResultList<Dimension>> {
        let (found, _) = self
            .resolve_version(dataset_id, edition, version, visibility)
            .await?;
        if found.dimensions.is_empty() {
            tracing::warn!(dataset_id, edition, version, "version has no dimensions");
            return Err(CatalogError::DimensionNotFound);
        }

        let version_link =
            LinkObject::href(self.urls.api_version_url(dataset_id, edition, found.version));
        let items = found
            .dimensions
            .into_iter()
            .map(|mut dimension| {
                let code_list = dimension.links.take().and_then(|l| l.code_list);
                dimension.links = Some(DimensionLinks {
                    code_list,
                    options: Some(LinkObject::href(self.urls.dimension_options_url(
                        dataset_id,
                        edition,
                        found.version,
                        &dimension.name,
                    ))),
                    version: Some(version_link.clone()),
                });
                dimension
            })
            .collect();
        Ok(ResultList::new(items))
    }

    /// Lists one page of the options of a version's dimension, ordered by
    /// option code.
    ///
    /// # Errors
    ///
    /// As [`CatalogReader::get_version`]; additionally
    /// `CatalogError::DimensionNotFound` if the version has no such dimension.
    #[tracing::instrument(skip(self))]
    pub async fn list_dimension_options(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
        dimension: &str,
        visibility: &Visibility,
        page: Page,
    ) -> Result<PagedResultList<DimensionOption>> {
        let (found, _) = self
            .resolve_version(dataset_id, edition, version, visibility)
            .await?;
        if !found.dimensions.iter().any(|d| d.name == dimension) {
            tracing::warn!(dataset_id, edition, version, dimension, "dimension not found");
            return Err(CatalogError::DimensionNotFound);
        }

        let selector = dimension_options(&found.id, dimension);
        let total_count = self
            .store
            .count(Collection::DimensionOptions, &selector)
            .await?;
        let cursor = self
            .store
            .find(
                Collection::DimensionOptions,
                &selector,
                &FindOptions::default()
                    .sorted(Sort::ascending("option"))
                    .page(page.offset(), page.limit()),
            )
            .await?;
        let items: Vec<DimensionOption> = collect_with(cursor, decode).await?;

        Ok(PagedResultList {
            count: items.len(),
            items,
            offset: page.offset(),
            limit: page.limit(),
            total_count,
        })
    }

    /// Returns the number the next version of an edition should take.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` on store failure.
    #[tracing::instrument(skip(self))]
    pub async fn next_version(&self, dataset_id: &str, edition: &str) -> Result<u32> {
        next_version(self.store.as_ref(), dataset_id, edition).await
    }

    async fn resolve_version(
        &self,
        dataset_id: &str,
        edition: &str,
        version: &str,
        visibility: &Visibility,
    ) -> Result<(Version, VersionState)> {
        self.check_dataset_exists(dataset_id, visibility).await?;
        self.check_edition_exists(dataset_id, edition, visibility).await?;
        let number = parse_version_number(version)?;
        self.fetch_version(dataset_id, edition, number, visibility).await
    }

    async fn fetch_version(
        &self,
        dataset_id: &str,
        edition: &str,
        number: u32,
        visibility: &Visibility,
    ) -> Result<(Version, VersionState)> {
        let document = self
            .store
            .find_one(
                Collection::Instances,
                &visibility.version(dataset_id, edition, number),
            )
            .await?
            .ok_or_else(|| {
                tracing::warn!(dataset_id, edition, version = number, "version not found");
                CatalogError::VersionNotFound
            })?;
        let version: Version = decode(document)?;

        let state = check_visible(&version.state, visibility).inspect_err(|err| {
            tracing::error!(dataset_id, edition, version = number, error = %err, "version has an invalid state");
        })?;
        Ok((version, state))
    }
}

fn decode<T: DeserializeOwned>(document: Document) -> ftb_core::Result<T> {
    serde_json::from_value(document).map_err(Into::into)
}

fn dataset_not_found(dataset_id: &str) -> CatalogError {
    tracing::warn!(dataset_id, "dataset not found");
    CatalogError::DatasetNotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::new(None, None).unwrap();
        assert_eq!(page, Page::default());
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_rejects_oversized_limit() {
        assert!(Page::new(Some(0), Some(1000)).is_ok());
        assert!(matches!(
            Page::new(Some(0), Some(1001)),
            Err(CatalogError::InvalidParameter { .. })
        ));
    }
}
