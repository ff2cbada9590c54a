//! Public URL construction.

/// Builds absolute URLs exposed in responses.
pub trait PublicUrlBuilder: Send + Sync + std::fmt::Debug {
    /// URL of a version's page on the public website.
    fn website_version_url(&self, dataset_id: &str, edition_id: &str, version: u32) -> String;

    /// URL of a version on the API.
    fn api_version_url(&self, dataset_id: &str, edition: &str, version: u32) -> String;

    /// URL of a dimension's options listing on the API.
    fn dimension_options_url(
        &self,
        dataset_id: &str,
        edition: &str,
        version: u32,
        dimension: &str,
    ) -> String {
        format!(
            "{}/dimensions/{dimension}/options",
            self.api_version_url(dataset_id, edition, version)
        )
    }
}

/// URL builder over configured base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    api_url: String,
    website_url: String,
}

impl UrlBuilder {
    /// Creates a builder. Trailing slashes on the bases are ignored.
    #[must_use]
    pub fn new(api_url: impl Into<String>, website_url: impl Into<String>) -> Self {
        let trim = |s: String| s.trim_end_matches('/').to_string();
        Self {
            api_url: trim(api_url.into()),
            website_url: trim(website_url.into()),
        }
    }
}

impl PublicUrlBuilder for UrlBuilder {
    fn website_version_url(&self, dataset_id: &str, edition_id: &str, version: u32) -> String {
        format!(
            "{}/datasets/{dataset_id}/editions/{edition_id}/versions/{version}",
            self.website_url
        )
    }

    fn api_version_url(&self, dataset_id: &str, edition: &str, version: u32) -> String {
        format!(
            "{}/datasets/{dataset_id}/editions/{edition}/versions/{version}",
            self.api_url
        )
    }
}
