//! `OpenAPI` (3.1) document generation for `ftb-api`.

use utoipa::OpenApi;

/// `OpenAPI` documentation for the catalog REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FTB Dataset API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Read-only catalog of datasets, editions, versions and dimensions"
    ),
    paths(
        crate::routes::datasets::list_datasets,
        crate::routes::datasets::get_dataset,
        crate::routes::editions::list_editions,
        crate::routes::editions::get_edition,
        crate::routes::versions::list_versions,
        crate::routes::versions::get_version,
        crate::routes::metadata::get_metadata,
        crate::routes::dimensions::list_dimensions,
        crate::routes::dimensions::list_dimension_options,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            ftb_catalog::VersionState,
            ftb_catalog::DistributionFormat,
        )
    ),
    tags(
        (name = "datasets", description = "Dataset operations"),
        (name = "editions", description = "Edition operations"),
        (name = "versions", description = "Version and metadata operations"),
        (name = "dimensions", description = "Dimension and option operations"),
    ),
)]
pub struct ApiDoc;

/// Returns the generated `OpenAPI` document.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Returns the generated `OpenAPI` document.serialized as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn openapi_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&openapi())
}
