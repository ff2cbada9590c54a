//! Version API routes.
//!
//! ## Routes
//!
//! - `GET /datasets/{dataset_id}/editions/{edition}/versions` - List versions of an edition
//! - `GET /datasets/{dataset_id}/editions/{edition}/versions/{version}` - Get a version

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use ftb_catalog::{ResultList, Version};

use crate::context::RequestContext;
use crate::error::{ApiErrorBody, ApiResult};
use crate::server::AppState;

/// Creates version routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/datasets/:dataset_id/editions/:edition/versions",
            get(list_versions),
        )
        .route(
            "/datasets/:dataset_id/editions/:edition/versions/:version",
            get(get_version),
        )
}

/// List versions of an edition.
///
/// GET /datasets/{dataset_id}/editions/{edition}/versions
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}/editions/{edition}/versions",
    tag = "versions",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("edition" = String, Path, description = "Edition name"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Visible versions, ordered by number", body = ResultList<Version>),
        (status = 404, description = "Dataset, edition or versions not found", body = ApiErrorBody),
        (status = 500, description = "A listed version is in an invalid state", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_versions(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path((dataset_id, edition)): Path<(String, String)>,
) -> ApiResult<Json<ResultList<Version>>> {
    let versions = state
        .reader
        .list_versions(&dataset_id, &edition, &ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        dataset_id = %dataset_id,
        edition = %edition,
        count = versions.count,
        "listed versions"
    );
    Ok(Json(versions))
}

/// Get a version.
///
/// GET /datasets/{dataset_id}/editions/{edition}/versions/{version}
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}/editions/{edition}/versions/{version}",
    tag = "versions",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("edition" = String, Path, description = "Edition name"),
        ("version" = String, Path, description = "Version number, starting at 1"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Version found", body = Version),
        (status = 400, description = "Malformed version number", body = ApiErrorBody),
        (status = 404, description = "Dataset, edition or version not found", body = ApiErrorBody),
        (status = 500, description = "Version is in an invalid state", body = ApiErrorBody),
    )
)]
pub(crate) async fn get_version(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path((dataset_id, edition, version)): Path<(String, String, String)>,
) -> ApiResult<Json<Version>> {
    let found = state
        .reader
        .get_version(&dataset_id, &edition, &version, &ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        dataset_id = %dataset_id,
        edition = %edition,
        version = %version,
        "got version"
    );
    Ok(Json(found))
}
