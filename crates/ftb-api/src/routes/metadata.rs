//! Version metadata route.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use ftb_catalog::Metadata;

use crate::context::RequestContext;
use crate::error::{ApiErrorBody, ApiResult};
use crate::server::AppState;

/// Creates the metadata route.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/datasets/:dataset_id/editions/:edition/versions/:version/metadata",
        get(get_metadata),
    )
}

/// Get the composed metadata of a version.
///
/// GET /datasets/{dataset_id}/editions/{edition}/versions/{version}/metadata
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}/editions/{edition}/versions/{version}/metadata",
    tag = "versions",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("edition" = String, Path, description = "Edition name"),
        ("version" = String, Path, description = "Version number, starting at 1"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Metadata composed", body = Metadata),
        (status = 400, description = "Malformed version number", body = ApiErrorBody),
        (status = 404, description = "Dataset, edition or version not found", body = ApiErrorBody),
        (status = 500, description = "Version is in an invalid state", body = ApiErrorBody),
    )
)]
pub(crate) async fn get_metadata(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path((dataset_id, edition, version)): Path<(String, String, String)>,
) -> ApiResult<Json<Metadata>> {
    let metadata = state
        .reader
        .get_metadata(&dataset_id, &edition, &version, &ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        dataset_id = %dataset_id,
        edition = %edition,
        version = %version,
        "composed metadata"
    );
    Ok(Json(metadata))
}
