//! Edition API routes.
//!
//! ## Routes
//!
//! - `GET /datasets/{dataset_id}/editions` - List editions of a dataset
//! - `GET /datasets/{dataset_id}/editions/{edition}` - Get an edition

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use ftb_catalog::{Edition, ResultList};

use crate::context::RequestContext;
use crate::error::{ApiErrorBody, ApiResult};
use crate::server::AppState;

/// Creates edition routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/datasets/:dataset_id/editions", get(list_editions))
        .route("/datasets/:dataset_id/editions/:edition", get(get_edition))
}

/// List editions of a dataset.
///
/// GET /datasets/{dataset_id}/editions
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}/editions",
    tag = "editions",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Visible editions", body = ResultList<Edition>),
        (status = 404, description = "Dataset or editions not found", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_editions(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(dataset_id): Path<String>,
) -> ApiResult<Json<ResultList<Edition>>> {
    let editions = state
        .reader
        .list_editions(&dataset_id, &ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        dataset_id = %dataset_id,
        count = editions.count,
        "listed editions"
    );
    Ok(Json(editions))
}

/// Get an edition.
///
/// GET /datasets/{dataset_id}/editions/{edition}
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}/editions/{edition}",
    tag = "editions",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("edition" = String, Path, description = "Edition name"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Edition found", body = Edition),
        (status = 404, description = "Dataset or edition not found", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn get_edition(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path((dataset_id, edition)): Path<(String, String)>,
) -> ApiResult<Json<Edition>> {
    let found = state
        .reader
        .get_edition(&dataset_id, &edition, &ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        dataset_id = %dataset_id,
        edition = %edition,
        "got edition"
    );
    Ok(Json(found))
}
