//! Dataset API routes.
//!
//! ## Routes
//!
//! - `GET /datasets` - List datasets
//! - `GET /datasets/{dataset_id}` - Get a dataset

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use ftb_catalog::{Dataset, ResultList};

use crate::context::RequestContext;
use crate::error::{ApiErrorBody, ApiResult};
use crate::server::AppState;

/// Creates dataset routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/datasets", get(list_datasets))
        .route("/datasets/:dataset_id", get(get_dataset))
}

/// List datasets.
///
/// GET /datasets
#[utoipa::path(
    get,
    path = "/datasets",
    tag = "datasets",
    params(
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Visible datasets", body = ResultList<Dataset>),
        (status = 400, description = "Unknown state", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_datasets(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ResultList<Dataset>>> {
    let datasets = state
        .reader
        .list_datasets(&ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(request_id = %ctx.request_id, count = datasets.count, "listed datasets");
    Ok(Json(datasets))
}

/// Get a dataset.
///
/// GET /datasets/{dataset_id}
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}",
    tag = "datasets",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Dataset found", body = Dataset),
        (status = 404, description = "Dataset not found", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn get_dataset(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(dataset_id): Path<String>,
) -> ApiResult<Json<Dataset>> {
    let dataset = state
        .reader
        .get_dataset(&dataset_id, &ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(request_id = %ctx.request_id, dataset_id = %dataset_id, "got dataset");
    Ok(Json(dataset))
}
