//! Dimension API routes.
//!
//! ## Routes
//!
//! - `GET .../versions/{version}/dimensions` - List dimensions of a version
//! - `GET .../versions/{version}/dimensions/{dimension}/options` - Page through a dimension's options

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use ftb_catalog::{Dimension, DimensionOption, Page, PagedResultList, ResultList};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiErrorBody, ApiResult};
use crate::server::AppState;

/// Paging parameters for option listings.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Number of options to skip. Defaults to 0.
    pub offset: Option<u64>,
    /// Maximum number of options to return. Defaults to 20, at most 1000.
    pub limit: Option<u64>,
}

/// Creates dimension routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/datasets/:dataset_id/editions/:edition/versions/:version/dimensions",
            get(list_dimensions),
        )
        .route(
            "/datasets/:dataset_id/editions/:edition/versions/:version/dimensions/:dimension/options",
            get(list_dimension_options),
        )
}

/// List dimensions of a version.
///
/// GET /datasets/{dataset_id}/editions/{edition}/versions/{version}/dimensions
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}/editions/{edition}/versions/{version}/dimensions",
    tag = "dimensions",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("edition" = String, Path, description = "Edition name"),
        ("version" = String, Path, description = "Version number, starting at 1"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
    ),
    responses(
        (status = 200, description = "Dimensions of the version", body = ResultList<Dimension>),
        (status = 400, description = "Malformed version number", body = ApiErrorBody),
        (status = 404, description = "Ancestor or dimensions not found", body = ApiErrorBody),
        (status = 500, description = "Version is in an invalid state", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_dimensions(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path((dataset_id, edition, version)): Path<(String, String, String)>,
) -> ApiResult<Json<ResultList<Dimension>>> {
    let dimensions = state
        .reader
        .list_dimensions(&dataset_id, &edition, &version, &ctx.visibility)
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        dataset_id = %dataset_id,
        edition = %edition,
        version = %version,
        count = dimensions.count,
        "listed dimensions"
    );
    Ok(Json(dimensions))
}

/// List one page of a dimension's options.
///
/// GET /datasets/{dataset_id}/editions/{edition}/versions/{version}/dimensions/{dimension}/options
#[utoipa::path(
    get,
    path = "/datasets/{dataset_id}/editions/{edition}/versions/{version}/dimensions/{dimension}/options",
    tag = "dimensions",
    params(
        ("dataset_id" = String, Path, description = "Dataset id"),
        ("edition" = String, Path, description = "Edition name"),
        ("version" = String, Path, description = "Version number, starting at 1"),
        ("dimension" = String, Path, description = "Dimension name"),
        ("state" = Option<String>, Query, description = "Narrow to one version state (private endpoints only)"),
        PageParams,
    ),
    responses(
        (status = 200, description = "One page of options, ordered by code", body = PagedResultList<DimensionOption>),
        (status = 400, description = "Malformed version number or paging parameters", body = ApiErrorBody),
        (status = 404, description = "Ancestor or dimension not found", body = ApiErrorBody),
        (status = 500, description = "Version is in an invalid state", body = ApiErrorBody),
    )
)]
pub(crate) async fn list_dimension_options(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path((dataset_id, edition, version, dimension)): Path<(String, String, String, String)>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<PagedResultList<DimensionOption>>> {
    let Query(params) = params.map_err(|e| {
        ApiError::bad_request(format!("invalid paging parameters: {e}"))
            .with_request_id(ctx.request_id.clone())
    })?;
    let page = Page::new(params.offset, params.limit).map_err(|err| ctx.reject(err))?;

    let options = state
        .reader
        .list_dimension_options(
            &dataset_id,
            &edition,
            &version,
            &dimension,
            &ctx.visibility,
            page,
        )
        .await
        .map_err(|err| ctx.reject(err))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        dataset_id = %dataset_id,
        edition = %edition,
        version = %version,
        dimension = %dimension,
        count = options.count,
        total_count = options.total_count,
        "listed dimension options"
    );
    Ok(Json(options))
}
