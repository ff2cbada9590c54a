//! HTTP route handlers.

pub mod datasets;
pub mod dimensions;
pub mod editions;
pub mod metadata;
pub mod versions;

use std::sync::Arc;

use axum::Router;

use crate::server::AppState;

/// Catalog routes, served under the request context middleware.
pub fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(datasets::routes())
        .merge(editions::routes())
        .merge(versions::routes())
        .merge(metadata::routes())
        .merge(dimensions::routes())
}
