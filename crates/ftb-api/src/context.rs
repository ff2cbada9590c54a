//! Request context extraction.
//!
//! Every catalog request carries a request id (taken from `X-Request-Id` or
//! generated) and a [`Visibility`]. With private endpoints disabled the
//! visibility is always published-only; with them enabled a caller may narrow
//! it through the `state` query parameter.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{FromRequestParts, Query, State};
use axum::http::header::HeaderName;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use ulid::Ulid;

use ftb_catalog::{CatalogError, Visibility};

use crate::error::ApiError;
use crate::server::AppState;

/// Header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request context derived from configuration, headers and query.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing/correlation.
    pub request_id: String,
    /// Which variant of each resource this request may see.
    pub visibility: Visibility,
}

impl RequestContext {
    /// Converts a catalog failure into an API error tagged with this request.
    #[must_use]
    pub fn reject(&self, err: CatalogError) -> ApiError {
        ApiError::from(err).with_request_id(self.request_id.clone())
    }
}

#[derive(Debug, Deserialize)]
struct StateQuery {
    state: Option<String>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(existing) = parts.extensions.get::<Self>() {
            return Ok(existing.clone());
        }

        let request_id =
            request_id_from_headers(&parts.headers).unwrap_or_else(|| Ulid::new().to_string());

        let visibility = if state.config.enable_private_endpoints {
            let Query(query) = Query::<StateQuery>::try_from_uri(&parts.uri).map_err(|e| {
                ApiError::bad_request(format!("invalid query string: {e}"))
                    .with_request_id(request_id.clone())
            })?;
            Visibility::from_query(query.state.as_deref()).map_err(|e| {
                ApiError::bad_request(e.to_string()).with_request_id(request_id.clone())
            })?
        } else {
            Visibility::published()
        };

        let ctx = Self {
            request_id,
            visibility,
        };

        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

pub(crate) fn request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Request context middleware.
///
/// Resolves the [`RequestContext`] once, stores it in request extensions and
/// echoes the request id on the response.
pub async fn context_middleware(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let ctx = match RequestContext::from_request_parts(&mut parts, &state).await {
        Ok(ctx) => ctx,
        Err(err) => return err.into_response(),
    };

    let mut req = Request::from_parts(parts, body);
    let request_id = ctx.request_id.clone();
    req.extensions_mut().insert(ctx);

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
