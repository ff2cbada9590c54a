//! Metrics middleware and instrumentation for the catalog API.
//!
//! Records:
//! - Request duration and throughput per route
//! - Resources refused for carrying an invalid state

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// ============================================================================
// Metric Names
// ============================================================================

/// API request duration histogram.
pub const API_REQUEST_DURATION: &str = "api_request_duration_seconds";

/// API request counter.
pub const API_REQUEST_TOTAL: &str = "api_request_total";

/// Counter of resources refused because their stored state is not legal.
pub const INVALID_STATE_REJECTIONS: &str = "invalid_state_rejections_total";

const UNMATCHED_ENDPOINT: &str = "unmatched";

// ============================================================================
// Prometheus Recorder
// ============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// Initializes the global metrics recorder with Prometheus exporter.
///
/// Safe to call multiple times; subsequent calls return the installed handle.
///
/// # Errors
///
/// Returns an error if another global recorder is already installed.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let _guard = INSTALL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_histogram!(API_REQUEST_DURATION, "Duration of API requests in seconds");
    describe_counter!(API_REQUEST_TOTAL, "Total number of API requests");
    describe_counter!(
        INVALID_STATE_REJECTIONS,
        "Total number of resources refused for an invalid stored state"
    );

    tracing::info!("Prometheus metrics recorder initialized");
    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Returns the global Prometheus handle, if initialized.
#[must_use]
pub fn prometheus_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// ============================================================================
// Metrics Middleware
// ============================================================================

pub(crate) fn endpoint_label<B>(request: &Request<B>) -> String {
    request.extensions().get::<MatchedPath>().map_or_else(
        || UNMATCHED_ENDPOINT.to_string(),
        |path| path.as_str().to_string(),
    )
}

/// Middleware that records request metrics.
///
/// Captures:
/// - `api_request_duration_seconds{endpoint, method, status_class}` - histogram of request durations
/// - `api_request_total{endpoint, method, status_class}` - counter of total requests
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = endpoint_label(&request);
    let method = request.method().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status_class = status_class(response.status());

    let labels = [
        ("endpoint", path.clone()),
        ("method", method.clone()),
        ("status_class", status_class.to_string()),
    ];

    histogram!(API_REQUEST_DURATION, &labels).record(duration);
    counter!(API_REQUEST_TOTAL, &labels).increment(1);

    if duration > 1.0 {
        tracing::warn!(
            endpoint = %path,
            method = %method,
            status = response.status().as_u16(),
            duration_secs = %duration,
            "Slow request detected"
        );
    }

    response
}

/// Returns the status class (2xx, 3xx, 4xx, 5xx) for a status code.
fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "unknown",
    }
}

// ============================================================================
// Metrics Endpoint
// ============================================================================

/// Handler for the `/metrics` endpoint.
///
/// Returns Prometheus-formatted metrics text.
pub async fn serve_metrics() -> impl IntoResponse {
    prometheus_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain; charset=utf-8")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

// ============================================================================
// Metric Recording Helpers
// ============================================================================

/// Records a resource refused for an invalid stored state.
pub fn record_invalid_state() {
    counter!(INVALID_STATE_REJECTIONS).increment(1);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::routing::get;
    use tower::Service;

    fn metric_lines<'a>(metrics: &'a str, name: &str) -> Vec<&'a str> {
        metrics
            .lines()
            .filter(|line| line.starts_with(name))
            .collect()
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(StatusCode::OK), "2xx");
        assert_eq!(status_class(StatusCode::MOVED_PERMANENTLY), "3xx");
        assert_eq!(status_class(StatusCode::NOT_FOUND), "4xx");
        assert_eq!(status_class(StatusCode::SERVICE_UNAVAILABLE), "5xx");
    }

    #[test]
    fn test_endpoint_label_unmatched() {
        let request = Request::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();
        assert_eq!(endpoint_label(&request), UNMATCHED_ENDPOINT);
    }

    #[test]
    fn test_init_metrics_is_idempotent() {
        let first = init_metrics().unwrap();
        let second = init_metrics().unwrap();
        record_invalid_state();
        assert!(!metric_lines(&first.render(), INVALID_STATE_REJECTIONS).is_empty());
        assert!(!metric_lines(&second.render(), INVALID_STATE_REJECTIONS).is_empty());
    }

    #[tokio::test]
    async fn test_request_metrics_use_route_template() {
        let handle = init_metrics().unwrap();
        let app = Router::new()
            .route("/datasets/:dataset_id", get(|| async { StatusCode::OK }))
            .route_layer(axum::middleware::from_fn(metrics_middleware));
        let request = Request::builder()
            .uri("/datasets/cpih01")
            .body(Body::empty())
            .unwrap();
        let mut service = app.into_service::<Body>();
        let _response = service.call(request).await.unwrap();
        let metrics = handle.render();
        let lines = metric_lines(&metrics, API_REQUEST_TOTAL);
        assert!(
            lines
                .iter()
                .any(|line| line.contains("endpoint=\"/datasets/:dataset_id\""))
        );
        assert!(!metrics.contains("endpoint=\"/datasets/cpih01\""));
    }
}
