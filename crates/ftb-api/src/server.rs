//! API server implementation.
//!
//! Provides health, ready, metrics and catalog endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{BoxError, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use ulid::Ulid;

use ftb_catalog::CatalogReader;
use ftb_core::{DocumentStore, MemoryDocumentStore, Result};

use crate::config::{Config, CorsConfig};
use crate::context::{REQUEST_ID_HEADER, request_id_from_headers};
use crate::error::ApiError;

// ============================================================================
// Health and Ready Responses
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ReadyResponse {
    /// Service readiness status.
    pub ready: bool,
    /// Optional message about readiness state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Catalog reader over the configured store.
    pub reader: CatalogReader,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("reader", &self.reader)
            .finish()
    }
}

impl AppState {
    /// Creates application state over a document store.
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let reader = CatalogReader::new(store, Arc::new(config.url_builder()));
        Self { config, reader }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint handler.
///
/// Returns 200 OK if the service is alive. This is a shallow check
/// that doesn't verify dependencies.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness check endpoint handler.
///
/// Returns 200 OK once the document store answers a ping.
async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.reader.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                message: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    message: Some("document store unavailable".to_string()),
                }),
            )
        }
    }
}

async fn serve_openapi() -> impl IntoResponse {
    Json(crate::openapi::openapi())
}

async fn fallback(headers: HeaderMap) -> ApiError {
    ApiError::not_found("resource not found").with_request_id(request_id_or_new(&headers))
}

async fn handle_middleware_error(headers: HeaderMap, err: BoxError) -> ApiError {
    let request_id = request_id_or_new(&headers);
    if err.is::<Elapsed>() {
        tracing::warn!(request_id = %request_id, "request timed out");
        ApiError::service_unavailable("request timed out").with_request_id(request_id)
    } else {
        tracing::error!(request_id = %request_id, error = %err, "unhandled middleware error");
        ApiError::internal("internal error").with_request_id(request_id)
    }
}

fn request_id_or_new(headers: &HeaderMap) -> String {
    request_id_from_headers(headers).unwrap_or_else(|| Ulid::new().to_string())
}

// ============================================================================
// Server
// ============================================================================

/// The catalog API server.
pub struct Server {
    config: Config,
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("store", &"<DocumentStore>")
            .finish()
    }
}

impl Server {
    /// Creates a new server with the given configuration.
    ///
    /// Defaults to an empty in-memory store; use `with_store` to serve data.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: Arc::new(MemoryDocumentStore::new()),
        }
    }

    /// Creates a new server over an explicit document store.
    #[must_use]
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    /// Creates a new `ServerBuilder`.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates the router with all routes and middleware.
    fn create_router(&self) -> Router {
        let state = Arc::new(AppState::new(self.config.clone(), Arc::clone(&self.store)));

        let cors = self.build_cors_layer();
        let context_layer =
            middleware::from_fn_with_state(Arc::clone(&state), crate::context::context_middleware);
        let metrics_layer = middleware::from_fn(crate::metrics::metrics_middleware);

        let limits = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .option_layer(self.config.concurrency_limit.map(GlobalConcurrencyLimitLayer::new))
            .option_layer(
                self.config
                    .request_timeout_secs
                    .map(|secs| TimeoutLayer::new(Duration::from_secs(secs))),
            );

        Router::new()
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/metrics", get(crate::metrics::serve_metrics))
            .route("/openapi.json", get(serve_openapi))
            .merge(crate::routes::catalog_routes().route_layer(context_layer))
            .fallback(fallback)
            // Order matters: metrics outermost for timing, then trace, CORS, limits.
            .layer(limits)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .layer(metrics_layer)
            .with_state(state)
    }

    /// Builds the CORS layer from configuration.
    fn build_cors_layer(&self) -> CorsLayer {
        let cors_config = &self.config.cors;
        let cors = Self::build_cors_base(cors_config);
        Self::apply_cors_allowed_origins(cors, cors_config)
    }

    fn build_cors_base(cors_config: &CorsConfig) -> CorsLayer {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::HeaderName::from_static(REQUEST_ID_HEADER),
            ])
            .expose_headers([
                header::CONTENT_TYPE,
                header::CONTENT_LENGTH,
                header::HeaderName::from_static(REQUEST_ID_HEADER),
            ])
            .max_age(Duration::from_secs(cors_config.max_age_seconds))
    }

    fn cors_allows_any_origin(cors_config: &CorsConfig) -> bool {
        cors_config.allowed_origins.len() == 1
            && cors_config
                .allowed_origins
                .first()
                .is_some_and(|origin| origin == "*")
    }

    fn parse_cors_origins(cors_config: &CorsConfig) -> Vec<HeaderValue> {
        let mut allowed = Vec::new();
        for origin in &cors_config.allowed_origins {
            if origin == "*" {
                tracing::error!("CORS wildcard mixed with explicit origins; ignoring '*'");
                continue;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => allowed.push(value),
                Err(_) => {
                    tracing::error!(
                        origin = %origin,
                        "Invalid CORS origin; expected a valid HeaderValue"
                    );
                }
            }
        }
        allowed
    }

    fn apply_cors_allowed_origins(cors: CorsLayer, cors_config: &CorsConfig) -> CorsLayer {
        if cors_config.allowed_origins.is_empty() {
            return cors;
        }

        if Self::cors_allows_any_origin(cors_config) {
            return cors.allow_origin(Any);
        }

        let allowed = Self::parse_cors_origins(cors_config);
        if allowed.is_empty() {
            tracing::warn!("All configured CORS origins were invalid; disabling CORS");
            cors
        } else {
            tracing::info!(origins = ?cors_config.allowed_origins, "CORS configured");
            cors.allow_origin(AllowOrigin::list(allowed))
        }
    }

    /// Starts the server and blocks until shutdown.
    ///
    /// On SIGINT or SIGTERM the server stops accepting connections and gives
    /// in-flight requests the configured drain timeout before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the server cannot
    /// bind to its address.
    pub async fn serve(&self) -> Result<()> {
        self.validate_config()?;

        if let Err(e) = crate::metrics::init_metrics() {
            tracing::warn!(error = %e, "Prometheus recorder unavailable; /metrics disabled");
        }

        let addr = self.config.bind_addr;
        let router = self.create_router();

        tracing::info!(
            addr = %addr,
            private_endpoints = self.config.enable_private_endpoints,
            "Starting dataset API server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ftb_core::Error::internal(format!("failed to bind to {addr}: {e}")))?;

        let stop = Arc::new(tokio::sync::Notify::new());
        let stopped = Arc::clone(&stop);
        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { stopped.notified().await })
                .await
        });

        tokio::select! {
            joined = &mut server => return flatten_server_result(joined),
            () = shutdown_signal() => {}
        }

        let drain = Duration::from_secs(self.config.graceful_shutdown_timeout_secs);
        tracing::info!(drain_secs = drain.as_secs(), "Shutdown signal received; draining");
        stop.notify_one();

        if let Ok(joined) = tokio::time::timeout(drain, &mut server).await {
            flatten_server_result(joined)
        } else {
            tracing::warn!(
                drain_secs = drain.as_secs(),
                "Graceful shutdown timed out; dropping in-flight requests"
            );
            server.abort();
            Ok(())
        }
    }

    /// Creates a test router for the server.
    ///
    /// This is useful for integration tests where you want to test
    /// the routes without actually binding to a port.
    #[doc(hidden)]
    pub fn test_router(&self) -> Router {
        self.create_router()
    }

    fn validate_config(&self) -> Result<()> {
        if self.config.cors.allowed_origins.len() > 1
            && self
                .config
                .cors
                .allowed_origins
                .iter()
                .any(|origin| origin == "*")
        {
            return Err(ftb_core::Error::InvalidInput(
                "cors.allowed_origins: '*' must be the only allowed origin".to_string(),
            ));
        }
        Ok(())
    }
}

fn flatten_server_result(
    joined: std::result::Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ftb_core::Error::internal(format!("server error: {e}"))),
        Err(e) => Err(ftb_core::Error::internal(format!("server task failed: {e}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Builder for constructing a server.
pub struct ServerBuilder {
    config: Config,
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("config", &self.config)
            .field("store", &"<DocumentStore>")
            .finish()
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            store: Arc::new(MemoryDocumentStore::new()),
        }
    }
}

impl ServerBuilder {
    /// Creates a new server builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the HTTP listen address.
    #[must_use]
    pub fn bind_addr(mut self, addr: std::net::SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Exposes unpublished resources and the `state` query parameter.
    #[must_use]
    pub fn enable_private_endpoints(mut self, enabled: bool) -> Self {
        self.config.enable_private_endpoints = enabled;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    /// Caps the number of in-flight requests.
    #[must_use]
    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.config.concurrency_limit = Some(limit);
        self
    }

    /// Enables debug mode.
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Sets the document store read by request handlers.
    ///
    /// By default, the server uses an empty in-memory store.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = store;
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        Server {
            config: self.config,
            store: self.store,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
