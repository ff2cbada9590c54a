//! API error types and HTTP response mapping.

use axum::Json;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::HeaderName;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use ftb_catalog::{CatalogError, ErrorClass};

use crate::context::REQUEST_ID_HEADER;

/// API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Standard JSON error response body.
#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable message (safe for clients).
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional request ID for correlation.
    pub request_id: Option<String>,
}

/// HTTP API error with stable machine-readable code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

impl ApiError {
    /// Returns an error response for invalid input.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Returns an error response for missing resources.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Returns an internal error response.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }

    /// Returns the response for a stored resource in a state it may not be in.
    #[must_use]
    pub fn invalid_state() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INVALID_STATE",
            "incorrect resource state",
        )
    }

    /// Returns an error response when the service cannot take the request.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            message,
        )
    }

    /// Attaches a request ID for correlation.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the human-readable error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the request ID, if one was attached.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            request_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = self.request_id;
        let mut response = (
            self.status,
            Json(ApiErrorBody {
                code: self.code.to_string(),
                message: self.message,
                request_id: request_id.clone(),
            }),
        )
            .into_response();

        if let Some(request_id) = request_id {
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
        }

        response
    }
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        match value.class() {
            ErrorClass::NotFound => Self::not_found(value.to_string()),
            ErrorClass::BadRequest => Self::bad_request(value.to_string()),
            ErrorClass::Internal => match value {
                CatalogError::InvalidState { state, expected } => {
                    crate::metrics::record_invalid_state();
                    tracing::error!(
                        state = %state,
                        expected = ?expected,
                        "refusing resource in invalid state"
                    );
                    Self::invalid_state()
                }
                other => {
                    tracing::error!(error = %other, "catalog store failure");
                    Self::internal("internal error")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftb_catalog::VersionState;

    #[test]
    fn not_found_family_maps_to_404() {
        for err in [
            CatalogError::DatasetNotFound,
            CatalogError::EditionNotFound,
            CatalogError::VersionNotFound,
            CatalogError::DimensionNotFound,
        ] {
            let message = err.to_string();
            let api = ApiError::from(err);
            assert_eq!(api.status(), StatusCode::NOT_FOUND);
            assert_eq!(api.code(), "NOT_FOUND");
            assert_eq!(api.message(), message);
        }
    }

    #[test]
    fn malformed_identifier_maps_to_400() {
        let api = ApiError::from(CatalogError::malformed("version must be a positive integer"));
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.code(), "BAD_REQUEST");
        assert!(api.message().contains("version must be a positive integer"));
    }

    #[test]
    fn invalid_state_hides_the_stored_value() {
        let api = ApiError::from(CatalogError::InvalidState {
            state: "gibberish".to_string(),
            expected: Some(VersionState::Published),
        });
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code(), "INVALID_STATE");
        assert!(!api.message().contains("gibberish"));
    }

    #[test]
    fn collaborator_failure_is_opaque() {
        let api = ApiError::from(CatalogError::Collaborator(ftb_core::Error::storage(
            "connection refused by 10.0.0.7",
        )));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code(), "INTERNAL");
        assert_eq!(api.message(), "internal error");
    }

    #[test]
    fn request_id_is_echoed_in_header() {
        let response = ApiError::not_found("dataset not found")
            .with_request_id("01HZX")
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("x-request-id header should be present");
        assert_eq!(header.to_str().unwrap(), "01HZX");
    }

    #[test]
    fn no_request_id_means_no_header() {
        let response = ApiError::internal("internal error").into_response();
        assert!(response.headers().get(REQUEST_ID_HEADER).is_none());
    }
}
