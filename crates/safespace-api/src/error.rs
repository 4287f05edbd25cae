//! Error-to-response mapping. Every error body is `{"detail": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use safespace_core::SafespaceError;

#[derive(Debug)]
pub struct ApiError(pub SafespaceError);

impl From<SafespaceError> for ApiError {
    fn from(err: SafespaceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            SafespaceError::ReportNotFound { id } => {
                (StatusCode::NOT_FOUND, format!("report {id} not found"))
            }
            SafespaceError::Validation { reason } => {
                (StatusCode::BAD_REQUEST, reason.clone())
            }
            SafespaceError::Crypto(e) => {
                tracing::error!(error = %e, "crypto failure surfaced to API");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "encryption error".to_string(),
                )
            }
            SafespaceError::Storage(e) => {
                tracing::error!(error = %e, "storage failure surfaced to API");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage error".to_string(),
                )
            }
            SafespaceError::Serialization(e) => {
                tracing::error!(error = %e, "serialization failure surfaced to API");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "serialization error".to_string(),
                )
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
