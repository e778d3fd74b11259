//! HTTP error mapping
//!
//! Every failure leaves the handler as an `ApiError`. The response body is
//! always `{"status": "error", "message": ...}`; storage detail never reaches
//! the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Request handling errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed body, missing or blank field, missing query parameter
    #[error("{0}")]
    Validation(String),

    /// `test_id` already stored
    #[error("test_id already exists")]
    DuplicateKey,

    /// Storage failure; the cause is kept for the log only
    #[error("Internal server error")]
    Internal { reason: String },
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateKey => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Underlying cause for internal errors
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Internal { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateKey(_) => ApiError::DuplicateKey,
            other => ApiError::Internal {
                reason: other.to_string(),
            },
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            status: "error",
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
