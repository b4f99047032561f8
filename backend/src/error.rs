//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting domain and internal errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitness_progress_shared::ProgressError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::NotFound(user_id) => {
                ApiError::NotFound(format!("No progress recorded for user {}", user_id))
            }
            ProgressError::Validation(msg) => ApiError::Validation(msg),
            ProgressError::StorageUnavailable(msg) => ApiError::StorageUnavailable(msg),
            conflict @ ProgressError::ConcurrencyConflict { .. } => {
                ApiError::Conflict(conflict.to_string())
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONCURRENCY_CONFLICT", msg.clone()),
            ApiError::StorageUnavailable(msg) => {
                warn!("Storage unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_UNAVAILABLE",
                    "Progress storage is temporarily unavailable".to_string(),
                )
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
