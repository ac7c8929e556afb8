//! Error types for notekeep

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400) - bad notation, missing user id, bad image payload
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upstream transcription failure (502)
    #[error("Transcription failed: {0}")]
    Transcription(#[from] crate::services::TranscriptionError),

    /// Phrase store error (400 for precondition violations, 500 otherwise)
    #[error("Store error: {0}")]
    Store(#[from] crate::db::StoreError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Transcription(ref err) => {
                // Upstream details go to the trace, not the user.
                tracing::warn!(error = %err, "Sheet transcription failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "TRANSCRIPTION_FAILED",
                    "Could not transcribe the uploaded sheet".to_string(),
                )
            }
            ApiError::Store(crate::db::StoreError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            ApiError::Store(ref err) => {
                tracing::error!(error = %err, "Phrase store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Storage operation failed".to_string(),
                )
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
