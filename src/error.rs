//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::BackendFailure;

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Internal error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("server startup failed: {message}")]
    Startup { message: String },

    #[error("invalid configuration: {field} = {value}")]
    Config { field: String, value: String },

    #[error("text generation failed: {reason:?}")]
    Generation { reason: BackendFailure },

    #[error("code execution failed: {reason:?}")]
    Execution { reason: BackendFailure },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced to HTTP callers
///
/// The chat/interview endpoints answer `{error, details?}`; the execution
/// endpoint keeps the original `{success: false, error, details?}` envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid client input on an interview endpoint
    BadRequest(String),
    /// Upstream text-generation backend failure
    Backend { error: String, details: String },
    /// Missing or invalid client input on the execution endpoint
    ExecutionBadRequest(String),
    /// Upstream sandbox failure that aborted the whole execution call
    ExecutionFailed { error: String, details: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Backend { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error, "details": details })),
            )
                .into_response(),
            ApiError::ExecutionBadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            ApiError::ExecutionFailed { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": error, "details": details })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::BadRequest("Message is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_error_status() {
        let response = ApiError::Backend {
            error: "generation backend unreachable".to_string(),
            details: "connection refused".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
