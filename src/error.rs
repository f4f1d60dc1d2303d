/// Unified error types for the PR mock
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the registry
#[derive(Error, Debug)]
pub enum PrError {
    /// Unknown person, or person without the identity an operation needs
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate person or identity identifier
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller supplied an unusable parameter
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error payload returned with 400 and 500 responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

/// Convert PrError to HTTP response
///
/// 404 and 409 carry no body, the way callers of the real registry expect.
impl IntoResponse for PrError {
    fn into_response(self) -> Response {
        match self {
            PrError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            PrError::Conflict(_) => StatusCode::CONFLICT.into_response(),
            PrError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    code: 0,
                    message: self.to_string(),
                }),
            )
                .into_response(),
            PrError::Internal(_) | PrError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    code: 0,
                    message: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// Result type alias for registry operations
pub type PrResult<T> = Result<T, PrError>;
