//! Error handling module for the HTTP layer.
//!
//! Provides the application error type with mapping to HTTP status codes and
//! the `{success: false, ...}` response envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::service::ErrorKind;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const BACKEND_UNAVAILABLE: &str = "BACKEND_UNAVAILABLE";
    pub const MALFORMED_DATA: &str = "MALFORMED_DATA";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Request parsed but carries an unusable value
    Validation(String),
    /// Request could not be parsed
    BadRequest(String),
    /// Storage failed or is unreachable
    Backend(String),
    /// Stored data could not be decoded
    MalformedData(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::Backend(_) => codes::BACKEND_UNAVAILABLE,
            AppError::MalformedData(_) => codes::MALFORMED_DATA,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Backend(msg)
            | AppError::MalformedData(msg) => msg.clone(),
        }
    }

    /// Map a failed facade result onto an HTTP error.
    pub fn from_failure(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::InvalidInput => AppError::Validation(message),
            ErrorKind::BackendUnavailable => AppError::Backend(message),
            ErrorKind::MalformedStoredData => AppError::MalformedData(message),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<(ErrorKind, String)> for AppError {
    fn from((kind, message): (ErrorKind, String)) -> Self {
        AppError::from_failure(kind, message)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest("Invalid request".to_string())
    }
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            code: error.error_code().to_string(),
            message: error.message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds_map_to_statuses() {
        let cases = [
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::InvalidInput, StatusCode::BAD_REQUEST),
            (ErrorKind::BackendUnavailable, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorKind::MalformedStoredData, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in cases {
            assert_eq!(AppError::from_failure(kind, "x".to_string()).status_code(), status);
        }
    }
}
