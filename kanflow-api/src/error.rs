/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate HTTP status code, and core errors convert via
/// `From<CoreError>` so handlers can use `?` directly on core operations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kanflow_core::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Request shape validation failures (400 with field details)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log the detail server-side, never leak it to the client
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ApiError::BadRequest(msg),
            CoreError::Authentication(msg) => ApiError::Unauthorized(msg),
            CoreError::Forbidden(msg) => ApiError::Forbidden(msg),
            CoreError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            CoreError::Database(e) => ApiError::InternalError(e.to_string()),
            CoreError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Converts `validator` derive failures into a 400 with per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| ValidationErrorDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_status_mapping() {
        let cases: Vec<(CoreError, StatusCode)> = vec![
            (CoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                CoreError::Authentication("x".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (CoreError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (CoreError::NotFound("board"), StatusCode::NOT_FOUND),
            (CoreError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                CoreError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_internal_error_does_not_leak_detail() {
        let api_err = ApiError::InternalError("secret connection string".to_string());
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
