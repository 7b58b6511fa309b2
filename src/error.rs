//! Domain error types for the portfolio server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but does not own the resource
    #[error("Forbidden")]
    Forbidden,

    /// Storage (S3) operation failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Storage(err_str) => {
                tracing::error!("Storage error: {}", err_str);
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden => actix_web::http::StatusCode::FORBIDDEN,
        };

        // Auth failures use a `message` field; everything else uses `error`.
        // Internal errors never expose the underlying cause to the client.
        let body = match self {
            AppError::Unauthorized(_) => ErrorResponse {
                ok: false,
                error: None,
                message: Some("Not Authorized".to_string()),
            },
            AppError::Database(_) | AppError::Storage(_) => ErrorResponse {
                ok: false,
                error: Some("Internal Server Error".to_string()),
                message: None,
            },
            AppError::NotFound(_) => ErrorResponse {
                ok: false,
                error: Some("Not found".to_string()),
                message: None,
            },
            AppError::Forbidden => ErrorResponse {
                ok: false,
                error: Some("Forbidden".to_string()),
                message: None,
            },
            AppError::InvalidInput(msg) => ErrorResponse {
                ok: false,
                error: Some(msg.clone()),
                message: None,
            },
        };

        HttpResponse::build(status).json(body)
    }
}

/// Error envelope matching the API's JSON convention.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.message) {
            (Some(e), _) => write!(f, "{}", e),
            (None, Some(m)) => write!(f, "{}", m),
            (None, None) => write!(f, "error"),
        }
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Invalid UUID: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Unauthorized("no token".into())
                .error_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden.error_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("Post".into()).error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidInput("Title and content are required".into())
                .error_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("connection reset".into())
                .error_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Storage("put failed".into())
                .error_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
