//! Error handling - maps application failures onto the wire envelope.
//!
//! Everything except field validation is `{"message": ...}`; validation
//! failures are `{"errors": [{field, message}, ...]}`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use inkwell_shared::{ErrorResponse, FieldError, ValidationErrorResponse};
use std::fmt;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Internal(String),
    Validation(Vec<FieldError>),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{entity} not found"))
    }

    pub fn access_denied() -> Self {
        AppError::Forbidden("Access denied".to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => {
                write!(f, "Validation errors: {} field(s)", errors.len())
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(errors) => HttpResponse::build(self.status_code())
                .json(ValidationErrorResponse {
                    errors: errors.clone(),
                }),
            AppError::Internal(detail) => {
                // Detail stays server-side; the body is generic.
                tracing::error!("Internal error: {}", detail);
                HttpResponse::build(self.status_code()).json(ErrorResponse::new("Server error"))
            }
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => {
                HttpResponse::build(self.status_code()).json(ErrorResponse::new(msg.clone()))
            }
        }
    }
}

impl From<inkwell_core::error::RepoError> for AppError {
    fn from(err: inkwell_core::error::RepoError) -> Self {
        match err {
            inkwell_core::error::RepoError::NotFound => {
                AppError::NotFound("Resource not found".to_string())
            }
            inkwell_core::error::RepoError::Constraint(msg) => AppError::BadRequest(msg),
            inkwell_core::error::RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            inkwell_core::error::RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
