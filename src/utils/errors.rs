//! Error handling
//!
//! Every failure the API can report, and how each one maps to an HTTP
//! response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// Application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error body returned by the API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl AppError {
    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = Some(self.code().to_string());
        let (status, error_response) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code,
                    },
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: e.to_string(),
                        details: Some(json!(e)),
                        code,
                    },
                )
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code,
                    },
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code,
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result alias for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Build a single-field validation error with a user-facing message
pub fn validation_error(field: &'static str, message: impl Into<String>) -> AppError {
    AppError::Validation(field_errors(vec![(field, message.into())]))
}

/// Collect several field failures into one `ValidationErrors`
pub fn field_errors(failures: Vec<(&'static str, String)>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for (field, message) in failures {
        add_field_error(&mut errors, field, message);
    }
    errors
}

/// Record a failure for `field` alongside any already collected
pub fn add_field_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    message: impl Into<String>,
) {
    let mut error = ValidationError::new("invalid");
    error.add_param(Cow::from("field"), &field);
    error.message = Some(Cow::from(message.into()));
    errors.add(field, error);
}

/// Not-found error for a resource id
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Bad request error
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
