//! Unified Error Handling
//!
//! Provides the application-wide error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`ApiResponse`] - success envelope `{status, data}`
//! - failure envelope `{status, error: {code, message, fields?}}`

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// Success response envelope
///
/// ```json
/// { "status": 200, "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Error body nested under `error` in failure responses
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    status: u16,
    error: ErrorBody,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication / Authorization Errors ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Conflict on {field}: {message}")]
    ConflictField { field: String, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Generic credential failure for login.
    ///
    /// Unknown username and wrong password map to the same error so the
    /// endpoint cannot be used to enumerate accounts.
    pub fn invalid_credentials() -> Self {
        Self::NotFound("invalid username or password".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
                None,
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            AppError::ConflictField { field, message } => {
                (StatusCode::CONFLICT, "conflict", message, Some(vec![field]))
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = axum::Json(ErrorEnvelope {
            status: status.as_u16(),
            error: ErrorBody {
                code: code.to_string(),
                message,
                fields,
            },
        });

        if status == StatusCode::UNAUTHORIZED {
            // 401 responses always carry a challenge header
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(field) => AppError::ConflictField {
                message: format!("{field} already exists"),
                field,
            },
            RepoError::ForeignKey(field) => AppError::ConflictField {
                message: format!("unknown {field}"),
                field,
            },
            RepoError::InsufficientStock => AppError::Conflict(
                "a product does not exist or lacks sufficient stock at this location".to_string(),
            ),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

use super::extract::Json;

/// Create a 200 response with the standard envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { status: 200, data })
}

/// Create a 201 response with the standard envelope
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse { status: 201, data }))
}
