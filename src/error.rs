//! Error types for the library server

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable status of the error envelope
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message, with storage details hidden
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Re-labels a unique-constraint conflict with a domain message.
    pub fn on_unique(self, msg: &str) -> Self {
        match self {
            AppError::Conflict(ref detail) if detail == UNIQUE_VIOLATION => {
                AppError::Conflict(msg.to_string())
            }
            other => other,
        }
    }

    /// Re-labels a referential-integrity conflict with a domain message.
    pub fn on_referenced(self, msg: &str) -> Self {
        match self {
            AppError::Conflict(ref detail) if detail == FOREIGN_KEY_VIOLATION => {
                AppError::Conflict(msg.to_string())
            }
            other => other,
        }
    }

    /// Turns a referential-integrity failure on insert/update into NotFound:
    /// the row being pointed at does not exist.
    pub fn on_missing_reference(self, msg: &str) -> Self {
        match self {
            AppError::Conflict(ref detail) if detail == FOREIGN_KEY_VIOLATION => {
                AppError::NotFound(msg.to_string())
            }
            other => other,
        }
    }
}

const UNIQUE_VIOLATION: &str = "Record already exists";
const FOREIGN_KEY_VIOLATION: &str = "Record is referenced by other records";

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return AppError::Conflict(UNIQUE_VIOLATION.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::Conflict(FOREIGN_KEY_VIOLATION.to_string());
            }
            if db_err.is_check_violation() {
                return AppError::Validation(format!(
                    "Constraint violated: {}",
                    db_err.constraint().unwrap_or("check")
                ));
            }
        }
        AppError::Database(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::debug!("Request failed: {}", other),
        }

        let body = Json(ErrorResponse {
            status: "error".to_string(),
            message: self.message(),
        });

        (self.status_code(), body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
