//! WebServer-specific error types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shared::{ProcessId, SharedError, process_error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    Conflict(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Caller lacks the required role: {required}")]
    Forbidden { required: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Blocking task failed: {0}")]
    TaskJoin(String),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl WebServerError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::NotFound { .. } => StatusCode::NOT_FOUND,
            WebServerError::Validation { .. } | WebServerError::SharedError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            WebServerError::Conflict(_) => StatusCode::CONFLICT,
            WebServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebServerError::Forbidden { .. } => StatusCode::FORBIDDEN,
            WebServerError::Database(err) if is_constraint_violation(err) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// True for UNIQUE / FOREIGN KEY / CHECK failures raised by SQLite
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            process_error!(ProcessId::current(), "❌ Request failed: {}", self);
        }

        let mut body = json!({
            "status": "error",
            "message": self.to_string(),
        });
        if let WebServerError::Validation { field, .. } = &self {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;
