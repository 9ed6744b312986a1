// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mergington_common::ErrorResponse;
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Directory(DirectoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Directory(
                DirectoryError::AlreadyRegistered { .. }
                | DirectoryError::NotRegistered { .. }
                | DirectoryError::ActivityFull { .. },
            )
            | AppError::Validation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Directory(DirectoryError::NotFound(_)) => "ACT_001",
            AppError::Directory(DirectoryError::AlreadyRegistered { .. }) => "ACT_002",
            AppError::Directory(DirectoryError::NotRegistered { .. }) => "ACT_003",
            AppError::Directory(DirectoryError::ActivityFull { .. }) => "ACT_004",
            AppError::Directory(DirectoryError::DuplicateActivity(_)) => "ACT_005",
            AppError::Directory(DirectoryError::DuplicateParticipant { .. }) => "ACT_006",
            AppError::Validation(_) => "VAL_001",
            AppError::BadRequest(_) => "VAL_002",
            AppError::Config(_) => "CFG_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Message for the `detail` field.
    ///
    /// Client errors are reported verbatim. Server errors keep their cause
    /// only in debug builds.
    pub fn detail(&self) -> String {
        if self.status_code().is_client_error() || cfg!(debug_assertions) {
            self.to_string()
        } else {
            "Internal server error".to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = ErrorResponse {
            detail: self.detail(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
