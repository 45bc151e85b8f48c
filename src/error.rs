//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to produce the JSON envelope clients
//! expect: `code` is `0` on success and `500` on any failure, with the reason
//! under the `error` key.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Body-level code carried by every failure envelope
const ENVELOPE_FAILURE: u16 = 500;

/// Application-level error types
///
/// All errors that can occur while handling a request are represented by this
/// enum. Each variant converts to an HTTP response via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Multipart form could not be parsed or carries no usable `file` field
    #[error("upload file not found: {0}")]
    MissingUpload(String),

    /// Filename does not resolve inside the storage directory
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// A stored file with the same name already exists
    #[error("{0} file already exists")]
    AlreadyExists(String),

    /// Destination file could not be created
    #[error("failed to create file: {0}")]
    CreateFailed(#[source] std::io::Error),

    /// Upload stream could not be read or copied to disk
    #[error("file handling error: {0}")]
    FileHandling(String),

    /// Stored file could not be removed
    #[error("failed to delete {name}: {source}")]
    DeleteFailed {
        /// Name the caller asked to remove
        name: String,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// Storage directory could not be listed
    #[error("failed to list files: {0}")]
    ListFailed(#[source] std::io::Error),

    /// Index template could not be read or rendered
    #[error("failed to render index template: {0}")]
    Template(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingUpload(_) | AppError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::DeleteFailed { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                StatusCode::NOT_FOUND
            }
            AppError::DeleteFailed { .. }
            | AppError::CreateFailed(_)
            | AppError::FileHandling(_)
            | AppError::ListFailed(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "code": ENVELOPE_FAILURE,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
