//! File management API handlers
//!
//! HTTP endpoints for uploading, listing, and deleting stored files.
//! Uses the storage service layer for filesystem logic and translates
//! outcomes into the legacy response envelope.

use crate::error::AppError;
use crate::services::StoredFile;
use crate::state::AppState;
use axum::{
    extract::{multipart::Field, Multipart, State},
    response::Json,
    Form,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Success envelope returned by mutating routes
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Envelope code; `0` on success
    pub code: u16,
    /// Human-readable status line
    pub msg: String,
}

impl StatusResponse {
    fn ok(msg: String) -> Self {
        Self { code: 0, msg }
    }
}

/// Delete request form body
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    /// Name of the stored file to remove
    pub filename: String,
}

/// POST /upload - Store one multipart-uploaded file
///
/// Expects a form field named `file` carrying a filename. The upload is
/// streamed chunk-by-chunk into an exclusively created destination, so a
/// duplicate name is rejected without touching the existing file.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<StatusResponse>, AppError> {
    match store_upload(&state, multipart).await {
        Ok(stored) => {
            let line = format!(
                "Upload time: {}, Size: {}KB, Name: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                stored.size / 1024,
                stored.name
            );
            info!(name = %stored.name, size = stored.size, "file stored");
            state.notifier.notify(&line).await;
            Ok(Json(StatusResponse::ok(line)))
        }
        Err(err) => Err(state.report(err).await),
    }
}

/// GET /files - List stored filenames as a JSON array
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    match state.storage.list().await {
        Ok(names) => Ok(Json(names)),
        Err(err) => Err(state.report(err).await),
    }
}

/// POST /delete - Remove a stored file by name
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Form(request): Form<DeleteRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    match state.storage.remove(&request.filename).await {
        Ok(()) => {
            info!(name = %request.filename, "file deleted");
            Ok(Json(StatusResponse::ok(format!(
                "deleted {} successfully",
                request.filename
            ))))
        }
        Err(err) => Err(state.report(err).await),
    }
}

/// Walk the multipart form until the `file` field is found, then persist it.
async fn store_upload(state: &AppState, mut multipart: Multipart) -> Result<StoredFile, AppError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| AppError::MissingUpload(e.to_string()))?;
        let Some(mut field) = field else {
            return Err(AppError::MissingUpload("no file field in form".to_string()));
        };
        if field.name() != Some("file") {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::MissingUpload("file field has no filename".to_string()))?;

        let (path, mut dest) = state.storage.create(&name).await?;
        if let Err(err) = copy_field(&mut field, &mut dest).await {
            state.storage.discard(&path).await;
            return Err(err);
        }
        return state.storage.stat(&name).await;
    }
}

/// Copy the upload stream into the destination file
async fn copy_field(field: &mut Field<'_>, dest: &mut fs::File) -> Result<(), AppError> {
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::FileHandling(e.to_string()))?
    {
        dest.write_all(&chunk)
            .await
            .map_err(|e| AppError::FileHandling(e.to_string()))?;
    }
    dest.flush()
        .await
        .map_err(|e| AppError::FileHandling(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::LogNotifier;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn create_test_state(storage_dir: PathBuf) -> Arc<AppState> {
        Arc::new(AppState::new(
            PathBuf::from("./templates"),
            storage_dir,
            Arc::new(LogNotifier),
        ))
    }

    #[tokio::test]
    async fn test_list_files_empty_directory() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let state = create_test_state(temp_dir.path().to_path_buf());

        let result = list_files(State(state)).await;
        assert!(result.is_ok());
        assert!(result.unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn test_list_files_returns_stored_names() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        let state = create_test_state(temp_dir.path().to_path_buf());

        let result = list_files(State(state)).await;
        assert_eq!(
            result.unwrap().0,
            vec!["a.txt".to_string(), "b.txt".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_file_success_envelope() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("a.txt"), "hello").unwrap();
        let state = create_test_state(temp_dir.path().to_path_buf());

        let request = DeleteRequest {
            filename: "a.txt".to_string(),
        };
        let result = delete_file(State(state.clone()), Form(request)).await;
        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.code, 0);
        assert_eq!(response.msg, "deleted a.txt successfully");

        // File is gone from subsequent listings
        let listed = list_files(State(state)).await.unwrap();
        assert!(listed.0.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_file_fails() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let state = create_test_state(temp_dir.path().to_path_buf());

        let request = DeleteRequest {
            filename: "missing.txt".to_string(),
        };
        let result = delete_file(State(state), Form(request)).await;
        match result.unwrap_err() {
            AppError::DeleteFailed { name, .. } => assert_eq!(name, "missing.txt"),
            other => panic!("Expected DeleteFailed error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let state = create_test_state(temp_dir.path().to_path_buf());

        let request = DeleteRequest {
            filename: "../escape.txt".to_string(),
        };
        let result = delete_file(State(state), Form(request)).await;
        assert!(matches!(
            result.unwrap_err(),
            AppError::InvalidFilename(_)
        ));
    }
}
