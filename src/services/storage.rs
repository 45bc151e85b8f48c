//! Storage service
//!
//! Owns the upload directory and performs all filesystem operations against
//! it. Every client-supplied name passes through [`StorageService::resolve`],
//! so nothing outside the root is ever touched.

use crate::error::AppError;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Metadata for a file held in the storage directory
#[derive(Debug, Serialize, Clone)]
pub struct StoredFile {
    /// Base filename, unique within the storage directory
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Modification time as a Unix timestamp
    pub modified: Option<u64>,
}

/// Filesystem-backed file store rooted at a single directory
#[derive(Debug, Clone)]
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    /// Create a store rooted at `root`. The directory itself is created
    /// lazily on first upload.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client-supplied name to a path inside the storage root.
    ///
    /// Only a single normal path component is accepted: empty names,
    /// separators, `.`/`..`, and absolute paths are all rejected, so the
    /// result can never escape the root.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, AppError> {
        if name.is_empty() {
            return Err(AppError::InvalidFilename("empty filename".to_string()));
        }
        let candidate = Path::new(name);
        let mut components = candidate.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(candidate)),
            _ => Err(AppError::InvalidFilename(format!(
                "{} does not resolve inside the storage directory",
                name
            ))),
        }
    }

    /// Create a fresh destination file for `name`, creating the root (with
    /// parents) if it does not exist yet.
    ///
    /// Creation is exclusive, so concurrent uploads of the same name cannot
    /// clobber each other: at most one caller gets the file handle.
    pub async fn create(&self, name: &str) -> Result<(PathBuf, fs::File), AppError> {
        let path = self.resolve(name)?;
        fs::create_dir_all(&self.root)
            .await
            .map_err(AppError::CreateFailed)?;
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => AppError::AlreadyExists(name.to_string()),
                _ => AppError::CreateFailed(e),
            })?;
        Ok((path, file))
    }

    /// Stat a stored file by name
    pub async fn stat(&self, name: &str) -> Result<StoredFile, AppError> {
        let path = self.resolve(name)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| AppError::FileHandling(e.to_string()))?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs());
        Ok(StoredFile {
            name: name.to_string(),
            size: metadata.len(),
            modified,
        })
    }

    /// List the names of regular files directly under the root, sorted.
    ///
    /// An absent root reads as an empty store rather than an error.
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::ListFailed(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(AppError::ListFailed)? {
            let file_type = entry.file_type().await.map_err(AppError::ListFailed)?;
            if !file_type.is_file() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        names.sort();
        Ok(names)
    }

    /// Remove a stored file by name
    pub async fn remove(&self, name: &str) -> Result<(), AppError> {
        let path = self.resolve(name)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| AppError::DeleteFailed {
                name: name.to_string(),
                source: e,
            })
    }

    /// Best-effort cleanup of a partially written destination
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            warn!("failed to remove partial upload {}: {}", path.display(), e);
        }
    }
}
