//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use vanish_core::error::{AppError, ErrorKind};
use vanish_core::result::AppResult;
use vanish_core::traits::storage::{BlobDeleteOutcome, BlobMetadata, BlobStore};

/// Blob store writing one file per blob under a root directory.
///
/// The location handle is the key relative to the root.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path within the root, refusing traversal.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let clean = key.trim_start_matches('/');
        let valid = !clean.is_empty()
            && clean
                .split('/')
                .all(|seg| !seg.is_empty() && seg != "." && seg != ".." && !seg.contains('\\'));
        if !valid {
            return Err(AppError::validation(format!("Invalid blob key: {key}")));
        }
        Ok(self.root.join(clean))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, key: &str, data: Bytes, meta: &BlobMetadata) -> AppResult<String> {
        let full_path = self.resolve(key)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write blob: {key}"), e)
        })?;

        debug!(key, file_name = %meta.file_name, bytes = data.len(), "Wrote blob");
        Ok(key.trim_start_matches('/').to_string())
    }

    async fn get(&self, location: &str) -> AppResult<Option<Bytes>> {
        let full_path = self.resolve(location)?;
        match fs::read(&full_path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read blob: {location}"),
                e,
            )),
        }
    }

    async fn delete(&self, location: &str) -> AppResult<BlobDeleteOutcome> {
        let full_path = self.resolve(location)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                // The per-content directory is only removed once empty.
                if let Some(parent) = full_path.parent() {
                    if parent != self.root {
                        let _ = fs::remove_dir(parent).await;
                    }
                }
                debug!(location, "Deleted blob");
                Ok(BlobDeleteOutcome::Deleted)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BlobDeleteOutcome::NotFound),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {location}"),
                e,
            )),
        }
    }
}
