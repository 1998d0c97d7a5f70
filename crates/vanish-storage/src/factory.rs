//! Blob store construction from configuration.

use std::sync::Arc;

use tracing::info;

use vanish_core::config::storage::StorageConfig;
use vanish_core::error::AppError;
use vanish_core::result::AppResult;
use vanish_core::traits::storage::BlobStore;

use crate::providers::LocalBlobStore;

/// Build the blob store named by `storage.provider`.
pub async fn build_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    match config.provider.as_str() {
        "local" => {
            info!(root = %config.local.root_path, "Using local blob store");
            Ok(Arc::new(LocalBlobStore::new(&config.local.root_path).await?))
        }
        #[cfg(feature = "s3")]
        "s3" => Ok(Arc::new(
            crate::providers::S3BlobStore::new(&config.s3).await?,
        )),
        #[cfg(not(feature = "s3"))]
        "s3" => Err(AppError::configuration(
            "storage.provider = \"s3\" requires the `s3` feature",
        )),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: {other}"
        ))),
    }
}
