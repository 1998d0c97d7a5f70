//! Blob store trait for pluggable file storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata supplied alongside a blob when it is written.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlobMetadata {
    /// Original file name as uploaded.
    pub file_name: String,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// Result of asking the blob store to release a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobDeleteOutcome {
    /// The blob existed and was removed.
    Deleted,
    /// No blob was found at that location.
    NotFound,
}

/// Trait for blob storage backends holding uploaded file payloads.
///
/// Implementations exist for the local filesystem and S3-compatible object
/// stores. The location handle returned by [`BlobStore::put`] is opaque to
/// everything except the store that produced it.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a blob under `key` and return its location handle.
    async fn put(&self, key: &str, data: Bytes, meta: &BlobMetadata) -> AppResult<String>;

    /// Read the blob at a location handle. `None` if it no longer exists.
    async fn get(&self, location: &str) -> AppResult<Option<Bytes>>;

    /// Release the blob at a location handle previously returned by `put`.
    async fn delete(&self, location: &str) -> AppResult<BlobDeleteOutcome>;
}
