//! Content operations: create, read, metadata, delete.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use vanish_core::config::content::ContentConfig;
use vanish_core::error::AppError;
use vanish_core::result::AppResult;
use vanish_core::traits::{BlobDeleteOutcome, BlobMetadata, BlobStore};
use vanish_core::types::{DenyReason, ShortId};
use vanish_entity::{ContentKind, ContentRecord, FileMeta, NewContent, Payload};
use vanish_storage::{blob_key, mime};

use crate::access::{AccessDecision, decide, decide_download};
use crate::lifecycle::{DeleteCause, LifecycleEngine, SoftDeleteOutcome};

/// Largest accepted `maxViews`; view counters are stored as 32-bit signed
/// integers.
pub const MAX_VIEWS_LIMIT: u32 = i32::MAX as u32;

/// A file received from an uploader.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: Option<String>,
    /// File bytes.
    pub data: Bytes,
}

/// Request to create new content.
#[derive(Debug, Clone)]
pub struct CreateContentRequest {
    /// Text or file.
    pub kind: ContentKind,
    /// Text body, for `text`.
    pub text: Option<String>,
    /// Uploaded file, for `file`.
    pub file: Option<UploadedFile>,
    /// Optional access password.
    pub password: Option<String>,
    /// One-time view.
    pub one_time_view: bool,
    /// Optional view budget.
    pub max_views: Option<u32>,
    /// Requested expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CreateContentRequest {
    /// A plain text request with defaults for every policy.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            text: Some(content.into()),
            file: None,
            password: None,
            one_time_view: false,
            max_views: None,
            expires_at: None,
        }
    }
}

/// File bytes handed to a downloader.
#[derive(Debug, Clone)]
pub struct FileDownload {
    /// Original file name.
    pub name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// File bytes.
    pub data: Bytes,
}

/// What a recipient may learn before committing a view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    /// Record id.
    pub short_id: ShortId,
    /// Content kind.
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// File name, for file content.
    pub file_name: Option<String>,
    /// Whether a password must be supplied.
    pub requires_password: bool,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the expiry has passed.
    pub is_expired: bool,
    /// Whether a read would currently be allowed (password aside).
    pub can_view: bool,
}

/// Orchestrates the lifecycle engine, the access guard and the blob store.
#[derive(Debug, Clone)]
pub struct ContentService {
    engine: Arc<LifecycleEngine>,
    blobs: Arc<dyn BlobStore>,
    policy: ContentConfig,
    max_upload_bytes: u64,
}

impl ContentService {
    /// Creates a new content service.
    pub fn new(
        engine: Arc<LifecycleEngine>,
        blobs: Arc<dyn BlobStore>,
        policy: ContentConfig,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            engine,
            blobs,
            policy,
            max_upload_bytes,
        }
    }

    /// The underlying lifecycle engine.
    pub fn engine(&self) -> &Arc<LifecycleEngine> {
        &self.engine
    }

    /// The blob store.
    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    /// Parse an id taken from a request. Malformed ids cannot exist, so they
    /// are reported as `NotFound`.
    pub fn parse_id(raw: &str) -> AppResult<ShortId> {
        ShortId::parse(raw).map_err(|_| AppError::not_found("Content not found"))
    }

    /// Validate and store new content.
    ///
    /// File bytes are written to the blob store before the record is
    /// inserted; if the insert fails the blob is released again.
    pub async fn create(&self, request: CreateContentRequest) -> AppResult<ContentRecord> {
        self.validate(&request)?;
        self.engine
            .resolve_expiry(request.expires_at, self.engine.clock().now())?;

        let password = request.password.filter(|p| !p.is_empty());

        let record = match request.kind {
            ContentKind::Text => {
                let content = request.text.unwrap_or_default();
                self.engine
                    .create(NewContent {
                        payload: Payload::Text { content },
                        password,
                        one_time_view: request.one_time_view,
                        max_views: request.max_views,
                        expires_at: request.expires_at,
                    })
                    .await?
            }
            ContentKind::File => {
                let file = request
                    .file
                    .ok_or_else(|| AppError::validation("File is required for file content"))?;
                let id = self.engine.generate_id();
                let mime_type = file
                    .mime_type
                    .filter(|m| !m.is_empty())
                    .or_else(|| mime::guess_from_name(&file.name));
                let size = file.data.len() as u64;
                let meta = BlobMetadata {
                    file_name: file.name.clone(),
                    mime_type: mime_type.clone(),
                    size_bytes: size,
                };
                let location = self
                    .blobs
                    .put(&blob_key(id.as_str(), &file.name), file.data, &meta)
                    .await?;

                let input = NewContent {
                    payload: Payload::File(FileMeta {
                        name: file.name,
                        size,
                        mime_type,
                        location: location.clone(),
                    }),
                    password,
                    one_time_view: request.one_time_view,
                    max_views: request.max_views,
                    expires_at: request.expires_at,
                };
                match self.engine.create_with_id(id, input).await {
                    Ok(record) => record,
                    Err(e) => {
                        self.release_blob(&location).await;
                        return Err(e);
                    }
                }
            }
        };

        info!(
            id = %record.id,
            kind = %record.kind(),
            has_password = record.requires_password(),
            "Content stored"
        );
        Ok(record)
    }

    /// Read content, counting one view.
    ///
    /// Returns the record as it was before this view was counted.
    pub async fn read(&self, id: &ShortId, password: Option<&str>) -> AppResult<ContentRecord> {
        let record = self.engine.fetch_for_read(id).await?;
        if let AccessDecision::Deny(reason) = decide(&record, password, self.engine.clock().now())
        {
            debug!(id = %id, reason = %reason, "Read denied");
            return Err(AppError::denied(reason));
        }
        self.engine.record_view(id).await
    }

    /// Lifecycle flags of a record, without counting a view or revealing
    /// the payload.
    pub async fn metadata(&self, id: &ShortId) -> AppResult<ContentMetadata> {
        let record = self.engine.fetch_for_read(id).await?;
        let now = self.engine.clock().now();
        Ok(ContentMetadata {
            short_id: record.id.clone(),
            kind: record.kind(),
            file_name: record.payload.file().map(|f| f.name.clone()),
            requires_password: record.requires_password(),
            expires_at: record.expires_at,
            is_expired: record.is_expired(now),
            can_view: record.is_viewable(now),
        })
    }

    /// Download the file of a file record without counting a view.
    ///
    /// See [`decide_download`] for when this is allowed.
    pub async fn download(&self, id: &ShortId, password: Option<&str>) -> AppResult<FileDownload> {
        let record = self.engine.fetch_for_read(id).await?;
        let Some(file) = record.payload.file() else {
            return Err(AppError::not_found("Content has no file"));
        };
        decide_download(&record, password, self.engine.clock().now())?;

        let data = self
            .blobs
            .get(&file.location)
            .await?
            .ok_or_else(|| AppError::denied(DenyReason::Deleted))?;
        debug!(id = %id, bytes = data.len(), "File downloaded");
        Ok(FileDownload {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            data,
        })
    }

    /// Delete content. Deleting already-deleted content succeeds.
    ///
    /// The blob of a file record is released when this call is the one that
    /// deleted it, or when the record was deleted by its own view budget and
    /// still holds its file.
    pub async fn delete(&self, id: &ShortId) -> AppResult<()> {
        match self.engine.soft_delete(id, DeleteCause::Requested).await? {
            SoftDeleteOutcome::Deleted(record) => {
                if let Some(location) = record.payload.blob_location() {
                    self.release_blob(location).await;
                }
            }
            SoftDeleteOutcome::AlreadyDeleted => {
                let record = self.engine.fetch_for_read(id).await?;
                if record.consumed_by_views() {
                    if let Some(location) = record.payload.blob_location() {
                        self.release_blob(location).await;
                    }
                }
            }
        }
        Ok(())
    }

    /// Best-effort blob release. Failures are logged, never returned.
    async fn release_blob(&self, location: &str) {
        match self.blobs.delete(location).await {
            Ok(BlobDeleteOutcome::Deleted) => {}
            Ok(BlobDeleteOutcome::NotFound) => debug!(location, "Blob already absent"),
            Err(e) => warn!(location, error = %e, "Failed to release blob"),
        }
    }

    fn validate(&self, request: &CreateContentRequest) -> AppResult<()> {
        match request.kind {
            ContentKind::Text => {
                let text = request.text.as_deref().unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(AppError::validation("Text content is required"));
                }
                if text.len() > self.policy.max_text_bytes {
                    return Err(AppError::validation(format!(
                        "Text content must not exceed {} bytes",
                        self.policy.max_text_bytes
                    )));
                }
            }
            ContentKind::File => {
                let Some(file) = &request.file else {
                    return Err(AppError::validation("File is required for file content"));
                };
                if file.data.len() as u64 > self.max_upload_bytes {
                    return Err(AppError::validation(format!(
                        "File must not exceed {} bytes",
                        self.max_upload_bytes
                    )));
                }
            }
        }

        if let Some(password) = request.password.as_deref().filter(|p| !p.is_empty()) {
            if password.chars().count() < self.policy.min_password_length {
                return Err(AppError::validation(format!(
                    "Password must be at least {} characters",
                    self.policy.min_password_length
                )));
            }
        }
        if let Some(max_views) = request.max_views {
            if max_views == 0 || max_views > MAX_VIEWS_LIMIT {
                return Err(AppError::validation(format!(
                    "maxViews must be between 1 and {MAX_VIEWS_LIMIT}"
                )));
            }
        }
        Ok(())
    }
}
