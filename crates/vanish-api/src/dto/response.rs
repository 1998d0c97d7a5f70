//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vanish_entity::{ContentKind, ContentRecord, Payload};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Returned after content is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentResponse {
    /// Id to share.
    pub short_id: String,
    /// Link for the recipient.
    pub share_url: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Content kind.
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Whether a password protects the content.
    pub has_password: bool,
    /// One-time view.
    pub one_time_view: bool,
    /// View budget.
    pub max_views: Option<u32>,
}

impl CreateContentResponse {
    /// Build from a freshly created record.
    pub fn from_record(record: &ContentRecord, share_url: String) -> Self {
        Self {
            short_id: record.id.to_string(),
            share_url,
            expires_at: record.expires_at,
            kind: record.kind(),
            has_password: record.requires_password(),
            one_time_view: record.one_time_view,
            max_views: record.max_views,
        }
    }
}

/// Returned by a successful read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    /// Record id.
    pub short_id: String,
    /// Content kind.
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Views before this one.
    pub view_count: u32,
    /// One-time view.
    pub one_time_view: bool,
    /// View budget.
    pub max_views: Option<u32>,
    /// Text body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// File name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Download URL for the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// File size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ContentResponse {
    /// Build from a record that was just read. `file_url` is the download
    /// URL used when the record carries a file.
    pub fn from_record(record: ContentRecord, file_url: String) -> Self {
        let kind = record.kind();
        let mut response = Self {
            short_id: record.id.to_string(),
            kind,
            created_at: record.created_at,
            expires_at: record.expires_at,
            view_count: record.view_count,
            one_time_view: record.one_time_view,
            max_views: record.max_views,
            text_content: None,
            file_name: None,
            file_url: None,
            file_size: None,
            mime_type: None,
        };
        match record.payload {
            Payload::Text { content } => response.text_content = Some(content),
            Payload::File(meta) => {
                response.file_name = Some(meta.name);
                response.file_url = Some(file_url);
                response.file_size = Some(meta.size);
                response.mime_type = meta.mime_type;
            }
        }
        response
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
    /// Content store backend and status.
    pub database: ComponentHealth,
    /// Blob store provider and status.
    pub storage: ComponentHealth,
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Backend or provider name.
    pub backend: String,
    /// Whether it answered.
    pub healthy: bool,
}
