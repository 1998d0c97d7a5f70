//! Content payload value objects.

use serde::{Deserialize, Serialize};

use super::kind::ContentKind;

/// Metadata of an uploaded file. The blob itself lives in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type as reported by the uploader.
    pub mime_type: Option<String>,
    /// Opaque location handle returned by the blob store.
    pub location: String,
}

/// The body of a content record. Exactly one variant, matching the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    /// Inline text.
    Text {
        /// The text itself.
        content: String,
    },
    /// A stored file.
    File(FileMeta),
}

impl Payload {
    /// Kind implied by this payload.
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text { .. } => ContentKind::Text,
            Self::File(_) => ContentKind::File,
        }
    }

    /// File metadata, if this is a file payload.
    pub fn file(&self) -> Option<&FileMeta> {
        match self {
            Self::File(meta) => Some(meta),
            Self::Text { .. } => None,
        }
    }

    /// Blob location handle, if any.
    pub fn blob_location(&self) -> Option<&str> {
        self.file().map(|meta| meta.location.as_str())
    }
}
