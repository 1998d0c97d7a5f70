//! Content kind enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vanish_core::AppError;

/// What a content record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Inline text.
    Text,
    /// A reference to an uploaded blob.
    File,
}

impl ContentKind {
    /// Wire name (`"text"` / `"file"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "file" => Ok(Self::File),
            other => Err(AppError::validation(format!(
                "Invalid content type '{other}', expected 'text' or 'file'"
            ))),
        }
    }
}
