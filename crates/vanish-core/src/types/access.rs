//! Reasons a read can be refused.

use serde::{Deserialize, Serialize};

/// Why the access guard refused a read.
///
/// Variants are declared in evaluation order: the guard reports the first
/// one that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The record has been soft-deleted.
    Deleted,
    /// The record's expiry has passed.
    Expired,
    /// The record's view budget is spent.
    #[serde(rename = "max_views_reached")]
    ViewLimitReached,
    /// A password is set and none was supplied.
    PasswordRequired,
    /// A password is set and the supplied one does not match.
    PasswordIncorrect,
}

impl DenyReason {
    /// Stable machine-readable code, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Expired => "expired",
            Self::ViewLimitReached => "max_views_reached",
            Self::PasswordRequired => "password_required",
            Self::PasswordIncorrect => "password_incorrect",
        }
    }

    /// Human-readable message surfaced to callers.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Deleted => "Content has been deleted",
            Self::Expired => "Content has expired",
            Self::ViewLimitReached => "Content has reached its view limit",
            Self::PasswordRequired => "Password required",
            Self::PasswordIncorrect => "Password incorrect",
        }
    }

    /// Whether this reason means the content is no longer viewable at all,
    /// as opposed to being gated behind a password.
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::Deleted | Self::Expired | Self::ViewLimitReached)
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
