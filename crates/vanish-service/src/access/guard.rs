//! Read access decisions.
//!
//! Pure functions: no I/O, no clock of their own. The evaluation order is
//! observable to callers, so "content is gone" always wins over a password
//! prompt for content that is no longer viewable.

use chrono::{DateTime, Utc};

use vanish_core::error::AppError;
use vanish_core::result::AppResult;
use vanish_core::types::DenyReason;
use vanish_entity::ContentRecord;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The read may proceed.
    Allow,
    /// The read is refused.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Convert a denial into the error surfaced to callers.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(AppError::denied(reason)),
        }
    }
}

/// Why `record` is no longer viewable at `now`, if it is not.
///
/// Checks `Deleted`, then `Expired`, then `ViewLimitReached`.
pub fn gone_reason(record: &ContentRecord, now: DateTime<Utc>) -> Option<DenyReason> {
    if record.deleted {
        Some(DenyReason::Deleted)
    } else if record.is_expired(now) {
        Some(DenyReason::Expired)
    } else if record.views_exhausted() {
        Some(DenyReason::ViewLimitReached)
    } else {
        None
    }
}

/// Decide whether `record` may be shown to a caller supplying `password`.
///
/// An empty supplied password counts as none.
pub fn decide(
    record: &ContentRecord,
    password: Option<&str>,
    now: DateTime<Utc>,
) -> AccessDecision {
    if let Some(reason) = gone_reason(record, now) {
        return AccessDecision::Deny(reason);
    }
    password_decision(record, password)
}

fn password_decision(record: &ContentRecord, password: Option<&str>) -> AccessDecision {
    if record.requires_password() {
        match password.filter(|p| !p.is_empty()) {
            None => return AccessDecision::Deny(DenyReason::PasswordRequired),
            Some(p) if !record.password_matches(p) => {
                return AccessDecision::Deny(DenyReason::PasswordIncorrect);
            }
            Some(_) => {}
        }
    }
    AccessDecision::Allow
}

/// Decide whether the file behind `record` may be downloaded.
///
/// A download never counts a view. It is allowed once the record has been
/// opened by a counted read, until the record expires or is deleted
/// explicitly; a record its own view budget deleted keeps its file. Order:
/// explicit delete, expiry, not yet opened, password.
pub fn decide_download(
    record: &ContentRecord,
    password: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if record.deleted && !record.consumed_by_views() {
        return Err(AppError::denied(DenyReason::Deleted));
    }
    if record.is_expired(now) {
        return Err(AppError::denied(DenyReason::Expired));
    }
    if record.view_count == 0 {
        return Err(AppError::conflict(
            "Content must be opened before its file can be downloaded",
        ));
    }
    password_decision(record, password).into_result()
}
