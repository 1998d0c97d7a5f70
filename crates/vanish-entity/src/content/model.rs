//! Content record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vanish_core::types::ShortId;

use super::kind::ContentKind;
use super::payload::Payload;

/// A self-destructing piece of content.
///
/// A record is viewable iff it is not deleted, `now <= expires_at`, and the
/// view budget (if any) is not exhausted. Deletion is one-way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Unique short identifier.
    pub id: ShortId,
    /// Text or file body.
    pub payload: Payload,
    /// Access password, compared by exact match.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    /// Becomes inaccessible after the first successful view.
    pub one_time_view: bool,
    /// Maximum number of successful views.
    pub max_views: Option<u32>,
    /// Number of successful views so far.
    pub view_count: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the record has been soft-deleted.
    pub deleted: bool,
    /// When the record was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency version, bumped on every write.
    pub version: i64,
}

impl ContentRecord {
    /// Build a fresh, active record.
    pub fn new(
        id: ShortId,
        input: NewContent,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            payload: input.payload,
            password: input.password.filter(|p| !p.is_empty()),
            one_time_view: input.one_time_view,
            max_views: input.max_views,
            view_count: 0,
            created_at,
            expires_at,
            deleted: false,
            deleted_at: None,
            version: 0,
        }
    }

    /// Kind of the payload.
    pub fn kind(&self) -> ContentKind {
        self.payload.kind()
    }

    /// Whether the expiry has passed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the view budget is used up.
    pub fn views_exhausted(&self) -> bool {
        self.max_views.is_some_and(|max| self.view_count >= max)
    }

    /// The viewability predicate.
    pub fn is_viewable(&self, now: DateTime<Utc>) -> bool {
        !self.deleted && !self.is_expired(now) && !self.views_exhausted()
    }

    /// Whether the record was deleted by its own view budget: a one-time
    /// record after its view, or a `max_views` record after its last one.
    pub fn consumed_by_views(&self) -> bool {
        self.deleted && self.view_count > 0 && (self.one_time_view || self.views_exhausted())
    }

    /// Whether a password gates this record.
    pub fn requires_password(&self) -> bool {
        self.password.is_some()
    }

    /// Exact-match password check. A record without a password accepts anything.
    pub fn password_matches(&self, supplied: &str) -> bool {
        match &self.password {
            Some(expected) => expected == supplied,
            None => true,
        }
    }

    /// The record as it looks after one more successful view at `now`.
    ///
    /// Marks the record deleted when the view was the last one permitted.
    pub fn with_view_recorded(&self, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.view_count = self.view_count.saturating_add(1);
        if next.one_time_view || next.views_exhausted() {
            next.deleted = true;
            next.deleted_at = Some(now);
        }
        next.version = self.version + 1;
        next
    }

    /// The record marked deleted at `now`, or `None` if it already is.
    pub fn with_deleted(&self, now: DateTime<Utc>) -> Option<Self> {
        if self.deleted {
            return None;
        }
        let mut next = self.clone();
        next.deleted = true;
        next.deleted_at = Some(now);
        next.version = self.version + 1;
        Some(next)
    }
}

/// Data required to create a new content record.
#[derive(Debug, Clone)]
pub struct NewContent {
    /// Text or file body.
    pub payload: Payload,
    /// Optional access password. Empty means none.
    pub password: Option<String>,
    /// One-time view flag.
    pub one_time_view: bool,
    /// Optional view budget.
    pub max_views: Option<u32>,
    /// Requested expiry. `None` applies the configured default.
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewContent {
    /// Text content with no restrictions beyond the default expiry.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text {
                content: content.into(),
            },
            password: None,
            one_time_view: false,
            max_views: None,
            expires_at: None,
        }
    }
}
