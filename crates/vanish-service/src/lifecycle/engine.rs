//! Lifecycle engine: creation, view recording and soft deletion.
//!
//! Every mutation is a read-modify-write against the content store guarded
//! by the record's version. On a version conflict the whole step is redone
//! from a fresh read, so no decision is ever made on stale state. There is
//! no in-process lock; correctness rests on the store's conditional write.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use vanish_core::error::{AppError, ErrorKind};
use vanish_core::result::AppResult;
use vanish_core::traits::{Clock, IdGenerator};
use vanish_core::types::ShortId;
use vanish_database::{CasOutcome, ContentStore};
use vanish_entity::{ContentRecord, NewContent};

use crate::access::gone_reason;

/// Number of fresh ids tried before giving up on a create.
const MAX_ID_ATTEMPTS: usize = 5;

/// Why a record is being soft-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteCause {
    /// The creator asked for it.
    Requested,
    /// The sweeper found it past its expiry.
    Expired,
}

impl DeleteCause {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Expired => "expired",
        }
    }
}

/// Result of a soft delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftDeleteOutcome {
    /// This call moved the record to Deleted. Carries the deleted record.
    Deleted(ContentRecord),
    /// Someone else already had.
    AlreadyDeleted,
}

impl SoftDeleteOutcome {
    /// Whether this call performed the transition.
    pub fn transitioned(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }
}

/// Owns every state transition of a content record.
#[derive(Debug, Clone)]
pub struct LifecycleEngine {
    store: Arc<dyn ContentStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    default_ttl: Duration,
}

impl LifecycleEngine {
    /// Create a new engine.
    pub fn new(
        store: Arc<dyn ContentStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            default_ttl,
        }
    }

    /// The shared content store.
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// The shared clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// A fresh id, for callers that must key external data before insert.
    pub fn generate_id(&self) -> ShortId {
        self.ids.generate()
    }

    /// Expiry a record created at `now` would get.
    ///
    /// Fails with `InvalidExpiry` unless `requested` is strictly after `now`.
    pub fn resolve_expiry(
        &self,
        requested: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<DateTime<Utc>> {
        match requested {
            Some(at) if at <= now => Err(AppError::invalid_expiry(
                "Expiry date must be in the future",
            )),
            Some(at) => Ok(at),
            None => Ok(now + self.default_ttl),
        }
    }

    /// Create a record under a freshly generated id.
    ///
    /// An id collision reported by the store is retried with a new id.
    pub async fn create(&self, input: NewContent) -> AppResult<ContentRecord> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.create_with_id(self.ids.generate(), input.clone()).await {
                Err(e) if e.kind == ErrorKind::Conflict && attempt < MAX_ID_ATTEMPTS => {
                    debug!(attempt, "Short id collision, regenerating");
                }
                other => return other,
            }
        }
    }

    /// Create a record under a caller-chosen id. A taken id is a `Conflict`.
    pub async fn create_with_id(&self, id: ShortId, input: NewContent) -> AppResult<ContentRecord> {
        let now = self.clock.now();
        let expires_at = self.resolve_expiry(input.expires_at, now)?;
        let record = ContentRecord::new(id, input, now, expires_at);
        self.store.insert(&record).await?;

        debug!(
            id = %record.id,
            kind = %record.kind(),
            expires_at = %record.expires_at,
            one_time_view = record.one_time_view,
            max_views = ?record.max_views,
            "Content created"
        );
        Ok(record)
    }

    /// The current record, or `NotFound`.
    pub async fn fetch_for_read(&self, id: &ShortId) -> AppResult<ContentRecord> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Content not found"))
    }

    /// Atomically count one view.
    ///
    /// Re-checks viewability on fresh data, increments the view count and,
    /// when that was the last permitted view, marks the record deleted in
    /// the same conditional write. Returns the record as it was before the
    /// increment. Fails with `Gone` (carrying the reason) without mutating
    /// when the record is no longer viewable.
    pub async fn record_view(&self, id: &ShortId) -> AppResult<ContentRecord> {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let current = self.fetch_for_read(id).await?;
            let now = self.clock.now();
            if let Some(reason) = gone_reason(&current, now) {
                return Err(AppError::denied(reason));
            }

            let next = current.with_view_recorded(now);
            match self.store.compare_and_swap(current.version, &next).await? {
                CasOutcome::Swapped => {
                    debug!(
                        id = %id,
                        view_count = next.view_count,
                        exhausted = next.deleted,
                        attempt,
                        "View recorded"
                    );
                    return Ok(current);
                }
                CasOutcome::Conflict => {
                    debug!(id = %id, attempt, "View update lost a race, retrying");
                    tokio::task::yield_now().await;
                }
                CasOutcome::Missing => return Err(AppError::not_found("Content not found")),
            }
        }
    }

    /// Mark a record deleted. Idempotent: an already-deleted record is not
    /// an error.
    pub async fn soft_delete(
        &self,
        id: &ShortId,
        cause: DeleteCause,
    ) -> AppResult<SoftDeleteOutcome> {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            let current = self.fetch_for_read(id).await?;
            let Some(next) = current.with_deleted(self.clock.now()) else {
                return Ok(SoftDeleteOutcome::AlreadyDeleted);
            };

            match self.store.compare_and_swap(current.version, &next).await? {
                CasOutcome::Swapped => {
                    info!(id = %id, cause = cause.as_str(), "Content deleted");
                    return Ok(SoftDeleteOutcome::Deleted(next));
                }
                CasOutcome::Conflict => {
                    debug!(id = %id, attempt, "Delete lost a race, retrying");
                    tokio::task::yield_now().await;
                }
                CasOutcome::Missing => return Err(AppError::not_found("Content not found")),
            }
        }
    }
}
