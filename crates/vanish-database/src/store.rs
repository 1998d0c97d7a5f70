//! Content store abstraction.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use vanish_core::result::AppResult;
use vanish_core::types::ShortId;
use vanish_entity::ContentRecord;

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The stored version matched and the new record was written.
    Swapped,
    /// Another writer got there first; re-read and retry.
    Conflict,
    /// No record with that id exists.
    Missing,
}

/// Durable keyed storage for content records.
///
/// Implementations must make [`compare_and_swap`](ContentStore::compare_and_swap)
/// a single atomic step against the backing storage. The engine never relies
/// on in-process locking for correctness.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug + 'static {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &str;

    /// Insert a new record. Fails with `Conflict` if the id is taken.
    async fn insert(&self, record: &ContentRecord) -> AppResult<()>;

    /// Fetch a record by id.
    async fn get_by_id(&self, id: &ShortId) -> AppResult<Option<ContentRecord>>;

    /// Replace the record with `record` only if the stored version is
    /// `expected_version`.
    async fn compare_and_swap(
        &self,
        expected_version: i64,
        record: &ContentRecord,
    ) -> AppResult<CasOutcome>;

    /// All records that are not deleted and whose expiry is before `now`.
    async fn find_expired_undeleted(&self, now: DateTime<Utc>) -> AppResult<Vec<ContentRecord>>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
