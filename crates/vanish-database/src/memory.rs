//! Process-local content store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use vanish_core::error::AppError;
use vanish_core::result::AppResult;
use vanish_core::types::ShortId;
use vanish_entity::ContentRecord;

use crate::store::{CasOutcome, ContentStore};

/// In-memory store backed by a sharded concurrent map.
///
/// Each conditional write holds the shard lock for the key while comparing
/// and replacing, which makes it atomic with respect to other writers.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    records: DashMap<ShortId, ContentRecord>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, deleted ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, record: &ContentRecord) -> AppResult<()> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Content id '{}' already exists",
                record.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get_by_id(&self, id: &ShortId) -> AppResult<Option<ContentRecord>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn compare_and_swap(
        &self,
        expected_version: i64,
        record: &ContentRecord,
    ) -> AppResult<CasOutcome> {
        match self.records.get_mut(&record.id) {
            None => Ok(CasOutcome::Missing),
            Some(mut current) if current.version == expected_version => {
                *current = record.clone();
                Ok(CasOutcome::Swapped)
            }
            Some(_) => Ok(CasOutcome::Conflict),
        }
    }

    async fn find_expired_undeleted(&self, now: DateTime<Utc>) -> AppResult<Vec<ContentRecord>> {
        let mut expired: Vec<ContentRecord> = self
            .records
            .iter()
            .filter(|entry| !entry.deleted && entry.expires_at < now)
            .map(|entry| entry.value().clone())
            .collect();
        expired.sort_by_key(|record| record.expires_at);
        Ok(expired)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use vanish_core::error::ErrorKind;
    use vanish_entity::NewContent;

    fn record(id: &str, expires_in: Duration) -> ContentRecord {
        let now = Utc::now();
        ContentRecord::new(
            ShortId::parse(id).unwrap(),
            NewContent::text("hello"),
            now,
            now + expires_in,
        )
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = MemoryContentStore::new();
        let rec = record("aaaaaaaaaa", Duration::minutes(5));
        store.insert(&rec).await.unwrap();
        let err = store.insert(&rec).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_compare_and_swap_checks_version() {
        let store = MemoryContentStore::new();
        let rec = record("bbbbbbbbbb", Duration::minutes(5));
        store.insert(&rec).await.unwrap();

        let next = rec.with_view_recorded(Utc::now());
        assert_eq!(
            store.compare_and_swap(rec.version, &next).await.unwrap(),
            CasOutcome::Swapped
        );
        // Stale version loses.
        let stale = rec.with_view_recorded(Utc::now());
        assert_eq!(
            store.compare_and_swap(rec.version, &stale).await.unwrap(),
            CasOutcome::Conflict
        );
        let stored = store.get_by_id(&rec.id).await.unwrap().unwrap();
        assert_eq!(stored.view_count, 1);
    }

    #[tokio::test]
    async fn test_compare_and_swap_missing() {
        let store = MemoryContentStore::new();
        let rec = record("cccccccccc", Duration::minutes(5));
        assert_eq!(
            store.compare_and_swap(0, &rec).await.unwrap(),
            CasOutcome::Missing
        );
    }

    #[tokio::test]
    async fn test_find_expired_skips_deleted_and_live() {
        let store = MemoryContentStore::new();
        let live = record("dddddddddd", Duration::minutes(5));
        let expired = record("eeeeeeeeee", Duration::minutes(-5));
        let gone = record("ffffffffff", Duration::minutes(-5))
            .with_deleted(Utc::now())
            .unwrap();
        for r in [&live, &expired, &gone] {
            store.insert(r).await.unwrap();
        }

        let found = store.find_expired_undeleted(Utc::now()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, expired.id);
    }
}
