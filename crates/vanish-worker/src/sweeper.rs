//! Expired-content reclamation.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing;

use vanish_core::error::ErrorKind;
use vanish_core::result::AppResult;
use vanish_core::traits::{BlobDeleteOutcome, BlobStore};
use vanish_service::{DeleteCause, LifecycleEngine, SoftDeleteOutcome};

/// Counts from one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Expired, undeleted records found.
    pub scanned: usize,
    /// Records this sweep moved to Deleted.
    pub reclaimed: usize,
    /// Records someone else deleted first.
    pub skipped: usize,
    /// Blobs released.
    pub blobs_released: usize,
    /// Blobs whose release failed. Their records are still deleted.
    pub blob_failures: usize,
    /// Records that could not be deleted this time.
    pub failed: usize,
    /// Wall time of the sweep in milliseconds.
    pub duration_ms: u64,
}

/// Reclaims records whose expiry has passed.
///
/// A sweep may run concurrently with another sweep, explicit deletes and
/// live reads: every path ends in the same idempotent soft delete, and only
/// the caller whose soft delete performed the transition releases the blob.
#[derive(Debug, Clone)]
pub struct Sweeper {
    engine: Arc<LifecycleEngine>,
    blobs: Arc<dyn BlobStore>,
}

impl Sweeper {
    /// Create a new sweeper
    pub fn new(engine: Arc<LifecycleEngine>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { engine, blobs }
    }

    /// Run one sweep.
    ///
    /// Fails only if the expired set cannot be listed; per-record failures
    /// are counted and left for the next sweep.
    pub async fn sweep(&self) -> AppResult<SweepReport> {
        let started = Instant::now();
        let now = self.engine.clock().now();
        let expired = self.engine.store().find_expired_undeleted(now).await?;

        let mut report = SweepReport {
            scanned: expired.len(),
            ..SweepReport::default()
        };

        for record in expired {
            match self.engine.soft_delete(&record.id, DeleteCause::Expired).await {
                Ok(SoftDeleteOutcome::Deleted(deleted)) => {
                    report.reclaimed += 1;
                    if let Some(location) = deleted.payload.blob_location() {
                        match self.blobs.delete(location).await {
                            Ok(BlobDeleteOutcome::Deleted) => report.blobs_released += 1,
                            Ok(BlobDeleteOutcome::NotFound) => {
                                tracing::debug!(id = %record.id, location, "Blob already gone");
                            }
                            Err(e) => {
                                report.blob_failures += 1;
                                tracing::warn!(
                                    id = %record.id,
                                    location,
                                    error = %e,
                                    "Failed to release blob of expired content"
                                );
                            }
                        }
                    }
                }
                Ok(SoftDeleteOutcome::AlreadyDeleted) => report.skipped += 1,
                Err(e) if e.kind == ErrorKind::NotFound => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(id = %record.id, error = %e, "Failed to reclaim expired content");
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            scanned = report.scanned,
            reclaimed = report.reclaimed,
            skipped = report.skipped,
            blob_failures = report.blob_failures,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Sweep complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::{Duration, TimeZone, Utc};

    use vanish_core::error::AppError;
    use vanish_core::traits::{BlobMetadata, ManualClock};
    use vanish_core::types::ShortId;
    use vanish_database::{ContentStore, MemoryContentStore};
    use vanish_entity::{FileMeta, NewContent, Payload};
    use vanish_service::RandomIdGenerator;

    /// Blob store that counts deletes and can be told to fail them.
    #[derive(Debug, Default)]
    struct CountingBlobs {
        deletes: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl BlobStore for CountingBlobs {
        fn provider_type(&self) -> &str {
            "counting"
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }
        async fn put(&self, key: &str, _data: Bytes, _meta: &BlobMetadata) -> AppResult<String> {
            Ok(key.to_string())
        }
        async fn get(&self, _location: &str) -> AppResult<Option<Bytes>> {
            Ok(None)
        }
        async fn delete(&self, _location: &str) -> AppResult<BlobDeleteOutcome> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::storage("bucket unreachable"))
            } else {
                Ok(BlobDeleteOutcome::Deleted)
            }
        }
    }

    struct Fixture {
        engine: Arc<LifecycleEngine>,
        clock: ManualClock,
        blobs: Arc<CountingBlobs>,
        sweeper: Sweeper,
    }

    fn fixture(fail_blobs: bool) -> Fixture {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 7, 4, 8, 0, 0).unwrap());
        let store: Arc<dyn ContentStore> = Arc::new(MemoryContentStore::new());
        let engine = Arc::new(LifecycleEngine::new(
            store,
            Arc::new(clock.clone()),
            Arc::new(RandomIdGenerator::default()),
            Duration::minutes(10),
        ));
        let blobs = Arc::new(CountingBlobs {
            deletes: AtomicUsize::new(0),
            fail: fail_blobs,
        });
        let sweeper = Sweeper::new(engine.clone(), blobs.clone());
        Fixture {
            engine,
            clock,
            blobs,
            sweeper,
        }
    }

    fn file_input() -> NewContent {
        NewContent {
            payload: Payload::File(FileMeta {
                name: "photo.png".to_string(),
                size: 4,
                mime_type: Some("image/png".to_string()),
                location: "somewhere/photo.png".to_string(),
            }),
            password: None,
            one_time_view: false,
            max_views: None,
            expires_at: None,
        }
    }

    async fn expired_ids(fx: &Fixture, count: usize) -> Vec<ShortId> {
        let mut ids = Vec::new();
        for _ in 0..count {
            ids.push(fx.engine.create(file_input()).await.unwrap().id);
        }
        fx.clock.advance(Duration::minutes(11));
        ids
    }

    #[tokio::test]
    async fn test_sweep_converges() {
        let fx = fixture(false);
        let ids = expired_ids(&fx, 3).await;
        let live = fx.engine.create(NewContent::text("still here")).await.unwrap();

        let report = fx.sweeper.sweep().await.unwrap();
        assert_eq!(report.scanned, 3);
        assert_eq!(report.reclaimed, 3);
        assert_eq!(report.blobs_released, 3);

        for id in &ids {
            assert!(fx.engine.fetch_for_read(id).await.unwrap().deleted);
        }
        assert!(!fx.engine.fetch_for_read(&live.id).await.unwrap().deleted);

        let again = fx.sweeper.sweep().await.unwrap();
        assert_eq!(again.scanned, 0);
        assert_eq!(again.reclaimed, 0);
        assert_eq!(fx.blobs.deletes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_blob_failure_does_not_block_deletion() {
        let fx = fixture(true);
        let ids = expired_ids(&fx, 2).await;

        let report = fx.sweeper.sweep().await.unwrap();
        assert_eq!(report.reclaimed, 2);
        assert_eq!(report.blob_failures, 2);
        for id in &ids {
            assert!(fx.engine.fetch_for_read(id).await.unwrap().deleted);
        }

        // Not retried: the record is the source of truth.
        let again = fx.sweeper.sweep().await.unwrap();
        assert_eq!(again.scanned, 0);
    }

    #[tokio::test]
    async fn test_expired_reads_are_gone_before_sweep() {
        let fx = fixture(false);
        let ids = expired_ids(&fx, 1).await;
        let err = fx.engine.record_view(&ids[0]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Gone);
        assert!(!fx.engine.fetch_for_read(&ids[0]).await.unwrap().deleted);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sweeps_release_each_blob_once() {
        let fx = fixture(false);
        let ids = expired_ids(&fx, 20).await;

        let sweeper = Arc::new(fx.sweeper.clone());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sweeper = sweeper.clone();
                tokio::spawn(async move { sweeper.sweep().await.unwrap() })
            })
            .collect();

        let mut reclaimed = 0;
        for handle in handles {
            reclaimed += handle.await.unwrap().reclaimed;
        }
        assert_eq!(reclaimed, ids.len());
        assert_eq!(fx.blobs.deletes.load(Ordering::SeqCst), ids.len());
    }
}
