//! PostgreSQL content store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use vanish_core::error::{AppError, ErrorKind};
use vanish_core::result::AppResult;
use vanish_core::types::ShortId;
use vanish_entity::{ContentKind, ContentRecord, FileMeta, Payload};

use crate::store::{CasOutcome, ContentStore};

const SELECT_COLUMNS: &str = "id, kind, text_content, file_name, file_size, mime_type, \
     file_location, password, one_time_view, max_views, view_count, created_at, \
     expires_at, deleted, deleted_at, version";

/// Flat row shape of the `contents` table.
#[derive(Debug, FromRow)]
struct ContentRow {
    id: String,
    kind: ContentKind,
    text_content: Option<String>,
    file_name: Option<String>,
    file_size: Option<i64>,
    mime_type: Option<String>,
    file_location: Option<String>,
    password: Option<String>,
    one_time_view: bool,
    max_views: Option<i32>,
    view_count: i32,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    version: i64,
}

/// Read an unsigned counter out of a signed column. Negative values mean the
/// row was corrupted outside this store.
fn read_counter(id: &str, column: &str, value: i32) -> AppResult<u32> {
    u32::try_from(value).map_err(|_| {
        AppError::internal(format!("Content '{id}' has invalid {column}: {value}"))
    })
}

/// Fit a counter into a signed column.
fn write_counter(column: &str, value: u32) -> AppResult<i32> {
    i32::try_from(value)
        .map_err(|_| AppError::validation(format!("{column} is out of range: {value}")))
}

impl TryFrom<ContentRow> for ContentRecord {
    type Error = AppError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let max_views = row
            .max_views
            .map(|v| read_counter(&row.id, "max_views", v))
            .transpose()?;
        let view_count = read_counter(&row.id, "view_count", row.view_count)?;
        let payload = match row.kind {
            ContentKind::Text => Payload::Text {
                content: row.text_content.unwrap_or_default(),
            },
            ContentKind::File => Payload::File(FileMeta {
                name: row.file_name.unwrap_or_default(),
                size: row.file_size.unwrap_or(0).max(0) as u64,
                mime_type: row.mime_type,
                location: row.file_location.ok_or_else(|| {
                    AppError::internal(format!("File content '{}' has no location", row.id))
                })?,
            }),
        };

        Ok(Self {
            id: ShortId::parse(row.id)?,
            payload,
            password: row.password,
            one_time_view: row.one_time_view,
            max_views,
            view_count,
            created_at: row.created_at,
            expires_at: row.expires_at,
            deleted: row.deleted,
            deleted_at: row.deleted_at,
            version: row.version,
        })
    }
}

fn store_error(context: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::StoreUnavailable, context.to_string(), e)
}

/// Content store backed by the `contents` table.
///
/// Conditional writes are a single `UPDATE ... WHERE id = $1 AND version = $2`,
/// so they stay atomic across processes sharing the database.
#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    /// Create a new store on top of an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    fn backend_name(&self) -> &str {
        "postgres"
    }

    async fn insert(&self, record: &ContentRecord) -> AppResult<()> {
        let (text, file) = match &record.payload {
            Payload::Text { content } => (Some(content.as_str()), None),
            Payload::File(meta) => (None, Some(meta)),
        };

        let max_views = record
            .max_views
            .map(|v| write_counter("max_views", v))
            .transpose()?;
        let view_count = write_counter("view_count", record.view_count)?;

        let result = sqlx::query(
            "INSERT INTO contents (id, kind, text_content, file_name, file_size, mime_type, \
             file_location, password, one_time_view, max_views, view_count, created_at, \
             expires_at, deleted, deleted_at, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(record.id.as_str())
        .bind(record.kind())
        .bind(text)
        .bind(file.map(|f| f.name.as_str()))
        .bind(file.map(|f| f.size as i64))
        .bind(file.and_then(|f| f.mime_type.as_deref()))
        .bind(file.map(|f| f.location.as_str()))
        .bind(record.password.as_deref())
        .bind(record.one_time_view)
        .bind(max_views)
        .bind(view_count)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.deleted)
        .bind(record.deleted_at)
        .bind(record.version)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to insert content", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Content id '{}' already exists",
                record.id
            )));
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &ShortId) -> AppResult<Option<ContentRecord>> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM contents WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to find content", e))?;

        row.map(ContentRecord::try_from).transpose()
    }

    async fn compare_and_swap(
        &self,
        expected_version: i64,
        record: &ContentRecord,
    ) -> AppResult<CasOutcome> {
        let view_count = write_counter("view_count", record.view_count)?;
        // Only lifecycle fields are mutable after creation.
        let result = sqlx::query(
            "UPDATE contents SET view_count = $3, deleted = $4, deleted_at = $5, version = $6 \
             WHERE id = $1 AND version = $2",
        )
        .bind(record.id.as_str())
        .bind(expected_version)
        .bind(view_count)
        .bind(record.deleted)
        .bind(record.deleted_at)
        .bind(record.version)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to update content", e))?;

        if result.rows_affected() == 1 {
            return Ok(CasOutcome::Swapped);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM contents WHERE id = $1)")
                .bind(record.id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| store_error("Failed to check content existence", e))?;

        debug!(id = %record.id, expected_version, exists, "Conditional update did not apply");
        Ok(if exists {
            CasOutcome::Conflict
        } else {
            CasOutcome::Missing
        })
    }

    async fn find_expired_undeleted(&self, now: DateTime<Utc>) -> AppResult<Vec<ContentRecord>> {
        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM contents \
             WHERE deleted = FALSE AND expires_at < $1 ORDER BY expires_at"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to list expired content", e))?;

        rows.into_iter().map(ContentRecord::try_from).collect()
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| store_error("Health check failed", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: ContentKind) -> ContentRow {
        let now = Utc::now();
        ContentRow {
            id: "abcdefghij".to_string(),
            kind,
            text_content: Some("hello".to_string()),
            file_name: None,
            file_size: None,
            mime_type: None,
            file_location: None,
            password: None,
            one_time_view: true,
            max_views: Some(3),
            view_count: 1,
            created_at: now,
            expires_at: now + chrono::Duration::minutes(10),
            deleted: false,
            deleted_at: None,
            version: 4,
        }
    }

    #[test]
    fn test_text_row_maps_to_record() {
        let record = ContentRecord::try_from(row(ContentKind::Text)).unwrap();
        assert_eq!(record.kind(), ContentKind::Text);
        assert_eq!(record.max_views, Some(3));
        assert_eq!(record.view_count, 1);
        assert_eq!(record.version, 4);
    }

    #[test]
    fn test_negative_counters_are_reported_as_corruption() {
        let mut r = row(ContentKind::Text);
        r.max_views = Some(-1);
        let err = ContentRecord::try_from(r).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(err.message.contains("max_views"));

        let mut r = row(ContentKind::Text);
        r.view_count = -5;
        let err = ContentRecord::try_from(r).unwrap_err();
        assert!(err.message.contains("view_count"));
    }

    #[test]
    fn test_counters_beyond_column_range_are_rejected() {
        assert_eq!(write_counter("max_views", 7).unwrap(), 7);
        let err = write_counter("max_views", u32::MAX).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_file_row_without_location_is_rejected() {
        let mut r = row(ContentKind::File);
        r.text_content = None;
        assert!(ContentRecord::try_from(r).is_err());
    }

    #[test]
    fn test_file_row_maps_metadata() {
        let mut r = row(ContentKind::File);
        r.text_content = None;
        r.file_name = Some("report.pdf".to_string());
        r.file_size = Some(2048);
        r.mime_type = Some("application/pdf".to_string());
        r.file_location = Some("abcdefghij/report.pdf".to_string());
        let record = ContentRecord::try_from(r).unwrap();
        let meta = record.payload.file().unwrap();
        assert_eq!(meta.size, 2048);
        assert_eq!(meta.location, "abcdefghij/report.pdf");
    }
}
