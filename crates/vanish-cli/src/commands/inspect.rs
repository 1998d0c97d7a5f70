//! Show the lifecycle state of a record without revealing its payload.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use vanish_core::config::AppConfig;
use vanish_core::error::AppError;
use vanish_core::types::ShortId;
use vanish_entity::ContentRecord;

use crate::output::{self, OutputFormat};

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Short id of the record
    pub id: String,
}

#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct RecordRow {
    id: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    kind: String,
    state: String,
    views: String,
    password: bool,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    #[tabled(display = "display_deleted_at")]
    deleted_at: Option<DateTime<Utc>>,
}

fn display_deleted_at(value: &Option<DateTime<Utc>>) -> String {
    value.map(|v| v.to_rfc3339()).unwrap_or_else(|| "-".to_string())
}

impl RecordRow {
    fn new(record: &ContentRecord, now: DateTime<Utc>) -> Self {
        let state = if record.deleted {
            "deleted"
        } else if record.is_expired(now) {
            "expired"
        } else if record.views_exhausted() {
            "exhausted"
        } else {
            "active"
        };
        let views = match (record.one_time_view, record.max_views) {
            (true, _) => format!("{}/1 (one-time)", record.view_count),
            (false, Some(max)) => format!("{}/{}", record.view_count, max),
            (false, None) => record.view_count.to_string(),
        };
        Self {
            id: record.id.to_string(),
            kind: record.kind().to_string(),
            state: state.to_string(),
            views,
            password: record.requires_password(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            deleted_at: record.deleted_at,
        }
    }
}

/// Print one record's lifecycle fields.
pub async fn execute(
    args: &InspectArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let id = ShortId::parse(args.id.as_str())?;
    let store = vanish_database::build_store(&config.database).await?;
    let record = store
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Content '{id}' not found")))?;

    output::print_item(&RecordRow::new(&record, Utc::now()), format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use vanish_entity::NewContent;

    #[test]
    fn test_row_reports_state_without_payload() {
        let now = Utc.with_ymd_and_hms(2026, 3, 3, 3, 0, 0).unwrap();
        let id = ShortId::parse("inspect-id-1").unwrap();
        let mut input = NewContent::text("top secret");
        input.max_views = Some(3);
        let record = ContentRecord::new(id, input, now, now + Duration::minutes(10));

        let row = RecordRow::new(&record, now);
        assert_eq!(row.state, "active");
        assert_eq!(row.views, "0/3");

        let later = RecordRow::new(&record, now + Duration::minutes(11));
        assert_eq!(later.state, "expired");

        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("top secret"));
    }
}
