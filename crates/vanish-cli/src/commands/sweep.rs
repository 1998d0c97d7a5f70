//! One-off reclamation sweep.

use serde::Serialize;
use tabled::Tabled;

use vanish_core::config::{AppConfig, DatabaseBackend};
use vanish_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Sweep counts as printed by the CLI.
#[derive(Debug, Serialize, Tabled)]
struct SweepRow {
    scanned: usize,
    reclaimed: usize,
    skipped: usize,
    blobs_released: usize,
    blob_failures: usize,
    failed: usize,
    duration_ms: u64,
}

/// Run one sweep against the configured store and print the report.
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    if config.database.backend == DatabaseBackend::Memory {
        output::print_warning("The in-memory store is private to this process; nothing to sweep.");
    }

    let state = vanish_api::app::build_state(config).await?;
    let report = state.sweeper.sweep().await?;

    output::print_item(
        &SweepRow {
            scanned: report.scanned,
            reclaimed: report.reclaimed,
            skipped: report.skipped,
            blobs_released: report.blobs_released,
            blob_failures: report.blob_failures,
            failed: report.failed,
            duration_ms: report.duration_ms,
        },
        format,
    );
    if report.failed > 0 {
        output::print_warning(&format!(
            "{} record(s) could not be reclaimed and will be retried next sweep",
            report.failed
        ));
    }
    Ok(())
}
