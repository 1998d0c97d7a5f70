//! Manual reclamation trigger.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/cleanup: run one sweep now
pub async fn trigger_sweep(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.sweeper.sweep().await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Cleaned up {} expired items", report.reclaimed),
        "data": report,
    })))
}
