//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, ComponentHealth, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Answers 503 when the content store or the blob store is unreachable.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let store = state.content.engine().store();
    let blobs = state.content.blobs();

    let database = ComponentHealth {
        backend: store.backend_name().to_string(),
        healthy: store.health_check().await.unwrap_or(false),
    };
    let storage = ComponentHealth {
        backend: blobs.provider_type().to_string(),
        healthy: blobs.health_check().await.unwrap_or(false),
    };

    let healthy = database.healthy && storage.healthy;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
            storage,
        })),
    )
}
