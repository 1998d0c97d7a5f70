//! Application wiring: builds every component from configuration and runs
//! the HTTP server with the background sweeper.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use vanish_core::config::AppConfig;
use vanish_core::error::AppError;
use vanish_core::result::AppResult;
use vanish_core::traits::SystemClock;
use vanish_service::{ContentService, LifecycleEngine, RandomIdGenerator};
use vanish_worker::{SweepRunner, Sweeper};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the shared state: content store, blob store, lifecycle engine,
/// content service and sweeper.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    // ── Step 1: Content store ────────────────────────────────────
    tracing::info!(backend = ?config.database.backend, "Initializing content store...");
    let store = vanish_database::build_store(&config.database).await?;

    // ── Step 2: Blob store ───────────────────────────────────────
    tracing::info!(provider = %config.storage.provider, "Initializing blob store...");
    let blobs = vanish_storage::build_blob_store(&config.storage).await?;

    // ── Step 3: Lifecycle engine and services ────────────────────
    let engine = Arc::new(LifecycleEngine::new(
        store,
        Arc::new(SystemClock),
        Arc::new(RandomIdGenerator::new(config.content.id_length)),
        config.content.default_ttl(),
    ));
    let content = Arc::new(ContentService::new(
        Arc::clone(&engine),
        Arc::clone(&blobs),
        config.content.clone(),
        config.storage.max_upload_size_bytes,
    ));
    let sweeper = Arc::new(Sweeper::new(engine, blobs));

    Ok(AppState::new(Arc::new(config), content, sweeper))
}

/// Runs the Vanish server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting Vanish v{}", env!("CARGO_PKG_VERSION"));

    let state = build_state(config).await?;
    let config = Arc::clone(&state.config);

    // ── Step 4: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 5: Start background sweeper ─────────────────────────
    let sweeper_handle = if config.sweeper.enabled {
        let runner = SweepRunner::new(Arc::clone(&state.sweeper), config.sweeper.clone());
        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move { runner.run(cancel).await }))
    } else {
        tracing::info!("Background sweeper disabled; use POST /api/cleanup");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app = build_router(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Vanish server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Wait for background tasks ────────────────────────
    if let Some(handle) = sweeper_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Sweeper did not stop within the grace period");
        }
    }

    tracing::info!("Vanish server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
