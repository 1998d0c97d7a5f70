//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use vanish_core::config::AppConfig;
use vanish_service::ContentService;
use vanish_worker::Sweeper;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Content operations
    pub content: Arc<ContentService>,
    /// Reclamation sweeper, shared with the background runner
    pub sweeper: Arc<Sweeper>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: Arc<AppConfig>, content: Arc<ContentService>, sweeper: Arc<Sweeper>) -> Self {
        Self {
            config,
            content,
            sweeper,
            started_at: Instant::now(),
        }
    }
}
