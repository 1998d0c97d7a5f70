//! # vanish-database
//!
//! The content store: the only component that touches persistence. Defines
//! the [`ContentStore`] trait the lifecycle engine is written against, a
//! process-local implementation on top of `dashmap`, and a PostgreSQL
//! implementation whose compare-and-swap is a version-filtered `UPDATE`, so
//! view counting stays atomic across independent processes.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use vanish_core::config::{DatabaseBackend, DatabaseConfig};
use vanish_core::result::AppResult;

pub use connection::DatabasePool;
pub use memory::MemoryContentStore;
pub use repositories::content::PgContentStore;
pub use store::{CasOutcome, ContentStore};

/// Build the configured content store, connecting and migrating if needed.
pub async fn build_store(config: &DatabaseConfig) -> AppResult<Arc<dyn ContentStore>> {
    match config.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory content store; records will not survive a restart");
            Ok(Arc::new(MemoryContentStore::new()))
        }
        DatabaseBackend::Postgres => {
            let db = DatabasePool::connect(config).await?;
            if config.run_migrations {
                migration::run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(PgContentStore::new(db.into_pool())))
        }
    }
}
