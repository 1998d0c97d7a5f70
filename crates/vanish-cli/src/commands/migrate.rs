//! Database migration command.

use vanish_core::config::{AppConfig, DatabaseBackend};
use vanish_core::error::AppError;
use vanish_database::DatabasePool;
use vanish_database::connection::mask_password;

use crate::output;

/// Apply all pending migrations to the configured PostgreSQL database.
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    if config.database.backend != DatabaseBackend::Postgres {
        output::print_warning("database.backend is not \"postgres\"; nothing to migrate.");
        return Ok(());
    }

    println!(
        "Running database migrations on {}...",
        mask_password(&config.database.url)
    );
    let db = DatabasePool::connect(&config.database).await?;
    vanish_database::migration::run_migrations(db.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
