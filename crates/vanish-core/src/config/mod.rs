//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default, so an empty configuration is valid
//! and yields an in-memory store with local blob storage.

pub mod app;
pub mod content;
pub mod database;
pub mod logging;
pub mod storage;
pub mod sweeper;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::content::ContentConfig;
use self::logging::LoggingConfig;
use self::storage::StorageConfig;
use self::sweeper::SweeperConfig;

pub use self::database::{DatabaseBackend, DatabaseConfig};

use crate::error::AppError;

/// Environment variable prefix (`VANISH__SERVER__PORT=8080`).
pub const ENV_PREFIX: &str = "VANISH";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Content store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Content lifecycle policy.
    #[serde(default)]
    pub content: ContentConfig,
    /// Reclamation sweeper settings.
    #[serde(default)]
    pub sweeper: SweeperConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `VANISH__`. Missing files are not an error.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration using an explicit base file instead of
    /// `config/default`.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let overlay = std::path::Path::new(base)
            .parent()
            .map(|dir| dir.join(env))
            .unwrap_or_else(|| std::path::PathBuf::from(env));

        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&overlay.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.backend = \"postgres\"",
            ));
        }
        if self.content.default_expiry_minutes == 0 {
            return Err(AppError::configuration(
                "content.default_expiry_minutes must be at least 1",
            ));
        }
        if self.content.id_length < crate::types::ShortId::MIN_LEN
            || self.content.id_length > crate::types::ShortId::MAX_LEN
        {
            return Err(AppError::configuration(format!(
                "content.id_length must be between {} and {}",
                crate::types::ShortId::MIN_LEN,
                crate::types::ShortId::MAX_LEN
            )));
        }
        if self.sweeper.interval_seconds == 0 {
            return Err(AppError::configuration(
                "sweeper.interval_seconds must be at least 1",
            ));
        }
        Ok(())
    }
}
