//! CLI command definitions and dispatch.

pub mod inspect;
pub mod migrate;
pub mod serve;
pub mod sweep;

use clap::{Parser, Subcommand};

use vanish_core::config::AppConfig;
use vanish_core::error::AppError;

use crate::output::OutputFormat;

/// Vanish: self-destructing text and file shares
#[derive(Debug, Parser)]
#[command(name = "vanish", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded next to the base file
    #[arg(short, long, env = "VANISH_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Vanish server
    Serve(serve::ServeArgs),
    /// Run one reclamation sweep and print the report
    Sweep,
    /// Apply PostgreSQL migrations
    Migrate,
    /// Show the lifecycle state of one record
    Inspect(inspect::InspectArgs),
}

impl Cli {
    /// Load configuration from the selected files and the environment.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Sweep => sweep::execute(config, self.format).await,
            Commands::Migrate => migrate::execute(config).await,
            Commands::Inspect(args) => inspect::execute(args, config, self.format).await,
        }
    }
}
