//! Start the Vanish server.

use clap::Args;

use vanish_core::config::AppConfig;
use vanish_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Disable the background sweeper
    #[arg(long)]
    pub no_sweeper: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.no_sweeper {
        config.sweeper.enabled = false;
    }

    vanish_api::app::run_server(config).await
}
