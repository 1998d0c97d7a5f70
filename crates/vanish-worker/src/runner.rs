//! Sweep runner: runs the sweeper on a fixed period until shutdown.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing;

use vanish_core::config::sweeper::SweeperConfig;

use crate::sweeper::Sweeper;

/// Periodic driver for the [`Sweeper`].
#[derive(Debug)]
pub struct SweepRunner {
    /// The sweeper to run.
    sweeper: Arc<Sweeper>,
    /// Period and startup behaviour.
    config: SweeperConfig,
}

impl SweepRunner {
    /// Create a new sweep runner
    pub fn new(sweeper: Arc<Sweeper>, config: SweeperConfig) -> Self {
        Self { sweeper, config }
    }

    /// Run until the cancel signal turns `true` or its sender is dropped.
    ///
    /// A sweep in progress when shutdown is signalled is allowed to finish.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let period = self.config.interval();
        tracing::info!(
            interval_seconds = self.config.interval_seconds,
            sweep_on_start = self.config.sweep_on_start,
            "Sweeper started"
        );

        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !self.config.sweep_on_start {
            // The first tick of an interval completes immediately.
            ticker.tick().await;
        }

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Sweeper received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweeper.sweep().await {
                        tracing::error!(error = %e, "Sweep failed");
                    }
                }
            }
        }

        tracing::info!("Sweeper stopped");
    }
}
