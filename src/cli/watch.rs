//! Watch command implementation

use super::FeedArgs;
use crate::config::{Config, WatchSettings};
use crate::dashboard::TerminalDashboard;
use crate::feed::CoinbaseTicker;
use crate::monitor::{shutdown_signal, Controller, TickScheduler};
use crate::window::EvictionMode;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Update interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Total history to record in seconds (0 or less keeps everything)
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    pub history: Option<i64>,

    /// Drop every sample older than the history span on each tick
    #[arg(long)]
    pub strict_eviction: bool,
}

impl WatchArgs {
    /// Overlay command-line values on the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        self.feed.apply(config);
        if let Some(interval) = self.interval {
            config.monitor.interval_secs = interval;
        }
        if let Some(history) = self.history {
            config.monitor.history_secs = history;
        }
        if self.strict_eviction {
            config.monitor.eviction = EvictionMode::Strict;
        }
    }

    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        self.apply(&mut config);
        let settings = WatchSettings::try_from(&config)?;
        let source = CoinbaseTicker::with_config(config.feed.coinbase_config()?)?;
        let dashboard = TerminalDashboard::stdout(settings.table_rows);

        let (scheduler, handle) = TickScheduler::new(settings.tick_interval);
        tokio::spawn(async move {
            shutdown_signal().await;
            handle.stop();
        });

        let mut controller = Controller::new(settings, source, dashboard);
        controller.run(scheduler).await;

        // Leave the shell prompt below the status row
        println!("\n");
        Ok(())
    }
}
