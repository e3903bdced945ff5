//! CLI interface for ticker-watch
//!
//! Provides subcommands for:
//! - `watch`: Run the live dashboard
//! - `quote`: Fetch and print the current price once
//! - `config`: Show the effective configuration

mod quote;
mod watch;

pub use quote::QuoteArgs;
pub use watch::WatchArgs;

use crate::config::Config;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ticker-watch")]
#[command(about = "Live terminal price monitor with a rolling high/low window")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the live dashboard
    Watch(WatchArgs),
    /// Fetch and print the current price once
    Quote(QuoteArgs),
    /// Show the effective configuration
    Config,
}

/// Feed options shared by the subcommands that talk to the exchange
#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    /// Product to watch: BTC-USD, ETH-USD, etc.
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// API key
    #[arg(short, long, env = "TICKER_WATCH_KEY")]
    pub key: Option<String>,

    /// API secret (base64)
    #[arg(short, long, env = "TICKER_WATCH_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// API passphrase
    #[arg(short, long, env = "TICKER_WATCH_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
}

impl FeedArgs {
    /// Overlay command-line values on the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(ticker) = &self.ticker {
            config.feed.symbol = ticker.clone();
        }
        if let Some(key) = &self.key {
            config.feed.key = Some(key.clone());
        }
        if let Some(secret) = &self.secret {
            config.feed.secret = Some(secret.clone());
        }
        if let Some(passphrase) = &self.passphrase {
            config.feed.passphrase = Some(passphrase.clone());
        }
    }
}
