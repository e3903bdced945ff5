//! Configuration types for ticker-watch

use crate::feed::{CoinbaseConfig, Credentials, COINBASE_API_URL};
use crate::telemetry::LogFormat;
use crate::window::{EvictionMode, RetentionPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors, fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Ticker symbol is blank
    #[error("ticker symbol must not be empty")]
    EmptySymbol,
    /// Tick interval is zero
    #[error("update interval must be a positive number of seconds, got {0}")]
    InvalidInterval(u64),
    /// Fetch timeout is zero
    #[error("fetch timeout must be a positive number of seconds")]
    InvalidTimeout,
    /// Dashboard table would be empty
    #[error("dashboard must show at least one sample row")]
    InvalidTableRows,
    /// Only some of key/secret/passphrase were given
    #[error("API key, secret and passphrase must be provided together")]
    IncompleteCredentials,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Product to watch (e.g., "ETH-USD")
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// REST API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// API key
    #[serde(default)]
    pub key: Option<String>,

    /// Base64-encoded API secret
    #[serde(default)]
    pub secret: Option<String>,

    /// API passphrase
    #[serde(default)]
    pub passphrase: Option<String>,
}

fn default_symbol() -> String {
    "ETH-USD".to_string()
}
fn default_base_url() -> String {
    COINBASE_API_URL.to_string()
}
fn default_request_timeout() -> u64 {
    10
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            key: None,
            secret: None,
            passphrase: None,
        }
    }
}

impl FeedConfig {
    /// Credentials, if all three parts are present
    pub fn credentials(&self) -> Result<Option<Credentials>, ConfigError> {
        match (&self.key, &self.secret, &self.passphrase) {
            (Some(key), Some(secret), Some(passphrase)) => Ok(Some(Credentials {
                key: key.clone(),
                secret: secret.clone(),
                passphrase: passphrase.clone(),
            })),
            (None, None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteCredentials),
        }
    }

    /// Build the REST client configuration
    pub fn coinbase_config(&self) -> Result<CoinbaseConfig, ConfigError> {
        Ok(CoinbaseConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            credentials: self.credentials()?,
        })
    }
}

/// Polling and window configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between ticks
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Seconds of history to keep; zero or negative keeps everything
    #[serde(default = "default_history")]
    pub history_secs: i64,

    /// How the history bound is enforced
    #[serde(default)]
    pub eviction: EvictionMode,

    /// Upper bound on a single fetch (seconds); defaults to the interval
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// Number of recent samples shown in the table
    #[serde(default = "default_table_rows")]
    pub table_rows: usize,
}

fn default_interval() -> u64 {
    5
}
fn default_history() -> i64 {
    900
}
fn default_table_rows() -> usize {
    15
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            history_secs: default_history(),
            eviction: EvictionMode::PerTick,
            fetch_timeout_secs: None,
            table_rows: default_table_rows(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// Default log filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log file, kept off the dashboard's terminal; logs go to stderr when unset
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,

    /// Port for the Prometheus scrape endpoint
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("ticker-watch.log"))
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            log_file: default_log_file(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Validated settings the monitor runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    /// Uppercased product symbol
    pub symbol: String,
    pub tick_interval: Duration,
    pub retention: RetentionPolicy,
    pub eviction: EvictionMode,
    pub fetch_timeout: Duration,
    pub table_rows: usize,
}

impl WatchSettings {
    /// Settings with default timeout and table size
    pub fn new(
        symbol: impl Into<String>,
        tick_interval: Duration,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            tick_interval,
            retention,
            eviction: EvictionMode::PerTick,
            fetch_timeout: tick_interval,
            table_rows: default_table_rows(),
        }
    }
}

impl TryFrom<&Config> for WatchSettings {
    type Error = ConfigError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let symbol = config.feed.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ConfigError::EmptySymbol);
        }

        let monitor = &config.monitor;
        if monitor.interval_secs == 0 {
            return Err(ConfigError::InvalidInterval(monitor.interval_secs));
        }
        if monitor.table_rows == 0 {
            return Err(ConfigError::InvalidTableRows);
        }

        let tick_interval = Duration::from_secs(monitor.interval_secs);
        let fetch_timeout = match monitor.fetch_timeout_secs {
            Some(0) => return Err(ConfigError::InvalidTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => tick_interval,
        };

        config.feed.credentials()?;

        Ok(Self {
            symbol,
            tick_interval,
            retention: RetentionPolicy::from_history_secs(monitor.history_secs),
            eviction: monitor.eviction,
            fetch_timeout,
            table_rows: monitor.table_rows,
        })
    }
}
