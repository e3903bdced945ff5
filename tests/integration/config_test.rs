//! Integration tests for configuration loading

use std::time::Duration;
use ticker_watch::config::{Config, WatchSettings};
use ticker_watch::window::{EvictionMode, RetentionPolicy};

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();

    let settings = WatchSettings::try_from(&config).unwrap();
    assert_eq!(settings.symbol, "ETH-USD");
    assert_eq!(settings.tick_interval, Duration::from_secs(5));
    assert_eq!(
        settings.retention,
        RetentionPolicy::BoundedBySpan(Duration::from_secs(900))
    );
    assert_eq!(settings.eviction, EvictionMode::PerTick);
    assert_eq!(settings.table_rows, 15);
    assert!(config.feed.credentials().unwrap().is_none());
}

#[test]
fn test_config_example_matches_builtin_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let example = Config::load(path).unwrap();
    let builtin = Config::default();

    assert_eq!(
        WatchSettings::try_from(&example).unwrap(),
        WatchSettings::try_from(&builtin).unwrap()
    );
    assert_eq!(example.telemetry, builtin.telemetry);
    assert_eq!(example.feed.base_url, builtin.feed.base_url);
    assert_eq!(
        example.feed.request_timeout_secs,
        builtin.feed.request_timeout_secs
    );
}
