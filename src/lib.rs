//! ticker-watch: live terminal price monitor
//!
//! This library provides the core components for:
//! - Polling the latest trade price from the Coinbase Exchange REST API
//! - A bounded rolling window of timestamped samples
//! - High/low statistics over the window
//! - A fixed-period tick scheduler with skip-if-busy semantics
//! - The fetch-aggregate-render controller
//! - A crossterm text dashboard
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod monitor;
pub mod telemetry;
pub mod window;
