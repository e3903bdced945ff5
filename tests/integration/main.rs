//! Integration tests

mod config_test;
mod feed_test;
mod monitor_test;
