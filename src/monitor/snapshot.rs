//! Read-only view handed to the dashboard

use crate::window::{Sample, Stats};
use rust_decimal::Decimal;
use std::time::Duration;

/// Everything the dashboard needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Product being watched
    pub symbol: String,
    /// Configured tick interval
    pub tick_interval: Duration,
    /// History shown: samples held times the tick interval
    pub window_span: Duration,
    /// Most recently stored price
    pub last_price: Decimal,
    /// High/low over the whole window
    pub stats: Stats,
    /// Most recent samples, oldest first
    pub samples: Vec<Sample>,
}
