//! Controller-owned monitor state

use super::Snapshot;
use crate::config::WatchSettings;
use crate::window::{Sample, SampleBuffer, Stats, StatsError};
use rust_decimal::Decimal;

/// Where the current cycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    Fetching,
    Aggregating,
    Rendering,
    Failed,
}

/// Running totals across cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleCounters {
    pub ticks: u64,
    pub successes: u64,
    pub failures: u64,
    pub skipped_ticks: u64,
    pub evicted: u64,
}

/// Result of one aggregation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregated {
    pub stats: Stats,
    pub evicted: usize,
}

/// All mutable monitor state
#[derive(Debug)]
pub struct MonitorState {
    buffer: SampleBuffer,
    stats: Option<Stats>,
    last_price: Option<Decimal>,
    last_error: Option<String>,
    phase: CyclePhase,
    counters: CycleCounters,
}

impl MonitorState {
    /// Empty state for the given settings
    pub fn new(settings: &WatchSettings) -> Self {
        Self {
            buffer: SampleBuffer::new(
                settings.retention,
                settings.eviction,
                settings.tick_interval,
            ),
            stats: None,
            last_price: None,
            last_error: None,
            phase: CyclePhase::Idle,
            counters: CycleCounters::default(),
        }
    }

    /// Append a sample, apply retention and recompute statistics
    pub fn aggregate(&mut self, sample: Sample) -> Result<Aggregated, StatsError> {
        self.buffer.append(sample);
        let evicted = self.buffer.evict_oldest_if_over_bound();
        let stats = Stats::compute(&self.buffer)?;

        self.stats = Some(stats);
        self.last_price = Some(sample.price);
        self.last_error = None;
        self.counters.successes += 1;
        self.counters.evicted += evicted as u64;

        Ok(Aggregated { stats, evicted })
    }

    /// Note a failed cycle without touching the window
    pub fn record_failure(&mut self, error: &impl std::fmt::Display) {
        self.last_error = Some(error.to_string());
        self.counters.failures += 1;
    }

    pub(crate) fn record_tick(&mut self, skipped: u64) {
        self.counters.ticks += 1;
        self.counters.skipped_ticks += skipped;
    }

    pub(crate) fn set_phase(&mut self, phase: CyclePhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "Cycle phase");
        self.phase = phase;
    }

    /// Frame data for the dashboard; `None` until the first successful fetch
    pub fn snapshot(&self, settings: &WatchSettings) -> Option<Snapshot> {
        let stats = self.stats?;
        let last_price = self.last_price?;
        let held = u32::try_from(self.buffer.len()).unwrap_or(u32::MAX);

        Some(Snapshot {
            symbol: settings.symbol.clone(),
            tick_interval: settings.tick_interval,
            window_span: settings.tick_interval.saturating_mul(held),
            last_price,
            stats,
            samples: self.buffer.latest(settings.table_rows),
        })
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> Option<Stats> {
        self.stats
    }

    pub fn last_price(&self) -> Option<Decimal> {
        self.last_price
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn counters(&self) -> CycleCounters {
        self.counters
    }
}
