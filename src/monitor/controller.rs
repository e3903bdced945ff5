//! Fetch-aggregate-render cycle driver

use super::{Clock, CycleError, CyclePhase, MonitorState, SystemClock, Tick, TickScheduler};
use crate::config::WatchSettings;
use crate::dashboard::Dashboard;
use crate::feed::{FetchError, PriceSource};
use crate::telemetry::{
    increment_counter, record_latency, set_gauge, CounterMetric, GaugeMetric, LatencyMetric,
};
use crate::window::{Sample, Stats};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::time::Instant;

/// Notice shown once the scheduler has stopped
pub const SHUTDOWN_NOTICE: &str = "terminated, exiting";

/// What a single cycle did
#[derive(Debug)]
pub enum CycleOutcome {
    /// A sample was stored and a frame drawn
    Rendered { stats: Stats, evicted: usize },
    /// The cycle stopped early; state is unchanged
    Failed(CycleError),
}

impl CycleOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, CycleOutcome::Rendered { .. })
    }
}

/// Owns the monitor state and wires source, window and dashboard together
pub struct Controller<S, D> {
    settings: WatchSettings,
    source: S,
    dashboard: D,
    state: MonitorState,
    clock: Box<dyn Clock>,
}

impl<S: PriceSource, D: Dashboard> Controller<S, D> {
    /// Create a controller with an empty window
    pub fn new(settings: WatchSettings, source: S, dashboard: D) -> Self {
        let state = MonitorState::new(&settings);
        Self {
            settings,
            source,
            dashboard,
            state,
            clock: Box::new(SystemClock),
        }
    }

    /// Stamp samples from `clock` instead of the system clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn settings(&self) -> &WatchSettings {
        &self.settings
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn dashboard(&self) -> &D {
        &self.dashboard
    }

    /// Drive cycles until the scheduler is stopped, then show the exit notice.
    ///
    /// Each cycle finishes before the next tick is requested, so the window is
    /// only ever touched by one cycle at a time.
    pub async fn run(&mut self, mut scheduler: TickScheduler) {
        tracing::info!(
            symbol = %self.settings.symbol,
            interval = ?self.settings.tick_interval,
            retention = ?self.settings.retention,
            eviction = ?self.settings.eviction,
            "Starting monitor"
        );

        if let Err(e) = self.dashboard.clear() {
            tracing::warn!(error = %e, "Failed to clear dashboard");
        }

        while let Some(tick) = scheduler.next_tick().await {
            self.run_cycle(&tick).await;
        }

        tracing::info!(
            ticks = self.state.counters().ticks,
            failures = self.state.counters().failures,
            "Scheduler stopped"
        );

        if let Err(e) = self.dashboard.notify(SHUTDOWN_NOTICE) {
            tracing::warn!(error = %e, "Failed to show shutdown notice");
        }
    }

    /// Run one fetch-aggregate-render cycle
    pub async fn run_cycle(&mut self, tick: &Tick) -> CycleOutcome {
        let started = Instant::now();
        self.state.record_tick(tick.skipped);
        increment_counter(CounterMetric::Ticks, 1);

        if tick.skipped > 0 {
            increment_counter(CounterMetric::SkippedTicks, tick.skipped);
            tracing::warn!(
                seq = tick.seq,
                skipped = tick.skipped,
                "Previous cycle overran, skipped ticks"
            );
        }

        self.state.set_phase(CyclePhase::Fetching);
        let outcome = match self.fetch().await {
            Ok(raw) => self.aggregate_and_render(raw),
            Err(e) => {
                self.state.set_phase(CyclePhase::Failed);
                self.fail(CycleError::Fetch(e))
            }
        };

        self.state.set_phase(CyclePhase::Idle);
        record_latency(LatencyMetric::Cycle, started.elapsed());

        outcome
    }

    /// Fetch the current price, bounded by the configured timeout
    async fn fetch(&self) -> Result<Decimal, FetchError> {
        let started = Instant::now();
        let timeout = self.settings.fetch_timeout;

        let fetch = self.source.fetch(&self.settings.symbol);
        let result = match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        record_latency(LatencyMetric::PriceFetch, started.elapsed());
        result
    }

    fn aggregate_and_render(&mut self, raw: Decimal) -> CycleOutcome {
        self.state.set_phase(CyclePhase::Aggregating);

        let sample = Sample::from_raw(raw, self.clock.now());
        let aggregated = match self.state.aggregate(sample) {
            Ok(aggregated) => aggregated,
            Err(e) => {
                tracing::error!(error = %e, "Statistics unavailable after append");
                self.state.set_phase(CyclePhase::Failed);
                return self.fail(CycleError::Invariant(e));
            }
        };

        if aggregated.evicted > 0 {
            increment_counter(CounterMetric::EvictedSamples, aggregated.evicted as u64);
        }
        self.publish_gauges(sample.price, aggregated.stats);

        tracing::debug!(
            price = %sample.price,
            low = %aggregated.stats.low,
            high = %aggregated.stats.high,
            samples = self.state.buffer().len(),
            evicted = aggregated.evicted,
            "Stored sample"
        );

        self.state.set_phase(CyclePhase::Rendering);
        if let Some(snapshot) = self.state.snapshot(&self.settings) {
            if let Err(e) = self.dashboard.render(&snapshot) {
                tracing::warn!(error = %e, "Failed to render dashboard");
            }
        }

        CycleOutcome::Rendered {
            stats: aggregated.stats,
            evicted: aggregated.evicted,
        }
    }

    /// Record a failed cycle and surface it as a one-line notice
    fn fail(&mut self, error: CycleError) -> CycleOutcome {
        increment_counter(CounterMetric::FetchFailures, 1);
        tracing::warn!(error = %error, symbol = %self.settings.symbol, "Cycle failed");

        self.state.record_failure(&error);
        if let Err(e) = self.dashboard.notify(&format!("error: {}", error)) {
            tracing::warn!(error = %e, "Failed to show error notice");
        }

        CycleOutcome::Failed(error)
    }

    fn publish_gauges(&self, price: Decimal, stats: Stats) {
        let as_f64 = |value: Decimal| value.to_f64().unwrap_or_default();
        set_gauge(GaugeMetric::LastPrice, as_f64(price));
        set_gauge(GaugeMetric::WindowLow, as_f64(stats.low));
        set_gauge(GaugeMetric::WindowHigh, as_f64(stats.high));
        set_gauge(GaugeMetric::BufferLength, self.state.buffer().len() as f64);
    }
}
