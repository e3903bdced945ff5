//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Price fetch round trip
    PriceFetch,
    /// Full fetch-aggregate-render cycle
    Cycle,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Last stored price
    LastPrice,
    /// Window low
    WindowLow,
    /// Window high
    WindowHigh,
    /// Samples currently held
    BufferLength,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Ticks fired
    Ticks,
    /// Failed fetches
    FetchFailures,
    /// Ticks dropped because a cycle was still running
    SkippedTicks,
    /// Samples evicted from the window
    EvictedSamples,
}

impl LatencyMetric {
    pub fn name(self) -> &'static str {
        match self {
            LatencyMetric::PriceFetch => "tickerwatch_price_fetch_latency_ms",
            LatencyMetric::Cycle => "tickerwatch_cycle_latency_ms",
        }
    }
}

impl GaugeMetric {
    pub fn name(self) -> &'static str {
        match self {
            GaugeMetric::LastPrice => "tickerwatch_last_price",
            GaugeMetric::WindowLow => "tickerwatch_window_low",
            GaugeMetric::WindowHigh => "tickerwatch_window_high",
            GaugeMetric::BufferLength => "tickerwatch_buffer_samples",
        }
    }
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::Ticks => "tickerwatch_ticks_total",
            CounterMetric::FetchFailures => "tickerwatch_fetch_failures_total",
            CounterMetric::SkippedTicks => "tickerwatch_skipped_ticks_total",
            CounterMetric::EvictedSamples => "tickerwatch_evicted_samples_total",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    ::metrics::histogram!(metric.name()).record(duration.as_secs_f64() * 1000.0);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
}

/// Increment a counter
pub fn increment_counter(metric: CounterMetric, by: u64) {
    ::metrics::counter!(metric.name()).increment(by);
}

/// Serve Prometheus metrics on `0.0.0.0:port`
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter on {}: {}", addr, e))?;

    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}
