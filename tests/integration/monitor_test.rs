//! End-to-end tests of the monitor loop with scripted sources

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticker_watch::config::WatchSettings;
use ticker_watch::dashboard::{Dashboard, TerminalDashboard};
use ticker_watch::feed::{FetchError, PriceSource};
use ticker_watch::monitor::{
    Controller, SchedulerHandle, Snapshot, TickScheduler, TokioClock, SHUTDOWN_NOTICE,
};
use ticker_watch::window::{EvictionMode, RetentionPolicy, Stats};

/// Replays prices in order; `None` fails with a 503
struct ScriptedSource {
    script: Mutex<VecDeque<Option<Decimal>>>,
}

impl ScriptedSource {
    fn new(script: Vec<Option<Decimal>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch(&self, _symbol: &str) -> Result<Decimal, FetchError> {
        let next = self.script.lock().unwrap().pop_front().flatten();
        next.ok_or(FetchError::Status {
            status: 503,
            body: "busy".to_string(),
        })
    }
}

/// Takes `delay` to answer and tracks how many fetches overlap
struct SlowSource {
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

#[async_trait]
impl PriceSource for SlowSource {
    async fn fetch(&self, _symbol: &str) -> Result<Decimal, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(dec!(50.00))
    }
}

#[derive(Default)]
struct RecordingDashboard {
    frames: Vec<Snapshot>,
    notices: Vec<String>,
}

impl Dashboard for RecordingDashboard {
    fn render(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        self.frames.push(snapshot.clone());
        Ok(())
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writer whose bytes stay readable after the dashboard is moved
#[derive(Clone, Default)]
struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn settings(history_secs: i64) -> WatchSettings {
    WatchSettings::new(
        "eth-usd",
        Duration::from_secs(5),
        RetentionPolicy::from_history_secs(history_secs),
    )
}

fn buffer_prices<S: PriceSource, D: Dashboard>(controller: &Controller<S, D>) -> Vec<Decimal> {
    controller
        .state()
        .buffer()
        .iter()
        .map(|s| s.price)
        .collect()
}

fn stop_after(handle: SchedulerHandle, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        handle.stop();
    });
}

#[tokio::test(start_paused = true)]
async fn test_bounded_window_over_four_ticks() {
    let script = vec![
        Some(dec!(100.00)),
        Some(dec!(101.00)),
        Some(dec!(102.00)),
        Some(dec!(103.00)),
    ];
    let mut controller =
        Controller::new(settings(15), ScriptedSource::new(script), RecordingDashboard::default());
    let (scheduler, handle) = TickScheduler::new(Duration::from_secs(5));
    stop_after(handle, Duration::from_secs(22));

    controller.run(scheduler).await;

    let prices = buffer_prices(&controller);
    assert_eq!(prices, vec![dec!(101.00), dec!(102.00), dec!(103.00)]);

    let last = controller.dashboard().frames.last().unwrap();
    assert_eq!(
        last.stats,
        Stats {
            low: dec!(101.00),
            high: dec!(103.00)
        }
    );
    assert_eq!(last.window_span, Duration::from_secs(15));
    assert_eq!(controller.dashboard().frames.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_failure_then_recovery() {
    let script = vec![Some(dec!(100.00)), None, Some(dec!(99.50))];
    let mut controller =
        Controller::new(settings(900), ScriptedSource::new(script), RecordingDashboard::default());
    let (scheduler, handle) = TickScheduler::new(Duration::from_secs(5));
    stop_after(handle, Duration::from_secs(17));

    controller.run(scheduler).await;

    let dashboard = controller.dashboard();
    assert_eq!(dashboard.frames.len(), 2);
    assert_eq!(
        dashboard.notices,
        vec![
            "error: upstream returned 503: busy".to_string(),
            SHUTDOWN_NOTICE.to_string()
        ]
    );
    assert_eq!(
        dashboard.frames[1].stats,
        Stats {
            low: dec!(99.50),
            high: dec!(100.00)
        }
    );

    let counters = controller.state().counters();
    assert_eq!(counters.ticks, 3);
    assert_eq!(counters.successes, 2);
    assert_eq!(counters.failures, 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetches_never_overlap() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let source = SlowSource {
        delay: Duration::from_secs(12),
        in_flight: in_flight.clone(),
        max_in_flight: max_in_flight.clone(),
    };

    let mut settings = settings(900);
    settings.fetch_timeout = Duration::from_secs(20);
    let mut controller = Controller::new(settings, source, RecordingDashboard::default());
    let (scheduler, handle) = TickScheduler::new(Duration::from_secs(5));
    stop_after(handle, Duration::from_secs(30));

    controller.run(scheduler).await;

    // Ticks fire at 5s, 17s and 29s; the deadlines at 15s and 25s are dropped
    let counters = controller.state().counters();
    assert_eq!(counters.ticks, 3);
    assert_eq!(counters.skipped_ticks, 2);
    assert_eq!(counters.successes, 3);
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
}

/// Run 20 ticks at 5s over a 15s window, stamping samples from the tokio clock
async fn run_twenty_ticks(
    eviction: EvictionMode,
) -> Controller<ScriptedSource, RecordingDashboard> {
    let script = (1..=20).map(|i| Some(Decimal::from(i))).collect();
    let mut settings = settings(15);
    settings.eviction = eviction;

    let mut controller =
        Controller::new(settings, ScriptedSource::new(script), RecordingDashboard::default())
            .with_clock(TokioClock::new());
    let (scheduler, handle) = TickScheduler::new(Duration::from_secs(5));
    stop_after(handle, Duration::from_secs(102));

    controller.run(scheduler).await;
    controller
}

#[tokio::test(start_paused = true)]
async fn test_strict_eviction_settles_by_age() {
    let controller = run_twenty_ticks(EvictionMode::Strict).await;

    let buffer = controller.state().buffer();
    let prices: Vec<Decimal> = buffer.iter().map(|s| s.price).collect();
    assert_eq!(controller.state().counters().ticks, 20);
    assert_eq!(prices, vec![dec!(17), dec!(18), dec!(19), dec!(20)]);
    assert_eq!(buffer.covered_span(), chrono::Duration::seconds(15));
    assert_eq!(controller.state().counters().evicted, 16);
}

#[tokio::test(start_paused = true)]
async fn test_per_tick_eviction_settles_by_count() {
    let controller = run_twenty_ticks(EvictionMode::PerTick).await;

    let prices = buffer_prices(&controller);
    assert_eq!(controller.state().counters().ticks, 20);
    assert_eq!(prices, vec![dec!(18), dec!(19), dec!(20)]);
    assert_eq!(controller.state().counters().evicted, 17);
}

#[tokio::test(start_paused = true)]
async fn test_terminal_output_end_to_end() {
    let output = SharedOutput::default();
    let dashboard = TerminalDashboard::new(output.clone(), 15);
    let script = vec![Some(dec!(3021.456)), Some(dec!(3030.1))];
    let mut controller = Controller::new(settings(900), ScriptedSource::new(script), dashboard);
    let (scheduler, handle) = TickScheduler::new(Duration::from_secs(5));
    stop_after(handle, Duration::from_secs(12));

    controller.run(scheduler).await;

    let out = output.contents();
    assert!(out.contains("update:  5s"));
    assert!(out.contains("showing: 10s"));
    assert!(out.contains(
        "ticker:  ETH-USD price: 3030.10 hi: 3030.10 lo: 3021.46"
    ));
    assert!(out.contains("[notice] terminated, exiting"));
    assert!(out.ends_with("[notice] terminated, exiting"));
}
