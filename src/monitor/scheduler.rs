//! Fixed-period tick scheduler
//!
//! The scheduler is pulled, not pushed: the owner awaits [`TickScheduler::next_tick`]
//! and runs its cycle before asking again, so cycles never overlap. A deadline
//! that passes while a cycle is running fires once, immediately after that cycle;
//! any further deadlines that elapsed in the meantime are dropped and reported
//! through [`Tick::skipped`].

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// One scheduler firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 1-based firing count
    pub seq: u64,
    /// Deadline this tick was scheduled for
    pub scheduled_at: Instant,
    /// Deadlines dropped since this one came due
    pub skipped: u64,
}

/// Stops a running [`TickScheduler`]
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    stop_tx: Arc<watch::Sender<bool>>,
}

impl SchedulerHandle {
    /// Halt future firings. A cycle already in progress is not interrupted.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}

/// Fires one tick per period, starting one period after creation
pub struct TickScheduler {
    period: Duration,
    interval: Interval,
    stop_rx: watch::Receiver<bool>,
    stop_armed: bool,
    seq: u64,
}

impl TickScheduler {
    /// Create a scheduler and the handle that stops it
    pub fn new(period: Duration) -> (Self, SchedulerHandle) {
        let (stop_tx, stop_rx) = watch::channel(false);

        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let scheduler = Self {
            period,
            interval,
            stop_rx,
            stop_armed: true,
            seq: 0,
        };
        let handle = SchedulerHandle {
            stop_tx: Arc::new(stop_tx),
        };

        (scheduler, handle)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick. Returns `None` once stopped.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        loop {
            if *self.stop_rx.borrow_and_update() {
                return None;
            }

            tokio::select! {
                biased;

                changed = self.stop_rx.changed(), if self.stop_armed => {
                    if changed.is_err() {
                        // Every handle is gone, nothing can stop us any more
                        self.stop_armed = false;
                    }
                }

                scheduled_at = self.interval.tick() => {
                    self.seq += 1;
                    let late_by = Instant::now().saturating_duration_since(scheduled_at);
                    let skipped = (late_by.as_nanos() / self.period.as_nanos().max(1)) as u64;

                    return Some(Tick {
                        seq: self.seq,
                        scheduled_at,
                        skipped,
                    });
                }
            }
        }
    }
}
