//! Bounded sample buffer
//!
//! Samples are kept in arrival order. Retention is expressed as a span of
//! seconds; how that span turns into evictions is chosen by [`EvictionMode`].

use super::Sample;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// How long samples remain in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep every sample for the life of the process
    Unbounded,
    /// Keep roughly this much history
    BoundedBySpan(Duration),
}

impl RetentionPolicy {
    /// Build a policy from a history length in seconds (<= 0 means unbounded)
    pub fn from_history_secs(history_secs: i64) -> Self {
        if history_secs <= 0 {
            RetentionPolicy::Unbounded
        } else {
            RetentionPolicy::BoundedBySpan(Duration::from_secs(history_secs.unsigned_abs()))
        }
    }

    /// Retained span, if bounded
    pub fn span(&self) -> Option<Duration> {
        match self {
            RetentionPolicy::Unbounded => None,
            RetentionPolicy::BoundedBySpan(span) => Some(*span),
        }
    }
}

/// Eviction strategy applied once per tick under a bounded policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionMode {
    /// Drop at most the single oldest sample per tick once the sample count
    /// exceeds `ceil(span / tick_interval)`
    #[default]
    PerTick,
    /// Drop every sample older than `newest - span`
    Strict,
}

/// Ordered, bounded sequence of price samples
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    retention: RetentionPolicy,
    eviction: EvictionMode,
    tick_interval: Duration,
}

impl SampleBuffer {
    /// Create an empty buffer
    pub fn new(
        retention: RetentionPolicy,
        eviction: EvictionMode,
        tick_interval: Duration,
    ) -> Self {
        let samples = match capacity_for(retention, tick_interval) {
            Some(capacity) => VecDeque::with_capacity(capacity + 1),
            None => VecDeque::new(),
        };

        Self {
            samples,
            retention,
            eviction,
            tick_interval,
        }
    }

    /// Create a buffer that never evicts
    pub fn unbounded() -> Self {
        Self::new(
            RetentionPolicy::Unbounded,
            EvictionMode::PerTick,
            Duration::from_secs(1),
        )
    }

    /// Append a sample at the newest end
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
    }

    /// Trim the oldest samples according to the retention policy.
    ///
    /// Meant to be called once per tick, right after [`append`](Self::append).
    /// Under [`EvictionMode::PerTick`] the buffer may hold one sample more than
    /// its capacity between the append and this call. Returns the number of
    /// samples removed.
    pub fn evict_oldest_if_over_bound(&mut self) -> usize {
        let Some(span) = self.retention.span() else {
            return 0;
        };

        match self.eviction {
            EvictionMode::PerTick => {
                let capacity =
                    capacity_for(self.retention, self.tick_interval).unwrap_or(usize::MAX);
                if self.samples.len() > capacity {
                    self.samples.pop_front();
                    1
                } else {
                    0
                }
            }
            EvictionMode::Strict => {
                let Some(newest) = self.samples.back() else {
                    return 0;
                };
                let span_ms = i64::try_from(span.as_millis()).unwrap_or(i64::MAX);
                let Some(cutoff) = newest
                    .observed_at
                    .checked_sub_signed(chrono::Duration::milliseconds(span_ms))
                else {
                    return 0;
                };

                let mut evicted = 0;
                while let Some(oldest) = self.samples.front() {
                    if oldest.observed_at < cutoff {
                        self.samples.pop_front();
                        evicted += 1;
                    } else {
                        break;
                    }
                }
                evicted
            }
        }
    }

    /// Owned copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Owned copy of the newest `n` samples, oldest first
    pub fn latest(&self, n: usize) -> Vec<Sample> {
        let start = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(start).copied().collect()
    }

    /// Iterate samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Most recent sample
    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn eviction(&self) -> EvictionMode {
        self.eviction
    }

    /// Sample count bound under per-tick eviction, if any
    pub fn capacity(&self) -> Option<usize> {
        match self.eviction {
            EvictionMode::PerTick => capacity_for(self.retention, self.tick_interval),
            EvictionMode::Strict => None,
        }
    }

    /// Time between the oldest and newest sample
    pub fn covered_span(&self) -> chrono::Duration {
        match (self.samples.front(), self.samples.back()) {
            (Some(oldest), Some(newest)) => newest.observed_at - oldest.observed_at,
            _ => chrono::Duration::zero(),
        }
    }
}

/// Number of ticks needed to cover the retained span
fn capacity_for(retention: RetentionPolicy, tick_interval: Duration) -> Option<usize> {
    let span = retention.span()?;
    let interval_ms = tick_interval.as_millis().max(1);
    let ticks = span.as_millis().div_ceil(interval_ms).max(1);
    Some(usize::try_from(ticks).unwrap_or(usize::MAX))
}
