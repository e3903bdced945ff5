//! Window statistics

use super::{Sample, SampleBuffer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Statistics errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    /// No samples to summarize
    #[error("cannot compute statistics over an empty sample buffer")]
    EmptyBuffer,
}

/// High/low over the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub low: Decimal,
    pub high: Decimal,
}

impl Stats {
    /// Compute statistics over everything currently in the buffer
    pub fn compute(buffer: &SampleBuffer) -> Result<Self, StatsError> {
        Self::from_samples(buffer.iter())
    }

    /// Compute statistics over an arbitrary sequence of samples
    pub fn from_samples<'a>(
        samples: impl IntoIterator<Item = &'a Sample>,
    ) -> Result<Self, StatsError> {
        let mut iter = samples.into_iter();
        let first = iter.next().ok_or(StatsError::EmptyBuffer)?;

        let (low, high) = iter.fold((first.price, first.price), |(low, high), s| {
            (low.min(s.price), high.max(s.price))
        });

        Ok(Self { low, high })
    }

    /// Whether a price lies within [low, high]
    pub fn contains(&self, price: Decimal) -> bool {
        self.low <= price && price <= self.high
    }

    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}
