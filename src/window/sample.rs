//! Price sample type

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept on stored prices
pub const PRICE_SCALE: u32 = 2;

/// A single timestamped price observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Observed price, rounded to [`PRICE_SCALE`] places
    pub price: Decimal,
    /// Local time the observation was taken
    pub observed_at: DateTime<Utc>,
}

impl Sample {
    /// Create a sample from an already rounded price
    pub fn new(price: Decimal, observed_at: DateTime<Utc>) -> Self {
        Self { price, observed_at }
    }

    /// Create a sample from a raw upstream price, rounding it half-up
    pub fn from_raw(raw: Decimal, observed_at: DateTime<Utc>) -> Self {
        Self::new(round_price(raw), observed_at)
    }
}

/// Round a raw price to two decimal places, ties away from zero
pub fn round_price(raw: Decimal) -> Decimal {
    raw.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
