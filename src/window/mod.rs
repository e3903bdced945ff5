//! Rolling price window
//!
//! Timestamped samples, the bounded buffer that holds them, and the
//! high/low statistics derived from its contents.

mod buffer;
mod sample;
mod stats;

pub use buffer::{EvictionMode, RetentionPolicy, SampleBuffer};
pub use sample::{round_price, Sample};
pub use stats::{Stats, StatsError};
