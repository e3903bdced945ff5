//! Price feed module
//!
//! Polls the latest trade price for a product from the Coinbase Exchange REST API

mod coinbase;
mod types;

pub use coinbase::{CoinbaseConfig, CoinbaseTicker, COINBASE_API_URL};
pub use types::{Credentials, FetchError};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for price source implementations
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the latest trade price for `symbol`
    async fn fetch(&self, symbol: &str) -> Result<Decimal, FetchError>;
}
