//! Quote command implementation

use super::FeedArgs;
use crate::config::{Config, WatchSettings};
use crate::feed::{CoinbaseTicker, PriceSource};
use crate::window::round_price;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub feed: FeedArgs,
}

impl QuoteArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        self.feed.apply(&mut config);
        let settings = WatchSettings::try_from(&config)?;
        let source = CoinbaseTicker::with_config(config.feed.coinbase_config()?)?;

        let price = source.fetch(&settings.symbol).await?;
        println!("{} {:.2}", settings.symbol, round_price(price));
        Ok(())
    }
}
