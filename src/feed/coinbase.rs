//! Coinbase Exchange product ticker
//!
//! Polls `GET /products/{symbol}/ticker` and returns the last trade price.
//! The endpoint is public; when credentials are configured the request is
//! signed the way the exchange's authenticated endpoints expect.

use super::{Credentials, FetchError, PriceSource};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use std::str::FromStr;
use std::time::Duration;

/// Coinbase Exchange REST base URL
pub const COINBASE_API_URL: &str = "https://api.exchange.coinbase.com";

const USER_AGENT: &str = concat!("ticker-watch/", env!("CARGO_PKG_VERSION"));

type HmacSha256 = Hmac<Sha256>;

/// Configuration for the Coinbase ticker client
#[derive(Debug, Clone)]
pub struct CoinbaseConfig {
    /// Base URL for the REST API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Optional API credentials
    pub credentials: Option<Credentials>,
}

impl Default for CoinbaseConfig {
    fn default() -> Self {
        Self {
            base_url: COINBASE_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            credentials: None,
        }
    }
}

/// Product ticker response
#[derive(Debug, Deserialize)]
struct TickerResponse {
    /// Last trade price
    price: String,
    /// Best bid
    #[allow(dead_code)]
    bid: Option<String>,
    /// Best ask
    #[allow(dead_code)]
    ask: Option<String>,
    /// Time of the last trade
    #[allow(dead_code)]
    time: Option<String>,
}

/// REST client for the product ticker endpoint
pub struct CoinbaseTicker {
    config: CoinbaseConfig,
    client: Client,
}

impl CoinbaseTicker {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(CoinbaseConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: CoinbaseConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CoinbaseConfig {
        &self.config
    }

    /// Request path for a product ticker
    fn ticker_path(symbol: &str) -> String {
        format!("/products/{}/ticker", symbol)
    }

    /// Parse the ticker JSON body into a price
    fn parse_ticker(body: &str) -> Result<Decimal, FetchError> {
        let ticker: TickerResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Decimal::from_str(&ticker.price)
            .map_err(|e| FetchError::Parse(format!("price {:?}: {}", ticker.price, e)))
    }
}

/// Sign a request: base64(HMAC-SHA256(base64decode(secret), timestamp + method + path + body))
fn sign_request(
    secret: &str,
    timestamp: &str,
    method: &str,
    path: &str,
    body: &str,
) -> Result<String, FetchError> {
    let key = STANDARD
        .decode(secret)
        .map_err(|e| FetchError::InvalidCredentials(format!("secret is not base64: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| FetchError::InvalidCredentials(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(body.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[async_trait]
impl PriceSource for CoinbaseTicker {
    async fn fetch(&self, symbol: &str) -> Result<Decimal, FetchError> {
        let path = Self::ticker_path(symbol);
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        tracing::debug!(url = %url, "Fetching product ticker");

        let mut request = self.client.get(&url);

        if let Some(creds) = &self.config.credentials {
            let timestamp = chrono::Utc::now().timestamp().to_string();
            let signature = sign_request(&creds.secret, &timestamp, "GET", &path, "")?;
            request = request
                .header("CB-ACCESS-KEY", &creds.key)
                .header("CB-ACCESS-SIGN", signature)
                .header("CB-ACCESS-TIMESTAMP", timestamp)
                .header("CB-ACCESS-PASSPHRASE", &creds.passphrase);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Self::parse_ticker(&body)
    }
}
