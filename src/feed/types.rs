//! Price feed types

use std::time::Duration;
use thiserror::Error;

/// Reasons a single price fetch can fail
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Upstream answered with a non-success status
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Response body could not be turned into a price
    #[error("malformed ticker response: {0}")]
    Parse(String),
    /// No answer within the allowed time
    #[error("no response within {0:?}")]
    Timeout(Duration),
    /// Credentials could not be used to sign the request
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// API credentials for authenticated requests
#[derive(Clone)]
pub struct Credentials {
    pub key: String,
    /// Base64-encoded signing secret
    pub secret: String,
    pub passphrase: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}
