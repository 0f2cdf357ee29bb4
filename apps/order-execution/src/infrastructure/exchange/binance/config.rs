//! Binance adapter configuration.

use std::fmt;
use std::time::Duration;

use crate::resilience::RetryPolicy;

/// Production REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Per-attempt HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default `recvWindow` in milliseconds.
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "BINANCE_API_KEY";
/// Environment variable holding the API secret.
pub const SECRET_KEY_ENV: &str = "BINANCE_SECRET_KEY";
/// Environment variable overriding the REST base URL.
pub const BASE_URL_ENV: &str = "BINANCE_REST_URL";

/// Configuration for the Binance adapter.
#[derive(Clone)]
pub struct BinanceConfig {
    /// API key, sent as `X-MBX-APIKEY`.
    pub api_key: String,
    /// API secret used for request signatures.
    pub api_secret: String,
    /// REST base URL.
    pub base_url: String,
    /// Per-attempt HTTP timeout.
    pub timeout: Duration,
    /// `recvWindow` sent with signed requests, in milliseconds.
    pub recv_window_ms: u64,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl BinanceConfig {
    /// Create a configuration with default endpoint, timeout and retry.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            retry: RetryPolicy::default(),
        }
    }

    /// Read credentials and base URL from the environment.
    ///
    /// Missing credentials are left empty; the client rejects them at
    /// construction.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var(API_KEY_ENV).unwrap_or_default(),
            std::env::var(SECRET_KEY_ENV).unwrap_or_default(),
        );
        if let Some(url) = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            config.base_url = url;
        }
        config
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the receive window.
    #[must_use]
    pub const fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns true if both key and secret are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }
}

impl fmt::Debug for BinanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceConfig")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("retry", &self.retry)
            .finish()
    }
}
