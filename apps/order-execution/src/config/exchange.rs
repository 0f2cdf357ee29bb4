//! Exchange connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::retry::RetryConfig;
use crate::infrastructure::exchange::binance::{
    BinanceConfig, DEFAULT_BASE_URL, DEFAULT_RECV_WINDOW_MS, DEFAULT_TIMEOUT,
};

/// Exchange REST configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// REST base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key (usually `${BINANCE_API_KEY}`).
    #[serde(default)]
    pub api_key: String,
    /// API secret (usually `${BINANCE_SECRET_KEY}`).
    #[serde(default)]
    pub api_secret: String,
    /// Per-attempt HTTP timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// `recvWindow` for signed requests in milliseconds.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_ms: default_timeout_ms(),
            recv_window_ms: default_recv_window_ms(),
        }
    }
}

impl ExchangeConfig {
    /// Build the adapter configuration.
    #[must_use]
    pub fn to_binance_config(&self, retry: &RetryConfig) -> BinanceConfig {
        BinanceConfig::new(self.api_key.clone(), self.api_secret.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_recv_window(self.recv_window_ms)
            .with_retry(retry.to_policy())
    }
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("base_url", &self.base_url)
            .field("api_key_set", &!self.api_key.is_empty())
            .field("api_secret_set", &!self.api_secret.is_empty())
            .field("timeout_ms", &self.timeout_ms)
            .field("recv_window_ms", &self.recv_window_ms)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

const fn default_recv_window_ms() -> u64 {
    DEFAULT_RECV_WINDOW_MS
}
