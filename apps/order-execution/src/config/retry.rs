//! Retry configuration for exchange calls.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::RetryPolicy;

/// Exponential backoff settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// First backoff delay in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Backoff growth factor.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Jitter factor in `[0, 1]`.
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
            jitter: default_jitter(),
        }
    }
}

impl RetryConfig {
    /// Convert to the policy used by the retry combinator.
    #[must_use]
    pub const fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
            self.multiplier,
            self.jitter,
        )
    }
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_initial_backoff_ms() -> u64 {
    100
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_jitter() -> f64 {
    0.2
}
