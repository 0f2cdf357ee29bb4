//! Resilience
//!
//! Retry with exponential backoff for calls over an unreliable network.

pub mod retry;

pub use retry::{
    AttemptError, ExponentialBackoffCalculator, RetryError, RetryPolicy, is_transient_status,
    retry_with_backoff,
};
