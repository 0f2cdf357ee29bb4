//! Retry with exponential backoff.
//!
//! Each attempt classifies its own failure as transient or permanent;
//! [`retry_with_backoff`] retries only transient failures and observes a
//! [`CancellationToken`] both while the attempt runs and while it sleeps.
//!
//! # Classification
//!
//! | Transient | Permanent |
//! |-----------|-----------|
//! | Connect / timeout / IO errors | Request build or signing failure |
//! | HTTP 5xx | HTTP 4xx |
//! | | Undecodable 2xx body |
//!
//! # Example
//!
//! ```rust,ignore
//! let policy = RetryPolicy::default();
//! let mut backoff = ExponentialBackoffCalculator::new(&policy);
//!
//! let delay1 = backoff.next_backoff(); // ~100ms with jitter
//! let delay2 = backoff.next_backoff(); // ~200ms with jitter
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Retry policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (default: 5).
    pub max_attempts: u32,
    /// Delay before the first retry (default: 100ms).
    pub initial_backoff: Duration,
    /// Upper bound on any single delay (default: 30s).
    pub max_backoff: Duration,
    /// Growth factor between delays (default: 2.0).
    pub backoff_multiplier: f64,
    /// Randomization factor (default: 0.2 = ±20%).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with custom settings.
    #[must_use]
    pub const fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
        jitter_factor: f64,
    ) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
            backoff_multiplier,
            jitter_factor,
        }
    }

    /// A single attempt, never retried.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

/// Calculator for exponential backoff with jitter.
#[derive(Debug)]
pub struct ExponentialBackoffCalculator {
    current_attempt: u32,
    max_attempts: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
    backoff_multiplier: f64,
    jitter_factor: f64,
}

impl ExponentialBackoffCalculator {
    /// Create a new backoff calculator from a retry policy.
    #[must_use]
    pub const fn new(policy: &RetryPolicy) -> Self {
        Self {
            current_attempt: 0,
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
            backoff_multiplier: policy.backoff_multiplier,
            jitter_factor: policy.jitter_factor,
        }
    }

    /// Get the next backoff duration with jitter.
    ///
    /// Returns `None` once the retry budget is spent.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.current_attempt + 1 >= self.max_attempts {
            return None;
        }

        let base_ms = self.calculate_base_backoff_ms();
        let capped_ms = self.apply_jitter(base_ms).min(self.max_backoff_ms);

        self.current_attempt += 1;

        Some(Duration::from_millis(capped_ms))
    }

    fn calculate_base_backoff_ms(&self) -> u64 {
        let multiplier = self.backoff_multiplier.powi(self.current_attempt as i32);
        let backoff = (self.initial_backoff_ms as f64 * multiplier) as u64;
        backoff.min(self.max_backoff_ms)
    }

    /// Uniform jitter in `[backoff * (1 - jitter), backoff * (1 + jitter)]`.
    fn apply_jitter(&self, backoff_ms: u64) -> u64 {
        if self.jitter_factor <= 0.0 || backoff_ms == 0 {
            return backoff_ms;
        }
        let jitter_range = backoff_ms as f64 * self.jitter_factor;
        let min = (backoff_ms as f64 - jitter_range).max(0.0);
        let max = backoff_ms as f64 + jitter_range;
        rand::rng().random_range(min..=max) as u64
    }

    /// Number of delays handed out so far.
    #[must_use]
    pub const fn current_attempt(&self) -> u32 {
        self.current_attempt
    }

    /// Check if more retries are available.
    #[must_use]
    pub const fn has_remaining_attempts(&self) -> bool {
        self.current_attempt + 1 < self.max_attempts
    }
}

/// HTTP statuses worth retrying: the server failed, the request may not have.
#[must_use]
pub const fn is_transient_status(status_code: u16) -> bool {
    status_code >= 500 && status_code < 600
}

/// Outcome of a single failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError<E> {
    /// May succeed if retried.
    Transient(E),
    /// Will fail again; do not retry.
    Permanent(E),
}

impl<E> AttemptError<E> {
    /// Get the wrapped error.
    pub fn into_inner(self) -> E {
        match self {
            Self::Transient(e) | Self::Permanent(e) => e,
        }
    }

    /// Returns true for [`AttemptError::Transient`].
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Final failure of a retried operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed transiently.
    Exhausted {
        /// Error from the last attempt.
        last: E,
        /// Attempts made.
        attempts: u32,
    },
    /// An attempt failed permanently.
    Permanent {
        /// The permanent error.
        error: E,
        /// Attempts made, including the failing one.
        attempts: u32,
    },
    /// The cancellation token fired.
    Cancelled {
        /// Error from the last completed attempt, if any.
        last: Option<E>,
        /// Attempts started.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Attempts made before giving up.
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. }
            | Self::Permanent { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, runs out of
/// attempts, or `cancel` fires.
///
/// `operation` receives the 1-based attempt number. Cancellation aborts an
/// in-flight attempt as well as a pending backoff sleep.
///
/// # Errors
///
/// Returns a [`RetryError`] describing why no attempt succeeded.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError<E>>>,
{
    let mut backoff = ExponentialBackoffCalculator::new(policy);
    let mut attempt = 0;
    let mut last = None;

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled {
                last,
                attempts: attempt,
            });
        }

        attempt += 1;
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(attempt, "attempt cancelled in flight");
                return Err(RetryError::Cancelled { last, attempts: attempt });
            }
            outcome = operation(attempt) => outcome,
        };

        let error = match outcome {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(AttemptError::Permanent(error)) => {
                tracing::warn!(attempt, error = %error, "permanent failure, not retrying");
                return Err(RetryError::Permanent {
                    error,
                    attempts: attempt,
                });
            }
            Err(AttemptError::Transient(error)) => error,
        };

        let Some(delay) = backoff.next_backoff() else {
            tracing::warn!(attempt, error = %error, "retries exhausted");
            return Err(RetryError::Exhausted {
                last: error,
                attempts: attempt,
            });
        };

        tracing::warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "transient failure, backing off"
        );
        last = Some(error);

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(attempt, "backoff cancelled");
                return Err(RetryError::Cancelled { last, attempts: attempt });
            }
            () = tokio::time::sleep(delay) => {}
        }
    }
}
