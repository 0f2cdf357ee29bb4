//! Tracing subscriber setup.
//!
//! Filtering comes from `RUST_LOG` when set, otherwise from the configured
//! level. Output is one JSON object per line or the pretty formatter.
//!
//! # Key fields
//!
//! - `order_id` - local order identifier
//! - `symbol` - trading pair
//! - `attempt` / `delay_ms` - exchange retry progress

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogFormat, LoggingConfig};

/// Tracing initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The configured filter directive is malformed.
    #[error("invalid log filter {directive:?}: {message}")]
    InvalidFilter {
        /// Rejected directive.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// A global subscriber was already installed.
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// Returns [`TracingError::Init`] when a subscriber is already set, so tests
/// and embedding binaries can call it more than once without panicking.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    result.map_err(|e| TracingError::Init(e.to_string()))?;

    ::tracing::debug!(level = %config.level, format = ?config.format, "tracing initialized");
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TracingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| TracingError::InvalidFilter {
        directive: config.level.clone(),
        message: e.to_string(),
    })
}
