//! Configuration for the order execution engine.
//!
//! Configuration is read from a YAML file with `${VAR}` and `${VAR:-default}`
//! environment interpolation, or assembled directly from the environment
//! when no file is given.
//!
//! ```yaml
//! exchange:
//!   base_url: ${BINANCE_REST_URL:-https://api.binance.com}
//!   api_key: ${BINANCE_API_KEY}
//!   api_secret: ${BINANCE_SECRET_KEY}
//! retry:
//!   max_attempts: 5
//! risk:
//!   max_position: "100"
//! observability:
//!   logging:
//!     level: order_execution=info
//!     format: json
//! ```

mod exchange;
mod observability;
mod retry;
mod risk;

use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use exchange::ExchangeConfig;
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use retry::RetryConfig;
pub use risk::RiskConfig;

use crate::infrastructure::exchange::binance::{
    API_KEY_ENV, BASE_URL_ENV, BinanceConfig, SECRET_KEY_ENV,
};

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "ORDER_EXECUTION_CONFIG";
/// Environment variable overriding the per-symbol position limit.
pub const MAX_POSITION_ENV: &str = "ORDER_MAX_POSITION";
/// Environment variable selecting the log format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// File path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The YAML could not be parsed.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Exchange connection.
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Retry behaviour for exchange calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Pre-trade risk limits.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Logging.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Build configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        config.exchange.api_key = env_non_empty(API_KEY_ENV).unwrap_or_default();
        config.exchange.api_secret = env_non_empty(SECRET_KEY_ENV).unwrap_or_default();
        if let Some(base_url) = env_non_empty(BASE_URL_ENV) {
            config.exchange.base_url = base_url;
        }

        if let Some(raw) = env_non_empty(MAX_POSITION_ENV) {
            config.risk.max_position = raw.trim().parse::<Decimal>().map_err(|e| {
                ConfigError::ValidationError(format!("{MAX_POSITION_ENV}={raw}: {e}"))
            })?;
        }

        if let Some(raw) = env_non_empty(LOG_FORMAT_ENV) {
            config.observability.logging.format = match raw.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "{LOG_FORMAT_ENV} must be json or pretty, got {other}"
                    )));
                }
            };
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Adapter configuration for the exchange client.
    #[must_use]
    pub fn binance(&self) -> BinanceConfig {
        self.exchange.to_binance_config(&self.retry)
    }
}

/// Load configuration from a YAML file, or from the environment when `path`
/// is `None`.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Config::from_env();
    };

    let contents =
        std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::ReadError {
            path: path.to_string(),
            source,
        })?;

    load_config_from_string(&contents)
}

/// Parse and validate configuration from a YAML string.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Replace `${VAR}` and `${VAR:-default}` with environment values.
///
/// Unset or empty variables take the default, or the empty string.
#[allow(clippy::expect_used)]
fn interpolate_env_vars(input: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

    let re = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("placeholder pattern is a valid regex")
    });

    re.replace_all(input, |caps: &Captures<'_>| {
        caps.get(1)
            .and_then(|name| env_non_empty(name.as_str()))
            .or_else(|| caps.get(2).map(|d| d.as_str().to_string()))
            .unwrap_or_default()
    })
    .into_owned()
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.exchange.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "exchange.base_url must not be empty".to_string(),
        ));
    }

    if config.exchange.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "exchange.timeout_ms must be positive".to_string(),
        ));
    }

    if config.retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "retry.max_attempts must be at least 1".to_string(),
        ));
    }

    if config.retry.multiplier < 1.0 {
        return Err(ConfigError::ValidationError(format!(
            "retry.multiplier must be >= 1.0, got {}",
            config.retry.multiplier
        )));
    }

    if !(0.0..=1.0).contains(&config.retry.jitter) {
        return Err(ConfigError::ValidationError(format!(
            "retry.jitter must be within [0, 1], got {}",
            config.retry.jitter
        )));
    }

    if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
        return Err(ConfigError::ValidationError(
            "retry.initial_backoff_ms must not exceed retry.max_backoff_ms".to_string(),
        ));
    }

    if config.risk.max_position <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "risk.max_position must be positive, got {}",
            config.risk.max_position
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();

        assert!(validate_config(&config).is_ok());
        assert_eq!(config.exchange.base_url, "https://api.binance.com");
        assert_eq!(config.exchange.timeout_ms, 5000);
        assert_eq!(config.exchange.recv_window_ms, 5000);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.risk.max_position, dec!(100));
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert_eq!(config.observability.logging.level, "order_execution=info");
    }

    #[test]
    fn empty_document_falls_back_to_defaults() {
        let config = load_config_from_string("{}").unwrap();
        assert_eq!(config.retry.initial_backoff_ms, 100);
        assert_eq!(config.retry.max_backoff_ms, 30_000);
    }

    #[test]
    fn parses_full_document() {
        let yaml = r#"
exchange:
  base_url: http://localhost:9000
  api_key: key
  api_secret: secret
  timeout_ms: 250
  recv_window_ms: 1000
retry:
  max_attempts: 3
  initial_backoff_ms: 10
  max_backoff_ms: 50
  multiplier: 1.5
  jitter: 0.0
risk:
  max_position: "2.5"
observability:
  logging:
    level: debug
    format: pretty
"#;
        let config = load_config_from_string(yaml).unwrap();

        assert_eq!(config.exchange.base_url, "http://localhost:9000");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.risk.max_position, dec!(2.5));
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);

        let binance = config.binance();
        assert!(binance.has_credentials());
        assert_eq!(binance.timeout, Duration::from_millis(250));
        assert_eq!(binance.recv_window_ms, 1000);
        assert_eq!(binance.retry.max_attempts, 3);
        assert_eq!(binance.retry.initial_backoff, Duration::from_millis(10));
        assert_eq!(binance.retry.max_backoff, Duration::from_millis(50));
        assert!(binance.retry.jitter_factor.abs() < f64::EPSILON);
    }

    #[test]
    fn interpolation_uses_default_for_missing_var() {
        let out = interpolate_env_vars("url: ${ORDER_EXEC_TEST_SURELY_UNSET:-http://x}");
        assert_eq!(out, "url: http://x");
    }

    #[test]
    fn interpolation_without_default_yields_empty() {
        let out = interpolate_env_vars("key: ${ORDER_EXEC_TEST_SURELY_UNSET}");
        assert_eq!(out, "key: ");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)]
    fn interpolation_prefers_existing_var() {
        let out = interpolate_env_vars("path: ${PATH:-fallback}");
        assert_ne!(out, "path: fallback");
        assert!(out.starts_with("path: "));
    }

    #[test]
    fn interpolation_leaves_plain_text_alone() {
        assert_eq!(interpolate_env_vars("a: $HOME b: {x}"), "a: $HOME b: {x}");
    }

    #[test]
    fn rejects_zero_attempts() {
        let err = load_config_from_string("retry:\n  max_attempts: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("max_attempts")));
    }

    #[test]
    fn rejects_shrinking_multiplier() {
        let err = load_config_from_string("retry:\n  multiplier: 0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("multiplier")));
    }

    #[test]
    fn rejects_jitter_out_of_range() {
        let err = load_config_from_string("retry:\n  jitter: 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("jitter")));
    }

    #[test]
    fn rejects_non_positive_position_limit() {
        let err = load_config_from_string("risk:\n  max_position: \"0\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("max_position")));
    }

    #[test]
    fn rejects_empty_base_url() {
        let err = load_config_from_string("exchange:\n  base_url: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("base_url")));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = load_config_from_string("retry: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "risk:\n  max_position: \"7\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.risk.max_position, dec!(7));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Some("/nonexistent/order-execution.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { path, .. } if path.contains("nonexistent")));
    }

    #[test]
    fn exchange_debug_hides_secrets() {
        let mut config = Config::default();
        config.exchange.api_key = "visible-key".to_string();
        config.exchange.api_secret = "hidden-secret".to_string();

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("visible-key"));
        assert!(!rendered.contains("hidden-secret"));
    }
}
