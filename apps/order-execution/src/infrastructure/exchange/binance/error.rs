//! Binance-specific error types.

use thiserror::Error;

use crate::application::ports::ExchangeError;
use crate::resilience::{AttemptError, RetryError, is_transient_status};

/// Errors from a single Binance request attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BinanceError {
    /// Connect, timeout or IO failure.
    #[error("network error: {0}")]
    Network(String),

    /// The exchange answered with a 5xx.
    #[error("server error: HTTP {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The exchange refused the request.
    #[error("API error: HTTP {status} (code {code:?}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Binance error code.
        code: Option<i64>,
        /// Binance error message.
        message: String,
    },

    /// A successful response body did not decode.
    #[error("JSON decode error: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(String),

    /// The request could not be signed.
    #[error("signing error: {0}")]
    Signing(String),

    /// API key or secret missing.
    #[error("API key and secret are required")]
    MissingCredentials,
}

impl BinanceError {
    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    /// Tag the error for the retry combinator.
    #[must_use]
    pub fn into_attempt_error(self) -> AttemptError<Self> {
        if self.is_transient() {
            AttemptError::Transient(self)
        } else {
            AttemptError::Permanent(self)
        }
    }
}

impl From<reqwest::Error> for BinanceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<BinanceError> for ExchangeError {
    fn from(err: BinanceError) -> Self {
        match err {
            BinanceError::Network(message) => Self::Transient {
                message,
                attempts: 1,
            },
            BinanceError::Server { status, body } => Self::Transient {
                message: format!("HTTP {status}: {body}"),
                attempts: 1,
            },
            BinanceError::Api {
                status,
                code,
                message,
            } => Self::Permanent {
                status,
                code,
                message,
            },
            BinanceError::Decode(message) => Self::Decode(message),
            BinanceError::Request(message) | BinanceError::Signing(message) => {
                Self::InvalidRequest(message)
            }
            BinanceError::MissingCredentials => Self::MissingCredentials,
        }
    }
}

impl From<RetryError<BinanceError>> for ExchangeError {
    fn from(err: RetryError<BinanceError>) -> Self {
        match err {
            RetryError::Exhausted { last, attempts } => Self::Transient {
                message: last.to_string(),
                attempts,
            },
            RetryError::Cancelled { attempts, .. } => Self::Cancelled { attempts },
            RetryError::Permanent { error, attempts } => match Self::from(error) {
                Self::Transient { message, .. } => Self::Transient { message, attempts },
                other => other,
            },
        }
    }
}
