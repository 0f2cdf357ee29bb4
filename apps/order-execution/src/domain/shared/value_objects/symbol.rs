//! Symbol value object for exchange instruments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasons a symbol is unusable for order submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// Symbol is empty or whitespace.
    #[error("symbol cannot be empty")]
    Empty,

    /// Symbol contains characters the exchange does not accept.
    #[error("symbol '{symbol}' must be alphanumeric")]
    InvalidCharacters {
        /// The rejected symbol.
        symbol: String,
    },
}

/// A trading pair symbol such as `BTCUSDT`.
///
/// Normalized to uppercase so `btcusdt` and `BTCUSDT` share a position,
/// whether built in code or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol, trimming and uppercasing the input.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate the symbol for order submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is empty or not alphanumeric.
    pub fn validate(&self) -> Result<(), SymbolError> {
        if self.0.is_empty() {
            return Err(SymbolError::Empty);
        }
        if !self.0.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SymbolError::InvalidCharacters {
                symbol: self.0.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}
