//! Strongly-typed identifiers.
//!
//! Keeps the local client order id and the exchange's numeric id apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locally assigned order identifier.
///
/// Doubles as the exchange idempotency token (`newClientOrderId` on
/// submission, `origClientOrderId` on lookups and cancels).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an identifier from a caller-supplied string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a fresh UUID v4 identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// An empty id asks the registry to assign one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Exchange-assigned numeric order id (`orderId` in exchange responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeOrderId(i64);

impl ExchangeOrderId {
    /// Wrap a raw exchange id.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExchangeOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ExchangeOrderId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_new_and_display() {
        let id = OrderId::new("ord-123");
        assert_eq!(id.as_str(), "ord-123");
        assert_eq!(format!("{id}"), "ord-123");
    }

    #[test]
    fn order_id_generate_is_unique_uuid() {
        let id1 = OrderId::generate();
        let id2 = OrderId::generate();
        assert_ne!(id1, id2);
        assert!(uuid::Uuid::parse_str(id1.as_str()).is_ok());
    }

    #[test]
    fn order_id_empty_detection() {
        assert!(OrderId::default().is_empty());
        assert!(OrderId::new("  ").is_empty());
        assert!(!OrderId::new("a").is_empty());
    }

    #[test]
    fn order_id_from_conversions() {
        let id: OrderId = "ord-1".into();
        assert_eq!(id.clone().into_inner(), "ord-1");
        let id2: OrderId = String::from("ord-1").into();
        assert_eq!(id, id2);
    }

    #[test]
    fn order_id_serde_transparent() {
        let json = serde_json::to_string(&OrderId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn exchange_order_id_value_and_display() {
        let id = ExchangeOrderId::from(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }
}
