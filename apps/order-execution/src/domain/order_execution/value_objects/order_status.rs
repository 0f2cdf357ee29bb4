//! Local order status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a registered order.
///
/// `Filled` and `Cancelled` are terminal: once reached, the status never
/// changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Registered, no fills yet.
    Pending,
    /// Some but not all of the quantity has filled.
    Partial,
    /// Fully filled, or reported filled by the exchange.
    Filled,
    /// Cancelled locally or reported cancelled/rejected/expired by the exchange.
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled)
    }

    /// Returns true if the order can still fill or be cancelled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Partial)
    }

    /// Returns true if an exchange report with this status should be
    /// applied during reconciliation.
    #[must_use]
    pub const fn is_reconcilable(&self) -> bool {
        self.is_terminal()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
