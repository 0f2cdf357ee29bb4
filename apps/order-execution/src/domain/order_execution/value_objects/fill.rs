//! A single execution against an order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An execution of `quantity` units at `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Executed quantity.
    pub quantity: Decimal,
    /// Execution price.
    pub price: Decimal,
}

impl Fill {
    /// Create a new fill.
    #[must_use]
    pub const fn new(quantity: Decimal, price: Decimal) -> Self {
        Self { quantity, price }
    }

    /// Quote value of the fill (`quantity * price`), or `None` on overflow.
    #[must_use]
    pub fn notional(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.price)
    }

    /// A fill must have a positive quantity and a non-negative price.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.quantity > Decimal::ZERO && self.price >= Decimal::ZERO
    }
}
