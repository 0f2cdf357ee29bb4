//! Position limit check.

use rust_decimal::Decimal;

use crate::domain::order_execution::Order;
use crate::domain::risk_management::errors::RiskError;

/// Rejects orders that would take a position past a fixed maximum.
///
/// The check compares `current + order.quantity` against the limit
/// regardless of side, so a sell is treated like a buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionLimitValidator {
    max_position: Decimal,
}

impl PositionLimitValidator {
    /// Create a validator with the given maximum position.
    #[must_use]
    pub const fn new(max_position: Decimal) -> Self {
        Self { max_position }
    }

    /// Get the configured maximum position.
    #[must_use]
    pub const fn max_position(&self) -> Decimal {
        self.max_position
    }

    /// Validate an order against the current position.
    ///
    /// # Errors
    ///
    /// Returns `PositionLimitExceeded` when `current + quantity > max`,
    /// including when the sum does not fit in a `Decimal`.
    pub fn validate(&self, order: &Order, current_position: Decimal) -> Result<(), RiskError> {
        let within_limit = current_position
            .checked_add(order.quantity())
            .is_some_and(|projected| projected <= self.max_position);
        if !within_limit {
            return Err(RiskError::PositionLimitExceeded {
                symbol: order.symbol().clone(),
                current: current_position,
                requested: order.quantity(),
                limit: self.max_position,
            });
        }
        Ok(())
    }
}
