//! Risk management errors.

use rust_decimal::Decimal;

use crate::domain::shared::Symbol;

/// Errors raised by pre-trade risk checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskError {
    /// The order would take the position past the configured limit.
    #[error(
        "position limit exceeded for {symbol}: current {current} + requested {requested} > limit {limit}"
    )]
    PositionLimitExceeded {
        /// Symbol being traded.
        symbol: Symbol,
        /// Position before the order.
        current: Decimal,
        /// Order quantity.
        requested: Decimal,
        /// Configured maximum.
        limit: Decimal,
    },
}
