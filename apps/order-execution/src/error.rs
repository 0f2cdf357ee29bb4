//! Top-level execution error.

use crate::application::ports::ExchangeError;
use crate::domain::order_execution::OrderError;
use crate::domain::risk_management::RiskError;

/// Any failure of an execution flow step.
///
/// The flow stops at the first failing step and returns its error unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// Pre-trade risk check failed.
    #[error(transparent)]
    Risk(#[from] RiskError),

    /// Order registry rejected the operation.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Exchange call failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

impl ExecutionError {
    /// Returns true if the exchange may or may not have accepted the order.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Exchange(e) => e.is_transient(),
            Self::Risk(_) | Self::Order(_) => false,
        }
    }
}
