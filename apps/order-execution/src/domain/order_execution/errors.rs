//! Order execution errors.

use rust_decimal::Decimal;

use super::value_objects::OrderStatus;
use crate::domain::shared::OrderId;

/// Errors raised by the order aggregate and the order registry.
///
/// Every failing operation leaves the registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// An order with this id is already registered.
    #[error("duplicate order id: {order_id}")]
    DuplicateOrder {
        /// Order ID.
        order_id: OrderId,
    },

    /// No order with this id is registered.
    #[error("order not found: {order_id}")]
    OrderNotFound {
        /// Order ID.
        order_id: OrderId,
    },

    /// Applying the fill would push the filled quantity past the order quantity.
    #[error("fill of {fill_qty} exceeds quantity for order {order_id} (filled {filled_qty} of {quantity})")]
    FillExceedsQuantity {
        /// Order ID.
        order_id: OrderId,
        /// Quantity already filled.
        filled_qty: Decimal,
        /// Quantity of the rejected fill.
        fill_qty: Decimal,
        /// Order quantity.
        quantity: Decimal,
    },

    /// The order is cancelled and accepts no further fills.
    #[error("order {order_id} is closed ({status})")]
    OrderClosed {
        /// Order ID.
        order_id: OrderId,
        /// Current status.
        status: OrderStatus,
    },

    /// Fill quantity is not positive or price is negative.
    #[error("invalid fill for order {order_id}: {message}")]
    InvalidFill {
        /// Order ID.
        order_id: OrderId,
        /// Error message.
        message: String,
    },

    /// Explicit status change not permitted by the state machine.
    #[error("invalid order state transition: {from} -> {to}: {reason}")]
    InvalidStateTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
        /// Reason for failure.
        reason: String,
    },

    /// Invalid order parameters.
    #[error("invalid order parameter '{field}': {message}")]
    InvalidParameters {
        /// Field with invalid value.
        field: String,
        /// Error message.
        message: String,
    },
}

impl OrderError {
    /// Shorthand for [`OrderError::OrderNotFound`].
    #[must_use]
    pub fn not_found(order_id: &OrderId) -> Self {
        Self::OrderNotFound {
            order_id: order_id.clone(),
        }
    }
}
