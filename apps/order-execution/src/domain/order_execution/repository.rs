//! Order Registry Trait
//!
//! The single owner of registered orders. Implemented by adapters in the
//! infrastructure layer.

use rust_decimal::Decimal;

use super::aggregate::Order;
use super::errors::OrderError;
use super::value_objects::{CumulativeExecution, Fill, OrderStatus};
use crate::domain::shared::{ExchangeOrderId, OrderId};

/// Result of [`OrderRegistry::apply_execution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedExecution {
    /// Snapshot after the report was applied.
    pub order: Order,
    /// Fill recorded by this call; `None` if the report held nothing new.
    pub fill: Option<Fill>,
}

/// Registry of orders keyed by [`OrderId`].
///
/// Every operation is atomic with respect to every other operation on the
/// same registry. Callers only ever see snapshots; the registry keeps the
/// authoritative copy. Orders are never removed.
pub trait OrderRegistry: Send + Sync {
    /// Register a new order and return its id.
    ///
    /// An empty id is replaced with a generated UUID v4. The stored order
    /// starts `Pending` with zero fills.
    ///
    /// # Errors
    ///
    /// - `DuplicateOrder` if the id is already registered (the existing
    ///   order is left untouched)
    /// - `InvalidParameters` if the order fails validation
    fn create(&self, order: Order) -> Result<OrderId, OrderError>;

    /// Snapshot of an order.
    fn get(&self, id: &OrderId) -> Option<Order>;

    /// Apply a fill and return the updated snapshot.
    ///
    /// # Errors
    ///
    /// `OrderNotFound`, `InvalidFill`, `OrderClosed` or
    /// `FillExceedsQuantity`; state is unchanged on error.
    fn add_fill(&self, id: &OrderId, quantity: Decimal, price: Decimal)
    -> Result<Order, OrderError>;

    /// Apply an exchange report as one atomic step.
    ///
    /// Executed quantity beyond the recorded fills becomes a fill, worked out
    /// against the stored order rather than a caller's snapshot; then a
    /// terminal `status` is reconciled. Concurrent or repeated reports of
    /// the same totals record each unit once, and the returned fill is the
    /// only quantity a caller may move positions by.
    ///
    /// # Errors
    ///
    /// `OrderNotFound`, or any `add_fill` error; state is unchanged on error.
    fn apply_execution(
        &self,
        id: &OrderId,
        execution: Option<CumulativeExecution>,
        status: Option<OrderStatus>,
    ) -> Result<AppliedExecution, OrderError>;

    /// Cancel an active order. Terminal orders are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the id is unknown.
    fn cancel(&self, id: &OrderId) -> Result<(), OrderError>;

    /// Align local status with an exchange-reported status.
    ///
    /// Only `Filled` and `Cancelled` reports act; reconciling a terminal
    /// order is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the report is actionable and the id is
    /// unknown.
    fn reconcile(&self, id: &OrderId, exchange_status: OrderStatus) -> Result<(), OrderError>;

    /// Explicit status change checked by the state machine.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` or `InvalidStateTransition`.
    fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), OrderError>;

    /// Record the exchange's id for an acknowledged order.
    ///
    /// # Errors
    ///
    /// Returns `OrderNotFound` if the id is unknown.
    fn record_exchange_ack(
        &self,
        id: &OrderId,
        exchange_order_id: ExchangeOrderId,
    ) -> Result<(), OrderError>;

    /// Snapshot of every order.
    fn list(&self) -> Vec<Order>;

    /// Snapshot of every non-terminal order.
    fn active(&self) -> Vec<Order> {
        self.list()
            .into_iter()
            .filter(|o| o.status().is_active())
            .collect()
    }

    /// Number of registered orders.
    fn len(&self) -> usize;

    /// Returns true if no orders are registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
