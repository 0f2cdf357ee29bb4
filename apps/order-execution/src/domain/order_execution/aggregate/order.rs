//! Order Aggregate Root
//!
//! Tracks a single limit order from registration to a terminal state,
//! accumulating fills and the weighted-average fill price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::services::OrderStateMachine;
use crate::domain::order_execution::value_objects::{
    CumulativeExecution, Fill, OrderSide, OrderStatus,
};
use crate::domain::shared::{ExchangeOrderId, OrderId, Symbol};

/// Order aggregate root.
///
/// Invariants maintained by every mutating method:
/// - `filled_quantity <= quantity`
/// - `average_fill_price == fill_notional / filled_quantity` once filled
/// - a terminal status never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    symbol: Symbol,
    side: OrderSide,
    quantity: Decimal,
    price: Decimal,
    filled_quantity: Decimal,
    average_fill_price: Decimal,
    /// Sum of `qty * price` over all fills.
    fill_notional: Decimal,
    status: OrderStatus,
    exchange_order_id: Option<ExchangeOrderId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a pending order with no fills.
    ///
    /// Parameters are not checked here; call [`Order::validate`] or register
    /// the order, which validates it.
    #[must_use]
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            symbol,
            side,
            quantity,
            price,
            filled_quantity: Decimal::ZERO,
            average_fill_price: Decimal::ZERO,
            fill_notional: Decimal::ZERO,
            status: OrderStatus::Pending,
            exchange_order_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate order parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty symbol, a non-positive
    /// quantity or a negative price.
    pub fn validate(&self) -> Result<(), OrderError> {
        self.symbol
            .validate()
            .map_err(|e| OrderError::InvalidParameters {
                field: "symbol".to_string(),
                message: e.to_string(),
            })?;

        if self.quantity <= Decimal::ZERO {
            return Err(OrderError::InvalidParameters {
                field: "quantity".to_string(),
                message: format!("must be positive, got {}", self.quantity),
            });
        }

        if self.price < Decimal::ZERO {
            return Err(OrderError::InvalidParameters {
                field: "price".to_string(),
                message: format!("cannot be negative, got {}", self.price),
            });
        }

        Ok(())
    }

    /// Reset the order to its registration state under `id`.
    ///
    /// Used by registries: whatever fills or status the caller's copy
    /// carried, a newly registered order starts `Pending` with zero fills.
    #[must_use]
    pub fn into_registered(self, id: OrderId) -> Self {
        Self::new(id, self.symbol, self.side, self.quantity, self.price)
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order ID.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Get the symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the order side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Get the order quantity.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Get the limit price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Get the cumulative filled quantity.
    #[must_use]
    pub const fn filled_quantity(&self) -> Decimal {
        self.filled_quantity
    }

    /// Quantity still open.
    #[must_use]
    pub fn remaining_quantity(&self) -> Decimal {
        self.quantity - self.filled_quantity
    }

    /// Quantity-weighted average fill price. Zero until the first fill.
    #[must_use]
    pub const fn average_fill_price(&self) -> Decimal {
        self.average_fill_price
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns true once the order can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Get the exchange-assigned order ID, if acknowledged.
    #[must_use]
    pub const fn exchange_order_id(&self) -> Option<ExchangeOrderId> {
        self.exchange_order_id
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Apply a fill.
    ///
    /// Status becomes `Filled` when the filled quantity reaches the order
    /// quantity and `Partial` otherwise. Nothing is modified on error.
    ///
    /// # Errors
    ///
    /// - `InvalidFill` if the quantity is not positive, the price is negative
    ///   or the new totals overflow
    /// - `OrderClosed` if the order is cancelled
    /// - `FillExceedsQuantity` if the fill overshoots the order quantity
    ///   (always the case for a filled order)
    pub fn apply_fill(&mut self, fill: Fill) -> Result<(), OrderError> {
        if !fill.is_valid() {
            return Err(OrderError::InvalidFill {
                order_id: self.id.clone(),
                message: format!(
                    "quantity must be positive and price non-negative, got {} @ {}",
                    fill.quantity, fill.price
                ),
            });
        }

        if self.status == OrderStatus::Cancelled {
            return Err(OrderError::OrderClosed {
                order_id: self.id.clone(),
                status: self.status,
            });
        }

        let Some(total) = self.filled_quantity.checked_add(fill.quantity) else {
            return Err(self.overflow(fill));
        };
        if total > self.quantity {
            return Err(OrderError::FillExceedsQuantity {
                order_id: self.id.clone(),
                filled_qty: self.filled_quantity,
                fill_qty: fill.quantity,
                quantity: self.quantity,
            });
        }

        let Some((notional, average)) = fill
            .notional()
            .and_then(|n| self.fill_notional.checked_add(n))
            .and_then(|n| n.checked_div(total).map(|avg| (n, avg)))
        else {
            return Err(self.overflow(fill));
        };

        self.filled_quantity = total;
        self.fill_notional = notional;
        self.average_fill_price = average;
        self.status = if total == self.quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Catch up with an exchange-reported cumulative execution.
    ///
    /// Only quantity beyond what is already recorded becomes a fill, so a
    /// report seen twice, or a stale one, records nothing extra. The fill
    /// price is the reported quote quantity net of the recorded notional,
    /// falling back to the limit price.
    ///
    /// Returns the fill applied, if any.
    ///
    /// # Errors
    ///
    /// Same as [`Order::apply_fill`]; nothing is modified on error.
    pub fn apply_execution(
        &mut self,
        execution: CumulativeExecution,
    ) -> Result<Option<Fill>, OrderError> {
        let Some(delta) = execution
            .executed_quantity
            .checked_sub(self.filled_quantity)
            .filter(|delta| *delta > Decimal::ZERO)
        else {
            return Ok(None);
        };

        let price = execution
            .quote_quantity
            .and_then(|quote| quote.checked_sub(self.fill_notional))
            .and_then(|net| net.checked_div(delta))
            .filter(|price| *price >= Decimal::ZERO)
            .unwrap_or(self.price);

        let fill = Fill::new(delta, price);
        self.apply_fill(fill)?;
        Ok(Some(fill))
    }

    /// Cancel the order.
    ///
    /// Returns `false` without changing anything if the order is already
    /// terminal.
    pub fn cancel(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        true
    }

    /// Apply an exchange-reported status.
    ///
    /// Only `Filled` and `Cancelled` reports act, and only on active orders.
    /// Returns whether the status changed.
    pub fn reconcile(&mut self, reported: OrderStatus) -> bool {
        if !reported.is_reconcilable() || self.is_terminal() {
            return false;
        }
        self.status = reported;
        self.updated_at = Utc::now();
        true
    }

    /// Explicit status change, checked by [`OrderStateMachine`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the transition is not allowed.
    pub fn transition_to(&mut self, status: OrderStatus) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, status)?;
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record the exchange acknowledgement id.
    pub fn record_exchange_ack(&mut self, exchange_order_id: ExchangeOrderId) {
        self.exchange_order_id = Some(exchange_order_id);
        self.updated_at = Utc::now();
    }

    fn overflow(&self, fill: Fill) -> OrderError {
        OrderError::InvalidFill {
            order_id: self.id.clone(),
            message: format!(
                "{} @ {} overflows the order totals",
                fill.quantity, fill.price
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(qty: Decimal) -> Order {
        Order::new(
            OrderId::new("ord-1"),
            Symbol::new("BTCUSDT"),
            OrderSide::Buy,
            qty,
            dec!(100),
        )
    }

    #[test]
    fn order_new_is_pending_with_no_fills() {
        let o = order(dec!(2));
        assert_eq!(o.status(), OrderStatus::Pending);
        assert_eq!(o.filled_quantity(), Decimal::ZERO);
        assert_eq!(o.average_fill_price(), Decimal::ZERO);
        assert_eq!(o.remaining_quantity(), dec!(2));
        assert!(o.exchange_order_id().is_none());
    }

    #[test]
    fn order_validate_rejects_bad_parameters() {
        assert!(order(dec!(1)).validate().is_ok());

        let err = order(dec!(0)).validate().unwrap_err();
        assert!(matches!(err, OrderError::InvalidParameters { ref field, .. } if field == "quantity"));

        let negative_price = Order::new(
            OrderId::new("x"),
            Symbol::new("BTCUSDT"),
            OrderSide::Sell,
            dec!(1),
            dec!(-1),
        );
        let err = negative_price.validate().unwrap_err();
        assert!(matches!(err, OrderError::InvalidParameters { ref field, .. } if field == "price"));

        let no_symbol = Order::new(
            OrderId::new("x"),
            Symbol::new(""),
            OrderSide::Sell,
            dec!(1),
            dec!(1),
        );
        let err = no_symbol.validate().unwrap_err();
        assert!(matches!(err, OrderError::InvalidParameters { ref field, .. } if field == "symbol"));
    }

    #[test]
    fn order_apply_fill_partial_then_filled() {
        let mut o = order(dec!(2));
        o.apply_fill(Fill::new(dec!(1), dec!(10))).unwrap();
        assert_eq!(o.status(), OrderStatus::Partial);
        assert_eq!(o.average_fill_price(), dec!(10));

        o.apply_fill(Fill::new(dec!(1), dec!(20))).unwrap();
        assert_eq!(o.status(), OrderStatus::Filled);
        assert_eq!(o.filled_quantity(), dec!(2));
        assert_eq!(o.average_fill_price(), dec!(15));
    }

    #[test]
    fn order_apply_fill_weighted_average() {
        let mut o = order(dec!(4));
        o.apply_fill(Fill::new(dec!(3), dec!(10))).unwrap();
        o.apply_fill(Fill::new(dec!(1), dec!(30))).unwrap();
        // (3*10 + 1*30) / 4
        assert_eq!(o.average_fill_price(), dec!(15));
    }

    #[test]
    fn order_apply_fill_exceeding_leaves_state_unchanged() {
        let mut o = order(dec!(2));
        o.apply_fill(Fill::new(dec!(1.5), dec!(10))).unwrap();
        let before = o.clone();

        let err = o.apply_fill(Fill::new(dec!(1), dec!(10))).unwrap_err();
        assert!(matches!(err, OrderError::FillExceedsQuantity { .. }));
        assert_eq!(o, before);
    }

    #[test]
    fn order_apply_fill_on_filled_order_exceeds() {
        let mut o = order(dec!(1));
        o.apply_fill(Fill::new(dec!(1), dec!(10))).unwrap();
        let err = o.apply_fill(Fill::new(dec!(0.1), dec!(10))).unwrap_err();
        assert!(matches!(err, OrderError::FillExceedsQuantity { .. }));
    }

    #[test]
    fn order_apply_fill_on_cancelled_order_is_closed() {
        let mut o = order(dec!(1));
        assert!(o.cancel());
        let err = o.apply_fill(Fill::new(dec!(1), dec!(10))).unwrap_err();
        assert!(matches!(err, OrderError::OrderClosed { status: OrderStatus::Cancelled, .. }));
    }

    #[test]
    fn order_apply_fill_rejects_invalid_fill() {
        let mut o = order(dec!(1));
        let err = o.apply_fill(Fill::new(dec!(0), dec!(10))).unwrap_err();
        assert!(matches!(err, OrderError::InvalidFill { .. }));
        assert_eq!(o.status(), OrderStatus::Pending);
    }

    #[test]
    fn order_apply_fill_overflow_is_rejected_without_panic() {
        let huge = Decimal::from(1_000_000_000_000_000_i64);
        let mut o = order(huge);
        let before = o.clone();

        let err = o.apply_fill(Fill::new(huge, huge)).unwrap_err();
        assert!(matches!(err, OrderError::InvalidFill { ref message, .. } if message.contains("overflow")));
        assert_eq!(o, before);
    }

    #[test]
    fn order_apply_execution_full_quantity_at_limit() {
        let mut o = order(dec!(2));
        let fill = o
            .apply_execution(CumulativeExecution::new(dec!(2), None))
            .unwrap();
        assert_eq!(fill, Some(Fill::new(dec!(2), dec!(100))));
        assert_eq!(o.status(), OrderStatus::Filled);
    }

    #[test]
    fn order_apply_execution_price_from_quote_quantity() {
        let mut o = order(dec!(2));
        let fill = o
            .apply_execution(CumulativeExecution::new(dec!(1), Some(dec!(99.5))))
            .unwrap();
        assert_eq!(fill, Some(Fill::new(dec!(1), dec!(99.5))));
        assert_eq!(o.status(), OrderStatus::Partial);
    }

    #[test]
    fn order_apply_execution_nets_out_recorded_fills() {
        let mut o = order(dec!(3));
        o.apply_fill(Fill::new(dec!(1), dec!(10))).unwrap();

        let fill = o
            .apply_execution(CumulativeExecution::new(dec!(3), Some(dec!(50))))
            .unwrap();
        assert_eq!(fill, Some(Fill::new(dec!(2), dec!(20))));
        assert_eq!(o.average_fill_price(), dec!(50) / dec!(3));
    }

    #[test]
    fn order_apply_execution_same_total_twice_records_once() {
        let mut o = order(dec!(2));
        let report = CumulativeExecution::new(dec!(1), Some(dec!(10)));

        assert!(o.apply_execution(report).unwrap().is_some());
        assert_eq!(o.apply_execution(report).unwrap(), None);
        assert_eq!(o.filled_quantity(), dec!(1));

        // A stale, smaller total is ignored as well.
        assert_eq!(
            o.apply_execution(CumulativeExecution::new(dec!(0.5), None)).unwrap(),
            None
        );
        assert_eq!(o.filled_quantity(), dec!(1));
    }

    #[test]
    fn order_apply_execution_beyond_quantity_fails_unchanged() {
        let mut o = order(dec!(1));
        let before = o.clone();
        let err = o
            .apply_execution(CumulativeExecution::new(dec!(2), None))
            .unwrap_err();
        assert!(matches!(err, OrderError::FillExceedsQuantity { .. }));
        assert_eq!(o, before);
    }

    #[test]
    fn order_cancel_terminal_is_noop() {
        let mut o = order(dec!(1));
        o.apply_fill(Fill::new(dec!(1), dec!(10))).unwrap();
        assert!(!o.cancel());
        assert_eq!(o.status(), OrderStatus::Filled);
    }

    #[test]
    fn order_reconcile_only_terminal_reports_act() {
        let mut o = order(dec!(1));
        assert!(!o.reconcile(OrderStatus::Partial));
        assert!(!o.reconcile(OrderStatus::Pending));
        assert_eq!(o.status(), OrderStatus::Pending);

        assert!(o.reconcile(OrderStatus::Cancelled));
        assert_eq!(o.status(), OrderStatus::Cancelled);

        assert!(!o.reconcile(OrderStatus::Filled));
        assert_eq!(o.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn order_transition_to_checks_state_machine() {
        let mut o = order(dec!(1));
        o.transition_to(OrderStatus::Filled).unwrap();
        let err = o.transition_to(OrderStatus::Cancelled).unwrap_err();
        assert!(matches!(err, OrderError::InvalidStateTransition { .. }));
    }

    #[test]
    fn order_into_registered_resets_state() {
        let mut o = order(dec!(2));
        o.apply_fill(Fill::new(dec!(1), dec!(10))).unwrap();
        o.record_exchange_ack(ExchangeOrderId::new(7));

        let fresh = o.into_registered(OrderId::new("ord-2"));
        assert_eq!(fresh.id().as_str(), "ord-2");
        assert_eq!(fresh.status(), OrderStatus::Pending);
        assert_eq!(fresh.filled_quantity(), Decimal::ZERO);
        assert!(fresh.exchange_order_id().is_none());
    }
}
