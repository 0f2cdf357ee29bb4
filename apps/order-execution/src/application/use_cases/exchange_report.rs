//! Applying an exchange order report to local state.
//!
//! Shared by execution, reconciliation and cancellation. The registry works
//! out which executed quantity is new under its own lock, and the portfolio
//! moves by exactly that quantity.

use crate::application::ports::{ExchangeOrderStatus, OrderResponse};
use crate::domain::order_execution::{CumulativeExecution, Order, OrderError, OrderRegistry};
use crate::domain::portfolio::Portfolio;

/// Execution totals carried by `response`.
///
/// A `FILLED` report without `executedQty` counts as the full quantity.
pub(super) fn cumulative_execution(
    order: &Order,
    response: &OrderResponse,
) -> Option<CumulativeExecution> {
    let executed = match (response.executed_qty, &response.status) {
        (Some(qty), _) => qty,
        (None, ExchangeOrderStatus::Filled) => order.quantity(),
        (None, _) => return None,
    };
    Some(CumulativeExecution::new(
        executed,
        response.cummulative_quote_qty,
    ))
}

/// Apply `response` to the registered `order` and return the new snapshot.
///
/// `order` only supplies immutable attributes (id, symbol, side, quantity),
/// so a snapshot taken before an exchange call is safe to pass. The
/// portfolio only moves once the registry has accepted a fill.
pub(super) fn apply_exchange_report<R: OrderRegistry>(
    registry: &R,
    portfolio: &Portfolio,
    order: &Order,
    response: &OrderResponse,
) -> Result<Order, OrderError> {
    let id = order.id();
    let applied = registry.apply_execution(
        id,
        cumulative_execution(order, response),
        response.status.to_local(),
    )?;

    if let Some(fill) = applied.fill {
        let position = portfolio.update(order.symbol(), order.side().signed(fill.quantity));
        tracing::info!(
            order_id = %id,
            symbol = %order.symbol(),
            fill_qty = %fill.quantity,
            fill_price = %fill.price,
            filled_qty = %applied.order.filled_quantity(),
            position = %position,
            "fill recorded"
        );
    }

    Ok(applied.order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order_execution::{OrderSide, OrderStatus};
    use crate::domain::shared::{ExchangeOrderId, OrderId, Symbol};
    use crate::infrastructure::persistence::InMemoryOrderManager;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn order(qty: Decimal) -> Order {
        Order::new(
            OrderId::new("ord-1"),
            Symbol::new("BTCUSDT"),
            OrderSide::Sell,
            qty,
            dec!(100),
        )
    }

    fn response(
        status: &str,
        executed: Option<Decimal>,
        quote: Option<Decimal>,
    ) -> OrderResponse {
        OrderResponse {
            order_id: ExchangeOrderId::new(1),
            status: status.into(),
            executed_qty: executed,
            cummulative_quote_qty: quote,
            client_order_id: None,
        }
    }

    #[test]
    fn filled_without_executed_qty_is_full_quantity() {
        let execution =
            cumulative_execution(&order(dec!(2)), &response("FILLED", None, None)).unwrap();
        assert_eq!(execution, CumulativeExecution::new(dec!(2), None));
    }

    #[test]
    fn reported_totals_are_passed_through() {
        let execution = cumulative_execution(
            &order(dec!(2)),
            &response("PARTIALLY_FILLED", Some(dec!(1)), Some(dec!(99.5))),
        )
        .unwrap();
        assert_eq!(execution, CumulativeExecution::new(dec!(1), Some(dec!(99.5))));
    }

    #[test]
    fn no_totals_without_executed_qty() {
        assert!(cumulative_execution(&order(dec!(1)), &response("NEW", None, None)).is_none());
        assert!(cumulative_execution(&order(dec!(1)), &response("CANCELED", None, None)).is_none());
    }

    #[test]
    fn apply_report_fills_and_moves_portfolio_by_side() {
        let registry = InMemoryOrderManager::new();
        let portfolio = Portfolio::new();
        let id = registry.create(order(dec!(2))).unwrap();
        let registered = registry.get(&id).unwrap();

        let updated = apply_exchange_report(
            &registry,
            &portfolio,
            &registered,
            &response("FILLED", Some(dec!(2)), Some(dec!(210))),
        )
        .unwrap();

        assert_eq!(updated.status(), OrderStatus::Filled);
        assert_eq!(updated.average_fill_price(), dec!(105));
        assert_eq!(portfolio.get(&Symbol::new("BTCUSDT")), dec!(-2));
    }

    #[test]
    fn apply_report_cancelled_without_execution() {
        let registry = InMemoryOrderManager::new();
        let portfolio = Portfolio::new();
        let id = registry.create(order(dec!(2))).unwrap();
        let registered = registry.get(&id).unwrap();

        let updated =
            apply_exchange_report(&registry, &portfolio, &registered, &response("EXPIRED", None, None))
                .unwrap();

        assert_eq!(updated.status(), OrderStatus::Cancelled);
        assert!(portfolio.positions().is_empty());
    }

    #[test]
    fn apply_report_cancelled_with_execution_keeps_the_fill() {
        let registry = InMemoryOrderManager::new();
        let portfolio = Portfolio::new();
        let id = registry.create(order(dec!(2))).unwrap();
        let registered = registry.get(&id).unwrap();

        let updated = apply_exchange_report(
            &registry,
            &portfolio,
            &registered,
            &response("CANCELED", Some(dec!(1)), Some(dec!(101))),
        )
        .unwrap();

        assert_eq!(updated.status(), OrderStatus::Cancelled);
        assert_eq!(updated.filled_quantity(), dec!(1));
        assert_eq!(portfolio.get(&Symbol::new("BTCUSDT")), dec!(-1));
    }

    #[test]
    fn same_report_through_stale_snapshots_counts_once() {
        let registry = InMemoryOrderManager::new();
        let portfolio = Portfolio::new();
        let id = registry.create(order(dec!(2))).unwrap();
        // Both callers captured the order before either report arrived.
        let stale = registry.get(&id).unwrap();
        let report = response("PARTIALLY_FILLED", Some(dec!(1)), Some(dec!(100)));

        apply_exchange_report(&registry, &portfolio, &stale, &report).unwrap();
        let updated = apply_exchange_report(&registry, &portfolio, &stale, &report).unwrap();

        assert_eq!(updated.filled_quantity(), dec!(1));
        assert_eq!(updated.status(), OrderStatus::Partial);
        assert_eq!(portfolio.get(&Symbol::new("BTCUSDT")), dec!(-1));
    }
}
