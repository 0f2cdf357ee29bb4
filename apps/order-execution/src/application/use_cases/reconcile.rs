//! Reconcile Use Case
//!
//! Pulls the exchange's view of an order and applies it locally.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::exchange_report::apply_exchange_report;
use crate::application::ports::ExchangePort;
use crate::domain::order_execution::{Order, OrderError, OrderRegistry};
use crate::domain::portfolio::Portfolio;
use crate::domain::shared::OrderId;
use crate::error::ExecutionError;

/// Result of a reconciliation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationSummary {
    /// Orders queried on the exchange.
    pub checked: usize,
    /// Orders whose status or fills changed.
    pub updated: usize,
    /// Orders that could not be reconciled, with the reason.
    pub errors: Vec<(OrderId, String)>,
}

impl ReconciliationSummary {
    /// Check if every order was reconciled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Use case for reconciling local orders with the exchange.
pub struct ReconcileOrderUseCase<E, R>
where
    E: ExchangePort,
    R: OrderRegistry,
{
    exchange: Arc<E>,
    registry: Arc<R>,
    portfolio: Arc<Portfolio>,
}

impl<E, R> ReconcileOrderUseCase<E, R>
where
    E: ExchangePort,
    R: OrderRegistry,
{
    /// Create a new ReconcileOrderUseCase.
    pub fn new(exchange: Arc<E>, registry: Arc<R>, portfolio: Arc<Portfolio>) -> Self {
        Self {
            exchange,
            registry,
            portfolio,
        }
    }

    /// Reconcile a single order and return its updated snapshot.
    ///
    /// Terminal orders are returned as they are without calling the exchange.
    ///
    /// # Errors
    ///
    /// `Order(OrderNotFound)` for unknown ids, `Exchange` if the lookup fails,
    /// `Order` if the exchange report contradicts local fills.
    pub async fn reconcile(
        &self,
        cancel: &CancellationToken,
        id: &OrderId,
    ) -> Result<Order, ExecutionError> {
        let order = self
            .registry
            .get(id)
            .ok_or_else(|| OrderError::not_found(id))?;

        if order.is_terminal() {
            return Ok(order);
        }

        let response = self
            .exchange
            .get_order(cancel, id, order.symbol())
            .await?;

        let updated = apply_exchange_report(&*self.registry, &self.portfolio, &order, &response)?;

        if updated.status() != order.status() {
            tracing::info!(
                order_id = %id,
                from = %order.status(),
                to = %updated.status(),
                exchange_status = %response.status,
                "order reconciled"
            );
        }

        Ok(updated)
    }

    /// Reconcile every non-terminal order.
    ///
    /// Per-order failures are collected, not propagated. Stops early once
    /// `cancel` fires.
    pub async fn reconcile_active(&self, cancel: &CancellationToken) -> ReconciliationSummary {
        let mut summary = ReconciliationSummary::default();

        for order in self.registry.active() {
            if cancel.is_cancelled() {
                tracing::debug!(checked = summary.checked, "reconciliation sweep cancelled");
                break;
            }

            summary.checked += 1;
            match self.reconcile(cancel, order.id()).await {
                Ok(updated) => {
                    if updated.status() != order.status()
                        || updated.filled_quantity() != order.filled_quantity()
                    {
                        summary.updated += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(order_id = %order.id(), error = %e, "reconciliation failed");
                    summary.errors.push((order.id().clone(), e.to_string()));
                }
            }
        }

        tracing::info!(
            checked = summary.checked,
            updated = summary.updated,
            errors = summary.errors.len(),
            "reconciliation sweep complete"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ExchangeError;
    use crate::application::use_cases::test_support::{MockExchange, response};
    use crate::domain::order_execution::{OrderSide, OrderStatus};
    use crate::domain::shared::Symbol;
    use crate::infrastructure::persistence::InMemoryOrderManager;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn register(registry: &InMemoryOrderManager, id: &str, qty: Decimal) -> OrderId {
        registry
            .create(Order::new(
                OrderId::new(id),
                Symbol::new("ETHUSDT"),
                OrderSide::Buy,
                qty,
                dec!(2000),
            ))
            .unwrap()
    }

    fn use_case(
        exchange: MockExchange,
    ) -> (
        ReconcileOrderUseCase<MockExchange, InMemoryOrderManager>,
        Arc<InMemoryOrderManager>,
        Arc<Portfolio>,
    ) {
        let registry = Arc::new(InMemoryOrderManager::new());
        let portfolio = Arc::new(Portfolio::new());
        let uc = ReconcileOrderUseCase::new(
            Arc::new(exchange),
            Arc::clone(&registry),
            Arc::clone(&portfolio),
        );
        (uc, registry, portfolio)
    }

    #[tokio::test]
    async fn reconcile_applies_remote_fill() {
        let (uc, registry, portfolio) = use_case(
            MockExchange::new().on_get(Ok(response("FILLED", Some(dec!(2)), Some(dec!(4100))))),
        );
        let id = register(&registry, "ord-1", dec!(2));

        let order = uc.reconcile(&CancellationToken::new(), &id).await.unwrap();

        assert_eq!(order.status(), OrderStatus::Filled);
        assert_eq!(order.average_fill_price(), dec!(2050));
        assert_eq!(portfolio.get(&Symbol::new("ETHUSDT")), dec!(2));
    }

    #[tokio::test]
    async fn reconcile_unknown_order() {
        let (uc, _, _) = use_case(MockExchange::new());
        let err = uc
            .reconcile(&CancellationToken::new(), &OrderId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::Order(OrderError::OrderNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn reconcile_terminal_order_skips_exchange() {
        let exchange = MockExchange::new();
        let (uc, registry, _) = use_case(exchange);
        let id = register(&registry, "ord-1", dec!(1));
        registry.cancel(&id).unwrap();

        let order = uc.reconcile(&CancellationToken::new(), &id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn reconcile_active_collects_summary() {
        let (uc, registry, _) = use_case(
            MockExchange::new()
                .on_get(Ok(response("CANCELED", None, None)))
                .on_get(Err(ExchangeError::Transient {
                    message: "HTTP 502".to_string(),
                    attempts: 5,
                }))
                .on_get(Ok(response("NEW", Some(dec!(0)), None))),
        );
        let a = register(&registry, "a", dec!(1));
        let b = register(&registry, "b", dec!(1));
        let c = register(&registry, "c", dec!(1));
        let done = register(&registry, "done", dec!(1));
        registry.add_fill(&done, dec!(1), dec!(2000)).unwrap();

        let summary = uc.reconcile_active(&CancellationToken::new()).await;

        assert_eq!(summary.checked, 3);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(!summary.is_success());

        // The registry lists orders by id, so responses are consumed a, b, c.
        assert_eq!(registry.get(&a).unwrap().status(), OrderStatus::Cancelled);
        assert_eq!(summary.errors[0].0, b);
        assert_eq!(registry.get(&c).unwrap().status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn reconcile_active_stops_when_cancelled() {
        let (uc, registry, _) = use_case(MockExchange::new());
        register(&registry, "a", dec!(1));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = uc.reconcile_active(&cancel).await;

        assert_eq!(summary, ReconciliationSummary::default());
    }
}
