//! Cancel Order Use Case

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::exchange_report::apply_exchange_report;
use crate::application::ports::ExchangePort;
use crate::domain::order_execution::{Order, OrderError, OrderRegistry};
use crate::domain::portfolio::Portfolio;
use crate::domain::shared::OrderId;
use crate::error::ExecutionError;

/// Use case for cancelling an order on the exchange and locally.
pub struct CancelOrderUseCase<E, R>
where
    E: ExchangePort,
    R: OrderRegistry,
{
    exchange: Arc<E>,
    registry: Arc<R>,
    portfolio: Arc<Portfolio>,
}

impl<E, R> CancelOrderUseCase<E, R>
where
    E: ExchangePort,
    R: OrderRegistry,
{
    /// Create a new CancelOrderUseCase.
    pub fn new(exchange: Arc<E>, registry: Arc<R>, portfolio: Arc<Portfolio>) -> Self {
        Self {
            exchange,
            registry,
            portfolio,
        }
    }

    /// Cancel an order and return its snapshot.
    ///
    /// Local state only changes after the exchange confirms. Quantity the
    /// exchange executed before the cancel is recorded as a fill and moves the
    /// portfolio before the order is closed. Terminal orders are returned
    /// unchanged without calling the exchange.
    ///
    /// # Errors
    ///
    /// `Order(OrderNotFound)` for unknown ids, `Exchange` if the exchange
    /// refuses or cannot be reached, `Order` if the final report cannot be
    /// applied.
    pub async fn cancel(
        &self,
        cancel: &CancellationToken,
        id: &OrderId,
    ) -> Result<Order, ExecutionError> {
        let order = self
            .registry
            .get(id)
            .ok_or_else(|| OrderError::not_found(id))?;

        if order.is_terminal() {
            tracing::debug!(order_id = %id, status = %order.status(), "cancel skipped, order already terminal");
            return Ok(order);
        }

        let response = match self.exchange.cancel_order(cancel, id, order.symbol()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(order_id = %id, error = %e, "exchange cancel failed");
                return Err(e.into());
            }
        };

        let reported = apply_exchange_report(&*self.registry, &self.portfolio, &order, &response)?;
        self.registry.cancel(id)?;
        let order = self
            .registry
            .get(id)
            .ok_or_else(|| OrderError::not_found(id))?;
        tracing::info!(
            order_id = %id,
            symbol = %order.symbol(),
            exchange_status = %response.status,
            filled = %reported.filled_quantity(),
            status = %order.status(),
            "order cancelled"
        );

        Ok(order)
    }
}
