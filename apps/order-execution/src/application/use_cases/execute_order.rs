//! Execute Order Use Case
//!
//! validate → register → submit → fill/portfolio → reconcile.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::exchange_report::apply_exchange_report;
use crate::application::ports::{ExchangeOrderStatus, ExchangePort, PlaceOrderRequest};
use crate::domain::order_execution::{Order, OrderError, OrderRegistry, OrderSide};
use crate::domain::portfolio::Portfolio;
use crate::domain::risk_management::PositionLimitValidator;
use crate::domain::shared::{ExchangeOrderId, OrderId, Symbol};
use crate::error::ExecutionError;

/// An order as requested by a collaborator (strategy, API handler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Caller-chosen id; generated when absent.
    #[serde(default)]
    pub id: Option<OrderId>,
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Quantity.
    pub quantity: Decimal,
    /// Limit price.
    pub price: Decimal,
}

impl OrderIntent {
    /// Create an intent without an id.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        Self {
            id: None,
            symbol: symbol.into(),
            side,
            quantity,
            price,
        }
    }

    /// Use a caller-chosen id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<OrderId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Build the unregistered order.
    #[must_use]
    pub fn into_order(self) -> Order {
        Order::new(
            self.id.unwrap_or_default(),
            self.symbol,
            self.side,
            self.quantity,
            self.price,
        )
    }
}

/// Outcome of a successful execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Order snapshot after the exchange response was applied.
    pub order: Order,
    /// Exchange order id.
    pub exchange_order_id: ExchangeOrderId,
    /// Status the exchange reported.
    pub exchange_status: ExchangeOrderStatus,
}

/// Use case for executing a single order end to end.
pub struct ExecuteOrderUseCase<E, R>
where
    E: ExchangePort,
    R: OrderRegistry,
{
    exchange: Arc<E>,
    registry: Arc<R>,
    portfolio: Arc<Portfolio>,
    validator: PositionLimitValidator,
}

impl<E, R> ExecuteOrderUseCase<E, R>
where
    E: ExchangePort,
    R: OrderRegistry,
{
    /// Create a new ExecuteOrderUseCase.
    pub fn new(
        exchange: Arc<E>,
        registry: Arc<R>,
        portfolio: Arc<Portfolio>,
        validator: PositionLimitValidator,
    ) -> Self {
        Self {
            exchange,
            registry,
            portfolio,
            validator,
        }
    }

    /// Execute the use case.
    ///
    /// Stops at the first failing step. An exchange failure leaves the order
    /// registered as `Pending` and the portfolio untouched.
    ///
    /// # Errors
    ///
    /// - `Risk` if the position limit would be exceeded
    /// - `Order` if registration fails (duplicate id, bad parameters) or the
    ///   exchange report cannot be applied
    /// - `Exchange` if the order could not be placed
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        intent: OrderIntent,
    ) -> Result<ExecutionReport, ExecutionError> {
        let order = intent.into_order();

        // 1. Pre-trade risk
        let current = self.portfolio.get(order.symbol());
        self.validator.validate(&order, current)?;

        // 2. Register (idempotency boundary)
        let id = self.registry.create(order)?;
        let order = self
            .registry
            .get(&id)
            .ok_or_else(|| OrderError::not_found(&id))?;

        tracing::info!(
            order_id = %id,
            symbol = %order.symbol(),
            side = %order.side(),
            quantity = %order.quantity(),
            price = %order.price(),
            "order registered"
        );

        // 3. Submit
        let response = match self
            .exchange
            .place_order(cancel, PlaceOrderRequest::from_order(&order))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(order_id = %id, error = %e, transient = e.is_transient(), "order placement failed");
                return Err(e.into());
            }
        };

        // 4. Apply the exchange's view
        self.registry.record_exchange_ack(&id, response.order_id)?;
        let order = apply_exchange_report(&*self.registry, &self.portfolio, &order, &response)?;

        tracing::info!(
            order_id = %id,
            exchange_order_id = %response.order_id,
            exchange_status = %response.status,
            status = %order.status(),
            "order placed"
        );

        Ok(ExecutionReport {
            order,
            exchange_order_id: response.order_id,
            exchange_status: response.status,
        })
    }
}
