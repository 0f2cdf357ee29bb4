//! In-memory order manager.

use std::collections::HashMap;

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::order_execution::{
    AppliedExecution, CumulativeExecution, Fill, Order, OrderError, OrderRegistry, OrderStatus,
};
use crate::domain::shared::{ExchangeOrderId, OrderId};

/// In-memory implementation of [`OrderRegistry`].
///
/// One lock guards the whole map: mutations take the write lock, reads
/// share the read lock, and no lock is held across an await point.
#[derive(Debug, Default)]
pub struct InMemoryOrderManager {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderManager {
    /// Create a new empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_order_mut<T>(
        &self,
        id: &OrderId,
        f: impl FnOnce(&mut Order) -> Result<T, OrderError>,
    ) -> Result<T, OrderError> {
        let mut orders = self.orders.write();
        let order = orders.get_mut(id).ok_or_else(|| OrderError::not_found(id))?;
        f(order)
    }
}

impl OrderRegistry for InMemoryOrderManager {
    fn create(&self, order: Order) -> Result<OrderId, OrderError> {
        let id = if order.id().is_empty() {
            OrderId::generate()
        } else {
            order.id().clone()
        };
        let order = order.into_registered(id.clone());
        order.validate()?;

        let mut orders = self.orders.write();
        if orders.contains_key(&id) {
            tracing::warn!(order_id = %id, "duplicate order rejected");
            return Err(OrderError::DuplicateOrder { order_id: id });
        }
        orders.insert(id.clone(), order);

        tracing::debug!(order_id = %id, "order created");
        Ok(id)
    }

    fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.read().get(id).cloned()
    }

    fn add_fill(
        &self,
        id: &OrderId,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Order, OrderError> {
        self.with_order_mut(id, |order| {
            order.apply_fill(Fill::new(quantity, price))?;
            tracing::debug!(
                order_id = %id,
                fill_qty = %quantity,
                fill_price = %price,
                filled_qty = %order.filled_quantity(),
                status = %order.status(),
                "fill applied"
            );
            Ok(order.clone())
        })
    }

    fn apply_execution(
        &self,
        id: &OrderId,
        execution: Option<CumulativeExecution>,
        status: Option<OrderStatus>,
    ) -> Result<AppliedExecution, OrderError> {
        self.with_order_mut(id, |order| {
            let fill = match execution {
                Some(execution) => order.apply_execution(execution)?,
                None => None,
            };

            let from = order.status();
            if let Some(status) = status {
                if order.reconcile(status) {
                    tracing::debug!(order_id = %id, %from, to = %status, "order reconciled");
                }
            }

            if let Some(fill) = fill {
                tracing::debug!(
                    order_id = %id,
                    fill_qty = %fill.quantity,
                    fill_price = %fill.price,
                    filled_qty = %order.filled_quantity(),
                    status = %order.status(),
                    "execution applied"
                );
            }

            Ok(AppliedExecution {
                order: order.clone(),
                fill,
            })
        })
    }

    fn cancel(&self, id: &OrderId) -> Result<(), OrderError> {
        self.with_order_mut(id, |order| {
            if order.cancel() {
                tracing::debug!(order_id = %id, "order cancelled");
            } else {
                tracing::debug!(order_id = %id, status = %order.status(), "cancel ignored, order terminal");
            }
            Ok(())
        })
    }

    fn reconcile(&self, id: &OrderId, exchange_status: OrderStatus) -> Result<(), OrderError> {
        if !exchange_status.is_reconcilable() {
            return Ok(());
        }
        self.with_order_mut(id, |order| {
            let from = order.status();
            if order.reconcile(exchange_status) {
                tracing::debug!(order_id = %id, %from, to = %exchange_status, "order reconciled");
            }
            Ok(())
        })
    }

    fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), OrderError> {
        self.with_order_mut(id, |order| order.transition_to(status))
    }

    fn record_exchange_ack(
        &self,
        id: &OrderId,
        exchange_order_id: ExchangeOrderId,
    ) -> Result<(), OrderError> {
        self.with_order_mut(id, |order| {
            order.record_exchange_ack(exchange_order_id);
            Ok(())
        })
    }

    /// Orders sorted by id.
    fn list(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.read().values().cloned().collect();
        orders.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        orders
    }

    fn len(&self) -> usize {
        self.orders.read().len()
    }
}
