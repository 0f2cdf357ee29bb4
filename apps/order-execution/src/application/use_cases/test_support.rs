//! Scripted exchange double for use case tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ExchangeError, ExchangePort, OrderResponse, PlaceOrderRequest};
use crate::domain::shared::{ExchangeOrderId, OrderId, Symbol};

pub(crate) fn response(
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

/// Replays queued results and records every call.
#[derive(Default)]
pub(crate) struct MockExchange {
    place_results: Mutex<VecDeque<Result<OrderResponse, ExchangeError>>>,
    get_results: Mutex<VecDeque<Result<OrderResponse, ExchangeError>>>,
    cancel_results: Mutex<VecDeque<Result<OrderResponse, ExchangeError>>>,
    pub placed: Mutex<Vec<PlaceOrderRequest>>,
    pub queried: Mutex<Vec<OrderId>>,
    pub cancelled: Mutex<Vec<OrderId>>,
}

impl MockExchange {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_place(self, result: Result<OrderResponse, ExchangeError>) -> Self {
        self.place_results.lock().push_back(result);
        self
    }

    pub(crate) fn on_get(self, result: Result<OrderResponse, ExchangeError>) -> Self {
        self.get_results.lock().push_back(result);
        self
    }

    pub(crate) fn on_cancel(self, result: Result<OrderResponse, ExchangeError>) -> Self {
        self.cancel_results.lock().push_back(result);
        self
    }
}

fn unscripted() -> ExchangeError {
    ExchangeError::Permanent {
        status: 500,
        code: None,
        message: "unscripted call".to_string(),
    }
}

#[async_trait]
impl ExchangePort for MockExchange {
    async fn place_order(
        &self,
        _cancel: &CancellationToken,
        request: PlaceOrderRequest,
    ) -> Result<OrderResponse, ExchangeError> {
        self.placed.lock().push(request);
        self.place_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn get_order(
        &self,
        _cancel: &CancellationToken,
        client_order_id: &OrderId,
        _symbol: &Symbol,
    ) -> Result<OrderResponse, ExchangeError> {
        self.queried.lock().push(client_order_id.clone());
        self.get_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn cancel_order(
        &self,
        _cancel: &CancellationToken,
        client_order_id: &OrderId,
        _symbol: &Symbol,
    ) -> Result<OrderResponse, ExchangeError> {
        self.cancelled.lock().push(client_order_id.clone());
        self.cancel_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }
}
