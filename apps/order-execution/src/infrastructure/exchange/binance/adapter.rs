//! Binance adapter implementing ExchangePort.

use async_trait::async_trait;
use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::api_types::{
    BinanceOrderResponse, ORDER_PATH, client_order_params, new_order_params,
};
use super::config::BinanceConfig;
use super::http_client::BinanceHttpClient;
use crate::application::ports::{ExchangeError, ExchangePort, OrderResponse, PlaceOrderRequest};
use crate::domain::shared::{OrderId, Symbol};

/// Binance spot exchange client.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: BinanceHttpClient,
}

impl BinanceClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// `MissingCredentials` if the key or secret is empty; `InvalidRequest`
    /// if the base URL is unusable.
    pub fn new(config: &BinanceConfig) -> Result<Self, ExchangeError> {
        let http = BinanceHttpClient::new(config).map_err(ExchangeError::from)?;
        tracing::info!(base_url = %config.base_url, "Binance client initialized");
        Ok(Self { http })
    }

    /// Create a client from `BINANCE_API_KEY`, `BINANCE_SECRET_KEY` and
    /// `BINANCE_REST_URL`.
    ///
    /// # Errors
    ///
    /// Same as [`BinanceClient::new`].
    pub fn from_env() -> Result<Self, ExchangeError> {
        Self::new(&BinanceConfig::from_env())
    }
}

#[async_trait]
impl ExchangePort for BinanceClient {
    async fn place_order(
        &self,
        cancel: &CancellationToken,
        request: PlaceOrderRequest,
    ) -> Result<OrderResponse, ExchangeError> {
        tracing::info!(
            client_order_id = %request.client_order_id,
            symbol = %request.symbol,
            side = %request.side,
            quantity = %request.quantity,
            price = %request.price,
            "Placing order on Binance"
        );

        let params = new_order_params(&request);
        let response: BinanceOrderResponse = self
            .http
            .send_signed(cancel, Method::POST, ORDER_PATH, &params)
            .await?;

        tracing::info!(
            client_order_id = %request.client_order_id,
            exchange_order_id = response.order_id,
            status = %response.status,
            "Order accepted by Binance"
        );

        Ok(response.into())
    }

    async fn get_order(
        &self,
        cancel: &CancellationToken,
        client_order_id: &OrderId,
        symbol: &Symbol,
    ) -> Result<OrderResponse, ExchangeError> {
        let params = client_order_params(symbol.as_str(), client_order_id.as_str());
        let response: BinanceOrderResponse = self
            .http
            .send_signed(cancel, Method::GET, ORDER_PATH, &params)
            .await?;
        Ok(response.into())
    }

    async fn cancel_order(
        &self,
        cancel: &CancellationToken,
        client_order_id: &OrderId,
        symbol: &Symbol,
    ) -> Result<OrderResponse, ExchangeError> {
        tracing::info!(client_order_id = %client_order_id, symbol = %symbol, "Cancelling order on Binance");
        let params = client_order_params(symbol.as_str(), client_order_id.as_str());
        let response: BinanceOrderResponse = self
            .http
            .send_signed(cancel, Method::DELETE, ORDER_PATH, &params)
            .await?;

        tracing::info!(
            client_order_id = %client_order_id,
            status = %response.status,
            "Order cancel acknowledged by Binance"
        );

        Ok(response.into())
    }
}
