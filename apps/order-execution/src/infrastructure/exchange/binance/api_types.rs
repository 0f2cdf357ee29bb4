//! Binance REST request and response types.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::ports::{ExchangeOrderStatus, OrderResponse, PlaceOrderRequest};
use crate::domain::shared::ExchangeOrderId;

/// Order endpoint path.
pub const ORDER_PATH: &str = "/api/v3/order";

/// Form parameters for `POST /api/v3/order` (before timestamp and signature).
pub fn new_order_params(request: &PlaceOrderRequest) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", request.symbol.to_string()),
        ("side", request.side.as_str().to_string()),
        ("type", "LIMIT".to_string()),
        ("timeInForce", "GTC".to_string()),
        ("quantity", format_decimal(request.quantity)),
        ("price", format_decimal(request.price)),
        ("newClientOrderId", request.client_order_id.to_string()),
    ]
}

/// Query parameters addressing an order by client order id.
pub fn client_order_params(symbol: &str, client_order_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", symbol.to_string()),
        ("origClientOrderId", client_order_id.to_string()),
    ]
}

/// Plain decimal notation without trailing zeros.
fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Order response (`RESULT`/`FULL` response types and order queries).
///
/// Unknown fields are ignored; quantities arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceOrderResponse {
    /// Exchange order id.
    pub order_id: i64,
    /// Order status.
    pub status: ExchangeOrderStatus,
    /// Client order id.
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Executed quantity.
    #[serde(default)]
    pub executed_qty: Option<Decimal>,
    /// Executed quote quantity.
    #[serde(default)]
    pub cummulative_quote_qty: Option<Decimal>,
}

impl From<BinanceOrderResponse> for OrderResponse {
    fn from(response: BinanceOrderResponse) -> Self {
        Self {
            order_id: ExchangeOrderId::new(response.order_id),
            status: response.status,
            executed_qty: response.executed_qty,
            cummulative_quote_qty: response.cummulative_quote_qty,
            client_order_id: response.client_order_id,
        }
    }
}

/// Error body, e.g. `{"code":-1013,"msg":"Filter failure: PRICE_FILTER"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceErrorResponse {
    /// Binance error code.
    pub code: i64,
    /// Human-readable message.
    pub msg: String,
}
