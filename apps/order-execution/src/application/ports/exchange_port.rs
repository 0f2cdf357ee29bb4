//! Exchange Port (Driven Port)
//!
//! Interface for placing, querying and cancelling orders on an exchange.
//! Every call takes the caller's [`CancellationToken`]; firing it aborts the
//! call, including any retry backoff in progress.

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::domain::order_execution::{Order, OrderSide, OrderStatus};
use crate::domain::shared::{ExchangeOrderId, OrderId, Symbol};

/// Request to place a limit order.
///
/// `client_order_id` is the exchange idempotency key; retries resend it
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    /// Client order ID (local order id).
    pub client_order_id: OrderId,
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Quantity.
    pub quantity: Decimal,
    /// Limit price.
    pub price: Decimal,
}

impl PlaceOrderRequest {
    /// Build the request for a registered order.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        Self {
            client_order_id: order.id().clone(),
            symbol: order.symbol().clone(),
            side: order.side(),
            quantity: order.quantity(),
            price: order.price(),
        }
    }
}

/// Order status as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExchangeOrderStatus {
    /// Accepted, resting on the book.
    New,
    /// Partially executed.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Cancelled.
    Canceled,
    /// Cancel in progress.
    PendingCancel,
    /// Rejected by the exchange.
    Rejected,
    /// Expired by time in force.
    Expired,
    /// Expired by self-trade prevention.
    ExpiredInMatch,
    /// A status this client does not know.
    Other(String),
}

impl ExchangeOrderStatus {
    /// Wire string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::PendingCancel => "PENDING_CANCEL",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
            Self::ExpiredInMatch => "EXPIRED_IN_MATCH",
            Self::Other(s) => s,
        }
    }

    /// Local status to reconcile to, if the report is actionable.
    ///
    /// `FILLED` maps to `Filled`; `CANCELED`, `REJECTED` and `EXPIRED*` map
    /// to `Cancelled`. Everything else leaves local state alone.
    #[must_use]
    pub const fn to_local(&self) -> Option<OrderStatus> {
        match self {
            Self::Filled => Some(OrderStatus::Filled),
            Self::Canceled | Self::Rejected | Self::Expired | Self::ExpiredInMatch => {
                Some(OrderStatus::Cancelled)
            }
            _ => None,
        }
    }

    /// Returns true if the exchange reports executed quantity.
    #[must_use]
    pub const fn has_execution(&self) -> bool {
        matches!(self, Self::Filled | Self::PartiallyFilled)
    }
}

impl From<String> for ExchangeOrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NEW" => Self::New,
            "PARTIALLY_FILLED" => Self::PartiallyFilled,
            "FILLED" => Self::Filled,
            "CANCELED" => Self::Canceled,
            "PENDING_CANCEL" => Self::PendingCancel,
            "REJECTED" => Self::Rejected,
            "EXPIRED" => Self::Expired,
            "EXPIRED_IN_MATCH" => Self::ExpiredInMatch,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ExchangeOrderStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ExchangeOrderStatus> for String {
    fn from(value: ExchangeOrderStatus) -> Self {
        match value {
            ExchangeOrderStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExchangeOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exchange reply for a placed or queried order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Exchange order id.
    pub order_id: ExchangeOrderId,
    /// Exchange status.
    pub status: ExchangeOrderStatus,
    /// Cumulative executed quantity, when reported.
    pub executed_qty: Option<Decimal>,
    /// Cumulative quote quantity (`sum(qty * price)`), when reported.
    pub cummulative_quote_qty: Option<Decimal>,
    /// Client order id echoed back.
    pub client_order_id: Option<String>,
}

impl OrderResponse {
    /// Average execution price implied by the response, if derivable.
    #[must_use]
    pub fn average_price(&self) -> Option<Decimal> {
        match (self.executed_qty, self.cummulative_quote_qty) {
            (Some(qty), Some(quote)) if qty > Decimal::ZERO => Some(quote / qty),
            _ => None,
        }
    }
}

/// Exchange port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// Transient failures persisted through every attempt.
    #[error("exchange unavailable after {attempts} attempts: {message}")]
    Transient {
        /// Last failure.
        message: String,
        /// Attempts made.
        attempts: u32,
    },

    /// The caller cancelled the request.
    #[error("exchange request cancelled after {attempts} attempts")]
    Cancelled {
        /// Attempts started.
        attempts: u32,
    },

    /// The exchange refused the request.
    #[error("exchange rejected request with HTTP {status}: {message}")]
    Permanent {
        /// HTTP status code.
        status: u16,
        /// Exchange error code, if the body carried one.
        code: Option<i64>,
        /// Exchange message or HTTP reason.
        message: String,
    },

    /// A successful response could not be decoded.
    #[error("failed to decode exchange response: {0}")]
    Decode(String),

    /// The request could not be built or signed.
    #[error("invalid exchange request: {0}")]
    InvalidRequest(String),

    /// API key or secret missing.
    #[error("exchange API credentials missing")]
    MissingCredentials,
}

impl ExchangeError {
    /// Returns true for failures of the unreliable-network kind, where the
    /// order's true state on the exchange is unknown.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Cancelled { .. })
    }
}

/// Port for exchange interactions.
#[async_trait]
pub trait ExchangePort: Send + Sync {
    /// Place a limit order.
    async fn place_order(
        &self,
        cancel: &CancellationToken,
        request: PlaceOrderRequest,
    ) -> Result<OrderResponse, ExchangeError>;

    /// Look up an order by client order id.
    async fn get_order(
        &self,
        cancel: &CancellationToken,
        client_order_id: &OrderId,
        symbol: &Symbol,
    ) -> Result<OrderResponse, ExchangeError>;

    /// Cancel an order by client order id.
    ///
    /// Returns the exchange's final report, which carries any quantity
    /// executed before the cancel took effect.
    async fn cancel_order(
        &self,
        cancel: &CancellationToken,
        client_order_id: &OrderId,
        symbol: &Symbol,
    ) -> Result<OrderResponse, ExchangeError>;
}
