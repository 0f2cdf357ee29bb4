//! Binance Spot REST Adapter
//!
//! Implementation of `ExchangePort` for the Binance `/api/v3/order` endpoints:
//! - HMAC-SHA256 signed requests
//! - Retry with exponential backoff on transport errors and 5xx
//! - Client order id as the idempotency key across retries

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;
mod signer;

pub use adapter::BinanceClient;
pub use config::{
    API_KEY_ENV, BASE_URL_ENV, BinanceConfig, DEFAULT_BASE_URL, DEFAULT_RECV_WINDOW_MS,
    DEFAULT_TIMEOUT, SECRET_KEY_ENV,
};
pub use error::BinanceError;
pub use signer::HmacSigner;
