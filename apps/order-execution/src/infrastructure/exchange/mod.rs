//! Exchange Adapters
//!
//! Implementations of `ExchangePort`.

pub mod binance;

pub use binance::{BinanceClient, BinanceConfig, BinanceError};
