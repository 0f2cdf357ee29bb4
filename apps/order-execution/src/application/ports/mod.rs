//! Application Ports (Driven)
//!
//! Interfaces the application uses to reach external systems.

mod exchange_port;

pub use exchange_port::{
    ExchangeError, ExchangeOrderStatus, ExchangePort, OrderResponse, PlaceOrderRequest,
};
