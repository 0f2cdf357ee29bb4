// Tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access
    )
)]

//! Order Execution - Rust Core Library
//!
//! Validates order intents against a per-symbol position limit, registers
//! them with an in-process order manager, submits them to a spot exchange
//! over signed REST calls with retry and backoff, and reconciles local state
//! with what the exchange reports.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: order aggregate and lifecycle, portfolio positions, risk limit
//! - **Application**: the `ExchangePort` and the execute / reconcile / cancel
//!   use cases
//! - **Infrastructure**: in-memory order registry and the Binance REST adapter
//!
//! ## Cross-cutting
//!
//! - `resilience`: retry with exponential backoff and cancellation
//! - `config`: YAML and environment configuration
//! - `observability`: `tracing` subscriber setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - business rules with no I/O.
pub mod domain;

/// Application layer - use cases and ports.
pub mod application;

/// Infrastructure layer - adapters.
pub mod infrastructure;

pub mod config;
pub mod error;
pub mod observability;
pub mod resilience;

pub use application::{
    CancelOrderUseCase, ExchangeError, ExchangeOrderStatus, ExchangePort, ExecuteOrderUseCase,
    ExecutionReport, OrderIntent, OrderResponse, PlaceOrderRequest, ReconcileOrderUseCase,
    ReconciliationSummary,
};
pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use domain::order_execution::{
    Fill, Order, OrderError, OrderRegistry, OrderSide, OrderStateMachine, OrderStatus,
};
pub use domain::portfolio::Portfolio;
pub use domain::risk_management::{PositionLimitValidator, RiskError};
pub use domain::shared::{ExchangeOrderId, OrderId, Symbol};
pub use error::ExecutionError;
pub use infrastructure::exchange::{BinanceClient, BinanceConfig, BinanceError};
pub use infrastructure::persistence::InMemoryOrderManager;
pub use resilience::{RetryError, RetryPolicy};
