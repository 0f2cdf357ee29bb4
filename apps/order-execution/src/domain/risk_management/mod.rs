//! Risk Management Bounded Context
//!
//! Pre-trade checks run before an order is registered.

pub mod errors;
pub mod services;

pub use errors::RiskError;
pub use services::PositionLimitValidator;
