//! Risk Management Domain Services

mod position_limit;

pub use position_limit::PositionLimitValidator;
