//! Infrastructure Layer
//!
//! Adapters implementing the domain and application ports:
//!
//! - `persistence/`: in-memory order registry (the Order Manager)
//! - `exchange/`: exchange REST adapters (Binance)

pub mod exchange;
pub mod persistence;
