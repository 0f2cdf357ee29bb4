//! Application Layer
//!
//! Orchestrates domain logic through use cases.
//!
//! - **Ports**: interfaces to external systems (the exchange)
//! - **Use Cases**: execute, reconcile and cancel orders

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
