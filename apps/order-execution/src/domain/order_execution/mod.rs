//! Order Execution Bounded Context
//!
//! Owns the order lifecycle from registration to a terminal state.
//!
//! # Key Concepts
//!
//! - **Order Aggregate**: enforces `filled_quantity <= quantity` and keeps the
//!   quantity-weighted average fill price
//! - **State Machine**: `Pending -> Partial -> Filled`, with `Cancelled`
//!   reachable from any non-terminal state
//! - **Order Registry**: the single owner of registered orders

pub mod aggregate;
pub mod errors;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::Order;
pub use errors::OrderError;
pub use repository::{AppliedExecution, OrderRegistry};
pub use services::OrderStateMachine;
pub use value_objects::{CumulativeExecution, Fill, OrderSide, OrderStatus};
