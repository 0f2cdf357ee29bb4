//! Order Execution Aggregates

mod order;

pub use order::Order;
