//! Order Execution Value Objects

mod execution;
mod fill;
mod order_side;
mod order_status;

pub use execution::CumulativeExecution;
pub use fill::Fill;
pub use order_side::OrderSide;
pub use order_status::OrderStatus;
