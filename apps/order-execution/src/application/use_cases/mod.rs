//! Application Use Cases

mod cancel_order;
mod exchange_report;
mod execute_order;
mod reconcile;

pub use cancel_order::CancelOrderUseCase;
pub use execute_order::{ExecuteOrderUseCase, ExecutionReport, OrderIntent};
pub use reconcile::{ReconcileOrderUseCase, ReconciliationSummary};

#[cfg(test)]
pub(crate) mod test_support;
