//! Exchange-reported execution totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the exchange has executed for an order so far.
///
/// Totals, not deltas: applying the same report twice must record its
/// quantity once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeExecution {
    /// Total executed quantity.
    pub executed_quantity: Decimal,
    /// Total quote value (`sum(qty * price)`), when reported.
    pub quote_quantity: Option<Decimal>,
}

impl CumulativeExecution {
    /// Create a new execution total.
    #[must_use]
    pub const fn new(executed_quantity: Decimal, quote_quantity: Option<Decimal>) -> Self {
        Self {
            executed_quantity,
            quote_quantity,
        }
    }
}
