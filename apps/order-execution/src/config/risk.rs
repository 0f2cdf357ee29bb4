//! Pre-trade risk configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Risk limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Maximum position per symbol.
    #[serde(default = "default_max_position")]
    pub max_position: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_position: default_max_position(),
        }
    }
}

fn default_max_position() -> Decimal {
    Decimal::ONE_HUNDRED
}
