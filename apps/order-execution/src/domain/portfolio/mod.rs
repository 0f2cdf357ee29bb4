//! Portfolio Bounded Context
//!
//! Signed position quantity per symbol. Positions are created lazily on
//! first update and never removed.

use std::collections::HashMap;

use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::shared::Symbol;

/// Thread-safe symbol → position map.
#[derive(Debug, Default)]
pub struct Portfolio {
    positions: RwLock<HashMap<Symbol, Decimal>>,
}

impl Portfolio {
    /// Create an empty portfolio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signed delta to a symbol's position and return the new position.
    ///
    /// Saturates at the `Decimal` bounds.
    pub fn update(&self, symbol: &Symbol, delta: Decimal) -> Decimal {
        let mut positions = self.positions.write();
        let position = positions.entry(symbol.clone()).or_insert(Decimal::ZERO);
        *position = position.saturating_add(delta);
        *position
    }

    /// Current position; zero for symbols never traded.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Decimal {
        self.positions
            .read()
            .get(symbol)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Snapshot of all positions.
    #[must_use]
    pub fn positions(&self) -> HashMap<Symbol, Decimal> {
        self.positions.read().clone()
    }
}
