//! Trade — one simulated fixed-horizon position.

use serde::{Deserialize, Serialize};

use super::signal::Direction;

/// Resolution state of a trade. `Pending` covers both "entry not yet filled"
/// and "entry filled, expiry not yet reached".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pending,
    Win,
    Loss,
}

/// A simulated trade: entry a fixed offset after the signal bar, resolution
/// a fixed holding period after entry.
///
/// Lifecycle: scheduled → entry filled (once) → resolved (once). The
/// `TradeBook` owns all mutation; a resolved trade is never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,
    pub signal_bar: usize,
    pub entry_bar: usize,
    pub expiry_bar: usize,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub outcome: Outcome,
}

impl Trade {
    pub fn is_resolved(&self) -> bool {
        self.outcome != Outcome::Pending
    }

    pub fn is_open(&self) -> bool {
        self.entry_price.is_some() && !self.is_resolved()
    }
}
