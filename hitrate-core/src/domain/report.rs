//! BacktestReport — accuracy statistics derived from the trade ledger.

use serde::{Deserialize, Serialize};

/// Aggregate hit-rate statistics for one run.
///
/// Always recomputed from the trade ledger (`TradeBook::report`), never
/// stored redundantly alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Number of trades ever created, including still-pending ones.
    pub total_trades: usize,
    /// Number of trades resolved as wins.
    pub correct_trades: usize,
    /// `100 * correct / total` when `total > 0`, else `0`.
    pub accuracy_pct: f64,
}

impl BacktestReport {
    pub fn from_counts(total_trades: usize, correct_trades: usize) -> Self {
        let accuracy_pct = if total_trades > 0 {
            100.0 * correct_trades as f64 / total_trades as f64
        } else {
            0.0
        };
        Self {
            total_trades,
            correct_trades,
            accuracy_pct,
        }
    }

    pub fn empty() -> Self {
        Self::from_counts(0, 0)
    }
}
