//! Trade simulation — fixed-horizon trades with overlapping lifetimes.
//!
//! The book owns the full ledger (every trade ever created, in creation
//! order) plus the working set of unresolved trades. Trades overlap by
//! design when the holding period exceeds the signal interval; the overlap
//! models concurrent exposure and is never collapsed.

use serde::{Deserialize, Serialize};

use crate::domain::{BacktestReport, Direction, Outcome, Trade};

/// The trade ledger and open working set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeBook {
    trades: Vec<Trade>,
    /// Ledger indices of trades not yet resolved.
    working: Vec<usize>,
}

impl TradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a trade for a signal at `signal_bar`: entry fills at
    /// `signal_bar + entry_offset`, resolution at `entry + expiry_bars`.
    /// Returns the ledger index.
    pub fn schedule(
        &mut self,
        direction: Direction,
        signal_bar: usize,
        entry_offset: usize,
        expiry_bars: usize,
    ) -> usize {
        let entry_bar = signal_bar + entry_offset;
        let trade = Trade {
            direction,
            signal_bar,
            entry_bar,
            expiry_bar: entry_bar + expiry_bars,
            entry_price: None,
            exit_price: None,
            outcome: Outcome::Pending,
        };
        let id = self.trades.len();
        self.trades.push(trade);
        self.working.push(id);
        id
    }

    /// Advance the book to bar `bar_index` with its close price: fill
    /// entries due at this bar, then resolve trades expiring at it.
    ///
    /// Each trade's entry fills at most once and its outcome is set at
    /// most once; a second call with the same bar is a no-op for trades
    /// already past that transition.
    pub fn on_bar(&mut self, bar_index: usize, close: f64) {
        for &id in &self.working {
            let trade = &mut self.trades[id];
            if trade.entry_price.is_none() && trade.entry_bar == bar_index {
                trade.entry_price = Some(close);
            }
        }

        let mut still_working = Vec::with_capacity(self.working.len());
        for &id in &self.working {
            let trade = &mut self.trades[id];
            if trade.expiry_bar == bar_index {
                if let Some(entry) = trade.entry_price {
                    let won = match trade.direction {
                        Direction::Up => close > entry,
                        Direction::Down => close < entry,
                    };
                    trade.exit_price = Some(close);
                    trade.outcome = if won { Outcome::Win } else { Outcome::Loss };
                    continue;
                }
                // Expiry reached without an entry fill: the feed skipped the
                // entry bar. The trade stays pending and leaves the working set.
                continue;
            }
            still_working.push(id);
        }
        self.working = still_working;
    }

    /// Every trade ever created, in creation order.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Number of trades currently open (entry filled, not yet resolved).
    pub fn open_count(&self) -> usize {
        self.working
            .iter()
            .filter(|&&id| self.trades[id].is_open())
            .count()
    }

    /// Derive the report from the ledger. Total counts every trade ever
    /// created; correct counts wins.
    pub fn report(&self) -> BacktestReport {
        let total = self.trades.len();
        let correct = self
            .trades
            .iter()
            .filter(|t| t.outcome == Outcome::Win)
            .count();
        BacktestReport::from_counts(total, correct)
    }
}
