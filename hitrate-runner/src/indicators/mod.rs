//! Indicator collaborators — pure functions from price arrays to series.
//!
//! Contract shared with the core: `compute` returns a series of exactly
//! `bars.len() - warmup()` values, unpadded. The core performs its own
//! alignment; collaborators never pad with NaN or anything else.

pub mod bollinger;
pub mod directional_stop;
pub mod ema;
pub mod rsi;
pub mod trend_strength;

use hitrate_core::Bar;

/// Price columns extracted once per computation pass.
#[derive(Debug, Clone)]
pub struct PriceArrays {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl PriceArrays {
    pub fn from_bars(bars: &[Bar]) -> Self {
        Self {
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Trait for indicator collaborators.
///
/// # Length contract
/// `compute(prices).len() == prices.len() - warmup()` whenever
/// `prices.len() >= warmup()`, else an empty series. Every value at
/// position `k` depends only on bars `0..=k + warmup()`.
pub trait Indicator: Send + Sync {
    /// Stable series name (e.g., "ema_20", "adx_14").
    fn name(&self) -> &str;

    /// Leading bars consumed before the first defined value.
    fn warmup(&self) -> usize;

    fn compute(&self, prices: &PriceArrays) -> Vec<f64>;
}

pub use bollinger::{BollingerLower, BollingerMiddle, BollingerUpper};
pub use directional_stop::DirectionalStop;
pub use ema::Ema;
pub use rsi::Rsi;
pub use trend_strength::TrendStrength;

#[cfg(test)]
pub(crate) mod testkit {
    use chrono::{TimeZone, Utc};
    use hitrate_core::Bar;

    pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                index: i,
                timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
                    + chrono::Duration::minutes(i as i64),
                open: close - 0.2,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    /// Deterministic pseudo-random walk for length-contract tests.
    pub fn synthetic_closes(n: usize) -> Vec<f64> {
        let mut price = 50.0;
        (0..n)
            .map(|i| {
                let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
                price += ((seed >> 33) % 200) as f64 / 100.0 - 1.0;
                price
            })
            .collect()
    }
}
