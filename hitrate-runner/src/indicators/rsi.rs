//! Relative strength index, Wilder smoothing.

use super::{Indicator, PriceArrays};

/// RSI over closes. First defined value at bar `period`, so the warm-up
/// equals the period.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        let closes = &prices.close;
        if closes.len() <= self.period {
            return Vec::new();
        }
        let p = self.period as f64;
        let mut out = Vec::with_capacity(closes.len() - self.period);

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for w in closes[..=self.period].windows(2) {
            let delta = w[1] - w[0];
            if delta > 0.0 {
                avg_gain += delta;
            } else {
                avg_loss -= delta;
            }
        }
        avg_gain /= p;
        avg_loss /= p;
        out.push(rsi_value(avg_gain, avg_loss));

        for w in closes[self.period..].windows(2) {
            let delta = w[1] - w[0];
            let (gain, loss) = if delta > 0.0 {
                (delta, 0.0)
            } else {
                (0.0, -delta)
            };
            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
            out.push(rsi_value(avg_gain, avg_loss));
        }
        out
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
