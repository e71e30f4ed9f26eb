//! Directional stop — ATR-based stop-and-reverse series.
//!
//! Inherently sequential: the active stop trails below price while
//! trending up and above price while trending down, flipping sides when
//! the close crosses it. The emitted series is the active stop value, so
//! a close/stop flip in the engine corresponds to a trend reversal.

use super::{Indicator, PriceArrays};

#[derive(Debug, Clone)]
pub struct DirectionalStop {
    period: usize,
    multiplier: f64,
    name: String,
}

impl DirectionalStop {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "period must be >= 1");
        assert!(multiplier > 0.0, "multiplier must be > 0");
        Self {
            period,
            multiplier,
            name: format!("dstop_{period}"),
        }
    }

    fn atr(&self, prices: &PriceArrays) -> Vec<f64> {
        let n = prices.len();
        let p = self.period as f64;
        let mut tr = Vec::with_capacity(n - 1);
        for i in 1..n {
            let high = prices.high[i];
            let low = prices.low[i];
            let prev_close = prices.close[i - 1];
            tr.push(
                (high - low)
                    .max((high - prev_close).abs())
                    .max((low - prev_close).abs()),
            );
        }
        // Wilder ATR: SMA seed over the first `period` true ranges.
        let mut out = Vec::with_capacity(tr.len() - self.period + 1);
        let mut atr: f64 = tr[..self.period].iter().sum::<f64>() / p;
        out.push(atr);
        for &t in &tr[self.period..] {
            atr = (atr * (p - 1.0) + t) / p;
            out.push(atr);
        }
        out
    }
}

impl Indicator for DirectionalStop {
    fn name(&self) -> &str {
        &self.name
    }

    /// ATR needs `period` bars of true range, so the first stop value
    /// lands at bar `period`.
    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        let n = prices.len();
        if n <= self.warmup() {
            return Vec::new();
        }
        let atr = self.atr(prices);
        let mut out = Vec::with_capacity(n - self.warmup());

        // Bar indices `period..n` map to atr[0..].
        let start = self.period;
        let hl2 = (prices.high[start] + prices.low[start]) / 2.0;
        let mut upper = hl2 + self.multiplier * atr[0];
        let mut lower = hl2 - self.multiplier * atr[0];
        let mut trending_up = prices.close[start] >= hl2;
        out.push(if trending_up { lower } else { upper });

        for i in (start + 1)..n {
            let a = atr[i - start];
            let hl2 = (prices.high[i] + prices.low[i]) / 2.0;
            let basic_upper = hl2 + self.multiplier * a;
            let basic_lower = hl2 - self.multiplier * a;
            let close = prices.close[i];
            let prev_close = prices.close[i - 1];

            // Bands ratchet: tighten only while price respects them.
            if basic_upper < upper || prev_close > upper {
                upper = basic_upper;
            }
            if basic_lower > lower || prev_close < lower {
                lower = basic_lower;
            }

            if trending_up && close < lower {
                trending_up = false;
                upper = basic_upper;
            } else if !trending_up && close > upper {
                trending_up = true;
                lower = basic_lower;
            }
            out.push(if trending_up { lower } else { upper });
        }
        out
    }
}
