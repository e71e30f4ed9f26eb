//! ADX-style trend-strength index.

use super::{Indicator, PriceArrays};

/// Average directional index over `period` bars, Wilder smoothing
/// throughout. The first DX needs `period` bars of smoothed DM/TR and the
/// ADX is a further `period - 1`-bar average of DX, so the warm-up is
/// `2 * period - 1`.
#[derive(Debug, Clone)]
pub struct TrendStrength {
    period: usize,
    name: String,
}

impl TrendStrength {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "period must be >= 1");
        Self {
            period,
            name: format!("adx_{period}"),
        }
    }
}

impl Indicator for TrendStrength {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        2 * self.period - 1
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        let n = prices.len();
        if n <= self.warmup() {
            return Vec::new();
        }
        let p = self.period as f64;

        // Per-bar true range and directional movement, from bar 1 on.
        let mut tr = Vec::with_capacity(n - 1);
        let mut plus_dm = Vec::with_capacity(n - 1);
        let mut minus_dm = Vec::with_capacity(n - 1);
        for i in 1..n {
            let high = prices.high[i];
            let low = prices.low[i];
            let prev_close = prices.close[i - 1];
            tr.push(
                (high - low)
                    .max((high - prev_close).abs())
                    .max((low - prev_close).abs()),
            );
            let up = high - prices.high[i - 1];
            let down = prices.low[i - 1] - low;
            plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
            minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
        }

        // Wilder-smoothed sums, seeded over the first `period` entries.
        let mut tr_s: f64 = tr[..self.period].iter().sum();
        let mut plus_s: f64 = plus_dm[..self.period].iter().sum();
        let mut minus_s: f64 = minus_dm[..self.period].iter().sum();

        let mut dx = Vec::new();
        dx.push(dx_value(plus_s, minus_s, tr_s));
        for k in self.period..tr.len() {
            tr_s = tr_s - tr_s / p + tr[k];
            plus_s = plus_s - plus_s / p + plus_dm[k];
            minus_s = minus_s - minus_s / p + minus_dm[k];
            dx.push(dx_value(plus_s, minus_s, tr_s));
        }

        // ADX: simple average of the first `period` DX values, then Wilder.
        let mut out = Vec::with_capacity(n - self.warmup());
        let mut adx: f64 = dx[..self.period].iter().sum::<f64>() / p;
        out.push(adx);
        for &d in &dx[self.period..] {
            adx = (adx * (p - 1.0) + d) / p;
            out.push(adx);
        }
        out
    }
}

fn dx_value(plus_s: f64, minus_s: f64, tr_s: f64) -> f64 {
    if tr_s == 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * plus_s / tr_s;
    let minus_di = 100.0 * minus_s / tr_s;
    let sum = plus_di + minus_di;
    if sum == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / sum
    }
}
