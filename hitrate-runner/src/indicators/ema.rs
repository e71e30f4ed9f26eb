//! Exponential moving average, SMA-seeded.

use super::{Indicator, PriceArrays};

/// EMA over closes. Seeded with the SMA of the first `period` bars, so the
/// first defined value sits at bar `period - 1` and the warm-up is
/// `period - 1`.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        let closes = &prices.close;
        if closes.len() < self.period {
            return Vec::new();
        }
        let alpha = 2.0 / (self.period as f64 + 1.0);
        let mut out = Vec::with_capacity(closes.len() - self.warmup());

        let seed: f64 = closes[..self.period].iter().sum::<f64>() / self.period as f64;
        let mut ema = seed;
        out.push(ema);
        for &close in &closes[self.period..] {
            ema = alpha * close + (1.0 - alpha) * ema;
            out.push(ema);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::testkit::make_bars;

    #[test]
    fn constant_series_is_flat() {
        let bars = make_bars(&[100.0; 30]);
        let prices = PriceArrays::from_bars(&bars);
        let ema = Ema::new(10).compute(&prices);
        assert_eq!(ema.len(), 21);
        assert!(ema.iter().all(|&v| (v - 100.0).abs() < 1e-12));
    }

    #[test]
    fn first_value_is_sma_seed() {
        let closes: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let bars = make_bars(&closes);
        let prices = PriceArrays::from_bars(&bars);
        let ema = Ema::new(5).compute(&prices);
        // SMA of the first 5 closes: (1+2+3+4+5)/5 = 3.
        assert!((ema[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn tracks_rising_prices_with_lag() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let prices = PriceArrays::from_bars(&bars);
        let ema = Ema::new(10).compute(&prices);
        let last = *ema.last().unwrap();
        // Below the final close but rising.
        assert!(last < 139.0);
        assert!(last > ema[0]);
    }

    #[test]
    #[should_panic(expected = "period must be >= 1")]
    fn rejects_zero_period() {
        Ema::new(0);
    }
}
