//! Bollinger bands split into three single-series indicators so each
//! band can be registered under its own name and referenced
//! independently by filters.

use super::{Indicator, PriceArrays};

/// Rolling mean and population standard deviation over `period` closes.
/// Returns one `(mean, stdev)` pair per fully-formed window.
fn rolling_stats(closes: &[f64], period: usize) -> Vec<(f64, f64)> {
    let p = period as f64;
    closes
        .windows(period)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / p;
            let var = w.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / p;
            (mean, var.sqrt())
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct BollingerMiddle {
    period: usize,
    name: String,
}

impl BollingerMiddle {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "period must be >= 2");
        Self {
            period,
            name: format!("bb_mid_{period}"),
        }
    }
}

impl Indicator for BollingerMiddle {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        if prices.len() <= self.warmup() {
            return Vec::new();
        }
        rolling_stats(&prices.close, self.period)
            .into_iter()
            .map(|(mean, _)| mean)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BollingerUpper {
    period: usize,
    k: f64,
    name: String,
}

impl BollingerUpper {
    pub fn new(period: usize, k: f64) -> Self {
        assert!(period >= 2, "period must be >= 2");
        assert!(k > 0.0, "k must be > 0");
        Self {
            period,
            k,
            name: format!("bb_upper_{period}"),
        }
    }
}

impl Indicator for BollingerUpper {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        if prices.len() <= self.warmup() {
            return Vec::new();
        }
        rolling_stats(&prices.close, self.period)
            .into_iter()
            .map(|(mean, sd)| mean + self.k * sd)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BollingerLower {
    period: usize,
    k: f64,
    name: String,
}

impl BollingerLower {
    pub fn new(period: usize, k: f64) -> Self {
        assert!(period >= 2, "period must be >= 2");
        assert!(k > 0.0, "k must be > 0");
        Self {
            period,
            k,
            name: format!("bb_lower_{period}"),
        }
    }
}

impl Indicator for BollingerLower {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        if prices.len() <= self.warmup() {
            return Vec::new();
        }
        rolling_stats(&prices.close, self.period)
            .into_iter()
            .map(|(mean, sd)| mean - self.k * sd)
            .collect()
    }
}
