//! Range filter — the flip bar must be wider than its recent average.

use std::collections::HashMap;

use super::{FilterContext, FilterEvaluation, FilterVerdict, SignalFilter};

pub const DEFAULT_LOOKBACK: usize = 14;

/// Requires the current bar's range (high − low) to exceed
/// `multiplier ×` the mean range over the lookback window ending at the
/// flip bar. Disabled (always passes) when `multiplier <= 0`.
#[derive(Debug, Clone, Copy)]
pub struct RangeFilter {
    pub multiplier: f64,
    pub lookback: usize,
}

impl RangeFilter {
    pub fn new(multiplier: f64, lookback: usize) -> Self {
        assert!(lookback >= 1, "lookback must be >= 1");
        Self {
            multiplier,
            lookback,
        }
    }

    pub fn default_params(multiplier: f64) -> Self {
        Self::new(multiplier, DEFAULT_LOOKBACK)
    }

    fn is_disabled(&self) -> bool {
        self.multiplier <= 0.0
    }
}

impl SignalFilter for RangeFilter {
    fn name(&self) -> &str {
        "range"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation {
        if self.is_disabled() {
            return FilterEvaluation::passed(self.name(), HashMap::new());
        }

        let i = ctx.bar_index;
        // The window [i - lookback + 1, i] must be fully available.
        if i + 1 < self.lookback {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByRange,
                HashMap::new(),
            );
        }

        let window = &ctx.bars[i + 1 - self.lookback..=i];
        let mut sum = 0.0;
        for bar in window {
            let r = bar.range();
            if r.is_nan() {
                return FilterEvaluation::rejected(
                    self.name(),
                    FilterVerdict::FilteredByRange,
                    HashMap::new(),
                );
            }
            sum += r;
        }
        let mean = sum / self.lookback as f64;
        let current = ctx.bars[i].range();

        let mut state = HashMap::new();
        state.insert("current_range".into(), current);
        state.insert("mean_range".into(), mean);
        state.insert("multiplier".into(), self.multiplier);

        if current > self.multiplier * mean {
            FilterEvaluation::passed(self.name(), state)
        } else {
            FilterEvaluation::rejected(self.name(), FilterVerdict::FilteredByRange, state)
        }
    }
}
