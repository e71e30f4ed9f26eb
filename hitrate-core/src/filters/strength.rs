//! Strength filter — gates flips by a trend-strength index threshold.

use std::collections::HashMap;

use super::{FilterContext, FilterEvaluation, FilterVerdict, SignalFilter};

/// Passes when the named series (typically an ADX-style trend-strength
/// index) is at or above the threshold at the flip bar. Undefined values
/// fail the filter.
///
/// Records the margin (`value - threshold`) in its state; the confidence
/// scorer turns that margin into the bounded bonus.
#[derive(Debug, Clone)]
pub struct StrengthFilter {
    pub series: String,
    pub threshold: f64,
}

impl StrengthFilter {
    pub fn new(series: impl Into<String>, threshold: f64) -> Self {
        assert!(threshold >= 0.0, "threshold must be >= 0");
        Self {
            series: series.into(),
            threshold,
        }
    }
}

impl SignalFilter for StrengthFilter {
    fn name(&self) -> &str {
        "strength"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation {
        match ctx.series.value_at(&self.series, ctx.bar_index) {
            Some(value) => {
                let mut state = HashMap::new();
                state.insert("value".into(), value);
                state.insert("threshold".into(), self.threshold);
                state.insert("margin".into(), value - self.threshold);
                if value >= self.threshold {
                    FilterEvaluation::passed(self.name(), state)
                } else {
                    FilterEvaluation::rejected(self.name(), FilterVerdict::FilteredByStrength, state)
                }
            }
            None => FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByStrength,
                HashMap::new(),
            ),
        }
    }
}
