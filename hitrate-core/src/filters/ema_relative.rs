//! Trend-direction filter — close relative to one long-period series.

use std::collections::HashMap;

use crate::domain::Direction;

use super::{FilterContext, FilterEvaluation, FilterVerdict, SignalFilter};

/// Requires the close at the flip bar to sit above (up flip) or below
/// (down flip) a single long-period series value, typically a 200-period
/// EMA. Undefined values fail the filter.
#[derive(Debug, Clone)]
pub struct EmaRelativeFilter {
    pub series: String,
}

impl EmaRelativeFilter {
    pub fn new(series: impl Into<String>) -> Self {
        Self {
            series: series.into(),
        }
    }
}

impl SignalFilter for EmaRelativeFilter {
    fn name(&self) -> &str {
        "ema_relative"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let close = ctx.bars[ctx.bar_index].close;
        let Some(level) = ctx.series.value_at(&self.series, ctx.bar_index) else {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByTrend,
                HashMap::new(),
            );
        };
        if close.is_nan() {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByTrend,
                HashMap::new(),
            );
        }

        let aligned = match ctx.direction {
            Direction::Up => close > level,
            Direction::Down => close < level,
        };

        let mut state = HashMap::new();
        state.insert("close".into(), close);
        state.insert("level".into(), level);

        if aligned {
            FilterEvaluation::passed(self.name(), state)
        } else {
            FilterEvaluation::rejected(self.name(), FilterVerdict::FilteredByTrend, state)
        }
    }
}
