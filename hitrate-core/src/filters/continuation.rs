//! Continuation filter — the bar after the flip must keep moving its way.
//!
//! This is the one filter allowed to read bar `i + 1`: the confirmation bar
//! is part of the signal rule itself, not of any indicator computation.

use std::collections::HashMap;

use crate::domain::Direction;

use super::{FilterContext, FilterEvaluation, FilterVerdict, SignalFilter};

/// Requires `close[i+1] > close[i]` for an up flip and `close[i+1] < close[i]`
/// for a down flip. A missing confirmation bar drops the signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuationFilter;

impl SignalFilter for ContinuationFilter {
    fn name(&self) -> &str {
        "continuation"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let i = ctx.bar_index;
        let Some(next) = ctx.bars.get(i + 1) else {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByContinuation,
                HashMap::new(),
            );
        };
        let cur = &ctx.bars[i];
        if cur.close.is_nan() || next.close.is_nan() {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByContinuation,
                HashMap::new(),
            );
        }

        let continued = match ctx.direction {
            Direction::Up => next.close > cur.close,
            Direction::Down => next.close < cur.close,
        };

        let mut state = HashMap::new();
        state.insert("close".into(), cur.close);
        state.insert("next_close".into(), next.close);

        if continued {
            FilterEvaluation::passed(self.name(), state)
        } else {
            FilterEvaluation::rejected(self.name(), FilterVerdict::FilteredByContinuation, state)
        }
    }
}
