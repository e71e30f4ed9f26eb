//! Persistence filter — the reference must have held the pre-flip side.

use std::collections::HashMap;

use crate::flip::held_pre_flip_side;

use super::{FilterContext, FilterEvaluation, FilterVerdict, SignalFilter};

/// Requires the reference series to have stayed on the pre-flip side of
/// the comparator for at least `min_bars` consecutive bars before the
/// flip. Walks backward from `i - 1`, stopping at the first bar on the
/// wrong side or with an undefined value. The side test is non-strict,
/// matching the flip preconditions, so an equality bar counts as held.
///
/// `min_bars = 1` is exactly coextensive with the flip itself: the flip's
/// own precondition already puts bar `i - 1` on the pre-flip side.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceFilter {
    pub min_bars: usize,
}

impl PersistenceFilter {
    pub fn new(min_bars: usize) -> Self {
        assert!(min_bars >= 1, "min_bars must be >= 1");
        Self { min_bars }
    }
}

impl SignalFilter for PersistenceFilter {
    fn name(&self) -> &str {
        "persistence"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let (Some(reference), Some(comparator)) = (
            ctx.series.get(ctx.reference),
            ctx.series.get(ctx.comparator),
        ) else {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByPersistence,
                HashMap::new(),
            );
        };

        let mut held = 0usize;
        let mut i = ctx.bar_index;
        while i > 0 && held < self.min_bars {
            i -= 1;
            if held_pre_flip_side(reference, comparator, i, ctx.direction) {
                held += 1;
            } else {
                break;
            }
        }

        let mut state = HashMap::new();
        state.insert("held_bars".into(), held as f64);
        state.insert("min_bars".into(), self.min_bars as f64);

        if held >= self.min_bars {
            FilterEvaluation::passed(self.name(), state)
        } else {
            FilterEvaluation::rejected(self.name(), FilterVerdict::FilteredByPersistence, state)
        }
    }
}
