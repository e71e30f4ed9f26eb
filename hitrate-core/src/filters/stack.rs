//! Stack filter — strict ordering among independently-aligned series.

use std::collections::HashMap;

use crate::domain::Direction;

use super::{FilterContext, FilterEvaluation, FilterVerdict, SignalFilter};

/// Requires a strict ordering among two or more series at the flip bar:
/// fastest first. For an up flip every series must be strictly greater
/// than the next (fast > mid > slow); for a down flip strictly less.
/// Any undefined member fails the filter.
#[derive(Debug, Clone)]
pub struct StackFilter {
    pub series: Vec<String>,
}

impl StackFilter {
    pub fn new(series: Vec<String>) -> Self {
        assert!(series.len() >= 2, "stack needs at least 2 series");
        Self { series }
    }
}

impl SignalFilter for StackFilter {
    fn name(&self) -> &str {
        "stack"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let mut values = Vec::with_capacity(self.series.len());
        for name in &self.series {
            match ctx.series.value_at(name, ctx.bar_index) {
                Some(v) => values.push(v),
                None => {
                    return FilterEvaluation::rejected(
                        self.name(),
                        FilterVerdict::FilteredByStack,
                        HashMap::new(),
                    )
                }
            }
        }

        let ordered = values.windows(2).all(|pair| match ctx.direction {
            Direction::Up => pair[0] > pair[1],
            Direction::Down => pair[0] < pair[1],
        });

        let mut state = HashMap::new();
        for (name, value) in self.series.iter().zip(&values) {
            state.insert(name.clone(), *value);
        }

        if ordered {
            FilterEvaluation::passed(self.name(), state)
        } else {
            FilterEvaluation::rejected(self.name(), FilterVerdict::FilteredByStack, state)
        }
    }
}
