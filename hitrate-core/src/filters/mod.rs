//! Confirmation and persistence filters — composable predicates over a flip.
//!
//! Filters gate a detected flip before it becomes a firing signal. They
//! compose by logical AND, short-circuiting in the order declared by the
//! engine config (continuation → persistence → strength → range →
//! stack/trend). Every filter treats "value not yet available" as failure,
//! never as a pass.

pub mod band;
pub mod continuation;
pub mod ema_relative;
pub mod persistence;
pub mod range;
pub mod stack;
pub mod strength;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::align::SeriesSet;
use crate::domain::{Bar, Direction};

/// Everything a filter may look at when judging a flip at `bar_index`.
///
/// `reference` and `comparator` name the flip's own series inside `series`,
/// so side-walking filters (persistence) can reuse them.
pub struct FilterContext<'a> {
    pub bars: &'a [Bar],
    pub bar_index: usize,
    pub direction: Direction,
    pub series: &'a SeriesSet,
    pub reference: &'a str,
    pub comparator: &'a str,
}

/// Outcome of one filter evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterVerdict {
    Passed,
    FilteredByContinuation,
    FilteredByPersistence,
    FilteredByStrength,
    FilteredByRange,
    FilteredByStack,
    FilteredByTrend,
    FilteredByBandPolicy,
}

impl FilterVerdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Record of a filter evaluating a flip.
///
/// The state snapshot carries the numbers the filter looked at (threshold,
/// observed value, margin), consumed by the confidence scorer and by logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterEvaluation {
    pub filter_name: String,
    pub verdict: FilterVerdict,
    pub state: HashMap<String, f64>,
}

impl FilterEvaluation {
    pub fn passed(filter_name: impl Into<String>, state: HashMap<String, f64>) -> Self {
        Self {
            filter_name: filter_name.into(),
            verdict: FilterVerdict::Passed,
            state,
        }
    }

    pub fn rejected(
        filter_name: impl Into<String>,
        verdict: FilterVerdict,
        state: HashMap<String, f64>,
    ) -> Self {
        Self {
            filter_name: filter_name.into(),
            verdict,
            state,
        }
    }
}

/// Trait for signal filters — pure predicates over the filter context.
///
/// # Architecture invariant
/// Filters never see trade or ledger state, and never read any bar past the
/// designated confirmation bar `bar_index + 1`.
pub trait SignalFilter: std::fmt::Debug + Send + Sync {
    /// Stable name (e.g., "continuation", "strength").
    fn name(&self) -> &str;

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation;
}

// Re-export concrete filter types.
pub use band::{BandFilter, BandPolicy};
pub use continuation::ContinuationFilter;
pub use ema_relative::EmaRelativeFilter;
pub use persistence::PersistenceFilter;
pub use range::RangeFilter;
pub use stack::StackFilter;
pub use strength::StrengthFilter;
