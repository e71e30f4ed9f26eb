//! Series alignment — maps indicator output onto absolute bar indices.
//!
//! Indicator collaborators return series shorter than the bar sequence by
//! their warm-up length, unpadded. `AlignedSeries` centralizes the offset
//! arithmetic that the per-strategy scripts used to repeat by hand-padding
//! with undefined values: `value_at(i)` is `series[i - warmup]` once the
//! warm-up has completed and undefined before it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    #[error("series of length {series_len} is longer than the bar sequence ({bar_count} bars)")]
    SeriesLongerThanBars { series_len: usize, bar_count: usize },

    #[error("series '{name}' aligned to {series_bars} bars, set expects {set_bars}")]
    BarCountMismatch {
        name: String,
        series_bars: usize,
        set_bars: usize,
    },
}

/// One indicator output aligned to the bar timeline.
///
/// Pure lookup; constructed once per series. The warm-up is derived, not
/// supplied: `bar_count - values.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    values: Vec<f64>,
    bar_count: usize,
}

impl AlignedSeries {
    /// Align `values` (length M) to a bar sequence of length N ≥ M.
    pub fn align(values: Vec<f64>, bar_count: usize) -> Result<Self, AlignError> {
        if values.len() > bar_count {
            return Err(AlignError::SeriesLongerThanBars {
                series_len: values.len(),
                bar_count,
            });
        }
        Ok(Self { values, bar_count })
    }

    /// Number of leading bars with no defined value.
    pub fn warmup(&self) -> usize {
        self.bar_count - self.values.len()
    }

    /// Number of bars this series is aligned to.
    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Value at absolute bar index `i`, or `None` before the warm-up
    /// completes, past the end, or where the collaborator emitted NaN.
    pub fn value_at(&self, bar_index: usize) -> Option<f64> {
        if bar_index >= self.bar_count || bar_index < self.warmup() {
            return None;
        }
        let v = self.values[bar_index - self.warmup()];
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }
}

/// Named collection of aligned series — the engine's entire view of
/// indicator collaborator output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    series: HashMap<String, AlignedSeries>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named series. All members must be aligned to the same bar
    /// count; a mismatch is a caller bug surfaced as an error.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        series: AlignedSeries,
    ) -> Result<(), AlignError> {
        let name = name.into();
        if let Some(existing) = self.series.values().next() {
            if existing.bar_count() != series.bar_count() {
                return Err(AlignError::BarCountMismatch {
                    name,
                    series_bars: series.bar_count(),
                    set_bars: existing.bar_count(),
                });
            }
        }
        self.series.insert(name, series);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AlignedSeries> {
        self.series.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Value of a named series at a bar index; `None` for unknown names too.
    pub fn value_at(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series.get(name).and_then(|s| s.value_at(bar_index))
    }

    /// Largest warm-up across all members; 0 for an empty set.
    pub fn max_warmup(&self) -> usize {
        self.series.values().map(|s| s.warmup()).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
