//! Engine configuration — one declarative record per strategy variant.
//!
//! The filter list replaces the near-duplicated per-strategy scripts: one
//! engine, N configurations. Filters run in the declared order and
//! short-circuit on the first rejection. All parameter validation happens
//! here, at construction time; a misconfigured filter is fatal for the
//! run, never silently clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::confidence::ConfidenceScorer;
use crate::filters::{
    BandFilter, BandPolicy, ContinuationFilter, EmaRelativeFilter, PersistenceFilter, RangeFilter,
    SignalFilter, StackFilter, StrengthFilter,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("entry offset must be >= 1, got {0}")]
    ZeroEntryOffset(usize),

    #[error("holding period must be >= 1 bar, got {0}")]
    ZeroExpiry(usize),

    #[error("persistence filter needs min_bars >= 1")]
    ZeroPersistence,

    #[error("range filter needs lookback >= 1")]
    ZeroRangeLookback,

    #[error("strength threshold must be >= 0, got {0}")]
    NegativeThreshold(f64),

    #[error("stack filter needs at least 2 series, got {0}")]
    StackTooSmall(usize),

    #[error("series '{0}' is not present in the series set")]
    UnknownSeries(String),
}

fn default_entry_offset() -> usize {
    1
}

fn default_min_bars() -> usize {
    200
}

fn default_range_lookback() -> usize {
    crate::filters::range::DEFAULT_LOOKBACK
}

/// Serializable filter declaration. Order in the config is evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Next-bar continuation in the flip direction.
    Continuation,

    /// Reference held the pre-flip side for `min_bars` consecutive bars.
    Persistence { min_bars: usize },

    /// Named series at or above a threshold at the flip bar.
    Strength { series: String, threshold: f64 },

    /// Current bar range vs mean range over a lookback window.
    Range {
        multiplier: f64,
        #[serde(default = "default_range_lookback")]
        lookback: usize,
    },

    /// Strict ordering among the named series, fastest first.
    Stack { series: Vec<String> },

    /// Close above (up) / below (down) a single long-period series.
    EmaRelative { series: String },

    /// Volatility-band position with an explicit breakout policy.
    Band {
        upper: String,
        lower: String,
        policy: BandPolicy,
    },
}

impl FilterConfig {
    /// Validate parameters and build the concrete filter.
    pub fn build(&self) -> Result<Box<dyn SignalFilter>, ConfigError> {
        match self {
            FilterConfig::Continuation => Ok(Box::new(ContinuationFilter)),
            FilterConfig::Persistence { min_bars } => {
                if *min_bars == 0 {
                    return Err(ConfigError::ZeroPersistence);
                }
                Ok(Box::new(PersistenceFilter::new(*min_bars)))
            }
            FilterConfig::Strength { series, threshold } => {
                if *threshold < 0.0 {
                    return Err(ConfigError::NegativeThreshold(*threshold));
                }
                Ok(Box::new(StrengthFilter::new(series.clone(), *threshold)))
            }
            FilterConfig::Range {
                multiplier,
                lookback,
            } => {
                if *lookback == 0 {
                    return Err(ConfigError::ZeroRangeLookback);
                }
                Ok(Box::new(RangeFilter::new(*multiplier, *lookback)))
            }
            FilterConfig::Stack { series } => {
                if series.len() < 2 {
                    return Err(ConfigError::StackTooSmall(series.len()));
                }
                Ok(Box::new(StackFilter::new(series.clone())))
            }
            FilterConfig::EmaRelative { series } => {
                Ok(Box::new(EmaRelativeFilter::new(series.clone())))
            }
            FilterConfig::Band {
                upper,
                lower,
                policy,
            } => Ok(Box::new(BandFilter::new(
                upper.clone(),
                lower.clone(),
                *policy,
            ))),
        }
    }

    /// Series names this filter reads, for presence validation.
    pub fn series_names(&self) -> Vec<&str> {
        match self {
            FilterConfig::Continuation | FilterConfig::Persistence { .. } => vec![],
            FilterConfig::Strength { series, .. } | FilterConfig::EmaRelative { series } => {
                vec![series.as_str()]
            }
            FilterConfig::Range { .. } => vec![],
            FilterConfig::Stack { series } => series.iter().map(String::as_str).collect(),
            FilterConfig::Band { upper, lower, .. } => vec![upper.as_str(), lower.as_str()],
        }
    }
}

/// Full engine configuration for one strategy variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name of the reference series (usually the close passthrough).
    pub reference: String,
    /// Name of the comparator series the reference flips across.
    pub comparator: String,
    /// Bars between the signal bar and the entry bar.
    #[serde(default = "default_entry_offset")]
    pub entry_offset: usize,
    /// Holding period: bars between entry and resolution.
    pub expiry_bars: usize,
    /// Minimum bar count the aggregator accepts.
    #[serde(default = "default_min_bars")]
    pub min_bars: usize,
    /// Filters in evaluation order.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    #[serde(default)]
    pub scorer: ConfidenceScorer,
}

impl EngineConfig {
    /// Minimal config: flip detection plus continuation, no other filters.
    pub fn basic(
        reference: impl Into<String>,
        comparator: impl Into<String>,
        expiry_bars: usize,
    ) -> Self {
        Self {
            reference: reference.into(),
            comparator: comparator.into(),
            entry_offset: 1,
            expiry_bars,
            min_bars: default_min_bars(),
            filters: vec![FilterConfig::Continuation],
            scorer: ConfidenceScorer::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_offset == 0 {
            return Err(ConfigError::ZeroEntryOffset(self.entry_offset));
        }
        if self.expiry_bars == 0 {
            return Err(ConfigError::ZeroExpiry(self.expiry_bars));
        }
        for filter in &self.filters {
            filter.build()?;
        }
        Ok(())
    }

    /// Build the concrete filter chain in declared order.
    pub fn build_filters(&self) -> Result<Vec<Box<dyn SignalFilter>>, ConfigError> {
        self.filters.iter().map(FilterConfig::build).collect()
    }

    /// Every series name the engine will read.
    pub fn series_names(&self) -> Vec<&str> {
        let mut names = vec![self.reference.as_str(), self.comparator.as_str()];
        for filter in &self.filters {
            names.extend(filter.series_names());
        }
        names
    }
}
