//! Strategy presets: named bundles of indicators plus an engine config.
//!
//! A preset is pure wiring. It decides which indicator collaborators to
//! compute, which two series the flip detector watches, and which
//! filters sit behind the flip. All detection semantics live in the
//! core crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hitrate_core::{
    AlignError, AlignedSeries, BandPolicy, Bar, EngineConfig, FilterConfig, SeriesSet,
};

use crate::indicators::{
    BollingerLower, BollingerMiddle, BollingerUpper, DirectionalStop, Ema, Indicator, PriceArrays,
    Rsi, TrendStrength,
};

/// Tunable knobs shared across presets. Sweeps vary these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Holding period in bars.
    pub expiry_bars: usize,
    /// Bars between the signal bar and the entry bar.
    pub entry_offset: usize,
    /// Minimum bar count a backtest accepts.
    pub min_bars: usize,
    /// Persistence requirement (K) where the preset uses one.
    pub persistence: usize,
    /// Trend-strength threshold where the preset uses one.
    pub strength_threshold: f64,
    /// Range filter multiplier; `0.0` disables the range filter.
    pub range_multiplier: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            expiry_bars: 5,
            entry_offset: 1,
            min_bars: 200,
            persistence: 5,
            strength_threshold: 25.0,
            range_multiplier: 0.0,
        }
    }
}

/// The shipped strategy presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPreset {
    /// Close flips across an ATR stop-and-reverse line, gated by trend
    /// strength.
    StopFlip,
    /// Fast EMA flips across slow EMA with a three-EMA stack gate.
    EmaCross,
    /// Band breakout: close escapes a volatility band in the flip
    /// direction.
    BandBreakout,
    /// Mean reversion: close re-enters from outside the band, trading
    /// against the breakout. Kept deliberately as the contrarian twin
    /// of `BandBreakout`.
    BandReversion,
    /// RSI flips across its midline after holding the far side.
    RsiReversal,
}

impl StrategyPreset {
    pub const ALL: [StrategyPreset; 5] = [
        StrategyPreset::StopFlip,
        StrategyPreset::EmaCross,
        StrategyPreset::BandBreakout,
        StrategyPreset::BandReversion,
        StrategyPreset::RsiReversal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyPreset::StopFlip => "stop-flip",
            StrategyPreset::EmaCross => "ema-cross",
            StrategyPreset::BandBreakout => "band-breakout",
            StrategyPreset::BandReversion => "band-reversion",
            StrategyPreset::RsiReversal => "rsi-reversal",
        }
    }

    /// Indicators this preset computes, in registration order.
    pub fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        match self {
            StrategyPreset::StopFlip => vec![
                Box::new(DirectionalStop::new(10, 3.0)),
                Box::new(TrendStrength::new(14)),
            ],
            StrategyPreset::EmaCross => vec![
                Box::new(Ema::new(9)),
                Box::new(Ema::new(21)),
                Box::new(Ema::new(55)),
            ],
            StrategyPreset::BandBreakout | StrategyPreset::BandReversion => vec![
                Box::new(BollingerMiddle::new(20)),
                Box::new(BollingerUpper::new(20, 2.0)),
                Box::new(BollingerLower::new(20, 2.0)),
            ],
            StrategyPreset::RsiReversal => {
                vec![Box::new(Rsi::new(14)), Box::new(Midline::new("rsi_mid", 50.0))]
            }
        }
    }

    /// Engine config for this preset with the given knobs.
    pub fn engine_config(&self, params: &StrategyParams) -> EngineConfig {
        let mut filters = vec![FilterConfig::Continuation];
        let (reference, comparator) = match self {
            StrategyPreset::StopFlip => {
                filters.push(FilterConfig::Strength {
                    series: "adx_14".into(),
                    threshold: params.strength_threshold,
                });
                ("close", "dstop_10")
            }
            StrategyPreset::EmaCross => {
                filters.push(FilterConfig::Stack {
                    series: vec!["ema_9".into(), "ema_21".into(), "ema_55".into()],
                });
                ("ema_9", "ema_21")
            }
            StrategyPreset::BandBreakout => {
                filters.push(FilterConfig::Band {
                    upper: "bb_upper_20".into(),
                    lower: "bb_lower_20".into(),
                    policy: BandPolicy::WithBreakout,
                });
                ("close", "bb_mid_20")
            }
            StrategyPreset::BandReversion => {
                filters.push(FilterConfig::Band {
                    upper: "bb_upper_20".into(),
                    lower: "bb_lower_20".into(),
                    policy: BandPolicy::Contrarian,
                });
                ("close", "bb_mid_20")
            }
            StrategyPreset::RsiReversal => {
                filters.push(FilterConfig::Persistence {
                    min_bars: params.persistence,
                });
                ("rsi_14", "rsi_mid")
            }
        };
        if params.range_multiplier > 0.0 {
            filters.push(FilterConfig::Range {
                multiplier: params.range_multiplier,
                lookback: 14,
            });
        }

        EngineConfig {
            reference: reference.into(),
            comparator: comparator.into(),
            entry_offset: params.entry_offset,
            expiry_bars: params.expiry_bars,
            min_bars: params.min_bars,
            filters,
            scorer: Default::default(),
        }
    }
}

impl fmt::Display for StrategyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
#[error("unknown strategy preset '{0}' (expected one of: stop-flip, ema-cross, band-breakout, band-reversion, rsi-reversal)")]
pub struct UnknownPreset(String);

impl FromStr for StrategyPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Constant horizontal level, registered like any other series so
/// oscillator presets can flip across a fixed midline.
#[derive(Debug, Clone)]
pub struct Midline {
    name: String,
    level: f64,
}

impl Midline {
    pub fn new(name: impl Into<String>, level: f64) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

impl Indicator for Midline {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        0
    }

    fn compute(&self, prices: &PriceArrays) -> Vec<f64> {
        vec![self.level; prices.len()]
    }
}

/// Compute every indicator and align the results against the bar
/// timeline. The raw close is always registered under `"close"`.
pub fn build_series(
    bars: &[Bar],
    indicators: &[Box<dyn Indicator>],
) -> Result<SeriesSet, AlignError> {
    let prices = PriceArrays::from_bars(bars);
    let mut set = SeriesSet::new();
    set.insert("close", AlignedSeries::align(prices.close.clone(), bars.len())?)?;
    for indicator in indicators {
        let values = indicator.compute(&prices);
        set.insert(indicator.name(), AlignedSeries::align(values, bars.len())?)?;
    }
    Ok(set)
}
