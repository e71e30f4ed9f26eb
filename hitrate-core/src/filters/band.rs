//! Band filter — volatility-band breakout gating, with both policies.
//!
//! Two deliberately distinct policies exist. `WithBreakout` is the
//! trend-following rule every other strategy uses. `Contrarian` is the
//! mean-reversion variant inherited from one strategy family: it accepts
//! the direction that bets AGAINST the breakout. The two are kept as
//! explicitly labeled policies rather than unified; whether `Contrarian`
//! is intentional is awaiting product-owner confirmation (see DESIGN.md).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Direction;

use super::{FilterContext, FilterEvaluation, FilterVerdict, SignalFilter};

/// Which side of a band breakout the accepted direction bets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPolicy {
    /// Up requires close above the upper band; Down requires close below
    /// the lower band.
    WithBreakout,
    /// Inverted: Up requires close below the lower band; Down requires
    /// close above the upper band.
    Contrarian,
}

/// Gates a flip by the close's position relative to a pair of volatility
/// bands (e.g. Bollinger upper/lower). Undefined band values fail.
#[derive(Debug, Clone)]
pub struct BandFilter {
    pub upper: String,
    pub lower: String,
    pub policy: BandPolicy,
}

impl BandFilter {
    pub fn new(upper: impl Into<String>, lower: impl Into<String>, policy: BandPolicy) -> Self {
        Self {
            upper: upper.into(),
            lower: lower.into(),
            policy,
        }
    }
}

impl SignalFilter for BandFilter {
    fn name(&self) -> &str {
        match self.policy {
            BandPolicy::WithBreakout => "band_breakout",
            BandPolicy::Contrarian => "band_contrarian",
        }
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> FilterEvaluation {
        let close = ctx.bars[ctx.bar_index].close;
        let (Some(upper), Some(lower)) = (
            ctx.series.value_at(&self.upper, ctx.bar_index),
            ctx.series.value_at(&self.lower, ctx.bar_index),
        ) else {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByBandPolicy,
                HashMap::new(),
            );
        };
        if close.is_nan() {
            return FilterEvaluation::rejected(
                self.name(),
                FilterVerdict::FilteredByBandPolicy,
                HashMap::new(),
            );
        }

        let accepted = match (self.policy, ctx.direction) {
            (BandPolicy::WithBreakout, Direction::Up) => close > upper,
            (BandPolicy::WithBreakout, Direction::Down) => close < lower,
            (BandPolicy::Contrarian, Direction::Up) => close < lower,
            (BandPolicy::Contrarian, Direction::Down) => close > upper,
        };

        let mut state = HashMap::new();
        state.insert("close".into(), close);
        state.insert("upper".into(), upper);
        state.insert("lower".into(), lower);

        if accepted {
            FilterEvaluation::passed(self.name(), state)
        } else {
            FilterEvaluation::rejected(self.name(), FilterVerdict::FilteredByBandPolicy, state)
        }
    }
}
