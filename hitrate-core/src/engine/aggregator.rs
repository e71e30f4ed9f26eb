//! The aggregator — drives flip detection, filters, scoring, and the trade
//! book over a bar stream.
//!
//! One `Engine` owns all run state (bar history, trade ledger, filter
//! chain), so parallel backtests over different configurations are just
//! independent instances. Batch `run` is a fold over the streaming `step`,
//! which keeps batch and live behavior identical bar-for-bar.
//!
//! Per arriving bar `j`, `step`:
//! 1. evaluates the signal for bar `i = j - 1` (the confirmation/entry bar
//!    `i + 1 = j` has just arrived, so nothing ever reads past it),
//! 2. schedules a trade if the signal fires,
//! 3. advances the trade book (entry fills and expiry resolutions due at `j`).

use thiserror::Error;

use crate::align::SeriesSet;
use crate::confidence::ConfidenceScorer;
use crate::domain::{BacktestReport, Bar, Signal, SignalDirection, Trade};
use crate::filters::{FilterContext, SignalFilter};
use crate::flip;
use crate::sim::TradeBook;

use super::config::{ConfigError, EngineConfig};

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("insufficient data: need at least {required} bars, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("bar arrived out of order: expected index {expected}, got {got}")]
    OutOfOrderBar { expected: usize, got: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Bar-by-bar signal and trade aggregator.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    filters: Vec<Box<dyn SignalFilter>>,
    scorer: ConfidenceScorer,
    series: SeriesSet,
    book: TradeBook,
    bars: Vec<Bar>,
    fired: Vec<Signal>,
}

impl Engine {
    /// Validate the config against the series set and build the filter chain.
    pub fn new(config: EngineConfig, series: SeriesSet) -> Result<Self, EngineError> {
        config.validate()?;
        Self::check_series(&config, &series)?;
        let filters = config.build_filters()?;
        let scorer = config.scorer;
        Ok(Self {
            config,
            filters,
            scorer,
            series,
            book: TradeBook::new(),
            bars: Vec::new(),
            fired: Vec::new(),
        })
    }

    fn check_series(config: &EngineConfig, series: &SeriesSet) -> Result<(), EngineError> {
        for name in config.series_names() {
            if !series.contains(name) {
                return Err(ConfigError::UnknownSeries(name.to_string()).into());
            }
        }
        Ok(())
    }

    /// Replace the aligned series set (live mode recomputes indicators on
    /// every poll as the bar count grows). Trade and bar state persist.
    pub fn update_series(&mut self, series: SeriesSet) -> Result<(), EngineError> {
        Self::check_series(&self.config, &series)?;
        self.series = series;
        Ok(())
    }

    /// Minimum bar count `run` accepts: the configured floor, but never
    /// fewer than warm-up plus the flip and confirmation bars.
    pub fn required_bars(&self) -> usize {
        self.config.min_bars.max(self.series.max_warmup() + 2)
    }

    /// Batch pass: fail fast on short input, then fold `step` over the bars.
    pub fn run(&mut self, bars: &[Bar]) -> Result<BacktestReport, EngineError> {
        let required = self.required_bars();
        if bars.len() < required {
            return Err(EngineError::InsufficientData {
                required,
                got: bars.len(),
            });
        }
        for bar in bars {
            self.step(bar.clone())?;
        }
        Ok(self.book.report())
    }

    /// Streaming entry point: feed one newly-arrived bar, get the signal
    /// verdict for the previous bar.
    pub fn step(&mut self, bar: Bar) -> Result<Signal, EngineError> {
        let j = self.bars.len();
        if bar.index != j {
            return Err(EngineError::OutOfOrderBar {
                expected: j,
                got: bar.index,
            });
        }
        let close = bar.close;
        self.bars.push(bar);

        let signal = if j == 0 {
            Signal::none(0, "warming up")
        } else {
            self.evaluate_at(j - 1)
        };

        // Only `Signal::fire` sets `fires`, and it always carries a
        // direction, so a neutral firing signal cannot occur; the `if let`
        // keeps the engine panic-free regardless.
        if signal.fires {
            if let Some(direction) = signal.direction.trade_direction() {
                self.book.schedule(
                    direction,
                    signal.bar_index,
                    self.config.entry_offset,
                    self.config.expiry_bars,
                );
                self.fired.push(signal.clone());
            }
        }

        // Entry fills and expiry resolutions due at this bar, including the
        // entry of a trade just scheduled with entry_offset == 1.
        self.book.on_bar(j, close);

        Ok(signal)
    }

    fn evaluate_at(&self, i: usize) -> Signal {
        if i < 1 || i < self.series.max_warmup() {
            return Signal::none(i, "warming up");
        }
        let (Some(reference), Some(comparator)) = (
            self.series.get(&self.config.reference),
            self.series.get(&self.config.comparator),
        ) else {
            return Signal::none(i, "series unavailable");
        };

        let Some(event) = flip::detect(reference, comparator, i) else {
            return Signal::none(i, "no flip");
        };

        let ctx = FilterContext {
            bars: &self.bars,
            bar_index: i,
            direction: event.direction,
            series: &self.series,
            reference: &self.config.reference,
            comparator: &self.config.comparator,
        };

        let mut evaluations = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            let eval = filter.evaluate(&ctx);
            let passed = eval.verdict.is_passed();
            evaluations.push(eval);
            if !passed {
                let last = evaluations.last().map(|e| e.filter_name.as_str()).unwrap_or("");
                return Signal::none(
                    i,
                    format!("{} flip rejected by {} filter", event.direction, last),
                );
            }
        }

        let confidence = self.scorer.score_evaluations(&evaluations);
        let reason = format!(
            "{} flip of {} across {}",
            event.direction, self.config.reference, self.config.comparator
        );
        Signal::fire(i, event.direction, confidence, reason)
    }

    /// Report derived from the ledger.
    pub fn report(&self) -> BacktestReport {
        self.book.report()
    }

    pub fn trades(&self) -> &[Trade] {
        self.book.trades()
    }

    pub fn open_trades(&self) -> usize {
        self.book.open_count()
    }

    /// Every signal that fired, in emission order.
    pub fn fired_signals(&self) -> &[Signal] {
        &self.fired
    }

    pub fn bars_seen(&self) -> usize {
        self.bars.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
