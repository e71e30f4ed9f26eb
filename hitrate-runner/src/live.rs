//! Live driver: poll a bar feed, recompute series, step the engine.
//!
//! The detection path is byte-for-byte the batch path. The driver only
//! supplies fresh series before each step, so a live session and a
//! backtest over the same bars produce the same signals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use hitrate_core::{Bar, Engine, EngineError, Outcome, Signal};

use crate::runner::{signal_records, RunConfig, RunError, RunSummary};
use crate::signal_log::SignalLog;
use crate::strategy::build_series;

/// Errors a bar feed can surface.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed unavailable: {0}")]
    Unavailable(String),

    #[error("feed produced an insane bar at index {index}")]
    InsaneBar { index: usize },
}

/// Source of live bars. `poll_latest` returns `Ok(None)` when no new
/// bar has closed yet.
pub trait BarFeed: Send {
    fn poll_latest(&mut self) -> Result<Option<Bar>, FeedError>;
}

/// Feed that replays a fixed bar vector, one bar per poll. Used for
/// paper sessions and tests.
#[derive(Debug, Clone)]
pub struct ReplayFeed {
    bars: Vec<Bar>,
    cursor: usize,
}

impl ReplayFeed {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bars.len() - self.cursor
    }
}

impl BarFeed for ReplayFeed {
    fn poll_latest(&mut self) -> Result<Option<Bar>, FeedError> {
        match self.bars.get(self.cursor) {
            Some(bar) => {
                self.cursor += 1;
                Ok(Some(bar.clone()))
            }
            None => Ok(None),
        }
    }
}

/// Errors from a live session.
#[derive(Debug, Error)]
pub enum LiveError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("failed to write signal log: {0}")]
    Log(#[from] std::io::Error),
}

/// Streams bars from a feed into the engine, logging fired signals and
/// trade resolutions as they happen.
pub struct LiveDriver {
    config: RunConfig,
    engine: Engine,
    bars: Vec<Bar>,
    log: Option<SignalLog>,
    /// Outcome last logged for each record, by firing order.
    logged: Vec<Outcome>,
}

impl LiveDriver {
    pub fn new(config: RunConfig, log: Option<SignalLog>) -> Result<Self, LiveError> {
        let indicators = config.preset.indicators();
        // Seed with empty series; real values arrive with the first bar.
        let series = build_series(&[], &indicators).map_err(RunError::from)?;
        let engine_config = config.preset.engine_config(&config.params);
        let engine = Engine::new(engine_config, series)?;
        Ok(Self {
            config,
            engine,
            bars: Vec::new(),
            log,
            logged: Vec::new(),
        })
    }

    pub fn bars_seen(&self) -> usize {
        self.bars.len()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Ingest one closed bar: recompute series, step the engine, write
    /// any newly-available log records.
    pub fn on_bar(&mut self, bar: Bar) -> Result<Signal, LiveError> {
        if !bar.is_sane() {
            warn!(index = bar.index, "dropping insane bar from feed");
            return Err(FeedError::InsaneBar { index: bar.index }.into());
        }
        self.bars.push(bar.clone());

        let indicators = self.config.preset.indicators();
        let series = build_series(&self.bars, &indicators).map_err(RunError::from)?;
        self.engine.update_series(series)?;

        let signal = self.engine.step(bar)?;
        if signal.fires {
            info!(
                bar = signal.bar_index,
                direction = ?signal.direction,
                confidence = signal.confidence,
                "signal fired"
            );
        } else {
            debug!(bar = signal.bar_index, reason = %signal.reason, "no signal");
        }
        self.flush_log()?;
        Ok(signal)
    }

    /// Poll the feed until it runs dry or `stop` is raised.
    pub fn run(
        &mut self,
        feed: &mut dyn BarFeed,
        interval: Duration,
        stop: &AtomicBool,
    ) -> Result<(), LiveError> {
        while !stop.load(Ordering::Relaxed) {
            match feed.poll_latest()? {
                Some(bar) => {
                    self.on_bar(bar)?;
                }
                None => {
                    if interval.is_zero() {
                        break;
                    }
                    std::thread::sleep(interval);
                }
            }
        }
        Ok(())
    }

    /// Write each record once when its signal fires and once more when
    /// its trade resolves.
    fn flush_log(&mut self) -> Result<(), LiveError> {
        let Some(log) = &self.log else {
            return Ok(());
        };
        let summary = self.summary();
        let records = signal_records(&summary, &self.bars);
        for (k, record) in records.iter().enumerate() {
            match self.logged.get(k).copied() {
                None => {
                    log.append(record)?;
                    self.logged.push(record.outcome);
                }
                Some(Outcome::Pending) if record.outcome != Outcome::Pending => {
                    log.append(record)?;
                    self.logged[k] = record.outcome;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Snapshot of the session in backtest-summary form.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.config.run_id(),
            symbol: self.config.symbol.clone(),
            preset: self.config.preset,
            bars: self.bars.len(),
            report: self.engine.report(),
            trades: self.engine.trades().to_vec(),
            fired_signals: self.engine.fired_signals().to_vec(),
            synthetic: matches!(self.config.data, crate::runner::DataConfig::Synthetic { .. }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_synthetic_bars;
    use crate::runner::{run_backtest, DataConfig};
    use crate::strategy::{StrategyParams, StrategyPreset};

    fn config() -> RunConfig {
        RunConfig {
            symbol: "EURUSD".into(),
            data: DataConfig::Synthetic { bars: 500 },
            preset: StrategyPreset::StopFlip,
            params: StrategyParams::default(),
        }
    }

    #[test]
    fn replay_feed_yields_bars_in_order_then_dries_up() {
        let bars = generate_synthetic_bars("EURUSD", 3);
        let mut feed = ReplayFeed::new(bars.clone());
        assert_eq!(feed.poll_latest().unwrap().unwrap().index, 0);
        assert_eq!(feed.poll_latest().unwrap().unwrap().index, 1);
        assert_eq!(feed.remaining(), 1);
        assert_eq!(feed.poll_latest().unwrap().unwrap().index, 2);
        assert!(feed.poll_latest().unwrap().is_none());
    }

    #[test]
    fn live_session_matches_batch_backtest() {
        let cfg = config();
        let batch = run_backtest(&cfg, None).unwrap();

        let mut driver = LiveDriver::new(cfg, None).unwrap();
        let mut feed = ReplayFeed::new(generate_synthetic_bars("EURUSD", 500));
        let stop = AtomicBool::new(false);
        driver.run(&mut feed, Duration::ZERO, &stop).unwrap();

        let live = driver.summary();
        assert_eq!(live.fired_signals.len(), batch.fired_signals.len());
        assert_eq!(live.report, batch.report);
        for (a, b) in live.fired_signals.iter().zip(&batch.fired_signals) {
            assert_eq!(a.bar_index, b.bar_index);
            assert_eq!(a.direction, b.direction);
        }
    }

    #[test]
    fn stop_flag_halts_the_session() {
        let mut driver = LiveDriver::new(config(), None).unwrap();
        let mut feed = ReplayFeed::new(generate_synthetic_bars("EURUSD", 100));
        let stop = AtomicBool::new(true);
        driver.run(&mut feed, Duration::ZERO, &stop).unwrap();
        assert_eq!(driver.bars_seen(), 0);
    }

    #[test]
    fn insane_bar_is_rejected() {
        let mut driver = LiveDriver::new(config(), None).unwrap();
        let mut bar = generate_synthetic_bars("EURUSD", 1).remove(0);
        bar.high = bar.low - 1.0;
        assert!(matches!(
            driver.on_bar(bar),
            Err(LiveError::Feed(FeedError::InsaneBar { .. }))
        ));
    }

    #[test]
    fn log_receives_fired_signals_once_each() {
        let dir = tempfile::tempdir().unwrap();
        let log = SignalLog::new(dir.path().join("live.jsonl"));
        let cfg = config();
        let mut driver = LiveDriver::new(cfg.clone(), Some(log)).unwrap();
        let mut feed = ReplayFeed::new(generate_synthetic_bars("EURUSD", 500));
        let stop = AtomicBool::new(false);
        driver.run(&mut feed, Duration::ZERO, &stop).unwrap();

        let log = SignalLog::new(dir.path().join("live.jsonl"));
        let records = log.read_run(&cfg.run_id()).unwrap();
        let summary = driver.summary();
        let resolved = summary.trades.iter().filter(|t| t.is_resolved()).count();
        // One pending record per fired signal, one more per resolution.
        assert_eq!(records.len(), summary.fired_signals.len() + resolved);
    }
}
