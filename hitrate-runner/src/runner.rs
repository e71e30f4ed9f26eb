//! Backtest orchestration: load bars, wire a preset, run the engine,
//! persist the signal log.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use hitrate_core::{AlignError, BacktestReport, Bar, EngineError, Signal, Trade};

use crate::data::{self, LoadError};
use crate::signal_log::{SignalLog, SignalRecord};
use crate::strategy::{build_series, StrategyParams, StrategyPreset};

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from the orchestration layer.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error("failed to write signal log: {0}")]
    Log(#[from] std::io::Error),
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataConfig {
    /// CSV file with `timestamp,open,high,low,close[,volume]` rows.
    Csv {
        path: PathBuf,
        #[serde(default)]
        limit: Option<usize>,
    },

    /// Deterministic synthetic walk, seeded from the symbol name.
    /// Developer-only; summaries carry a `synthetic` tag.
    Synthetic { bars: usize },
}

/// Serializable configuration for a single backtest run.
///
/// Captures everything needed to reproduce the run, so its hash can
/// serve as the run identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub symbol: String,
    pub data: DataConfig,
    pub preset: StrategyPreset,
    #[serde(default)]
    pub params: StrategyParams,
}

impl RunConfig {
    /// Deterministic hash ID: identical configs collide on purpose.
    pub fn run_id(&self) -> RunId {
        // PartialEq + derived Serialize make this infallible in practice;
        // a serialization failure here is a programming error.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// Outcome of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub symbol: String,
    pub preset: StrategyPreset,
    pub bars: usize,
    pub report: BacktestReport,
    pub trades: Vec<Trade>,
    pub fired_signals: Vec<Signal>,
    /// True when the run used generated data.
    pub synthetic: bool,
}

fn load_bars(config: &RunConfig) -> Result<(Vec<Bar>, bool), RunError> {
    match &config.data {
        DataConfig::Csv { path, limit } => Ok((data::load_csv(path, *limit)?, false)),
        DataConfig::Synthetic { bars } => {
            Ok((data::generate_synthetic_bars(&config.symbol, *bars), true))
        }
    }
}

/// Run a full backtest and optionally persist every fired signal.
pub fn run_backtest(config: &RunConfig, log: Option<&SignalLog>) -> Result<RunSummary, RunError> {
    let run_id = config.run_id();
    let (bars, synthetic) = load_bars(config)?;
    info!(
        run_id = %run_id,
        symbol = %config.symbol,
        preset = %config.preset,
        bars = bars.len(),
        synthetic,
        "starting backtest"
    );

    let indicators = config.preset.indicators();
    let series = build_series(&bars, &indicators)?;
    let engine_config = config.preset.engine_config(&config.params);
    let mut engine = hitrate_core::Engine::new(engine_config, series)?;
    let report = engine.run(&bars)?;

    debug!(
        fired = engine.fired_signals().len(),
        total = report.total_trades,
        accuracy = report.accuracy_pct,
        "backtest complete"
    );

    let summary = RunSummary {
        run_id: run_id.clone(),
        symbol: config.symbol.clone(),
        preset: config.preset,
        bars: bars.len(),
        report,
        trades: engine.trades().to_vec(),
        fired_signals: engine.fired_signals().to_vec(),
        synthetic,
    };

    if let Some(log) = log {
        for record in signal_records(&summary, &bars) {
            log.append(&record)?;
        }
    }
    Ok(summary)
}

/// Flatten signals and their trades into log records.
///
/// The engine books exactly one trade per fired signal, in firing
/// order, so a positional zip pairs them correctly.
pub fn signal_records(summary: &RunSummary, bars: &[Bar]) -> Vec<SignalRecord> {
    summary
        .fired_signals
        .iter()
        .zip(&summary.trades)
        .filter_map(|(signal, trade)| {
            let timestamp = bars.get(signal.bar_index)?.timestamp;
            let resolution_time = if trade.is_resolved() {
                bars.get(trade.expiry_bar).map(|b| b.timestamp)
            } else {
                None
            };
            Some(SignalRecord {
                timestamp,
                symbol: summary.symbol.clone(),
                direction: trade.direction,
                confidence: signal.confidence,
                reason: signal.reason.clone(),
                entry_price: trade.entry_price,
                outcome: trade.outcome,
                check_at: bars.get(trade.expiry_bar).map(|b| b.timestamp),
                resolution_time,
                exit_price: trade.exit_price,
                run_id: summary.run_id.clone(),
            })
        })
        .collect()
}
