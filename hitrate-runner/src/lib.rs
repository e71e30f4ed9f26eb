//! HitRate Runner — orchestration around the `hitrate-core` engine.
//!
//! This crate builds on `hitrate-core` to provide:
//! - Indicator collaborators (EMA, RSI, ADX, directional stop, bands)
//! - CSV bar loading and a deterministic synthetic generator
//! - Strategy presets that bundle indicators with an engine config
//! - Single-backtest runner with blake3 run identities
//! - Rayon parameter sweeps over the preset knobs
//! - A live driver that streams feed bars through the same engine
//! - JSONL signal log for fired signals and their resolutions

pub mod data;
pub mod indicators;
pub mod live;
pub mod runner;
pub mod signal_log;
pub mod strategy;
pub mod sweep;

pub use data::{generate_synthetic_bars, load_csv, LoadError};
pub use indicators::{Indicator, PriceArrays};
pub use live::{BarFeed, FeedError, LiveDriver, LiveError, ReplayFeed};
pub use runner::{run_backtest, signal_records, DataConfig, RunConfig, RunError, RunId, RunSummary};
pub use signal_log::{SignalLog, SignalRecord};
pub use strategy::{build_series, StrategyParams, StrategyPreset};
pub use sweep::{run_sweep, ParamGrid, SweepResult};
