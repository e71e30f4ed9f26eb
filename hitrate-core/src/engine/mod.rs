//! Backtest aggregation — configuration and the bar-by-bar engine.

pub mod aggregator;
pub mod config;

pub use aggregator::{Engine, EngineError};
pub use config::{ConfigError, EngineConfig, FilterConfig};
