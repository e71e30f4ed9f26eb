//! HitRate Core — signal-detection and trade-simulation engine.
//!
//! The crate is the deduplicated heart of a family of signal-accuracy
//! scripts:
//! - Domain types (bars, signals, trades, reports)
//! - Series alignment (indicator output → absolute bar indices)
//! - Flip detection with deterministic up-first tie-break
//! - Composable confirmation/persistence/strength/range/stack filters
//! - Fixed-horizon trade simulation with overlapping open trades
//! - Confidence scoring and the bar-by-bar aggregator
//!
//! The core is synchronous, deterministic, and free of I/O, clocks, and
//! randomness. Bars and indicator series come from collaborator crates;
//! identical inputs always produce identical reports.

pub mod align;
pub mod confidence;
pub mod domain;
pub mod engine;
pub mod filters;
pub mod flip;
pub mod sim;

pub use align::{AlignError, AlignedSeries, SeriesSet};
pub use confidence::ConfidenceScorer;
pub use domain::{BacktestReport, Bar, Direction, Outcome, Signal, SignalDirection, Trade};
pub use engine::{ConfigError, Engine, EngineConfig, EngineError, FilterConfig};
pub use filters::{BandPolicy, FilterEvaluation, FilterVerdict, SignalFilter};
pub use flip::FlipEvent;
pub use sim::TradeBook;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine types are Send + Sync, so parallel
    /// backtests over different configurations need no synchronization.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<Signal>();
        require_sync::<Signal>();
        require_send::<Trade>();
        require_sync::<Trade>();
        require_send::<BacktestReport>();
        require_sync::<BacktestReport>();
        require_send::<AlignedSeries>();
        require_sync::<AlignedSeries>();
        require_send::<SeriesSet>();
        require_sync::<SeriesSet>();
        require_send::<TradeBook>();
        require_sync::<TradeBook>();
        require_send::<EngineConfig>();
        require_sync::<EngineConfig>();
        require_send::<Engine>();
        require_sync::<Engine>();
    }

    /// Architecture contract: filters never see trade or ledger state.
    ///
    /// The `FilterContext` carries bars, the flip direction, and aligned
    /// series only. If a trade-book reference is ever added, this trait
    /// bound check breaks loudly.
    #[test]
    fn filter_trait_has_no_trade_state() {
        fn _check_trait_object_builds(
            filter: &dyn SignalFilter,
            ctx: &filters::FilterContext<'_>,
        ) -> FilterEvaluation {
            filter.evaluate(ctx)
        }
    }
}
