//! Domain types — bars, directions, signals, trades, reports.

pub mod bar;
pub mod report;
pub mod signal;
pub mod trade;

pub use bar::Bar;
pub use report::BacktestReport;
pub use signal::{Direction, Signal, SignalDirection};
pub use trade::{Outcome, Trade};
