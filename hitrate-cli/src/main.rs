//! HitRate CLI — backtest, sweep, and live commands.
//!
//! Commands:
//! - `backtest` — run one preset (or a TOML config) over CSV or synthetic bars
//! - `sweep` — grid-search preset knobs in parallel, print a leaderboard
//! - `live` — replay a CSV through the streaming driver, logging signals

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hitrate_runner::{
    load_csv, run_backtest, run_sweep, DataConfig, LiveDriver, ParamGrid, ReplayFeed, RunConfig,
    RunSummary, SignalLog, StrategyParams, StrategyPreset,
};

#[derive(Parser)]
#[command(name = "hitrate", about = "HitRate CLI — flip-signal hit-rate engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single backtest.
    Backtest {
        /// Path to a TOML run config. Mutually exclusive with --preset.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset: stop-flip, ema-cross, band-breakout, band-reversion, rsi-reversal.
        #[arg(long)]
        preset: Option<StrategyPreset>,

        /// Symbol label for logs and the signal log.
        #[arg(long, default_value = "SYN")]
        symbol: String,

        /// CSV bar file (timestamp,open,high,low,close[,volume]).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Use this many synthetic bars instead of --data.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Keep only the most recent N bars from --data.
        #[arg(long)]
        limit: Option<usize>,

        /// Holding period in bars.
        #[arg(long, default_value_t = 5)]
        expiry: usize,

        /// Append fired signals to this JSONL file.
        #[arg(long)]
        signal_log: Option<PathBuf>,

        /// Print the full summary as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Grid-search preset knobs in parallel.
    Sweep {
        /// Symbol label.
        #[arg(long, default_value = "SYN")]
        symbol: String,

        /// CSV bar file; omitted means synthetic bars.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Synthetic bar count when --data is omitted.
        #[arg(long, default_value_t = 2000)]
        synthetic: usize,

        /// Rows of the leaderboard to print.
        #[arg(long, default_value_t = 15)]
        top: usize,
    },
    /// Replay bars through the streaming driver as a paper session.
    Live {
        /// Named preset.
        #[arg(long, default_value = "stop-flip")]
        preset: StrategyPreset,

        /// Symbol label.
        #[arg(long, default_value = "SYN")]
        symbol: String,

        /// CSV bar file to replay.
        #[arg(long)]
        data: PathBuf,

        /// Poll interval in milliseconds (0 stops when the feed dries up).
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,

        /// Append fired signals to this JSONL file.
        #[arg(long, default_value = "signals.jsonl")]
        signal_log: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Backtest {
            config,
            preset,
            symbol,
            data,
            synthetic,
            limit,
            expiry,
            signal_log,
            json,
        } => cmd_backtest(
            config, preset, symbol, data, synthetic, limit, expiry, signal_log, json,
        ),
        Commands::Sweep {
            symbol,
            data,
            synthetic,
            top,
        } => cmd_sweep(symbol, data, synthetic, top),
        Commands::Live {
            preset,
            symbol,
            data,
            interval_ms,
            signal_log,
        } => cmd_live(preset, symbol, data, interval_ms, signal_log),
    }
}

fn data_config(
    data: Option<PathBuf>,
    synthetic: Option<usize>,
    limit: Option<usize>,
) -> Result<DataConfig> {
    match (data, synthetic) {
        (Some(_), Some(_)) => bail!("--data and --synthetic are mutually exclusive"),
        (Some(path), None) => Ok(DataConfig::Csv { path, limit }),
        (None, Some(bars)) => Ok(DataConfig::Synthetic { bars }),
        (None, None) => bail!("one of --data or --synthetic is required"),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_backtest(
    config_path: Option<PathBuf>,
    preset: Option<StrategyPreset>,
    symbol: String,
    data: Option<PathBuf>,
    synthetic: Option<usize>,
    limit: Option<usize>,
    expiry: usize,
    signal_log: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if config_path.is_some() && preset.is_some() {
        bail!("--config and --preset are mutually exclusive");
    }

    let run_config = if let Some(path) = config_path {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
    } else {
        let Some(preset) = preset else {
            bail!("one of --config or --preset is required");
        };
        RunConfig {
            symbol,
            data: data_config(data, synthetic, limit)?,
            preset,
            params: StrategyParams {
                expiry_bars: expiry,
                ..StrategyParams::default()
            },
        }
    };

    let log = signal_log.map(SignalLog::new);
    let summary = run_backtest(&run_config, log.as_ref())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn cmd_sweep(symbol: String, data: Option<PathBuf>, synthetic: usize, top: usize) -> Result<()> {
    let data = match data {
        Some(path) => DataConfig::Csv { path, limit: None },
        None => DataConfig::Synthetic { bars: synthetic },
    };
    let base = RunConfig {
        symbol,
        data,
        preset: StrategyPreset::StopFlip,
        params: StrategyParams::default(),
    };

    let results = run_sweep(&ParamGrid::default(), &base);
    println!(
        "{:<16} {:>6} {:>5} {:>6} {:>6} {:>7} {:>9}",
        "preset", "expiry", "K", "adx>=", "range", "trades", "accuracy"
    );
    for result in results.iter().take(top) {
        let p = &result.config.params;
        match &result.outcome {
            Ok(summary) => println!(
                "{:<16} {:>6} {:>5} {:>6.1} {:>6.2} {:>7} {:>8.2}%",
                result.config.preset.name(),
                p.expiry_bars,
                p.persistence,
                p.strength_threshold,
                p.range_multiplier,
                summary.report.total_trades,
                summary.report.accuracy_pct,
            ),
            Err(err) => println!("{:<16} failed: {err}", result.config.preset.name()),
        }
    }
    Ok(())
}

fn cmd_live(
    preset: StrategyPreset,
    symbol: String,
    data: PathBuf,
    interval_ms: u64,
    signal_log: PathBuf,
) -> Result<()> {
    let bars = load_csv(&data, None)?;
    let config = RunConfig {
        symbol,
        data: DataConfig::Csv {
            path: data,
            limit: None,
        },
        preset,
        params: StrategyParams::default(),
    };

    // Replay sessions end when the feed dries up (interval 0) or when
    // the process is killed; the flag exists for embedding callers.
    let stop = AtomicBool::new(false);
    let mut driver = LiveDriver::new(config, Some(SignalLog::new(signal_log)))?;
    let mut feed = ReplayFeed::new(bars);
    driver.run(&mut feed, Duration::from_millis(interval_ms), &stop)?;
    print_summary(&driver.summary());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("run      {}", summary.run_id);
    println!(
        "strategy {} on {}{}",
        summary.preset.name(),
        summary.symbol,
        if summary.synthetic { " (synthetic)" } else { "" }
    );
    println!("bars     {}", summary.bars);
    println!("signals  {}", summary.fired_signals.len());
    println!(
        "trades   {} ({} resolved)",
        summary.report.total_trades,
        summary.trades.iter().filter(|t| t.is_resolved()).count()
    );
    println!(
        "hit rate {:.2}% ({}/{})",
        summary.report.accuracy_pct, summary.report.correct_trades, summary.report.total_trades
    );
}
