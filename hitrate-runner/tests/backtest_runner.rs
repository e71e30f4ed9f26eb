//! End-to-end runner tests: CSV in, summary and signal log out.

use std::io::Write;

use hitrate_runner::{
    generate_synthetic_bars, run_backtest, run_sweep, DataConfig, ParamGrid, RunConfig, SignalLog,
    StrategyParams, StrategyPreset,
};

fn write_bars_csv(dir: &tempfile::TempDir, symbol: &str, count: usize) -> std::path::PathBuf {
    let bars = generate_synthetic_bars(symbol, count);
    let path = dir.path().join(format!("{symbol}.csv"));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    for bar in &bars {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            bar.timestamp.to_rfc3339(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        )
        .unwrap();
    }
    path
}

fn config(data: DataConfig) -> RunConfig {
    RunConfig {
        symbol: "EURUSD".into(),
        data,
        preset: StrategyPreset::StopFlip,
        params: StrategyParams::default(),
    }
}

#[test]
fn csv_and_synthetic_runs_agree_on_identical_bars() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bars_csv(&dir, "EURUSD", 800);

    let from_csv = run_backtest(&config(DataConfig::Csv { path, limit: None }), None).unwrap();
    let from_syn = run_backtest(&config(DataConfig::Synthetic { bars: 800 }), None).unwrap();

    assert!(!from_csv.synthetic);
    assert!(from_syn.synthetic);
    assert_eq!(from_csv.report, from_syn.report);
    assert_eq!(from_csv.fired_signals.len(), from_syn.fired_signals.len());
    for (a, b) in from_csv.fired_signals.iter().zip(&from_syn.fired_signals) {
        assert_eq!(a.bar_index, b.bar_index);
        assert_eq!(a.direction, b.direction);
    }
}

#[test]
fn csv_limit_keeps_the_most_recent_bars() {
    let dir = tempfile::tempdir().unwrap();
    let bars = generate_synthetic_bars("EURUSD", 800);
    let full_path = write_bars_csv(&dir, "EURUSD", 800);

    // A file holding only the last 400 bars, reindexed from zero.
    let tail_path = dir.path().join("tail.csv");
    let mut file = std::fs::File::create(&tail_path).unwrap();
    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    for bar in &bars[400..] {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            bar.timestamp.to_rfc3339(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        )
        .unwrap();
    }

    let capped = run_backtest(
        &config(DataConfig::Csv {
            path: full_path,
            limit: Some(400),
        }),
        None,
    )
    .unwrap();
    let tail = run_backtest(
        &config(DataConfig::Csv {
            path: tail_path,
            limit: None,
        }),
        None,
    )
    .unwrap();

    // Capping at 400 is the same run as a file containing only the
    // newest 400 bars.
    assert_eq!(capped.bars, 400);
    assert_eq!(capped.report, tail.report);
    assert_eq!(capped.fired_signals.len(), tail.fired_signals.len());
    for (a, b) in capped.fired_signals.iter().zip(&tail.fired_signals) {
        assert_eq!(a.bar_index, b.bar_index);
        assert_eq!(a.direction, b.direction);
    }
}

#[test]
fn short_csv_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bars_csv(&dir, "EURUSD", 50);
    let err = run_backtest(&config(DataConfig::Csv { path, limit: None }), None).unwrap_err();
    assert!(err.to_string().contains("insufficient"));
}

#[test]
fn signal_log_is_written_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(DataConfig::Synthetic { bars: 800 });
    let log = SignalLog::new(dir.path().join("signals.jsonl"));
    let summary = run_backtest(&cfg, Some(&log)).unwrap();

    let records = log.read_run(&summary.run_id).unwrap();
    assert_eq!(records.len(), summary.fired_signals.len());
    for record in records {
        assert_eq!(record.run_id, summary.run_id);
        assert_eq!(record.symbol, "EURUSD");
    }
}

#[test]
fn sweep_leaderboard_covers_the_grid() {
    let grid = ParamGrid {
        presets: vec![StrategyPreset::StopFlip, StrategyPreset::RsiReversal],
        expiry_bars: vec![3, 10],
        persistence: vec![3],
        strength_thresholds: vec![25.0],
        range_multipliers: vec![0.0],
    };
    let results = run_sweep(&grid, &config(DataConfig::Synthetic { bars: 600 }));
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.outcome.is_ok()));
}
