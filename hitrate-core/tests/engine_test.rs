//! End-to-end engine scenarios: flip → confirmation → trade → report.

use chrono::{TimeZone, Utc};
use hitrate_core::{
    AlignedSeries, Bar, Engine, EngineConfig, FilterConfig, Outcome, SeriesSet, SignalDirection,
};

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            index: i,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
                + chrono::Duration::minutes(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000.0,
        })
        .collect()
}

fn series_set(closes: &[f64], level: f64) -> SeriesSet {
    let n = closes.len();
    let mut set = SeriesSet::new();
    set.insert("close", AlignedSeries::align(closes.to_vec(), n).unwrap())
        .unwrap();
    set.insert("level", AlignedSeries::align(vec![level; n], n).unwrap())
        .unwrap();
    set
}

fn config(expiry_bars: usize, min_bars: usize, extra: Vec<FilterConfig>) -> EngineConfig {
    let mut cfg = EngineConfig::basic("close", "level", expiry_bars);
    cfg.min_bars = min_bars;
    cfg.filters.extend(extra);
    cfg
}

/// Reference strictly below 50.0 for bars 0–149, strictly above from 150.
fn single_crossing_closes() -> Vec<f64> {
    (0..300)
        .map(|i| {
            if i < 150 {
                40.0 + i as f64 * 0.01
            } else {
                60.0 + i as f64 * 0.01
            }
        })
        .collect()
}

#[test]
fn single_crossing_yields_one_trade() {
    let closes = single_crossing_closes();
    let bars = make_bars(&closes);
    let set = series_set(&closes, 50.0);

    let mut engine = Engine::new(config(1, 200, vec![]), set).unwrap();
    let report = engine.run(&bars).unwrap();

    // Exactly one Up signal at bar 150, entry 151, resolution at 152.
    assert_eq!(report.total_trades, 1);
    let fired = engine.fired_signals();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].bar_index, 150);
    assert_eq!(fired[0].direction, SignalDirection::Up);
    assert!(fired[0].fires);

    let trade = &engine.trades()[0];
    assert_eq!(trade.signal_bar, 150);
    assert_eq!(trade.entry_bar, 151);
    assert_eq!(trade.expiry_bar, 152);
    assert_eq!(trade.entry_price, Some(closes[151]));
    assert_eq!(trade.exit_price, Some(closes[152]));

    // Closes keep rising, so close[152] > close[151]: a win.
    assert_eq!(trade.outcome, Outcome::Win);
    assert_eq!(report.correct_trades, 1);
    assert_eq!(report.accuracy_pct, 100.0);
}

#[test]
fn persistence_blocks_short_held_flip() {
    // Above the level except bars 147–149, then back above at 150:
    // the up flip at 150 held the lower side for only 3 bars.
    let closes: Vec<f64> = (0..300)
        .map(|i| {
            if (147..150).contains(&i) {
                48.0 - (i - 147) as f64
            } else {
                60.0 + i as f64 * 0.01
            }
        })
        .collect();
    let bars = make_bars(&closes);

    let strict = config(1, 200, vec![FilterConfig::Persistence { min_bars: 5 }]);
    let mut engine = Engine::new(strict, series_set(&closes, 50.0)).unwrap();
    let report = engine.run(&bars).unwrap();
    // The down flip at 147 fires (long prior upper side); the up flip at
    // 150 must not (persistence not satisfied).
    assert!(engine
        .fired_signals()
        .iter()
        .all(|s| s.bar_index != 150));

    // The same configuration with K=1 accepts the bar-150 flip.
    let loose = config(1, 200, vec![FilterConfig::Persistence { min_bars: 1 }]);
    let mut engine_loose = Engine::new(loose, series_set(&closes, 50.0)).unwrap();
    let report_loose = engine_loose.run(&bars).unwrap();
    assert!(engine_loose
        .fired_signals()
        .iter()
        .any(|s| s.bar_index == 150));
    assert!(report_loose.total_trades >= report.total_trades);
}

#[test]
fn k1_persistence_fires_wherever_the_basic_flip_does() {
    // Bar 2 sits exactly on the level; the up-flip precondition admits
    // equality, so K=1 must not reject the flip at bar 3.
    let closes = vec![40.0, 41.0, 50.0, 55.0, 56.0, 57.0];
    let bars = make_bars(&closes);

    let basic = config(1, 4, vec![]);
    let mut engine_basic = Engine::new(basic, series_set(&closes, 50.0)).unwrap();
    engine_basic.run(&bars).unwrap();
    let basic_bars: Vec<usize> = engine_basic
        .fired_signals()
        .iter()
        .map(|s| s.bar_index)
        .collect();
    assert_eq!(basic_bars, vec![3]);

    let k1 = config(1, 4, vec![FilterConfig::Persistence { min_bars: 1 }]);
    let mut engine_k1 = Engine::new(k1, series_set(&closes, 50.0)).unwrap();
    engine_k1.run(&bars).unwrap();
    let k1_bars: Vec<usize> = engine_k1
        .fired_signals()
        .iter()
        .map(|s| s.bar_index)
        .collect();
    assert_eq!(k1_bars, basic_bars);
}

#[test]
fn brief_crossing_with_k5_never_fires_down() {
    // Reference pops above the level at 150–151 only, then reverts.
    // The down flip at 152 held the upper side for just 2 bars: with
    // K=5 persistence it must not fire.
    let closes: Vec<f64> = (0..300)
        .map(|i| match i {
            150 | 151 => 60.0,
            _ => 40.0 - i as f64 * 0.01,
        })
        .collect();
    let bars = make_bars(&closes);

    let cfg = config(1, 200, vec![FilterConfig::Persistence { min_bars: 5 }]);
    let mut engine = Engine::new(cfg, series_set(&closes, 50.0)).unwrap();
    engine.run(&bars).unwrap();
    assert!(engine
        .fired_signals()
        .iter()
        .all(|s| s.direction != SignalDirection::Down));
}

#[test]
fn overlapping_trades_coexist() {
    // Up flip at 10 (confirmed at 11), down flip at 12 (confirmed at 13).
    let closes: Vec<f64> = (0..30)
        .map(|i| match i {
            0..=9 => 40.0 + i as f64 * 0.1,
            10 => 60.0,
            11 => 61.0,
            12 => 45.0,
            _ => 44.0 - (i as f64 - 13.0) * 0.1,
        })
        .collect();
    let bars = make_bars(&closes);
    let set = series_set(&closes, 50.0);

    let mut engine = Engine::new(config(3, 5, vec![]), set).unwrap();
    let mut max_open = 0;
    for bar in &bars {
        engine.step(bar.clone()).unwrap();
        max_open = max_open.max(engine.open_trades());
    }

    let report = engine.report();
    assert_eq!(report.total_trades, 2, "both signals must create trades");
    assert_eq!(max_open, 2, "trades must be simultaneously open");
    assert!(engine.trades().iter().all(|t| t.is_resolved()));

    // Entries at 11 and 13, expiries three bars later.
    assert_eq!(engine.trades()[0].entry_bar, 11);
    assert_eq!(engine.trades()[0].expiry_bar, 14);
    assert_eq!(engine.trades()[1].entry_bar, 13);
    assert_eq!(engine.trades()[1].expiry_bar, 16);
}

#[test]
fn unconfirmed_flip_is_dropped() {
    // Flip up at 150 but the next close falls back: continuation fails.
    let closes: Vec<f64> = (0..300)
        .map(|i| match i {
            0..=149 => 40.0,
            150 => 60.0,
            _ => 55.0,
        })
        .collect();
    let bars = make_bars(&closes);
    let mut engine = Engine::new(config(1, 200, vec![]), series_set(&closes, 50.0)).unwrap();
    let report = engine.run(&bars).unwrap();
    assert!(engine.fired_signals().iter().all(|s| s.bar_index != 150));
    assert_eq!(report.total_trades, 0);
}

#[test]
fn strength_filter_gates_and_scores() {
    let closes = single_crossing_closes();
    let bars = make_bars(&closes);
    let n = closes.len();

    // Trend-strength index with a 20-bar warm-up, fixed at 35 (margin 10).
    let mut set = series_set(&closes, 50.0);
    set.insert("adx", AlignedSeries::align(vec![35.0; n - 20], n).unwrap())
        .unwrap();

    let cfg = config(
        1,
        200,
        vec![FilterConfig::Strength {
            series: "adx".into(),
            threshold: 25.0,
        }],
    );
    let mut engine = Engine::new(cfg, set).unwrap();
    engine.run(&bars).unwrap();
    let fired = engine.fired_signals();
    assert_eq!(fired.len(), 1);
    // base 70 + 2.0 * margin 10 = 90.
    assert_eq!(fired[0].confidence, 90.0);

    // Raising the threshold above the index value silences the signal.
    let mut set2 = series_set(&closes, 50.0);
    set2.insert("adx", AlignedSeries::align(vec![35.0; n - 20], n).unwrap())
        .unwrap();
    let cfg2 = config(
        1,
        200,
        vec![FilterConfig::Strength {
            series: "adx".into(),
            threshold: 40.0,
        }],
    );
    let mut engine2 = Engine::new(cfg2, set2).unwrap();
    let report2 = engine2.run(&bars).unwrap();
    assert_eq!(report2.total_trades, 0);
}

#[test]
fn expiry_past_end_of_data_stays_pending() {
    // Flip near the end: the trade's expiry bar never arrives.
    let closes: Vec<f64> = (0..260)
        .map(|i| if i < 258 { 40.0 } else { 60.0 + i as f64 * 0.01 })
        .collect();
    let bars = make_bars(&closes);
    let mut engine = Engine::new(config(10, 200, vec![]), series_set(&closes, 50.0)).unwrap();
    let report = engine.run(&bars).unwrap();
    assert_eq!(report.total_trades, 1);
    assert_eq!(report.correct_trades, 0);
    assert_eq!(engine.trades()[0].outcome, Outcome::Pending);
}
