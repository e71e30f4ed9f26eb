//! Bar loading for the runner.
//!
//! Bars come from a CSV file (`timestamp,open,high,low,close[,volume]`)
//! or from the deterministic synthetic generator. Synthetic data is a
//! developer-only debug mode; runs on it are tagged in the run summary.

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use hitrate_core::Bar;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv parse error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unparseable timestamp '{value}' at row {row}")]
    BadTimestamp { value: String, row: usize },

    #[error("non-finite or non-positive price at row {row}")]
    BadPrice { row: usize },

    #[error("timestamps not strictly increasing at row {row}")]
    OutOfOrder { row: usize },

    #[error("'{path}' contains no bars")]
    Empty { path: String },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Load bars from a CSV file.
///
/// Rows must carry strictly increasing timestamps. An optional `limit`
/// keeps the most recent `limit` bars; indices are reassigned after the
/// truncation, so the engine always sees a dense `0..n` index range.
pub fn load_csv(path: &Path, limit: Option<usize>) -> Result<Vec<Bar>, LoadError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut bars = Vec::new();
    let mut prev_ts: Option<DateTime<Utc>> = None;
    for (row, record) in reader.deserialize::<CsvRow>().enumerate() {
        let rec = record.map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;
        let timestamp =
            parse_timestamp(&rec.timestamp).ok_or_else(|| LoadError::BadTimestamp {
                value: rec.timestamp.clone(),
                row,
            })?;
        if let Some(prev) = prev_ts {
            if timestamp <= prev {
                return Err(LoadError::OutOfOrder { row });
            }
        }
        prev_ts = Some(timestamp);

        let bar = Bar {
            index: bars.len(),
            timestamp,
            open: rec.open,
            high: rec.high,
            low: rec.low,
            close: rec.close,
            volume: rec.volume.unwrap_or(0.0),
        };
        if !bar.is_sane() {
            return Err(LoadError::BadPrice { row });
        }
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(LoadError::Empty { path: display });
    }
    if let Some(limit) = limit {
        if bars.len() > limit {
            bars.drain(..bars.len() - limit);
            for (i, bar) in bars.iter_mut().enumerate() {
                bar.index = i;
            }
        }
    }
    Ok(bars)
}

/// Generate deterministic synthetic bars for a symbol.
///
/// The seed derives from the symbol name, so repeated runs on the same
/// symbol see identical data and different symbols see different walks.
pub fn generate_synthetic_bars(symbol: &str, count: usize) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    warn!(symbol, count, "generating synthetic bars");

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let start = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).single();
    let start = match start {
        Some(s) => s,
        None => Utc::now(),
    };

    let mut bars = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    for i in 0..count {
        let bar_return: f64 = rng.gen_range(-0.02..0.02);
        let open = price;
        let close = price * (1.0 + bar_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.005));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.005));
        let volume = rng.gen_range(5_000.0..50_000.0);

        bars.push(Bar {
            index: i,
            timestamp: start + Duration::minutes(i as i64),
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }
    bars
}
