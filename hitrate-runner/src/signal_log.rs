//! Signal log — JSONL append-only persistence for fired signals.
//!
//! One JSON object per line, so partial writes damage at most one record
//! and the file can be tailed while a live session is running. Records
//! are written twice per trade lifecycle: once when the signal fires
//! (outcome pending) and once when the trade resolves.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hitrate_core::{Direction, Outcome};

/// A single logged signal, flat for easy downstream ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    /// Timestamp of the signal bar.
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub direction: Direction,
    pub confidence: f64,
    /// Human-readable trigger description.
    pub reason: String,
    /// Fill price, absent until the entry bar arrives.
    pub entry_price: Option<f64>,
    pub outcome: Outcome,
    /// Timestamp the trade is due to resolve, once known.
    pub check_at: Option<DateTime<Utc>>,
    /// Timestamp the outcome was recorded.
    pub resolution_time: Option<DateTime<Utc>>,
    pub exit_price: Option<f64>,
    /// Run this record belongs to.
    pub run_id: String,
}

/// JSONL signal log manager.
pub struct SignalLog {
    path: PathBuf,
}

impl SignalLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating parent directories on first write.
    pub fn append(&self, record: &SignalRecord) -> io::Result<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{json}")?;
        file.flush()
    }

    /// Read every record, skipping blank and malformed lines.
    pub fn read_all(&self) -> io::Result<Vec<SignalRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SignalRecord>(&line) {
                Ok(record) => records.push(record),
                Err(_) => continue, // skip malformed lines
            }
        }
        Ok(records)
    }

    /// Records belonging to one run, in file order.
    pub fn read_run(&self, run_id: &str) -> io::Result<Vec<SignalRecord>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.run_id == run_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(run_id: &str, outcome: Outcome) -> SignalRecord {
        SignalRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap(),
            symbol: "EURUSD".into(),
            direction: Direction::Up,
            confidence: 82.0,
            reason: "close crossed above dstop_10".into(),
            entry_price: Some(1.0915),
            outcome,
            check_at: None,
            resolution_time: None,
            exit_price: None,
            run_id: run_id.into(),
        }
    }

    #[test]
    fn append_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let log = SignalLog::new(dir.path().join("signals.jsonl"));
        log.append(&sample("run-a", Outcome::Pending)).unwrap();
        log.append(&sample("run-a", Outcome::Win)).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].outcome, Outcome::Pending);
        assert_eq!(records[1].outcome, Outcome::Win);
    }

    #[test]
    fn read_run_filters_by_run_id() {
        let dir = tempfile::tempdir().unwrap();
        let log = SignalLog::new(dir.path().join("signals.jsonl"));
        log.append(&sample("run-a", Outcome::Win)).unwrap();
        log.append(&sample("run-b", Outcome::Loss)).unwrap();

        let only_b = log.read_run("run-b").unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].outcome, Outcome::Loss);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.jsonl");
        let log = SignalLog::new(path.clone());
        log.append(&sample("run-a", Outcome::Win)).unwrap();
        {
            let mut f = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(f, "{{not json").unwrap();
            writeln!(f).unwrap();
        }
        log.append(&sample("run-a", Outcome::Loss)).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = SignalLog::new(dir.path().join("absent.jsonl"));
        assert!(log.read_all().unwrap().is_empty());
    }
}
