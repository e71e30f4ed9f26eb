//! Parameter sweep utilities for grid search over strategy knobs.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::runner::{run_backtest, RunConfig, RunError, RunSummary};
use crate::strategy::StrategyPreset;

/// Parameter grid specification.
///
/// The cartesian product of these vectors defines the sweep. Empty
/// dimensions are invalid; `default()` gives a modest grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub presets: Vec<StrategyPreset>,
    pub expiry_bars: Vec<usize>,
    pub persistence: Vec<usize>,
    pub strength_thresholds: Vec<f64>,
    pub range_multipliers: Vec<f64>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            presets: StrategyPreset::ALL.to_vec(),
            expiry_bars: vec![3, 5, 10],
            persistence: vec![3, 5],
            strength_thresholds: vec![20.0, 25.0],
            range_multipliers: vec![0.0, 1.5],
        }
    }
}

impl ParamGrid {
    /// Total number of configurations in the grid.
    pub fn size(&self) -> usize {
        self.presets.len()
            * self.expiry_bars.len()
            * self.persistence.len()
            * self.strength_thresholds.len()
            * self.range_multipliers.len()
    }

    /// All run configs in the grid, varying the base config's preset
    /// and params while keeping its symbol and data source.
    pub fn generate_configs(&self, base: &RunConfig) -> Vec<RunConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &preset in &self.presets {
            for &expiry in &self.expiry_bars {
                for &persistence in &self.persistence {
                    for &threshold in &self.strength_thresholds {
                        for &multiplier in &self.range_multipliers {
                            let mut config = base.clone();
                            config.preset = preset;
                            config.params.expiry_bars = expiry;
                            config.params.persistence = persistence;
                            config.params.strength_threshold = threshold;
                            config.params.range_multiplier = multiplier;
                            configs.push(config);
                        }
                    }
                }
            }
        }
        configs
    }
}

/// One sweep cell: the config that ran and what came out of it.
#[derive(Debug)]
pub struct SweepResult {
    pub config: RunConfig,
    pub outcome: Result<RunSummary, RunError>,
}

/// Run every config in the grid in parallel and return results sorted
/// by accuracy, best first. Failed cells sort last.
pub fn run_sweep(grid: &ParamGrid, base: &RunConfig) -> Vec<SweepResult> {
    let configs = grid.generate_configs(base);
    info!(cells = configs.len(), "starting parameter sweep");

    let mut results: Vec<SweepResult> = configs
        .into_par_iter()
        .map(|config| {
            let outcome = run_backtest(&config, None);
            SweepResult { config, outcome }
        })
        .collect();

    results.sort_by(|a, b| {
        let score = |r: &SweepResult| match &r.outcome {
            Ok(summary) => summary.report.accuracy_pct,
            Err(_) => f64::NEG_INFINITY,
        };
        score(b).total_cmp(&score(a))
    });
    results
}
