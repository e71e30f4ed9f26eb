//! Confidence scoring — maps filter margins to a bounded 0–100 score.

use serde::{Deserialize, Serialize};

use crate::filters::FilterEvaluation;

/// Base score plus a bounded linear bonus proportional to the strength
/// filter's margin, clipped to [0, 100]. Monotonic in the margin and a
/// function of nothing beyond the evaluated bar's filter state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScorer {
    pub base: f64,
    pub per_unit: f64,
    pub max_bonus: f64,
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self {
            base: 70.0,
            per_unit: 2.0,
            max_bonus: 25.0,
        }
    }
}

impl ConfidenceScorer {
    pub fn new(base: f64, per_unit: f64, max_bonus: f64) -> Self {
        Self {
            base,
            per_unit,
            max_bonus,
        }
    }

    /// Score a margin: `clamp(base + per_unit * max(margin, 0), 0, 100)`
    /// with the bonus itself capped at `max_bonus`.
    pub fn score(&self, margin: f64) -> f64 {
        let bonus = (self.per_unit * margin.max(0.0)).min(self.max_bonus);
        (self.base + bonus).clamp(0.0, 100.0)
    }

    /// Score from a passed filter chain: reads the strength filter's
    /// recorded margin, 0 when no strength filter is configured.
    pub fn score_evaluations(&self, evaluations: &[FilterEvaluation]) -> f64 {
        let margin = evaluations
            .iter()
            .find(|e| e.filter_name == "strength")
            .and_then(|e| e.state.get("margin").copied())
            .unwrap_or(0.0);
        self.score(margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn base_score_at_zero_margin() {
        let scorer = ConfidenceScorer::default();
        assert_eq!(scorer.score(0.0), 70.0);
    }

    #[test]
    fn bonus_scales_with_margin() {
        let scorer = ConfidenceScorer::default();
        assert_eq!(scorer.score(5.0), 80.0);
    }

    #[test]
    fn bonus_is_capped() {
        let scorer = ConfidenceScorer::default();
        assert_eq!(scorer.score(1000.0), 95.0); // 70 + capped 25
    }

    #[test]
    fn negative_margin_gets_no_bonus() {
        let scorer = ConfidenceScorer::default();
        assert_eq!(scorer.score(-10.0), 70.0);
    }

    #[test]
    fn never_exceeds_hundred() {
        let scorer = ConfidenceScorer::new(90.0, 5.0, 50.0);
        assert_eq!(scorer.score(100.0), 100.0);
    }

    #[test]
    fn monotonic_in_margin() {
        let scorer = ConfidenceScorer::default();
        let mut prev = scorer.score(-5.0);
        for m in -4..30 {
            let s = scorer.score(m as f64);
            assert!(s >= prev, "score must not decrease as margin grows");
            prev = s;
        }
    }

    #[test]
    fn reads_strength_margin_from_evaluations() {
        let scorer = ConfidenceScorer::default();
        let mut state = HashMap::new();
        state.insert("margin".to_string(), 5.0);
        let evals = vec![
            FilterEvaluation::passed("continuation", HashMap::new()),
            FilterEvaluation::passed("strength", state),
        ];
        assert_eq!(scorer.score_evaluations(&evals), 80.0);
    }

    #[test]
    fn no_strength_filter_means_base_score() {
        let scorer = ConfidenceScorer::default();
        let evals = vec![FilterEvaluation::passed("continuation", HashMap::new())];
        assert_eq!(scorer.score_evaluations(&evals), 70.0);
    }
}
