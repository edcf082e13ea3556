//! Generalization layer: does quality hold on schemas held out of training?
//!
//! Results are partitioned by schema collection membership in a held-out
//! set; per-layer pass rates are compared between the partitions. A gap
//! above the fixed threshold on any layer flags a regression.

use super::report::EvalResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// A per-layer gap above this absolute value flags a regression.
pub const GAP_THRESHOLD: f64 = 0.05;

/// Per-layer pass rates for the seen and held-out partitions, with their
/// signed gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralizationResult {
    /// Syntax pass rate over schemas seen during training
    pub train_syntax_pass_rate: f64,
    /// Syntax pass rate over held-out schemas
    pub held_out_syntax_pass_rate: f64,
    /// Operator pass rate over schemas seen during training
    pub train_operator_pass_rate: f64,
    /// Operator pass rate over held-out schemas
    pub held_out_operator_pass_rate: f64,
    /// Field pass rate over schemas seen during training
    pub train_field_pass_rate: f64,
    /// Field pass rate over held-out schemas
    pub held_out_field_pass_rate: f64,
    /// Signed seen-minus-held-out gap per layer, keyed `syntax`,
    /// `operators`, `fields`
    pub gaps: BTreeMap<String, f64>,
    /// Some layer's absolute gap exceeds [`GAP_THRESHOLD`]
    pub flagged: bool,
}

fn pass_rate(results: &[&EvalResult], layer_passed: impl Fn(&EvalResult) -> bool) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().filter(|r| layer_passed(r)).count() as f64 / results.len() as f64
}

/// Computes per-layer pass-rate gaps between seen and held-out results.
///
/// An empty partition contributes a 0.0 rate for every layer.
pub fn eval_generalization(
    train_results: &[&EvalResult],
    held_out_results: &[&EvalResult],
) -> GeneralizationResult {
    let train_syntax = pass_rate(train_results, |r| r.syntax.passed);
    let held_syntax = pass_rate(held_out_results, |r| r.syntax.passed);
    let train_ops = pass_rate(train_results, |r| r.operators.passed);
    let held_ops = pass_rate(held_out_results, |r| r.operators.passed);
    let train_fields = pass_rate(train_results, |r| r.fields.passed);
    let held_fields = pass_rate(held_out_results, |r| r.fields.passed);

    let gaps = BTreeMap::from([
        ("syntax".to_string(), train_syntax - held_syntax),
        ("operators".to_string(), train_ops - held_ops),
        ("fields".to_string(), train_fields - held_fields),
    ]);

    let flagged = gaps.values().any(|g| g.abs() > GAP_THRESHOLD);
    if flagged {
        warn!(
            gap.syntax = %format!("{:+.3}", train_syntax - held_syntax),
            gap.operators = %format!("{:+.3}", train_ops - held_ops),
            gap.fields = %format!("{:+.3}", train_fields - held_fields),
            "Generalization gap exceeds threshold"
        );
    }

    GeneralizationResult {
        train_syntax_pass_rate: train_syntax,
        held_out_syntax_pass_rate: held_syntax,
        train_operator_pass_rate: train_ops,
        held_out_operator_pass_rate: held_ops,
        train_field_pass_rate: train_fields,
        held_out_field_pass_rate: held_fields,
        gaps,
        flagged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_partitions_rate_zero() {
        let result = eval_generalization(&[], &[]);
        assert_eq!(result.train_syntax_pass_rate, 0.0);
        assert_eq!(result.held_out_field_pass_rate, 0.0);
        assert_eq!(result.gaps.len(), 3);
        assert!(!result.flagged);
    }

    #[test]
    fn test_gap_exactly_at_threshold_not_flagged() {
        // The threshold is strict: |gap| must exceed 0.05, not equal it.
        assert!(!(GAP_THRESHOLD.abs() > GAP_THRESHOLD));
    }
}
