//! Per-example and batch result models.
//!
//! Every result is created fresh per evaluation call and never mutated
//! afterward; the aggregate rates on [`EvalReport`] are computed once by the
//! harness during construction.

use super::fields::FieldResult;
use super::generalization::GeneralizationResult;
use super::operators::OperatorResult;
use super::syntax::SyntaxResult;
use crate::schema::TrainingExample;
use serde::{Deserialize, Serialize};

/// The evaluation of one (example, prediction) pair across all layers.
///
/// When the syntax layer fails, the operator and field layers are not
/// invoked and carry their default unevaluated, failed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalResult {
    /// The example the prediction was generated for
    pub example: TrainingExample,
    /// The raw prediction string
    pub prediction: String,
    /// Layer 1: structural well-formedness
    pub syntax: SyntaxResult,
    /// Layer 2: operator policy
    pub operators: OperatorResult,
    /// Layer 3: schema field references
    pub fields: FieldResult,
    /// All three layers passed
    pub passed_all: bool,
}

/// The aggregate report for one evaluated batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Per-example results, in input order
    pub results: Vec<EvalResult>,
    /// Number of evaluated pairs
    pub total: usize,
    /// Fraction of results passing the syntax layer
    pub syntax_pass_rate: f64,
    /// Fraction of results passing the operator layer
    pub operator_pass_rate: f64,
    /// Fraction of results passing the field layer
    pub field_pass_rate: f64,
    /// Fraction of results passing all layers
    pub overall_pass_rate: f64,
    /// Seen vs. held-out breakdown, when held-out schemas were supplied
    /// and matched at least one result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generalization: Option<GeneralizationResult>,
}

impl EvalReport {
    /// Returns an empty report with all rates at zero.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            syntax_pass_rate: 0.0,
            operator_pass_rate: 0.0,
            field_pass_rate: 0.0,
            overall_pass_rate: 0.0,
            generalization: None,
        }
    }

    /// Returns true when every result in the batch passed all layers.
    ///
    /// An empty batch has no failures and reports success.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed_all)
    }

    /// Returns the results that failed at least one layer, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &EvalResult> {
        self.results.iter().filter(|r| !r.passed_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = EvalReport::empty();
        assert_eq!(report.total, 0);
        assert_eq!(report.overall_pass_rate, 0.0);
        assert!(report.all_passed());
        assert_eq!(report.failures().count(), 0);
        assert!(report.generalization.is_none());
    }
}
