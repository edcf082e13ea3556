//! Evaluation harness: composes the layers per example and aggregates a
//! batch into an [`EvalReport`].
//!
//! Each (example, prediction) pair is evaluated independently and is
//! referentially transparent, so the batch scatter runs on the rayon
//! thread pool; results are gathered in input order before the rate
//! computation.

use super::fields::{eval_fields, FieldResult};
use super::generalization::eval_generalization;
use super::operators::{eval_operators, OperatorResult};
use super::report::{EvalReport, EvalResult};
use super::syntax::eval_syntax;
use crate::error::{QueryGuardError, Result};
use crate::logging::{truncate_field, DEFAULT_MAX_FIELD_LENGTH};
use crate::schema::TrainingExample;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Evaluates a single prediction against its example.
///
/// The syntax layer runs first; when it fails, the operator and field
/// layers are not invoked and default to their unevaluated, failed state.
/// The prediction is parsed into a document at most once, and only on
/// syntax success.
pub fn eval_one(example: &TrainingExample, prediction: &str) -> EvalResult {
    // Layer 1: Syntax
    let syntax = eval_syntax(prediction);

    // Default results for layers that depend on a valid parse
    let mut operators = OperatorResult::default();
    let mut fields = FieldResult::default();

    if syntax.passed {
        if let Ok(parsed) = serde_json::from_str::<Value>(prediction) {
            // Layer 2: Operators
            operators = eval_operators(&parsed, &example.allowed_ops.all_operators());

            // Layer 3: Fields
            fields = eval_fields(&parsed, &example.schema);
        }
    } else {
        warn!(
            example.collection = %example.schema.collection,
            prediction.text = %truncate_field(prediction, DEFAULT_MAX_FIELD_LENGTH),
            failure.message = %syntax.errors.first().map(String::as_str).unwrap_or(""),
            "Prediction failed syntax validation"
        );
    }

    let passed_all = syntax.passed && operators.passed && fields.passed;
    debug!(
        example.collection = %example.schema.collection,
        syntax.passed = syntax.passed,
        operators.passed = operators.passed,
        fields.passed = fields.passed,
        "Evaluated prediction"
    );

    EvalResult {
        example: example.clone(),
        prediction: prediction.to_string(),
        syntax,
        operators,
        fields,
        passed_all,
    }
}

/// Evaluates a batch of predictions and aggregates per-layer pass rates.
///
/// Fails immediately with [`QueryGuardError::BatchMismatch`] when the two
/// slices differ in length; that is caller misuse, not a document-quality
/// problem. An empty batch returns a report with all rates at zero.
///
/// When `held_out_schemas` names at least one result's schema collection,
/// the report carries a seen vs. held-out generalization breakdown.
pub fn run_eval<S: AsRef<str> + Sync>(
    examples: &[TrainingExample],
    predictions: &[S],
    held_out_schemas: Option<&HashSet<String>>,
) -> Result<EvalReport> {
    if examples.len() != predictions.len() {
        return Err(QueryGuardError::batch_mismatch(
            examples.len(),
            predictions.len(),
        ));
    }

    let results: Vec<EvalResult> = examples
        .par_iter()
        .zip(predictions.par_iter())
        .map(|(example, prediction)| eval_one(example, prediction.as_ref()))
        .collect();
    let total = results.len();

    if total == 0 {
        return Ok(EvalReport::empty());
    }

    let rate = |passed: fn(&EvalResult) -> bool| {
        results.iter().filter(|r| passed(r)).count() as f64 / total as f64
    };
    let syntax_pass_rate = rate(|r| r.syntax.passed);
    let operator_pass_rate = rate(|r| r.operators.passed);
    let field_pass_rate = rate(|r| r.fields.passed);
    let overall_pass_rate = rate(|r| r.passed_all);

    // Layer 4: Generalization (if held-out schemas specified)
    let generalization = held_out_schemas
        .filter(|held| !held.is_empty())
        .and_then(|held| {
            let (held_results, train_results): (Vec<&EvalResult>, Vec<&EvalResult>) = results
                .iter()
                .partition(|r| held.contains(&r.example.schema.collection));
            if held_results.is_empty() {
                None
            } else {
                Some(eval_generalization(&train_results, &held_results))
            }
        });

    info!(
        batch.total = total,
        batch.syntax_pass_rate = syntax_pass_rate,
        batch.operator_pass_rate = operator_pass_rate,
        batch.field_pass_rate = field_pass_rate,
        batch.overall_pass_rate = overall_pass_rate,
        "Evaluated batch"
    );

    Ok(EvalReport {
        results,
        total,
        syntax_pass_rate,
        operator_pass_rate,
        field_pass_rate,
        overall_pass_rate,
        generalization,
    })
}
