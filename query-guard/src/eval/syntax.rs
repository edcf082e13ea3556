//! Syntax layer: structural well-formedness of a raw prediction string.
//!
//! Checks run in strict order and short-circuit on the first failure, so a
//! failed result carries exactly one diagnostic message. The two recognized
//! document shapes are:
//!
//! ```text
//! {"type": "find", "filter": {...}, ...}
//! {"type": "aggregate", "pipeline": [{"$stage": ...}, ...]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The result of the syntax layer for one prediction.
///
/// Intermediate flags record how far the checks progressed; the default
/// value is the fully-unevaluated, failed state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntaxResult {
    /// The raw string parsed as JSON
    pub valid_json: bool,
    /// A `type` key was present at the top level
    pub has_type: bool,
    /// The observed `type` value, retained even when later checks fail
    pub type_value: Option<String>,
    /// The shape-specific body (`pipeline` or `filter`) was present
    pub has_body: bool,
    /// Every pipeline stage is an object with exactly one `$`-prefixed key
    /// (trivially true for `find` documents)
    pub pipeline_well_formed: bool,
    /// All checks passed
    pub passed: bool,
    /// Diagnostics; at most one entry per evaluation
    pub errors: Vec<String>,
}

impl SyntaxResult {
    fn fail(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }
}

/// Renders a JSON value the way it should read inside a diagnostic:
/// bare text for strings, compact JSON for everything else.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Validates that a raw candidate string is a well-formed query document.
///
/// Never panics and never returns an error: every anomaly degrades into a
/// result with `passed = false` and a single human-readable diagnostic.
///
/// # Examples
///
/// ```rust
/// use query_guard::eval::eval_syntax;
///
/// let result = eval_syntax(r#"{"type": "find", "filter": {"status": "open"}}"#);
/// assert!(result.passed);
///
/// let result = eval_syntax("not even json");
/// assert!(!result.passed);
/// assert_eq!(result.errors, vec!["Invalid JSON".to_string()]);
/// ```
pub fn eval_syntax(raw_output: &str) -> SyntaxResult {
    let mut result = SyntaxResult::default();

    // 1. Valid JSON
    let parsed: Value = match serde_json::from_str(raw_output) {
        Ok(value) => value,
        Err(_) => return result.fail("Invalid JSON"),
    };
    result.valid_json = true;

    let object = match parsed.as_object() {
        Some(object) => object,
        None => return result.fail("Top-level value must be an object"),
    };

    // 2. Has `type` field
    let type_value = match object.get("type") {
        Some(value) => value,
        None => return result.fail("Missing 'type' field"),
    };
    result.has_type = true;
    result.type_value = Some(display_value(type_value));

    // 3. type is aggregate or find
    let query_type = match type_value.as_str() {
        Some(t @ ("aggregate" | "find")) => t,
        _ => {
            let shown = display_value(type_value);
            return result.fail(format!(
                "Invalid type '{shown}'; expected 'aggregate' or 'find'"
            ));
        }
    };

    // 4. Body present
    if query_type == "aggregate" {
        let pipeline = match object.get("pipeline") {
            Some(value) => value,
            None => return result.fail("Aggregate query missing 'pipeline'"),
        };
        result.has_body = true;

        // 5. Pipeline well-formedness
        let stages = match pipeline.as_array() {
            Some(stages) => stages,
            None => return result.fail("'pipeline' must be a list"),
        };

        for (i, stage) in stages.iter().enumerate() {
            let stage_object = match stage.as_object() {
                Some(object) => object,
                None => return result.fail(format!("Pipeline stage {i} is not an object")),
            };
            let dollar_keys = stage_object
                .keys()
                .filter(|k| k.starts_with('$'))
                .count();
            if dollar_keys != 1 {
                return result.fail(format!(
                    "Pipeline stage {i} must have exactly one $-prefixed key, got {dollar_keys}"
                ));
            }
        }
        result.pipeline_well_formed = true;
    } else {
        let filter = match object.get("filter") {
            Some(value) => value,
            None => return result.fail("Find query missing 'filter'"),
        };
        result.has_body = true;
        if !filter.is_object() {
            return result.fail("'filter' must be an object");
        }
        // find queries don't have a pipeline; mark as well-formed
        result.pipeline_well_formed = true;
    }

    result.passed = true;
    result
}
