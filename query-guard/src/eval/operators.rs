//! Operator layer: which `$`-operators a document uses, and whether it may.
//!
//! Extraction walks the whole document tree; validation checks the used set
//! against the example's allow-list and against a fixed unsafe blocklist.
//! The blocklist overrides the allow-list: an unsafe operator fails the
//! layer even when a caller explicitly allows it.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Operators that are never acceptable in a generated query, regardless of
/// the allow-list: server-side code execution, writes, and admin introspection.
pub static UNSAFE_OPERATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "$where",
        "$function",
        "$accumulator",
        "$merge",
        "$out",
        "$currentOp",
        "$collStats",
        "$indexStats",
        "$planCacheStats",
    ])
});

// Extended JSON type wrappers are value literals, not query operators.
static EXTENDED_JSON_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "$date",
        "$oid",
        "$numberLong",
        "$numberInt",
        "$numberDouble",
        "$numberDecimal",
        "$binary",
        "$timestamp",
        "$regex",
        "$undefined",
        "$minKey",
        "$maxKey",
        "$dbPointer",
        "$symbol",
        "$code",
    ])
});

/// The result of the operator layer for one prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorResult {
    /// Every operator the document uses
    pub used_operators: BTreeSet<String>,
    /// Used operators absent from the allow-list
    pub violations: BTreeSet<String>,
    /// Used operators present in the fixed unsafe blocklist
    pub unsafe_operators: BTreeSet<String>,
    /// No violations and no unsafe operators
    pub passed: bool,
}

/// Recursively extracts all `$`-prefixed keys from a document tree.
///
/// Extended JSON type wrapper keys (e.g. `$date`, `$oid`) are skipped, but
/// recursion always continues into their values. The result is deduplicated
/// and independent of object key order.
///
/// # Examples
///
/// ```rust
/// use query_guard::eval::extract_operators;
/// use serde_json::json;
///
/// let doc = json!({"$match": {"created": {"$gte": {"$date": "2024-01-01"}}}});
/// let ops = extract_operators(&doc);
/// assert!(ops.contains("$match"));
/// assert!(ops.contains("$gte"));
/// assert!(!ops.contains("$date"));
/// ```
pub fn extract_operators(value: &Value) -> BTreeSet<String> {
    let mut ops = BTreeSet::new();
    collect_operators(value, &mut ops);
    ops
}

fn collect_operators(value: &Value, ops: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.starts_with('$') && !EXTENDED_JSON_KEYS.contains(key.as_str()) {
                    ops.insert(key.clone());
                }
                collect_operators(child, ops);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_operators(item, ops);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Evaluates the operators used by a query against an allow-list.
///
/// `violations` is the used set minus the allow-list; `unsafe_operators` is
/// the used set intersected with [`UNSAFE_OPERATORS`], computed without
/// consulting the allow-list at all.
pub fn eval_operators<S: AsRef<str>>(query: &Value, allowed: &[S]) -> OperatorResult {
    let used = extract_operators(query);
    let allowed_set: HashSet<&str> = allowed.iter().map(AsRef::as_ref).collect();

    let violations: BTreeSet<String> = used
        .iter()
        .filter(|op| !allowed_set.contains(op.as_str()))
        .cloned()
        .collect();
    let unsafe_operators: BTreeSet<String> = used
        .iter()
        .filter(|op| UNSAFE_OPERATORS.contains(op.as_str()))
        .cloned()
        .collect();

    let passed = violations.is_empty() && unsafe_operators.is_empty();
    OperatorResult {
        used_operators: used,
        violations,
        unsafe_operators,
        passed,
    }
}
