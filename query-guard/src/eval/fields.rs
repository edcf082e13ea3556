//! Field layer: which schema fields a document references, and whether
//! they exist.
//!
//! Field references appear two ways: as plain object keys (filter and
//! projection positions) and as `"$field"` expression strings. Neither
//! operator keys, output aliases under grouping stages, `$$` system
//! variables, nor Extended JSON literal wrappers count as references.
//! Dotted paths resolve to their root field.

use crate::schema::SchemaDef;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

/// Fields that are always valid (implicit in every collection).
pub static IMPLICIT_FIELDS: Lazy<HashSet<&'static str>> = Lazy::new(|| HashSet::from(["_id"]));

// Operators whose direct child keys are output aliases, not field
// references. Recursion continues into the alias values with the alias
// context cleared: the suppression is one level deep only.
static ALIAS_OPERATORS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["$group", "$bucket", "$bucketAuto"]));

/// The result of the field layer for one prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldResult {
    /// Every root field the document references
    pub referenced_fields: BTreeSet<String>,
    /// Referenced fields absent from the schema
    pub hallucinated_fields: BTreeSet<String>,
    /// Fraction of schema fields referenced, in `[0, 1]`
    pub coverage: f64,
    /// No hallucinated fields
    pub passed: bool,
}

/// Recursively extracts root field references from a query document.
///
/// Handles:
/// - String values starting with `$` (field references like `"$price"`,
///   `"$addr.city"`); `$$` system variables (`$$ROOT`, `$$NOW`) are not
///   references
/// - Object keys that are plain field names (non-operator) in `$match`,
///   `$project`, etc.
/// - Output alias keys directly under `$group`/`$bucket`/`$bucketAuto`,
///   which are caller-chosen names rather than field references
///
/// # Examples
///
/// ```rust
/// use query_guard::eval::extract_field_refs;
/// use serde_json::json;
///
/// let stage = json!({"$group": {"_id": "$dept", "total": {"$sum": "$amount"}}});
/// let refs = extract_field_refs(&stage);
/// assert!(refs.contains("dept"));
/// assert!(refs.contains("amount"));
/// assert!(!refs.contains("total"));
/// ```
pub fn extract_field_refs(value: &Value) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    collect_field_refs(value, false, &mut refs);
    refs
}

fn root_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

fn collect_field_refs(value: &Value, inside_alias_op: bool, refs: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            if let Some(field_path) = s.strip_prefix('$') {
                if !field_path.starts_with('$') {
                    refs.insert(root_segment(field_path).to_string());
                }
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                if key.starts_with('$') {
                    // Operator key: alias operators set the context for
                    // their value, other operators carry it through.
                    let context = if ALIAS_OPERATORS.contains(key.as_str()) {
                        true
                    } else {
                        inside_alias_op
                    };
                    collect_field_refs(child, context, refs);
                } else if inside_alias_op {
                    // Inside $group etc.: keys are output aliases, not
                    // field refs. Still recurse into values to find
                    // $-prefixed field references.
                    collect_field_refs(child, false, refs);
                } else {
                    // Plain field name used as key (e.g. in
                    // $match: {"status": "active"})
                    refs.insert(root_segment(key).to_string());
                    collect_field_refs(child, false, refs);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_field_refs(item, inside_alias_op, refs);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Evaluates the fields referenced by a query against a collection schema.
///
/// References are extracted from the body of the query (`pipeline` when
/// present, else `filter`, else the whole document). The implicit `_id`
/// field and the literal `type` key never count as references. Coverage is
/// the referenced fraction of the schema's field set, computed over all
/// extracted references including hallucinated ones.
pub fn eval_fields(query: &Value, schema: &SchemaDef) -> FieldResult {
    let body = query
        .get("pipeline")
        .or_else(|| query.get("filter"))
        .unwrap_or(query);
    let mut refs = extract_field_refs(body);

    // Remove implicit fields and the "type" key (not a real field ref)
    for implicit in IMPLICIT_FIELDS.iter() {
        refs.remove(*implicit);
    }
    refs.remove("type");

    let schema_fields = schema.field_names();
    let hallucinated: BTreeSet<String> = refs
        .iter()
        .filter(|r| !schema_fields.contains(r.as_str()) && !IMPLICIT_FIELDS.contains(r.as_str()))
        .cloned()
        .collect();

    let coverage = if schema_fields.is_empty() {
        0.0
    } else {
        let matched = refs
            .iter()
            .filter(|r| schema_fields.contains(r.as_str()))
            .count();
        matched as f64 / schema_fields.len() as f64
    };

    let passed = hallucinated.is_empty();
    FieldResult {
        referenced_fields: refs,
        hallucinated_fields: hallucinated,
        coverage,
        passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_unevaluated_failure() {
        let result = FieldResult::default();
        assert!(!result.passed);
        assert_eq!(result.coverage, 0.0);
    }

    #[test]
    fn test_root_segment() {
        assert_eq!(root_segment("addr.city"), "addr");
        assert_eq!(root_segment("price"), "price");
    }

    #[test]
    fn test_alias_suppression_is_one_level_deep() {
        // "total" is an alias; the object under it is scanned with the
        // context cleared, so "weights" counts as a field key again.
        let stage = json!({"$group": {"total": {"weights": "$score"}}});
        let refs = extract_field_refs(&stage);
        assert!(refs.contains("weights"));
        assert!(refs.contains("score"));
        assert!(!refs.contains("total"));
    }

    #[test]
    fn test_bucket_direct_children_are_aliases() {
        let stage = json!({"$bucket": {"groupBy": "$price", "boundaries": [0, 100]}});
        let refs = extract_field_refs(&stage);
        assert!(!refs.contains("groupBy"));
        assert!(!refs.contains("boundaries"));
        assert!(refs.contains("price"));
    }

    #[test]
    fn test_array_preserves_alias_context() {
        let stage = json!({"$group": [{"alias": "$amount"}]});
        let refs = extract_field_refs(&stage);
        assert!(!refs.contains("alias"));
        assert!(refs.contains("amount"));
    }
}
