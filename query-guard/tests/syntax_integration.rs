//! Integration tests for the syntax layer.

use query_guard::eval::eval_syntax;
use serde_json::json;

mod valid_json {
    use super::*;

    #[test]
    fn test_valid_aggregate() {
        let query = json!({
            "type": "aggregate",
            "pipeline": [{"$match": {"status": "active"}}],
        })
        .to_string();
        let result = eval_syntax(&query);
        assert!(result.passed);
        assert!(result.valid_json);
        assert!(result.has_type);
        assert_eq!(result.type_value.as_deref(), Some("aggregate"));
        assert!(result.has_body);
        assert!(result.pipeline_well_formed);
    }

    #[test]
    fn test_valid_find() {
        let query = json!({
            "type": "find",
            "filter": {"status": "active"},
        })
        .to_string();
        let result = eval_syntax(&query);
        assert!(result.passed);
        assert!(result.valid_json);
        assert_eq!(result.type_value.as_deref(), Some("find"));
    }

    #[test]
    fn test_multi_stage_pipeline() {
        let query = json!({
            "type": "aggregate",
            "pipeline": [
                {"$match": {"status": "active"}},
                {"$group": {"_id": "$dept", "total": {"$sum": "$amount"}}},
                {"$sort": {"total": -1}},
            ],
        })
        .to_string();
        let result = eval_syntax(&query);
        assert!(result.passed);
        assert!(result.pipeline_well_formed);
    }
}

mod invalid_json {
    use super::*;

    #[test]
    fn test_not_json() {
        let result = eval_syntax("this is not json");
        assert!(!result.passed);
        assert!(!result.valid_json);
        assert!(result.errors[0].contains("Invalid JSON"));
    }

    #[test]
    fn test_empty_string() {
        let result = eval_syntax("");
        assert!(!result.passed);
    }

    #[test]
    fn test_json_array() {
        let result = eval_syntax("[1, 2, 3]");
        assert!(!result.passed);
        assert!(result.valid_json);
        assert!(result.errors[0].contains("Top-level"));
    }
}

mod missing_fields {
    use super::*;

    #[test]
    fn test_no_type() {
        let query = json!({"pipeline": [{"$match": {}}]}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("Missing 'type'"));
    }

    #[test]
    fn test_wrong_type() {
        let query = json!({"type": "update", "filter": {}}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("Invalid type"));
        assert_eq!(
            result.errors[0],
            "Invalid type 'update'; expected 'aggregate' or 'find'"
        );
    }

    #[test]
    fn test_aggregate_no_pipeline() {
        let query = json!({"type": "aggregate"}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("missing 'pipeline'"));
    }

    #[test]
    fn test_find_no_filter() {
        let query = json!({"type": "find"}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("missing 'filter'"));
    }
}

mod malformed_pipeline {
    use super::*;

    #[test]
    fn test_pipeline_not_list() {
        let query = json!({"type": "aggregate", "pipeline": "oops"}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("'pipeline' must be a list"));
    }

    #[test]
    fn test_stage_not_object() {
        let query = json!({"type": "aggregate", "pipeline": ["not an object"]}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("stage 0"));
    }

    #[test]
    fn test_stage_no_dollar_key() {
        let query = json!({"type": "aggregate", "pipeline": [{"match": {}}]}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("exactly one $-prefixed key"));
    }

    #[test]
    fn test_stage_multiple_dollar_keys() {
        let query = json!({
            "type": "aggregate",
            "pipeline": [{"$match": {}, "$sort": {}}],
        })
        .to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("got 2"));
    }

    #[test]
    fn test_offending_stage_index_reported() {
        let query = json!({
            "type": "aggregate",
            "pipeline": [{"$match": {}}, {"limit": 5}],
        })
        .to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("stage 1"));
    }

    #[test]
    fn test_empty_pipeline() {
        // An empty pipeline is structurally valid
        let query = json!({"type": "aggregate", "pipeline": []}).to_string();
        let result = eval_syntax(&query);
        assert!(result.passed);
    }

    #[test]
    fn test_find_filter_not_object() {
        let query = json!({"type": "find", "filter": [1, 2]}).to_string();
        let result = eval_syntax(&query);
        assert!(!result.passed);
        assert!(result.errors[0].contains("'filter' must be an object"));
    }
}
