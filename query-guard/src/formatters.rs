//! Result formatting and reporting for evaluation reports.
//!
//! This module provides different formatters for [`EvalReport`], allowing
//! callers to output results as JSON for programmatic consumption, as
//! human-readable text for consoles, or as Markdown for documentation.
//!
//! # Examples
//!
//! ```rust
//! use query_guard::formatters::{HumanFormatter, ResultFormatter};
//! use query_guard::eval::EvalReport;
//!
//! let formatter = HumanFormatter::new();
//! let report = EvalReport::empty();
//! let output = formatter.format(&report).unwrap();
//! assert!(output.contains("PASSED"));
//! ```

use crate::error::Result;
use crate::eval::{EvalReport, EvalResult};
use std::fmt::Write;

/// Configuration options for formatting evaluation reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include per-layer pass rates in output
    pub include_metrics: bool,
    /// Include per-example failure details
    pub include_issues: bool,
    /// Include the seen vs. held-out generalization breakdown
    pub include_generalization: bool,
    /// Maximum number of failures to display (-1 for all)
    pub max_issues: i32,
    /// Whether to use colorized output (for the human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_metrics: true,
            include_issues: true,
            include_generalization: true,
            max_issues: -1, // Show all failures by default
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_metrics: true,
            include_issues: false,
            include_generalization: false,
            max_issues: 0,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self::default()
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_metrics: true,
            include_issues: true,
            include_generalization: true,
            max_issues: 50, // Limit output in CI
            use_colors: false,
            include_timestamps: true,
        }
    }

    /// Sets whether to include pass-rate metrics.
    pub fn with_metrics(mut self, include: bool) -> Self {
        self.include_metrics = include;
        self
    }

    /// Sets whether to include per-example failure details.
    pub fn with_issues(mut self, include: bool) -> Self {
        self.include_issues = include;
        self
    }

    /// Sets the maximum number of failures to display.
    pub fn with_max_issues(mut self, max: i32) -> Self {
        self.max_issues = max;
        self
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

/// Trait for formatting evaluation reports into different output formats.
///
/// # Examples
///
/// ```rust
/// use query_guard::formatters::ResultFormatter;
/// use query_guard::eval::EvalReport;
///
/// struct MyCustomFormatter;
///
/// impl ResultFormatter for MyCustomFormatter {
///     fn format(&self, report: &EvalReport) -> query_guard::prelude::Result<String> {
///         Ok(format!("{} of {} passed", report.total - report.failures().count(), report.total))
///     }
/// }
/// ```
pub trait ResultFormatter {
    /// Formats an evaluation report into a string representation.
    fn format(&self, report: &EvalReport) -> Result<String>;

    /// Formats an evaluation report with custom configuration.
    fn format_with_config(&self, report: &EvalReport, _config: &FormatterConfig) -> Result<String> {
        // Default implementation ignores config and uses standard format
        self.format(report)
    }
}

/// Collects the human-readable diagnostics for one failed result.
fn issue_lines(result: &EvalResult) -> Vec<String> {
    let mut lines = Vec::new();
    for error in &result.syntax.errors {
        lines.push(format!("syntax: {error}"));
    }
    if !result.operators.violations.is_empty() {
        lines.push(format!(
            "operators: disallowed {}",
            join_set(&result.operators.violations)
        ));
    }
    if !result.operators.unsafe_operators.is_empty() {
        lines.push(format!(
            "operators: unsafe {}",
            join_set(&result.operators.unsafe_operators)
        ));
    }
    if !result.fields.hallucinated_fields.is_empty() {
        lines.push(format!(
            "fields: hallucinated {}",
            join_set(&result.fields.hallucinated_fields)
        ));
    }
    lines
}

fn join_set(set: &std::collections::BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Builds a filtered JSON representation of a report based on config.
fn filter_report_for_config(report: &EvalReport, config: &FormatterConfig) -> serde_json::Value {
    let mut value = serde_json::json!({
        "total": report.total,
        "passed": report.all_passed(),
    });
    if config.include_metrics {
        value["syntax_pass_rate"] = report.syntax_pass_rate.into();
        value["operator_pass_rate"] = report.operator_pass_rate.into();
        value["field_pass_rate"] = report.field_pass_rate.into();
        value["overall_pass_rate"] = report.overall_pass_rate.into();
    }
    if config.include_generalization {
        if let Some(generalization) = &report.generalization {
            value["generalization"] =
                serde_json::to_value(generalization).unwrap_or(serde_json::Value::Null);
        }
    }
    if config.include_issues {
        let issues: Vec<serde_json::Value> = report
            .failures()
            .map(|r| {
                serde_json::json!({
                    "collection": r.example.schema.collection,
                    "prediction": r.prediction,
                    "diagnostics": issue_lines(r),
                })
            })
            .collect();
        value["issues"] = issues.into();
    }
    value
}

/// Formats evaluation reports as structured JSON.
///
/// Outputs the report summary (and optionally issues and the
/// generalization breakdown) as JSON suitable for programmatic consumption
/// and integration with other tools.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, report: &EvalReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &EvalReport, config: &FormatterConfig) -> Result<String> {
        let filtered = filter_report_for_config(report, config);
        if self.pretty {
            Ok(serde_json::to_string_pretty(&filtered)?)
        } else {
            Ok(serde_json::to_string(&filtered)?)
        }
    }
}

/// Formats evaluation reports in a human-readable format for console output.
///
/// Includes a pass/fail header, per-layer pass rates, the generalization
/// breakdown when present, and per-example failure diagnostics.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    /// Creates a new human formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, report: &EvalReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &EvalReport, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();

        // Header
        writeln!(output).unwrap();
        if report.all_passed() {
            if config.use_colors {
                writeln!(output, "✅ \x1b[32mEvaluation PASSED\x1b[0m").unwrap();
            } else {
                writeln!(output, "✅ Evaluation PASSED").unwrap();
            }
        } else if config.use_colors {
            writeln!(output, "❌ \x1b[31mEvaluation FAILED\x1b[0m").unwrap();
        } else {
            writeln!(output, "❌ Evaluation FAILED").unwrap();
        }

        writeln!(output).unwrap();
        writeln!(output, "Examples: {}", report.total).unwrap();

        if config.include_timestamps {
            writeln!(output, "Timestamp: {}", chrono::Utc::now().to_rfc3339()).unwrap();
        }

        // Pass-rate summary
        if config.include_metrics {
            writeln!(output).unwrap();
            writeln!(output, "📊 Pass Rates:").unwrap();
            writeln!(output, "   Syntax:    {:.1}%", report.syntax_pass_rate * 100.0).unwrap();
            writeln!(
                output,
                "   Operators: {:.1}%",
                report.operator_pass_rate * 100.0
            )
            .unwrap();
            writeln!(output, "   Fields:    {:.1}%", report.field_pass_rate * 100.0).unwrap();
            writeln!(
                output,
                "   Overall:   {:.1}%",
                report.overall_pass_rate * 100.0
            )
            .unwrap();
        }

        // Generalization breakdown
        if config.include_generalization {
            if let Some(g) = &report.generalization {
                writeln!(output).unwrap();
                let flag = if !g.flagged {
                    "within threshold"
                } else if config.use_colors {
                    "\x1b[31mFLAGGED\x1b[0m"
                } else {
                    "FLAGGED"
                };
                writeln!(output, "🧪 Generalization ({flag}):").unwrap();
                writeln!(
                    output,
                    "   Syntax:    train {:.1}% / held-out {:.1}%",
                    g.train_syntax_pass_rate * 100.0,
                    g.held_out_syntax_pass_rate * 100.0
                )
                .unwrap();
                writeln!(
                    output,
                    "   Operators: train {:.1}% / held-out {:.1}%",
                    g.train_operator_pass_rate * 100.0,
                    g.held_out_operator_pass_rate * 100.0
                )
                .unwrap();
                writeln!(
                    output,
                    "   Fields:    train {:.1}% / held-out {:.1}%",
                    g.train_field_pass_rate * 100.0,
                    g.held_out_field_pass_rate * 100.0
                )
                .unwrap();
            }
        }

        // Issues
        let failure_count = report.failures().count();
        if config.include_issues && failure_count > 0 {
            writeln!(output).unwrap();
            writeln!(output, "🔍 Failures:").unwrap();

            let shown = if config.max_issues < 0 {
                failure_count
            } else {
                std::cmp::min(config.max_issues as usize, failure_count)
            };

            for (i, result) in report.failures().take(shown).enumerate() {
                writeln!(output).unwrap();
                writeln!(
                    output,
                    "   ❌ Failure #{}: {}",
                    i + 1,
                    result.example.schema.collection
                )
                .unwrap();
                writeln!(output, "      Intent: {}", result.example.intent).unwrap();
                for line in issue_lines(result) {
                    writeln!(output, "      {line}").unwrap();
                }
            }

            if failure_count > shown {
                writeln!(output).unwrap();
                writeln!(
                    output,
                    "   ... and {} more failures (use --max-issues to show more)",
                    failure_count - shown
                )
                .unwrap();
            }
        }

        writeln!(output).unwrap();
        Ok(output)
    }
}

/// Formats evaluation reports as Markdown suitable for documentation.
///
/// Produces a structured report with a proper heading hierarchy that can
/// be embedded in model cards, dashboards, or pull-request comments.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    /// Creates a new Markdown formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    /// Creates a new Markdown formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, report: &EvalReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &EvalReport, config: &FormatterConfig) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        if report.all_passed() {
            writeln!(output, "{h} ✅ Evaluation Report - PASSED").unwrap();
        } else {
            writeln!(output, "{h} ❌ Evaluation Report - FAILED").unwrap();
        }
        writeln!(output).unwrap();
        writeln!(output, "**Examples:** {}", report.total).unwrap();
        if config.include_timestamps {
            writeln!(
                output,
                "**Generated:** {}",
                chrono::Utc::now().to_rfc3339()
            )
            .unwrap();
        }

        if config.include_metrics {
            writeln!(output).unwrap();
            writeln!(output, "{h}# Pass Rates").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Layer | Pass Rate |").unwrap();
            writeln!(output, "|-------|-----------|").unwrap();
            writeln!(
                output,
                "| Syntax | {:.1}% |",
                report.syntax_pass_rate * 100.0
            )
            .unwrap();
            writeln!(
                output,
                "| Operators | {:.1}% |",
                report.operator_pass_rate * 100.0
            )
            .unwrap();
            writeln!(output, "| Fields | {:.1}% |", report.field_pass_rate * 100.0).unwrap();
            writeln!(
                output,
                "| **Overall** | **{:.1}%** |",
                report.overall_pass_rate * 100.0
            )
            .unwrap();
        }

        if config.include_generalization {
            if let Some(g) = &report.generalization {
                writeln!(output).unwrap();
                writeln!(output, "{h}# Generalization").unwrap();
                writeln!(output).unwrap();
                if g.flagged {
                    writeln!(output, "> ⚠️ Gap exceeds the regression threshold.").unwrap();
                    writeln!(output).unwrap();
                }
                writeln!(output, "| Layer | Train | Held-out | Gap |").unwrap();
                writeln!(output, "|-------|-------|----------|-----|").unwrap();
                for (layer, train, held) in [
                    (
                        "Syntax",
                        g.train_syntax_pass_rate,
                        g.held_out_syntax_pass_rate,
                    ),
                    (
                        "Operators",
                        g.train_operator_pass_rate,
                        g.held_out_operator_pass_rate,
                    ),
                    (
                        "Fields",
                        g.train_field_pass_rate,
                        g.held_out_field_pass_rate,
                    ),
                ] {
                    writeln!(
                        output,
                        "| {layer} | {:.1}% | {:.1}% | {:+.1}% |",
                        train * 100.0,
                        held * 100.0,
                        (train - held) * 100.0
                    )
                    .unwrap();
                }
            }
        }

        let failure_count = report.failures().count();
        if config.include_issues && failure_count > 0 {
            writeln!(output).unwrap();
            writeln!(output, "{h}# Failures").unwrap();
            let shown = if config.max_issues < 0 {
                failure_count
            } else {
                std::cmp::min(config.max_issues as usize, failure_count)
            };
            for result in report.failures().take(shown) {
                writeln!(output).unwrap();
                writeln!(
                    output,
                    "- **{}** — {}",
                    result.example.schema.collection, result.example.intent
                )
                .unwrap();
                for line in issue_lines(result) {
                    writeln!(output, "  - {line}").unwrap();
                }
            }
            if failure_count > shown {
                writeln!(output).unwrap();
                writeln!(output, "*... and {} more*", failure_count - shown).unwrap();
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::run_eval;
    use crate::schema::{AllowedOps, SchemaDef, TrainingExample};
    use serde_json::json;

    fn sample_report(predictions: &[&str]) -> EvalReport {
        let example = TrainingExample {
            schema: SchemaDef {
                collection: "orders".to_string(),
                domain: "ecommerce".to_string(),
                fields: Vec::new(),
            },
            allowed_ops: AllowedOps {
                stage_operators: vec!["$match".to_string()],
                expression_operators: Vec::new(),
            },
            intent: "find everything".to_string(),
            output: json!({}),
            is_negative: false,
        };
        let examples: Vec<TrainingExample> =
            predictions.iter().map(|_| example.clone()).collect();
        run_eval(&examples, predictions, None).unwrap()
    }

    #[test]
    fn test_json_formatter_minimal() {
        let report = sample_report(&[r#"{"type": "find", "filter": {}}"#]);
        let output = JsonFormatter::with_config(FormatterConfig::minimal())
            .format(&report)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["passed"], true);
        assert!(value.get("issues").is_none());
    }

    #[test]
    fn test_json_formatter_compact_is_single_line() {
        let report = sample_report(&[r#"{"type": "find", "filter": {}}"#]);
        let output = JsonFormatter::new()
            .with_pretty(false)
            .format(&report)
            .unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_human_formatter_reports_failures() {
        let report = sample_report(&["not json"]);
        let output = HumanFormatter::with_config(FormatterConfig::ci())
            .format(&report)
            .unwrap();
        assert!(output.contains("Evaluation FAILED"));
        assert!(output.contains("syntax: Invalid JSON"));
        assert!(!output.contains("\x1b[31m"));
    }

    #[test]
    fn test_human_formatter_max_issues() {
        let report = sample_report(&["bad", "worse", "worst"]);
        let config = FormatterConfig::ci().with_max_issues(1);
        let output = HumanFormatter::with_config(config).format(&report).unwrap();
        assert!(output.contains("Failure #1"));
        assert!(!output.contains("Failure #2"));
        assert!(output.contains("and 2 more failures"));
    }

    #[test]
    fn test_markdown_formatter_table() {
        let report = sample_report(&[r#"{"type": "find", "filter": {}}"#, "oops"]);
        let output = MarkdownFormatter::new()
            .with_heading_level(3)
            .format(&report)
            .unwrap();
        assert!(output.starts_with("### ❌ Evaluation Report - FAILED"));
        assert!(output.contains("| Syntax | 50.0% |"));
        assert!(output.contains("#### Failures"));
    }

    #[test]
    fn test_issue_lines_cover_all_layers() {
        let example = TrainingExample {
            schema: SchemaDef {
                collection: "orders".to_string(),
                domain: "ecommerce".to_string(),
                fields: Vec::new(),
            },
            allowed_ops: AllowedOps::default(),
            intent: "aggregate".to_string(),
            output: json!({}),
            is_negative: false,
        };
        let raw = r#"{"type": "aggregate", "pipeline": [{"$out": {"total": "$missing"}}]}"#;
        let result = crate::eval::eval_one(&example, raw);
        let lines = issue_lines(&result);
        assert!(lines.iter().any(|l| l.contains("unsafe $out")));
        assert!(lines.iter().any(|l| l.contains("disallowed $out")));
        assert!(lines.iter().any(|l| l.contains("hallucinated")));
    }
}
