//! # Query Guard - Query Document Scoring for Rust
//!
//! Query Guard scores machine-generated MongoDB query documents against a
//! collection schema and an operator allow-list, producing structured
//! pass/fail verdicts usable both for single-prediction validation and for
//! aggregate model-quality reporting.
//!
//! ## Overview
//!
//! A generated query can go wrong in layers: it may not be a well-formed
//! document at all, it may reach for operators it was never granted (or
//! that are never safe to run), and it may reference fields the target
//! collection does not have. Query Guard evaluates each prediction through
//! those layers in order, short-circuiting on the first structural failure,
//! and aggregates a batch into per-layer pass rates — optionally split by
//! schemas seen during training versus schemas held out from it.
//!
//! ## Quick Start
//!
//! ```rust
//! use query_guard::eval::run_eval;
//! use query_guard::schema::{AllowedOps, FieldDef, FieldRole, SchemaDef, TrainingExample};
//! use serde_json::json;
//!
//! # fn example() -> query_guard::error::Result<()> {
//! let example = TrainingExample {
//!     schema: SchemaDef {
//!         collection: "orders".to_string(),
//!         domain: "ecommerce".to_string(),
//!         fields: vec![FieldDef {
//!             name: "status".to_string(),
//!             field_type: "string".to_string(),
//!             role: FieldRole::Enum,
//!             description: String::new(),
//!             enum_values: None,
//!         }],
//!     },
//!     allowed_ops: AllowedOps {
//!         stage_operators: vec!["$match".to_string()],
//!         expression_operators: vec![],
//!     },
//!     intent: "find open orders".to_string(),
//!     output: json!({"type": "find", "filter": {"status": "open"}}),
//!     is_negative: false,
//! };
//!
//! let predictions = vec![r#"{"type": "find", "filter": {"status": "open"}}"#];
//! let report = run_eval(&[example], &predictions, None)?;
//!
//! assert_eq!(report.total, 1);
//! assert_eq!(report.overall_pass_rate, 1.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Evaluation Layers
//!
//! - **Syntax**: the raw string parses into one of the two recognized
//!   document shapes (`find` with a `filter` object, `aggregate` with a
//!   pipeline of single-operator stages)
//! - **Operators**: every `$`-operator the document uses is on the
//!   example's allow-list and off the fixed unsafe blocklist — the
//!   blocklist always wins
//! - **Fields**: every referenced field exists in the collection schema;
//!   output aliases, `$$` system variables, and Extended JSON literal
//!   wrappers are never counted as references
//! - **Generalization**: per-layer pass-rate gaps between seen and
//!   held-out schemas, flagged past a fixed threshold
//!
//! ## Reporting
//!
//! The [`formatters`] module renders an [`eval::EvalReport`] as JSON,
//! human-readable console text, or Markdown:
//!
//! ```rust
//! use query_guard::formatters::{FormatterConfig, MarkdownFormatter, ResultFormatter};
//! use query_guard::eval::EvalReport;
//!
//! let formatter = MarkdownFormatter::with_config(FormatterConfig::ci());
//! let markdown = formatter.format(&EvalReport::empty()).unwrap();
//! ```
//!
//! ## Architecture
//!
//! - **[`eval`]**: the four-layer evaluation engine and its result models
//! - **[`schema`]**: consumed boundary types (schemas, allow-lists,
//!   training examples)
//! - **[`error`]**: the library error type; document-quality problems are
//!   result values, not errors
//! - **[`formatters`]**: report rendering for consoles, CI, and docs
//! - **[`logging`]**: structured logging configuration built on `tracing`
//!
//! The evaluation core is synchronous, side-effect-free, and operates only
//! on in-memory documents; batches are scattered across the rayon thread
//! pool and gathered in input order.

pub mod error;
pub mod eval;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod schema;
