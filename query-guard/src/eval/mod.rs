//! The four-layer evaluation engine.
//!
//! A prediction is scored in strict layer order:
//!
//! ```text
//! raw prediction string
//!     └── syntax      structural well-formedness of the document
//!         ├── operators   $-operators vs. allow-list and unsafe blocklist
//!         └── fields      field references vs. the collection schema
//! batch of results
//!     └── generalization  seen vs. held-out schema pass-rate gaps
//! ```
//!
//! The syntax layer gates the other per-example layers: a prediction that
//! does not parse into a recognized document shape is never inspected for
//! operators or fields, and those layers report their default failed state.
//! The generalization layer runs over a whole batch, not per example.
//!
//! Every layer is a pure function from in-memory values to an immutable
//! result; nothing here performs I/O, blocks, or retries. Failure is a
//! first-class value: malformed documents degrade into results with
//! `passed = false` and diagnostic data, never into errors.
//!
//! ## Example
//!
//! ```rust
//! use query_guard::eval::{eval_syntax, extract_operators};
//! use serde_json::json;
//!
//! let raw = r#"{"type": "aggregate", "pipeline": [{"$match": {"status": "open"}}]}"#;
//! let syntax = eval_syntax(raw);
//! assert!(syntax.passed);
//!
//! let doc: serde_json::Value = serde_json::from_str(raw).unwrap();
//! assert!(extract_operators(&doc).contains("$match"));
//! ```

mod fields;
mod generalization;
mod harness;
mod operators;
mod report;
mod syntax;

pub use fields::{eval_fields, extract_field_refs, FieldResult, IMPLICIT_FIELDS};
pub use generalization::{eval_generalization, GeneralizationResult, GAP_THRESHOLD};
pub use harness::{eval_one, run_eval};
pub use operators::{eval_operators, extract_operators, OperatorResult, UNSAFE_OPERATORS};
pub use report::{EvalReport, EvalResult};
pub use syntax::{eval_syntax, SyntaxResult};
