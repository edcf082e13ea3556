//! Prelude for commonly used types and traits in query-guard.

pub use crate::error::{QueryGuardError, Result};
pub use crate::eval::{eval_one, run_eval, EvalReport, EvalResult};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
pub use crate::schema::{AllowedOps, FieldDef, FieldRole, SchemaDef, TrainingExample};
