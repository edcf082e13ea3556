//! Error types for the query-guard evaluation library.
//!
//! This module provides the error handling strategy using `thiserror`
//! for automatic error trait implementations. All errors in the library
//! are represented by the `QueryGuardError` enum.
//!
//! Note that a malformed or non-conforming query document is *not* an
//! error: document-quality problems degrade into result values with
//! `passed = false` and diagnostic data. Errors are reserved for caller
//! misuse and infrastructure failures.

use thiserror::Error;

/// The main error type for the query-guard library.
#[derive(Error, Debug)]
pub enum QueryGuardError {
    /// Error when `run_eval` is called with mismatched batch lengths.
    ///
    /// This is caller misuse, not a document-quality problem, and fails
    /// the call immediately rather than silently truncating the batch.
    #[error("Mismatch: {examples} examples vs {predictions} predictions")]
    BatchMismatch {
        /// Number of examples supplied
        examples: usize,
        /// Number of predictions supplied
        predictions: usize,
    },

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, QueryGuardError>`.
///
/// This is the standard `Result` type used throughout the library.
///
/// # Examples
///
/// ```rust,ignore
/// use query_guard::error::Result;
///
/// fn format_report() -> Result<String> {
///     // formatting logic here
///     Ok(String::new())
/// }
/// ```
pub type Result<T> = std::result::Result<T, QueryGuardError>;

impl QueryGuardError {
    /// Creates a new batch mismatch error from the two batch lengths.
    pub fn batch_mismatch(examples: usize, predictions: usize) -> Self {
        Self::BatchMismatch {
            examples,
            predictions,
        }
    }

    /// Creates a new configuration error with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_mismatch_error() {
        let err = QueryGuardError::batch_mismatch(3, 2);
        assert_eq!(err.to_string(), "Mismatch: 3 examples vs 2 predictions");
    }

    #[test]
    fn test_configuration_error() {
        let err = QueryGuardError::configuration("bad filter string");
        assert_eq!(err.to_string(), "Configuration error: bad filter string");
    }

    #[test]
    fn test_serialization_error_from() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = QueryGuardError::from(source);
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
