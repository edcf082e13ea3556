//! Logging utilities and configuration for query-guard.
//!
//! The evaluation core emits structured `tracing` events (per-example
//! debug lines, warnings on failed predictions and flagged generalization
//! gaps, batch summaries). This module provides the knobs for tuning that
//! output and a small setup helper for applications that want the library
//! to initialize their subscriber.

use tracing::Level;

/// Default cap on logged field values, in characters.
pub const DEFAULT_MAX_FIELD_LENGTH: usize = 256;

/// Logging configuration for query-guard.
///
/// Allows fine-grained control over logging behavior to keep overhead low
/// when evaluating large batches.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for query-guard components
    pub base_level: Level,
    /// Whether to log per-layer evaluation details
    pub log_layer_details: bool,
    /// Whether to log batch lifecycle events
    pub log_batch_operations: bool,
    /// Whether to include pass rates in log output
    pub log_metrics: bool,
    /// Maximum length for logged field values (to prevent huge logs)
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_layer_details: false,
            log_batch_operations: true,
            log_metrics: true,
            max_field_length: DEFAULT_MAX_FIELD_LENGTH,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_layer_details: true,
            log_batch_operations: true,
            log_metrics: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_layer_details: false,
            log_batch_operations: false,
            log_metrics: false,
            max_field_length: 128,
        }
    }

    /// Creates a balanced configuration suitable for most use cases.
    pub fn balanced() -> Self {
        Self::default()
    }
}

/// Truncates a string to the maximum field length if needed.
///
/// Counts characters rather than bytes so truncation never splits a
/// multi-byte character.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.chars().count() <= max_length {
        value.to_string()
    } else {
        let truncated: String = value.chars().take(max_length).collect();
        format!("{truncated}...(truncated)")
    }
}

/// Utilities for setting up structured logging with `tracing-subscriber`.
pub mod setup {
    use crate::error::{QueryGuardError, Result};
    use tracing::Level;

    /// Configuration for query-guard's logging setup.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Log level for query-guard components specifically
        pub guard_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                guard_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                guard_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for query-guard components.
        pub fn with_guard_level(mut self, level: Level) -> Self {
            self.guard_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},query_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.guard_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Initializes structured logging for the current process.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use query_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development()).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| {
                QueryGuardError::configuration(format!("Failed to initialize logging: {e}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, Level::INFO);
        assert!(!config.log_layer_details);
        assert!(config.log_batch_operations);
        assert!(config.log_metrics);
        assert_eq!(config.max_field_length, DEFAULT_MAX_FIELD_LENGTH);
    }

    #[test]
    fn test_log_config_verbose() {
        let config = LogConfig::verbose();
        assert_eq!(config.base_level, Level::DEBUG);
        assert!(config.log_layer_details);
        assert_eq!(config.max_field_length, 1024);
    }

    #[test]
    fn test_log_config_production() {
        let config = LogConfig::production();
        assert_eq!(config.base_level, Level::WARN);
        assert!(!config.log_batch_operations);
        assert_eq!(config.max_field_length, 128);
    }

    #[test]
    fn test_truncate_field() {
        let short_text = "hello";
        assert_eq!(truncate_field(short_text, 10), "hello");

        let long_text = "this is a very long text that should be truncated";
        assert_eq!(truncate_field(long_text, 10), "this is a ...(truncated)");
    }

    #[test]
    fn test_truncate_field_multibyte() {
        let text = "αβγδε";
        assert_eq!(truncate_field(text, 3), "αβγ...(truncated)");
        assert_eq!(truncate_field(text, 5), "αβγδε");
    }

    #[test]
    fn test_env_filter_string() {
        let config = setup::LoggingConfig::default();
        assert_eq!(config.env_filter(), "info,query_guard=debug");

        let config = setup::LoggingConfig::default().with_env_filter("warn");
        assert_eq!(config.env_filter(), "warn");
    }
}
