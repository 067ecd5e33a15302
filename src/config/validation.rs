//! Configuration validation for mib-tools.

use super::types::{AppConfig, OutputConfig, StoreConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.store.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for StoreConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref path) = self.path {
            if path.as_os_str().is_empty() {
                errors.push(ConfigError {
                    field: "store.path".to_string(),
                    message: "Database path must not be empty".to_string(),
                });
            } else if path.is_dir() {
                errors.push(ConfigError {
                    field: "store.path".to_string(),
                    message: format!("{} is a directory, expected a file", path.display()),
                });
            }
        }

        if self.busy_timeout_ms > 600_000 {
            errors.push(ConfigError {
                field: "store.busy_timeout_ms".to_string(),
                message: format!(
                    "Busy timeout must be at most 600000 ms, got {}",
                    self.busy_timeout_ms
                ),
            });
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.search_limit == 0 {
            errors.push(ConfigError {
                field: "output.search_limit".to_string(),
                message: "Search limit must be at least 1".to_string(),
            });
        }
        errors
    }
}
