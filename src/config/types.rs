//! Configuration types for mib-tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{default_database_path, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_SEARCH_LIMIT};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Database location and connection settings
    pub store: StoreConfig,
    /// Name resolution cache behavior
    pub resolver: ResolverConfig,
    /// Output format and limits
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the database path.
    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store.path = Some(path.into());
        self
    }

    /// Set the SQLite busy timeout.
    pub const fn busy_timeout_ms(mut self, ms: u64) -> Self {
        self.config.store.busy_timeout_ms = ms;
        self
    }

    /// Enable or disable cache invalidation on module changes.
    pub const fn invalidate_on_module_change(mut self, enabled: bool) -> Self {
        self.config.resolver.invalidate_on_module_change = enabled;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section types
// ============================================================================

/// SQLite store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; defaults to `<data dir>/mib-tools/mib.db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// How long to wait on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// The configured path, or the default data-directory location.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_database_path)
    }
}

/// Resolution cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ResolverConfig {
    /// Drop cached labels and nodes when modules are loaded or deleted
    pub invalidate_on_module_change: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            invalidate_on_module_change: true,
        }
    }
}

/// Output format for CLI commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Maximum number of search results
    pub search_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .database("/tmp/mib.db")
            .busy_timeout_ms(250)
            .invalidate_on_module_change(false)
            .output_format(OutputFormat::Json)
            .build();

        assert_eq!(config.store.database_path(), PathBuf::from("/tmp/mib.db"));
        assert_eq!(config.store.busy_timeout_ms, 250);
        assert!(!config.resolver.invalidate_on_module_change);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("output:\n  format: json\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.search_limit, DEFAULT_SEARCH_LIMIT);
        assert!(config.resolver.invalidate_on_module_change);
    }
}
