//! Configuration for mib-tools.
//!
//! Settings come from, in increasing precedence: built-in defaults, a YAML
//! config file, and CLI flags.
//!
//! ```rust,ignore
//! use mib_tools::config::{load_or_default, AppConfig};
//!
//! let (config, loaded_from) = load_or_default(None);
//! let db = config.store.database_path();
//! ```
//!
//! # Configuration File
//!
//! Place a `.mib-tools.yaml` file in the working directory or
//! `~/.config/mib-tools/`:
//!
//! ```yaml
//! store:
//!   path: /var/lib/mib-tools/mib.db
//!   busy_timeout_ms: 5000
//! resolver:
//!   invalidate_on_module_change: true
//! output:
//!   format: json
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    default_database_path, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_SEARCH_LIMIT,
};
pub use types::{
    AppConfig, AppConfigBuilder, OutputConfig, OutputFormat, ResolverConfig, StoreConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// JSON Schema for the config file format, for editor validation.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        assert!(schema.contains("\"store\""));
        assert!(schema.contains("invalidate_on_module_change"));
    }
}
