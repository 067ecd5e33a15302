//! Configuration file loading and discovery.
//!
//! Config files are YAML. CLI flags are layered on top with [`AppConfig::merge`].

use super::defaults::{APP_DIR_NAME, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_SEARCH_LIMIT};
use super::types::{AppConfig, OutputFormat};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Config file names, in lookup order within each directory.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".mib-tools.yaml",
    ".mib-tools.yml",
    "mib-tools.yaml",
    "mib-tools.yml",
];

/// Locate a config file.
///
/// Search order:
/// 1. Explicit path if it exists
/// 2. Current directory
/// 3. User config directory (`~/.config/mib-tools/`)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    let search_dirs = [
        std::env::current_dir().ok(),
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME)),
        dirs::home_dir(),
    ];

    search_dirs
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Load the discovered config file, or defaults when none is found or it
/// fails to load.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    let Some(path) = discover_config_file(explicit_path) else {
        return (AppConfig::default(), None);
    };

    match load_config_file(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            (config, Some(path))
        }
        Err(e) => {
            tracing::warn!("Failed to load config from {}: {}", path.display(), e);
            (AppConfig::default(), None)
        }
    }
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(&mut self, other: &Self) {
        if other.store.path.is_some() {
            self.store.path.clone_from(&other.store.path);
        }
        if other.store.busy_timeout_ms != DEFAULT_BUSY_TIMEOUT_MS {
            self.store.busy_timeout_ms = other.store.busy_timeout_ms;
        }

        if !other.resolver.invalidate_on_module_change {
            self.resolver.invalidate_on_module_change = false;
        }

        if other.output.format != OutputFormat::Text {
            self.output.format = other.output.format;
        }
        if other.output.search_limit != DEFAULT_SEARCH_LIMIT {
            self.output.search_limit = other.output.search_limit;
        }
    }

    /// Load from file and merge CLI overrides on top.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        "# mib-tools configuration\n\
         # Place this file at .mib-tools.yaml or ~/.config/mib-tools/mib-tools.yaml\n\n{}",
        serde_yaml::to_string(&AppConfig::default()).unwrap_or_default()
    )
}
