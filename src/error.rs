//! Unified error types for mib-tools.
//!
//! Store operations return [`MibError`] values rather than panicking. Name
//! resolution and value decoding are advisory and never surface "not found"
//! conditions as errors; they degrade to empty labels or raw values instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mib-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MibError {
    /// A node, module, folder or table component is absent
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Duplicate sibling folder name, or a folder move that would create a cycle
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Blank required field, malformed OID, unsupported syntax
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Underlying store failure, wrapped with the failing operation and key
    #[error("Storage failure: {context}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenient Result type for mib-tools operations
pub type Result<T> = std::result::Result<T, MibError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl MibError {
    /// Create a not-found error for the given entity kind and key
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a storage error with context
    pub fn storage(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error reports a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error reports a conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<rusqlite::Error> for MibError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage {
            context: String::new(),
            source: err,
        }
    }
}

impl From<std::io::Error> for MibError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for MibError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outward, so a failure deep in the store reads like
/// `"deleting module IF-MIB: removing nodes"`.
///
/// ```ignore
/// use mib_tools::error::ErrorContext;
///
/// conn.execute("DELETE FROM nodes WHERE module_id = ?1", [id])
///     .with_context(|| format!("removing nodes of module {name}"))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<MibError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Entity-shaped errors (`NotFound`) keep their key untouched so callers can
/// still match on them.
fn add_context_to_error(err: MibError, new_ctx: &str) -> MibError {
    match err {
        MibError::Storage {
            context: existing,
            source,
        } => MibError::Storage {
            context: chain_context(new_ctx, &existing),
            source,
        },
        MibError::Io {
            path,
            message,
            source,
        } => MibError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        MibError::Json(msg) => MibError::Json(chain_context(new_ctx, &msg)),
        MibError::Config(msg) => MibError::Config(chain_context(new_ctx, &msg)),
        MibError::InvalidInput(msg) => MibError::InvalidInput(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to not-found errors.
pub trait OptionContext<T> {
    /// Convert None to a `NotFound` error for the given entity and key.
    fn or_not_found(self, entity: &'static str, key: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn or_not_found(self, entity: &'static str, key: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| MibError::not_found(entity, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MibError::not_found("module", "IF-MIB");
        assert_eq!(err.to_string(), "module not found: IF-MIB");
        assert!(err.is_not_found());

        let err = MibError::conflict("folder 'Core' already exists");
        assert!(err.to_string().contains("Core"));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_storage_context_chaining() {
        fn inner() -> Result<()> {
            Err(rusqlite::Error::QueryReturnedNoRows).context("selecting node 1.3.6.1")
        }

        fn outer() -> Result<()> {
            inner().context("resolving ancestors")
        }

        match outer() {
            Err(MibError::Storage { context, .. }) => {
                assert_eq!(context, "resolving ancestors: selecting node 1.3.6.1");
            }
            other => panic!("Expected Storage error, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_keeps_key_under_context() {
        let err: Result<()> = Err(MibError::not_found("folder", "7"));
        match err.context("moving folder") {
            Err(MibError::NotFound { entity, key }) => {
                assert_eq!(entity, "folder");
                assert_eq!(key, "7");
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(MibError::invalid_input("blank"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let found: Option<i32> = Some(42);
        assert_eq!(found.or_not_found("node", "1.3").unwrap(), 42);

        let missing: Option<i32> = None;
        match missing.or_not_found("node", "1.3.6") {
            Err(MibError::NotFound { entity, key }) => {
                assert_eq!(entity, "node");
                assert_eq!(key, "1.3.6");
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
