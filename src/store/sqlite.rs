//! SQLite-backed MIB store.

use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::schema;
use crate::config::StoreConfig;
use crate::error::{ErrorContext, MibError, Result};

/// SQLite store for modules, nodes and bookmarks.
///
/// Thread-safe via an internal Mutex (a SQLite `Connection` is not `Sync`).
/// Writes are expected to be rare (module load and delete); reads are
/// serialized through the same connection.
pub struct MibStore {
    conn: Mutex<Connection>,
    generation: AtomicU64,
}

impl MibStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &StoreConfig::default())
    }

    /// Open a store using the timeouts from `config`.
    pub fn open_with_config(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| MibError::io(parent, e))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("opening SQLite database at {}", path.display()))?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .context("setting busy timeout")?;
        tracing::debug!(path = %path.display(), "opened MIB store");
        Self::from_connection(conn)
    }

    /// Create an in-memory store (for testing and scratch sessions).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("creating in-memory SQLite database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            generation: AtomicU64::new(0),
        })
    }

    /// Acquire the connection.
    ///
    /// A panic while holding the lock leaves the connection usable (any open
    /// transaction was rolled back on drop), so poisoning is recovered.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that the node set changed.
    pub(crate) fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for MibStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MibStore")
            .field("generation", &self.current_generation())
            .finish_non_exhaustive()
    }
}

/// Current time as Unix milliseconds, the timestamp unit stored on disk.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Convert stored Unix milliseconds back to a UTC timestamp.
pub(crate) fn from_millis(ms: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
