//! Default values for mib-tools configuration.

use std::path::PathBuf;

/// Default SQLite busy timeout.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Default cap on search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 500;

/// File name of the database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "mib.db";

/// Application directory name under the platform data/config dirs.
pub const APP_DIR_NAME: &str = "mib-tools";

/// Default database location: `<data dir>/mib-tools/mib.db`, falling back to
/// the current directory when the platform has no data directory.
#[must_use]
pub fn default_database_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(DATABASE_FILE_NAME),
        |dir| dir.join(APP_DIR_NAME).join(DATABASE_FILE_NAME),
    )
}
