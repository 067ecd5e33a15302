//! SQL schema for the MIB store.

use rusqlite::Connection;

use crate::error::{ErrorContext, Result};

/// Current schema version, recorded in `PRAGMA user_version`.
pub(crate) const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS modules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    file_path TEXT NOT NULL DEFAULT '',
    node_count INTEGER NOT NULL DEFAULT 0,
    scalar_count INTEGER NOT NULL DEFAULT 0,
    table_count INTEGER NOT NULL DEFAULT 0,
    column_count INTEGER NOT NULL DEFAULT 0,
    type_count INTEGER NOT NULL DEFAULT 0,
    skipped_nodes INTEGER NOT NULL DEFAULT 0,
    missing_imports TEXT NOT NULL DEFAULT '[]',
    loaded_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS nodes (
    oid TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    parent_oid TEXT,
    syntax TEXT NOT NULL DEFAULT '',
    access TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    module_id INTEGER NOT NULL REFERENCES modules(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent_oid);
CREATE INDEX IF NOT EXISTS idx_nodes_module ON nodes(module_id);
CREATE INDEX IF NOT EXISTS idx_nodes_name ON nodes(name);

CREATE TABLE IF NOT EXISTS bookmark_folders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    parent_id INTEGER REFERENCES bookmark_folders(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_folders_parent ON bookmark_folders(parent_id);

CREATE TABLE IF NOT EXISTS bookmarks (
    oid TEXT PRIMARY KEY,
    folder_id INTEGER REFERENCES bookmark_folders(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bookmarks_folder ON bookmarks(folder_id);
";

/// Enable foreign keys and create all tables.
pub(crate) fn init(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("enabling foreign keys")?;
    conn.execute_batch(SCHEMA).context("creating schema")?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)
        .context("recording schema version")?;
    Ok(())
}
