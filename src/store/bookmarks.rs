//! Bookmark folder hierarchy.
//!
//! Folders form a tree kept separate from the MIB tree. The store enforces
//! the tree shape: a folder can never be moved beneath itself or one of its
//! descendants, and sibling names are unique.

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

use super::sqlite::{from_millis, now_millis};
use super::MibStore;
use crate::error::{ErrorContext, MibError, OptionContext, Result};
use crate::model::{
    is_valid_oid, normalize_oid, BookmarkEntry, BookmarkFolder, FolderTree, NodeKind,
    ROOT_FOLDER_ID,
};

fn row_to_folder(row: &Row<'_>) -> rusqlite::Result<BookmarkFolder> {
    Ok(BookmarkFolder {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
        created_at: from_millis(row.get(3)?),
    })
}

fn row_to_bookmark(row: &Row<'_>) -> rusqlite::Result<BookmarkEntry> {
    let kind: Option<String> = row.get(4)?;
    Ok(BookmarkEntry {
        oid: row.get(0)?,
        folder_id: row.get(1)?,
        created_at: from_millis(row.get(2)?),
        name: row.get(3)?,
        node_kind: kind.and_then(|k| k.parse().ok()),
    })
}

fn load_folder(conn: &Connection, id: i64) -> Result<Option<BookmarkFolder>> {
    conn.query_row(
        "SELECT id, name, parent_id, created_at FROM bookmark_folders WHERE id = ?1",
        [id],
        row_to_folder,
    )
    .optional()
    .with_context(|| format!("loading bookmark folder {id}"))
}

fn require_folder(conn: &Connection, id: i64) -> Result<BookmarkFolder> {
    load_folder(conn, id)?.or_not_found("bookmark folder", id.to_string())
}

/// Check that no sibling under `parent_id` already uses `name`.
///
/// `exclude` skips the folder being renamed or moved.
fn ensure_unique_name(
    conn: &Connection,
    name: &str,
    parent_id: Option<i64>,
    exclude: Option<i64>,
) -> Result<()> {
    let clash: Option<i64> = conn
        .query_row(
            "SELECT id FROM bookmark_folders
             WHERE name = ?1 AND parent_id IS ?2 AND (?3 IS NULL OR id <> ?3)
             LIMIT 1",
            params![name, parent_id, exclude],
            |r| r.get(0),
        )
        .optional()
        .with_context(|| format!("checking sibling names for '{name}'"))?;

    match clash {
        Some(_) => Err(MibError::conflict(format!(
            "a folder named '{name}' already exists in {}",
            describe_parent(parent_id)
        ))),
        None => Ok(()),
    }
}

fn describe_parent(parent_id: Option<i64>) -> String {
    parent_id.map_or_else(|| "the root".to_string(), |id| format!("folder {id}"))
}

fn validate_folder_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MibError::invalid_input("folder name must not be blank"));
    }
    Ok(name)
}

/// IDs of `id` and every folder beneath it.
fn descendant_closure(conn: &Connection, id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare_cached(
            "WITH RECURSIVE subtree(id) AS (
                 SELECT id FROM bookmark_folders WHERE id = ?1
                 UNION
                 SELECT f.id FROM bookmark_folders f JOIN subtree s ON f.parent_id = s.id
             )
             SELECT id FROM subtree",
        )
        .with_context(|| format!("collecting descendants of folder {id}"))?;
    let ids = stmt
        .query_map([id], |r| r.get(0))
        .with_context(|| format!("collecting descendants of folder {id}"))?
        .collect::<rusqlite::Result<Vec<i64>>>()
        .context("reading descendant ids")?;
    Ok(ids)
}

impl MibStore {
    /// Create a folder under `parent_id` (`None` for the root).
    pub fn create_bookmark_folder(
        &self,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<BookmarkFolder> {
        let name = validate_folder_name(name)?;
        let conn = self.conn();
        if let Some(parent) = parent_id {
            require_folder(&conn, parent)?;
        }
        ensure_unique_name(&conn, name, parent_id, None)?;

        conn.execute(
            "INSERT INTO bookmark_folders (name, parent_id, created_at) VALUES (?1, ?2, ?3)",
            params![name, parent_id, now_millis()],
        )
        .with_context(|| format!("creating bookmark folder '{name}'"))?;
        let id = conn.last_insert_rowid();

        tracing::info!(id, name, ?parent_id, "created bookmark folder");
        require_folder(&conn, id)
    }

    /// Rename a folder, keeping sibling names unique within its parent.
    pub fn rename_bookmark_folder(&self, id: i64, new_name: &str) -> Result<BookmarkFolder> {
        let name = validate_folder_name(new_name)?;
        let conn = self.conn();
        let folder = require_folder(&conn, id)?;
        ensure_unique_name(&conn, name, folder.parent_id, Some(id))?;

        conn.execute(
            "UPDATE bookmark_folders SET name = ?2 WHERE id = ?1",
            params![id, name],
        )
        .with_context(|| format!("renaming bookmark folder {id}"))?;
        Ok(BookmarkFolder {
            name: name.to_string(),
            ..folder
        })
    }

    /// Move a folder beneath `new_parent_id` (`None` for the root).
    ///
    /// Moving a folder into itself or into one of its descendants is a
    /// `Conflict`. Moving to the current parent is accepted without change.
    pub fn move_bookmark_folder(&self, id: i64, new_parent_id: Option<i64>) -> Result<()> {
        if new_parent_id == Some(id) {
            return Err(MibError::conflict(format!(
                "folder {id} cannot be its own parent"
            )));
        }

        let conn = self.conn();
        let folder = require_folder(&conn, id)?;
        if folder.parent_id == new_parent_id {
            return Ok(());
        }

        if let Some(parent) = new_parent_id {
            require_folder(&conn, parent)?;
            if descendant_closure(&conn, id)?.contains(&parent) {
                return Err(MibError::conflict(format!(
                    "moving folder {id} under folder {parent} would create a cycle"
                )));
            }
        }
        ensure_unique_name(&conn, &folder.name, new_parent_id, Some(id))?;

        conn.execute(
            "UPDATE bookmark_folders SET parent_id = ?2 WHERE id = ?1",
            params![id, new_parent_id],
        )
        .with_context(|| format!("moving bookmark folder {id}"))?;
        tracing::info!(id, ?new_parent_id, "moved bookmark folder");
        Ok(())
    }

    /// Delete a folder with all of its subfolders and bookmarks.
    pub fn delete_bookmark_folder(&self, id: i64) -> Result<()> {
        let conn = self.conn();
        require_folder(&conn, id)?;
        conn.execute("DELETE FROM bookmark_folders WHERE id = ?1", [id])
            .with_context(|| format!("deleting bookmark folder {id}"))?;
        tracing::info!(id, "deleted bookmark folder");
        Ok(())
    }

    /// Bookmark an OID in `folder_id` (`None` for the root).
    ///
    /// An OID lives in at most one folder; bookmarking it again moves it.
    pub fn add_bookmark(&self, oid: &str, folder_id: Option<i64>) -> Result<()> {
        let oid = normalize_oid(oid);
        if !is_valid_oid(&oid) {
            return Err(MibError::invalid_input(format!("malformed OID '{oid}'")));
        }

        let conn = self.conn();
        if let Some(folder) = folder_id {
            require_folder(&conn, folder)?;
        }
        conn.execute(
            "INSERT INTO bookmarks (oid, folder_id, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(oid) DO UPDATE SET folder_id = excluded.folder_id",
            params![oid, folder_id, now_millis()],
        )
        .with_context(|| format!("saving bookmark {oid}"))?;
        tracing::debug!(oid = %oid, ?folder_id, "saved bookmark");
        Ok(())
    }

    /// Reassign a bookmark to another folder. Same as [`add_bookmark`](Self::add_bookmark).
    pub fn move_bookmark(&self, oid: &str, folder_id: Option<i64>) -> Result<()> {
        self.add_bookmark(oid, folder_id)
    }

    /// Remove a bookmark. Removing an unknown OID is not an error.
    pub fn remove_bookmark(&self, oid: &str) -> Result<()> {
        let oid = normalize_oid(oid);
        let conn = self.conn();
        conn.execute("DELETE FROM bookmarks WHERE oid = ?1", [&oid])
            .with_context(|| format!("removing bookmark {oid}"))?;
        Ok(())
    }

    /// Load the whole bookmark hierarchy under a synthetic root (`id = 0`).
    ///
    /// Folders are linked in creation order; folders whose parent is missing
    /// attach to the root. Bookmarks are attached newest first.
    pub fn get_bookmark_hierarchy(&self) -> Result<FolderTree> {
        let conn = self.conn();

        let folders = {
            let mut stmt = conn
                .prepare_cached(
                    "SELECT id, name, parent_id, created_at FROM bookmark_folders
                     ORDER BY created_at, id",
                )
                .context("loading bookmark folders")?;
            let rows = stmt
                .query_map([], row_to_folder)
                .context("loading bookmark folders")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("reading bookmark folders")?;
            rows
        };

        let bookmarks = {
            let mut stmt = conn
                .prepare_cached(
                    "SELECT b.oid, b.folder_id, b.created_at, n.name, n.kind
                     FROM bookmarks b LEFT JOIN nodes n ON n.oid = b.oid
                     ORDER BY b.created_at DESC, b.rowid DESC",
                )
                .context("loading bookmarks")?;
            let rows = stmt
                .query_map([], row_to_bookmark)
                .context("loading bookmarks")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("reading bookmarks")?;
            rows
        };
        drop(conn);

        Ok(assemble_hierarchy(folders, bookmarks))
    }
}

/// Link flat folder and bookmark rows into a tree under a synthetic root.
fn assemble_hierarchy(folders: Vec<BookmarkFolder>, bookmarks: Vec<BookmarkEntry>) -> FolderTree {
    let known: HashMap<i64, usize> = folders
        .iter()
        .enumerate()
        .map(|(idx, f)| (f.id, idx))
        .collect();

    let resolve = |id: Option<i64>| -> i64 {
        match id {
            Some(id) if known.contains_key(&id) => id,
            _ => ROOT_FOLDER_ID,
        }
    };

    let mut child_ids: HashMap<i64, Vec<i64>> = HashMap::new();
    for folder in &folders {
        let parent = resolve(folder.parent_id);
        let parent = if parent == folder.id { ROOT_FOLDER_ID } else { parent };
        child_ids.entry(parent).or_default().push(folder.id);
    }

    let mut attached: HashMap<i64, Vec<BookmarkEntry>> = HashMap::new();
    for bookmark in bookmarks {
        attached
            .entry(resolve(bookmark.folder_id))
            .or_default()
            .push(bookmark);
    }

    let mut by_id: HashMap<i64, BookmarkFolder> = folders.into_iter().map(|f| (f.id, f)).collect();
    let root = BookmarkFolder {
        id: ROOT_FOLDER_ID,
        name: String::new(),
        parent_id: None,
        created_at: chrono::DateTime::default(),
    };
    build_folder(root, &mut by_id, &child_ids, &mut attached)
}

fn build_folder(
    folder: BookmarkFolder,
    by_id: &mut HashMap<i64, BookmarkFolder>,
    child_ids: &HashMap<i64, Vec<i64>>,
    attached: &mut HashMap<i64, Vec<BookmarkEntry>>,
) -> FolderTree {
    let mut children = Vec::new();
    for id in child_ids.get(&folder.id).into_iter().flatten() {
        // Removing from `by_id` guarantees each folder is placed once.
        if let Some(child) = by_id.remove(id) {
            children.push(build_folder(child, by_id, child_ids, attached));
        }
    }
    let bookmarks = attached.remove(&folder.id).unwrap_or_default();
    FolderTree {
        folder,
        children,
        bookmarks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: i64, name: &str, parent_id: Option<i64>) -> BookmarkFolder {
        BookmarkFolder {
            id,
            name: name.to_string(),
            parent_id,
            created_at: from_millis(id),
        }
    }

    fn bookmark(oid: &str, folder_id: Option<i64>) -> BookmarkEntry {
        BookmarkEntry {
            oid: oid.to_string(),
            folder_id,
            created_at: from_millis(0),
            name: None,
            node_kind: Some(NodeKind::Scalar),
        }
    }

    #[test]
    fn test_assemble_links_children_and_orphans() {
        let tree = assemble_hierarchy(
            vec![
                folder(1, "Core", None),
                folder(2, "Interfaces", Some(1)),
                folder(3, "Lost", Some(99)),
            ],
            vec![bookmark("1.3.6.1.2.1.1.5", Some(2)), bookmark("1.3.6.1", None)],
        );

        assert!(tree.is_root());
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.folder_count(), 3);
        assert_eq!(tree.bookmark_count(), 2);
        assert_eq!(tree.bookmarks[0].oid, "1.3.6.1");

        let interfaces = tree.find(2).unwrap();
        assert_eq!(interfaces.bookmarks[0].display_kind().as_str(), "bookmark-scalar");
        assert_eq!(tree.find(3).unwrap().folder.name, "Lost");
    }

    #[test]
    fn test_assemble_bookmark_in_missing_folder_goes_to_root() {
        let tree = assemble_hierarchy(vec![], vec![bookmark("1.3", Some(42))]);
        assert_eq!(tree.bookmarks.len(), 1);
        assert_eq!(tree.kind(), NodeKind::BookmarkRoot);
    }
}
