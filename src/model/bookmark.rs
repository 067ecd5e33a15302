//! Bookmark folders and entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::node::NodeKind;

/// ID of the synthetic hierarchy root.
pub const ROOT_FOLDER_ID: i64 = 0;

/// A folder in the bookmark hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFolder {
    /// Store-assigned, always > 0 for persisted folders
    pub id: i64,
    pub name: String,
    /// `None` places the folder at the root
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A bookmarked OID and the folder it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    pub oid: String,
    /// `None` places the bookmark at the root
    pub folder_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// Name of the bookmarked node, when it is loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kind of the bookmarked node, when it is loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_kind: Option<NodeKind>,
}

impl BookmarkEntry {
    /// Presentation kind: `bookmark-<kind>` when the node is known.
    #[must_use]
    pub fn display_kind(&self) -> NodeKind {
        self.node_kind
            .clone()
            .map_or(NodeKind::Bookmark, NodeKind::bookmarked)
    }

    /// Label shown in hierarchy views: the node name, else the OID.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.oid)
    }
}

/// A folder with its subfolders and bookmarks attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderTree {
    pub folder: BookmarkFolder,
    pub children: Vec<FolderTree>,
    pub bookmarks: Vec<BookmarkEntry>,
}

impl FolderTree {
    /// Whether this is the synthetic root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.folder.id == ROOT_FOLDER_ID
    }

    /// Presentation kind of this folder.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        if self.is_root() {
            NodeKind::BookmarkRoot
        } else {
            NodeKind::BookmarkFolder
        }
    }

    /// Number of folders in this subtree, excluding the synthetic root.
    #[must_use]
    pub fn folder_count(&self) -> usize {
        let own = usize::from(!self.is_root());
        own + self.children.iter().map(FolderTree::folder_count).sum::<usize>()
    }

    /// Number of bookmarks in this subtree.
    #[must_use]
    pub fn bookmark_count(&self) -> usize {
        self.bookmarks.len()
            + self
                .children
                .iter()
                .map(FolderTree::bookmark_count)
                .sum::<usize>()
    }

    /// Find a folder by ID anywhere in this subtree.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&FolderTree> {
        if self.folder.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// Render a hierarchy as indented text, one line per folder or bookmark.
///
/// ```text
/// /
///   Core/
///     sysName (1.3.6.1.2.1.1.5)
///   1.3.6.1.4.1.9
/// ```
#[must_use]
pub fn render_hierarchy(root: &FolderTree) -> String {
    let mut out = String::new();
    render_into(root, 0, &mut out);
    out
}

fn render_into(tree: &FolderTree, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if tree.is_root() {
        out.push_str("/\n");
    } else {
        out.push_str(&format!("{indent}{}/\n", tree.folder.name));
    }
    for child in &tree.children {
        render_into(child, depth + 1, out);
    }
    let inner = "  ".repeat(depth + 1);
    for bookmark in &tree.bookmarks {
        match &bookmark.name {
            Some(name) => out.push_str(&format!("{inner}{name} ({})\n", bookmark.oid)),
            None => out.push_str(&format!("{inner}{}\n", bookmark.oid)),
        }
    }
}
