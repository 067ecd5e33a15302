//! MIB node and module records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MibError;

/// Kind of a MIB tree entry.
///
/// The first six variants come from the MIB parser. The bookmark variants are
/// synthetic and only appear in presentation trees built from the bookmark
/// hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeKind {
    /// OBJECT IDENTIFIER assignment or identity without a value
    #[default]
    Node,
    /// Single-instance object, addressed as `oid.0`
    Scalar,
    /// SEQUENCE OF table object
    Table,
    /// Table entry (row template)
    Row,
    /// Column object beneath a row
    Column,
    /// Textual convention or type definition
    Type,
    /// Bookmarked OID whose node is not loaded
    Bookmark,
    /// Bookmark folder
    BookmarkFolder,
    /// Synthetic root of the bookmark hierarchy
    BookmarkRoot,
    /// Bookmarked OID of a known kind, rendered as `bookmark-<kind>`
    Bookmarked(Box<NodeKind>),
}

impl NodeKind {
    /// The canonical string tag.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            Self::Node => "node".into(),
            Self::Scalar => "scalar".into(),
            Self::Table => "table".into(),
            Self::Row => "row".into(),
            Self::Column => "column".into(),
            Self::Type => "type".into(),
            Self::Bookmark => "bookmark".into(),
            Self::BookmarkFolder => "bookmark-folder".into(),
            Self::BookmarkRoot => "bookmark-root".into(),
            Self::Bookmarked(inner) => format!("bookmark-{}", inner.as_str()),
        }
    }

    /// Wrap a MIB kind as its bookmark presentation variant.
    #[must_use]
    pub fn bookmarked(self) -> Self {
        if self.is_mib_object() {
            Self::Bookmarked(Box::new(self))
        } else {
            Self::Bookmark
        }
    }

    /// True for the six kinds produced by the MIB parser.
    #[must_use]
    pub const fn is_mib_object(&self) -> bool {
        matches!(
            self,
            Self::Node | Self::Scalar | Self::Table | Self::Row | Self::Column | Self::Type
        )
    }

    /// True for table, row and column kinds.
    #[must_use]
    pub const fn is_tabular(&self) -> bool {
        matches!(self, Self::Table | Self::Row | Self::Column)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = MibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "node" => Ok(Self::Node),
            "scalar" => Ok(Self::Scalar),
            "table" => Ok(Self::Table),
            "row" => Ok(Self::Row),
            "column" => Ok(Self::Column),
            "type" => Ok(Self::Type),
            "bookmark" => Ok(Self::Bookmark),
            "bookmark-folder" => Ok(Self::BookmarkFolder),
            "bookmark-root" => Ok(Self::BookmarkRoot),
            other => {
                let inner = other
                    .strip_prefix("bookmark-")
                    .ok_or_else(|| MibError::invalid_input(format!("unknown node kind '{s}'")))?;
                let inner: Self = inner.parse()?;
                if inner.is_mib_object() {
                    Ok(Self::Bookmarked(Box::new(inner)))
                } else {
                    Err(MibError::invalid_input(format!("unknown node kind '{s}'")))
                }
            }
        }
    }
}

impl TryFrom<String> for NodeKind {
    type Error = MibError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str()
    }
}

/// A MIB tree entry as produced by the MIB parser.
///
/// Records are flat: children are materialized separately by
/// [`build_tree`](crate::model::build_tree).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Canonical dotted-decimal OID
    pub oid: String,
    /// Symbolic name, unique within its module
    pub name: String,
    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// OID of the parent node, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_oid: Option<String>,
    /// Free-text SYNTAX clause
    pub syntax: String,
    pub access: String,
    pub status: String,
    pub description: String,
    /// Owning module name
    pub module: String,
}

impl Node {
    /// Create a node with the given OID, name and kind.
    pub fn new(oid: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Set the parent OID.
    #[must_use]
    pub fn with_parent(mut self, parent_oid: impl Into<String>) -> Self {
        self.parent_oid = Some(parent_oid.into());
        self
    }

    /// Set the SYNTAX text.
    #[must_use]
    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = syntax.into();
        self
    }

    /// Set the owning module name.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Parent OID, treating an empty string as absent.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent_oid.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Per-module node counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleStats {
    pub node_count: u32,
    pub scalar_count: u32,
    pub table_count: u32,
    pub column_count: u32,
    pub type_count: u32,
    /// Definitions the parser could not place in the tree
    pub skipped_nodes: u32,
}

impl ModuleStats {
    /// Tally the kinds of a batch of nodes. `skipped_nodes` is left at zero.
    #[must_use]
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut stats = Self::default();
        for node in nodes {
            stats.node_count += 1;
            match node.kind {
                NodeKind::Scalar => stats.scalar_count += 1,
                NodeKind::Table => stats.table_count += 1,
                NodeKind::Column => stats.column_count += 1,
                NodeKind::Type => stats.type_count += 1,
                _ => {}
            }
        }
        stats
    }
}

/// Summary of one loaded MIB module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: i64,
    pub name: String,
    pub file_path: String,
    pub stats: ModuleStats,
    /// Imported module names that could not be resolved at load time
    pub missing_imports: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}
