//! Persistent storage for MIB nodes, modules and bookmarks.
//!
//! [`MibStore`] is the SQLite-backed store. Resolution and table
//! reconstruction only need read access to nodes, which they reach through
//! the [`NodeSource`] trait so they can also run against the in-memory
//! [`MemoryNodes`] map.
//!
//! # Schema
//!
//! ```sql
//! modules(id, name UNIQUE, file_path, <stats columns>, missing_imports, loaded_at)
//! nodes(oid PRIMARY KEY, name, kind, parent_oid, syntax, access, status,
//!       description, module_id REFERENCES modules ON DELETE CASCADE)
//! bookmark_folders(id, name, parent_id REFERENCES bookmark_folders ON DELETE CASCADE, created_at)
//! bookmarks(oid PRIMARY KEY, folder_id REFERENCES bookmark_folders ON DELETE CASCADE, created_at)
//! ```

mod bookmarks;
mod memory;
mod modules;
mod nodes;
mod schema;
mod sqlite;

pub use memory::MemoryNodes;
pub use sqlite::MibStore;

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{normalize_oid, strip_instance_suffix, trim_last_segment, Node};

/// Read access to MIB nodes.
///
/// Implementors provide exact OID lookup and child listing; instance-suffix
/// tolerance and ancestor walks are derived from those.
pub trait NodeSource {
    /// Look up a node by its exact, normalized OID.
    fn node_exact(&self, oid: &str) -> Result<Option<Node>>;

    /// Direct children of a node, in no particular order.
    fn get_children(&self, oid: &str) -> Result<Vec<Node>>;

    /// Counter bumped whenever the node set changes.
    ///
    /// Caches layered over a source compare this value to detect staleness.
    /// Sources that never change may keep the default.
    fn generation(&self) -> u64 {
        0
    }

    /// Look up a node, tolerating a single trailing `.0` instance suffix.
    fn find_node(&self, oid: &str) -> Result<Option<Node>> {
        let oid = normalize_oid(oid);
        if oid.is_empty() {
            return Ok(None);
        }
        if let Some(node) = self.node_exact(&oid)? {
            return Ok(Some(node));
        }
        match strip_instance_suffix(&oid) {
            Some(stripped) => self.node_exact(stripped),
            None => Ok(None),
        }
    }

    /// The node and its loaded ancestors, nearest first.
    ///
    /// The walk follows `parent_oid` links, so it reflects import structure
    /// rather than OID arithmetic. For an OID that is not itself loaded, the
    /// walk starts at its longest loaded prefix. It stops at the first missing
    /// parent or at a revisited OID.
    fn get_node_ancestors(&self, oid: &str) -> Result<Vec<Node>> {
        let oid = normalize_oid(oid);
        let mut start = None;
        let mut probe = Some(oid.as_str());
        while let Some(current) = probe {
            if let Some(node) = self.node_exact(current)? {
                start = Some(node);
                break;
            }
            probe = trim_last_segment(current);
        }

        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = start;
        while let Some(node) = next {
            if !seen.insert(node.oid.clone()) {
                break;
            }
            next = match node.parent() {
                Some(parent) => self.node_exact(&normalize_oid(parent))?,
                None => None,
            };
            chain.push(node);
        }
        Ok(chain)
    }
}

impl<T: NodeSource + ?Sized> NodeSource for &T {
    fn node_exact(&self, oid: &str) -> Result<Option<Node>> {
        (**self).node_exact(oid)
    }

    fn get_children(&self, oid: &str) -> Result<Vec<Node>> {
        (**self).get_children(oid)
    }

    fn generation(&self) -> u64 {
        (**self).generation()
    }

    fn get_node_ancestors(&self, oid: &str) -> Result<Vec<Node>> {
        (**self).get_node_ancestors(oid)
    }
}

impl<T: NodeSource + ?Sized> NodeSource for Arc<T> {
    fn node_exact(&self, oid: &str) -> Result<Option<Node>> {
        (**self).node_exact(oid)
    }

    fn get_children(&self, oid: &str) -> Result<Vec<Node>> {
        (**self).get_children(oid)
    }

    fn generation(&self) -> u64 {
        (**self).generation()
    }

    fn get_node_ancestors(&self, oid: &str) -> Result<Vec<Node>> {
        (**self).get_node_ancestors(oid)
    }
}
