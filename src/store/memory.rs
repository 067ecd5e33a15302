//! In-memory node source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::NodeSource;
use crate::error::Result;
use crate::model::{normalize_oid, Node};

/// A [`NodeSource`] backed by a plain map.
///
/// Useful for exercising resolution and table logic without a database, and
/// for callers that already hold a parsed module in memory.
#[derive(Debug, Default)]
pub struct MemoryNodes {
    nodes: HashMap<String, Node>,
    generation: AtomicU64,
}

impl MemoryNodes {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node, keyed by its normalized OID.
    pub fn insert(&mut self, mut node: Node) {
        node.oid = normalize_oid(&node.oid);
        self.nodes.insert(node.oid.clone(), node);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove a node by OID.
    pub fn remove(&mut self, oid: &str) -> Option<Node> {
        let removed = self.nodes.remove(&normalize_oid(oid));
        if removed.is_some() {
            self.generation.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    /// Number of nodes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<Node> for MemoryNodes {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut map = Self::new();
        for node in iter {
            map.insert(node);
        }
        map
    }
}

impl NodeSource for MemoryNodes {
    fn node_exact(&self, oid: &str) -> Result<Option<Node>> {
        Ok(self.nodes.get(oid).cloned())
    }

    fn get_children(&self, oid: &str) -> Result<Vec<Node>> {
        let oid = normalize_oid(oid);
        Ok(self
            .nodes
            .values()
            .filter(|n| n.parent().map(normalize_oid).as_deref() == Some(oid.as_str()))
            .cloned()
            .collect())
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}
