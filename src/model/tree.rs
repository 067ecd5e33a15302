//! Presentation trees built from flat node records.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::node::Node;
use super::oid::compare_oids;

/// A node together with its materialized children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: Node,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Total number of nodes in this subtree, including itself.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    /// Always false; a tree node contains at least itself.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first search for a descendant (or self) by OID.
    #[must_use]
    pub fn find(&self, oid: &str) -> Option<&TreeNode> {
        if self.node.oid == oid {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(oid))
    }
}

/// Build a forest from flat node records.
///
/// Nodes whose parent is absent from `nodes` become roots. Siblings are
/// ordered with [`compare_oids`]. A node reachable only through a parent
/// cycle is promoted to a root instead of being dropped.
#[must_use]
pub fn build_tree(nodes: Vec<Node>) -> Vec<TreeNode> {
    let known: HashSet<String> = nodes.iter().map(|n| n.oid.clone()).collect();

    let mut children_of: HashMap<String, Vec<Node>> = HashMap::new();
    let mut roots: Vec<Node> = Vec::new();
    for node in nodes {
        match node.parent() {
            Some(parent) if parent != node.oid && known.contains(parent) => {
                children_of.entry(parent.to_string()).or_default().push(node);
            }
            _ => roots.push(node),
        }
    }

    let mut forest: Vec<TreeNode> = Vec::with_capacity(roots.len());
    for root in roots {
        forest.push(attach(root, &mut children_of));
    }

    // Anything left over sits on a parent cycle; surface it as a root.
    while let Some(key) = children_of.keys().next().cloned() {
        if let Some(stranded) = children_of.remove(&key) {
            for node in stranded {
                forest.push(attach(node, &mut children_of));
            }
        }
    }

    forest.sort_by(|a, b| compare_oids(&a.node.oid, &b.node.oid));
    forest
}

fn attach(node: Node, children_of: &mut HashMap<String, Vec<Node>>) -> TreeNode {
    let mut children: Vec<TreeNode> = children_of
        .remove(&node.oid)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach(child, children_of))
        .collect();
    children.sort_by(|a, b| compare_oids(&a.node.oid, &b.node.oid));
    TreeNode { node, children }
}
