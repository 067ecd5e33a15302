//! Shared output helpers for command handlers.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::model::{Node, TreeNode};

/// Write a value as pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

/// One-line summary of a node: `oid  name  (kind)`.
#[must_use]
pub fn node_line(node: &Node) -> String {
    let name = if node.name.is_empty() { "-" } else { &node.name };
    format!("{}  {}  ({})", node.oid, name, node.kind)
}

/// Full text description of a node.
pub fn write_node_details(out: &mut dyn Write, node: &Node) -> Result<()> {
    writeln!(out, "{}", node_line(node))?;
    let fields = [
        ("module", node.module.as_str()),
        ("parent", node.parent().unwrap_or("")),
        ("syntax", node.syntax.as_str()),
        ("access", node.access.as_str()),
        ("status", node.status.as_str()),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            writeln!(out, "  {label:<8} {value}")?;
        }
    }
    if !node.description.is_empty() {
        writeln!(out, "  {}", node.description.trim())?;
    }
    Ok(())
}

/// Render a forest as an indented outline.
#[must_use]
pub fn render_tree(roots: &[TreeNode]) -> String {
    let mut text = String::new();
    for root in roots {
        render_subtree(root, 0, &mut text);
    }
    text
}

fn render_subtree(tree: &TreeNode, depth: usize, text: &mut String) {
    text.push_str(&"  ".repeat(depth));
    text.push_str(&node_line(&tree.node));
    text.push('\n');
    for child in &tree.children {
        render_subtree(child, depth + 1, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{build_tree, NodeKind};

    #[test]
    fn test_render_tree_indents_children() {
        let roots = build_tree(vec![
            Node::new("1.3.6.1.2.1.1", "system", NodeKind::Node),
            Node::new("1.3.6.1.2.1.1.5", "sysName", NodeKind::Scalar).with_parent("1.3.6.1.2.1.1"),
        ]);
        assert_eq!(
            render_tree(&roots),
            "1.3.6.1.2.1.1  system  (node)\n  1.3.6.1.2.1.1.5  sysName  (scalar)\n"
        );
    }

    #[test]
    fn test_node_details_skip_empty_fields() {
        let node = Node::new("1.3.6.1.2.1.1.5", "sysName", NodeKind::Scalar)
            .with_syntax("DisplayString");
        let mut buf = Vec::new();
        write_node_details(&mut buf, &node).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("syntax   DisplayString"));
        assert!(!text.contains("access"));
    }
}
