//! Table schema discovery.

use serde::Serialize;

use crate::error::{MibError, OptionContext, Result};
use crate::model::{compare_oids, normalize_oid, Node, NodeKind};
use crate::store::NodeSource;

/// The table, row and column nodes that make up one conceptual table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub table: Node,
    pub row: Node,
    /// Sorted by OID
    pub columns: Vec<Node>,
}

fn parent_of<S: NodeSource + ?Sized>(
    source: &S,
    node: &Node,
    expected: NodeKind,
    entity: &'static str,
) -> Result<Node> {
    let parent_oid = node.parent().map(normalize_oid).or_not_found(entity, &node.oid)?;
    let parent = source.node_exact(&parent_oid)?.or_not_found(entity, &parent_oid)?;
    if parent.kind != expected {
        return Err(MibError::not_found(
            entity,
            format!("{} (parent of {} is a {})", parent_oid, node.oid, parent.kind),
        ));
    }
    Ok(parent)
}

fn children_of_kind<S: NodeSource + ?Sized>(
    source: &S,
    oid: &str,
    kind: &NodeKind,
) -> Result<Vec<Node>> {
    let mut children: Vec<Node> = source
        .get_children(oid)?
        .into_iter()
        .filter(|child| &child.kind == kind)
        .collect();
    children.sort_by(|a, b| compare_oids(&a.oid, &b.oid));
    Ok(children)
}

fn row_of_table<S: NodeSource + ?Sized>(source: &S, table: &Node) -> Result<Node> {
    let mut rows = children_of_kind(source, &table.oid, &NodeKind::Row)?;
    if rows.len() > 1 {
        tracing::warn!(
            table = %table.name,
            rows = rows.len(),
            "table has more than one row node, using the first"
        );
    }
    if rows.is_empty() {
        return Err(MibError::not_found("table row", &table.oid));
    }
    Ok(rows.swap_remove(0))
}

/// Recover the table, row and columns from any of the three tabular nodes.
///
/// A table is followed down to its row child and the row's columns; a row or
/// column is followed up through parent links. A missing row, an empty column
/// set, or a broken parent link is a `NotFound` error. Non-tabular nodes are
/// rejected as `InvalidInput`.
pub fn resolve_table_schema<S: NodeSource + ?Sized>(source: &S, node: &Node) -> Result<TableSchema> {
    let (table, row) = match node.kind {
        NodeKind::Table => {
            let row = row_of_table(source, node)?;
            (node.clone(), row)
        }
        NodeKind::Row => {
            let table = parent_of(source, node, NodeKind::Table, "table")?;
            (table, node.clone())
        }
        NodeKind::Column => {
            let row = parent_of(source, node, NodeKind::Row, "table row")?;
            let table = parent_of(source, &row, NodeKind::Table, "table")?;
            (table, row)
        }
        ref other => {
            return Err(MibError::invalid_input(format!(
                "{} ({}) is a {other}, not a table, row or column",
                node.name, node.oid
            )))
        }
    };

    let columns = children_of_kind(source, &row.oid, &NodeKind::Column)?;
    if columns.is_empty() {
        return Err(MibError::not_found("table columns", &row.oid));
    }

    tracing::debug!(
        table = %table.name,
        row = %row.name,
        columns = columns.len(),
        "resolved table schema"
    );
    Ok(TableSchema { table, row, columns })
}

/// Look up `oid` and resolve the table schema around it.
pub fn resolve_table_schema_for_oid<S: NodeSource + ?Sized>(
    source: &S,
    oid: &str,
) -> Result<TableSchema> {
    let node = source.find_node(oid)?.or_not_found("node", oid)?;
    resolve_table_schema(source, &node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryNodes;

    fn if_table() -> MemoryNodes {
        [
            Node::new("1.3.6.1.2.1.2.2", "ifTable", NodeKind::Table),
            Node::new("1.3.6.1.2.1.2.2.1", "ifEntry", NodeKind::Row).with_parent("1.3.6.1.2.1.2.2"),
            Node::new("1.3.6.1.2.1.2.2.1.10", "ifInOctets", NodeKind::Column)
                .with_parent("1.3.6.1.2.1.2.2.1"),
            Node::new("1.3.6.1.2.1.2.2.1.2", "ifDescr", NodeKind::Column)
                .with_parent("1.3.6.1.2.1.2.2.1"),
            Node::new("1.3.6.1.2.1.2.2.1.1", "ifIndex", NodeKind::Column)
                .with_parent("1.3.6.1.2.1.2.2.1"),
        ]
        .into_iter()
        .collect()
    }

    fn names(schema: &TableSchema) -> Vec<&str> {
        schema.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_from_each_tabular_kind() {
        let source = if_table();
        for oid in ["1.3.6.1.2.1.2.2", "1.3.6.1.2.1.2.2.1", "1.3.6.1.2.1.2.2.1.2"] {
            let schema = resolve_table_schema_for_oid(&source, oid).unwrap();
            assert_eq!(schema.table.name, "ifTable");
            assert_eq!(schema.row.name, "ifEntry");
            assert_eq!(names(&schema), vec!["ifIndex", "ifDescr", "ifInOctets"]);
        }
    }

    #[test]
    fn test_table_without_row() {
        let source: MemoryNodes = [Node::new("1.2", "emptyTable", NodeKind::Table)]
            .into_iter()
            .collect();
        let err = resolve_table_schema_for_oid(&source, "1.2").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_row_without_columns() {
        let source: MemoryNodes = [
            Node::new("1.2", "fooTable", NodeKind::Table),
            Node::new("1.2.1", "fooEntry", NodeKind::Row).with_parent("1.2"),
        ]
        .into_iter()
        .collect();
        assert!(resolve_table_schema_for_oid(&source, "1.2")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_broken_parent_link() {
        let source: MemoryNodes = [Node::new("1.2.1.1", "orphanCol", NodeKind::Column)
            .with_parent("1.2.1")]
        .into_iter()
        .collect();
        assert!(resolve_table_schema_for_oid(&source, "1.2.1.1")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_scalar_is_invalid_input() {
        let source: MemoryNodes = [Node::new("1.3.6.1.2.1.1.5", "sysName", NodeKind::Scalar)]
            .into_iter()
            .collect();
        let err = resolve_table_schema_for_oid(&source, "1.3.6.1.2.1.1.5.0").unwrap_err();
        assert!(matches!(err, MibError::InvalidInput(_)));
    }
}
