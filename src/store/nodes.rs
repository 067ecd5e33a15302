//! Node persistence and hierarchy queries.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{MibStore, NodeSource};
use crate::error::{ErrorContext, MibError, OptionContext, Result};
use crate::model::{build_tree, compare_oids, is_valid_oid, normalize_oid, Node, TreeNode};

const NODE_COLUMNS: &str = "n.oid, n.name, n.kind, n.parent_oid, n.syntax, n.access, n.status, \
                            n.description, m.name";

/// Default cap on search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 500;

/// Map a joined `nodes`/`modules` row to a [`Node`].
pub(crate) fn row_to_node(row: &Row<'_>) -> rusqlite::Result<Node> {
    let kind: String = row.get(2)?;
    Ok(Node {
        oid: row.get(0)?,
        name: row.get(1)?,
        kind: kind.parse().unwrap_or_default(),
        parent_oid: row.get(3)?,
        syntax: row.get(4)?,
        access: row.get(5)?,
        status: row.get(6)?,
        description: row.get(7)?,
        module: row.get(8)?,
    })
}

fn select_nodes(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> rusqlite::Result<Vec<Node>> {
    let sql = format!(
        "SELECT {NODE_COLUMNS} FROM nodes n JOIN modules m ON m.id = n.module_id {filter}"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let nodes = stmt
        .query_map(args, row_to_node)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(nodes)
}

pub(super) fn insert_node(conn: &Connection, node: &Node, module_id: i64) -> Result<()> {
    let oid = normalize_oid(&node.oid);
    if !is_valid_oid(&oid) {
        return Err(MibError::invalid_input(format!(
            "malformed OID '{}' for node '{}'",
            node.oid, node.name
        )));
    }
    let parent = node.parent().map(normalize_oid);
    conn.execute(
        "INSERT OR REPLACE INTO nodes
             (oid, name, kind, parent_oid, syntax, access, status, description, module_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            oid,
            node.name,
            node.kind.as_str(),
            parent,
            node.syntax,
            node.access,
            node.status,
            node.description,
            module_id,
        ],
    )
    .with_context(|| format!("saving node {oid}"))?;
    Ok(())
}

fn ensure_module_id(conn: &Connection, module_id: i64) -> Result<()> {
    let exists: Option<i64> = conn
        .query_row("SELECT id FROM modules WHERE id = ?1", [module_id], |r| r.get(0))
        .optional()
        .with_context(|| format!("checking module id {module_id}"))?;
    exists.map(|_| ()).or_not_found("module", module_id.to_string())
}

impl MibStore {
    /// Insert or replace a node by OID, tagging it with its owning module.
    pub fn save_node(&self, node: &Node, module_id: i64) -> Result<()> {
        let conn = self.conn();
        ensure_module_id(&conn, module_id)?;
        insert_node(&conn, node, module_id)?;
        drop(conn);
        self.bump_generation();
        Ok(())
    }

    /// Insert or replace a batch of nodes in one transaction.
    ///
    /// Either every node is written or none is.
    pub fn save_nodes(&self, nodes: &[Node], module_id: i64) -> Result<usize> {
        let mut conn = self.conn();
        ensure_module_id(&conn, module_id)?;
        let tx = conn
            .transaction()
            .with_context(|| format!("starting node batch for module id {module_id}"))?;
        for node in nodes {
            insert_node(&tx, node, module_id)?;
        }
        tx.commit()
            .with_context(|| format!("committing node batch for module id {module_id}"))?;
        drop(conn);

        self.bump_generation();
        tracing::debug!(module_id, count = nodes.len(), "saved node batch");
        Ok(nodes.len())
    }

    /// Look up a node.
    ///
    /// Input is normalized; if the exact OID is absent and it ends in a single
    /// `.0` instance marker, the stripped OID is tried once.
    pub fn get_node(&self, oid: &str) -> Result<Node> {
        self.find_node(oid)?.or_not_found("node", normalize_oid(oid))
    }

    /// All nodes as a forest of roots with nested children.
    pub fn get_tree(&self) -> Result<Vec<TreeNode>> {
        let conn = self.conn();
        let nodes = select_nodes(&conn, "", &[]).context("loading node tree")?;
        Ok(build_tree(nodes))
    }

    /// Nodes of one module as a forest.
    ///
    /// Nodes whose parent belongs to another module become roots.
    pub fn get_module_tree(&self, module: &str) -> Result<Vec<TreeNode>> {
        let conn = self.conn();
        let exists: Option<i64> = conn
            .query_row("SELECT id FROM modules WHERE name = ?1", [module], |r| r.get(0))
            .optional()
            .with_context(|| format!("looking up module {module}"))?;
        exists.or_not_found("module", module)?;

        let nodes = select_nodes(&conn, "WHERE m.name = ?1", &[&module])
            .with_context(|| format!("loading tree of module {module}"))?;
        Ok(build_tree(nodes))
    }

    /// Case-insensitive substring search over node names and OIDs.
    ///
    /// `%` and `_` in the query match literally. Results are ordered by OID
    /// and capped at `limit`.
    pub fn search_nodes(&self, query: &str, limit: usize) -> Result<Vec<Node>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MibError::invalid_input("search query must not be blank"));
        }
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));

        let conn = self.conn();
        let mut nodes = select_nodes(
            &conn,
            "WHERE lower(n.name) LIKE ?1 ESCAPE '\\' OR n.oid LIKE ?1 ESCAPE '\\'",
            &[&pattern],
        )
        .with_context(|| format!("searching nodes for '{query}'"))?;
        drop(conn);

        nodes.sort_by(|a, b| compare_oids(&a.oid, &b.oid));
        nodes.truncate(limit);
        Ok(nodes)
    }

    /// Total number of stored nodes.
    pub fn node_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |r| r.get(0))
            .context("counting nodes")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// Escape LIKE wildcards with a backslash.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl NodeSource for MibStore {
    fn node_exact(&self, oid: &str) -> Result<Option<Node>> {
        let conn = self.conn();
        let mut nodes = select_nodes(&conn, "WHERE n.oid = ?1", &[&oid])
            .with_context(|| format!("selecting node {oid}"))?;
        Ok(nodes.pop())
    }

    fn get_children(&self, oid: &str) -> Result<Vec<Node>> {
        let oid = normalize_oid(oid);
        let conn = self.conn();
        select_nodes(&conn, "WHERE n.parent_oid = ?1", &[&oid])
            .with_context(|| format!("selecting children of {oid}"))
    }

    fn generation(&self) -> u64 {
        self.current_generation()
    }
}
