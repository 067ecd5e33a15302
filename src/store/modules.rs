//! Module records and per-module aggregates.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::nodes::insert_node;
use super::sqlite::{from_millis, now_millis};
use super::MibStore;
use crate::error::{ErrorContext, MibError, OptionContext, Result};
use crate::model::{ModuleStats, ModuleSummary, Node, NodeKind};

const MODULE_COLUMNS: &str = "id, name, file_path, node_count, scalar_count, table_count, \
                              column_count, type_count, skipped_nodes, missing_imports, loaded_at";

fn row_to_summary(row: &Row<'_>) -> rusqlite::Result<ModuleSummary> {
    let missing: String = row.get(9)?;
    Ok(ModuleSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        file_path: row.get(2)?,
        stats: ModuleStats {
            node_count: row.get(3)?,
            scalar_count: row.get(4)?,
            table_count: row.get(5)?,
            column_count: row.get(6)?,
            type_count: row.get(7)?,
            skipped_nodes: row.get(8)?,
        },
        missing_imports: serde_json::from_str(&missing).unwrap_or_default(),
        loaded_at: from_millis(row.get(10)?),
    })
}

fn module_id(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row("SELECT id FROM modules WHERE name = ?1", [name], |r| r.get(0))
        .optional()
        .with_context(|| format!("looking up module {name}"))?
        .or_not_found("module", name)
}

impl MibStore {
    /// Register a module, returning its ID.
    ///
    /// Saving an existing name updates its file path and load time and keeps
    /// its ID, so a reload can replace nodes in place.
    pub fn save_module(&self, name: &str, file_path: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MibError::invalid_input("module name must not be blank"));
        }

        let conn = self.conn();
        conn.execute(
            "INSERT INTO modules (name, file_path, loaded_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                 file_path = excluded.file_path,
                 loaded_at = excluded.loaded_at",
            params![name, file_path, now_millis()],
        )
        .with_context(|| format!("saving module {name}"))?;
        let id = module_id(&conn, name)?;
        drop(conn);

        self.bump_generation();
        tracing::info!(module = name, id, "registered module");
        Ok(id)
    }

    /// Replace a module and all of its nodes in one transaction.
    ///
    /// Any previous load of `name` is deleted first. If a node is rejected the
    /// whole reload rolls back and the previous nodes stay in place.
    pub fn replace_module(&self, name: &str, file_path: &str, nodes: &[Node]) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MibError::invalid_input("module name must not be blank"));
        }

        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .with_context(|| format!("reloading module {name}"))?;
        let replaced = tx
            .execute("DELETE FROM modules WHERE name = ?1", [name])
            .with_context(|| format!("removing previous load of module {name}"))?;
        tx.execute(
            "INSERT INTO modules (name, file_path, loaded_at) VALUES (?1, ?2, ?3)",
            params![name, file_path, now_millis()],
        )
        .with_context(|| format!("saving module {name}"))?;
        let id = module_id(&tx, name)?;
        for node in nodes {
            insert_node(&tx, node, id).with_context(|| format!("reloading module {name}"))?;
        }
        tx.commit()
            .with_context(|| format!("committing reload of module {name}"))?;
        drop(conn);

        self.bump_generation();
        tracing::info!(
            module = name,
            id,
            nodes = nodes.len(),
            replaced = replaced > 0,
            "loaded module"
        );
        Ok(id)
    }

    /// All modules, sorted by name.
    pub fn list_modules(&self) -> Result<Vec<ModuleSummary>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT {MODULE_COLUMNS} FROM modules ORDER BY name COLLATE NOCASE, name"
            ))
            .context("listing modules")?;
        let modules = stmt
            .query_map([], row_to_summary)
            .context("listing modules")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("reading module rows")?;
        Ok(modules)
    }

    /// Summary for one module.
    pub fn get_module_summary(&self, name: &str) -> Result<ModuleSummary> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {MODULE_COLUMNS} FROM modules WHERE name = ?1"),
            [name],
            row_to_summary,
        )
        .optional()
        .with_context(|| format!("loading summary of module {name}"))?
        .or_not_found("module", name)
    }

    /// Replace the node counts of a module.
    pub fn update_module_stats(&self, name: &str, stats: &ModuleStats) -> Result<()> {
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE modules SET node_count = ?2, scalar_count = ?3, table_count = ?4,
                     column_count = ?5, type_count = ?6, skipped_nodes = ?7
                 WHERE name = ?1",
                params![
                    name,
                    stats.node_count,
                    stats.scalar_count,
                    stats.table_count,
                    stats.column_count,
                    stats.type_count,
                    stats.skipped_nodes,
                ],
            )
            .with_context(|| format!("updating stats of module {name}"))?;
        if updated == 0 {
            return Err(MibError::not_found("module", name));
        }
        Ok(())
    }

    /// Record the skipped-node count and unresolved imports of a module.
    pub fn update_module_metadata(
        &self,
        name: &str,
        skipped_nodes: u32,
        missing_imports: &[String],
    ) -> Result<()> {
        let missing = serde_json::to_string(missing_imports)?;
        let conn = self.conn();
        let updated = conn
            .execute(
                "UPDATE modules SET skipped_nodes = ?2, missing_imports = ?3 WHERE name = ?1",
                params![name, skipped_nodes, missing],
            )
            .with_context(|| format!("updating metadata of module {name}"))?;
        if updated == 0 {
            return Err(MibError::not_found("module", name));
        }
        Ok(())
    }

    /// Recompute node counts from the stored nodes, keeping `skipped_nodes`.
    pub fn refresh_module_stats(&self, name: &str) -> Result<ModuleStats> {
        let mut stats = self.get_module_summary(name)?.stats;
        let counts: Vec<(String, u32)> = {
            let conn = self.conn();
            let mut stmt = conn
                .prepare_cached(
                    "SELECT n.kind, COUNT(*) FROM nodes n JOIN modules m ON m.id = n.module_id
                     WHERE m.name = ?1 GROUP BY n.kind",
                )
                .with_context(|| format!("counting nodes of module {name}"))?;
            let rows = stmt
                .query_map([name], |r| Ok((r.get(0)?, r.get(1)?)))
                .with_context(|| format!("counting nodes of module {name}"))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .context("reading node counts")?;
            rows
        };

        stats.node_count = 0;
        stats.scalar_count = 0;
        stats.table_count = 0;
        stats.column_count = 0;
        stats.type_count = 0;
        for (kind, count) in counts {
            stats.node_count += count;
            match kind.parse::<NodeKind>() {
                Ok(NodeKind::Scalar) => stats.scalar_count += count,
                Ok(NodeKind::Table) => stats.table_count += count,
                Ok(NodeKind::Column) => stats.column_count += count,
                Ok(NodeKind::Type) => stats.type_count += count,
                _ => {}
            }
        }

        self.update_module_stats(name, &stats)?;
        Ok(stats)
    }

    /// Delete a module and, through the cascading foreign key, all its nodes.
    ///
    /// Runs in a single transaction so no orphan nodes survive a failure.
    pub fn delete_module(&self, name: &str) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .with_context(|| format!("deleting module {name}"))?;
        let id = module_id(&tx, name)?;
        let removed_nodes: i64 = tx
            .query_row("SELECT COUNT(*) FROM nodes WHERE module_id = ?1", [id], |r| {
                r.get(0)
            })
            .with_context(|| format!("counting nodes of module {name}"))?;
        tx.execute("DELETE FROM modules WHERE id = ?1", [id])
            .with_context(|| format!("deleting module {name}"))?;
        tx.commit()
            .with_context(|| format!("committing delete of module {name}"))?;
        drop(conn);

        self.bump_generation();
        tracing::info!(module = name, removed_nodes, "deleted module");
        Ok(usize::try_from(removed_nodes).unwrap_or_default())
    }
}
