//! Handlers for name resolution, value decoding and table reconstruction.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use super::output::write_json;
use crate::config::{OutputFormat, ResolverConfig};
use crate::decode::format_value;
use crate::model::SnmpResult;
use crate::resolve::OidResolver;
use crate::store::MibStore;
use crate::table::{build_table, resolve_table_schema_for_oid, TableData, INSTANCE_FIELD};

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    oid: &'a str,
    label: String,
}

/// Run the resolve command
pub fn run_resolve(
    store: &MibStore,
    oids: &[String],
    config: &ResolverConfig,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let resolver = OidResolver::from_config(store, config);
    let resolved: Vec<Resolution<'_>> = oids
        .iter()
        .map(|oid| Resolution {
            oid,
            label: resolver.resolve_name(oid),
        })
        .collect();
    tracing::debug!(stats = ?resolver.cache_stats(), "resolution finished");

    match format {
        OutputFormat::Json => write_json(out, &resolved)?,
        OutputFormat::Text => {
            for r in &resolved {
                let label = if r.label.is_empty() { "-" } else { &r.label };
                writeln!(out, "{}\t{}", r.oid, label)?;
            }
        }
    }
    Ok(())
}

/// Where the decode command takes its syntax from.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxSource<'a> {
    /// Explicit SYNTAX text
    Literal(&'a str),
    /// Syntax of the node covering this OID
    Oid(&'a str),
}

/// Run the decode command
pub fn run_decode(
    store: &MibStore,
    value: &str,
    value_type: &str,
    syntax: SyntaxSource<'_>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let formatted = match syntax {
        SyntaxSource::Literal(text) => format_value(value, value_type, text),
        SyntaxSource::Oid(oid) => {
            OidResolver::new(store).format_result(&SnmpResult::new(oid, value, value_type))
        }
    };

    match format {
        OutputFormat::Json => write_json(out, &formatted)?,
        OutputFormat::Text => writeln!(out, "{formatted}")?,
    }
    Ok(())
}

/// Reconstruct a table from a JSON file of walk results.
pub fn load_table(store: &MibStore, oid: &str, walk: &Path) -> Result<TableData> {
    let schema = resolve_table_schema_for_oid(store, oid)
        .with_context(|| format!("cannot resolve table schema for {oid}"))?;
    let content = std::fs::read_to_string(walk)
        .with_context(|| format!("failed to read {}", walk.display()))?;
    let results: Vec<SnmpResult> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse walk results {}", walk.display()))?;
    Ok(build_table(&schema, &results))
}

/// Render a table as tab-separated text with a header of column labels.
#[must_use]
pub fn render_table_text(table: &TableData) -> String {
    let mut text = String::new();
    let header: Vec<&str> = std::iter::once("Index")
        .chain(table.columns.iter().map(|c| c.label.as_str()))
        .collect();
    text.push_str(&header.join("\t"));
    text.push('\n');

    for row in &table.rows {
        let cells: Vec<&str> = std::iter::once(INSTANCE_FIELD)
            .chain(table.columns.iter().map(|c| c.name.as_str()))
            .map(|key| row.get(key).map_or("", String::as_str))
            .collect();
        text.push_str(&cells.join("\t"));
        text.push('\n');
    }
    text
}

/// Run the table command
pub fn run_table(
    store: &MibStore,
    oid: &str,
    walk: &Path,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let table = load_table(store, oid, walk)?;
    if table.skipped_results > 0 {
        tracing::warn!(
            skipped = table.skipped_results,
            "some walk results did not belong to {}",
            table.table
        );
    }
    match format {
        OutputFormat::Json => write_json(out, &table)?,
        OutputFormat::Text => write!(out, "{}", render_table_text(&table))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind};

    fn store() -> MibStore {
        let store = MibStore::open_in_memory().unwrap();
        let id = store.save_module("IF-MIB", "IF-MIB.txt").unwrap();
        store
            .save_nodes(
                &[
                    Node::new("1.3.6.1.2.1.2.2", "ifTable", NodeKind::Table),
                    Node::new("1.3.6.1.2.1.2.2.1", "ifEntry", NodeKind::Row)
                        .with_parent("1.3.6.1.2.1.2.2"),
                    Node::new("1.3.6.1.2.1.2.2.1.2", "ifDescr", NodeKind::Column)
                        .with_parent("1.3.6.1.2.1.2.2.1")
                        .with_syntax("DisplayString"),
                    Node::new("1.3.6.1.2.1.2.2.1.3", "ifType", NodeKind::Column)
                        .with_parent("1.3.6.1.2.1.2.2.1")
                        .with_syntax("INTEGER { other(1), ethernetCsmacd(6) }"),
                ],
                id,
            )
            .unwrap();
        store
    }

    #[test]
    fn test_resolve_text() {
        let store = store();
        let mut buf = Vec::new();
        run_resolve(
            &store,
            &["1.3.6.1.2.1.2.2.1.2.7".to_string(), "1.9".to_string()],
            &ResolverConfig::default(),
            OutputFormat::Text,
            &mut buf,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1.3.6.1.2.1.2.2.1.2.7\tifDescr[7]\n1.9\t-\n"
        );
    }

    #[test]
    fn test_decode_by_oid() {
        let store = store();
        let mut buf = Vec::new();
        run_decode(
            &store,
            "6",
            "Integer",
            SyntaxSource::Oid("1.3.6.1.2.1.2.2.1.3.1"),
            OutputFormat::Text,
            &mut buf,
        )
        .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ethernetCsmacd (6)\n");
    }

    #[test]
    fn test_table_from_walk_file() {
        let store = store();
        let dir = tempfile::tempdir().unwrap();
        let walk = dir.path().join("walk.json");
        std::fs::write(
            &walk,
            r#"[
                {"oid": "1.3.6.1.2.1.2.2.1.2.2", "value": "eth1", "type": "OctetString"},
                {"oid": "1.3.6.1.2.1.2.2.1.3.1", "value": "6", "type": "Integer"},
                {"oid": "1.3.6.1.2.1.2.2.1.2.1", "value": "eth0", "type": "OctetString"}
            ]"#,
        )
        .unwrap();

        let table = load_table(&store, "1.3.6.1.2.1.2.2", &walk).unwrap();
        assert_eq!(
            render_table_text(&table),
            "Index\tIf Descr\tIf Type\n1\teth0\tethernetCsmacd (6)\n2\teth1\t\n"
        );
    }
}
