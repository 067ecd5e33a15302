//! Handlers for browsing stored modules and nodes.

use anyhow::Result;
use std::io::Write;

use super::output::{node_line, render_tree, write_json, write_node_details};
use crate::config::OutputFormat;
use crate::error::OptionContext;
use crate::model::Node;
use crate::store::{MibStore, NodeSource};

fn write_node_list(out: &mut dyn Write, nodes: &[Node], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, nodes),
        OutputFormat::Text => {
            for node in nodes {
                writeln!(out, "{}", node_line(node))?;
            }
            Ok(())
        }
    }
}

/// Run the modules command
pub fn run_modules(store: &MibStore, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let modules = store.list_modules()?;
    match format {
        OutputFormat::Json => write_json(out, &modules)?,
        OutputFormat::Text => {
            if modules.is_empty() {
                writeln!(out, "No modules loaded.")?;
            }
            for module in &modules {
                let s = &module.stats;
                writeln!(
                    out,
                    "{:<32} {:>6} nodes {:>5} scalars {:>4} tables {:>5} columns  {}",
                    module.name,
                    s.node_count,
                    s.scalar_count,
                    s.table_count,
                    s.column_count,
                    module.loaded_at.format("%Y-%m-%d %H:%M")
                )?;
            }
        }
    }
    Ok(())
}

/// Run the delete-module command
pub fn run_delete_module(store: &MibStore, name: &str, out: &mut dyn Write) -> Result<()> {
    let removed = store.delete_module(name)?;
    writeln!(out, "Deleted {name} ({removed} nodes)")?;
    Ok(())
}

/// Run the tree command, optionally limited to one module
pub fn run_tree(
    store: &MibStore,
    module: Option<&str>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let roots = match module {
        Some(name) => store.get_module_tree(name)?,
        None => store.get_tree()?,
    };
    match format {
        OutputFormat::Json => write_json(out, &roots),
        OutputFormat::Text => {
            write!(out, "{}", render_tree(&roots))?;
            Ok(())
        }
    }
}

/// Run the node command
pub fn run_node(
    store: &MibStore,
    oid: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let node = store.find_node(oid)?.or_not_found("node", oid)?;
    match format {
        OutputFormat::Json => write_json(out, &node),
        OutputFormat::Text => write_node_details(out, &node),
    }
}

/// Run the children command; children are listed in OID order
pub fn run_children(
    store: &MibStore,
    oid: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let mut children = store.get_children(oid)?;
    children.sort_by(|a, b| crate::model::compare_oids(&a.oid, &b.oid));
    write_node_list(out, &children, format)
}

/// Run the ancestors command; the node itself comes first
pub fn run_ancestors(
    store: &MibStore,
    oid: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let chain = store.get_node_ancestors(oid)?;
    write_node_list(out, &chain, format)
}

/// Run the search command
pub fn run_search(
    store: &MibStore,
    query: &str,
    limit: usize,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let nodes = store.search_nodes(query, limit)?;
    write_node_list(out, &nodes, format)
}
