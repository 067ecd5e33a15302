//! Import command handler.
//!
//! Loads a module produced by an external MIB parser. The input is JSON:
//!
//! ```json
//! {
//!   "module": { "name": "IF-MIB", "file_path": "mibs/IF-MIB.txt",
//!               "stats": { "skipped_nodes": 2 }, "missing_imports": ["IANAifType-MIB"] },
//!   "nodes": [ { "oid": "1.3.6.1.2.1.2.2", "name": "ifTable", "type": "table" } ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;

use super::output::write_json;
use crate::config::OutputFormat;
use crate::model::{ModuleStats, ModuleSummary, Node};
use crate::store::MibStore;

/// Module header of an import document.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleImport {
    pub name: String,
    #[serde(default)]
    pub file_path: String,
    /// Parser-reported stats; node counts are recomputed when absent
    #[serde(default)]
    pub stats: Option<ModuleStats>,
    #[serde(default)]
    pub missing_imports: Vec<String>,
}

/// A parsed module ready to be stored.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportDocument {
    pub module: ModuleImport,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl ImportDocument {
    /// Read an import document from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse import document {}", path.display()))
    }
}

/// Store a parsed module and its nodes, replacing any earlier load of the
/// same module name.
pub fn import_module(store: &MibStore, doc: ImportDocument) -> Result<ModuleSummary> {
    let ImportDocument { module, mut nodes } = doc;
    let name = module.name.trim();
    if name.is_empty() {
        bail!("import document has an empty module name");
    }

    for node in &mut nodes {
        node.module = name.to_string();
    }
    store
        .replace_module(name, &module.file_path, &nodes)
        .with_context(|| format!("failed to load module {name}"))?;
    let saved = nodes.len();

    let mut stats = ModuleStats::from_nodes(&nodes);
    if let Some(reported) = module.stats {
        stats.skipped_nodes = reported.skipped_nodes;
    }
    store.update_module_stats(name, &stats)?;
    store.update_module_metadata(name, stats.skipped_nodes, &module.missing_imports)?;

    tracing::info!(module = name, nodes = saved, "imported module");
    Ok(store.get_module_summary(name)?)
}

/// Run the import command
pub fn run_import(
    store: &MibStore,
    path: &Path,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let doc = ImportDocument::from_path(path)?;
    let summary = import_module(store, doc)?;

    match format {
        OutputFormat::Json => write_json(out, &summary)?,
        OutputFormat::Text => {
            writeln!(
                out,
                "Imported {} ({} nodes, {} skipped)",
                summary.name, summary.stats.node_count, summary.stats.skipped_nodes
            )?;
            if !summary.missing_imports.is_empty() {
                writeln!(out, "Missing imports: {}", summary.missing_imports.join(", "))?;
            }
        }
    }
    Ok(())
}
