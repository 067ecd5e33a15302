//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler takes an open store, the output format and a writer, so tests
//! can capture what a subcommand prints.

mod bookmarks;
mod browse;
mod import;
mod lookup;
mod output;

pub use bookmarks::{run_bookmarks, BookmarkCommand};
pub use browse::{
    run_ancestors, run_children, run_delete_module, run_modules, run_node, run_search, run_tree,
};
pub use import::{import_module, run_import, ImportDocument, ModuleImport};
pub use lookup::{load_table, render_table_text, run_decode, run_resolve, run_table, SyntaxSource};
pub use output::{node_line, render_tree, write_json};

// Re-export config types used by handlers
pub use crate::config::{OutputFormat, ResolverConfig};
