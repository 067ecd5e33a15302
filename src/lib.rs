//! **SNMP MIB metadata storage, OID name resolution and value decoding.**
//!
//! `mib-tools` keeps the output of an external MIB parser in a SQLite
//! database and answers the questions an SNMP browser asks about it: what is
//! `1.3.6.1.2.1.2.2.1.2.10` called, how should a raw `TimeTicks` or
//! `OctetString` value be shown, and which rows does a table walk contain.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`Node`], module summaries, bookmarks and the
//!   [`SnmpResult`] values handed over by a protocol client, plus OID helpers
//!   such as [`compare_oids`].
//! - **[`store`]**: [`MibStore`], the persistent store for modules, nodes and
//!   the bookmark folder hierarchy.
//! - **[`resolve`]**: [`OidResolver`], longest-prefix name resolution with a
//!   cache that is invalidated when modules change.
//! - **[`decode`]**: [`format_value`], syntax-aware rendering of raw values.
//! - **[`table`]**: [`resolve_table_schema`] and [`build_table`], which
//!   regroup a flat walk into rows.
//!
//! ## Getting Started
//!
//! ```no_run
//! use mib_tools::{MibStore, Node, NodeKind, OidResolver};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MibStore::open("mib.db")?;
//!     let module = store.save_module("IF-MIB", "mibs/IF-MIB.txt")?;
//!     store.save_node(
//!         &Node::new("1.3.6.1.2.1.2.2.1.2", "ifDescr", NodeKind::Column),
//!         module,
//!     )?;
//!
//!     let resolver = OidResolver::new(&store);
//!     println!("{}", resolver.resolve_name("1.3.6.1.2.1.2.2.1.2.10"));
//!     Ok(())
//! }
//! ```
//!
//! ### Decoding Values
//!
//! ```
//! use mib_tools::format_value;
//!
//! let uptime = format_value("123456", "TimeTicks", "");
//! assert_eq!(uptime.text, "20m 34.56s");
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Counts are bounded by table and module sizes
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod resolve;
pub mod store;
pub mod table;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, OutputConfig, ResolverConfig, StoreConfig};
pub use config::{ConfigError, Validatable};
pub use decode::{format_value, FormattedValue, SyntaxFamily};
pub use error::{ErrorContext, MibError, OptionContext, Result};
pub use model::{
    build_tree, compare_oids, normalize_oid, BookmarkEntry, BookmarkFolder, FolderTree,
    ModuleStats, ModuleSummary, Node, NodeKind, SnmpResult, TreeNode,
};
pub use resolve::{CacheStats, OidResolver, ResolutionCache};
pub use store::{MemoryNodes, MibStore, NodeSource};
pub use table::{build_table, resolve_table_schema, TableData, TableSchema};
