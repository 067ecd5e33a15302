//! mib-tools: SNMP MIB metadata store and OID resolver
//!
//! Stores parsed MIB modules, resolves numeric OIDs to names, decodes raw
//! values and rebuilds tables from walk results.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use mib_tools::{
    cli::{self, BookmarkCommand, SyntaxSource},
    config::{AppConfig, OutputFormat, Validatable},
    store::MibStore,
};
use std::io::{self, Write as _};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mib-tools")]
#[command(version)]
#[command(about = "SNMP MIB metadata store and OID resolver", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Load a parsed module
    mib-tools import IF-MIB.json

    # Resolve a numeric OID
    mib-tools resolve 1.3.6.1.2.1.2.2.1.2.10

    # Decode a raw value using the syntax of its node
    mib-tools decode 0x0011223344AA --oid 1.3.6.1.2.1.2.2.1.6.1 --type OctetString

    # Rebuild ifTable from a saved walk
    mib-tools table 1.3.6.1.2.1.2.2 --walk walk.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, global = true, env = "MIB_TOOLS_DB")]
    db: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a parsed MIB module from a JSON document
    Import {
        /// Import document produced by the MIB parser
        file: PathBuf,
    },

    /// List loaded modules with their statistics
    Modules,

    /// Delete a module and every node it owns
    DeleteModule {
        /// Module name
        name: String,
    },

    /// Print the node tree
    Tree {
        /// Only show nodes from this module
        #[arg(short, long)]
        module: Option<String>,
    },

    /// Show a single node (a trailing `.0` is accepted)
    Node {
        oid: String,
    },

    /// List the direct children of a node
    Children {
        oid: String,
    },

    /// List a node and its ancestors
    Ancestors {
        oid: String,
    },

    /// Search nodes by name, OID or description
    Search {
        query: String,

        /// Maximum number of results (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Resolve numeric OIDs to names such as `ifDescr[10]`
    Resolve {
        #[arg(required = true)]
        oids: Vec<String>,
    },

    /// Decode a raw value for display
    Decode {
        /// Raw value as returned by the SNMP client
        value: String,

        /// Protocol type tag, e.g. TimeTicks or OctetString
        #[arg(short = 't', long = "type", default_value = "OctetString")]
        value_type: String,

        /// SYNTAX clause to decode with
        #[arg(short, long, conflicts_with = "oid")]
        syntax: Option<String>,

        /// Take the syntax from the node covering this OID
        #[arg(long)]
        oid: Option<String>,
    },

    /// Rebuild a table from walk results
    Table {
        /// OID of the table, its row or one of its columns
        oid: String,

        /// JSON file holding an array of walk results
        #[arg(short, long)]
        walk: PathBuf,
    },

    /// Manage bookmarks and bookmark folders
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Output JSON Schema for the configuration file format
    ConfigSchema {
        /// Output file path (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or initialize the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum BookmarkAction {
    /// Print the bookmark hierarchy
    List,

    /// Bookmark an OID
    Add {
        oid: String,

        /// Folder ID (root if omitted)
        #[arg(short, long)]
        folder: Option<i64>,
    },

    /// Remove a bookmark
    Remove {
        oid: String,
    },

    /// Create a folder
    Mkdir {
        name: String,

        /// Parent folder ID (root if omitted)
        #[arg(short, long)]
        parent: Option<i64>,
    },

    /// Rename a folder
    Rename {
        id: i64,
        name: String,
    },

    /// Move a folder under another folder
    Mv {
        id: i64,

        /// New parent folder ID (root if omitted)
        #[arg(short, long)]
        parent: Option<i64>,
    },

    /// Delete a folder with its subfolders and bookmarks
    Rmdir {
        id: i64,
    },
}

impl From<BookmarkAction> for BookmarkCommand {
    fn from(action: BookmarkAction) -> Self {
        match action {
            BookmarkAction::List => Self::List,
            BookmarkAction::Add { oid, folder } => Self::Add { oid, folder },
            BookmarkAction::Remove { oid } => Self::Remove { oid },
            BookmarkAction::Mkdir { name, parent } => Self::Mkdir { name, parent },
            BookmarkAction::Rename { id, name } => Self::Rename { id, name },
            BookmarkAction::Mv { id, parent } => Self::Move { id, parent },
            BookmarkAction::Rmdir { id } => Self::Rmdir { id },
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write an example config file to the current directory
    Init,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

/// Config file merged with the global flags.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut overrides = AppConfig::builder();
    if let Some(db) = &cli.db {
        overrides = overrides.database(db);
    }
    if cli.json {
        overrides = overrides.output_format(OutputFormat::Json);
    }

    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides.build());
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    // Commands that never touch the database
    match &cli.command {
        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "mib-tools", &mut io::stdout());
            return Ok(());
        }
        Commands::ConfigSchema { output } => {
            let schema = mib_tools::config::generate_json_schema()
                .context("failed to generate config schema")?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            return Ok(());
        }
        Commands::Config {
            action: ConfigAction::Init,
        } => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".mib-tools.yaml");
            if target.exists() {
                bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, mib_tools::config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let format = config.output.format;

    if let Commands::Config {
        action: ConfigAction::Show,
    } = &cli.command
    {
        let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
        print!("{yaml}");
        return Ok(());
    }

    let db_path = config.store.database_path();
    let store = MibStore::open_with_config(&db_path, &config.store)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Import { file } => cli::run_import(&store, &file, format, &mut out)?,
        Commands::Modules => cli::run_modules(&store, format, &mut out)?,
        Commands::DeleteModule { name } => cli::run_delete_module(&store, &name, &mut out)?,
        Commands::Tree { module } => cli::run_tree(&store, module.as_deref(), format, &mut out)?,
        Commands::Node { oid } => cli::run_node(&store, &oid, format, &mut out)?,
        Commands::Children { oid } => cli::run_children(&store, &oid, format, &mut out)?,
        Commands::Ancestors { oid } => cli::run_ancestors(&store, &oid, format, &mut out)?,
        Commands::Search { query, limit } => {
            let limit = limit.unwrap_or(config.output.search_limit);
            cli::run_search(&store, &query, limit, format, &mut out)?;
        }
        Commands::Resolve { oids } => {
            cli::run_resolve(&store, &oids, &config.resolver, format, &mut out)?;
        }
        Commands::Decode {
            value,
            value_type,
            syntax,
            oid,
        } => {
            let source = match (&syntax, &oid) {
                (_, Some(oid)) => SyntaxSource::Oid(oid),
                (Some(text), None) => SyntaxSource::Literal(text),
                (None, None) => SyntaxSource::Literal(""),
            };
            cli::run_decode(&store, &value, &value_type, source, format, &mut out)?;
        }
        Commands::Table { oid, walk } => cli::run_table(&store, &oid, &walk, format, &mut out)?,
        Commands::Bookmarks { action } => {
            cli::run_bookmarks(&store, action.into(), format, &mut out)?;
        }
        Commands::Completions { .. } | Commands::ConfigSchema { .. } | Commands::Config { .. } => {}
    }

    out.flush()?;
    Ok(())
}
