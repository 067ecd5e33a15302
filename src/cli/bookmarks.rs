//! Bookmark command handlers.

use anyhow::Result;
use std::io::Write;

use super::output::write_json;
use crate::config::OutputFormat;
use crate::model::render_hierarchy;
use crate::store::MibStore;

/// A bookmark operation requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkCommand {
    List,
    Add { oid: String, folder: Option<i64> },
    Remove { oid: String },
    Mkdir { name: String, parent: Option<i64> },
    Rename { id: i64, name: String },
    Move { id: i64, parent: Option<i64> },
    Rmdir { id: i64 },
}

/// Run a bookmarks subcommand
pub fn run_bookmarks(
    store: &MibStore,
    command: BookmarkCommand,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        BookmarkCommand::List => {
            let root = store.get_bookmark_hierarchy()?;
            match format {
                OutputFormat::Json => write_json(out, &root)?,
                OutputFormat::Text => write!(out, "{}", render_hierarchy(&root))?,
            }
        }
        BookmarkCommand::Add { oid, folder } => {
            store.add_bookmark(&oid, folder)?;
            writeln!(out, "Bookmarked {oid}")?;
        }
        BookmarkCommand::Remove { oid } => {
            store.remove_bookmark(&oid)?;
            writeln!(out, "Removed bookmark {oid}")?;
        }
        BookmarkCommand::Mkdir { name, parent } => {
            let folder = store.create_bookmark_folder(&name, parent)?;
            match format {
                OutputFormat::Json => write_json(out, &folder)?,
                OutputFormat::Text => writeln!(out, "Created folder {} ({})", folder.name, folder.id)?,
            }
        }
        BookmarkCommand::Rename { id, name } => {
            let folder = store.rename_bookmark_folder(id, &name)?;
            writeln!(out, "Renamed folder {id} to {}", folder.name)?;
        }
        BookmarkCommand::Move { id, parent } => {
            store.move_bookmark_folder(id, parent)?;
            let target = parent.map_or_else(|| "the root".to_string(), |p| format!("folder {p}"));
            writeln!(out, "Moved folder {id} under {target}")?;
        }
        BookmarkCommand::Rmdir { id } => {
            store.delete_bookmark_folder(id)?;
            writeln!(out, "Deleted folder {id}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mkdir_then_list() {
        let store = MibStore::open_in_memory().unwrap();
        let mut buf = Vec::new();
        run_bookmarks(
            &store,
            BookmarkCommand::Mkdir {
                name: "Core".into(),
                parent: None,
            },
            OutputFormat::Text,
            &mut buf,
        )
        .unwrap();
        let root = store.get_bookmark_hierarchy().unwrap();
        let id = root.children[0].folder.id;

        run_bookmarks(
            &store,
            BookmarkCommand::Add {
                oid: "1.3.6.1.2.1.1.5".into(),
                folder: Some(id),
            },
            OutputFormat::Text,
            &mut buf,
        )
        .unwrap();

        let mut listing = Vec::new();
        run_bookmarks(&store, BookmarkCommand::List, OutputFormat::Text, &mut listing).unwrap();
        assert_eq!(
            String::from_utf8(listing).unwrap(),
            "/\n  Core/\n    1.3.6.1.2.1.1.5\n"
        );
    }

    #[test]
    fn test_move_into_own_child_fails() {
        let store = MibStore::open_in_memory().unwrap();
        let parent = store.create_bookmark_folder("Parent", None).unwrap();
        let child = store.create_bookmark_folder("Child", Some(parent.id)).unwrap();
        let mut buf = Vec::new();
        let result = run_bookmarks(
            &store,
            BookmarkCommand::Move {
                id: parent.id,
                parent: Some(child.id),
            },
            OutputFormat::Text,
            &mut buf,
        );
        assert!(result.is_err());
    }
}
