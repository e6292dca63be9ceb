//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notehub_core::error::AppError;
use notehub_core::types::FolderId;
use notehub_entity::folder::{FolderNode, TreeEntry};
use notehub_service::NoteHub;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a new folder
    Create {
        /// Display name
        name: String,
        /// Virtual path of the parent folder
        #[arg(short, long, default_value = "/")]
        parent: String,
    },
    /// List the folders and documents inside a folder
    List {
        /// Virtual path of the folder
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show the folder tree
    Tree {
        /// Virtual path of the subtree root
        #[arg(default_value = "/")]
        path: String,
    },
    /// Rename a folder
    Rename {
        /// Folder ID or virtual path
        folder: String,
        /// New display name
        name: String,
    },
    /// Move a folder under another folder
    Move {
        /// Folder ID or virtual path
        folder: String,
        /// Virtual path of the new parent
        target: String,
    },
    /// Delete a folder and everything inside it
    Delete {
        /// Folder ID or virtual path
        folder: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Folder listing row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Entry kind
    kind: String,
    /// Entry ID
    id: String,
    /// Folder name or document title
    name: String,
    /// Virtual path or document version
    detail: String,
    /// Last update
    updated_at: String,
}

impl EntryRow {
    fn from_entry(entry: &TreeEntry, parent_path: &str) -> Self {
        match entry {
            TreeEntry::Folder(folder) => Self {
                kind: "folder".to_string(),
                id: folder.id.to_string(),
                name: folder.name.clone(),
                detail: join_path(parent_path, &folder.slug),
                updated_at: super::format_time(&folder.updated_at),
            },
            TreeEntry::Document(doc) => Self {
                kind: "document".to_string(),
                id: doc.id.to_string(),
                name: doc.title.clone(),
                detail: format!("v{}", doc.version),
                updated_at: super::format_time(&doc.updated_at),
            },
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    hub: &NoteHub,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FolderCommand::Create { name, parent } => {
            let folder = hub.folders.create(name, parent).await?;
            output::print_success(&format!(
                "Folder '{}' created at {} (id: {})",
                folder.name,
                join_path(parent, &folder.slug),
                folder.id
            ));
        }
        FolderCommand::List { path } => {
            let entries = hub.folders.list_entries(path).await?;
            let rows: Vec<EntryRow> = entries
                .iter()
                .map(|e| EntryRow::from_entry(e, path))
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Tree { path } => {
            let tree = hub.tree.tree(path).await?;
            output::print_item(&tree, format, |node| {
                print_node(node, 0);
                output::print_kv("Folders", &node.total_folders().to_string());
                output::print_kv("Documents", &node.total_documents().to_string());
            });
        }
        FolderCommand::Rename { folder, name } => {
            let id = resolve_folder_id(hub, folder).await?;
            let renamed = hub.folders.rename(id, name).await?;
            output::print_success(&format!(
                "Folder renamed to '{}' (slug: {})",
                renamed.name, renamed.slug
            ));
        }
        FolderCommand::Move { folder, target } => {
            let id = resolve_folder_id(hub, folder).await?;
            let moved = hub.folders.move_folder(id, target).await?;
            output::print_success(&format!(
                "Folder '{}' moved to {}",
                moved.name,
                join_path(target, &moved.slug)
            ));
        }
        FolderCommand::Delete { folder, force } => {
            let id = resolve_folder_id(hub, folder).await?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("Delete this folder with all of its documents and history?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            hub.folders.delete(id).await?;
            output::print_success(&format!("Folder {} deleted", id));
        }
    }

    Ok(())
}

/// Accept either a folder ID or a virtual path starting with `/`.
async fn resolve_folder_id(hub: &NoteHub, raw: &str) -> Result<FolderId, AppError> {
    if raw.starts_with('/') {
        return Ok(hub.resolver().resolve_folder(raw).await?.folder.id);
    }
    super::parse_id(raw)
}

fn join_path(parent: &str, slug: &str) -> String {
    let parent = parent.trim_end_matches('/');
    format!("{}/{}", parent, slug)
}

fn print_node(node: &FolderNode, indent: usize) {
    let label = if indent == 0 {
        format!("{} ({})", node.path, node.name)
    } else {
        format!("├── {}/", node.name)
    };
    println!(
        "{}{}  [{} docs]",
        "  ".repeat(indent),
        label,
        node.document_count
    );
    for child in &node.children {
        print_node(child, indent + 1);
    }
}
