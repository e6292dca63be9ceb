//! Document management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notehub_core::error::AppError;
use notehub_core::types::DocumentId;
use notehub_entity::document::{CreateDocument, Document, UpdateDocument};
use notehub_service::NoteHub;

/// Arguments for document commands
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Document subcommand
    #[command(subcommand)]
    pub command: DocumentCommand,
}

/// Document subcommands
#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Create a document
    Create {
        /// Title
        title: String,
        /// Inline content
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        /// Read content from a file (`-` for stdin)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Short summary
        #[arg(long)]
        summary: Option<String>,
        /// Virtual path of the folder to create it in
        #[arg(short, long, default_value = "/")]
        parent: String,
    },
    /// List documents
    List {
        /// Only documents directly inside this folder
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Show a document
    Show {
        /// Document ID
        id: String,
        /// Print only the content
        #[arg(long)]
        raw: bool,
    },
    /// Update title, content, or attributes
    Update {
        /// Document ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New inline content
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        /// Read new content from a file (`-` for stdin)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Replace tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Option<Vec<String>>,
        /// Replace categories (repeatable)
        #[arg(long = "category")]
        categories: Option<Vec<String>>,
        /// New summary
        #[arg(long, conflicts_with = "clear_summary")]
        summary: Option<String>,
        /// Remove the summary
        #[arg(long)]
        clear_summary: bool,
    },
    /// Replace a 1-based inclusive line range
    EditLines {
        /// Document ID
        id: String,
        /// First line to replace
        start: usize,
        /// Last line to replace
        end: usize,
        /// Replacement text; omit to delete the range
        #[arg(long, default_value = "")]
        text: String,
    },
    /// Move a document into another folder
    Move {
        /// Document ID
        id: String,
        /// Virtual path of the target folder
        target: String,
    },
    /// Delete documents with their history
    Delete {
        /// Document IDs
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Document display row
#[derive(Debug, Serialize, Tabled)]
struct DocumentRow {
    /// Document ID
    id: String,
    /// Title
    title: String,
    /// Tags
    tags: String,
    /// Current version
    version: u64,
    /// Line count
    lines: usize,
    /// Last update
    updated_at: String,
}

impl From<&Document> for DocumentRow {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.to_string(),
            title: doc.title.clone(),
            tags: doc.tags.join(", "),
            version: doc.version,
            lines: doc.line_count(),
            updated_at: super::format_time(&doc.updated_at),
        }
    }
}

/// Execute document commands
pub async fn execute(
    args: &DocumentArgs,
    hub: &NoteHub,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        DocumentCommand::Create {
            title,
            content,
            file,
            tags,
            categories,
            summary,
            parent,
        } => {
            let content = super::read_text(content.as_ref(), file.as_ref())
                .await?
                .unwrap_or_default();
            let doc = hub
                .documents
                .create(CreateDocument {
                    title: title.clone(),
                    content,
                    tags: tags.clone(),
                    categories: categories.clone(),
                    summary: summary.clone(),
                    folder_path: Some(parent.clone()),
                    ..CreateDocument::default()
                })
                .await?;
            output::print_success(&format!("Document '{}' created (id: {})", doc.title, doc.id));
        }
        DocumentCommand::List { parent } => {
            let mut docs = match parent {
                Some(path) => hub.documents.list_in_folder(path).await?,
                None => hub.documents.get_all().await?,
            };
            docs.sort_by(|a, b| a.title.cmp(&b.title));
            let rows: Vec<DocumentRow> = docs.iter().map(DocumentRow::from).collect();
            output::print_list(&rows, format);
        }
        DocumentCommand::Show { id, raw } => {
            let doc = find(hub, id).await?;
            if *raw {
                print!("{}", doc.content);
                return Ok(());
            }
            output::print_item(&doc, format, print_document);
        }
        DocumentCommand::Update {
            id,
            title,
            content,
            file,
            tags,
            categories,
            summary,
            clear_summary,
        } => {
            let id: DocumentId = super::parse_id(id)?;
            let summary = if *clear_summary {
                Some(None)
            } else {
                summary.clone().map(Some)
            };
            let patch = UpdateDocument {
                title: title.clone(),
                content: super::read_text(content.as_ref(), file.as_ref()).await?,
                tags: tags.clone(),
                categories: categories.clone(),
                summary,
                ..UpdateDocument::default()
            };
            if patch.is_empty() {
                output::print_warning("Nothing to update");
                return Ok(());
            }
            let doc = hub.documents.update(id, patch).await?;
            output::print_success(&format!(
                "Document '{}' updated to version {}",
                doc.title, doc.version
            ));
        }
        DocumentCommand::EditLines {
            id,
            start,
            end,
            text,
        } => {
            let id: DocumentId = super::parse_id(id)?;
            let doc = hub
                .documents
                .update_line_range(id, *start, *end, text)
                .await?;
            output::print_success(&format!(
                "Lines {}-{} replaced; document now has {} lines (version {})",
                start,
                end,
                doc.line_count(),
                doc.version
            ));
        }
        DocumentCommand::Move { id, target } => {
            let id: DocumentId = super::parse_id(id)?;
            let doc = hub.documents.move_to_folder(id, target).await?;
            output::print_success(&format!("Document '{}' moved to {}", doc.title, target));
        }
        DocumentCommand::Delete { ids, force } => {
            let ids = ids
                .iter()
                .map(|raw| super::parse_id(raw))
                .collect::<Result<Vec<DocumentId>, _>>()?;
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete {} document(s) with their version history?",
                        ids.len()
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            hub.documents.batch_delete(&ids).await?;
            output::print_success(&format!("{} document(s) deleted", ids.len()));
        }
    }

    Ok(())
}

async fn find(hub: &NoteHub, raw: &str) -> Result<Document, AppError> {
    let id: DocumentId = super::parse_id(raw)?;
    hub.documents
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Document not found: {}", id)))
}

fn print_document(doc: &Document) {
    output::print_kv("ID", &doc.id.to_string());
    output::print_kv("Title", &doc.title);
    output::print_kv("Version", &doc.version.to_string());
    output::print_kv("Tags", &doc.tags.join(", "));
    output::print_kv("Categories", &doc.categories.join(", "));
    if let Some(summary) = &doc.summary {
        output::print_kv("Summary", summary);
    }
    if let Some(related) = &doc.related_ids {
        let related: Vec<String> = related.iter().map(ToString::to_string).collect();
        output::print_kv("Related", &related.join(", "));
    }
    output::print_kv("Created", &super::format_time(&doc.created_at));
    output::print_kv("Updated", &super::format_time(&doc.updated_at));
    output::print_kv("Lines", &doc.line_count().to_string());
    println!();
    println!("{}", doc.content);
}
