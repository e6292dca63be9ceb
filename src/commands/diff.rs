//! Diff preview and selective apply CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notehub_core::error::AppError;
use notehub_core::types::{DocumentId, VersionId};
use notehub_diff::{BlockId, BlockSelection, ChangeBlock};
use notehub_service::{DiffPreview, NoteHub};

/// Arguments for diff commands
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Diff subcommand
    #[command(subcommand)]
    pub command: DiffCommand,
}

/// Where the proposed text comes from
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ProposedSource {
    /// Proposed content given inline
    #[arg(long)]
    content: Option<String>,
    /// Read proposed content from a file (`-` for stdin)
    #[arg(long)]
    file: Option<PathBuf>,
    /// Diff against a snapshot instead
    #[arg(long)]
    version: Option<String>,
}

/// Diff subcommands
#[derive(Debug, Subcommand)]
pub enum DiffCommand {
    /// Show the change blocks between a document and proposed text
    Preview {
        /// Document ID
        document: String,
        #[command(flatten)]
        source: ProposedSource,
        /// Print every line instead of context-bounded hunks
        #[arg(long)]
        full: bool,
    },
    /// Apply a subset of the change blocks
    Apply {
        /// Document ID
        document: String,
        #[command(flatten)]
        source: ProposedSource,
        /// Block IDs to apply (default: all)
        #[arg(long, value_delimiter = ',', conflicts_with = "interactive")]
        blocks: Option<Vec<BlockId>>,
        /// Pick blocks interactively
        #[arg(short, long)]
        interactive: bool,
    },
}

/// Change block display row
#[derive(Debug, Serialize, Tabled)]
struct BlockRow {
    /// Block ID
    block: BlockId,
    /// Edit kind
    kind: &'static str,
    /// First original line
    original_line: String,
    /// First updated line
    new_line: String,
    /// Lines removed
    deleted: usize,
    /// Lines inserted
    added: usize,
    /// First changed line
    excerpt: String,
}

impl From<&ChangeBlock> for BlockRow {
    fn from(block: &ChangeBlock) -> Self {
        let kind = if block.is_replacement() {
            "replace"
        } else if block.added.is_empty() {
            "delete"
        } else {
            "insert"
        };
        let first = block
            .added
            .first()
            .or_else(|| block.deleted.first())
            .map(String::as_str)
            .unwrap_or_default();
        Self {
            block: block.id,
            kind,
            original_line: line_label(block.original_start),
            new_line: line_label(block.new_start),
            deleted: block.deleted.len(),
            added: block.added.len(),
            excerpt: excerpt(first),
        }
    }
}

/// Execute diff commands
pub async fn execute(args: &DiffArgs, hub: &NoteHub, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        DiffCommand::Preview {
            document,
            source,
            full,
        } => {
            let preview = load_preview(hub, document, source).await?;
            output::print_item(&preview, format, |p| print_preview(p, *full));
        }
        DiffCommand::Apply {
            document,
            source,
            blocks,
            interactive,
        } => {
            let preview = load_preview(hub, document, source).await?;
            if !preview.diff.has_changes() {
                output::print_warning("No differences; nothing to apply");
                return Ok(());
            }

            let selection = if *interactive {
                match choose_blocks(&preview)? {
                    Some(selection) => selection,
                    None => {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }
            } else if let Some(ids) = blocks {
                explicit_selection(&preview, ids)?
            } else {
                preview.selection.clone()
            };

            let doc = hub.editor.apply(&preview, &selection).await?;
            if doc.version == preview.base_version {
                output::print_warning("Selection reproduces the current content; nothing saved");
            } else {
                output::print_success(&format!(
                    "Applied {} of {} block(s); document now at version {}",
                    selection.len(),
                    preview.stats.blocks,
                    doc.version
                ));
            }
        }
    }

    Ok(())
}

async fn load_preview(
    hub: &NoteHub,
    document: &str,
    source: &ProposedSource,
) -> Result<DiffPreview, AppError> {
    let document_id: DocumentId = super::parse_id(document)?;
    if let Some(version) = &source.version {
        let version_id: VersionId = super::parse_id(version)?;
        return hub.editor.compare_version(document_id, version_id).await;
    }
    let proposed = super::read_text(source.content.as_ref(), source.file.as_ref())
        .await?
        .unwrap_or_default();
    hub.editor.preview(document_id, &proposed).await
}

fn explicit_selection(preview: &DiffPreview, ids: &[BlockId]) -> Result<BlockSelection, AppError> {
    let known = preview.diff.block_ids();
    if let Some(unknown) = ids.iter().find(|id| !known.contains(*id)) {
        return Err(AppError::invalid_input(format!(
            "Unknown block {}; the diff has blocks {:?}",
            unknown, known
        )));
    }
    Ok(ids.iter().copied().collect())
}

fn choose_blocks(preview: &DiffPreview) -> Result<Option<BlockSelection>, AppError> {
    let blocks = preview.diff.blocks();
    let labels: Vec<String> = blocks
        .iter()
        .map(|b| {
            let row = BlockRow::from(b);
            format!(
                "#{} {} -{} +{}  {}",
                row.block, row.kind, row.deleted, row.added, row.excerpt
            )
        })
        .collect();
    let defaults: Vec<bool> = blocks.iter().map(|b| preview.selection.contains(b.id)).collect();

    let chosen = dialoguer::MultiSelect::new()
        .with_prompt("Blocks to apply (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
    let selection: BlockSelection = chosen.into_iter().map(|i| blocks[i].id).collect();

    print!("{}", preview.render(&selection));
    let confirm = dialoguer::Confirm::new()
        .with_prompt(format!("Save this text ({} block(s) applied)?", selection.len()))
        .default(true)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

    Ok(confirm.then_some(selection))
}

fn print_preview(preview: &DiffPreview, full: bool) {
    output::print_kv("Document", &preview.document_id.to_string());
    output::print_kv("Base version", &preview.base_version.to_string());
    output::print_kv(
        "Lines",
        &format!(
            "{} common, {} added, {} deleted",
            preview.stats.common, preview.stats.added, preview.stats.deleted
        ),
    );
    if !preview.diff.has_changes() {
        println!("No differences.");
        return;
    }

    let rows: Vec<BlockRow> = preview.diff.blocks().iter().map(BlockRow::from).collect();
    output::print_list(&rows, OutputFormat::Table);
    println!();

    if full {
        for line in preview.diff.lines() {
            let marker = match line.change_block_id {
                None => "      ".to_string(),
                Some(id) if line.original_line_number.is_some() => format!("-[{:>2}] ", id),
                Some(id) => format!("+[{:>2}] ", id),
            };
            println!("{}{}", marker, line.text);
        }
    } else {
        print!("{}", preview.unified());
    }
}

fn line_label(line: Option<usize>) -> String {
    line.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

fn excerpt(line: &str) -> String {
    const MAX: usize = 40;
    if line.chars().count() <= MAX {
        return line.to_string();
    }
    let cut: String = line.chars().take(MAX - 1).collect();
    format!("{}…", cut)
}
