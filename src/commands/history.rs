//! Version history CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notehub_core::error::AppError;
use notehub_core::types::{DocumentId, VersionId};
use notehub_entity::version::Version;
use notehub_service::NoteHub;

/// Arguments for history commands
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// History subcommand
    #[command(subcommand)]
    pub command: HistoryCommand,
}

/// History subcommands
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List the snapshots of a document
    List {
        /// Document ID
        document: String,
    },
    /// Show one snapshot
    Show {
        /// Document ID
        document: String,
        /// Version ID
        version: String,
        /// Print only the content
        #[arg(long)]
        raw: bool,
    },
    /// Restore a snapshot as the live content
    Restore {
        /// Document ID
        document: String,
        /// Version ID
        version: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Snapshot display row
#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version ID
    id: String,
    /// Document version the snapshot captured
    version: u64,
    /// Line count
    lines: usize,
    /// Snapshot time
    created_at: String,
}

impl From<&Version> for VersionRow {
    fn from(v: &Version) -> Self {
        Self {
            id: v.id.to_string(),
            version: v.version_number,
            lines: notehub_diff::split_lines(&v.content).len(),
            created_at: v.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Execute history commands
pub async fn execute(
    args: &HistoryArgs,
    hub: &NoteHub,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        HistoryCommand::List { document } => {
            let document_id: DocumentId = super::parse_id(document)?;
            let versions = hub.versions.list(document_id).await?;
            let rows: Vec<VersionRow> = versions.iter().map(VersionRow::from).collect();
            output::print_list(&rows, format);
        }
        HistoryCommand::Show {
            document,
            version,
            raw,
        } => {
            let document_id: DocumentId = super::parse_id(document)?;
            let version_id: VersionId = super::parse_id(version)?;
            let snapshot = hub.versions.get(document_id, version_id).await?;
            if *raw {
                print!("{}", snapshot.content);
                return Ok(());
            }
            output::print_item(&snapshot, format, |v| {
                output::print_kv("Version ID", &v.id.to_string());
                output::print_kv("Document", &v.document_id.to_string());
                output::print_kv("Version", &v.version_number.to_string());
                output::print_kv("Created", &super::format_time(&v.created_at));
                println!();
                println!("{}", v.content);
            });
        }
        HistoryCommand::Restore {
            document,
            version,
            force,
        } => {
            let document_id: DocumentId = super::parse_id(document)?;
            let version_id: VersionId = super::parse_id(version)?;

            if !force {
                let preview = hub.editor.compare_version(document_id, version_id).await?;
                if !preview.diff.has_changes() {
                    output::print_warning("Snapshot matches the live content; restoring anyway");
                } else {
                    print!("{}", preview.unified());
                }
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("Restore this snapshot? The current content is kept in history.")
                    .default(true)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let doc = hub.versions.restore(document_id, version_id).await?;
            output::print_success(&format!(
                "Document '{}' restored; now at version {}",
                doc.title, doc.version
            ));
        }
    }

    Ok(())
}
