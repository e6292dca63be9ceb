//! Tag and category CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use notehub_core::error::AppError;
use notehub_entity::document::DocumentSummary;
use notehub_service::{NoteHub, TermCount};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog subcommand
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List tags, or the documents carrying one tag
    Tags {
        /// Show documents with this tag
        tag: Option<String>,
    },
    /// List categories, or the documents filed under one
    Categories {
        /// Show documents in this category
        category: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct TermRow {
    term: String,
    documents: usize,
}

impl From<TermCount> for TermRow {
    fn from(t: TermCount) -> Self {
        Self {
            term: t.term,
            documents: t.count,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct SummaryRow {
    id: String,
    title: String,
    tags: String,
    version: u64,
}

impl From<DocumentSummary> for SummaryRow {
    fn from(s: DocumentSummary) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title,
            tags: s.tags.join(", "),
            version: s.version,
        }
    }
}

/// Execute catalog commands
pub async fn execute(
    args: &CatalogArgs,
    hub: &NoteHub,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        CatalogCommand::Tags { tag: None } => {
            print_terms(hub.catalog.tags().await?, format);
        }
        CatalogCommand::Tags { tag: Some(tag) } => {
            print_documents(hub.catalog.by_tag(tag).await?, format);
        }
        CatalogCommand::Categories { category: None } => {
            print_terms(hub.catalog.categories().await?, format);
        }
        CatalogCommand::Categories {
            category: Some(category),
        } => {
            print_documents(hub.catalog.by_category(category).await?, format);
        }
    }

    Ok(())
}

fn print_terms(terms: Vec<TermCount>, format: OutputFormat) {
    let rows: Vec<TermRow> = terms.into_iter().map(TermRow::from).collect();
    output::print_list(&rows, format);
}

fn print_documents(docs: Vec<DocumentSummary>, format: OutputFormat) {
    let rows: Vec<SummaryRow> = docs.into_iter().map(SummaryRow::from).collect();
    output::print_list(&rows, format);
}
