//! CLI command definitions and dispatch.

pub mod catalog;
pub mod config;
pub mod diff;
pub mod document;
pub mod folder;
pub mod history;
pub mod recover;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use notehub_core::config::AppConfig;
use notehub_core::error::AppError;
use notehub_service::NoteHub;

/// NoteHub: folder-organized notes with version history
#[derive(Debug, Parser)]
#[command(name = "notehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to $NOTEHUB_CONFIG or config/default.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Storage root, overriding `storage.root_path`
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder management
    Folder(folder::FolderArgs),
    /// Document management
    Doc(document::DocumentArgs),
    /// Version history
    History(history::HistoryArgs),
    /// Preview and selectively apply edits
    Diff(diff::DiffArgs),
    /// Tag and category index
    Catalog(catalog::CatalogArgs),
    /// Finish or undo interrupted operations
    Recover,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &config, self.format).await;
        }

        let hub = NoteHub::open(config).await?;
        match &self.command {
            Commands::Folder(args) => folder::execute(args, &hub, self.format).await,
            Commands::Doc(args) => document::execute(args, &hub, self.format).await,
            Commands::History(args) => history::execute(args, &hub, self.format).await,
            Commands::Diff(args) => diff::execute(args, &hub, self.format).await,
            Commands::Catalog(args) => catalog::execute(args, &hub, self.format).await,
            Commands::Recover => recover::execute(&hub, self.format).await,
            Commands::Config(_) => Ok(()),
        }
    }
}

/// Helper: parse a typed identifier argument
pub fn parse_id<T>(raw: &str) -> Result<T, AppError>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::invalid_input(format!("Invalid id '{}': {}", raw, e)))
}

/// Helper: read text given inline, from a file, or from stdin when the
/// file is `-`
pub async fn read_text(
    inline: Option<&String>,
    file: Option<&PathBuf>,
) -> Result<Option<String>, AppError> {
    if let Some(text) = inline {
        return Ok(Some(text.clone()));
    }
    let Some(path) = file else {
        return Ok(None);
    };
    if path.as_os_str() == "-" {
        let text = tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin()))
            .await
            .map_err(|e| AppError::internal(format!("Failed to read stdin: {}", e)))??;
        return Ok(Some(text));
    }
    Ok(Some(tokio::fs::read_to_string(path).await?))
}

/// Helper: format a timestamp for table output
pub fn format_time(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
