//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use notehub_core::config::AppConfig;
use notehub_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Write the default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(config, format, |c| {
                output::print_kv("storage.root_path", &c.storage.root_path);
                output::print_kv("storage.content_extension", &c.storage.content_extension);
                output::print_kv(
                    "storage.delete_retry",
                    &format!(
                        "{} attempts, {}ms backoff",
                        c.storage.delete_retry_attempts, c.storage.delete_retry_backoff_ms
                    ),
                );
                output::print_kv("storage.index_enabled", &c.storage.index_enabled.to_string());
                output::print_kv("history.list_order", &format!("{:?}", c.history.list_order));
                output::print_kv("diff.context_lines", &c.diff.context_lines.to_string());
                output::print_kv("logging.level", &c.logging.level);
                output::print_kv("logging.format", &c.logging.format);
            });
        }
        ConfigCommand::Generate { output: out_path } => {
            let default_config = include_str!("../../config/default.toml");

            if let Some(parent) = std::path::Path::new(out_path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(out_path, default_config).await?;

            output::print_success(&format!("Default config written to '{}'", out_path));
        }
    }

    Ok(())
}
