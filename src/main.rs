//! NoteHub command-line entry point.
//!
//! Loads configuration, initializes logging, and dispatches the parsed
//! subcommand against the note store.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use notehub_core::config::AppConfig;
use notehub_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(root = %config.storage.root_path, "Configuration loaded");

    if let Err(e) = cli.execute(config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and variables.
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => std::env::var("NOTEHUB_CONFIG")
            .unwrap_or_else(|_| "config/default.toml".to_string()),
    };
    let env = std::env::var("NOTEHUB_ENV").ok();

    let mut config = AppConfig::load(&config_path, env.as_deref())?;
    if let Some(root) = &cli.root {
        config.storage.root_path = root.clone();
    }
    Ok(config)
}

/// Initialize tracing. Logs go to stderr so command output stays parseable.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
