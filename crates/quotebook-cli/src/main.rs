//! Quotebook CLI
//!
//! Command-line interface for Quotebook - a local-first random quote
//! collection with remote sync.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quotebook_core::{Config, QuoteApp};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Quotebook - Local-first random quotes with remote sync")]
#[command(long_about = "Quotebook - Local-first random quotes with remote sync\n\nWith no command, shows the quote last viewed in this session, or a random one.")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote
    Show {
        /// Pick from this category instead of the selected filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show the last quote viewed in this session
    Last,
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Category
        #[arg(short, long)]
        category: String,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Filter by category (defaults to the selected filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories with quote counts
    Categories,
    /// Select the category filter, or show it when no category is given
    Filter {
        /// Category name, or "all"
        category: Option<String>,
    },
    /// Export all quotes to a JSON file
    Export {
        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all quotes with the contents of a JSON file
    Import {
        /// File to import
        file: PathBuf,
    },
    /// Sync with the remote source
    Sync,
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between syncs (defaults to sync_interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Show status (collection, sync, storage)
    Status,
    /// Manage session state
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum SessionCommands {
    /// Forget the last viewed quote
    Clear,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, remote_url, sync_enabled, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let app = QuoteApp::from_config(&config).context("Failed to set up remote source")?;

    let Some(command) = cli.command else {
        return commands::quote::resume(&app, &output).await;
    };

    match command {
        Commands::Show { category } => commands::quote::show(&app, category, &output).await,
        Commands::Last => commands::quote::last(&app, &output).await,
        Commands::Add { text, category } => {
            commands::quote::add(&app, text, category, &output).await
        }
        Commands::List { category } => commands::quote::list(&app, category, &output).await,
        Commands::Categories => commands::category::list(&app, &output).await,
        Commands::Filter { category } => commands::category::filter(&app, category, &output).await,
        Commands::Export { output: path } => {
            commands::transfer::export(&app, path, &output).await
        }
        Commands::Import { file } => commands::transfer::import(&app, file, &output).await,
        Commands::Sync => commands::sync::sync(&app, &output).await,
        Commands::Watch { interval } => {
            commands::sync::watch(&app, &config, interval, &output).await
        }
        Commands::Status => commands::status::show(&app, &config, &output).await,
        Commands::Session {
            command: SessionCommands::Clear,
        } => commands::session::clear(&app, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if QUOTEBOOK_LOG environment variable is set.
/// Logs to config.log_file when set, otherwise to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("QUOTEBOOK_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "quotebook_core={},quotebook={}",
        log_level, log_level
    ));

    let Some(ref log_path) = config.log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
