//! arcindex - cached archive index and entry resolver
//!
//! CLI entry point that dispatches to subcommands.

use arcindex::cli::{Cli, Commands};
use arcindex::config::ConfigManager;
use arcindex::error::ArcIndexResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ArcIndexResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let loaded = config_manager.load().await?;
    let config = &loaded.config;

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("arcindex=warn"),
        1 => EnvFilter::new("arcindex=info"),
        _ => EnvFilter::new("arcindex=debug"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.without_time().init();
    }
    loaded.source.log();

    // Dispatch to command
    match cli.command {
        Commands::Index(args) => arcindex::cli::commands::index(args, &cli.index, config).await,
        Commands::Resolve(args) => {
            arcindex::cli::commands::resolve(args, &cli.index, config).await
        }
        Commands::Find(args) => arcindex::cli::commands::find(args, &cli.index, config).await,
        Commands::Cache(args) => arcindex::cli::commands::cache(args, &cli.index, config).await,
        Commands::Config(args) => {
            arcindex::cli::commands::config(args, &config_manager, &loaded).await
        }
    }
}
