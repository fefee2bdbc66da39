//! Study Vibes Radio
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use study_vibes::cli::{Cli, Commands};
use study_vibes::config::ConfigManager;
use study_vibes::error::VibesResult;
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

async fn run() -> VibesResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("study_vibes=warn"),
        1 => EnvFilter::new("study_vibes=info"),
        _ => EnvFilter::new("study_vibes=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    study_vibes::ui::init_theme();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    // Ensure state directories exist
    ConfigManager::ensure_state_dirs().await?;

    match cli.command {
        Commands::Play(args) => study_vibes::cli::commands::play(args, &config).await,
        Commands::Moods => study_vibes::cli::commands::moods().await,
        Commands::Status => study_vibes::cli::commands::status(&config).await,
        Commands::Config(args) => {
            study_vibes::cli::commands::config(args, &config, &config_manager).await
        }
        Commands::Cache(args) => study_vibes::cli::commands::cache(args, &config).await,
    }
}
