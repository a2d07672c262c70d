//! tfvc-cache - local state caches for a TFVC client
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tfvc_cache::cli::args::{ConfigAction, ConfigArgs};
use tfvc_cache::cli::{commands, Cli, Commands};
use tfvc_cache::config::{Config, ConfigManager};
use tfvc_cache::error::CacheResult;
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

async fn run() -> CacheResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // Init must work even when the existing file no longer parses
    let config = match cli.command {
        Commands::Config(ConfigArgs {
            action: Some(ConfigAction::Init { .. }),
        }) => Config::default(),
        _ => config_manager.load().await?,
    };

    // 0 = warn, 1 = info, 2 = debug, 3+ = trace
    let filter = match cli.verbose {
        0 => EnvFilter::new("tfvc_cache=warn"),
        1 => EnvFilter::new("tfvc_cache=info"),
        2 => EnvFilter::new("tfvc_cache=debug"),
        _ => EnvFilter::new("tfvc_cache=trace"),
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

    match cli.command {
        Commands::Classify(args) => commands::classify(args, &config).await,
        Commands::Reconcile(args) => commands::reconcile(args, &config).await,
        Commands::Content(args) => commands::content(args, &config).await,
        Commands::Config(args) => commands::config(args, &config_manager, &config).await,
    }
}
