//! buildcache - Build output cache
//!
//! CLI entry point that dispatches to subcommands.

use buildcache::cli::{Cli, Commands};
use buildcache::config::ConfigManager;
use buildcache::error::BuildCacheResult;
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

async fn run() -> BuildCacheResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let mut config = config_manager.load().await?;
    cli.apply_overrides(&mut config);

    // 0 = warn, 1 = info, 2+ = debug. Logs go to stderr so `load` can
    // stream entries on stdout.
    let filter = match cli.verbose {
        0 => EnvFilter::new("buildcache=warn"),
        1 => EnvFilter::new("buildcache=info"),
        _ => EnvFilter::new("buildcache=debug"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Load(args) => buildcache::cli::commands::load(args, &config).await,
        Commands::Store(args) => buildcache::cli::commands::store(args, &config).await,
        Commands::Describe => buildcache::cli::commands::describe(&config).await,
        Commands::Config(args) => {
            buildcache::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
