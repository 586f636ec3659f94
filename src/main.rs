use app_preload::commands::*;
use app_preload::core::{config::PreloadConfig, error::Result, print_error};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "app-preload")]
#[command(about = "Cached category listings for an application directory")]
#[command(version = "0.1.0")]
struct Cli {
    /// Application directory (overrides PI_APPS_DIR and the config file)
    #[arg(long, global = true)]
    directory: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the listing for a category, from cache when it is fresh
    Get {
        /// Category path (e.g., "Games" or "Games/Puzzle"); omit for the root
        #[arg(default_value = "")]
        category: String,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild cached listings regardless of freshness
    Refresh {
        /// Category to rebuild; omit to rebuild every category
        category: Option<String>,
    },
    /// Keep every category's cache fresh until interrupted
    Daemon {
        /// Seconds between sweeps
        #[arg(long)]
        period: Option<u64>,
    },
    /// Print the current fingerprint of the monitored paths
    Fingerprint,
    /// Show the effective configuration
    Config {
        /// Remember the application directory in the config file
        #[arg(long)]
        save: bool,
    },
}

fn run(cli: Cli) -> Result<()> {
    let config = PreloadConfig::load_or_default();
    let directory = config.resolve_directory(cli.directory)?;

    match cli.command {
        Commands::Get { category, json } => execute_get(&directory, &category, json),
        Commands::Refresh { category } => {
            execute_refresh(config.daemon_config(&directory), category)
        }
        Commands::Daemon { period } => {
            let mut daemon_config = config.daemon_config(&directory);
            if let Some(secs) = period {
                daemon_config = daemon_config.with_refresh_period(Duration::from_secs(secs));
            }
            execute_daemon(daemon_config)
        }
        Commands::Fingerprint => execute_fingerprint(&directory),
        Commands::Config { save } => execute_config(config, &directory, save),
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
