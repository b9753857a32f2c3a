//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use peerview_core::config::{self, Config};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "peerview")]
#[command(version = "0.1")]
#[command(about = "Scripted host for the peerview screen tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of ${PEERVIEW_HOME}/config.toml
    #[arg(long, global = true, value_name = "PATH", env = "PEERVIEW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Runs a JSON-lines script against an in-memory backend
    Run {
        /// Script file, one step per line
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Include the final view tree in the report
        #[arg(long)]
        render: bool,
    },
    /// Prints the global event catalog
    Catalog,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::paths::config_path);

    match cli.command {
        Commands::Run { script, render } => {
            let config = Config::load_from(&config_path).context("load config")?;
            init_tracing(&config);

            // screens are single-threaded, so one current-thread runtime drives the session
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("create tokio runtime")?;
            rt.block_on(commands::run::run(&script, render, &config))
        }
        Commands::Catalog => {
            commands::catalog::print();
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path(&config_path);
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(&config_path),
        },
    }
}

/// Logs go to stderr so the report on stdout stays machine-readable.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
