use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollfx_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "scrollfx")]
#[command(author, version, about = "Static site server for scroll-driven pages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to ~/.config/scrollfx/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the built site (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short = 'p', long)]
        port: Option<u16>,
        /// Directory holding the built site
        #[arg(short = 'r', long)]
        root: Option<PathBuf>,
    },
    /// Validate the configuration and list the declared effect bindings
    Check {
        /// Print the accepted bindings as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Serve { host, port, root }) => {
            commands::serve::run(config, host, port, root).await
        }
        None => commands::serve::run(config, None, None, None).await,
        Some(Commands::Check { json }) => commands::check::run(&config, json),
    }
}
