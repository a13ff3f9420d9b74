//! Crabdesk CLI — the main entry point.
//!
//! Commands:
//! - `build` — Merge knowledge sources and write the catalog artifact
//! - `serve` — Start the HTTP chat server
//! - `chat`  — Send a single message and print the reply

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "crabdesk",
    about = "Crabdesk — offline FAQ support assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (defaults to ./crabdesk.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the knowledge sources and write the compiled catalog artifact
    Build {
        /// Override the artifact output path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Start the HTTP chat server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send a single message and print the assistant's reply
    Chat {
        /// The message to send
        message: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Build { out } => commands::build::run(cli.config.as_deref(), out).await?,
        Commands::Serve { port } => commands::serve::run(cli.config.as_deref(), port).await?,
        Commands::Chat { message } => commands::chat::run(cli.config.as_deref(), &message).await?,
    }

    Ok(())
}
