//! `parley` -- CLI binary for the parley chat relay.
//!
//! Provides the following subcommands:
//!
//! - `parley serve` -- Start the HTTP API server.
//! - `parley status` -- Show provider configuration status.

use clap::Parser;

mod commands;

/// parley chat relay CLI.
#[derive(Parser)]
#[command(name = "parley", about = "parley chat relay CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    Serve(commands::serve::ServeArgs),

    /// Show provider configuration status.
    Status(commands::status::StatusArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Status(args) => commands::status::run(args)?,
    }

    Ok(())
}
