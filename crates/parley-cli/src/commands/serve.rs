//! `parley serve` -- start the HTTP API server.
//!
//! Loads configuration from the environment, builds the single shared
//! chat session, and serves the API until the process is stopped.
//!
//! # Example
//!
//! ```text
//! parley serve
//! parley serve --host 127.0.0.1 --port 9000
//! ```

use clap::Args;
use tracing::{info, warn};

use parley_core::ChatSession;
use parley_server::{build_router, AppState};
use parley_types::AppConfig;

/// Arguments for the `parley serve` subcommand.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides the HOST env var).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides the PORT env var).
    #[arg(long)]
    pub port: Option<u16>,
}

/// Run the serve command.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);

    info!(
        openai = config.openai_available(),
        claude = config.claude_available(),
        "provider credentials"
    );
    if !config.openai_available() && !config.claude_available() {
        warn!("no provider credentials configured; chat replies will be error text");
    }

    let session = ChatSession::from_config(&config);
    let router = build_router(AppState::new(session));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!(host = %host, port, "parley listening");
    axum::serve(listener, router).await?;

    Ok(())
}
