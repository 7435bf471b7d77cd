//! `parley status` -- show provider configuration status.
//!
//! Prints which provider credentials are present in the environment and
//! the effective defaults, without making any network calls.

use clap::Args;

use parley_types::{
    AppConfig, DEFAULT_CHAT_MODEL, DEFAULT_CLAUDE_MODEL, DEFAULT_SYSTEM_PROMPT,
};

/// Arguments for the `parley status` subcommand.
#[derive(Args)]
pub struct StatusArgs {}

/// Run the status command.
pub fn run(_args: StatusArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    println!("parley status");
    println!("=============");
    println!();
    println!("Providers:");
    println!("  OpenAI:    {}", availability(config.openai_available()));
    println!("  Claude:    {}", availability(config.claude_available()));
    println!();
    println!("Defaults:");
    println!("  Chat model:    {DEFAULT_CHAT_MODEL}");
    println!("  Claude model:  {DEFAULT_CLAUDE_MODEL}");
    println!("  System prompt: {DEFAULT_SYSTEM_PROMPT}");
    println!();
    println!("Server:");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);

    Ok(())
}

fn availability(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "not configured (set the API key env var)"
    }
}
