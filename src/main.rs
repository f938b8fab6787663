//! codementor - Socratic mentor for coding-practice problems
//!
//! Main entry point for the proxy server and the terminal client.

mod adapters;
mod cli;
mod cmd_chat;
mod server;

use anyhow::Context;
use clap::Parser;

use codementor_config::ConfigLoader;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let serving = matches!(cli.command, None | Some(Commands::Serve { .. }));
    server::init_tracing(serving)?;

    let config = ConfigLoader::load_or_default(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command {
        None => server::run_server(config, None, None).await,
        Some(Commands::Serve { host, port }) => server::run_server(config, host, port).await,
        Some(Commands::Chat(args)) => {
            server::check_config(&config)?;
            cmd_chat::run_chat(config, args).await
        }
        Some(Commands::Review { format }) => cmd_chat::run_review(config, &format).await,
        Some(Commands::Solved) => cmd_chat::run_solved(config).await,
        Some(Commands::Reset) => cmd_chat::run_reset(config).await,
    }
}
