//! CLI definitions for codementor.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// codementor CLI.
#[derive(Parser)]
#[command(name = "codementor")]
#[command(about = "Socratic mentor for coding-practice problems")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the model proxy in foreground (default)
    Serve {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Chat with the mentor about a problem
    Chat(ChatArgs),

    /// Show the review catalog and clear its notification
    Review {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show problems marked as solved
    Solved,

    /// Remove every stored transcript, review entry and cache
    Reset,
}

#[derive(Args)]
pub(crate) struct ChatArgs {
    /// Problem page URL, e.g. https://leetcode.com/problems/two-sum/
    #[arg(long)]
    pub url: String,

    /// Problem title (derived from the URL when omitted)
    #[arg(long)]
    pub title: Option<String>,

    /// File holding the problem description
    #[arg(long)]
    pub description_file: Option<PathBuf>,

    /// File holding your current code; re-read on every question
    #[arg(long)]
    pub code_file: Option<PathBuf>,

    /// Proxy endpoint (overrides `client.endpoint`)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Call the upstream model directly instead of the proxy
    #[arg(long)]
    pub direct: bool,
}
