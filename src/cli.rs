//! CLI definitions for searchlens.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// searchlens CLI.
#[derive(Parser)]
#[command(name = "searchlens")]
#[command(about = "AI answers for search result pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Settings file path
    #[arg(
        short,
        long,
        default_value = "config/searchlens.toml",
        env = "SEARCHLENS_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the WebSocket bridge in the foreground (default)
    Serve {
        /// Listen host (overrides the settings file)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides the settings file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Answer one query and print the result
    Ask {
        /// Search query
        query: String,

        /// Answer provider for this query only (direct, scrape)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Show whether answers are enabled
    Status,

    /// Enable or disable answers
    Toggle,

    /// Open the chat page in a visible browser window
    Open,

    /// Send a minimal request to the completion endpoint
    Probe,

    /// Inspect or edit the key/value store
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print stored values (auth token redacted)
    Show,

    /// Store one value. Parsed as JSON when possible, otherwise as a string.
    Set {
        /// Store key (extensionEnabled, answerProvider, model, maxTokens, promptPrefix, authToken)
        key: String,

        /// New value
        value: String,
    },
}
