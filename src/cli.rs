//! CLI definitions for arenaops.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Arenaops CLI.
#[derive(Parser)]
#[command(name = "arenaops")]
#[command(about = "Operational control plane for match runners and the compute grid")]
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
    /// Run the server in foreground (default)
    Run {
        /// Server host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Query runner status from a running instance
    Status {
        /// Base URL of the running instance
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        url: String,

        /// Limit to a single match id
        #[arg(long)]
        match_id: Option<String>,
    },
}
