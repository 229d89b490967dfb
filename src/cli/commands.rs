use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "misional")]
#[command(version, about = "Ward goal tracker with passphrase-scoped plans")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the ward database and seed the configured wards
    Init {
        /// Database path (overrides the config)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Serve the HTTP API
    Serve {
        /// Bind address (overrides the config)
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Database path (overrides the config)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List seeded wards with their goal counts
    Wards {
        /// Database path (overrides the config)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one ward's plan
    Show {
        /// Ward id; omit to authenticate with a passphrase instead
        id: Option<String>,

        /// Database path (overrides the config)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
