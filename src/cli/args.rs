//! CLI argument definitions using clap
//!
//! Commands:
//! - dmlsem explain --catalog <path> [--statement <path>] [--config <path>]
//! - dmlsem check --catalog <path> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dmlsem - semantic analysis of DML statements against a table catalog
#[derive(Parser, Debug)]
#[command(name = "dmlsem")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one statement and print its explain plan
    Explain {
        /// Path to the JSON table catalog
        #[arg(long)]
        catalog: PathBuf,

        /// Path to the JSON statement (stdin if omitted)
        #[arg(long)]
        statement: Option<PathBuf>,

        /// Path to the analyzer configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Keyspace for unqualified table names
        #[arg(long, default_value = "default")]
        keyspace: String,

        /// Print a human-readable plan instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Validate a catalog and configuration, then exit
    Check {
        /// Path to the JSON table catalog
        #[arg(long)]
        catalog: PathBuf,

        /// Path to the analyzer configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
