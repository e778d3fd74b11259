//! CLI argument definitions using clap
//!
//! Commands:
//! - labtrack serve [--host <host>] [--port <port>] [--db-path <path>]
//! - labtrack init [--db-path <path>]
//!
//! Flags override the `HOST`, `PORT` and `DB_PATH` environment variables;
//! clap reads the variable when the flag is absent.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// labtrack - record and list diagnostic test results
#[derive(Parser, Debug)]
#[command(name = "labtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the schema if needed, then serve HTTP requests
    Serve {
        /// Address to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long, env = "DB_PATH")]
        db_path: Option<PathBuf>,
    },

    /// Create the schema if needed and exit
    Init {
        /// SQLite database file
        #[arg(long, env = "DB_PATH")]
        db_path: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
