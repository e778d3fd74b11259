//! CLI module for labtrack
//!
//! Provides command-line interface for:
//! - serve: Initialize storage and serve HTTP requests
//! - init: Initialize storage only

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
