//! CLI module for nodetypes
//!
//! Provides command-line access to the standard catalog:
//! - list: Type names, optionally by category
//! - describe: One type's schema
//! - categories: The category index
//! - validate: Check a JSON AST file
//! - manifest: Write the catalog manifest

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{categories, describe, list, manifest, run, run_command, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response};
