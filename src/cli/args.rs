//! CLI argument definitions using clap
//!
//! Commands:
//! - nodetypes list [--category <name>]
//! - nodetypes describe <type>
//! - nodetypes categories
//! - nodetypes validate <file>
//! - nodetypes manifest --out <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::LogLevel;

/// nodetypes - inspect and validate against the AST node-type catalog
#[derive(Parser, Debug)]
#[command(name = "nodetypes")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log threshold (trace, info, warn, error, fatal, off); overrides NODETYPES_LOG
    #[arg(long, global = true, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered node types
    List {
        /// Only types carrying this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show the schema of one node type
    Describe {
        /// Type name (deprecated names accepted)
        name: String,
    },

    /// Show the category index
    Categories,

    /// Validate a JSON AST file against the catalog
    Validate {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Write the catalog manifest
    Manifest {
        /// Output path; must not exist yet
        #[arg(long, default_value = "./nodetypes-manifest.json")]
        out: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

fn parse_log_level(raw: &str) -> Result<LogLevel, String> {
    LogLevel::parse(raw).ok_or_else(|| format!("unknown log level '{}'", raw))
}
