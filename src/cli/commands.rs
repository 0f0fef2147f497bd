//! CLI command implementations
//!
//! Every command works on the sealed standard catalog and produces one JSON
//! payload. The command functions take the registry explicitly so they can
//! run against any catalog in tests.

use std::path::Path;

use serde_json::{json, Value};

use crate::definitions;
use crate::observability::Logger;
use crate::schema::{Node, Registry, TypeManifest};

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_json_file, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    if let Some(level) = cli.log_level {
        Logger::set_threshold(level);
    }

    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<Value> {
    let registry = definitions::standard()?;

    match cmd {
        Command::List { category } => Ok(list(registry, category.as_deref())),
        Command::Describe { name } => describe(registry, &name),
        Command::Categories => Ok(categories(registry)),
        Command::Validate { file } => validate(registry, &file),
        Command::Manifest { out } => manifest(registry, &out),
    }
}

/// Type names, optionally restricted to one category
pub fn list(registry: &Registry, category: Option<&str>) -> Value {
    let types: Vec<&str> = match category {
        Some(category) => registry.all_of_category(category),
        None => registry.type_names().collect(),
    };
    json!({ "count": types.len(), "types": types })
}

/// Schema of one type
pub fn describe(registry: &Registry, name: &str) -> CliResult<Value> {
    let definition = registry.get_definition(name)?;
    let mut data = serde_json::to_value(TypeManifest::from(definition))?;
    if registry.is_deprecated(name) {
        data["requested_as"] = json!(name);
    }
    Ok(data)
}

/// Category index
pub fn categories(registry: &Registry) -> Value {
    json!(registry.alias_index().to_map())
}

/// Imports a JSON AST file; every node is validated on the way in.
pub fn validate(registry: &Registry, file: &Path) -> CliResult<Value> {
    let json = read_json_file(file)?;
    let node = registry.node_from_json(&json)?;
    Ok(json!({
        "valid": true,
        "type": node.type_name(),
        "nodes": count_nodes(registry, &node),
    }))
}

/// Writes the manifest; refuses to overwrite.
pub fn manifest(registry: &Registry, out: &Path) -> CliResult<Value> {
    let path = registry.save_manifest(out)?;
    Ok(json!({
        "path": path.display().to_string(),
        "types": registry.len(),
    }))
}

fn count_nodes(registry: &Registry, node: &Node) -> usize {
    1 + registry
        .children(node)
        .into_iter()
        .map(|child| count_nodes(registry, child))
        .sum::<usize>()
}
