//! JSON I/O handling for CLI
//!
//! - Input: a JSON AST file
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON document from a file
pub fn read_json_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;

    if content.trim().is_empty() {
        return Err(CliError::invalid_json(format!("{} is empty", path.display())));
    }

    let value: Value = serde_json::from_str(&content)?;
    Ok(value)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(&response)
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_line(&response)
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ast.json");
        fs::write(&path, r#"{"type": "Identifier", "name": "x"}"#).unwrap();

        let value = read_json_file(&path).unwrap();
        assert_eq!(value["type"], "Identifier");
    }

    #[test]
    fn test_read_json_file_errors() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            read_json_file(&dir.path().join("missing.json")).unwrap_err().code_str(),
            "AST_CLI_IO_ERROR"
        );

        let path = dir.path().join("empty.json");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(read_json_file(&path).unwrap_err().code_str(), "AST_CLI_INVALID_JSON");

        fs::write(&path, "{ nope").unwrap();
        assert_eq!(read_json_file(&path).unwrap_err().code_str(), "AST_CLI_INVALID_JSON");
    }
}
