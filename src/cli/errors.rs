//! CLI-specific error types
//!
//! Schema errors pass through with their own codes; the CLI adds codes for
//! what happens around the registry (files, JSON).

use std::fmt;
use std::io;

use crate::schema::{SchemaError, SchemaErrorCode};

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// I/O error (files, stdout)
    IoError,
    /// Input is not valid JSON
    InvalidJson,
    /// Rejected by the registry
    Schema(SchemaErrorCode),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "AST_CLI_IO_ERROR",
            Self::InvalidJson => "AST_CLI_INVALID_JSON",
            Self::Schema(code) => code.code(),
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_json(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidJson, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_json(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::Schema(e.code()), e.message())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_keeps_code() {
        let err = CliError::from(SchemaError::unknown_type("Bogus"));
        assert_eq!(err.code(), &CliErrorCode::Schema(SchemaErrorCode::UnknownType));
        assert_eq!(err.code_str(), "AST_UNKNOWN_TYPE");
        assert!(err.message().contains("Bogus"));
    }

    #[test]
    fn test_json_error_code() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CliError::from(parse).code_str(), "AST_CLI_INVALID_JSON");
    }
}
