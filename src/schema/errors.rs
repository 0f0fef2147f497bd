//! Schema error types
//!
//! Error codes:
//! - AST_UNKNOWN_TYPE (REJECT)
//! - AST_SCHEMA_CONFLICT (FATAL)
//! - AST_INVALID_DEFINITION (FATAL)
//! - AST_MISSING_REQUIRED_FIELD (REJECT)
//! - AST_TYPE_MISMATCH (REJECT)
//! - AST_VALUE_NOT_IN_ENUM (REJECT)
//! - AST_ARRAY_ELEMENT_INVALID (REJECT)
//! - AST_TOO_MANY_ARGUMENTS (REJECT)
//! - AST_UNKNOWN_FIELD (REJECT)
//! - AST_MANIFEST_IO (REJECT)
//!
//! Registration errors are FATAL: they describe a defect in the schema
//! definitions themselves and must halt startup. Construction and mutation
//! errors are REJECT: the node is left untouched and the caller decides.

use std::fmt;

use thiserror::Error;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Value or request rejected, caller may recover
    Reject,
    /// Schema definitions are broken, startup must stop
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Lookup of a type name that was never registered
    UnknownType,
    /// Redefinition of a type name with a different schema
    SchemaConflict,
    /// Definition is internally inconsistent (dangling key, bad default, ...)
    InvalidDefinition,
    /// Required field omitted or unset
    MissingRequiredField,
    /// Value has the wrong primitive kind or node category
    TypeMismatch,
    /// Value is not one of the enumerated literals
    ValueNotInEnum,
    /// An element of a sequence failed its constraint
    ArrayElementInvalid,
    /// More positional builder arguments than builder keys
    TooManyArguments,
    /// Field name not declared on the type
    UnknownField,
    /// Manifest could not be written or serialized
    ManifestIo,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownType => "AST_UNKNOWN_TYPE",
            SchemaErrorCode::SchemaConflict => "AST_SCHEMA_CONFLICT",
            SchemaErrorCode::InvalidDefinition => "AST_INVALID_DEFINITION",
            SchemaErrorCode::MissingRequiredField => "AST_MISSING_REQUIRED_FIELD",
            SchemaErrorCode::TypeMismatch => "AST_TYPE_MISMATCH",
            SchemaErrorCode::ValueNotInEnum => "AST_VALUE_NOT_IN_ENUM",
            SchemaErrorCode::ArrayElementInvalid => "AST_ARRAY_ELEMENT_INVALID",
            SchemaErrorCode::TooManyArguments => "AST_TOO_MANY_ARGUMENTS",
            SchemaErrorCode::UnknownField => "AST_UNKNOWN_FIELD",
            SchemaErrorCode::ManifestIo => "AST_MANIFEST_IO",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::SchemaConflict | SchemaErrorCode::InvalidDefinition => {
                Severity::Fatal
            }
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a single value failed a validator.
///
/// Produced by the combinators, which know nothing about the owning type or
/// field; the registry attaches both when lifting it into a [`SchemaError`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("expected a value, got nothing")]
    Missing,

    #[error("expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("expected one of [{}], got {actual}", .allowed.join(", "))]
    NotInEnum { allowed: Vec<String>, actual: String },

    #[error("element [{index}]: {inner}")]
    ArrayElement { index: usize, inner: Box<Violation> },
}

impl Violation {
    /// Error code this violation maps to
    pub fn code(&self) -> SchemaErrorCode {
        match self {
            Violation::Missing => SchemaErrorCode::MissingRequiredField,
            Violation::TypeMismatch { .. } => SchemaErrorCode::TypeMismatch,
            Violation::NotInEnum { .. } => SchemaErrorCode::ValueNotInEnum,
            Violation::ArrayElement { .. } => SchemaErrorCode::ArrayElementInvalid,
        }
    }

    /// Innermost reason, following array elements down
    pub fn root_cause(&self) -> &Violation {
        match self {
            Violation::ArrayElement { inner, .. } => inner.root_cause(),
            other => other,
        }
    }

    /// Indices of the failing elements from outermost to innermost
    pub fn element_path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = self;
        while let Violation::ArrayElement { index, inner } = current {
            path.push(*index);
            current = inner;
        }
        path
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationDetails {
    /// Field path (e.g., "params[2]")
    pub field: String,
    /// Expected constraint
    pub expected: String,
    /// Actual value found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: "missing".into(),
        }
    }

    /// Builds details from a combinator violation on `field`
    pub fn from_violation(field: &str, violation: &Violation, expected: &str) -> Self {
        let mut path = field.to_string();
        for index in violation.element_path() {
            path.push_str(&format!("[{}]", index));
        }

        match violation.root_cause() {
            Violation::Missing => Self::missing_field(path, expected),
            Violation::TypeMismatch { expected, actual } => Self::new(path, expected.as_str(), actual.as_str()),
            Violation::NotInEnum { allowed, actual } => {
                Self::new(path, format!("one of [{}]", allowed.join(", ")), actual.as_str())
            }
            Violation::ArrayElement { .. } => Self::new(path, expected, "invalid element"),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Node type name if applicable
    type_name: Option<String>,
    /// Validation details if applicable
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::UnknownType,
            message: format!("Node type '{}' is not registered", name),
            type_name: Some(name),
            details: None,
        }
    }

    /// Create a schema conflict error (FATAL)
    pub fn schema_conflict(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::SchemaConflict,
            message: format!("Node type '{}' redefined with a conflicting schema: {}", name, reason.into()),
            type_name: Some(name),
            details: None,
        }
    }

    /// Create an invalid definition error (FATAL)
    pub fn invalid_definition(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::InvalidDefinition,
            message: format!("Invalid definition for node type '{}': {}", name, reason.into()),
            type_name: Some(name),
            details: None,
        }
    }

    /// Create a validation error from a combinator violation
    pub fn validation_failed(
        type_name: impl Into<String>,
        field: &str,
        expected: &str,
        violation: &Violation,
    ) -> Self {
        let name = type_name.into();
        let details = ValidationDetails::from_violation(field, violation, expected);
        Self {
            code: violation.code(),
            message: format!("{}: {}", name, details),
            type_name: Some(name),
            details: Some(details),
        }
    }

    /// Create a missing required field error
    pub fn missing_field(type_name: impl Into<String>, field: &str, expected: &str) -> Self {
        Self::validation_failed(type_name, field, expected, &Violation::Missing)
    }

    /// Create a too many arguments error
    pub fn too_many_arguments(type_name: impl Into<String>, received: usize, accepted: usize) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::TooManyArguments,
            message: format!(
                "{}: too many arguments passed, received {} but can receive no more than {}",
                name, received, accepted
            ),
            type_name: Some(name),
            details: None,
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(type_name: impl Into<String>, field: &str) -> Self {
        let name = type_name.into();
        Self {
            code: SchemaErrorCode::UnknownField,
            message: format!("{}: field '{}' is not declared", name, field),
            type_name: Some(name),
            details: Some(ValidationDetails::new(field, "declared field", "undeclared field")),
        }
    }

    /// Create a manifest I/O error
    pub fn manifest_io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::ManifestIo,
            message: format!("Manifest '{}': {}", path.into(), reason.into()),
            type_name: None,
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the node type name if applicable
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::UnknownType.code(), "AST_UNKNOWN_TYPE");
        assert_eq!(SchemaErrorCode::SchemaConflict.code(), "AST_SCHEMA_CONFLICT");
        assert_eq!(SchemaErrorCode::MissingRequiredField.code(), "AST_MISSING_REQUIRED_FIELD");
        assert_eq!(SchemaErrorCode::TypeMismatch.code(), "AST_TYPE_MISMATCH");
        assert_eq!(SchemaErrorCode::ValueNotInEnum.code(), "AST_VALUE_NOT_IN_ENUM");
        assert_eq!(SchemaErrorCode::ArrayElementInvalid.code(), "AST_ARRAY_ELEMENT_INVALID");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::SchemaConflict.severity(), Severity::Fatal);
        assert_eq!(SchemaErrorCode::InvalidDefinition.severity(), Severity::Fatal);
        assert_eq!(SchemaErrorCode::TypeMismatch.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::UnknownType.severity(), Severity::Reject);
    }

    #[test]
    fn test_array_violation_path() {
        let violation = Violation::ArrayElement {
            index: 1,
            inner: Box::new(Violation::ArrayElement {
                index: 4,
                inner: Box::new(Violation::TypeMismatch {
                    expected: "string".into(),
                    actual: "number 3".into(),
                }),
            }),
        };

        assert_eq!(violation.element_path(), vec![1, 4]);
        assert_eq!(violation.code(), SchemaErrorCode::ArrayElementInvalid);

        let details = ValidationDetails::from_violation("types", &violation, "array of array of string");
        assert_eq!(details.field, "types[1][4]");
        assert_eq!(details.expected, "string");
        assert_eq!(details.actual, "number 3");
    }

    #[test]
    fn test_validation_error_names_type_and_field() {
        let err = SchemaError::validation_failed(
            "Variance",
            "kind",
            "one of [\"minus\", \"plus\"]",
            &Violation::NotInEnum {
                allowed: vec!["\"minus\"".into(), "\"plus\"".into()],
                actual: "\"both\"".into(),
            },
        );

        assert_eq!(err.code(), SchemaErrorCode::ValueNotInEnum);
        assert_eq!(err.type_name(), Some("Variance"));
        assert_eq!(err.details().unwrap().field, "kind");
        let display = format!("{}", err);
        assert!(display.contains("AST_VALUE_NOT_IN_ENUM"));
        assert!(display.contains("both"));
    }

    #[test]
    fn test_conflict_is_fatal() {
        let err = SchemaError::schema_conflict("TypeAlias", "fields differ");
        assert!(err.is_fatal());
        assert!(format!("{}", err).starts_with("[FATAL]"));
    }
}
