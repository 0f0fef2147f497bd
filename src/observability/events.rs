//! Observable registry events
//!
//! Events are explicit and typed; each carries a fixed severity.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Registration phase
    /// A registry builder was created
    RegistrationBegin,
    /// A node type was registered
    TypeDefined,
    /// An identical definition was registered again and ignored
    TypeRedefined,
    /// A shape template was registered under several names
    ShapeRegistered,
    /// A definition was customized after registration
    TypeCustomized,
    /// The registry was sealed and is now read-only
    RegistrySealed,
    /// Conflicting redefinition (FATAL)
    SchemaConflict,
    /// Internally inconsistent definition (FATAL)
    InvalidDefinition,

    // Steady state
    /// A deprecated type name was resolved
    DeprecatedTypeUsed,
    /// A builder call was rejected
    BuildRejected,
    /// A field assignment was rejected
    MutationRejected,
    /// A schema manifest was written to disk
    ManifestWritten,
    /// Writing a schema manifest failed
    ManifestWriteFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RegistrationBegin => "REGISTRY_BUILD_BEGIN",
            Event::TypeDefined => "NODE_TYPE_DEFINED",
            Event::TypeRedefined => "NODE_TYPE_REDEFINED",
            Event::ShapeRegistered => "SHAPE_TEMPLATE_REGISTERED",
            Event::TypeCustomized => "NODE_TYPE_CUSTOMIZED",
            Event::RegistrySealed => "REGISTRY_SEALED",
            Event::SchemaConflict => "SCHEMA_CONFLICT",
            Event::InvalidDefinition => "INVALID_DEFINITION",
            Event::DeprecatedTypeUsed => "DEPRECATED_TYPE_USED",
            Event::BuildRejected => "NODE_BUILD_REJECTED",
            Event::MutationRejected => "NODE_MUTATION_REJECTED",
            Event::ManifestWritten => "MANIFEST_WRITTEN",
            Event::ManifestWriteFailed => "MANIFEST_WRITE_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Event::TypeDefined
            | Event::TypeRedefined
            | Event::ShapeRegistered
            | Event::BuildRejected
            | Event::MutationRejected => Severity::Trace,
            Event::RegistrationBegin
            | Event::TypeCustomized
            | Event::RegistrySealed
            | Event::ManifestWritten => Severity::Info,
            Event::DeprecatedTypeUsed => Severity::Warn,
            Event::ManifestWriteFailed => Severity::Error,
            Event::SchemaConflict | Event::InvalidDefinition => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
