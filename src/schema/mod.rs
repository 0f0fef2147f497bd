//! Node-type schema subsystem
//!
//! Every AST node kind has a schema: its fields and their contracts, the
//! order children are visited in, the positional parameters of its builder,
//! and the categories it belongs to.
//!
//! # Design Principles
//!
//! - Registration once at startup, then read-only (`RegistryBuilder` -> `Registry`)
//! - Every field write is validated, at construction and afterwards
//! - Categories are flat labels, never inferred transitively
//! - A rejected write leaves no partial node behind
//! - Deterministic validation

mod alias;
mod builder;
mod definition;
mod errors;
mod field;
mod import;
mod manifest;
mod registry;
mod validator;
mod value;

pub use alias::AliasIndex;
pub use builder::NodeBuilder;
pub use definition::{NodeDefinition, TypeConfig};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails, Violation};
pub use field::{validate, validate_optional, validate_optional_type, validate_type, FieldSpec};
pub use manifest::{FieldManifest, RegistryManifest, TypeManifest};
pub use registry::{Registry, RegistryBuilder};
pub use validator::{
    array_of, array_of_type, assert_node_type, assert_one_of, assert_value_type, optional, TypeClassifier,
    TypeNames, Validator,
};
pub use value::{Node, PrimitiveKind, Value};
