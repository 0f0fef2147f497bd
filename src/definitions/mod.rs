//! Standard node-type catalog
//!
//! The Flow type-annotation nodes plus the handful of core JavaScript nodes
//! they refer to. The catalog is plain registration data: it only uses the
//! public `RegistryBuilder` API.
//!
//! `standard()` seals the catalog once per process and hands out a shared
//! reference. Callers that want to customize the catalog start from
//! `standard_builder()` instead and seal their own copy.

mod core_types;
mod flow;
mod parameters;

use std::sync::OnceLock;

use crate::config::RegistryConfig;
use crate::schema::{
    assert_value_type, validate, validate_optional, FieldSpec, PrimitiveKind, Registry, RegistryBuilder, SchemaResult,
};

pub use parameters::interfaceish;

/// Leaf annotations with no fields (`any`, `number`, ...)
pub(crate) const BASE_ANNOTATION: [&str; 3] = ["Flow", "FlowType", "FlowBaseAnnotation"];
pub(crate) const FLOW_TYPE: [&str; 2] = ["Flow", "FlowType"];
pub(crate) const FLOW_DECLARATION: [&str; 4] = ["Flow", "FlowDeclaration", "Statement", "Declaration"];
pub(crate) const OBJECT_MEMBER: [&str; 2] = ["Flow", "UserWhitespacable"];
pub(crate) const LITERAL: [&str; 4] = ["Expression", "Pureish", "Literal", "Immutable"];

static STANDARD: OnceLock<SchemaResult<Registry>> = OnceLock::new();

/// The sealed standard catalog.
///
/// Registration runs on first call; every later call returns the same
/// registry (or the same registration error).
pub fn standard() -> SchemaResult<&'static Registry> {
    STANDARD
        .get_or_init(|| standard_builder().and_then(RegistryBuilder::seal))
        .as_ref()
        .map_err(Clone::clone)
}

/// Registration phase of the standard catalog, not yet sealed
pub fn standard_builder() -> SchemaResult<RegistryBuilder> {
    standard_builder_with(RegistryConfig::default())
}

pub fn standard_builder_with(config: RegistryConfig) -> SchemaResult<RegistryBuilder> {
    let mut builder = RegistryBuilder::with_config(config);
    core_types::register(&mut builder)?;
    parameters::register(&mut builder)?;
    flow::register(&mut builder)?;
    Ok(builder)
}

pub(crate) fn boolean() -> FieldSpec {
    validate(assert_value_type(PrimitiveKind::Boolean))
}

pub(crate) fn optional_boolean() -> FieldSpec {
    validate_optional(assert_value_type(PrimitiveKind::Boolean))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_seals() {
        let registry = standard().unwrap();
        assert!(registry.contains("AnyTypeAnnotation"));
        assert!(registry.contains("Identifier"));
        assert!(registry.config().strict_references);
    }

    #[test]
    fn test_standard_is_shared() {
        let first = standard().unwrap();
        let second = standard().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_standard_builder_is_fresh() {
        let builder = standard_builder().unwrap();
        assert_eq!(builder.len(), standard().unwrap().len());
    }

    #[test]
    fn test_strict_config_rejects_nothing_in_catalog() {
        // the catalog never registers a name twice
        assert!(standard_builder_with(RegistryConfig::strict()).unwrap().seal().is_ok());
    }
}
