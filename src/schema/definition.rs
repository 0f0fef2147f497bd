//! Node definitions
//!
//! `TypeConfig` is the declarative input of a registration call; the
//! registry turns it into a `NodeDefinition`, the schema of one node type.

use std::collections::BTreeSet;

use super::errors::{SchemaError, SchemaResult};
use super::field::FieldSpec;

/// Declarative description of a node type, consumed by
/// [`RegistryBuilder::define_type`](super::RegistryBuilder::define_type).
///
/// When no builder keys are given the visitor keys are used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeConfig {
    fields: Vec<(String, FieldSpec)>,
    builder: Option<Vec<String>>,
    visitor: Vec<String>,
    aliases: Vec<String>,
    deprecated_alias: Option<String>,
}

impl TypeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field; declaring the same name again replaces the spec
    /// but keeps the original position.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        upsert(&mut self.fields, name.into(), spec);
        self
    }

    pub fn builder<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn visitor<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visitor = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn deprecated_alias(mut self, name: impl Into<String>) -> Self {
        self.deprecated_alias = Some(name.into());
        self
    }

    pub(crate) fn into_definition(self, name: &str) -> SchemaResult<NodeDefinition> {
        let builder_keys = self.builder.unwrap_or_else(|| self.visitor.clone());

        let mut aliases: Vec<String> = Vec::with_capacity(self.aliases.len());
        for alias in self.aliases {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }

        let definition = NodeDefinition {
            name: name.to_string(),
            fields: self.fields,
            builder_keys,
            visitor_keys: self.visitor,
            aliases,
            deprecated_alias: self.deprecated_alias,
        };
        definition.check_keys()?;
        Ok(definition)
    }
}

/// Schema of one node type
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDefinition {
    name: String,
    fields: Vec<(String, FieldSpec)>,
    builder_keys: Vec<String>,
    visitor_keys: Vec<String>,
    aliases: Vec<String>,
    deprecated_alias: Option<String>,
}

impl NodeDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field spec by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, spec)| spec)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(n, spec)| (n.as_str(), spec))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn builder_keys(&self) -> &[String] {
        &self.builder_keys
    }

    pub fn visitor_keys(&self) -> &[String] {
        &self.visitor_keys
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn has_alias(&self, category: &str) -> bool {
        self.aliases.iter().any(|a| a == category)
    }

    pub fn deprecated_alias(&self) -> Option<&str> {
        self.deprecated_alias.as_deref()
    }

    /// Adds a field or replaces an existing one's spec.
    pub fn set_field(&mut self, name: impl Into<String>, spec: FieldSpec) -> &mut Self {
        upsert(&mut self.fields, name.into(), spec);
        self
    }

    /// Removes a field. Fails if a builder or visitor key still refers to it.
    pub fn remove_field(&mut self, name: &str) -> SchemaResult<FieldSpec> {
        if self.builder_keys.iter().chain(&self.visitor_keys).any(|k| k == name) {
            return Err(SchemaError::invalid_definition(
                &self.name,
                format!("field '{}' is still listed in builder or visitor keys", name),
            ));
        }
        let position = self
            .fields
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| SchemaError::unknown_field(&self.name, name))?;
        Ok(self.fields.remove(position).1)
    }

    pub fn add_alias(&mut self, category: impl Into<String>) -> &mut Self {
        let category = category.into();
        if !self.has_alias(&category) {
            self.aliases.push(category);
        }
        self
    }

    pub fn set_deprecated_alias(&mut self, name: Option<String>) -> &mut Self {
        self.deprecated_alias = name;
        self
    }

    /// Every builder and visitor key must name a declared field, and no key
    /// may be listed twice.
    pub(crate) fn check_keys(&self) -> SchemaResult<()> {
        for (kind, keys) in [("builder", &self.builder_keys), ("visitor", &self.visitor_keys)] {
            for (i, key) in keys.iter().enumerate() {
                if !self.has_field(key) {
                    return Err(SchemaError::invalid_definition(
                        &self.name,
                        format!("{} key '{}' has no field", kind, key),
                    ));
                }
                if keys[..i].contains(key) {
                    return Err(SchemaError::invalid_definition(
                        &self.name,
                        format!("{} key '{}' listed twice", kind, key),
                    ));
                }
            }
        }
        Ok(())
    }

    /// First difference from `other`, used to explain schema conflicts.
    pub(crate) fn difference(&self, other: &NodeDefinition) -> Option<String> {
        if self.field_names() != other.field_names() {
            return Some(format!(
                "fields [{}] vs [{}]",
                self.field_names().join(", "),
                other.field_names().join(", ")
            ));
        }
        for ((name, a), (_, b)) in self.fields.iter().zip(&other.fields) {
            if a != b {
                return Some(format!("field '{}': {} vs {}", name, a.describe(), b.describe()));
            }
        }
        // aliases are a set; declaration order is only kept for display
        let ours: BTreeSet<&str> = self.aliases.iter().map(String::as_str).collect();
        let theirs: BTreeSet<&str> = other.aliases.iter().map(String::as_str).collect();
        if ours != theirs {
            return Some(format!("aliases [{}] vs [{}]", self.aliases.join(", "), other.aliases.join(", ")));
        }
        if self.builder_keys != other.builder_keys {
            return Some("builder keys differ".to_string());
        }
        if self.visitor_keys != other.visitor_keys {
            return Some("visitor keys differ".to_string());
        }
        if self.deprecated_alias != other.deprecated_alias {
            return Some("deprecated alias differs".to_string());
        }
        None
    }
}

fn upsert(fields: &mut Vec<(String, FieldSpec)>, name: String, spec: FieldSpec) {
    match fields.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = spec,
        None => fields.push((name, spec)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::field::{validate, validate_optional_type, validate_type};
    use crate::schema::validator::assert_value_type;
    use crate::schema::value::PrimitiveKind;

    fn type_alias() -> TypeConfig {
        TypeConfig::new()
            .visitor(["id", "typeParameters", "right"])
            .aliases(["Flow", "FlowDeclaration", "Statement", "Declaration"])
            .field("id", validate_type("Identifier"))
            .field("typeParameters", validate_optional_type("TypeParameterDeclaration"))
            .field("right", validate_type("FlowType"))
    }

    #[test]
    fn test_builder_keys_default_to_visitor_keys() {
        let def = type_alias().into_definition("TypeAlias").unwrap();
        assert_eq!(def.builder_keys(), def.visitor_keys());
        assert_eq!(def.field_names(), vec!["id", "typeParameters", "right"]);
    }

    #[test]
    fn test_explicit_builder_keys() {
        let def = TypeConfig::new()
            .builder(["value"])
            .field("value", validate(assert_value_type(PrimitiveKind::Boolean)))
            .into_definition("BooleanLiteralTypeAnnotation")
            .unwrap();
        assert_eq!(def.builder_keys(), ["value".to_string()]);
        assert!(def.visitor_keys().is_empty());
    }

    #[test]
    fn test_dangling_key_rejected() {
        let err = TypeConfig::new()
            .visitor(["elementType"])
            .into_definition("ArrayTypeAnnotation")
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefinition);
        assert!(err.is_fatal());
        assert!(err.message().contains("elementType"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = TypeConfig::new()
            .builder(["id", "id"])
            .field("id", validate_type("Identifier"))
            .into_definition("DeclareVariable")
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefinition);
    }

    #[test]
    fn test_aliases_deduplicated() {
        let def = TypeConfig::new()
            .aliases(["Flow", "FlowType", "Flow"])
            .into_definition("AnyTypeAnnotation")
            .unwrap();
        assert_eq!(def.aliases(), ["Flow".to_string(), "FlowType".to_string()]);
        assert!(def.has_alias("FlowType"));
        assert!(!def.has_alias("FlowBaseAnnotation"));
    }

    #[test]
    fn test_field_mutation() {
        let mut def = type_alias().into_definition("TypeAlias").unwrap();
        def.set_field("declare", validate(assert_value_type(PrimitiveKind::Boolean)));
        assert!(def.has_field("declare"));

        let err = def.remove_field("right").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefinition);

        assert!(def.remove_field("declare").is_ok());
        assert_eq!(def.remove_field("declare").unwrap_err().code(), SchemaErrorCode::UnknownField);
    }

    #[test]
    fn test_difference() {
        let a = type_alias().into_definition("TypeAlias").unwrap();
        let b = type_alias().into_definition("TypeAlias").unwrap();
        assert_eq!(a.difference(&b), None);

        let c = type_alias()
            .field("right", validate_type("Identifier"))
            .into_definition("TypeAlias")
            .unwrap();
        assert!(a.difference(&c).unwrap().contains("right"));

        let d = type_alias().aliases(["Flow"]).into_definition("TypeAlias").unwrap();
        assert!(a.difference(&d).unwrap().starts_with("aliases"));

        let permuted = type_alias()
            .aliases(["Declaration", "Statement", "FlowDeclaration", "Flow"])
            .into_definition("TypeAlias")
            .unwrap();
        assert_eq!(a.difference(&permuted), None);
    }
}
