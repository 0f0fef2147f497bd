//! Builder factory and validated mutation
//!
//! Construction semantics:
//! - arguments are positional, in builder-key order
//! - more arguments than builder keys is an error
//! - a provided argument must pass its field's validator
//! - an omitted (or null) argument takes the field's default, else stays
//!   unset if the field is optional, else is a missing required field
//! - fields outside the builder keys are left unset
//! - on any failure no node is produced
//!
//! After construction every write goes through the same field specs.

use std::collections::BTreeMap;

use crate::observability::{log_event_with_fields, Event};

use super::definition::NodeDefinition;
use super::errors::{SchemaError, SchemaResult};
use super::field::FieldSpec;
use super::registry::Registry;
use super::value::{Node, Value};

/// Construction function for one node type
#[derive(Debug, Clone, Copy)]
pub struct NodeBuilder<'r> {
    registry: &'r Registry,
    definition: &'r NodeDefinition,
}

impl<'r> NodeBuilder<'r> {
    /// Canonical name of the type this builder produces
    pub fn type_name(&self) -> &'r str {
        self.definition.name()
    }

    /// Positional parameter names
    pub fn keys(&self) -> &'r [String] {
        self.definition.builder_keys()
    }

    pub fn definition(&self) -> &'r NodeDefinition {
        self.definition
    }

    /// Builds a node from positional arguments.
    pub fn build<I>(&self, args: I) -> SchemaResult<Node>
    where
        I: IntoIterator<Item = Value>,
    {
        let type_name = self.definition.name();
        let keys = self.definition.builder_keys();
        let args: Vec<Value> = args.into_iter().collect();

        if args.len() > keys.len() {
            return Err(rejected(SchemaError::too_many_arguments(type_name, args.len(), keys.len())));
        }

        let mut args = args.into_iter();
        let mut fields = BTreeMap::new();

        for key in keys {
            let spec = self
                .definition
                .field(key)
                .ok_or_else(|| SchemaError::unknown_field(type_name, key))?;

            match args.next().unwrap_or(Value::Null) {
                Value::Null => {
                    if let Some(default) = spec.default_value() {
                        fields.insert(key.clone(), default.clone());
                    } else if !spec.is_optional() {
                        return Err(rejected(SchemaError::missing_field(type_name, key, &spec.describe())));
                    }
                }
                value => {
                    check_value(self.registry, type_name, key, spec, &value).map_err(rejected)?;
                    fields.insert(key.clone(), value);
                }
            }
        }

        Ok(Node::new(type_name, fields))
    }
}

impl Registry {
    /// Construction function for `name` (deprecated names resolve).
    pub fn builder(&self, name: &str) -> SchemaResult<NodeBuilder<'_>> {
        Ok(NodeBuilder {
            registry: self,
            definition: self.get_definition(name)?,
        })
    }

    /// Builds a node of type `name` from positional arguments.
    pub fn build<I>(&self, name: &str, args: I) -> SchemaResult<Node>
    where
        I: IntoIterator<Item = Value>,
    {
        self.builder(name)?.build(args)
    }

    /// Assigns a field after construction.
    ///
    /// The value is checked with the field's spec; assigning null unsets the
    /// field. On error the node is left unchanged.
    pub fn set_field(&self, node: &mut Node, field: &str, value: impl Into<Value>) -> SchemaResult<()> {
        let value = value.into();
        if value.is_null() {
            return self.unset_field(node, field).map(|_| ());
        }

        let definition = self.definition_of(node)?;
        let spec = field_spec(definition, field).map_err(mutation_rejected)?;
        check_value(self, definition.name(), field, spec, &value).map_err(mutation_rejected)?;

        node.insert_raw(field, value);
        Ok(())
    }

    /// Clears a field. Only optional fields may be cleared; the previous
    /// value is returned.
    pub fn unset_field(&self, node: &mut Node, field: &str) -> SchemaResult<Option<Value>> {
        let definition = self.definition_of(node)?;
        let spec = field_spec(definition, field).map_err(mutation_rejected)?;
        if !spec.is_optional() {
            return Err(mutation_rejected(SchemaError::missing_field(
                definition.name(),
                field,
                &spec.describe(),
            )));
        }
        Ok(node.remove_raw(field))
    }

    /// Edits a field in place through `edit`, then revalidates.
    ///
    /// The closure works on a copy; the node only changes if the edited
    /// value passes.
    pub fn update_field<F>(&self, node: &mut Node, field: &str, edit: F) -> SchemaResult<()>
    where
        F: FnOnce(&mut Value),
    {
        let mut value = node.get(field).cloned().unwrap_or(Value::Null);
        edit(&mut value);
        self.set_field(node, field, value)
    }

    /// Checks every field of `node`, including required fields the builder
    /// does not take, against its type's schema.
    pub fn validate_node(&self, node: &Node) -> SchemaResult<()> {
        let definition = self.definition_of(node)?;

        for (name, _) in node.fields() {
            if !definition.has_field(name) {
                return Err(SchemaError::unknown_field(definition.name(), name));
            }
        }

        for (name, spec) in definition.fields() {
            spec.check(node.get(name), self)
                .map_err(|violation| SchemaError::validation_failed(definition.name(), name, &spec.describe(), &violation))?;
        }
        Ok(())
    }

    /// [`validate_node`](Self::validate_node) on `node` and every node
    /// reachable through visitor keys.
    pub fn validate_tree(&self, node: &Node) -> SchemaResult<()> {
        self.validate_node(node)?;
        for child in self.children(node) {
            self.validate_tree(child)?;
        }
        Ok(())
    }

    fn definition_of(&self, node: &Node) -> SchemaResult<&NodeDefinition> {
        self.resolve(node.type_name())
            .ok_or_else(|| SchemaError::unknown_type(node.type_name()))
    }
}

fn field_spec<'d>(definition: &'d NodeDefinition, field: &str) -> SchemaResult<&'d FieldSpec> {
    definition
        .field(field)
        .ok_or_else(|| SchemaError::unknown_field(definition.name(), field))
}

pub(crate) fn check_value(
    registry: &Registry,
    type_name: &str,
    field: &str,
    spec: &FieldSpec,
    value: &Value,
) -> SchemaResult<()> {
    spec.check(Some(value), registry)
        .map_err(|violation| SchemaError::validation_failed(type_name, field, &spec.describe(), &violation))
}

fn rejected(err: SchemaError) -> SchemaError {
    log_rejection(Event::BuildRejected, &err);
    err
}

fn mutation_rejected(err: SchemaError) -> SchemaError {
    log_rejection(Event::MutationRejected, &err);
    err
}

fn log_rejection(event: Event, err: &SchemaError) {
    let field = err.details().map(|d| d.field.as_str()).unwrap_or("");
    log_event_with_fields(
        event,
        &[
            ("code", err.code().code()),
            ("field", field),
            ("type", err.type_name().unwrap_or("")),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::definition::TypeConfig;
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::field::{validate, validate_optional, validate_optional_type, validate_type};
    use crate::schema::registry::RegistryBuilder;
    use crate::schema::validator::{array_of_type, assert_one_of, assert_value_type};
    use crate::schema::value::PrimitiveKind;

    fn registry() -> Registry {
        let mut builder = RegistryBuilder::new();
        builder
            .define_type(
                "Identifier",
                TypeConfig::new()
                    .builder(["name"])
                    .aliases(["Expression"])
                    .field("name", validate(assert_value_type(PrimitiveKind::String))),
            )
            .unwrap();
        builder
            .define_type(
                "Variance",
                TypeConfig::new()
                    .builder(["kind"])
                    .field("kind", validate(assert_one_of(["minus", "plus"]))),
            )
            .unwrap();
        builder
            .define_type(
                "ObjectTypeIndexer",
                TypeConfig::new()
                    .visitor(["id", "key", "value", "variance"])
                    .field("id", validate_optional_type("Identifier"))
                    .field("key", validate_type("Identifier"))
                    .field("value", validate_type("Identifier"))
                    .field("static", validate(assert_value_type(PrimitiveKind::Boolean)))
                    .field("variance", validate_optional_type("Variance")),
            )
            .unwrap();
        builder
            .define_type(
                "TupleTypeAnnotation",
                TypeConfig::new()
                    .builder(["types", "inexact"])
                    .visitor(["types"])
                    .field("types", validate(array_of_type("Identifier")))
                    .field("inexact", validate_optional(assert_value_type(PrimitiveKind::Boolean)).with_default(false)),
            )
            .unwrap();
        builder.seal().unwrap()
    }

    fn ident(registry: &Registry, name: &str) -> Value {
        Value::from(registry.build("Identifier", [Value::from(name)]).unwrap())
    }

    #[test]
    fn test_build_sets_type_and_fields() {
        let registry = registry();
        let node = registry.build("Identifier", [Value::from("x")]).unwrap();
        assert_eq!(node.type_name(), "Identifier");
        assert_eq!(node.get("name"), Some(&Value::from("x")));
        assert_eq!(node.field_count(), 1);
    }

    #[test]
    fn test_too_many_arguments() {
        let registry = registry();
        let err = registry
            .build("Identifier", [Value::from("x"), Value::from("y")])
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TooManyArguments);
    }

    #[test]
    fn test_missing_required_argument() {
        let registry = registry();
        let err = registry.build("Identifier", []).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredField);
        assert_eq!(err.details().unwrap().field, "name");

        let err = registry.build("Identifier", [Value::Null]).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_optional_trailing_arguments_stay_unset() {
        let registry = registry();
        let key = ident(&registry, "k");
        let value = ident(&registry, "v");

        let node = registry
            .build("ObjectTypeIndexer", [Value::Null, key, value])
            .unwrap();
        assert!(!node.is_set("id"));
        assert!(!node.is_set("variance"));
        // not a builder key
        assert!(!node.is_set("static"));
    }

    #[test]
    fn test_enum_rejection() {
        let registry = registry();
        let err = registry.build("Variance", [Value::from("both")]).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ValueNotInEnum);
        assert_eq!(err.type_name(), Some("Variance"));
        assert!(err.message().contains("both"));
    }

    #[test]
    fn test_array_element_rejection() {
        let registry = registry();
        let variance = Value::from(registry.build("Variance", [Value::from("plus")]).unwrap());
        let types = Value::Array(vec![ident(&registry, "A"), variance]);

        let err = registry.build("TupleTypeAnnotation", [types]).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ArrayElementInvalid);
        let details = err.details().unwrap();
        assert_eq!(details.field, "types[1]");
        assert_eq!(details.actual, "node Variance");
    }

    #[test]
    fn test_defaults_are_fresh_per_node() {
        let registry = registry();
        let mut first = registry.build("TupleTypeAnnotation", [Value::Array(vec![])]).unwrap();
        let second = registry.build("TupleTypeAnnotation", [Value::Array(vec![])]).unwrap();

        assert_eq!(first.get("inexact"), Some(&Value::Bool(false)));
        registry.set_field(&mut first, "inexact", true).unwrap();
        assert_eq!(second.get("inexact"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_set_field_revalidates() {
        let registry = registry();
        let mut node = registry
            .build("ObjectTypeIndexer", [Value::Null, ident(&registry, "k"), ident(&registry, "v")])
            .unwrap();

        registry.set_field(&mut node, "static", true).unwrap();
        assert_eq!(node.get("static"), Some(&Value::Bool(true)));

        let err = registry.set_field(&mut node, "static", "yes").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
        assert_eq!(node.get("static"), Some(&Value::Bool(true)));

        let err = registry.set_field(&mut node, "kind", "init").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownField);
    }

    #[test]
    fn test_unset_field() {
        let registry = registry();
        let mut node = registry
            .build("ObjectTypeIndexer", [ident(&registry, "i"), ident(&registry, "k"), ident(&registry, "v")])
            .unwrap();

        assert!(registry.unset_field(&mut node, "id").unwrap().is_some());
        assert!(!node.is_set("id"));

        let err = registry.unset_field(&mut node, "key").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredField);
        assert!(node.is_set("key"));

        let err = registry.set_field(&mut node, "value", Value::Null).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_update_field_keeps_node_on_failure() {
        let registry = registry();
        let mut node = registry
            .build("TupleTypeAnnotation", [Value::Array(vec![ident(&registry, "A")])])
            .unwrap();

        let extra = ident(&registry, "B");
        registry
            .update_field(&mut node, "types", |types| {
                if let Value::Array(items) = types {
                    items.push(extra);
                }
            })
            .unwrap();
        assert_eq!(node.get("types").unwrap().as_array().unwrap().len(), 2);

        let err = registry
            .update_field(&mut node, "types", |types| {
                if let Value::Array(items) = types {
                    items.push(Value::from("C"));
                }
            })
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ArrayElementInvalid);
        assert_eq!(node.get("types").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_validate_node_reports_unset_required_field() {
        let registry = registry();
        let mut node = registry
            .build("ObjectTypeIndexer", [Value::Null, ident(&registry, "k"), ident(&registry, "v")])
            .unwrap();

        let err = registry.validate_node(&node).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredField);
        assert_eq!(err.details().unwrap().field, "static");

        registry.set_field(&mut node, "static", false).unwrap();
        assert!(registry.validate_node(&node).is_ok());
        assert!(registry.validate_tree(&node).is_ok());
    }

    #[test]
    fn test_children_follow_visitor_keys() {
        let registry = registry();
        let node = registry
            .build("ObjectTypeIndexer", [ident(&registry, "i"), ident(&registry, "k"), ident(&registry, "v")])
            .unwrap();
        let names: Vec<&str> = registry
            .children(&node)
            .iter()
            .filter_map(|child| child.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["i", "k", "v"]);
    }

    #[test]
    fn test_nested_child_mutation_through_registry() {
        let registry = registry();
        let mut node = registry
            .build("ObjectTypeIndexer", [Value::Null, ident(&registry, "k"), ident(&registry, "v")])
            .unwrap();

        let key = node.child_mut("key").unwrap();
        registry.set_field(key, "name", "renamed").unwrap();
        assert!(registry.set_field(key, "name", 1).is_err());

        assert_eq!(node.child("key").unwrap().get("name"), Some(&Value::from("renamed")));
    }
}
