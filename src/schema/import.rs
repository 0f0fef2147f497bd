//! JSON AST import
//!
//! Reads the conventional `{"type": ..., field: ...}` shape back into
//! validated [`Node`]s. Every nested object carrying a `type` becomes a node
//! and goes through the same checks as a builder call, plus a full
//! [`Registry::validate_node`] pass so required non-builder fields are
//! enforced too.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use super::errors::{SchemaError, SchemaResult, Violation};
use super::registry::Registry;
use super::value::{Node, Value};

/// Keys carried by parser output that are not schema fields
const METADATA_KEYS: &[&str] = &[
    "start",
    "end",
    "loc",
    "range",
    "leadingComments",
    "trailingComments",
    "innerComments",
    "extra",
];

impl Registry {
    /// Imports one node (and everything below it) from JSON.
    ///
    /// Deprecated type names are accepted and the node is tagged with the
    /// canonical name. Absent fields take their default.
    pub fn node_from_json(&self, json: &Json) -> SchemaResult<Node> {
        let object = match json {
            Json::Object(object) => object,
            other => {
                return Err(SchemaError::validation_failed(
                    "<root>",
                    "type",
                    "node object",
                    &Violation::TypeMismatch {
                        expected: "node object".to_string(),
                        actual: json_kind(other).to_string(),
                    },
                ))
            }
        };

        let type_name = match object.get("type").and_then(Json::as_str) {
            Some(name) => name,
            None => {
                return Err(SchemaError::validation_failed(
                    "<root>",
                    "type",
                    "string",
                    &Violation::Missing,
                ))
            }
        };

        let definition = self.get_definition(type_name)?;
        let mut fields = BTreeMap::new();

        for (key, raw) in object {
            if key == "type" {
                continue;
            }
            if !definition.has_field(key) {
                // declared fields win over parser metadata of the same name
                if METADATA_KEYS.contains(&key.as_str()) {
                    continue;
                }
                return Err(SchemaError::unknown_field(definition.name(), key));
            }
            let value = self.value_from_json(definition.name(), key, raw)?;
            if !value.is_null() {
                fields.insert(key.clone(), value);
            }
        }

        for (name, spec) in definition.fields() {
            if fields.contains_key(name) {
                continue;
            }
            if let Some(default) = spec.default_value() {
                fields.insert(name.to_string(), default.clone());
            }
        }

        let node = Node::new(definition.name(), fields);
        self.validate_node(&node)?;
        Ok(node)
    }

    fn value_from_json(&self, type_name: &str, field: &str, json: &Json) -> SchemaResult<Value> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_f64() {
                Some(n) => Value::Number(n),
                None => {
                    return Err(SchemaError::validation_failed(
                        type_name,
                        field,
                        "number",
                        &Violation::TypeMismatch {
                            expected: "number".to_string(),
                            actual: n.to_string(),
                        },
                    ))
                }
            },
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.value_from_json(type_name, field, item))
                    .collect::<SchemaResult<Vec<_>>>()?,
            ),
            Json::Object(object) if object.contains_key("type") => Value::from(self.node_from_json(json)?),
            Json::Object(_) => {
                return Err(SchemaError::validation_failed(
                    type_name,
                    field,
                    "node",
                    &Violation::TypeMismatch {
                        expected: "node".to_string(),
                        actual: "object without a type".to_string(),
                    },
                ))
            }
        })
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
