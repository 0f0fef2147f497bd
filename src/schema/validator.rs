//! Validator combinators
//!
//! A validator is a closed tree of constraints checked by pattern matching:
//! - primitive kind checks
//! - enumerations of literals
//! - node type / category checks
//! - arrays whose every element satisfies an inner constraint
//! - optional wrappers that let an absent value through
//!
//! Validators are pure. They never mutate the value and never look at
//! anything but the value and the type classifier they are handed.

use std::fmt;

use super::errors::Violation;
use super::value::{PrimitiveKind, Value};

/// Answers "is a node of type `node_type` acceptable where `target` is
/// expected", where `target` is a concrete type name or a category label.
pub trait TypeClassifier {
    fn is_type(&self, node_type: &str, target: &str) -> bool;
}

/// Constraint on a single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Runtime kind must match
    ValueType(PrimitiveKind),
    /// Value must strictly equal one of the literals
    OneOf(Vec<Value>),
    /// Value must be a node of one of the types, or classified under one
    NodeType(Vec<String>),
    /// Value must be an array whose every element passes the inner validator
    ArrayOf(Box<Validator>),
    /// Null passes, anything else goes to the inner validator
    Optional(Box<Validator>),
}

impl Validator {
    /// Checks a value.
    pub fn check(&self, value: &Value, classifier: &dyn TypeClassifier) -> Result<(), Violation> {
        match self {
            Validator::ValueType(kind) => {
                if value.kind() == *kind {
                    Ok(())
                } else {
                    Err(Violation::TypeMismatch {
                        expected: kind.as_str().to_string(),
                        actual: value.describe(),
                    })
                }
            }
            Validator::OneOf(allowed) => {
                if allowed.iter().any(|literal| literal == value) {
                    Ok(())
                } else {
                    Err(Violation::NotInEnum {
                        allowed: allowed.iter().map(|v| v.to_string()).collect(),
                        actual: value.to_string(),
                    })
                }
            }
            Validator::NodeType(targets) => {
                let accepted = value
                    .as_node()
                    .map(|node| targets.iter().any(|t| classifier.is_type(node.type_name(), t)))
                    .unwrap_or(false);
                if accepted {
                    Ok(())
                } else {
                    Err(Violation::TypeMismatch {
                        expected: self.describe(),
                        actual: value.describe(),
                    })
                }
            }
            Validator::ArrayOf(inner) => {
                let items = value.as_array().ok_or_else(|| Violation::TypeMismatch {
                    expected: self.describe(),
                    actual: value.describe(),
                })?;
                for (index, item) in items.iter().enumerate() {
                    inner.check(item, classifier).map_err(|reason| Violation::ArrayElement {
                        index,
                        inner: Box::new(reason),
                    })?;
                }
                Ok(())
            }
            Validator::Optional(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.check(value, classifier)
                }
            }
        }
    }

    /// Human-readable description of the constraint
    pub fn describe(&self) -> String {
        match self {
            Validator::ValueType(kind) => kind.as_str().to_string(),
            Validator::OneOf(allowed) => {
                let items: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                format!("one of [{}]", items.join(", "))
            }
            Validator::NodeType(targets) => format!("node of type {}", targets.join(" | ")),
            Validator::ArrayOf(inner) => format!("array of {}", inner.describe()),
            Validator::Optional(inner) => format!("optional {}", inner.describe()),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Validator::Optional(_))
    }

    /// Every type or category name this validator refers to, in order.
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_types(&mut names);
        names
    }

    fn collect_types<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Validator::NodeType(targets) => out.extend(targets.iter().map(String::as_str)),
            Validator::ArrayOf(inner) | Validator::Optional(inner) => inner.collect_types(out),
            Validator::ValueType(_) | Validator::OneOf(_) => {}
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// One type name or several
pub trait TypeNames {
    fn into_names(self) -> Vec<String>;
}

impl TypeNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl TypeNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl TypeNames for &[&str] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> TypeNames for [&str; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl TypeNames for Vec<String> {
    fn into_names(self) -> Vec<String> {
        self
    }
}

pub fn assert_value_type(kind: PrimitiveKind) -> Validator {
    Validator::ValueType(kind)
}

pub fn assert_one_of<I, V>(literals: I) -> Validator
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Validator::OneOf(literals.into_iter().map(Into::into).collect())
}

pub fn assert_node_type(names: impl TypeNames) -> Validator {
    Validator::NodeType(names.into_names())
}

pub fn array_of(inner: Validator) -> Validator {
    Validator::ArrayOf(Box::new(inner))
}

pub fn array_of_type(names: impl TypeNames) -> Validator {
    array_of(assert_node_type(names))
}

/// Wraps a validator so that null passes. Wrapping twice is a no-op.
pub fn optional(inner: Validator) -> Validator {
    match inner {
        Validator::Optional(_) => inner,
        other => Validator::Optional(Box::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::value::Node;
    use std::collections::BTreeMap;

    /// Identifier and StringLiteral are Expressions; nothing else is classified.
    struct Fixed;

    impl TypeClassifier for Fixed {
        fn is_type(&self, node_type: &str, target: &str) -> bool {
            node_type == target
                || (target == "Expression" && matches!(node_type, "Identifier" | "StringLiteral"))
        }
    }

    fn node(type_name: &str) -> Value {
        Value::from(Node::new(type_name, BTreeMap::new()))
    }

    #[test]
    fn test_value_type() {
        let v = assert_value_type(PrimitiveKind::Boolean);
        assert!(v.check(&Value::from(true), &Fixed).is_ok());

        let err = v.check(&Value::from("true"), &Fixed).unwrap_err();
        assert_eq!(
            err,
            Violation::TypeMismatch {
                expected: "boolean".into(),
                actual: "string \"true\"".into()
            }
        );
    }

    #[test]
    fn test_one_of_is_strict() {
        let v = assert_one_of(["minus", "plus"]);
        assert!(v.check(&Value::from("plus"), &Fixed).is_ok());

        match v.check(&Value::from("PLUS"), &Fixed).unwrap_err() {
            Violation::NotInEnum { allowed, actual } => {
                assert_eq!(allowed, vec!["\"minus\"", "\"plus\""]);
                assert_eq!(actual, "\"PLUS\"");
            }
            other => panic!("unexpected violation {:?}", other),
        }

        let numbers = assert_one_of([1, 2]);
        assert!(numbers.check(&Value::from("1"), &Fixed).is_err());
        assert!(numbers.check(&Value::from(2), &Fixed).is_ok());
    }

    #[test]
    fn test_node_type_uses_classifier() {
        let v = assert_node_type("Expression");
        assert!(v.check(&node("Identifier"), &Fixed).is_ok());
        assert!(v.check(&node("BlockStatement"), &Fixed).is_err());
        assert!(v.check(&Value::from("Identifier"), &Fixed).is_err());

        let union = assert_node_type(["Identifier", "QualifiedTypeIdentifier"]);
        assert!(union.check(&node("QualifiedTypeIdentifier"), &Fixed).is_ok());
        assert!(union.check(&node("StringLiteral"), &Fixed).is_err());
    }

    #[test]
    fn test_array_of_reports_first_failing_index() {
        let v = array_of_type("Identifier");
        assert!(v.check(&Value::Array(vec![]), &Fixed).is_ok());

        let items = Value::Array(vec![node("Identifier"), node("StringLiteral"), node("BlockStatement")]);
        match v.check(&items, &Fixed).unwrap_err() {
            Violation::ArrayElement { index, inner } => {
                assert_eq!(index, 1);
                assert!(matches!(*inner, Violation::TypeMismatch { .. }));
            }
            other => panic!("unexpected violation {:?}", other),
        }

        assert!(matches!(
            v.check(&node("Identifier"), &Fixed).unwrap_err(),
            Violation::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_optional_lets_null_through() {
        let v = optional(assert_value_type(PrimitiveKind::String));
        assert!(v.check(&Value::Null, &Fixed).is_ok());
        assert!(v.check(&Value::from("x"), &Fixed).is_ok());
        assert!(v.check(&Value::from(1), &Fixed).is_err());

        assert_eq!(optional(v.clone()), v);

        let sparse = array_of(optional(assert_node_type("Identifier")));
        assert!(sparse.check(&Value::Array(vec![Value::Null, node("Identifier")]), &Fixed).is_ok());
        assert!(array_of_type("Identifier").check(&Value::Array(vec![Value::Null]), &Fixed).is_err());
    }

    #[test]
    fn test_describe_and_references() {
        let v = optional(array_of_type(["ExportSpecifier", "ExportNamespaceSpecifier"]));
        assert_eq!(
            v.describe(),
            "optional array of node of type ExportSpecifier | ExportNamespaceSpecifier"
        );
        assert_eq!(v.referenced_types(), vec!["ExportSpecifier", "ExportNamespaceSpecifier"]);
        assert_eq!(assert_one_of(["CommonJS", "ES"]).describe(), "one of [\"CommonJS\", \"ES\"]");
    }
}
