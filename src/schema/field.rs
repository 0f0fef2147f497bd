//! Field specifications
//!
//! A `FieldSpec` is the contract for one field: a validator, whether the
//! field may be absent, and the default applied when a builder argument is
//! omitted.

use super::errors::Violation;
use super::validator::{assert_node_type, optional, TypeClassifier, TypeNames, Validator};
use super::value::Value;

/// Contract governing one field of a node type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    validator: Validator,
    optional: bool,
    default: Option<Value>,
}

impl FieldSpec {
    /// Creates a spec; an `Optional` validator makes the field optional.
    pub fn new(validator: Validator) -> Self {
        let optional = validator.is_optional();
        Self {
            validator,
            optional,
            default: None,
        }
    }

    /// Sets the value used when the field is omitted at construction
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Description of what the field accepts
    pub fn describe(&self) -> String {
        self.validator.describe()
    }

    /// Checks a field value; `None` and `Null` both mean absent.
    pub fn check(&self, value: Option<&Value>, classifier: &dyn TypeClassifier) -> Result<(), Violation> {
        match value {
            None | Some(Value::Null) if self.optional => Ok(()),
            None | Some(Value::Null) => Err(Violation::Missing),
            Some(value) => self.validator.check(value, classifier),
        }
    }
}

/// Required field checked by `validator`
pub fn validate(validator: Validator) -> FieldSpec {
    FieldSpec::new(validator)
}

/// Optional field; present values are checked by `validator`
pub fn validate_optional(validator: Validator) -> FieldSpec {
    FieldSpec::new(optional(validator))
}

/// Required field holding a node of one of `names`
pub fn validate_type(names: impl TypeNames) -> FieldSpec {
    validate(assert_node_type(names))
}

/// Optional field holding a node of one of `names`
pub fn validate_optional_type(names: impl TypeNames) -> FieldSpec {
    validate_optional(assert_node_type(names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validator::{array_of_type, assert_value_type};
    use crate::schema::value::PrimitiveKind;

    struct Exact;

    impl TypeClassifier for Exact {
        fn is_type(&self, node_type: &str, target: &str) -> bool {
            node_type == target
        }
    }

    #[test]
    fn test_required_field_rejects_absence() {
        let spec = validate(assert_value_type(PrimitiveKind::Boolean));
        assert!(!spec.is_optional());
        assert_eq!(spec.check(None, &Exact), Err(Violation::Missing));
        assert_eq!(spec.check(Some(&Value::Null), &Exact), Err(Violation::Missing));
        assert!(spec.check(Some(&Value::from(false)), &Exact).is_ok());
    }

    #[test]
    fn test_optional_field_accepts_absence() {
        let spec = validate_optional(array_of_type("InterfaceExtends"));
        assert!(spec.is_optional());
        assert!(spec.check(None, &Exact).is_ok());
        assert!(spec.check(Some(&Value::Null), &Exact).is_ok());
        assert!(spec.check(Some(&Value::from("x")), &Exact).is_err());
    }

    #[test]
    fn test_validate_of_optional_validator_is_optional() {
        let spec = validate(optional(assert_value_type(PrimitiveKind::String)));
        assert!(spec.is_optional());
        assert_eq!(spec, validate_optional(assert_value_type(PrimitiveKind::String)));
    }

    #[test]
    fn test_default() {
        let spec = validate(assert_value_type(PrimitiveKind::Boolean)).with_default(false);
        assert_eq!(spec.default_value(), Some(&Value::Bool(false)));
        assert_eq!(spec.describe(), "boolean");
    }

    #[test]
    fn test_type_helpers() {
        assert_eq!(validate_type("Identifier").describe(), "node of type Identifier");
        assert_eq!(
            validate_optional_type("TypeParameterDeclaration").describe(),
            "optional node of type TypeParameterDeclaration"
        );
    }
}
