//! Core JavaScript nodes the Flow catalog refers to

use crate::schema::{
    array_of_type, assert_one_of, assert_value_type, validate, validate_optional, validate_optional_type,
    validate_type, PrimitiveKind, RegistryBuilder, SchemaResult, TypeConfig,
};

use super::{optional_boolean, LITERAL};

pub(super) fn register(builder: &mut RegistryBuilder) -> SchemaResult<()> {
    builder.define_type(
        "Identifier",
        TypeConfig::new()
            .builder(["name"])
            .visitor(["typeAnnotation"])
            .aliases(["Expression", "PatternLike", "LVal"])
            .field("name", validate(assert_value_type(PrimitiveKind::String)))
            .field("optional", optional_boolean())
            .field("typeAnnotation", validate_optional_type("TypeAnnotation")),
    )?;

    builder.define_type(
        "StringLiteral",
        TypeConfig::new()
            .builder(["value"])
            .aliases(LITERAL)
            .field("value", validate(assert_value_type(PrimitiveKind::String))),
    )?;

    builder.define_type(
        "NumericLiteral",
        TypeConfig::new()
            .builder(["value"])
            .deprecated_alias("NumberLiteral")
            .aliases(LITERAL)
            .field("value", validate(assert_value_type(PrimitiveKind::Number))),
    )?;

    builder.define_type(
        "BooleanLiteral",
        TypeConfig::new()
            .builder(["value"])
            .aliases(LITERAL)
            .field("value", validate(assert_value_type(PrimitiveKind::Boolean))),
    )?;

    builder.define_type(
        "BlockStatement",
        TypeConfig::new()
            .visitor(["body"])
            .aliases(["Scopable", "BlockParent", "Block", "Statement"])
            .field("body", validate(array_of_type("Statement"))),
    )?;

    builder.define_type(
        "ExpressionStatement",
        TypeConfig::new()
            .visitor(["expression"])
            .aliases(["Statement", "ExpressionWrapper"])
            .field("expression", validate_type("Expression")),
    )?;

    builder.define_type(
        "ExportSpecifier",
        TypeConfig::new()
            .visitor(["local", "exported"])
            .aliases(["ModuleSpecifier"])
            .field("local", validate_type("Identifier"))
            .field("exported", validate_type(["Identifier", "StringLiteral"]))
            .field("exportKind", validate_optional(assert_one_of(["type", "value"]))),
    )?;

    builder.define_type(
        "ExportNamespaceSpecifier",
        TypeConfig::new()
            .visitor(["exported"])
            .aliases(["ModuleSpecifier"])
            .field("exported", validate_type("Identifier")),
    )?;

    Ok(())
}
