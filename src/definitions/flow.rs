//! Flow type annotations and declarations

use crate::schema::{
    array_of_type, assert_one_of, assert_value_type, validate, validate_optional, validate_optional_type,
    validate_type, PrimitiveKind, RegistryBuilder, SchemaResult, TypeConfig,
};

use super::{boolean, interfaceish, optional_boolean, BASE_ANNOTATION, FLOW_DECLARATION, FLOW_TYPE, OBJECT_MEMBER};

const BASE_ANNOTATIONS: &[&str] = &[
    "AnyTypeAnnotation",
    "BooleanTypeAnnotation",
    "EmptyTypeAnnotation",
    "MixedTypeAnnotation",
    "NullLiteralTypeAnnotation",
    "NumberTypeAnnotation",
    "StringTypeAnnotation",
    "ThisTypeAnnotation",
    "VoidTypeAnnotation",
];

/// Wrapper around a single `FlowType` child
fn wraps_flow_type(field: &str) -> TypeConfig {
    TypeConfig::new()
        .visitor([field])
        .aliases(FLOW_TYPE)
        .field(field, validate_type("FlowType"))
}

/// `types: FlowType[]`, used by unions, intersections and tuples
fn flow_type_list() -> TypeConfig {
    TypeConfig::new()
        .visitor(["types"])
        .aliases(FLOW_TYPE)
        .field("types", validate(array_of_type("FlowType")))
}

fn literal_annotation(kind: PrimitiveKind) -> TypeConfig {
    TypeConfig::new()
        .builder(["value"])
        .aliases(FLOW_TYPE)
        .field("value", validate(assert_value_type(kind)))
}

fn declaration() -> TypeConfig {
    TypeConfig::new().aliases(FLOW_DECLARATION)
}

pub(super) fn register(builder: &mut RegistryBuilder) -> SchemaResult<()> {
    builder.define_shared(BASE_ANNOTATIONS, || TypeConfig::new().aliases(BASE_ANNOTATION))?;
    builder.define_type("ExistsTypeAnnotation", TypeConfig::new().aliases(FLOW_TYPE))?;

    builder.define_type("ArrayTypeAnnotation", wraps_flow_type("elementType"))?;
    builder.define_type("NullableTypeAnnotation", wraps_flow_type("typeAnnotation"))?;
    builder.define_type("TypeofTypeAnnotation", wraps_flow_type("argument"))?;

    builder.define_shared(
        &["IntersectionTypeAnnotation", "TupleTypeAnnotation", "UnionTypeAnnotation"],
        flow_type_list,
    )?;

    builder.define_type("BooleanLiteralTypeAnnotation", literal_annotation(PrimitiveKind::Boolean))?;
    builder.define_type("NumberLiteralTypeAnnotation", literal_annotation(PrimitiveKind::Number))?;
    builder.define_type("StringLiteralTypeAnnotation", literal_annotation(PrimitiveKind::String))?;

    builder.define_shared(&["DeclareClass", "DeclareInterface", "InterfaceDeclaration"], || {
        interfaceish("TypeParameterDeclaration")
    })?;

    builder.define_type(
        "DeclareFunction",
        declaration()
            .visitor(["id"])
            .field("id", validate_type("Identifier"))
            .field("predicate", validate_optional_type("DeclaredPredicate")),
    )?;

    builder.define_type(
        "DeclareModule",
        declaration()
            .builder(["id", "body", "kind"])
            .visitor(["id", "body"])
            .field("id", validate_type(["Identifier", "StringLiteral"]))
            .field("body", validate_type("BlockStatement"))
            .field("kind", validate_optional(assert_one_of(["CommonJS", "ES"]))),
    )?;

    builder.define_type(
        "DeclareModuleExports",
        declaration()
            .visitor(["typeAnnotation"])
            .field("typeAnnotation", validate_type("TypeAnnotation")),
    )?;

    builder.define_type(
        "DeclareVariable",
        declaration().visitor(["id"]).field("id", validate_type("Identifier")),
    )?;

    builder.define_type(
        "DeclareExportDeclaration",
        declaration()
            .visitor(["declaration", "specifiers", "source"])
            .field("declaration", validate_optional_type("Flow"))
            .field(
                "specifiers",
                validate_optional(array_of_type(["ExportSpecifier", "ExportNamespaceSpecifier"])),
            )
            .field("source", validate_optional_type("StringLiteral"))
            .field("default", optional_boolean()),
    )?;

    builder.define_type(
        "DeclareExportAllDeclaration",
        declaration()
            .visitor(["source"])
            .field("source", validate_type("StringLiteral"))
            .field("exportKind", validate_optional(assert_one_of(["type", "value"]))),
    )?;

    builder.define_type(
        "DeclaredPredicate",
        TypeConfig::new()
            .visitor(["value"])
            .aliases(["Flow", "FlowPredicate"])
            .field("value", validate_type("Flow")),
    )?;
    builder.define_type("InferredPredicate", TypeConfig::new().aliases(["Flow", "FlowPredicate"]))?;

    builder.define_type(
        "InterfaceTypeAnnotation",
        TypeConfig::new()
            .visitor(["extends", "body"])
            .aliases(FLOW_TYPE)
            .field("extends", validate_optional(array_of_type("InterfaceExtends")))
            .field("body", validate_type("ObjectTypeAnnotation")),
    )?;

    register_object_types(builder)?;

    builder.define_type(
        "QualifiedTypeIdentifier",
        TypeConfig::new()
            .visitor(["id", "qualification"])
            .aliases(["Flow"])
            .field("id", validate_type("Identifier"))
            .field("qualification", validate_type(["Identifier", "QualifiedTypeIdentifier"])),
    )?;

    builder.define_type(
        "TypeAnnotation",
        TypeConfig::new()
            .visitor(["typeAnnotation"])
            .aliases(["Flow"])
            .field("typeAnnotation", validate_type("FlowType")),
    )?;

    builder.define_type(
        "TypeCastExpression",
        TypeConfig::new()
            .visitor(["expression", "typeAnnotation"])
            .aliases(["Flow", "ExpressionWrapper", "Expression"])
            .field("expression", validate_type("Expression"))
            .field("typeAnnotation", validate_type("TypeAnnotation")),
    )?;

    builder.define_type(
        "Variance",
        TypeConfig::new()
            .builder(["kind"])
            .aliases(["Flow"])
            .field("kind", validate(assert_one_of(["minus", "plus"]))),
    )?;

    Ok(())
}

fn register_object_types(builder: &mut RegistryBuilder) -> SchemaResult<()> {
    builder.define_type(
        "ObjectTypeAnnotation",
        TypeConfig::new()
            .builder(["properties", "indexers", "callProperties", "internalSlots", "exact"])
            .visitor(["properties", "indexers", "callProperties", "internalSlots"])
            .aliases(FLOW_TYPE)
            .field(
                "properties",
                validate(array_of_type(["ObjectTypeProperty", "ObjectTypeSpreadProperty"])),
            )
            .field("indexers", validate_optional(array_of_type("ObjectTypeIndexer")))
            .field("callProperties", validate_optional(array_of_type("ObjectTypeCallProperty")))
            .field("internalSlots", validate_optional(array_of_type("ObjectTypeInternalSlot")))
            .field("exact", boolean().with_default(false))
            // present only on object types; true when written with `...`
            .field("inexact", optional_boolean()),
    )?;

    builder.define_type(
        "ObjectTypeInternalSlot",
        TypeConfig::new()
            .visitor(["id", "value", "optional", "static", "method"])
            .aliases(OBJECT_MEMBER)
            .field("id", validate_type("Identifier"))
            .field("value", validate_type("FlowType"))
            .field("optional", boolean())
            .field("static", boolean())
            .field("method", boolean()),
    )?;

    builder.define_type(
        "ObjectTypeCallProperty",
        TypeConfig::new()
            .visitor(["value"])
            .aliases(OBJECT_MEMBER)
            .field("value", validate_type("FlowType"))
            .field("static", boolean()),
    )?;

    builder.define_type(
        "ObjectTypeIndexer",
        TypeConfig::new()
            .visitor(["id", "key", "value", "variance"])
            .aliases(OBJECT_MEMBER)
            .field("id", validate_optional_type("Identifier"))
            .field("key", validate_type("FlowType"))
            .field("value", validate_type("FlowType"))
            .field("static", boolean())
            .field("variance", validate_optional_type("Variance")),
    )?;

    builder.define_type(
        "ObjectTypeProperty",
        TypeConfig::new()
            .visitor(["key", "value", "variance"])
            .aliases(OBJECT_MEMBER)
            .field("key", validate_type(["Identifier", "StringLiteral"]))
            .field("value", validate_type("FlowType"))
            .field("kind", validate(assert_one_of(["init", "get", "set"])))
            .field("static", boolean())
            .field("proto", boolean())
            .field("optional", boolean())
            .field("variance", validate_optional_type("Variance")),
    )?;

    builder.define_type(
        "ObjectTypeSpreadProperty",
        TypeConfig::new()
            .visitor(["argument"])
            .aliases(OBJECT_MEMBER)
            .field("argument", validate_type("FlowType")),
    )?;

    Ok(())
}
