//! Type parameters, declarations and the interface-like shape

use crate::schema::{
    array_of_type, assert_value_type, validate, validate_optional, validate_optional_type, validate_type,
    PrimitiveKind, RegistryBuilder, SchemaResult, TypeConfig,
};

use super::FLOW_DECLARATION;

/// Shape shared by class and interface declarations.
///
/// Each call returns a fresh config; `type_parameter_type` names the node
/// type allowed in `typeParameters`.
pub fn interfaceish(type_parameter_type: &str) -> TypeConfig {
    TypeConfig::new()
        .builder(["id", "typeParameters", "extends", "body"])
        .visitor(["id", "typeParameters", "extends", "mixins", "implements", "body"])
        .aliases(FLOW_DECLARATION)
        .field("id", validate_type("Identifier"))
        .field("typeParameters", validate_optional_type(type_parameter_type))
        .field("extends", validate_optional(array_of_type("InterfaceExtends")))
        .field("mixins", validate_optional(array_of_type("InterfaceExtends")))
        .field("implements", validate_optional(array_of_type("ClassImplements")))
        .field("body", validate_type("ObjectTypeAnnotation"))
}

/// `id` + optional type parameters + `right`, used by aliases
fn type_alias() -> TypeConfig {
    TypeConfig::new()
        .visitor(["id", "typeParameters", "right"])
        .aliases(FLOW_DECLARATION)
        .field("id", validate_type("Identifier"))
        .field("typeParameters", validate_optional_type("TypeParameterDeclaration"))
        .field("right", validate_type("FlowType"))
}

fn instantiated_reference() -> TypeConfig {
    TypeConfig::new()
        .visitor(["id", "typeParameters"])
        .aliases(["Flow"])
        .field("id", validate_type(["Identifier", "QualifiedTypeIdentifier"]))
        .field("typeParameters", validate_optional_type("TypeParameterInstantiation"))
}

pub(super) fn register(builder: &mut RegistryBuilder) -> SchemaResult<()> {
    builder.define_type(
        "TypeParameter",
        TypeConfig::new()
            .visitor(["bound", "default", "variance"])
            .aliases(["Flow"])
            .field("name", validate(assert_value_type(PrimitiveKind::String)))
            .field("bound", validate_optional_type("TypeAnnotation"))
            .field("default", validate_optional_type("FlowType"))
            .field("variance", validate_optional_type("Variance")),
    )?;

    builder.define_type(
        "TypeParameterDeclaration",
        TypeConfig::new()
            .visitor(["params"])
            .aliases(["Flow"])
            .field("params", validate(array_of_type("TypeParameter"))),
    )?;

    builder.define_type(
        "TypeParameterInstantiation",
        TypeConfig::new()
            .visitor(["params"])
            .aliases(["Flow"])
            .field("params", validate(array_of_type("FlowType"))),
    )?;

    builder.define_type(
        "ClassImplements",
        TypeConfig::new()
            .visitor(["id", "typeParameters"])
            .aliases(["Flow"])
            .field("id", validate_type("Identifier"))
            .field("typeParameters", validate_optional_type("TypeParameterInstantiation")),
    )?;

    builder.define_shared(&["TypeAlias", "DeclareTypeAlias"], type_alias)?;

    builder.define_type(
        "DeclareOpaqueType",
        TypeConfig::new()
            .visitor(["id", "typeParameters", "supertype"])
            .aliases(FLOW_DECLARATION)
            .field("id", validate_type("Identifier"))
            .field("typeParameters", validate_optional_type("TypeParameterDeclaration"))
            .field("supertype", validate_optional_type("FlowType")),
    )?;

    builder.define_type(
        "OpaqueType",
        TypeConfig::new()
            .visitor(["id", "typeParameters", "supertype", "impltype"])
            .aliases(FLOW_DECLARATION)
            .field("id", validate_type("Identifier"))
            .field("typeParameters", validate_optional_type("TypeParameterDeclaration"))
            .field("supertype", validate_optional_type("FlowType"))
            .field("impltype", validate_type("FlowType")),
    )?;

    builder.define_type(
        "FunctionTypeAnnotation",
        TypeConfig::new()
            .visitor(["typeParameters", "params", "rest", "returnType"])
            .aliases(["Flow", "FlowType"])
            .field("typeParameters", validate_optional_type("TypeParameterDeclaration"))
            .field("params", validate(array_of_type("FunctionTypeParam")))
            .field("rest", validate_optional_type("FunctionTypeParam"))
            .field("returnType", validate_type("FlowType")),
    )?;

    builder.define_type(
        "FunctionTypeParam",
        TypeConfig::new()
            .visitor(["name", "typeAnnotation"])
            .aliases(["Flow"])
            .field("name", validate_optional_type("Identifier"))
            .field("typeAnnotation", validate_type("FlowType"))
            .field("optional", validate_optional(assert_value_type(PrimitiveKind::Boolean))),
    )?;

    builder.define_type("GenericTypeAnnotation", instantiated_reference())?
        .add_alias("FlowType");
    builder.define_type("InterfaceExtends", instantiated_reference())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interfaceish_shape() {
        let definition = interfaceish("TypeParameterDeclaration").into_definition("DeclareClass").unwrap();
        assert_eq!(definition.builder_keys(), ["id", "typeParameters", "extends", "body"]);
        assert_eq!(definition.visitor_keys().len(), 6);
        assert!(definition.has_alias("FlowDeclaration"));
        assert_eq!(
            definition.field("typeParameters").unwrap().describe(),
            "optional node of type TypeParameterDeclaration"
        );
    }

    #[test]
    fn test_interfaceish_type_parameter_override() {
        let definition = interfaceish("TypeParameterInstantiation")
            .into_definition("InterfaceDeclaration")
            .unwrap();
        assert_eq!(
            definition.field("typeParameters").unwrap().validator().referenced_types(),
            vec!["TypeParameterInstantiation"]
        );
    }

    #[test]
    fn test_shared_reference_shape_is_independent() {
        let mut builder = RegistryBuilder::new();
        builder.define_type("GenericTypeAnnotation", instantiated_reference()).unwrap().add_alias("FlowType");
        builder.define_type("InterfaceExtends", instantiated_reference()).unwrap();

        assert!(builder.definition("GenericTypeAnnotation").unwrap().has_alias("FlowType"));
        assert!(!builder.definition("InterfaceExtends").unwrap().has_alias("FlowType"));
    }
}
