//! Manifest I/O Tests
//!
//! - The manifest describes every registered type
//! - Saved manifests load back unchanged
//! - Manifest files are never overwritten

use nodetypes::definitions::standard;
use nodetypes::schema::{RegistryManifest, SchemaErrorCode};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_manifest_covers_catalog() {
    let registry = standard().unwrap();
    let manifest = registry.manifest();

    assert_eq!(manifest.types.len(), registry.len());
    let names: Vec<&str> = manifest.types.iter().map(|t| t.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    assert_eq!(manifest.deprecated.get("NumberLiteral").map(String::as_str), Some("NumericLiteral"));
    assert_eq!(manifest.categories.len(), registry.categories().count());
}

#[test]
fn test_manifest_field_descriptions() {
    let manifest = standard().unwrap().manifest();
    let object = manifest.get("ObjectTypeAnnotation").unwrap();

    let properties = object.fields.iter().find(|f| f.name == "properties").unwrap();
    assert_eq!(
        properties.constraint,
        "array of node of type ObjectTypeProperty | ObjectTypeSpreadProperty"
    );
    assert!(!properties.optional);

    let exact = object.fields.iter().find(|f| f.name == "exact").unwrap();
    assert_eq!(exact.default, Some(json!(false)));

    let variance = manifest.get("Variance").unwrap();
    assert_eq!(variance.fields[0].constraint, r#"one of ["minus", "plus"]"#);
}

#[test]
fn test_save_and_reload() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("out").join("manifest.json");
    let registry = standard().unwrap();

    registry.save_manifest(&path).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["types"].is_array());
    assert_eq!(raw["deprecated"]["NumberLiteral"], "NumericLiteral");

    let loaded = RegistryManifest::load(&path).unwrap();
    assert_eq!(loaded, registry.manifest());
}

#[test]
fn test_existing_manifest_not_overwritten() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("manifest.json");
    fs::write(&path, "{}").unwrap();

    let err = standard().unwrap().save_manifest(&path).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::ManifestIo);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}
