//! Schema manifest
//!
//! A serializable snapshot of a sealed registry: every type with its field
//! contracts, keys and aliases, plus the category index and deprecated
//! names. Tools that cannot link the crate read this instead.
//!
//! Manifest files are write-once: saving over an existing file is an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};

use super::definition::NodeDefinition;
use super::errors::{SchemaError, SchemaResult};
use super::registry::Registry;

/// One field of a [`TypeManifest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    /// Validator description, e.g. `array of node of type FlowType`
    pub constraint: String,
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// One node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeManifest {
    pub name: String,
    pub fields: Vec<FieldManifest>,
    pub builder_keys: Vec<String>,
    pub visitor_keys: Vec<String>,
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated_alias: Option<String>,
}

impl From<&NodeDefinition> for TypeManifest {
    fn from(definition: &NodeDefinition) -> Self {
        Self {
            name: definition.name().to_string(),
            fields: definition
                .fields()
                .map(|(name, spec)| FieldManifest {
                    name: name.to_string(),
                    constraint: spec.describe(),
                    optional: spec.is_optional(),
                    default: spec.default_value().map(|value| value.to_json()),
                })
                .collect(),
            builder_keys: definition.builder_keys().to_vec(),
            visitor_keys: definition.visitor_keys().to_vec(),
            aliases: definition.aliases().to_vec(),
            deprecated_alias: definition.deprecated_alias().map(str::to_string),
        }
    }
}

/// Whole-registry snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryManifest {
    pub types: Vec<TypeManifest>,
    /// category -> member type names
    pub categories: BTreeMap<String, Vec<String>>,
    /// deprecated name -> canonical name
    pub deprecated: BTreeMap<String, String>,
}

impl RegistryManifest {
    pub fn get(&self, name: &str) -> Option<&TypeManifest> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Reads a manifest written by [`Registry::save_manifest`].
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::manifest_io(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SchemaError::manifest_io(path.display().to_string(), format!("Invalid manifest JSON: {}", e))
        })
    }
}

impl Registry {
    /// Snapshot of every type, in name order
    pub fn manifest(&self) -> RegistryManifest {
        RegistryManifest {
            types: self.definitions().map(TypeManifest::from).collect(),
            categories: self.alias_index().to_map(),
            deprecated: self
                .deprecated_names()
                .map(|(old, canonical)| (old.to_string(), canonical.to_string()))
                .collect(),
        }
    }

    /// Writes the manifest as pretty JSON to `path`.
    ///
    /// Missing parent directories are created. An existing file is never
    /// overwritten.
    pub fn save_manifest(&self, path: &Path) -> SchemaResult<PathBuf> {
        let display = path.display().to_string();

        if let Err(err) = self.write_manifest(path, &display) {
            log_event_with_fields(
                Event::ManifestWriteFailed,
                &[("path", display.as_str()), ("reason", err.message())],
            );
            return Err(err);
        }

        let types = self.len().to_string();
        log_event_with_fields(
            Event::ManifestWritten,
            &[("path", display.as_str()), ("types", types.as_str())],
        );
        Ok(path.to_path_buf())
    }

    fn write_manifest(&self, path: &Path, display: &str) -> SchemaResult<()> {
        if path.exists() {
            return Err(SchemaError::manifest_io(display, "file already exists"));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    SchemaError::manifest_io(display, format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&self.manifest())
            .map_err(|e| SchemaError::manifest_io(display, format!("Failed to serialize manifest: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| SchemaError::manifest_io(display, format!("Failed to write file: {}", e)))
    }
}
