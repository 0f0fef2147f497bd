//! Node-type registry
//!
//! Two phases:
//! - `RegistryBuilder`: single-threaded registration at startup. Definitions
//!   can be added and customized; every error here is FATAL.
//! - `Registry`: produced by `seal()`, read-only from then on. It holds no
//!   interior mutability, so any number of threads may share it by
//!   reference.

use std::collections::BTreeMap;

use crate::config::RegistryConfig;
use crate::observability::{log_event, log_event_with_fields, Event};

use super::alias::AliasIndex;
use super::definition::{NodeDefinition, TypeConfig};
use super::errors::{SchemaError, SchemaErrorCode, SchemaResult};
use super::validator::TypeClassifier;
use super::value::{Node, Value};

/// Mutable registration phase of a [`Registry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    definitions: BTreeMap<String, NodeDefinition>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        log_event(Event::RegistrationBegin);
        Self {
            config,
            definitions: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers a node type.
    ///
    /// Registering the same name again with an identical schema is a no-op
    /// (unless the configuration forbids it); with a different schema it is
    /// a FATAL schema conflict.
    ///
    /// Returns the stored definition for further customization.
    pub fn define_type(&mut self, name: &str, config: TypeConfig) -> SchemaResult<&mut NodeDefinition> {
        let definition = config.into_definition(name).map_err(fatal)?;

        let difference = self
            .definitions
            .get(name)
            .map(|existing| existing.difference(&definition));

        match difference {
            Some(None) if self.config.allow_identical_redefinition => {
                log_event_with_fields(Event::TypeRedefined, &[("type", name)]);
                return self.definition_entry(name);
            }
            Some(None) => {
                return Err(fatal(SchemaError::schema_conflict(name, "type is already defined")));
            }
            Some(Some(reason)) => {
                return Err(fatal(SchemaError::schema_conflict(name, reason)));
            }
            None => {}
        }

        log_event_with_fields(Event::TypeDefined, &[("type", name)]);
        Ok(self.definitions.entry(name.to_string()).or_insert(definition))
    }

    /// Registers several names against one shape template.
    ///
    /// `template` is called once per name, so every name owns its own copy
    /// of the fields and keys; customizing one afterwards never reaches the
    /// others.
    pub fn define_shared<F>(&mut self, names: &[&str], template: F) -> SchemaResult<()>
    where
        F: Fn() -> TypeConfig,
    {
        for name in names {
            self.define_type(name, template())?;
        }
        let joined = names.join(",");
        log_event_with_fields(Event::ShapeRegistered, &[("types", joined.as_str())]);
        Ok(())
    }

    /// Registration-phase access to a definition for per-type customization.
    pub fn definition_mut(&mut self, name: &str) -> SchemaResult<&mut NodeDefinition> {
        let definition = self.definition_entry(name)?;
        log_event_with_fields(Event::TypeCustomized, &[("type", name)]);
        Ok(definition)
    }

    pub fn definition(&self, name: &str) -> Option<&NodeDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn definition_entry(&mut self, name: &str) -> SchemaResult<&mut NodeDefinition> {
        self.definitions
            .get_mut(name)
            .ok_or_else(|| SchemaError::unknown_type(name))
    }

    /// Ends the registration phase.
    ///
    /// Re-checks every definition (customizations may have broken them),
    /// builds the category index and the deprecated-name table, then checks
    /// type references and defaults against the finished index.
    pub fn seal(self) -> SchemaResult<Registry> {
        let mut aliases = AliasIndex::new();
        let mut deprecated: BTreeMap<String, String> = BTreeMap::new();

        for definition in self.definitions.values() {
            definition.check_keys().map_err(fatal)?;

            for category in definition.aliases() {
                aliases.insert(category, definition.name());
            }

            if let Some(old_name) = definition.deprecated_alias() {
                if self.definitions.contains_key(old_name) {
                    return Err(fatal(SchemaError::invalid_definition(
                        definition.name(),
                        format!("deprecated alias '{}' is also a registered type", old_name),
                    )));
                }
                if let Some(other) = deprecated.insert(old_name.to_string(), definition.name().to_string()) {
                    return Err(fatal(SchemaError::invalid_definition(
                        definition.name(),
                        format!("deprecated alias '{}' is already claimed by '{}'", old_name, other),
                    )));
                }
            }
        }

        for category in aliases.categories() {
            if self.definitions.contains_key(category) || deprecated.contains_key(category) {
                return Err(fatal(SchemaError::invalid_definition(
                    category,
                    "name is used both as a node type and as a category",
                )));
            }
        }

        let registry = Registry {
            config: self.config,
            definitions: self.definitions,
            aliases,
            deprecated,
        };

        registry.check_references()?;
        registry.check_defaults()?;

        let types = registry.len().to_string();
        let categories = registry.aliases.category_count().to_string();
        log_event_with_fields(
            Event::RegistrySealed,
            &[("types", types.as_str()), ("categories", categories.as_str())],
        );
        Ok(registry)
    }
}

/// Logs a registration error at FATAL and hands it back
fn fatal(err: SchemaError) -> SchemaError {
    let event = match err.code() {
        SchemaErrorCode::SchemaConflict => Event::SchemaConflict,
        _ => Event::InvalidDefinition,
    };
    log_event_with_fields(
        event,
        &[("type", err.type_name().unwrap_or("")), ("reason", err.message())],
    );
    err
}

/// Immutable node-type registry.
#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    definitions: BTreeMap<String, NodeDefinition>,
    aliases: AliasIndex,
    /// deprecated name -> canonical name
    deprecated: BTreeMap<String, String>,
}

impl Registry {
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Definition of a type.
    ///
    /// Deprecated names resolve to their canonical definition; each such
    /// lookup is logged as a warning.
    pub fn get_definition(&self, name: &str) -> SchemaResult<&NodeDefinition> {
        if let Some(definition) = self.definitions.get(name) {
            return Ok(definition);
        }
        if let Some(canonical) = self.deprecated.get(name) {
            log_event_with_fields(
                Event::DeprecatedTypeUsed,
                &[("type", name), ("canonical", canonical.as_str())],
            );
        }
        self.resolve(name).ok_or_else(|| SchemaError::unknown_type(name))
    }

    /// Canonical name for a type or deprecated type name
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> SchemaResult<&'a str> {
        if self.definitions.contains_key(name) {
            return Ok(name);
        }
        self.deprecated
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SchemaError::unknown_type(name))
    }

    /// Whether `name` is a registered type or a deprecated name for one
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn is_deprecated(&self, name: &str) -> bool {
        self.deprecated.contains_key(name)
    }

    /// (deprecated name, canonical name) pairs
    pub fn deprecated_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.deprecated.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_category(&self, name: &str) -> bool {
        self.aliases.is_category(name)
    }

    /// True iff the type `name` lists `category` among its aliases.
    ///
    /// Unknown types belong to no category.
    pub fn is_alias_of(&self, name: &str, category: &str) -> bool {
        self.resolve(name)
            .map_or(false, |definition| self.aliases.contains(category, definition.name()))
    }

    /// Concrete type names whose aliases contain `category`, in name order.
    pub fn all_of_category(&self, category: &str) -> Vec<&str> {
        self.aliases.members(category).collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.aliases.categories()
    }

    pub fn alias_index(&self) -> &AliasIndex {
        &self.aliases
    }

    /// Registered type names, in name order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn visitor_keys(&self, name: &str) -> SchemaResult<&[String]> {
        Ok(self.get_definition(name)?.visitor_keys())
    }

    pub fn builder_keys(&self, name: &str) -> SchemaResult<&[String]> {
        Ok(self.get_definition(name)?.builder_keys())
    }

    /// Whether a node of type `node_type` counts as `target`: the same type,
    /// or a member of the category `target`.
    pub fn is_type(&self, node_type: &str, target: &str) -> bool {
        if node_type == target {
            return true;
        }
        let target = self
            .deprecated
            .get(target)
            .map(String::as_str)
            .unwrap_or(target);
        if node_type == target {
            return true;
        }
        if self.definitions.contains_key(target) {
            return false;
        }
        self.aliases.contains(target, node_type)
    }

    /// [`is_type`](Self::is_type) applied to a node
    pub fn is(&self, target: &str, node: &Node) -> bool {
        self.is_type(node.type_name(), target)
    }

    /// Nodes reachable through the visitor keys of `node`, in key order.
    /// Array fields contribute their node elements in sequence order.
    pub fn children<'n>(&self, node: &'n Node) -> Vec<&'n Node> {
        let mut children = Vec::new();
        let Some(definition) = self.resolve(node.type_name()) else {
            return children;
        };
        for key in definition.visitor_keys() {
            match node.get(key) {
                Some(Value::Node(child)) => children.push(child.as_ref()),
                Some(Value::Array(items)) => children.extend(items.iter().filter_map(Value::as_node)),
                _ => {}
            }
        }
        children
    }

    /// Lookup without deprecation logging
    pub(crate) fn resolve(&self, name: &str) -> Option<&NodeDefinition> {
        self.definitions.get(name).or_else(|| {
            self.deprecated
                .get(name)
                .and_then(|canonical| self.definitions.get(canonical))
        })
    }

    fn is_known_name(&self, name: &str) -> bool {
        self.definitions.contains_key(name) || self.deprecated.contains_key(name) || self.aliases.is_category(name)
    }

    fn check_references(&self) -> SchemaResult<()> {
        if !self.config.strict_references {
            return Ok(());
        }
        for definition in self.definitions.values() {
            for (field, spec) in definition.fields() {
                for target in spec.validator().referenced_types() {
                    if !self.is_known_name(target) {
                        return Err(fatal(SchemaError::invalid_definition(
                            definition.name(),
                            format!("field '{}' refers to unknown type or category '{}'", field, target),
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn check_defaults(&self) -> SchemaResult<()> {
        for definition in self.definitions.values() {
            for (field, spec) in definition.fields() {
                if let Some(default) = spec.default_value() {
                    spec.check(Some(default), self).map_err(|violation| {
                        fatal(SchemaError::invalid_definition(
                            definition.name(),
                            format!("default for field '{}' is invalid: {}", field, violation),
                        ))
                    })?;
                }
            }
        }
        Ok(())
    }
}

impl TypeClassifier for Registry {
    fn is_type(&self, node_type: &str, target: &str) -> bool {
        Registry::is_type(self, node_type, target)
    }
}
