//! Category index
//!
//! Maps each category label to the concrete type names that list it.
//! Membership is exactly what the definitions declare: a type tagged
//! `FlowBaseAnnotation` is not assumed to be a `FlowType` unless it says so.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasIndex {
    members: BTreeMap<String, BTreeSet<String>>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `type_name` carries `category`
    pub fn insert(&mut self, category: &str, type_name: &str) {
        self.members
            .entry(category.to_string())
            .or_default()
            .insert(type_name.to_string());
    }

    /// Whether `type_name` carries `category`
    pub fn contains(&self, category: &str, type_name: &str) -> bool {
        self.members
            .get(category)
            .map_or(false, |types| types.contains(type_name))
    }

    pub fn is_category(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Concrete type names for a category, in name order
    pub fn members(&self, category: &str) -> impl Iterator<Item = &str> {
        self.members
            .get(category)
            .into_iter()
            .flat_map(|types| types.iter().map(String::as_str))
    }

    /// All category labels, in name order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn category_count(&self) -> usize {
        self.members.len()
    }

    /// Category → members, for serialization
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.members
            .iter()
            .map(|(category, types)| (category.clone(), types.iter().cloned().collect()))
            .collect()
    }
}
