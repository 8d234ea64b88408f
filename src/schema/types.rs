//! The vocabulary tree a HED string is resolved against.

use serde::Deserialize;
use std::collections::HashMap;

use super::classes::{UnitClass, ValueClass};

/// Properties a schema node can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attributes {
    pub require_child: bool,
    /// Inherited by descendants; see SchemaEntry::extension_allowed.
    pub extension_allowed: bool,
    pub required: bool,
    pub unique: bool,
    pub top_level_tag_group: bool,
    pub tag_group: bool,
    pub deprecated_from: Option<String>,
    pub reserved: bool,
    pub unit_class: Vec<String>,
    pub value_class: Vec<ValueClass>,
    pub default_units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub short_name: String,
    pub long_name: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// The `#` child, present when the node takes a value.
    pub placeholder: Option<usize>,
    pub attributes: Attributes,
    /// Whether this node or any of its ancestors allows extension.
    pub extension_allowed: bool,
}

impl SchemaEntry {
    pub fn takes_value(&self) -> bool {
        self.placeholder
            .is_some()
    }

    pub fn is_placeholder(&self) -> bool {
        self.short_name == "#"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub name: String,
    pub version: String,
    /// Namespace this schema is addressed by in strings, eg "tl:", or empty.
    pub prefix: String,
    pub(super) entries: Vec<SchemaEntry>,
    pub(super) by_short: HashMap<String, usize>,
    pub(super) unit_classes: HashMap<String, UnitClass>,
}

impl Schema {
    pub fn entry(&self, index: usize) -> &SchemaEntry {
        &self.entries[index]
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, &SchemaEntry)> {
        self.entries
            .iter()
            .enumerate()
    }

    pub fn len(&self) -> usize {
        self.entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .is_empty()
    }

    /// Look up a node by its short name, case-insensitively.
    pub fn find(&self, short_name: &str) -> Option<usize> {
        self.by_short
            .get(&short_name.to_lowercase())
            .copied()
    }

    pub fn unit_class(&self, name: &str) -> Option<&UnitClass> {
        self.unit_classes
            .get(name)
    }

    /// Unit classes applying to a node.
    pub fn unit_classes_for(&self, index: usize) -> Vec<&UnitClass> {
        self.entry(index)
            .attributes
            .unit_class
            .iter()
            .filter_map(|name| self.unit_class(name))
            .collect()
    }

    /// Default unit for a node: its own, else that of its first unit class.
    pub fn default_units_for(&self, index: usize) -> Option<&str> {
        let entry = self.entry(index);
        if let Some(units) = &entry
            .attributes
            .default_units
        {
            return Some(units);
        }
        self.unit_classes_for(index)
            .into_iter()
            .find_map(|class| class.default_units.as_deref())
    }

    /// Long names of the nodes marked required.
    pub fn required_prefixes(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.attributes.required)
            .map(|entry| entry.long_name.as_str())
            .collect()
    }

    /// Long names of the nodes marked unique.
    pub fn unique_prefixes(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.attributes.unique)
            .map(|entry| entry.long_name.as_str())
            .collect()
    }
}
