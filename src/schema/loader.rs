//! Reading a schema from its JSON description.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use super::classes::UnitClass;
use super::types::{Attributes, Schema, SchemaEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub problem: String,
    pub details: String,
}

impl SchemaError {
    fn new(problem: &str, details: impl Into<String>) -> SchemaError {
        SchemaError {
            problem: problem.to_string(),
            details: details.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.details)
    }
}

impl std::error::Error for SchemaError {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaSpec {
    #[serde(default)]
    name: String,
    version: String,
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    unit_classes: Vec<UnitClass>,
    tags: Vec<NodeSpec>,
}

#[derive(Deserialize)]
struct NodeSpec {
    name: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    children: Vec<NodeSpec>,
}

/// Namespaces are written with their colon; accept them without.
fn normalize_prefix(prefix: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() || prefix.ends_with(':') {
        prefix.to_string()
    } else {
        format!("{}:", prefix)
    }
}

impl Schema {
    pub fn from_json(content: &str) -> Result<Schema, SchemaError> {
        let spec: SchemaSpec = serde_json::from_str(content)
            .map_err(|error| SchemaError::new("Malformed schema", error.to_string()))?;

        let mut schema = Schema {
            name: spec.name,
            version: spec.version,
            prefix: normalize_prefix(&spec.prefix),
            entries: Vec::new(),
            by_short: HashMap::new(),
            unit_classes: HashMap::new(),
        };

        for class in spec.unit_classes {
            if let Some(default) = &class.default_units {
                if class
                    .find(default)
                    .is_none()
                {
                    return Err(SchemaError::new(
                        "Default unit not in its class",
                        format!("{} in {}", default, class.name),
                    ));
                }
            }
            schema
                .unit_classes
                .insert(
                    class
                        .name
                        .clone(),
                    class,
                );
        }

        for node in spec.tags {
            schema.insert(node, None)?;
        }

        info!(
            "Loaded schema {} {} with {} nodes",
            schema.name,
            schema.version,
            schema
                .entries
                .len()
        );
        Ok(schema)
    }

    fn insert(&mut self, node: NodeSpec, parent: Option<usize>) -> Result<usize, SchemaError> {
        let name = node
            .name
            .trim()
            .to_string();
        if name.is_empty() || name.contains('/') {
            return Err(SchemaError::new("Invalid node name", name));
        }

        for class in &node
            .attributes
            .unit_class
        {
            if !self
                .unit_classes
                .contains_key(class)
            {
                return Err(SchemaError::new(
                    "Unknown unit class",
                    format!("{} on {}", class, name),
                ));
            }
        }

        let long_name = match parent {
            Some(parent) => format!("{}/{}", self.entries[parent].long_name, name),
            None => name.clone(),
        };
        let inherited = match parent {
            Some(parent) => self.entries[parent].extension_allowed,
            None => false,
        };

        let index = self
            .entries
            .len();
        self.entries
            .push(SchemaEntry {
                short_name: name.clone(),
                long_name,
                parent,
                children: Vec::new(),
                placeholder: None,
                extension_allowed: inherited
                    || node
                        .attributes
                        .extension_allowed,
                attributes: node.attributes,
            });

        if name == "#" {
            match parent {
                Some(parent) => {
                    if self.entries[parent]
                        .placeholder
                        .is_some()
                    {
                        return Err(SchemaError::new(
                            "Node has two value children",
                            self.entries[parent]
                                .long_name
                                .clone(),
                        ));
                    }
                    self.entries[parent].placeholder = Some(index);
                }
                None => return Err(SchemaError::new("Value node at top level", "#")),
            }
        } else {
            let key = name.to_lowercase();
            if self
                .by_short
                .contains_key(&key)
            {
                return Err(SchemaError::new("Duplicate short name", name));
            }
            self.by_short
                .insert(key, index);
        }

        if let Some(parent) = parent {
            self.entries[parent]
                .children
                .push(index);
        }

        for child in node.children {
            self.insert(child, Some(index))?;
        }

        debug!(
            "{}",
            self.entries[index]
                .long_name
        );
        Ok(index)
    }
}
