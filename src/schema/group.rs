//! Schemas addressed by namespace prefix.

use super::loader::SchemaError;
use super::types::Schema;

/// Read-only access to the schema (or schemas) tags are resolved against.
pub trait SchemaProvider {
    /// The schema for a namespace prefix such as "" or "tl:".
    fn schema_for(&self, prefix: &str) -> Option<&Schema>;

    /// Every prefix this provider answers to.
    fn prefixes(&self) -> Vec<&str>;
}

impl SchemaProvider for Schema {
    fn schema_for(&self, prefix: &str) -> Option<&Schema> {
        if prefix.eq_ignore_ascii_case(&self.prefix) {
            Some(self)
        } else {
            None
        }
    }

    fn prefixes(&self) -> Vec<&str> {
        vec![self
            .prefix
            .as_str()]
    }
}

/// Several schemas used together, the standard vocabulary alongside
/// libraries, each under its own prefix.
#[derive(Debug, Clone, Default)]
pub struct SchemaGroup {
    schemas: Vec<Schema>,
}

impl SchemaGroup {
    pub fn new(schemas: Vec<Schema>) -> Result<SchemaGroup, SchemaError> {
        let mut group = SchemaGroup::default();
        for schema in schemas {
            group.add(schema)?;
        }
        Ok(group)
    }

    pub fn add(&mut self, schema: Schema) -> Result<(), SchemaError> {
        if self
            .schema_for(&schema.prefix)
            .is_some()
        {
            return Err(SchemaError {
                problem: "Prefix already in use".to_string(),
                details: schema.prefix,
            });
        }
        self.schemas
            .push(schema);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.schemas
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas
            .is_empty()
    }
}

impl SchemaProvider for SchemaGroup {
    fn schema_for(&self, prefix: &str) -> Option<&Schema> {
        self.schemas
            .iter()
            .find_map(|schema| schema.schema_for(prefix))
    }

    fn prefixes(&self) -> Vec<&str> {
        self.schemas
            .iter()
            .map(|schema| schema.prefix.as_str())
            .collect()
    }
}
