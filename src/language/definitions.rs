//! Named definitions and the dictionaries holding them.

use std::collections::BTreeMap;

use super::hedstring::HedString;
use super::types::TagId;
use crate::problem::Context;

/// Why a reference to a definition could not be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefProblem {
    Unmatched,
    ValueMissing,
    ValueExtra,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefEntry {
    pub name: String,
    /// The definition's content group, frozen. None for a definition with
    /// no contents.
    pub contents: Option<HedString>,
    pub takes_value: bool,
    pub source_context: Vec<Context>,
}

impl DefEntry {
    pub fn new(
        name: &str,
        contents: Option<HedString>,
        takes_value: bool,
        source_context: Vec<Context>,
    ) -> DefEntry {
        let contents = contents.map(|mut body| {
            body.freeze();
            body
        });
        DefEntry {
            name: name.to_string(),
            contents,
            takes_value,
            source_context,
        }
    }

    /// A fresh copy of the contents with the placeholder, if any, replaced
    /// by the given value. The stored body is never modified.
    pub fn expand(&self, value: Option<&str>) -> Option<HedString> {
        let mut body = self
            .contents
            .clone()?;
        body.thaw();
        if let Some(value) = value {
            body.replace_placeholder(value);
        }
        Some(body)
    }

    /// The tag in the contents carrying the placeholder.
    pub fn placeholder_tag(&self) -> Option<TagId> {
        let body = self
            .contents
            .as_ref()?;
        body.tags()
            .find(|(_, tag)| {
                tag.text
                    .contains('#')
            })
            .map(|(id, _)| id)
    }
}

/// Split a Def reference such as "Acc/4.5" into the definition name and
/// its value.
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('/') {
        Some((name, value)) => (name, Some(value)),
        None => (reference, None),
    }
}

/// Definitions keyed by lower cased name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefDict {
    defs: BTreeMap<String, DefEntry>,
}

impl DefDict {
    pub fn new() -> DefDict {
        DefDict {
            defs: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.defs
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs
            .is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DefEntry> {
        self.defs
            .get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name)
            .is_some()
    }

    pub fn entries(&self) -> impl Iterator<Item = &DefEntry> {
        self.defs
            .values()
    }

    /// Register a definition. A name already present is refused and the
    /// rejected entry handed back; the first registration wins.
    pub fn add(&mut self, entry: DefEntry) -> Result<(), DefEntry> {
        let key = entry
            .name
            .to_lowercase();
        if self
            .defs
            .contains_key(&key)
        {
            return Err(entry);
        }
        self.defs
            .insert(key, entry);
        Ok(())
    }

    /// Fold another dictionary into this one, returning the names that
    /// were already present.
    pub fn merge(&mut self, other: &DefDict) -> Vec<String> {
        let mut duplicates = Vec::new();
        for entry in other.entries() {
            if let Err(rejected) = self.add(entry.clone()) {
                duplicates.push(rejected.name);
            }
        }
        duplicates
    }

    /// Several dictionaries queried as one.
    pub fn combine(dicts: &[&DefDict]) -> (DefDict, Vec<String>) {
        let mut result = DefDict::new();
        let mut duplicates = Vec::new();
        for dict in dicts {
            duplicates.extend(result.merge(dict));
        }
        (result, duplicates)
    }

    /// Expand a Def reference ("Name" or "Name/value") into a copy of the
    /// definition contents.
    pub fn expand(&self, reference: &str) -> Result<Option<HedString>, DefProblem> {
        let (name, value) = split_reference(reference);
        let entry = self
            .get(name)
            .ok_or(DefProblem::Unmatched)?;
        match (entry.takes_value, value) {
            (true, None) => Err(DefProblem::ValueMissing),
            (false, Some(_)) => Err(DefProblem::ValueExtra),
            (_, value) => Ok(entry.expand(value)),
        }
    }
}
