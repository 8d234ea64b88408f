//! The table of reserved tags: those with structural requirements beyond
//! what the vocabulary itself expresses.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::loader::SchemaError;
use crate::language::Tag;

const STANDARD: &str = include_str!("reserved.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedTag {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub require_value: bool,
    #[serde(default)]
    pub no_extension: bool,
    #[serde(default)]
    pub top_level_tag_group: bool,
    #[serde(default)]
    pub requires_def: bool,
    #[serde(default)]
    pub tag_group: bool,
    #[serde(default)]
    pub requires_timeline: bool,
    #[serde(default)]
    pub no_splice_in_group: bool,
    #[serde(default)]
    pub other_allowed_non_def_tags: Vec<String>,
    /// None means no lower bound.
    pub min_non_def_subgroups: Option<usize>,
    /// None means no upper bound.
    pub max_non_def_subgroups: Option<usize>,
}

impl ReservedTag {
    /// Whether another reserved tag may share a group with this one.
    pub fn allows(&self, other: &str) -> bool {
        self.other_allowed_non_def_tags
            .iter()
            .any(|name| name.eq_ignore_ascii_case(other))
    }
}

/// Reserved tags keyed by lower cased short name. Loaded once by the
/// caller and passed by reference to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedTags {
    tags: BTreeMap<String, ReservedTag>,
}

impl ReservedTags {
    /// The table shipped with this crate.
    pub fn standard() -> ReservedTags {
        ReservedTags::from_json(STANDARD)
            .unwrap_or_else(|error| panic!("Embedded reserved tag table is invalid: {}", error))
    }

    pub fn from_json(content: &str) -> Result<ReservedTags, SchemaError> {
        let table: BTreeMap<String, ReservedTag> =
            serde_json::from_str(content).map_err(|error| SchemaError {
                problem: "Malformed reserved tag table".to_string(),
                details: error.to_string(),
            })?;

        let mut tags = BTreeMap::new();
        for (name, mut tag) in table {
            if let (Some(min), Some(max)) = (tag.min_non_def_subgroups, tag.max_non_def_subgroups) {
                if min > max {
                    return Err(SchemaError {
                        problem: "Contradictory subgroup bounds".to_string(),
                        details: name,
                    });
                }
            }
            tag.name = name.clone();
            tags.insert(name.to_lowercase(), tag);
        }
        Ok(ReservedTags { tags })
    }

    pub fn get(&self, name: &str) -> Option<&ReservedTag> {
        self.tags
            .get(&name.to_lowercase())
    }

    /// The entry for a resolved tag, if it is reserved.
    pub fn lookup(&self, tag: &Tag) -> Option<&ReservedTag> {
        let canonical = tag
            .canonical
            .as_ref()?;
        self.get(canonical.short_base())
    }

    pub fn len(&self) -> usize {
        self.tags
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags
            .is_empty()
    }
}

/// Combined bounds on non-Def subgroups when several reserved tags share a
/// group: the tightest of each, except that with more than one tag present
/// a minimum exceeding the maximum is brought down to it.
pub fn subgroup_bounds(tags: &[&ReservedTag]) -> (usize, Option<usize>) {
    let mut minimum = 0;
    let mut maximum: Option<usize> = None;
    for tag in tags {
        if let Some(min) = tag.min_non_def_subgroups {
            minimum = minimum.max(min);
        }
        if let Some(max) = tag.max_non_def_subgroups {
            maximum = Some(match maximum {
                Some(current) => current.min(max),
                None => max,
            });
        }
    }
    if let Some(max) = maximum {
        if tags.len() > 1 && minimum > max {
            minimum = max;
        }
    }
    (minimum, maximum)
}
