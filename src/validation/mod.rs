//! Checks run over a parsed HED string, and the validator tying them
//! together.

use crate::language::{GroupId, HedString, Tag, TagId};
use crate::schema::{Schema, SchemaProvider};

mod characters;
mod definitions;
mod defs;
mod groups;
mod onsets;
mod reserved;
mod tags;
mod validator;

pub use characters::{check_string, check_tag_characters};
pub use definitions::{check_definition_location, extract_definitions};
pub use defs::check_defs;
pub use groups::{
    check_duplicates, check_empty_groups, check_multiple_top_tags, check_placement,
    check_required_unique,
};
pub use onsets::{check_onsets, OnsetState};
pub use reserved::check_reserved;
pub use tags::{check_tag, check_value};
pub use validator::{HedValidator, ValidatorOptions};

/// The schema and node a resolved tag refers to.
fn schema_entry<'s>(
    provider: Option<&'s dyn SchemaProvider>,
    tag: &Tag,
) -> Option<(&'s Schema, usize)> {
    let schema = provider?.schema_for(&tag.namespace)?;
    let index = tag
        .canonical
        .as_ref()?
        .entry?;
    Some((schema, index))
}

/// Def tags directly in a group, and Def-expand groups directly beneath
/// it. Each comes with the Def or Def-expand tag itself, and for the
/// latter the group holding it.
fn def_carriers(hed: &HedString, group: GroupId) -> Vec<(TagId, Option<GroupId>)> {
    let mut result = Vec::new();
    for tag in hed.direct_tags(group) {
        if hed
            .tag(tag)
            .is("Def")
        {
            result.push((tag, None));
        }
    }
    for child in hed.direct_groups(group) {
        if let Some(tag) = def_expand_tag(hed, child) {
            result.push((tag, Some(child)));
        }
    }
    result
}

fn def_expand_tag(hed: &HedString, group: GroupId) -> Option<TagId> {
    hed.direct_tags(group)
        .into_iter()
        .find(|tag| {
            hed.tag(*tag)
                .is("Def-expand")
        })
}

/// Whether a group is one of the temporal groups, opened by Onset, Offset,
/// or Inset.
fn is_temporal(hed: &HedString, group: GroupId) -> bool {
    hed.is_top_level(group)
        && hed
            .direct_tags(group)
            .iter()
            .any(|tag| {
                let tag = hed.tag(*tag);
                tag.is("Onset") || tag.is("Offset") || tag.is("Inset")
            })
}

fn join_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}
