//! Checks on the shape of the tree: empty and repeated groups, where
//! group-bound tags are placed, and tags required or unique across the
//! whole string.

use serde_json::{json, Value};
use std::collections::{BTreeSet, HashSet};

use super::{join_texts, schema_entry};
use crate::language::{GroupId, HedString, Node, Tag, TagId};
use crate::problem::{public, ErrorCode, Issue};
use crate::schema::{ReservedTags, SchemaProvider};

pub fn check_empty_groups(hed: &HedString) -> Vec<Issue> {
    hed.group_ids()
        .filter(|id| {
            hed.group(*id)
                .is_empty()
        })
        .map(|id| Issue::for_tag(ErrorCode::GroupEmpty, hed.group_subject(id), Value::Null))
        .collect()
}

/// A group of one is equivalent to its member.
fn collapse(hed: &HedString, node: Node) -> Node {
    match node {
        Node::Group(id) => match hed.children(id) {
            [only] => collapse(hed, *only),
            _ => node,
        },
        Node::Tag(_) => node,
    }
}

fn node_key(hed: &HedString, node: Node) -> String {
    match collapse(hed, node) {
        Node::Tag(id) => hed
            .tag(id)
            .comparison_key(),
        Node::Group(id) => format!("({})", hed.group_key(id)),
    }
}

/// Report siblings that are equal regardless of order. Only the first
/// repeat within each group is reported.
pub fn check_duplicates(hed: &HedString) -> Vec<Issue> {
    let mut issues = Vec::new();
    duplicates_in(hed, HedString::ROOT, &mut issues);
    issues
}

fn duplicates_in(hed: &HedString, id: GroupId, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();
    let mut reported = false;
    for node in hed.children(id) {
        if !reported && !seen.insert(node_key(hed, *node)) {
            issues.push(match collapse(hed, *node) {
                Node::Tag(tag) => Issue::for_tag(ErrorCode::TagRepeated, hed.tag_subject(tag), Value::Null),
                Node::Group(group) => Issue::for_tag(
                    ErrorCode::TagRepeatedGroup,
                    hed.group_subject(group),
                    Value::Null,
                ),
            });
            reported = true;
        }
        if let Node::Group(group) = node {
            duplicates_in(hed, *group, issues);
        }
    }
}

/// Whether a tag must be in a group, and whether that group must be at the
/// top level. Either the schema or the reserved table may say so.
fn group_rules(
    provider: Option<&dyn SchemaProvider>,
    reserved: &ReservedTags,
    tag: &Tag,
) -> (bool, bool) {
    let mut tag_group = false;
    let mut top_level = false;
    if let Some((schema, index)) = schema_entry(provider, tag) {
        let attributes = &schema
            .entry(index)
            .attributes;
        tag_group = attributes.tag_group;
        top_level = attributes.top_level_tag_group;
    }
    if let Some(rule) = reserved.lookup(tag) {
        tag_group |= rule.tag_group;
        top_level |= rule.top_level_tag_group;
    }
    (tag_group, top_level)
}

const TEMPORAL: &[&str] = &["Onset", "Offset", "Inset", "Duration", "Delay"];

/// A top level tag found anywhere but directly inside a top level group.
/// Definitions and temporal tags report under their own public codes.
fn misplaced_top_level(hed: &HedString, id: TagId) -> Issue {
    let tag = hed.tag(id);
    let issue = Issue::for_tag(ErrorCode::TopLevelTag, hed.tag_subject(id), Value::Null);
    if tag.is("Definition") {
        issue.with_actual_code(public::DEFINITION_INVALID)
    } else if TEMPORAL
        .iter()
        .any(|name| tag.is(name))
    {
        issue.with_actual_code(public::TEMPORAL_TAG_ERROR)
    } else {
        issue
    }
}

/// Check that group-bound tags are in a group, and top level ones in a
/// top level group. Tags listed in `skip` already failed checks of their
/// own and are not reported again.
pub fn check_placement(
    hed: &HedString,
    provider: Option<&dyn SchemaProvider>,
    reserved: &ReservedTags,
    skip: &[TagId],
) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (id, tag) in hed.tags() {
        if skip.contains(&id) {
            continue;
        }
        let (tag_group, top_level) = group_rules(provider, reserved, tag);
        if top_level && !hed.is_top_level(tag.parent) {
            issues.push(misplaced_top_level(hed, id));
        } else if tag_group && tag.parent == HedString::ROOT {
            issues.push(Issue::for_tag(ErrorCode::TagGroupTag, hed.tag_subject(id), Value::Null));
        }
    }
    issues
}

/// At most one top level tag may head a group, except that Duration and
/// Delay go together.
pub fn check_multiple_top_tags(
    hed: &HedString,
    provider: Option<&dyn SchemaProvider>,
    reserved: &ReservedTags,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    for group in hed.top_level_groups() {
        let tops: Vec<_> = hed
            .direct_tags(group)
            .into_iter()
            .filter(|id| {
                group_rules(provider, reserved, hed.tag(*id)).1
            })
            .collect();
        if tops.len() < 2 {
            continue;
        }

        let names: BTreeSet<String> = tops
            .iter()
            .filter_map(|id| {
                hed.tag(*id)
                    .canonical
                    .as_ref()
            })
            .map(|canonical| {
                canonical
                    .short_base()
                    .to_lowercase()
            })
            .collect();
        if tops.len() == 2 && names.len() == 2 && names.contains("duration") && names.contains("delay") {
            continue;
        }

        let others = join_texts(
            tops[1..]
                .iter()
                .map(|id| {
                    hed.tag(*id)
                        .text
                        .as_str()
                }),
        );
        issues.push(Issue::for_tag(
            ErrorCode::MultipleTopTags,
            hed.tag_subject(tops[0]),
            json!({ "others": others }),
        ));
    }
    issues
}

fn under(long: &str, prefix: &str) -> bool {
    long == prefix
        || long
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('/'))
}

/// Check tags marked required (present at least once) and unique (present
/// at most once) in each schema. Tags inside definitions don't count.
pub fn check_required_unique(
    hed: &HedString,
    provider: &dyn SchemaProvider,
    check_required: bool,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    for prefix in provider.prefixes() {
        let schema = match provider.schema_for(prefix) {
            Some(schema) => schema,
            None => continue,
        };
        let longs: Vec<String> = hed
            .tags()
            .filter(|(id, tag)| !hed.in_definition(*id) && tag.namespace.eq_ignore_ascii_case(prefix))
            .filter_map(|(_, tag)| tag.long_form())
            .map(str::to_lowercase)
            .collect();

        if check_required {
            for required in schema.required_prefixes() {
                let wanted = required.to_lowercase();
                if !longs
                    .iter()
                    .any(|long| under(long, &wanted))
                {
                    issues.push(Issue::new(
                        ErrorCode::RequiredTagMissing,
                        json!({ "namespace": format!("{}{}", prefix, required) }),
                    ));
                }
            }
        }

        for unique in schema.unique_prefixes() {
            let wanted = unique.to_lowercase();
            let count = longs
                .iter()
                .filter(|long| under(long, &wanted))
                .count();
            if count > 1 {
                issues.push(Issue::new(
                    ErrorCode::TagNotUnique,
                    json!({ "namespace": format!("{}{}", prefix, unique) }),
                ));
            }
        }
    }
    issues
}
