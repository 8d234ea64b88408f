//! Checks on Def and Def-expand references against known definitions.

use serde_json::{json, Value};

use super::{is_temporal, tags::check_value};
use crate::language::{split_reference, DefDict, DefEntry, GroupId, HedString, Node, TagId};
use crate::problem::{ErrorCode, Issue, Subject};
use crate::schema::SchemaProvider;

/// The codes used for one kind of reference.
struct Codes {
    unmatched: ErrorCode,
    missing: ErrorCode,
    extra: ErrorCode,
    invalid: ErrorCode,
}

const DEF: Codes = Codes {
    unmatched: ErrorCode::DefUnmatched,
    missing: ErrorCode::DefValueMissing,
    extra: ErrorCode::DefValueExtra,
    invalid: ErrorCode::DefValueInvalid,
};

const DEF_EXPAND: Codes = Codes {
    unmatched: ErrorCode::DefExpandUnmatched,
    missing: ErrorCode::DefExpandValueMissing,
    extra: ErrorCode::DefExpandValueExtra,
    invalid: ErrorCode::DefExpandValueInvalid,
};

pub fn check_defs(
    hed: &HedString,
    definitions: &DefDict,
    provider: Option<&dyn SchemaProvider>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (id, tag) in hed.tags() {
        if !tag.is("Def") || hed.in_definition(id) {
            continue;
        }
        let temporal = is_temporal(hed, tag.parent);
        let (problems, _) = check_reference(hed, id, definitions, provider, &DEF, temporal);
        issues.extend(problems);
    }

    for (id, group) in hed.find_groups_with("Def-expand") {
        if hed.in_definition(id) {
            continue;
        }
        let temporal = hed
            .group(group)
            .parent
            .map_or(false, |parent| is_temporal(hed, parent));
        let (problems, entry) = check_reference(hed, id, definitions, provider, &DEF_EXPAND, temporal);
        let clean = problems.is_empty();
        issues.extend(problems);
        if let (true, Some(entry)) = (clean, entry) {
            issues.extend(check_expansion(hed, id, group, entry));
        }
    }

    issues
}

/// Match a reference to its definition and check any value it supplies.
/// Missing and surplus values in temporal groups are left to the temporal
/// checks, which report them in their own terms.
fn check_reference<'d>(
    hed: &HedString,
    id: TagId,
    definitions: &'d DefDict,
    provider: Option<&dyn SchemaProvider>,
    codes: &Codes,
    temporal: bool,
) -> (Vec<Issue>, Option<&'d DefEntry>) {
    let subject = hed.tag_subject(id);
    let (name, value) = split_reference(
        hed.tag(id)
            .extension(),
    );
    let entry = match definitions.get(name) {
        Some(entry) => entry,
        None => return (vec![Issue::for_tag(codes.unmatched, subject, Value::Null)], None),
    };

    let mut issues = Vec::new();
    match (entry.takes_value, value) {
        (true, None) if !temporal => {
            issues.push(Issue::for_tag(codes.missing, subject, Value::Null));
        }
        (false, Some(_)) if !temporal => {
            issues.push(Issue::for_tag(codes.extra, subject, Value::Null));
        }
        (true, Some(value)) => {
            if !value_fits(entry, value, provider, subject) {
                issues.push(Issue::for_tag(codes.invalid, subject, Value::Null));
            }
        }
        _ => {}
    }
    (issues, Some(entry))
}

/// Whether a value substituted for a definition's placeholder makes a valid
/// tag. Without a schema to say otherwise, any value fits.
fn value_fits(
    entry: &DefEntry,
    value: &str,
    provider: Option<&dyn SchemaProvider>,
    subject: Subject<'_>,
) -> bool {
    if value.contains('#') {
        return false;
    }
    let (body, id) = match (&entry.contents, entry.placeholder_tag()) {
        (Some(body), Some(id)) => (body, id),
        _ => return true,
    };
    let tag = body.tag(id);
    let canonical = match &tag.canonical {
        Some(canonical) => canonical,
        None => return true,
    };
    let (schema, index) = match (
        provider.and_then(|provider| provider.schema_for(&tag.namespace)),
        canonical.value_entry,
    ) {
        (Some(schema), Some(index)) => (schema, index),
        _ => return true,
    };

    let substituted = canonical
        .extension
        .replace('#', value);
    !check_value(schema, index, subject, &substituted, false)
        .iter()
        .any(Issue::is_error)
}

fn node_key(hed: &HedString, node: &Node) -> String {
    match node {
        Node::Tag(tag) => hed
            .tag(*tag)
            .comparison_key(),
        Node::Group(group) => format!("({})", hed.group_key(*group)),
    }
}

/// A Def-expand group must hold exactly what its definition expands to.
fn check_expansion(hed: &HedString, id: TagId, group: GroupId, entry: &DefEntry) -> Vec<Issue> {
    let (_, value) = split_reference(
        hed.tag(id)
            .extension(),
    );

    let mut actual: Vec<String> = hed
        .children(group)
        .iter()
        .filter(|node| **node != Node::Tag(id))
        .map(|node| node_key(hed, node))
        .collect();
    actual.sort();

    let expansion = entry.expand(value);
    let mut expected: Vec<String> = match &expansion {
        Some(body) => body
            .children(HedString::ROOT)
            .iter()
            .map(|node| node_key(body, node))
            .collect(),
        None => Vec::new(),
    };
    expected.sort();

    if actual == expected {
        return Vec::new();
    }

    let shown: Vec<String> = hed
        .children(group)
        .iter()
        .filter(|node| **node != Node::Tag(id))
        .map(|node| match node {
            Node::Tag(tag) => hed
                .tag(*tag)
                .text
                .clone(),
            Node::Group(child) => hed
                .group_text(*child)
                .to_string(),
        })
        .collect();
    let expected = match &expansion {
        Some(body) => body.to_string(),
        None => String::new(),
    };
    vec![Issue::for_tag(
        ErrorCode::DefExpandInvalid,
        hed.group_subject(group),
        json!({ "actual": shown.join(","), "expected": expected }),
    )]
}
