//! Resolve tags against the schema, working out their long and short
//! forms and where any extension or value begins.

use serde_json::json;
use tracing::debug;

use crate::language::{Canonical, HedString, Tag, TagId};
use crate::problem::{ErrorCode, Issue, Subject};
use crate::schema::{Schema, SchemaProvider};

/// Tags recognized by name when validating without a schema; enough to
/// drive definition and temporal handling.
pub const KEY_TAGS: &[&str] = &[
    "Definition",
    "Def",
    "Def-expand",
    "Onset",
    "Offset",
    "Inset",
    "Duration",
    "Delay",
];

/// Resolve the given tags in place, returning any problems found.
pub fn resolve(
    hed: &mut HedString,
    provider: Option<&dyn SchemaProvider>,
    tags: &[TagId],
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut resolved = 0;
    for id in tags {
        let (canonical, problems) = resolve_tag(hed.tag(*id), provider);
        if canonical.is_some() {
            resolved += 1;
        }
        hed.tag_mut(*id)
            .canonical = canonical;
        issues.extend(problems);
    }
    debug!("Resolved {} of {} tags", resolved, tags.len());
    issues
}

/// Work out the canonical forms of one tag. Unresolvable tags yield None
/// along with the issue saying why.
pub fn resolve_tag(
    tag: &Tag,
    provider: Option<&dyn SchemaProvider>,
) -> (Option<Canonical>, Vec<Issue>) {
    let provider = match provider {
        Some(provider) => provider,
        None => return (recognize_key(tag), Vec::new()),
    };

    match provider.schema_for(&tag.namespace) {
        Some(schema) => convert(tag, schema),
        None => {
            let prefixes: Vec<String> = provider
                .prefixes()
                .iter()
                .map(|prefix| format!("'{}'", prefix))
                .collect();
            let issue = Issue::for_tag_span(
                ErrorCode::LibraryUnmatched,
                subject(tag),
                0,
                tag.namespace
                    .len(),
                json!({ "prefix": tag.namespace, "prefixes": prefixes.join(", ") }),
            );
            (None, vec![issue])
        }
    }
}

fn subject(tag: &Tag) -> Subject<'_> {
    Subject::new(&tag.text, tag.span.start)
}

/// Without a schema only the key tags are recognized, by their first term.
fn recognize_key(tag: &Tag) -> Option<Canonical> {
    let path = tag.path();
    let (first, extension) = match path.split_once('/') {
        Some((first, rest)) => (first, rest),
        None => (path, ""),
    };
    let key = KEY_TAGS
        .iter()
        .find(|key| key.eq_ignore_ascii_case(first.trim()))?;

    let form = if extension.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", key, extension)
    };
    Some(Canonical {
        long_form: form.clone(),
        short_form: form,
        base_tag: key.to_string(),
        extension: extension.to_string(),
        entry: None,
        value_entry: None,
    })
}

fn canonical(schema: &Schema, index: usize, extension: &str, value: Option<usize>) -> Canonical {
    let entry = schema.entry(index);
    let suffix = if extension.is_empty() {
        String::new()
    } else {
        format!("/{}", extension)
    };
    Canonical {
        long_form: format!("{}{}", entry.long_name, suffix),
        short_form: format!("{}{}", entry.short_name, suffix),
        base_tag: entry
            .long_name
            .clone(),
        extension: extension.to_string(),
        entry: Some(index),
        value_entry: value,
    }
}

/// The terms of a tag's path with their offsets in the tag's text.
fn terms(tag: &Tag) -> Vec<(usize, &str)> {
    let mut result = Vec::new();
    let mut start = tag.path_offset();
    for term in tag
        .path()
        .split('/')
    {
        result.push((start, term));
        start += term.len() + 1;
    }
    result
}

fn convert(tag: &Tag, schema: &Schema) -> (Option<Canonical>, Vec<Issue>) {
    let terms = terms(tag);
    let (first_start, first) = terms[0];

    let mut current = match schema.find(first.trim()) {
        Some(index) => index,
        None => {
            let issue = Issue::for_tag_span(
                ErrorCode::NoValidTagFound,
                subject(tag),
                first_start,
                first_start + first.len(),
                json!({ "term": first }),
            );
            return (None, vec![issue]);
        }
    };

    for (k, (start, term)) in terms
        .iter()
        .enumerate()
        .skip(1)
    {
        let entry = schema.entry(current);

        // everything after a value taking node is its value
        if let Some(value) = entry.placeholder {
            let remainder = &tag.text[*start..];
            return (Some(canonical(schema, current, remainder, Some(value))), Vec::new());
        }

        match schema.find(term.trim()) {
            Some(child)
                if schema
                    .entry(child)
                    .parent
                    == Some(current) =>
            {
                current = child;
            }
            Some(other) => return (None, vec![misplaced(tag, schema, *start, term, other)]),
            None => {
                if !entry.extension_allowed {
                    let issue = Issue::for_tag(
                        ErrorCode::TagExtensionInvalid,
                        subject(tag),
                        serde_json::Value::Null,
                    );
                    return (None, vec![issue]);
                }

                for (later, word) in &terms[k + 1..] {
                    if let Some(other) = schema.find(word.trim()) {
                        return (None, vec![misplaced(tag, schema, *later, word, other)]);
                    }
                }

                let extension = &tag.text[*start..];
                let issue = Issue::for_tag_span(
                    ErrorCode::TagExtended,
                    subject(tag),
                    *start,
                    tag.text
                        .len(),
                    serde_json::Value::Null,
                );
                return (Some(canonical(schema, current, extension, None)), vec![issue]);
            }
        }
    }

    (Some(canonical(schema, current, "", None)), Vec::new())
}

/// A vocabulary term used somewhere other than under its own parent.
fn misplaced(tag: &Tag, schema: &Schema, start: usize, term: &str, found: usize) -> Issue {
    Issue::for_tag_span(
        ErrorCode::InvalidParentNode,
        subject(tag),
        start,
        start + term.len(),
        json!({
            "term": term,
            "expected": schema
                .entry(found)
                .long_name,
        }),
    )
}
