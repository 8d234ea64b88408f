//! Checks on individual resolved tags: values, units, placeholders, and
//! the attributes the schema or the reserved table attach to a node.

use serde_json::{json, Value};

use super::schema_entry;
use crate::language::{HedString, TagId};
use crate::problem::{ErrorCode, Issue, Subject};
use crate::schema::{ReservedTags, Schema, SchemaProvider, ValueClass};

/// Tags whose value is a definition reference rather than a value of the
/// `#` node's class.
const DEFINITIONAL: &[&str] = &["Definition", "Def", "Def-expand"];

pub fn check_tag(
    provider: Option<&dyn SchemaProvider>,
    reserved: &ReservedTags,
    hed: &HedString,
    id: TagId,
    allow_placeholders: bool,
) -> Vec<Issue> {
    let tag = hed.tag(id);
    let canonical = match &tag.canonical {
        Some(canonical) => canonical,
        None => return Vec::new(),
    };
    let subject = hed.tag_subject(id);
    let definitional = DEFINITIONAL
        .iter()
        .any(|name| tag.is(name));

    let mut issues = Vec::new();
    let mut requires_child = false;

    if let Some((schema, index)) = schema_entry(provider, tag) {
        let entry = schema.entry(index);

        if let Some(version) = &entry
            .attributes
            .deprecated_from
        {
            issues.push(Issue::for_tag(
                ErrorCode::ElementDeprecated,
                subject,
                json!({ "version": version }),
            ));
        }

        if entry
            .attributes
            .require_child
            && canonical
                .extension
                .is_empty()
        {
            issues.push(Issue::for_tag(ErrorCode::TagRequiresChild, subject, Value::Null));
            requires_child = true;
        }

        match canonical.value_entry {
            Some(value_index) if definitional => {
                issues.extend(check_reference(schema, value_index, subject, &canonical.extension));
            }
            Some(value_index) => {
                issues.extend(check_value(
                    schema,
                    value_index,
                    subject,
                    &canonical.extension,
                    allow_placeholders,
                ));
            }
            None => {
                if canonical
                    .extension
                    .contains('#')
                {
                    issues.push(placeholder(subject, "only a tag taking a value may hold a placeholder"));
                }
            }
        }
    }

    if let Some(rule) = reserved.lookup(tag) {
        if rule.no_extension
            && !canonical
                .extension
                .is_empty()
        {
            issues.push(Issue::for_tag(ErrorCode::TagExtensionInvalid, subject, Value::Null));
        }
        if rule.require_value
            && canonical
                .extension
                .is_empty()
            && !requires_child
        {
            issues.push(Issue::for_tag(ErrorCode::TagRequiresChild, subject, Value::Null));
        }
    }

    issues
}

fn placeholder(subject: Subject<'_>, problem: &str) -> Issue {
    Issue::for_tag(
        ErrorCode::PlaceholderInvalid,
        subject,
        json!({ "problem": problem }),
    )
}

/// The name portion of a Definition, Def, or Def-expand value must be a
/// valid name. Anything after the first slash is a value checked later,
/// against the definition.
fn check_reference(schema: &Schema, index: usize, subject: Subject<'_>, value: &str) -> Vec<Issue> {
    let (name, _) = crate::language::split_reference(value);
    let classes = &schema
        .entry(index)
        .attributes
        .value_class;
    let accepted = if classes.is_empty() {
        ValueClass::Name.accepts(name)
    } else {
        classes
            .iter()
            .any(|class| class.accepts(name))
    };
    if accepted {
        Vec::new()
    } else {
        vec![Issue::for_tag(ErrorCode::ValueInvalid, subject, Value::Null)]
    }
}

/// Check a value given to a `#` node: the placeholder rules, its units,
/// and its value class. `index` is the `#` node itself.
pub fn check_value(
    schema: &Schema,
    index: usize,
    subject: Subject<'_>,
    value: &str,
    allow_placeholders: bool,
) -> Vec<Issue> {
    let placeholders = value
        .matches('#')
        .count();
    if placeholders > 0 && !allow_placeholders {
        return vec![placeholder(subject, "placeholders are not allowed here")];
    }
    if placeholders > 1 {
        return vec![placeholder(subject, "only one placeholder is allowed")];
    }

    let classes = schema.unit_classes_for(index);
    let stripped = classes
        .iter()
        .find_map(|class| class.strip_units(value));

    if !classes.is_empty() && stripped.is_none() && value.contains(char::is_whitespace) {
        let units: Vec<&str> = classes
            .iter()
            .flat_map(|class| class.unit_names())
            .collect();
        return vec![Issue::for_tag(
            ErrorCode::UnitsInvalid,
            subject,
            json!({ "units": units.join(", ") }),
        )];
    }

    let bare = stripped.unwrap_or(value);
    if placeholders > 0 {
        if bare != "#" {
            return vec![placeholder(subject, "a placeholder must stand for the whole value")];
        }
        return Vec::new();
    }

    let declared = &schema
        .entry(index)
        .attributes
        .value_class;
    let fallback = if classes.is_empty() {
        [ValueClass::Text]
    } else {
        [ValueClass::Numeric]
    };
    let accepted = if declared.is_empty() {
        fallback
            .iter()
            .any(|class| class.accepts(bare))
    } else {
        declared
            .iter()
            .any(|class| class.accepts(bare))
    };
    if !accepted {
        return vec![Issue::for_tag(ErrorCode::ValueInvalid, subject, Value::Null)];
    }

    let mut issues = Vec::new();
    if stripped.is_none() && !classes.is_empty() {
        if let Some(unit) = schema.default_units_for(index) {
            issues.push(Issue::for_tag(
                ErrorCode::UnitsMissing,
                subject,
                json!({ "unit": unit }),
            ));
        }
    }
    issues
}
