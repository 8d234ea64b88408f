//! Gathering definitions out of the strings that declare them.

use serde_json::json;
use tracing::debug;

use super::{join_texts, schema_entry};
use crate::language::{DefDict, DefEntry, HedString, TagId};
use crate::problem::{Context, ErrorCode, Issue};
use crate::schema::SchemaProvider;

/// Tags a definition body may not contain.
const FORBIDDEN: &[&str] = &["Definition", "Def", "Def-expand"];

/// Check each Definition group in the string and add the sound ones to the
/// dictionary. `context` is recorded on each entry so later problems can
/// say where the definition came from.
pub fn extract_definitions(
    hed: &HedString,
    provider: Option<&dyn SchemaProvider>,
    definitions: &mut DefDict,
    context: &[Context],
) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (anchor, group) in hed.find_top_level_tags(&["Definition"]) {
        let mut problems = Vec::new();
        let subject = hed.tag_subject(anchor);
        let text = |id: TagId| {
            hed.tag(id)
                .text
                .as_str()
        };

        let reference = hed
            .tag(anchor)
            .extension();
        let (name, takes_value) = match reference.strip_suffix("/#") {
            Some(name) => (name, true),
            None => (reference, false),
        };
        if name.is_empty() || name.contains('/') || name.contains('#') {
            problems.push(Issue::for_tag(
                ErrorCode::InvalidDefinitionExtension,
                subject,
                json!({ "name": name }),
            ));
        }

        let extra: Vec<&str> = hed
            .direct_tags(group)
            .into_iter()
            .filter(|id| *id != anchor)
            .map(text)
            .collect();
        if !extra.is_empty() {
            problems.push(Issue::for_tag(
                ErrorCode::WrongNumberTags,
                subject,
                json!({ "name": name, "others": join_texts(extra) }),
            ));
        }

        let groups = hed.direct_groups(group);
        if groups.len() > 1 {
            problems.push(Issue::for_tag(
                ErrorCode::WrongNumberGroupTags,
                subject,
                json!({
                    "name": name,
                    "others": join_texts(groups.iter().map(|child| hed.group_text(*child))),
                }),
            ));
        }

        let body = match groups.first() {
            Some(content) => hed.descendant_tags(*content),
            None => Vec::new(),
        };

        for id in &body {
            let tag = hed.tag(*id);
            if FORBIDDEN
                .iter()
                .any(|forbidden| tag.is(forbidden))
            {
                problems.push(Issue::for_tag(
                    ErrorCode::DefTagInDefinition,
                    hed.tag_subject(*id),
                    json!({ "name": name }),
                ));
            }
        }

        let placeholders: Vec<&str> = body
            .iter()
            .filter(|id| {
                hed.tag(**id)
                    .text
                    .contains('#')
            })
            .map(|id| text(*id))
            .collect();
        let count: usize = placeholders
            .iter()
            .map(|text| {
                text.matches('#')
                    .count()
            })
            .sum();
        let expected = if takes_value { 1 } else { 0 };
        if count != expected {
            let others = if placeholders.is_empty() {
                "no placeholders".to_string()
            } else {
                join_texts(placeholders)
            };
            problems.push(Issue::for_tag(
                ErrorCode::WrongNumberPlaceholderTags,
                subject,
                json!({ "name": name, "expected": expected, "others": others }),
            ));
        }

        for id in &body {
            if let Some((schema, index)) = schema_entry(provider, hed.tag(*id)) {
                let attributes = &schema
                    .entry(index)
                    .attributes;
                if attributes.required || attributes.unique {
                    problems.push(Issue::for_tag(
                        ErrorCode::BadPropInDefinition,
                        hed.tag_subject(*id),
                        json!({ "name": name }),
                    ));
                }
            }
        }

        if problems.is_empty() {
            let contents = groups
                .first()
                .map(|content| hed.extract_group(*content));
            let entry = DefEntry::new(name, contents, takes_value, context.to_vec());
            match definitions.add(entry) {
                Ok(()) => debug!("Registered definition {}", name),
                Err(_) => problems.push(Issue::for_tag(
                    ErrorCode::DuplicateDefinition,
                    subject,
                    json!({ "name": name }),
                )),
            }
        }

        issues.extend(problems);
    }
    issues
}

/// Report every Definition group, for strings where definitions may not
/// appear.
pub fn check_definition_location(hed: &HedString) -> Vec<Issue> {
    hed.find_top_level_tags(&["Definition"])
        .into_iter()
        .map(|(anchor, _)| {
            Issue::for_tag(
                ErrorCode::BadDefinitionLocation,
                hed.tag_subject(anchor),
                serde_json::Value::Null,
            )
        })
        .collect()
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::parsing::{parse, resolve};
    use crate::problem::{ContextType, ContextValue};

    fn prepared(text: &str) -> HedString {
        let (mut hed, issues) = parse(text);
        assert!(issues.is_empty());
        let ids: Vec<_> = hed
            .tag_ids()
            .collect();
        resolve(&mut hed, None, &ids);
        hed
    }

    fn extract(text: &str, definitions: &mut DefDict) -> Vec<Issue> {
        extract_definitions(&prepared(text), None, definitions, &[])
    }

    fn kinds(text: &str) -> Vec<ErrorCode> {
        extract(text, &mut DefDict::new())
            .into_iter()
            .filter_map(|issue| issue.kind)
            .collect()
    }

    #[test]
    fn registering() {
        let mut definitions = DefDict::new();
        let issues = extract("(Definition/Foo/#, (Item/Bar/#)), (Definition/Plain)", &mut definitions);
        assert!(issues.is_empty());
        assert_eq!(definitions.len(), 2);

        let foo = definitions
            .get("foo")
            .unwrap();
        assert!(foo.takes_value);
        assert_eq!(
            foo.contents
                .as_ref()
                .unwrap()
                .to_string(),
            "(Item/Bar/#)"
        );

        let plain = definitions
            .get("Plain")
            .unwrap();
        assert!(!plain.takes_value);
        assert!(plain
            .contents
            .is_none());
    }

    #[test]
    fn source_context() {
        let context = vec![(ContextType::Row, ContextValue::Index(3))];
        let mut definitions = DefDict::new();
        let issues = extract_definitions(
            &prepared("(Definition/Foo, (Red))"),
            None,
            &mut definitions,
            &context,
        );
        assert!(issues.is_empty());
        assert_eq!(
            definitions
                .get("Foo")
                .unwrap()
                .source_context,
            context
        );
    }

    #[test]
    fn malformed() {
        assert_eq!(kinds("(Definition/Foo/Bar, (Red))"), vec![ErrorCode::InvalidDefinitionExtension]);
        assert_eq!(kinds("(Definition/Foo, Red, (Blue))"), vec![ErrorCode::WrongNumberTags]);
        assert_eq!(kinds("(Definition/Foo, (Red), (Blue))"), vec![ErrorCode::WrongNumberGroupTags]);
        assert_eq!(kinds("(Definition/Foo, (Def/Bar))"), vec![ErrorCode::DefTagInDefinition]);
    }

    #[test]
    fn placeholder_counts() {
        let issues = extract("(Definition/Foo/#, (Red))", &mut DefDict::new());
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "Incorrect number of placeholders found in definition for Foo. Expected 1, found: no placeholders"
        );

        assert_eq!(kinds("(Definition/Foo, (Label/#))"), vec![ErrorCode::WrongNumberPlaceholderTags]);
        assert_eq!(
            kinds("(Definition/Foo/#, (Label/#, Item/#))"),
            vec![ErrorCode::WrongNumberPlaceholderTags]
        );
    }

    #[test]
    fn duplicates() {
        let mut definitions = DefDict::new();
        assert!(extract("(Definition/Foo, (Red))", &mut definitions).is_empty());
        let issues = extract("(Definition/foo, (Blue))", &mut definitions);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Some(ErrorCode::DuplicateDefinition));
        assert_eq!(issues[0].code, "DEFINITION_INVALID");

        // the first one stands
        assert_eq!(
            definitions
                .get("foo")
                .unwrap()
                .contents
                .as_ref()
                .unwrap()
                .to_string(),
            "(Red)"
        );
    }

    #[test]
    fn not_registered_when_broken() {
        let mut definitions = DefDict::new();
        extract("(Definition/Foo, Red, (Blue))", &mut definitions);
        assert!(definitions.is_empty());
    }

    #[test]
    fn location() {
        let issues = check_definition_location(&prepared("Red, (Definition/Foo, (Blue))"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, Some(ErrorCode::BadDefinitionLocation));
    }
}
