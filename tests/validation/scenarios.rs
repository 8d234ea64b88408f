use hed::parsing;
use hed::problem::ErrorCode;
use hed::schema::{ReservedTags, Schema};
use hed::validation::{HedValidator, ValidatorOptions};

use super::{codes, sample_schema};

#[test]
fn known_long_tag() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("Event/Sensory-event", &mut handler);
    assert!(issues.is_empty(), "{:?}", issues);

    let (hed, _) = validator.parse("Event/Sensory-event");
    assert_eq!(hed.short_form_text(), "Sensory-event");
}

#[test]
fn nested_duplicate() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("(Action, (Action))", &mut handler);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, Some(ErrorCode::TagRepeated));
    assert_eq!(issues[0].source_tag, Some("Action".to_string()));
    assert_eq!(issues[0].char_index, Some(10));
}

#[test]
fn nested_duplicate_without_schema() {
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(None, &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("(Event, (Event))", &mut handler);
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0]
            .kind
            .map(|kind| kind.as_str()),
        Some("HED_TAG_REPEATED")
    );
    assert_eq!(issues[0].char_index, Some(9));
}

#[test]
fn invalid_units() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("Duration/3 cm", &mut handler);
    assert_eq!(codes(&issues), vec!["UNITS_INVALID"]);
    assert!(issues[0]
        .message
        .contains("s, second, minute, hour, day"));

    // inside its group the outcome is the same
    let issues = validator.validate("(Duration/3 cm, (Red))", &mut handler);
    assert_eq!(codes(&issues), vec!["UNITS_INVALID"]);
}

#[test]
fn bare_top_level_tags() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    for (text, code) in [
        ("Onset", "TEMPORAL_TAG_ERROR"),
        ("Duration/3 s", "TEMPORAL_TAG_ERROR"),
        ("Definition/Foo", "DEFINITION_INVALID"),
    ] {
        let issues = validator.validate(text, &mut handler);
        let placement: Vec<_> = issues
            .iter()
            .filter(|issue| {
                matches!(
                    issue.kind,
                    Some(ErrorCode::TopLevelTag) | Some(ErrorCode::TagGroupTag)
                )
            })
            .collect();
        assert_eq!(placement.len(), 1, "{}", text);
        assert_eq!(placement[0].kind, Some(ErrorCode::TopLevelTag), "{}", text);
        assert_eq!(placement[0].code, code, "{}", text);
    }
}

#[test]
fn placeholder_definition() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("(Definition/Foo/#, (Item/Bar/#))", &mut handler);
    assert!(issues.is_empty(), "{:?}", issues);

    let entry = validator
        .definitions()
        .get("Foo")
        .unwrap();
    assert_eq!(entry.name, "Foo");
    assert!(entry.takes_value);
}

#[test]
fn placeholder_definition_without_schema() {
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(None, &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("(Definition/Foo/#, (Item/Bar/#))", &mut handler);
    assert!(issues.is_empty(), "{:?}", issues);
    assert!(validator
        .definitions()
        .contains("foo"));
}

#[test]
fn onset_offset_in_one_string() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    assert!(validator
        .validate("(Definition/Foo/#, (Label/#))", &mut handler)
        .is_empty());

    let issues = validator.validate("(Def/Foo/2, Onset), (Def/Foo/2, Offset)", &mut handler);
    assert!(issues.is_empty(), "{:?}", issues);

    let issues = validator.validate(
        "(Def/Foo/2, Onset), (Def/Foo/2, Offset), (Def/Foo/2, Offset)",
        &mut handler,
    );
    let offsets: Vec<_> = issues
        .iter()
        .filter(|issue| issue.kind == Some(ErrorCode::OffsetBeforeOnset))
        .collect();
    assert_eq!(offsets.len(), 1);
}

#[test]
fn unique_tag() {
    let schema = Schema::from_json(
        r##"{
            "version": "1.0.0",
            "tags": [
                { "name": "Event", "attributes": { "unique": true }, "children": [ { "name": "Sensory-event" } ] }
            ]
        }"##,
    )
    .unwrap();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("Event/Sensory-event, Event/Sensory-event", &mut handler);
    let unique: Vec<_> = issues
        .iter()
        .filter(|issue| issue.code == "TAG_NOT_UNIQUE")
        .collect();
    assert_eq!(unique.len(), 1);
    assert_eq!(unique[0].message, "Multiple unique tags with prefix - 'Event'");
}

#[test]
fn long_forms_are_stable() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());

    for text in ["Ball", "Item/Object/Man-made-object/Ball", "Label/Thing", "(Red, Human-agent)"] {
        let (first, issues) = validator.parse(text);
        assert!(issues.is_empty(), "{}", text);
        let long = first.long_form_text();

        let (second, issues) = validator.parse(&long);
        assert!(issues.is_empty(), "{}", long);
        assert_eq!(second.long_form_text(), long);
    }
}

#[test]
fn parentheses_balance() {
    for (text, balanced, depth) in [
        ("Red", true, 0),
        ("(Red, (Blue, (Green)))", true, 3),
        ("(Red), ((Blue))", true, 2),
        ("(Red, (Blue)", false, 0),
        ("Red), (Blue", false, 0),
        ("((Red)))", false, 0),
    ] {
        let (hed, issues) = parsing::parse(text);
        let mismatched = issues
            .iter()
            .any(|issue| issue.code == "PARENTHESES_MISMATCH");
        assert_eq!(!mismatched, balanced, "{}", text);
        if balanced {
            assert_eq!(hed.depth(), depth, "{}", text);
        }
    }
}

#[test]
fn duplicates_regardless_of_order() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    for text in ["(Red, Blue, Red)", "(Red, Red, Blue)", "(Blue, Red, Red)"] {
        let issues = validator.validate(text, &mut handler);
        let repeated: Vec<_> = issues
            .iter()
            .filter(|issue| issue.kind == Some(ErrorCode::TagRepeated))
            .collect();
        assert_eq!(repeated.len(), 1, "{}", text);
    }

    let issues = validator.validate("((Red, Blue), (Blue, Red))", &mut handler);
    assert_eq!(codes(&issues), vec!["TAG_EXPRESSION_REPEATED"]);
}

#[test]
fn required_prefix_coverage() {
    let schema = Schema::from_json(
        r##"{
            "version": "1.0.0",
            "tags": [
                { "name": "Task", "attributes": { "required": true }, "children": [ { "name": "Rest" } ] },
                { "name": "Red" }
            ]
        }"##,
    )
    .unwrap();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("Red", &mut handler);
    assert_eq!(codes(&issues), vec!["REQUIRED_TAG_MISSING"]);

    assert!(validator
        .validate("Red, Rest", &mut handler)
        .is_empty());
    assert!(validator
        .validate("red, task", &mut handler)
        .is_empty());

    // not looked for when validating a fragment
    let options = ValidatorOptions {
        require_full_string: false,
        ..ValidatorOptions::default()
    };
    let mut validator = HedValidator::new(Some(&schema), &reserved, options);
    assert!(validator
        .validate("Red", &mut handler)
        .is_empty());
}

#[test]
fn resolution_problems_are_per_tag() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("Nothing, Red/Dark, Sensory-event/Extra, Event, Old-item", &mut handler);
    assert_eq!(
        codes(&issues),
        vec![
            "TAG_INVALID",
            "TAG_EXTENDED",
            "TAG_EXTENSION_INVALID",
            "TAG_REQUIRES_CHILD",
            "ELEMENT_DEPRECATED"
        ]
    );
}
