use hed::language::DefDict;
use hed::problem::{ContextType, ContextValue, ErrorCode};
use hed::schema::ReservedTags;
use hed::validation::{HedValidator, ValidatorOptions};

use super::{codes, errors, sample_schema};

const DEFINITIONS: &str =
    "(Definition/Look/#, (Action/Move, Parameter-value/#)), (Definition/Rest, (Agent/Human-agent))";

#[test]
fn expand_and_shrink() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    assert!(validator
        .validate(DEFINITIONS, &mut handler)
        .is_empty());

    let (hed, issues) = validator.parse("Red, Def/Look/3");
    assert!(issues.is_empty());
    let expanded = hed.expanded_text(validator.definitions());
    assert_eq!(expanded, "Red,(Def-expand/Look/3,(Action/Move,Parameter-value/3))");

    // the expansion is itself valid, and shrinks back
    let issues = validator.validate(&expanded, &mut handler);
    assert!(issues.is_empty(), "{:?}", issues);
    let (hed, _) = validator.parse(&expanded);
    assert_eq!(hed.shrunk_text(), "Red,Def/Look/3");

    // the stored body is untouched by expanding it
    let entry = validator
        .definitions()
        .get("look")
        .unwrap();
    assert_eq!(
        entry
            .contents
            .as_ref()
            .unwrap()
            .to_string(),
        "(Action/Move,Parameter-value/#)"
    );
}

#[test]
fn unknown_references() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("Red, Def/Nowhere", &mut handler);
    assert_eq!(codes(&issues), vec!["DEF_INVALID"]);
    assert_eq!(issues[0].kind, Some(ErrorCode::DefUnmatched));
    assert_eq!(issues[0].char_index, Some(5));

    let issues = validator.validate("(Def-expand/Nowhere, (Red))", &mut handler);
    assert_eq!(codes(&issues), vec!["DEF_EXPAND_INVALID"]);
    assert_eq!(issues[0].kind, Some(ErrorCode::DefExpandUnmatched));
}

#[test]
fn reference_values() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    let issues = validator.validate("Def/Look", &mut handler);
    assert_eq!(issues[0].kind, Some(ErrorCode::DefValueMissing));

    let issues = validator.validate("Def/Rest/4", &mut handler);
    assert_eq!(issues[0].kind, Some(ErrorCode::DefValueExtra));

    let issues = validator.validate("Def/Look/fast", &mut handler);
    assert!(issues
        .iter()
        .any(|issue| issue.kind == Some(ErrorCode::DefValueInvalid)));
}

#[test]
fn expansions_must_match() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    // order within the expansion doesn't matter
    assert!(validator
        .validate("(Def-expand/Look/3, (Parameter-value/3, Move))", &mut handler)
        .is_empty());

    let issues = validator.validate("(Def-expand/Look/3, (Action/Move, Parameter-value/4))", &mut handler);
    assert_eq!(codes(&issues), vec!["DEF_EXPAND_INVALID"]);
    assert_eq!(issues[0].kind, Some(ErrorCode::DefExpandInvalid));
    assert_eq!(
        issues[0].source_tag,
        Some("(Def-expand/Look/3, (Action/Move, Parameter-value/4))".to_string())
    );
}

#[test]
fn malformed_definitions() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("(Definition/Nested, (Red, Def/Other))", &mut handler);
    assert_eq!(codes(&issues), vec!["DEFINITION_INVALID"]);
    assert_eq!(issues[0].kind, Some(ErrorCode::DefTagInDefinition));

    let issues = validator.validate("(Definition/Two, (Red), (Blue))", &mut handler);
    assert_eq!(issues[0].kind, Some(ErrorCode::WrongNumberGroupTags));

    let issues = validator.validate("(Definition/Open/#, (Red))", &mut handler);
    assert_eq!(issues[0].kind, Some(ErrorCode::WrongNumberPlaceholderTags));
    assert!(issues[0]
        .message
        .contains("no placeholders"));

    assert!(validator
        .definitions()
        .is_empty());
}

#[test]
fn definitions_are_registered_once() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    handler.push_error_context(ContextType::Row, 7usize);
    assert!(validator
        .validate(DEFINITIONS, &mut handler)
        .is_empty());
    handler.pop_error_context();

    let entry = validator
        .definitions()
        .get("Rest")
        .unwrap();
    assert!(!entry.takes_value);
    assert_eq!(
        entry.source_context,
        vec![(ContextType::Row, ContextValue::Index(7))]
    );

    let issues = validator.validate("(Definition/REST, (Red))", &mut handler);
    assert_eq!(codes(&issues), vec!["DEFINITION_INVALID"]);
    assert_eq!(issues[0].kind, Some(ErrorCode::DuplicateDefinition));
    assert_eq!(validator.definitions().len(), 2);
}

#[test]
fn gathered_separately() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();

    let mut first = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = first.handler();
    first.validate("(Definition/Rest, (Red)), (Definition/Walk, (Move))", &mut handler);

    let mut second = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    second.validate("(Definition/Rest, (Blue)), (Definition/Jump, (Press))", &mut handler);

    let (combined, duplicates) = DefDict::combine(&[first.definitions(), second.definitions()]);
    assert_eq!(duplicates, vec!["Rest".to_string()]);
    assert_eq!(combined.len(), 3);

    // the first registration wins
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default())
        .with_definitions(combined);
    let (hed, _) = validator.parse("Def/Rest, Def/Jump");
    assert_eq!(
        hed.expanded_text(validator.definitions()),
        "(Def-expand/Rest,(Red)),(Def-expand/Jump,(Press))"
    );
    assert!(errors(&validator.validate("Def/Walk, Def/Jump", &mut handler)).is_empty());
}
