use hed::problem::{ContextType, ContextValue, ErrorCode};
use hed::schema::ReservedTags;
use hed::validation::{HedValidator, ValidatorOptions};

use super::{codes, sample_schema};

const DEFINITIONS: &str =
    "(Definition/Look/#, (Action/Move, Parameter-value/#)), (Definition/Rest, (Agent/Human-agent))";

fn kinds(issues: &[hed::problem::Issue]) -> Vec<ErrorCode> {
    issues
        .iter()
        .filter_map(|issue| issue.kind)
        .collect()
}

#[test]
fn matched_events_across_rows() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    assert!(validator
        .validate(DEFINITIONS, &mut handler)
        .is_empty());

    let rows = [
        "(Def/Look/3, Onset), Sensory-event",
        "(Def/Rest, Onset, (Red))",
        "(Def/Look/3, Inset, (Blue))",
        "(Def/Look/3, Offset)",
        "Agent-action, (Def/Rest, Offset)",
    ];
    let (issues, state) = validator.validate_series(&rows, &mut handler);
    assert!(issues.is_empty(), "{:?}", issues);
    assert!(state.is_empty());
}

#[test]
fn unmatched_events() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    let rows = [
        "(Def/Rest, Inset)",
        "(Def/Look/2, Onset)",
        "(Def/Look/3, Offset)",
        "Red",
    ];
    let (issues, state) = validator.validate_series(&rows, &mut handler);
    assert_eq!(
        kinds(&issues),
        vec![ErrorCode::InsetBeforeOnset, ErrorCode::OffsetBeforeOnset]
    );
    assert_eq!(
        issues[1].context,
        vec![(ContextType::Row, ContextValue::Index(3))]
    );
    assert_eq!(state.open_names(), vec!["Look/2"]);
}

#[test]
fn repeated_onsets() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    for k in 1..4 {
        let mut rows: Vec<&str> = vec!["(Def/Rest, Onset)"; k];
        rows.extend(vec!["(Def/Rest, Offset)"; k]);
        let (issues, state) = validator.validate_series(&rows, &mut handler);
        assert!(issues.is_empty(), "{} pairs", k);
        assert!(state.is_empty());

        rows.push("(Def/Rest, Offset)");
        let (issues, _) = validator.validate_series(&rows, &mut handler);
        assert_eq!(kinds(&issues), vec![ErrorCode::OffsetBeforeOnset], "{} pairs", k);
    }
}

#[test]
fn temporal_group_shape() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    let issues = validator.validate("(Onset, (Red))", &mut handler);
    assert_eq!(kinds(&issues), vec![ErrorCode::OnsetNoDefTagFound]);

    let issues = validator.validate("(Onset, Def/Rest, Red)", &mut handler);
    assert_eq!(kinds(&issues), vec![ErrorCode::OnsetTagOutsideOfGroup]);

    let issues = validator.validate("(Onset, Def/Rest, (Red), (Blue))", &mut handler);
    assert_eq!(kinds(&issues), vec![ErrorCode::OnsetWrongNumberGroups]);

    let issues = validator.validate("(Onset, Def/Look)", &mut handler);
    assert_eq!(kinds(&issues), vec![ErrorCode::OnsetPlaceholderWrong]);
    assert_eq!(codes(&issues), vec!["TEMPORAL_TAG_ERROR"]);

    let issues = validator.validate("(Onset, Offset, Def/Rest)", &mut handler);
    assert_eq!(
        kinds(&issues),
        vec![ErrorCode::MultipleTopTags, ErrorCode::OnsetTagOutsideOfGroup]
    );
}

#[test]
fn misplaced_temporal_tags() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    let issues = validator.validate("Onset, Def/Rest", &mut handler);
    assert_eq!(kinds(&issues), vec![ErrorCode::TopLevelTag]);
    assert_eq!(codes(&issues), vec!["TEMPORAL_TAG_ERROR"]);

    let issues = validator.validate("(Red, (Onset, Def/Rest))", &mut handler);
    let top: Vec<_> = issues
        .iter()
        .filter(|issue| issue.kind == Some(ErrorCode::TopLevelTag))
        .collect();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].code, "TEMPORAL_TAG_ERROR");
}

#[test]
fn durations() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    assert!(validator
        .validate("(Duration/2 s, (Red))", &mut handler)
        .is_empty());
    assert!(validator
        .validate("(Duration/2 s, Delay/1 s, (Def/Rest, Red))", &mut handler)
        .is_empty());

    let issues = validator.validate("(Duration/2 s)", &mut handler);
    assert_eq!(kinds(&issues), vec![ErrorCode::DurationWrongNumberGroups]);

    let issues = validator.validate("(Duration/2 s, Def/Rest, (Red))", &mut handler);
    assert_eq!(kinds(&issues), vec![ErrorCode::DurationHasOtherTags]);
}

#[test]
fn temporal_checks_can_be_turned_off() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let options = ValidatorOptions {
        check_temporal: false,
        ..ValidatorOptions::default()
    };
    let mut validator = HedValidator::new(Some(&schema), &reserved, options);
    let mut handler = validator.handler();
    validator.validate(DEFINITIONS, &mut handler);

    let (issues, _) = validator.validate_series(&["(Def/Rest, Offset)"], &mut handler);
    assert!(issues.is_empty());
}
