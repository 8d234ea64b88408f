use serde_json::{json, Value};

use hed::problem::{
    filter_issues_by_count, html_issues, printable_issues, ContextType, Issue, Severity,
    DOCUMENTATION_URL,
};
use hed::rendering::{Identity, Terminal};
use hed::schema::ReservedTags;
use hed::validation::{HedValidator, ValidatorOptions};

use super::sample_schema;

#[test]
fn issue_dictionary() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let (issues, _) = validator.validate_series(&["Red", "Red, Red"], &mut handler);
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].to_value(),
        json!({
            "code": "TAG_EXPRESSION_REPEATED",
            "message": "Repeated tag - 'Red'",
            "severity": 1,
            "source_tag": "Red",
            "char_index": 5,
            "char_index_end": 8,
            "ec_row": 2,
        })
    );
}

#[test]
fn warnings_are_marked() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let issues = validator.validate("Item/Extra", &mut handler);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert!(!issues[0].is_error());
    assert_eq!(issues[0].to_value()["severity"], json!(10));
    assert_eq!(issues[0].index_in_tag, Some(5));
}

#[test]
fn report_by_line() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let mut issues = Vec::new();
    for (number, line) in [(1usize, "Red, Red"), (2, "Blue"), (3, "Nothing")] {
        handler.push_error_context(ContextType::Line, number);
        issues.extend(validator.validate(line, &mut handler));
        handler.pop_error_context();
    }
    assert!(handler.error_context_is_empty());

    let report = printable_issues(&issues, Some("3 lines checked"), false, &Identity);
    assert!(report.starts_with(
        "3 lines checked\nLine: 1\n\tTAG_EXPRESSION_REPEATED: Repeated tag - 'Red' [char 5]\nLine: 3\n\tTAG_INVALID: "
    ));
    assert!(report.ends_with("\n\n"));

    let coloured = printable_issues(&issues, Some("3 lines checked"), false, &Terminal);
    assert_ne!(coloured, report);
    assert!(coloured.contains("TAG_INVALID"));

    let html = html_issues(&issues, Some("3 lines checked"), false, Some(DOCUMENTATION_URL));
    assert!(html.starts_with("<h3>3 lines checked</h3>\n<ul>\n<li>Line: 1</li>\n"));
    assert!(html.contains(
        "<a href=\"https://www.hed-resources.org/en/latest/HED_errors.html#tag-expression-repeated\">"
    ));
}

#[test]
fn limiting_repeats() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
    let mut handler = validator.handler();

    let rows = vec!["Red, Red"; 5];
    let (issues, _) = validator.validate_series(&rows, &mut handler);
    assert_eq!(issues.len(), 5);

    let (kept, totals) = filter_issues_by_count(&issues, 2, false);
    assert_eq!(kept.len(), 2);
    assert_eq!(totals.get("TAG_EXPRESSION_REPEATED"), Some(&5));
    assert_eq!(kept[1].to_value()["ec_row"], json!(2));
}

#[test]
fn issues_by_name() {
    let issue = Issue::from_name("HED_TAG_REPEATED", json!({ "tag": "Red" }));
    assert_eq!(issue.code, "TAG_EXPRESSION_REPEATED");
    assert_eq!(issue.message, "Repeated tag - 'Red'");
    assert!(!issue.is_unknown());

    let issue = Issue::from_name("NOT_A_CODE", Value::Null);
    assert!(issue.is_unknown());
    assert!(issue.is_error());
    assert_eq!(issue.code, "NOT_A_CODE");
    assert_eq!(
        issue.message,
        "Unknown error. Code 'NOT_A_CODE' was not found in the lookup."
    );
}
