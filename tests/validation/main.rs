use std::path::Path;

use hed::parsing;
use hed::problem::Issue;
use hed::schema::Schema;

mod definitions;
mod reporting;
mod samples;
mod scenarios;
mod temporal;

fn sample_schema() -> Schema {
    let content = parsing::load(Path::new("tests/schemas/sample.json"))
        .unwrap_or_else(|e| panic!("Failed to load sample schema: {}", e));
    Schema::from_json(&content).unwrap_or_else(|e| panic!("Failed to read sample schema: {}", e))
}

fn codes(issues: &[Issue]) -> Vec<&str> {
    issues
        .iter()
        .map(|issue| issue.code.as_str())
        .collect()
}

fn errors(issues: &[Issue]) -> Vec<&Issue> {
    issues
        .iter()
        .filter(|issue| issue.is_error())
        .collect()
}
