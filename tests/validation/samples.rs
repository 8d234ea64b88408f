use std::fs;
use std::path::{Path, PathBuf};

use hed::parsing;
use hed::schema::ReservedTags;
use hed::validation::{HedValidator, ValidatorOptions};

use super::{errors, sample_schema};

fn hed_files(dir: &Path) -> Vec<PathBuf> {
    assert!(dir.exists(), "{} directory missing", dir.display());

    let entries = fs::read_dir(dir).expect("Failed to read directory");

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path
            .extension()
            .and_then(|s| s.to_str())
            == Some("hed")
        {
            files.push(path);
        }
    }
    files.sort();

    assert!(!files.is_empty(), "No .hed files found in {}", dir.display());
    files
}

#[test]
fn ensure_samples_validate() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut failures = Vec::new();

    for file in hed_files(Path::new("tests/samples/")) {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {}", file, e));
        let rows: Vec<&str> = parsing::lines(&content)
            .into_iter()
            .map(|(_, line)| line)
            .collect();

        // each file is a recording of its own
        let mut validator = HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
        let mut handler = validator.handler();
        let (issues, state) = validator.validate_series(&rows, &mut handler);

        let found = errors(&issues);
        if !found.is_empty() {
            println!("File {:?} has errors:", file);
            for issue in found {
                println!("  {}: {}", issue.code, issue.message);
            }
            failures.push(file.clone());
        } else if !state.is_empty() {
            println!("File {:?} leaves open: {:?}", file, state.open_names());
            failures.push(file.clone());
        }
    }

    if !failures.is_empty() {
        panic!(
            "Sample files should validate without errors, but {} files failed",
            failures.len()
        );
    }
}

#[test]
fn ensure_broken_fail() {
    let schema = sample_schema();
    let reserved = ReservedTags::standard();
    let mut unexpected_successes = Vec::new();

    for file in hed_files(Path::new("tests/broken/")) {
        let content = parsing::load(&file)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {}", file, e));

        // every line is wrong on its own
        for (number, line) in parsing::lines(&content) {
            let mut validator =
                HedValidator::new(Some(&schema), &reserved, ValidatorOptions::default());
            let mut handler = validator.handler();
            let issues = validator.validate(line, &mut handler);
            if errors(&issues).is_empty() {
                println!("File {:?} line {} should have failed: {}", file, number, line);
                unexpected_successes.push((file.clone(), number));
            }
        }
    }

    if !unexpected_successes.is_empty() {
        panic!(
            "Broken lines should fail validation, but {} lines passed",
            unexpected_successes.len()
        );
    }
}
