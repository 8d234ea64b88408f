//! Parser for HED strings

use std::path::Path;
use tracing::debug;

use crate::language::LoadingError;

mod canonical;
mod delimiters;
mod parser;

pub use canonical::{resolve, resolve_tag, KEY_TAGS};
pub use delimiters::check_delimiters;
pub use parser::parse;

/// Read a file and return an owned String. We pass that ownership back to
/// the caller so the strings parsed from it can borrow from it as long as
/// needed.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// The HED strings in a file holding one per line, with their line
/// numbers. Blank lines and lines starting with `#` are skipped.
pub fn lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| (i + 1, line.trim_end()))
        .collect()
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn reading_lines() {
        let content = "# good strings\nEvent, Item\n\n  (Red, Blue)\n";
        assert_eq!(lines(content), vec![(2, "Event, Item"), (4, "  (Red, Blue)")]);
    }

    #[test]
    fn missing_file() {
        let result = load(Path::new("no/such/file.hed"));
        assert_eq!(
            result
                .unwrap_err()
                .problem,
            "File not found"
        );
    }
}
