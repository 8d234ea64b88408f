//! Check placement of commas and parentheses. This works over the raw text
//! rather than the tree, since the tree has already discarded the evidence.

use crate::language::Span;
use crate::problem::{ErrorCode, Issue, Subject};
use serde_json::Value;

/// The last character seen that was not whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Comma(usize),
    Open,
    Close,
    Text,
}

pub fn check_delimiters(content: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut last: Option<Mark> = None;
    let mut tag = Span::default();
    let mut opened: Vec<usize> = Vec::new();
    let mut group = Span::default();

    let comma_missing = |span: Span| {
        Issue::for_tag(
            ErrorCode::CommaMissing,
            Subject::new(span.slice(content), span.start),
            Value::Null,
        )
    };

    for (i, c) in content.char_indices() {
        if c.is_whitespace() {
            continue;
        }
        match c {
            ',' => {
                match last {
                    None | Some(Mark::Comma(_)) | Some(Mark::Open) => {
                        issues.push(Issue::at(ErrorCode::TagEmpty, content, i));
                    }
                    _ => {}
                }
                last = Some(Mark::Comma(i));
            }
            '(' => {
                match last {
                    Some(Mark::Text) => issues.push(comma_missing(tag)),
                    Some(Mark::Close) => issues.push(comma_missing(group)),
                    _ => {}
                }
                opened.push(i);
                last = Some(Mark::Open);
            }
            ')' => {
                if let Some(Mark::Comma(comma)) = last {
                    issues.push(Issue::at(ErrorCode::TagEmpty, content, comma));
                }
                if let Some(start) = opened.pop() {
                    group = Span::new(start, i + 1);
                }
                last = Some(Mark::Close);
            }
            _ => {
                match last {
                    Some(Mark::Text) => {}
                    Some(Mark::Close) => {
                        issues.push(comma_missing(group));
                        tag = Span::new(i, i);
                    }
                    _ => tag = Span::new(i, i),
                }
                tag.end = i + c.len_utf8();
                last = Some(Mark::Text);
            }
        }
    }

    if let Some(Mark::Comma(comma)) = last {
        issues.push(Issue::at(ErrorCode::TagEmpty, content, comma));
    }

    issues
}
