//! Which characters may appear where.

use serde_json::json;

use crate::language::Tag;
use crate::problem::{ErrorCode, Issue, Subject};

/// Scan the whole string for characters never allowed anywhere: brackets,
/// braces, and anything outside ASCII. Tildes get their own code unless
/// placeholders are permitted, in which case the per-tag scan reports them.
pub fn check_string(content: &str, allow_placeholders: bool) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, c) in content.char_indices() {
        if matches!(c, '[' | ']' | '{' | '}') || !c.is_ascii() {
            issues.push(Issue::at(ErrorCode::CharacterInvalid, content, i));
        } else if c == '~' && !allow_placeholders {
            issues.push(Issue::at(ErrorCode::TildesUnsupported, content, i));
        }
    }
    issues
}

fn base_allowed(c: char, allow_placeholders: bool) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | ':') || (c == '#' && allow_placeholders)
}

fn extension_allowed(c: char, allow_placeholders: bool) -> bool {
    base_allowed(c, allow_placeholders) || matches!(c, '.' | '+' | '^' | ' ')
}

/// Check one tag's characters. The first node of the path is held to the
/// stricter set used by vocabulary names; what follows may be free text.
/// Positions listed in `already` were reported by check_string() and are
/// not reported again.
pub fn check_tag_characters(tag: &Tag, allow_placeholders: bool, already: &[usize]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let subject = Subject::new(&tag.text, tag.span.start);
    let seen = |i: usize| already.contains(&(tag.span.start + i));

    // namespace prefix, less its colon
    let namespace = &tag.namespace;
    if namespace.len() > 1 {
        for (i, c) in namespace[..namespace.len() - 1].char_indices() {
            if !c.is_ascii_alphabetic() && !seen(i) {
                issues.push(Issue::for_tag_span(
                    ErrorCode::NamespacePrefixInvalid,
                    subject,
                    i,
                    i + c.len_utf8(),
                    json!({ "character": c, "prefix": namespace }),
                ));
            }
        }
    }

    let offset = tag.path_offset();
    let path = tag.path();
    for found in regex!(r"/\s*/|^/|/$").find_iter(path) {
        issues.push(Issue::for_tag_span(
            ErrorCode::NodeNameEmpty,
            subject,
            offset + found.start(),
            offset + found.end(),
            serde_json::Value::Null,
        ));
    }

    let base_end = offset
        + path
            .find('/')
            .unwrap_or(path.len());
    for (i, c) in tag.text[offset..].char_indices() {
        let i = i + offset;
        if seen(i) {
            continue;
        }
        let allowed = if i < base_end {
            base_allowed(c, allow_placeholders)
        } else {
            extension_allowed(c, allow_placeholders)
        };
        if !allowed {
            issues.push(Issue::for_tag_span(
                ErrorCode::InvalidTagCharacter,
                subject,
                i,
                i + c.len_utf8(),
                json!({ "character": c }),
            ));
        }
    }

    issues
}
