use std::collections::{BTreeMap, HashMap};

use super::codes::Severity;
use super::context::{Context, ContextType};
use super::issue::Issue;
use crate::rendering::{Render, Syntax};

/// Where error codes are documented, for hyperlinks in HTML output.
pub const DOCUMENTATION_URL: &str = "https://www.hed-resources.org/en/latest/HED_errors.html";

/// Keep at most `count` issues of each code (per file, if `by_file`),
/// returning the kept issues along with the true total for every code.
pub fn filter_issues_by_count(
    issues: &[Issue],
    count: usize,
    by_file: bool,
) -> (Vec<Issue>, BTreeMap<String, usize>) {
    let mut seen: HashMap<(Option<String>, &str), usize> = HashMap::new();
    let mut totals: BTreeMap<String, usize> = BTreeMap::new();
    let mut kept = Vec::new();

    for issue in issues {
        *totals
            .entry(
                issue
                    .code
                    .clone(),
            )
            .or_insert(0) += 1;

        let file = if by_file {
            issue
                .context
                .iter()
                .find(|(kind, _)| *kind == ContextType::FileName)
                .map(|(_, value)| value.to_string())
        } else {
            None
        };

        let n = seen
            .entry((file, issue.code.as_str()))
            .or_insert(0);
        if *n < count {
            kept.push(issue.clone());
        }
        *n += 1;
    }

    (kept, totals)
}

fn visible_context(issue: &Issue, skip_filename: bool) -> Vec<&Context> {
    issue
        .context
        .iter()
        .filter(|(kind, _)| !(skip_filename && *kind == ContextType::FileName))
        .collect()
}

fn common_prefix(one: &[&Context], two: &[&Context]) -> usize {
    one.iter()
        .zip(two.iter())
        .take_while(|(a, b)| a == b)
        .count()
}

fn code_syntax(issue: &Issue) -> Syntax {
    match issue.severity {
        Severity::Error => Syntax::ErrorCode,
        Severity::Warning => Syntax::WarningCode,
    }
}

fn location(index: usize) -> String {
    format!("[char {}]", index)
}

/// Lay the issues out as indented text, nesting each issue under the
/// contexts (file, row, column, string) it was found in, with the character
/// offset where one is known. Consecutive issues sharing a context only
/// print its heading once.
pub fn printable_issues(
    issues: &[Issue],
    title: Option<&str>,
    skip_filename: bool,
    renderer: &impl Render,
) -> String {
    let mut output = String::new();
    let mut last: Vec<&Context> = Vec::new();

    for issue in issues {
        let context = visible_context(issue, skip_filename);
        let start = common_prefix(&last, &context);

        for (depth, (kind, value)) in context
            .iter()
            .enumerate()
            .skip(start)
        {
            output.push_str(&"\t".repeat(depth));
            output.push_str(&renderer.style(Syntax::Context, &kind.heading(value)));
            output.push('\n');
        }

        let tabs = "\t".repeat(context.len());
        let message = issue
            .message
            .replace('\n', &format!("\n{}", tabs));

        output.push_str(&tabs);
        output.push_str(&renderer.style(code_syntax(issue), &issue.code));
        output.push_str(": ");
        output.push_str(&renderer.style(Syntax::Message, &message));
        if let Some(index) = issue.char_index {
            output.push(' ');
            output.push_str(&renderer.style(Syntax::Context, &location(index)));
        }
        output.push('\n');

        last = context;
    }

    if !output.is_empty() {
        output.push('\n');
    }
    if let Some(title) = title {
        output = format!("{}\n{}", renderer.style(Syntax::Heading, title), output);
    }

    output
}

fn escape(text: &str) -> String {
    let mut output = String::new();
    tinytemplate::escape(text, &mut output);
    output
}

/// Anchor used by the error documentation for a code.
pub fn documentation_anchor(code: &str) -> String {
    code.to_lowercase()
        .replace('_', "-")
}

/// The same nesting as printable_issues(), as HTML lists. When `link_base`
/// is given each code links to its documentation.
pub fn html_issues(
    issues: &[Issue],
    title: Option<&str>,
    skip_filename: bool,
    link_base: Option<&str>,
) -> String {
    let mut output = String::new();
    if let Some(title) = title {
        output.push_str(&format!("<h3>{}</h3>\n", escape(title)));
    }
    output.push_str("<ul>\n");

    let mut last: Vec<&Context> = Vec::new();
    for issue in issues {
        let context = visible_context(issue, skip_filename);
        let start = common_prefix(&last, &context);

        for _ in start..last.len() {
            output.push_str("</ul>\n");
        }
        for (kind, value) in context
            .iter()
            .skip(start)
        {
            output.push_str(&format!("<li>{}</li>\n<ul>\n", escape(&kind.heading(value))));
        }

        let code = match link_base {
            Some(base) => format!(
                "<a href=\"{}#{}\">{}</a>",
                base,
                documentation_anchor(&issue.code),
                escape(&issue.code)
            ),
            None => escape(&issue.code),
        };
        let place = match issue.char_index {
            Some(index) => format!(" {}", location(index)),
            None => String::new(),
        };
        output.push_str(&format!(
            "<li>{}: {}{}</li>\n",
            code,
            escape(&issue.message).replace('\n', "<br/>"),
            place
        ));

        last = context;
    }

    for _ in 0..last.len() {
        output.push_str("</ul>\n");
    }
    output.push_str("</ul>\n");
    output
}
