//! Tokenizer turning a HED string into its tree of tags and groups.

use serde_json::json;
use tracing::debug;

use crate::language::{GroupId, HedString, Span};
use crate::problem::{ErrorCode, Issue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsingError {
    DanglingClose(usize),
    Unclosed(usize),
}

impl ParsingError {
    fn offset(&self) -> usize {
        match self {
            ParsingError::DanglingClose(offset) => *offset,
            ParsingError::Unclosed(offset) => *offset,
        }
    }
}

/// Build the tree for a string. If the parentheses do not balance the tree
/// returned is empty and the single issue describes the mismatch.
pub fn parse(content: &str) -> (HedString, Vec<Issue>) {
    let mut input = Parser::new();
    input.initialize(content);

    match input.read_tree() {
        Ok(mut hed) => {
            hed.mark_definitions();
            debug!(
                "Found {} tag{} in {} group{}",
                hed.tag_count(),
                if hed.tag_count() == 1 { "" } else { "s" },
                hed.group_count() - 1,
                if hed.group_count() == 2 { "" } else { "s" }
            );
            (hed, Vec::new())
        }
        Err(error) => {
            debug!(?error);
            (HedString::new(content), vec![mismatch(content, error)])
        }
    }
}

fn mismatch(content: &str, error: ParsingError) -> Issue {
    let opening = content
        .chars()
        .filter(|c| *c == '(')
        .count();
    let closing = content
        .chars()
        .filter(|c| *c == ')')
        .count();
    let mut issue = Issue::new(
        ErrorCode::ParenthesesMismatch,
        json!({ "opening": opening, "closing": closing }),
    );
    issue.char_index = Some(error.offset());
    issue
}

#[derive(Debug)]
struct Parser<'i> {
    original: &'i str,
    source: &'i str,
    offset: usize,
}

impl<'i> Parser<'i> {
    fn new() -> Parser<'i> {
        Parser {
            original: "",
            source: "",
            offset: 0,
        }
    }

    fn initialize(&mut self, content: &'i str) {
        self.original = content;
        self.source = content;
        self.offset = 0;
    }

    fn advance(&mut self, width: usize) {
        // advance the parser position
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn entire(&self) -> &'i str {
        self.source
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    fn trim_whitespace(&mut self) {
        let content = self.entire();
        let trimmed = content.trim_start();
        self.advance(content.len() - trimmed.len());
    }

    fn peek(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    /// Consume a tag, up to but not including the next delimiter, and
    /// return its text with trailing whitespace removed.
    fn take_tag(&mut self) -> (&'i str, Span) {
        let content = self.entire();
        let width = content
            .find([',', '(', ')'])
            .unwrap_or(content.len());
        let text = content[..width].trim_end();
        let span = Span::new(self.offset, self.offset + text.len());
        self.advance(width);
        (text, span)
    }

    fn read_tree(&mut self) -> Result<HedString, ParsingError> {
        let mut hed = HedString::new(self.original);
        let mut stack: Vec<GroupId> = vec![HedString::ROOT];

        loop {
            self.trim_whitespace();
            let top = match stack.last() {
                Some(top) => *top,
                None => return Err(ParsingError::DanglingClose(self.offset)),
            };

            match self.peek() {
                None => break,
                Some(',') => self.advance(1),
                Some('(') => {
                    let group = hed.add_group(top, self.offset);
                    stack.push(group);
                    self.advance(1);
                }
                Some(')') => {
                    if top == HedString::ROOT {
                        return Err(ParsingError::DanglingClose(self.offset));
                    }
                    hed.close_group(top, self.offset + 1);
                    stack.pop();
                    self.advance(1);
                }
                Some(_) => {
                    let (text, span) = self.take_tag();
                    hed.add_tag(top, text, span);
                }
            }
        }

        if stack.len() > 1 {
            let unclosed = stack[1];
            return Err(ParsingError::Unclosed(
                hed.group(unclosed)
                    .span
                    .start,
            ));
        }

        Ok(hed)
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::language::{GroupId, Node, TagId};

    #[test]
    fn flat_tags() {
        let (hed, issues) = parse("Event,  Item/Blue ball , Label/x");
        assert!(issues.is_empty());
        assert_eq!(hed.tag_count(), 3);
        assert_eq!(
            hed.tag(TagId(1))
                .text,
            "Item/Blue ball"
        );
        assert_eq!(
            hed.tag(TagId(1))
                .span,
            Span::new(8, 22)
        );
        assert_eq!(hed.depth(), 0);
    }

    #[test]
    fn nested_groups() {
        let (hed, issues) = parse("(Event, (Item, (Red))), Blue");
        assert!(issues.is_empty());
        assert_eq!(hed.depth(), 3);
        assert_eq!(
            hed.root()
                .children,
            vec![Node::Group(GroupId(1)), Node::Tag(TagId(3))]
        );
        assert_eq!(hed.group_text(GroupId(1)), "(Event, (Item, (Red)))");
        assert_eq!(hed.group_text(GroupId(3)), "(Red)");
        assert_eq!(
            hed.tag(TagId(2))
                .parent,
            GroupId(3)
        );
    }

    #[test]
    fn empty_group_is_kept() {
        let (hed, issues) = parse("Event, ()");
        assert!(issues.is_empty());
        assert!(hed
            .group(GroupId(1))
            .is_empty());
    }

    #[test]
    fn unbalanced_parentheses() {
        let (hed, issues) = parse("(Event, Item");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "PARENTHESES_MISMATCH");
        assert_eq!(
            issues[0].message,
            "Number of opening and closing parentheses are unequal. 1 opening parentheses. 0 closing parentheses."
        );
        assert!(hed.is_empty());

        let (_, issues) = parse("Event), (Item");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].char_index, Some(5));

        let (_, issues) = parse("(Event))");
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn definitions_are_marked() {
        let (hed, _) = parse("(Definition/Acc/#, (Label/#)), (Def/Acc/3, Onset)");
        assert!(
            hed.group(GroupId(1))
                .is_definition
        );
        assert!(
            !hed.group(GroupId(3))
                .is_definition
        );
        assert!(hed.in_definition(TagId(1)));
        assert!(!hed.in_definition(TagId(2)));
    }
}
