//! A parsed HED string. Tags and groups live in flat arenas owned by the
//! string and refer to each other by index.

use std::fmt;

use super::definitions::DefDict;
use super::types::{Group, GroupId, Node, Span, Tag, TagId};
use crate::problem::Subject;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HedString {
    source: String,
    tags: Vec<Tag>,
    groups: Vec<Group>,
    frozen: bool,
}

impl HedString {
    pub const ROOT: GroupId = GroupId(0);

    /// An empty tree over the given text; the tokenizer fills it in.
    pub fn new(source: &str) -> HedString {
        HedString {
            source: source.to_string(),
            tags: Vec::new(),
            groups: vec![Group::new(Span::new(0, source.len()), None)],
            frozen: false,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.0]
    }

    pub(crate) fn tag_mut(&mut self, id: TagId) -> &mut Tag {
        &mut self.tags[id.0]
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub fn root(&self) -> &Group {
        &self.groups[0]
    }

    pub fn tag_count(&self) -> usize {
        self.tags
            .len()
    }

    pub fn group_count(&self) -> usize {
        self.groups
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags
            .is_empty()
            && self.groups.len() == 1
    }

    /// Every tag, in the order it appears in the text.
    pub fn tags(&self) -> impl Iterator<Item = (TagId, &Tag)> {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, tag)| (TagId(i), tag))
    }

    pub fn tag_ids(&self) -> impl Iterator<Item = TagId> {
        (0..self.tags.len()).map(TagId)
    }

    /// Every group other than the root, in order of their opening
    /// parenthesis.
    pub fn group_ids(&self) -> impl Iterator<Item = GroupId> {
        (1..self.groups.len()).map(GroupId)
    }

    pub(crate) fn add_tag(&mut self, parent: GroupId, text: &str, span: Span) -> TagId {
        let id = TagId(
            self.tags
                .len(),
        );
        self.tags
            .push(Tag {
                text: text.to_string(),
                span,
                namespace: namespace_of(text).to_string(),
                canonical: None,
                parent,
            });
        self.groups[parent.0]
            .children
            .push(Node::Tag(id));
        id
    }

    pub(crate) fn add_group(&mut self, parent: GroupId, start: usize) -> GroupId {
        let id = GroupId(
            self.groups
                .len(),
        );
        self.groups
            .push(Group::new(Span::new(start, start), Some(parent)));
        self.groups[parent.0]
            .children
            .push(Node::Group(id));
        id
    }

    pub(crate) fn close_group(&mut self, id: GroupId, end: usize) {
        self.groups[id.0]
            .span
            .end = end;
    }

    /// Flag top level groups holding a Definition tag. Done structurally so
    /// it is known before (and without) a schema.
    pub(crate) fn mark_definitions(&mut self) {
        for id in self.top_level_groups() {
            let found = self
                .direct_tags(id)
                .iter()
                .any(|tag| {
                    self.tag(*tag)
                        .mentions("Definition")
                });
            self.groups[id.0].is_definition = found;
        }
    }

    pub fn children(&self, id: GroupId) -> &[Node] {
        &self.groups[id.0].children
    }

    pub fn direct_tags(&self, id: GroupId) -> Vec<TagId> {
        self.children(id)
            .iter()
            .filter_map(|node| match node {
                Node::Tag(tag) => Some(*tag),
                Node::Group(_) => None,
            })
            .collect()
    }

    pub fn direct_groups(&self, id: GroupId) -> Vec<GroupId> {
        self.children(id)
            .iter()
            .filter_map(|node| match node {
                Node::Group(group) => Some(*group),
                Node::Tag(_) => None,
            })
            .collect()
    }

    pub fn top_level_tags(&self) -> Vec<TagId> {
        self.direct_tags(HedString::ROOT)
    }

    pub fn top_level_groups(&self) -> Vec<GroupId> {
        self.direct_groups(HedString::ROOT)
    }

    pub fn is_top_level(&self, id: GroupId) -> bool {
        self.group(id)
            .parent
            == Some(HedString::ROOT)
    }

    /// The top level group containing this group, if it is not the root.
    pub fn top_level_ancestor(&self, id: GroupId) -> Option<GroupId> {
        let mut current = id;
        loop {
            match self
                .group(current)
                .parent
            {
                None => return None,
                Some(HedString::ROOT) => return Some(current),
                Some(parent) => current = parent,
            }
        }
    }

    /// Whether the tag sits anywhere inside a Definition group.
    pub fn in_definition(&self, id: TagId) -> bool {
        let parent = self
            .tag(id)
            .parent;
        match self.top_level_ancestor(parent) {
            Some(top) => {
                self.group(top)
                    .is_definition
            }
            None => false,
        }
    }

    /// Maximum nesting of parentheses.
    pub fn depth(&self) -> usize {
        self.group_ids()
            .map(|id| {
                let mut depth = 0;
                let mut current = Some(id);
                while let Some(group) = current {
                    if group == HedString::ROOT {
                        break;
                    }
                    depth += 1;
                    current = self
                        .group(group)
                        .parent;
                }
                depth
            })
            .max()
            .unwrap_or(0)
    }

    /// Every tag beneath a group, depth first in text order.
    pub fn descendant_tags(&self, id: GroupId) -> Vec<TagId> {
        let mut result = Vec::new();
        self.collect_tags(id, &mut result);
        result
    }

    fn collect_tags(&self, id: GroupId, result: &mut Vec<TagId>) {
        for node in self.children(id) {
            match node {
                Node::Tag(tag) => result.push(*tag),
                Node::Group(group) => self.collect_tags(*group, result),
            }
        }
    }

    /// For each top level group, the first direct tag that is one of the
    /// given anchor names.
    pub fn find_top_level_tags(&self, anchors: &[&str]) -> Vec<(TagId, GroupId)> {
        let mut result = Vec::new();
        for group in self.top_level_groups() {
            let found = self
                .direct_tags(group)
                .into_iter()
                .find(|tag| {
                    anchors
                        .iter()
                        .any(|anchor| {
                            self.tag(*tag)
                                .is(anchor)
                        })
                });
            if let Some(tag) = found {
                result.push((tag, group));
            }
        }
        result
    }

    /// Groups anywhere in the tree directly containing a tag of the given
    /// name, with that tag.
    pub fn find_groups_with(&self, name: &str) -> Vec<(TagId, GroupId)> {
        let mut result = Vec::new();
        for group in self.group_ids() {
            let found = self
                .direct_tags(group)
                .into_iter()
                .find(|tag| {
                    self.tag(*tag)
                        .is(name)
                });
            if let Some(tag) = found {
                result.push((tag, group));
            }
        }
        result
    }

    /// Verbatim text of a group, parentheses included.
    pub fn group_text(&self, id: GroupId) -> &str {
        self.group(id)
            .span
            .slice(&self.source)
    }

    pub fn tag_subject(&self, id: TagId) -> Subject<'_> {
        let tag = self.tag(id);
        Subject::new(&tag.text, tag.span.start)
    }

    pub fn group_subject(&self, id: GroupId) -> Subject<'_> {
        Subject::new(
            self.group_text(id),
            self.group(id)
                .span
                .start,
        )
    }

    /// Order independent key for a group's contents, used to compare
    /// groups regardless of how their members were written.
    pub fn group_key(&self, id: GroupId) -> String {
        let mut keys: Vec<String> = self
            .children(id)
            .iter()
            .map(|node| match node {
                Node::Tag(tag) => self
                    .tag(*tag)
                    .comparison_key(),
                Node::Group(group) => format!("({})", self.group_key(*group)),
            })
            .collect();
        keys.sort();
        keys.join(",")
    }

    /// Copy a group out as a string of its own, so it can outlive this one.
    /// The new string's root holds the group as its only child.
    pub fn extract_group(&self, id: GroupId) -> HedString {
        let span = self
            .group(id)
            .span;
        let mut result = HedString::new(span.slice(&self.source));
        self.copy_into(&mut result, id, HedString::ROOT, span.start);
        result
    }

    fn copy_into(&self, target: &mut HedString, id: GroupId, parent: GroupId, delta: usize) {
        let original = self.group(id);
        let group = target.add_group(parent, original.span.start - delta);
        target.close_group(group, original.span.end - delta);

        for node in &original.children {
            match node {
                Node::Tag(tag) => {
                    let source = self.tag(*tag);
                    let copy = target.add_tag(
                        group,
                        &source.text,
                        Span::new(source.span.start - delta, source.span.end - delta),
                    );
                    target
                        .tag_mut(copy)
                        .canonical = source
                        .canonical
                        .clone();
                }
                Node::Group(child) => self.copy_into(target, *child, group, delta),
            }
        }
    }

    /// Definition bodies are frozen once stored; expansion works on copies.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub(crate) fn thaw(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Substitute a value for every `#` placeholder.
    pub fn replace_placeholder(&mut self, value: &str) {
        if self.frozen {
            panic!("Attempted to substitute into a frozen string: {}", self.source);
        }
        for tag in self
            .tags
            .iter_mut()
        {
            if !tag
                .text
                .contains('#')
            {
                continue;
            }
            tag.text = tag
                .text
                .replace('#', value);
            if let Some(canonical) = tag
                .canonical
                .as_mut()
            {
                canonical.long_form = canonical
                    .long_form
                    .replace('#', value);
                canonical.short_form = canonical
                    .short_form
                    .replace('#', value);
                canonical.extension = canonical
                    .extension
                    .replace('#', value);
            }
        }
    }

    fn render<F, G>(&self, id: GroupId, tag_text: &F, group_text: &G, output: &mut String)
    where
        F: Fn(&Tag) -> String,
        G: Fn(GroupId) -> Option<String>,
    {
        if id != HedString::ROOT {
            if let Some(replacement) = group_text(id) {
                output.push_str(&replacement);
                return;
            }
            output.push('(');
        }
        for (i, node) in self
            .children(id)
            .iter()
            .enumerate()
        {
            if i > 0 {
                output.push(',');
            }
            match node {
                Node::Tag(tag) => output.push_str(&tag_text(self.tag(*tag))),
                Node::Group(group) => self.render(*group, tag_text, group_text, output),
            }
        }
        if id != HedString::ROOT {
            output.push(')');
        }
    }

    fn rewrite<F>(&self, replacement: F) -> String
    where
        F: Fn(&Tag) -> Option<String>,
    {
        let mut output = String::new();
        let mut last = 0;
        for tag in &self.tags {
            output.push_str(&self.source[last..tag.span.start]);
            match replacement(tag) {
                Some(text) => output.push_str(&text),
                None => output.push_str(&tag.text),
            }
            last = tag.span.end;
        }
        output.push_str(&self.source[last..]);
        output
    }

    /// The string with every resolved tag in long form. Delimiters and
    /// spacing are kept as written.
    pub fn long_form_text(&self) -> String {
        self.rewrite(|tag| {
            tag.long_form()
                .map(|form| format!("{}{}", tag.namespace, form))
        })
    }

    pub fn short_form_text(&self) -> String {
        self.rewrite(|tag| {
            tag.short_form()
                .map(|form| format!("{}{}", tag.namespace, form))
        })
    }

    /// The string with each Def tag replaced by a Def-expand group holding
    /// the definition's contents. Defs that cannot be expanded are left
    /// alone.
    pub fn expanded_text(&self, definitions: &DefDict) -> String {
        let mut output = String::new();
        self.render(
            HedString::ROOT,
            &|tag: &Tag| {
                if !tag.is("Def") {
                    return tag
                        .text
                        .clone();
                }
                let reference = tag.extension();
                match definitions.expand(reference) {
                    Ok(Some(body)) => format!("(Def-expand/{},{})", reference, body),
                    Ok(None) => format!("(Def-expand/{})", reference),
                    Err(_) => tag
                        .text
                        .clone(),
                }
            },
            &|_| None,
            &mut output,
        );
        output
    }

    /// The reverse of expanded_text(): each Def-expand group collapses back
    /// to a Def tag.
    pub fn shrunk_text(&self) -> String {
        let mut output = String::new();
        self.render(
            HedString::ROOT,
            &|tag: &Tag| {
                tag.text
                    .clone()
            },
            &|group| {
                self.direct_tags(group)
                    .into_iter()
                    .find(|tag| {
                        self.tag(*tag)
                            .is("Def-expand")
                    })
                    .map(|tag| format!("Def/{}", self.tag(tag).extension()))
            },
            &mut output,
        );
        output
    }
}

impl fmt::Display for HedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = String::new();
        self.render(
            HedString::ROOT,
            &|tag: &Tag| {
                tag.text
                    .clone()
            },
            &|_| None,
            &mut output,
        );
        f.write_str(&output)
    }
}

/// Library prefix of a tag: the text up to and including a colon, provided
/// the colon comes before any slash.
pub fn namespace_of(text: &str) -> &str {
    let colon = match text.find(':') {
        Some(i) => i,
        None => return "",
    };
    match text.find('/') {
        Some(slash) if slash < colon => "",
        _ => &text[..=colon],
    }
}
