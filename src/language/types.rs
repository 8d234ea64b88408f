//! Types representing a parsed HED string: tags, groups, and the spans
//! locating them in the text they came from.

/// Byte offsets into the source string, half open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn shifted(&self, delta: usize) -> Span {
        Span::new(self.start + delta, self.end + delta)
    }

    /// The text this span covers. Spans are only ever built on character
    /// boundaries of the string they index, so `source` must be that string.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// Index of a tag within its owning HedString.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagId(pub usize);

/// Index of a group within its owning HedString. The whole string is the
/// root group, always at index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub usize);

/// A child of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Tag(TagId),
    Group(GroupId),
}

/// The forms of a tag once it has been resolved against a schema (or, in
/// the absence of one, recognized as one of the structural key tags).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Canonical {
    /// Full path from the root of the vocabulary, including any extension
    /// or value.
    pub long_form: String,
    /// Shortest unambiguous form: the deepest schema node name followed by
    /// any extension or value.
    pub short_form: String,
    /// The long form without its extension or value.
    pub base_tag: String,
    /// Whatever followed the deepest schema node; empty if nothing did.
    pub extension: String,
    /// Schema node the tag resolved to.
    pub entry: Option<usize>,
    /// The `#` child of that node, when the extension is a value for it.
    pub value_entry: Option<usize>,
}

impl Canonical {
    /// Last segment of the base tag, eg "Onset" for
    /// "Property/Data-property/Data-marker/Temporal-marker/Onset".
    pub fn short_base(&self) -> &str {
        match self
            .base_tag
            .rfind('/')
        {
            Some(i) => &self.base_tag[i + 1..],
            None => &self.base_tag,
        }
    }

    pub fn takes_value(&self) -> bool {
        self.value_entry
            .is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Current text of the tag. Matches the source span unless a placeholder
    /// was substituted.
    pub text: String,
    pub span: Span,
    /// Library prefix including its trailing colon, eg "tl:", or empty.
    pub namespace: String,
    pub canonical: Option<Canonical>,
    pub parent: GroupId,
}

impl Tag {
    /// The text without its namespace prefix.
    pub fn path(&self) -> &str {
        &self.text[self
            .namespace
            .len()..]
    }

    /// Offset within `text` where the path begins.
    pub fn path_offset(&self) -> usize {
        self.namespace
            .len()
    }

    /// Whether this tag resolved to the named node, compared
    /// case-insensitively on the short base name.
    pub fn is(&self, name: &str) -> bool {
        match &self.canonical {
            Some(canonical) => canonical
                .short_base()
                .eq_ignore_ascii_case(name),
            None => false,
        }
    }

    /// Whether any node of the path is the given name, regardless of
    /// resolution. Used before a schema has been consulted.
    pub fn mentions(&self, name: &str) -> bool {
        self.path()
            .split('/')
            .any(|term| {
                term.trim()
                    .eq_ignore_ascii_case(name)
            })
    }

    /// The extension or value portion, empty if unresolved.
    pub fn extension(&self) -> &str {
        match &self.canonical {
            Some(canonical) => &canonical.extension,
            None => "",
        }
    }

    pub fn long_form(&self) -> Option<&str> {
        self.canonical
            .as_ref()
            .map(|canonical| canonical.long_form.as_str())
    }

    pub fn short_form(&self) -> Option<&str> {
        self.canonical
            .as_ref()
            .map(|canonical| canonical.short_form.as_str())
    }

    /// Key used when comparing tags for equality within a group: the long
    /// form when known, lower cased.
    pub fn comparison_key(&self) -> String {
        let text = match &self.canonical {
            Some(canonical) => format!("{}{}", self.namespace, canonical.long_form),
            None => self
                .text
                .clone(),
        };
        text.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Includes the enclosing parentheses; for the root, the whole string.
    pub span: Span,
    pub children: Vec<Node>,
    pub parent: Option<GroupId>,
    /// Set on top level groups carrying a Definition tag.
    pub is_definition: bool,
}

impl Group {
    pub(crate) fn new(span: Span, parent: Option<GroupId>) -> Group {
        Group {
            span,
            children: Vec::new(),
            parent,
            is_definition: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children
            .is_empty()
    }
}
