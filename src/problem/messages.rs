use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use tinytemplate::TinyTemplate;
use tracing::warn;

use super::codes::{public, ErrorCode, Severity};

/// Which arguments a message builder is called with. A builder registered
/// for a tag must always be given one, and one registered with a sub-span
/// must always be given the offsets within that tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Plain,
    Tag,
    TagSpan,
}

#[derive(Debug)]
pub struct Entry {
    pub code: ErrorCode,
    pub actual: &'static str,
    pub severity: Severity,
    pub shape: Shape,
    pub template: &'static str,
}

const fn entry(
    code: ErrorCode,
    actual: &'static str,
    severity: Severity,
    shape: Shape,
    template: &'static str,
) -> Entry {
    Entry {
        code,
        actual,
        severity,
        shape,
        template,
    }
}

use ErrorCode::*;
use Severity::*;
use Shape::*;

// Templates are TinyTemplate syntax; every `{name}` must be supplied by
// the caller, except `tag` which is filled in for tag-shaped builders.
static CATALOG: &[Entry] = &[
    entry(
        ParenthesesMismatch,
        "PARENTHESES_MISMATCH",
        Error,
        Plain,
        "Number of opening and closing parentheses are unequal. {opening} opening parentheses. {closing} closing parentheses.",
    ),
    entry(
        TagEmpty,
        "TAG_EMPTY",
        Error,
        Plain,
        "HED tags cannot be empty. Extra delimiter '{character}' at index {index}.",
    ),
    entry(
        CommaMissing,
        "COMMA_MISSING",
        Error,
        Tag,
        "Comma missing after - '{tag}'",
    ),
    entry(
        GroupEmpty,
        public::TAG_GROUP_ERROR,
        Error,
        Tag,
        "Empty group found: '{tag}'",
    ),
    entry(
        CharacterInvalid,
        public::CHARACTER_INVALID,
        Error,
        Plain,
        "Invalid character '{character}' at index {index}.",
    ),
    entry(
        TildesUnsupported,
        "TILDES_UNSUPPORTED",
        Error,
        Plain,
        "Tildes are not supported. Replace (a ~ b ~ c) with (a, (b, c)). '{character}' at index {index}.",
    ),
    entry(
        InvalidTagCharacter,
        public::CHARACTER_INVALID,
        Error,
        TagSpan,
        "Invalid character '{character}' in tag '{tag}'.",
    ),
    entry(
        NamespacePrefixInvalid,
        "TAG_NAMESPACE_PREFIX_INVALID",
        Error,
        TagSpan,
        "Namespace prefixes can only contain letters. Found '{character}' in prefix '{prefix}'.",
    ),
    entry(
        NodeNameEmpty,
        "NODE_NAME_EMPTY",
        Error,
        TagSpan,
        "Tag has an empty node name (double, leading, or trailing slash) - '{tag}'",
    ),
    entry(
        NoValidTagFound,
        public::TAG_INVALID,
        Error,
        TagSpan,
        "'{term}' in '{tag}' is not a valid base HED tag.",
    ),
    entry(
        InvalidParentNode,
        public::TAG_INVALID,
        Error,
        TagSpan,
        "In '{tag}', '{term}' appears as '{expected}' and cannot be used as an extension.",
    ),
    entry(
        TagExtensionInvalid,
        "TAG_EXTENSION_INVALID",
        Error,
        Tag,
        "Invalid extension on tag - '{tag}'",
    ),
    entry(
        LibraryUnmatched,
        "TAG_NAMESPACE_PREFIX_INVALID",
        Error,
        TagSpan,
        "Tag '{tag}' is given a prefix '{prefix}' which is not defined. Valid prefixes are: {prefixes}",
    ),
    entry(
        TagExtended,
        "TAG_EXTENDED",
        Warning,
        TagSpan,
        "Tag extension found - '{tag}'",
    ),
    entry(
        TagRequiresChild,
        "TAG_REQUIRES_CHILD",
        Error,
        Tag,
        "Descendant tag required - '{tag}'",
    ),
    entry(
        UnitsInvalid,
        "UNITS_INVALID",
        Error,
        Tag,
        "Invalid units - '{tag}' valid units are '{units}'",
    ),
    entry(
        UnitsMissing,
        "UNITS_MISSING",
        Warning,
        Tag,
        "No unit specified. Using '{unit}' as the default - '{tag}'",
    ),
    entry(
        ValueInvalid,
        "VALUE_INVALID",
        Error,
        Tag,
        "'{tag}' has an invalid value portion.",
    ),
    entry(
        PlaceholderInvalid,
        "PLACEHOLDER_INVALID",
        Error,
        Tag,
        "Invalid placeholder in tag '{tag}': {problem}",
    ),
    entry(
        ElementDeprecated,
        "ELEMENT_DEPRECATED",
        Warning,
        Tag,
        "Tag '{tag}' is deprecated as of schema version {version}.",
    ),
    entry(
        TagRepeated,
        public::TAG_EXPRESSION_REPEATED,
        Error,
        Tag,
        "Repeated tag - '{tag}'",
    ),
    entry(
        TagRepeatedGroup,
        public::TAG_EXPRESSION_REPEATED,
        Error,
        Tag,
        "Repeated group - '{tag}'",
    ),
    entry(
        TagGroupTag,
        public::TAG_GROUP_ERROR,
        Error,
        Tag,
        "'{tag}' tag must be in a tag group (parentheses).",
    ),
    entry(
        TopLevelTag,
        public::TAG_GROUP_ERROR,
        Error,
        Tag,
        "A tag that must be in a top level group was found in another location. {tag}",
    ),
    entry(
        MultipleTopTags,
        public::TAG_GROUP_ERROR,
        Error,
        Tag,
        "Multiple top level tags found in a single group. First one found: {tag}. Remainder: {others}",
    ),
    entry(
        TagsNotAllowed,
        public::TAG_GROUP_ERROR,
        Error,
        Tag,
        "'{tag}' cannot be in a group with: {others}",
    ),
    entry(
        ReservedTagGroupError,
        public::TAG_GROUP_ERROR,
        Error,
        Tag,
        "'{tag}' must be in a group with between {minimum} and {maximum} non-Def subgroups, found {found}.",
    ),
    entry(
        RequiredTagMissing,
        "REQUIRED_TAG_MISSING",
        Error,
        Plain,
        "Tag with prefix '{namespace}' is required.",
    ),
    entry(
        TagNotUnique,
        "TAG_NOT_UNIQUE",
        Error,
        Plain,
        "Multiple unique tags with prefix - '{namespace}'",
    ),
    entry(
        OnsetNoDefTagFound,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "'{tag}' tag has no Def or Def-expand tag in its group.",
    ),
    entry(
        OnsetTooManyDefs,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "Too many Def tags found in group for '{tag}'. Expected 1, also found: {others}",
    ),
    entry(
        OnsetWrongNumberGroups,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "'{tag}' group may have between {minimum} and {maximum} content groups besides its Def, found {found}: {others}",
    ),
    entry(
        OnsetTagOutsideOfGroup,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "'{tag}' group has improper sibling tags {others}. All temporal context tags must be in a single group together.",
    ),
    entry(
        OnsetPlaceholderWrong,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "Def tag '{tag}' in a temporal group {problem}",
    ),
    entry(
        OnsetSameDefsOneRow,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "'{tag}' opens the same definition more than once in one row.",
    ),
    entry(
        OffsetBeforeOnset,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "Offset tag '{tag}' does not have a matching onset.",
    ),
    entry(
        InsetBeforeOnset,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "Inset tag '{tag}' does not have a matching onset.",
    ),
    entry(
        DurationWrongNumberGroups,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "'{tag}' must have exactly one content group, found {found}: {others}",
    ),
    entry(
        DurationHasOtherTags,
        public::TEMPORAL_TAG_ERROR,
        Error,
        Tag,
        "'{tag}' must not have other tags in its group, found: {others}",
    ),
    entry(
        DefTagInDefinition,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Invalid tag {tag} found in definition for {name}. Def, Def-expand, and Definition tags cannot be in definitions.",
    ),
    entry(
        WrongNumberGroupTags,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Too many group tags found in definition for {name}. Expected 1, found: {others}",
    ),
    entry(
        WrongNumberTags,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Too many tags found in definition for {name}. Expected 1, found: {others}",
    ),
    entry(
        WrongNumberPlaceholderTags,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Incorrect number of placeholders found in definition for {name}. Expected {expected}, found: {others}",
    ),
    entry(
        DuplicateDefinition,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Duplicate definition found for '{name}'.",
    ),
    entry(
        InvalidDefinitionExtension,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Invalid extension on Definition tag '{tag}' for '{name}'.",
    ),
    entry(
        BadPropInDefinition,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Tag '{tag}' in definition '{name}' has the unique or required attribute.",
    ),
    entry(
        BadDefinitionLocation,
        public::DEFINITION_INVALID,
        Error,
        Tag,
        "Definition '{tag}' found where definitions are not allowed.",
    ),
    entry(
        DefUnmatched,
        public::DEF_INVALID,
        Error,
        Tag,
        "A Def tag cannot be matched to a definition. Tag: '{tag}'",
    ),
    entry(
        DefValueMissing,
        public::DEF_INVALID,
        Error,
        Tag,
        "A Def tag requires a placeholder value, but was not given one. Tag: '{tag}'",
    ),
    entry(
        DefValueExtra,
        public::DEF_INVALID,
        Error,
        Tag,
        "A Def tag does not take a placeholder value, but was given one. Tag: '{tag}'",
    ),
    entry(
        DefValueInvalid,
        public::DEF_INVALID,
        Error,
        Tag,
        "A Def tag has an invalid placeholder value. Tag: '{tag}'",
    ),
    entry(
        DefExpandUnmatched,
        public::DEF_EXPAND_INVALID,
        Error,
        Tag,
        "A Def-expand tag cannot be matched to a definition. Tag: '{tag}'",
    ),
    entry(
        DefExpandValueMissing,
        public::DEF_EXPAND_INVALID,
        Error,
        Tag,
        "A Def-expand tag requires a placeholder value, but was not given one. Tag: '{tag}'",
    ),
    entry(
        DefExpandValueExtra,
        public::DEF_EXPAND_INVALID,
        Error,
        Tag,
        "A Def-expand tag does not take a placeholder value, but was given one. Tag: '{tag}'",
    ),
    entry(
        DefExpandValueInvalid,
        public::DEF_EXPAND_INVALID,
        Error,
        Tag,
        "A Def-expand tag has an invalid placeholder value. Tag: '{tag}'",
    ),
    entry(
        DefExpandInvalid,
        public::DEF_EXPAND_INVALID,
        Error,
        Tag,
        "A Def-expand tag does not match the expected definition. Tag: '{tag}'. Actual: '{actual}'. Expected: '{expected}'",
    ),
];

/// Lookup from error code to its catalog entry. Built once, read-only
/// afterwards.
pub struct Registry {
    entries: HashMap<ErrorCode, &'static Entry>,
    by_name: HashMap<&'static str, ErrorCode>,
}

impl Registry {
    fn build(catalog: &'static [Entry]) -> Registry {
        let mut registry = Registry {
            entries: HashMap::new(),
            by_name: HashMap::new(),
        };
        for entry in catalog {
            registry.register(entry);
        }
        registry
    }

    fn register(&mut self, entry: &'static Entry) {
        if self
            .entries
            .insert(entry.code, entry)
            .is_some()
        {
            panic!("Error code {} registered twice", entry.code);
        }
        self.by_name
            .insert(
                entry
                    .code
                    .as_str(),
                entry.code,
            );
    }

    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| Registry::build(CATALOG))
    }

    /// Every code has an entry; a missing one means the catalog above is
    /// out of step with the ErrorCode enum.
    pub fn lookup(&self, code: ErrorCode) -> &'static Entry {
        match self
            .entries
            .get(&code)
        {
            Some(entry) => entry,
            None => panic!("Error code {} has no catalog entry", code),
        }
    }

    pub fn find(&self, name: &str) -> Option<ErrorCode> {
        self.by_name
            .get(name)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries
            .len()
    }
}

thread_local! {
    // TinyTemplate keeps boxed formatters that are not Sync, so each thread
    // compiles its own copy of the (static) templates.
    static TEMPLATES: TinyTemplate<'static> = compile_templates();
}

fn compile_templates() -> TinyTemplate<'static> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    for entry in CATALOG {
        if let Err(error) = tt.add_template(
            entry
                .code
                .as_str(),
            entry.template,
        ) {
            panic!("Template for {} does not compile: {}", entry.code, error);
        }
    }
    tt
}

/// Render the message for an error code from its template.
pub fn render_message(code: ErrorCode, params: &Value) -> String {
    TEMPLATES.with(|tt| {
        tt.render(code.as_str(), params)
            .unwrap_or_else(|error| {
                warn!("Unable to render message for {}: {}", code, error);
                Registry::global()
                    .lookup(code)
                    .template
                    .to_string()
            })
    })
}
