//! Error codes and severities for validation issues

use serde::{Serialize, Serializer};
use std::fmt;

/// How serious an issue is. The numeric values are part of the issue
/// dictionary contract and are what downstream consumers compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error = 1,
    Warning = 10,
}

impl Severity {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

/// Every situation the validator knows how to report. These are the
/// internal bookkeeping codes; several of them share one externally visible
/// code (see the catalog in messages.rs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCode {
    // structural
    ParenthesesMismatch,
    TagEmpty,
    CommaMissing,
    GroupEmpty,

    // characters
    CharacterInvalid,
    TildesUnsupported,
    InvalidTagCharacter,
    NamespacePrefixInvalid,
    NodeNameEmpty,

    // resolution against the schema
    NoValidTagFound,
    InvalidParentNode,
    TagExtensionInvalid,
    LibraryUnmatched,
    TagExtended,
    TagRequiresChild,
    UnitsInvalid,
    UnitsMissing,
    ValueInvalid,
    PlaceholderInvalid,
    ElementDeprecated,

    // group placement
    TagRepeated,
    TagRepeatedGroup,
    TagGroupTag,
    TopLevelTag,
    MultipleTopTags,
    TagsNotAllowed,
    ReservedTagGroupError,

    // cross-tag
    RequiredTagMissing,
    TagNotUnique,

    // temporal
    OnsetNoDefTagFound,
    OnsetTooManyDefs,
    OnsetWrongNumberGroups,
    OnsetTagOutsideOfGroup,
    OnsetPlaceholderWrong,
    OnsetSameDefsOneRow,
    OffsetBeforeOnset,
    InsetBeforeOnset,
    DurationWrongNumberGroups,
    DurationHasOtherTags,

    // definitions
    DefTagInDefinition,
    WrongNumberGroupTags,
    WrongNumberTags,
    WrongNumberPlaceholderTags,
    DuplicateDefinition,
    InvalidDefinitionExtension,
    BadPropInDefinition,
    BadDefinitionLocation,

    // Def and Def-expand references
    DefUnmatched,
    DefValueMissing,
    DefValueExtra,
    DefValueInvalid,
    DefExpandUnmatched,
    DefExpandValueMissing,
    DefExpandValueExtra,
    DefExpandValueInvalid,
    DefExpandInvalid,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ParenthesesMismatch => "PARENTHESES_MISMATCH",
            ErrorCode::TagEmpty => "TAG_EMPTY",
            ErrorCode::CommaMissing => "COMMA_MISSING",
            ErrorCode::GroupEmpty => "HED_GROUP_EMPTY",
            ErrorCode::CharacterInvalid => "CHARACTER_INVALID",
            ErrorCode::TildesUnsupported => "TILDES_UNSUPPORTED",
            ErrorCode::InvalidTagCharacter => "INVALID_TAG_CHARACTER",
            ErrorCode::NamespacePrefixInvalid => "TAG_NAMESPACE_PREFIX_INVALID",
            ErrorCode::NodeNameEmpty => "NODE_NAME_EMPTY",
            ErrorCode::NoValidTagFound => "NO_VALID_TAG_FOUND",
            ErrorCode::InvalidParentNode => "INVALID_PARENT_NODE",
            ErrorCode::TagExtensionInvalid => "TAG_EXTENSION_INVALID",
            ErrorCode::LibraryUnmatched => "HED_LIBRARY_UNMATCHED",
            ErrorCode::TagExtended => "TAG_EXTENDED",
            ErrorCode::TagRequiresChild => "TAG_REQUIRES_CHILD",
            ErrorCode::UnitsInvalid => "UNITS_INVALID",
            ErrorCode::UnitsMissing => "UNITS_MISSING",
            ErrorCode::ValueInvalid => "VALUE_INVALID",
            ErrorCode::PlaceholderInvalid => "PLACEHOLDER_INVALID",
            ErrorCode::ElementDeprecated => "ELEMENT_DEPRECATED",
            ErrorCode::TagRepeated => "HED_TAG_REPEATED",
            ErrorCode::TagRepeatedGroup => "HED_TAG_REPEATED_GROUP",
            ErrorCode::TagGroupTag => "HED_TAG_GROUP_TAG",
            ErrorCode::TopLevelTag => "HED_TOP_LEVEL_TAG",
            ErrorCode::MultipleTopTags => "HED_MULTIPLE_TOP_TAGS",
            ErrorCode::TagsNotAllowed => "HED_TAGS_NOT_ALLOWED",
            ErrorCode::ReservedTagGroupError => "HED_RESERVED_TAG_GROUP_ERROR",
            ErrorCode::RequiredTagMissing => "REQUIRED_TAG_MISSING",
            ErrorCode::TagNotUnique => "TAG_NOT_UNIQUE",
            ErrorCode::OnsetNoDefTagFound => "ONSET_NO_DEF_TAG_FOUND",
            ErrorCode::OnsetTooManyDefs => "ONSET_TOO_MANY_DEFS",
            ErrorCode::OnsetWrongNumberGroups => "ONSET_WRONG_NUMBER_GROUPS",
            ErrorCode::OnsetTagOutsideOfGroup => "ONSET_TAG_OUTSIDE_OF_GROUP",
            ErrorCode::OnsetPlaceholderWrong => "ONSET_PLACEHOLDER_WRONG",
            ErrorCode::OnsetSameDefsOneRow => "ONSET_SAME_DEFS_ONE_ROW",
            ErrorCode::OffsetBeforeOnset => "OFFSET_BEFORE_ONSET",
            ErrorCode::InsetBeforeOnset => "INSET_BEFORE_ONSET",
            ErrorCode::DurationWrongNumberGroups => "DURATION_WRONG_NUMBER_GROUPS",
            ErrorCode::DurationHasOtherTags => "DURATION_HAS_OTHER_TAGS",
            ErrorCode::DefTagInDefinition => "DEF_TAG_IN_DEFINITION",
            ErrorCode::WrongNumberGroupTags => "WRONG_NUMBER_GROUP_TAGS",
            ErrorCode::WrongNumberTags => "WRONG_NUMBER_TAGS",
            ErrorCode::WrongNumberPlaceholderTags => "WRONG_NUMBER_PLACEHOLDER_TAGS",
            ErrorCode::DuplicateDefinition => "DUPLICATE_DEFINITION",
            ErrorCode::InvalidDefinitionExtension => "INVALID_DEFINITION_EXTENSION",
            ErrorCode::BadPropInDefinition => "BAD_PROP_IN_DEFINITION",
            ErrorCode::BadDefinitionLocation => "BAD_DEFINITION_LOCATION",
            ErrorCode::DefUnmatched => "HED_DEF_UNMATCHED",
            ErrorCode::DefValueMissing => "HED_DEF_VALUE_MISSING",
            ErrorCode::DefValueExtra => "HED_DEF_VALUE_EXTRA",
            ErrorCode::DefValueInvalid => "HED_DEF_VALUE_INVALID",
            ErrorCode::DefExpandUnmatched => "HED_DEF_EXPAND_UNMATCHED",
            ErrorCode::DefExpandValueMissing => "HED_DEF_EXPAND_VALUE_MISSING",
            ErrorCode::DefExpandValueExtra => "HED_DEF_EXPAND_VALUE_EXTRA",
            ErrorCode::DefExpandValueInvalid => "HED_DEF_EXPAND_VALUE_INVALID",
            ErrorCode::DefExpandInvalid => "HED_DEF_EXPAND_INVALID",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally visible codes that more than one internal code reports under.
pub mod public {
    pub const TAG_INVALID: &str = "TAG_INVALID";
    pub const TAG_GROUP_ERROR: &str = "TAG_GROUP_ERROR";
    pub const TAG_EXPRESSION_REPEATED: &str = "TAG_EXPRESSION_REPEATED";
    pub const TEMPORAL_TAG_ERROR: &str = "TEMPORAL_TAG_ERROR";
    pub const DEFINITION_INVALID: &str = "DEFINITION_INVALID";
    pub const DEF_INVALID: &str = "DEF_INVALID";
    pub const DEF_EXPAND_INVALID: &str = "DEF_EXPAND_INVALID";
    pub const CHARACTER_INVALID: &str = "CHARACTER_INVALID";
}
