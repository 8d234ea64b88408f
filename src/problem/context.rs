use serde::Serialize;
use std::fmt;

/// The kinds of location an issue can be attributed to, from the outermost
/// (a file) down to the individual string being validated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextType {
    CustomTitle,
    FileName,
    SidecarColumnName,
    SidecarKeyName,
    Row,
    Column,
    Line,
    HedString,
    SchemaSection,
    SchemaTag,
    SchemaAttribute,
}

impl ContextType {
    /// Key used when an issue is flattened into a dictionary.
    pub fn key(&self) -> &'static str {
        match self {
            ContextType::CustomTitle => "ec_title",
            ContextType::FileName => "ec_filename",
            ContextType::SidecarColumnName => "ec_sidecarColumnName",
            ContextType::SidecarKeyName => "ec_sidecarKeyName",
            ContextType::Row => "ec_row",
            ContextType::Column => "ec_column",
            ContextType::Line => "ec_line",
            ContextType::HedString => "ec_HedString",
            ContextType::SchemaSection => "ec_section",
            ContextType::SchemaTag => "ec_schemaTag",
            ContextType::SchemaAttribute => "ec_attribute",
        }
    }

    /// Heading used when printing issues nested by context.
    pub fn heading(&self, value: &ContextValue) -> String {
        match self {
            ContextType::CustomTitle => value.to_string(),
            ContextType::FileName => format!("Errors in file '{}'", value),
            ContextType::SidecarColumnName => format!("Column '{}':", value),
            ContextType::SidecarKeyName => format!("Key: {}", value),
            ContextType::Row => format!("Issues in row {}:", value),
            ContextType::Column => format!("Issues in column {}:", value),
            ContextType::Line => format!("Line: {}", value),
            ContextType::HedString => format!("hed string: {}", value),
            ContextType::SchemaSection => format!("Schema Section: {}", value),
            ContextType::SchemaTag => format!("Source tag: {}", value),
            ContextType::SchemaAttribute => format!("Source Attribute: {}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Text(String),
    Index(usize),
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Text(text) => f.write_str(text),
            ContextValue::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<usize> for ContextValue {
    fn from(value: usize) -> Self {
        ContextValue::Index(value)
    }
}

pub type Context = (ContextType, ContextValue);

/// Ordered stack of the contexts currently being traversed. Pushes and pops
/// must balance around every traversal scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextStack {
    stack: Vec<Context>,
}

impl ContextStack {
    pub fn new() -> ContextStack {
        ContextStack { stack: vec![] }
    }

    pub fn current(&self) -> Option<&Context> {
        self.stack
            .last()
    }

    pub fn push(&mut self, kind: ContextType, value: ContextValue) {
        self.stack
            .push((kind, value));
    }

    pub fn pop(&mut self) -> Context {
        match self
            .stack
            .pop()
        {
            Some(context) => context,
            None => panic!("Popped an error context but none had been pushed"),
        }
    }

    pub fn reset(&mut self) {
        self.stack
            .clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stack
            .is_empty()
    }

    pub fn snapshot(&self) -> Vec<Context> {
        self.stack
            .clone()
    }
}
