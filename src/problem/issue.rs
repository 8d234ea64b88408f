use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{json, Map, Value};

use super::codes::{ErrorCode, Severity};
use super::context::Context;
use super::messages::{render_message, Registry, Shape};

/// The tag or group an issue is about: its verbatim text and where that
/// text starts in the string being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl<'a> Subject<'a> {
    pub fn new(text: &'a str, start: usize) -> Subject<'a> {
        Subject { text, start }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub code: String,
    pub kind: Option<ErrorCode>,
    pub message: String,
    pub severity: Severity,
    pub source_tag: Option<String>,
    pub char_index: Option<usize>,
    pub char_index_end: Option<usize>,
    pub index_in_tag: Option<usize>,
    pub index_in_tag_end: Option<usize>,
    pub context: Vec<Context>,
}

fn with_params(params: Value) -> Map<String, Value> {
    match params {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

impl Issue {
    fn build(code: ErrorCode, shape: Shape, params: Map<String, Value>) -> Issue {
        let entry = Registry::global().lookup(code);
        if entry.shape != shape {
            panic!(
                "Error code {} is registered as {:?} but was built as {:?}",
                code, entry.shape, shape
            );
        }
        let params = Value::Object(params);
        Issue {
            code: entry
                .actual
                .to_string(),
            kind: Some(code),
            message: render_message(code, &params),
            severity: entry.severity,
            source_tag: None,
            char_index: None,
            char_index_end: None,
            index_in_tag: None,
            index_in_tag_end: None,
            context: Vec::new(),
        }
    }

    /// An issue about the string as a whole.
    pub fn new(code: ErrorCode, params: Value) -> Issue {
        Issue::build(code, Shape::Plain, with_params(params))
    }

    /// An issue about the string at a single character position. The
    /// `character` and `index` template values are filled in here.
    pub fn at(code: ErrorCode, source: &str, index: usize) -> Issue {
        let character = source[index..]
            .chars()
            .next()
            .unwrap_or(' ');
        let mut issue = Issue::new(code, json!({ "character": character, "index": index }));
        issue.char_index = Some(index);
        issue.char_index_end = Some(index + character.len_utf8());
        issue
    }

    /// An issue about a tag or group; `tag` is filled in with its text.
    pub fn for_tag(code: ErrorCode, subject: Subject<'_>, params: Value) -> Issue {
        let mut params = with_params(params);
        params
            .entry("tag")
            .or_insert_with(|| Value::String(subject.text.to_string()));

        let mut issue = Issue::build(code, Shape::Tag, params);
        issue.source_tag = Some(subject.text.to_string());
        issue.char_index = Some(subject.start);
        issue.char_index_end = Some(subject.start + subject.text.len());
        issue
    }

    /// An issue about part of a tag, identified by offsets within the tag's
    /// own text. The message notes where the problem lies in the whole
    /// string.
    pub fn for_tag_span(
        code: ErrorCode,
        subject: Subject<'_>,
        start: usize,
        end: usize,
        params: Value,
    ) -> Issue {
        let mut params = with_params(params);
        params
            .entry("tag")
            .or_insert_with(|| Value::String(subject.text.to_string()));

        let mut issue = Issue::build(code, Shape::TagSpan, params);
        let absolute = subject.start + start;
        let absolute_end = subject.start + end;
        issue.source_tag = Some(subject.text.to_string());
        issue.index_in_tag = Some(start);
        issue.index_in_tag_end = Some(end);
        issue.char_index = Some(absolute);
        issue.char_index_end = Some(absolute_end);
        issue
            .message
            .push_str(&format!(
                "  Problem spans string indexes: {}, {}",
                absolute, absolute_end
            ));
        issue
    }

    /// Fallback for codes which were never registered, so that callers
    /// rendering externally supplied codes need not special case them.
    pub fn unknown(code: &str) -> Issue {
        Issue {
            code: code.to_string(),
            kind: None,
            message: format!("Unknown error. Code '{}' was not found in the lookup.", code),
            severity: Severity::Error,
            source_tag: None,
            char_index: None,
            char_index_end: None,
            index_in_tag: None,
            index_in_tag_end: None,
            context: Vec::new(),
        }
    }

    /// Build an issue from a code name, falling back to an unknown error.
    /// Tag shaped codes take their subject from the `tag` parameter and
    /// span all of it.
    pub fn from_name(name: &str, params: Value) -> Issue {
        let code = match Registry::global().find(name) {
            Some(code) => code,
            None => return Issue::unknown(name),
        };
        let text = params
            .get("tag")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let subject = Subject::new(&text, 0);
        match Registry::global()
            .lookup(code)
            .shape
        {
            Shape::Plain => Issue::new(code, params),
            Shape::Tag => Issue::for_tag(code, subject, params),
            Shape::TagSpan => Issue::for_tag_span(code, subject, 0, text.len(), params),
        }
    }

    /// Report under a different public code than the one registered; used
    /// where one situation is more specifically described elsewhere.
    pub fn with_actual_code(mut self, code: &str) -> Issue {
        self.code = code.to_string();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_unknown(&self) -> bool {
        self.kind
            .is_none()
    }

    /// The issue as a flat dictionary of values.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("code", &self.code)?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("severity", &self.severity)?;
        if let Some(source_tag) = &self.source_tag {
            map.serialize_entry("source_tag", source_tag)?;
        }
        if let Some(index) = self.char_index {
            map.serialize_entry("char_index", &index)?;
        }
        if let Some(index) = self.char_index_end {
            map.serialize_entry("char_index_end", &index)?;
        }
        if let Some(index) = self.index_in_tag {
            map.serialize_entry("index_in_tag", &index)?;
        }
        if let Some(index) = self.index_in_tag_end {
            map.serialize_entry("index_in_tag_end", &index)?;
        }
        for (kind, value) in &self.context {
            map.serialize_entry(kind.key(), value)?;
        }
        map.end()
    }
}
