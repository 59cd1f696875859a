//! Runtime schema description: the metadata tree the definition engine walks.
//!
//! A destination type describes itself through the [`Bind`] trait, returning a
//! [`SchemaNode`] built from [`FieldSpec`]s. Field metadata is carried as
//! string-valued attributes with typed convenience setters, so boolean
//! attributes are still *parsed* at walk time and a bad value is reported
//! with the field, attribute, and offending text.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::command::CommandContext;

/// Value kind of a leaf field. Drives hook-registry dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Str,
    Bool,
    Int,
    Float,
    /// Human-readable duration (`"30s"`, `"1h30m"`), decoded to integer milliseconds.
    Duration,
    /// Leveled log severity (`trace`..`error`), decoded to its lowercase canonical form.
    LogLevel,
    /// Comma-separated string list.
    StringList,
    /// Comma-separated integer list.
    IntList,
    /// A caller-defined type, identified by tag. Has no built-in hooks.
    Custom(&'static str),
}

impl Kind {
    pub fn tag(&self) -> &'static str {
        match self {
            Kind::Str => "str",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Duration => "duration",
            Kind::LogLevel => "log-level",
            Kind::StringList => "string-list",
            Kind::IntList => "int-list",
            Kind::Custom(tag) => tag,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Kind::Custom(_))
    }
}

/// One field of a schema: either a leaf with a [`Kind`] or a composite with
/// children. Metadata lives in `attrs`; the setters below are the typed front
/// door, `attr()` is the raw one.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: Option<Kind>,
    attrs: BTreeMap<String, String>,
    children: Vec<FieldSpec>,
}

impl FieldSpec {
    pub fn new(name: &str, kind: Kind) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(kind),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// A composite (nested) field. `short`, `custom`, `required`, and
    /// `ignore` are rejected on composites at walk time.
    pub fn nested(name: &str, children: Vec<FieldSpec>) -> Self {
        Self {
            name: name.to_string(),
            kind: None,
            attrs: BTreeMap::new(),
            children,
        }
    }

    /// Set a raw string attribute. Recognized keys: `alias`, `short`, `desc`,
    /// `default`, `group`, `required`, `ignore`, `custom`, `env`.
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.to_string(), value.to_string());
        self
    }

    pub fn alias(self, alias: &str) -> Self {
        self.attr("alias", alias)
    }

    pub fn short(self, c: char) -> Self {
        self.attr("short", &c.to_string())
    }

    pub fn desc(self, d: &str) -> Self {
        self.attr("desc", d)
    }

    /// String-encoded default, decoded through the field's decode hook.
    pub fn default_value(self, d: &str) -> Self {
        self.attr("default", d)
    }

    pub fn group(self, g: &str) -> Self {
        self.attr("group", g)
    }

    pub fn required(self, yes: bool) -> Self {
        self.attr("required", if yes { "true" } else { "false" })
    }

    pub fn ignore(self, yes: bool) -> Self {
        self.attr("ignore", if yes { "true" } else { "false" })
    }

    pub fn custom(self, yes: bool) -> Self {
        self.attr("custom", if yes { "true" } else { "false" })
    }

    pub fn env(self, yes: bool) -> Self {
        self.attr("env", if yes { "true" } else { "false" })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    pub fn is_composite(&self) -> bool {
        self.kind.is_none()
    }

    pub fn children(&self) -> &[FieldSpec] {
        &self.children
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }
}

/// The root of a schema description.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    fields: Vec<FieldSpec>,
}

impl SchemaNode {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The destination contract: a serde-compatible type that can describe its
/// own option schema, plus optional lifecycle capabilities invoked by the
/// resolution engine in a fixed order (context, transform, validate). The
/// provided no-op defaults mean "capability absent".
pub trait Bind: Serialize + DeserializeOwned {
    fn schema() -> SchemaNode;

    /// Contribute values to the command's execution context after decoding.
    fn context(&self, _cx: &mut CommandContext) {}

    /// Post-decode normalization. A failure aborts resolution.
    fn transform(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Semantic validation. All returned messages are aggregated into one
    /// structured error carrying the command name.
    fn validate(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Check a declared path or alias against the option-name grammar:
/// non-empty alphanumeric/underscore segments joined by `.` or `-`.
pub(crate) fn name_matches_grammar(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let mut segment_len = 0;
    for c in name.chars() {
        match c {
            '.' | '-' => {
                if segment_len == 0 {
                    return false;
                }
                segment_len = 0;
            }
            c if c.is_ascii_alphanumeric() || c == '_' => segment_len += 1,
            _ => return false,
        }
    }
    segment_len > 0
}
