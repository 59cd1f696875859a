//! Hook registry: per-kind definition and decode functions.
//!
//! A definition hook produces the settable cell for an option and may
//! enhance its description (enum-like kinds append their legal values). A
//! decode hook is a pure conversion from a raw value — a string from env or
//! CLI input, or a loosely-typed config value — into the kind's target
//! shape. Decode errors are descriptive: they name the offending raw token
//! and, for composite textual values, its 0-based position.
//!
//! Custom entries registered by the caller take precedence over built-in
//! entries for the same kind tag.

use std::collections::HashMap;
use std::sync::Arc;

use toml::Value;

use crate::cell::ValueCell;
use crate::schema::{FieldSpec, Kind};

/// Input to a definition hook.
pub struct DefineRequest<'a> {
    pub name: &'a str,
    pub short: Option<char>,
    pub description: &'a str,
    pub field: &'a FieldSpec,
    /// The declared default, already decoded, when one exists.
    pub current: Option<&'a Value>,
}

/// Produces the settable cell and the (possibly enhanced) description.
pub type DefineHook = Arc<dyn Fn(&DefineRequest<'_>) -> (ValueCell, String) + Send + Sync>;

/// Pure conversion from a raw value into the target shape.
pub type DecodeHook = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

pub struct HookRegistry {
    define: HashMap<&'static str, DefineHook>,
    decode: HashMap<&'static str, DecodeHook>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl HookRegistry {
    /// Registry populated with the built-in entries: plain scalars plus
    /// duration, log level, string list, and integer list.
    pub fn builtin() -> Self {
        let mut reg = Self {
            define: HashMap::new(),
            decode: HashMap::new(),
        };
        for kind in [
            Kind::Str,
            Kind::Bool,
            Kind::Int,
            Kind::Float,
            Kind::Duration,
            Kind::LogLevel,
            Kind::StringList,
            Kind::IntList,
        ] {
            reg.define.insert(kind.tag(), plain_define(kind));
            reg.decode.insert(kind.tag(), builtin_decode(kind));
        }
        reg
    }

    /// Register a custom pair for a kind tag, overriding any built-in entry.
    pub fn register(&mut self, tag: &'static str, define: DefineHook, decode: DecodeHook) {
        self.define.insert(tag, define);
        self.decode.insert(tag, decode);
    }

    pub fn define_for(&self, kind: Kind) -> Option<DefineHook> {
        self.define.get(kind.tag()).cloned()
    }

    pub fn decode_for(&self, kind: Kind) -> Option<DecodeHook> {
        self.decode.get(kind.tag()).cloned()
    }

    /// Every kind with a definition entry must have a decode counterpart.
    /// Internal consistency only — user registration goes through
    /// [`register`](Self::register), which keeps the pair together.
    pub(crate) fn is_consistent(&self) -> bool {
        self.define.keys().all(|tag| self.decode.contains_key(tag))
    }
}

fn plain_define(kind: Kind) -> DefineHook {
    Arc::new(move |req: &DefineRequest<'_>| {
        let cell = match req.current {
            Some(v) => ValueCell::with(v.clone()),
            None => ValueCell::new(),
        };
        let description = match kind {
            Kind::LogLevel => {
                if req.description.is_empty() {
                    format!("(one of: {})", LEVELS.join(", "))
                } else {
                    format!("{} (one of: {})", req.description, LEVELS.join(", "))
                }
            }
            _ => req.description.to_string(),
        };
        (cell, description)
    })
}

fn builtin_decode(kind: Kind) -> DecodeHook {
    Arc::new(move |raw: &Value| decode_value(kind, raw))
}

/// Decode a raw value for a built-in kind. Non-string inputs pass through
/// untouched — hooks only fire on textual sources.
pub fn decode_value(kind: Kind, raw: &Value) -> Result<Value, String> {
    let Value::String(s) = raw else {
        return Ok(raw.clone());
    };
    match kind {
        Kind::Str => Ok(Value::String(s.clone())),
        Kind::Bool => decode_bool(s).map(Value::Boolean),
        Kind::Int => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| format!("'{s}' is not an integer")),
        Kind::Float => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("'{s}' is not a number")),
        Kind::Duration => decode_duration(s).map(Value::Integer),
        Kind::LogLevel => decode_log_level(s).map(Value::String),
        Kind::StringList => Ok(Value::Array(
            decode_string_list(s).into_iter().map(Value::String).collect(),
        )),
        Kind::IntList => decode_int_list(s)
            .map(|ints| Value::Array(ints.into_iter().map(Value::Integer).collect())),
        Kind::Custom(tag) => Err(format!("no built-in decoder for custom type '{tag}'")),
    }
}

fn decode_bool(s: &str) -> Result<bool, String> {
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("'{s}' is not a boolean"))
    }
}

/// Parse a human-readable duration (`"250ms"`, `"30s"`, `"1h30m"`, `"2d"`)
/// into total milliseconds.
pub fn decode_duration(s: &str) -> Result<i64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    let mut total: i64 = 0;
    let mut chars = s.chars().peekable();
    while chars.peek().is_some() {
        let mut number = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_digit() {
                number.push(*c);
                chars.next();
            } else {
                break;
            }
        }
        if number.is_empty() {
            return Err(format!("invalid duration '{s}'"));
        }
        let mut unit = String::new();
        while let Some(c) = chars.peek() {
            if c.is_ascii_alphabetic() {
                unit.push(*c);
                chars.next();
            } else {
                break;
            }
        }
        let n: i64 = number
            .parse()
            .map_err(|_| format!("invalid duration '{s}'"))?;
        let factor = match unit.as_str() {
            "ms" => 1,
            "s" => 1_000,
            "m" => 60_000,
            "h" => 3_600_000,
            "d" => 86_400_000,
            "" => return Err(format!("missing unit in duration '{s}'")),
            other => return Err(format!("unknown duration unit '{other}' in '{s}'")),
        };
        total = total
            .checked_add(n.checked_mul(factor).ok_or_else(|| {
                format!("duration '{s}' overflows")
            })?)
            .ok_or_else(|| format!("duration '{s}' overflows"))?;
    }
    Ok(total)
}

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Canonicalize a log severity name. `"warning"` is accepted as `"warn"`.
pub fn decode_log_level(s: &str) -> Result<String, String> {
    let lower = s.trim().to_lowercase();
    let canonical = if lower == "warning" { "warn" } else { lower.as_str() };
    if LEVELS.contains(&canonical) {
        Ok(canonical.to_string())
    } else {
        Err(format!(
            "'{s}' is not a log level (one of: {})",
            LEVELS.join(", ")
        ))
    }
}

/// Split a comma-separated list, trimming whitespace around each element.
/// An empty input yields an empty list.
pub fn decode_string_list(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',').map(|e| e.trim().to_string()).collect()
}

/// Split and parse a comma-separated integer list. Empty input yields an
/// empty list; a non-integer or out-of-range token fails naming the token
/// and its 0-based position.
pub fn decode_int_list(s: &str) -> Result<Vec<i64>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .enumerate()
        .map(|(i, e)| {
            let token = e.trim();
            token
                .parse::<i64>()
                .map_err(|_| format!("invalid integer '{token}' at position {i}"))
        })
        .collect()
}
