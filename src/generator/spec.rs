//! Typed generator specifications and their resolution from config.
//!
//! A column's `generator` object is loosely typed on disk. It is resolved once,
//! at load time, into a [`GeneratorSpec`]. Keys are tried in a fixed order and
//! the first key present with the expected JSON shape wins:
//!
//! `hardcoded` → `increment` → `table_increment` → `parent_key` → `random` → `predefined_list`
//!
//! A recognized key with the wrong shape is skipped and the next key is tried.
//! Anything left over resolves to [`GeneratorSpec::Unrecognized`], which
//! generates the empty string.

use serde_json::{Map, Value};
use std::fmt;

pub const HARDCODED: &str = "hardcoded";
pub const INCREMENT: &str = "increment";
pub const TABLE_INCREMENT: &str = "table_increment";
pub const PARENT_KEY: &str = "parent_key";
pub const RANDOM: &str = "random";
pub const PREDEFINED_LIST: &str = "predefined_list";

/// Recognized generator keys, in resolution order.
pub const KNOWN_KEYS: [&str; 6] = [
    HARDCODED,
    INCREMENT,
    TABLE_INCREMENT,
    PARENT_KEY,
    RANDOM,
    PREDEFINED_LIST,
];

/// Random string length used when `random.length` is missing or not a number.
pub const DEFAULT_RANDOM_LENGTH: usize = 10;
/// Longest accepted `random.length`; longer values are clamped to it.
pub const MAX_RANDOM_LENGTH: usize = 1 << 20;

/// How a column value is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeneratorSpec {
    /// Always the same literal.
    Hardcoded(String),

    /// `row_index + 1`, restarting for every parent row.
    Increment,

    /// Counter keyed by table name, shared by the whole run, starting at 0.
    TableIncrement,

    /// Value of the named column in the immediate parent row.
    ParentKey(String),

    /// `prefix + <length alphanumeric chars> + suffix`
    Random {
        length: usize,
        prefix: String,
        suffix: String,
    },

    /// `list[row_index % list.len()]`, empty string for an empty list.
    PredefinedList(Vec<String>),

    /// No usable generator key; always the empty string.
    #[default]
    Unrecognized,
}

impl GeneratorSpec {
    /// Short name of the generator kind, matching its config key.
    pub fn kind_name(&self) -> &'static str {
        match self {
            GeneratorSpec::Hardcoded(_) => HARDCODED,
            GeneratorSpec::Increment => INCREMENT,
            GeneratorSpec::TableIncrement => TABLE_INCREMENT,
            GeneratorSpec::ParentKey(_) => PARENT_KEY,
            GeneratorSpec::Random { .. } => RANDOM,
            GeneratorSpec::PredefinedList(_) => PREDEFINED_LIST,
            GeneratorSpec::Unrecognized => "none",
        }
    }

    pub fn random(length: usize, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        GeneratorSpec::Random {
            length,
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GeneratorSpec::PredefinedList(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for GeneratorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorSpec::Hardcoded(value) => write!(f, "hardcoded({:?})", value),
            GeneratorSpec::Increment => write!(f, "increment"),
            GeneratorSpec::TableIncrement => write!(f, "table_increment"),
            GeneratorSpec::ParentKey(column) => write!(f, "parent_key({})", column),
            GeneratorSpec::Random {
                length,
                prefix,
                suffix,
            } => {
                write!(f, "random(length={}", length)?;
                if !prefix.is_empty() {
                    write!(f, ", prefix={:?}", prefix)?;
                }
                if !suffix.is_empty() {
                    write!(f, ", suffix={:?}", suffix)?;
                }
                write!(f, ")")
            }
            GeneratorSpec::PredefinedList(items) => {
                write!(f, "predefined_list({} items)", items.len())
            }
            GeneratorSpec::Unrecognized => write!(f, "none"),
        }
    }
}

/// Something questionable found while resolving a generator object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveIssue {
    /// A recognized key whose value has the wrong shape.
    Malformed { key: &'static str, reason: String },
    /// A key that names no generator kind.
    UnknownKey(String),
}

impl ResolveIssue {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ResolveIssue::Malformed { .. })
    }
}

impl fmt::Display for ResolveIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveIssue::Malformed { key, reason } => write!(f, "'{}': {}", key, reason),
            ResolveIssue::UnknownKey(key) => write!(f, "unknown generator key '{}'", key),
        }
    }
}

/// Resolved spec plus every issue noticed on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub spec: GeneratorSpec,
    pub issues: Vec<ResolveIssue>,
}

/// Resolve a raw generator object. `None` (missing or `null`) is unrecognized.
pub fn resolve(raw: Option<&Map<String, Value>>) -> Resolution {
    let mut issues = Vec::new();
    let spec = match raw {
        Some(raw) => {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    issues.push(ResolveIssue::UnknownKey(key.clone()));
                }
            }
            resolve_kind(raw, &mut issues)
        }
        None => GeneratorSpec::Unrecognized,
    };
    Resolution { spec, issues }
}

fn resolve_kind(raw: &Map<String, Value>, issues: &mut Vec<ResolveIssue>) -> GeneratorSpec {
    if let Some(value) = raw.get(HARDCODED) {
        match value {
            Value::String(s) => return GeneratorSpec::Hardcoded(s.clone()),
            other => issues.push(malformed(HARDCODED, "expected a string", other)),
        }
    }

    // Presence alone selects increment, whatever the value.
    if raw.contains_key(INCREMENT) {
        return GeneratorSpec::Increment;
    }

    if let Some(value) = raw.get(TABLE_INCREMENT) {
        match value {
            Value::Bool(_) => return GeneratorSpec::TableIncrement,
            other => issues.push(malformed(TABLE_INCREMENT, "expected a boolean", other)),
        }
    }

    if let Some(value) = raw.get(PARENT_KEY) {
        match value {
            Value::String(s) => return GeneratorSpec::ParentKey(s.clone()),
            other => issues.push(malformed(PARENT_KEY, "expected a column name", other)),
        }
    }

    if let Some(value) = raw.get(RANDOM) {
        match value {
            Value::Object(cfg) => return resolve_random(cfg, issues),
            other => issues.push(malformed(RANDOM, "expected an object", other)),
        }
    }

    if let Some(value) = raw.get(PREDEFINED_LIST) {
        match value {
            Value::Array(items) => return resolve_list(items, issues),
            other => issues.push(malformed(PREDEFINED_LIST, "expected an array", other)),
        }
    }

    GeneratorSpec::Unrecognized
}

fn resolve_random(cfg: &Map<String, Value>, issues: &mut Vec<ResolveIssue>) -> GeneratorSpec {
    let length = match cfg.get("length") {
        None => DEFAULT_RANDOM_LENGTH,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(len) if len < 0.0 => {
                issues.push(ResolveIssue::Malformed {
                    key: RANDOM,
                    reason: format!("negative length {}, using 0", n),
                });
                0
            }
            Some(len) if !len.is_finite() || len >= (MAX_RANDOM_LENGTH + 1) as f64 => {
                issues.push(ResolveIssue::Malformed {
                    key: RANDOM,
                    reason: format!("length {} exceeds the maximum, using {}", n, MAX_RANDOM_LENGTH),
                });
                MAX_RANDOM_LENGTH
            }
            // Truncates toward zero.
            Some(len) => len as usize,
            None => DEFAULT_RANDOM_LENGTH,
        },
        Some(other) => {
            issues.push(malformed(RANDOM, "length must be a number", other));
            DEFAULT_RANDOM_LENGTH
        }
    };

    let prefix = string_field(cfg, "prefix", issues);
    let suffix = string_field(cfg, "suffix", issues);

    GeneratorSpec::Random {
        length,
        prefix,
        suffix,
    }
}

fn string_field(cfg: &Map<String, Value>, field: &str, issues: &mut Vec<ResolveIssue>) -> String {
    match cfg.get(field) {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            issues.push(malformed(
                RANDOM,
                &format!("{} must be a string", field),
                other,
            ));
            String::new()
        }
    }
}

fn resolve_list(items: &[Value], issues: &mut Vec<ResolveIssue>) -> GeneratorSpec {
    let values = items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => s.clone(),
            other => {
                issues.push(malformed(
                    PREDEFINED_LIST,
                    &format!("entry {} is not a string, it will be empty", i),
                    other,
                ));
                String::new()
            }
        })
        .collect();
    GeneratorSpec::PredefinedList(values)
}

fn malformed(key: &'static str, expected: &str, found: &Value) -> ResolveIssue {
    ResolveIssue::Malformed {
        key,
        reason: format!("{}, found {}", expected, json_type_name(found)),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
