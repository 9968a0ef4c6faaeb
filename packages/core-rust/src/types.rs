use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw cell value as it appears in bundled token and collection data.
///
/// Mirrors the JSON data model so rows can be deserialized straight from
/// the static data files. Scalar variants are what the table engine works
/// with; `Array` and `Map` show up for nested token fields (traits,
/// ultimate abilities) and are treated as an unexpected shape by the
/// scalar formatters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON null, or a column missing from the row.
    #[default]
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer (signed 64-bit).
    Int(i64),
    /// JSON floating-point (64-bit IEEE 754).
    Float(f64),
    /// JSON string (UTF-8).
    String(String),
    /// JSON array (ordered sequence of values).
    Array(Vec<Value>),
    /// JSON object. Uses `BTreeMap` for deterministic iteration order.
    Map(BTreeMap<String, Value>),
}

/// Shared `Null` handed out for absent columns.
static NULL: Value = Value::Null;

impl Value {
    /// Returns `true` for values that count as "no data": null and the
    /// empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns `true` for arrays and objects.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Map(_))
    }

    /// Interprets the value as a finite number.
    ///
    /// Integers and finite floats convert directly; strings are trimmed and
    /// parsed. Everything else, including `NaN` and infinities, is `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if f.is_finite() => Some(*f),
            Value::String(s) => parse_finite(s),
            _ => None,
        }
    }
}

/// Parses trimmed text as a finite `f64`.
#[must_use]
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Stringifies the raw value. Null renders as the empty string, composite
/// values as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// One table record: column id to raw value.
///
/// Rows are never mutated by the view engine; every derived view is a
/// reordering or subset of references into the caller's rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful when assembling rows by hand.
    #[must_use]
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.cells.insert(column.to_string(), value.into());
        self
    }

    /// Returns the raw value for `column`, or `None` if the row lacks it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Returns the raw value for `column`, treating a missing column as null.
    #[must_use]
    pub fn value(&self, column: &str) -> &Value {
        self.cells.get(column).unwrap_or(&NULL)
    }

    /// Stable render key: `uid`, then `identifier`, then a positional fallback.
    #[must_use]
    pub fn key(&self, index: usize) -> String {
        ["uid", "identifier"]
            .iter()
            .map(|column| self.value(column))
            .find(|value| !value.is_empty())
            .map_or_else(|| format!("row-{index}"), ToString::to_string)
    }

    /// Iterates over `(column, value)` pairs in column-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.cells.iter()
    }

    /// Number of populated columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no columns at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
