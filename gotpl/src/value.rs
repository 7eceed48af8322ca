//! Runtime value and data-context types.
//!
//! The template language is scalar-only: every expression produces a string,
//! a number, a boolean, or nil.  The *data context* handed to
//! [`Template::execute`](crate::Template::execute) may additionally be a
//! nested map so that dotted selectors (`.x.y`) have something to walk, but
//! a map can never become a pipeline value — selecting one is a type error.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

// ── Value ─────────────────────────────────────────────────────────────────────

/// A scalar template value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Nil,
}

impl Default for Value {
    fn default() -> Self {
        Value::Nil
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Num(n) => {
                // Literals always parse to f64; whole numbers print without
                // a fractional part so `{{23}}` renders as "23".
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "<nil>"),
        }
    }
}

impl Value {
    /// The empty values are `false`, `0`, `nil`, and the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Num(n) => *n == 0.0,
            Value::Bool(b) => !b,
            Value::Nil => true,
        }
    }

    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Num(_) => "number",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
        }
    }

    /// Whether two values share a runtime category.
    pub fn same_kind(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

/// Ordering comparison for `lt`/`le`/`gt`/`ge`.
///
/// Operand categories must match, and nil is not orderable.  NaN compares
/// as equal, the same shortcut the host language would take.
pub(crate) fn compare(lhs: &Value, rhs: &Value) -> Result<Ordering> {
    if !lhs.same_kind(rhs) {
        return Err(Error::TypeMismatch(
            "incompatible types for comparison".into(),
        ));
    }
    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Num(a), Value::Num(b)) => Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal)),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        _ => Err(Error::TypeMismatch("invalid type for comparison".into())),
    }
}

// ── sprint ────────────────────────────────────────────────────────────────────

/// Concatenate stringified values, inserting a space between two adjacent
/// operands unless both are strings.
pub fn sprint(values: &[Value]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            let both_strings =
                matches!(values[i - 1], Value::Str(_)) && matches!(value, Value::Str(_));
            if !both_strings {
                out.push(' ');
            }
        }
        out.push_str(&value.to_string());
    }
    out
}

// ── Data ──────────────────────────────────────────────────────────────────────

/// The ambient "dot" context a template is executed against.
///
/// `Leaf` holds a scalar; `Map` holds named children for dotted field access.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Leaf(Value),
    Map(HashMap<String, Data>),
}

impl Data {
    /// Build a map context from `(name, child)` pairs.
    pub fn map<K, I>(entries: I) -> Data
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Data)>,
    {
        Data::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Value> for Data {
    fn from(v: Value) -> Self {
        Data::Leaf(v)
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::Leaf(Value::from(s))
    }
}

impl From<i64> for Data {
    fn from(n: i64) -> Self {
        Data::Leaf(Value::from(n))
    }
}

impl From<f64> for Data {
    fn from(n: f64) -> Self {
        Data::Leaf(Value::from(n))
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Data::Leaf(Value::from(b))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
