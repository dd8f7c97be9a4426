//! Loosely-typed values under validation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The data under validation: field name to current value.
///
/// An absent field is simply a missing key; rules observe it as `None`.
pub type ValueBag = HashMap<String, Value>;

/// A multi-valued bag, e.g. repeated query parameters.
pub type MultiValueBag = HashMap<String, Vec<String>>;

/// A single field value.
///
/// This is the closed set of runtime representations the engine recognizes:
/// scalars (booleans, sized integers, floats, strings), ordered sequences
/// and nested mappings. Nested values are never validated recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Whether this value is one of the numeric variants.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::I8(_)
                | Value::I16(_)
                | Value::I32(_)
                | Value::I64(_)
                | Value::F32(_)
                | Value::F64(_)
        )
    }

    /// Borrow the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// The canonical string form rules match against.
///
/// Floats always render with a fractional part (`3.0`, not `3`) so that the
/// textual rules (`decimal`, `digits`, `equals`, ...) see the same shape a
/// float literal has in source.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::I8(n) => write!(f, "{n}"),
            Value::I16(n) => write!(f, "{n}"),
            Value::I32(n) => write!(f, "{n}"),
            Value::I64(n) => write!(f, "{n}"),
            Value::F32(n) => write!(f, "{n:?}"),
            Value::F64(n) => write!(f, "{n:?}"),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_display_keeps_fraction() {
        assert_eq!(Value::F64(3.0).to_string(), "3.0");
        assert_eq!(Value::F64(0.0).to_string(), "0.0");
        assert_eq!(Value::F64(3.1).to_string(), "3.1");
        assert_eq!(Value::F32(0.5).to_string(), "0.5");
    }

    #[test]
    fn integer_display() {
        assert_eq!(Value::I32(42).to_string(), "42");
        assert_eq!(Value::I64(-7).to_string(), "-7");
    }

    #[test]
    fn array_display() {
        let value = Value::Array(vec![Value::from(1), Value::from("two")]);
        assert_eq!(value.to_string(), "[1, two]");
    }

    #[test]
    fn map_display() {
        let mut entries = BTreeMap::new();
        entries.insert("a".to_string(), Value::from(1));
        entries.insert("b".to_string(), Value::from(true));
        assert_eq!(Value::Map(entries).to_string(), "{a: 1, b: true}");
    }

    #[test]
    fn as_str_borrows_only_strings() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::from(1).as_str().is_none());
        assert!(Value::Array(vec![]).as_str().is_none());
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
        assert_eq!(Value::from(5i8), Value::I8(5));
        assert!(Value::from(1.5f64).is_number());
        assert!(!Value::from(true).is_number());
    }
}
