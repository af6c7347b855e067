use std::fmt;

use serde::{Deserialize, Serialize};

/// A loosely typed value used for session flags, custom object state, and
/// the expected side of puzzle conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),
    /// A 64-bit signed integer value.
    Integer(i64),
    /// A 64-bit floating-point value.
    Float(f64),
    /// A text value.
    Text(String),
}

impl Value {
    /// Returns the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text payload, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value counts as "set": `true`, a non-zero number, or
    /// non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(n) => *n != 0.0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Equality that treats integers and floats with the same numeric value
    /// as equal. Content authors write `1` and `1.0` interchangeably.
    pub fn loosely_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                (*a as f64 - *b).abs() < f64::EPSILON
            }
            _ => self == other,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Boolean(true)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_shapes() {
        let v: Value = serde_json::from_str("true").unwrap();
        assert_eq!(v, Value::Boolean(true));
        let v: Value = serde_json::from_str("3").unwrap();
        assert_eq!(v, Value::Integer(3));
        let v: Value = serde_json::from_str("2.5").unwrap();
        assert_eq!(v, Value::Float(2.5));
        let v: Value = serde_json::from_str("\"coin\"").unwrap();
        assert_eq!(v, Value::Text("coin".to_string()));
    }

    #[test]
    fn numbers_compare_loosely() {
        assert!(Value::Integer(1).loosely_eq(&Value::Float(1.0)));
        assert!(Value::Float(1.0).loosely_eq(&Value::Integer(1)));
        assert!(!Value::Integer(1).loosely_eq(&Value::Boolean(true)));
    }

    #[test]
    fn truthiness() {
        assert!(Value::Boolean(true).is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(!Value::Text(String::new()).is_truthy());
        assert!(Value::Text("x".into()).is_truthy());
    }
}
