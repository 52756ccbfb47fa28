//! Typed parameter values
//!
//! Defaults, choice values and live values coming back from the form all
//! share one representation. A native boolean and a text value that happens
//! to read "yes" or "true" are different variants and stay different: the
//! value-injection layer writes them into the model source differently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal value as it appears in the schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Unquoted `true` / `false`
    Boolean(bool),
    /// Integral number without fractional part or exponent
    Integer(i64),
    /// Any other number
    Number(f64),
    /// Quoted text, or the verbatim source of an unclassifiable value
    Text(String),
    /// Bracketed list of numbers, each element integer or number as written
    Vector(Vec<ParamValue>),
}

impl ParamValue {
    /// Get the boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get a numeric payload, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(i) => Some(*i as f64),
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the vector payload
    pub fn as_vector(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Check whether this is a numeric value (integer or number)
    pub fn is_numeric(&self) -> bool {
        matches!(self, ParamValue::Integer(_) | ParamValue::Number(_))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Boolean(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => write!(f, "{}", s),
            ParamValue::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(value: Vec<f64>) -> Self {
        ParamValue::Vector(value.into_iter().map(ParamValue::Number).collect())
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(value: Vec<i64>) -> Self {
        ParamValue::Vector(value.into_iter().map(ParamValue::Integer).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_and_text_stay_distinct() {
        let native = ParamValue::from(true);
        let text = ParamValue::from("true");
        assert_ne!(native, text);
        assert_eq!(native.to_string(), text.to_string());
    }

    #[test]
    fn test_display_numbers() {
        assert_eq!(ParamValue::Integer(50).to_string(), "50");
        assert_eq!(ParamValue::Number(2.5).to_string(), "2.5");
        let mixed = ParamValue::Vector(vec![ParamValue::Integer(1), ParamValue::Number(2.5)]);
        assert_eq!(mixed.to_string(), "[1, 2.5]");
    }

    #[test]
    fn test_serialize_untagged() {
        assert_eq!(serde_json::to_string(&ParamValue::Boolean(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&ParamValue::Integer(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ParamValue::Text("yes".into())).unwrap(),
            "\"yes\""
        );
    }

    #[test]
    fn test_serialize_vector_keeps_element_kind() {
        let whole = ParamValue::from(vec![50_i64, 30, 20]);
        assert_eq!(serde_json::to_string(&whole).unwrap(), "[50,30,20]");

        let mixed = ParamValue::Vector(vec![ParamValue::Integer(1), ParamValue::Number(2.5)]);
        assert_eq!(serde_json::to_string(&mixed).unwrap(), "[1,2.5]");

        let back: ParamValue = serde_json::from_str("[1,2.5]").unwrap();
        assert_eq!(back, mixed);
    }

    #[test]
    fn test_deserialize_prefers_integer() {
        let v: ParamValue = serde_json::from_str("50").unwrap();
        assert_eq!(v, ParamValue::Integer(50));
        let v: ParamValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(v, ParamValue::Number(2.5));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ParamValue::Integer(4).as_f64(), Some(4.0));
        assert_eq!(ParamValue::Boolean(false).as_bool(), Some(false));
        assert_eq!(ParamValue::Text("a".into()).as_str(), Some("a"));
        assert!(ParamValue::Number(1.5).is_numeric());
        assert!(!ParamValue::Text("1".into()).is_numeric());
    }
}
