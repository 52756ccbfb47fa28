//! Conditional visibility rules
//!
//! A parameter annotated with `@depends(name OP value)` is only shown while
//! the controlling parameter `name` compares to `value` under `OP`.
//!
//! # Example
//!
//! ```
//! use scadform_schema::{Dependency, Operator, ParamValue};
//!
//! let rule = Dependency::new("ventilation", Operator::Eq, "yes");
//! assert!(rule.is_satisfied_by(&ParamValue::from("yes")));
//! assert!(!rule.is_satisfied_by(&ParamValue::from("no")));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ParamValue;

/// A visibility rule tying one parameter to another's live value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the controlling parameter
    pub parameter: String,
    /// Comparison operator
    pub operator: Operator,
    /// Value compared against, unquoted
    pub value: String,
}

/// Comparison operators allowed in a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Visible while equal
    #[serde(rename = "==")]
    Eq,
    /// Visible while different
    #[serde(rename = "!=")]
    Ne,
}

impl Dependency {
    /// Create a new dependency rule
    pub fn new(parameter: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            operator,
            value: value.into(),
        }
    }

    /// Evaluate the rule against the controlling parameter's live value.
    ///
    /// Values are compared by their textual form, so a native `true` matches
    /// a rule written as `@depends(flag==true)`.
    pub fn is_satisfied_by(&self, live: &ParamValue) -> bool {
        let live = live.to_string();
        let equal = live.trim() == self.value;
        match self.operator {
            Operator::Eq => equal,
            Operator::Ne => !equal,
        }
    }
}

impl Operator {
    /// Parse an operator token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            _ => None,
        }
    }

    /// Source spelling of the operator
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.parameter, self.operator, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_equal_rule() {
        let rule = Dependency::new("mode", Operator::Ne, "simple");
        assert!(rule.is_satisfied_by(&ParamValue::from("advanced")));
        assert!(!rule.is_satisfied_by(&ParamValue::from("simple")));
    }

    #[test]
    fn test_boolean_live_value() {
        let rule = Dependency::new("show_lid", Operator::Eq, "true");
        assert!(rule.is_satisfied_by(&ParamValue::Boolean(true)));
        assert!(!rule.is_satisfied_by(&ParamValue::Boolean(false)));
    }

    #[test]
    fn test_numeric_live_value() {
        let rule = Dependency::new("count", Operator::Eq, "3");
        assert!(rule.is_satisfied_by(&ParamValue::Integer(3)));
        assert!(rule.is_satisfied_by(&ParamValue::Number(3.0)));
    }

    #[test]
    fn test_operator_serialization() {
        let rule = Dependency::new("mode", Operator::Ne, "simple");
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"parameter":"mode","operator":"!=","value":"simple"}"#);
    }

    #[test]
    fn test_display() {
        let rule = Dependency::new("ventilation", Operator::Eq, "yes");
        assert_eq!(rule.to_string(), "ventilation==yes");
        assert_eq!(Operator::from_token("!="), Some(Operator::Ne));
        assert_eq!(Operator::from_token("<"), None);
    }
}
