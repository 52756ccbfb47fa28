//! Editable parameter definitions
//!
//! This module defines a single editable parameter: its classified type, the
//! widget the form should render, its default, and every constraint lifted
//! from the annotation comment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dependency::Dependency;
use crate::value::ParamValue;

/// One editable parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Variable name as declared in the source
    pub name: String,
    /// Classified value type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Widget kind the form renders
    pub ui_type: UiType,
    /// Default value, typed per `param_type`
    pub default: ParamValue,
    /// Lower bound from a range hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper bound from a range hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Step from a three-part range hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Enumerated choices, in declaration order
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    /// Element count (vectors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    /// Per-element editors (vectors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    /// Unit lifted from the description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Free descriptive text
    #[serde(default)]
    pub description: String,
    /// Text length limit (strings only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Section id the parameter displays under; absent for hidden parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// File-wide appearance order
    pub order: u32,
    /// Declared under the reserved Global section
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_global: bool,
    /// Conditional visibility rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Dependency>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Classified value type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Whole number
    Integer,
    /// Fractional number
    Number,
    /// Quoted text
    String,
    /// Native `true` / `false`
    Boolean,
    /// Bracketed list of numbers
    Vector,
    /// Anything the engine cannot confidently classify
    Raw,
    /// Hex color text
    Color,
}

/// Widget kind the form renders for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiType {
    /// Bounded numeric slider
    Slider,
    /// Free text / number entry
    Input,
    /// Dropdown of choices
    Select,
    /// Two-state switch
    Toggle,
    /// Color picker
    Color,
    /// File chooser
    File,
    /// One editor per vector component
    Vector,
    /// Read-only, not independently editable
    Raw,
}

/// One option of an enumerated parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Value written back into the source
    pub value: ParamValue,
    /// Text shown in the dropdown
    pub label: String,
    /// Whether the label was given explicitly as `value:label`
    pub has_label: bool,
}

/// One element editor of a vector parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Axis label (`X`, `Y`, `Z`, then `[3]`, `[4]`, ...)
    pub label: String,
    /// Default value of this element, integer or number as written
    pub default: ParamValue,
    /// Lower bound inherited from the parameter range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper bound inherited from the parameter range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Step inherited from the parameter range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Unit inherited from the parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Parameter {
    /// Create a parameter with no constraints, no group and order 0
    pub fn new(
        name: impl Into<String>,
        param_type: ParamType,
        ui_type: UiType,
        default: ParamValue,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            ui_type,
            default,
            minimum: None,
            maximum: None,
            step: None,
            choices: None,
            dimension: None,
            components: None,
            unit: None,
            description: String::new(),
            max_length: None,
            group: None,
            order: 0,
            is_global: false,
            dependency: None,
        }
    }

    /// Check whether the form can edit this parameter
    pub fn is_editable(&self) -> bool {
        self.ui_type != UiType::Raw
    }

    /// Check whether the parameter has a numeric range
    pub fn has_range(&self) -> bool {
        self.minimum.is_some() && self.maximum.is_some()
    }
}

impl Choice {
    /// Choice whose label is its value
    pub fn plain(value: ParamValue) -> Self {
        let label = value.to_string();
        Self {
            value,
            label,
            has_label: false,
        }
    }

    /// Unlabeled choice shown the way its token was written
    pub fn written(value: ParamValue, text: impl Into<String>) -> Self {
        Self {
            value,
            label: text.into(),
            has_label: false,
        }
    }

    /// Choice with an explicit label
    pub fn labeled(value: ParamValue, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            has_label: true,
        }
    }
}

impl Component {
    /// Label for the component at `index`
    pub fn label_for(index: usize) -> String {
        match index {
            0 => "X".to_string(),
            1 => "Y".to_string(),
            2 => "Z".to_string(),
            n => format!("[{}]", n),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Vector => "vector",
            ParamType::Raw => "raw",
            ParamType::Color => "color",
        };
        f.write_str(name)
    }
}

impl fmt::Display for UiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiType::Slider => "slider",
            UiType::Input => "input",
            UiType::Select => "select",
            UiType::Toggle => "toggle",
            UiType::Color => "color",
            UiType::File => "file",
            UiType::Vector => "vector",
            UiType::Raw => "raw",
        };
        f.write_str(name)
    }
}
