//! Widget reconciliation
//!
//! Combines a classified literal with its parsed annotation into a
//! [`Parameter`]: the final `type`, the `uiType`, and whichever constraints
//! the hint supplies that make sense for that type. Hints that do not fit the
//! literal are ignored rather than forced.

use scadform_schema::{Choice, Component, ParamType, ParamValue, Parameter, UiType};

use crate::annotation::{detect_unit, Annotation};
use crate::hint::{ChoiceToken, Hint, LabeledToken, RangeHint};
use crate::literal::{is_integral_literal, Literal};

/// Word pairs that turn a two-entry string choice into a toggle
const TOGGLE_PAIRS: &[[&str; 2]] = &[["yes", "no"], ["true", "false"], ["on", "off"]];

/// Build the parameter for one declaration
pub fn resolve(name: &str, literal: Literal, annotation: &Annotation) -> Parameter {
    let mut parameter = match literal {
        Literal::Boolean(value) => Parameter::new(
            name,
            ParamType::Boolean,
            UiType::Toggle,
            ParamValue::Boolean(value),
        ),
        Literal::Integer(value) => numeric(name, value as f64, Some(value), &annotation.hint),
        Literal::Number(value) => numeric(name, value, None, &annotation.hint),
        Literal::Text(value) => text(name, value, &annotation.hint),
        Literal::Vector(values) => vector(name, values, &annotation.hint),
        Literal::Raw(source) => {
            Parameter::new(name, ParamType::Raw, UiType::Raw, ParamValue::Text(source))
        }
    };

    parameter.description = match (&annotation.hint, parameter.param_type) {
        // the number was the limit, not a description
        (Hint::LengthLimit(_), ParamType::String) => annotation.leading_text.clone(),
        _ => annotation.description().to_string(),
    };

    if matches!(
        parameter.param_type,
        ParamType::Integer | ParamType::Number | ParamType::Vector
    ) {
        if let Some(unit) = detect_unit(&parameter.description) {
            if let Some(components) = parameter.components.as_mut() {
                for component in components {
                    component.unit = Some(unit.clone());
                }
            }
            parameter.unit = Some(unit);
        }
    }

    parameter.dependency = annotation.dependency.clone();
    parameter
}

fn numeric(name: &str, default: f64, exact: Option<i64>, hint: &Hint) -> Parameter {
    let integral = exact.is_some();
    let mut parameter = match hint {
        Hint::Range(range) => slider(name, default, integral && range.integral, range),
        Hint::Choices(tokens) => match single_number(tokens) {
            Some((maximum, whole)) => {
                let range = RangeHint {
                    minimum: 0.0,
                    maximum,
                    step: None,
                    integral: whole,
                };
                slider(name, default, integral && whole, &range)
            }
            None => {
                let integral = integral && tokens.iter().all(is_integral_token);
                let choices = tokens
                    .iter()
                    .map(|t| Choice::written(choice_value(t, integral), t.text.clone()))
                    .collect();
                select(name, number_value(default, integral), integral, choices)
            }
        },
        Hint::LabeledChoices(entries) => {
            let integral = integral && entries.iter().all(|e| is_integral_token(&e.value));
            let choices = labeled(entries, |t| choice_value(t, integral));
            select(name, number_value(default, integral), integral, choices)
        }
        _ => Parameter::new(
            name,
            number_type(integral),
            UiType::Input,
            number_value(default, integral),
        ),
    };

    // keep the literal exact where the float round trip would not
    if let (Some(exact), ParamValue::Integer(_)) = (exact, &parameter.default) {
        parameter.default = ParamValue::Integer(exact);
    }
    parameter
}

fn slider(name: &str, default: f64, integral: bool, range: &RangeHint) -> Parameter {
    let mut parameter = Parameter::new(
        name,
        number_type(integral),
        UiType::Slider,
        number_value(default, integral),
    );
    parameter.minimum = Some(range.minimum);
    parameter.maximum = Some(range.maximum);
    parameter.step = range.step;
    parameter
}

fn select(name: &str, default: ParamValue, integral: bool, choices: Vec<Choice>) -> Parameter {
    let mut parameter = Parameter::new(name, number_type(integral), UiType::Select, default);
    parameter.choices = Some(choices);
    parameter
}

fn text(name: &str, default: String, hint: &Hint) -> Parameter {
    let mut parameter = match hint {
        Hint::Choices(tokens) => {
            let ui_type = if is_toggle_pair(tokens) {
                UiType::Toggle
            } else {
                UiType::Select
            };
            let mut parameter = Parameter::new(name, ParamType::String, ui_type, default.into());
            parameter.choices = Some(
                tokens
                    .iter()
                    .map(|t| Choice::plain(ParamValue::Text(t.text.clone())))
                    .collect(),
            );
            parameter
        }
        Hint::LabeledChoices(entries) => {
            let mut parameter =
                Parameter::new(name, ParamType::String, UiType::Select, default.into());
            parameter.choices = Some(labeled(entries, |t| ParamValue::Text(t.text.clone())));
            parameter
        }
        Hint::LengthLimit(limit) => {
            let mut parameter =
                Parameter::new(name, ParamType::String, UiType::Input, default.into());
            parameter.max_length = Some(*limit);
            parameter
        }
        Hint::Color => Parameter::new(name, ParamType::Color, UiType::Color, default.into()),
        Hint::File => Parameter::new(name, ParamType::String, UiType::File, default.into()),
        _ => Parameter::new(name, ParamType::String, UiType::Input, default.into()),
    };

    if parameter.ui_type == UiType::Input && is_color_name(name) && is_hex_color(&parameter.default)
    {
        parameter.param_type = ParamType::Color;
        parameter.ui_type = UiType::Color;
    }
    parameter
}

fn vector(name: &str, values: Vec<ParamValue>, hint: &Hint) -> Parameter {
    let range = match hint {
        Hint::Range(range) => Some(*range),
        _ => None,
    };

    let components = values
        .iter()
        .enumerate()
        .map(|(i, value)| Component {
            label: Component::label_for(i),
            default: value.clone(),
            minimum: range.map(|r| r.minimum),
            maximum: range.map(|r| r.maximum),
            step: range.and_then(|r| r.step),
            unit: None,
        })
        .collect();

    let dimension = values.len();
    let mut parameter = Parameter::new(
        name,
        ParamType::Vector,
        UiType::Vector,
        ParamValue::Vector(values),
    );
    parameter.dimension = Some(dimension);
    parameter.components = Some(components);
    if let Some(range) = range {
        parameter.minimum = Some(range.minimum);
        parameter.maximum = Some(range.maximum);
        parameter.step = range.step;
    }
    parameter
}

fn labeled(entries: &[LabeledToken], value: impl Fn(&ChoiceToken) -> ParamValue) -> Vec<Choice> {
    entries
        .iter()
        .map(|e| Choice::labeled(value(&e.value), e.label.clone()))
        .collect()
}

fn number_type(integral: bool) -> ParamType {
    if integral {
        ParamType::Integer
    } else {
        ParamType::Number
    }
}

fn number_value(value: f64, integral: bool) -> ParamValue {
    if integral {
        ParamValue::Integer(value as i64)
    } else {
        ParamValue::Number(value)
    }
}

/// Numeric tokens become numbers, anything else stays text
fn choice_value(token: &ChoiceToken, integral: bool) -> ParamValue {
    match token.number() {
        Some(n) => number_value(n, integral),
        None => ParamValue::Text(token.text.clone()),
    }
}

fn is_integral_token(token: &ChoiceToken) -> bool {
    !token.quoted && is_integral_literal(&token.text)
}

/// `[10]`: one numeric token, read as an upper bound
fn single_number(tokens: &[ChoiceToken]) -> Option<(f64, bool)> {
    match tokens {
        [only] => only.number().map(|n| (n, is_integral_token(only))),
        _ => None,
    }
}

fn is_toggle_pair(tokens: &[ChoiceToken]) -> bool {
    let [a, b] = tokens else {
        return false;
    };
    let (a, b) = (a.text.to_ascii_lowercase(), b.text.to_ascii_lowercase());
    TOGGLE_PAIRS
        .iter()
        .any(|[x, y]| (a == *x && b == *y) || (a == *y && b == *x))
}

fn is_color_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("color") || name.contains("colour")
}

fn is_hex_color(value: &ParamValue) -> bool {
    let Some(hex) = value.as_str().and_then(|s| s.strip_prefix('#')) else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit())
}
