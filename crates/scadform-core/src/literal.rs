//! Value Classifier
//!
//! Classifies the right-hand side of a declaration by its literal syntax.
//! Nothing is evaluated: a value is either one of the literal forms below or
//! it is kept verbatim as [`Literal::Raw`].
//!
//! | Source              | Classification          |
//! |---------------------|-------------------------|
//! | `true` / `false`    | `Boolean`               |
//! | `"text"`            | `Text`                  |
//! | `50`, `-3`          | `Integer`               |
//! | `2.5`, `1e3`        | `Number`                |
//! | `[1, 2.5, -3]`, `[]`| `Vector`                |
//! | anything else       | `Raw`                   |

use regex::Regex;
use std::sync::OnceLock;

use scadform_schema::ParamValue;

use crate::error::LiteralError;

/// A classified right-hand side
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Unquoted `true` / `false`
    Boolean(bool),
    /// Whole number literal
    Integer(i64),
    /// Fractional or exponent number literal
    Number(f64),
    /// Quoted string, unescaped
    Text(String),
    /// List of numeric literals; elements are `Integer` or `Number`
    Vector(Vec<ParamValue>),
    /// Well-formed but not a literal we can edit; kept verbatim
    Raw(String),
}

/// Classify a right-hand side.
///
/// # Errors
///
/// Returns a [`LiteralError`] when the text is empty or structurally broken
/// (unterminated string, unbalanced brackets). Such statements are dropped.
pub fn classify(source: &str) -> Result<Literal, LiteralError> {
    let text = source.trim();
    if text.is_empty() {
        return Err(LiteralError::Empty);
    }

    match text {
        "true" => return Ok(Literal::Boolean(true)),
        "false" => return Ok(Literal::Boolean(false)),
        _ => {}
    }

    if text.starts_with('"') {
        let (value, consumed) = unquote(text)?;
        if consumed == text.len() {
            return Ok(Literal::Text(value));
        }
        check_balanced(text)?;
        return Ok(Literal::Raw(text.to_string()));
    }

    if text.starts_with('[') {
        return classify_list(text);
    }

    if let Some(literal) = classify_number(text) {
        return Ok(literal);
    }

    check_balanced(text)?;
    Ok(Literal::Raw(text.to_string()))
}

fn classify_list(text: &str) -> Result<Literal, LiteralError> {
    check_balanced(text)?;

    // `[1, 2] * 2` is an expression, not a list literal
    if closing_bracket(text) != Some(text.len() - 1) {
        return Ok(Literal::Raw(text.to_string()));
    }

    let inner = text[1..text.len() - 1].trim();
    if inner.is_empty() {
        return Ok(Literal::Vector(Vec::new()));
    }

    let mut items = Vec::new();
    for element in inner.split(',') {
        match classify_number(element.trim()) {
            Some(Literal::Integer(i)) => items.push(ParamValue::Integer(i)),
            Some(Literal::Number(n)) => items.push(ParamValue::Number(n)),
            _ => return Ok(Literal::Raw(text.to_string())),
        }
    }
    Ok(Literal::Vector(items))
}

fn classify_number(text: &str) -> Option<Literal> {
    if is_integral_literal(text) {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Literal::Integer(i));
        }
    }
    parse_number(text).map(Literal::Number)
}

/// Parse a numeric literal (decimal, signed, scientific notation)
pub fn parse_number(token: &str) -> Option<f64> {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$").unwrap()
    });

    if !re.is_match(token) {
        return None;
    }
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Check whether a numeric literal is written without fraction or exponent
pub fn is_integral_literal(token: &str) -> bool {
    let digits = token
        .strip_prefix(|c: char| c == '-' || c == '+')
        .unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Read a double-quoted string, returning its value and the bytes consumed
fn unquote(text: &str) -> Result<(String, usize), LiteralError> {
    let mut value = String::new();
    let mut escaped = false;

    for (i, c) in text.char_indices().skip(1) {
        if escaped {
            value.push(match c {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((value, i + 1));
        } else {
            value.push(c);
        }
    }

    Err(LiteralError::UnterminatedString)
}

/// Verify brackets pair up outside of strings
fn check_balanced(text: &str) -> Result<(), LiteralError> {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => stack.push(']'),
            '(' => stack.push(')'),
            '{' => stack.push('}'),
            ']' | ')' | '}' => {
                if stack.pop() != Some(c) {
                    return Err(LiteralError::UnbalancedBrackets);
                }
            }
            _ => {}
        }
    }

    if in_string {
        Err(LiteralError::UnterminatedString)
    } else if !stack.is_empty() {
        Err(LiteralError::UnbalancedBrackets)
    } else {
        Ok(())
    }
}

/// Byte index of the bracket closing the one at index 0
fn closing_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
