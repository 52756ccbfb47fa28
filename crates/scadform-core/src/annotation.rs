//! Annotation comments
//!
//! Splits the comments attached to a declaration into their parts: the
//! bracketed hint, an `@depends(...)` rule, and whatever free text is left
//! over for the description.

use regex::Regex;
use std::sync::OnceLock;

use scadform_schema::{Dependency, Operator};

use crate::hint::{parse_bracket, Hint};
use crate::literal::parse_number;

/// Units recognized at the end of a description
const UNITS: &[&str] = &[
    "mm", "cm", "m", "inch", "inches", "ft", "deg", "degrees", "°", "rad", "%", "px", "pt", "g",
    "kg", "s", "ms",
];

/// The parsed comments of one declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Structured hint from the inline comment
    pub hint: Hint,
    /// Inline comment text left after removing the hint and dependency
    pub inline_text: String,
    /// Leading comment text left after removing the dependency
    pub leading_text: String,
    /// Visibility rule, inline comment first
    pub dependency: Option<Dependency>,
}

impl Annotation {
    /// Parse the inline and leading comments of a declaration
    pub fn parse(inline: Option<&str>, leading: Option<&str>) -> Self {
        let (inline, inline_dependency) = take_dependency(inline.unwrap_or_default());
        let (leading, leading_dependency) = take_dependency(leading.unwrap_or_default());
        let (hint, inline_text) = split_hint(&inline);

        Self {
            hint,
            inline_text,
            leading_text: leading,
            dependency: inline_dependency.or(leading_dependency),
        }
    }

    /// Description text: the inline remainder, or the leading comment when
    /// the inline comment has nothing to say
    pub fn description(&self) -> &str {
        if self.inline_text.is_empty() {
            &self.leading_text
        } else {
            &self.inline_text
        }
    }

    /// Whether the bracket could not be used
    pub fn hint_problem(&self) -> Option<&str> {
        match &self.hint {
            Hint::Unterminated(text) | Hint::Ambiguous(text) => Some(text),
            _ => None,
        }
    }
}

/// Remove an `@depends(name OP value)` token, returning the rest of the text
fn take_dependency(comment: &str) -> (String, Option<Dependency>) {
    static DEPENDS_RE: OnceLock<Regex> = OnceLock::new();
    let re = DEPENDS_RE.get_or_init(|| {
        Regex::new(r"(?i)@depends\s*\(\s*(\$?[A-Za-z_][A-Za-z0-9_]*)\s*(==|!=)\s*([^)]*?)\s*\)")
            .unwrap()
    });

    let Some(cap) = re.captures(comment) else {
        return (comment.trim().to_string(), None);
    };

    let dependency = match (cap.get(1), cap.get(2).and_then(|m| Operator::from_token(m.as_str())))
    {
        (Some(name), Some(operator)) => {
            let value = cap.get(3).map(|m| m.as_str()).unwrap_or_default();
            Some(Dependency::new(name.as_str(), operator, strip_quotes(value)))
        }
        _ => None,
    };

    let rest = re.replace(comment, " ");
    (collapse_spaces(&rest), dependency)
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a leading `[...]` hint from the rest of an inline comment
fn split_hint(comment: &str) -> (Hint, String) {
    let comment = comment.trim();

    let Some(body) = comment.strip_prefix('[') else {
        if !comment.is_empty() && comment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(limit) = comment.parse::<usize>() {
                return (Hint::LengthLimit(limit), comment.to_string());
            }
        }
        return (Hint::None, comment.to_string());
    };

    match closing_bracket(body) {
        Some(end) => (
            parse_bracket(&body[..end]),
            body[end + 1..].trim().to_string(),
        ),
        None => (Hint::Unterminated(comment.to_string()), String::new()),
    }
}

/// Index of the first `]` outside double quotes
fn closing_bracket(body: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in body.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ']' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Find a unit in the last word of a description
///
/// The single-letter units (`m`, `g`, `s`) only count when written in
/// parentheses or brackets, or directly after a number: `Length (m)`,
/// `Delay 5 s`.
pub fn detect_unit(description: &str) -> Option<String> {
    let mut words = description.split_whitespace().rev();
    let raw = words.next()?;
    let word = raw
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!'))
        .trim_start_matches(|c: char| matches!(c, '(' | '['))
        .trim_end_matches(|c: char| matches!(c, ')' | ']'));

    let unit = UNITS.iter().find(|unit| unit.eq_ignore_ascii_case(word))?;
    if unit.len() == 1 && unit.bytes().all(|b| b.is_ascii_alphabetic()) {
        let enclosed = raw.starts_with(|c: char| matches!(c, '(' | '['));
        let after_number = words.next().and_then(parse_number).is_some();
        if !enclosed && !after_number {
            return None;
        }
    }
    Some(unit.to_string())
}
