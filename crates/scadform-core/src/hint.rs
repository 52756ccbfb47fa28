//! Hint grammar
//!
//! Parses the bracketed part of an annotation comment into a [`Hint`]. The
//! bracket body is matched against a small PEG grammar (`hint.pest`); shapes
//! the grammar accepts but that are ambiguous in meaning are reported as
//! [`Hint::Ambiguous`] rather than guessed at.
//!
//! | Comment                    | Hint                  |
//! |----------------------------|-----------------------|
//! | `[10:100]`                 | `Range`               |
//! | `[0:0.5:10]`               | `Range` with step     |
//! | `[round, square]`          | `Choices`             |
//! | `[0:Small, 1:Large]`       | `LabeledChoices`      |
//! | `[color]` / `[file]`       | `Color` / `File`      |
//! | `8` (no brackets)          | `LengthLimit`         |
//! | `[1:10mm, 2:16mm, 3:20mm]` | `Ambiguous`           |

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::literal::{is_integral_literal, parse_number};

#[derive(Parser)]
#[grammar = "hint.pest"]
struct HintGrammar;

/// Structured meaning of an annotation comment
#[derive(Debug, Clone, PartialEq)]
pub enum Hint {
    /// No structured annotation
    None,
    /// `[min:max]` or `[min:step:max]`
    Range(RangeHint),
    /// `[a, b, c]`
    Choices(Vec<ChoiceToken>),
    /// `[value:label, ...]`
    LabeledChoices(Vec<LabeledToken>),
    /// A bare whole number, read as a text length limit on strings
    LengthLimit(usize),
    /// `[color]`
    Color,
    /// `[file]`
    File,
    /// A `[` that is never closed; the whole comment is ignored
    Unterminated(String),
    /// A bracket whose shape is neither a range nor a choice list
    Ambiguous(String),
}

/// Numeric bounds from a range hint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeHint {
    /// Lower bound
    pub minimum: f64,
    /// Upper bound
    pub maximum: f64,
    /// Step, for the three-part form
    pub step: Option<f64>,
    /// All bounds written as whole numbers
    pub integral: bool,
}

/// One entry of a choice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceToken {
    /// Entry text, unquoted and trimmed
    pub text: String,
    /// Whether the entry was written in double quotes
    pub quoted: bool,
}

/// One `value:label` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledToken {
    /// Stored value
    pub value: ChoiceToken,
    /// Displayed label
    pub label: String,
}

impl ChoiceToken {
    /// Numeric value of an unquoted entry
    pub fn number(&self) -> Option<f64> {
        if self.quoted {
            None
        } else {
            parse_number(&self.text)
        }
    }
}

/// Parse the text between `[` and `]`
pub fn parse_bracket(content: &str) -> Hint {
    let content = content.trim();
    if content.is_empty() {
        return Hint::None;
    }

    match content.to_ascii_lowercase().as_str() {
        "color" | "colour" => return Hint::Color,
        "file" => return Hint::File,
        _ => {}
    }

    let Some(root) = HintGrammar::parse(Rule::hint, content)
        .ok()
        .and_then(|mut pairs| pairs.next())
    else {
        return Hint::Ambiguous(content.to_string());
    };

    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::range => {
                return range_hint(pair).unwrap_or_else(|| Hint::Ambiguous(content.to_string()))
            }
            Rule::choices => return choice_hint(content, pair),
            _ => {}
        }
    }
    Hint::Ambiguous(content.to_string())
}

fn range_hint(pair: Pair<Rule>) -> Option<Hint> {
    let tokens: Vec<&str> = pair.into_inner().map(|p| p.as_str()).collect();
    let values = tokens
        .iter()
        .map(|t| parse_number(t))
        .collect::<Option<Vec<f64>>>()?;
    let integral = tokens.iter().all(|t| is_integral_literal(t));

    let (minimum, step, maximum) = match values.as_slice() {
        [min, max] => (*min, None, *max),
        [min, step, max] => (*min, Some(*step), *max),
        _ => return None,
    };

    Some(Hint::Range(RangeHint {
        minimum,
        maximum,
        step,
        integral,
    }))
}

fn choice_hint(content: &str, pair: Pair<Rule>) -> Hint {
    let mut plain = Vec::new();
    let mut labeled = Vec::new();

    for choice in pair.into_inner() {
        let Some(inner) = choice.into_inner().next() else {
            continue;
        };
        match inner.as_rule() {
            Rule::plain => {
                if let Some(token) = inner.into_inner().next() {
                    plain.push(choice_token(token));
                }
            }
            Rule::labeled => {
                let mut parts = inner.into_inner();
                if let (Some(value), Some(label)) = (parts.next(), parts.next()) {
                    labeled.push(LabeledToken {
                        value: choice_token(value),
                        label: choice_token(label).text,
                    });
                }
            }
            _ => {}
        }
    }

    match (plain.is_empty(), labeled.is_empty()) {
        (false, true) => Hint::Choices(plain),
        (true, false) if is_numbered_suffix_list(content, &labeled) => {
            Hint::Ambiguous(content.to_string())
        }
        (true, false) => Hint::LabeledChoices(labeled),
        _ => Hint::Ambiguous(content.to_string()),
    }
}

fn choice_token(pair: Pair<Rule>) -> ChoiceToken {
    match pair.as_rule() {
        Rule::quoted => ChoiceToken {
            text: pair
                .into_inner()
                .next()
                .map(|inner| inner.as_str().to_string())
                .unwrap_or_default(),
            quoted: true,
        },
        _ => ChoiceToken {
            text: pair.as_str().trim().to_string(),
            quoted: false,
        },
    }
}

/// `[1:10mm, 2:16mm, 3:20mm]`: numeric values with unit-suffixed numeric
/// labels across four or more colon segments. Could be a labeled list or a
/// malformed range; left unparsed.
fn is_numbered_suffix_list(content: &str, labeled: &[LabeledToken]) -> bool {
    content.split(':').count() >= 4
        && labeled.iter().all(|t| t.value.number().is_some())
        && labeled.iter().any(|t| {
            t.label.starts_with(|c: char| c.is_ascii_digit()) && parse_number(&t.label).is_none()
        })
}
