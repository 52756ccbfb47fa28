//! Source Scanner
//!
//! Walks OpenSCAD source line by line and yields the events the rest of the
//! engine consumes:
//!
//! - Section markers: `/* [Dimensions] */`
//! - Candidate declarations: `name = <literal>; // trailing comment`
//! - Declarations that had to be skipped because the statement is malformed
//!
//! Only declarations at block depth zero are candidates. Anything inside a
//! module or function body is tracked for brace balance and otherwise
//! ignored.
//!
//! # Example
//!
//! ```
//! use scadform_core::scanner::{scan, ScanEvent};
//!
//! let events = scan("/* [Size] */\nwidth = 50; // [10:100]\nmodule m() { x = 1; }\n");
//! assert_eq!(events.len(), 2);
//! assert!(matches!(events[0], ScanEvent::Section { .. }));
//! ```

use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

use crate::error::LiteralError;

/// Block nesting of the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Outside any braces; declarations here are candidates
    #[default]
    TopLevel,
    /// Inside this many unclosed braces
    Nested(usize),
}

impl Scope {
    fn enter(self) -> Self {
        match self {
            Scope::TopLevel => Scope::Nested(1),
            Scope::Nested(depth) => Scope::Nested(depth + 1),
        }
    }

    // A stray `}` at top level is ignored rather than going negative.
    fn leave(self) -> Self {
        match self {
            Scope::TopLevel | Scope::Nested(1) => Scope::TopLevel,
            Scope::Nested(depth) => Scope::Nested(depth - 1),
        }
    }

    /// Check whether declarations at this scope are candidates
    pub fn is_top_level(self) -> bool {
        self == Scope::TopLevel
    }
}

/// Lexical mode carried from one line to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Ordinary code
    Code,
    /// Inside an unclosed `/* ... */`
    BlockComment,
}

/// Something the scanner found in the source
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// A section marker changing the current section
    Section {
        /// Trimmed label between the brackets
        label: String,
        /// 1-indexed source line
        line: usize,
    },
    /// A top-level declaration that may become a parameter
    Declaration(Declaration),
    /// A top-level declaration whose statement could not be delimited
    Dropped {
        /// Declared name
        name: String,
        /// 1-indexed source line
        line: usize,
        /// What was wrong with the statement
        reason: LiteralError,
    },
}

/// A top-level `name = value;` statement with its attached comments
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Declared name, including a leading `$` for special variables
    pub name: String,
    /// Right-hand side text between `=` and `;`, trimmed
    pub value: String,
    /// Text after `//` on the same line, if any
    pub inline_comment: Option<String>,
    /// Full-line `//` comment directly above, if any
    pub leading_comment: Option<String>,
    /// 1-indexed source line
    pub line: usize,
}

/// Line scanner state
struct Scanner {
    /// Brace nesting
    scope: Scope,
    /// Whether we are inside a block comment
    mode: Mode,
    /// Full-line comment seen on the previous line
    leading_comment: Option<String>,
    /// Collected events
    events: Vec<ScanEvent>,
}

impl Scanner {
    fn new() -> Self {
        Self {
            scope: Scope::TopLevel,
            mode: Mode::Code,
            leading_comment: None,
            events: Vec::new(),
        }
    }

    fn process_line(&mut self, number: usize, line: &str) {
        if line.trim().is_empty() {
            self.leading_comment = None;
            return;
        }

        if self.mode == Mode::BlockComment {
            self.leading_comment = None;
            if let Some(rest) = self.track_braces(line) {
                self.process_code(number, rest, false);
            }
            return;
        }

        self.process_code(number, line, true);
    }

    /// Handle one stretch of code, continuing after every statement boundary
    /// so that several statements on a line are all seen
    fn process_code(&mut self, number: usize, code: &str, line_start: bool) {
        let mut text = code;
        let mut line_start = line_start;

        loop {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return;
            }

            if self.scope.is_top_level() {
                if let Some((label, after)) = section_marker(trimmed) {
                    trace!(line = number, label = %label, "section marker");
                    self.leading_comment = None;
                    self.events.push(ScanEvent::Section {
                        label,
                        line: number,
                    });
                    text = after;
                    line_start = false;
                    continue;
                }

                if let Some(comment) = trimmed.strip_prefix("//") {
                    // only a comment on a line of its own leads the next one
                    self.leading_comment = line_start.then(|| comment.trim().to_string());
                    return;
                }

                if let Some((name, rest)) = declaration_head(trimmed) {
                    let leading = self.leading_comment.take();
                    match self.take_declaration(number, name, rest, leading) {
                        Some(tail) => {
                            text = tail;
                            line_start = false;
                            continue;
                        }
                        None => return,
                    }
                }
            }

            self.leading_comment = None;
            match self.track_braces(text) {
                Some(rest) => {
                    text = rest;
                    line_start = false;
                }
                None => return,
            }
        }
    }

    /// Record one declaration, returning the code that follows it on the
    /// same line when there is any
    fn take_declaration<'a>(
        &mut self,
        number: usize,
        name: &str,
        rest: &'a str,
        leading_comment: Option<String>,
    ) -> Option<&'a str> {
        match split_statement(rest) {
            Ok((value, tail)) => {
                let (code, comment) = split_line_comment(tail);
                let (inline_comment, next) = if code.trim().is_empty() {
                    (comment.map(|c| c.trim().to_string()), None)
                } else {
                    // the trailing comment belongs to the last statement
                    (None, Some(tail))
                };
                trace!(line = number, name, "declaration");
                self.events.push(ScanEvent::Declaration(Declaration {
                    name: name.to_string(),
                    value: value.trim().to_string(),
                    inline_comment,
                    leading_comment,
                    line: number,
                }));
                next
            }
            Err(reason) => {
                trace!(line = number, name, %reason, "declaration dropped");
                let mut remaining = Some(rest);
                while let Some(code) = remaining {
                    remaining = self.track_braces(code);
                }
                self.events.push(ScanEvent::Dropped {
                    name: name.to_string(),
                    line: number,
                    reason,
                });
                None
            }
        }
    }

    /// Update brace depth and block-comment mode from a stretch of code.
    ///
    /// Stops at the first point where a new top-level statement may begin
    /// (after a `;`, a closing `}` or a block comment) and returns the rest.
    fn track_braces<'a>(&mut self, code: &'a str) -> Option<&'a str> {
        let mut rest = code;
        loop {
            match self.mode {
                Mode::BlockComment => {
                    let end = rest.find("*/")?;
                    self.mode = Mode::Code;
                    rest = &rest[end + 2..];
                    if self.scope.is_top_level() {
                        return Some(rest);
                    }
                }
                Mode::Code => {
                    let bytes = rest.as_bytes();
                    let mut in_string = false;
                    let mut escaped = false;
                    let mut groups: usize = 0;
                    let mut comment_start = None;

                    for (i, c) in rest.char_indices() {
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
                            '(' | '[' => groups += 1,
                            ')' | ']' => groups = groups.saturating_sub(1),
                            '{' => self.scope = self.scope.enter(),
                            '}' => {
                                let was_nested = !self.scope.is_top_level();
                                self.scope = self.scope.leave();
                                if was_nested && self.scope.is_top_level() {
                                    return Some(&rest[i + 1..]);
                                }
                            }
                            ';' if groups == 0 && self.scope.is_top_level() => {
                                return Some(&rest[i + 1..]);
                            }
                            '/' if bytes.get(i + 1) == Some(&b'/') => return None,
                            '/' if bytes.get(i + 1) == Some(&b'*') => {
                                comment_start = Some(i + 2);
                                break;
                            }
                            _ => {}
                        }
                    }

                    let start = comment_start?;
                    self.mode = Mode::BlockComment;
                    rest = &rest[start..];
                }
            }
        }
    }
}

/// Match a section marker like `/* [Dimensions] */` at the start of the
/// text, returning the label and whatever follows the marker
fn section_marker(text: &str) -> Option<(String, &str)> {
    static SECTION_RE: OnceLock<Regex> = OnceLock::new();
    let re = SECTION_RE
        .get_or_init(|| Regex::new(r"^/\*+\s*\[\s*([^\[\]]*?)\s*\]\s*\*+/").unwrap());

    let cap = re.captures(text)?;
    let label = cap.get(1)?.as_str();
    if label.is_empty() {
        return None;
    }
    Some((label.to_string(), &text[cap.get(0)?.end()..]))
}

/// Match `name =` at the start of the text, returning the name and the text after `=`
fn declaration_head(line: &str) -> Option<(&str, &str)> {
    static DECL_RE: OnceLock<Regex> = OnceLock::new();
    let re = DECL_RE.get_or_init(|| Regex::new(r"^\s*(\$?[A-Za-z_][A-Za-z0-9_]*)\s*=").unwrap());

    let cap = re.captures(line)?;
    let name = cap.get(1)?.as_str();
    let rest = &line[cap.get(0)?.end()..];
    // `a == b` is a comparison, not a declaration
    if rest.starts_with('=') {
        return None;
    }
    Some((name, rest))
}

/// Split `value; tail` at the terminating semicolon
fn split_statement(text: &str) -> Result<(&str, &str), LiteralError> {
    let bytes = text.as_bytes();
    let mut depth: usize = 0;
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
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => {
                if depth == 0 {
                    return Err(LiteralError::UnbalancedBrackets);
                }
                depth -= 1;
            }
            ';' if depth == 0 => return Ok((&text[..i], &text[i + 1..])),
            '/' if bytes.get(i + 1) == Some(&b'/') => break,
            _ => {}
        }
    }

    if in_string {
        Err(LiteralError::UnterminatedString)
    } else if depth > 0 {
        Err(LiteralError::UnbalancedBrackets)
    } else {
        Err(LiteralError::MissingTerminator)
    }
}

/// Split code from a trailing `//` comment, ignoring `//` inside strings
fn split_line_comment(text: &str) -> (&str, Option<&str>) {
    let bytes = text.as_bytes();
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
        if c == '"' {
            in_string = true;
        } else if c == '/' && bytes.get(i + 1) == Some(&b'/') {
            return (&text[..i], Some(&text[i + 2..]));
        }
    }

    (text, None)
}

/// Scan source text into section markers and candidate declarations.
///
/// Never fails: malformed statements become [`ScanEvent::Dropped`] and the
/// scan resumes on the next line.
pub fn scan(source: &str) -> Vec<ScanEvent> {
    let mut scanner = Scanner::new();
    for (index, line) in source.lines().enumerate() {
        scanner.process_line(index + 1, line);
    }
    scanner.events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations(source: &str) -> Vec<Declaration> {
        scan(source)
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::Declaration(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_scope_transitions() {
        let scope = Scope::TopLevel.enter().enter();
        assert_eq!(scope, Scope::Nested(2));
        assert_eq!(scope.leave().leave(), Scope::TopLevel);
        assert_eq!(Scope::TopLevel.leave(), Scope::TopLevel);
    }

    #[test]
    fn test_simple_declaration() {
        let decls = declarations("width = 50; // [10:100] Box width");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "width");
        assert_eq!(decls[0].value, "50");
        assert_eq!(decls[0].inline_comment.as_deref(), Some("[10:100] Box width"));
        assert_eq!(decls[0].line, 1);
    }

    #[test]
    fn test_special_variable() {
        let decls = declarations("$fn = 64;");
        assert_eq!(decls[0].name, "$fn");
    }

    #[test]
    fn test_leading_comment() {
        let decls = declarations("// Wall thickness\nwall = 2;\n\n// detached\n\nother = 1;");
        assert_eq!(decls[0].leading_comment.as_deref(), Some("Wall thickness"));
        assert_eq!(decls[1].leading_comment, None);
    }

    #[test]
    fn test_nested_declarations_skipped() {
        let source = r#"
a = 1;
module box() {
    inner = 2;
    if (true) {
        deeper = 3;
    }
}
b = 4;
"#;
        let names: Vec<_> = declarations(source).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_braces_in_strings_and_comments_ignored() {
        let source = "label = \"{\";\n// }\n/* { */\nnext = 1;";
        let names: Vec<_> = declarations(source).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["label", "next"]);
    }

    #[test]
    fn test_multiline_block_comment() {
        let source = "/*\nhidden = 1;\n{\n*/\nshown = 2;";
        let names: Vec<_> = declarations(source).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["shown"]);
    }

    #[test]
    fn test_section_markers() {
        let events = scan("/*[Dimensions]*/\n/* [ Print Settings ] */\n/* plain */");
        let labels: Vec<_> = events
            .into_iter()
            .filter_map(|e| match e {
                ScanEvent::Section { label, .. } => Some(label),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Dimensions", "Print Settings"]);
    }

    #[test]
    fn test_unterminated_vector_dropped() {
        let events = scan("broken = [10, 20\nok = 5;");
        assert!(matches!(
            events[0],
            ScanEvent::Dropped {
                reason: LiteralError::UnbalancedBrackets,
                ..
            }
        ));
        assert!(matches!(&events[1], ScanEvent::Declaration(d) if d.name == "ok"));
    }

    #[test]
    fn test_unterminated_string_dropped() {
        let events = scan("name = \"abc;\nok = 5;");
        assert!(matches!(
            events[0],
            ScanEvent::Dropped {
                reason: LiteralError::UnterminatedString,
                ..
            }
        ));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_comment_inside_string_is_not_comment() {
        let decls = declarations("url = \"http://example.com\"; // site");
        assert_eq!(decls[0].value, "\"http://example.com\"");
        assert_eq!(decls[0].inline_comment.as_deref(), Some("site"));
    }

    #[test]
    fn test_comparison_is_not_declaration() {
        assert!(declaration_head("a == b;").is_none());
        assert!(declarations("function f(x) = x * 2;").is_empty());
    }

    #[test]
    fn test_stray_closing_brace_recovers() {
        let names: Vec<_> = declarations("}\n}\na = 1;")
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_declaration_after_block_comment() {
        let decls = declarations("/* note */ x = 5; // [0:10]");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "x");
        assert_eq!(decls[0].inline_comment.as_deref(), Some("[0:10]"));
    }

    #[test]
    fn test_declaration_after_multiline_block_comment() {
        let decls = declarations("/* a\n b */ y = 5; // [0:10]\nz = 1;");
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["y", "z"]);
        assert_eq!(decls[0].line, 2);
        assert_eq!(decls[0].inline_comment.as_deref(), Some("[0:10]"));
    }

    #[test]
    fn test_section_marker_followed_by_declaration() {
        let events = scan("/* [Dims] */ w = 3;");
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], ScanEvent::Section { label, .. } if label == "Dims"));
        assert!(matches!(&events[1], ScanEvent::Declaration(d) if d.name == "w"));
    }

    #[test]
    fn test_several_statements_on_one_line() {
        let decls = declarations("a = 1; b = 2; // [0:5] last");
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(decls[0].inline_comment, None);
        assert_eq!(decls[1].inline_comment.as_deref(), Some("[0:5] last"));
        assert_eq!(decls[1].value, "2");
    }

    #[test]
    fn test_declaration_after_other_statement() {
        let decls = declarations("cube(1); x = 5;\nmodule m() { inner = 1; } y = 2;");
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_for_loop_semicolons_are_not_boundaries() {
        let events = scan("for (i = 0; i < 3; i = i + 1) cube(i);\nok = 1;");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ScanEvent::Declaration(d) if d.name == "ok"));
    }

    #[test]
    fn test_trailing_comment_after_code_does_not_lead() {
        let decls = declarations("cube(1); // not a description\nx = 5;");
        assert_eq!(decls[0].leading_comment, None);
    }

    #[test]
    fn test_crlf_line_endings() {
        let decls = declarations("a = 1; // one\r\nb = 2;\r\n");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].inline_comment.as_deref(), Some("one"));
    }
}
