//! Extraction diagnostics
//!
//! The engine never fails, but it does recover from malformed input by
//! dropping a statement or an annotation. This module records what was
//! recovered from so tools like `scadform check` can report it. Diagnostics
//! are a side channel: they never change the produced schema.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LiteralError;

/// A diagnostic message from the extraction engine
///
/// # Example
///
/// ```
/// use scadform_core::diagnostics::{Diagnostic, Severity};
///
/// let diag = Diagnostic::new(Severity::Warning, "Hint left unparsed")
///     .with_code("W003")
///     .with_line(12)
///     .with_help("Use [min:max] or a comma-separated list");
/// assert!(diag.is_warning());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level of the diagnostic
    pub severity: Severity,

    /// The diagnostic message
    pub message: String,

    /// Diagnostic code (e.g., "W001")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Source line (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Additional help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Something in the source was ignored
    Warning,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            line: None,
            help: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// A declaration that was skipped because its value could not be read
    pub fn dropped_statement(name: &str, line: usize, reason: LiteralError) -> Self {
        Self::warning(format!("declaration `{}` skipped: {}", name, reason))
            .with_code("W001")
            .with_line(line)
    }

    /// A hint bracket that is never closed
    pub fn unterminated_hint(name: &str, line: usize) -> Self {
        Self::warning(format!("annotation of `{}` ignored: unterminated `[`", name))
            .with_code("W002")
            .with_line(line)
            .with_help("close the hint with `]`")
    }

    /// A hint whose shape is neither a range nor a choice list
    pub fn ambiguous_hint(name: &str, line: usize, hint: &str) -> Self {
        Self::warning(format!("hint `[{}]` on `{}` left unparsed", hint, name))
            .with_code("W003")
            .with_line(line)
            .with_help("use `[min:max]`, `[min:step:max]` or a comma-separated list")
    }

    /// A name declared more than once; the later declaration wins
    pub fn redeclared(name: &str, line: usize) -> Self {
        Self::info(format!("`{}` redeclared; the earlier declaration is replaced", name))
            .with_code("I004")
            .with_line(line)
    }

    /// Set the diagnostic code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the source line
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Check if this is a warning-level diagnostic
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: severity[code]: message
        write!(f, "{}", self.severity)?;
        if let Some(ref code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;

        if let Some(line) = self.line {
            write!(f, "\n  --> line {}", line)?;
        }

        if let Some(ref help) = self.help {
            write!(f, "\n  = help: {}", help)?;
        }

        Ok(())
    }
}

/// A collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_warning())
    }

    /// Get the number of warnings
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Diagnostics carrying a given code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.code.as_deref() == Some(code))
    }

    /// Get all diagnostics
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get the count
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropped_statement() {
        let diag = Diagnostic::dropped_statement("broken", 4, LiteralError::UnbalancedBrackets);
        assert!(diag.is_warning());
        assert_eq!(diag.code.as_deref(), Some("W001"));
        assert_eq!(diag.line, Some(4));
        assert!(diag.message.contains("broken"));
        assert!(diag.message.contains("unbalanced brackets"));
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
    }

    #[test]
    fn test_diagnostics_collection() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::unterminated_hint("width", 1));
        diags.push(Diagnostic::redeclared("width", 3));
        diags.push(Diagnostic::ambiguous_hint("size", 5, "1:10mm, 2:16mm, 3:20mm"));

        assert!(diags.has_warnings());
        assert_eq!(diags.warning_count(), 2);
        assert_eq!(diags.len(), 3);
        assert_eq!(diags.with_code("I004").count(), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::ambiguous_hint("size", 7, "1:2:3:4");
        let display = format!("{}", diag);
        assert!(display.contains("warning[W003]"));
        assert!(display.contains("line 7"));
        assert!(display.contains("help:"));
    }

    #[test]
    fn test_diagnostic_serialize() {
        let diag = Diagnostic::redeclared("width", 2);
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"info\""));
        assert!(json.contains("\"code\":\"I004\""));

        let restored: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, diag);
    }
}
