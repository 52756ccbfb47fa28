//! Error types for scadform-core

use thiserror::Error;

/// Errors surfaced by the fallible helpers of this crate.
///
/// Extraction itself never fails; only rendering the result can.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for scadform-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a declaration's right-hand side could not be classified
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralError {
    /// Nothing between `=` and `;`
    #[error("empty right-hand side")]
    Empty,

    /// The statement does not end with `;` on its own line
    #[error("missing terminating `;`")]
    MissingTerminator,

    /// A string literal is never closed
    #[error("unterminated string literal")]
    UnterminatedString,

    /// Brackets or parentheses do not pair up
    #[error("unbalanced brackets")]
    UnbalancedBrackets,
}
