//! scadform-core - Customizer parameters from OpenSCAD source
//!
//! Core library for scadform, turning annotated OpenSCAD source into a
//! [`ParameterSchema`] that a form renderer can present.
//!
//! # Example
//!
//! ```
//! use scadform_core::extract;
//! use scadform_schema::{ParamType, UiType};
//!
//! let source = r#"
//! /* [Dimensions] */
//! width = 50; // [10:100] Box width
//! shape = "round"; // [round, square, hexagon]
//! "#;
//!
//! let schema = extract(source);
//! let width = &schema.parameters["width"];
//! assert_eq!(width.ui_type, UiType::Slider);
//! assert_eq!(width.param_type, ParamType::Integer);
//! assert_eq!(width.group.as_deref(), Some("Dimensions"));
//! assert_eq!(schema.parameters["shape"].ui_type, UiType::Select);
//! ```

pub mod annotation;
pub mod assembler;
pub mod diagnostics;
pub mod error;
pub mod hint;
pub mod literal;
pub mod scanner;
pub mod section;
pub mod widget;

// Re-export main types and functions
pub use assembler::{Extraction, SchemaAssembler};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use scadform_schema::ParameterSchema;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract the parameter schema from source text.
///
/// Total over all inputs: malformed statements and annotations are skipped.
pub fn extract(source: &str) -> ParameterSchema {
    extract_with_diagnostics(source).schema
}

/// Extract the parameter schema and report what was skipped
pub fn extract_with_diagnostics(source: &str) -> Extraction {
    let mut assembler = SchemaAssembler::new();
    for event in scanner::scan(source) {
        assembler.apply(event);
    }
    let extraction = assembler.finish();
    tracing::debug!(
        parameters = extraction.schema.parameters.len(),
        hidden = extraction.schema.hidden_parameters.len(),
        groups = extraction.schema.groups.len(),
        diagnostics = extraction.diagnostics.len(),
        "extraction finished"
    );
    extraction
}

/// Extract and render the schema as JSON
///
/// # Errors
///
/// Returns [`Error::Json`] if serialization fails.
pub fn extract_json(source: &str, pretty: bool) -> Result<String> {
    let schema = extract(source);
    let json = if pretty {
        serde_json::to_string_pretty(&schema)?
    } else {
        serde_json::to_string(&schema)?
    };
    Ok(json)
}
