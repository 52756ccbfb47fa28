//! scadform CLI - Command-line interface library
//!
//! This library provides the CLI functionality for scadform, including:
//! - Extract: Print the customizer parameter schema of a `.scad` file
//! - Check: Report statements and annotations extraction had to skip
//!
//! # Library Usage
//!
//! ```ignore
//! use scadform_cli::{run_cli, check_files, ExtractOptions};
//!
//! // Run the full CLI
//! run_cli()?;
//!
//! // Or use individual commands programmatically
//! extract_command(&input, None, &ExtractOptions::from_settings(&settings))?;
//! let reports = check_files(&["models/*.scad".to_string()])?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Print the schema as JSON
//! scadform extract box.scad --pretty
//!
//! # Print a readable outline
//! scadform extract box.scad --format text
//!
//! # Lint a set of models, failing on warnings
//! scadform check 'models/*.scad' --strict
//! ```

pub mod app;
pub mod config;
pub mod text;

// Re-export main entry point and types
pub use app::{
    check_command, check_files, extract_command, format_reports, render_schema, run_cli,
    ExtractOptions, FileReport,
};
pub use config::{OutputFormat, Settings};
pub use text::render_text;
