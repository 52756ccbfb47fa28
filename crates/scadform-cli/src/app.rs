//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use tracing::{debug, info};

use scadform_core::{extract, extract_with_diagnostics, Diagnostic, Diagnostics};
use scadform_schema::ParameterSchema;

use crate::config::{OutputFormat, Settings};
use crate::text::render_text;

#[derive(Parser)]
#[command(name = "scadform")]
#[command(
    author,
    version,
    about = "Customizer parameters from OpenSCAD source",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the parameter schema of a .scad file
    Extract {
        /// Input .scad file
        input: PathBuf,

        /// Output format (json or text)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Pretty-print JSON
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Report statements and annotations that extraction had to skip
    Check {
        /// Input files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Strict mode: fail if any warning is reported
        #[arg(long)]
        strict: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Options for the extract command, after merging flags over settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub include_hidden: bool,
}

impl ExtractOptions {
    /// Start from the configured output settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            format: settings.output.format,
            pretty: settings.output.pretty,
            include_hidden: settings.output.include_hidden,
        }
    }
}

/// Diagnostics of one checked file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path as given or matched
    pub file: String,
    /// Diagnostics in source order
    pub diagnostics: Diagnostics,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            format,
            pretty,
            compact,
            output,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?;
            let mut options = ExtractOptions::from_settings(&settings);
            if let Some(format) = format {
                options.format = format;
            }
            if pretty {
                options.pretty = true;
            }
            if compact {
                options.pretty = false;
            }
            extract_command(&input, output.as_deref(), &options)?;
        }
        Commands::Check {
            inputs,
            format,
            strict,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?;
            check_command(&inputs, format, strict || settings.check.strict)?;
        }
    }

    Ok(())
}

/// Execute the extract command
pub fn extract_command(input: &Path, output: Option<&Path>, options: &ExtractOptions) -> Result<()> {
    let source = read_source(input)?;
    let schema = extract(&source);
    info!(
        file = %input.display(),
        parameters = schema.parameters.len(),
        hidden = schema.hidden_parameters.len(),
        "extracted"
    );

    let rendered = render_schema(schema, options)?;
    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            debug!(file = %path.display(), "schema written");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Render a schema in the requested format
pub fn render_schema(mut schema: ParameterSchema, options: &ExtractOptions) -> Result<String> {
    if !options.include_hidden {
        schema.hidden_parameters.clear();
    }

    let mut rendered = match options.format {
        OutputFormat::Json if options.pretty => serde_json::to_string_pretty(&schema)
            .context("Failed to serialize schema to JSON")?,
        OutputFormat::Json => {
            serde_json::to_string(&schema).context("Failed to serialize schema to JSON")?
        }
        OutputFormat::Text => render_text(&schema, options.include_hidden)
            .context("Failed to render schema as text")?,
    };

    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Execute the check command
pub fn check_command(inputs: &[String], format: OutputFormat, strict: bool) -> Result<()> {
    let reports = check_files(inputs)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .context("Failed to serialize diagnostics to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", format_reports(&reports)),
    }

    let warnings: usize = reports.iter().map(|r| r.diagnostics.warning_count()).sum();
    if strict && warnings > 0 {
        anyhow::bail!("{} warning(s) reported in strict mode", warnings);
    }

    Ok(())
}

/// Run extraction over every input and collect diagnostics
pub fn check_files(inputs: &[String]) -> Result<Vec<FileReport>> {
    let mut reports = Vec::new();
    for path in expand_inputs(inputs)? {
        let source = read_source(&path)?;
        let extraction = extract_with_diagnostics(&source);
        debug!(
            file = %path.display(),
            diagnostics = extraction.diagnostics.len(),
            "checked"
        );
        reports.push(FileReport {
            file: path.display().to_string(),
            diagnostics: extraction.diagnostics,
        });
    }
    Ok(reports)
}

/// Human-readable rendering of check results
pub fn format_reports(reports: &[FileReport]) -> String {
    let mut output = String::new();
    let mut warnings = 0;
    let mut infos = 0;

    for report in reports {
        if report.diagnostics.is_empty() {
            output.push_str(&format!("✓ No issues found in {}\n", report.file));
            continue;
        }
        for diag in report.diagnostics.iter() {
            output.push_str(&format_diagnostic(&report.file, diag));
            output.push_str("\n\n");
            if diag.is_warning() {
                warnings += 1;
            } else {
                infos += 1;
            }
        }
    }

    if warnings + infos > 0 {
        output.push_str(&format!(
            "Found {} warning(s) and {} note(s) in {} file(s)\n",
            warnings,
            infos,
            reports.len()
        ));
    }
    output
}

/// `warning[W001]: message` followed by the location and help lines
fn format_diagnostic(file: &str, diag: &Diagnostic) -> String {
    let mut text = diag.severity.to_string();
    if let Some(code) = &diag.code {
        text.push_str(&format!("[{}]", code));
    }
    text.push_str(&format!(": {}", diag.message));
    match diag.line {
        Some(line) => text.push_str(&format!("\n  --> {}:{}", file, line)),
        None => text.push_str(&format!("\n  --> {}", file)),
    }
    if let Some(help) = &diag.help {
        text.push_str(&format!("\n  = help: {}", help));
    }
    text
}

/// Resolve plain paths and glob patterns to files
fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if !input.contains(|c: char| matches!(c, '*' | '?' | '[')) {
            paths.push(PathBuf::from(input));
            continue;
        }

        let before = paths.len();
        for entry in glob(input).with_context(|| format!("Invalid glob pattern: {}", input))? {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => eprintln!("Warning: Could not read {}", e),
            }
        }
        if paths.len() == before {
            anyhow::bail!("No files match pattern: {}", input);
        }
    }

    Ok(paths)
}

fn read_source(input: &Path) -> Result<String> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))
}
