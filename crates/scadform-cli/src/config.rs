//! Configuration Settings
//!
//! Optional `scadform.toml` read by the CLI. Every section and field has a
//! default, so a partial file (or no file) is fine.
//!
//! ```toml
//! [output]
//! format = "json"
//! pretty = true
//! include_hidden = true
//!
//! [check]
//! strict = false
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when `--config` is absent
pub const CONFIG_FILE: &str = "scadform.toml";

/// Output format for schemas and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for tool consumption
    Json,
}

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// How `extract` renders the schema
    pub output: OutputSettings,
    /// How `check` decides success
    pub check: CheckSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from an explicit path, or from `scadform.toml` in the
    /// working directory when present
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                Settings::from_toml_str(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))
            }
            None => {
                let candidate = Path::new(CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Settings::default());
                }
                let content = fs::read_to_string(candidate)
                    .with_context(|| format!("Failed to read config: {}", CONFIG_FILE))?;
                Settings::from_toml_str(&content)
                    .with_context(|| format!("Failed to parse config: {}", CONFIG_FILE))
            }
        }
    }
}

/// Schema output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format
    pub format: OutputFormat,
    /// Pretty-print JSON
    pub pretty: bool,
    /// Emit `hiddenParameters`; when false the map is written empty
    pub include_hidden: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
            include_hidden: true,
        }
    }
}

/// Lint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CheckSettings {
    /// Fail when any warning is reported
    pub strict: bool,
}
