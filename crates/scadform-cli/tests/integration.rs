//! Integration tests for scadform CLI
//!
//! These tests drive the command functions against real files in a
//! temporary directory.

use std::fs;

use tempfile::TempDir;

use scadform_cli::{
    check_command, check_files, extract_command, format_reports, ExtractOptions, OutputFormat,
    Settings,
};

const MODEL: &str = r#"/* [Dimensions] */
width = 50; // [10:100] Box width mm
shape = "round"; // [round, square]

/* [Hidden] */
eps = 0.01;
"#;

const BROKEN: &str = "a = [1, 2\nb = 1; // [1:10mm, 2:16mm, 3:20mm]\nc = 2;\n";

fn json_options() -> ExtractOptions {
    ExtractOptions {
        format: OutputFormat::Json,
        pretty: false,
        include_hidden: true,
    }
}

#[test]
fn test_extract_writes_json_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("box.scad");
    let output = dir.path().join("box.json");
    fs::write(&input, MODEL).unwrap();

    extract_command(&input, Some(output.as_path()), &json_options()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["parameters"]["width"]["maximum"], 100.0);
    assert_eq!(json["parameters"]["width"]["group"], "Dimensions");
    assert_eq!(json["parameters"]["shape"]["uiType"], "select");
    assert!(json["hiddenParameters"]["eps"].is_object());
    assert_eq!(json["groups"][0]["id"], "Dimensions");
}

#[test]
fn test_extract_without_hidden() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("box.scad");
    let output = dir.path().join("box.json");
    fs::write(&input, MODEL).unwrap();

    let options = ExtractOptions {
        include_hidden: false,
        ..json_options()
    };
    extract_command(&input, Some(output.as_path()), &options).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["hiddenParameters"], serde_json::json!({}));
}

#[test]
fn test_extract_text_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("box.scad");
    let output = dir.path().join("box.txt");
    fs::write(&input, MODEL).unwrap();

    let options = ExtractOptions {
        format: OutputFormat::Text,
        ..json_options()
    };
    extract_command(&input, Some(output.as_path()), &options).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("[Dimensions]\n"));
    assert!(text.contains("shape: string/select = round {round | square}"));
    assert!(text.contains("[Hidden]"));
}

#[test]
fn test_extract_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = extract_command(&dir.path().join("nope.scad"), None, &json_options()).unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_check_reports_diagnostics_with_lines() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.scad");
    fs::write(&input, BROKEN).unwrap();

    let reports = check_files(&[input.display().to_string()]).unwrap();
    assert_eq!(reports.len(), 1);

    let codes: Vec<_> = reports[0]
        .diagnostics
        .iter()
        .filter_map(|d| d.code.clone())
        .collect();
    assert_eq!(codes, vec!["W001", "W003"]);

    let text = format_reports(&reports);
    assert!(text.contains("warning[W001]"));
    assert!(text.contains(&format!("--> {}:1", input.display())));
    assert!(text.contains("Found 2 warning(s)"));
}

#[test]
fn test_check_glob_pattern() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.scad"), MODEL).unwrap();
    fs::write(dir.path().join("b.scad"), BROKEN).unwrap();
    fs::write(dir.path().join("notes.txt"), "x").unwrap();

    let pattern = dir.path().join("*.scad").display().to_string();
    let reports = check_files(&[pattern]).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports[0].diagnostics.is_empty());
    assert!(reports[1].diagnostics.has_warnings());
    assert!(format_reports(&reports).contains("✓ No issues found"));
}

#[test]
fn test_check_glob_without_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.scad").display().to_string();
    assert!(check_files(&[pattern]).is_err());
}

#[test]
fn test_check_strict_fails_on_warnings() {
    let dir = TempDir::new().unwrap();
    let clean = dir.path().join("clean.scad");
    let broken = dir.path().join("broken.scad");
    fs::write(&clean, MODEL).unwrap();
    fs::write(&broken, BROKEN).unwrap();

    assert!(check_command(&[clean.display().to_string()], OutputFormat::Json, true).is_ok());
    assert!(check_command(&[broken.display().to_string()], OutputFormat::Json, false).is_ok());

    let err = check_command(&[broken.display().to_string()], OutputFormat::Text, true).unwrap_err();
    assert!(err.to_string().contains("2 warning(s)"));
}

#[test]
fn test_settings_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("scadform.toml");
    fs::write(
        &config,
        "[output]\nformat = \"text\"\npretty = false\n\n[check]\nstrict = true\n",
    )
    .unwrap();

    let settings = Settings::load(Some(config.as_path())).unwrap();
    let options = ExtractOptions::from_settings(&settings);
    assert_eq!(options.format, OutputFormat::Text);
    assert!(!options.pretty);
    assert!(options.include_hidden);
    assert!(settings.check.strict);
}

#[test]
fn test_settings_file_invalid() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("scadform.toml");
    fs::write(&config, "[output\n").unwrap();

    let err = Settings::load(Some(config.as_path())).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}
