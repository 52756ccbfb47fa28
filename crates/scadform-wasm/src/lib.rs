//! scadform-wasm - WebAssembly bindings for scadform
//!
//! This crate exposes parameter extraction to the browser customizer. The
//! schema can be handed over as a plain JavaScript object or as a JSON
//! string.
//!
//! ```js
//! import init, { extractParameters } from "scadform-wasm";
//!
//! await init();
//! const schema = extractParameters(source);
//! for (const group of schema.groups) { /* ... */ }
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use scadform_core::{extract, extract_with_diagnostics};

/// Returns the current version of scadform
#[wasm_bindgen]
pub fn version() -> String {
    scadform_core::VERSION.to_string()
}

/// Extract the parameter schema as a JavaScript object
///
/// Maps become plain objects so `schema.parameters.width` works directly.
#[wasm_bindgen(js_name = extractParameters)]
pub fn extract_parameters(source: &str) -> Result<JsValue, JsValue> {
    let schema = extract(source);
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    schema.serialize(&serializer).map_err(JsValue::from)
}

/// Extract the parameter schema as a JSON string
#[wasm_bindgen(js_name = extractParametersJson)]
pub fn extract_parameters_json(source: &str) -> Result<String, JsError> {
    Ok(scadform_core::extract_json(source, false)?)
}

/// List what extraction skipped, as a JSON array of diagnostics
#[wasm_bindgen(js_name = listDiagnostics)]
pub fn list_diagnostics(source: &str) -> Result<String, JsError> {
    let extraction = extract_with_diagnostics(source);
    Ok(serde_json::to_string(&extraction.diagnostics)?)
}
