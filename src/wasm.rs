//! WASM bindings for Truss Core.
//!
//! This module exposes the editor-facing operations to JavaScript: highlighting
//! on every keystroke, parsing into a model plus line errors, and analysing a
//! solver response. Structured results cross the boundary as JSON strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { highlight_code, parse_structure, analyze, bar_label_transforms } from 'truss_core';
//!
//! await init();
//!
//! editor.addEventListener('input', () => {
//!   overlay.innerHTML = highlight_code(editor.value);
//! });
//!
//! const { structure, errors } = JSON.parse(parse_structure(editor.value));
//! const labels = JSON.parse(bar_label_transforms(editor.value, 15));
//!
//! const response = await fetch('/solve', { method: 'POST', body: editor.value });
//! const { solution, meta, bounds } = JSON.parse(analyze(editor.value, await response.text(), 20));
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::analytics::{
    bar_labels, structure_bounds, AnalyticsSummary, DrawingBounds, SizeOptions,
};
use crate::dsl;
use crate::error::TrussError;
use crate::solution::{solve_structure, RecordedSolver, Solution};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

impl From<TrussError> for JsValue {
    fn from(err: TrussError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Highlight a structure definition.
///
/// Returns one HTML line per source line, joined with `\n`.
#[wasm_bindgen]
pub fn highlight_code(source: &str) -> String {
    dsl::highlight_text(source)
        .iter()
        .map(|marked| marked.to_html())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a structure definition.
///
/// Returns `{"structure": {"nodes", "bars"}, "errors": [{"line", "message"}]}`.
/// Line errors are part of the result, not a thrown exception.
#[wasm_bindgen]
pub fn parse_structure(source: &str) -> Result<String, JsValue> {
    Ok(to_json(&dsl::parse(source))?)
}

#[derive(Serialize)]
struct Analysis {
    solution: Solution,
    meta: AnalyticsSummary,
    bounds: DrawingBounds,
}

/// Analyse a solver response for a structure definition.
///
/// `response` is the successful solver body, `{"data": {...}}`. The drawing
/// bounds use the suggested scales and the given margin.
///
/// Throws when the response is malformed or the solution lacks the data the
/// statistics need.
#[wasm_bindgen]
pub fn analyze(source: &str, response: &str, margin: f64) -> Result<String, JsValue> {
    let lines: Vec<&str> = source.lines().collect();
    let outcome = dsl::parse_lines(&lines);

    let solver = RecordedSolver::ok(response);
    let solved = solve_structure(&solver, &outcome.structure, &lines)?;

    let options = SizeOptions::new()
        .with_margin(margin)
        .with_solution_scale(solved.meta.displacement.suggested_scale)
        .with_reactions_scale(solved.meta.reaction.suggested_scale);
    let bounds = structure_bounds(&outcome.structure, Some(&solved.solution), &options);

    Ok(to_json(&Analysis {
        solution: solved.solution,
        meta: solved.meta,
        bounds,
    })?)
}

/// Label placements of the bars of a structure definition.
///
/// Returns `{"<bar id>": {"transform", "cx", "cy"}}`. Bars whose nodes are
/// not declared get no label.
#[wasm_bindgen]
pub fn bar_label_transforms(source: &str, separation: f64) -> Result<String, JsValue> {
    let outcome = dsl::parse(source);
    Ok(to_json(&bar_labels(&outcome.structure, separation))?)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, TrussError> {
    serde_json::to_string(value).map_err(|e| TrussError::WasmError {
        message: e.to_string(),
    })
}
