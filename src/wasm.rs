//! WASM bindings for irviz.
//!
//! Exposes dump loading and per-phase layout to JavaScript via
//! wasm-bindgen. Element descriptors come back one per line.

use wasm_bindgen::prelude::*;

use crate::phases::PhaseKind;
use crate::session::AnalysisSession;

/// List the phases of a dump as "type\tname" lines.
#[wasm_bindgen(js_name = "listPhases")]
pub fn list_phases(dump_json: &str) -> Result<String, JsError> {
    let mut session = AnalysisSession::new();
    let dump =
        crate::load_dump(dump_json, &mut session).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(dump
        .phases
        .iter()
        .map(|p| format!("{}\t{}", p.kind().as_str(), p.name()))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Lay out the named phase of a dump and return its scene elements.
#[wasm_bindgen(js_name = "layoutPhase")]
pub fn layout_phase(
    dump_json: &str,
    phase_name: &str,
    show_properties: bool,
) -> Result<String, JsError> {
    let mut session = AnalysisSession::new();
    let dump =
        crate::load_dump(dump_json, &mut session).map_err(|e| JsError::new(&e.to_string()))?;
    let phase = dump
        .phases
        .into_iter()
        .find(|p| {
            p.name() == phase_name
                && matches!(p.kind(), PhaseKind::Graph | PhaseKind::TurboshaftGraph)
        })
        .ok_or_else(|| JsError::new(&format!("no graph phase named '{phase_name}'")))?;
    let elements =
        crate::render_elements(phase, show_properties).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(elements.join("\n"))
}
