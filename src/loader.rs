//! Top-level dump loading.
//!
//! A dump is one JSON document covering a whole compilation: function
//! metadata, per-node source positions, and the list of pipeline phases.
//! Compiler crashes mid-dump leave a truncated tail; recovery here repairs
//! the tail by appending plausible closing tokens before giving up, so the
//! phases written before the crash stay loadable. Unsupported phase types
//! remain fatal for the whole file.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{IrVizError, Result};
use crate::phases::{self, InstructionsPhase, Phase};
use crate::position::SourcePosition;
use crate::selection::SourceResolver;
use crate::session::AnalysisSession;

/// One fully parsed compiler dump.
pub struct PhaseDump {
    pub function_name: String,
    pub phases: Vec<Phase>,
    pub node_positions: HashMap<i64, SourcePosition>,
}

impl PhaseDump {
    pub fn phase_by_name(&self, name: &str) -> Result<&Phase> {
        self.phases
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| IrVizError::UnknownPhase(name.to_string()))
    }

    /// Phases whose name matches the given pattern, in dump order.
    pub fn filter_phases(&self, pattern: &str) -> Result<Vec<&Phase>> {
        let re = regex::Regex::new(pattern).map_err(|source| IrVizError::PhaseFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.phases.iter().filter(|p| re.is_match(p.name())).collect())
    }
}

pub fn load_dump(text: &str, session: &mut AnalysisSession) -> Result<PhaseDump> {
    let root = parse_with_recovery(text)?;
    let mut root = match root {
        Value::Object(map) => map,
        other => {
            return Err(IrVizError::UnsupportedPhaseType(format!(
                "dump is not an object: {other}"
            )));
        }
    };

    let function_name = match root.get("function") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Object(func)) => func
            .get("functionName")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        _ => String::new(),
    };

    let mut node_positions = HashMap::new();
    if let Some(Value::Object(table)) = root.get("nodePositions") {
        for (key, entry) in table {
            let Ok(id) = key.parse::<i64>() else {
                warn!(%key, "non-numeric node id in nodePositions");
                continue;
            };
            match serde_json::from_value::<SourcePosition>(entry.clone()) {
                Ok(position) => {
                    node_positions.insert(id, position);
                }
                Err(err) => warn!(%key, %err, "skipping malformed node position"),
            }
        }
    }

    let raw_phases = match root.remove("phases") {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    };
    let mut parsed = Vec::with_capacity(raw_phases.len());
    for raw in raw_phases {
        parsed.push(phases::parse_phase(raw, session)?);
    }
    debug!(function = %function_name, phases = parsed.len(), "loaded dump");

    Ok(PhaseDump {
        function_name,
        phases: parsed,
        node_positions,
    })
}

/// Closing-token candidates tried against a truncated tail, shortest first.
const TAIL_REPAIRS: &[&str] = &["]}", "}]}", "\"}]}", "\"}]}]}"];

fn parse_with_recovery(text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(original) => {
            let trimmed = text.trim_end().trim_end_matches(',');
            for repair in TAIL_REPAIRS {
                let mut attempt = trimmed.to_string();
                attempt.push_str(repair);
                if let Ok(value) = serde_json::from_str(&attempt) {
                    warn!(%repair, "recovered truncated dump tail");
                    return Ok(value);
                }
            }
            Err(IrVizError::Json(original))
        }
    }
}

// ─── DumpResolver ────────────────────────────────────────────────────────────

/// Aggregated id translation tables for one dump, backing the selection
/// broker's cross-view translation.
#[derive(Default)]
pub struct DumpResolver {
    node_to_position: HashMap<i64, SourcePosition>,
    position_to_nodes: HashMap<String, Vec<i64>>,
    instructions: Option<InstructionsPhase>,
}

impl DumpResolver {
    pub fn from_dump(dump: &PhaseDump) -> Self {
        let mut resolver = DumpResolver::default();
        for (&id, &position) in &dump.node_positions {
            resolver.record(id, position);
        }
        for phase in &dump.phases {
            match phase {
                Phase::Graph(p) => {
                    for node in &p.graph.nodes {
                        if let Some(position) = node.source_position {
                            resolver.record(node.id, position);
                        }
                    }
                }
                Phase::Instructions(p) => {
                    // The most recent instructions phase wins.
                    resolver.instructions = Some(InstructionsPhase {
                        name: p.name.clone(),
                        node_id_to_instruction_range: p.node_id_to_instruction_range.clone(),
                        block_id_to_instruction_range: p.block_id_to_instruction_range.clone(),
                    });
                }
                _ => {}
            }
        }
        resolver
    }

    fn record(&mut self, id: i64, position: SourcePosition) {
        self.node_to_position.entry(id).or_insert(position);
        let nodes = self.position_to_nodes.entry(position.key()).or_default();
        if !nodes.contains(&id) {
            nodes.push(id);
        }
    }
}

impl SourceResolver for DumpResolver {
    fn node_ids_to_source_positions(&self, node_ids: &[i64]) -> Vec<SourcePosition> {
        let mut positions: Vec<SourcePosition> = node_ids
            .iter()
            .filter_map(|id| self.node_to_position.get(id).copied())
            .collect();
        positions.dedup();
        positions
    }

    fn source_positions_to_node_ids(&self, positions: &[SourcePosition]) -> Vec<i64> {
        let mut ids: Vec<i64> = positions
            .iter()
            .filter_map(|p| self.position_to_nodes.get(&p.key()))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn node_id_to_instruction_range(&self, node_id: i64) -> Option<(u32, u32)> {
        self.instructions
            .as_ref()
            .and_then(|p| p.instruction_range(node_id))
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_loader.rs"]
mod tests;
