//! Compiler pipeline phase parsing.
//!
//! A phase is one named snapshot of the pipeline's intermediate
//! representation. The `type` discriminator on each phase object selects
//! the parser; an unknown discriminator aborts the whole load.

pub mod graph_phase;
pub mod instructions_phase;
pub mod turboshaft_phase;

use serde_json::Value;

use crate::error::{IrVizError, Result};
use crate::session::AnalysisSession;

pub use graph_phase::GraphPhase;
pub use instructions_phase::InstructionsPhase;
pub use turboshaft_phase::TurboshaftGraphPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Graph,
    TurboshaftGraph,
    Instructions,
    Disassembly,
    Schedule,
    Sequence,
}

impl PhaseKind {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "graph" => Some(PhaseKind::Graph),
            "turboshaft_graph" => Some(PhaseKind::TurboshaftGraph),
            "instructions" => Some(PhaseKind::Instructions),
            "disassembly" => Some(PhaseKind::Disassembly),
            "schedule" => Some(PhaseKind::Schedule),
            "sequence" => Some(PhaseKind::Sequence),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Graph => "graph",
            PhaseKind::TurboshaftGraph => "turboshaft_graph",
            PhaseKind::Instructions => "instructions",
            PhaseKind::Disassembly => "disassembly",
            PhaseKind::Schedule => "schedule",
            PhaseKind::Sequence => "sequence",
        }
    }
}

/// Text-only phases carry their payload through unparsed.
#[derive(Debug)]
pub struct TextPhase {
    pub name: String,
    pub data: String,
}

/// Register-allocation sequences keep their structured payload as raw JSON;
/// nothing downstream consumes it beyond display.
#[derive(Debug)]
pub struct SequencePhase {
    pub name: String,
    pub data: Value,
}

#[derive(Debug)]
pub enum Phase {
    Graph(GraphPhase),
    TurboshaftGraph(TurboshaftGraphPhase),
    Instructions(InstructionsPhase),
    Disassembly(TextPhase),
    Schedule(TextPhase),
    Sequence(SequencePhase),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Graph(_) => PhaseKind::Graph,
            Phase::TurboshaftGraph(_) => PhaseKind::TurboshaftGraph,
            Phase::Instructions(_) => PhaseKind::Instructions,
            Phase::Disassembly(_) => PhaseKind::Disassembly,
            Phase::Schedule(_) => PhaseKind::Schedule,
            Phase::Sequence(_) => PhaseKind::Sequence,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Phase::Graph(p) => &p.name,
            Phase::TurboshaftGraph(p) => &p.name,
            Phase::Instructions(p) => &p.name,
            Phase::Disassembly(p) | Phase::Schedule(p) => &p.name,
            Phase::Sequence(p) => &p.name,
        }
    }
}

/// Parses one phase object from the dump. A missing or unknown `type`
/// discriminator is a fatal error for the whole file.
pub fn parse_phase(value: Value, session: &mut AnalysisSession) -> Result<Phase> {
    let mut phase = match value {
        Value::Object(map) => map,
        other => {
            return Err(IrVizError::UnsupportedPhaseType(format!(
                "phase is not an object: {other}"
            )));
        }
    };

    let kind_str = phase
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let kind = PhaseKind::from_wire(&kind_str)
        .ok_or_else(|| IrVizError::UnsupportedPhaseType(kind_str.clone()))?;
    let name = phase
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    match kind {
        PhaseKind::Graph => {
            let data = graph_phase::data_field(&mut phase, &name)?;
            Ok(Phase::Graph(GraphPhase::parse(&name, data, session)?))
        }
        PhaseKind::TurboshaftGraph => {
            let data = graph_phase::data_field(&mut phase, &name)?;
            Ok(Phase::TurboshaftGraph(TurboshaftGraphPhase::parse(
                &name, data,
            )?))
        }
        PhaseKind::Instructions => Ok(Phase::Instructions(InstructionsPhase::parse(
            &name, &phase,
        )?)),
        PhaseKind::Disassembly => Ok(Phase::Disassembly(text_phase(&mut phase, &name))),
        PhaseKind::Schedule => Ok(Phase::Schedule(text_phase(&mut phase, &name))),
        PhaseKind::Sequence => {
            let data = phase.remove("data").unwrap_or(Value::Null);
            Ok(Phase::Sequence(SequencePhase {
                name,
                data,
            }))
        }
    }
}

fn text_phase(phase: &mut serde_json::Map<String, Value>, name: &str) -> TextPhase {
    let data = match phase.remove("data") {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    TextPhase {
        name: name.to_string(),
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_phases.rs"]
mod tests;
