//! Parser for instruction-selection phases.
//!
//! The interesting payload is the node-id to instruction-range table used
//! by the selection broker to translate graph selections into instruction
//! highlights. Older dumps emit it as a sparse array indexed by node id,
//! newer ones as an object keyed by the id; both are accepted.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use crate::error::Result;

#[derive(Debug, Default)]
pub struct InstructionsPhase {
    pub name: String,
    pub node_id_to_instruction_range: HashMap<i64, (u32, u32)>,
    pub block_id_to_instruction_range: HashMap<i64, (u32, u32)>,
}

impl InstructionsPhase {
    pub fn parse(name: &str, phase: &serde_json::Map<String, Value>) -> Result<InstructionsPhase> {
        let node_id_to_instruction_range = phase
            .get("nodeIdToInstructionRange")
            .map(parse_range_table)
            .unwrap_or_default();
        let block_id_to_instruction_range = phase
            .get("blockIdToInstructionRange")
            .map(parse_range_table)
            .unwrap_or_default();
        Ok(InstructionsPhase {
            name: name.to_string(),
            node_id_to_instruction_range,
            block_id_to_instruction_range,
        })
    }

    pub fn instruction_range(&self, node_id: i64) -> Option<(u32, u32)> {
        self.node_id_to_instruction_range.get(&node_id).copied()
    }
}

fn parse_range_table(value: &Value) -> HashMap<i64, (u32, u32)> {
    let mut table = HashMap::new();
    match value {
        Value::Array(entries) => {
            for (id, entry) in entries.iter().enumerate() {
                if let Some(range) = parse_range(entry) {
                    table.insert(id as i64, range);
                }
            }
        }
        Value::Object(entries) => {
            for (key, entry) in entries {
                match key.parse::<i64>() {
                    Ok(id) => {
                        if let Some(range) = parse_range(entry) {
                            table.insert(id, range);
                        }
                    }
                    Err(_) => warn!(%key, "non-numeric id in instruction range table"),
                }
            }
        }
        _ => warn!("instruction range table is neither array nor object"),
    }
    table
}

fn parse_range(entry: &Value) -> Option<(u32, u32)> {
    let pair = entry.as_array()?;
    let start = pair.first()?.as_u64()?;
    let end = pair.get(1)?.as_u64()?;
    Some((start as u32, end as u32))
}
