//! Parser for Turboshaft (block-structured) graph phases.
//!
//! Blocks come first so predecessor edges can be wired between them, then
//! operations are attached to their owning block, then operation-level
//! edges. Once a block has all its operations, its collapsed label is
//! derived from the operation count.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::Result;
use crate::graph::{BlockKind, TurboshaftGraph, TurboshaftGraphBlock, TurboshaftGraphNode};

#[derive(Debug)]
pub struct TurboshaftGraphPhase {
    pub name: String,
    pub graph: TurboshaftGraph,
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WireTurboshaftData {
    #[serde(default)]
    blocks: Vec<WireBlock>,
    #[serde(default)]
    nodes: Vec<WireTurboshaftNode>,
    #[serde(default)]
    edges: Vec<WireTurboshaftEdge>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBlock {
    id: i64,
    #[serde(default, rename = "type")]
    block_type: String,
    #[serde(default)]
    deferred: bool,
    #[serde(default)]
    predecessors: Vec<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTurboshaftNode {
    id: i64,
    #[serde(default)]
    title: String,
    /// Both spellings occur in the wild.
    #[serde(alias = "block_id")]
    block_id: i64,
    #[serde(default)]
    properties: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTurboshaftEdge {
    source: i64,
    target: i64,
    #[serde(default)]
    index: i32,
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

impl TurboshaftGraphPhase {
    pub fn parse(name: &str, data: Value) -> Result<TurboshaftGraphPhase> {
        let wire: WireTurboshaftData = serde_json::from_value(data)?;
        let mut graph = TurboshaftGraph::new();

        for w in &wire.blocks {
            let kind = BlockKind::from_wire(&w.block_type).unwrap_or_else(|| {
                warn!(block_type = %w.block_type, block = w.id, "unknown block type, treating as plain block");
                BlockKind::Block
            });
            graph.add_block(TurboshaftGraphBlock::new(
                w.id,
                kind,
                w.deferred,
                w.predecessors.clone(),
            ));
        }
        for w in &wire.blocks {
            for &pred in &w.predecessors {
                graph.add_block_edge(pred, w.id);
            }
        }

        for w in wire.nodes {
            let mut node = TurboshaftGraphNode::new(w.id, &w.title, w.block_id);
            node.properties = w.properties;
            graph.add_node(node);
        }
        for w in wire.edges {
            graph.add_node_edge(w.source, w.target, w.index);
        }

        for block in &mut graph.blocks {
            block.update_collapsed_label();
        }

        Ok(TurboshaftGraphPhase {
            name: name.to_string(),
            graph,
        })
    }
}
