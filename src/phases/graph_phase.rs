//! Parser for classic sea-of-nodes graph phases.
//!
//! Nodes are parsed fully before edges so edge endpoints resolve through
//! the id map built in the same pass. The session's label cache is
//! consulted per node to spot labels rewritten in place between phases.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{IrVizError, Result};
use crate::graph::{EdgeKind, Graph, GraphNode};
use crate::position::{Origin, SourcePosition};
use crate::session::AnalysisSession;

#[derive(Debug)]
pub struct GraphPhase {
    pub name: String,
    pub graph: Graph,
    pub highest_node_id: i64,
}

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WireGraphData {
    #[serde(default)]
    nodes: Vec<WireGraphNode>,
    #[serde(default)]
    edges: Vec<WireGraphEdge>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGraphNode {
    id: i64,
    #[serde(default)]
    label: String,
    #[serde(default)]
    title: String,
    #[serde(default = "default_live")]
    live: bool,
    #[serde(default)]
    properties: String,
    #[serde(default)]
    opcode: String,
    #[serde(default)]
    control: bool,
    #[serde(default)]
    opinfo: String,
    #[serde(default, rename = "type")]
    node_type: String,
    source_position: Option<SourcePosition>,
    /// Legacy synonym for `sourcePosition` with an unknown inlining.
    pos: Option<i64>,
    origin: Option<WireOrigin>,
}

fn default_live() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOrigin {
    node_id: Option<i64>,
    bytecode_position: Option<i64>,
    #[serde(default)]
    phase: String,
    #[serde(default)]
    reducer: String,
}

impl WireOrigin {
    /// An origin with a node id is a node origin; anything else is treated
    /// as a bytecode origin.
    fn into_origin(self) -> Origin {
        match self.node_id {
            Some(node_id) => Origin::Node {
                node_id,
                phase: self.phase,
                reducer: self.reducer,
            },
            None => Origin::Bytecode {
                bytecode_position: self.bytecode_position.unwrap_or(-1),
                phase: self.phase,
                reducer: self.reducer,
            },
        }
    }
}

#[derive(Deserialize)]
struct WireGraphEdge {
    source: i64,
    target: i64,
    #[serde(default)]
    index: i32,
    #[serde(default, rename = "type")]
    edge_type: String,
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

impl GraphPhase {
    pub fn parse(name: &str, data: Value, session: &mut AnalysisSession) -> Result<GraphPhase> {
        let wire: WireGraphData = serde_json::from_value(data)?;
        let mut graph = Graph::new();
        let mut highest_node_id = -1;

        for w in wire.nodes {
            highest_node_id = highest_node_id.max(w.id);
            let effective_label = if w.label.is_empty() { &w.title } else { &w.label };
            let inplace_update_phase = session.observe_label(w.id, effective_label, name);
            let mut node = GraphNode::new(w.id, &w.label, &w.title);
            node.live = w.live;
            node.properties = w.properties;
            node.opcode = w.opcode;
            node.control = w.control;
            node.opinfo = w.opinfo;
            node.node_type = w.node_type;
            node.source_position = w
                .source_position
                .or_else(|| w.pos.map(SourcePosition::from_legacy_pos));
            node.origin = w.origin.map(WireOrigin::into_origin);
            node.inplace_update_phase = inplace_update_phase;
            graph.add_node(node);
        }

        for w in wire.edges {
            let kind = EdgeKind::from_wire(&w.edge_type).unwrap_or_else(|| {
                warn!(edge_type = %w.edge_type, "unknown edge type, treating as value");
                EdgeKind::Value
            });
            graph.add_edge(w.source, w.target, w.index, kind);
        }

        Ok(GraphPhase {
            name: name.to_string(),
            graph,
            highest_node_id,
        })
    }
}

pub(super) fn data_field(phase: &mut serde_json::Map<String, Value>, name: &str) -> Result<Value> {
    phase.remove("data").ok_or_else(|| IrVizError::MissingField {
        phase: name.to_string(),
        field: "data".to_string(),
    })
}
