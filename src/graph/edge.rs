//! Edge value types for both graph families.
//!
//! An edge lives in the owning graph's edge arena; the source node's
//! `outputs` and the target node's `inputs` both hold the same arena index.
//! Back-edge classification needs rank data, so it lives on the graph
//! containers, not here.

use super::NodeIdx;

// ─── EdgeKind ────────────────────────────────────────────────────────────────

/// Classic-graph edge kind, from the wire `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Control,
    Effect,
    Value,
    Context,
    FrameState,
}

impl EdgeKind {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "control" => Some(Self::Control),
            "effect" => Some(Self::Effect),
            "value" => Some(Self::Value),
            "context" => Some(Self::Context),
            "frame-state" => Some(Self::FrameState),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Effect => "effect",
            Self::Value => "value",
            Self::Context => "context",
            Self::FrameState => "frame-state",
        }
    }
}

// ─── GraphEdge ───────────────────────────────────────────────────────────────

/// Classic-graph edge: one operand slot of the target node.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub source: NodeIdx,
    pub target: NodeIdx,
    /// Operand position at the target.
    pub index: i32,
    pub kind: EdgeKind,
    pub visible: bool,
    /// 0 when not a back edge; otherwise a dense 1-based number assigned
    /// during layout, used only for routing lanes.
    pub back_edge_number: u32,
}

impl GraphEdge {
    pub fn new(source: NodeIdx, target: NodeIdx, index: i32, kind: EdgeKind) -> Self {
        Self {
            source,
            target,
            index,
            kind,
            visible: true,
            back_edge_number: 0,
        }
    }
}

// ─── TurboshaftGraphEdge ─────────────────────────────────────────────────────

/// Turboshaft edge. Block-level edges (built from block predecessor lists)
/// carry no operand position, so `index` is fixed at -1; node-level edges
/// reuse the same struct with a real index.
#[derive(Debug, Clone)]
pub struct TurboshaftGraphEdge {
    pub source: NodeIdx,
    pub target: NodeIdx,
    pub index: i32,
    pub visible: bool,
    pub back_edge_number: u32,
}

impl TurboshaftGraphEdge {
    pub fn between_blocks(source: NodeIdx, target: NodeIdx) -> Self {
        Self {
            source,
            target,
            index: -1,
            visible: true,
            back_edge_number: 0,
        }
    }

    pub fn between_nodes(source: NodeIdx, target: NodeIdx, index: i32) -> Self {
        Self {
            source,
            target,
            index,
            visible: true,
            back_edge_number: 0,
        }
    }
}
