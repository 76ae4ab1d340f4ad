//! Turboshaft basic blocks.

use super::{
    EdgeIdx, LabelBox, MAX_RANK_SENTINEL, MINIMUM_NODE_OUTPUT_APPROACH, NodeIdx, measure_label,
};

// ─── BlockKind ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Block,
    Merge,
    Loop,
}

impl BlockKind {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "BLOCK" | "block" => Some(Self::Block),
            "MERGE" | "merge" => Some(Self::Merge),
            "LOOP" | "loop" => Some(Self::Loop),
            _ => None,
        }
    }
}

// ─── TurboshaftGraphBlock ────────────────────────────────────────────────────

/// A basic-block container of operations. Blocks are what the Turboshaft
/// layout ranks and places; the contained nodes are positioned relative to
/// their block.
#[derive(Debug, Clone)]
pub struct TurboshaftGraphBlock {
    pub id: i64,
    pub kind: BlockKind,
    /// Rendering hint: deoptimization / slow paths.
    pub deferred: bool,
    /// Predecessor block ids in dump order; block-level edges are rebuilt
    /// from this list, so input edge order matches it.
    pub predecessors: Vec<i64>,
    /// Arena indices of the operations contained in this block.
    pub nodes: Vec<NodeIdx>,
    pub collapsed: bool,
    /// Shown instead of the node list while collapsed. Computed after all
    /// nodes have been attached.
    pub collapsed_label: String,
    pub label_box: LabelBox,
    pub inputs: Vec<EdgeIdx>,
    pub outputs: Vec<EdgeIdx>,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub rank: i32,
    pub visit_order_within_rank: u32,
    pub output_approach: f64,
}

impl TurboshaftGraphBlock {
    pub fn new(id: i64, kind: BlockKind, deferred: bool, predecessors: Vec<i64>) -> Self {
        let display = Self::header_label(id, kind, deferred);
        Self {
            id,
            kind,
            deferred,
            predecessors,
            nodes: Vec::new(),
            collapsed: false,
            collapsed_label: String::new(),
            label_box: measure_label(&display),
            inputs: Vec::new(),
            outputs: Vec::new(),
            visible: true,
            x: 0.0,
            y: 0.0,
            rank: MAX_RANK_SENTINEL,
            visit_order_within_rank: 0,
            output_approach: MINIMUM_NODE_OUTPUT_APPROACH,
        }
    }

    pub fn header_label(id: i64, kind: BlockKind, deferred: bool) -> String {
        let kind_tag = match kind {
            BlockKind::Block => "",
            BlockKind::Merge => " MERGE",
            BlockKind::Loop => " LOOP",
        };
        let deferred_tag = if deferred { " (deferred)" } else { "" };
        format!("B{id}{kind_tag}{deferred_tag}")
    }

    pub fn display_label(&self) -> String {
        Self::header_label(self.id, self.kind, self.deferred)
    }

    /// Recompute the collapsed summary; call once all nodes are attached.
    pub fn update_collapsed_label(&mut self) {
        self.collapsed_label = format!("{} operations", self.nodes.len());
    }

    pub fn has_back_edges(&self) -> bool {
        self.kind == BlockKind::Loop
    }

    pub fn selection_key(id: i64) -> String {
        format!("B-{id}")
    }
}
