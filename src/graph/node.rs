//! Node types for both graph families.

use super::{
    DEFAULT_NODE_BUBBLE_RADIUS, EdgeIdx, LABEL_HEIGHT, LabelBox, MAX_RANK_SENTINEL,
    MINIMUM_NODE_OUTPUT_APPROACH, NODE_INPUT_WIDTH, measure_label,
};
use crate::position::{Origin, SourcePosition};

/// Labels longer than this are truncated for display; the full text stays
/// available in `title`.
const MAX_DISPLAY_LABEL_CHARS: usize = 40;

pub fn abbreviate_label(label: &str) -> String {
    if label.chars().count() <= MAX_DISPLAY_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_DISPLAY_LABEL_CHARS - 1).collect();
        format!("{head}\u{2026}")
    }
}

// ─── GraphNode ───────────────────────────────────────────────────────────────

/// One node of the classic sea-of-nodes graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Stable id from the compiler dump, unique within a phase.
    pub id: i64,
    pub display_label: String,
    pub title: String,
    pub live: bool,
    pub properties: String,
    pub opcode: String,
    pub control: bool,
    pub opinfo: String,
    pub node_type: String,
    /// Set when any outgoing control edge exists.
    pub cfg: bool,
    pub source_position: Option<SourcePosition>,
    pub origin: Option<Origin>,
    /// Phase that last rewrote this node's label in place, if any.
    pub inplace_update_phase: Option<String>,
    /// Measured once at construction from `display_label`.
    pub label_box: LabelBox,
    pub inputs: Vec<EdgeIdx>,
    pub outputs: Vec<EdgeIdx>,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub rank: i32,
    /// DFS tie-break order; 0 means unassigned.
    pub visit_order_within_rank: u32,
    pub output_approach: f64,
}

impl GraphNode {
    pub fn new(id: i64, label: &str, title: &str) -> Self {
        let display_label = abbreviate_label(if label.is_empty() { title } else { label });
        let label_box = measure_label(&display_label);
        Self {
            id,
            display_label,
            title: title.to_string(),
            live: true,
            properties: String::new(),
            opcode: String::new(),
            control: false,
            opinfo: String::new(),
            node_type: String::new(),
            cfg: false,
            source_position: None,
            origin: None,
            inplace_update_phase: None,
            label_box,
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

    pub fn width(&self) -> f64 {
        (self.inputs.len().max(1) as f64 * NODE_INPUT_WIDTH).max(self.label_box.width)
    }

    pub fn height(&self, show_properties: bool) -> f64 {
        let rows = if show_properties && !self.properties.is_empty() {
            2.0
        } else {
            1.0
        };
        rows * LABEL_HEIGHT + 2.0 * DEFAULT_NODE_BUBBLE_RADIUS
    }

    /// X offset of the input bubble for operand `index`, relative to the
    /// node's left edge. Slots are spread evenly across the node width.
    pub fn input_x(&self, index: i32) -> f64 {
        let slots = self.inputs.len().max(1) as f64;
        let slot = index.max(0) as f64;
        (slot + 0.5) * (self.width() / slots)
    }

    /// X offset of the output bubble for the `nth` outgoing edge.
    pub fn output_x(&self, nth: usize) -> f64 {
        let slots = self.outputs.len().max(1) as f64;
        (nth as f64 + 0.5) * (self.width() / slots)
    }

    /// Key used by selection maps; stable across phases for equal ids.
    pub fn selection_key(id: i64) -> String {
        format!("N-{id}")
    }

    fn is_phi(&self) -> bool {
        matches!(
            self.opcode.as_str(),
            "Phi" | "EffectPhi" | "InductionVariablePhi"
        )
    }

    /// True for loop headers and loop-carried phis. Whether a phi actually
    /// closes a loop depends on its last input being control, which only the
    /// owning graph can see.
    pub fn may_receive_back_edges(&self) -> bool {
        self.opcode == "Loop" || self.is_phi()
    }

    pub fn is_loop(&self) -> bool {
        self.opcode == "Loop"
    }
}

// ─── TurboshaftGraphNode ─────────────────────────────────────────────────────

/// One operation inside a Turboshaft block.
#[derive(Debug, Clone)]
pub struct TurboshaftGraphNode {
    pub id: i64,
    pub title: String,
    /// Id of the owning block.
    pub block_id: i64,
    pub properties: String,
    pub label_box: LabelBox,
    pub visible: bool,
}

impl TurboshaftGraphNode {
    pub fn new(id: i64, title: &str, block_id: i64) -> Self {
        let display = format!("{id} {title}");
        Self {
            id,
            title: title.to_string(),
            block_id,
            properties: String::new(),
            label_box: measure_label(&display),
            visible: true,
        }
    }

    pub fn display_label(&self) -> String {
        format!("{} {}", self.id, self.title)
    }

    pub fn height(&self, show_properties: bool) -> f64 {
        if show_properties && !self.properties.is_empty() {
            2.0 * LABEL_HEIGHT
        } else {
            LABEL_HEIGHT
        }
    }

    pub fn selection_key(id: i64) -> String {
        format!("TN-{id}")
    }
}
