//! Node/edge/block primitives and the two graph containers.
//!
//! There are two closed families: the classic sea-of-nodes graph
//! (`GraphNode`/`GraphEdge`/`Graph`) and the block-structured Turboshaft
//! graph (`TurboshaftGraphBlock`/`TurboshaftGraphNode`/`TurboshaftGraph`).
//! Both store nodes and edges in arenas indexed by plain `usize`, with
//! edges as value structs carrying endpoint indices; the cyclic structure
//! of a loop never turns into a reference cycle.

pub mod block;
pub mod classic;
pub mod edge;
pub mod node;
pub mod turboshaft;

pub use block::{BlockKind, TurboshaftGraphBlock};
pub use classic::Graph;
pub use edge::{EdgeKind, GraphEdge, TurboshaftGraphEdge};
pub use node::{GraphNode, TurboshaftGraphNode};
pub use turboshaft::TurboshaftGraph;

use std::collections::HashMap;

// ─── Geometry constants ──────────────────────────────────────────────────────

pub const AVERAGE_CHAR_WIDTH: f64 = 8.0;
pub const LABEL_HEIGHT: f64 = 18.0;
pub const LABEL_PADDING: f64 = 6.0;
pub const NODE_INPUT_WIDTH: f64 = 50.0;
pub const DEFAULT_NODE_BUBBLE_RADIUS: f64 = 12.0;
pub const MINIMUM_EDGE_SEPARATION: f64 = 20.0;
pub const MINIMUM_NODE_OUTPUT_APPROACH: f64 = 15.0;
pub const MINIMUM_NODE_INPUT_APPROACH: f64 = 15.0;
pub const RANK_SEPARATION: f64 = 75.0;
pub const TURBOSHAFT_NODE_X_INDENT: f64 = 25.0;
pub const TURBOSHAFT_BLOCK_HEADER_HEIGHT: f64 = 24.0;

/// Rank value meaning "not assigned yet".
pub const MAX_RANK_SENTINEL: i32 = 10_000_000;

/// Nodes and edges are addressed by arena index inside their graph.
pub type NodeIdx = usize;
pub type EdgeIdx = usize;

// ─── Label measurement ───────────────────────────────────────────────────────

/// Measured text extents of a display label. There is no DOM here, so the
/// metric is a fixed average character width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub width: f64,
    pub height: f64,
}

pub fn measure_label(text: &str) -> LabelBox {
    LabelBox {
        width: text.chars().count() as f64 * AVERAGE_CHAR_WIDTH + 2.0 * LABEL_PADDING,
        height: LABEL_HEIGHT,
    }
}

// ─── Graph state ─────────────────────────────────────────────────────────────

/// Layout cache state. `Cached` means rank/x/y survive from the previous
/// full rebuild and only display-level derivations need re-running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphStateType {
    #[default]
    NeedToFullRebuild,
    Cached,
}

// ─── IdMap ───────────────────────────────────────────────────────────────────

/// Map from compiler-assigned node/block id to arena index. Ids are usually
/// small dense non-negative integers, so the common path is an array; sparse
/// or negative ids fall back to a real map.
#[derive(Debug, Default)]
pub struct IdMap {
    dense: Vec<Option<u32>>,
    sparse: HashMap<i64, u32>,
}

/// Ids past this bound go to the sparse map even when non-negative.
const DENSE_ID_LIMIT: i64 = 1 << 20;

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64, idx: NodeIdx) {
        let idx = idx as u32;
        if (0..DENSE_ID_LIMIT).contains(&id) {
            let slot = id as usize;
            if slot >= self.dense.len() {
                self.dense.resize(slot + 1, None);
            }
            self.dense[slot] = Some(idx);
        } else {
            self.sparse.insert(id, idx);
        }
    }

    pub fn get(&self, id: i64) -> Option<NodeIdx> {
        if (0..DENSE_ID_LIMIT).contains(&id) {
            self.dense
                .get(id as usize)
                .copied()
                .flatten()
                .map(|i| i as NodeIdx)
        } else {
            self.sparse.get(&id).map(|&i| i as NodeIdx)
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_graph_common.rs"]
mod tests;
