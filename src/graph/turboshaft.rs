//! The Turboshaft graph container: blocks, contained nodes, block edges.

use tracing::warn;

use super::{
    EdgeIdx, GraphStateType, IdMap, LABEL_PADDING, MINIMUM_EDGE_SEPARATION, NodeIdx,
    TURBOSHAFT_BLOCK_HEADER_HEIGHT, TURBOSHAFT_NODE_X_INDENT, TurboshaftGraphBlock,
    TurboshaftGraphEdge, TurboshaftGraphNode,
};

/// Owns the block, node and edge arenas for one Turboshaft phase. Layout
/// ranks and places blocks; contained nodes only contribute to block height.
#[derive(Debug, Default)]
pub struct TurboshaftGraph {
    pub blocks: Vec<TurboshaftGraphBlock>,
    pub nodes: Vec<TurboshaftGraphNode>,
    /// Block-level edges, rebuilt from predecessor lists.
    pub edges: Vec<TurboshaftGraphEdge>,
    /// Node-level (operand) edges; not used for layout.
    pub node_edges: Vec<TurboshaftGraphEdge>,
    pub block_map: IdMap,
    pub node_map: IdMap,
    pub min_graph_x: f64,
    pub max_graph_x: f64,
    pub min_graph_y: f64,
    pub max_graph_y: f64,
    pub max_graph_block_x: f64,
    pub max_back_edge_number: u32,
    pub state: GraphStateType,
}

impl TurboshaftGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_block(&mut self, block: TurboshaftGraphBlock) -> NodeIdx {
        let idx = self.blocks.len();
        self.block_map.insert(block.id, idx);
        self.blocks.push(block);
        idx
    }

    /// Attach a node to its owning block. Nodes referencing an unknown block
    /// are dropped (truncated dumps).
    pub fn add_node(&mut self, node: TurboshaftGraphNode) -> Option<NodeIdx> {
        let Some(block) = self.block_map.get(node.block_id) else {
            warn!(node_id = node.id, block_id = node.block_id, "dropping node with dangling block");
            return None;
        };
        let idx = self.nodes.len();
        self.node_map.insert(node.id, idx);
        self.nodes.push(node);
        self.blocks[block].nodes.push(idx);
        Some(idx)
    }

    /// Wire one block-level edge `source → target`; input edge order at the
    /// target follows its predecessor list order.
    pub fn add_block_edge(&mut self, source_id: i64, target_id: i64) -> Option<EdgeIdx> {
        let (Some(source), Some(target)) =
            (self.block_map.get(source_id), self.block_map.get(target_id))
        else {
            warn!(source_id, target_id, "dropping block edge with dangling endpoint");
            return None;
        };
        let idx = self.edges.len();
        self.edges
            .push(TurboshaftGraphEdge::between_blocks(source, target));
        self.blocks[source].outputs.push(idx);
        self.blocks[target].inputs.push(idx);
        Some(idx)
    }

    pub fn add_node_edge(&mut self, source_id: i64, target_id: i64, index: i32) -> Option<EdgeIdx> {
        let (Some(source), Some(target)) =
            (self.node_map.get(source_id), self.node_map.get(target_id))
        else {
            warn!(source_id, target_id, "dropping node edge with dangling endpoint");
            return None;
        };
        let idx = self.node_edges.len();
        self.node_edges
            .push(TurboshaftGraphEdge::between_nodes(source, target, index));
        Some(idx)
    }

    pub fn block_by_id(&self, id: i64) -> Option<&TurboshaftGraphBlock> {
        self.block_map.get(id).map(|idx| &self.blocks[idx])
    }

    // ─── Iteration ───────────────────────────────────────────────────────────

    pub fn blocks_where<'a, P>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = &'a TurboshaftGraphBlock>
    where
        P: Fn(&TurboshaftGraphBlock) -> bool + 'a,
    {
        self.blocks.iter().filter(move |b| predicate(b))
    }

    pub fn filtered_edges<'a, P>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = &'a TurboshaftGraphEdge>
    where
        P: Fn(&TurboshaftGraphEdge) -> bool + 'a,
    {
        self.edges.iter().filter(move |e| predicate(e))
    }

    pub fn is_edge_visible(&self, edge: EdgeIdx) -> bool {
        let e = &self.edges[edge];
        e.visible && self.blocks[e.source].visible && self.blocks[e.target].visible
    }

    pub fn show_all(&mut self) {
        for block in &mut self.blocks {
            block.visible = true;
        }
        for node in &mut self.nodes {
            node.visible = true;
        }
        for edge in &mut self.edges {
            edge.visible = true;
        }
    }

    /// Collapsing hides inline nodes; heights change but topology does not,
    /// so a cached rebuild is enough afterwards.
    pub fn set_block_collapsed(&mut self, block: NodeIdx, collapsed: bool) {
        self.blocks[block].collapsed = collapsed;
        for i in 0..self.blocks[block].nodes.len() {
            let node = self.blocks[block].nodes[i];
            self.nodes[node].visible = !collapsed;
        }
    }

    // ─── Geometry ────────────────────────────────────────────────────────────

    pub fn block_width(&self, block: NodeIdx) -> f64 {
        let b = &self.blocks[block];
        let mut width = b.label_box.width.max(
            crate::graph::measure_label(&b.collapsed_label).width + TURBOSHAFT_NODE_X_INDENT,
        );
        if !b.collapsed {
            for &node in &b.nodes {
                width = width
                    .max(self.nodes[node].label_box.width + 2.0 * TURBOSHAFT_NODE_X_INDENT);
            }
        }
        width + 2.0 * LABEL_PADDING
    }

    /// Header plus the sum of contained node heights while expanded.
    pub fn block_height(&self, block: NodeIdx, show_properties: bool) -> f64 {
        let b = &self.blocks[block];
        let mut height = TURBOSHAFT_BLOCK_HEADER_HEIGHT;
        if !b.collapsed {
            for &node in &b.nodes {
                height += self.nodes[node].height(show_properties);
            }
        }
        height
    }

    // ─── Back edges ──────────────────────────────────────────────────────────

    pub fn is_back_edge(&self, edge: EdgeIdx) -> bool {
        let e = &self.edges[edge];
        self.blocks[e.target].has_back_edges()
            && self.blocks[e.target].rank < self.blocks[e.source].rank
    }

    // ─── Bounding box ────────────────────────────────────────────────────────

    pub fn redetermine_graph_bounding_box(
        &mut self,
        show_properties: bool,
    ) -> ((f64, f64), (f64, f64)) {
        self.min_graph_x = 0.0;
        self.max_graph_block_x = 1.0;
        self.min_graph_y = 0.0;
        self.max_graph_y = 1.0;
        let mut first = true;
        for idx in 0..self.blocks.len() {
            if !self.blocks[idx].visible {
                continue;
            }
            let (x, y) = (self.blocks[idx].x, self.blocks[idx].y);
            let right = x + self.block_width(idx);
            let bottom = y + self.block_height(idx, show_properties);
            if first {
                self.min_graph_x = x;
                self.max_graph_block_x = right;
                self.min_graph_y = y;
                self.max_graph_y = bottom;
                first = false;
                continue;
            }
            self.min_graph_x = self.min_graph_x.min(x);
            self.max_graph_block_x = self.max_graph_block_x.max(right);
            self.min_graph_y = self.min_graph_y.min(y);
            self.max_graph_y = self.max_graph_y.max(bottom);
        }
        self.max_graph_x =
            self.max_graph_block_x + self.max_back_edge_number as f64 * MINIMUM_EDGE_SEPARATION;
        (
            (self.min_graph_x, self.min_graph_y),
            (self.max_graph_x, self.max_graph_y),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_graph_turboshaft.rs"]
mod tests;
