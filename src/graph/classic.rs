//! The classic-graph container: arenas, filtered iteration, bounding box.

use tracing::warn;

use super::{
    EdgeIdx, EdgeKind, GraphEdge, GraphNode, GraphStateType, IdMap, MINIMUM_EDGE_SEPARATION,
    NodeIdx,
};

/// Owns the node and edge arenas for one classic graph phase. Constructed
/// once per loaded phase, mutated in place by the layout engine (rank, x, y)
/// and by the view layer (visibility), discarded on phase switch.
#[derive(Debug, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub node_map: IdMap,
    pub min_graph_x: f64,
    pub max_graph_x: f64,
    pub min_graph_y: f64,
    pub max_graph_y: f64,
    /// Right edge of the rightmost visible node; back-edge lanes start here.
    pub max_graph_node_x: f64,
    pub max_back_edge_number: u32,
    pub state: GraphStateType,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) -> NodeIdx {
        let idx = self.nodes.len();
        self.node_map.insert(node.id, idx);
        self.nodes.push(node);
        idx
    }

    /// Wire an edge between two already-parsed nodes, resolving endpoints by
    /// dump id. Dangling references are dropped (truncated dumps).
    pub fn add_edge(
        &mut self,
        source_id: i64,
        target_id: i64,
        index: i32,
        kind: EdgeKind,
    ) -> Option<EdgeIdx> {
        let (Some(source), Some(target)) = (self.node_map.get(source_id), self.node_map.get(target_id))
        else {
            warn!(source_id, target_id, "dropping edge with dangling endpoint");
            return None;
        };
        let idx = self.edges.len();
        self.edges.push(GraphEdge::new(source, target, index, kind));
        self.nodes[source].outputs.push(idx);
        self.nodes[target].inputs.push(idx);
        if kind == EdgeKind::Control {
            self.nodes[source].cfg = true;
        }
        Some(idx)
    }

    pub fn node_by_id(&self, id: i64) -> Option<&GraphNode> {
        self.node_map.get(id).map(|idx| &self.nodes[idx])
    }

    // ─── Iteration ───────────────────────────────────────────────────────────

    pub fn nodes_where<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a GraphNode>
    where
        P: Fn(&GraphNode) -> bool + 'a,
    {
        self.nodes.iter().filter(move |n| predicate(n))
    }

    pub fn filtered_edges<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a GraphEdge>
    where
        P: Fn(&GraphEdge) -> bool + 'a,
    {
        self.edges.iter().filter(move |e| predicate(e))
    }

    /// Edge visibility does not follow node visibility automatically; this is
    /// the reconciled "effectively visible" test.
    pub fn is_edge_visible(&self, edge: EdgeIdx) -> bool {
        let e = &self.edges[edge];
        e.visible && self.nodes[e.source].visible && self.nodes[e.target].visible
    }

    pub fn show_all(&mut self) {
        for node in &mut self.nodes {
            node.visible = true;
        }
        for edge in &mut self.edges {
            edge.visible = true;
        }
    }

    // ─── Back edges ──────────────────────────────────────────────────────────

    /// A loop header, or a loop-carried phi whose last input is control.
    pub fn node_has_back_edges(&self, node: NodeIdx) -> bool {
        let n = &self.nodes[node];
        if n.is_loop() {
            return true;
        }
        if n.may_receive_back_edges() {
            if let Some(&last) = n.inputs.last() {
                return self.edges[last].kind == EdgeKind::Control;
            }
        }
        false
    }

    /// A back edge points to an ancestor in rank order.
    pub fn is_back_edge(&self, edge: EdgeIdx) -> bool {
        let e = &self.edges[edge];
        self.node_has_back_edges(e.target) && self.nodes[e.target].rank < self.nodes[e.source].rank
    }

    // ─── Bounding box ────────────────────────────────────────────────────────

    /// Recompute the derived extents from visible node geometry. Only valid
    /// after a layout pass has assigned coordinates.
    pub fn redetermine_graph_bounding_box(
        &mut self,
        show_properties: bool,
    ) -> ((f64, f64), (f64, f64)) {
        self.min_graph_x = 0.0;
        self.max_graph_node_x = 1.0;
        self.min_graph_y = 0.0;
        self.max_graph_y = 1.0;
        let mut first = true;
        for node in self.nodes.iter().filter(|n| n.visible) {
            if first {
                self.min_graph_x = node.x;
                self.max_graph_node_x = node.x + node.width();
                self.min_graph_y = node.y;
                self.max_graph_y = node.y + node.height(show_properties);
                first = false;
                continue;
            }
            self.min_graph_x = self.min_graph_x.min(node.x);
            self.max_graph_node_x = self.max_graph_node_x.max(node.x + node.width());
            self.min_graph_y = self.min_graph_y.min(node.y);
            self.max_graph_y = self.max_graph_y.max(node.y + node.height(show_properties));
        }
        self.max_graph_x =
            self.max_graph_node_x + self.max_back_edge_number as f64 * MINIMUM_EDGE_SEPARATION;
        (
            (self.min_graph_x, self.min_graph_y),
            (self.max_graph_x, self.max_graph_y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_graph_x - self.min_graph_x
    }

    pub fn height(&self) -> f64 {
        self.max_graph_y - self.min_graph_y
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_graph_classic.rs"]
mod tests;
