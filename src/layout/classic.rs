//! Hierarchical layout for the classic graph.
//!
//! A full rebuild runs: structural back-edge candidate detection, rank
//! assignment (forward worklist with loop-header and phi special cases),
//! late rank adjustment, DFS visit ordering, vertical rank packing,
//! reverse-rank horizontal placement through `LayoutOccupation`, and dense
//! back-edge numbering. A cached rebuild renumbers back edges only; prior
//! rank/x/y assignments are assumed valid for the unchanged node set.

use std::collections::VecDeque;
use std::time::Instant;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use tracing::debug;

use crate::error::{IrVizError, Result};
use crate::graph::{
    Graph, GraphStateType, MAX_RANK_SENTINEL, MINIMUM_EDGE_SEPARATION,
    MINIMUM_NODE_OUTPUT_APPROACH, NodeIdx, RANK_SEPARATION,
};
use crate::layout::occupation::LayoutOccupation;

pub struct GraphLayout;

impl GraphLayout {
    /// Recompute layout according to the graph's cache state. After this
    /// returns, every visible node has concrete coordinates and every back
    /// edge a dense number.
    pub fn rebuild(graph: &mut Graph, show_properties: bool) -> Result<()> {
        match graph.state {
            GraphStateType::Cached => {
                Self::calculate_back_edge_numbers(graph);
                Ok(())
            }
            GraphStateType::NeedToFullRebuild => {
                let start = Instant::now();
                Self::full_rebuild(graph, show_properties)?;
                graph.state = GraphStateType::Cached;
                debug!(elapsed = ?start.elapsed(), nodes = graph.nodes.len(), "layout graph");
                Ok(())
            }
        }
    }

    fn full_rebuild(graph: &mut Graph, show_properties: bool) -> Result<()> {
        for node in &mut graph.nodes {
            node.rank = MAX_RANK_SENTINEL;
            node.visit_order_within_rank = 0;
            node.output_approach = MINIMUM_NODE_OUTPUT_APPROACH;
        }

        let candidate_back = Self::find_candidate_back_edges(graph);
        Self::check_for_unbroken_cycles(graph, &candidate_back)?;
        let roots = Self::start_nodes(graph, &candidate_back);
        let max_rank = Self::assign_ranks(graph, &roots, &candidate_back)?;
        Self::dfs_find_rank_late(graph, &roots);
        Self::dfs_rank_order(graph, &roots);

        // Late adjustment only moves ranks toward max_rank, never past it.
        let mut rank_sets = Self::build_rank_sets(graph, max_rank, show_properties);
        Self::place_nodes(graph, &mut rank_sets);
        Self::calculate_back_edge_numbers(graph);
        graph.redetermine_graph_bounding_box(show_properties);
        Ok(())
    }

    /// Structural pass ahead of ranking: a DFS over the visible graph marks
    /// each edge that closes a cycle into a loop header as a candidate back
    /// edge. Candidates are excluded from root finding and rank propagation,
    /// which is what keeps the worklist finite on loops. The definitive
    /// `is_back_edge` classification stays rank-based.
    fn find_candidate_back_edges(graph: &Graph) -> Vec<bool> {
        let mut candidate = vec![false; graph.edges.len()];
        let mut state = vec![0u8; graph.nodes.len()]; // 0 white, 1 grey, 2 black

        // Entry nodes first, then unvisited loop headers, then anything left.
        let mut entries: Vec<NodeIdx> = (0..graph.nodes.len())
            .filter(|&n| {
                graph.nodes[n].visible
                    && !graph.nodes[n]
                        .inputs
                        .iter()
                        .any(|&e| graph.is_edge_visible(e))
            })
            .collect();
        entries.extend(
            (0..graph.nodes.len())
                .filter(|&n| graph.nodes[n].visible && graph.node_has_back_edges(n)),
        );
        entries.extend((0..graph.nodes.len()).filter(|&n| graph.nodes[n].visible));

        enum Frame {
            Enter(NodeIdx),
            Exit(NodeIdx),
        }
        for entry in entries {
            if state[entry] != 0 {
                continue;
            }
            let mut stack = vec![Frame::Enter(entry)];
            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter(n) => {
                        if state[n] != 0 {
                            continue;
                        }
                        state[n] = 1;
                        stack.push(Frame::Exit(n));
                        for &e in graph.nodes[n].outputs.iter().rev() {
                            if !graph.is_edge_visible(e) {
                                continue;
                            }
                            let target = graph.edges[e].target;
                            if state[target] == 1 && graph.node_has_back_edges(target) {
                                candidate[e] = true;
                            } else if state[target] == 0 {
                                stack.push(Frame::Enter(target));
                            }
                        }
                    }
                    Frame::Exit(n) => state[n] = 2,
                }
            }
        }
        candidate
    }

    /// The worklist below never terminates on a cycle that no loop header
    /// breaks, so reject such graphs up front with a diagnostic instead of
    /// hanging.
    fn check_for_unbroken_cycles(graph: &Graph, candidate_back: &[bool]) -> Result<()> {
        let mut dag: DiGraph<NodeIdx, ()> = DiGraph::new();
        let indices: Vec<_> = (0..graph.nodes.len()).map(|n| dag.add_node(n)).collect();
        for (e, edge) in graph.edges.iter().enumerate() {
            if graph.is_edge_visible(e) && !candidate_back[e] {
                dag.add_edge(indices[edge.source], indices[edge.target], ());
            }
        }
        match toposort(&dag, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(IrVizError::UnbrokenCycle {
                node_id: graph.nodes[dag[cycle.node_id()]].id,
            }),
        }
    }

    /// Visible nodes with no forward (non-candidate) visible input.
    fn start_nodes(graph: &Graph, candidate_back: &[bool]) -> Vec<NodeIdx> {
        (0..graph.nodes.len())
            .filter(|&n| {
                graph.nodes[n].visible
                    && !graph.nodes[n]
                        .inputs
                        .iter()
                        .any(|&e| graph.is_edge_visible(e) && !candidate_back[e])
            })
            .collect()
    }

    /// The forward inputs rank propagation consults for one node: phis stay
    /// with their merge/loop (last input only), loop headers follow their
    /// entry (first input only), everything else follows all inputs.
    fn ranking_inputs(graph: &Graph, n: NodeIdx, candidate_back: &[bool]) -> Vec<usize> {
        let forward: Vec<usize> = graph.nodes[n]
            .inputs
            .iter()
            .copied()
            .filter(|&e| graph.is_edge_visible(e) && !candidate_back[e])
            .collect();
        if graph.nodes[n].may_receive_back_edges() && !graph.nodes[n].is_loop() {
            forward.last().copied().into_iter().collect()
        } else if graph.node_has_back_edges(n) {
            forward.first().copied().into_iter().collect()
        } else {
            forward
        }
    }

    /// Forward worklist rank propagation. When a loop header's rank changes,
    /// its non-first consumers are pushed to the front so the loop body
    /// settles before fan-out.
    fn assign_ranks(graph: &mut Graph, roots: &[NodeIdx], candidate_back: &[bool]) -> Result<i32> {
        let mut worklist: VecDeque<NodeIdx> = roots.iter().copied().collect();
        let bound = graph
            .nodes
            .len()
            .saturating_mul(graph.nodes.len())
            .saturating_add(64);
        let mut popped = 0usize;
        let mut max_rank = 0;

        while let Some(n) = worklist.pop_front() {
            popped += 1;
            if popped > bound {
                return Err(IrVizError::RankBound(bound));
            }
            if !graph.nodes[n].visible {
                continue;
            }

            let mut changed = false;
            if graph.nodes[n].rank == MAX_RANK_SENTINEL {
                graph.nodes[n].rank = 1;
                changed = true;
            }

            for e in Self::ranking_inputs(graph, n, candidate_back) {
                let input_rank = graph.nodes[graph.edges[e].source].rank;
                if input_rank == MAX_RANK_SENTINEL {
                    continue;
                }
                if input_rank >= graph.nodes[n].rank {
                    graph.nodes[n].rank = input_rank + 1;
                    changed = true;
                }
            }

            if changed {
                max_rank = max_rank.max(graph.nodes[n].rank);
                let has_back_edges = graph.node_has_back_edges(n);
                for (nth, &e) in graph.nodes[n].outputs.clone().iter().enumerate() {
                    if !graph.is_edge_visible(e) {
                        continue;
                    }
                    let target = graph.edges[e].target;
                    if has_back_edges && nth != 0 {
                        worklist.push_front(target);
                    } else {
                        worklist.push_back(target);
                    }
                }
            }
        }
        Ok(max_rank)
    }

    /// Pull each node's rank later, to just above its earliest consumer,
    /// when all consumers past the original rank agree. Control nodes keep
    /// the rank the worklist gave them.
    fn dfs_find_rank_late(graph: &mut Graph, roots: &[NodeIdx]) {
        enum Frame {
            Enter(NodeIdx),
            Exit(NodeIdx),
        }
        let mut visited = vec![false; graph.nodes.len()];
        let mut stack: Vec<Frame> = roots.iter().rev().map(|&n| Frame::Enter(n)).collect();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(n) => {
                    if visited[n] {
                        continue;
                    }
                    visited[n] = true;
                    stack.push(Frame::Exit(n));
                    for &e in graph.nodes[n].outputs.iter().rev() {
                        stack.push(Frame::Enter(graph.edges[e].target));
                    }
                }
                Frame::Exit(n) => {
                    let original_rank = graph.nodes[n].rank;
                    let mut new_rank = original_rank;
                    let mut first = true;
                    for &e in &graph.nodes[n].outputs {
                        let target = graph.edges[e].target;
                        let output_rank = graph.nodes[target].rank;
                        if graph.nodes[target].visible
                            && output_rank != MAX_RANK_SENTINEL
                            && (first || output_rank <= new_rank)
                            && output_rank > original_rank
                        {
                            new_rank = output_rank - 1;
                        }
                        first = false;
                    }
                    if !graph.nodes[n].control && new_rank > original_rank {
                        graph.nodes[n].rank = new_rank;
                    }
                }
            }
        }
    }

    /// Post-order DFS over visible outputs; the completion counter becomes
    /// the within-rank tie-break so placement reads left to right in
    /// topological order.
    fn dfs_rank_order(graph: &mut Graph, roots: &[NodeIdx]) {
        enum Frame {
            Enter(NodeIdx),
            Exit(NodeIdx),
        }
        let mut visited = vec![false; graph.nodes.len()];
        let mut stack: Vec<Frame> = roots.iter().rev().map(|&n| Frame::Enter(n)).collect();
        let mut order = 0u32;

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(n) => {
                    if visited[n] {
                        continue;
                    }
                    visited[n] = true;
                    stack.push(Frame::Exit(n));
                    for &e in graph.nodes[n].outputs.iter().rev() {
                        if graph.is_edge_visible(e) {
                            stack.push(Frame::Enter(graph.edges[e].target));
                        }
                    }
                }
                Frame::Exit(n) => {
                    if graph.nodes[n].visit_order_within_rank == 0 {
                        order += 1;
                        graph.nodes[n].visit_order_within_rank = order;
                    }
                }
            }
        }
    }

    /// Group visible nodes by rank and pack ranks vertically: each rank's y
    /// is the running sum of the tallest member of every rank above it plus
    /// the separation constant.
    fn build_rank_sets(
        graph: &mut Graph,
        max_rank: i32,
        show_properties: bool,
    ) -> Vec<Vec<NodeIdx>> {
        let count = max_rank.max(0) as usize + 1;
        let mut rank_sets: Vec<Vec<NodeIdx>> = vec![Vec::new(); count];
        for n in 0..graph.nodes.len() {
            let rank = graph.nodes[n].rank;
            if graph.nodes[n].visible && rank != MAX_RANK_SENTINEL && (rank as usize) < count {
                rank_sets[rank as usize].push(n);
            }
        }

        let mut y = 0.0;
        for set in &rank_sets {
            let mut max_height: f64 = 0.0;
            for &n in set {
                max_height = max_height.max(graph.nodes[n].height(show_properties));
            }
            for &n in set {
                graph.nodes[n].y = y;
            }
            y += max_height + RANK_SEPARATION;
        }
        rank_sets
    }

    /// Reverse-rank horizontal placement. Consumers are placed first, so
    /// each node inherits a preferred position from where its outputs were
    /// reserved; every third placement staggers the output approach so edge
    /// lanes fan out instead of stacking.
    fn place_nodes(graph: &mut Graph, rank_sets: &mut [Vec<NodeIdx>]) {
        let mut occupation = LayoutOccupation::new();

        for set in rank_sets.iter_mut().rev() {
            let mut hints: Vec<(NodeIdx, Vec<f64>)> = Vec::with_capacity(set.len());
            for &n in set.iter() {
                let centers = occupation.clear_outputs(&graph.nodes[n].outputs);
                hints.push((n, centers));
            }

            set.sort_by_key(|&n| (graph.nodes[n].visit_order_within_rank, graph.nodes[n].id));

            for (placed, &n) in set.iter().enumerate() {
                let width = graph.nodes[n].width();
                let centers = hints
                    .iter()
                    .find(|(idx, _)| *idx == n)
                    .map(|(_, c)| c.as_slice())
                    .unwrap_or(&[]);
                let ideal = if centers.is_empty() {
                    width / 2.0
                } else {
                    centers.iter().sum::<f64>() / centers.len() as f64
                };
                graph.nodes[n].x = occupation.occupy(width, ideal);
                graph.nodes[n].output_approach += MINIMUM_EDGE_SEPARATION * (placed % 3) as f64;
            }
            occupation.print();
            occupation.clear_occupied();

            for &n in set.iter() {
                let entries: Vec<(usize, f64)> = graph.nodes[n]
                    .inputs
                    .iter()
                    .filter(|&&e| graph.is_edge_visible(e))
                    .map(|&e| {
                        let center =
                            graph.nodes[n].x + graph.nodes[n].input_x(graph.edges[e].index);
                        (e, center)
                    })
                    .collect();
                occupation.occupy_inputs(&entries);
            }
        }
    }

    /// Dense 1-based numbering of back edges in arena order; the number
    /// picks the routing lane outside the node columns.
    pub fn calculate_back_edge_numbers(graph: &mut Graph) {
        let mut next = 0u32;
        for e in 0..graph.edges.len() {
            if graph.is_back_edge(e) {
                next += 1;
                graph.edges[e].back_edge_number = next;
            } else {
                graph.edges[e].back_edge_number = 0;
            }
        }
        graph.max_back_edge_number = next;
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_layout_classic.rs"]
mod tests;
