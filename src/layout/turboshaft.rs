//! Hierarchical layout for the Turboshaft (block) graph.
//!
//! Same pipeline shape as the classic layout, operating on blocks: Merge
//! blocks take their rank from their last-listed predecessor, Loop blocks
//! from their first, and block heights come from the contained operations.
//! A cached rebuild renumbers back edges; toggling property display
//! additionally rederives block y positions from the cached ranks without
//! re-running any DFS.

use std::collections::VecDeque;
use std::time::Instant;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use tracing::debug;

use crate::error::{IrVizError, Result};
use crate::graph::{
    BlockKind, GraphStateType, MAX_RANK_SENTINEL, MINIMUM_EDGE_SEPARATION,
    MINIMUM_NODE_OUTPUT_APPROACH, NodeIdx, RANK_SEPARATION, TurboshaftGraph,
};
use crate::layout::occupation::LayoutOccupation;

pub struct TurboshaftGraphLayout;

impl TurboshaftGraphLayout {
    pub fn rebuild(graph: &mut TurboshaftGraph, show_properties: bool) -> Result<()> {
        match graph.state {
            GraphStateType::Cached => {
                Self::calculate_back_edge_numbers(graph);
                Ok(())
            }
            GraphStateType::NeedToFullRebuild => {
                let start = Instant::now();
                Self::full_rebuild(graph, show_properties)?;
                graph.state = GraphStateType::Cached;
                debug!(elapsed = ?start.elapsed(), blocks = graph.blocks.len(), "layout turboshaft graph");
                Ok(())
            }
        }
    }

    /// Display-only toggles change block heights but not topology: rebuild
    /// the vertical packing from the cached ranks, leaving rank and x alone.
    pub fn refresh_block_positions(graph: &mut TurboshaftGraph, show_properties: bool) {
        let mut max_rank = 0;
        for block in graph.blocks.iter().filter(|b| b.visible) {
            if block.rank != MAX_RANK_SENTINEL {
                max_rank = max_rank.max(block.rank);
            }
        }
        let mut y = 0.0;
        for rank in 0..=max_rank {
            let members: Vec<NodeIdx> = (0..graph.blocks.len())
                .filter(|&b| graph.blocks[b].visible && graph.blocks[b].rank == rank)
                .collect();
            let mut max_height: f64 = 0.0;
            for &b in &members {
                max_height = max_height.max(graph.block_height(b, show_properties));
            }
            for &b in &members {
                graph.blocks[b].y = y;
            }
            y += max_height + RANK_SEPARATION;
        }
        graph.redetermine_graph_bounding_box(show_properties);
    }

    fn full_rebuild(graph: &mut TurboshaftGraph, show_properties: bool) -> Result<()> {
        for block in &mut graph.blocks {
            block.rank = MAX_RANK_SENTINEL;
            block.visit_order_within_rank = 0;
            block.output_approach = MINIMUM_NODE_OUTPUT_APPROACH;
        }

        let candidate_back = Self::find_candidate_back_edges(graph);
        Self::check_for_unbroken_cycles(graph, &candidate_back)?;
        let roots = Self::start_blocks(graph, &candidate_back);
        let max_rank = Self::assign_ranks(graph, &roots, &candidate_back)?;
        Self::dfs_find_rank_late(graph, &roots);
        Self::dfs_rank_order(graph, &roots);

        let mut rank_sets = Self::build_rank_sets(graph, max_rank, show_properties);
        Self::place_blocks(graph, &mut rank_sets);
        Self::calculate_back_edge_numbers(graph);
        graph.redetermine_graph_bounding_box(show_properties);
        Ok(())
    }

    /// DFS marking of edges that close a cycle into a Loop block; see the
    /// classic variant for the rationale.
    fn find_candidate_back_edges(graph: &TurboshaftGraph) -> Vec<bool> {
        let mut candidate = vec![false; graph.edges.len()];
        let mut state = vec![0u8; graph.blocks.len()];

        let mut entries: Vec<NodeIdx> = (0..graph.blocks.len())
            .filter(|&b| {
                graph.blocks[b].visible
                    && !graph.blocks[b]
                        .inputs
                        .iter()
                        .any(|&e| graph.is_edge_visible(e))
            })
            .collect();
        entries.extend(
            (0..graph.blocks.len())
                .filter(|&b| graph.blocks[b].visible && graph.blocks[b].has_back_edges()),
        );
        entries.extend((0..graph.blocks.len()).filter(|&b| graph.blocks[b].visible));

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
                    Frame::Enter(b) => {
                        if state[b] != 0 {
                            continue;
                        }
                        state[b] = 1;
                        stack.push(Frame::Exit(b));
                        for &e in graph.blocks[b].outputs.iter().rev() {
                            if !graph.is_edge_visible(e) {
                                continue;
                            }
                            let target = graph.edges[e].target;
                            if state[target] == 1 && graph.blocks[target].has_back_edges() {
                                candidate[e] = true;
                            } else if state[target] == 0 {
                                stack.push(Frame::Enter(target));
                            }
                        }
                    }
                    Frame::Exit(b) => state[b] = 2,
                }
            }
        }
        candidate
    }

    fn check_for_unbroken_cycles(
        graph: &TurboshaftGraph,
        candidate_back: &[bool],
    ) -> Result<()> {
        let mut dag: DiGraph<NodeIdx, ()> = DiGraph::new();
        let indices: Vec<_> = (0..graph.blocks.len()).map(|b| dag.add_node(b)).collect();
        for (e, edge) in graph.edges.iter().enumerate() {
            if graph.is_edge_visible(e) && !candidate_back[e] {
                dag.add_edge(indices[edge.source], indices[edge.target], ());
            }
        }
        match toposort(&dag, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(IrVizError::UnbrokenCycle {
                node_id: graph.blocks[dag[cycle.node_id()]].id,
            }),
        }
    }

    fn start_blocks(graph: &TurboshaftGraph, candidate_back: &[bool]) -> Vec<NodeIdx> {
        (0..graph.blocks.len())
            .filter(|&b| {
                graph.blocks[b].visible
                    && !graph.blocks[b]
                        .inputs
                        .iter()
                        .any(|&e| graph.is_edge_visible(e) && !candidate_back[e])
            })
            .collect()
    }

    /// A Merge's rank is driven by its dominant (last-listed) predecessor,
    /// a Loop's by its forward entry; plain blocks consult all predecessors.
    fn ranking_inputs(graph: &TurboshaftGraph, b: NodeIdx, candidate_back: &[bool]) -> Vec<usize> {
        let forward: Vec<usize> = graph.blocks[b]
            .inputs
            .iter()
            .copied()
            .filter(|&e| graph.is_edge_visible(e) && !candidate_back[e])
            .collect();
        match graph.blocks[b].kind {
            BlockKind::Merge => forward.last().copied().into_iter().collect(),
            BlockKind::Loop => forward.first().copied().into_iter().collect(),
            BlockKind::Block => forward,
        }
    }

    fn assign_ranks(
        graph: &mut TurboshaftGraph,
        roots: &[NodeIdx],
        candidate_back: &[bool],
    ) -> Result<i32> {
        let mut worklist: VecDeque<NodeIdx> = roots.iter().copied().collect();
        let bound = graph
            .blocks
            .len()
            .saturating_mul(graph.blocks.len())
            .saturating_add(64);
        let mut popped = 0usize;
        let mut max_rank = 0;

        while let Some(b) = worklist.pop_front() {
            popped += 1;
            if popped > bound {
                return Err(IrVizError::RankBound(bound));
            }
            if !graph.blocks[b].visible {
                continue;
            }

            let mut changed = false;
            if graph.blocks[b].rank == MAX_RANK_SENTINEL {
                graph.blocks[b].rank = 1;
                changed = true;
            }

            for e in Self::ranking_inputs(graph, b, candidate_back) {
                let input_rank = graph.blocks[graph.edges[e].source].rank;
                if input_rank == MAX_RANK_SENTINEL {
                    continue;
                }
                if input_rank >= graph.blocks[b].rank {
                    graph.blocks[b].rank = input_rank + 1;
                    changed = true;
                }
            }

            if changed {
                max_rank = max_rank.max(graph.blocks[b].rank);
                let has_back_edges = graph.blocks[b].has_back_edges();
                for (nth, &e) in graph.blocks[b].outputs.clone().iter().enumerate() {
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

    /// Pull each block's rank later, to just above its earliest successor,
    /// when all successors past the original rank agree. Merge blocks keep
    /// the rank the worklist gave them.
    fn dfs_find_rank_late(graph: &mut TurboshaftGraph, roots: &[NodeIdx]) {
        enum Frame {
            Enter(NodeIdx),
            Exit(NodeIdx),
        }
        let mut visited = vec![false; graph.blocks.len()];
        let mut stack: Vec<Frame> = roots.iter().rev().map(|&b| Frame::Enter(b)).collect();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(b) => {
                    if visited[b] {
                        continue;
                    }
                    visited[b] = true;
                    stack.push(Frame::Exit(b));
                    for &e in graph.blocks[b].outputs.iter().rev() {
                        stack.push(Frame::Enter(graph.edges[e].target));
                    }
                }
                Frame::Exit(b) => {
                    let original_rank = graph.blocks[b].rank;
                    let mut new_rank = original_rank;
                    let mut first = true;
                    for &e in &graph.blocks[b].outputs {
                        let target = graph.edges[e].target;
                        let output_rank = graph.blocks[target].rank;
                        if graph.blocks[target].visible
                            && output_rank != MAX_RANK_SENTINEL
                            && (first || output_rank <= new_rank)
                            && output_rank > original_rank
                        {
                            new_rank = output_rank - 1;
                        }
                        first = false;
                    }
                    if graph.blocks[b].kind != BlockKind::Merge && new_rank > original_rank {
                        graph.blocks[b].rank = new_rank;
                    }
                }
            }
        }
    }

    fn dfs_rank_order(graph: &mut TurboshaftGraph, roots: &[NodeIdx]) {
        enum Frame {
            Enter(NodeIdx),
            Exit(NodeIdx),
        }
        let mut visited = vec![false; graph.blocks.len()];
        let mut stack: Vec<Frame> = roots.iter().rev().map(|&b| Frame::Enter(b)).collect();
        let mut order = 0u32;

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(b) => {
                    if visited[b] {
                        continue;
                    }
                    visited[b] = true;
                    stack.push(Frame::Exit(b));
                    for &e in graph.blocks[b].outputs.iter().rev() {
                        if graph.is_edge_visible(e) {
                            stack.push(Frame::Enter(graph.edges[e].target));
                        }
                    }
                }
                Frame::Exit(b) => {
                    if graph.blocks[b].visit_order_within_rank == 0 {
                        order += 1;
                        graph.blocks[b].visit_order_within_rank = order;
                    }
                }
            }
        }
    }

    fn build_rank_sets(
        graph: &mut TurboshaftGraph,
        max_rank: i32,
        show_properties: bool,
    ) -> Vec<Vec<NodeIdx>> {
        let count = max_rank.max(0) as usize + 1;
        let mut rank_sets: Vec<Vec<NodeIdx>> = vec![Vec::new(); count];
        for b in 0..graph.blocks.len() {
            let rank = graph.blocks[b].rank;
            if graph.blocks[b].visible && rank != MAX_RANK_SENTINEL && (rank as usize) < count {
                rank_sets[rank as usize].push(b);
            }
        }

        let mut y = 0.0;
        for set in &rank_sets {
            let mut max_height: f64 = 0.0;
            for &b in set {
                max_height = max_height.max(graph.block_height(b, show_properties));
            }
            for &b in set {
                graph.blocks[b].y = y;
            }
            y += max_height + RANK_SEPARATION;
        }
        rank_sets
    }

    fn place_blocks(graph: &mut TurboshaftGraph, rank_sets: &mut [Vec<NodeIdx>]) {
        let mut occupation = LayoutOccupation::new();

        for set in rank_sets.iter_mut().rev() {
            let mut hints: Vec<(NodeIdx, Vec<f64>)> = Vec::with_capacity(set.len());
            for &b in set.iter() {
                let centers = occupation.clear_outputs(&graph.blocks[b].outputs);
                hints.push((b, centers));
            }

            set.sort_by_key(|&b| (graph.blocks[b].visit_order_within_rank, graph.blocks[b].id));

            for (placed, &b) in set.iter().enumerate() {
                let width = graph.block_width(b);
                let centers = hints
                    .iter()
                    .find(|(idx, _)| *idx == b)
                    .map(|(_, c)| c.as_slice())
                    .unwrap_or(&[]);
                let ideal = if centers.is_empty() {
                    width / 2.0
                } else {
                    centers.iter().sum::<f64>() / centers.len() as f64
                };
                graph.blocks[b].x = occupation.occupy(width, ideal);
                graph.blocks[b].output_approach += MINIMUM_EDGE_SEPARATION * (placed % 3) as f64;
            }
            occupation.clear_occupied();

            for &b in set.iter() {
                let width = graph.block_width(b);
                let slots = graph.blocks[b].inputs.len().max(1) as f64;
                let entries: Vec<(usize, f64)> = graph.blocks[b]
                    .inputs
                    .iter()
                    .enumerate()
                    .filter(|&(_, &e)| graph.is_edge_visible(e))
                    .map(|(nth, &e)| {
                        let center = graph.blocks[b].x + (nth as f64 + 0.5) * (width / slots);
                        (e, center)
                    })
                    .collect();
                occupation.occupy_inputs(&entries);
            }
        }
    }

    pub fn calculate_back_edge_numbers(graph: &mut TurboshaftGraph) {
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
#[path = "../../tests/rust/test_layout_turboshaft.rs"]
mod tests;
