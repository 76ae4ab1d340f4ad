use super::*;
use crate::graph::{TurboshaftGraphBlock, TurboshaftGraphNode};

fn rank_of(graph: &TurboshaftGraph, id: i64) -> i32 {
    graph.block_by_id(id).unwrap().rank
}

/// B0 → B1 → B2, B0 → B3, with both B2 and B3 feeding merge B4. The two
/// predecessors of the merge sit at different ranks.
fn merge_graph() -> TurboshaftGraph {
    let mut graph = TurboshaftGraph::new();
    graph.add_block(TurboshaftGraphBlock::new(0, BlockKind::Block, false, vec![]));
    graph.add_block(TurboshaftGraphBlock::new(1, BlockKind::Block, false, vec![0]));
    graph.add_block(TurboshaftGraphBlock::new(2, BlockKind::Block, false, vec![1]));
    graph.add_block(TurboshaftGraphBlock::new(3, BlockKind::Block, false, vec![0]));
    graph.add_block(TurboshaftGraphBlock::new(4, BlockKind::Merge, false, vec![3, 2]));
    graph.add_block_edge(0, 1);
    graph.add_block_edge(1, 2);
    graph.add_block_edge(0, 3);
    graph.add_block_edge(3, 4);
    graph.add_block_edge(2, 4);
    graph
}

fn loop_graph() -> TurboshaftGraph {
    let mut graph = TurboshaftGraph::new();
    graph.add_block(TurboshaftGraphBlock::new(0, BlockKind::Block, false, vec![]));
    graph.add_block(TurboshaftGraphBlock::new(1, BlockKind::Loop, false, vec![0, 2]));
    graph.add_block(TurboshaftGraphBlock::new(2, BlockKind::Block, false, vec![1]));
    graph.add_block_edge(0, 1);
    graph.add_block_edge(2, 1);
    graph.add_block_edge(1, 2);
    graph
}

#[test]
fn test_merge_rank_follows_last_predecessor() {
    let mut graph = merge_graph();
    TurboshaftGraphLayout::rebuild(&mut graph, false).unwrap();
    assert_eq!(rank_of(&graph, 2), 3);
    // B3 floats down next to the merge it feeds.
    assert_eq!(rank_of(&graph, 3), 3);
    // rank(M) = max(predecessor ranks) + 1, driven by the last-listed
    // predecessor (B2 at rank 3), not an average.
    assert_eq!(rank_of(&graph, 4), 4);
}

#[test]
fn test_loop_ranks_and_back_edge() {
    let mut graph = loop_graph();
    TurboshaftGraphLayout::rebuild(&mut graph, false).unwrap();
    assert_eq!(rank_of(&graph, 0), 1);
    assert_eq!(rank_of(&graph, 1), 2);
    assert_eq!(rank_of(&graph, 2), 3);
    // Edge 1 is B2 → B1, the loop continuation.
    assert!(graph.is_back_edge(1));
    assert_eq!(graph.edges[1].back_edge_number, 1);
    assert_eq!(graph.max_back_edge_number, 1);
}

#[test]
fn test_no_horizontal_overlap_at_shared_rank() {
    let mut graph = merge_graph();
    TurboshaftGraphLayout::rebuild(&mut graph, false).unwrap();
    for a in 0..graph.blocks.len() {
        for b in (a + 1)..graph.blocks.len() {
            if graph.blocks[a].rank != graph.blocks[b].rank {
                continue;
            }
            let (a_start, a_end) = (graph.blocks[a].x, graph.blocks[a].x + graph.block_width(a));
            let (b_start, b_end) = (graph.blocks[b].x, graph.blocks[b].x + graph.block_width(b));
            assert!(a_end <= b_start || b_end <= a_start);
        }
    }
}

#[test]
fn test_ranks_pack_vertically() {
    let mut graph = merge_graph();
    TurboshaftGraphLayout::rebuild(&mut graph, false).unwrap();
    let mut by_rank: Vec<(i32, f64)> = graph.blocks.iter().map(|b| (b.rank, b.y)).collect();
    by_rank.sort_by(|a, b| a.0.cmp(&b.0));
    for pair in by_rank.windows(2) {
        if pair[0].0 < pair[1].0 {
            assert!(pair[0].1 < pair[1].1);
        } else {
            assert_eq!(pair[0].1, pair[1].1);
        }
    }
}

#[test]
fn test_refresh_block_positions_tracks_heights() {
    let mut graph = loop_graph();
    let mut node = TurboshaftGraphNode::new(10, "Load", 1);
    node.properties = "eliminatable".to_string();
    graph.add_node(node);
    TurboshaftGraphLayout::rebuild(&mut graph, false).unwrap();
    let y_before = graph.block_by_id(2).unwrap().y;
    TurboshaftGraphLayout::refresh_block_positions(&mut graph, true);
    let y_after = graph.block_by_id(2).unwrap().y;
    // Block 1 grew, so everything below it moved down.
    assert!(y_after > y_before);
    // Ranks and x positions are untouched by the refresh.
    assert_eq!(graph.block_by_id(2).unwrap().rank, 3);
}

#[test]
fn test_cached_rebuild_only_renumbers() {
    let mut graph = loop_graph();
    TurboshaftGraphLayout::rebuild(&mut graph, false).unwrap();
    assert_eq!(graph.state, GraphStateType::Cached);
    let coords: Vec<(f64, f64)> = graph.blocks.iter().map(|b| (b.x, b.y)).collect();
    graph.edges[1].back_edge_number = 0;
    graph.max_back_edge_number = 0;
    TurboshaftGraphLayout::rebuild(&mut graph, false).unwrap();
    assert_eq!(graph.edges[1].back_edge_number, 1);
    let after: Vec<(f64, f64)> = graph.blocks.iter().map(|b| (b.x, b.y)).collect();
    assert_eq!(coords, after);
}
