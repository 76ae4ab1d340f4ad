use super::*;

use crate::graph::{EdgeKind, Graph, GraphNode};
use crate::phases::GraphPhase;
use crate::position::Origin;
use crate::selection::SelectionStorage;

fn diamond_phase() -> GraphPhase {
    let mut graph = Graph::new();
    graph.add_node(GraphNode::new(0, "A", ""));
    graph.add_node(GraphNode::new(1, "B", ""));
    graph.add_node(GraphNode::new(2, "C", ""));
    graph.add_node(GraphNode::new(3, "D", ""));
    graph.add_edge(0, 1, 0, EdgeKind::Value);
    graph.add_edge(0, 2, 0, EdgeKind::Value);
    graph.add_edge(1, 3, 0, EdgeKind::Value);
    graph.add_edge(2, 3, 1, EdgeKind::Value);
    GraphPhase {
        name: "TyperPhase".to_string(),
        graph,
        highest_node_id: 3,
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────────

#[test]
fn test_scene_reconcile_reports_diff() {
    let mut scene = SvgScene::new();
    let diff = scene.reconcile(["a".to_string(), "b".to_string()].into());
    assert_eq!(diff.inserted, vec!["a".to_string(), "b".to_string()]);
    assert!(diff.removed.is_empty());

    let diff = scene.reconcile(["b".to_string(), "c".to_string()].into());
    assert_eq!(diff.inserted, vec!["c".to_string()]);
    assert_eq!(diff.removed, vec!["a".to_string()]);
}

#[test]
fn test_update_graph_visibility_is_idempotent() {
    let mut view = ClassicGraphView::initialize_content(diamond_phase(), false, None).unwrap();
    let first = view.update_graph_visibility();
    assert!(!first.inserted.is_empty());
    let second = view.update_graph_visibility();
    assert!(second.is_empty());
}

#[test]
fn test_hiding_a_node_removes_its_elements() {
    let mut view = ClassicGraphView::initialize_content(diamond_phase(), false, None).unwrap();
    view.update_graph_visibility();
    view.graph.nodes[3].visible = false;
    let diff = view.update_graph_visibility();
    assert!(diff.inserted.is_empty());
    // The node itself and its two incoming edges disappear.
    assert_eq!(diff.removed.len(), 3);
}

// ─── Paths ───────────────────────────────────────────────────────────────────

#[test]
fn test_forward_edge_path_is_four_points() {
    let mut view = ClassicGraphView::initialize_content(diamond_phase(), false, None).unwrap();
    view.update_graph_visibility();
    let path = generate_path(&view.graph, 0, false);
    assert!(path.starts_with("M "));
    assert_eq!(path.matches('L').count(), 3);
}

#[test]
fn test_back_edge_path_routes_outside_node_column() {
    let mut graph = Graph::new();
    let mut header = GraphNode::new(0, "Loop", "");
    header.opcode = "Loop".to_string();
    graph.add_node(header);
    graph.add_node(GraphNode::new(1, "B", ""));
    graph.add_edge(0, 1, 0, EdgeKind::Control);
    graph.add_edge(1, 0, 0, EdgeKind::Control);
    crate::layout::GraphLayout::rebuild(&mut graph, false).unwrap();

    let path = generate_path(&graph, 1, false);
    let lane_x = graph.max_graph_node_x + crate::graph::MINIMUM_EDGE_SEPARATION;
    assert!(path.contains(&format!("L {lane_x} ")));
}

// ─── Selection across phases ─────────────────────────────────────────────────

#[test]
fn test_detach_and_adapt_by_same_id() {
    let mut view = ClassicGraphView::initialize_content(diamond_phase(), false, None).unwrap();
    view.select_nodes(&[1, 2], true);
    let storage = view.detach_selection();
    assert!(view.selected_node_ids().is_empty());

    let rebuilt =
        ClassicGraphView::initialize_content(diamond_phase(), false, Some(&storage)).unwrap();
    let mut ids = rebuilt.selected_node_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_adapt_follows_origin_chain() {
    let mut view = ClassicGraphView::initialize_content(diamond_phase(), false, None).unwrap();
    view.select_nodes(&[1], true);
    let storage = view.detach_selection();

    // Next phase renumbered the node; its origin still points at id 1.
    let mut phase = diamond_phase();
    phase.graph.nodes[1].id = 21;
    phase.graph.nodes[1].origin = Some(Origin::Node {
        node_id: 1,
        phase: "TyperPhase".to_string(),
        reducer: "Renumber".to_string(),
    });
    let rebuilt = ClassicGraphView::initialize_content(phase, false, Some(&storage)).unwrap();
    assert_eq!(rebuilt.selected_node_ids(), vec![21]);
}

#[test]
fn test_view_whole_graph_fits_bounds() {
    let mut view = ClassicGraphView::initialize_content(diamond_phase(), false, None).unwrap();
    let camera = view.view_whole_graph(500.0, 500.0);
    assert!(camera.scale > 0.0);
    let camera_zoomed = view.view_whole_graph(1000.0, 1000.0);
    assert_eq!(camera_zoomed.scale, camera.scale * 2.0);
}

#[test]
fn test_empty_selection_storage() {
    let storage = SelectionStorage::default();
    assert!(storage.is_empty());
}
