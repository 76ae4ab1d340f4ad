//! End-to-end: JSON dump in, laid-out scene elements out.

use irviz::graph::GraphStateType;
use irviz::phases::{Phase, PhaseKind};
use irviz::render::{ClassicGraphView, GraphicalView, TurboshaftGraphView};
use irviz::selection::{SelectionBroker, SourceResolver};
use irviz::{AnalysisSession, DumpResolver, load_dump};

const DUMP: &str = r#"{
  "function": {"functionName": "loopy", "sourceId": 0},
  "nodePositions": {"2": {"scriptOffset": 4, "inliningId": -1}},
  "phases": [
    {"name": "TyperPhase", "type": "graph", "data": {
      "nodes": [
        {"id": 0, "label": "Start", "title": "Start", "opcode": "Start", "control": true},
        {"id": 1, "label": "Loop", "title": "Loop", "opcode": "Loop", "control": true},
        {"id": 2, "label": "Add", "title": "NumberAdd", "opcode": "NumberAdd",
         "sourcePosition": {"scriptOffset": 4, "inliningId": -1}},
        {"id": 3, "label": "End", "title": "End", "opcode": "End", "control": true}
      ],
      "edges": [
        {"source": 0, "target": 1, "index": 0, "type": "control"},
        {"source": 1, "target": 2, "index": 0, "type": "control"},
        {"source": 2, "target": 1, "index": 0, "type": "control"},
        {"source": 2, "target": 3, "index": 0, "type": "control"}
      ]
    }},
    {"name": "CodegenPhase", "type": "turboshaft_graph", "data": {
      "blocks": [
        {"id": 0, "type": "BLOCK", "deferred": false, "predecessors": []},
        {"id": 1, "type": "LOOP", "deferred": false, "predecessors": [0, 2]},
        {"id": 2, "type": "BLOCK", "deferred": false, "predecessors": [1]}
      ],
      "nodes": [
        {"id": 10, "title": "Parameter", "block_id": 0},
        {"id": 11, "title": "Add", "block_id": 1},
        {"id": 12, "title": "Return", "block_id": 2}
      ],
      "edges": [{"source": 10, "target": 11}, {"source": 11, "target": 12}]
    }},
    {"name": "SelectInstructions", "type": "instructions",
     "nodeIdToInstructionRange": [null, null, [3, 5]]}
  ]
}"#;

#[test]
fn test_classic_phase_end_to_end() {
    let mut session = AnalysisSession::new();
    let dump = load_dump(DUMP, &mut session).unwrap();
    assert_eq!(dump.function_name, "loopy");

    let mut phases = dump.phases.into_iter();
    let Some(Phase::Graph(phase)) = phases.next() else {
        panic!("expected the classic graph phase first");
    };

    let mut view = ClassicGraphView::initialize_content(phase, false, None).unwrap();
    assert_eq!(view.graph.state, GraphStateType::Cached);

    // Loop shape: Start(1) → Loop(2) → Add(3), with Add → Loop as the
    // single numbered back edge.
    assert_eq!(view.graph.node_by_id(0).unwrap().rank, 1);
    assert_eq!(view.graph.node_by_id(1).unwrap().rank, 2);
    assert_eq!(view.graph.node_by_id(2).unwrap().rank, 3);
    assert_eq!(view.graph.max_back_edge_number, 1);
    assert!(view.graph.is_back_edge(2));

    let diff = view.update_graph_visibility();
    // Four nodes and four edges.
    assert_eq!(diff.inserted.len(), 8);
    assert!(view.update_graph_visibility().is_empty());
}

#[test]
fn test_turboshaft_phase_end_to_end() {
    let mut session = AnalysisSession::new();
    let dump = load_dump(DUMP, &mut session).unwrap();

    let phase = dump
        .phases
        .into_iter()
        .find_map(|p| match p {
            Phase::TurboshaftGraph(p) => Some(p),
            _ => None,
        })
        .unwrap();

    let mut view = TurboshaftGraphView::initialize_content(phase, false, None).unwrap();
    assert_eq!(view.graph.block_by_id(0).unwrap().rank, 1);
    assert_eq!(view.graph.block_by_id(1).unwrap().rank, 2);
    assert_eq!(view.graph.block_by_id(2).unwrap().rank, 3);
    assert_eq!(view.graph.max_back_edge_number, 1);

    let diff = view.update_graph_visibility();
    // Three blocks, three contained nodes, three block edges.
    assert_eq!(diff.inserted.len(), 9);
    assert!(view.update_graph_visibility().is_empty());
}

#[test]
fn test_resolver_backs_broker_translation() {
    let mut session = AnalysisSession::new();
    let dump = load_dump(DUMP, &mut session).unwrap();
    let resolver = DumpResolver::from_dump(&dump);

    assert_eq!(resolver.node_id_to_instruction_range(2), Some((3, 5)));
    let positions = resolver.node_ids_to_source_positions(&[2]);
    assert_eq!(resolver.source_positions_to_node_ids(&positions), vec![2]);

    // A broker built over the resolver accepts broadcasts with no handlers.
    let mut broker = SelectionBroker::new(Box::new(resolver));
    broker.broadcast_node_select(None, &[2], true);
    broker.broadcast_clear(None);
}

#[test]
fn test_phase_list_kinds() {
    let mut session = AnalysisSession::new();
    let dump = load_dump(DUMP, &mut session).unwrap();
    let kinds: Vec<PhaseKind> = dump.phases.iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PhaseKind::Graph,
            PhaseKind::TurboshaftGraph,
            PhaseKind::Instructions
        ]
    );
}
