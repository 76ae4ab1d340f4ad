use super::*;
use serde_json::json;

use crate::graph::EdgeKind;

fn parse(value: serde_json::Value) -> Result<Phase> {
    let mut session = AnalysisSession::new();
    parse_phase(value, &mut session)
}

#[test]
fn test_unknown_phase_type_is_fatal() {
    let err = parse(json!({"name": "x", "type": "flowgraph", "data": {}})).unwrap_err();
    assert!(matches!(err, IrVizError::UnsupportedPhaseType(t) if t == "flowgraph"));
}

#[test]
fn test_missing_type_is_fatal() {
    assert!(parse(json!({"name": "x", "data": {}})).is_err());
}

#[test]
fn test_graph_phase_missing_data_is_fatal() {
    let err = parse(json!({"name": "TyperPhase", "type": "graph"})).unwrap_err();
    assert!(matches!(err, IrVizError::MissingField { field, .. } if field == "data"));
}

#[test]
fn test_graph_phase_nodes_and_edges() {
    let phase = parse(json!({
        "name": "TyperPhase",
        "type": "graph",
        "data": {
            "nodes": [
                {"id": 0, "label": "Start", "title": "Start", "opcode": "Start",
                 "control": true, "opinfo": "", "type": ""},
                {"id": 1, "label": "Parameter[0]", "title": "Parameter", "opcode": "Parameter",
                 "sourcePosition": {"scriptOffset": 5, "inliningId": -1}}
            ],
            "edges": [
                {"source": 0, "target": 1, "index": 0, "type": "control"}
            ]
        }
    }))
    .unwrap();
    let Phase::Graph(p) = phase else {
        panic!("expected a graph phase");
    };
    assert_eq!(p.name, "TyperPhase");
    assert_eq!(p.highest_node_id, 1);
    assert_eq!(p.graph.nodes.len(), 2);
    assert_eq!(p.graph.edges.len(), 1);
    assert_eq!(p.graph.edges[0].kind, EdgeKind::Control);
    assert!(p.graph.nodes[0].cfg);
    assert_eq!(
        p.graph.nodes[1].source_position.unwrap().script_offset,
        5
    );
}

#[test]
fn test_legacy_pos_becomes_source_position() {
    let phase = parse(json!({
        "name": "x",
        "type": "graph",
        "data": {"nodes": [{"id": 3, "label": "Add", "pos": 12}], "edges": []}
    }))
    .unwrap();
    let Phase::Graph(p) = phase else {
        panic!("expected a graph phase");
    };
    let position = p.graph.nodes[0].source_position.unwrap();
    assert_eq!(position.script_offset, 12);
    assert_eq!(position.inlining_id, -1);
}

#[test]
fn test_origin_disambiguation() {
    let phase = parse(json!({
        "name": "x",
        "type": "graph",
        "data": {"nodes": [
            {"id": 0, "label": "a", "origin": {"nodeId": 7, "phase": "p", "reducer": "r"}},
            {"id": 1, "label": "b", "origin": {"bytecodePosition": 4, "phase": "p", "reducer": ""}}
        ], "edges": []}
    }))
    .unwrap();
    let Phase::Graph(p) = phase else {
        panic!("expected a graph phase");
    };
    assert_eq!(p.graph.nodes[0].origin.as_ref().unwrap().node_id(), Some(7));
    assert_eq!(p.graph.nodes[1].origin.as_ref().unwrap().node_id(), None);
}

#[test]
fn test_label_cache_marks_inplace_update() {
    let mut session = AnalysisSession::new();
    let first = json!({
        "name": "PhaseOne", "type": "graph",
        "data": {"nodes": [{"id": 0, "label": "JSAdd"}], "edges": []}
    });
    let second = json!({
        "name": "PhaseTwo", "type": "graph",
        "data": {"nodes": [{"id": 0, "label": "NumberAdd"}], "edges": []}
    });
    let Phase::Graph(p1) = parse_phase(first, &mut session).unwrap() else {
        panic!("expected a graph phase");
    };
    assert_eq!(p1.graph.nodes[0].inplace_update_phase, None);
    let Phase::Graph(p2) = parse_phase(second, &mut session).unwrap() else {
        panic!("expected a graph phase");
    };
    assert_eq!(
        p2.graph.nodes[0].inplace_update_phase.as_deref(),
        Some("PhaseTwo")
    );
}

#[test]
fn test_unknown_edge_kind_falls_back_to_value() {
    let phase = parse(json!({
        "name": "x", "type": "graph",
        "data": {
            "nodes": [{"id": 0, "label": "a"}, {"id": 1, "label": "b"}],
            "edges": [{"source": 0, "target": 1, "type": "mystery"}]
        }
    }))
    .unwrap();
    let Phase::Graph(p) = phase else {
        panic!("expected a graph phase");
    };
    assert_eq!(p.graph.edges[0].kind, EdgeKind::Value);
}

#[test]
fn test_dangling_edge_reference_is_dropped() {
    let phase = parse(json!({
        "name": "x", "type": "graph",
        "data": {
            "nodes": [{"id": 0, "label": "a"}],
            "edges": [{"source": 0, "target": 5, "type": "value"}]
        }
    }))
    .unwrap();
    let Phase::Graph(p) = phase else {
        panic!("expected a graph phase");
    };
    assert!(p.graph.edges.is_empty());
}

#[test]
fn test_turboshaft_phase_parses_blocks_then_nodes() {
    let phase = parse(json!({
        "name": "CodegenPhase",
        "type": "turboshaft_graph",
        "data": {
            "blocks": [
                {"id": 0, "type": "BLOCK", "deferred": false, "predecessors": []},
                {"id": 1, "type": "MERGE", "deferred": true, "predecessors": [0]}
            ],
            "nodes": [
                {"id": 4, "title": "Load", "block_id": 0},
                {"id": 5, "title": "Store", "block_id": 1}
            ],
            "edges": [{"source": 4, "target": 5}]
        }
    }))
    .unwrap();
    let Phase::TurboshaftGraph(p) = phase else {
        panic!("expected a turboshaft phase");
    };
    assert_eq!(p.graph.blocks.len(), 2);
    assert_eq!(p.graph.nodes.len(), 2);
    assert_eq!(p.graph.edges.len(), 1); // predecessor edge 0 → 1
    assert_eq!(p.graph.node_edges.len(), 1);
    assert_eq!(p.graph.blocks[0].collapsed_label, "1 operations");
    assert!(p.graph.blocks[1].deferred);
    assert_eq!(p.graph.blocks[1].display_label(), "B1 MERGE (deferred)");
}

#[test]
fn test_instructions_phase_range_tables() {
    let phase = parse(json!({
        "name": "SelectInstructions",
        "type": "instructions",
        "nodeIdToInstructionRange": [null, [0, 2], [2, 5]]
    }))
    .unwrap();
    let Phase::Instructions(p) = phase else {
        panic!("expected an instructions phase");
    };
    assert_eq!(p.instruction_range(0), None);
    assert_eq!(p.instruction_range(1), Some((0, 2)));
    assert_eq!(p.instruction_range(2), Some((2, 5)));
}

#[test]
fn test_instructions_phase_object_form() {
    let phase = parse(json!({
        "name": "SelectInstructions",
        "type": "instructions",
        "nodeIdToInstructionRange": {"7": [1, 3]}
    }))
    .unwrap();
    let Phase::Instructions(p) = phase else {
        panic!("expected an instructions phase");
    };
    assert_eq!(p.instruction_range(7), Some((1, 3)));
}

#[test]
fn test_text_phases_keep_payload() {
    let phase = parse(json!({
        "name": "disassembly", "type": "disassembly", "data": "0x0 mov eax, ebx"
    }))
    .unwrap();
    let Phase::Disassembly(p) = phase else {
        panic!("expected a disassembly phase");
    };
    assert_eq!(p.data, "0x0 mov eax, ebx");
}

#[test]
fn test_phase_kind_round_trip() {
    for kind in [
        PhaseKind::Graph,
        PhaseKind::TurboshaftGraph,
        PhaseKind::Instructions,
        PhaseKind::Disassembly,
        PhaseKind::Schedule,
        PhaseKind::Sequence,
    ] {
        assert_eq!(PhaseKind::from_wire(kind.as_str()), Some(kind));
    }
    assert_eq!(PhaseKind::from_wire("flowgraph"), None);
}
