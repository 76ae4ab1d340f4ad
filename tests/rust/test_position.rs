use super::*;

#[test]
fn test_source_position_key() {
    let p = SourcePosition::new(42, 1);
    assert_eq!(p.key(), "SP-1-42");
}

#[test]
fn test_source_position_from_legacy_pos() {
    let p = SourcePosition::from_legacy_pos(17);
    assert_eq!(p.script_offset, 17);
    assert_eq!(p.inlining_id, -1);
    assert_eq!(p.key(), "SP--1-17");
}

#[test]
fn test_source_position_validity() {
    assert!(SourcePosition::new(0, 0).is_valid());
    assert!(SourcePosition::from_legacy_pos(5).is_valid());
    assert!(!SourcePosition::new(-1, 0).is_valid());
}

#[test]
fn test_source_position_deserialize_camel_case() {
    let p: SourcePosition =
        serde_json::from_str(r#"{"scriptOffset": 9, "inliningId": 2}"#).unwrap();
    assert_eq!(p, SourcePosition::new(9, 2));
}

#[test]
fn test_bytecode_position_key() {
    let p = BytecodePosition::new(7, 0);
    assert_eq!(p.key(), "BCP-0-7");
}

#[test]
fn test_origin_node_id() {
    let node_origin = Origin::Node {
        node_id: 12,
        phase: "TyperPhase".to_string(),
        reducer: "ConstantFoldingReducer".to_string(),
    };
    assert_eq!(node_origin.node_id(), Some(12));
    assert_eq!(node_origin.reducer(), "ConstantFoldingReducer");

    let bytecode_origin = Origin::Bytecode {
        bytecode_position: 3,
        phase: "BytecodeGraphBuilder".to_string(),
        reducer: String::new(),
    };
    assert_eq!(bytecode_origin.node_id(), None);
}
