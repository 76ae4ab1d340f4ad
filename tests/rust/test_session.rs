use super::*;

#[test]
fn test_first_observation_is_not_an_update() {
    let mut session = AnalysisSession::new();
    assert_eq!(session.observe_label(1, "Int32Add", "TyperPhase"), None);
    assert_eq!(session.label_entry(1).unwrap().label, "Int32Add");
}

#[test]
fn test_same_label_keeps_no_update_phase() {
    let mut session = AnalysisSession::new();
    session.observe_label(1, "Int32Add", "TyperPhase");
    assert_eq!(session.observe_label(1, "Int32Add", "TypedLoweringPhase"), None);
}

#[test]
fn test_changed_label_marks_inplace_update() {
    let mut session = AnalysisSession::new();
    session.observe_label(1, "JSAdd", "TyperPhase");
    assert_eq!(
        session.observe_label(1, "NumberAdd", "TypedLoweringPhase"),
        Some("TypedLoweringPhase".to_string())
    );
    // A later phase that leaves the label alone still reports the update.
    assert_eq!(
        session.observe_label(1, "NumberAdd", "SimplifiedLoweringPhase"),
        Some("TypedLoweringPhase".to_string())
    );
}

#[test]
fn test_storage_roundtrip() {
    let mut session = AnalysisSession::new();
    session.set("cache-graphs", "true".to_string());
    assert_eq!(session.get("cache-graphs"), Some("true"));
    assert_eq!(session.get_bool("cache-graphs"), Some(true));
    assert_eq!(session.get("missing"), None);
}

#[test]
fn test_clear_storage_keeps_labels() {
    let mut session = AnalysisSession::new();
    session.observe_label(4, "Phi", "TyperPhase");
    session.set("toggle-types", "false".to_string());
    session.clear_storage();
    assert_eq!(session.get("toggle-types"), None);
    assert!(session.label_entry(4).is_some());
}
