use super::*;

#[test]
fn test_defaults() {
    let config = ViewConfig::new();
    assert!(!config.show_properties);
    assert!(config.cache_graphs);
}

#[test]
fn test_empty_session_keeps_defaults() {
    let session = AnalysisSession::new();
    let config = ViewConfig::from_session(&session);
    assert!(!config.show_properties);
    assert!(config.cache_graphs);
}

#[test]
fn test_store_and_restore() {
    let mut session = AnalysisSession::new();
    let config = ViewConfig {
        show_properties: true,
        cache_graphs: false,
    };
    config.store(&mut session);

    let restored = ViewConfig::from_session(&session);
    assert!(restored.show_properties);
    assert!(!restored.cache_graphs);
}

#[test]
fn test_malformed_stored_value_falls_back() {
    let mut session = AnalysisSession::new();
    session.set(STORAGE_KEY_CACHE_GRAPHS, "maybe".to_string());
    let config = ViewConfig::from_session(&session);
    assert!(config.cache_graphs);
}
