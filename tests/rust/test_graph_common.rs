use super::*;

#[test]
fn test_measure_label() {
    let label_box = measure_label("abcd");
    assert_eq!(label_box.width, 4.0 * AVERAGE_CHAR_WIDTH + 2.0 * LABEL_PADDING);
    assert_eq!(label_box.height, LABEL_HEIGHT);
}

#[test]
fn test_id_map_dense_ids() {
    let mut map = IdMap::new();
    map.insert(0, 10);
    map.insert(5, 11);
    assert_eq!(map.get(0), Some(10));
    assert_eq!(map.get(5), Some(11));
    assert_eq!(map.get(3), None);
    assert!(map.contains(5));
    assert!(!map.contains(6));
}

#[test]
fn test_id_map_sparse_fallback() {
    let mut map = IdMap::new();
    map.insert(-7, 1);
    map.insert(1 << 30, 2);
    assert_eq!(map.get(-7), Some(1));
    assert_eq!(map.get(1 << 30), Some(2));
}

#[test]
fn test_id_map_overwrite() {
    let mut map = IdMap::new();
    map.insert(2, 1);
    map.insert(2, 9);
    assert_eq!(map.get(2), Some(9));
}

#[test]
fn test_graph_state_default_needs_rebuild() {
    assert_eq!(GraphStateType::default(), GraphStateType::NeedToFullRebuild);
}
