//! Per-file analysis session: caches shared across phases.
//!
//! Created when a dump is loaded, discarded when the next one replaces it.
//! Holds the node-label cache (which phase last rewrote a node's label in
//! place) and a best-effort string key-value store standing in for the
//! browser's session storage.

use std::collections::HashMap;

/// Cached label state for one node id, shared across all phases of a dump.
#[derive(Debug, Clone)]
pub struct NodeLabelEntry {
    pub label: String,
    /// Name of the phase that last changed this node's label without
    /// changing its id, if any.
    pub inplace_update_phase: Option<String>,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    label_cache: HashMap<i64, NodeLabelEntry>,
    storage: HashMap<String, String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the label a phase reports for a node id. If the cached label
    /// differs, the entry is marked as updated in place at `phase_name`.
    /// Returns the phase name of the latest in-place update, if any.
    pub fn observe_label(&mut self, id: i64, label: &str, phase_name: &str) -> Option<String> {
        match self.label_cache.get_mut(&id) {
            Some(entry) => {
                if entry.label != label {
                    entry.inplace_update_phase = Some(phase_name.to_string());
                    entry.label = label.to_string();
                }
                entry.inplace_update_phase.clone()
            }
            None => {
                self.label_cache.insert(
                    id,
                    NodeLabelEntry {
                        label: label.to_string(),
                        inplace_update_phase: None,
                    },
                );
                None
            }
        }
    }

    pub fn label_entry(&self, id: i64) -> Option<&NodeLabelEntry> {
        self.label_cache.get(&id)
    }

    // ─── Key-value store (sessionStorage equivalent) ─────────────────────────

    pub fn set(&mut self, key: &str, value: String) {
        self.storage.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    pub fn clear_storage(&mut self) {
        self.storage.clear();
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_session.rs"]
mod tests;
