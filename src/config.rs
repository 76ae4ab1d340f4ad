//! Configuration for the layout and rendering pipeline.

use crate::session::AnalysisSession;

/// Session-storage keys for UI toggles that survive reloads.
pub const STORAGE_KEY_CACHE_GRAPHS: &str = "cache-graphs";
pub const STORAGE_KEY_TOGGLE_TYPES: &str = "toggle-types";

#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Show node properties inside node boxes (affects node heights).
    pub show_properties: bool,
    /// Reuse cached layout state when only display toggles changed.
    pub cache_graphs: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_properties: false,
            cache_graphs: true,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best-effort restore from the session store; missing keys keep defaults.
    pub fn from_session(session: &AnalysisSession) -> Self {
        let defaults = Self::default();
        Self {
            show_properties: session
                .get_bool(STORAGE_KEY_TOGGLE_TYPES)
                .unwrap_or(defaults.show_properties),
            cache_graphs: session
                .get_bool(STORAGE_KEY_CACHE_GRAPHS)
                .unwrap_or(defaults.cache_graphs),
        }
    }

    pub fn store(&self, session: &mut AnalysisSession) {
        session.set(STORAGE_KEY_TOGGLE_TYPES, self.show_properties.to_string());
        session.set(STORAGE_KEY_CACHE_GRAPHS, self.cache_graphs.to_string());
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_config.rs"]
mod tests;
