//! Retained scene of rendered elements.
//!
//! The view computes the set of element descriptors that should exist for
//! the current visibility state; the scene diffs that against what is
//! already rendered and reports only the inserts and removes. Reconciling
//! the same target twice is a no-op the second time.

use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct SvgScene {
    elements: BTreeSet<String>,
}

/// What changed in one reconciliation pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SceneDiff {
    pub inserted: Vec<String>,
    pub removed: Vec<String>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }
}

impl SvgScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(&mut self, target: BTreeSet<String>) -> SceneDiff {
        let inserted: Vec<String> = target.difference(&self.elements).cloned().collect();
        let removed: Vec<String> = self.elements.difference(&target).cloned().collect();
        self.elements = target;
        SceneDiff { inserted, removed }
    }

    pub fn elements(&self) -> &BTreeSet<String> {
        &self.elements
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}
