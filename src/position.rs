//! Position model: where a compiler node originated.
//!
//! `SourcePosition` and `BytecodePosition` identify script offsets through
//! the inlining stack; `Origin` links a node to the node or bytecode it was
//! derived from in an earlier phase. All of these are immutable value types
//! whose string keys feed the selection maps.

use serde::Deserialize;

// ─── SourcePosition ──────────────────────────────────────────────────────────

/// A character offset in a script, qualified by which inlining it sits in.
/// `inlining_id == -1` means the outermost (non-inlined) function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub script_offset: i64,
    pub inlining_id: i64,
}

impl SourcePosition {
    pub fn new(script_offset: i64, inlining_id: i64) -> Self {
        Self {
            script_offset,
            inlining_id,
        }
    }

    /// Legacy dumps carry a bare numeric `pos` instead of a full position.
    pub fn from_legacy_pos(pos: i64) -> Self {
        Self {
            script_offset: pos,
            inlining_id: -1,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.script_offset >= 0 && self.inlining_id >= -1
    }

    /// Stable key usable across phase switches.
    pub fn key(&self) -> String {
        format!("SP-{}-{}", self.inlining_id, self.script_offset)
    }
}

// ─── BytecodePosition ────────────────────────────────────────────────────────

/// An offset into the bytecode array of one (possibly inlined) function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BytecodePosition {
    pub bytecode_position: i64,
    pub inlining_id: i64,
}

impl BytecodePosition {
    pub fn new(bytecode_position: i64, inlining_id: i64) -> Self {
        Self {
            bytecode_position,
            inlining_id,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.bytecode_position >= 0 && self.inlining_id >= -1
    }

    pub fn key(&self) -> String {
        format!("BCP-{}-{}", self.inlining_id, self.bytecode_position)
    }
}

// ─── InliningPosition ────────────────────────────────────────────────────────

/// Where an inlined function was called from: the source it belongs to and
/// the call-site position in the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InliningPosition {
    pub source_id: i64,
    pub inlining_position: i64,
}

// ─── Origin ──────────────────────────────────────────────────────────────────

/// Links a node in one phase to what it was reduced from in an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Node {
        node_id: i64,
        phase: String,
        reducer: String,
    },
    Bytecode {
        bytecode_position: i64,
        phase: String,
        reducer: String,
    },
}

impl Origin {
    /// The earlier-phase node id this origin points at, if it is a node origin.
    pub fn node_id(&self) -> Option<i64> {
        match self {
            Origin::Node { node_id, .. } => Some(*node_id),
            Origin::Bytecode { .. } => None,
        }
    }

    pub fn reducer(&self) -> &str {
        match self {
            Origin::Node { reducer, .. } | Origin::Bytecode { reducer, .. } => reducer,
        }
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_position.rs"]
mod tests;
