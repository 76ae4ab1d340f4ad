//! Error taxonomy for dump loading and layout.
//!
//! Fatal parse errors abort the whole file (unsupported phase type,
//! unparseable JSON). Dangling node/edge references and invalid source
//! positions are recoverable and only logged by their call sites.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IrVizError {
    /// The phase `type` discriminator is not one of the known kinds.
    #[error("unsupported phase type '{0}'")]
    UnsupportedPhaseType(String),

    #[error("malformed phase dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("phase '{phase}' is missing required field '{field}'")]
    MissingField { phase: String, field: String },

    /// A cycle in the visible graph that no loop header breaks. The source
    /// tool would spin in its rank worklist here; we surface it instead.
    #[error("graph contains a cycle not broken by a loop header (node id {node_id})")]
    UnbrokenCycle { node_id: i64 },

    /// Backstop for the rank worklist; should be unreachable once the
    /// cycle check above has passed.
    #[error("rank assignment exceeded {0} iterations")]
    RankBound(usize),

    #[error("no phase matches '{0}'")]
    UnknownPhase(String),

    #[error("invalid phase filter '{pattern}': {source}")]
    PhaseFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, IrVizError>;
