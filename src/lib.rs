//! irviz — layout and rendering engine for compiler IR phase dumps.
//!
//! Consumes the JSON dump a compiler writes per compiled function (one
//! snapshot of the intermediate representation per pipeline phase) and
//! produces laid-out, renderable graphs: integer ranks, pixel coordinates,
//! routed edge paths. Selection state is brokered across views and
//! survives switching between phases.
//!
//! Pipeline: JSON dump → phase parsers → `Graph`/`TurboshaftGraph` →
//! layout engine (ranks, x/y) → views (scene elements, edge paths).

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod phases;
pub mod position;
pub mod render;
pub mod selection;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{IrVizError, Result};
pub use loader::{DumpResolver, PhaseDump, load_dump};
pub use session::AnalysisSession;

use phases::Phase;
use render::{ClassicGraphView, GraphicalView, TurboshaftGraphView};

/// Lay out one phase's graph and return its scene element descriptors,
/// sorted. Non-graph phases have nothing to lay out and yield nothing.
pub fn render_elements(phase: Phase, show_properties: bool) -> Result<Vec<String>> {
    match phase {
        Phase::Graph(p) => {
            let mut view = ClassicGraphView::initialize_content(p, show_properties, None)?;
            Ok(view.update_graph_visibility().inserted)
        }
        Phase::TurboshaftGraph(p) => {
            let mut view = TurboshaftGraphView::initialize_content(p, show_properties, None)?;
            Ok(view.update_graph_visibility().inserted)
        }
        _ => Ok(Vec::new()),
    }
}
