//! Rendering contract: edge path geometry, retained scene diffing, and
//! the two graph view families.

pub mod path;
pub mod scene;
pub mod view;

pub use path::{generate_block_path, generate_path};
pub use scene::{SceneDiff, SvgScene};
pub use view::{Camera, ClassicGraphView, GraphicalView, TurboshaftGraphView};

#[cfg(test)]
#[path = "../../tests/rust/test_render.rs"]
mod tests;
