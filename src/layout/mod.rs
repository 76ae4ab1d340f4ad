//! Layered layout engines for both graph families.

pub mod classic;
pub mod occupation;
pub mod turboshaft;

pub use classic::GraphLayout;
pub use occupation::LayoutOccupation;
pub use turboshaft::TurboshaftGraphLayout;
