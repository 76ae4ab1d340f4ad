//! Selection tracking and cross-view brokering.

pub mod broker;
pub mod map;

pub use broker::{
    BlockSelectionHandler, HandlerId, InstructionSelectionHandler, NodeSelectionHandler,
    RegisterAllocationSelectionHandler, SelectionBroker, SourcePositionSelectionHandler,
    SourceResolver,
};
pub use map::{SelectionMap, SelectionStorage};
