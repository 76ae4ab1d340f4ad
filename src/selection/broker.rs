//! Cross-view selection broker.
//!
//! Views register as handlers for the item kinds they display. A broadcast
//! from one view fans out to every other registered handler, translating
//! between node ids, source positions and instruction ranges through a
//! [`SourceResolver`] so a click in one pane highlights the corresponding
//! items in all the others. The sender is never called back with its own
//! broadcast.

use tracing::warn;

use crate::position::SourcePosition;

/// Translates between the id spaces the different views work in.
pub trait SourceResolver {
    fn node_ids_to_source_positions(&self, node_ids: &[i64]) -> Vec<SourcePosition>;
    fn source_positions_to_node_ids(&self, positions: &[SourcePosition]) -> Vec<i64>;
    fn node_id_to_instruction_range(&self, node_id: i64) -> Option<(u32, u32)>;
}

pub trait NodeSelectionHandler {
    fn brokered_node_select(&mut self, node_ids: &[i64], selected: bool);
    fn brokered_clear(&mut self);
}

pub trait BlockSelectionHandler {
    fn brokered_block_select(&mut self, block_ids: &[i64], selected: bool);
    fn brokered_clear(&mut self);
}

pub trait InstructionSelectionHandler {
    fn brokered_instruction_select(&mut self, ranges: &[(u32, u32)], selected: bool);
    fn brokered_clear(&mut self);
}

pub trait SourcePositionSelectionHandler {
    fn brokered_source_position_select(&mut self, positions: &[SourcePosition], selected: bool);
    fn brokered_clear(&mut self);
}

pub trait RegisterAllocationSelectionHandler {
    fn brokered_register_allocation_select(&mut self, ranges: &[(u32, u32)], selected: bool);
    fn brokered_clear(&mut self);
}

/// Identifies a registered handler, for excluding the broadcast's sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

pub struct SelectionBroker {
    resolver: Box<dyn SourceResolver>,
    next_id: usize,
    node_handlers: Vec<(HandlerId, Box<dyn NodeSelectionHandler>)>,
    block_handlers: Vec<(HandlerId, Box<dyn BlockSelectionHandler>)>,
    instruction_handlers: Vec<(HandlerId, Box<dyn InstructionSelectionHandler>)>,
    source_position_handlers: Vec<(HandlerId, Box<dyn SourcePositionSelectionHandler>)>,
    register_allocation_handlers: Vec<(HandlerId, Box<dyn RegisterAllocationSelectionHandler>)>,
}

impl SelectionBroker {
    pub fn new(resolver: Box<dyn SourceResolver>) -> Self {
        SelectionBroker {
            resolver,
            next_id: 0,
            node_handlers: Vec::new(),
            block_handlers: Vec::new(),
            instruction_handlers: Vec::new(),
            source_position_handlers: Vec::new(),
            register_allocation_handlers: Vec::new(),
        }
    }

    fn fresh_id(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        id
    }

    // ─── Registration ────────────────────────────────────────────────────────

    pub fn add_node_handler(&mut self, handler: Box<dyn NodeSelectionHandler>) -> HandlerId {
        let id = self.fresh_id();
        self.node_handlers.push((id, handler));
        id
    }

    pub fn add_block_handler(&mut self, handler: Box<dyn BlockSelectionHandler>) -> HandlerId {
        let id = self.fresh_id();
        self.block_handlers.push((id, handler));
        id
    }

    pub fn add_instruction_handler(
        &mut self,
        handler: Box<dyn InstructionSelectionHandler>,
    ) -> HandlerId {
        let id = self.fresh_id();
        self.instruction_handlers.push((id, handler));
        id
    }

    pub fn add_source_position_handler(
        &mut self,
        handler: Box<dyn SourcePositionSelectionHandler>,
    ) -> HandlerId {
        let id = self.fresh_id();
        self.source_position_handlers.push((id, handler));
        id
    }

    pub fn add_register_allocation_handler(
        &mut self,
        handler: Box<dyn RegisterAllocationSelectionHandler>,
    ) -> HandlerId {
        let id = self.fresh_id();
        self.register_allocation_handlers.push((id, handler));
        id
    }

    pub fn delete_handler(&mut self, id: HandlerId) {
        self.node_handlers.retain(|(h, _)| *h != id);
        self.block_handlers.retain(|(h, _)| *h != id);
        self.instruction_handlers.retain(|(h, _)| *h != id);
        self.source_position_handlers.retain(|(h, _)| *h != id);
        self.register_allocation_handlers.retain(|(h, _)| *h != id);
    }

    // ─── Broadcasts ──────────────────────────────────────────────────────────

    pub fn broadcast_node_select(
        &mut self,
        from: Option<HandlerId>,
        node_ids: &[i64],
        selected: bool,
    ) {
        for (id, handler) in &mut self.node_handlers {
            if Some(*id) != from {
                handler.brokered_node_select(node_ids, selected);
            }
        }
        let positions = self.resolver.node_ids_to_source_positions(node_ids);
        for (id, handler) in &mut self.source_position_handlers {
            if Some(*id) != from {
                handler.brokered_source_position_select(&positions, selected);
            }
        }
        let ranges = Self::instruction_ranges(self.resolver.as_ref(), node_ids);
        self.notify_instruction_handlers(from, &ranges, selected);
    }

    /// Invalid positions are dropped up front; a broadcast of nothing still
    /// reaches node handlers with an empty id list.
    pub fn broadcast_source_position_select(
        &mut self,
        from: Option<HandlerId>,
        positions: &[SourcePosition],
        selected: bool,
    ) {
        let valid: Vec<SourcePosition> = positions
            .iter()
            .filter(|p| {
                if p.is_valid() {
                    true
                } else {
                    warn!(?p, "ignoring invalid source position in broadcast");
                    false
                }
            })
            .copied()
            .collect();

        for (id, handler) in &mut self.source_position_handlers {
            if Some(*id) != from {
                handler.brokered_source_position_select(&valid, selected);
            }
        }
        let node_ids = self.resolver.source_positions_to_node_ids(&valid);
        for (id, handler) in &mut self.node_handlers {
            if Some(*id) != from {
                handler.brokered_node_select(&node_ids, selected);
            }
        }
        let ranges = Self::instruction_ranges(self.resolver.as_ref(), &node_ids);
        self.notify_instruction_handlers(from, &ranges, selected);
    }

    pub fn broadcast_instruction_select(
        &mut self,
        from: Option<HandlerId>,
        ranges: &[(u32, u32)],
        selected: bool,
    ) {
        self.notify_instruction_handlers(from, ranges, selected);
    }

    pub fn broadcast_block_select(
        &mut self,
        from: Option<HandlerId>,
        block_ids: &[i64],
        selected: bool,
    ) {
        for (id, handler) in &mut self.block_handlers {
            if Some(*id) != from {
                handler.brokered_block_select(block_ids, selected);
            }
        }
    }

    pub fn broadcast_clear(&mut self, from: Option<HandlerId>) {
        for (id, handler) in &mut self.node_handlers {
            if Some(*id) != from {
                handler.brokered_clear();
            }
        }
        for (id, handler) in &mut self.block_handlers {
            if Some(*id) != from {
                handler.brokered_clear();
            }
        }
        for (id, handler) in &mut self.instruction_handlers {
            if Some(*id) != from {
                handler.brokered_clear();
            }
        }
        for (id, handler) in &mut self.source_position_handlers {
            if Some(*id) != from {
                handler.brokered_clear();
            }
        }
        for (id, handler) in &mut self.register_allocation_handlers {
            if Some(*id) != from {
                handler.brokered_clear();
            }
        }
    }

    fn instruction_ranges(resolver: &dyn SourceResolver, node_ids: &[i64]) -> Vec<(u32, u32)> {
        node_ids
            .iter()
            .filter_map(|&id| resolver.node_id_to_instruction_range(id))
            .collect()
    }

    fn notify_instruction_handlers(
        &mut self,
        from: Option<HandlerId>,
        ranges: &[(u32, u32)],
        selected: bool,
    ) {
        for (id, handler) in &mut self.instruction_handlers {
            if Some(*id) != from {
                handler.brokered_instruction_select(ranges, selected);
            }
        }
        for (id, handler) in &mut self.register_allocation_handlers {
            if Some(*id) != from {
                handler.brokered_register_allocation_select(ranges, selected);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_selection.rs"]
mod tests;
