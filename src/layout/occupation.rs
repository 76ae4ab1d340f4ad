//! Per-rank horizontal occupation bookkeeping.
//!
//! Placement walks ranks from highest to lowest. While a rank is being
//! placed, `occupied` holds the intervals its already-placed nodes claim.
//! After a rank is done, `occupy_inputs` reserves approach intervals (keyed
//! by edge) where the rank above should deliver its outputs; when that rank
//! is placed in turn, `clear_outputs` consumes the reservations for a node's
//! outgoing edges and hands their centers back as placement hints.

use tracing::debug;

use crate::graph::{EdgeIdx, MINIMUM_EDGE_SEPARATION};

#[derive(Debug, Clone, Copy)]
struct Reservation {
    edge: EdgeIdx,
    start: f64,
    end: f64,
}

#[derive(Debug, Default)]
pub struct LayoutOccupation {
    /// Intervals claimed by nodes placed at the current rank, sorted by start.
    occupied: Vec<(f64, f64)>,
    /// Input-approach intervals claimed by already-placed (higher) ranks.
    reserved: Vec<Reservation>,
}

impl LayoutOccupation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_occupied(&mut self) {
        self.occupied.clear();
    }

    /// Release the reservations made for `output_edges` and return their
    /// centers, which become the owning node's preferred positions.
    pub fn clear_outputs(&mut self, output_edges: &[EdgeIdx]) -> Vec<f64> {
        let mut centers = Vec::new();
        self.reserved.retain(|r| {
            if output_edges.contains(&r.edge) {
                centers.push((r.start + r.end) / 2.0);
                false
            } else {
                true
            }
        });
        centers
    }

    /// Claim the leftmost free interval of `width` at or after the ideal
    /// position, treating both occupied and reserved intervals as blockers.
    /// The gap past the rightmost blocker always fits, so this cannot fail.
    pub fn occupy(&mut self, width: f64, ideal_center: f64) -> f64 {
        let ideal_left = ideal_center - width / 2.0;
        let blockers = self.merged_blockers();

        let mut x = ideal_left;
        for &(start, end) in &blockers {
            if x + width <= start {
                break;
            }
            if x < end {
                x = end;
            }
        }

        self.insert_occupied(x, x + width);
        x
    }

    /// Reserve approach space at each given edge center; consulted when the
    /// rank above gets placed.
    pub fn occupy_inputs(&mut self, entries: &[(EdgeIdx, f64)]) {
        for &(edge, center) in entries {
            self.reserved.push(Reservation {
                edge,
                start: center - MINIMUM_EDGE_SEPARATION / 2.0,
                end: center + MINIMUM_EDGE_SEPARATION / 2.0,
            });
        }
    }

    /// Trace dump of the current interval state.
    pub fn print(&self) {
        debug!(occupied = ?self.occupied, reserved = self.reserved.len(), "occupation");
    }

    fn insert_occupied(&mut self, start: f64, end: f64) {
        let at = self
            .occupied
            .partition_point(|&(s, _)| s < start);
        self.occupied.insert(at, (start, end));
    }

    /// All blockers, sorted and merged into disjoint intervals.
    fn merged_blockers(&self) -> Vec<(f64, f64)> {
        let mut all: Vec<(f64, f64)> = self
            .occupied
            .iter()
            .copied()
            .chain(self.reserved.iter().map(|r| (r.start, r.end)))
            .collect();
        all.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(all.len());
        for (start, end) in all {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        merged
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_occupation.rs"]
mod tests;
