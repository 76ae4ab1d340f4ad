//! Graph views: visibility reconciliation, camera fitting, and selection
//! that survives phase switches.
//!
//! Node ids are not stable across optimization passes, so re-attaching a
//! remembered selection to a freshly parsed phase matches either the same
//! selection key or, failing that, the origin chain: a new node whose
//! origin points at a previously selected node id inherits the selection.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::graph::{Graph, GraphNode, TurboshaftGraph, TurboshaftGraphBlock, TurboshaftGraphNode};
use crate::layout::{GraphLayout, TurboshaftGraphLayout};
use crate::phases::{GraphPhase, TurboshaftGraphPhase};
use crate::render::path::{generate_block_path, generate_path};
use crate::render::scene::{SceneDiff, SvgScene};
use crate::selection::{SelectionMap, SelectionStorage};

/// Viewport transform produced by the camera-fit operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

fn fit_camera(
    (min_x, min_y): (f64, f64),
    (max_x, max_y): (f64, f64),
    viewport_width: f64,
    viewport_height: f64,
) -> Camera {
    let width = (max_x - min_x).max(1.0);
    let height = (max_y - min_y).max(1.0);
    let scale = (viewport_width / width).min(viewport_height / height);
    Camera {
        scale,
        translate_x: viewport_width / 2.0 - scale * (min_x + width / 2.0),
        translate_y: viewport_height / 2.0 - scale * (min_y + height / 2.0),
    }
}

/// Operations common to both view families.
pub trait GraphicalView {
    /// Recomputes which elements should exist from the current visibility
    /// state and reconciles against the retained scene. Idempotent.
    fn update_graph_visibility(&mut self) -> SceneDiff;
    fn view_whole_graph(&mut self, viewport_width: f64, viewport_height: f64) -> Camera;
    fn view_selection(&mut self, viewport_width: f64, viewport_height: f64) -> Camera;
    /// Exports the selection as portable string keys and clears it.
    fn detach_selection(&mut self) -> SelectionStorage;
    fn adapt_selection(&mut self, storage: &SelectionStorage);
}

// ─── ClassicGraphView ────────────────────────────────────────────────────────

pub struct ClassicGraphView {
    pub phase_name: String,
    pub graph: Graph,
    pub show_properties: bool,
    scene: SvgScene,
    selection: SelectionMap<i64>,
}

impl ClassicGraphView {
    pub fn initialize_content(
        phase: GraphPhase,
        show_properties: bool,
        remembered: Option<&SelectionStorage>,
    ) -> Result<Self> {
        let mut view = ClassicGraphView {
            phase_name: phase.name,
            graph: phase.graph,
            show_properties,
            scene: SvgScene::new(),
            selection: SelectionMap::new(|id: &i64| GraphNode::selection_key(*id)),
        };
        GraphLayout::rebuild(&mut view.graph, show_properties)?;
        if let Some(storage) = remembered {
            view.adapt_selection(storage);
        }
        Ok(view)
    }

    pub fn select_nodes(&mut self, node_ids: &[i64], selected: bool) {
        self.selection.select(node_ids.iter().copied(), selected);
    }

    pub fn selected_node_ids(&self) -> Vec<i64> {
        self.selection.iter().copied().collect()
    }

    fn target_elements(&self) -> BTreeSet<String> {
        let mut elements = BTreeSet::new();
        for node in self.graph.nodes.iter().filter(|n| n.visible) {
            let selected = self.selection.is_selected(&node.id);
            elements.insert(format!(
                "node:{}@{:.1},{:.1}{}",
                GraphNode::selection_key(node.id),
                node.x,
                node.y,
                if selected { ":selected" } else { "" }
            ));
        }
        for e in 0..self.graph.edges.len() {
            if self.graph.is_edge_visible(e) {
                elements.insert(format!(
                    "edge:{e}:{}",
                    generate_path(&self.graph, e, self.show_properties)
                ));
            }
        }
        elements
    }
}

impl GraphicalView for ClassicGraphView {
    fn update_graph_visibility(&mut self) -> SceneDiff {
        let target = self.target_elements();
        self.scene.reconcile(target)
    }

    fn view_whole_graph(&mut self, viewport_width: f64, viewport_height: f64) -> Camera {
        fit_camera(
            (self.graph.min_graph_x, self.graph.min_graph_y),
            (self.graph.max_graph_x, self.graph.max_graph_y),
            viewport_width,
            viewport_height,
        )
    }

    fn view_selection(&mut self, viewport_width: f64, viewport_height: f64) -> Camera {
        let mut bounds: Option<((f64, f64), (f64, f64))> = None;
        for node in &self.graph.nodes {
            if !node.visible || !self.selection.is_selected(&node.id) {
                continue;
            }
            let right = node.x + node.width();
            let bottom = node.y + node.height(self.show_properties);
            bounds = Some(match bounds {
                None => ((node.x, node.y), (right, bottom)),
                Some(((min_x, min_y), (max_x, max_y))) => (
                    (min_x.min(node.x), min_y.min(node.y)),
                    (max_x.max(right), max_y.max(bottom)),
                ),
            });
        }
        match bounds {
            Some((min, max)) => fit_camera(min, max, viewport_width, viewport_height),
            None => self.view_whole_graph(viewport_width, viewport_height),
        }
    }

    fn detach_selection(&mut self) -> SelectionStorage {
        let storage = SelectionStorage::new(self.selection.selected_keys(), Default::default());
        self.selection.clear();
        storage
    }

    fn adapt_selection(&mut self, storage: &SelectionStorage) {
        let mut ids = Vec::new();
        for node in &self.graph.nodes {
            let own_key = GraphNode::selection_key(node.id);
            let origin_key = node
                .origin
                .as_ref()
                .and_then(|o| o.node_id())
                .map(GraphNode::selection_key);
            if storage.nodes.contains(&own_key)
                || origin_key.is_some_and(|k| storage.nodes.contains(&k))
            {
                ids.push(node.id);
            }
        }
        self.selection.select(ids, true);
    }
}

// ─── TurboshaftGraphView ─────────────────────────────────────────────────────

pub struct TurboshaftGraphView {
    pub phase_name: String,
    pub graph: TurboshaftGraph,
    pub show_properties: bool,
    scene: SvgScene,
    node_selection: SelectionMap<i64>,
    block_selection: SelectionMap<i64>,
}

impl TurboshaftGraphView {
    pub fn initialize_content(
        phase: TurboshaftGraphPhase,
        show_properties: bool,
        remembered: Option<&SelectionStorage>,
    ) -> Result<Self> {
        let mut view = TurboshaftGraphView {
            phase_name: phase.name,
            graph: phase.graph,
            show_properties,
            scene: SvgScene::new(),
            node_selection: SelectionMap::new(|id: &i64| TurboshaftGraphNode::selection_key(*id)),
            block_selection: SelectionMap::new(|id: &i64| {
                TurboshaftGraphBlock::selection_key(*id)
            }),
        };
        TurboshaftGraphLayout::rebuild(&mut view.graph, show_properties)?;
        if let Some(storage) = remembered {
            view.adapt_selection(storage);
        }
        Ok(view)
    }

    pub fn select_nodes(&mut self, node_ids: &[i64], selected: bool) {
        self.node_selection.select(node_ids.iter().copied(), selected);
    }

    pub fn select_blocks(&mut self, block_ids: &[i64], selected: bool) {
        self.block_selection
            .select(block_ids.iter().copied(), selected);
    }

    /// Property display changes block heights only; rebuild the vertical
    /// packing from the cached layout instead of a full relayout.
    pub fn set_show_properties(&mut self, show_properties: bool) {
        if self.show_properties != show_properties {
            self.show_properties = show_properties;
            TurboshaftGraphLayout::refresh_block_positions(&mut self.graph, show_properties);
        }
    }

    fn target_elements(&self) -> BTreeSet<String> {
        let mut elements = BTreeSet::new();
        for block in self.graph.blocks.iter().filter(|b| b.visible) {
            let selected = self.block_selection.is_selected(&block.id);
            elements.insert(format!(
                "block:{}@{:.1},{:.1}{}",
                TurboshaftGraphBlock::selection_key(block.id),
                block.x,
                block.y,
                if selected { ":selected" } else { "" }
            ));
        }
        for node in self.graph.nodes.iter().filter(|n| n.visible) {
            let selected = self.node_selection.is_selected(&node.id);
            elements.insert(format!(
                "node:{}:{}{}",
                TurboshaftGraphNode::selection_key(node.id),
                node.display_label(),
                if selected { ":selected" } else { "" }
            ));
        }
        for e in 0..self.graph.edges.len() {
            if self.graph.is_edge_visible(e) {
                elements.insert(format!(
                    "edge:{e}:{}",
                    generate_block_path(&self.graph, e, self.show_properties)
                ));
            }
        }
        elements
    }
}

impl GraphicalView for TurboshaftGraphView {
    fn update_graph_visibility(&mut self) -> SceneDiff {
        let target = self.target_elements();
        self.scene.reconcile(target)
    }

    fn view_whole_graph(&mut self, viewport_width: f64, viewport_height: f64) -> Camera {
        fit_camera(
            (self.graph.min_graph_x, self.graph.min_graph_y),
            (self.graph.max_graph_x, self.graph.max_graph_y),
            viewport_width,
            viewport_height,
        )
    }

    fn view_selection(&mut self, viewport_width: f64, viewport_height: f64) -> Camera {
        let mut bounds: Option<((f64, f64), (f64, f64))> = None;
        for (idx, block) in self.graph.blocks.iter().enumerate() {
            if !block.visible || !self.block_selection.is_selected(&block.id) {
                continue;
            }
            let right = block.x + self.graph.block_width(idx);
            let bottom = block.y + self.graph.block_height(idx, self.show_properties);
            bounds = Some(match bounds {
                None => ((block.x, block.y), (right, bottom)),
                Some(((min_x, min_y), (max_x, max_y))) => (
                    (min_x.min(block.x), min_y.min(block.y)),
                    (max_x.max(right), max_y.max(bottom)),
                ),
            });
        }
        match bounds {
            Some((min, max)) => fit_camera(min, max, viewport_width, viewport_height),
            None => self.view_whole_graph(viewport_width, viewport_height),
        }
    }

    fn detach_selection(&mut self) -> SelectionStorage {
        let storage = SelectionStorage::new(
            self.node_selection.selected_keys(),
            self.block_selection.selected_keys(),
        );
        self.node_selection.clear();
        self.block_selection.clear();
        storage
    }

    fn adapt_selection(&mut self, storage: &SelectionStorage) {
        let node_ids: Vec<i64> = self
            .graph
            .nodes
            .iter()
            .filter(|n| storage.nodes.contains(&TurboshaftGraphNode::selection_key(n.id)))
            .map(|n| n.id)
            .collect();
        self.node_selection.select(node_ids, true);
        let block_ids: Vec<i64> = self
            .graph
            .blocks
            .iter()
            .filter(|b| storage.blocks.contains(&TurboshaftGraphBlock::selection_key(b.id)))
            .map(|b| b.id)
            .collect();
        self.block_selection.select(block_ids, true);
    }
}
