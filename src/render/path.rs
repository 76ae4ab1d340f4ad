//! SVG path generation for edges.
//!
//! A forward edge drops from the source's output bubble to a horizontal
//! lane at the lower of the two approach heights, then runs across and up
//! into the target's input bubble. Back edges (and forward edges whose
//! approaches would collide) bulge out past the right-hand edge of the
//! node column, in a lane reserved per back-edge number.

use crate::graph::{
    DEFAULT_NODE_BUBBLE_RADIUS, EdgeIdx, Graph, MINIMUM_EDGE_SEPARATION,
    MINIMUM_NODE_INPUT_APPROACH, TurboshaftGraph,
};

fn input_approach_y(target_y: f64, index: i32) -> f64 {
    target_y
        - MINIMUM_NODE_INPUT_APPROACH
        - (index.rem_euclid(4)) as f64 * MINIMUM_EDGE_SEPARATION
        - DEFAULT_NODE_BUBBLE_RADIUS
}

/// Path for a classic graph edge in the graph's coordinate space.
pub fn generate_path(graph: &Graph, edge: EdgeIdx, show_properties: bool) -> String {
    let e = &graph.edges[edge];
    let source = &graph.nodes[e.source];
    let target = &graph.nodes[e.target];

    let nth_output = source
        .outputs
        .iter()
        .position(|&o| o == edge)
        .unwrap_or(0);
    let output_x = source.x + source.output_x(nth_output);
    let output_y = source.y + source.height(show_properties) + DEFAULT_NODE_BUBBLE_RADIUS;
    let output_approach = source.y + source.height(show_properties) + source.output_approach;

    let input_x = target.x + target.input_x(e.index);
    let input_y = target.y - DEFAULT_NODE_BUBBLE_RADIUS;
    let input_approach = input_approach_y(target.y, e.index);

    if graph.is_back_edge(edge) || input_approach <= output_approach {
        let lane_x =
            graph.max_graph_node_x + e.back_edge_number.max(1) as f64 * MINIMUM_EDGE_SEPARATION;
        format!(
            "M {output_x} {output_y} L {output_x} {output_approach} \
             L {lane_x} {output_approach} L {lane_x} {input_approach} \
             L {input_x} {input_approach} L {input_x} {input_y}"
        )
    } else {
        format!(
            "M {output_x} {output_y} L {output_x} {output_approach} \
             L {input_x} {input_approach} L {input_x} {input_y}"
        )
    }
}

/// Path for a Turboshaft block-to-block edge. Blocks have no per-operand
/// bubbles; endpoints sit on the block borders at evenly spread slots.
pub fn generate_block_path(graph: &TurboshaftGraph, edge: EdgeIdx, show_properties: bool) -> String {
    let e = &graph.edges[edge];
    let source = &graph.blocks[e.source];
    let target = &graph.blocks[e.target];

    let source_width = graph.block_width(e.source);
    let nth_output = source
        .outputs
        .iter()
        .position(|&o| o == edge)
        .unwrap_or(0);
    let out_slots = source.outputs.len().max(1) as f64;
    let output_x = source.x + (nth_output as f64 + 0.5) * (source_width / out_slots);
    let output_y = source.y + graph.block_height(e.source, show_properties);
    let output_approach = output_y + source.output_approach;

    let target_width = graph.block_width(e.target);
    let nth_input = target.inputs.iter().position(|&i| i == edge).unwrap_or(0);
    let in_slots = target.inputs.len().max(1) as f64;
    let input_x = target.x + (nth_input as f64 + 0.5) * (target_width / in_slots);
    let input_y = target.y;
    let input_approach = input_approach_y(target.y, nth_input as i32);

    if graph.is_back_edge(edge) || input_approach <= output_approach {
        let lane_x =
            graph.max_graph_block_x + e.back_edge_number.max(1) as f64 * MINIMUM_EDGE_SEPARATION;
        format!(
            "M {output_x} {output_y} L {output_x} {output_approach} \
             L {lane_x} {output_approach} L {lane_x} {input_approach} \
             L {input_x} {input_approach} L {input_x} {input_y}"
        )
    } else {
        format!(
            "M {output_x} {output_y} L {output_x} {output_approach} \
             L {input_x} {input_approach} L {input_x} {input_y}"
        )
    }
}
