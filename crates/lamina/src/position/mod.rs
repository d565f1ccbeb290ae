//! Node sizes, coordinates and routing tracks.

pub(crate) mod bk;

use crate::config::LayoutConfig;
use crate::layered::{LayeredGraph, NodeKind};
use crate::order::{Gaps, SortingOrder};
use lamina_graph::Orientation;

/// Horizontal distances below this are treated as zero.
pub(crate) const EPSILON: f64 = 1e-6;

/// Horizontal routing tracks in the gaps between layers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tracks {
    /// y of the horizontal run of each segment, parallel to every edge's segment list;
    /// `None` for straight segments.
    pub(crate) by_edge: Vec<Vec<Option<f64>>>,
    /// Number of tracks per gap.
    pub(crate) counts: Vec<usize>,
}

/// Sizes every node, lays ports out along each side and spaces them from the node center.
pub(crate) fn assign_sizes(lg: &mut LayeredGraph, order: &SortingOrder, config: &LayoutConfig) {
    let s = &config.spacing;
    for v in 0..lg.nodes.len() {
        let north = order.ports(v, Orientation::North);
        let south = order.ports(v, Orientation::South);
        let node = &mut lg.nodes[v];
        let (width, height, pad) = match node.kind {
            NodeKind::Vertex => {
                let busier = north.len().max(south.len()) as f64;
                let (hint_w, hint_h) = node.hint.unwrap_or((0.0, 0.0));
                let ports_w = busier * (s.port_width + s.port_distance) + s.port_distance;
                (
                    hint_w.max(s.vertex_min_width).max(ports_w),
                    hint_h.max(s.vertex_height),
                    s.port_distance,
                )
            }
            NodeKind::Dummy { .. } => (s.port_width, 0.0, 0.0),
            NodeKind::Turning { .. } => (2.0 * s.port_width + s.port_distance, 0.0, 0.0),
        };
        node.width = width;
        node.height = height;

        for side in [north, south] {
            for (i, p) in side.into_iter().enumerate() {
                let from_left =
                    pad + i as f64 * (s.port_width + s.port_distance) + s.port_width / 2.0;
                lg.ports[p].offset = from_left - width / 2.0;
            }
        }
    }
}

/// Nodes owning a same-layer edge whose ports sit on opposite sides; such loops run
/// around the east side.
pub(crate) fn east_loops(lg: &LayeredGraph) -> Vec<bool> {
    let mut out = vec![false; lg.nodes.len()];
    for e in lg.edges.iter().filter(|e| e.same_layer) {
        let [a, b] = e.ports;
        if lg.ports[a].side != lg.ports[b].side {
            out[lg.node_of(a)] = true;
        }
    }
    out
}

/// Assigns x through the configured alignment, then tracks and y.
pub(crate) fn run(
    lg: &mut LayeredGraph,
    order: &SortingOrder,
    gaps: &Gaps,
    config: &LayoutConfig,
) -> Tracks {
    assign_sizes(lg, order, config);
    let east = east_loops(lg);
    let xs = bk::position_x(
        lg,
        order,
        gaps,
        config.alignment,
        config.alignment_preference,
        &config.spacing,
        &east,
    );
    for (node, x) in lg.nodes.iter_mut().zip(xs) {
        node.x = x;
    }

    let layer_count = order.layer_count();
    let mut tracks = Tracks {
        by_edge: lg
            .edges
            .iter()
            .map(|e| vec![None; e.segments.len()])
            .collect(),
        counts: vec![0; layer_count.saturating_sub(1)],
    };

    // (gap, left, right, edge, segment) of every segment that needs a horizontal run.
    let mut runs: Vec<Vec<(f64, f64, usize, usize)>> = vec![Vec::new(); tracks.counts.len()];
    for (e, edge) in lg.edges.iter().enumerate() {
        for (i, s) in edge.segments.iter().enumerate() {
            let (xa, xb) = (port_x(lg, s.from), port_x(lg, s.to));
            if (xa - xb).abs() <= EPSILON {
                continue;
            }
            let gap = lg.rank_of_port(s.from).min(lg.rank_of_port(s.to)).max(0) as usize;
            if let Some(list) = runs.get_mut(gap) {
                list.push((xa.min(xb), xa.max(xb), e, i));
            }
        }
    }

    // First fit, leftmost run first.
    let mut assigned: Vec<Vec<(usize, usize, usize)>> = vec![Vec::new(); runs.len()];
    for (gap, list) in runs.iter_mut().enumerate() {
        list.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        let mut track_end: Vec<f64> = Vec::new();
        for &(left, right, e, i) in list.iter() {
            let t = match track_end.iter().position(|&end| end < left - EPSILON) {
                Some(t) => {
                    track_end[t] = right;
                    t
                }
                None => {
                    track_end.push(right);
                    track_end.len() - 1
                }
            };
            assigned[gap].push((e, i, t));
        }
        tracks.counts[gap] = track_end.len();
    }

    let s = &config.spacing;
    let heights: Vec<f64> = order
        .layers()
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|&v| lg.nodes[v].height)
                .fold(0.0, f64::max)
        })
        .collect();
    let mut bottom = 0.0;
    for rank in 0..layer_count {
        for &v in order.layer(rank) {
            lg.nodes[v].y = bottom + heights[rank] / 2.0;
        }
        let top = bottom + heights[rank];
        if let Some(list) = assigned.get(rank) {
            for &(e, i, t) in list {
                tracks.by_edge[e][i] =
                    Some(top + s.layer_distance / 2.0 + (t as f64 + 0.5) * s.edge_distance);
            }
        }
        let count = tracks.counts.get(rank).copied().unwrap_or(0);
        bottom = top + s.layer_distance + count as f64 * s.edge_distance;
    }

    tracing::debug!(
        tracks = tracks.counts.iter().sum::<usize>(),
        "nodes positioned"
    );
    tracks
}

pub(crate) fn port_x(lg: &LayeredGraph, port: usize) -> f64 {
    lg.nodes[lg.node_of(port)].x + lg.ports[port].offset
}

/// Where an edge leaves a port: the port center on its node's border.
pub(crate) fn port_anchor_y(lg: &LayeredGraph, port: usize) -> f64 {
    let node = &lg.nodes[lg.node_of(port)];
    match lg.ports[port].side {
        Orientation::North => node.top(),
        _ => node.bottom(),
    }
}
