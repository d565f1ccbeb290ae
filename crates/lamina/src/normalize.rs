//! Split long edges into unit-span segments by inserting dummy nodes.
//!
//! Every directed edge gets a segment chain from its source port to its target port; one
//! dummy per intermediate rank carries a SOUTH port toward the lower rank and a NORTH port
//! toward the higher one. Same-layer edges keep an empty chain and are routed separately.

use crate::layered::{LayeredGraph, NodeKind, Segment};
use crate::order::{SortingOrder, init_order};
use lamina_graph::Orientation;

pub(crate) fn run(lg: &mut LayeredGraph) -> SortingOrder {
    for e in 0..lg.edges.len() {
        normalize_edge(lg, e);
    }
    tracing::debug!(dummies = lg.dummy_count(), "long edges normalized");
    SortingOrder::new(init_order(lg), lg.nodes.len())
}

fn normalize_edge(lg: &mut LayeredGraph, e: usize) {
    let edge = &lg.edges[e];
    if edge.same_layer {
        return;
    }
    let (source, target) = (edge.source, edge.target);
    let (rs, rt) = (lg.rank_of_port(source), lg.rank_of_port(target));
    debug_assert!(rt > rs, "edge {e} points downward after layering");

    let mut segments = Vec::with_capacity((rt - rs).max(1) as usize);
    let mut prev = source;
    for r in rs + 1..rt {
        let d = lg.add_node(NodeKind::Dummy { edge: e }, r);
        let south = lg.add_port(d, Orientation::South);
        let north = lg.add_port(d, Orientation::North);
        segments.push(Segment {
            from: prev,
            to: south,
        });
        prev = north;
    }
    segments.push(Segment {
        from: prev,
        to: target,
    });
    lg.edges[e].segments = segments;
}

/// Every segment joins adjacent ranks.
pub(crate) fn check_spans(lg: &LayeredGraph) -> bool {
    lg.edges.iter().all(|e| {
        e.segments
            .iter()
            .all(|s| (lg.rank_of_port(s.from) - lg.rank_of_port(s.to)).abs() <= 1)
    })
}
