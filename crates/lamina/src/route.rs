//! Orthogonal edge paths from the positioned segment chains.

use crate::config::Spacing;
use crate::layered::{LEdge, LayeredGraph};
use crate::position::{EPSILON, Tracks, port_anchor_y, port_x};
use lamina_graph::{Orientation, Path, Point};

/// One path per edge, running from `ports[0]` to `ports[1]`.
pub(crate) fn run(lg: &LayeredGraph, tracks: &Tracks, spacing: &Spacing) -> Vec<Path> {
    let paths: Vec<Path> = lg
        .edges
        .iter()
        .enumerate()
        .map(|(e, edge)| {
            let mut points = if edge.same_layer {
                loop_points(lg, edge, spacing)
            } else {
                chain_points(lg, edge, &tracks.by_edge[e])
            };
            if edge.reversed {
                points.reverse();
            }
            into_path(simplify(points), spacing.edge_thickness)
        })
        .collect();
    tracing::debug!(edges = paths.len(), "edges routed");
    paths
}

fn anchor(lg: &LayeredGraph, port: usize) -> Point {
    Point::new(port_x(lg, port), port_anchor_y(lg, port))
}

fn chain_points(lg: &LayeredGraph, edge: &LEdge, tracks: &[Option<f64>]) -> Vec<Point> {
    let mut points = Vec::with_capacity(edge.segments.len() * 4);
    for (s, track) in edge.segments.iter().zip(tracks) {
        let (a, b) = (anchor(lg, s.from), anchor(lg, s.to));
        points.push(a);
        if let Some(y) = *track {
            points.push(Point::new(a.x, y));
            points.push(Point::new(b.x, y));
        }
        points.push(b);
    }
    points
}

/// Same-layer edges loop `loop_distance` outside the node; ports on opposite sides are
/// joined around the east side.
fn loop_points(lg: &LayeredGraph, edge: &LEdge, spacing: &Spacing) -> Vec<Point> {
    let [a, b] = edge.ports;
    let node = &lg.nodes[lg.node_of(a)];
    let out = |p: usize| match lg.ports[p].side {
        Orientation::North => node.top() + spacing.loop_distance,
        _ => node.bottom() - spacing.loop_distance,
    };
    let (pa, pb) = (anchor(lg, a), anchor(lg, b));
    let (ya, yb) = (out(a), out(b));
    if lg.ports[a].side == lg.ports[b].side {
        vec![pa, Point::new(pa.x, ya), Point::new(pb.x, yb), pb]
    } else {
        let east = node.right() + spacing.loop_distance;
        vec![
            pa,
            Point::new(pa.x, ya),
            Point::new(east, ya),
            Point::new(east, yb),
            Point::new(pb.x, yb),
            pb,
        ]
    }
}

/// Snaps near-equal coordinates together, then drops repeated and collinear points.
fn simplify(mut points: Vec<Point>) -> Vec<Point> {
    for i in 1..points.len() {
        let prev = points[i - 1];
        let p = &mut points[i];
        if (p.x - prev.x).abs() <= EPSILON {
            p.x = prev.x;
        }
        if (p.y - prev.y).abs() <= EPSILON {
            p.y = prev.y;
        }
    }
    points.dedup();

    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        let collinear = matches!(out.as_slice(), [.., a, b]
            if (a.x == b.x && b.x == p.x) || (a.y == b.y && b.y == p.y));
        if collinear {
            out.pop();
        }
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

fn into_path(mut points: Vec<Point>, thickness: f64) -> Path {
    let start = points.first().copied().unwrap_or_default();
    let end = if points.len() > 1 {
        points.pop().unwrap_or_default()
    } else {
        start
    };
    let bends = points.into_iter().skip(1).collect();
    Path::new(start, end, bends, thickness)
}
