//! Seeded spring embedder over the vertex graph.
//!
//! Fruchterman-Reingold forces: every pair of vertices repels with `k^2 / d`, every edge
//! attracts with `d^2 / k`, and each step is capped by a temperature that cools linearly to
//! zero over the configured iterations.

use rand::Rng;
use rand::rngs::StdRng;

const IDEAL_EDGE_LENGTH: f64 = 50.0;
const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default)]
struct SimNode {
    x: f64,
    y: f64,
    fx: f64,
    fy: f64,
}

/// Runs the simulation and returns the final `(x, y)` of every vertex.
pub(crate) fn simulate(
    n: usize,
    edges: &[(usize, usize)],
    iterations: u32,
    rng: &mut StdRng,
) -> Vec<(f64, f64)> {
    if n == 0 {
        return Vec::new();
    }

    let k = IDEAL_EDGE_LENGTH;
    let extent = k * (n as f64).sqrt();
    let mut nodes: Vec<SimNode> = (0..n)
        .map(|_| SimNode {
            x: rng.gen_range(0.0..extent),
            y: rng.gen_range(0.0..extent),
            ..Default::default()
        })
        .collect();

    let initial_temperature = extent / 10.0;
    for step in 0..iterations {
        for node in &mut nodes {
            node.fx = 0.0;
            node.fy = 0.0;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let (mut dx, mut dy) = (nodes[i].x - nodes[j].x, nodes[i].y - nodes[j].y);
                if dx.abs() < MIN_DISTANCE && dy.abs() < MIN_DISTANCE {
                    dx = rng.gen_range(-1.0..1.0);
                    dy = rng.gen_range(-1.0..1.0);
                }
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let force = k * k / dist;
                let (fx, fy) = (force * dx / dist, force * dy / dist);
                nodes[i].fx += fx;
                nodes[i].fy += fy;
                nodes[j].fx -= fx;
                nodes[j].fy -= fy;
            }
        }

        for &(a, b) in edges {
            if a == b {
                continue;
            }
            let (dx, dy) = (nodes[a].x - nodes[b].x, nodes[a].y - nodes[b].y);
            let dist = dx.hypot(dy).max(MIN_DISTANCE);
            let force = dist * dist / k;
            let (fx, fy) = (force * dx / dist, force * dy / dist);
            nodes[a].fx -= fx;
            nodes[a].fy -= fy;
            nodes[b].fx += fx;
            nodes[b].fy += fy;
        }

        let temperature =
            initial_temperature * (1.0 - f64::from(step) / f64::from(iterations.max(1)));
        for node in &mut nodes {
            let len = node.fx.hypot(node.fy);
            if len > 0.0 {
                let capped = len.min(temperature);
                node.x += node.fx / len * capped;
                node.y += node.fy / len * capped;
            }
        }
    }

    nodes.iter().map(|n| (n.x, n.y)).collect()
}
