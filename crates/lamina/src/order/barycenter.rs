use super::{Gaps, SortingOrder};
use crate::layered::LayeredGraph;
use lamina_graph::Orientation;
use rustc_hash::FxHashMap as HashMap;

/// What a neighbor's position is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Measure {
    /// Node index in the fixed layer.
    Vertices,
    /// Port index in the fixed layer's facing port sequence; also reorders the free
    /// layer's facing ports.
    Ports,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Sorts layer `free` by the barycenters of its neighbors in the adjacent layer below
/// (`upward`) or above.
pub(crate) fn sweep_layer(
    lg: &LayeredGraph,
    order: &mut SortingOrder,
    gaps: &Gaps,
    free: usize,
    upward: bool,
    measure: Measure,
) {
    let (fixed, segments, fixed_side, free_side) = if upward {
        if free == 0 {
            return;
        }
        (free - 1, &gaps[free - 1], Orientation::North, Orientation::South)
    } else {
        if free + 1 >= order.layer_count() {
            return;
        }
        (free + 1, &gaps[free], Orientation::South, Orientation::North)
    };

    let mut fixed_pos: HashMap<usize, f64> = HashMap::default();
    match measure {
        Measure::Vertices => {
            for &v in order.layer(fixed) {
                for p in order.ports(v, fixed_side) {
                    fixed_pos.insert(p, order.position(v) as f64);
                }
            }
        }
        Measure::Ports => {
            for (i, p) in order.facing_ports(fixed, fixed_side).into_iter().enumerate() {
                fixed_pos.insert(p, i as f64);
            }
        }
    }

    let mut by_port: HashMap<usize, Accumulator> = HashMap::default();
    let mut by_node: HashMap<usize, Accumulator> = HashMap::default();
    for &(lo, up) in segments {
        let (fixed_port, free_port) = if upward { (lo, up) } else { (up, lo) };
        let Some(&value) = fixed_pos.get(&fixed_port) else {
            continue;
        };
        by_port.entry(free_port).or_default().add(value);
        by_node.entry(lg.node_of(free_port)).or_default().add(value);
    }

    if measure == Measure::Ports {
        let key = |p: usize| by_port.get(&p).and_then(|a| a.mean());
        let nodes: Vec<usize> = order.layer(free).to_vec();
        for v in nodes {
            order.reorder_ports(v, free_side, &key);
        }
    }

    let keys: Vec<Option<f64>> = order
        .layer(free)
        .iter()
        .map(|v| by_node.get(v).and_then(|a| a.mean()))
        .collect();
    order.sort_layer(free, &keys);
}
