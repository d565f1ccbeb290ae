//! Layer assignment over the aggregated vertex graph.
//!
//! Parallel edges are merged into one weighted edge with minimum length 1 before ranking.

pub mod fd_position;
mod feasible_tree;
pub mod network_simplex;
pub mod util;

use crate::config::LayerAssignmentMethod;
use crate::layered::LayeredGraph;
use rustc_hash::FxHashMap as HashMap;

pub use network_simplex::{SimplexVariant, network_simplex};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankEdge {
    pub v: usize,
    pub w: usize,
    pub weight: f64,
    pub minlen: i32,
}

/// A simple directed graph on `0..node_count` used by the rankers.
#[derive(Debug, Clone, Default)]
pub struct RankGraph {
    node_count: usize,
    edges: Vec<RankEdge>,
    incident: Vec<Vec<usize>>,
}

impl RankGraph {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
            incident: vec![Vec::new(); node_count],
        }
    }

    /// Builds the graph from `(tail, head)` arcs, summing parallel arcs into weights.
    pub fn aggregate(node_count: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::new(node_count);
        let mut slot: HashMap<(usize, usize), usize> = HashMap::default();
        for (v, w) in arcs {
            if v == w {
                continue;
            }
            match slot.get(&(v, w)) {
                Some(&ix) => g.edges[ix].weight += 1.0,
                None => {
                    slot.insert((v, w), g.edges.len());
                    g.add_edge(v, w, 1.0, 1);
                }
            }
        }
        g
    }

    pub fn add_edge(&mut self, v: usize, w: usize, weight: f64, minlen: i32) -> usize {
        let ix = self.edges.len();
        self.edges.push(RankEdge {
            v,
            w,
            weight,
            minlen: minlen.max(1),
        });
        self.incident[v].push(ix);
        self.incident[w].push(ix);
        ix
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &[RankEdge] {
        &self.edges
    }

    pub fn edge(&self, ix: usize) -> &RankEdge {
        &self.edges[ix]
    }

    /// Edge indices touching `v`, in insertion order.
    pub fn incident(&self, v: usize) -> &[usize] {
        &self.incident[v]
    }

    /// Weakly connected components, each sorted by node index.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.node_count];
        let mut out = Vec::new();
        for root in 0..self.node_count {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            let mut members = vec![root];
            let mut i = 0;
            while let Some(&v) = members.get(i) {
                i += 1;
                for &e in &self.incident[v] {
                    let edge = &self.edges[e];
                    let other = if edge.v == v { edge.w } else { edge.v };
                    if !seen[other] {
                        seen[other] = true;
                        members.push(other);
                    }
                }
            }
            members.sort_unstable();
            out.push(members);
        }
        out
    }

    /// The subgraph induced by `nodes`, renumbered by position in `nodes`.
    pub fn induced(&self, nodes: &[usize]) -> Self {
        let mut local = vec![usize::MAX; self.node_count];
        for (i, &v) in nodes.iter().enumerate() {
            local[v] = i;
        }
        let mut g = Self::new(nodes.len());
        for e in &self.edges {
            let (v, w) = (local[e.v], local[e.w]);
            if v != usize::MAX && w != usize::MAX {
                g.add_edge(v, w, e.weight, e.minlen);
            }
        }
        g
    }
}

pub(crate) fn run(
    lg: &mut LayeredGraph,
    method: LayerAssignmentMethod,
    positions: Option<&[(f64, f64)]>,
) {
    let n = lg.vertex_count;
    let arcs: Vec<(usize, usize)> = lg.directed_arcs().map(|(_, v, w)| (v, w)).collect();

    let ranks = match method {
        LayerAssignmentMethod::NetworkSimplex => {
            network_simplex(&RankGraph::aggregate(n, arcs), SimplexVariant::Balanced)
        }
        LayerAssignmentMethod::OldNetworkSimplex => {
            network_simplex(&RankGraph::aggregate(n, arcs), SimplexVariant::Classic)
        }
        LayerAssignmentMethod::FdPosition => {
            fd_position::fd_position(n, &arcs, positions.unwrap_or(&[]))
        }
    };

    for (node, rank) in lg.nodes.iter_mut().zip(ranks) {
        node.rank = rank;
    }
    tracing::debug!(?method, layers = lg.max_rank() + 1, "layers assigned");
}
