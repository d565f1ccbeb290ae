//! Direction assignment.
//!
//! Every method produces a strict total order of the vertices; each edge then points from
//! the earlier to the later endpoint, so the result is acyclic by construction.

use crate::config::DirectionMethod;
use crate::layered::LayeredGraph;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

/// Returns the simulated positions when the force method ran.
pub(crate) fn run(
    lg: &mut LayeredGraph,
    method: DirectionMethod,
    iterations: u32,
    rng: &mut StdRng,
) -> Option<Vec<(f64, f64)>> {
    let n = lg.vertex_count;
    let arcs: Vec<(usize, usize, usize)> = lg.directed_arcs().collect();

    let mut positions = None;
    let order: Vec<usize> = match method {
        DirectionMethod::Structural => {
            for e in crate::acyclic::dfs_fas(n, &arcs) {
                let forward = lg.edges[e].reversed;
                lg.orient(e, forward);
            }
            let arcs: Vec<(usize, usize, usize)> = lg.directed_arcs().collect();
            topological_order(n, &arcs)
        }
        DirectionMethod::Force => {
            let simple: Vec<(usize, usize)> = arcs.iter().map(|&(_, v, w)| (v, w)).collect();
            let pos = crate::force::simulate(n, &simple, iterations, rng);
            let keys: Vec<u64> = (0..n).map(|_| rng.r#gen()).collect();
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| pos[a].1.total_cmp(&pos[b].1).then(keys[a].cmp(&keys[b])));
            positions = Some(pos);
            order
        }
        DirectionMethod::Bfs => bfs_order(n, &arcs),
        DirectionMethod::Random => {
            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(rng);
            order
        }
    };

    let mut index = vec![0usize; n];
    for (i, &v) in order.iter().enumerate() {
        index[v] = i;
    }
    for (e, _, _) in arcs {
        let [a, b] = lg.edges[e].ports;
        let forward = index[lg.node_of(a)] < index[lg.node_of(b)];
        lg.orient(e, forward);
    }

    tracing::debug!(?method, vertices = n, "directions assigned");
    positions
}

/// Kahn's algorithm; among ready vertices the lowest index goes first.
pub(crate) fn topological_order(n: usize, arcs: &[(usize, usize, usize)]) -> Vec<usize> {
    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];
    for &(_, v, w) in arcs {
        succ[v].push(w);
        indegree[w] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&v| indegree[v] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(v)) = ready.pop() {
        order.push(v);
        for &w in &succ[v] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                ready.push(Reverse(w));
            }
        }
    }

    // Residual cycles only arise from malformed input; keep the order total regardless.
    if order.len() < n {
        let mut placed = vec![false; n];
        for &v in &order {
            placed[v] = true;
        }
        order.extend((0..n).filter(|&v| !placed[v]));
    }
    order
}

fn bfs_order(n: usize, arcs: &[(usize, usize, usize)]) -> Vec<usize> {
    let mut adjacent: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];
    for &(_, v, w) in arcs {
        adjacent[v].push(w);
        adjacent[w].push(v);
        indegree[w] += 1;
    }

    let mut component = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for root in 0..n {
        if component[root] != usize::MAX {
            continue;
        }
        let id = components.len();
        let mut members = vec![root];
        component[root] = id;
        let mut i = 0;
        while let Some(&v) = members.get(i) {
            i += 1;
            for &w in &adjacent[v] {
                if component[w] == usize::MAX {
                    component[w] = id;
                    members.push(w);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }

    let mut level = vec![usize::MAX; n];
    let mut discovered: Vec<usize> = Vec::with_capacity(n);
    for members in &components {
        let start = members
            .iter()
            .copied()
            .find(|&v| indegree[v] == 0)
            .unwrap_or(members[0]);
        level[start] = 0;
        discovered.push(start);
        let mut queue = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            for &w in &adjacent[v] {
                if level[w] == usize::MAX {
                    level[w] = level[v] + 1;
                    discovered.push(w);
                    queue.push_back(w);
                }
            }
        }
    }

    let mut discovery = vec![0usize; n];
    for (i, &v) in discovered.iter().enumerate() {
        discovery[v] = i;
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&v| (level[v], discovery[v]));
    order
}
