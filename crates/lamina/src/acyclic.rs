//! Break cycles by logically reversing a feedback arc set.
//!
//! The caller's edges are never touched; the decision is written to each working edge's
//! source/target pair.

use crate::config::CycleBreakingMethod;
use crate::layered::LayeredGraph;

pub(crate) fn run(lg: &mut LayeredGraph, method: CycleBreakingMethod) {
    let arcs: Vec<(usize, usize, usize)> = lg.incidence_arcs().collect();
    let fas = match method {
        CycleBreakingMethod::Ignore => Vec::new(),
        CycleBreakingMethod::Dfs => dfs_fas(lg.vertex_count, &arcs),
        CycleBreakingMethod::Greedy => crate::greedy_fas::greedy_fas(lg.vertex_count, &arcs),
    };

    let mut reversed = vec![false; lg.edges.len()];
    for e in &fas {
        reversed[*e] = true;
    }
    for &(e, _, _) in &arcs {
        lg.orient(e, !reversed[e]);
    }
    tracing::debug!(?method, reversed = fas.len(), "cycles broken");
}

#[derive(Debug, Clone, Copy)]
struct DfsFrame {
    v: usize,
    next_arc: usize,
}

/// Edges reaching back to a vertex on the current DFS stack.
///
/// `arcs` holds `(edge, tail, head)` triples; roots are tried in index order and out-arcs
/// in the order given.
pub(crate) fn dfs_fas(n: usize, arcs: &[(usize, usize, usize)]) -> Vec<usize> {
    let mut out: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for &(e, v, w) in arcs {
        if v != w {
            out[v].push((e, w));
        }
    }

    let mut fas = Vec::new();
    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<DfsFrame> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        on_stack[root] = true;
        stack.push(DfsFrame { v: root, next_arc: 0 });

        while let Some(top) = stack.last_mut() {
            let v = top.v;
            let Some(&(e, w)) = out[v].get(top.next_arc) else {
                on_stack[v] = false;
                stack.pop();
                continue;
            };
            top.next_arc += 1;
            if on_stack[w] {
                fas.push(e);
            } else if !visited[w] {
                visited[w] = true;
                on_stack[w] = true;
                stack.push(DfsFrame { v: w, next_arc: 0 });
            }
        }
    }
    fas
}
