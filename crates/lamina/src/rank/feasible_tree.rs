//! Feasible tree construction used by the network simplex ranker.

use super::{RankGraph, util};

/// Grows a spanning tree of tight edges from node 0, shifting the tree's ranks toward the
/// minimum-slack edge whenever it gets stuck. Returns the tree edges in insertion order.
///
/// `g` must be weakly connected.
pub(super) fn feasible_tree(g: &RankGraph, ranks: &mut [i32]) -> Vec<usize> {
    let n = g.node_count();
    let mut tree_edges = Vec::with_capacity(n.saturating_sub(1));
    if n == 0 {
        return tree_edges;
    }

    let mut in_tree = vec![false; n];
    let mut members = vec![0usize];
    in_tree[0] = true;

    loop {
        tight_tree(g, ranks, &mut in_tree, &mut members, &mut tree_edges);
        if members.len() >= n {
            break;
        }
        let Some((slack, tail_in_tree)) = find_min_slack_edge(g, ranks, &in_tree) else {
            break;
        };
        let delta = if tail_in_tree { slack } else { -slack };
        for &v in &members {
            ranks[v] += delta;
        }
    }
    tree_edges
}

fn tight_tree(
    g: &RankGraph,
    ranks: &[i32],
    in_tree: &mut [bool],
    members: &mut Vec<usize>,
    tree_edges: &mut Vec<usize>,
) {
    let mut stack: Vec<usize> = members.clone();
    while let Some(v) = stack.pop() {
        for &ix in g.incident(v) {
            let e = g.edge(ix);
            let other = if e.v == v { e.w } else { e.v };
            if in_tree[other] || util::slack(g, ranks, ix) != 0 {
                continue;
            }
            in_tree[other] = true;
            members.push(other);
            tree_edges.push(ix);
            stack.push(other);
        }
    }
}

fn find_min_slack_edge(g: &RankGraph, ranks: &[i32], in_tree: &[bool]) -> Option<(i32, bool)> {
    let mut best: Option<(i32, bool)> = None;
    for (ix, e) in g.edges().iter().enumerate() {
        let in_v = in_tree[e.v];
        if in_v == in_tree[e.w] {
            continue;
        }
        let slack = util::slack(g, ranks, ix);
        match best {
            Some((best_slack, _)) if slack >= best_slack => {}
            _ => best = Some((slack, in_v)),
        }
    }
    best
}
