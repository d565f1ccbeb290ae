//! Network simplex ranker.
//!
//! Each weakly connected component is solved on its own and normalized to start at rank 0.

use super::{RankGraph, feasible_tree, util};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplexVariant {
    /// Cyclic leave-edge search, followed by layer balancing.
    Balanced,
    /// First negative tree edge in tree order, no balancing.
    Classic,
}

pub fn network_simplex(g: &RankGraph, variant: SimplexVariant) -> Vec<i32> {
    let mut ranks = vec![0; g.node_count()];
    for component in g.components() {
        let sub = g.induced(&component);
        let mut local = solve(&sub, variant);
        util::normalize(&mut local);
        for (i, &v) in component.iter().enumerate() {
            ranks[v] = local[i];
        }
    }
    if variant == SimplexVariant::Balanced {
        balance(g, &mut ranks);
    }
    ranks
}

fn solve(g: &RankGraph, variant: SimplexVariant) -> Vec<i32> {
    let mut ranks = util::longest_path(g);
    if g.node_count() <= 1 {
        return ranks;
    }

    let mut tree = feasible_tree::feasible_tree(g, &mut ranks);
    let mut state = TreeState::new(g);
    state.rebuild(g, &tree);

    let max_iterations = (g.edges().len() * g.node_count()).max(64);
    let mut last_slot: Option<usize> = None;
    let mut iterations = 0usize;
    while let Some(slot) = state.leave_edge(&tree, variant, last_slot) {
        let Some(enter) = state.enter_edge(g, &ranks, tree[slot]) else {
            break;
        };
        tree[slot] = enter;
        last_slot = Some(slot);
        state.rebuild(g, &tree);
        state.update_ranks(g, &mut ranks);

        iterations += 1;
        if iterations >= max_iterations {
            tracing::debug!(iterations, "network simplex stopped at the iteration cap");
            break;
        }
    }
    tracing::trace!(iterations, nodes = g.node_count(), "network simplex converged");
    ranks
}

#[derive(Debug, Clone, Copy)]
struct DfsFrame {
    v: usize,
    low: i32,
    next_neighbor: usize,
}

#[derive(Debug, Clone)]
struct TreeState {
    /// Tree neighbors as `(edge, other endpoint)`.
    neighbors: Vec<Vec<(usize, usize)>>,
    parent: Vec<Option<usize>>,
    parent_edge: Vec<usize>,
    low: Vec<i32>,
    lim: Vec<i32>,
    /// Cut value of the tree edge above each non-root node.
    cut: Vec<f64>,
    /// Cut value per graph edge; only tree edges are meaningful.
    cut_by_edge: Vec<f64>,
    is_tree_edge: Vec<bool>,
    preorder: Vec<usize>,
    postorder: Vec<usize>,
    stack: Vec<DfsFrame>,
}

impl TreeState {
    fn new(g: &RankGraph) -> Self {
        let n = g.node_count();
        Self {
            neighbors: vec![Vec::new(); n],
            parent: vec![None; n],
            parent_edge: vec![usize::MAX; n],
            low: vec![0; n],
            lim: vec![0; n],
            cut: vec![0.0; n],
            cut_by_edge: vec![0.0; g.edges().len()],
            is_tree_edge: vec![false; g.edges().len()],
            preorder: Vec::with_capacity(n),
            postorder: Vec::with_capacity(n),
            stack: Vec::new(),
        }
    }

    fn rebuild(&mut self, g: &RankGraph, tree: &[usize]) {
        for ns in &mut self.neighbors {
            ns.clear();
        }
        self.is_tree_edge.fill(false);
        for &ix in tree {
            let e = g.edge(ix);
            self.neighbors[e.v].push((ix, e.w));
            self.neighbors[e.w].push((ix, e.v));
            self.is_tree_edge[ix] = true;
        }

        self.parent.fill(None);
        self.parent_edge.fill(usize::MAX);
        self.preorder.clear();
        self.postorder.clear();

        let mut next_lim: i32 = 1;
        self.preorder.push(0);
        self.stack.push(DfsFrame {
            v: 0,
            low: next_lim,
            next_neighbor: 0,
        });
        while let Some(top) = self.stack.last_mut() {
            let v = top.v;
            if let Some(&(ix, w)) = self.neighbors[v].get(top.next_neighbor) {
                top.next_neighbor += 1;
                if self.parent[v] == Some(w) && self.parent_edge[v] == ix {
                    continue;
                }
                self.parent[w] = Some(v);
                self.parent_edge[w] = ix;
                self.preorder.push(w);
                self.stack.push(DfsFrame {
                    v: w,
                    low: next_lim,
                    next_neighbor: 0,
                });
                continue;
            }
            let Some(frame) = self.stack.pop() else {
                break;
            };
            self.low[frame.v] = frame.low;
            self.lim[frame.v] = next_lim;
            next_lim += 1;
            self.postorder.push(frame.v);
        }

        for i in 0..self.postorder.len() {
            let child = self.postorder[i];
            if self.parent[child].is_none() {
                continue;
            }
            let cut = self.calc_cut_value(g, child);
            self.cut[child] = cut;
            self.cut_by_edge[self.parent_edge[child]] = cut;
        }
    }

    fn calc_cut_value(&self, g: &RankGraph, child: usize) -> f64 {
        let tree_edge = self.parent_edge[child];
        let child_is_tail = g.edge(tree_edge).v == child;
        let mut cut_value = g.edge(tree_edge).weight;

        for &ix in g.incident(child) {
            if ix == tree_edge {
                continue;
            }
            let e = g.edge(ix);
            let is_out_edge = e.v == child;
            let other = if is_out_edge { e.w } else { e.v };
            let points_to_head = is_out_edge == child_is_tail;
            cut_value += if points_to_head { e.weight } else { -e.weight };

            if self.is_tree_edge[ix] && self.parent[other] == Some(child) {
                let other_cut_value = self.cut[other];
                cut_value += if points_to_head {
                    -other_cut_value
                } else {
                    other_cut_value
                };
            }
        }
        cut_value
    }

    /// Slot in `tree` of a tree edge with a negative cut value.
    fn leave_edge(
        &self,
        tree: &[usize],
        variant: SimplexVariant,
        last_slot: Option<usize>,
    ) -> Option<usize> {
        let start = match (variant, last_slot) {
            (SimplexVariant::Balanced, Some(s)) => s + 1,
            _ => 0,
        };
        (0..tree.len())
            .map(|i| (start + i) % tree.len())
            .find(|&slot| self.cut_by_edge[tree[slot]] < 0.0)
    }

    fn enter_edge(&self, g: &RankGraph, ranks: &[i32], leave: usize) -> Option<usize> {
        let e = g.edge(leave);
        let (tail, flip) = if self.lim[e.v] > self.lim[e.w] {
            (e.w, true)
        } else {
            (e.v, false)
        };
        let (tail_low, tail_lim) = (self.low[tail], self.lim[tail]);
        let in_tail = |v: usize| tail_low <= self.lim[v] && self.lim[v] <= tail_lim;

        let mut best: Option<(i32, usize)> = None;
        for (ix, f) in g.edges().iter().enumerate() {
            if flip == in_tail(f.v) && flip != in_tail(f.w) {
                let s = util::slack(g, ranks, ix);
                match best {
                    Some((best_slack, _)) if s >= best_slack => {}
                    _ => best = Some((s, ix)),
                }
            }
        }
        best.map(|(_, ix)| ix)
    }

    fn update_ranks(&self, g: &RankGraph, ranks: &mut [i32]) {
        for &v in self.preorder.iter().skip(1) {
            let Some(parent) = self.parent[v] else {
                continue;
            };
            let e = g.edge(self.parent_edge[v]);
            ranks[v] = if e.v == v {
                ranks[parent] - e.minlen
            } else {
                ranks[parent] + e.minlen
            };
        }
    }
}

/// Moves every node whose in- and out-weights are equal to the feasible rank holding the
/// fewest nodes. Total edge length is unchanged.
fn balance(g: &RankGraph, ranks: &mut [i32]) {
    let Some(&max_rank) = ranks.iter().max() else {
        return;
    };
    let mut counts = vec![0usize; max_rank as usize + 1];
    for &r in ranks.iter() {
        counts[r as usize] += 1;
    }

    for v in 0..g.node_count() {
        let incident = g.incident(v);
        if incident.is_empty() {
            continue;
        }
        let (mut in_w, mut out_w) = (0.0, 0.0);
        let (mut low, mut high) = (0, max_rank);
        for &ix in incident {
            let e = g.edge(ix);
            if e.w == v {
                in_w += e.weight;
                low = low.max(ranks[e.v] + e.minlen);
            } else {
                out_w += e.weight;
                high = high.min(ranks[e.w] - e.minlen);
            }
        }
        if in_w != out_w || low > high {
            continue;
        }

        let current = ranks[v];
        let mut best = current;
        for r in low..=high {
            if counts[r as usize] < counts[best as usize] {
                best = r;
            }
        }
        if best != current {
            counts[current as usize] -= 1;
            counts[best as usize] += 1;
            ranks[v] = best;
        }
    }
}
