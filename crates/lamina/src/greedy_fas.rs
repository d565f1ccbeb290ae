//! Greedy feedback arc set selection (Eades, Lin and Smyth).
//!
//! Parallel arcs are aggregated into one weighted arc. Sinks and sources are peeled off,
//! then the vertex with the largest `out - in` weight; the arcs still pointing into it form
//! the arc set.

use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

pub(crate) fn greedy_fas(n: usize, arcs: &[(usize, usize, usize)]) -> Vec<usize> {
    if n <= 1 {
        return Vec::new();
    }

    let mut weight: HashMap<(usize, usize), i64> = HashMap::default();
    let mut order: Vec<(usize, usize)> = Vec::new();
    let mut in_w = vec![0i64; n];
    let mut out_w = vec![0i64; n];
    for &(_, v, w) in arcs {
        if v == w {
            continue;
        }
        let slot = weight.entry((v, w)).or_insert_with(|| {
            order.push((v, w));
            0
        });
        *slot += 1;
        out_w[v] += 1;
        in_w[w] += 1;
    }
    let max_in = in_w.iter().copied().max().unwrap_or(0);
    let max_out = out_w.iter().copied().max().unwrap_or(0);

    let mut in_arcs: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    let mut out_arcs: Vec<Vec<(usize, i64)>> = vec![Vec::new(); n];
    for &(v, w) in &order {
        let wgt = weight[&(v, w)];
        out_arcs[v].push((w, wgt));
        in_arcs[w].push((v, wgt));
    }

    let mut queue = BucketQueue {
        buckets: (0..(max_out + max_in + 3) as usize)
            .map(|_| VecDeque::new())
            .collect(),
        zero_idx: max_in + 1,
        bucket_of: vec![None; n],
        alive: vec![true; n],
        alive_count: n,
        in_w,
        out_w,
    };
    for v in 0..n {
        queue.assign(v);
    }

    let mut picked_arcs: Vec<(usize, usize)> = Vec::new();
    while queue.alive_count > 0 {
        while let Some(v) = queue.pop(0) {
            queue.remove(v, &in_arcs, &out_arcs);
        }
        let last = queue.buckets.len() - 1;
        while let Some(v) = queue.pop(last) {
            queue.remove(v, &in_arcs, &out_arcs);
        }
        if queue.alive_count == 0 {
            break;
        }

        let Some(v) = (1..last).rev().find_map(|i| queue.pop(i)) else {
            // Every alive vertex sits in an extreme bucket; the loop above drains them.
            continue;
        };
        for &(u, _) in &in_arcs[v] {
            if queue.alive[u] {
                picked_arcs.push((u, v));
            }
        }
        queue.remove(v, &in_arcs, &out_arcs);
    }

    let picked: rustc_hash::FxHashSet<(usize, usize)> = picked_arcs.into_iter().collect();
    arcs.iter()
        .filter(|(_, v, w)| picked.contains(&(*v, *w)))
        .map(|(e, _, _)| *e)
        .collect()
}

struct BucketQueue {
    buckets: Vec<VecDeque<usize>>,
    zero_idx: i64,
    bucket_of: Vec<Option<usize>>,
    alive: Vec<bool>,
    alive_count: usize,
    in_w: Vec<i64>,
    out_w: Vec<i64>,
}

impl BucketQueue {
    fn pop(&mut self, idx: usize) -> Option<usize> {
        while let Some(v) = self.buckets[idx].pop_back() {
            if self.alive[v] && self.bucket_of[v] == Some(idx) {
                self.bucket_of[v] = None;
                return Some(v);
            }
        }
        None
    }

    fn assign(&mut self, v: usize) {
        if let Some(prev) = self.bucket_of[v] {
            if let Some(pos) = self.buckets[prev].iter().position(|&x| x == v) {
                self.buckets[prev].remove(pos);
            }
        }
        let last = self.buckets.len() - 1;
        let idx = if self.out_w[v] == 0 {
            0
        } else if self.in_w[v] == 0 {
            last
        } else {
            (self.out_w[v] - self.in_w[v] + self.zero_idx).clamp(1, last as i64 - 1) as usize
        };
        self.buckets[idx].push_front(v);
        self.bucket_of[v] = Some(idx);
    }

    fn remove(&mut self, v: usize, in_arcs: &[Vec<(usize, i64)>], out_arcs: &[Vec<(usize, i64)>]) {
        if !std::mem::replace(&mut self.alive[v], false) {
            return;
        }
        self.alive_count -= 1;
        self.bucket_of[v] = None;
        for &(u, wgt) in &in_arcs[v] {
            if self.alive[u] {
                self.out_w[u] -= wgt;
                self.assign(u);
            }
        }
        for &(w, wgt) in &out_arcs[v] {
            if self.alive[w] {
                self.in_w[w] -= wgt;
                self.assign(w);
            }
        }
    }
}
