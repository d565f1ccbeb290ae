//! Ranks read off a force simulation's vertical axis.

use super::util;

/// Buckets vertices by `y` (bucket height = median edge length), then walks a topological
/// order so every arc still gains at least one rank. Vertices without arcs get rank 0.
pub fn fd_position(n: usize, arcs: &[(usize, usize)], positions: &[(f64, f64)]) -> Vec<i32> {
    if n == 0 {
        return Vec::new();
    }
    let pos = |v: usize| positions.get(v).copied().unwrap_or((0.0, 0.0));

    let mut lengths: Vec<f64> = arcs
        .iter()
        .map(|&(v, w)| {
            let ((x1, y1), (x2, y2)) = (pos(v), pos(w));
            (x2 - x1).hypot(y2 - y1)
        })
        .collect();
    lengths.sort_by(f64::total_cmp);
    let bucket_height = lengths
        .get(lengths.len() / 2)
        .copied()
        .filter(|h| *h > 0.0 && h.is_finite())
        .unwrap_or(1.0);

    let min_y = (0..n).map(|v| pos(v).1).fold(f64::INFINITY, f64::min);
    let bucket: Vec<i32> = (0..n)
        .map(|v| ((pos(v).1 - min_y) / bucket_height).floor() as i32)
        .collect();

    let indexed: Vec<(usize, usize, usize)> = arcs
        .iter()
        .enumerate()
        .map(|(ix, &(v, w))| (ix, v, w))
        .collect();
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut has_arc = vec![false; n];
    for &(v, w) in arcs {
        preds[w].push(v);
        has_arc[v] = true;
        has_arc[w] = true;
    }

    let mut ranks = vec![0i32; n];
    for v in crate::direction::topological_order(n, &indexed) {
        let from_preds = preds[v].iter().map(|&u| ranks[u] + 1).max().unwrap_or(0);
        ranks[v] = bucket[v].max(from_preds);
    }
    util::normalize(&mut ranks);
    for v in 0..n {
        if !has_arc[v] {
            ranks[v] = 0;
        }
    }
    ranks
}
