use super::{Gaps, SortingOrder};
use lamina_graph::Orientation;

/// Total crossings over every pair of adjacent layers, measured on port positions.
pub(crate) fn cross_count(order: &SortingOrder, gaps: &Gaps, port_count: usize) -> usize {
    let mut pos = vec![usize::MAX; port_count];
    let mut cc = 0;
    for (rank, segments) in gaps.iter().enumerate() {
        if segments.is_empty() {
            continue;
        }
        // The two port sets are disjoint, so one position table serves both.
        for (i, p) in order.facing_ports(rank, Orientation::North).into_iter().enumerate() {
            pos[p] = i;
        }
        let upper = order.facing_ports(rank + 1, Orientation::South);
        for (i, &p) in upper.iter().enumerate() {
            pos[p] = i;
        }
        let mut pairs: Vec<(usize, usize)> =
            segments.iter().map(|&(lo, up)| (pos[lo], pos[up])).collect();
        cc += two_layer_cross_count(&mut pairs, upper.len());
    }
    cc
}

/// Accumulator-tree count of inversions between `(lower, upper)` position pairs.
pub(crate) fn two_layer_cross_count(pairs: &mut [(usize, usize)], upper_len: usize) -> usize {
    if upper_len == 0 || pairs.is_empty() {
        return 0;
    }
    pairs.sort_unstable();

    let mut first_index: usize = 1;
    while first_index < upper_len {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut cc = 0;
    for &(_, pos) in pairs.iter() {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
