use crate::layered::LayeredGraph;

/// Initial layers: a DFS over upward segments, started from every node in
/// `(rank, index)` order, appends each node to its layer on first visit.
pub(crate) fn init_order(lg: &LayeredGraph) -> Vec<Vec<usize>> {
    let n = lg.nodes.len();
    if n == 0 {
        return Vec::new();
    }
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); lg.max_rank().max(0) as usize + 1];

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for e in &lg.edges {
        for s in &e.segments {
            let (a, b) = (lg.node_of(s.from), lg.node_of(s.to));
            let (lower, upper) = if lg.nodes[a].rank <= lg.nodes[b].rank {
                (a, b)
            } else {
                (b, a)
            };
            successors[lower].push(upper);
        }
    }

    let mut roots: Vec<usize> = (0..n).collect();
    roots.sort_by_key(|&v| (lg.nodes[v].rank, v));

    let mut visited = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    for root in roots {
        stack.push(root);
        while let Some(v) = stack.pop() {
            if std::mem::replace(&mut visited[v], true) {
                continue;
            }
            layers[lg.nodes[v].rank.max(0) as usize].push(v);
            stack.extend(successors[v].iter().rev().copied());
        }
    }
    layers
}
