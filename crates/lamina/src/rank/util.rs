use super::RankGraph;

/// Initial ranking: sinks get 0 and every other node sits `minlen` below its lowest
/// successor. Ranks are therefore non-positive.
pub fn longest_path(g: &RankGraph) -> Vec<i32> {
    let n = g.node_count();
    let mut out_degree = vec![0usize; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (ix, e) in g.edges().iter().enumerate() {
        out_degree[e.v] += 1;
        preds[e.w].push(ix);
    }

    let mut rank: Vec<Option<i32>> = vec![None; n];
    let mut ready: Vec<usize> = (0..n).rev().filter(|&v| out_degree[v] == 0).collect();
    for &v in &ready {
        rank[v] = Some(0);
    }
    while let Some(w) = ready.pop() {
        let w_rank = rank[w].unwrap_or(0);
        for &ix in &preds[w] {
            let e = g.edge(ix);
            let candidate = w_rank - e.minlen;
            rank[e.v] = Some(rank[e.v].map_or(candidate, |r| r.min(candidate)));
            out_degree[e.v] -= 1;
            if out_degree[e.v] == 0 {
                ready.push(e.v);
            }
        }
    }

    rank.into_iter().map(|r| r.unwrap_or(0)).collect()
}

pub fn slack(g: &RankGraph, ranks: &[i32], edge: usize) -> i32 {
    let e = g.edge(edge);
    ranks[e.w] - ranks[e.v] - e.minlen
}

/// Shifts `ranks` so the smallest is 0.
pub fn normalize(ranks: &mut [i32]) {
    let Some(&min) = ranks.iter().min() else {
        return;
    };
    for r in ranks {
        *r -= min;
    }
}
