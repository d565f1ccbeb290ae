//! Brandes & Köpf horizontal coordinate assignment, at port granularity.
//!
//! Blocks are chains of nodes joined through one segment per layer pair. A node's x is its
//! block root's x plus a shift that makes the joined ports line up exactly, so port offsets
//! are honored without any post-processing. The four sweep directions are produced by
//! reversing the layer list (down) and mirroring every layer (right).

use crate::config::{AlignmentMethod, AlignmentPreference, Spacing};
use crate::layered::{LayeredGraph, NodeKind};
use crate::order::{Gaps, SortingOrder};
use lamina_graph::Orientation;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// Segments `(lower port, upper port)` that must not be used for alignment.
pub(crate) type Conflicts = HashSet<(usize, usize)>;

/// A segment seen from the node being aligned.
#[derive(Debug, Clone, Copy)]
struct Link {
    other: usize,
    /// Position of the other port in its layer's facing port sequence.
    pos: usize,
    offset_self: f64,
    offset_other: f64,
    conflict: bool,
}

/// One of the four sweep directions, already transformed so that alignment always runs
/// from the first layer toward the last and from left to right.
struct Problem {
    layers: Vec<Vec<usize>>,
    links: HashMap<usize, Vec<Link>>,
    mirrored: bool,
}

#[derive(Debug, Clone)]
struct Alignment {
    root: Vec<usize>,
    align: Vec<usize>,
    shift: Vec<f64>,
}

/// Marks type-1 conflicts: segments crossing an inner (dummy to dummy) segment.
pub(crate) fn find_type1_conflicts(
    lg: &LayeredGraph,
    order: &SortingOrder,
    gaps: &Gaps,
) -> Conflicts {
    let is_inner = |lo: usize, up: usize| {
        matches!(lg.nodes[lg.node_of(lo)].kind, NodeKind::Dummy { .. })
            && matches!(lg.nodes[lg.node_of(up)].kind, NodeKind::Dummy { .. })
    };

    let mut conflicts = Conflicts::default();
    let mut pos: HashMap<usize, usize> = HashMap::default();
    for (rank, segments) in gaps.iter().enumerate() {
        pos.clear();
        for (i, p) in order.facing_ports(rank, Orientation::North).into_iter().enumerate() {
            pos.insert(p, i);
        }
        for (i, p) in order
            .facing_ports(rank + 1, Orientation::South)
            .into_iter()
            .enumerate()
        {
            pos.insert(p, i);
        }
        let at = |p: usize| pos.get(&p).copied().unwrap_or(0) as i64;

        let inner: Vec<(i64, i64)> = segments
            .iter()
            .filter(|&&(lo, up)| is_inner(lo, up))
            .map(|&(lo, up)| (at(lo), at(up)))
            .collect();
        if inner.is_empty() {
            continue;
        }
        for &(lo, up) in segments {
            if is_inner(lo, up) {
                continue;
            }
            let (a, b) = (at(lo), at(up));
            if inner.iter().any(|&(ia, ib)| (a - ia) * (b - ib) < 0) {
                conflicts.insert((lo, up));
            }
        }
    }
    conflicts
}

/// Center x of every node, with the drawing's left border at 0.
pub(crate) fn position_x(
    lg: &LayeredGraph,
    order: &SortingOrder,
    gaps: &Gaps,
    method: AlignmentMethod,
    preference: AlignmentPreference,
    spacing: &Spacing,
    east_loops: &[bool],
) -> Vec<f64> {
    let conflicts = match preference {
        AlignmentPreference::LongEdges => find_type1_conflicts(lg, order, gaps),
        AlignmentPreference::NoPreference => Conflicts::default(),
    };
    let sep = Separation {
        lg,
        spacing,
        east_loops,
    };

    let xs: Vec<f64> = match method {
        AlignmentMethod::None => {
            let problem = build_problem(lg, order, gaps, &conflicts, true, false);
            let alignment = Alignment::identity(lg.nodes.len());
            compact(&problem, &alignment, &sep, false)
        }
        AlignmentMethod::FirstComes => {
            let problem = build_problem(lg, order, gaps, &conflicts, true, false);
            let alignment = vertical_alignment(&problem, lg.nodes.len());
            compact(&problem, &alignment, &sep, true)
        }
        AlignmentMethod::BrandesKoepf => {
            let mut layouts: Vec<(bool, Vec<f64>)> = Vec::with_capacity(4);
            for upward in [true, false] {
                for mirrored in [false, true] {
                    let problem = build_problem(lg, order, gaps, &conflicts, upward, mirrored);
                    let alignment = vertical_alignment(&problem, lg.nodes.len());
                    layouts.push((mirrored, compact(&problem, &alignment, &sep, true)));
                }
            }
            balance(lg, &mut layouts)
        }
    };
    enforce_separation(xs, order, &sep)
}

impl Alignment {
    fn identity(n: usize) -> Self {
        Self {
            root: (0..n).collect(),
            align: (0..n).collect(),
            shift: vec![0.0; n],
        }
    }
}

fn build_problem(
    lg: &LayeredGraph,
    order: &SortingOrder,
    gaps: &Gaps,
    conflicts: &Conflicts,
    upward: bool,
    mirrored: bool,
) -> Problem {
    let layer_count = order.layer_count();
    let mut layers: Vec<Vec<usize>> = order.layers().to_vec();
    if !upward {
        layers.reverse();
    }
    if mirrored {
        for layer in &mut layers {
            layer.reverse();
        }
    }

    let mut links: HashMap<usize, Vec<Link>> = HashMap::default();
    let sign = if mirrored { -1.0 } else { 1.0 };
    for (rank, segments) in gaps.iter().enumerate() {
        // The layer whose ports serve as `other` is the one processed first.
        let (other_rank, other_side) = if upward {
            (rank, Orientation::North)
        } else {
            (rank + 1, Orientation::South)
        };
        if other_rank >= layer_count {
            continue;
        }
        let facing = order.facing_ports(other_rank, other_side);
        let len = facing.len();
        let pos: HashMap<usize, usize> = facing
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, if mirrored { len - 1 - i } else { i }))
            .collect();

        for &(lo, up) in segments {
            let (mine, theirs) = if upward { (up, lo) } else { (lo, up) };
            links.entry(lg.node_of(mine)).or_default().push(Link {
                other: lg.node_of(theirs),
                pos: pos.get(&theirs).copied().unwrap_or(0),
                offset_self: sign * lg.ports[mine].offset,
                offset_other: sign * lg.ports[theirs].offset,
                conflict: conflicts.contains(&(lo, up)),
            });
        }
    }
    for ls in links.values_mut() {
        ls.sort_by_key(|l| l.pos);
    }

    Problem {
        layers,
        links,
        mirrored,
    }
}

fn vertical_alignment(problem: &Problem, n: usize) -> Alignment {
    let mut a = Alignment::identity(n);
    for layer in problem.layers.iter().skip(1) {
        let mut r: i64 = -1;
        for &v in layer {
            let Some(links) = problem.links.get(&v) else {
                continue;
            };
            let d = links.len();
            if d == 0 {
                continue;
            }
            let (m1, m2) = ((d - 1) / 2, d / 2);
            for m in [m1, m2] {
                if a.align[v] != v {
                    break;
                }
                let l = links[m];
                let u = l.other;
                if !l.conflict && r < l.pos as i64 && a.align[u] == a.root[u] {
                    a.align[u] = v;
                    a.root[v] = a.root[u];
                    a.align[v] = a.root[v];
                    a.shift[v] = a.shift[u] + l.offset_other - l.offset_self;
                    r = l.pos as i64;
                }
                if m1 == m2 {
                    break;
                }
            }
        }
    }
    a
}

struct Separation<'a> {
    lg: &'a LayeredGraph,
    spacing: &'a Spacing,
    east_loops: &'a [bool],
}

impl Separation<'_> {
    /// Minimum center distance between `left` and `right`, adjacent in a layer.
    fn between(&self, left: usize, right: usize) -> f64 {
        let (l, r) = (&self.lg.nodes[left], &self.lg.nodes[right]);
        let gap = if l.is_vertex() && r.is_vertex() {
            self.spacing.vertex_distance
        } else {
            self.spacing.edge_distance
        };
        let loops = if self.east_loops.get(left).copied().unwrap_or(false) {
            self.spacing.loop_distance + self.spacing.edge_thickness
        } else {
            0.0
        };
        (l.width + r.width) / 2.0 + gap + loops
    }
}

/// Packs blocks along the block graph; the second pass pulls blocks toward their
/// successors when `pull` is set.
fn compact(problem: &Problem, a: &Alignment, sep: &Separation<'_>, pull: bool) -> Vec<f64> {
    let n = a.root.len();
    let mut preds: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut succs: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut weight: HashMap<(usize, usize), f64> = HashMap::default();
    let mut blocks: Vec<usize> = Vec::new();
    let mut is_block = vec![false; n];

    for layer in &problem.layers {
        for &v in layer {
            let rv = a.root[v];
            if !std::mem::replace(&mut is_block[rv], true) {
                blocks.push(rv);
            }
        }
        for pair in layer.windows(2) {
            let (w, v) = (pair[0], pair[1]);
            let (rw, rv) = (a.root[w], a.root[v]);
            if rw == rv {
                continue;
            }
            let delta = if problem.mirrored {
                sep.between(v, w)
            } else {
                sep.between(w, v)
            };
            let needed = a.shift[w] - a.shift[v] + delta;
            let slot = weight.entry((rw, rv)).or_insert(f64::NEG_INFINITY);
            *slot = slot.max(needed);
        }
    }
    let mut keys: Vec<(usize, usize)> = weight.keys().copied().collect();
    keys.sort_unstable();
    for (rw, rv) in keys {
        let wgt = weight[&(rw, rv)];
        preds[rv].push((rw, wgt));
        succs[rw].push((rv, wgt));
    }

    let topo = topological_blocks(&blocks, &preds, &succs);

    let mut xs = vec![0.0; n];
    for &b in &topo {
        xs[b] = preds[b]
            .iter()
            .map(|&(p, wgt)| xs[p] + wgt)
            .fold(0.0, f64::max);
    }
    if pull {
        for &b in topo.iter().rev() {
            let min = succs[b]
                .iter()
                .map(|&(s, wgt)| xs[s] - wgt)
                .fold(f64::INFINITY, f64::min);
            if min.is_finite() {
                xs[b] = xs[b].max(min);
            }
        }
    }

    let sign = if problem.mirrored { -1.0 } else { 1.0 };
    (0..n).map(|v| sign * (xs[a.root[v]] + a.shift[v])).collect()
}

fn topological_blocks(
    blocks: &[usize],
    preds: &[Vec<(usize, f64)>],
    succs: &[Vec<(usize, f64)>],
) -> Vec<usize> {
    let mut indegree: HashMap<usize, usize> =
        blocks.iter().map(|&b| (b, preds[b].len())).collect();
    let mut ready: Vec<usize> = blocks
        .iter()
        .rev()
        .copied()
        .filter(|b| preds[*b].is_empty())
        .collect();
    let mut out = Vec::with_capacity(blocks.len());
    while let Some(b) = ready.pop() {
        out.push(b);
        for &(s, _) in &succs[b] {
            if let Some(d) = indegree.get_mut(&s) {
                *d -= 1;
                if *d == 0 {
                    ready.push(s);
                }
            }
        }
    }
    if out.len() < blocks.len() {
        // Only reachable when alignments cross; separation is restored afterwards.
        let placed: HashSet<usize> = out.iter().copied().collect();
        out.extend(blocks.iter().copied().filter(|b| !placed.contains(b)));
    }
    out
}

fn layout_bounds(lg: &LayeredGraph, xs: &[f64]) -> (f64, f64) {
    lg.nodes
        .iter()
        .zip(xs)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (node, &x)| {
            (lo.min(x - node.width / 2.0), hi.max(x + node.width / 2.0))
        })
}

/// Aligns the four layouts to the narrowest one and averages the two median candidates.
fn balance(lg: &LayeredGraph, layouts: &mut [(bool, Vec<f64>)]) -> Vec<f64> {
    let n = lg.nodes.len();
    let Some(reference) = layouts
        .iter()
        .map(|(_, xs)| layout_bounds(lg, xs))
        .min_by(|a, b| (a.1 - a.0).total_cmp(&(b.1 - b.0)))
    else {
        return vec![0.0; n];
    };

    for (mirrored, xs) in layouts.iter_mut() {
        let (lo, hi) = layout_bounds(lg, xs);
        let delta = if *mirrored {
            reference.1 - hi
        } else {
            reference.0 - lo
        };
        for x in xs.iter_mut() {
            *x += delta;
        }
    }

    (0..n)
        .map(|v| {
            let mut vals: Vec<f64> = layouts.iter().map(|(_, xs)| xs[v]).collect();
            vals.sort_by(f64::total_cmp);
            match vals.len() {
                4 => (vals[1] + vals[2]) / 2.0,
                0 => 0.0,
                len => vals[len / 2],
            }
        })
        .collect()
}

/// Pushes nodes right until every layer respects the minimum distances, then moves the
/// drawing so its left border sits at 0.
fn enforce_separation(mut xs: Vec<f64>, order: &SortingOrder, sep: &Separation<'_>) -> Vec<f64> {
    for layer in order.layers() {
        for pair in layer.windows(2) {
            let (w, v) = (pair[0], pair[1]);
            let min = xs[w] + sep.between(w, v);
            if xs[v] < min {
                xs[v] = min;
            }
        }
    }
    let (lo, _) = layout_bounds(sep.lg, &xs);
    let lo = if lo.is_finite() { lo } else { 0.0 };
    xs.into_iter().map(|x| x - lo).collect()
}
