//! NORTH/SOUTH assignment of port compositions.
//!
//! Side precedence, strongest first: plug pairings, preset orientations, the direction of
//! incident edges, side load, and finally a coin flip from the run's RNG.

use crate::layered::{Composition, LayeredGraph, NodeKind, Segment};
use crate::order::SortingOrder;
use crate::warning::{Warning, Warnings};
use lamina_graph::Orientation;
use rand::Rng;
use rand::rngs::StdRng;
use std::cmp::Ordering;

pub(crate) fn run(
    lg: &mut LayeredGraph,
    order: &mut SortingOrder,
    rng: &mut StdRng,
    warnings: &mut Warnings,
) {
    let mut edge_score = vec![0i32; lg.ports.len()];
    let mut has_edge = vec![false; lg.ports.len()];
    for e in lg.edges.iter().filter(|e| !e.same_layer) {
        edge_score[e.source] += 1;
        edge_score[e.target] -= 1;
        has_edge[e.source] = true;
        has_edge[e.target] = true;
    }
    let ports = PortFacts {
        edge_score,
        has_edge,
    };

    for v in 0..lg.vertex_count {
        assign_vertex(lg, order, v, &ports, rng, warnings);
    }
    for v in lg.vertex_count..lg.nodes.len() {
        copy_dummy_sides(lg, order, v);
    }

    let turned = insert_turning_dummies(lg, order);
    tracing::debug!(turned, "port sides assigned");
}

struct PortFacts {
    edge_score: Vec<i32>,
    has_edge: Vec<bool>,
}

/// Aggregated evidence for one side set.
#[derive(Debug, Clone, Copy, Default)]
struct Score {
    predefined: i32,
    edges: i32,
    any_edge: bool,
    north_preset: bool,
    south_preset: bool,
}

impl Score {
    fn add(&mut self, other: Score) {
        self.predefined += other.predefined;
        self.edges += other.edges;
        self.any_edge |= other.any_edge;
        self.north_preset |= other.north_preset;
        self.south_preset |= other.south_preset;
    }

    fn key(&self) -> (i32, i32) {
        (self.predefined, self.edges)
    }

    fn conflicting(&self) -> bool {
        self.north_preset && self.south_preset
    }
}

/// Pairing constraints as a union-find with the side parity to the parent.
struct Parity {
    parent: Vec<usize>,
    flipped: Vec<bool>,
}

impl Parity {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            flipped: vec![false; n],
        }
    }

    fn find(&self, mut x: usize) -> (usize, bool) {
        let mut flipped = false;
        while self.parent[x] != x {
            flipped ^= self.flipped[x];
            x = self.parent[x];
        }
        (x, flipped)
    }

    /// Puts `a` and `b` on opposite sides; `false` when they are already forced together.
    fn separate(&mut self, a: usize, b: usize) -> bool {
        let (ra, pa) = self.find(a);
        let (rb, pb) = self.find(b);
        if ra == rb {
            return pa != pb;
        }
        self.parent[rb] = ra;
        self.flipped[rb] = !(pa ^ pb);
        true
    }
}

fn assign_vertex(
    lg: &mut LayeredGraph,
    order: &mut SortingOrder,
    v: usize,
    facts: &PortFacts,
    rng: &mut StdRng,
    warnings: &mut Warnings,
) {
    let vertex = lg.vertex_id(v);
    let tops: Vec<Vec<usize>> = lg.nodes[v].compositions.iter().map(|c| c.ports()).collect();

    let scores: Vec<Score> = tops
        .iter()
        .map(|ports| {
            let mut s = Score::default();
            for &p in ports {
                match lg.ports[p].preset {
                    Orientation::North => {
                        s.predefined += 1;
                        s.north_preset = true;
                    }
                    Orientation::South => {
                        s.predefined -= 1;
                        s.south_preset = true;
                    }
                    orientation @ (Orientation::East | Orientation::West) => {
                        if let Some(port) = lg.port_id(p) {
                            warnings.push(Warning::UnsupportedOrientation { port, orientation });
                        }
                        continue;
                    }
                    Orientation::Free => {}
                }
                s.edges += facts.edge_score[p];
                s.any_edge |= facts.has_edge[p];
            }
            s
        })
        .collect();

    // Side sets: (members, partner members).
    let mut units: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
    if lg.plug[v] {
        let mut parity = Parity::new(tops.len());
        for &(a, b) in &lg.pairings[v] {
            let (ta, tb) = (lg.ports[a].top, lg.ports[b].top);
            if ta == tb || !parity.separate(ta, tb) {
                if let (Some(vertex), Some(a), Some(b)) = (vertex, lg.port_id(a), lg.port_id(b)) {
                    warnings.push(Warning::NonBipartitePairing { vertex, a, b });
                }
            }
        }
        let mut unit_of_root: Vec<Option<usize>> = vec![None; tops.len()];
        for top in 0..tops.len() {
            let (root, flipped) = parity.find(top);
            let unit = *unit_of_root[root].get_or_insert_with(|| {
                units.push((Vec::new(), Vec::new()));
                units.len() - 1
            });
            if flipped {
                units[unit].1.push(top);
            } else {
                units[unit].0.push(top);
            }
        }
    } else {
        units = (0..tops.len()).map(|top| (vec![top], Vec::new())).collect();
    }

    let total = |members: &[usize]| {
        let mut s = Score::default();
        for &m in members {
            s.add(scores[m]);
        }
        s
    };

    let mut north: Vec<Option<bool>> = vec![None; tops.len()];
    let mut deferred: Vec<usize> = Vec::new();
    for (a, b) in &units {
        let (sa, sb) = (total(a), total(b));
        if sa.conflicting() || sb.conflicting() {
            if let Some(vertex) = vertex {
                warnings.push(Warning::ConflictingPredefinedSides { vertex });
            }
        }

        let a_north = if b.is_empty() {
            match (sa.predefined.cmp(&0), sa.edges.cmp(&0)) {
                (Ordering::Greater, _) => true,
                (Ordering::Less, _) => false,
                (_, Ordering::Greater) => true,
                (_, Ordering::Less) => false,
                _ if sa.any_edge => rng.gen_bool(0.5),
                _ => {
                    deferred.extend_from_slice(a);
                    continue;
                }
            }
        } else {
            match sa.key().cmp(&sb.key()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => rng.gen_bool(0.5),
            }
        };
        for &m in a {
            north[m] = Some(a_north);
        }
        for &m in b {
            north[m] = Some(!a_north);
        }
    }

    let mut load = [0usize; 2];
    for (top, side) in north.iter().enumerate() {
        if let Some(is_north) = side {
            load[usize::from(*is_north)] += tops[top].len();
        }
    }
    for top in deferred {
        let is_north = match load[1].cmp(&load[0]) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => rng.gen_bool(0.5),
        };
        load[usize::from(is_north)] += tops[top].len();
        north[top] = Some(is_north);
    }

    let mut north_list = Vec::new();
    let mut south_list = Vec::new();
    for (top, side) in north.into_iter().enumerate() {
        let side = if side.unwrap_or(false) {
            north_list.push(lg.nodes[v].compositions[top].clone());
            Orientation::North
        } else {
            south_list.push(lg.nodes[v].compositions[top].clone());
            Orientation::South
        };
        for &p in &tops[top] {
            lg.ports[p].side = side;
        }
    }
    order.set_compositions(v, Orientation::North, north_list);
    order.set_compositions(v, Orientation::South, south_list);
}

/// Dummy ports are created with their side fixed.
fn copy_dummy_sides(lg: &LayeredGraph, order: &mut SortingOrder, node: usize) {
    let (north, south): (Vec<Composition>, Vec<Composition>) = lg.nodes[node]
        .compositions
        .iter()
        .cloned()
        .partition(|c| {
            c.ports()
                .first()
                .is_some_and(|&p| lg.ports[p].side == Orientation::North)
        });
    order.set_compositions(node, Orientation::North, north);
    order.set_compositions(node, Orientation::South, south);
}

/// Detours edges whose source port faces SOUTH or whose target port faces NORTH through a
/// turning dummy one layer further out. Returns the number of detours.
fn insert_turning_dummies(lg: &mut LayeredGraph, order: &mut SortingOrder) -> usize {
    let mut needs_bottom = false;
    let mut needs_top = false;
    let max_rank = lg.max_rank();
    for e in lg.edges.iter().filter(|e| !e.same_layer) {
        needs_bottom |=
            lg.ports[e.source].side == Orientation::South && lg.rank_of_port(e.source) == 0;
        needs_top |=
            lg.ports[e.target].side == Orientation::North && lg.rank_of_port(e.target) == max_rank;
    }
    if needs_bottom {
        for node in &mut lg.nodes {
            node.rank += 1;
        }
        order.insert_bottom_layer();
    }
    if needs_top {
        order.push_top_layer();
    }

    let mut turned = 0;
    for e in 0..lg.edges.len() {
        if lg.edges[e].same_layer {
            continue;
        }
        let (source, target) = (lg.edges[e].source, lg.edges[e].target);

        if lg.ports[source].side == Orientation::South {
            let r = lg.rank_of_port(source);
            let turn = lg.add_node(NodeKind::Turning { edge: e }, r - 1);
            let a = lg.add_port(turn, Orientation::North);
            let b = lg.add_port(turn, Orientation::North);
            let dummy = lg.add_node(NodeKind::Dummy { edge: e }, r);
            let ds = lg.add_port(dummy, Orientation::South);
            let dn = lg.add_port(dummy, Orientation::North);

            let segments = &mut lg.edges[e].segments;
            let next = segments[0].to;
            segments.splice(
                0..1,
                [
                    Segment { from: source, to: a },
                    Segment { from: b, to: ds },
                    Segment { from: dn, to: next },
                ],
            );

            let after = order.position(lg.node_of(source)) + 1;
            order.insert(r as usize, after, dummy);
            order.push(r as usize - 1, turn);
            copy_dummy_sides(lg, order, turn);
            copy_dummy_sides(lg, order, dummy);
            turned += 1;
        }

        if lg.ports[target].side == Orientation::North {
            let r = lg.rank_of_port(target);
            let dummy = lg.add_node(NodeKind::Dummy { edge: e }, r);
            let ds = lg.add_port(dummy, Orientation::South);
            let dn = lg.add_port(dummy, Orientation::North);
            let turn = lg.add_node(NodeKind::Turning { edge: e }, r + 1);
            let c = lg.add_port(turn, Orientation::South);
            let d = lg.add_port(turn, Orientation::South);

            let segments = &mut lg.edges[e].segments;
            let last = segments.len() - 1;
            let prev = segments[last].from;
            segments.splice(
                last..,
                [
                    Segment { from: prev, to: ds },
                    Segment { from: dn, to: c },
                    Segment { from: d, to: target },
                ],
            );

            let after = order.position(lg.node_of(target)) + 1;
            order.insert(r as usize, after, dummy);
            order.push(r as usize + 1, turn);
            copy_dummy_sides(lg, order, turn);
            copy_dummy_sides(lg, order, dummy);
            turned += 1;
        }
    }
    turned
}
