//! Invariants of finished drawings on random graphs: acyclic ones with loose ports, and
//! cyclic ones with nested groups, plug pairings and every stage method.

use lamina::graph::{EdgeId, Graph, Orientation, PortId, VertexId};
use lamina::{
    AlignmentMethod, CrossingMinimizationMethod, CycleBreakingMethod, DirectionMethod,
    LayerAssignmentMethod, LayoutConfig, Warning, layout,
};
use proptest::prelude::*;

const EPS: f64 = 1e-5;

/// Vertex count plus arcs that always point from a lower to a higher index.
fn dag_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..=8).prop_flat_map(|n| {
        let arcs = prop::collection::vec((0..n, 0..n), 0..=12).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect::<Vec<_>>()
        });
        (Just(n), arcs)
    })
}

fn build(n: usize, arcs: &[(usize, usize)]) -> (Graph, Vec<EdgeId>) {
    let mut g = Graph::new();
    let vs: Vec<VertexId> = (0..n).map(|i| g.add_vertex(format!("v{i}"))).collect();
    let mut edges = Vec::with_capacity(arcs.len());
    for &(a, b) in arcs {
        let pa = g.add_port(vs[a], None).unwrap();
        let pb = g.add_port(vs[b], None).unwrap();
        edges.push(g.add_edge([pa, pb]).unwrap());
    }
    (g, edges)
}

/// Port slots per vertex: 0 is top level, 1 the outer group, 2 a group nested in it.
#[derive(Debug, Clone)]
struct VertexPlan {
    plug: bool,
    ordered: bool,
    slots: Vec<u8>,
}

/// Edge and pairing picks are reduced modulo the ports available when built.
#[derive(Debug, Clone)]
struct GraphPlan {
    vertices: Vec<VertexPlan>,
    edges: Vec<(usize, usize)>,
    pairings: Vec<(usize, usize, usize)>,
}

fn graph_plan() -> impl Strategy<Value = GraphPlan> {
    let vertex = (any::<bool>(), any::<bool>(), prop::collection::vec(0u8..3, 0..=4))
        .prop_map(|(plug, ordered, slots)| VertexPlan { plug, ordered, slots });
    (
        prop::collection::vec(vertex, 1..=6),
        prop::collection::vec((any::<usize>(), any::<usize>()), 0..=10),
        prop::collection::vec((any::<usize>(), any::<usize>(), any::<usize>()), 0..=4),
    )
        .prop_map(|(vertices, edges, pairings)| GraphPlan {
            vertices,
            edges,
            pairings,
        })
}

impl GraphPlan {
    fn build(&self) -> Graph {
        let mut g = Graph::new();
        let mut owned: Vec<Vec<PortId>> = Vec::with_capacity(self.vertices.len());
        for (i, plan) in self.vertices.iter().enumerate() {
            let v = g.add_vertex(format!("v{i}"));
            g.set_plug(v, plan.plug);
            let outer = plan
                .slots
                .iter()
                .any(|&s| s > 0)
                .then(|| g.add_port_group(v, None, plan.ordered).unwrap());
            let inner = plan
                .slots
                .contains(&2)
                .then(|| g.add_port_group(v, outer, false).unwrap());
            let ports = plan
                .slots
                .iter()
                .map(|&s| {
                    let parent = match s {
                        0 => None,
                        1 => outer,
                        _ => inner,
                    };
                    g.add_port(v, parent).unwrap()
                })
                .collect();
            owned.push(ports);
        }

        let all: Vec<PortId> = owned.iter().flatten().copied().collect();
        if !all.is_empty() {
            for &(a, b) in &self.edges {
                let (pa, pb) = (all[a % all.len()], all[b % all.len()]);
                if pa != pb {
                    g.add_edge([pa, pb]).unwrap();
                }
            }
        }
        for &(v, i, j) in &self.pairings {
            let ports = &owned[v % owned.len()];
            if ports.len() < 2 {
                continue;
            }
            let (a, b) = (ports[i % ports.len()], ports[j % ports.len()]);
            if a != b {
                g.add_pairing(a, b).unwrap();
            }
        }
        g
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arcs_point_north_and_paths_stay_orthogonal(
        (n, arcs) in dag_strategy(),
        seed in any::<u64>(),
        repetitions in 1u32..=3,
    ) {
        let (mut g, edges) = build(n, &arcs);
        let before = g.clone();
        let config = LayoutConfig { seed, repetitions, ..LayoutConfig::default() };
        let report = layout(&mut g, &config).unwrap();
        let d = &report.drawing;

        prop_assert_eq!(d.vertex_shapes.len(), n);
        prop_assert_eq!(d.edge_paths.len(), arcs.len());
        prop_assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        prop_assert_eq!(g.vertex_count(), before.vertex_count());
        for (eid, edge) in before.edges() {
            prop_assert_eq!(&g.edge(eid).unwrap().ports, &edge.ports);
        }

        for &e in &edges {
            let edge = g.edge(e).unwrap();
            let (a, b) = (edge.ports[0], edge.ports[1]);
            let (va, vb) = (g.port(a).unwrap().vertex, g.port(b).unwrap().vertex);
            prop_assert!(d.rank(vb) > d.rank(va), "{} does not point north", e);
            prop_assert_eq!(d.port_side(a), Some(Orientation::North));
            prop_assert_eq!(d.port_side(b), Some(Orientation::South));

            let path = edge.path.as_ref().unwrap();
            prop_assert!(path.is_orthogonal(), "{:?}", path);
            let (start, end) = (d.port_shapes[a.index()].center(), d.port_shapes[b.index()].center());
            prop_assert!((path.start.x - start.x).abs() <= EPS && (path.start.y - start.y).abs() <= EPS);
            prop_assert!((path.end.x - end.x).abs() <= EPS && (path.end.y - end.y).abs() <= EPS);
            prop_assert!(path.points().all(|p| p.y >= start.y - EPS && p.y <= end.y + EPS));
        }

        let least = d.restart_crossings.iter().copied().min().unwrap_or(0);
        prop_assert!(d.crossings <= least);
        prop_assert_eq!(report.crossings, report.repetition_crossings.iter().copied().min().unwrap());
    }

    #[test]
    fn cyclic_grouped_graphs_keep_pairings_and_ranks(
        plan in graph_plan(),
        seed in any::<u64>(),
        methods in (0usize..3, 0usize..4, 0usize..3, 0usize..3, 0usize..3),
    ) {
        let mut g = plan.build();
        let before = g.clone();
        let config = LayoutConfig {
            cycle_breaking: [
                CycleBreakingMethod::Ignore,
                CycleBreakingMethod::Dfs,
                CycleBreakingMethod::Greedy,
            ][methods.0],
            direction: [
                DirectionMethod::Force,
                DirectionMethod::Structural,
                DirectionMethod::Bfs,
                DirectionMethod::Random,
            ][methods.1],
            direction_iterations: 20,
            layering: [
                LayerAssignmentMethod::NetworkSimplex,
                LayerAssignmentMethod::OldNetworkSimplex,
                LayerAssignmentMethod::FdPosition,
            ][methods.2],
            crossing_minimization: [
                CrossingMinimizationMethod::Vertices,
                CrossingMinimizationMethod::Ports,
                CrossingMinimizationMethod::Mixed,
            ][methods.3],
            alignment: [
                AlignmentMethod::None,
                AlignmentMethod::FirstComes,
                AlignmentMethod::BrandesKoepf,
            ][methods.4],
            seed,
            ..LayoutConfig::default()
        };
        let report = layout(&mut g, &config).unwrap();
        let d = &report.drawing;

        prop_assert_eq!(d.vertex_shapes.len(), before.vertex_count());
        prop_assert_eq!(d.edge_paths.len(), before.edges().count());
        prop_assert!(d.verify(&before).is_empty(), "{:?}", d.verify(&before));
        prop_assert!(
            !report.warnings.iter().any(|w| matches!(
                w,
                Warning::CountMismatch { .. } | Warning::EndpointMismatch { .. }
            )),
            "{:?}",
            report.warnings
        );

        for side in &d.port_sides {
            prop_assert!(matches!(side, Orientation::North | Orientation::South), "{:?}", side);
        }

        for (eid, edge) in before.edges() {
            let (a, b) = (edge.ports[0], edge.ports[1]);
            let (va, vb) = (before.port(a).unwrap().vertex, before.port(b).unwrap().vertex);
            if va != vb {
                prop_assert_ne!(d.rank(va), d.rank(vb), "{} joins one layer", eid);
            }
            let path = &d.edge_paths[eid.index()];
            prop_assert!(path.is_orthogonal(), "{} bends diagonally: {:?}", eid, path);
            let (start, end) = (d.port_shapes[a.index()].center(), d.port_shapes[b.index()].center());
            prop_assert!((path.start.x - start.x).abs() <= EPS && (path.start.y - start.y).abs() <= EPS);
            prop_assert!((path.end.x - end.x).abs() <= EPS && (path.end.y - end.y).abs() <= EPS);
        }

        let skipped: Vec<(PortId, PortId)> = report
            .warnings
            .iter()
            .filter_map(|w| match w {
                Warning::NonBipartitePairing { a, b, .. } => Some((*a, *b)),
                _ => None,
            })
            .collect();
        for pp in before.pairings() {
            let vertex = before.port(pp.a).unwrap().vertex;
            if before.vertex(vertex).unwrap().plug && !skipped.contains(&(pp.a, pp.b)) {
                prop_assert_ne!(d.port_side(pp.a), d.port_side(pp.b), "{} and {} share a side", pp.a, pp.b);
            }
        }

        let least = d.restart_crossings.iter().copied().min().unwrap_or(0);
        prop_assert!(d.crossings <= least);
    }
}
