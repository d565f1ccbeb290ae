use lamina::graph::{Graph, Orientation, PortId, VertexId};
use lamina::{Error, LayoutConfig, Warning, layout};

fn edge(g: &mut Graph, from: PortId, to: VertexId) -> PortId {
    let t = g.add_port(to, None).unwrap();
    g.add_edge([from, t]).unwrap();
    t
}

#[test]
fn plug_pairings_end_on_opposite_sides() {
    let mut g = Graph::new();
    let v = g.add_vertex("plug");
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    g.set_plug(v, true);
    let p = g.add_port(v, None).unwrap();
    let q = g.add_port(v, None).unwrap();
    g.add_pairing(p, q).unwrap();
    // Both edges leave the plug, so only the pairing splits the ports.
    edge(&mut g, p, a);
    edge(&mut g, q, b);

    let report = layout(&mut g, &LayoutConfig::default()).unwrap();
    let d = &report.drawing;
    assert_ne!(d.port_side(p), d.port_side(q));
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn paired_groups_move_as_a_whole() {
    let mut g = Graph::new();
    let v = g.add_vertex("plug");
    let target = g.add_vertex("q");
    g.set_plug(v, true);
    let g1 = g.add_port_group(v, None, false).unwrap();
    let g2 = g.add_port_group(v, None, false).unwrap();
    let p1 = g.add_port(v, Some(g1)).unwrap();
    let p2 = g.add_port(v, Some(g1)).unwrap();
    let p3 = g.add_port(v, Some(g2)).unwrap();
    let p4 = g.add_port(v, Some(g2)).unwrap();
    g.add_pairing(p1, p3).unwrap();
    g.add_pairing(p2, p4).unwrap();
    let pq = edge(&mut g, p1, target);

    let report = layout(&mut g, &LayoutConfig::default()).unwrap();
    let d = &report.drawing;
    for p in [p1, p2] {
        assert_eq!(d.port_side(p), Some(Orientation::North), "{p}");
    }
    for p in [p3, p4] {
        assert_eq!(d.port_side(p), Some(Orientation::South), "{p}");
    }
    assert_eq!(d.port_side(pq), Some(Orientation::South));
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn odd_pairing_cycles_are_reported() {
    let mut g = Graph::new();
    let v = g.add_vertex("plug");
    g.set_plug(v, true);
    let ports: Vec<PortId> = (0..3).map(|_| g.add_port(v, None).unwrap()).collect();
    g.add_pairing(ports[0], ports[1]).unwrap();
    g.add_pairing(ports[1], ports[2]).unwrap();
    g.add_pairing(ports[0], ports[2]).unwrap();

    let report = layout(&mut g, &LayoutConfig::default()).unwrap();
    assert_eq!(
        report.warnings,
        vec![Warning::NonBipartitePairing {
            vertex: v,
            a: ports[0],
            b: ports[2],
        }]
    );
    let d = &report.drawing;
    assert_ne!(d.port_side(ports[0]), d.port_side(ports[1]));
    assert_ne!(d.port_side(ports[1]), d.port_side(ports[2]));
}

#[test]
fn pairings_inside_one_group_are_reported() {
    let mut g = Graph::new();
    let v = g.add_vertex("plug");
    g.set_plug(v, true);
    let group = g.add_port_group(v, None, false).unwrap();
    let a = g.add_port(v, Some(group)).unwrap();
    let b = g.add_port(v, Some(group)).unwrap();
    g.add_pairing(a, b).unwrap();

    let report = layout(&mut g, &LayoutConfig::default()).unwrap();
    assert!(matches!(
        report.warnings.as_slice(),
        [Warning::NonBipartitePairing { .. }]
    ));
    assert_eq!(report.drawing.port_side(a), report.drawing.port_side(b));
}

#[test]
fn pairings_are_ignored_on_ordinary_vertices() {
    let mut g = Graph::new();
    let v = g.add_vertex("v");
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let p = g.add_port(v, None).unwrap();
    let q = g.add_port(v, None).unwrap();
    g.add_pairing(p, q).unwrap();
    edge(&mut g, p, a);
    edge(&mut g, q, b);

    let report = layout(&mut g, &LayoutConfig::default()).unwrap();
    assert_eq!(report.drawing.port_side(p), Some(Orientation::North));
    assert_eq!(report.drawing.port_side(q), Some(Orientation::North));
}

#[test]
fn east_and_west_presets_are_left_out_of_side_scoring() {
    let mut sides = Vec::new();
    for seed in 0..32 {
        let mut g = Graph::new();
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        let p = g.add_port(a, None).unwrap();
        g.set_orientation(p, Orientation::East);
        let t = edge(&mut g, p, b);
        g.set_orientation(t, Orientation::West);

        let config = LayoutConfig {
            seed,
            ..LayoutConfig::default()
        };
        let report = layout(&mut g, &config).unwrap();
        assert_eq!(
            report.warnings,
            vec![
                Warning::UnsupportedOrientation {
                    port: p,
                    orientation: Orientation::East,
                },
                Warning::UnsupportedOrientation {
                    port: t,
                    orientation: Orientation::West,
                },
            ]
        );
        let side = report.drawing.port_side(p);
        assert!(matches!(side, Some(Orientation::North | Orientation::South)));
        sides.push(side);
    }
    // The edge leaving `a` does not pull its port north; only the coin decides.
    assert!(sides.contains(&Some(Orientation::North)), "{sides:?}");
    assert!(sides.contains(&Some(Orientation::South)), "{sides:?}");
}

#[test]
fn groups_preset_to_both_sides_are_reported() {
    let mut g = Graph::new();
    let v = g.add_vertex("v");
    let group = g.add_port_group(v, None, false).unwrap();
    let up = g.add_port(v, Some(group)).unwrap();
    let down = g.add_port(v, Some(group)).unwrap();
    g.set_orientation(up, Orientation::North);
    g.set_orientation(down, Orientation::South);

    let report = layout(&mut g, &LayoutConfig::default()).unwrap();
    assert_eq!(
        report.warnings,
        vec![Warning::ConflictingPredefinedSides { vertex: v }]
    );
    // A group never splits, whatever its presets say.
    assert_eq!(report.drawing.port_side(up), report.drawing.port_side(down));
}

#[test]
fn edges_need_exactly_two_ports() {
    let mut g = Graph::new();
    let v = g.add_vertex("v");
    let p = g.add_port(v, None).unwrap();
    let e = g.add_edge([p]).unwrap();
    let err = layout(&mut g, &LayoutConfig::default()).unwrap_err();
    assert!(
        matches!(err, Error::DegenerateEdge { edge, found: 1 } if edge == e),
        "{err}"
    );

    let mut g = Graph::new();
    let v = g.add_vertex("v");
    let ports: Vec<PortId> = (0..3).map(|_| g.add_port(v, None).unwrap()).collect();
    g.add_edge(ports).unwrap();
    let err = layout(&mut g, &LayoutConfig::default()).unwrap_err();
    assert!(matches!(err, Error::HyperEdge { found: 3, .. }), "{err}");
}

#[test]
fn invalid_configs_fail_before_any_work() {
    let mut g = Graph::new();
    let v = g.add_vertex("v");
    let config = LayoutConfig {
        repetitions: 0,
        ..LayoutConfig::default()
    };
    let err = layout(&mut g, &config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }), "{err}");
    assert!(g.vertex(v).unwrap().shape.is_none());
}

#[test]
fn malformed_graphs_are_rejected() {
    let mut g = Graph::new();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let p = g.add_port(a, None).unwrap();
    let q = g.add_port(b, None).unwrap();
    assert!(g.add_pairing(p, q).is_err());
    assert!(g.add_pairing(p, p).is_err());

    let err = g.add_edge([p, PortId::new(9)]).unwrap_err();
    assert_eq!(err, lamina::graph::Error::UnknownPort(PortId::new(9)));
}
