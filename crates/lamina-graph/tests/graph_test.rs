use lamina_graph::{Error, Graph, Orientation, PortComposition, Rectangle};

#[test]
fn ports_are_flattened_in_composition_order() {
    let mut g = Graph::new();
    let v = g.add_vertex("v");
    let p0 = g.add_port(v, None).unwrap();
    let grp = g.add_port_group(v, None, true).unwrap();
    let inner = g.add_port_group(v, Some(grp), false).unwrap();
    let p1 = g.add_port(v, Some(grp)).unwrap();
    let p2 = g.add_port(v, Some(inner)).unwrap();
    let p3 = g.add_port(v, None).unwrap();

    assert_eq!(g.ports_of(v), vec![p0, p2, p1, p3]);
    assert_eq!(g.ports_in(PortComposition::Group(grp)), vec![p2, p1]);
    assert_eq!(g.top_level_of(p2), Some(PortComposition::Group(grp)));
    assert_eq!(g.top_level_of(p3), Some(PortComposition::Port(p3)));
    assert!(g.validate().is_ok());
}

#[test]
fn groups_cannot_be_shared_between_vertices() {
    let mut g = Graph::new();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let grp = g.add_port_group(a, None, false).unwrap();
    assert!(matches!(
        g.add_port(b, Some(grp)),
        Err(Error::GroupOnOtherVertex { .. })
    ));
}

#[test]
fn pairings_must_stay_on_one_vertex() {
    let mut g = Graph::new();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let pa = g.add_port(a, None).unwrap();
    let pa2 = g.add_port(a, None).unwrap();
    let pb = g.add_port(b, None).unwrap();

    assert_eq!(
        g.add_pairing(pa, pb),
        Err(Error::PairingAcrossVertices { a: pa, b: pb })
    );
    assert_eq!(g.add_pairing(pa, pa), Err(Error::SelfPairing(pa)));
    g.add_pairing(pa, pa2).unwrap();
    assert_eq!(g.pairings_of(a).count(), 1);
    assert_eq!(g.pairings_of(b).count(), 0);
    assert_eq!(g.pairings()[0].partner(pa2), Some(pa));
}

#[test]
fn edges_reject_unknown_ports() {
    let mut g = Graph::new();
    let a = g.add_vertex("a");
    let p = g.add_port(a, None).unwrap();
    let bogus = lamina_graph::PortId::new(7);
    assert_eq!(g.add_edge([p, bogus]), Err(Error::UnknownPort(bogus)));
    assert!(g.add_edge([p, p]).is_ok());
}

#[test]
fn deserialized_graphs_are_validated() {
    let mut g = Graph::new();
    let a = g.add_vertex("a");
    let b = g.add_vertex("b");
    let pa = g.add_port(a, None).unwrap();
    let pb = g.add_port(b, None).unwrap();
    g.add_edge([pa, pb]).unwrap();
    g.set_orientation(pa, Orientation::North);
    g.set_vertex_shape(a, Rectangle::new(0.0, 0.0, 10.0, 5.0));

    let json = serde_json::to_string(&g).unwrap();
    let back: Graph = serde_json::from_str(&json).unwrap();
    assert_eq!(back, g);
    assert!(back.validate().is_ok());

    // Move port `pb` under vertex `a` without updating the port record.
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["vertices"][0]["compositions"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!({ "port": 1 }));
    value["vertices"][1]["compositions"] = serde_json::json!([]);
    let broken: Graph = serde_json::from_value(value).unwrap();
    assert!(matches!(
        broken.validate(),
        Err(Error::PortOwnerMismatch { .. })
    ));
}
