use lamina::graph::{Graph, Orientation, PortId, VertexId};
use lamina::{LayoutConfig, layout};

fn edge(g: &mut Graph, from: PortId, to: VertexId) {
    let t = g.add_port(to, None).unwrap();
    g.add_edge([from, t]).unwrap();
}

#[test]
fn idle_ports_go_to_the_lighter_side() {
    for seed in 0..16 {
        let mut g = Graph::new();
        let v = g.add_vertex("v");
        let n1 = g.add_port(v, None).unwrap();
        let n2 = g.add_port(v, None).unwrap();
        let idle = g.add_port(v, None).unwrap();
        g.set_orientation(n1, Orientation::North);
        g.set_orientation(n2, Orientation::North);

        let config = LayoutConfig {
            seed,
            ..LayoutConfig::default()
        };
        let report = layout(&mut g, &config).unwrap();
        let d = &report.drawing;
        assert_eq!(d.port_side(n1), Some(Orientation::North));
        assert_eq!(d.port_side(n2), Some(Orientation::North));
        assert_eq!(d.port_side(idle), Some(Orientation::South), "seed {seed}");
    }
}

#[test]
fn presets_beat_edge_direction() {
    let mut g = Graph::new();
    let v = g.add_vertex("v");
    let leaves: Vec<VertexId> = (0..3).map(|i| g.add_vertex(format!("leaf{i}"))).collect();
    let group = g.add_port_group(v, None, false).unwrap();
    let preset = g.add_port(v, Some(group)).unwrap();
    g.set_orientation(preset, Orientation::South);
    // Three outgoing edges would pull the group north without the preset.
    for &leaf in &leaves {
        let p = g.add_port(v, Some(group)).unwrap();
        edge(&mut g, p, leaf);
    }

    let report = layout(&mut g, &LayoutConfig::default()).unwrap();
    let members = g.ports_of(v);
    assert_eq!(members.len(), 4);
    for p in members {
        assert_eq!(report.drawing.port_side(p), Some(Orientation::South), "{p}");
    }
}

#[test]
fn shuffled_restarts_keep_groups_together() {
    for seed in 0..16 {
        let mut g = Graph::new();
        let v = g.add_vertex("v");
        let targets: Vec<VertexId> = (0..8).map(|i| g.add_vertex(format!("t{i}"))).collect();
        let free_group = g.add_port_group(v, None, false).unwrap();
        let ordered_group = g.add_port_group(v, None, true).unwrap();
        let free: Vec<PortId> = (0..3)
            .map(|_| g.add_port(v, Some(free_group)).unwrap())
            .collect();
        let ordered: Vec<PortId> = (0..3)
            .map(|_| g.add_port(v, Some(ordered_group)).unwrap())
            .collect();
        let loose: Vec<PortId> = (0..2).map(|_| g.add_port(v, None).unwrap()).collect();

        // Targets interleave the groups so the sweeps want to pull them apart.
        let all: Vec<PortId> = free.iter().chain(&ordered).chain(&loose).copied().collect();
        for (i, &p) in all.iter().enumerate() {
            edge(&mut g, p, targets[(i * 3) % 8]);
        }

        let config = LayoutConfig {
            seed,
            crossing_iterations: 6,
            ..LayoutConfig::default()
        };
        let d = layout(&mut g, &config).unwrap().drawing;

        let mut by_x = all.clone();
        by_x.sort_by(|a, b| {
            let (xa, xb) = (
                d.port_shapes[a.index()].center().x,
                d.port_shapes[b.index()].center().x,
            );
            xa.total_cmp(&xb)
        });
        for &p in &all {
            assert_eq!(d.port_side(p), Some(Orientation::North));
        }

        let slots = |members: &[PortId]| -> Vec<usize> {
            members
                .iter()
                .map(|m| by_x.iter().position(|p| p == m).unwrap())
                .collect()
        };
        let free_slots = slots(&free);
        let lo = *free_slots.iter().min().unwrap();
        let hi = *free_slots.iter().max().unwrap();
        assert_eq!(hi - lo, 2, "seed {seed}: free group split: {free_slots:?}");

        let ordered_slots = slots(&ordered);
        assert_eq!(
            ordered_slots,
            (ordered_slots[0]..ordered_slots[0] + 3).collect::<Vec<_>>(),
            "seed {seed}: ordered group moved"
        );
    }
}
