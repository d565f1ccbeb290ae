//! Working arena shared by the pipeline stages.
//!
//! Node indices below `vertex_count` are the caller's `VertexId`s and port indices below
//! `port_count` are its `PortId`s. Dummies are appended after them and dropped again by
//! truncation once the drawing has been recorded.

use crate::error::{Error, Result};
use lamina_graph::{Graph, Orientation, PortComposition, PortId, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Vertex,
    /// Subdivides a long edge; one SOUTH and one NORTH port.
    Dummy { edge: usize },
    /// Redirects an edge leaving its vertex on the far side; both ports share a side.
    Turning { edge: usize },
}

/// An owned port tree, mirrored from the caller's composition tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Composition {
    Port(usize),
    Group {
        ordered: bool,
        members: Vec<Composition>,
    },
}

impl Composition {
    fn from_graph(graph: &Graph, c: PortComposition) -> Self {
        match c {
            PortComposition::Port(p) => Composition::Port(p.index()),
            PortComposition::Group(g) => Composition::Group {
                ordered: graph.port_group(g).is_some_and(|grp| grp.ordered),
                members: graph
                    .members(c)
                    .iter()
                    .map(|&m| Composition::from_graph(graph, m))
                    .collect(),
            },
        }
    }

    pub(crate) fn collect_ports(&self, out: &mut Vec<usize>) {
        match self {
            Composition::Port(p) => out.push(*p),
            Composition::Group { members, .. } => {
                for m in members {
                    m.collect_ports(out);
                }
            }
        }
    }

    pub(crate) fn ports(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_ports(&mut out);
        out
    }
}

pub(crate) fn flatten(compositions: &[Composition]) -> Vec<usize> {
    let mut out = Vec::new();
    for c in compositions {
        c.collect_ports(&mut out);
    }
    out
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) rank: i32,
    /// Top-level compositions in model order.
    pub(crate) compositions: Vec<Composition>,
    /// Caller-provided (width, height) size hint.
    pub(crate) hint: Option<(f64, f64)>,
    pub(crate) width: f64,
    pub(crate) height: f64,
    /// Center of the node.
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Node {
    pub(crate) fn is_vertex(&self) -> bool {
        self.kind == NodeKind::Vertex
    }

    pub(crate) fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub(crate) fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub(crate) fn top(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub(crate) fn bottom(&self) -> f64 {
        self.y - self.height / 2.0
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LPort {
    pub(crate) node: usize,
    /// `Free` until side assignment.
    pub(crate) side: Orientation,
    pub(crate) preset: Orientation,
    /// Index into the owning node's top-level compositions.
    pub(crate) top: usize,
    /// Horizontal distance of the port center from the node center.
    pub(crate) offset: f64,
}

/// A unit-span (or zero-span) piece of an edge, stored in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment {
    pub(crate) from: usize,
    pub(crate) to: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct LEdge {
    /// Endpoints in the caller's incidence order.
    pub(crate) ports: [usize; 2],
    pub(crate) source: usize,
    pub(crate) target: usize,
    /// `source` is `ports[1]`.
    pub(crate) reversed: bool,
    /// Both endpoints lie on one vertex.
    pub(crate) same_layer: bool,
    /// Source to target; empty for same-layer edges.
    pub(crate) segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
pub(crate) struct LayeredGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) ports: Vec<LPort>,
    pub(crate) edges: Vec<LEdge>,
    pub(crate) vertex_count: usize,
    pub(crate) port_count: usize,
    /// Pairings per vertex, consulted only for plug vertices.
    pub(crate) pairings: Vec<Vec<(usize, usize)>>,
    pub(crate) plug: Vec<bool>,
}

impl LayeredGraph {
    pub(crate) fn from_graph(graph: &Graph) -> Result<Self> {
        graph.validate()?;

        let mut nodes = Vec::with_capacity(graph.vertex_count());
        let mut ports: Vec<LPort> = graph
            .port_ids()
            .map(|p| -> Result<LPort> {
                let port = graph.port(p).ok_or(lamina_graph::Error::UnknownPort(p))?;
                Ok(LPort {
                    node: port.vertex.index(),
                    side: Orientation::Free,
                    preset: port.orientation,
                    top: 0,
                    offset: 0.0,
                })
            })
            .collect::<Result<_>>()?;

        let mut plug = Vec::with_capacity(graph.vertex_count());
        for (vid, vertex) in graph.vertices() {
            let compositions: Vec<Composition> = vertex
                .compositions
                .iter()
                .map(|&c| Composition::from_graph(graph, c))
                .collect();
            for (top, c) in compositions.iter().enumerate() {
                for p in c.ports() {
                    ports[p].top = top;
                }
            }
            debug_assert_eq!(nodes.len(), vid.index());
            nodes.push(Node {
                kind: NodeKind::Vertex,
                rank: 0,
                compositions,
                hint: vertex.shape.map(|r| (r.width, r.height)),
                width: 0.0,
                height: 0.0,
                x: 0.0,
                y: 0.0,
            });
            plug.push(vertex.plug);
        }

        let mut edges = Vec::with_capacity(graph.edge_count());
        for (eid, edge) in graph.edges() {
            let [a, b] = match edge.ports.as_slice() {
                [a, b] => [a.index(), b.index()],
                found if found.len() < 2 => {
                    return Err(Error::DegenerateEdge {
                        edge: eid,
                        found: found.len(),
                    });
                }
                found => {
                    return Err(Error::HyperEdge {
                        edge: eid,
                        found: found.len(),
                    });
                }
            };
            edges.push(LEdge {
                ports: [a, b],
                source: a,
                target: b,
                reversed: false,
                same_layer: ports[a].node == ports[b].node,
                segments: Vec::new(),
            });
        }

        let mut pairings = vec![Vec::new(); graph.vertex_count()];
        for pp in graph.pairings() {
            let v = ports[pp.a.index()].node;
            pairings[v].push((pp.a.index(), pp.b.index()));
        }

        Ok(Self {
            nodes,
            ports,
            edges,
            vertex_count: graph.vertex_count(),
            port_count: graph.port_count(),
            pairings,
            plug,
        })
    }

    pub(crate) fn node_of(&self, port: usize) -> usize {
        self.ports[port].node
    }

    pub(crate) fn rank_of_port(&self, port: usize) -> i32 {
        self.nodes[self.ports[port].node].rank
    }

    /// Vertex-level arcs `(edge, tail, head)` of every edge that is not same-layer, in
    /// incidence order.
    pub(crate) fn incidence_arcs(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.same_layer)
            .map(|(ix, e)| (ix, self.node_of(e.ports[0]), self.node_of(e.ports[1])))
    }

    /// Vertex-level arcs `(edge, source, target)` after direction assignment.
    pub(crate) fn directed_arcs(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.same_layer)
            .map(|(ix, e)| (ix, self.node_of(e.source), self.node_of(e.target)))
    }

    /// Fixes the direction of `edge`; `forward` keeps the incidence order.
    pub(crate) fn orient(&mut self, edge: usize, forward: bool) {
        let e = &mut self.edges[edge];
        let [a, b] = e.ports;
        (e.source, e.target, e.reversed) = if forward { (a, b, false) } else { (b, a, true) };
    }

    pub(crate) fn add_node(&mut self, kind: NodeKind, rank: i32) -> usize {
        let ix = self.nodes.len();
        self.nodes.push(Node {
            kind,
            rank,
            compositions: Vec::new(),
            hint: None,
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
        });
        ix
    }

    /// Appends a port on `side` of a dummy node as its own top-level composition.
    pub(crate) fn add_port(&mut self, node: usize, side: Orientation) -> usize {
        let ix = self.ports.len();
        let top = self.nodes[node].compositions.len();
        self.nodes[node].compositions.push(Composition::Port(ix));
        self.ports.push(LPort {
            node,
            side,
            preset: side,
            top,
            offset: 0.0,
        });
        ix
    }

    pub(crate) fn max_rank(&self) -> i32 {
        self.nodes.iter().map(|n| n.rank).max().unwrap_or(0)
    }

    pub(crate) fn dummy_count(&self) -> usize {
        self.nodes.len() - self.vertex_count
    }

    /// Drops every dummy entity.
    pub(crate) fn truncate(&mut self) {
        self.nodes.truncate(self.vertex_count);
        self.ports.truncate(self.port_count);
        for e in &mut self.edges {
            e.segments.clear();
        }
    }

    pub(crate) fn vertex_id(&self, node: usize) -> Option<VertexId> {
        (node < self.vertex_count).then(|| VertexId::new(node))
    }

    pub(crate) fn port_id(&self, port: usize) -> Option<PortId> {
        (port < self.port_count).then(|| PortId::new(port))
    }
}
