//! Arena-backed port graph container.

use crate::error::{Error, Result};
use crate::geometry::{Path, Rectangle};
use crate::index::{EdgeId, PortGroupId, PortId, VertexId};
use serde::{Deserialize, Serialize};

/// Side of its vertex a port is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Free,
    North,
    South,
    East,
    West,
}

/// A node in a vertex's port tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortComposition {
    Port(PortId),
    Group(PortGroupId),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub name: String,
    #[serde(default)]
    pub compositions: Vec<PortComposition>,
    /// Plug vertices place paired ports on opposite sides.
    #[serde(default)]
    pub plug: bool,
    /// Size hint on input, final placement on output.
    #[serde(default)]
    pub shape: Option<Rectangle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub vertex: VertexId,
    #[serde(default)]
    pub parent: Option<PortGroupId>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub shape: Option<Rectangle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortGroup {
    pub vertex: VertexId,
    #[serde(default)]
    pub parent: Option<PortGroupId>,
    #[serde(default)]
    pub members: Vec<PortComposition>,
    /// Members keep their relative order when set.
    #[serde(default)]
    pub ordered: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Edge {
    pub ports: Vec<PortId>,
    #[serde(default)]
    pub path: Option<Path>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortPairing {
    pub a: PortId,
    pub b: PortId,
}

impl PortPairing {
    pub fn contains(&self, p: PortId) -> bool {
        self.a == p || self.b == p
    }

    /// The partner of `p`, if `p` is part of this pairing.
    pub fn partner(&self, p: PortId) -> Option<PortId> {
        if self.a == p {
            Some(self.b)
        } else if self.b == p {
            Some(self.a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    vertices: Vec<Vertex>,
    ports: Vec<Port>,
    groups: Vec<PortGroup>,
    edges: Vec<Edge>,
    pairings: Vec<PortPairing>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, name: impl Into<String>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex {
            name: name.into(),
            ..Default::default()
        });
        id
    }

    /// Adds a port to `vertex`, either at the top level or inside `parent`.
    pub fn add_port(&mut self, vertex: VertexId, parent: Option<PortGroupId>) -> Result<PortId> {
        self.check_parent(vertex, parent)?;
        let id = PortId::new(self.ports.len());
        self.ports.push(Port {
            vertex,
            parent,
            orientation: Orientation::Free,
            shape: None,
        });
        self.attach(vertex, parent, PortComposition::Port(id));
        Ok(id)
    }

    pub fn add_port_group(
        &mut self,
        vertex: VertexId,
        parent: Option<PortGroupId>,
        ordered: bool,
    ) -> Result<PortGroupId> {
        self.check_parent(vertex, parent)?;
        let id = PortGroupId::new(self.groups.len());
        self.groups.push(PortGroup {
            vertex,
            parent,
            members: Vec::new(),
            ordered,
        });
        self.attach(vertex, parent, PortComposition::Group(id));
        Ok(id)
    }

    pub fn add_edge(&mut self, ports: impl IntoIterator<Item = PortId>) -> Result<EdgeId> {
        let ports: Vec<PortId> = ports.into_iter().collect();
        if let Some(&p) = ports.iter().find(|p| p.index() >= self.ports.len()) {
            return Err(Error::UnknownPort(p));
        }
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge { ports, path: None });
        Ok(id)
    }

    pub fn add_pairing(&mut self, a: PortId, b: PortId) -> Result<()> {
        let pa = self.port(a).ok_or(Error::UnknownPort(a))?;
        let pb = self.port(b).ok_or(Error::UnknownPort(b))?;
        if a == b {
            return Err(Error::SelfPairing(a));
        }
        if pa.vertex != pb.vertex {
            return Err(Error::PairingAcrossVertices { a, b });
        }
        self.pairings.push(PortPairing { a, b });
        Ok(())
    }

    fn check_parent(&self, vertex: VertexId, parent: Option<PortGroupId>) -> Result<()> {
        if vertex.index() >= self.vertices.len() {
            return Err(Error::UnknownVertex(vertex));
        }
        if let Some(g) = parent {
            let group = self.port_group(g).ok_or(Error::UnknownPortGroup(g))?;
            if group.vertex != vertex {
                return Err(Error::GroupOnOtherVertex {
                    group: g,
                    owner: group.vertex,
                    vertex,
                });
            }
        }
        Ok(())
    }

    fn attach(&mut self, vertex: VertexId, parent: Option<PortGroupId>, c: PortComposition) {
        match parent {
            Some(g) => self.groups[g.index()].members.push(c),
            None => self.vertices[vertex.index()].compositions.push(c),
        }
    }

    pub fn set_plug(&mut self, vertex: VertexId, plug: bool) {
        if let Some(v) = self.vertices.get_mut(vertex.index()) {
            v.plug = plug;
        }
    }

    pub fn set_orientation(&mut self, port: PortId, orientation: Orientation) {
        if let Some(p) = self.ports.get_mut(port.index()) {
            p.orientation = orientation;
        }
    }

    pub fn set_vertex_shape(&mut self, vertex: VertexId, shape: Rectangle) {
        if let Some(v) = self.vertices.get_mut(vertex.index()) {
            v.shape = Some(shape);
        }
    }

    /// Minimum drawn size of `vertex`; replaced by the placed shape after layout.
    pub fn set_size_hint(&mut self, vertex: VertexId, width: f64, height: f64) {
        self.set_vertex_shape(vertex, Rectangle::new(0.0, 0.0, width, height));
    }

    pub fn set_port_shape(&mut self, port: PortId, shape: Rectangle) {
        if let Some(p) = self.ports.get_mut(port.index()) {
            p.shape = Some(shape);
        }
    }

    pub fn set_edge_path(&mut self, edge: EdgeId, path: Path) {
        if let Some(e) = self.edges.get_mut(edge.index()) {
            e.path = Some(path);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.index())
    }

    pub fn port_group(&self, id: PortGroupId) -> Option<&PortGroup> {
        self.groups.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn port_ids(&self) -> impl ExactSizeIterator<Item = PortId> + '_ {
        (0..self.ports.len()).map(PortId::new)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(ix, v)| (VertexId::new(ix), v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(ix, e)| (EdgeId::new(ix), e))
    }

    pub fn pairings(&self) -> &[PortPairing] {
        &self.pairings
    }

    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|v| v.name == name)
            .map(VertexId::new)
    }

    /// Pairings whose ports belong to `vertex`.
    pub fn pairings_of(&self, vertex: VertexId) -> impl Iterator<Item = &PortPairing> + '_ {
        self.pairings
            .iter()
            .filter(move |pp| self.port(pp.a).is_some_and(|p| p.vertex == vertex))
    }

    /// Members of a composition: the composition itself for a port, the children for a group.
    pub fn members(&self, c: PortComposition) -> &[PortComposition] {
        match c {
            PortComposition::Port(_) => &[],
            PortComposition::Group(g) => self
                .port_group(g)
                .map(|grp| grp.members.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// All ports reachable from `c`, in composition order.
    pub fn ports_in(&self, c: PortComposition) -> Vec<PortId> {
        let mut out = Vec::new();
        self.collect_ports(c, &mut out);
        out
    }

    fn collect_ports(&self, c: PortComposition, out: &mut Vec<PortId>) {
        match c {
            PortComposition::Port(p) => out.push(p),
            PortComposition::Group(g) => {
                for &m in self.members(PortComposition::Group(g)) {
                    self.collect_ports(m, out);
                }
            }
        }
    }

    /// All ports of `vertex`, in composition order.
    pub fn ports_of(&self, vertex: VertexId) -> Vec<PortId> {
        let mut out = Vec::new();
        if let Some(v) = self.vertex(vertex) {
            for &c in &v.compositions {
                self.collect_ports(c, &mut out);
            }
        }
        out
    }

    /// The vertex-level composition containing `port`.
    pub fn top_level_of(&self, port: PortId) -> Option<PortComposition> {
        let p = self.port(port)?;
        let mut top = PortComposition::Port(port);
        let mut parent = p.parent;
        while let Some(g) = parent {
            top = PortComposition::Group(g);
            parent = self.port_group(g)?.parent;
        }
        Some(top)
    }

    /// Checks every cross-reference in the arenas.
    ///
    /// Graphs built through the `add_*` methods are always valid; deserialized graphs may not be.
    pub fn validate(&self) -> Result<()> {
        let mut seen = vec![false; self.ports.len()];

        fn walk(
            g: &Graph,
            vertex: VertexId,
            parent: Option<PortGroupId>,
            c: PortComposition,
            seen: &mut [bool],
        ) -> Result<()> {
            match c {
                PortComposition::Port(p) => {
                    let port = g.port(p).ok_or(Error::UnknownPort(p))?;
                    if port.vertex != vertex {
                        return Err(Error::PortOwnerMismatch {
                            port: p,
                            listed: vertex,
                            owner: port.vertex,
                        });
                    }
                    if port.parent != parent {
                        return Err(Error::DetachedPort(p));
                    }
                    if std::mem::replace(&mut seen[p.index()], true) {
                        return Err(Error::DuplicatePort(p));
                    }
                }
                PortComposition::Group(id) => {
                    let group = g.port_group(id).ok_or(Error::UnknownPortGroup(id))?;
                    if group.vertex != vertex || group.parent != parent {
                        return Err(Error::GroupOnOtherVertex {
                            group: id,
                            owner: group.vertex,
                            vertex,
                        });
                    }
                    for &m in &group.members {
                        walk(g, vertex, Some(id), m, seen)?;
                    }
                }
            }
            Ok(())
        }

        for (vid, v) in self.vertices() {
            for &c in &v.compositions {
                walk(self, vid, None, c, &mut seen)?;
            }
        }
        if let Some(ix) = seen.iter().position(|s| !s) {
            return Err(Error::DetachedPort(PortId::new(ix)));
        }
        for e in &self.edges {
            if let Some(&p) = e.ports.iter().find(|p| p.index() >= self.ports.len()) {
                return Err(Error::UnknownPort(p));
            }
        }
        for pp in &self.pairings {
            let a = self.port(pp.a).ok_or(Error::UnknownPort(pp.a))?;
            let b = self.port(pp.b).ok_or(Error::UnknownPort(pp.b))?;
            if pp.a == pp.b {
                return Err(Error::SelfPairing(pp.a));
            }
            if a.vertex != b.vertex {
                return Err(Error::PairingAcrossVertices { a: pp.a, b: pp.b });
            }
        }
        Ok(())
    }
}
