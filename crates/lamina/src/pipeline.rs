//! The staged Sugiyama pipeline for one graph and one seed.
//!
//! Stages run strictly in order. Each stage method asserts that its predecessor has run,
//! so calling them out of order is a programming error and panics.

use crate::config::{LayerAssignmentMethod, LayoutConfig};
use crate::error::Result;
use crate::layered::LayeredGraph;
use crate::order::{self, SortingOrder};
use crate::position::{self, Tracks, port_anchor_y, port_x};
use crate::warning::{Warning, Warnings};
use crate::{acyclic, direction, force, normalize, port_sides, rank, route};
use lamina_graph::{EdgeId, Graph, Orientation, Path, Point, PortId, Rectangle, VertexId};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Constructed,
    Directed,
    Layered,
    DummiesInserted,
    SidesAssigned,
    Ordered,
    Positioned,
    Routed,
    Restored,
}

/// Everything a finished run produced, indexed like the input graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub vertex_shapes: Vec<Rectangle>,
    pub port_shapes: Vec<Rectangle>,
    pub port_sides: Vec<Orientation>,
    pub edge_paths: Vec<Path>,
    pub ranks: Vec<i32>,
    /// Vertices per layer, left to right; layer `r` holds the vertices of rank `r`.
    pub layers: Vec<Vec<VertexId>>,
    pub crossings: usize,
    /// Crossings of each restart's initial ordering.
    pub restart_crossings: Vec<usize>,
    pub warnings: Vec<Warning>,
}

impl Drawing {
    /// Writes shapes, port sides and paths into `graph`, which must be the graph this drawing
    /// was made for. Port orientations become the assigned NORTH/SOUTH sides.
    pub fn apply(&self, graph: &mut Graph) {
        for (ix, shape) in self.vertex_shapes.iter().enumerate() {
            graph.set_vertex_shape(VertexId::new(ix), *shape);
        }
        for (ix, (shape, side)) in self.port_shapes.iter().zip(&self.port_sides).enumerate() {
            graph.set_port_shape(PortId::new(ix), *shape);
            graph.set_orientation(PortId::new(ix), *side);
        }
        for (ix, path) in self.edge_paths.iter().enumerate() {
            graph.set_edge_path(EdgeId::new(ix), path.clone());
        }
    }

    pub fn vertex_shape(&self, v: VertexId) -> Option<&Rectangle> {
        self.vertex_shapes.get(v.index())
    }

    pub fn port_side(&self, p: PortId) -> Option<Orientation> {
        self.port_sides.get(p.index()).copied()
    }

    pub fn rank(&self, v: VertexId) -> Option<i32> {
        self.ranks.get(v.index()).copied()
    }

    /// Total number of bend points over all edges.
    pub fn bends(&self) -> usize {
        self.edge_paths.iter().map(|p| p.bends.len()).sum()
    }

    /// Compares the drawing with `graph`: one shape per vertex and port, one side per port,
    /// and one path per edge running from `ports[0]` to `ports[1]`.
    pub fn verify(&self, graph: &Graph) -> Vec<Warning> {
        Footprint::of(graph).check(self)
    }
}

/// Entity counts and edge endpoints of an input graph.
#[derive(Debug, Clone)]
struct Footprint {
    vertices: usize,
    ports: usize,
    endpoints: Vec<Vec<PortId>>,
}

impl Footprint {
    fn of(graph: &Graph) -> Self {
        Self {
            vertices: graph.vertex_count(),
            ports: graph.port_count(),
            endpoints: graph.edges().map(|(_, e)| e.ports.clone()).collect(),
        }
    }

    fn check(&self, d: &Drawing) -> Vec<Warning> {
        let mut found = Vec::new();
        for (what, expected, got) in [
            ("vertex shapes", self.vertices, d.vertex_shapes.len()),
            ("port shapes", self.ports, d.port_shapes.len()),
            ("port sides", self.ports, d.port_sides.len()),
            ("edge paths", self.endpoints.len(), d.edge_paths.len()),
        ] {
            if expected != got {
                found.push(Warning::CountMismatch {
                    what,
                    expected,
                    found: got,
                });
            }
        }

        let at_port = |p: PortId, pt: Point| {
            d.port_shapes.get(p.index()).is_some_and(|r| {
                let c = r.center();
                (c.x - pt.x).abs().max((c.y - pt.y).abs()) <= ENDPOINT_TOLERANCE
            })
        };
        for (ix, (ports, path)) in self.endpoints.iter().zip(&d.edge_paths).enumerate() {
            let joined = match ports.as_slice() {
                &[a, b] => at_port(a, path.start) && at_port(b, path.end),
                _ => false,
            };
            if !joined {
                found.push(Warning::EndpointMismatch {
                    edge: EdgeId::new(ix),
                });
            }
        }
        found
    }
}

const ENDPOINT_TOLERANCE: f64 = 1e-4;

pub struct Sugiyama {
    config: LayoutConfig,
    stage: Stage,
    lg: LayeredGraph,
    order: SortingOrder,
    rng: StdRng,
    positions: Option<Vec<(f64, f64)>>,
    crossings: usize,
    restart_crossings: Vec<usize>,
    tracks: Tracks,
    paths: Vec<Path>,
    warnings: Warnings,
    input: Footprint,
}

impl Sugiyama {
    /// Builds the working arena; fails on malformed graphs and on edges without exactly two
    /// ports.
    pub fn new(graph: &Graph, config: &LayoutConfig, seed: u64) -> Result<Self> {
        let lg = LayeredGraph::from_graph(graph)?;
        tracing::trace!(
            vertices = lg.vertex_count,
            ports = lg.port_count,
            edges = graph.edge_count(),
            seed,
            "pipeline constructed"
        );
        Ok(Self {
            config: config.clone(),
            stage: Stage::Constructed,
            lg,
            order: SortingOrder::default(),
            rng: StdRng::seed_from_u64(seed),
            positions: None,
            crossings: 0,
            restart_crossings: Vec::new(),
            tracks: Tracks::default(),
            paths: Vec::new(),
            warnings: Warnings::default(),
            input: Footprint::of(graph),
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn warnings(&self) -> &[Warning] {
        self.warnings.as_slice()
    }

    fn advance(&mut self, from: Stage, to: Stage) {
        assert!(
            self.stage == from,
            "stage {to:?} needs the pipeline at {from:?}, found {:?}",
            self.stage
        );
        self.stage = to;
    }

    pub fn assign_directions(&mut self) {
        self.advance(Stage::Constructed, Stage::Directed);
        acyclic::run(&mut self.lg, self.config.cycle_breaking);
        self.positions = direction::run(
            &mut self.lg,
            self.config.direction,
            self.config.direction_iterations,
            &mut self.rng,
        );
    }

    pub fn assign_layers(&mut self) {
        self.advance(Stage::Directed, Stage::Layered);
        if self.config.layering == LayerAssignmentMethod::FdPosition && self.positions.is_none() {
            let arcs: Vec<(usize, usize)> =
                self.lg.directed_arcs().map(|(_, v, w)| (v, w)).collect();
            self.positions = Some(force::simulate(
                self.lg.vertex_count,
                &arcs,
                self.config.direction_iterations,
                &mut self.rng,
            ));
        }
        rank::run(&mut self.lg, self.config.layering, self.positions.as_deref());
    }

    pub fn insert_dummies(&mut self) {
        self.advance(Stage::Layered, Stage::DummiesInserted);
        self.order = normalize::run(&mut self.lg);
        debug_assert!(normalize::check_spans(&self.lg));
    }

    pub fn assign_port_sides(&mut self) {
        self.advance(Stage::DummiesInserted, Stage::SidesAssigned);
        port_sides::run(
            &mut self.lg,
            &mut self.order,
            &mut self.rng,
            &mut self.warnings,
        );
    }

    pub fn minimize_crossings(&mut self) {
        self.advance(Stage::SidesAssigned, Stage::Ordered);
        let minimized = order::minimize(
            &self.lg,
            &mut self.order,
            self.config.crossing_minimization,
            self.config.crossing_iterations,
            self.config.max_sweeps,
            &mut self.rng,
        );
        self.crossings = minimized.crossings;
        self.restart_crossings = minimized.restart_crossings;
    }

    pub fn position(&mut self) {
        self.advance(Stage::Ordered, Stage::Positioned);
        let gaps = order::gaps(&self.lg, self.order.layer_count());
        self.tracks = position::run(&mut self.lg, &self.order, &gaps, &self.config);
    }

    pub fn route(&mut self) {
        self.advance(Stage::Positioned, Stage::Routed);
        self.paths = route::run(&self.lg, &self.tracks, &self.config.spacing);
    }

    /// Records the drawing and drops every dummy entity.
    pub fn restore(mut self) -> Drawing {
        self.advance(Stage::Routed, Stage::Restored);
        let s = &self.config.spacing;
        let lg = &self.lg;

        let vertex_shapes = lg.nodes[..lg.vertex_count]
            .iter()
            .map(|n| Rectangle::new(n.left(), n.bottom(), n.width, n.height))
            .collect();
        let port_shapes = (0..lg.port_count)
            .map(|p| {
                Rectangle::new(
                    port_x(lg, p) - s.port_width / 2.0,
                    port_anchor_y(lg, p) - s.port_height / 2.0,
                    s.port_width,
                    s.port_height,
                )
            })
            .collect();
        let port_sides = lg.ports[..lg.port_count].iter().map(|p| p.side).collect();
        let ranks = lg.nodes[..lg.vertex_count].iter().map(|n| n.rank).collect();
        let layers = self
            .order
            .layers()
            .iter()
            .map(|layer| layer.iter().filter_map(|&v| lg.vertex_id(v)).collect())
            .collect();

        let rewired: Vec<EdgeId> = lg
            .edges
            .iter()
            .zip(&self.input.endpoints)
            .enumerate()
            .filter(|(_, (e, ports))| {
                let kept: Vec<PortId> = e.ports.iter().map(|&p| PortId::new(p)).collect();
                kept != **ports
            })
            .map(|(ix, _)| EdgeId::new(ix))
            .collect();

        self.lg.truncate();
        let mut drawing = Drawing {
            vertex_shapes,
            port_shapes,
            port_sides,
            edge_paths: self.paths,
            ranks,
            layers,
            crossings: self.crossings,
            restart_crossings: self.restart_crossings,
            warnings: Vec::new(),
        };

        let mut warnings = self.warnings;
        for edge in rewired {
            warnings.push(Warning::EndpointMismatch { edge });
        }
        for warning in self.input.check(&drawing) {
            if !warnings.as_slice().contains(&warning) {
                warnings.push(warning);
            }
        }
        drawing.warnings = warnings.into_vec();
        drawing
    }

    /// Runs every stage on a freshly constructed pipeline.
    pub fn run(mut self) -> Drawing {
        self.assign_directions();
        self.assign_layers();
        self.insert_dummies();
        self.assign_port_sides();
        self.minimize_crossings();
        self.position();
        self.route();
        self.restore()
    }
}
