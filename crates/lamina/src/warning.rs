//! Non-fatal findings of a layout run.
//!
//! Each warning is logged through `tracing` when raised and kept in the run's report.

use lamina_graph::{EdgeId, Orientation, PortId, VertexId};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The pairing would force a port composition onto both sides; it was skipped.
    NonBipartitePairing {
        vertex: VertexId,
        a: PortId,
        b: PortId,
    },
    /// Ports preset to NORTH and SOUTH ended up in one side set.
    ConflictingPredefinedSides { vertex: VertexId },
    /// EAST/WEST ports are left out of side scoring.
    UnsupportedOrientation {
        port: PortId,
        orientation: Orientation,
    },
    /// The drawing does not cover the input graph.
    CountMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// The edge's path does not run from its first input port to its second.
    EndpointMismatch { edge: EdgeId },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NonBipartitePairing { vertex, a, b } => write!(
                f,
                "port pairing {a}/{b} on vertex {vertex} is not bipartite; pairing skipped"
            ),
            Warning::ConflictingPredefinedSides { vertex } => write!(
                f,
                "vertex {vertex} has ports preset to both NORTH and SOUTH in one side set"
            ),
            Warning::UnsupportedOrientation { port, orientation } => write!(
                f,
                "port {port} is preset to {orientation:?}; only NORTH and SOUTH are supported"
            ),
            Warning::CountMismatch {
                what,
                expected,
                found,
            } => write!(f, "drawing has {found} {what}, input had {expected}"),
            Warning::EndpointMismatch { edge } => {
                write!(f, "path of edge {edge} does not join its input ports")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Warnings {
    items: Vec<Warning>,
}

impl Warnings {
    pub(crate) fn push(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.items.push(warning);
    }

    pub(crate) fn as_slice(&self) -> &[Warning] {
        &self.items
    }

    pub(crate) fn into_vec(self) -> Vec<Warning> {
        self.items
    }
}
