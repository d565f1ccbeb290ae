//! Port graph model consumed and augmented by `lamina`.
//!
//! Vertices own trees of port compositions (ports and nested port groups), edges connect
//! ports, and port pairings bind two ports of one vertex to opposite sides. Entities live in
//! flat arenas addressed by stable integer ids; the layout writes shapes and paths back into
//! the same arenas.

pub mod error;
pub mod geometry;
mod graph;
mod index;

pub use error::{Error, Result};
pub use geometry::{Path, Point, Rectangle};
pub use graph::{Edge, Graph, Orientation, Port, PortComposition, PortGroup, PortPairing, Vertex};
pub use index::{EdgeId, PortGroupId, PortId, VertexId};
