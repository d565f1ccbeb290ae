use crate::index::{PortGroupId, PortId, VertexId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("unknown port {0}")]
    UnknownPort(PortId),

    #[error("unknown port group {0}")]
    UnknownPortGroup(PortGroupId),

    #[error("port group {group} belongs to vertex {owner}, not {vertex}")]
    GroupOnOtherVertex {
        group: PortGroupId,
        owner: VertexId,
        vertex: VertexId,
    },

    #[error("port {port} is listed under vertex {listed} but belongs to {owner}")]
    PortOwnerMismatch {
        port: PortId,
        listed: VertexId,
        owner: VertexId,
    },

    #[error("port {0} appears more than once in its vertex's composition tree")]
    DuplicatePort(PortId),

    #[error("port {0} is not reachable from its vertex's composition tree")]
    DetachedPort(PortId),

    #[error("port pairing {a}/{b} spans two vertices")]
    PairingAcrossVertices { a: PortId, b: PortId },

    #[error("port pairing {0}/{0} pairs a port with itself")]
    SelfPairing(PortId),
}
