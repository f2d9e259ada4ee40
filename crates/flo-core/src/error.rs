use crate::id::{ConnectionId, NodeId};
use crate::model::Side;

/// Why the store refused a mutation. The store is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagramError {
    #[error("a connection cannot start and end on {0}")]
    SelfLoop(NodeId),
    #[error("{a} and {b} are already connected")]
    DuplicateEdge { a: NodeId, b: NodeId },
    #[error("the {side} port of {node} is already in use")]
    PortInUse { node: NodeId, side: Side },
    #[error("{node} has no {side} port")]
    NoSuchPort { node: NodeId, side: Side },
    #[error("node {0} already exists")]
    NodeExists(NodeId),
    #[error("connection {0} already exists")]
    ConnectionExists(ConnectionId),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
