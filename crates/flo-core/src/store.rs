//! The entity store: the single owner of a diagram's nodes and connections.
//!
//! Nodes live in a `petgraph` stable graph and connections are its directed
//! edges, so removing a node drops every connection that references it in
//! the same step. Every operation is synchronous and either applies fully or
//! leaves the store untouched and returns a [`DiagramError`].
//!
//! Observers registered with [`Diagram::subscribe`] receive one
//! [`DiagramEvent`] after each successful mutation.

use crate::error::{DiagramError, Result};
use crate::geometry::{self, node_bounds};
use crate::id::{ConnectionId, NodeId};
use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt;

/// A mutation command, applied with [`Diagram::apply`].
///
/// Ids are chosen by the caller so a command fully describes its effect.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramMutation {
    /// Create a node centered on `at` (clamped to the canvas).
    AddNode {
        id: NodeId,
        kind: NodeKind,
        at: Point,
    },
    /// Move a node's top-left corner to `to` (clamped to the canvas).
    MoveNode { id: NodeId, to: Point },
    SetLabel { id: NodeId, label: String },
    /// Remove a node together with every connection touching it.
    RemoveNode { id: NodeId },
    AddConnection {
        id: ConnectionId,
        connection: NewConnection,
    },
    RemoveConnection { id: ConnectionId },
}

/// Change notification delivered to observers after a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramEvent {
    NodeAdded(NodeId),
    NodeMoved { id: NodeId, position: Point },
    NodeRelabeled(NodeId),
    /// A node was deleted; `connections` were removed with it.
    NodeRemoved {
        id: NodeId,
        connections: Vec<ConnectionId>,
    },
    ConnectionAdded(ConnectionId),
    ConnectionRemoved(ConnectionId),
}

/// Handle returned by [`Diagram::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&DiagramEvent)>;

/// A node and the connections that were cascade-deleted with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub connections: Vec<Connection>,
}

/// The flowchart: nodes, connections, and their invariants.
pub struct Diagram {
    graph: StableDiGraph<Node, Connection>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<ConnectionId, EdgeIndex>,
    /// Insertion order, used for deterministic enumeration.
    node_order: Vec<NodeId>,
    connection_order: Vec<ConnectionId>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Diagram {
    /// Create an empty diagram.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            node_order: Vec::new(),
            connection_order: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Apply a mutation command.
    pub fn apply(&mut self, mutation: DiagramMutation) -> Result<()> {
        match mutation {
            DiagramMutation::AddNode { id, kind, at } => {
                self.insert_node(Node::new(id, kind, geometry::origin_for_click(at)))
            }
            DiagramMutation::MoveNode { id, to } => self.move_node(id, to).map(|_| ()),
            DiagramMutation::SetLabel { id, label } => self.set_label(id, label),
            DiagramMutation::RemoveNode { id } => self.delete_node(id).map(|_| ()),
            DiagramMutation::AddConnection { id, connection } => {
                self.insert_connection(id, connection)
            }
            DiagramMutation::RemoveConnection { id } => self.delete_connection(id).map(|_| ()),
        }
    }

    /// Add a node centered on the click point `at`. Returns its new id.
    pub fn add_node(&mut self, kind: NodeKind, at: Point) -> NodeId {
        self.place_node(kind, geometry::origin_for_click(at))
    }

    /// Add a node with its top-left corner at `position` (clamped).
    pub fn place_node(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let mut id = NodeId::generate();
        while self.node_index.contains_key(&id) {
            id = NodeId::generate();
        }
        self.push_node(Node::new(id, kind, position));
        id
    }

    /// Insert a fully built node. Its position is clamped.
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(DiagramError::NodeExists(node.id));
        }
        self.push_node(node);
        Ok(())
    }

    /// Move a node's top-left corner to `to`, clamped to `x ≥ 0, y ≥ 0`.
    /// Returns the position actually applied.
    pub fn move_node(&mut self, id: NodeId, to: Point) -> Result<Point> {
        let idx = self.index_of(id)?;
        let position = geometry::clamp_position(to);
        let node = &mut self.graph[idx];
        if node.position == position {
            return Ok(position);
        }
        node.position = position;
        log::trace!("move node {id} to {position:?}");
        self.emit(DiagramEvent::NodeMoved { id, position });
        Ok(position)
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        let idx = self.index_of(id)?;
        self.graph[idx].label = label.into();
        log::trace!("relabel node {id}");
        self.emit(DiagramEvent::NodeRelabeled(id));
        Ok(())
    }

    /// Remove a node and every connection referencing it, as one step.
    pub fn delete_node(&mut self, id: NodeId) -> Result<RemovedNode> {
        let idx = self.index_of(id)?;

        let mut connections: Vec<Connection> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().clone())
            .collect();
        connections.sort_by_key(|c| self.connection_position(c.id));

        for conn in &connections {
            self.edge_index.remove(&conn.id);
        }
        self.connection_order
            .retain(|cid| !connections.iter().any(|c| c.id == *cid));

        // Removing the graph node also drops its incident edges.
        let Some(node) = self.graph.remove_node(idx) else {
            return Err(DiagramError::UnknownNode(id));
        };
        self.node_index.remove(&id);
        self.node_order.retain(|n| *n != id);

        log::trace!("delete node {id} (+{} connections)", connections.len());
        self.emit(DiagramEvent::NodeRemoved {
            id,
            connections: connections.iter().map(|c| c.id).collect(),
        });
        Ok(RemovedNode { node, connections })
    }

    /// Add a connection with a freshly generated id.
    ///
    /// Rejected, leaving the store unchanged, when the endpoints are the
    /// same node, either endpoint is unknown, the pair is already connected
    /// in either direction, or a requested port is missing or already used.
    pub fn add_connection(&mut self, connection: NewConnection) -> Result<ConnectionId> {
        let mut id = ConnectionId::generate();
        while self.edge_index.contains_key(&id) {
            id = ConnectionId::generate();
        }
        self.insert_connection(id, connection).map(|()| id)
    }

    /// Add a connection under a caller-chosen id.
    pub fn insert_connection(&mut self, id: ConnectionId, connection: NewConnection) -> Result<()> {
        self.validate_connection(&connection)?;
        if self.edge_index.contains_key(&id) {
            return Err(DiagramError::ConnectionExists(id));
        }
        let NewConnection {
            source,
            target,
            source_port,
            target_port,
        } = connection;
        let from = self.index_of(source)?;
        let to = self.index_of(target)?;
        let edge = self.graph.add_edge(
            from,
            to,
            Connection {
                id,
                source,
                target,
                source_port,
                target_port,
            },
        );
        self.edge_index.insert(id, edge);
        self.connection_order.push(id);
        log::trace!("connect {source} -> {target} as {id}");
        self.emit(DiagramEvent::ConnectionAdded(id));
        Ok(())
    }

    /// Check a connection request against the store's invariants without
    /// applying it.
    pub fn validate_connection(&self, connection: &NewConnection) -> Result<()> {
        let NewConnection {
            source,
            target,
            source_port,
            target_port,
        } = *connection;
        if source == target {
            return Err(DiagramError::SelfLoop(source));
        }
        let source_node = self.node(source).ok_or(DiagramError::UnknownNode(source))?;
        let target_node = self.node(target).ok_or(DiagramError::UnknownNode(target))?;
        if self.are_linked(source, target) {
            return Err(DiagramError::DuplicateEdge {
                a: source,
                b: target,
            });
        }
        for (node, side) in [(source_node, source_port), (target_node, target_port)] {
            let Some(side) = side else { continue };
            if geometry::port_on(node, side).is_none() {
                return Err(DiagramError::NoSuchPort {
                    node: node.id,
                    side,
                });
            }
            if self.port_in_use(node.id, side) {
                return Err(DiagramError::PortInUse {
                    node: node.id,
                    side,
                });
            }
        }
        Ok(())
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> Result<Connection> {
        let edge = self
            .edge_index
            .remove(&id)
            .ok_or(DiagramError::UnknownConnection(id))?;
        let Some(connection) = self.graph.remove_edge(edge) else {
            return Err(DiagramError::UnknownConnection(id));
        };
        self.connection_order.retain(|c| *c != id);
        log::trace!("delete connection {id}");
        self.emit(DiagramEvent::ConnectionRemoved(id));
        Ok(connection)
    }

    // ─── Observers ───────────────────────────────────────────────────────

    /// Register a callback invoked after every successful mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&DiagramEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn emit(&mut self, event: DiagramEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// Nodes in insertion order (later nodes are drawn on top).
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.node_order.iter().filter_map(|id| self.node(*id))
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.edge_index
            .get(&id)
            .and_then(|edge| self.graph.edge_weight(*edge))
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connection_order
            .iter()
            .filter_map(|id| self.connection(*id))
    }

    pub fn connection_count(&self) -> usize {
        self.connection_order.len()
    }

    /// Connections touching `node`, in insertion order.
    pub fn connections_of(&self, node: NodeId) -> impl Iterator<Item = &Connection> + '_ {
        self.connections().filter(move |c| c.touches(node))
    }

    /// Whether any connection joins `a` and `b`, in either direction.
    pub fn are_linked(&self, a: NodeId, b: NodeId) -> bool {
        match (self.node_index.get(&a), self.node_index.get(&b)) {
            (Some(&ia), Some(&ib)) => {
                self.graph.find_edge(ia, ib).is_some() || self.graph.find_edge(ib, ia).is_some()
            }
            _ => false,
        }
    }

    /// Whether the port on `side` of `node` is attached to a connection.
    pub fn port_in_use(&self, node: NodeId, side: Side) -> bool {
        let Some(&idx) = self.node_index.get(&node) else {
            return false;
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .any(|e| e.weight().port_on(node) == Some(side))
    }

    /// Bounding boxes of every node not listed in `except`.
    pub fn obstacles(&self, except: &[NodeId]) -> Vec<Rect> {
        self.nodes()
            .filter(|n| !except.contains(&n.id))
            .map(node_bounds)
            .collect()
    }

    /// Add a node whose id is known to be free.
    fn push_node(&mut self, mut node: Node) {
        node.position = geometry::clamp_position(node.position);
        let id = node.id;
        log::trace!("add node {id} ({}) at {:?}", node.kind, node.position);
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.node_order.push(id);
        self.emit(DiagramEvent::NodeAdded(id));
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(DiagramError::UnknownNode(id))
    }

    fn connection_position(&self, id: ConnectionId) -> usize {
        self.connection_order
            .iter()
            .position(|c| *c == id)
            .unwrap_or(usize::MAX)
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("nodes", &self.nodes().collect::<Vec<_>>())
            .field("connections", &self.connections().collect::<Vec<_>>())
            .field("observers", &self.observers.len())
            .finish()
    }
}
