//! Nearest-port resolution for connection drops.
//!
//! While a connection is being drawn, the pointer snaps to the closest port
//! that could legally terminate it. A candidate port must:
//!
//! - belong to a node other than the origin,
//! - have a role compatible with the drag role,
//! - sit on a node not already connected to the origin (either direction),
//! - not already be attached to another connection,
//! - lie strictly within the snap radius.
//!
//! Exact distance ties resolve to the first candidate in node-then-port
//! enumeration order. That order is deterministic but carries no meaning.

use crate::geometry::ports_for;
use crate::id::NodeId;
use crate::model::*;
use crate::store::Diagram;
use std::collections::HashSet;

/// Find the best drop target for a connection dragged from `origin`.
pub fn find_nearest_port<'a>(
    cursor: Point,
    nodes: impl IntoIterator<Item = &'a Node>,
    connections: impl IntoIterator<Item = &'a Connection>,
    origin: NodeId,
    drag_role: PortRole,
    snap_radius: f32,
) -> Option<Port> {
    let mut linked: HashSet<NodeId> = HashSet::new();
    let mut used: HashSet<(NodeId, Side)> = HashSet::new();
    for conn in connections {
        if conn.source == origin {
            linked.insert(conn.target);
        } else if conn.target == origin {
            linked.insert(conn.source);
        }
        if let Some(side) = conn.source_port {
            used.insert((conn.source, side));
        }
        if let Some(side) = conn.target_port {
            used.insert((conn.target, side));
        }
    }

    let mut best: Option<Port> = None;
    let mut best_distance = snap_radius;
    for node in nodes {
        if node.id == origin || linked.contains(&node.id) {
            continue;
        }
        for port in ports_for(node) {
            if !drag_role.accepts(port.role) || used.contains(&(port.node, port.side)) {
                continue;
            }
            let distance = cursor.distance(port.position);
            if distance < best_distance {
                best_distance = distance;
                best = Some(port);
            }
        }
    }
    best
}

impl Diagram {
    /// [`find_nearest_port`] over this diagram's nodes and connections.
    pub fn find_nearest_port(
        &self,
        cursor: Point,
        origin: NodeId,
        drag_role: PortRole,
        snap_radius: f32,
    ) -> Option<Port> {
        find_nearest_port(
            cursor,
            self.nodes(),
            self.connections(),
            origin,
            drag_role,
            snap_radius,
        )
    }
}
