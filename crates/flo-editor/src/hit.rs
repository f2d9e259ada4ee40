//! Hit testing: point → port / node / connection lookup.
//!
//! Ports win over node bodies, node bodies over connections, and anything
//! else is empty canvas. Nodes are walked front-to-back (last added is
//! topmost).

use flo_core::config::EditorConfig;
use flo_core::geometry::{node_contains, ports_for};
use flo_core::id::{ConnectionId, NodeId};
use flo_core::model::*;
use flo_core::route::{distance_to_polyline, route_connection};
use flo_core::store::Diagram;

/// What a canvas point lands on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    Port(Port),
    Node(NodeId),
    Connection(ConnectionId),
    Canvas,
}

impl HitTarget {
    /// The node under the point, whether hit on its body or a port.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            HitTarget::Port(port) => Some(port.node),
            HitTarget::Node(id) => Some(*id),
            HitTarget::Connection(_) | HitTarget::Canvas => None,
        }
    }
}

/// Resolve `p` to the topmost target under it.
pub fn hit_test(diagram: &Diagram, p: Point, config: &EditorConfig) -> HitTarget {
    if let Some(port) = hit_port(diagram, p, config.port_hit_radius) {
        return HitTarget::Port(port);
    }
    if let Some(node) = diagram.nodes().rev().find(|n| node_contains(n, p)) {
        return HitTarget::Node(node.id);
    }
    if let Some(id) = hit_connection(diagram, p, config) {
        return HitTarget::Connection(id);
    }
    HitTarget::Canvas
}

/// The port within `radius` of `p`, walking nodes front-to-back.
///
/// A node body covering `p` hides the ports of every node beneath it.
pub fn hit_port(diagram: &Diagram, p: Point, radius: f32) -> Option<Port> {
    for node in diagram.nodes().rev() {
        let port = ports_for(node)
            .into_iter()
            .find(|port| p.distance(port.position) <= radius);
        if port.is_some() || node_contains(node, p) {
            return port;
        }
    }
    None
}

/// The connection whose routed path passes closest to `p`, within tolerance.
pub fn hit_connection(diagram: &Diagram, p: Point, config: &EditorConfig) -> Option<ConnectionId> {
    let mut best: Option<(ConnectionId, f32)> = None;
    for conn in diagram.connections() {
        let Some(route) = route_connection(diagram, conn.id, &config.route) else {
            continue;
        };
        let d = distance_to_polyline(p, &route);
        if d <= config.connection_hit_tolerance && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((conn.id, d));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> EditorConfig {
        EditorConfig::default()
    }

    #[test]
    fn port_beats_node_body() {
        let mut d = Diagram::new();
        let a = d.place_node(NodeKind::Step, Point::new(100.0, 100.0));
        match hit_test(&d, Point::new(243.0, 141.0), &config()) {
            HitTarget::Port(port) => {
                assert_eq!(port.node, a);
                assert_eq!(port.side, Side::Right);
            }
            other => panic!("expected port, got {other:?}"),
        }
        assert_eq!(hit_test(&d, Point::new(170.0, 130.0), &config()), HitTarget::Node(a));
    }

    #[test]
    fn topmost_node_wins_overlap() {
        let mut d = Diagram::new();
        let _below = d.place_node(NodeKind::Step, Point::new(0.0, 0.0));
        let above = d.place_node(NodeKind::Step, Point::new(50.0, 20.0));
        assert_eq!(hit_test(&d, Point::new(100.0, 50.0), &config()), HitTarget::Node(above));
    }

    #[test]
    fn covered_port_is_hidden_by_upper_body() {
        let mut d = Diagram::new();
        let _lower = d.place_node(NodeKind::Step, Point::new(0.0, 0.0));
        let upper = d.place_node(NodeKind::Step, Point::new(100.0, 0.0));
        // The lower node's right port sits inside the upper node's body.
        assert_eq!(hit_port(&d, Point::new(144.0, 40.0), 8.0), None);
        assert_eq!(hit_test(&d, Point::new(144.0, 40.0), &config()), HitTarget::Node(upper));
    }

    #[test]
    fn diamond_corner_is_canvas() {
        let mut d = Diagram::new();
        d.place_node(NodeKind::Condition, Point::new(0.0, 0.0));
        assert_eq!(hit_test(&d, Point::new(130.0, 75.0), &config()), HitTarget::Canvas);
    }

    #[test]
    fn connection_hit_within_tolerance() {
        let mut d = Diagram::new();
        let a = d.place_node(NodeKind::Step, Point::new(0.0, 0.0));
        let b = d.place_node(NodeKind::Step, Point::new(400.0, 0.0));
        let id = d
            .add_connection(NewConnection::between(a, b).with_ports(Side::Right, Side::Left))
            .unwrap();
        // Straight segment from (144, 40) to (400, 40).
        assert_eq!(hit_test(&d, Point::new(300.0, 45.0), &config()), HitTarget::Connection(id));
        assert_eq!(hit_test(&d, Point::new(300.0, 60.0), &config()), HitTarget::Canvas);
    }

    #[test]
    fn hit_target_node_accessor() {
        let id = NodeId::intern("hit_acc");
        assert_eq!(HitTarget::Node(id).node(), Some(id));
        assert_eq!(HitTarget::Canvas.node(), None);
    }
}
