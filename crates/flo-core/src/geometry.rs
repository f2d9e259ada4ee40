//! Node footprints and port placement.
//!
//! Every node occupies a fixed 144×80 footprint anchored at its position.
//! Step and notification nodes are rectangles with one dynamic port per
//! side. Condition nodes are diamonds inscribed in the same box, with an
//! entry on top and exits at the left and right quarter points.
//!
//! Port placement comes from a kind-indexed table of offsets; nothing here
//! caches positions, so callers always see ports that match the node's
//! current position.

use crate::model::*;
use smallvec::SmallVec;

/// Footprint width shared by every node kind.
pub const NODE_WIDTH: f32 = 144.0;
/// Footprint height shared by every node kind.
pub const NODE_HEIGHT: f32 = 80.0;

/// A port template: side, role, and offset from the node's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortSpec {
    pub side: Side,
    pub role: PortRole,
    pub dx: f32,
    pub dy: f32,
}

const fn spec(side: Side, role: PortRole, dx: f32, dy: f32) -> PortSpec {
    PortSpec { side, role, dx, dy }
}

/// Rectangle ports, in enumeration order.
const BOX_PORTS: [PortSpec; 4] = [
    spec(Side::Left, PortRole::Dynamic, 0.0, NODE_HEIGHT / 2.0),
    spec(Side::Top, PortRole::Dynamic, NODE_WIDTH / 2.0, 0.0),
    spec(Side::Bottom, PortRole::Dynamic, NODE_WIDTH / 2.0, NODE_HEIGHT),
    spec(Side::Right, PortRole::Dynamic, NODE_WIDTH, NODE_HEIGHT / 2.0),
];

/// Diamond ports, in enumeration order. Exits sit on the quarter points.
const DIAMOND_PORTS: [PortSpec; 3] = [
    spec(Side::Top, PortRole::Entry, NODE_WIDTH / 2.0, 0.0),
    spec(Side::Left, PortRole::Exit, NODE_WIDTH / 4.0, NODE_HEIGHT / 2.0),
    spec(Side::Right, PortRole::Exit, NODE_WIDTH * 3.0 / 4.0, NODE_HEIGHT / 2.0),
];

/// Outline drawn for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rectangle,
    Diamond,
}

impl NodeKind {
    /// Port table for this kind.
    pub fn port_specs(self) -> &'static [PortSpec] {
        match self {
            NodeKind::Step | NodeKind::Notification => &BOX_PORTS,
            NodeKind::Condition => &DIAMOND_PORTS,
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            NodeKind::Step | NodeKind::Notification => Shape::Rectangle,
            NodeKind::Condition => Shape::Diamond,
        }
    }

    /// Role of a connection drag that starts on `side` of a node of this kind.
    ///
    /// Diamonds drag with the port's own role. Rectangle ports are dynamic,
    /// and a drag from them always starts as an exit.
    pub fn drag_role(self, side: Side) -> Option<PortRole> {
        let spec = self.port_specs().iter().find(|s| s.side == side)?;
        Some(match spec.role {
            PortRole::Dynamic => PortRole::Exit,
            role => role,
        })
    }
}

/// All ports of `node`, in table order.
pub fn ports_for(node: &Node) -> SmallVec<[Port; 4]> {
    node.kind
        .port_specs()
        .iter()
        .map(|s| materialize(node, s))
        .collect()
}

/// The port on `side` of `node`, if its kind has one there.
pub fn port_on(node: &Node, side: Side) -> Option<Port> {
    node.kind
        .port_specs()
        .iter()
        .find(|s| s.side == side)
        .map(|s| materialize(node, s))
}

fn materialize(node: &Node, spec: &PortSpec) -> Port {
    Port {
        node: node.id,
        side: spec.side,
        role: spec.role,
        position: node.position.offset(spec.dx, spec.dy),
    }
}

/// Bounding box of a node's footprint.
pub fn node_bounds(node: &Node) -> Rect {
    Rect::new(node.position.x, node.position.y, NODE_WIDTH, NODE_HEIGHT)
}

/// Whether `p` falls on the node's visible shape.
pub fn node_contains(node: &Node, p: Point) -> bool {
    let bounds = node_bounds(node);
    match node.kind.shape() {
        Shape::Rectangle => bounds.contains(p),
        Shape::Diamond => {
            let c = bounds.center();
            let nx = (p.x - c.x).abs() / (NODE_WIDTH / 2.0);
            let ny = (p.y - c.y).abs() / (NODE_HEIGHT / 2.0);
            nx + ny <= 1.0
        }
    }
}

/// Pin a position to the non-negative quadrant.
pub fn clamp_position(p: Point) -> Point {
    Point::new(p.x.max(0.0), p.y.max(0.0))
}

/// Top-left position for a node created at `click`, centering the footprint
/// on the click point.
pub fn origin_for_click(click: Point) -> Point {
    clamp_position(click.offset(-NODE_WIDTH / 2.0, -NODE_HEIGHT / 2.0))
}
