//! Core data model for flowchart diagrams.
//!
//! A diagram is a set of typed [`Node`]s placed on a canvas plus directed
//! [`Connection`]s between them. Ports are not stored: they are derived from
//! a node's kind and position by the geometry module whenever needed.

use crate::id::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Geometry primitives ─────────────────────────────────────────────────

/// A point in canvas coordinates (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Component-wise offset.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `origin` to `self`.
    pub fn minus(self, origin: Point) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Grow the rectangle by `pad` on every side.
    pub fn inflate(&self, pad: f32) -> Self {
        Self::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// The three node kinds of a flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A process step, drawn as a rectangle.
    Step,
    /// A decision point, drawn as a diamond inside the same footprint.
    Condition,
    /// An alert or message, drawn as a rectangle.
    Notification,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Step, NodeKind::Condition, NodeKind::Notification];

    /// Label shown by renderers while the node's own label is empty.
    pub fn default_label(self) -> &'static str {
        match self {
            NodeKind::Step => "Process Step",
            NodeKind::Condition => "Decision Point",
            NodeKind::Notification => "Notification",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Step => "step",
            NodeKind::Condition => "condition",
            NodeKind::Notification => "notification",
        }
    }

    /// Parse the lowercase kind name used by host UIs.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "step" => Some(NodeKind::Step),
            "condition" => Some(NodeKind::Condition),
            "notification" => Some(NodeKind::Notification),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed flowchart node. `position` is the top-left of its footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: String,
    pub position: Point,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, position: Point) -> Self {
        Self {
            id,
            kind,
            label: String::new(),
            position,
        }
    }

    /// The label a renderer should display.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            self.kind.default_label()
        } else {
            &self.label
        }
    }
}

// ─── Ports ───────────────────────────────────────────────────────────────

/// Side of a node's footprint that a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a port may be used for.
///
/// `Dynamic` ports act as entry or exit; the role a connection actually uses
/// is decided when the connection is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortRole {
    Entry,
    Exit,
    Dynamic,
}

impl PortRole {
    /// Can a drag that started with role `self` end on a port with role `target`?
    pub fn accepts(self, target: PortRole) -> bool {
        match (self, target) {
            (_, PortRole::Dynamic) | (PortRole::Dynamic, _) => true,
            (PortRole::Exit, PortRole::Entry) | (PortRole::Entry, PortRole::Exit) => true,
            _ => false,
        }
    }
}

/// An attachment point on a node, derived from the node's kind and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub node: NodeId,
    pub side: Side,
    pub role: PortRole,
    pub position: Point,
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A directed connection between two nodes.
///
/// Direction is kept for rendering (arrow heads); duplicate detection treats
/// `(a, b)` and `(b, a)` as the same pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    pub source_port: Option<Side>,
    pub target_port: Option<Side>,
}

impl Connection {
    /// Does this connection touch `node` at either end?
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// The port side this connection occupies on `node`, if any.
    pub fn port_on(&self, node: NodeId) -> Option<Side> {
        if self.source == node {
            self.source_port
        } else if self.target == node {
            self.target_port
        } else {
            None
        }
    }
}

/// A connection request, before the store assigns it an id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewConnection {
    pub source: NodeId,
    pub target: NodeId,
    pub source_port: Option<Side>,
    pub target_port: Option<Side>,
}

impl NewConnection {
    /// A connection without port assignments.
    pub fn between(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            source_port: None,
            target_port: None,
        }
    }

    pub fn with_ports(mut self, source_port: Side, target_port: Side) -> Self {
        self.source_port = Some(source_port);
        self.target_port = Some(target_port);
        self
    }
}
