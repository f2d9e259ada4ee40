//! The interaction state machine.
//!
//! The [`Controller`] translates input events into [`DiagramMutation`]
//! commands for the store, the same way canvas tools do. It reads the
//! diagram but never mutates it; the caller applies the returned commands.
//!
//! ```text
//!             press on port                    release / Escape
//!   Idle ─────────────────────▶ ConnectionDrawing ───────────────▶ Idle
//!    │ ▲  press on node body
//!    │ └───────────────────────── NodeDragging ◀── move: MoveNode
//!    │     release
//!    └── BeginLabelEdit ──▶ LabelEditing ── submit / Escape / press ──▶ Idle
//! ```

use crate::hit::{HitTarget, hit_test};
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use flo_core::config::EditorConfig;
use flo_core::id::{ConnectionId, NodeId};
use flo_core::model::*;
use flo_core::store::{Diagram, DiagramMutation};
use serde::Serialize;

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Gesture {
    Idle,
    /// A node follows the pointer, keeping the offset at which it was grabbed.
    NodeDragging { node: NodeId, grab_offset: Point },
    /// A connection is being drawn out of `origin_port` on `origin`.
    ConnectionDrawing {
        origin: NodeId,
        origin_port: Side,
        origin_point: Point,
        drag_role: PortRole,
        /// Last pointer position seen while drawing.
        cursor: Point,
        /// The port the preview currently snaps to, if any.
        snapped: Option<Port>,
    },
    LabelEditing { node: NodeId },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::NodeDragging { .. } => "nodeDragging",
            Gesture::ConnectionDrawing { .. } => "connectionDrawing",
            Gesture::LabelEditing { .. } => "labelEditing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Endpoints of the live connection preview: the origin port and either
    /// the snapped port or the raw cursor.
    pub fn preview_segment(&self) -> Option<(Point, Point)> {
        match self {
            Gesture::ConnectionDrawing {
                origin_point,
                cursor,
                snapped,
                ..
            } => Some((*origin_point, snapped.as_ref().map_or(*cursor, |p| p.position))),
            _ => None,
        }
    }
}

/// Gesture state, node selection, and the pending context-menu anchor.
#[derive(Debug, Clone)]
pub struct Controller {
    gesture: Gesture,
    /// Currently selected node.
    pub selected: Option<NodeId>,
    /// Where the canvas context menu was opened, until the next press.
    pub menu_anchor: Option<Point>,
    pub config: EditorConfig,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Controller {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            gesture: Gesture::Idle,
            selected: None,
            menu_anchor: None,
            config,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Handle an input event, returning zero or more mutations.
    pub fn handle(&mut self, event: &InputEvent, diagram: &Diagram) -> Vec<DiagramMutation> {
        match (event, event.position()) {
            (InputEvent::PointerDown { .. }, Some(p)) => self.press(p, diagram),
            (InputEvent::PointerMove { .. }, Some(p)) => self.drag(p, diagram),
            (InputEvent::PointerUp { .. }, Some(p)) => self.release(p, diagram),
            (InputEvent::DoubleClick { .. }, Some(p)) => self.double_click(p, diagram),
            (InputEvent::ContextMenu { .. }, Some(p)) => self.context_menu(p, diagram),
            (InputEvent::Key { key, modifiers }, _) => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.shortcut(action),
                None => vec![],
            },
            (InputEvent::BeginLabelEdit { node }, _) => {
                if self.gesture.is_idle() && diagram.contains_node(*node) {
                    self.selected = Some(*node);
                    self.transition(Gesture::LabelEditing { node: *node });
                }
                vec![]
            }
            _ => vec![],
        }
    }

    /// Commit a label. Ends the edit if it was for this node.
    pub fn submit_label(&mut self, node: NodeId, text: &str) -> Vec<DiagramMutation> {
        if self.gesture == (Gesture::LabelEditing { node }) {
            self.transition(Gesture::Idle);
        }
        vec![DiagramMutation::SetLabel {
            id: node,
            label: text.to_string(),
        }]
    }

    /// Drop references to nodes the store no longer has.
    pub fn reconcile(&mut self, diagram: &Diagram) {
        if self.selected.is_some_and(|id| !diagram.contains_node(id)) {
            self.selected = None;
        }
        if let Gesture::LabelEditing { node } = self.gesture
            && !diagram.contains_node(node)
        {
            self.transition(Gesture::Idle);
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    fn press(&mut self, p: Point, diagram: &Diagram) -> Vec<DiagramMutation> {
        match self.gesture {
            Gesture::NodeDragging { .. } | Gesture::ConnectionDrawing { .. } => return vec![],
            // Clicking away ends the edit without committing.
            Gesture::LabelEditing { .. } => self.transition(Gesture::Idle),
            Gesture::Idle => {}
        }
        self.menu_anchor = None;

        match hit_test(diagram, p, &self.config) {
            HitTarget::Port(port) => {
                self.selected = Some(port.node);
                let Some(kind) = diagram.node(port.node).map(|n| n.kind) else {
                    return vec![];
                };
                let Some(drag_role) = kind.drag_role(port.side) else {
                    return vec![];
                };
                self.transition(Gesture::ConnectionDrawing {
                    origin: port.node,
                    origin_port: port.side,
                    origin_point: port.position,
                    drag_role,
                    cursor: p,
                    snapped: None,
                });
            }
            HitTarget::Node(id) => {
                self.selected = Some(id);
                if let Some(node) = diagram.node(id) {
                    self.transition(Gesture::NodeDragging {
                        node: id,
                        grab_offset: p.minus(node.position),
                    });
                }
            }
            HitTarget::Connection(_) | HitTarget::Canvas => {
                self.selected = None;
            }
        }
        vec![]
    }

    fn drag(&mut self, p: Point, diagram: &Diagram) -> Vec<DiagramMutation> {
        match &mut self.gesture {
            Gesture::NodeDragging { node, grab_offset } => vec![DiagramMutation::MoveNode {
                id: *node,
                to: p.minus(*grab_offset),
            }],
            Gesture::ConnectionDrawing {
                origin,
                drag_role,
                cursor,
                snapped,
                ..
            } => {
                *cursor = p;
                *snapped =
                    diagram.find_nearest_port(p, *origin, *drag_role, self.config.snap_radius);
                vec![]
            }
            Gesture::Idle | Gesture::LabelEditing { .. } => vec![],
        }
    }

    fn release(&mut self, p: Point, diagram: &Diagram) -> Vec<DiagramMutation> {
        match self.gesture {
            Gesture::NodeDragging { .. } => {
                self.transition(Gesture::Idle);
                vec![]
            }
            Gesture::ConnectionDrawing {
                origin,
                origin_port,
                drag_role,
                ..
            } => {
                self.transition(Gesture::Idle);
                // Resolve from the release point itself, not the last preview.
                let Some(port) =
                    diagram.find_nearest_port(p, origin, drag_role, self.config.snap_radius)
                else {
                    log::debug!("connection from {origin} dropped on empty space");
                    return vec![];
                };
                let connection = if drag_role == PortRole::Entry {
                    NewConnection::between(port.node, origin).with_ports(port.side, origin_port)
                } else {
                    NewConnection::between(origin, port.node).with_ports(origin_port, port.side)
                };
                vec![DiagramMutation::AddConnection {
                    id: ConnectionId::generate(),
                    connection,
                }]
            }
            Gesture::Idle | Gesture::LabelEditing { .. } => vec![],
        }
    }

    fn double_click(&mut self, p: Point, diagram: &Diagram) -> Vec<DiagramMutation> {
        if !self.gesture.is_idle() {
            return vec![];
        }
        let hit = hit_test(diagram, p, &self.config);
        if let Some(id) = hit.node() {
            return vec![DiagramMutation::RemoveNode { id }];
        }
        match hit {
            HitTarget::Connection(id) => vec![DiagramMutation::RemoveConnection { id }],
            _ => vec![],
        }
    }

    fn context_menu(&mut self, p: Point, diagram: &Diagram) -> Vec<DiagramMutation> {
        if !self.gesture.is_idle() {
            return vec![];
        }
        match hit_test(diagram, p, &self.config) {
            HitTarget::Connection(id) => vec![DiagramMutation::RemoveConnection { id }],
            HitTarget::Canvas => {
                self.menu_anchor = Some(p);
                vec![]
            }
            HitTarget::Port(_) | HitTarget::Node(_) => vec![],
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    fn shortcut(&mut self, action: ShortcutAction) -> Vec<DiagramMutation> {
        match action {
            // Applies in every state; the gesture is left as is.
            ShortcutAction::DeleteSelection => self
                .selected
                .map(|id| vec![DiagramMutation::RemoveNode { id }])
                .unwrap_or_default(),
            ShortcutAction::Cancel => {
                self.menu_anchor = None;
                if matches!(
                    self.gesture,
                    Gesture::ConnectionDrawing { .. } | Gesture::LabelEditing { .. }
                ) {
                    self.transition(Gesture::Idle);
                }
                vec![]
            }
        }
    }

    fn transition(&mut self, next: Gesture) {
        if self.gesture.name() != next.name() {
            log::debug!("gesture {} -> {}", self.gesture.name(), next.name());
        }
        self.gesture = next;
    }
}
