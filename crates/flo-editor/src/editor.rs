//! The editor: a diagram plus the controller driving it.
//!
//! Input events and UI intents come in; the controller turns them into
//! store commands; the editor applies them and reports whether anything a
//! renderer shows has changed. Rejected commands leave the diagram
//! untouched and are logged at `debug`.

use crate::gesture::{Controller, Gesture};
use crate::input::InputEvent;
use flo_core::config::EditorConfig;
use flo_core::id::{ConnectionId, NodeId};
use flo_core::model::*;
use flo_core::route::{route_connection, route_orthogonal};
use flo_core::store::{Diagram, DiagramEvent, DiagramMutation, SubscriptionId};

/// A routed connection ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedConnection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
    pub points: Vec<Point>,
}

pub struct Editor {
    diagram: Diagram,
    controller: Controller,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_diagram(Diagram::new(), config)
    }

    pub fn with_diagram(diagram: Diagram, config: EditorConfig) -> Self {
        Self {
            diagram,
            controller: Controller::new(config),
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle an input event. Returns `true` if the diagram, selection, or
    /// gesture changed (i.e. the host should repaint).
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let before = self.view_state();
        let mutations = self.controller.handle(event, &self.diagram);
        let changed = self.apply(mutations);
        changed || self.view_state() != before
    }

    // ─── Intents ─────────────────────────────────────────────────────────

    /// Create a node centered on `at`. Closes any pending context menu.
    pub fn add_node(&mut self, kind: NodeKind, at: Point) -> NodeId {
        self.controller.menu_anchor = None;
        self.diagram.add_node(kind, at)
    }

    pub fn request_delete_node(&mut self, id: NodeId) -> bool {
        self.apply(vec![DiagramMutation::RemoveNode { id }])
    }

    pub fn request_delete_connection(&mut self, id: ConnectionId) -> bool {
        self.apply(vec![DiagramMutation::RemoveConnection { id }])
    }

    /// Start editing a node's label. Only possible while no gesture is active.
    pub fn begin_label_edit(&mut self, node: NodeId) -> bool {
        self.handle(&InputEvent::BeginLabelEdit { node });
        self.controller.gesture() == &Gesture::LabelEditing { node }
    }

    /// Commit a label. Ends the edit if one is open for this node.
    pub fn submit_label(&mut self, node: NodeId, text: &str) -> bool {
        let mutations = self.controller.submit_label(node, text);
        self.apply(mutations)
    }

    /// Register a callback invoked after every successful diagram mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&DiagramEvent) + 'static) -> SubscriptionId {
        self.diagram.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.diagram.unsubscribe(id)
    }

    // ─── Views ───────────────────────────────────────────────────────────

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn gesture(&self) -> &Gesture {
        self.controller.gesture()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.controller.selected
    }

    pub fn menu_anchor(&self) -> Option<Point> {
        self.controller.menu_anchor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.controller.config
    }

    /// Every connection with its orthogonal route, in insertion order.
    pub fn routed_connections(&self) -> Vec<RoutedConnection> {
        self.diagram
            .connections()
            .filter_map(|c| {
                let points = route_connection(&self.diagram, c.id, &self.controller.config.route)?;
                Some(RoutedConnection {
                    id: c.id,
                    source: c.source,
                    target: c.target,
                    points,
                })
            })
            .collect()
    }

    /// Route for the live connection preview, avoiding every node except
    /// the origin and the snapped target.
    pub fn preview_route(&self) -> Option<Vec<Point>> {
        let (start, end) = self.controller.gesture().preview_segment()?;
        let Gesture::ConnectionDrawing {
            origin, snapped, ..
        } = self.controller.gesture()
        else {
            return None;
        };
        let mut except = vec![*origin];
        if let Some(port) = snapped {
            except.push(port.node);
        }
        let obstacles = self.diagram.obstacles(&except);
        Some(route_orthogonal(
            start,
            end,
            &obstacles,
            &self.controller.config.route,
        ))
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn apply(&mut self, mutations: Vec<DiagramMutation>) -> bool {
        let mut changed = false;
        for mutation in mutations {
            match self.diagram.apply(mutation) {
                Ok(()) => changed = true,
                Err(err) => log::debug!("command rejected: {err}"),
            }
        }
        self.controller.reconcile(&self.diagram);
        changed
    }

    fn view_state(&self) -> (Gesture, Option<NodeId>, Option<Point>) {
        (
            self.controller.gesture().clone(),
            self.controller.selected,
            self.controller.menu_anchor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn handle_reports_view_changes() {
        let mut ed = Editor::default();
        let a = ed.add_node(NodeKind::Step, Point::new(172.0, 140.0));
        assert!(ed.handle(&InputEvent::pointer_down(150.0, 120.0)));
        assert_eq!(ed.selected(), Some(a));
        // Moving an idle pointer over empty canvas changes nothing.
        ed.handle(&InputEvent::pointer_up(150.0, 120.0));
        assert!(!ed.handle(&InputEvent::pointer_move(700.0, 700.0)));
    }

    #[test]
    fn rejected_command_reports_no_change() {
        let mut ed = Editor::default();
        let ghost = NodeId::intern("editor_ghost");
        assert!(!ed.request_delete_node(ghost));
        assert!(!ed.request_delete_connection(ConnectionId::intern("editor_ghost_conn")));
    }

    #[test]
    fn add_node_closes_menu() {
        let mut ed = Editor::default();
        ed.handle(&InputEvent::ContextMenu { x: 300.0, y: 300.0 });
        assert_eq!(ed.menu_anchor(), Some(Point::new(300.0, 300.0)));
        let id = ed.add_node(NodeKind::Notification, Point::new(300.0, 300.0));
        assert_eq!(ed.menu_anchor(), None);
        assert_eq!(ed.diagram().node(id).unwrap().position, Point::new(228.0, 260.0));
    }

    #[test]
    fn deleting_selected_node_clears_selection() {
        let mut ed = Editor::default();
        let a = ed.add_node(NodeKind::Step, Point::new(172.0, 140.0));
        ed.handle(&InputEvent::pointer_down(150.0, 120.0));
        ed.handle(&InputEvent::pointer_up(150.0, 120.0));
        assert!(ed.handle(&InputEvent::key("Delete")));
        assert_eq!(ed.selected(), None);
        assert!(!ed.diagram().contains_node(a));
    }

    #[test]
    fn label_edit_commit() {
        let mut ed = Editor::default();
        let a = ed.add_node(NodeKind::Condition, Point::new(172.0, 140.0));
        assert!(ed.begin_label_edit(a));
        assert!(ed.submit_label(a, "Approved?"));
        assert!(ed.gesture().is_idle());
        assert_eq!(ed.diagram().node(a).unwrap().display_label(), "Approved?");
    }

    #[test]
    fn preview_route_ends_at_snapped_port() {
        let mut ed = Editor::default();
        ed.add_node(NodeKind::Step, Point::new(172.0, 140.0)); // top-left (100, 100)
        ed.add_node(NodeKind::Step, Point::new(472.0, 140.0)); // top-left (400, 100)
        assert!(ed.preview_route().is_none());

        ed.handle(&InputEvent::pointer_down(244.0, 140.0));
        ed.handle(&InputEvent::pointer_move(396.0, 142.0));
        let route = ed.preview_route().unwrap();
        assert_eq!(route.first(), Some(&Point::new(244.0, 140.0)));
        assert_eq!(route.last(), Some(&Point::new(400.0, 140.0)));
    }
}
