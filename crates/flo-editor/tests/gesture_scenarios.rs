//! Integration tests: end-to-end gestures (flo-editor).
//!
//! Drives an `Editor` with raw pointer and keyboard events and checks the
//! resulting diagram, across the flo-core / flo-editor boundary.

use flo_core::geometry::port_on;
use flo_core::model::*;
use flo_core::store::{Diagram, DiagramEvent};
use flo_core::{EditorConfig, NodeId};
use flo_editor::{Editor, Gesture, InputEvent};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two steps at (100, 100) and (400, 100).
fn two_steps() -> (Editor, NodeId, NodeId) {
    let mut d = Diagram::new();
    let a = d.place_node(NodeKind::Step, Point::new(100.0, 100.0));
    let b = d.place_node(NodeKind::Step, Point::new(400.0, 100.0));
    (Editor::with_diagram(d, EditorConfig::default()), a, b)
}

fn drag(ed: &mut Editor, from: Point, to: Point) {
    ed.handle(&InputEvent::pointer_down(from.x, from.y));
    ed.handle(&InputEvent::pointer_move(to.x, to.y));
    ed.handle(&InputEvent::pointer_up(to.x, to.y));
}

// ─── Connection drawing ─────────────────────────────────────────────────

#[test]
fn right_port_to_left_port_creates_routed_connection() {
    init_logger();
    let (mut ed, a, b) = two_steps();
    drag(&mut ed, Point::new(244.0, 140.0), Point::new(400.0, 140.0));

    let conns: Vec<&Connection> = ed.diagram().connections().collect();
    assert_eq!(conns.len(), 1);
    let conn = conns[0];
    assert_eq!((conn.source, conn.target), (a, b));
    assert_eq!(conn.source_port, Some(Side::Right));
    assert_eq!(conn.target_port, Some(Side::Left));

    let routed = ed.routed_connections();
    let start = port_on(ed.diagram().node(a).unwrap(), Side::Right).unwrap();
    let end = port_on(ed.diagram().node(b).unwrap(), Side::Left).unwrap();
    assert_eq!(routed[0].points.first(), Some(&start.position));
    assert_eq!(routed[0].points.last(), Some(&end.position));
    assert!(ed.gesture().is_idle());
}

#[test]
fn condition_top_port_drags_as_entry() {
    init_logger();
    let mut d = Diagram::new();
    let cond = d.place_node(NodeKind::Condition, Point::new(300.0, 300.0));
    let other = d.place_node(NodeKind::Condition, Point::new(0.0, 0.0));
    let mut ed = Editor::with_diagram(d, EditorConfig::default());

    ed.handle(&InputEvent::pointer_down(372.0, 300.0));
    match ed.gesture() {
        Gesture::ConnectionDrawing {
            origin, drag_role, ..
        } => {
            assert_eq!(*origin, cond);
            assert_eq!(*drag_role, PortRole::Entry);
        }
        other => panic!("expected drawing, got {other:?}"),
    }

    // Over the other diamond's entry: not offered.
    ed.handle(&InputEvent::pointer_move(72.0, 3.0));
    assert!(matches!(
        ed.gesture(),
        Gesture::ConnectionDrawing { snapped: None, .. }
    ));

    // Over its right exit: offered.
    ed.handle(&InputEvent::pointer_move(110.0, 42.0));
    match ed.gesture() {
        Gesture::ConnectionDrawing {
            snapped: Some(port),
            ..
        } => {
            assert_eq!((port.node, port.side, port.role), (other, Side::Right, PortRole::Exit));
        }
        g => panic!("expected a snapped port, got {g:?}"),
    }

    ed.handle(&InputEvent::pointer_up(110.0, 42.0));
    let conn = ed.diagram().connections().next().unwrap().clone();
    assert_eq!((conn.source, conn.target), (other, cond));
    assert_eq!((conn.source_port, conn.target_port), (Some(Side::Right), Some(Side::Top)));
}

#[test]
fn drawing_the_same_pair_twice_keeps_one_connection() {
    init_logger();
    let (mut ed, _, _) = two_steps();
    drag(&mut ed, Point::new(244.0, 140.0), Point::new(400.0, 140.0));
    // Reverse direction, different ports: still the same pair.
    drag(&mut ed, Point::new(472.0, 180.0), Point::new(172.0, 180.0));
    assert_eq!(ed.diagram().connection_count(), 1);
    assert!(ed.gesture().is_idle());
}

#[test]
fn release_over_empty_space_discards() {
    let (mut ed, _, _) = two_steps();
    drag(&mut ed, Point::new(244.0, 140.0), Point::new(300.0, 500.0));
    assert_eq!(ed.diagram().connection_count(), 0);
    assert!(ed.gesture().is_idle());
}

#[test]
fn escape_then_release_creates_nothing() {
    let (mut ed, _, _) = two_steps();
    ed.handle(&InputEvent::pointer_down(244.0, 140.0));
    ed.handle(&InputEvent::pointer_move(400.0, 140.0));
    assert!(ed.preview_route().is_some());
    ed.handle(&InputEvent::key("Escape"));
    assert!(ed.preview_route().is_none());
    ed.handle(&InputEvent::pointer_up(400.0, 140.0));
    assert_eq!(ed.diagram().connection_count(), 0);
}

// ─── Deletion ───────────────────────────────────────────────────────────

#[test]
fn deleting_a_node_removes_its_connections_in_one_event() {
    init_logger();
    let mut d = Diagram::new();
    let a = d.place_node(NodeKind::Step, Point::new(100.0, 100.0));
    let b = d.place_node(NodeKind::Step, Point::new(400.0, 100.0));
    let c = d.place_node(NodeKind::Step, Point::new(100.0, 400.0));
    d.add_connection(NewConnection::between(a, b)).unwrap();
    d.add_connection(NewConnection::between(c, a)).unwrap();
    let mut ed = Editor::with_diagram(d, EditorConfig::default());

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    ed.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    // Select a, then press Delete.
    ed.handle(&InputEvent::pointer_down(150.0, 120.0));
    ed.handle(&InputEvent::pointer_up(150.0, 120.0));
    assert!(ed.handle(&InputEvent::key("Delete")));

    assert_eq!(ed.diagram().node_count(), 2);
    assert_eq!(ed.diagram().connection_count(), 0);
    let events = events.borrow();
    assert_eq!(events.len(), 1);
    match &events[0] {
        DiagramEvent::NodeRemoved { id, connections } => {
            assert_eq!(*id, a);
            assert_eq!(connections.len(), 2);
        }
        e => panic!("unexpected event {e:?}"),
    }
}

#[test]
fn double_click_deletes_node() {
    let (mut ed, a, _) = two_steps();
    ed.handle(&InputEvent::DoubleClick { x: 150.0, y: 120.0 });
    assert!(!ed.diagram().contains_node(a));
}

#[test]
fn context_menu_on_connection_deletes_it() {
    let (mut ed, _, _) = two_steps();
    drag(&mut ed, Point::new(244.0, 140.0), Point::new(400.0, 140.0));
    assert_eq!(ed.diagram().connection_count(), 1);
    ed.handle(&InputEvent::ContextMenu { x: 320.0, y: 143.0 });
    assert_eq!(ed.diagram().connection_count(), 0);
    assert_eq!(ed.menu_anchor(), None);
}

#[test]
fn delete_during_drag_leaves_gesture_running() {
    let (mut ed, a, _) = two_steps();
    ed.handle(&InputEvent::pointer_down(150.0, 120.0));
    ed.handle(&InputEvent::key("Delete"));
    assert!(!ed.diagram().contains_node(a));
    assert!(matches!(ed.gesture(), Gesture::NodeDragging { .. }));

    // Further moves target a missing node and change nothing.
    ed.handle(&InputEvent::pointer_move(300.0, 300.0));
    ed.handle(&InputEvent::pointer_up(300.0, 300.0));
    assert!(ed.gesture().is_idle());
    assert_eq!(ed.diagram().node_count(), 1);
}

// ─── Node dragging ──────────────────────────────────────────────────────

#[test]
fn dragging_keeps_grab_offset_and_clamps() {
    let (mut ed, a, _) = two_steps();
    ed.handle(&InputEvent::pointer_down(130.0, 120.0));
    ed.handle(&InputEvent::pointer_move(230.0, 220.0));
    assert_eq!(ed.diagram().node(a).unwrap().position, Point::new(200.0, 200.0));

    for (x, y) in [(-400.0, 50.0), (10.0, -300.0), (-1.0, -1.0)] {
        ed.handle(&InputEvent::pointer_move(x, y));
        let pos = ed.diagram().node(a).unwrap().position;
        assert!(pos.x >= 0.0 && pos.y >= 0.0, "escaped canvas: {pos:?}");
    }
    ed.handle(&InputEvent::pointer_up(0.0, 0.0));
    assert!(ed.gesture().is_idle());
}

#[test]
fn moving_a_node_reroutes_its_connections() {
    let (mut ed, a, b) = two_steps();
    drag(&mut ed, Point::new(244.0, 140.0), Point::new(400.0, 140.0));
    // Grab b by its body and move it down.
    drag(&mut ed, Point::new(450.0, 120.0), Point::new(450.0, 420.0));
    let b_left = port_on(ed.diagram().node(b).unwrap(), Side::Left).unwrap();
    assert_eq!(b_left.position, Point::new(400.0, 440.0));
    let routed = ed.routed_connections();
    assert_eq!(routed[0].points.last(), Some(&b_left.position));
    assert_eq!(routed[0].source, a);
}
