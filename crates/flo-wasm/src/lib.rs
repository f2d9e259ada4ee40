//! WASM bridge for Flowboard: exposes the flowchart editor to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host owns drawing and
//! DOM events; it forwards canvas-space pointer and keyboard events here and
//! reads back JSON views of the diagram after every change.

use flo_core::geometry::{NODE_HEIGHT, NODE_WIDTH, ports_for};
use flo_core::id::{ConnectionId, NodeId};
use flo_core::model::{NodeKind, Point};
use flo_core::route::svg_path;
use flo_editor::Editor;
use flo_editor::input::{InputEvent, Modifiers};
use flo_editor::shortcuts::{ShortcutAction, ShortcutMap};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The WASM-facing flowchart canvas.
///
/// All interaction from the host page goes through this struct.
#[wasm_bindgen]
pub struct FlowCanvas {
    editor: Editor,
}

impl Default for FlowCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FlowCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: Editor::default(),
        }
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if the host should repaint.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.editor.handle(&InputEvent::PointerDown { x, y, modifiers })
    }

    /// Handle pointer move. Returns true if the host should repaint.
    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.editor.handle(&InputEvent::PointerMove { x, y, modifiers })
    }

    /// Handle pointer up. Returns a JSON string:
    /// `{"changed":bool, "connection":"<id>"|null}`
    ///
    /// `connection` is set when the release completed a new connection.
    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        let before = self.editor.diagram().connection_count();
        let changed = self.editor.handle(&InputEvent::PointerUp { x, y, modifiers });
        let created = if self.editor.diagram().connection_count() > before {
            self.editor
                .diagram()
                .connections()
                .last()
                .map(|c| c.id.as_str().to_string())
        } else {
            None
        };
        json!({ "changed": changed, "connection": created }).to_string()
    }

    pub fn handle_double_click(&mut self, x: f32, y: f32) -> bool {
        self.editor.handle(&InputEvent::DoubleClick { x, y })
    }

    /// Handle a context-menu request. When it lands on empty canvas the
    /// anchor is available from `menu_anchor_json` for the host's menu.
    pub fn handle_context_menu(&mut self, x: f32, y: f32) -> bool {
        self.editor.handle(&InputEvent::ContextMenu { x, y })
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>"}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        let action = ShortcutMap::resolve(key, modifiers).map_or("none", action_to_name);
        let changed = self.editor.handle(&InputEvent::Key {
            key: key.to_string(),
            modifiers,
        });
        json!({ "changed": changed, "action": action }).to_string()
    }

    // ─── Intents ─────────────────────────────────────────────────────────

    /// Add a node of `kind` (`"step"`, `"condition"`, `"notification"`)
    /// centered on `(x, y)`. Returns the new id, or `""` for an unknown kind.
    pub fn add_node(&mut self, kind: &str, x: f32, y: f32) -> String {
        let Some(kind) = NodeKind::from_name(kind) else {
            log::debug!("add_node: unknown kind {kind:?}");
            return String::new();
        };
        self.editor
            .add_node(kind, Point::new(x, y))
            .as_str()
            .to_string()
    }

    pub fn delete_node(&mut self, id: &str) -> bool {
        self.editor.request_delete_node(NodeId::intern(id))
    }

    pub fn delete_connection(&mut self, id: &str) -> bool {
        self.editor.request_delete_connection(ConnectionId::intern(id))
    }

    pub fn begin_label_edit(&mut self, id: &str) -> bool {
        self.editor.begin_label_edit(NodeId::intern(id))
    }

    pub fn submit_label(&mut self, id: &str, text: &str) -> bool {
        self.editor.submit_label(NodeId::intern(id), text)
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// Nodes in paint order as JSON.
    pub fn nodes_json(&self) -> String {
        let nodes: Vec<_> = self
            .editor
            .diagram()
            .nodes()
            .map(|n| {
                json!({
                    "id": n.id,
                    "kind": n.kind,
                    "label": n.label,
                    "displayLabel": n.display_label(),
                    "x": n.position.x,
                    "y": n.position.y,
                    "width": NODE_WIDTH,
                    "height": NODE_HEIGHT,
                })
            })
            .collect();
        serde_json::Value::Array(nodes).to_string()
    }

    /// Connections with their routed points and SVG path data.
    pub fn connections_json(&self) -> String {
        let diagram = self.editor.diagram();
        let conns: Vec<_> = self
            .editor
            .routed_connections()
            .into_iter()
            .map(|r| {
                let conn = diagram.connection(r.id);
                json!({
                    "id": r.id,
                    "source": r.source,
                    "target": r.target,
                    "sourcePort": conn.and_then(|c| c.source_port),
                    "targetPort": conn.and_then(|c| c.target_port),
                    "points": r.points,
                    "path": svg_path(&r.points),
                })
            })
            .collect();
        serde_json::Value::Array(conns).to_string()
    }

    /// Every port with its role and whether a connection occupies it.
    pub fn ports_json(&self) -> String {
        let diagram = self.editor.diagram();
        let ports: Vec<_> = diagram
            .nodes()
            .flat_map(ports_for)
            .map(|p| {
                json!({
                    "node": p.node,
                    "side": p.side,
                    "role": p.role,
                    "x": p.position.x,
                    "y": p.position.y,
                    "inUse": diagram.port_in_use(p.node, p.side),
                })
            })
            .collect();
        serde_json::Value::Array(ports).to_string()
    }

    /// The gesture in progress, plus the preview path while drawing.
    pub fn gesture_json(&self) -> String {
        let mut value = serde_json::to_value(self.editor.gesture())
            .unwrap_or_else(|_| json!({ "state": "idle" }));
        if let (Some(route), Some(obj)) = (self.editor.preview_route(), value.as_object_mut()) {
            obj.insert("previewPath".into(), json!(svg_path(&route)));
        }
        value.to_string()
    }

    /// Id of the selected node, or `""`.
    pub fn selected_id(&self) -> String {
        self.editor
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// `{"x":..,"y":..}` where the canvas context menu was opened, or `null`.
    pub fn menu_anchor_json(&self) -> String {
        json!(self.editor.menu_anchor()).to_string()
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        ctrl,
        shift,
        alt,
        meta,
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::DeleteSelection => "deleteSelection",
        ShortcutAction::Cancel => "cancel",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Flowboard WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
