//! Input abstraction layer.
//!
//! Normalizes host pointer, keyboard, and UI intent events into a single
//! `InputEvent` enum consumed by the gesture controller. Coordinates are
//! canvas coordinates; hosts convert from screen space before calling in.

use flo_core::id::NodeId;
use flo_core::model::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f32, y: f32, modifiers: Modifiers },

    /// Pointer moved, pressed or not.
    PointerMove { x: f32, y: f32, modifiers: Modifiers },

    /// Pointer released.
    PointerUp { x: f32, y: f32, modifiers: Modifiers },

    DoubleClick { x: f32, y: f32 },

    /// Secondary click / long press.
    ContextMenu { x: f32, y: f32 },

    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`, `"Escape"`).
    Key { key: String, modifiers: Modifiers },

    /// The host UI asked to edit a node's label (e.g. from a toolbar button).
    BeginLabelEdit { node: NodeId },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Extract the canvas position if this is a positional event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::DoubleClick { x, y }
            | Self::ContextMenu { x, y } => Some(Point::new(*x, *y)),
            Self::Key { .. } | Self::BeginLabelEdit { .. } => None,
        }
    }
}
