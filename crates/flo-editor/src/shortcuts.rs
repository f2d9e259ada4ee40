//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the WASM bridge and native tests share one set of bindings.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Delete the selected node and its connections.
    DeleteSelection,
    /// Abandon the gesture in progress (connection preview, label edit).
    Cancel,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// Returns `None` if the key combo has no binding. Command-modified
    /// keys are left to the host (copy, paste, browser shortcuts).
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.command() || modifiers.alt {
            return None;
        }
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelection),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
