//! Flowboard editor: turns pointer and keyboard input into diagram edits.
//!
//! - [`input`]: normalized input events
//! - [`hit`]: point → port / node / connection lookup
//! - [`gesture`]: the interaction state machine
//! - [`editor`]: a diagram plus the controller driving it

pub mod editor;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod shortcuts;

pub use editor::{Editor, RoutedConnection};
pub use gesture::{Controller, Gesture};
pub use hit::{HitTarget, hit_test};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
