//! Interaction layer for the InfraCanvas diagram.
//!
//! Turns raw pointer, wheel, drag-and-drop and keyboard input into
//! [`Intent`]s, and keeps a [`DiagramSession`] that lays out the current
//! resource snapshot for rendering.

pub mod controller;
pub mod input;
pub mod intent;
pub mod session;
pub mod shortcuts;

pub use controller::{InteractionController, InteractionState};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use intent::{Intent, Intents};
pub use session::{DiagramSession, SessionError};
pub use shortcuts::{ShortcutAction, ShortcutMap};
