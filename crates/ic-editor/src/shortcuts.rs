//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Lives in Rust so
//! the browser bridge and native hosts agree on bindings.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ZoomIn,
    ZoomOut,
    /// Back to 100% with no pan.
    ResetZoom,
    ZoomToFit,
    /// Abort the gesture in progress.
    Cancel,
}

/// Resolves key events into shortcut actions.
///
/// Zoom keys work bare or with ⌘/Ctrl, so browser-style zoom chords land on
/// the canvas instead of the page.
pub struct ShortcutMap;

impl ShortcutMap {
    /// `key` is the `KeyboardEvent.key` value (e.g. `"f"`, `"Escape"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.ctrl || modifiers.meta;

        if cmd {
            return match key {
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetZoom),
                _ => None,
            };
        }

        if modifiers.shift {
            // Shift+1 arrives as "!" on US layouts.
            return match key {
                "1" | "!" => Some(ShortcutAction::ZoomToFit),
                "+" => Some(ShortcutAction::ZoomIn),
                "Escape" => Some(ShortcutAction::Cancel),
                _ => None,
            };
        }

        match key {
            "=" | "+" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            "0" => Some(ShortcutAction::ResetZoom),
            "f" | "F" => Some(ShortcutAction::ZoomToFit),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
