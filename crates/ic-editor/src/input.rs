//! Input abstraction layer.
//!
//! Normalizes pointer, wheel, HTML5 drag-and-drop and keyboard events into
//! a single `InputEvent` enum consumed by the interaction controller. All
//! coordinates are screen space (viewport pixels).

use ic_core::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Modifier key state (from JS event).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Build from a bitmask: bit 0 = shift, 1 = ctrl, 2 = alt, 3 = meta.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            shift: bits & 1 != 0,
            ctrl: bits & 2 != 0,
            alt: bits & 4 != 0,
            meta: bits & 8 != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    /// The platform aborted the pointer sequence.
    PointerCancel,
    /// Wheel or trackpad scroll; negative `delta_y` zooms in.
    Wheel {
        x: f32,
        y: f32,
        delta_y: f32,
    },
    /// A palette item entered the canvas.
    DragEnter {
        x: f32,
        y: f32,
        resource_type: String,
    },
    DragOver {
        x: f32,
        y: f32,
    },
    DragLeave,
    Drop {
        x: f32,
        y: f32,
    },
    Key {
        key: String,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Screen position, if the event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Wheel { x, y, .. }
            | Self::DragEnter { x, y, .. }
            | Self::DragOver { x, y }
            | Self::Drop { x, y } => Some(Point::new(*x, *y)),
            Self::PointerCancel | Self::DragLeave | Self::Key { .. } => None,
        }
    }
}
