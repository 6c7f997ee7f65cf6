//! Mouse input primitives.

use crate::geom::{Expanse, Point};

/// A mouse button, including the scroll wheel directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Middle button.
    Middle,
    /// Secondary button.
    Right,
    /// Wheel scrolled up.
    WheelUp,
    /// Wheel scrolled down.
    WheelDown,
    /// First extra button.
    X1,
    /// Second extra button.
    X2,
    /// A button the platform could not name.
    Unknown,
}

impl MouseButton {
    /// Lowercase button name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
            Self::WheelUp => "wheelup",
            Self::WheelDown => "wheeldown",
            Self::X1 => "x1",
            Self::X2 => "x2",
            Self::Unknown => "unknown",
        }
    }
}

/// A mouse event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEvent {
    /// Button pressed.
    Down {
        /// Button pressed.
        button: MouseButton,
        /// Pointer location.
        pos: Point,
    },
    /// Button released.
    Up {
        /// Button released.
        button: MouseButton,
        /// Pointer location.
        pos: Point,
    },
    /// Pointer moved.
    Move {
        /// Pointer location.
        pos: Point,
    },
}

impl MouseEvent {
    /// Pointer location of the event.
    pub fn pos(&self) -> Point {
        match self {
            Self::Down { pos, .. } | Self::Up { pos, .. } | Self::Move { pos } => *pos,
        }
    }
}

/// Whether a screen position lies within a screen of the given size.
pub(crate) fn on_screen(size: Expanse, pos: Point) -> bool {
    size.rect().contains_point(pos)
}
