//! Input and window events delivered by a backend.

/// Keyboard events.
pub mod key;
/// Mouse events.
pub mod mouse;

use crate::geom::Expanse;

/// An event polled from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(key::KeyEvent),
    /// A mouse action.
    Mouse(mouse::MouseEvent),
    /// The window was shown or regained focus; everything must be redrawn.
    Expose,
    /// The display changed size.
    Resize(Expanse),
    /// The user asked to quit.
    Quit,
}
