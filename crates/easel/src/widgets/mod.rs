#![allow(clippy::new_without_default)]
//! Stock widgets.

/// Box containers and spacers.
mod boxes;
/// Push button.
mod button;
/// Choice picker with a popup list.
pub mod dropdown;
/// Stacking panel.
mod panel;
/// Root screen.
mod screen;
/// Scroll area and scroll bars.
pub mod scroll;
/// Editable text area.
pub mod text_area;

pub use boxes::{HBox, HSpacer, VBox, VSpacer};
pub use button::{Button, ClickCallback};
pub use dropdown::{Dropdown, DropdownList, SelectCallback};
pub use panel::Panel;
pub use screen::Screen;
pub use scroll::{ScrollArea, ScrollBar, WheelScroll};
pub use text_area::{TextArea, TextAreaBody, TextBuffer};
