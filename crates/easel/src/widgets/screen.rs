use crate::{
    attrs::{Align, Attrs},
    color::Color,
    state::NodeName,
    widget::Widget,
};

/// The root of every tree. Its size is the display size; top-level windows
/// are centered on it.
pub struct Screen;

impl Screen {
    /// Construct a screen.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Screen {
    fn attrs(&self) -> Attrs {
        Attrs {
            child_halign: Some(Align::Center),
            child_valign: Some(Align::Center),
            bgcolor: Some(Color::BLACK),
            ..Attrs::default()
        }
    }

    fn name(&self) -> NodeName {
        NodeName::convert("screen")
    }
}
