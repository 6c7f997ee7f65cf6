use crate::widget::Widget;

/// A plain container that stacks its children on top of each other, each
/// positioned by its own alignment.
pub struct Panel;

impl Panel {
    /// Construct a panel.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Panel {}
