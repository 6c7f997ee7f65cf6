//! Sequence containers and spacers.

use crate::{
    attrs::Attrs,
    error::Result,
    geom::Axis,
    layout::{AxisPass, Measure},
    state::NodeName,
    widget::Widget,
};

/// Children are placed in sequence along the main axis and stacked on the
/// cross axis.
fn sequence_layout(main: Axis, axis: Axis, pass: &mut AxisPass) -> Result<()> {
    if axis == main {
        pass.sequence()
    } else {
        pass.stack()
    }
}

/// Lays out children left to right.
pub struct HBox;

impl HBox {
    /// Construct an empty horizontal box.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for HBox {
    fn min_contents(&self, axis: Axis, m: &Measure) -> u32 {
        match axis {
            Axis::Horizontal => m.sequence_min(axis),
            Axis::Vertical => m.stack_min(axis),
        }
    }

    fn max_contents(&self, axis: Axis, m: &Measure) -> u32 {
        match axis {
            Axis::Horizontal => m.sequence_max(axis),
            Axis::Vertical => m.stack_max(axis),
        }
    }

    fn layout(&mut self, axis: Axis, pass: &mut AxisPass) -> Result<()> {
        sequence_layout(Axis::Horizontal, axis, pass)
    }

    fn name(&self) -> NodeName {
        NodeName::convert("hbox")
    }
}

/// Lays out children top to bottom.
pub struct VBox;

impl VBox {
    /// Construct an empty vertical box.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for VBox {
    fn min_contents(&self, axis: Axis, m: &Measure) -> u32 {
        match axis {
            Axis::Vertical => m.sequence_min(axis),
            Axis::Horizontal => m.stack_min(axis),
        }
    }

    fn max_contents(&self, axis: Axis, m: &Measure) -> u32 {
        match axis {
            Axis::Vertical => m.sequence_max(axis),
            Axis::Horizontal => m.stack_max(axis),
        }
    }

    fn layout(&mut self, axis: Axis, pass: &mut AxisPass) -> Result<()> {
        sequence_layout(Axis::Vertical, axis, pass)
    }

    fn name(&self) -> NodeName {
        NodeName::convert("vbox")
    }
}

/// Soaks up horizontal space in an [`HBox`].
pub struct HSpacer;

impl HSpacer {
    /// Construct a spacer.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for HSpacer {
    fn attrs(&self) -> Attrs {
        Attrs {
            greedy_width: true,
            ..Attrs::default()
        }
    }

    fn name(&self) -> NodeName {
        NodeName::convert("hspacer")
    }
}

/// Soaks up vertical space in a [`VBox`].
pub struct VSpacer;

impl VSpacer {
    /// Construct a spacer.
    pub fn new() -> Self {
        Self
    }
}

impl Widget for VSpacer {
    fn attrs(&self) -> Attrs {
        Attrs {
            greedy_height: true,
            ..Attrs::default()
        }
    }

    fn name(&self) -> NodeName {
        NodeName::convert("vspacer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Tree,
        core::{surface::Surface, testing::widgets::Block},
        geom::{Expanse, Rect},
        settings::Settings,
    };

    #[test]
    fn names() {
        assert_eq!(HBox::new().name(), "hbox");
        assert_eq!(VBox::new().name(), "vbox");
        assert_eq!(HSpacer::new().name(), "hspacer");
    }

    #[test]
    fn vbox_with_spacer_pins_to_bottom() -> Result<()> {
        let mut t = Tree::new(Surface::new(Expanse::new(40, 40)));
        let top = t.add(Block::fixed(10, 5))?;
        let gap = t.add(VSpacer::new())?;
        let bottom = t.add(Block::fixed(10, 5))?;
        let vb = t.create(
            VBox::new(),
            vec![top, gap, bottom],
            &Settings::new().with("child_halign", "right"),
        )?;
        t.append_child(t.root(), vb)?;
        t.layout()?;
        assert_eq!(t.node(vb)?.rect(), Rect::new(15, 0, 10, 40));
        assert_eq!(t.node(top)?.rect(), Rect::new(15, 0, 10, 5));
        assert_eq!(t.node(bottom)?.rect(), Rect::new(15, 35, 10, 5));
        Ok(())
    }
}
