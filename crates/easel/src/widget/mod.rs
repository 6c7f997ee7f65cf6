//! Widget trait and event outcome types.

use std::any::{Any, type_name};

use crate::{
    attrs::Attrs,
    core::{
        context::Context,
        id::NodeId,
        layout::{AxisPass, Measure},
    },
    error::Result,
    event::{key::KeyEvent, mouse::MouseButton},
    geom::{Axis, Point},
    settings::SettingValue,
    state::NodeName,
};

/// The result of a key handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyOutcome {
    /// The key was handled and propagation stops.
    Consumed,
    /// The key was not handled and will bubble up the tree.
    Ignored,
    /// Offer the key to another node, which becomes the new start of the
    /// bubble chain. Nodes already offered the key are skipped.
    Redirect(NodeId),
}

/// Widgets are the behavior attached to nodes in the tree. Every hook has a
/// default, so a widget overrides only what it needs.
pub trait Widget: Any {
    /// Attribute defaults for new nodes of this widget.
    fn attrs(&self) -> Attrs {
        Attrs::default()
    }

    /// Apply a widget-specific setting. Returns false if the key is unknown.
    fn apply_setting(&mut self, _key: &str, _value: &SettingValue) -> Result<bool> {
        Ok(false)
    }

    /// Called after a settings cascade has reached this node and its
    /// children.
    fn settings_updated(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Called once when the node is created, after its initial children are
    /// attached.
    fn mount(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Can this widget render a viewport of its content itself?
    fn supports_viewport(&self) -> bool {
        false
    }

    /// Minimum content size, excluding margins.
    fn min_contents(&self, axis: Axis, m: &Measure) -> u32 {
        m.stack_min(axis)
    }

    /// Maximum content size, excluding margins.
    fn max_contents(&self, axis: Axis, m: &Measure) -> u32 {
        m.stack_max(axis)
    }

    /// Minimum size along an axis.
    fn min_size(&self, axis: Axis, m: &Measure) -> u32 {
        m.bounded_min(axis, self.min_contents(axis, m))
    }

    /// Maximum size along an axis.
    fn max_size(&self, axis: Axis, m: &Measure) -> u32 {
        m.bounded_max(axis, self.max_contents(axis, m))
    }

    /// Size and position children along one axis.
    fn layout(&mut self, _axis: Axis, pass: &mut AxisPass) -> Result<()> {
        pass.stack()
    }

    /// Called after layout has finalized this node's rect.
    fn laid_out(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Paint this widget's own content onto its surface. The background and
    /// the children have already been drawn.
    fn draw(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// A button was pressed over this widget and no child took it. `pos` is
    /// in content coordinates. Returning true captures the button.
    fn handle_mouse_down(
        &mut self,
        _button: MouseButton,
        _pos: Point,
        _ctx: &mut Context,
    ) -> Result<bool> {
        Ok(false)
    }

    /// A captured button was released. `pos` is `None` if the pointer is no
    /// longer over the widget.
    fn handle_mouse_up(
        &mut self,
        _button: MouseButton,
        _pos: Option<Point>,
        _ctx: &mut Context,
    ) -> Result<bool> {
        Ok(false)
    }

    /// The pointer moved over this widget, or anywhere while it holds a
    /// capture.
    fn handle_mouse_move(&mut self, _pos: Option<Point>, _ctx: &mut Context) -> Result<bool> {
        Ok(false)
    }

    /// The pointer entered this widget.
    fn handle_mouse_enter(&mut self, _ctx: &mut Context) -> Result<bool> {
        Ok(false)
    }

    /// The pointer left this widget.
    fn handle_mouse_exit(&mut self, _ctx: &mut Context) -> Result<bool> {
        Ok(false)
    }

    /// A key was pressed while this widget was on the focus chain.
    /// `keystroke` is the normalized form, e.g. `CTRL-left`.
    fn handle_keydown(
        &mut self,
        _event: &KeyEvent,
        _keystroke: &str,
        _ctx: &mut Context,
    ) -> Result<KeyOutcome> {
        Ok(KeyOutcome::Ignored)
    }

    /// This widget gained focus.
    fn focus_gained(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// This widget lost focus.
    fn focus_lost(&mut self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }

    /// Node name, also the key for type-specific settings.
    fn name(&self) -> NodeName {
        let name = type_name::<Self>();
        let name = name.split('<').next().unwrap_or(name);
        let short = name.rsplit("::").next().unwrap_or(name);
        NodeName::convert(short)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
