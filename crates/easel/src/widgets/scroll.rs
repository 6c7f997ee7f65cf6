//! Scroll containers.
//!
//! A [`ScrollArea`] owns one body node and gives it a viewport. On a
//! scrollable axis the body is sized to its maximum and the viewport to the
//! space left after margins and bars; on other axes the body simply gets that
//! space. Optional [`ScrollBar`]s sit before or after the body on each axis.

use crate::{
    NodeId, Tree,
    attrs::{Attrs, UNLIMITED},
    color::Color,
    core::context::Context,
    error::{Error, Result},
    event::mouse::MouseButton,
    geom::{Axis, Point, Rect},
    layout::{AxisPass, Measure},
    settings::{SettingValue, Settings, mismatch},
    widget::Widget,
};

/// How far one wheel notch scrolls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelScroll {
    /// A fixed number of pixels.
    Pixels(i32),
    /// A fraction of the scroll area's size.
    Fraction(f64),
}

impl WheelScroll {
    /// Pixel offset for one notch over an area of `size` pixels.
    fn pixels(self, size: u32) -> i32 {
        match self {
            Self::Pixels(n) => n,
            Self::Fraction(f) => (f * f64::from(size)) as i32,
        }
    }
}

/// A container that shows a scrollable window onto a single body.
pub struct ScrollArea {
    /// Scroll horizontally.
    horizontal: bool,
    /// Scroll vertically.
    vertical: bool,
    /// Vertical bar left of the body.
    left_bar: bool,
    /// Vertical bar right of the body.
    right_bar: bool,
    /// Horizontal bar above the body.
    top_bar: bool,
    /// Horizontal bar below the body.
    bottom_bar: bool,
    /// Bar thickness in pixels.
    bar_thickness: u32,
    /// Bar background.
    bar_bgcolor: Color,
    /// Wheel scroll step.
    mousewheel_scroll: WheelScroll,
    /// Bars created on mount.
    bars: Vec<(Side, NodeId)>,
}

/// Where a bar sits relative to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Left of the body.
    Left,
    /// Right of the body.
    Right,
    /// Above the body.
    Top,
    /// Below the body.
    Bottom,
}

impl Side {
    /// The axis along which a bar on this side scrolls.
    fn scrolls(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Vertical,
            Self::Top | Self::Bottom => Axis::Horizontal,
        }
    }
}

impl ScrollArea {
    /// A scroll area that scrolls on no axis and has no bars.
    pub fn new() -> Self {
        Self {
            horizontal: false,
            vertical: false,
            left_bar: false,
            right_bar: false,
            top_bar: false,
            bottom_bar: false,
            bar_thickness: 20,
            bar_bgcolor: Color::rgb(64, 64, 64),
            mousewheel_scroll: WheelScroll::Fraction(0.2),
            bars: vec![],
        }
    }

    /// Scroll on the horizontal axis.
    pub fn horizontal(mut self, on: bool) -> Self {
        self.horizontal = on;
        self
    }

    /// Scroll on the vertical axis.
    pub fn vertical(mut self, on: bool) -> Self {
        self.vertical = on;
        self
    }

    /// Bars on the right and at the bottom, scrolling both ways.
    pub fn with_bars(mut self) -> Self {
        self.right_bar = true;
        self.bottom_bar = true;
        self
    }

    /// Does the area scroll along an axis?
    fn scrolls(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// The sides configured to have bars.
    fn sides(&self) -> Vec<Side> {
        [
            (self.left_bar, Side::Left),
            (self.right_bar, Side::Right),
            (self.top_bar, Side::Top),
            (self.bottom_bar, Side::Bottom),
        ]
        .into_iter()
        .filter_map(|(on, side)| on.then_some(side))
        .collect()
    }

    /// The sides before and after the body along an axis.
    fn ends(axis: Axis) -> (Side, Side) {
        match axis {
            Axis::Horizontal => (Side::Left, Side::Right),
            Axis::Vertical => (Side::Top, Side::Bottom),
        }
    }

    /// Space taken by bars along an axis.
    fn bars_extent(&self, axis: Axis) -> u32 {
        let (before, after) = Self::ends(axis);
        let n = u32::from(self.bar(before).is_some()) + u32::from(self.bar(after).is_some());
        self.bar_thickness.saturating_mul(n)
    }

    /// The bar on a side, if there is one.
    fn bar(&self, side: Side) -> Option<NodeId> {
        self.bars.iter().find(|(s, _)| *s == side).map(|(_, id)| *id)
    }

    /// Settings that make a bar on a side match this area.
    fn bar_settings(&self, side: Side) -> Settings {
        let thickness = i64::from(self.bar_thickness);
        let s = Settings::new().with("bgcolor", self.bar_bgcolor);
        match side.scrolls() {
            Axis::Vertical => s.with("fixed_width", true).with("width", thickness),
            Axis::Horizontal => s.with("fixed_height", true).with("height", thickness),
        }
    }

    /// Scroll the body of `area` minimally so that `target`, in body content
    /// coordinates, is visible. The area is redrawn so its bars follow.
    pub fn scroll_to(tree: &mut Tree, area: NodeId, target: Rect) -> Result<()> {
        let body = body_of(tree, area)?;
        tree.ensure_visible(body, target)?;
        tree.redraw(area);
        Ok(())
    }
}

/// The body of a scroll area is its first child.
fn body_of(tree: &Tree, area: NodeId) -> Result<NodeId> {
    tree.children(area)?
        .first()
        .copied()
        .ok_or_else(|| Error::Invariant(format!("scroll area {area:?} has no body")))
}

/// The largest rect the viewport may cover: the body's content bounds.
fn body_rect(tree: &Tree, body: NodeId) -> Result<Rect> {
    Ok(tree.node(body)?.content_bounds())
}

impl Widget for ScrollArea {
    fn apply_setting(&mut self, key: &str, value: &SettingValue) -> Result<bool> {
        match key {
            "horizontal" => self.horizontal = value.as_bool(key)?,
            "vertical" => self.vertical = value.as_bool(key)?,
            "left_bar" => self.left_bar = value.as_bool(key)?,
            "right_bar" => self.right_bar = value.as_bool(key)?,
            "top_bar" => self.top_bar = value.as_bool(key)?,
            "bottom_bar" => self.bottom_bar = value.as_bool(key)?,
            "bar_thickness" => self.bar_thickness = value.as_u32(key)?,
            "bar_bgcolor" => self.bar_bgcolor = Color::from_setting(key, value)?,
            "mousewheel_scroll" => {
                self.mousewheel_scroll = match value {
                    SettingValue::Int(n) => WheelScroll::Pixels(
                        i32::try_from(*n).map_err(|_| mismatch(key, "pixel count", value))?,
                    ),
                    SettingValue::Float(f) => WheelScroll::Fraction(*f),
                    _ => return Err(mismatch(key, "int or float", value)),
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn mount(&mut self, ctx: &mut Context) -> Result<()> {
        let area = ctx.id();
        let body = body_of(ctx.tree_ref(), area)?;
        ctx.tree().set_viewport(body, Some(Rect::zero()))?;
        for side in self.sides() {
            let bar = ctx.tree().create(
                ScrollBar::new(body, side.scrolls() == Axis::Vertical),
                vec![],
                &self.bar_settings(side),
            )?;
            ctx.tree().append_child(area, bar)?;
            self.bars.push((side, bar));
            match side.scrolls() {
                Axis::Horizontal => self.horizontal = true,
                Axis::Vertical => self.vertical = true,
            }
        }
        Ok(())
    }

    fn settings_updated(&mut self, ctx: &mut Context) -> Result<()> {
        for (side, bar) in &self.bars {
            let tree = ctx.tree();
            let mut attrs = tree.attrs(*bar)?;
            for (k, v) in self.bar_settings(*side).iter() {
                attrs.apply(k, v)?;
            }
            tree.update_attrs(*bar, |a| *a = attrs)?;
        }
        Ok(())
    }

    fn min_contents(&self, axis: Axis, m: &Measure) -> u32 {
        let body = if self.scrolls(axis) {
            0
        } else {
            m.children().first().map(|b| m.min(*b, axis)).unwrap_or(0)
        };
        self.bars_extent(axis).saturating_add(body)
    }

    fn max_contents(&self, axis: Axis, m: &Measure) -> u32 {
        let body = m.children().first().map(|b| m.max(*b, axis)).unwrap_or(0);
        self.bars_extent(axis).saturating_add(body)
    }

    fn layout(&mut self, axis: Axis, pass: &mut AxisPass) -> Result<()> {
        let attrs = pass.attrs()?;
        let body = body_of_pass(pass)?;
        let extent = pass
            .size()?
            .saturating_sub(attrs.margin.saturating_mul(2))
            .saturating_sub(self.bars_extent(axis));
        pass.set_viewport_extent(body, extent)?;

        let (before, after) = Self::ends(axis);
        let mut pos = pass.start()?.saturating_add_unsigned(attrs.margin);
        if let Some(bar) = self.bar(before) {
            pass.set_pos(bar, pos)?;
            pos = pos.saturating_add_unsigned(self.bar_thickness);
        }
        pass.set_pos(body, pos)?;
        if self.scrolls(axis) {
            for (side, bar) in &self.bars {
                if side.scrolls() == axis {
                    pass.set_pos(*bar, pos)?;
                    pass.set_size(*bar, extent)?;
                }
            }
            let max = pass.max(body);
            if max == UNLIMITED {
                return Err(Error::Invariant(format!(
                    "scroll body has unbounded {} size",
                    axis.name()
                )));
            }
            pass.set_size(body, max)?;
        } else if !pass.child_attrs(body)?.fixed(axis) {
            pass.set_size(body, extent)?;
        }
        pass.layout_child(body)?;
        if let Some(bar) = self.bar(after) {
            pass.set_pos(bar, pos.saturating_add_unsigned(extent))?;
        }
        for (_, bar) in &self.bars {
            pass.layout_child(*bar)?;
        }
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        _pos: Point,
        ctx: &mut Context,
    ) -> Result<bool> {
        let sign = match button {
            MouseButton::WheelDown => 1,
            MouseButton::WheelUp => -1,
            _ => return Ok(false),
        };
        if !(self.vertical || self.horizontal) {
            return Ok(false);
        }
        let size = ctx.size()?;
        let area = ctx.id();
        let tree = ctx.tree();
        let body = body_of(tree, area)?;
        let Some(vp) = tree.node(body)?.viewport() else {
            return Ok(false);
        };
        let offset = if self.vertical {
            Point::new(0, sign * self.mousewheel_scroll.pixels(size.h))
        } else {
            Point::new(sign * self.mousewheel_scroll.pixels(size.w), 0)
        };
        let target = vp
            .shift(offset.x, offset.y)
            .clamp_within(&body_rect(tree, body)?);
        Self::scroll_to(tree, area, target)?;
        Ok(true)
    }
}

/// The first child of the container being laid out.
fn body_of_pass(pass: &AxisPass) -> Result<NodeId> {
    pass.children()?
        .first()
        .copied()
        .ok_or_else(|| Error::Invariant(format!("scroll area {:?} has no body", pass.node())))
}

/// Default attributes of a scroll bar.
fn bar_attrs(vertical: bool) -> Attrs {
    Attrs {
        fixed_width: vertical,
        fixed_height: !vertical,
        ..Attrs::default()
    }
}

/// A proportional scroll bar for the body of its parent [`ScrollArea`].
pub struct ScrollBar {
    /// The scrolled body.
    body: NodeId,
    /// Scroll vertically rather than horizontally.
    vertical: bool,
    /// Left button held down on the bar.
    clicked: bool,
}

impl ScrollBar {
    /// Shortest thumb, in pixels.
    pub const MIN_BUTTON_LENGTH: u32 = 25;

    /// A bar scrolling `body`.
    pub fn new(body: NodeId, vertical: bool) -> Self {
        Self {
            body,
            vertical,
            clicked: false,
        }
    }

    /// The axis this bar scrolls.
    fn axis(&self) -> Axis {
        if self.vertical {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    /// Thumb length for a bar of `len` over a body of `body_len`.
    fn button_length(len: u32, body_len: u32) -> u32 {
        let target = (u64::from(len) * u64::from(len)) / u64::from(body_len.max(1));
        (target.min(u64::from(u32::MAX)) as u32).max(Self::MIN_BUTTON_LENGTH)
    }

    /// Scroll so that the thumb centers on `pos`, in bar coordinates.
    fn jump_to_pos(&self, pos: Point, ctx: &mut Context) -> Result<()> {
        let axis = self.axis();
        let len = i64::from(ctx.size()?.get(axis));
        let tree = ctx.tree_ref();
        let body = tree.node(self.body)?;
        let Some(mut vp) = body.viewport() else {
            return Ok(());
        };
        let body_len = i64::from(body.size().get(axis));
        let vp_len = i64::from(vp.extent(axis));
        let button = i64::from(Self::button_length(len as u32, body_len as u32));
        let span = len - button;
        let frac = if span > 0 {
            (i64::from(pos.get(axis)) - button / 2) as f64 / span as f64
        } else {
            0.0
        };
        let center = vp_len / 2 + (frac * (body_len - vp_len) as f64) as i64;
        let mut start = center - vp_len / 2;
        if start + vp_len > body_len {
            start = body_len - vp_len;
        }
        start = start.max(0);
        vp.tl.set(axis, start as i32);
        let Some(area) = ctx.parent() else {
            return Ok(());
        };
        ScrollArea::scroll_to(ctx.tree(), area, vp)
    }
}

impl Widget for ScrollBar {
    fn attrs(&self) -> Attrs {
        bar_attrs(self.vertical)
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<()> {
        let axis = self.axis();
        let tree = ctx.tree_ref();
        let body = tree.node(self.body)?;
        let Some(vp) = body.viewport() else {
            return Ok(());
        };
        let body_len = i64::from(body.size().get(axis));
        let vp_len = i64::from(vp.extent(axis));
        if body_len <= vp_len {
            return Ok(());
        }
        let size = ctx.size()?;
        let len = i64::from(size.get(axis));
        let center = i64::from(vp.start(axis)) + vp_len / 2;
        let frac = (center as f64 - vp_len as f64 / 2.0) / (body_len - vp_len) as f64;
        let button = i64::from(Self::button_length(len as u32, body_len as u32));
        let button_center = button / 2 + (frac * (len - button) as f64) as i64;
        let start = (button_center - button / 2) as i32;
        let thumb = if self.vertical {
            Rect::new(0, start, size.w, button as u32)
        } else {
            Rect::new(start, 0, button as u32, size.h)
        };
        let color = ctx.attrs()?.color;
        ctx.surface()?.fill_rect(thumb, color);
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        pos: Point,
        ctx: &mut Context,
    ) -> Result<bool> {
        if button != MouseButton::Left {
            return Ok(false);
        }
        self.clicked = true;
        self.jump_to_pos(pos, ctx)?;
        Ok(true)
    }

    fn handle_mouse_move(&mut self, pos: Option<Point>, ctx: &mut Context) -> Result<bool> {
        match pos {
            Some(p) if self.clicked => {
                self.jump_to_pos(p, ctx)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn handle_mouse_up(
        &mut self,
        button: MouseButton,
        _pos: Option<Point>,
        _ctx: &mut Context,
    ) -> Result<bool> {
        if button == MouseButton::Left {
            self.clicked = false;
        }
        Ok(button == MouseButton::Left)
    }
}
