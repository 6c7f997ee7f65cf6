//! A push button.

use crate::{
    attrs::Attrs,
    color::Color,
    core::context::Context,
    error::Result,
    event::mouse::MouseButton,
    geom::{Frame, Point},
    settings::SettingValue,
    widget::Widget,
};

/// Click handler.
pub type ClickCallback = Box<dyn FnMut(&mut Context) -> Result<()>>;

/// A bordered container that fires a callback when clicked. A left press
/// arms the button; the release fires only if it lands on the button.
pub struct Button {
    /// Armed by a left press.
    clicked: bool,
    /// Border color while armed.
    highlight_color: Color,
    /// Border color while disabled.
    disabled_color: Color,
    /// Called on click.
    on_click: Option<ClickCallback>,
}

impl Button {
    /// A button with no click handler.
    pub fn new() -> Self {
        Self {
            clicked: false,
            highlight_color: Color::rgb(128, 128, 128),
            disabled_color: Color::rgb(96, 96, 96),
            on_click: None,
        }
    }

    /// Call `f` on every click.
    pub fn on_click(mut self, f: impl FnMut(&mut Context) -> Result<()> + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Is the button armed?
    pub fn is_pressed(&self) -> bool {
        self.clicked
    }
}

impl Widget for Button {
    fn attrs(&self) -> Attrs {
        Attrs {
            margin: 5,
            ..Attrs::default()
        }
    }

    fn apply_setting(&mut self, key: &str, value: &SettingValue) -> Result<bool> {
        match key {
            "highlight_color" => self.highlight_color = Color::from_setting(key, value)?,
            "disabled_color" => self.disabled_color = Color::from_setting(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<()> {
        let attrs = ctx.attrs()?;
        let color = if !attrs.enabled {
            self.disabled_color
        } else if self.clicked {
            self.highlight_color
        } else {
            attrs.color
        };
        let surface = ctx.surface()?;
        for edge in Frame::new(surface.rect(), 2).edges() {
            surface.fill_rect(edge, color);
        }
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        _pos: Point,
        ctx: &mut Context,
    ) -> Result<bool> {
        if button != MouseButton::Left || !ctx.attrs()?.enabled {
            return Ok(false);
        }
        self.clicked = true;
        ctx.redraw();
        Ok(true)
    }

    fn handle_mouse_up(
        &mut self,
        button: MouseButton,
        pos: Option<Point>,
        ctx: &mut Context,
    ) -> Result<bool> {
        if button != MouseButton::Left || !self.clicked {
            return Ok(false);
        }
        self.clicked = false;
        ctx.redraw();
        if pos.is_some()
            && let Some(f) = self.on_click.as_mut()
        {
            f(ctx)?;
        }
        Ok(true)
    }

    fn handle_mouse_enter(&mut self, ctx: &mut Context) -> Result<bool> {
        ctx.redraw();
        Ok(false)
    }

    fn handle_mouse_exit(&mut self, ctx: &mut Context) -> Result<bool> {
        ctx.redraw();
        Ok(false)
    }
}
