/*! Instrumented widgets that record what happens to them. */
use std::{cell::RefCell, mem};

use crate::{
    attrs::Attrs,
    color::Color,
    core::context::Context,
    error::Result,
    event::{key::KeyEvent, mouse::MouseButton},
    geom::{Axis, Expanse, Point},
    layout::Measure,
    state::NodeName,
    widget::{KeyOutcome, Widget},
};

thread_local! {
    /// Events recorded by test widgets on this thread.
    static PATH: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Record an event.
fn record(name: &NodeName, evt: &str) {
    PATH.with(|p| p.borrow_mut().push(format!("{name}@{evt}")));
}

/// Clear the recorded events.
pub fn reset_path() {
    PATH.with(|p| p.borrow_mut().clear());
}

/// Take the recorded events, leaving the record empty.
pub fn take_path() -> Vec<String> {
    PATH.with(|p| mem::take(&mut *p.borrow_mut()))
}

/// A box with configurable size bounds that fills itself with a color,
/// optionally takes mouse presses and answers keys with a fixed outcome.
pub struct Block {
    /// Node name.
    name: NodeName,
    /// Minimum content size.
    min: Expanse,
    /// Maximum content size.
    max: Expanse,
    /// Literal size, if fixed.
    fixed: Option<Expanse>,
    /// Fill color drawn over the whole surface.
    pub fill: Option<Color>,
    /// Accept mouse presses.
    pub take_mouse: bool,
    /// Answer to every key press.
    pub keys: KeyOutcome,
}

impl Block {
    /// A block with content bounds.
    pub fn new(min: impl Into<Expanse>, max: impl Into<Expanse>) -> Self {
        Self {
            name: NodeName::convert("block"),
            min: min.into(),
            max: max.into(),
            fixed: None,
            fill: None,
            take_mouse: false,
            keys: KeyOutcome::Ignored,
        }
    }

    /// A block of a fixed size.
    pub fn fixed(w: u32, h: u32) -> Self {
        let size = Expanse::new(w, h);
        Self {
            fixed: Some(size),
            ..Self::new(size, size)
        }
    }

    /// Rename the block; events are recorded under this name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = NodeName::convert(name);
        self
    }

    /// Fill with a color when drawn.
    pub fn filled(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Accept mouse presses.
    pub fn clickable(mut self) -> Self {
        self.take_mouse = true;
        self
    }

    /// Answer key presses with `outcome`.
    pub fn keys(mut self, outcome: KeyOutcome) -> Self {
        self.keys = outcome;
        self
    }
}

impl Widget for Block {
    fn attrs(&self) -> Attrs {
        match self.fixed {
            Some(size) => Attrs::default().fixed_size(size),
            None => Attrs::default(),
        }
    }

    fn min_contents(&self, axis: Axis, _m: &Measure) -> u32 {
        self.min.get(axis)
    }

    fn max_contents(&self, axis: Axis, _m: &Measure) -> u32 {
        self.max.get(axis)
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<()> {
        record(&self.name, "draw");
        if let Some(c) = self.fill {
            ctx.surface()?.fill(c);
        }
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        pos: Point,
        _ctx: &mut Context,
    ) -> Result<bool> {
        record(
            &self.name,
            &format!("down:{}:{},{}", button.name(), pos.x, pos.y),
        );
        Ok(self.take_mouse)
    }

    fn handle_mouse_up(
        &mut self,
        button: MouseButton,
        pos: Option<Point>,
        _ctx: &mut Context,
    ) -> Result<bool> {
        let at = match pos {
            Some(p) => format!("{},{}", p.x, p.y),
            None => "outside".into(),
        };
        record(&self.name, &format!("up:{}:{at}", button.name()));
        Ok(true)
    }

    fn handle_mouse_enter(&mut self, _ctx: &mut Context) -> Result<bool> {
        record(&self.name, "enter");
        Ok(false)
    }

    fn handle_mouse_exit(&mut self, _ctx: &mut Context) -> Result<bool> {
        record(&self.name, "exit");
        Ok(false)
    }

    fn handle_keydown(
        &mut self,
        _event: &KeyEvent,
        keystroke: &str,
        _ctx: &mut Context,
    ) -> Result<KeyOutcome> {
        record(&self.name, &format!("key:{keystroke}"));
        Ok(self.keys)
    }

    fn focus_gained(&mut self, _ctx: &mut Context) -> Result<()> {
        record(&self.name, "focus_gained");
        Ok(())
    }

    fn focus_lost(&mut self, _ctx: &mut Context) -> Result<()> {
        record(&self.name, "focus_lost");
        Ok(())
    }

    fn name(&self) -> NodeName {
        self.name.clone()
    }
}
