use std::{
    cell::RefCell,
    rc::Rc,
    time::{Duration, Instant},
};

use crate::{
    App, NodeId, Tree,
    color::Color,
    core::backend::test::{TestBackend, TestScreen},
    error::Result,
    event::{
        key::KeyEvent,
        mouse::{MouseButton, MouseEvent},
    },
    geom::{Expanse, Point, Rect},
    settings::AppConfig,
    widget::Widget,
};

/// An [`App`] on a [`TestBackend`] with a manually advanced clock. Input
/// helpers dispatch straight into the tree, then run a frame.
pub struct Harness {
    /// The app under test.
    pub app: App<TestBackend>,
    /// The backend's display and event queue.
    pub screen: Rc<RefCell<TestScreen>>,
    /// The harness clock.
    now: Instant,
}

impl Harness {
    /// A harness with a display of the given size and default configuration.
    pub fn new(size: impl Into<Expanse>) -> Result<Self> {
        Self::with_config(size, AppConfig::default())
    }

    /// A harness with the given configuration.
    pub fn with_config(size: impl Into<Expanse>, config: AppConfig) -> Result<Self> {
        let (screen, backend) = TestBackend::create(size);
        let app = App::new(backend, config)?;
        let now = Instant::now();
        Ok(Self { app, screen, now })
    }

    /// The tree.
    pub fn tree(&self) -> &Tree {
        self.app.tree()
    }

    /// The tree, mutably.
    pub fn tree_mut(&mut self) -> &mut Tree {
        self.app.tree_mut()
    }

    /// Add a widget as a top-level window.
    pub fn window(&mut self, widget: impl Widget) -> Result<NodeId> {
        let id = self.app.tree_mut().add(widget)?;
        self.app.add_window(id)?;
        Ok(id)
    }

    /// Run one frame without waiting. Returns the presented regions.
    pub fn frame(&mut self) -> Result<Vec<Rect>> {
        self.app.step(self.now, Duration::ZERO)
    }

    /// Move the clock forward and run a frame.
    pub fn advance(&mut self, d: Duration) -> Result<Vec<Rect>> {
        self.now += d;
        self.frame()
    }

    /// Send a key press and run a frame. Returns whether it was consumed.
    pub fn key(&mut self, k: impl Into<KeyEvent>) -> Result<bool> {
        let handled = self.app.tree_mut().key(&k.into())?;
        self.frame()?;
        Ok(handled)
    }

    /// Send a mouse event and run a frame. Returns whether it was accepted.
    pub fn mouse(&mut self, event: MouseEvent) -> Result<bool> {
        let handled = self.app.tree_mut().mouse(event)?;
        self.frame()?;
        Ok(handled)
    }

    /// Press a button at a screen position.
    pub fn press(&mut self, button: MouseButton, pos: impl Into<Point>) -> Result<bool> {
        let pos = pos.into();
        self.mouse(MouseEvent::Down { button, pos })
    }

    /// Release a button at a screen position.
    pub fn release(&mut self, button: MouseButton, pos: impl Into<Point>) -> Result<bool> {
        let pos = pos.into();
        self.mouse(MouseEvent::Up { button, pos })
    }

    /// Move the pointer to a screen position.
    pub fn move_to(&mut self, pos: impl Into<Point>) -> Result<bool> {
        self.mouse(MouseEvent::Move { pos: pos.into() })
    }

    /// Press and release the left button at one position. Returns whether the
    /// press was accepted.
    pub fn click(&mut self, pos: impl Into<Point>) -> Result<bool> {
        let pos = pos.into();
        let pressed = self.press(MouseButton::Left, pos)?;
        self.release(MouseButton::Left, pos)?;
        Ok(pressed)
    }

    /// A display pixel.
    pub fn pixel(&self, p: impl Into<Point>) -> Option<Color> {
        self.screen.borrow().pixel(p)
    }

    /// The number of frames that presented anything.
    pub fn presents(&self) -> usize {
        self.screen.borrow().presented.len()
    }
}
