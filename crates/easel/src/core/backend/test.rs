use std::{
    cell::{RefCell, RefMut},
    collections::VecDeque,
    rc::Rc,
    time::Duration,
};

use super::Backend;
use crate::{
    color::Color,
    core::surface::Surface,
    error::{Error, Result},
    event::{
        Event,
        key::KeyEvent,
        mouse::{MouseButton, MouseEvent},
    },
    geom::{Expanse, Point, Rect},
};

/// State shared between a [`TestBackend`] and the test driving it.
pub struct TestScreen {
    /// The display.
    pub surface: Surface,
    /// Events waiting to be polled.
    pub events: VecDeque<Event>,
    /// Region lists passed to `present`, in order.
    pub presented: Vec<Vec<Rect>>,
    /// Number of `start` calls.
    pub starts: usize,
    /// Number of `stop` calls.
    pub stops: usize,
    /// Number of `poll_events` calls.
    pub polls: usize,
}

impl TestScreen {
    /// Queue an event.
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Queue a key press.
    pub fn key(&mut self, event: impl Into<KeyEvent>) {
        self.push(Event::Key(event.into()));
    }

    /// Queue a button press and release at one position.
    pub fn click(&mut self, button: MouseButton, pos: impl Into<Point>) {
        let pos = pos.into();
        self.push(Event::Mouse(MouseEvent::Down { button, pos }));
        self.push(Event::Mouse(MouseEvent::Up { button, pos }));
    }

    /// Replace the display with a new one of the given size and queue the
    /// resize event.
    pub fn resize(&mut self, size: Expanse) {
        self.surface = Surface::new(size);
        self.push(Event::Resize(size));
    }

    /// A display pixel.
    pub fn pixel(&self, p: impl Into<Point>) -> Option<Color> {
        self.surface.pixel(p.into())
    }
}

/// A backend with an in-memory display and a scripted event queue.
pub struct TestBackend {
    /// Shared state.
    screen: Rc<RefCell<TestScreen>>,
}

impl TestBackend {
    /// Create a backend with a display of the given size. The returned handle
    /// is used to queue events and inspect the display.
    pub fn create(size: impl Into<Expanse>) -> (Rc<RefCell<TestScreen>>, Self) {
        let screen = Rc::new(RefCell::new(TestScreen {
            surface: Surface::new(size.into()),
            events: VecDeque::new(),
            presented: vec![],
            starts: 0,
            stops: 0,
            polls: 0,
        }));
        (screen.clone(), Self { screen })
    }

    /// Borrow the shared state mutably.
    fn state(&self) -> Result<RefMut<'_, TestScreen>> {
        self.screen
            .try_borrow_mut()
            .map_err(|e| Error::Backend(e.to_string()))
    }
}

impl Backend for TestBackend {
    fn start(&mut self) -> Result<()> {
        self.state()?.starts += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.state()?.stops += 1;
        Ok(())
    }

    fn screen_size(&self) -> Expanse {
        self.screen
            .try_borrow()
            .map(|s| s.surface.size())
            .unwrap_or_default()
    }

    fn screen_surface(&mut self) -> Result<Surface> {
        Ok(self.state()?.surface.clone())
    }

    fn poll_events(&mut self, _timeout: Duration) -> Result<Vec<Event>> {
        let mut s = self.state()?;
        s.polls += 1;
        Ok(s.events.drain(..).collect())
    }

    fn present(&mut self, rects: &[Rect]) -> Result<()> {
        self.state()?.presented.push(rects.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_events() -> Result<()> {
        let (screen, mut b) = TestBackend::create((10, 10));
        b.start()?;
        screen.borrow_mut().click(MouseButton::Left, (1, 2));
        screen.borrow_mut().resize(Expanse::new(20, 5));
        let evts = b.poll_events(Duration::ZERO)?;
        assert_eq!(evts.len(), 3);
        assert_eq!(evts[2], Event::Resize(Expanse::new(20, 5)));
        assert!(b.poll_events(Duration::ZERO)?.is_empty());
        assert_eq!(b.screen_size(), Expanse::new(20, 5));
        b.present(&[Rect::new(0, 0, 1, 1)])?;
        b.stop()?;
        let s = screen.borrow();
        assert_eq!((s.starts, s.stops, s.polls), (1, 1, 2));
        assert_eq!(s.presented, vec![vec![Rect::new(0, 0, 1, 1)]]);
        Ok(())
    }
}
