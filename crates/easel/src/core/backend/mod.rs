/// In-memory backend for tests and headless use.
pub mod test;

use std::time::Duration;

use crate::{
    core::surface::Surface,
    error::Result,
    event::Event,
    geom::{Expanse, Rect},
};

/// The platform side of an application: the display, the event source and
/// the means of showing finished frames.
pub trait Backend {
    /// Take over the display.
    fn start(&mut self) -> Result<()>;

    /// Release the display.
    fn stop(&mut self) -> Result<()>;

    /// Current display size.
    fn screen_size(&self) -> Expanse;

    /// The surface the tree should draw into. Called at startup and after a
    /// resize.
    fn screen_surface(&mut self) -> Result<Surface>;

    /// Wait up to `timeout` for events and return every event available.
    /// An empty result means the timeout expired.
    fn poll_events(&mut self, timeout: Duration) -> Result<Vec<Event>>;

    /// Show the given screen regions of the display surface.
    fn present(&mut self, rects: &[Rect]) -> Result<()>;
}
