//! The frame pump.

use std::time::{Duration, Instant};

use scopeguard::guard;
use tracing::{debug, warn};

use crate::{
    NodeId, Tree,
    core::backend::Backend,
    error::Result,
    event::Event,
    geom::Rect,
    settings::AppConfig,
};

/// An application: a tree drawn onto a backend's display, driven one frame at
/// a time.
pub struct App<B: Backend> {
    /// The platform.
    backend: B,
    /// The widget tree.
    tree: Tree,
    /// Pump configuration.
    config: AppConfig,
    /// Set when the pump should stop.
    exiting: bool,
}

impl<B: Backend> App<B> {
    /// Build an app drawing onto `backend`'s display. The configured settings
    /// are applied to the root.
    pub fn new(mut backend: B, config: AppConfig) -> Result<Self> {
        config.settings.validate()?;
        let mut tree = Tree::new(backend.screen_surface()?);
        let root = tree.root();
        tree.apply_settings(root, &config.settings)?;
        Ok(Self {
            backend,
            tree,
            config,
            exiting: false,
        })
    }

    /// The widget tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The widget tree, mutably.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Add a top-level window. The configured settings cascade into it.
    pub fn add_window(&mut self, window: NodeId) -> Result<()> {
        let root = self.tree.root();
        self.tree.append_child(root, window)?;
        self.tree.apply_settings(window, &self.config.settings)?;
        self.tree.relayout(root);
        Ok(())
    }

    /// Detach a top-level window. The node stays in the arena and can be
    /// added again.
    pub fn remove_window(&mut self, window: NodeId) -> Result<()> {
        self.tree.detach(window)?;
        let root = self.tree.root();
        self.tree.relayout(root);
        Ok(())
    }

    /// Ask the pump to stop after the current frame.
    pub fn quit(&mut self) {
        self.exiting = true;
    }

    /// Has a quit been requested?
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// Dispatch one backend event. Returns true if something handled it.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Quit => {
                self.exiting = true;
                Ok(true)
            }
            Event::Expose => {
                let root = self.tree.root();
                self.tree.redraw(root);
                Ok(true)
            }
            Event::Resize(size) => {
                debug!("resize to {}x{}", size.w, size.h);
                let surface = self.backend.screen_surface()?;
                self.tree.set_screen(surface)?;
                Ok(true)
            }
            Event::Key(k) => self.tree.key(&k),
            Event::Mouse(m) => self.tree.mouse(m),
        }
    }

    /// Lay out and draw whatever is pending and present it. Returns the
    /// presented regions.
    pub fn update(&mut self) -> Result<Vec<Rect>> {
        let regions = self.tree.update()?;
        if !regions.is_empty() {
            self.backend.present(&regions)?;
        }
        Ok(regions)
    }

    /// Run one frame at time `now`: wait up to `timeout` for events, dispatch
    /// them, fire due timers, then update and present.
    pub fn step(&mut self, now: Instant, timeout: Duration) -> Result<Vec<Rect>> {
        self.tree.set_now(now);
        for event in self.backend.poll_events(timeout)? {
            self.handle_event(event)?;
            if self.exiting {
                break;
            }
        }
        self.tree.fire_timers(self.config.timer_slack())?;
        self.update()
    }

    /// How long the next frame may wait for input: a frame interval, or less
    /// if a timer is due sooner.
    pub fn next_timeout(&self) -> Duration {
        let frame = self.config.frame_interval();
        self.tree
            .next_timer()
            .map(|t| t.min(frame))
            .unwrap_or(frame)
    }

    /// Run until quit. The backend is started first and stopped on the way
    /// out, including on error.
    pub fn run(&mut self) -> Result<()> {
        self.backend.start()?;
        let mut app = guard(self, |app| {
            if let Err(e) = app.backend.stop() {
                warn!("backend stop failed: {e}");
            }
        });
        app.tree.set_now(Instant::now());
        app.update()?;
        while !app.exiting {
            let timeout = app.next_timeout();
            app.step(Instant::now(), timeout)?;
        }
        Ok(())
    }
}
