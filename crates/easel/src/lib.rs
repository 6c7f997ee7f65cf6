//! Easel: a retained-mode widget toolkit for fullscreen graphical
//! applications.
//!
//! A [`Tree`] of nodes, each carrying a [`Widget`], is laid out on two axes,
//! drawn with partial redraw onto shared or independent [`Surface`]s, and fed
//! keyboard and mouse input. An [`App`] pumps frames between the tree and a
//! [`Backend`](backend::Backend).
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Point, Expanse, Rect, Axis)
//! - [`layout`] - The layout engine and its container helpers
//! - [`widgets`] - Built-in widget implementations

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod logging;
pub mod widget;
pub mod widgets;

pub use geom;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    App, Context, NodeId, Tree, app, attrs, backend, color, dump, error, event, layout,
    node, settings, state, surface, timer, viewport,
};
pub use surface::Surface;
pub use widget::{KeyOutcome, Widget};
