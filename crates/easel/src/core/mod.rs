#![allow(clippy::new_without_default)]
//! Core types: the node arena, layout, rendering, input and the frame pump.

/// The frame pump.
pub mod app;
/// Typed node attributes.
pub mod attrs;
/// Platform backends.
pub mod backend;
/// RGBA colors.
pub mod color;
/// Widget contexts.
pub mod context;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Node ID types.
pub mod id;
/// Input routing.
pub mod input;
/// The two-axis layout engine.
pub mod layout;
/// Node data.
pub mod node;
/// Surface assignment, partial redraw and compositing.
pub mod render;
/// Settings and application configuration.
pub mod settings;
/// Shared node name types.
pub mod state;
/// Pixel surfaces.
pub mod surface;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Deferred callbacks.
pub mod timer;
/// The node tree.
pub mod tree;
/// Viewports and clipping.
pub mod viewport;

pub use app::App;
pub use context::Context;
pub use id::NodeId;
pub use tree::Tree;
