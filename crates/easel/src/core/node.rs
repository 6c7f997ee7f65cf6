use std::collections::HashMap;

use crate::{
    attrs::Attrs,
    core::{id::NodeId, surface::Surface},
    event::mouse::MouseButton,
    geom::{Expanse, Point, Rect},
    state::NodeName,
    widget::Widget,
};

/// Whether a node's surface reflects its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// The surface is current.
    Clean,
    /// The node must be fully redrawn before the next presentation.
    Dirty,
}

/// Whether a node's children have changed since the last layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutState {
    /// A relayout was requested explicitly.
    NeedsLayout,
    /// Laid out with this children sequence.
    LaidOut(Vec<NodeId>),
}

/// Which node owns a mouse button's press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The node's own widget accepted the press.
    Own,
    /// A child (and its subtree) accepted the press.
    Child(NodeId),
}

/// Per-node mouse bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Capture target per button.
    pub(crate) captures: HashMap<MouseButton, Capture>,
    /// Children currently under the pointer.
    pub(crate) hovered: Vec<NodeId>,
    /// Whether the pointer is over this node.
    pub(crate) has_mouse: bool,
}

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior and state.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Node name, also the type-specific settings key.
    pub(crate) name: NodeName,
    /// Layout and appearance attributes.
    pub(crate) attrs: Attrs,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in paint order.
    pub(crate) children: Vec<NodeId>,
    /// Distance from the root, set by tree resolution.
    pub(crate) depth: usize,

    /// Absolute position accumulated by layout, in content coordinates.
    pub(crate) pos: Point,
    /// Finalized absolute rectangle.
    pub(crate) rect: Rect,
    /// Rectangle relative to the parent's rectangle.
    pub(crate) rel_rect: Rect,
    /// Visible window into oversized content, in content coordinates.
    pub(crate) viewport: Option<Rect>,
    /// Drawable assigned during surface setup.
    pub(crate) surface: Option<Surface>,

    /// Redraw state.
    pub(crate) paint: Paint,
    /// Layout state.
    pub(crate) layout: LayoutState,
    /// Whether this node holds keyboard focus.
    pub(crate) focused: bool,
    /// Mouse capture and hover state.
    pub(crate) mouse: MouseState,
}

impl Node {
    /// Build a detached node around a widget.
    pub(crate) fn new(widget: Box<dyn Widget>, attrs: Attrs) -> Self {
        Self {
            name: widget.name(),
            widget: Some(widget),
            attrs,
            parent: None,
            children: vec![],
            depth: 0,
            pos: Point::zero(),
            rect: Rect::zero(),
            rel_rect: Rect::zero(),
            viewport: None,
            surface: None,
            paint: Paint::Dirty,
            layout: LayoutState::NeedsLayout,
            focused: false,
            mouse: MouseState::default(),
        }
    }

    /// Return the node's widget name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// Return the node's attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Distance from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Absolute rectangle from the last layout.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rectangle relative to the parent.
    pub fn rel_rect(&self) -> Rect {
        self.rel_rect
    }

    /// Current size.
    pub fn size(&self) -> Expanse {
        self.attrs.expanse()
    }

    /// The viewport, if this node has one.
    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Content bounds: the larger of the node's size and its viewport size.
    pub fn content_bounds(&self) -> Rect {
        let size = self.size();
        match self.viewport {
            Some(vp) => Expanse::new(size.w.max(vp.w), size.h.max(vp.h)).rect(),
            None => size.rect(),
        }
    }

    /// The node's drawable.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Is a redraw pending?
    pub fn is_dirty(&self) -> bool {
        self.paint == Paint::Dirty
    }

    /// Does this node hold focus?
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Is the pointer over this node?
    pub fn has_mouse(&self) -> bool {
        self.mouse.has_mouse
    }

    /// Children currently hovered.
    pub fn hovered(&self) -> &[NodeId] {
        &self.mouse.hovered
    }

    /// Capture target for a mouse button.
    pub fn capture(&self, button: MouseButton) -> Option<Capture> {
        self.mouse.captures.get(&button).copied()
    }

    /// Has the children sequence changed since the last layout?
    pub(crate) fn children_changed(&self) -> bool {
        match &self.layout {
            LayoutState::NeedsLayout => true,
            LayoutState::LaidOut(snapshot) => *snapshot != self.children,
        }
    }

    /// Forget a child that has left this node.
    pub(crate) fn forget_child(&mut self, child: NodeId) {
        self.mouse
            .captures
            .retain(|_, c| *c != Capture::Child(child));
        self.mouse.hovered.retain(|h| *h != child);
    }
}
