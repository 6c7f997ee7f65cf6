use std::time::Duration;

use crate::{
    attrs::Attrs,
    color::Color,
    core::{
        id::NodeId,
        render,
        surface::Surface,
        timer::TimerId,
        tree::Tree,
    },
    error::{Error, Result},
    geom::{Expanse, Rect},
    widget::Widget,
};

/// A widget's handle on the tree while one of its hooks runs. The widget
/// itself is out of its slot for the duration of the call, so the context can
/// reach every other node freely.
pub struct Context<'a> {
    /// The tree.
    tree: &'a mut Tree,
    /// The node whose widget is being called.
    node: NodeId,
}

impl<'a> Context<'a> {
    /// Bind a context to a node.
    pub(crate) fn new(tree: &'a mut Tree, node: NodeId) -> Self {
        Self { tree, node }
    }

    /// The node this context is bound to.
    pub fn id(&self) -> NodeId {
        self.node
    }

    /// The whole tree.
    pub fn tree(&mut self) -> &mut Tree {
        self.tree
    }

    /// The whole tree, read-only.
    pub fn tree_ref(&self) -> &Tree {
        self.tree
    }

    /// This node's attributes.
    pub fn attrs(&self) -> Result<Attrs> {
        self.tree.attrs(self.node)
    }

    /// Modify this node's attributes; triggers relayout and redraw.
    pub fn update_attrs(&mut self, f: impl FnOnce(&mut Attrs)) -> Result<()> {
        self.tree.update_attrs(self.node, f)
    }

    /// This node's current size.
    pub fn size(&self) -> Result<Expanse> {
        Ok(self.tree.node(self.node)?.size())
    }

    /// This node's absolute rect.
    pub fn rect(&self) -> Result<Rect> {
        Ok(self.tree.node(self.node)?.rect())
    }

    /// This node's viewport.
    pub fn viewport(&self) -> Result<Option<Rect>> {
        Ok(self.tree.node(self.node)?.viewport())
    }

    /// This node's parent.
    pub fn parent(&self) -> Option<NodeId> {
        self.tree.parent(self.node)
    }

    /// This node's children.
    pub fn children(&self) -> Result<Vec<NodeId>> {
        Ok(self.tree.children(self.node)?.to_vec())
    }

    /// Create a widget and append it as a child of this node.
    pub fn add_child(&mut self, widget: impl Widget) -> Result<NodeId> {
        let id = self.tree.add(widget)?;
        self.tree.append_child(self.node, id)?;
        Ok(id)
    }

    /// This node's drawable.
    pub fn surface(&self) -> Result<Surface> {
        self.tree
            .node(self.node)?
            .surface()
            .cloned()
            .ok_or_else(|| Error::Internal(format!("{:?} has no surface", self.node)))
    }

    /// The background this node shows: its own, or the nearest ancestor's.
    pub fn background(&self) -> Option<Color> {
        render::inherited_bgcolor(self.tree, self.node)
    }

    /// Does this node hold focus?
    pub fn has_focus(&self) -> bool {
        self.tree.focused() == Some(self.node)
    }

    /// Is the pointer over this node?
    pub fn has_mouse(&self) -> bool {
        self.tree
            .node(self.node)
            .map(|n| n.has_mouse())
            .unwrap_or(false)
    }

    /// Focus this node.
    pub fn focus(&mut self) -> Result<()> {
        self.tree.focus(self.node)
    }

    /// Drop focus from this node.
    pub fn unfocus(&mut self) -> Result<()> {
        self.tree.unfocus(self.node)
    }

    /// Mark this node for redraw.
    pub fn redraw(&mut self) {
        self.tree.redraw(self.node);
    }

    /// Request a relayout.
    pub fn relayout(&mut self) {
        self.tree.relayout(self.node);
    }

    /// Schedule a callback.
    pub fn call_later(
        &mut self,
        delay: Duration,
        f: impl FnOnce(&mut Tree) -> Result<()> + 'static,
    ) -> TimerId {
        self.tree.call_later(delay, f)
    }

    /// Cancel a scheduled callback.
    pub fn cancel_call(&mut self, id: TimerId) {
        self.tree.cancel_call(id);
    }
}
