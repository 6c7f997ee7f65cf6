use std::{
    any::{Any, type_name},
    collections::HashSet,
    time::{Duration, Instant},
};

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::{
    attrs::Attrs,
    core::{
        context::Context,
        id::NodeId,
        input, layout,
        node::{LayoutState, Node, Paint},
        render,
        surface::Surface,
        timer::{TimerCallback, TimerId, Timers},
        viewport,
    },
    error::{Error, Result},
    event::{key::KeyEvent, mouse::MouseEvent},
    geom::{Axis, Expanse, Rect},
    settings::Settings,
    widget::Widget,
    widgets::Screen,
};

/// Upper bound on layout passes per update; a widget that requests a
/// relayout from every pass would otherwise spin forever.
const MAX_LAYOUT_PASSES: usize = 8;

/// The widget tree: a node arena rooted at a [`Screen`], plus the per-tree
/// focus pointer, timers and clock.
pub struct Tree {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node ID.
    pub(crate) root: NodeId,
    /// Currently focused node.
    pub(crate) focus: Option<NodeId>,
    /// The display surface the root draws into.
    pub(crate) screen: Surface,
    /// Scheduled callbacks.
    pub(crate) timers: Timers,
    /// The pump's notion of the current time.
    pub(crate) now: Instant,
    /// Focus hooks deferred because the widget was out of its slot.
    pending_focus: Vec<(NodeId, bool)>,
}

impl Tree {
    /// Create a tree whose root screen draws into `screen`.
    pub fn new(screen: Surface) -> Self {
        let widget = Screen::new();
        let attrs = widget.attrs().fixed_size(screen.size());
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(Box::new(widget), attrs));
        Self {
            nodes,
            root,
            focus: None,
            screen,
            timers: Timers::default(),
            now: Instant::now(),
            pending_focus: vec![],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The display surface.
    pub fn screen(&self) -> &Surface {
        &self.screen
    }

    /// Replace the display surface, e.g. after a resize. The root takes the
    /// new size and the whole tree is laid out again.
    pub fn set_screen(&mut self, screen: Surface) -> Result<()> {
        let size = screen.size();
        self.screen = screen;
        let root = self.node_mut(self.root)?;
        root.attrs.width = size.w;
        root.attrs.height = size.h;
        self.relayout(self.root);
        Ok(())
    }

    /// The pump's current time.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance the pump's clock.
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    /// Look up a node.
    pub fn node(&self, id: impl Into<NodeId>) -> Result<&Node> {
        let id = id.into();
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Look up a node mutably.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Is the node in the arena?
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// A node's parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// A node's children.
    pub fn children(&self, id: impl Into<NodeId>) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// A node's attributes.
    pub fn attrs(&self, id: impl Into<NodeId>) -> Result<Attrs> {
        Ok(self.node(id)?.attrs)
    }

    /// Modify a node's attributes directly. The tree is laid out and the node
    /// redrawn on the next update.
    pub fn update_attrs(&mut self, id: NodeId, f: impl FnOnce(&mut Attrs)) -> Result<()> {
        f(&mut self.node_mut(id)?.attrs);
        self.relayout(id);
        self.redraw(id);
        Ok(())
    }

    /// Add a widget as a new detached node with no children or overrides.
    pub fn add(&mut self, widget: impl Widget) -> Result<NodeId> {
        self.create(widget, vec![], &Settings::default())
    }

    /// Create a detached node. Every override key must name an attribute or a
    /// widget setting; anything else is a configuration error. The children
    /// must themselves be detached.
    pub fn create(
        &mut self,
        widget: impl Widget,
        children: Vec<NodeId>,
        overrides: &Settings,
    ) -> Result<NodeId> {
        let mut widget: Box<dyn Widget> = Box::new(widget);
        let mut attrs = widget.attrs();
        for (k, v) in overrides.iter() {
            if !attrs.apply(k, v)? && !widget.apply_setting(k, v)? {
                return Err(Error::Config(format!(
                    "{} does not have attribute {k:?}",
                    widget.name()
                )));
            }
        }
        let id = self.nodes.insert(Node::new(widget, attrs));
        for child in children {
            self.append_child(id, child)?;
        }
        self.with_widget(id, |w, ctx| w.mount(ctx))?;
        Ok(id)
    }

    /// Append a detached node to a parent's children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let len = self.node(parent)?.children.len();
        self.insert_child(parent, len, child)
    }

    /// Insert a detached node into a parent's children at an index.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        self.check_detached(child)?;
        if self.is_ancestor(child, parent) {
            return Err(Error::Invariant(format!(
                "{child:?} cannot be inserted into its own subtree"
            )));
        }
        let p = self.node_mut(parent)?;
        let index = index.min(p.children.len());
        p.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Check a node exists, is not the root and has no parent.
    fn check_detached(&self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        if id == self.root || node.parent.is_some() {
            return Err(Error::Invariant(format!("{id:?} is already attached")));
        }
        Ok(())
    }

    /// Is `ancestor` equal to `id` or one of its ancestors?
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Is the node reachable from the root?
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_ancestor(self.root, id)
    }

    /// Remove a node from its parent, keeping it and its subtree in the
    /// arena for later reattachment.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        let p = self.node_mut(parent)?;
        p.children.retain(|c| *c != id);
        p.forget_child(id);
        self.node_mut(id)?.parent = None;
        self.redraw(parent);
        Ok(())
    }

    /// Detach a node and drop it and its whole subtree.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::Invariant("cannot remove the root".into()));
        }
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.remove(n) {
                stack.extend(node.children);
            }
            if self.focus == Some(n) {
                self.focus = None;
            }
        }
        Ok(())
    }

    /// Replace a node's children. Old children not in the new list are
    /// detached; new children must be detached or already children of
    /// `parent`, and may not repeat.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = children.iter().find(|c| !seen.insert(**c)) {
            return Err(Error::Invariant(format!(
                "{dup:?} appears twice in the children of {parent:?}"
            )));
        }
        let old = self.node(parent)?.children.clone();
        for c in &old {
            if !children.contains(c) {
                self.detach(*c)?;
            }
        }
        for c in &children {
            if !old.contains(c) {
                self.check_detached(*c)?;
            }
        }
        for c in &children {
            self.node_mut(*c)?.parent = Some(parent);
        }
        self.node_mut(parent)?.children = children;
        self.redraw(parent);
        Ok(())
    }

    /// Rebind parent and depth links from the root down. Focus held by a node
    /// no longer reachable from the root is cleared.
    pub fn resolve_tree(&mut self) {
        let mut reachable = HashSet::new();
        let mut stack = vec![(self.root, None, 0)];
        while let Some((id, parent, depth)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.parent = parent;
            node.depth = depth;
            reachable.insert(id);
            for c in node.children.iter().rev() {
                stack.push((*c, Some(id), depth + 1));
            }
        }
        if let Some(f) = self.focus
            && !reachable.contains(&f)
        {
            warn!("focus holder {f:?} is detached, clearing focus");
            self.focus = None;
            if let Some(n) = self.nodes.get_mut(f) {
                n.focused = false;
            }
        }
    }

    /// Mark a node as needing a redraw.
    pub fn redraw(&mut self, id: NodeId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.paint = Paint::Dirty;
        }
    }

    /// Mark a node's surface as current.
    pub(crate) fn mark_clean(&mut self, id: NodeId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.paint = Paint::Clean;
        }
    }

    /// Request a full relayout on the next update.
    pub fn relayout(&mut self, id: NodeId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.layout = LayoutState::NeedsLayout;
        }
    }

    /// Record that a node was laid out with its current children.
    pub(crate) fn mark_laid_out(&mut self, id: NodeId) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.layout = LayoutState::LaidOut(n.children.clone());
        }
    }

    /// Does any node under the root need layout?
    pub fn needs_layout(&self) -> bool {
        self.subtree_needs_layout(self.root)
    }

    /// Does any node in this subtree need layout?
    fn subtree_needs_layout(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        node.children_changed() || node.children.iter().any(|c| self.subtree_needs_layout(*c))
    }

    /// The dirty frontier: the topmost dirty nodes, in paint order.
    pub fn to_redraw(&self) -> Vec<NodeId> {
        let mut out = vec![];
        self.collect_dirty(self.root, &mut out);
        out
    }

    /// Frontier collection for one subtree.
    fn collect_dirty(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.paint == Paint::Dirty {
            out.push(id);
        } else {
            for c in &node.children {
                self.collect_dirty(*c, out);
            }
        }
    }

    /// Take a node's widget out of its slot for a single call.
    pub(crate) fn with_slot<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> Result<R>,
    ) -> Result<R> {
        let mut widget = self
            .node_mut(id)?
            .widget
            .take()
            .ok_or(Error::ReentrantWidget(id))?;
        let out = f(&mut *widget, self);
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        let out = out?;
        self.flush_focus_hooks(id)?;
        Ok(out)
    }

    /// Call a widget with a context bound to its node.
    pub fn with_widget<R>(
        &mut self,
        id: impl Into<NodeId>,
        f: impl FnOnce(&mut dyn Widget, &mut Context<'_>) -> Result<R>,
    ) -> Result<R> {
        let id = id.into();
        self.with_slot(id, |w, tree| f(w, &mut Context::new(tree, id)))
    }

    /// Call a widget of a known concrete type.
    pub fn with_widget_as<W: Widget, R>(
        &mut self,
        id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut Context<'_>) -> Result<R>,
    ) -> Result<R> {
        self.with_widget(id, |w, ctx| {
            let any = w as &mut dyn Any;
            let w = any
                .downcast_mut::<W>()
                .ok_or_else(|| Error::WidgetType(type_name::<W>().into()))?;
            f(w, ctx)
        })
    }

    /// Borrow a widget of a known concrete type.
    pub fn widget<W: Widget>(&self, id: impl Into<NodeId>) -> Result<&W> {
        let id = id.into();
        let w = self
            .node(id)?
            .widget
            .as_deref()
            .ok_or(Error::ReentrantWidget(id))?;
        (w as &dyn Any)
            .downcast_ref::<W>()
            .ok_or_else(|| Error::WidgetType(type_name::<W>().into()))
    }

    /// Apply a settings map to a node and its subtree: generic entries then
    /// entries keyed by the node's type name, applied to the node's attributes
    /// and widget, then the children, then the `settings_updated` hook. Keys a
    /// node does not know are skipped.
    pub fn apply_settings(&mut self, id: NodeId, settings: &Settings) -> Result<()> {
        settings.validate()?;
        self.apply_settings_at(id, settings)?;
        self.relayout(id);
        Ok(())
    }

    /// Settings cascade for one node.
    fn apply_settings_at(&mut self, id: NodeId, settings: &Settings) -> Result<()> {
        let name = self.node(id)?.name.clone();
        for (k, v) in settings.resolved_for(name.as_str()) {
            self.node_mut(id)?.attrs.apply(k, v)?;
            self.with_slot(id, |w, _| w.apply_setting(k, v))?;
        }
        self.redraw(id);
        for c in self.node(id)?.children.clone() {
            self.apply_settings_at(c, settings)?;
        }
        self.with_widget(id, |w, ctx| w.settings_updated(ctx))
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus
    }

    /// Give a node keyboard focus. The previous holder gets `focus_lost`, the
    /// new one `focus_gained`, and both are redrawn.
    pub fn focus(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        let old = self.focus;
        if old == Some(id) {
            return Ok(());
        }
        debug!("focus {:?} -> {id:?}", old);
        self.focus = Some(id);
        if let Some(old) = old
            && let Some(n) = self.nodes.get_mut(old)
        {
            n.focused = false;
            self.focus_hook(old, false)?;
            self.redraw(old);
        }
        self.node_mut(id)?.focused = true;
        self.focus_hook(id, true)?;
        self.redraw(id);
        Ok(())
    }

    /// Drop focus from a node, which must hold it.
    pub fn unfocus(&mut self, id: NodeId) -> Result<()> {
        if self.focus != Some(id) {
            return Err(Error::Invariant(format!(
                "unfocus of {id:?}, which does not hold focus"
            )));
        }
        debug!("unfocus {id:?}");
        self.focus = None;
        self.node_mut(id)?.focused = false;
        self.focus_hook(id, false)?;
        self.redraw(id);
        Ok(())
    }

    /// Run a focus hook, deferring it if the widget is mid-call.
    fn focus_hook(&mut self, id: NodeId, gained: bool) -> Result<()> {
        let res = self.with_widget(id, |w, ctx| {
            if gained {
                w.focus_gained(ctx)
            } else {
                w.focus_lost(ctx)
            }
        });
        match res {
            Err(Error::ReentrantWidget(n)) if n == id => {
                self.pending_focus.push((id, gained));
                Ok(())
            }
            r => r,
        }
    }

    /// Run focus hooks deferred for a widget that is back in its slot.
    fn flush_focus_hooks(&mut self, id: NodeId) -> Result<()> {
        if !self.pending_focus.iter().any(|(n, _)| *n == id) {
            return Ok(());
        }
        let (mine, rest): (Vec<_>, Vec<_>) =
            self.pending_focus.drain(..).partition(|(n, _)| *n == id);
        self.pending_focus = rest;
        for (n, gained) in mine {
            self.focus_hook(n, gained)?;
        }
        Ok(())
    }

    /// Minimum size of a node along an axis.
    pub fn min_size(&self, id: NodeId, axis: Axis) -> u32 {
        layout::min_size(self, id, axis)
    }

    /// Maximum size of a node along an axis.
    pub fn max_size(&self, id: NodeId, axis: Axis) -> u32 {
        layout::max_size(self, id, axis)
    }

    /// Run one full layout pass over the tree.
    pub fn layout(&mut self) -> Result<()> {
        layout::run(self)
    }

    /// Draw the dirty frontier, composite and return the screen regions to
    /// present.
    pub fn render(&mut self) -> Result<Vec<Rect>> {
        render::run(self)
    }

    /// Lay out while any structural change is pending, then render.
    pub fn update(&mut self) -> Result<Vec<Rect>> {
        let mut passes = 0;
        while self.needs_layout() {
            if passes == MAX_LAYOUT_PASSES {
                return Err(Error::Invariant(format!(
                    "layout did not settle after {MAX_LAYOUT_PASSES} passes"
                )));
            }
            self.layout()?;
            passes += 1;
        }
        self.render()
    }

    /// Set or clear a node's viewport. The viewport is clamped into the
    /// node's content bounds.
    pub fn set_viewport(&mut self, id: NodeId, viewport: Option<Rect>) -> Result<()> {
        viewport::set(self, id, viewport)
    }

    /// Scroll a node's viewport minimally so `target` is visible.
    pub fn ensure_visible(&mut self, id: NodeId, target: Rect) -> Result<()> {
        viewport::ensure_visible(self, id, target)
    }

    /// The on-screen region a node occupies, after viewport clipping.
    pub fn screen_rect(&self, id: NodeId) -> Option<Rect> {
        viewport::screen_rect(self, id)
    }

    /// Route a mouse event from the root. Returns true if a node accepted it.
    pub fn mouse(&mut self, event: MouseEvent) -> Result<bool> {
        input::mouse(self, event)
    }

    /// Route a key press along the focus chain. Returns true if consumed.
    pub fn key(&mut self, event: &KeyEvent) -> Result<bool> {
        input::key(self, event)
    }

    /// Schedule a callback `delay` after the tree's current time.
    pub fn call_later(
        &mut self,
        delay: Duration,
        f: impl FnOnce(&mut Self) -> Result<()> + 'static,
    ) -> TimerId {
        let at = self.now + delay;
        self.timers.schedule(at, Box::new(f) as TimerCallback)
    }

    /// Cancel a scheduled callback. Unknown, fired or cancelled timers are
    /// ignored.
    pub fn cancel_call(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }

    /// Time until the next scheduled callback is due.
    pub fn next_timer(&self) -> Option<Duration> {
        self.timers.next_due(self.now)
    }

    /// Fire callbacks due within `slack` of now, in expiry order. Callbacks
    /// scheduled while firing wait for the next round. If a callback fails,
    /// the round stops and the unfired timers stay scheduled.
    pub fn fire_timers(&mut self, slack: Duration) -> Result<usize> {
        let mut due = self.timers.take_due(self.now + slack).into_iter();
        let mut fired = 0;
        while let Some((id, _)) = due.next() {
            let Some(cb) = self.timers.claim(id) else {
                continue;
            };
            if let Err(e) = cb(self) {
                for (id, at) in due {
                    self.timers.requeue(id, at);
                }
                return Err(e);
            }
            fired += 1;
        }
        Ok(fired)
    }

    /// Current size of the display.
    pub fn screen_size(&self) -> Expanse {
        self.screen.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::testing::widgets::Block, widgets::Panel};

    /// A 40x30 screen tree.
    fn tree() -> Tree {
        Tree::new(Surface::new(Expanse::new(40, 30)))
    }

    #[test]
    fn structural_ops() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let a = t.add(Block::fixed(1, 1))?;
        let b = t.add(Block::fixed(1, 1))?;
        let c = t.add(Block::fixed(1, 1))?;
        t.append_child(root, a)?;
        t.append_child(root, b)?;
        t.insert_child(root, 0, c)?;
        assert_eq!(t.children(root)?, &[c, a, b]);
        t.resolve_tree();
        assert_eq!(t.node(a)?.depth(), 1);
        assert_eq!(t.parent(a), Some(root));

        t.detach(a)?;
        assert_eq!(t.children(root)?, &[c, b]);
        assert!(t.contains(a));
        assert!(!t.is_attached(a));
        assert!(t.node(root)?.is_dirty());

        t.append_child(c, a)?;
        t.resolve_tree();
        assert_eq!(t.node(a)?.depth(), 2);
        assert!(t.is_attached(a));
        Ok(())
    }

    #[test]
    fn attach_errors() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let q = t.add(Block::fixed(1, 1))?;
        let p = t.create(Panel::new(), vec![q], &Settings::new())?;
        assert!(matches!(t.append_child(q, p), Err(Error::Invariant(_))));
        assert!(matches!(t.append_child(root, q), Err(Error::Invariant(_))));
        assert!(matches!(t.append_child(p, root), Err(Error::Invariant(_))));
        Ok(())
    }

    #[test]
    fn remove_subtree_drops_nodes() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let q = t.add(Block::fixed(1, 1))?;
        let p = t.create(Panel::new(), vec![q], &Settings::new())?;
        t.append_child(root, p)?;
        t.focus(q)?;
        t.remove_subtree(p)?;
        assert!(!t.contains(p));
        assert!(!t.contains(q));
        assert_eq!(t.focused(), None);
        assert!(t.children(root)?.is_empty());
        assert!(matches!(t.remove_subtree(root), Err(Error::Invariant(_))));
        Ok(())
    }

    #[test]
    fn set_children_detaches_dropped() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let a = t.add(Block::fixed(1, 1))?;
        let b = t.add(Block::fixed(1, 1))?;
        t.append_child(root, a)?;
        t.set_children(root, vec![b, a])?;
        assert_eq!(t.children(root)?, &[b, a]);
        t.set_children(root, vec![b])?;
        assert_eq!(t.parent(a), None);
        assert_eq!(t.parent(b), Some(root));
        Ok(())
    }

    #[test]
    fn set_children_rejects_duplicates() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let a = t.add(Block::fixed(1, 1))?;
        let b = t.add(Block::fixed(1, 1))?;
        t.append_child(root, a)?;
        assert!(matches!(
            t.set_children(root, vec![b, b]),
            Err(Error::Invariant(_))
        ));
        assert!(matches!(
            t.set_children(root, vec![a, b, a]),
            Err(Error::Invariant(_))
        ));
        assert_eq!(t.children(root)?, &[a]);
        assert_eq!(t.parent(b), None);
        Ok(())
    }

    #[test]
    fn detached_focus_is_cleared() -> Result<()> {
        let mut t = tree();
        let root = t.root();
        let a = t.add(Block::fixed(1, 1))?;
        t.append_child(root, a)?;
        t.focus(a)?;
        assert_eq!(t.focused(), Some(a));
        t.detach(a)?;
        t.resolve_tree();
        assert_eq!(t.focused(), None);
        assert!(matches!(t.unfocus(a), Err(Error::Invariant(_))));
        Ok(())
    }

    #[test]
    fn widget_slot_access() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(1, 1))?;
        assert!(t.widget::<Block>(a).is_ok());
        assert!(matches!(t.widget::<Panel>(a), Err(Error::WidgetType(_))));
        let inner = t.with_widget(a, |_, ctx| {
            let id = ctx.id();
            Ok(ctx.tree().with_widget(id, |_, _| Ok(())))
        })?;
        assert!(matches!(inner, Err(Error::ReentrantWidget(n)) if n == a));
        // The slot is restored afterwards.
        assert!(t.widget::<Block>(a).is_ok());
        Ok(())
    }
}
