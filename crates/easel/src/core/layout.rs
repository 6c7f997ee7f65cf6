//! The two-axis layout engine.
//!
//! A full pass resolves tree links, lays the tree out horizontally and then
//! vertically from the root, and finalizes absolute and parent-relative rects.
//! Each axis pass is top-down: a container asks each child for its minimum and
//! maximum size, assigns sizes and positions, then recurses. Sizes are queried
//! bottom-up through [`Measure`]; assignment happens through [`AxisPass`].

use tracing::{debug, trace};

use crate::{
    attrs::{Align, Attrs, UNLIMITED},
    core::{id::NodeId, render, tree::Tree},
    error::{Error, LayoutConstraint, Result},
    geom::{Axis, Rect},
    widget::Widget,
};

/// Distribute `total` among children with the given size bounds.
///
/// If the maxima fit, every child gets its maximum. Otherwise every child
/// starts at its minimum and the rest is shared as evenly as possible, in
/// ascending order of headroom, capping each child at its maximum and
/// redividing what it could not take among the children still to come. The
/// integer remainder goes to the last children in that order. The result sums
/// to exactly `total` whenever the minima fit.
pub fn divide_space(total: u32, mins: &[u32], maxs: &[u32]) -> Vec<u32> {
    let sum_max: u64 = maxs.iter().map(|m| u64::from(*m)).sum();
    if sum_max <= u64::from(total) {
        return maxs.to_vec();
    }
    let sum_min: u64 = mins.iter().map(|m| u64::from(*m)).sum();
    if sum_min >= u64::from(total) {
        return mins.to_vec();
    }
    let mut remaining = u64::from(total) - sum_min;
    let mut sizes = mins.to_vec();
    let mut order: Vec<(u32, usize)> = mins
        .iter()
        .zip(maxs)
        .enumerate()
        .map(|(i, (lo, hi))| (hi.saturating_sub(*lo), i))
        .collect();
    order.sort();

    let n = order.len() as u64;
    let (mut per, mut rem) = (remaining / n, remaining % n);
    for (gi, (headroom, i)) in order.iter().enumerate() {
        let left = n - gi as u64;
        let target = per + u64::from(left <= rem);
        let grow = target.min(u64::from(*headroom));
        sizes[*i] += grow as u32;
        remaining -= grow;
        if grow < target && left > 1 {
            per = remaining / (left - 1);
            rem = remaining % (left - 1);
        }
    }
    sizes
}

/// Read-only view used by widgets to compute their size bounds.
pub struct Measure<'a> {
    /// The tree being measured.
    tree: &'a Tree,
    /// The node being measured.
    node: NodeId,
}

impl<'a> Measure<'a> {
    /// The node being measured.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The node's attributes.
    pub fn attrs(&self) -> Attrs {
        self.tree
            .nodes
            .get(self.node)
            .map(|n| n.attrs)
            .unwrap_or_default()
    }

    /// The node's children.
    pub fn children(&self) -> &'a [NodeId] {
        self.tree
            .nodes
            .get(self.node)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// A child's minimum size.
    pub fn min(&self, child: NodeId, axis: Axis) -> u32 {
        min_size(self.tree, child, axis)
    }

    /// A child's maximum size.
    pub fn max(&self, child: NodeId, axis: Axis) -> u32 {
        max_size(self.tree, child, axis)
    }

    /// Borrow another node's widget by concrete type.
    pub fn widget<W: Widget>(&self, id: NodeId) -> Option<&'a W> {
        self.tree.widget::<W>(id).ok()
    }

    /// The largest child minimum: children stacked on top of each other.
    pub fn stack_min(&self, axis: Axis) -> u32 {
        self.children()
            .iter()
            .map(|c| self.min(*c, axis))
            .max()
            .unwrap_or(0)
    }

    /// The largest child maximum.
    pub fn stack_max(&self, axis: Axis) -> u32 {
        self.children()
            .iter()
            .map(|c| self.max(*c, axis))
            .max()
            .unwrap_or(0)
    }

    /// Sum of child minima plus spacing: children placed in sequence.
    pub fn sequence_min(&self, axis: Axis) -> u32 {
        self.sequence(|c| self.min(c, axis))
    }

    /// Sum of child maxima plus spacing.
    pub fn sequence_max(&self, axis: Axis) -> u32 {
        self.sequence(|c| self.max(c, axis))
    }

    /// Saturating sum over children plus inter-child spacing.
    fn sequence(&self, f: impl Fn(NodeId) -> u32) -> u32 {
        let children = self.children();
        let gaps = children.len().saturating_sub(1) as u32;
        children.iter().fold(
            self.attrs().spacing.saturating_mul(gaps),
            |acc, c| acc.saturating_add(f(*c)),
        )
    }

    /// A minimum from content: the literal size if fixed, otherwise content
    /// plus margins.
    pub fn bounded_min(&self, axis: Axis, contents: u32) -> u32 {
        let a = self.attrs();
        if a.fixed(axis) {
            a.size(axis)
        } else {
            a.margin.saturating_mul(2).saturating_add(contents)
        }
    }

    /// A maximum from content: the literal size if fixed, unbounded if
    /// greedy, otherwise content plus margins.
    pub fn bounded_max(&self, axis: Axis, contents: u32) -> u32 {
        let a = self.attrs();
        if a.fixed(axis) {
            a.size(axis)
        } else if a.greedy(axis) {
            UNLIMITED
        } else {
            a.margin.saturating_mul(2).saturating_add(contents)
        }
    }
}

/// Minimum size of a node. A node whose widget is out of its slot uses the
/// stacking default.
pub(crate) fn min_size(tree: &Tree, id: NodeId, axis: Axis) -> u32 {
    let Some(node) = tree.nodes.get(id) else {
        return 0;
    };
    let m = Measure { tree, node: id };
    match node.widget.as_deref() {
        Some(w) => w.min_size(axis, &m),
        None => m.bounded_min(axis, m.stack_min(axis)),
    }
}

/// Maximum size of a node.
pub(crate) fn max_size(tree: &Tree, id: NodeId, axis: Axis) -> u32 {
    let Some(node) = tree.nodes.get(id) else {
        return 0;
    };
    let m = Measure { tree, node: id };
    match node.widget.as_deref() {
        Some(w) => w.max_size(axis, &m),
        None => m.bounded_max(axis, m.stack_max(axis)),
    }
}

/// One container's share of a single-axis layout pass.
pub struct AxisPass<'a> {
    /// The tree being laid out.
    tree: &'a mut Tree,
    /// The container.
    node: NodeId,
    /// Axis of this pass.
    axis: Axis,
}

impl AxisPass<'_> {
    /// The axis being laid out.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The container.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The container's attributes.
    pub fn attrs(&self) -> Result<Attrs> {
        self.tree.attrs(self.node)
    }

    /// The container's children.
    pub fn children(&self) -> Result<Vec<NodeId>> {
        Ok(self.tree.children(self.node)?.to_vec())
    }

    /// The container's assigned size on this axis.
    pub fn size(&self) -> Result<u32> {
        Ok(self.attrs()?.size(self.axis))
    }

    /// The container's position on this axis.
    pub fn start(&self) -> Result<i32> {
        Ok(self.tree.node(self.node)?.pos.get(self.axis))
    }

    /// A child's attributes.
    pub fn child_attrs(&self, child: NodeId) -> Result<Attrs> {
        self.tree.attrs(child)
    }

    /// A child's minimum size on this axis.
    pub fn min(&self, child: NodeId) -> u32 {
        min_size(self.tree, child, self.axis)
    }

    /// A child's maximum size on this axis.
    pub fn max(&self, child: NodeId) -> u32 {
        max_size(self.tree, child, self.axis)
    }

    /// Borrow another node's widget by concrete type.
    pub fn widget<W: Widget>(&self, id: NodeId) -> Option<&W> {
        self.tree.widget::<W>(id).ok()
    }

    /// Assign a child's size. Changing the size of a fixed node is an
    /// invariant violation.
    pub fn set_size(&mut self, child: NodeId, size: u32) -> Result<()> {
        let axis = self.axis;
        let node = self.tree.node_mut(child)?;
        if node.attrs.size(axis) != size {
            if node.attrs.fixed(axis) {
                return Err(Error::Invariant(format!(
                    "{} has fixed {} size {}, layout assigned {size}",
                    node.name,
                    axis.name(),
                    node.attrs.size(axis)
                )));
            }
            node.attrs.set_size(axis, size);
        }
        Ok(())
    }

    /// Assign a child's absolute position.
    pub fn set_pos(&mut self, child: NodeId, pos: i32) -> Result<()> {
        self.tree.node_mut(child)?.pos.set(self.axis, pos);
        Ok(())
    }

    /// Set the extent of a child's viewport on this axis, creating the
    /// viewport if needed.
    pub fn set_viewport_extent(&mut self, child: NodeId, extent: u32) -> Result<()> {
        let node = self.tree.node_mut(child)?;
        let mut vp = node.viewport.unwrap_or_default();
        match self.axis {
            Axis::Horizontal => vp.w = extent,
            Axis::Vertical => vp.h = extent,
        }
        node.viewport = Some(vp);
        Ok(())
    }

    /// Lay out a child's own children on this axis.
    pub fn layout_child(&mut self, child: NodeId) -> Result<()> {
        layout_node(self.tree, child, self.axis)
    }

    /// Build a constraint error for this container.
    pub fn constraint_error(&self, available: u32, children: &[NodeId]) -> Error {
        let name = |id: NodeId| {
            self.tree
                .node(id)
                .map(|n| n.name.to_string())
                .unwrap_or_default()
        };
        Error::Layout(LayoutConstraint {
            axis: self.axis,
            container: name(self.node),
            available,
            children: children.iter().map(|c| (name(*c), self.min(*c))).collect(),
        })
    }

    /// Effective alignment of a child.
    fn align_of(&self, container: &Attrs, child: NodeId) -> Result<(Align, bool)> {
        let a = self.tree.attrs(child)?;
        let align = a
            .align(self.axis)
            .or(container.child_align(self.axis))
            .unwrap_or(Align::Start);
        Ok((align, a.fixed(self.axis)))
    }

    /// Stack children on top of each other: each child gets its maximum,
    /// capped at the space inside the margins, and is positioned by its
    /// alignment. `fill` children take all the space.
    pub fn stack(&mut self) -> Result<()> {
        let attrs = self.attrs()?;
        let avail = self.size()?.saturating_sub(attrs.margin.saturating_mul(2));
        let start = self.start()?.saturating_add_unsigned(attrs.margin);
        for child in self.children()? {
            let (lo, hi) = (self.min(child), self.max(child));
            if lo > avail {
                return Err(self.constraint_error(avail, &[child]));
            }
            let (align, fixed) = self.align_of(&attrs, child)?;
            let size = if align == Align::Fill && !fixed {
                avail
            } else {
                hi.min(avail)
            };
            self.set_size(child, size)?;
            if align != Align::Fixed {
                self.set_pos(child, start.saturating_add_unsigned(align.offset(avail, size)))?;
            }
            self.layout_child(child)?;
        }
        Ok(())
    }

    /// Place children one after another along the axis with spacing between
    /// them, sizing them with [`divide_space`]. Space left over when every
    /// child is at its maximum goes to the first `fill` child.
    pub fn sequence(&mut self) -> Result<()> {
        let attrs = self.attrs()?;
        let children = self.children()?;
        if children.is_empty() {
            return Ok(());
        }
        let gaps = u64::from(attrs.spacing) * (children.len() as u64 - 1);
        let raw = i64::from(self.size()?) - 2 * i64::from(attrs.margin) - gaps as i64;
        let mins: Vec<u32> = children.iter().map(|c| self.min(*c)).collect();
        let maxs: Vec<u32> = children.iter().map(|c| self.max(*c)).collect();
        let sum_min: i64 = mins.iter().map(|m| i64::from(*m)).sum();
        if sum_min > raw {
            return Err(self.constraint_error(raw.max(0) as u32, &children));
        }
        let avail = raw as u32;
        let mut sizes = divide_space(avail, &mins, &maxs);
        let used: u64 = sizes.iter().map(|s| u64::from(*s)).sum();
        if used < u64::from(avail) {
            let leftover = avail - used as u32;
            for (i, c) in children.iter().enumerate() {
                if let (Align::Fill, false) = self.align_of(&attrs, *c)? {
                    sizes[i] += leftover;
                    break;
                }
            }
        }
        let mut pos = self.start()?.saturating_add_unsigned(attrs.margin);
        for (child, size) in children.into_iter().zip(sizes) {
            self.set_size(child, size)?;
            if self.align_of(&attrs, child)?.0 != Align::Fixed {
                self.set_pos(child, pos)?;
            }
            pos = pos
                .saturating_add_unsigned(size)
                .saturating_add_unsigned(attrs.spacing);
            self.layout_child(child)?;
        }
        Ok(())
    }
}

/// Lay out one node's children on an axis.
fn layout_node(tree: &mut Tree, id: NodeId, axis: Axis) -> Result<()> {
    tree.with_slot(id, |w, tree| {
        w.layout(
            axis,
            &mut AxisPass {
                tree,
                node: id,
                axis,
            },
        )
    })
}

/// A full layout pass from the root.
pub(crate) fn run(tree: &mut Tree) -> Result<()> {
    debug!("layout");
    tree.resolve_tree();
    let root = tree.root;
    tree.node_mut(root)?.pos = Default::default();
    for axis in Axis::BOTH {
        layout_node(tree, root, axis)?;
    }
    finalize(tree, root)?;
    render::setup_surfaces(tree)?;
    tree.redraw(root);
    Ok(())
}

/// Fix absolute and relative rects, clamp viewports, redraw what moved,
/// snapshot children and run the `laid_out` hook.
fn finalize(tree: &mut Tree, id: NodeId) -> Result<()> {
    let parent = tree.parent(id);
    let parent_tl = match parent {
        Some(p) => Some(tree.node(p)?.rect.tl),
        None => None,
    };
    let node = tree.node_mut(id)?;
    let old = node.rect;
    node.rect = Rect::new(node.pos.x, node.pos.y, node.attrs.width, node.attrs.height);
    node.rel_rect = match parent_tl {
        Some(tl) => node.rect.relative_to(tl),
        None => node.rect,
    };
    if let Some(vp) = node.viewport {
        node.viewport = Some(vp.clamp_within(&node.content_bounds()));
    }
    trace!(
        "{}{}: layout at {:?}, size {:?}",
        "  ".repeat(node.depth),
        node.name,
        node.rect.tl,
        node.rect.size()
    );
    let changed = node.rect != old;
    for c in node.children.clone() {
        finalize(tree, c)?;
    }
    if changed {
        tree.redraw(parent.unwrap_or(id));
    }
    tree.mark_laid_out(id);
    tree.with_widget(id, |w, ctx| w.laid_out(ctx))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        core::{surface::Surface, testing::widgets::Block},
        geom::{Expanse, Point},
        settings::Settings,
        widgets::{HBox, HSpacer, Panel, VBox},
    };

    #[test]
    fn divide_examples() {
        assert_eq!(divide_space(100, &[20, 20], &[50, 90]), vec![50, 50]);
        assert_eq!(divide_space(200, &[20, 20], &[50, 90]), vec![50, 90]);
        assert_eq!(divide_space(40, &[20, 20], &[50, 90]), vec![20, 20]);
        assert_eq!(divide_space(10, &[0, 0, 0], &[10, 10, 10]), vec![3, 3, 4]);
        assert_eq!(divide_space(30, &[0, 0, 0], &[2, 100, 100]), vec![2, 14, 14]);
        assert_eq!(divide_space(7, &[0, 0], &[UNLIMITED, 3]), vec![4, 3]);
        assert_eq!(divide_space(0, &[], &[]), Vec::<u32>::new());
    }

    proptest! {
        #[test]
        fn divide_respects_bounds(
            bounds in prop::collection::vec((0u32..200, 0u32..200), 1..8),
            extra in 0u64..1000,
        ) {
            let mins: Vec<u32> = bounds.iter().map(|(lo, _)| *lo).collect();
            let maxs: Vec<u32> = bounds.iter().map(|(lo, h)| lo + h).collect();
            let sum_min: u64 = mins.iter().map(|m| u64::from(*m)).sum();
            let sum_max: u64 = maxs.iter().map(|m| u64::from(*m)).sum();
            let total = (sum_min + extra) as u32;
            let sizes = divide_space(total, &mins, &maxs);
            for i in 0..sizes.len() {
                prop_assert!(mins[i] <= sizes[i] && sizes[i] <= maxs[i]);
            }
            let sum: u64 = sizes.iter().map(|s| u64::from(*s)).sum();
            if sum_max <= u64::from(total) {
                prop_assert_eq!(sizes, maxs);
            } else {
                prop_assert_eq!(sum, u64::from(total));
            }
        }
    }

    /// A 100x50 screen tree.
    fn tree() -> Tree {
        Tree::new(Surface::new(Expanse::new(100, 50)))
    }

    /// Build a node from a widget with overrides.
    fn make(tree: &mut Tree, w: impl Widget, children: Vec<NodeId>, s: Settings) -> NodeId {
        tree.create(w, children, &s).unwrap()
    }

    #[test]
    fn hbox_distribution() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::new((20, 10), (50, 10)))?;
        let b = t.add(Block::new((20, 10), (90, 10)))?;
        let hb = make(&mut t, HBox::new(), vec![a, b], Settings::new());
        t.append_child(t.root(), hb)?;
        t.layout()?;
        assert_eq!(t.node(hb)?.rect(), Rect::new(0, 20, 100, 10));
        assert_eq!(t.node(a)?.rect(), Rect::new(0, 20, 50, 10));
        assert_eq!(t.node(b)?.rect(), Rect::new(50, 20, 50, 10));
        assert_eq!(t.node(b)?.rel_rect(), Rect::new(50, 0, 50, 10));
        Ok(())
    }

    #[test]
    fn sequence_spacing_and_margin() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(10, 10))?;
        let b = t.add(Block::fixed(10, 10))?;
        let vb = make(
            &mut t,
            VBox::new(),
            vec![a, b],
            Settings::new().with("spacing", 5).with("margin", 2),
        );
        t.append_child(t.root(), vb)?;
        t.layout()?;
        // 10 + 5 + 10 plus margins on both axes.
        assert_eq!(t.node(vb)?.size(), Expanse::new(14, 29));
        let vbr = t.node(vb)?.rect();
        assert_eq!(t.node(a)?.rect().tl, vbr.tl + Point::new(2, 2));
        assert_eq!(t.node(b)?.rect().tl, vbr.tl + Point::new(2, 17));
        Ok(())
    }

    #[test]
    fn screen_centers_children() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(20, 10))?;
        t.append_child(t.root(), a)?;
        t.layout()?;
        assert_eq!(t.node(a)?.rect(), Rect::new(40, 20, 20, 10));
        Ok(())
    }

    #[test]
    fn greedy_spacer_takes_leftover() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(10, 10))?;
        let s = t.add(HSpacer::new())?;
        let b = t.add(Block::fixed(10, 10))?;
        let hb = make(&mut t, HBox::new(), vec![a, s, b], Settings::new());
        t.append_child(t.root(), hb)?;
        t.layout()?;
        assert_eq!(t.node(s)?.size().w, 80);
        assert_eq!(t.node(b)?.rect().tl.x, 90);
        Ok(())
    }

    #[test]
    fn fill_absorbs_leftover() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::new((0, 0), (10, 10)))?;
        let b = make(
            &mut t,
            Block::new((0, 0), (10, 10)),
            vec![],
            Settings::new().with("halign", "fill"),
        );
        let hb = make(
            &mut t,
            HBox::new(),
            vec![a, b],
            Settings::new().with("halign", "fill"),
        );
        t.append_child(t.root(), hb)?;
        t.layout()?;
        assert_eq!(t.node(hb)?.size().w, 100);
        assert_eq!(t.node(a)?.size().w, 10);
        assert_eq!(t.node(b)?.size().w, 90);
        Ok(())
    }

    #[test]
    fn stack_alignment() -> Result<()> {
        let mut t = tree();
        let a = make(
            &mut t,
            Block::fixed(10, 10),
            vec![],
            Settings::new().with("halign", "right").with("valign", "top"),
        );
        let p = make(
            &mut t,
            Panel::new(),
            vec![a],
            Settings::new()
                .with("greedy_width", true)
                .with("greedy_height", true),
        );
        t.append_child(t.root(), p)?;
        t.layout()?;
        assert_eq!(t.node(p)?.rect(), Rect::new(0, 0, 100, 50));
        assert_eq!(t.node(a)?.rect(), Rect::new(90, 0, 10, 10));
        Ok(())
    }

    #[test]
    fn fixed_alignment_keeps_position() -> Result<()> {
        let mut t = tree();
        let a = make(
            &mut t,
            Block::fixed(10, 10),
            vec![],
            Settings::new().with("halign", "fixed").with("valign", "fixed"),
        );
        t.append_child(t.root(), a)?;
        t.node_mut(a)?.pos = Point::new(7, 3);
        t.layout()?;
        assert_eq!(t.node(a)?.rect(), Rect::new(7, 3, 10, 10));
        Ok(())
    }

    #[test]
    fn constraint_error() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(60, 10))?;
        let b = t.add(Block::fixed(60, 10))?;
        let hb = make(&mut t, HBox::new(), vec![a, b], Settings::new());
        let p = make(
            &mut t,
            Panel::new(),
            vec![hb],
            Settings::new().with("fixed_width", true).with("width", 100),
        );
        t.append_child(t.root(), p)?;
        // The hbox minimum itself exceeds the panel.
        match t.layout() {
            Err(Error::Layout(c)) => {
                assert_eq!(c.axis, Axis::Horizontal);
                assert_eq!(c.container, "panel");
                assert_eq!(c.available, 100);
                assert_eq!(c.children, vec![("hbox".to_string(), 120)]);
            }
            other => panic!("expected layout error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn sequence_constraint_error_lists_children() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(10, 30))?;
        let b = t.add(Block::fixed(10, 30))?;
        let vb = make(
            &mut t,
            VBox::new(),
            vec![a, b],
            Settings::new()
                .with("fixed_height", true)
                .with("height", 40),
        );
        t.append_child(t.root(), vb)?;
        match t.layout() {
            Err(Error::Layout(c)) => {
                assert_eq!(c.axis, Axis::Vertical);
                assert_eq!(c.available, 40);
                assert_eq!(c.children.len(), 2);
                assert_eq!(c.children[0].1, 30);
            }
            other => panic!("expected layout error, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn idempotent() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::new((5, 5), (40, 30)))?;
        let b = t.add(Block::new((5, 5), (UNLIMITED, 20)))?;
        let hb = make(&mut t, HBox::new(), vec![a, b], Settings::new().with("spacing", 3));
        t.append_child(t.root(), hb)?;
        t.layout()?;
        let before: Vec<Rect> = [hb, a, b].iter().map(|n| t.node(*n).unwrap().rect()).collect();
        t.layout()?;
        let after: Vec<Rect> = [hb, a, b].iter().map(|n| t.node(*n).unwrap().rect()).collect();
        assert_eq!(before, after);
        assert!(!t.needs_layout());
        Ok(())
    }

    #[test]
    fn structural_change_needs_layout() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(10, 10))?;
        let hb = make(&mut t, HBox::new(), vec![a], Settings::new());
        t.append_child(t.root(), hb)?;
        assert!(t.needs_layout());
        t.layout()?;
        assert!(!t.needs_layout());
        let b = t.add(Block::fixed(10, 10))?;
        t.append_child(hb, b)?;
        assert!(t.needs_layout());
        t.layout()?;
        assert_eq!(t.node(b)?.depth(), 2);
        assert_eq!(t.node(b)?.parent(), Some(hb));
        t.detach(b)?;
        assert!(t.needs_layout());
        Ok(())
    }

    /// Tries to resize its only child, which is fixed.
    struct Squash;

    impl Widget for Squash {
        fn layout(&mut self, _axis: Axis, pass: &mut AxisPass<'_>) -> Result<()> {
            for c in pass.children()? {
                pass.set_size(c, 1)?;
            }
            Ok(())
        }
    }

    #[test]
    fn resizing_fixed_node_is_invariant_violation() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::fixed(10, 10))?;
        let s = make(&mut t, Squash, vec![a], Settings::new());
        t.append_child(t.root(), s)?;
        assert!(matches!(t.layout(), Err(Error::Invariant(_))));
        Ok(())
    }

    #[test]
    fn measure_defaults() -> Result<()> {
        let mut t = tree();
        let a = t.add(Block::new((3, 4), (30, 40)))?;
        let p = make(&mut t, Panel::new(), vec![a], Settings::new().with("margin", 2));
        assert_eq!(t.min_size(p, Axis::Horizontal), 7);
        assert_eq!(t.max_size(p, Axis::Vertical), 44);
        t.update_attrs(p, |a| a.greedy_height = true)?;
        assert_eq!(t.max_size(p, Axis::Vertical), UNLIMITED);
        t.update_attrs(p, |a| {
            a.fixed_width = true;
            a.width = 12;
        })?;
        assert_eq!(t.min_size(p, Axis::Horizontal), 12);
        assert_eq!(t.max_size(p, Axis::Horizontal), 12);
        Ok(())
    }
}
