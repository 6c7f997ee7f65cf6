//! Viewports: visible windows onto content larger than a node's allotment.
//!
//! A viewport is a rectangle in the node's own content coordinates. It always
//! lies inside the node's content bounds, the larger of the node's size and
//! the viewport's size. Hit-testing and the on-screen rect calculation both
//! translate through every viewport between a node and the root.

use crate::{
    core::{id::NodeId, render, tree::Tree},
    error::{Error, Result},
    geom::{Point, Rect},
};

/// Set or clear a node's viewport. Changing whether a node has a viewport,
/// or its size, changes how the node's surface is allocated and so forces a
/// relayout.
pub(crate) fn set(tree: &mut Tree, id: NodeId, viewport: Option<Rect>) -> Result<()> {
    let node = tree.node_mut(id)?;
    let old = node.viewport;
    node.viewport = viewport;
    if let Some(vp) = viewport {
        node.viewport = Some(vp.clamp_within(&node.content_bounds()));
    }
    if old.map(|v| v.size()) != viewport.map(|v| v.size()) {
        tree.relayout(id);
    }
    tree.redraw(id);
    Ok(())
}

/// Move `viewport` by the smallest offset that brings `target` into view,
/// keeping it inside `bounds`.
pub fn scroll_into_view(viewport: Rect, bounds: Rect, target: Rect) -> Rect {
    let vp = viewport.clamp_within(&bounds);
    let within = target.clamp_within(&vp);
    vp.shift(target.tl.x - within.tl.x, target.tl.y - within.tl.y)
        .clamp_within(&bounds)
}

/// Scroll a node's viewport so `target`, in content coordinates, is visible.
pub(crate) fn ensure_visible(tree: &mut Tree, id: NodeId, target: Rect) -> Result<()> {
    let node = tree.node_mut(id)?;
    let Some(vp) = node.viewport else {
        return Err(Error::Invariant(format!(
            "ensure_visible on {}, which has no viewport",
            node.name
        )));
    };
    let bounds = node.content_bounds();
    if !bounds.contains_rect(&target) {
        return Err(Error::Invariant(format!(
            "ensure_visible target {target:?} is outside the content bounds {bounds:?} of {}",
            node.name
        )));
    }
    node.viewport = Some(scroll_into_view(vp, bounds, target));
    tree.redraw(id);
    Ok(())
}

/// A node's visible rect in absolute content coordinates.
fn visible_rect(tree: &Tree, id: NodeId) -> Option<Rect> {
    let node = tree.nodes.get(id)?;
    let size = render::visible_size(node);
    Some(Rect::new(node.rect.tl.x, node.rect.tl.y, size.w, size.h))
}

/// The on-screen region a node occupies after clipping by every ancestor,
/// or `None` if it is scrolled or clipped out of view.
pub(crate) fn screen_rect(tree: &Tree, id: NodeId) -> Option<Rect> {
    let mut r = visible_rect(tree, id)?;
    let mut cur = tree.parent(id);
    while let Some(a) = cur {
        if let Some(vp) = tree.nodes.get(a)?.viewport {
            r = r.shift(-vp.tl.x, -vp.tl.y);
        }
        r = r.intersect(&visible_rect(tree, a)?)?;
        cur = tree.parent(a);
    }
    r.intersect(&tree.screen.rect())
}

/// Translate a point in a parent's content coordinates into a child's. The
/// flag is true if the point falls inside the child's visible area.
pub(crate) fn hit(tree: &Tree, child: NodeId, pos: Point) -> Result<(Point, bool)> {
    let node = tree.node(child)?;
    let local = pos - node.rel_rect.tl;
    let inside = render::visible_size(node).rect().contains_point(local);
    let offset = node.viewport.map(|v| v.tl).unwrap_or_default();
    Ok((local + offset, inside))
}
