//! Surface assignment, partial redraw and compositing.
//!
//! After layout every node gets a drawable. Most nodes draw through a view
//! into their parent's pixels, so drawing them is immediately visible. A node
//! gets an independent buffer when its pixels must be held offscreen: it is a
//! top-level child of a root with several children, it sits under a natively
//! virtualizing parent, or it has a viewport it cannot render natively. Those
//! buffers are blitted into their parent after drawing.

use crate::{
    color::Color,
    core::{id::NodeId, node::Node, surface::Surface, tree::Tree},
    error::{Error, Result},
    geom::{Expanse, Rect},
};

/// Does the node render its viewport natively?
pub(crate) fn is_native(node: &Node) -> bool {
    node.viewport.is_some()
        && node
            .widget
            .as_deref()
            .map(|w| w.supports_viewport())
            .unwrap_or(false)
}

/// The size a node shows on screen: its viewport if it has one, else its
/// whole rect.
pub(crate) fn visible_size(node: &Node) -> Expanse {
    node.viewport.map(|v| v.size()).unwrap_or_else(|| node.size())
}

/// The size of a node's drawable.
fn surface_size(node: &Node) -> Expanse {
    if is_native(node) {
        visible_size(node)
    } else {
        node.content_bounds().size()
    }
}

/// A node's background: its own, or the nearest ancestor's.
pub fn inherited_bgcolor(tree: &Tree, id: NodeId) -> Option<Color> {
    let mut cur = Some(id);
    while let Some(c) = cur {
        let node = tree.nodes.get(c)?;
        if let Some(bg) = node.attrs.bgcolor {
            return Some(bg);
        }
        cur = node.parent;
    }
    None
}

/// Does the root composite its children itself?
fn root_composites(tree: &Tree) -> bool {
    tree.nodes
        .get(tree.root)
        .map(|r| r.children.len() > 1)
        .unwrap_or(false)
}

/// Assign surfaces from the root down.
pub(crate) fn setup_surfaces(tree: &mut Tree) -> Result<()> {
    let root = tree.root;
    let screen = tree.screen.clone();
    tree.node_mut(root)?.surface = Some(screen);
    setup_children(tree, root)
}

/// Assign surfaces to a node's children, reusing independent buffers whose
/// size has not changed.
fn setup_children(tree: &mut Tree, parent: NodeId) -> Result<()> {
    let p = tree.node(parent)?;
    let parent_surface = surface_of(p, parent)?;
    let isolate = (parent == tree.root && p.children.len() > 1) || is_native(p);
    for child in p.children.clone() {
        let c = tree.node(child)?;
        let size = surface_size(c);
        let surface = if isolate || (c.viewport.is_some() && !is_native(c)) {
            match &c.surface {
                Some(s)
                    if s.is_standalone()
                        && !s.shares_memory(&parent_surface)
                        && s.size() == size =>
                {
                    s.clone()
                }
                _ => Surface::new(size),
            }
        } else {
            parent_surface.view(Rect::new(c.rel_rect.tl.x, c.rel_rect.tl.y, size.w, size.h))
        };
        tree.node_mut(child)?.surface = Some(surface);
        setup_children(tree, child)?;
    }
    Ok(())
}

/// A node's surface, which exists after layout.
fn surface_of(node: &Node, id: NodeId) -> Result<Surface> {
    node.surface
        .clone()
        .ok_or_else(|| Error::Internal(format!("{id:?} has no surface, was layout run?")))
}

/// Does the node draw into a buffer of its own rather than its parent's?
fn is_independent(tree: &Tree, id: NodeId) -> bool {
    let Some(node) = tree.nodes.get(id) else {
        return false;
    };
    let Some(s) = &node.surface else {
        return false;
    };
    match node.parent.and_then(|p| tree.nodes.get(p)) {
        Some(p) => p.surface.as_ref().is_none_or(|ps| !s.shares_memory(ps)),
        None => false,
    }
}

/// The part of a node's surface that shows, in surface coordinates.
fn visible_source(node: &Node, surface: &Surface) -> Rect {
    match node.viewport {
        Some(vp) if !is_native(node) => vp,
        _ => surface.rect(),
    }
}

/// Draw a node's background, its whole subtree and then its own content
/// over the children, marking everything clean.
fn draw_node(tree: &mut Tree, id: NodeId) -> Result<()> {
    let node = tree.node(id)?;
    let surface = surface_of(node, id)?;
    if let Some(bg) = node.attrs.bgcolor {
        surface.fill(bg);
    }
    let composites = id == tree.root && root_composites(tree);
    for child in tree.children(id)?.to_vec() {
        if is_independent(tree, child) {
            fill_inherited(tree, child)?;
        }
        draw_node(tree, child)?;
        if !composites && is_independent(tree, child) {
            blit_into_parent(tree, child)?;
        }
    }
    tree.with_widget(id, |w, ctx| w.draw(ctx))?;
    tree.mark_clean(id);
    Ok(())
}

/// Fill a node without a background of its own with its ancestor's.
fn fill_inherited(tree: &Tree, id: NodeId) -> Result<()> {
    let node = tree.node(id)?;
    if node.attrs.bgcolor.is_none() {
        let color = inherited_bgcolor(tree, id).unwrap_or(Color::TRANSPARENT);
        surface_of(node, id)?.fill(color);
    }
    Ok(())
}

/// Copy the visible part of an independent buffer into the parent.
fn blit_into_parent(tree: &Tree, id: NodeId) -> Result<()> {
    let node = tree.node(id)?;
    let Some(parent) = node.parent else {
        return Ok(());
    };
    let p = tree.node(parent)?;
    let src = surface_of(node, id)?;
    let mut dst = node.rel_rect.tl;
    if is_native(p)
        && let Some(vp) = p.viewport
    {
        dst = dst - vp.tl;
    }
    surface_of(p, parent)?.blit(&src, visible_source(node, &src), dst);
    Ok(())
}

/// Push a redrawn node's pixels up through independent ancestors until they
/// reach the screen or a buffer the root composites.
fn propagate(tree: &Tree, id: NodeId) -> Result<()> {
    let composites = root_composites(tree);
    let mut cur = id;
    while let Some(parent) = tree.parent(cur) {
        if composites && parent == tree.root {
            break;
        }
        if is_independent(tree, cur) {
            blit_into_parent(tree, cur)?;
        }
        cur = parent;
    }
    Ok(())
}

/// Composite the root's top-level children into `region` of the screen.
fn composite(tree: &Tree, region: Rect) -> Result<()> {
    let root = tree.node(tree.root)?;
    let screen = &tree.screen;
    screen.fill_rect(region, root.attrs.bgcolor.unwrap_or(Color::TRANSPARENT));
    for child in &root.children {
        let c = tree.node(*child)?;
        let size = visible_size(c);
        let shown = Rect::new(c.rel_rect.tl.x, c.rel_rect.tl.y, size.w, size.h);
        let Some(clip) = shown.intersect(&region) else {
            continue;
        };
        let src = surface_of(c, *child)?;
        let offset = visible_source(c, &src).tl;
        let src_rect = clip.relative_to(shown.tl).shift(offset.x, offset.y);
        screen.blit(&src, src_rect, clip.tl);
    }
    Ok(())
}

/// Redraw the dirty frontier and return the screen regions to present.
pub(crate) fn run(tree: &mut Tree) -> Result<Vec<Rect>> {
    let frontier = tree.to_redraw();
    let mut regions = vec![];
    for id in frontier {
        fill_inherited(tree, id)?;
        draw_node(tree, id)?;
        propagate(tree, id)?;
        if let Some(r) = tree.screen_rect(id) {
            regions.push(r);
        }
    }
    if root_composites(tree)
        && let Some(first) = regions.first()
    {
        let region = regions.iter().fold(*first, |acc, r| acc.union(r));
        composite(tree, region)?;
    }
    Ok(regions)
}
