//! Mouse and keyboard routing.
//!
//! Mouse events descend from the root, translated into each node's content
//! coordinates. Presses are offered to children topmost first and the
//! accepting path is recorded as a per-button capture, so the release finds
//! its way back regardless of where the pointer went. Keys start at the focus
//! holder and bubble towards the root.

use std::{collections::HashSet, mem};

use tracing::{debug, warn};

use crate::{
    core::{id::NodeId, node::Capture, tree::Tree, viewport::hit},
    error::Result,
    event::{
        key::KeyEvent,
        mouse::{MouseButton, MouseEvent, on_screen},
    },
    geom::Point,
    widget::KeyOutcome,
};

/// Route a mouse event from the root.
pub(crate) fn mouse(tree: &mut Tree, event: MouseEvent) -> Result<bool> {
    let root = tree.root;
    let pos = Some(event.pos()).filter(|p| on_screen(tree.screen_size(), *p));
    match event {
        MouseEvent::Down { button, .. } => match pos {
            Some(p) => down(tree, root, button, p),
            None => Ok(false),
        },
        MouseEvent::Up { button, .. } => up(tree, root, button, pos),
        MouseEvent::Move { .. } => {
            if pos.is_some() && !tree.node(root)?.mouse.has_mouse {
                enter(tree, root)?;
            }
            let handled = motion(tree, root, pos)?;
            if pos.is_none() {
                exit(tree, root)?;
            }
            Ok(handled)
        }
    }
}

/// Offer a press to a node, children topmost first.
fn down(tree: &mut Tree, id: NodeId, button: MouseButton, pos: Point) -> Result<bool> {
    for child in tree.children(id)?.iter().rev().copied().collect::<Vec<_>>() {
        let (local, inside) = hit(tree, child, pos)?;
        if inside && down(tree, child, button, local)? {
            tree.node_mut(id)?
                .mouse
                .captures
                .insert(button, Capture::Child(child));
            return Ok(true);
        }
    }
    let taken = tree.with_widget(id, |w, ctx| w.handle_mouse_down(button, pos, ctx))?;
    if taken {
        tree.node_mut(id)?.mouse.captures.insert(button, Capture::Own);
    }
    Ok(taken)
}

/// Deliver a release along the capture path. The position is `None` when the
/// pointer is outside the receiving node.
fn up(tree: &mut Tree, id: NodeId, button: MouseButton, pos: Option<Point>) -> Result<bool> {
    let capture = tree.node_mut(id)?.mouse.captures.remove(&button);
    match capture {
        Some(Capture::Own) => tree.with_widget(id, |w, ctx| w.handle_mouse_up(button, pos, ctx)),
        Some(Capture::Child(child)) => {
            if tree.parent(child) != Some(id) {
                warn!("dropping stale {} capture {child:?}", button.name());
                return Ok(false);
            }
            let local = match pos {
                Some(p) => {
                    let (local, inside) = hit(tree, child, p)?;
                    inside.then_some(local)
                }
                None => None,
            };
            up(tree, child, button, local)
        }
        None => Ok(false),
    }
}

/// Recompute hover membership for a node's children and deliver the move.
/// Children holding a capture also receive the move while the pointer is
/// outside them, so drags keep tracking.
fn motion(tree: &mut Tree, id: NodeId, pos: Option<Point>) -> Result<bool> {
    let children = tree.children(id)?.to_vec();
    let before = tree.node(id)?.mouse.hovered.clone();
    let mut hovered = vec![];
    let mut handled = false;
    if let Some(p) = pos {
        for child in &children {
            let (local, inside) = hit(tree, *child, p)?;
            if inside {
                hovered.push(*child);
                if !before.contains(child) {
                    enter(tree, *child)?;
                }
                handled |= motion(tree, *child, Some(local))?;
            }
        }
    }
    let captured: Vec<NodeId> = tree
        .node(id)?
        .mouse
        .captures
        .values()
        .filter_map(|c| match c {
            Capture::Child(c) if !hovered.contains(c) && children.contains(c) => Some(*c),
            _ => None,
        })
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    for child in captured {
        let local = match pos {
            Some(p) => Some(hit(tree, child, p)?.0),
            None => None,
        };
        handled |= motion(tree, child, local)?;
    }
    for child in before {
        if !hovered.contains(&child) && tree.contains(child) {
            exit(tree, child)?;
        }
    }
    tree.node_mut(id)?.mouse.hovered = hovered;
    handled |= tree.with_widget(id, |w, ctx| w.handle_mouse_move(pos, ctx))?;
    Ok(handled)
}

/// The pointer arrived over a node.
fn enter(tree: &mut Tree, id: NodeId) -> Result<bool> {
    tree.node_mut(id)?.mouse.has_mouse = true;
    tree.with_widget(id, |w, ctx| w.handle_mouse_enter(ctx))
}

/// The pointer left a node: exit every hovered descendant too.
fn exit(tree: &mut Tree, id: NodeId) -> Result<bool> {
    let node = tree.node_mut(id)?;
    node.mouse.has_mouse = false;
    let hovered = mem::take(&mut node.mouse.hovered);
    for child in hovered {
        if tree.contains(child) {
            exit(tree, child)?;
        }
    }
    tree.with_widget(id, |w, ctx| w.handle_mouse_exit(ctx))
}

/// Offer a key press to the focus holder, bubbling to the root.
pub(crate) fn key(tree: &mut Tree, event: &KeyEvent) -> Result<bool> {
    let Some(keystroke) = event.keystroke() else {
        return Ok(false);
    };
    let start = tree
        .focused()
        .filter(|f| tree.is_attached(*f))
        .unwrap_or(tree.root);
    let mut tried = HashSet::new();
    let mut cur = Some(start);
    while let Some(id) = cur {
        if !tried.insert(id) {
            cur = tree.parent(id);
            continue;
        }
        let outcome = tree.with_widget(id, |w, ctx| w.handle_keydown(event, &keystroke, ctx))?;
        cur = match outcome {
            KeyOutcome::Consumed => return Ok(true),
            KeyOutcome::Ignored => tree.parent(id),
            KeyOutcome::Redirect(target) => {
                tree.node(target)?;
                Some(target)
            }
        };
    }
    debug!("unhandled keystroke {keystroke}");
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            surface::Surface,
            testing::widgets::{Block, reset_path, take_path},
        },
        event::key::{KeyCode, ModifierKeyCode},
        geom::Expanse,
        widgets::{HBox, Panel},
    };

    /// A 40x30 screen with an hbox of two clickable 10x10 blocks, a at
    /// (10, 10) and b at (20, 10).
    fn pair() -> Result<(Tree, NodeId, NodeId, NodeId)> {
        let mut t = Tree::new(Surface::new(Expanse::new(40, 30)));
        let a = t.add(Block::fixed(10, 10).named("a").clickable())?;
        let b = t.add(Block::fixed(10, 10).named("b").clickable())?;
        let hb = t.create(HBox::new(), vec![a, b], &Default::default())?;
        t.append_child(t.root(), hb)?;
        t.update()?;
        reset_path();
        Ok((t, hb, a, b))
    }

    /// A press event.
    fn down(x: i32, y: i32) -> MouseEvent {
        MouseEvent::Down {
            button: MouseButton::Left,
            pos: Point::new(x, y),
        }
    }

    /// A release event.
    fn up(x: i32, y: i32) -> MouseEvent {
        MouseEvent::Up {
            button: MouseButton::Left,
            pos: Point::new(x, y),
        }
    }

    /// A move event.
    fn to(x: i32, y: i32) -> MouseEvent {
        MouseEvent::Move {
            pos: Point::new(x, y),
        }
    }

    #[test]
    fn release_follows_capture() -> Result<()> {
        let (mut t, hb, a, _) = pair()?;
        assert!(t.mouse(down(12, 12))?);
        assert_eq!(t.node(hb)?.capture(MouseButton::Left), Some(Capture::Child(a)));
        assert_eq!(t.node(a)?.capture(MouseButton::Left), Some(Capture::Own));
        assert!(t.mouse(to(25, 12))?);
        assert!(t.mouse(up(25, 12))?);
        assert_eq!(
            take_path(),
            ["a@down:left:2,2", "b@enter", "a@up:left:outside"]
        );
        assert_eq!(t.node(t.root())?.capture(MouseButton::Left), None);
        assert_eq!(t.node(hb)?.capture(MouseButton::Left), None);
        // A release with no capture goes nowhere.
        assert!(!t.mouse(up(25, 12))?);
        assert!(take_path().is_empty());
        Ok(())
    }

    #[test]
    fn release_outside_every_child_goes_to_pressed() -> Result<()> {
        let (mut t, hb, a, _) = pair()?;
        assert!(t.mouse(down(12, 12))?);
        t.mouse(to(1, 1))?;
        assert!(t.mouse(up(1, 1))?);
        assert_eq!(take_path(), ["a@down:left:2,2", "a@up:left:outside"]);
        assert_eq!(t.node(t.root())?.capture(MouseButton::Left), None);
        assert_eq!(t.node(hb)?.capture(MouseButton::Left), None);
        assert_eq!(t.node(a)?.capture(MouseButton::Left), None);
        Ok(())
    }

    #[test]
    fn release_inside_gets_position() -> Result<()> {
        let (mut t, _, _, _) = pair()?;
        t.mouse(down(21, 13))?;
        t.mouse(up(29, 19))?;
        assert_eq!(take_path(), ["b@down:left:1,3", "b@up:left:9,9"]);
        Ok(())
    }

    #[test]
    fn unaccepted_press() -> Result<()> {
        let mut t = Tree::new(Surface::new(Expanse::new(40, 30)));
        let a = t.add(Block::fixed(10, 10).named("a"))?;
        t.append_child(t.root(), a)?;
        t.update()?;
        reset_path();
        assert!(!t.mouse(down(16, 11))?);
        assert_eq!(take_path(), ["a@down:left:1,1"]);
        assert_eq!(t.node(t.root())?.capture(MouseButton::Left), None);
        // Presses off the screen are dropped.
        assert!(!t.mouse(down(-1, 5))?);
        assert!(take_path().is_empty());
        Ok(())
    }

    #[test]
    fn topmost_child_first() -> Result<()> {
        let mut t = Tree::new(Surface::new(Expanse::new(40, 30)));
        let under = t.add(Block::fixed(10, 10).named("under").clickable())?;
        let over = t.add(Block::fixed(10, 10).named("over").clickable())?;
        let p = t.create(Panel::new(), vec![under, over], &Default::default())?;
        t.append_child(t.root(), p)?;
        t.update()?;
        reset_path();
        assert!(t.mouse(down(16, 11))?);
        assert_eq!(take_path(), ["over@down:left:1,1"]);
        Ok(())
    }

    #[test]
    fn hover_enter_exit() -> Result<()> {
        let (mut t, hb, a, _) = pair()?;
        t.mouse(to(12, 12))?;
        assert!(t.node(a)?.has_mouse());
        assert_eq!(t.node(hb)?.hovered(), [a]);
        t.mouse(to(13, 12))?;
        t.mouse(to(-1, -1))?;
        assert_eq!(take_path(), ["a@enter", "a@exit"]);
        assert!(!t.node(a)?.has_mouse());
        assert!(!t.node(t.root())?.has_mouse());
        Ok(())
    }

    #[test]
    fn detached_capture_is_dropped() -> Result<()> {
        let (mut t, hb, _, _) = pair()?;
        t.mouse(down(12, 12))?;
        t.detach(hb)?;
        assert!(!t.mouse(up(12, 12))?);
        assert_eq!(take_path(), ["a@down:left:2,2"]);
        Ok(())
    }

    /// root > container > [other, leaf]
    fn chain() -> Result<(Tree, NodeId, NodeId, NodeId)> {
        let mut t = Tree::new(Surface::new(Expanse::new(40, 30)));
        let other = t.add(Block::new((0, 0), (5, 5)).named("other"))?;
        let leaf = t.add(
            Block::new((0, 0), (5, 5))
                .named("leaf")
                .keys(KeyOutcome::Redirect(other)),
        )?;
        let container = t.create(
            Block::new((0, 0), (20, 20)).named("container"),
            vec![other, leaf],
            &Default::default(),
        )?;
        t.append_child(t.root(), container)?;
        t.focus(leaf)?;
        reset_path();
        Ok((t, container, other, leaf))
    }

    #[test]
    fn keys_redirect_then_bubble() -> Result<()> {
        let (mut t, _, _, _) = chain()?;
        assert!(!t.key(&'x'.into())?);
        assert_eq!(
            take_path(),
            ["leaf@key:x", "other@key:x", "container@key:x"]
        );
        Ok(())
    }

    #[test]
    fn redirect_cycle_visits_each_once() -> Result<()> {
        let (mut t, _, other, leaf) = chain()?;
        t.with_widget_as::<Block, _>(other, |w, _| {
            w.keys = KeyOutcome::Redirect(leaf);
            Ok(())
        })?;
        assert!(!t.key(&KeyCode::Return.into())?);
        assert_eq!(
            take_path(),
            ["leaf@key:return", "other@key:return", "container@key:return"]
        );
        Ok(())
    }

    #[test]
    fn consumed_stops_bubbling() -> Result<()> {
        let (mut t, container, _, leaf) = chain()?;
        t.with_widget_as::<Block, _>(leaf, |w, _| {
            w.keys = KeyOutcome::Ignored;
            Ok(())
        })?;
        t.with_widget_as::<Block, _>(container, |w, _| {
            w.keys = KeyOutcome::Consumed;
            Ok(())
        })?;
        assert!(t.key(&'y'.into())?);
        assert_eq!(take_path(), ["leaf@key:y", "container@key:y"]);
        Ok(())
    }

    #[test]
    fn modifier_only_is_ignored() -> Result<()> {
        let (mut t, _, _, _) = chain()?;
        let shift = KeyCode::Modifier(ModifierKeyCode::LeftShift);
        assert!(!t.key(&shift.into())?);
        assert!(take_path().is_empty());
        Ok(())
    }

    #[test]
    fn detached_focus_starts_at_root() -> Result<()> {
        let (mut t, container, _, leaf) = chain()?;
        t.detach(container)?;
        assert!(!t.key(&'x'.into())?);
        assert!(take_path().is_empty());
        t.update()?;
        assert_eq!(t.focused(), None);
        assert!(!t.node(leaf)?.is_focused());
        Ok(())
    }
}
