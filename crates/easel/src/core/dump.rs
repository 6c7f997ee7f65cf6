use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{NodeId, Tree, error::Result};

/// Render an indented, colored outline of the whole tree: one line per node
/// with its name, rect, viewport and state markers. This is a debug
/// function.
pub fn dump(tree: &Tree) -> Result<String> {
    dump_from(tree, tree.root())
}

/// As [`dump`], for the subtree under `id`.
pub fn dump_from(tree: &Tree, id: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, tree, id, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Render without color escapes, for logs and test assertions.
pub fn dump_plain(tree: &Tree) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, tree, tree.root(), 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Write one node and recurse into its children.
fn dump_node(buffer: &mut Buffer, tree: &Tree, id: NodeId, level: usize) -> Result<()> {
    let node = tree.node(id)?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.name())?;
    buffer.reset()?;

    let r = node.rect();
    write!(buffer, " {},{} {}x{}", r.tl.x, r.tl.y, r.w, r.h)?;
    if let Some(vp) = node.viewport() {
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(buffer, " vp")?;
        buffer.reset()?;
        write!(buffer, " {},{} {}x{}", vp.tl.x, vp.tl.y, vp.w, vp.h)?;
    }

    let mut markers = vec![];
    if node.is_focused() {
        markers.push("FOCUSED");
    }
    if node.is_dirty() {
        markers.push("dirty");
    }
    if node.has_mouse() {
        markers.push("mouse");
    }
    if !markers.is_empty() {
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(buffer, " [{}]", markers.join(", "))?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    for c in node.children() {
        dump_node(buffer, tree, *c, level + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::surface::Surface, geom::Expanse, widgets::Panel};

    #[test]
    fn outline() -> Result<()> {
        let mut tree = Tree::new(Surface::new(Expanse::new(40, 30)));
        let p = tree.add(Panel::new())?;
        let root = tree.root();
        tree.append_child(root, p)?;
        tree.focus(p)?;
        tree.update()?;
        let out = dump_plain(&tree)?;
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "screen 0,0 40x30");
        assert_eq!(lines[1], "    panel 20,15 0x0 [FOCUSED]");
        assert!(dump(&tree)?.contains("\u{1b}["));
        Ok(())
    }
}
