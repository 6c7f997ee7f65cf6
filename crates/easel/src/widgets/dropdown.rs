//! A choice picker with a popup list.
//!
//! A [`Dropdown`] shows its current choice. Opening it attaches a
//! [`DropdownList`] overlay to the root, over every window, and moves focus
//! there. The overlay lives outside the dropdown's subtree, so the two pass
//! keys to each other by redirect: while open, keys reaching the dropdown go
//! to the list, and keys the list does not know go back to the dropdown's
//! ancestors.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{
    NodeId, Tree,
    attrs::{Align, Attrs},
    color::Color,
    core::context::Context,
    error::Result,
    event::{key::KeyEvent, mouse::MouseButton},
    geom::{Axis, Expanse, Frame, Point, Rect},
    layout::Measure,
    settings::SettingValue,
    widget::{KeyOutcome, Widget},
};

/// Padding around the rows of the open list.
const LIST_PAD: u32 = 2;

/// Selection handler, called with the chosen index.
pub type SelectCallback = Box<dyn FnMut(&mut Context, usize) -> Result<()>>;

/// Paint text as inset glyph blocks on a monospace grid.
fn paint_text(ctx: &Context, tl: Point, text: &str, cell: Expanse, color: Color) -> Result<()> {
    let surface = ctx.surface()?;
    let (cw, ch) = (cell.w as i32, cell.h as i32);
    let mut x = tl.x;
    for g in text.graphemes(true) {
        let w = g.width() as i32;
        if w > 0 && !g.chars().all(char::is_whitespace) {
            let (gw, gh) = ((w * cw - 2).max(1), (ch - 4).max(1));
            surface.fill_rect(Rect::new(x + 1, tl.y + 2, gw as u32, gh as u32), color);
        }
        x += w * cw;
    }
    Ok(())
}

/// A closed picker showing the selected choice.
pub struct Dropdown {
    /// Available choices.
    choices: Vec<String>,
    /// Index of the selected choice.
    selected: Option<usize>,
    /// The overlay list, created on mount.
    list: Option<NodeId>,
    /// Focus holder to restore when the list closes.
    restore_focus: Option<NodeId>,
    /// Armed by a left press.
    clicked: bool,
    /// Glyph cell width in pixels.
    char_width: u32,
    /// Glyph cell height in pixels.
    char_height: u32,
    /// Border color while open.
    highlight_color: Color,
    /// Background of the open list.
    list_color: Color,
    /// Background of the highlighted row.
    selected_color: Color,
    /// Called when a choice is committed.
    on_select: Option<SelectCallback>,
}

impl Dropdown {
    /// A dropdown over `choices` with nothing selected.
    pub fn new<S: Into<String>>(choices: impl IntoIterator<Item = S>) -> Self {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            selected: None,
            list: None,
            restore_focus: None,
            clicked: false,
            char_width: 8,
            char_height: 16,
            highlight_color: Color::rgb(128, 128, 128),
            list_color: Color::rgb(32, 32, 32),
            selected_color: Color::rgb(0, 0, 192),
            on_select: None,
        }
    }

    /// Start with a choice selected. Out of range indices select nothing.
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = (index < self.choices.len()).then_some(index);
        self
    }

    /// Call `f` with the index of every committed choice.
    pub fn on_select(
        mut self,
        f: impl FnMut(&mut Context, usize) -> Result<()> + 'static,
    ) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// The available choices.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Index of the selected choice.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The selected choice.
    pub fn choice(&self) -> Option<&str> {
        self.selected.and_then(|i| self.choices.get(i)).map(String::as_str)
    }

    /// The overlay list node.
    pub fn list(&self) -> Option<NodeId> {
        self.list
    }

    /// Is the list showing?
    pub fn is_open(&self, tree: &Tree) -> bool {
        self.list.is_some_and(|l| tree.parent(l).is_some())
    }

    /// Replace the choices. A selection past the end is cleared.
    pub fn set_choices<S: Into<String>>(
        &mut self,
        choices: impl IntoIterator<Item = S>,
        ctx: &mut Context,
    ) {
        self.choices = choices.into_iter().map(Into::into).collect();
        self.selected = self.selected.filter(|i| *i < self.choices.len());
        ctx.relayout();
    }

    /// Glyph cell size.
    fn cell(&self) -> Expanse {
        Expanse::new(self.char_width, self.char_height)
    }

    /// Size of the text area: the widest choice plus an arrow cell.
    fn text_size(&self) -> Expanse {
        let cells = self.choices.iter().map(|c| c.width()).max().unwrap_or(0);
        Expanse::new(
            self.char_width.saturating_mul(cells as u32 + 1),
            self.char_height,
        )
    }

    /// Show the list below the dropdown and focus it.
    pub fn open(&mut self, ctx: &mut Context) -> Result<()> {
        let Some(list) = self.list else {
            return Ok(());
        };
        if self.is_open(ctx.tree_ref()) {
            return Ok(());
        }
        let tree = ctx.tree();
        let root = tree.root();
        tree.append_child(root, list)?;
        tree.relayout(root);
        self.restore_focus = tree.focused();
        let selected = self.selected;
        tree.with_widget_as::<DropdownList, _>(list, |l, ctx| {
            l.highlight = selected;
            ctx.redraw();
            Ok(())
        })?;
        tree.focus(list)?;
        ctx.redraw();
        Ok(())
    }

    /// Hide the list, handing focus back to whoever held it before.
    pub fn close(&mut self, ctx: &mut Context) -> Result<()> {
        let Some(list) = self.list else {
            return Ok(());
        };
        if !self.is_open(ctx.tree_ref()) {
            return Ok(());
        }
        let restore = self.restore_focus.take();
        let tree = ctx.tree();
        tree.detach(list)?;
        let root = tree.root();
        tree.relayout(root);
        if tree.focused() == Some(list) {
            match restore {
                Some(prev) if tree.is_attached(prev) => tree.focus(prev)?,
                _ => tree.unfocus(list)?,
            }
        }
        ctx.redraw();
        Ok(())
    }

    /// Close the list and commit a choice.
    fn commit(&mut self, index: usize, ctx: &mut Context) -> Result<()> {
        self.close(ctx)?;
        if index >= self.choices.len() {
            return Ok(());
        }
        self.selected = Some(index);
        if let Some(f) = self.on_select.as_mut() {
            f(ctx, index)?;
        }
        Ok(())
    }
}

impl Widget for Dropdown {
    fn attrs(&self) -> Attrs {
        Attrs {
            margin: 2,
            ..Attrs::default()
        }
    }

    fn apply_setting(&mut self, key: &str, value: &SettingValue) -> Result<bool> {
        match key {
            "char_width" => self.char_width = value.as_u32(key)?.max(1),
            "char_height" => self.char_height = value.as_u32(key)?.max(1),
            "highlight_color" => self.highlight_color = Color::from_setting(key, value)?,
            "list_color" => self.list_color = Color::from_setting(key, value)?,
            "selected_color" => self.selected_color = Color::from_setting(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn mount(&mut self, ctx: &mut Context) -> Result<()> {
        let owner = ctx.id();
        self.list = Some(ctx.tree().add(DropdownList::new(owner))?);
        Ok(())
    }

    fn min_contents(&self, axis: Axis, _m: &Measure) -> u32 {
        self.text_size().get(axis)
    }

    fn max_contents(&self, axis: Axis, _m: &Measure) -> u32 {
        self.text_size().get(axis)
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<()> {
        let attrs = ctx.attrs()?;
        let color = if self.is_open(ctx.tree_ref()) {
            self.highlight_color
        } else {
            attrs.color
        };
        let surface = ctx.surface()?;
        for edge in Frame::new(surface.rect(), 1).edges() {
            surface.fill_rect(edge, color);
        }
        let m = attrs.margin as i32;
        if let Some(choice) = self.choice() {
            paint_text(ctx, Point::new(m, m), choice, self.cell(), attrs.color)?;
        }
        // Arrow cell at the right edge.
        let text = self.text_size();
        let arrow = Rect::new(
            m + (text.w - self.char_width) as i32 + self.char_width as i32 / 4,
            m + self.char_height as i32 / 3,
            (self.char_width / 2).max(1),
            (self.char_height / 3).max(1),
        );
        surface.fill_rect(arrow, color);
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        _pos: Point,
        ctx: &mut Context,
    ) -> Result<bool> {
        if button != MouseButton::Left || !ctx.attrs()?.enabled {
            return Ok(false);
        }
        self.clicked = true;
        Ok(true)
    }

    fn handle_mouse_up(
        &mut self,
        button: MouseButton,
        pos: Option<Point>,
        ctx: &mut Context,
    ) -> Result<bool> {
        if button != MouseButton::Left || !self.clicked {
            return Ok(false);
        }
        self.clicked = false;
        if pos.is_some() {
            self.open(ctx)?;
        }
        Ok(true)
    }

    fn handle_keydown(
        &mut self,
        _event: &KeyEvent,
        keystroke: &str,
        ctx: &mut Context,
    ) -> Result<KeyOutcome> {
        if let Some(list) = self.list
            && self.is_open(ctx.tree_ref())
        {
            // Keys the list passed back bubble on to our ancestors.
            if ctx.tree_ref().focused() == Some(list) {
                return Ok(KeyOutcome::Ignored);
            }
            return Ok(KeyOutcome::Redirect(list));
        }
        match keystroke {
            "space" | "return" | "KP-enter" | "down" if ctx.attrs()?.enabled => {
                self.open(ctx)?;
                Ok(KeyOutcome::Consumed)
            }
            _ => Ok(KeyOutcome::Ignored),
        }
    }
}

/// The open list of a [`Dropdown`]. It covers the whole screen so that a
/// press anywhere outside its rows closes it.
pub struct DropdownList {
    /// The dropdown this list belongs to.
    owner: NodeId,
    /// Row under keyboard or pointer highlight.
    highlight: Option<usize>,
    /// A left press landed on the overlay.
    pressed: bool,
}

impl DropdownList {
    /// A closed list for `owner`.
    fn new(owner: NodeId) -> Self {
        Self {
            owner,
            highlight: None,
            pressed: false,
        }
    }

    /// The owning dropdown.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// The highlighted row.
    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// The owning dropdown's widget, while its owner is on screen.
    fn dropdown<'a>(&self, tree: &'a Tree) -> Option<&'a Dropdown> {
        if !tree.is_attached(self.owner) {
            return None;
        }
        tree.widget::<Dropdown>(self.owner).ok()
    }

    /// The rows' box in overlay coordinates, just below the owner.
    fn rows_rect(&self, tree: &Tree, bounds: Rect) -> Option<Rect> {
        let d = self.dropdown(tree)?;
        let anchor = tree.screen_rect(self.owner)?;
        let w = anchor.w.max(d.text_size().w + 2 * LIST_PAD);
        let h = d.char_height.saturating_mul(d.choices.len() as u32) + 2 * LIST_PAD;
        Some(Rect::new(anchor.left(), anchor.bottom(), w, h).clamp_within(&bounds))
    }

    /// The row at an overlay position.
    fn row_at(&self, tree: &Tree, bounds: Rect, pos: Point) -> Option<usize> {
        let d = self.dropdown(tree)?;
        let rows = self.rows_rect(tree, bounds)?;
        if !rows.contains_point(pos) {
            return None;
        }
        let y = pos.y - rows.top() - LIST_PAD as i32;
        if y < 0 {
            return None;
        }
        let i = y as usize / d.char_height as usize;
        (i < d.choices.len()).then_some(i)
    }

    /// Commit a row through the owner.
    fn commit(&self, index: usize, ctx: &mut Context) -> Result<()> {
        ctx.tree()
            .with_widget_as::<Dropdown, _>(self.owner, |d, ctx| d.commit(index, ctx))
    }

    /// Close through the owner without a choice.
    fn dismiss(&self, ctx: &mut Context) -> Result<()> {
        ctx.tree()
            .with_widget_as::<Dropdown, _>(self.owner, |d, ctx| d.close(ctx))
    }
}

impl Widget for DropdownList {
    fn attrs(&self) -> Attrs {
        Attrs {
            greedy_width: true,
            greedy_height: true,
            halign: Some(Align::Fill),
            valign: Some(Align::Fill),
            bgcolor: Some(Color::TRANSPARENT),
            ..Attrs::default()
        }
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<()> {
        let bounds = ctx.size()?.rect();
        let tree = ctx.tree_ref();
        let (Some(d), Some(rows)) = (self.dropdown(tree), self.rows_rect(tree, bounds)) else {
            return Ok(());
        };
        let color = tree.attrs(self.owner)?.color;
        let cell = d.cell();
        let (list_color, selected_color) = (d.list_color, d.selected_color);
        let choices = d.choices.clone();
        let surface = ctx.surface()?;
        surface.fill_rect(rows, list_color);
        let pad = LIST_PAD as i32;
        for (i, choice) in choices.iter().enumerate() {
            let y = rows.top() + pad + (i as u32 * cell.h) as i32;
            if self.highlight == Some(i) {
                surface.fill_rect(Rect::new(rows.left(), y, rows.w, cell.h), selected_color);
            }
            paint_text(ctx, Point::new(rows.left() + pad, y), choice, cell, color)?;
        }
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        _pos: Point,
        _ctx: &mut Context,
    ) -> Result<bool> {
        self.pressed = button == MouseButton::Left;
        Ok(true)
    }

    fn handle_mouse_up(
        &mut self,
        button: MouseButton,
        pos: Option<Point>,
        ctx: &mut Context,
    ) -> Result<bool> {
        if button != MouseButton::Left || !self.pressed {
            return Ok(true);
        }
        self.pressed = false;
        let bounds = ctx.size()?.rect();
        let Some(pos) = pos else {
            return self.dismiss(ctx).map(|_| true);
        };
        match self.row_at(ctx.tree_ref(), bounds, pos) {
            Some(i) => self.commit(i, ctx)?,
            None => {
                let inside = self
                    .rows_rect(ctx.tree_ref(), bounds)
                    .is_some_and(|r| r.contains_point(pos));
                if !inside {
                    self.dismiss(ctx)?;
                }
            }
        }
        Ok(true)
    }

    fn handle_mouse_move(&mut self, pos: Option<Point>, ctx: &mut Context) -> Result<bool> {
        let bounds = ctx.size()?.rect();
        if let Some(i) = pos.and_then(|p| self.row_at(ctx.tree_ref(), bounds, p))
            && self.highlight != Some(i)
        {
            self.highlight = Some(i);
            ctx.redraw();
        }
        Ok(false)
    }

    fn handle_keydown(
        &mut self,
        _event: &KeyEvent,
        keystroke: &str,
        ctx: &mut Context,
    ) -> Result<KeyOutcome> {
        let Some(n) = self.dropdown(ctx.tree_ref()).map(|d| d.choices.len()) else {
            return Ok(KeyOutcome::Ignored);
        };
        match keystroke {
            "up" | "down" => {
                if n > 0 {
                    self.highlight = Some(match (self.highlight, keystroke) {
                        (None, "up") => n - 1,
                        (None, _) => 0,
                        (Some(i), "up") => (i + n - 1) % n,
                        (Some(i), _) => (i + 1) % n,
                    });
                    ctx.redraw();
                }
                Ok(KeyOutcome::Consumed)
            }
            "return" | "KP-enter" => match self.highlight {
                Some(i) => {
                    self.commit(i, ctx)?;
                    Ok(KeyOutcome::Consumed)
                }
                None => Ok(KeyOutcome::Redirect(self.owner)),
            },
            "escape" => {
                self.dismiss(ctx)?;
                Ok(KeyOutcome::Consumed)
            }
            _ => Ok(KeyOutcome::Redirect(self.owner)),
        }
    }
}
