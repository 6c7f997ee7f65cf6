//! Multi-line text editing.
//!
//! [`TextBuffer`] holds the rows and cursor and implements the editing
//! operations. [`TextAreaBody`] puts a buffer on a monospace cell grid and
//! renders only its viewport. [`TextArea`] wraps a body in a scroll area with
//! bars and a border.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{
    NodeId, Tree,
    attrs::{Align, Attrs},
    color::Color,
    core::context::Context,
    core::timer::TimerId,
    error::{Error, Result},
    event::{key::KeyEvent, mouse::MouseButton},
    geom::{Axis, Expanse, Frame, Point, Rect},
    layout::{AxisPass, Measure},
    settings::SettingValue,
    widget::{KeyOutcome, Widget},
    widgets::scroll::ScrollArea,
};

/// Is a grapheme whitespace?
fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Number of grapheme clusters in a string.
fn glen(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Byte offset of grapheme `col`, or the end of the string.
fn byte_at(s: &str, col: usize) -> usize {
    s.grapheme_indices(true)
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Index just past the word at or after `i`, and any whitespace following it.
fn next_word(gs: &[&str], mut i: usize) -> usize {
    while i < gs.len() && !is_space(gs[i]) {
        i += 1;
    }
    while i < gs.len() && is_space(gs[i]) {
        i += 1;
    }
    i
}

/// Index of the start of the word before `i`, skipping whitespace.
fn prev_word(gs: &[&str], mut i: usize) -> usize {
    while i > 0 && is_space(gs[i - 1]) {
        i -= 1;
    }
    while i > 0 && !is_space(gs[i - 1]) {
        i -= 1;
    }
    i
}

/// Rows of text with a cursor. Columns count grapheme clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    /// Lines, without terminators. Never empty.
    rows: Vec<String>,
    /// Cursor row.
    row: usize,
    /// Cursor column, at most the row's length.
    col: usize,
}

impl TextBuffer {
    /// A buffer holding `text`, cursor at the start.
    pub fn new(text: &str) -> Self {
        Self {
            rows: text.split('\n').map(String::from).collect(),
            row: 0,
            col: 0,
        }
    }

    /// The text, rows joined by newlines.
    pub fn value(&self) -> String {
        self.rows.join("\n")
    }

    /// Replace the text and move the cursor to the start.
    pub fn set_value(&mut self, text: &str) {
        *self = Self::new(text);
    }

    /// The rows.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Cursor `(row, column)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Move the cursor, clamping it into the text.
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.row = row.min(self.rows.len() - 1);
        self.col = col.min(glen(&self.rows[self.row]));
    }

    /// Number of rows and the widest row in display cells.
    pub fn dims(&self) -> (usize, usize) {
        let cols = self.rows.iter().map(|r| r.width()).max().unwrap_or(0);
        (self.rows.len(), cols)
    }

    /// Display cells before the cursor on its row.
    pub fn cursor_cells(&self) -> usize {
        let row = &self.rows[self.row];
        row[..byte_at(row, self.col)].width()
    }

    /// Column of the grapheme covering display cell `cell` on a row.
    pub fn col_at_cell(&self, row: usize, cell: usize) -> usize {
        let mut used = 0;
        for (i, g) in self.rows[row].graphemes(true).enumerate() {
            used += g.width();
            if used > cell {
                return i;
            }
        }
        glen(&self.rows[row])
    }

    /// The current row split into graphemes.
    fn graphemes(&self) -> Vec<&str> {
        self.rows[self.row].graphemes(true).collect()
    }

    /// Remove graphemes `from..to` of the cursor row.
    fn cut(&mut self, from: usize, to: usize) {
        let row = &mut self.rows[self.row];
        let (a, b) = (byte_at(row, from), byte_at(row, to));
        row.replace_range(a..b, "");
    }

    /// Delete backwards: a character, a word, or the line break before the
    /// cursor row. Returns true if the text changed.
    pub fn backspace(&mut self, word: bool) -> bool {
        if self.col == 0 {
            if self.row == 0 {
                return false;
            }
            let line = self.rows.remove(self.row);
            self.row -= 1;
            self.col = glen(&self.rows[self.row]);
            self.rows[self.row].push_str(&line);
        } else {
            let n = if word {
                self.col - prev_word(&self.graphemes(), self.col)
            } else {
                1
            };
            self.cut(self.col - n, self.col);
            self.col -= n;
        }
        true
    }

    /// Delete forwards: a character, a word, or the line break at the end of
    /// the cursor row. Returns true if the text changed.
    pub fn delete(&mut self, word: bool) -> bool {
        let len = glen(&self.rows[self.row]);
        if self.col == len {
            if self.row + 1 == self.rows.len() {
                return false;
            }
            let line = self.rows.remove(self.row + 1);
            self.rows[self.row].push_str(&line);
        } else {
            let n = if word {
                next_word(&self.graphemes(), self.col) - self.col
            } else {
                1
            };
            self.cut(self.col, self.col + n);
        }
        true
    }

    /// Move left by a character or word, wrapping to the previous row.
    pub fn left(&mut self, word: bool) {
        if self.col > 0 {
            self.col = if word {
                prev_word(&self.graphemes(), self.col)
            } else {
                self.col - 1
            };
        } else if self.row > 0 {
            self.row -= 1;
            self.col = glen(&self.rows[self.row]);
        }
    }

    /// Move right by a character or word, wrapping to the next row.
    pub fn right(&mut self, word: bool) {
        if self.col < glen(&self.rows[self.row]) {
            self.col = if word {
                next_word(&self.graphemes(), self.col)
            } else {
                self.col + 1
            };
        } else if self.row + 1 < self.rows.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    /// Move up a row, keeping the column where possible.
    pub fn up(&mut self) {
        if self.row > 0 {
            self.set_cursor(self.row - 1, self.col);
        }
    }

    /// Move down a row, keeping the column where possible.
    pub fn down(&mut self) {
        if self.row + 1 < self.rows.len() {
            self.set_cursor(self.row + 1, self.col);
        }
    }

    /// Start of the row, or of the text.
    pub fn home(&mut self, document: bool) {
        let row = if document { 0 } else { self.row };
        self.set_cursor(row, 0);
    }

    /// End of the row, or of the text.
    pub fn end(&mut self, document: bool) {
        let row = if document {
            self.rows.len() - 1
        } else {
            self.row
        };
        self.set_cursor(row, usize::MAX);
    }

    /// Split the row at the cursor and move to the start of the new row.
    pub fn enter(&mut self) {
        let row = &mut self.rows[self.row];
        let tail = row.split_off(byte_at(row, self.col));
        self.rows.insert(self.row + 1, tail);
        self.row += 1;
        self.col = 0;
    }

    /// Insert text at the cursor, which moves past it. Newlines split rows.
    pub fn insert(&mut self, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.enter();
            }
            let row = &mut self.rows[self.row];
            row.insert_str(byte_at(row, self.col), part);
            self.col += glen(part);
        }
    }
}

/// Callback receiving the current text.
pub type TextCallback = Box<dyn FnMut(&str)>;

/// Half period of the cursor flash.
const CURSOR_FLASH: Duration = Duration::from_millis(500);

/// The editable surface of a [`TextArea`]: a fixed-size grid of cells sized to
/// its text, rendering only the part inside its viewport.
pub struct TextAreaBody {
    /// Text and cursor.
    buf: TextBuffer,
    /// Cell width in pixels.
    char_width: u32,
    /// Cell height in pixels.
    char_height: u32,
    /// Cursor currently shown.
    draw_cursor: bool,
    /// Pending flash timer.
    flash: Option<TimerId>,
    /// Called after every edit.
    on_update: Option<TextCallback>,
    /// Called on CTRL-return.
    on_commit: Option<TextCallback>,
}

impl TextAreaBody {
    /// A body holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            buf: TextBuffer::new(text),
            char_width: 8,
            char_height: 16,
            draw_cursor: false,
            flash: None,
            on_update: None,
            on_commit: None,
        }
    }

    /// The text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buf
    }

    /// The text.
    pub fn value(&self) -> String {
        self.buf.value()
    }

    /// Cell size in pixels.
    pub fn cell(&self) -> Expanse {
        Expanse::new(self.char_width, self.char_height)
    }

    /// Is the flashing cursor currently visible?
    pub fn cursor_visible(&self) -> bool {
        self.draw_cursor
    }

    /// Pixel size for the current text: one spare column for the cursor.
    fn text_size(&self) -> Expanse {
        let (rows, cols) = self.buf.dims();
        Expanse::new(
            self.char_width.saturating_mul(cols as u32 + 1),
            self.char_height.saturating_mul(rows as u32),
        )
    }

    /// The cursor cell in content coordinates.
    pub fn cursor_rect(&self) -> Rect {
        let (row, _) = self.buf.cursor();
        Rect::new(
            (self.buf.cursor_cells() as u32 * self.char_width) as i32,
            (row as u32 * self.char_height) as i32,
            self.char_width,
            self.char_height,
        )
    }

    /// The block painted for a glyph `cells` wide whose cell starts at `tl`.
    fn glyph(&self, tl: Point, cells: i32) -> Rect {
        let w = (cells * self.char_width as i32 - 2).max(1);
        let h = (self.char_height as i32 - 4).max(1);
        Rect::new(tl.x + 1, tl.y + 2, w as u32, h as u32)
    }

    /// Resize to fit the text if it changed; this relayouts the tree.
    fn resolve_size(&self, ctx: &mut Context) -> Result<()> {
        let size = self.text_size();
        let attrs = ctx.attrs()?;
        if !(attrs.fixed_width && attrs.fixed_height) || attrs.expanse() != size {
            ctx.update_attrs(|a| *a = a.fixed_size(size))?;
        }
        Ok(())
    }

    /// Replace the text.
    pub fn set_value(&mut self, text: &str, ctx: &mut Context) -> Result<()> {
        self.buf.set_value(text);
        self.resolve_size(ctx)?;
        ctx.redraw();
        Ok(())
    }

    /// Keep the cursor inside the viewport. While a resize is pending this
    /// waits for `laid_out`.
    fn update_viewport(&self, ctx: &mut Context) -> Result<()> {
        if ctx.viewport()?.is_none() || ctx.attrs()?.expanse() != ctx.size()? {
            return Ok(());
        }
        match ctx.parent() {
            Some(area) => ScrollArea::scroll_to(ctx.tree(), area, self.cursor_rect()),
            None => Ok(()),
        }
    }

    /// The text changed: notify and resize.
    fn text_updated(&mut self, ctx: &mut Context) -> Result<()> {
        if let Some(cb) = self.on_update.as_mut() {
            cb(&self.buf.value());
        }
        self.resolve_size(ctx)
    }

    /// Toggle the cursor and schedule the next toggle while focused.
    fn flash_cursor(&mut self, ctx: &mut Context) {
        if !ctx.has_focus() {
            return;
        }
        self.draw_cursor = !self.draw_cursor;
        let id = ctx.id();
        self.flash = Some(ctx.call_later(CURSOR_FLASH, move |tree: &mut Tree| {
            if !tree.contains(id) {
                return Ok(());
            }
            tree.with_widget_as::<Self, _>(id, |b, ctx| {
                b.flash_cursor(ctx);
                Ok(())
            })
        }));
        ctx.redraw();
    }

    /// Show the cursor immediately and restart the flash cycle.
    fn show_cursor(&mut self, ctx: &mut Context) {
        if let Some(t) = self.flash.take() {
            ctx.cancel_call(t);
        }
        self.draw_cursor = false;
        self.flash_cursor(ctx);
    }

    /// Redraw the enclosing text area, whose border follows focus.
    fn redraw_frame(ctx: &mut Context) {
        if let Some(p) = ctx.parent() {
            ctx.tree().redraw(p);
        }
    }
}

impl Widget for TextAreaBody {
    fn attrs(&self) -> Attrs {
        Attrs::default().fixed_size(self.text_size())
    }

    fn apply_setting(&mut self, key: &str, value: &SettingValue) -> Result<bool> {
        match key {
            "char_width" => self.char_width = value.as_u32(key)?.max(1),
            "char_height" => self.char_height = value.as_u32(key)?.max(1),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn settings_updated(&mut self, ctx: &mut Context) -> Result<()> {
        self.resolve_size(ctx)
    }

    fn supports_viewport(&self) -> bool {
        true
    }

    fn laid_out(&mut self, ctx: &mut Context) -> Result<()> {
        self.update_viewport(ctx)
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<()> {
        let surface = ctx.surface()?;
        let color = ctx.attrs()?.color;
        let vp = ctx.viewport()?.unwrap_or_else(|| ctx.size().unwrap_or_default().rect());
        let (cw, ch) = (self.char_width as i32, self.char_height as i32);
        // Glyph cells are painted as inset blocks; whitespace is left empty.
        for (i, line) in self.buf.rows().iter().enumerate() {
            let y = i as i32 * ch;
            if y + ch <= vp.top() || y >= vp.bottom() {
                continue;
            }
            let mut cell = 0;
            for g in line.graphemes(true) {
                let w = g.width() as i32;
                if !is_space(g) && w > 0 {
                    let glyph = self.glyph(Point::new(cell * cw, y), w);
                    surface.fill_rect(glyph.shift(-vp.tl.x, -vp.tl.y), color);
                }
                cell += w;
            }
        }
        if self.draw_cursor {
            let rect = self.cursor_rect().shift(-vp.tl.x, -vp.tl.y);
            surface.fill_rect(rect, color);
            let (row, col) = self.buf.cursor();
            let under = self.buf.rows()[row].graphemes(true).nth(col);
            if under.is_some_and(|g| !is_space(g)) {
                let bg = ctx.background().unwrap_or(Color::BLACK);
                surface.fill_rect(self.glyph(rect.tl, 1), bg);
            }
        }
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        pos: Point,
        ctx: &mut Context,
    ) -> Result<bool> {
        if button != MouseButton::Left {
            return Ok(false);
        }
        let (rows, _) = self.buf.dims();
        let row = (pos.y.max(0) as u32 / self.char_height) as usize;
        let row = row.min(rows - 1);
        let cell = (pos.x.max(0) as u32 / self.char_width) as usize;
        self.buf.set_cursor(row, self.buf.col_at_cell(row, cell));
        self.update_viewport(ctx)?;
        ctx.focus()?;
        self.show_cursor(ctx);
        Ok(true)
    }

    fn handle_keydown(
        &mut self,
        event: &KeyEvent,
        keystroke: &str,
        ctx: &mut Context,
    ) -> Result<KeyOutcome> {
        let ctrl = keystroke.contains("CTRL-");
        let key = keystroke.replace("CTRL-", "");
        let changed = match key.as_str() {
            "backspace" => self.buf.backspace(ctrl),
            "delete" => self.buf.delete(ctrl),
            "return" | "KP-enter" if ctrl => {
                if let Some(cb) = self.on_commit.as_mut() {
                    cb(&self.buf.value());
                }
                false
            }
            "return" | "KP-enter" => {
                self.buf.enter();
                true
            }
            "left" => {
                self.buf.left(ctrl);
                false
            }
            "right" => {
                self.buf.right(ctrl);
                false
            }
            "up" if !ctrl => {
                self.buf.up();
                false
            }
            "down" if !ctrl => {
                self.buf.down();
                false
            }
            "home" => {
                self.buf.home(ctrl);
                false
            }
            "end" => {
                self.buf.end(ctrl);
                false
            }
            _ => match event.text.as_deref() {
                Some(t)
                    if !ctrl
                        && !key.contains("ALT-")
                        && !t.is_empty()
                        && !t.chars().any(char::is_control) =>
                {
                    self.buf.insert(t);
                    true
                }
                _ => return Ok(KeyOutcome::Ignored),
            },
        };
        if changed {
            self.text_updated(ctx)?;
        }
        self.update_viewport(ctx)?;
        ctx.redraw();
        self.show_cursor(ctx);
        Ok(KeyOutcome::Consumed)
    }

    fn focus_gained(&mut self, ctx: &mut Context) -> Result<()> {
        self.show_cursor(ctx);
        Self::redraw_frame(ctx);
        Ok(())
    }

    fn focus_lost(&mut self, ctx: &mut Context) -> Result<()> {
        if let Some(t) = self.flash.take() {
            ctx.cancel_call(t);
        }
        self.draw_cursor = false;
        Self::redraw_frame(ctx);
        Ok(())
    }
}

/// A scrolling, bordered multi-line text editor.
pub struct TextArea {
    /// The scroll machinery.
    scroll: ScrollArea,
    /// Initial body, moved into the tree on mount.
    pending: Option<TextAreaBody>,
    /// The body node.
    body: Option<NodeId>,
    /// Border color.
    border_color: Color,
    /// Border color while the body has focus.
    focus_border_color: Color,
    /// Preferred width in cells.
    num_cols: u32,
    /// Preferred height in cells.
    num_rows: u32,
}

impl TextArea {
    /// A text area holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            scroll: ScrollArea::new().with_bars(),
            pending: Some(TextAreaBody::new(text)),
            body: None,
            border_color: Color::rgb(96, 96, 96),
            focus_border_color: Color::rgb(160, 160, 160),
            num_cols: 80,
            num_rows: 24,
        }
    }

    /// Call `f` with the text after every edit.
    pub fn on_update(mut self, f: impl FnMut(&str) + 'static) -> Self {
        if let Some(b) = self.pending.as_mut() {
            b.on_update = Some(Box::new(f));
        }
        self
    }

    /// Call `f` with the text on CTRL-return.
    pub fn on_commit(mut self, f: impl FnMut(&str) + 'static) -> Self {
        if let Some(b) = self.pending.as_mut() {
            b.on_commit = Some(Box::new(f));
        }
        self
    }

    /// The body node of a text area.
    pub fn body(tree: &Tree, id: impl Into<NodeId>) -> Result<NodeId> {
        let id = id.into();
        tree.widget::<Self>(id)?
            .body
            .ok_or_else(|| Error::Invariant(format!("text area {id:?} is not mounted")))
    }

    /// The text of a text area.
    pub fn value(tree: &Tree, id: impl Into<NodeId>) -> Result<String> {
        let body = Self::body(tree, id)?;
        Ok(tree.widget::<TextAreaBody>(body)?.value())
    }

    /// Replace the text of a text area.
    pub fn set_value(tree: &mut Tree, id: impl Into<NodeId>, text: &str) -> Result<()> {
        let body = Self::body(tree, id)?;
        tree.with_widget_as::<TextAreaBody, _>(body, |b, ctx| b.set_value(text, ctx))
    }

    /// Cell size of the body, if mounted.
    fn cell(&self, m: &Measure) -> Option<Expanse> {
        m.widget::<TextAreaBody>(self.body?).map(|b| b.cell())
    }
}

impl Widget for TextArea {
    fn attrs(&self) -> Attrs {
        Attrs {
            halign: Some(Align::Fill),
            valign: Some(Align::Fill),
            margin: 3,
            ..Attrs::default()
        }
    }

    fn apply_setting(&mut self, key: &str, value: &SettingValue) -> Result<bool> {
        match key {
            "border_color" => self.border_color = Color::from_setting(key, value)?,
            "focus_border_color" => self.focus_border_color = Color::from_setting(key, value)?,
            "num_cols" => self.num_cols = value.as_u32(key)?,
            "num_rows" => self.num_rows = value.as_u32(key)?,
            "char_width" | "char_height" => match self.pending.as_mut() {
                Some(b) => return b.apply_setting(key, value),
                None => return Ok(false),
            },
            _ => return self.scroll.apply_setting(key, value),
        }
        Ok(true)
    }

    fn mount(&mut self, ctx: &mut Context) -> Result<()> {
        let Some(body) = self.pending.take() else {
            return Ok(());
        };
        let id = ctx.id();
        let body = ctx.tree().add(body)?;
        ctx.tree().insert_child(id, 0, body)?;
        self.body = Some(body);
        self.scroll.mount(ctx)
    }

    fn settings_updated(&mut self, ctx: &mut Context) -> Result<()> {
        self.scroll.settings_updated(ctx)
    }

    fn min_contents(&self, axis: Axis, m: &Measure) -> u32 {
        self.scroll.min_contents(axis, m)
    }

    fn max_contents(&self, axis: Axis, m: &Measure) -> u32 {
        let cell = self.cell(m).unwrap_or_default();
        match axis {
            Axis::Horizontal => self.num_cols.saturating_mul(cell.w),
            Axis::Vertical => self.num_rows.saturating_mul(cell.h),
        }
    }

    fn layout(&mut self, axis: Axis, pass: &mut AxisPass) -> Result<()> {
        self.scroll.layout(axis, pass)
    }

    fn draw(&mut self, ctx: &mut Context) -> Result<()> {
        let attrs = ctx.attrs()?;
        if !attrs.enabled {
            return Ok(());
        }
        let focused = self.body.is_some() && ctx.tree_ref().focused() == self.body;
        let color = if focused {
            self.focus_border_color
        } else {
            self.border_color
        };
        let surface = ctx.surface()?;
        for edge in Frame::new(surface.rect(), 1).edges() {
            surface.fill_rect(edge, color);
        }
        Ok(())
    }

    fn handle_mouse_down(
        &mut self,
        button: MouseButton,
        pos: Point,
        ctx: &mut Context,
    ) -> Result<bool> {
        self.scroll.handle_mouse_down(button, pos, ctx)
    }

    fn handle_keydown(
        &mut self,
        _event: &KeyEvent,
        _keystroke: &str,
        _ctx: &mut Context,
    ) -> Result<KeyOutcome> {
        Ok(match self.body {
            Some(b) => KeyOutcome::Redirect(b),
            None => KeyOutcome::Ignored,
        })
    }

    fn focus_gained(&mut self, ctx: &mut Context) -> Result<()> {
        match self.body {
            Some(b) => ctx.tree().focus(b),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_splits_row() {
        let mut b = TextBuffer::new("ab\ncd");
        b.set_cursor(0, 2);
        b.enter();
        assert_eq!(b.rows(), ["ab", "", "cd"]);
        assert_eq!(b.cursor(), (1, 0));
        b.set_cursor(2, 1);
        b.enter();
        assert_eq!(b.rows(), ["ab", "", "c", "d"]);
        assert_eq!(b.cursor(), (3, 0));
    }

    #[test]
    fn backspace_joins_rows() {
        let mut b = TextBuffer::new("ab\ncd");
        b.set_cursor(1, 0);
        assert!(b.backspace(false));
        assert_eq!(b.value(), "abcd");
        assert_eq!(b.cursor(), (0, 2));
        b.home(true);
        assert!(!b.backspace(false));
    }

    #[test]
    fn word_operations() {
        let mut b = TextBuffer::new("one two  three");
        b.end(false);
        assert!(b.backspace(true));
        assert_eq!(b.value(), "one two  ");
        b.left(true);
        assert_eq!(b.cursor(), (0, 4));
        b.left(true);
        assert_eq!(b.cursor(), (0, 0));
        b.right(true);
        assert_eq!(b.cursor(), (0, 4));
        assert!(b.delete(true));
        assert_eq!(b.value(), "one ");
    }

    #[test]
    fn delete_joins_rows() {
        let mut b = TextBuffer::new("ab\ncd");
        b.end(false);
        assert!(b.delete(false));
        assert_eq!(b.value(), "abcd");
        b.end(true);
        assert!(!b.delete(false));
    }

    #[test]
    fn vertical_motion_clamps_column() {
        let mut b = TextBuffer::new("long line\nab\n");
        b.end(false);
        b.down();
        assert_eq!(b.cursor(), (1, 2));
        b.down();
        assert_eq!(b.cursor(), (2, 0));
        b.down();
        assert_eq!(b.cursor(), (2, 0));
        b.up();
        b.up();
        assert_eq!(b.cursor(), (0, 0));
        b.right(false);
        b.right(false);
        b.up();
        assert_eq!(b.cursor(), (0, 2));
    }

    #[test]
    fn wrap_at_row_edges() {
        let mut b = TextBuffer::new("ab\ncd");
        b.end(false);
        b.right(false);
        assert_eq!(b.cursor(), (1, 0));
        b.left(false);
        assert_eq!(b.cursor(), (0, 2));
        b.end(true);
        assert_eq!(b.cursor(), (1, 2));
    }

    #[test]
    fn graphemes_and_width() {
        let mut b = TextBuffer::new("e\u{301}x");
        assert_eq!(b.dims(), (1, 2));
        b.right(false);
        assert_eq!(b.cursor(), (0, 1));
        b.insert("日");
        assert_eq!(b.value(), "e\u{301}日x");
        assert_eq!(b.cursor_cells(), 3);
        assert_eq!(b.col_at_cell(0, 2), 1);
        assert_eq!(b.col_at_cell(0, 3), 2);
        assert_eq!(b.col_at_cell(0, 9), 3);
        assert!(b.backspace(false));
        assert_eq!(b.value(), "e\u{301}x");
    }

    #[test]
    fn insert_with_newlines() {
        let mut b = TextBuffer::new("");
        b.insert("a\nbc");
        assert_eq!(b.rows(), ["a", "bc"]);
        assert_eq!(b.cursor(), (1, 2));
    }
}
