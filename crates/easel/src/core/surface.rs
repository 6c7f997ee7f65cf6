//! Drawable pixel surfaces.
//!
//! A [`Surface`] is a handle onto a shared RGBA pixel buffer. A surface made
//! with [`Surface::new`] owns an independent buffer; [`Surface::view`] makes a
//! sub-surface that writes straight into its parent's memory. Handles are
//! cheap to clone and all clones alias the same pixels.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    color::Color,
    geom::{Expanse, Point, Rect},
};

/// Backing pixel storage.
struct Pixels {
    /// Buffer dimensions.
    size: Expanse,
    /// Row-major pixel data.
    data: Vec<Color>,
}

impl Pixels {
    /// Index of a buffer coordinate, if in bounds.
    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x as u32 >= self.size.w || p.y as u32 >= self.size.h {
            return None;
        }
        Some(p.y as usize * self.size.w as usize + p.x as usize)
    }
}

/// A drawable region of a pixel buffer.
#[derive(Clone)]
pub struct Surface {
    /// Shared backing buffer.
    pixels: Rc<RefCell<Pixels>>,
    /// Buffer coordinate of this surface's local origin.
    origin: Point,
    /// Size of this surface.
    size: Expanse,
    /// Writable region in buffer coordinates.
    clip: Rect,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("standalone", &self.is_standalone())
            .finish()
    }
}

impl Surface {
    /// Create an independent, fully transparent buffer.
    pub fn new(size: Expanse) -> Self {
        Self::filled(size, Color::TRANSPARENT)
    }

    /// Create an independent buffer filled with a color.
    pub fn filled(size: Expanse, color: Color) -> Self {
        let len = size.w as usize * size.h as usize;
        Self {
            pixels: Rc::new(RefCell::new(Pixels {
                size,
                data: vec![color; len],
            })),
            origin: Point::zero(),
            size,
            clip: size.rect(),
        }
    }

    /// Size of this surface.
    pub fn size(&self) -> Expanse {
        self.size
    }

    /// This surface's bounds in its own coordinates.
    pub fn rect(&self) -> Rect {
        self.size.rect()
    }

    /// A sub-surface sharing this surface's memory. `rect` is in local
    /// coordinates; writes outside this surface are discarded.
    pub fn view(&self, rect: Rect) -> Self {
        let origin = self.origin + rect.tl;
        let bounds = Rect::new(origin.x, origin.y, rect.w, rect.h);
        let clip = self
            .clip
            .intersect(&bounds)
            .unwrap_or_else(|| Rect::new(origin.x, origin.y, 0, 0));
        Self {
            pixels: self.pixels.clone(),
            origin,
            size: rect.size(),
            clip,
        }
    }

    /// Does this handle cover a whole buffer of its own?
    pub fn is_standalone(&self) -> bool {
        self.origin.is_zero() && self.pixels.borrow().size == self.size
    }

    /// Do the two handles write to the same buffer?
    pub fn shares_memory(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Replace every pixel with a color.
    pub fn fill(&self, color: Color) {
        self.fill_rect(self.rect(), color);
    }

    /// Replace the pixels of a local rectangle with a color.
    pub fn fill_rect(&self, rect: Rect, color: Color) {
        let Some(local) = rect.intersect(&self.rect()) else {
            return;
        };
        let Some(target) = local.shift(self.origin.x, self.origin.y).intersect(&self.clip)
        else {
            return;
        };
        let mut px = self.pixels.borrow_mut();
        for y in target.top()..target.bottom() {
            for x in target.left()..target.right() {
                if let Some(i) = px.index(Point::new(x, y)) {
                    px.data[i] = color;
                }
            }
        }
    }

    /// Read a pixel at a local coordinate.
    pub fn pixel(&self, p: Point) -> Option<Color> {
        if !self.rect().contains_point(p) {
            return None;
        }
        let b = self.origin + p;
        if !self.clip.contains_point(b) {
            return None;
        }
        let px = self.pixels.borrow();
        px.index(b).map(|i| px.data[i])
    }

    /// Composite `src_rect` of `src` onto this surface with its top-left at
    /// `dst`. Source pixels are blended over the destination.
    pub fn blit(&self, src: &Self, src_rect: Rect, dst: Point) {
        let Some(src_rect) = src_rect.intersect(&src.rect()) else {
            return;
        };
        // Read first: the two handles may alias the same buffer.
        let mut staged = Vec::with_capacity(src_rect.size().area() as usize);
        for y in src_rect.top()..src_rect.bottom() {
            for x in src_rect.left()..src_rect.right() {
                if let Some(c) = src.pixel(Point::new(x, y)) {
                    let d = dst + Point::new(x - src_rect.left(), y - src_rect.top());
                    staged.push((d, c));
                }
            }
        }
        let bounds = self.rect();
        let mut px = self.pixels.borrow_mut();
        for (d, c) in staged {
            if !bounds.contains_point(d) {
                continue;
            }
            let b = self.origin + d;
            if !self.clip.contains_point(b) {
                continue;
            }
            if let Some(i) = px.index(b) {
                px.data[i] = c.over(px.data[i]);
            }
        }
    }

    /// Copy out the pixels of this surface, row by row.
    pub fn rows(&self) -> Vec<Vec<Color>> {
        (0..self.size.h as i32)
            .map(|y| {
                (0..self.size.w as i32)
                    .map(|x| self.pixel(Point::new(x, y)).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_share_memory() {
        let s = Surface::filled(Expanse::new(10, 10), Color::BLACK);
        let v = s.view(Rect::new(2, 2, 4, 4));
        assert!(v.shares_memory(&s));
        assert!(!v.is_standalone());
        assert!(s.is_standalone());
        v.fill(Color::WHITE);
        assert_eq!(s.pixel(Point::new(2, 2)), Some(Color::WHITE));
        assert_eq!(s.pixel(Point::new(5, 5)), Some(Color::WHITE));
        assert_eq!(s.pixel(Point::new(6, 6)), Some(Color::BLACK));
        assert_eq!(v.pixel(Point::new(0, 0)), Some(Color::WHITE));
        assert_eq!(v.pixel(Point::new(4, 0)), None);
    }

    #[test]
    fn nested_views_clip() {
        let s = Surface::filled(Expanse::new(10, 10), Color::BLACK);
        let v = s.view(Rect::new(6, 6, 4, 4));
        // Extends past the parent view; the overhang is discarded.
        let w = v.view(Rect::new(2, 2, 4, 4));
        w.fill(Color::WHITE);
        assert_eq!(s.pixel(Point::new(8, 8)), Some(Color::WHITE));
        assert_eq!(s.pixel(Point::new(7, 7)), Some(Color::BLACK));
        assert_eq!(w.pixel(Point::new(3, 3)), None);
    }

    #[test]
    fn blit_blends_and_offsets() {
        let dst = Surface::filled(Expanse::new(4, 4), Color::BLACK);
        let src = Surface::new(Expanse::new(2, 2));
        src.fill_rect(Rect::new(0, 0, 1, 2), Color::WHITE);
        dst.blit(&src, src.rect(), Point::new(1, 1));
        assert_eq!(dst.pixel(Point::new(1, 1)), Some(Color::WHITE));
        assert_eq!(dst.pixel(Point::new(1, 2)), Some(Color::WHITE));
        // Transparent source pixels leave the destination alone.
        assert_eq!(dst.pixel(Point::new(2, 1)), Some(Color::BLACK));
        assert_eq!(dst.pixel(Point::new(0, 0)), Some(Color::BLACK));
    }

    #[test]
    fn blit_within_one_buffer() {
        let s = Surface::filled(Expanse::new(4, 1), Color::BLACK);
        s.fill_rect(Rect::new(0, 0, 2, 1), Color::WHITE);
        s.blit(&s, Rect::new(0, 0, 3, 1), Point::new(1, 0));
        let row: Vec<_> = s.rows().remove(0);
        assert_eq!(row, vec![Color::WHITE, Color::WHITE, Color::WHITE, Color::BLACK]);
    }
}
