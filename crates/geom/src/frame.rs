use super::Rect;

/// A border of uniform thickness around the inside edge of a rectangle. The
/// top and bottom edges span the full width; the sides fill the gap between
/// them.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Frame {
    /// The top edge, including corners.
    pub top: Rect,
    /// The bottom edge, including corners.
    pub bottom: Rect,
    /// The left edge, between top and bottom.
    pub left: Rect,
    /// The right edge, between top and bottom.
    pub right: Rect,
    /// The original outer rect.
    outer: Rect,
    /// The border width.
    border: u32,
}

impl Frame {
    /// Construct a new frame. If the rect is too small to fit two borders on
    /// an axis, the whole rect becomes the top edge.
    pub fn new(rect: Rect, border: u32) -> Self {
        let b = border as i32;
        if rect.w <= border.saturating_mul(2) || rect.h <= border.saturating_mul(2) {
            return Self {
                top: rect,
                outer: rect,
                border,
                ..Default::default()
            };
        }
        let side_h = rect.h - 2 * border;
        Self {
            top: Rect::new(rect.tl.x, rect.tl.y, rect.w, border),
            bottom: Rect::new(rect.tl.x, rect.bottom() - b, rect.w, border),
            left: Rect::new(rect.tl.x, rect.tl.y + b, border, side_h),
            right: Rect::new(rect.right() - b, rect.tl.y + b, border, side_h),
            outer: rect,
            border,
        }
    }

    /// The four edge rectangles.
    pub fn edges(&self) -> [Rect; 4] {
        [self.top, self.bottom, self.left, self.right]
    }

    /// The space inside the frame.
    pub fn inner(&self) -> Rect {
        if self.outer.w <= self.border.saturating_mul(2)
            || self.outer.h <= self.border.saturating_mul(2)
        {
            Rect::zero()
        } else {
            let b = self.border as i32;
            Rect::new(
                self.outer.tl.x + b,
                self.outer.tl.y + b,
                self.outer.w - 2 * self.border,
                self.outer.h - 2 * self.border,
            )
        }
    }

    /// The outer rect the frame was built from.
    pub fn outer(&self) -> Rect {
        self.outer
    }
}
