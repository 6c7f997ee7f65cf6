use super::{Axis, Expanse, Point};

/// A rectangle with a signed origin and an unsigned size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

/// Widen an unsigned extent into the i64 space used for edge arithmetic.
fn wide(v: u32) -> i64 {
    v as i64
}

/// Narrow an i64 coordinate back into i32, saturating.
fn narrow(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Build a rectangle from its four edges. Inverted edges produce an empty
    /// rectangle anchored at the left/top edge.
    fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self::new(
            narrow(left),
            narrow(top),
            (right - left).clamp(0, u32::MAX as i64) as u32,
            (bottom - top).clamp(0, u32::MAX as i64) as u32,
        )
    }

    /// Does this rect have a zero size?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The size of this rectangle.
    pub fn size(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// A rectangle of the same size at a new location.
    pub fn at(&self, tl: Point) -> Self {
        Self {
            tl,
            w: self.w,
            h: self.h,
        }
    }

    /// Left edge.
    pub fn left(&self) -> i32 {
        self.tl.x
    }

    /// Top edge.
    pub fn top(&self) -> i32 {
        self.tl.y
    }

    /// Right edge (exclusive), saturating at `i32::MAX`.
    pub fn right(&self) -> i32 {
        narrow(self.right_wide())
    }

    /// Bottom edge (exclusive), saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        narrow(self.bottom_wide())
    }

    /// Exclusive right edge without saturation.
    fn right_wide(&self) -> i64 {
        self.tl.x as i64 + wide(self.w)
    }

    /// Exclusive bottom edge without saturation.
    fn bottom_wide(&self) -> i64 {
        self.tl.y as i64 + wide(self.h)
    }

    /// Start coordinate along an axis.
    pub fn start(&self, axis: Axis) -> i32 {
        self.tl.get(axis)
    }

    /// Extent along an axis.
    pub fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Does the rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x
            && p.y >= self.tl.y
            && (p.x as i64) < self.right_wide()
            && (p.y as i64) < self.bottom_wide()
    }

    /// Does this rectangle completely enclose the other? An empty rectangle
    /// is enclosed if its origin lies within our bounds.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right_wide() <= self.right_wide()
            && other.bottom_wide() <= self.bottom_wide()
    }

    /// The overlapping region of two rectangles, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = (self.tl.x as i64).max(other.tl.x as i64);
        let top = (self.tl.y as i64).max(other.tl.y as i64);
        let right = self.right_wide().min(other.right_wide());
        let bottom = self.bottom_wide().min(other.bottom_wide());
        if right <= left || bottom <= top {
            None
        } else {
            Some(Self::from_edges(left, top, right, bottom))
        }
    }

    /// The smallest rectangle enclosing both rectangles.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            (self.tl.x as i64).min(other.tl.x as i64),
            (self.tl.y as i64).min(other.tl.y as i64),
            self.right_wide().max(other.right_wide()),
            self.bottom_wide().max(other.bottom_wide()),
        )
    }

    /// Translate the rectangle.
    pub fn shift(&self, dx: i32, dy: i32) -> Self {
        self.at(self.tl.offset(dx, dy))
    }

    /// Translate the rectangle so that `origin` becomes the new (0, 0).
    pub fn relative_to(&self, origin: Point) -> Self {
        self.at(self.tl - origin)
    }

    /// Move this rectangle, without resizing it, so that it lies inside
    /// `bounds`. On an axis where this rectangle is larger than the bounds it
    /// is centered on the bounds instead.
    pub fn clamp_within(&self, bounds: &Self) -> Self {
        let clamp_axis = |start: i32, len: u32, b_start: i32, b_len: u32| -> i32 {
            if len >= b_len {
                narrow(b_start as i64 + (wide(b_len) - wide(len)) / 2)
            } else if (start as i64) < b_start as i64 {
                b_start
            } else if start as i64 + wide(len) > b_start as i64 + wide(b_len) {
                narrow(b_start as i64 + wide(b_len) - wide(len))
            } else {
                start
            }
        };
        Self::new(
            clamp_axis(self.tl.x, self.w, bounds.tl.x, bounds.w),
            clamp_axis(self.tl.y, self.h, bounds.tl.y, bounds.h),
            self.w,
            self.h,
        )
    }
}

impl From<Expanse> for Rect {
    fn from(e: Expanse) -> Self {
        e.rect()
    }
}

impl From<(i32, i32, u32, u32)> for Rect {
    fn from(v: (i32, i32, u32, u32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn containment() {
        let r = Rect::new(10, 10, 10, 10);
        assert!(r.contains_point(Point::new(10, 10)));
        assert!(r.contains_point(Point::new(19, 19)));
        assert!(!r.contains_point(Point::new(20, 10)));
        assert!(!r.contains_point(Point::new(9, 15)));
        assert!(r.contains_rect(&Rect::new(12, 12, 8, 8)));
        assert!(!r.contains_rect(&Rect::new(12, 12, 9, 8)));
        assert!(r.contains_rect(&r));
    }

    #[test]
    fn intersect_and_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 0, 5, 5)));
        assert_eq!(a.union(&b), Rect::new(0, -5, 15, 15));
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), None);
    }

    #[test]
    fn clamp_within() {
        let bounds = Rect::new(0, 0, 100, 50);
        assert_eq!(
            Rect::new(-5, 45, 10, 10).clamp_within(&bounds),
            Rect::new(0, 40, 10, 10)
        );
        assert_eq!(
            Rect::new(95, 0, 10, 10).clamp_within(&bounds),
            Rect::new(90, 0, 10, 10)
        );
        assert_eq!(
            Rect::new(3, 3, 10, 10).clamp_within(&bounds),
            Rect::new(3, 3, 10, 10)
        );
        // Larger than the bounds: centered.
        assert_eq!(
            Rect::new(7, 0, 120, 10).clamp_within(&bounds),
            Rect::new(-10, 0, 120, 10)
        );
    }

    #[test]
    fn edges_saturate() {
        let r = Rect::new(i32::MAX - 1, 0, u32::MAX, 1);
        assert_eq!(r.right(), i32::MAX);
        assert!(r.contains_point(Point::new(i32::MAX, 0)));
    }

    proptest! {
        #[test]
        fn clamped_rect_fits(
            x in -500i32..500, y in -500i32..500,
            w in 0u32..100, h in 0u32..100,
            bx in -100i32..100, by in -100i32..100,
            extra_w in 0u32..200, extra_h in 0u32..200,
        ) {
            let bounds = Rect::new(bx, by, w + extra_w, h + extra_h);
            let r = Rect::new(x, y, w, h);
            let c = r.clamp_within(&bounds);
            prop_assert_eq!((c.w, c.h), (w, h));
            prop_assert!(bounds.contains_rect(&c));
            if bounds.contains_rect(&r) {
                prop_assert_eq!(c, r);
            }
        }
    }
}
