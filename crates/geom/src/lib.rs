//! Geometry primitives used across easel.

/// Width/height size type.
mod expanse;
/// Frame and border helpers.
mod frame;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use expanse::Expanse;
pub use frame::Frame;
pub use point::Point;
pub use rect::Rect;

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    /// The x axis: widths, left/right.
    Horizontal,
    /// The y axis: heights, top/bottom.
    Vertical,
}

impl Axis {
    /// Both axes, in layout order.
    pub const BOTH: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// The perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Lowercase name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}
