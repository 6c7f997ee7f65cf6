//! Typed per-node layout and appearance attributes.

use crate::{
    color::Color,
    error::{Error, Result},
    geom::{Axis, Expanse},
    settings::SettingValue,
};

/// The unbounded maximum size of a greedy axis.
pub const UNLIMITED: u32 = u32::MAX;

/// Alignment of a node within the slot its parent gives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    /// Left or top.
    Start,
    /// Right or bottom.
    End,
    /// Centered in the gap.
    Center,
    /// Take all space available in the slot.
    Fill,
    /// Keep the previously computed position.
    Fixed,
}

impl Align {
    /// Parse an alignment name for an axis. `left`/`right` are horizontal,
    /// `top`/`bottom` vertical.
    pub fn parse(axis: Axis, s: &str) -> Result<Self> {
        match (axis, s) {
            (Axis::Horizontal, "left") | (Axis::Vertical, "top") => Ok(Self::Start),
            (Axis::Horizontal, "right") | (Axis::Vertical, "bottom") => Ok(Self::End),
            (_, "center") => Ok(Self::Center),
            (_, "fill") => Ok(Self::Fill),
            (_, "fixed") => Ok(Self::Fixed),
            _ => Err(Error::Config(format!(
                "invalid {} alignment: {s:?}",
                axis.name()
            ))),
        }
    }

    /// Offset of a child of size `size` within a slot of size `avail`.
    pub fn offset(self, avail: u32, size: u32) -> u32 {
        let gap = avail.saturating_sub(size);
        match self {
            Self::End => gap,
            Self::Center => gap / 2,
            Self::Start | Self::Fill | Self::Fixed => 0,
        }
    }
}

/// Layout constraints and appearance shared by every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attrs {
    /// Width is set externally and never changed by layout.
    pub fixed_width: bool,
    /// Height is set externally and never changed by layout.
    pub fixed_height: bool,
    /// Maximum width is unbounded.
    pub greedy_width: bool,
    /// Maximum height is unbounded.
    pub greedy_height: bool,
    /// Current width; the literal width of a fixed-width node.
    pub width: u32,
    /// Current height; the literal height of a fixed-height node.
    pub height: u32,
    /// Space kept clear around the children.
    pub margin: u32,
    /// Space between consecutive children of a sequence container.
    pub spacing: u32,
    /// Own horizontal alignment.
    pub halign: Option<Align>,
    /// Own vertical alignment.
    pub valign: Option<Align>,
    /// Horizontal alignment for children without their own.
    pub child_halign: Option<Align>,
    /// Vertical alignment for children without their own.
    pub child_valign: Option<Align>,
    /// Foreground color.
    pub color: Color,
    /// Background color; `None` inherits from the nearest ancestor.
    pub bgcolor: Option<Color>,
    /// Whether the widget accepts interaction.
    pub enabled: bool,
}

impl Default for Attrs {
    fn default() -> Self {
        Self {
            fixed_width: false,
            fixed_height: false,
            greedy_width: false,
            greedy_height: false,
            width: 0,
            height: 0,
            margin: 0,
            spacing: 0,
            halign: None,
            valign: None,
            child_halign: None,
            child_valign: None,
            color: Color::WHITE,
            bgcolor: None,
            enabled: true,
        }
    }
}

/// Parse an optional alignment setting.
fn align_setting(axis: Axis, key: &str, value: &SettingValue) -> Result<Option<Align>> {
    if value.is_null() {
        Ok(None)
    } else {
        Align::parse(axis, value.as_str(key)?).map(Some)
    }
}

impl Attrs {
    /// Is the size on this axis fixed?
    pub fn fixed(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.fixed_width,
            Axis::Vertical => self.fixed_height,
        }
    }

    /// Is the maximum on this axis unbounded?
    pub fn greedy(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.greedy_width,
            Axis::Vertical => self.greedy_height,
        }
    }

    /// Current size along an axis.
    pub fn size(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Set the current size along an axis.
    pub fn set_size(&mut self, axis: Axis, v: u32) {
        match axis {
            Axis::Horizontal => self.width = v,
            Axis::Vertical => self.height = v,
        }
    }

    /// Current size on both axes.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.width, self.height)
    }

    /// Own alignment along an axis.
    pub fn align(&self, axis: Axis) -> Option<Align> {
        match axis {
            Axis::Horizontal => self.halign,
            Axis::Vertical => self.valign,
        }
    }

    /// Default child alignment along an axis.
    pub fn child_align(&self, axis: Axis) -> Option<Align> {
        match axis {
            Axis::Horizontal => self.child_halign,
            Axis::Vertical => self.child_valign,
        }
    }

    /// Mark both axes fixed at the given size.
    pub fn fixed_size(mut self, size: Expanse) -> Self {
        self.fixed_width = true;
        self.fixed_height = true;
        self.width = size.w;
        self.height = size.h;
        self
    }

    /// Apply one setting. Returns `Ok(false)` if the key is not an attribute,
    /// and an error if the key is known but the value has the wrong type.
    pub fn apply(&mut self, key: &str, value: &SettingValue) -> Result<bool> {
        match key {
            "fixed_width" => self.fixed_width = value.as_bool(key)?,
            "fixed_height" => self.fixed_height = value.as_bool(key)?,
            "greedy_width" => self.greedy_width = value.as_bool(key)?,
            "greedy_height" => self.greedy_height = value.as_bool(key)?,
            "width" => self.width = value.as_u32(key)?,
            "height" => self.height = value.as_u32(key)?,
            "margin" => self.margin = value.as_u32(key)?,
            "spacing" => self.spacing = value.as_u32(key)?,
            "halign" => self.halign = align_setting(Axis::Horizontal, key, value)?,
            "valign" => self.valign = align_setting(Axis::Vertical, key, value)?,
            "child_halign" => self.child_halign = align_setting(Axis::Horizontal, key, value)?,
            "child_valign" => self.child_valign = align_setting(Axis::Vertical, key, value)?,
            "color" => self.color = Color::from_setting(key, value)?,
            "bgcolor" => {
                self.bgcolor = if value.is_null() {
                    None
                } else {
                    Some(Color::from_setting(key, value)?)
                }
            }
            "enabled" => self.enabled = value.as_bool(key)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
