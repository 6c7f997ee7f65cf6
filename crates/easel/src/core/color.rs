//! RGBA colors.

use std::fmt;

use crate::{
    error::{Error, Result},
    settings::{SettingValue, mismatch},
};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is opaque.
    pub a: u8,
}

/// Named colors accepted in settings.
const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("grey", Color::rgb(128, 128, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("darkgrey", Color::rgb(64, 64, 64)),
    ("darkgray", Color::rgb(64, 64, 64)),
    ("lightgrey", Color::rgb(192, 192, 192)),
    ("lightgray", Color::rgb(192, 192, 192)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("transparent", Color::rgba(0, 0, 0, 0)),
];

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color name, `#rrggbb` or `#rrggbbaa`.
    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(hex) = lower.strip_prefix('#') {
            let channel = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|c| u8::from_str_radix(c, 16).ok())
                    .ok_or_else(|| Error::Config(format!("invalid color: {s:?}")))
            };
            return match hex.len() {
                6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
                8 => Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
                _ => Err(Error::Config(format!("invalid color: {s:?}"))),
            };
        }
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::Config(format!("unknown color: {s:?}")))
    }

    /// Interpret a settings value as a color.
    pub fn from_setting(key: &str, value: &SettingValue) -> Result<Self> {
        match value {
            SettingValue::Text(s) => Self::parse(s),
            SettingValue::List(l) if l.len() == 3 || l.len() == 4 => {
                let mut c = [0u8, 0, 0, 255];
                for (dst, v) in c.iter_mut().zip(l) {
                    *dst = u8::try_from(*v)
                        .map_err(|_| Error::Config(format!("{key}: channel out of range: {v}")))?;
                }
                Ok(Self::rgba(c[0], c[1], c[2], c[3]))
            }
            _ => Err(mismatch(key, "a color", value)),
        }
    }

    /// Composite `self` over `dst` (source-over).
    pub fn over(self, dst: Self) -> Self {
        match self.a {
            255 => self,
            0 => dst,
            a => {
                let sa = u32::from(a);
                let da = u32::from(dst.a) * (255 - sa) / 255;
                let out_a = sa + da;
                let mix = |s: u8, d: u8| {
                    ((u32::from(s) * sa + u32::from(d) * da) / out_a.max(1)) as u8
                };
                Self::rgba(
                    mix(self.r, dst.r),
                    mix(self.g, dst.g),
                    mix(self.b, dst.b),
                    out_a as u8,
                )
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl From<Color> for SettingValue {
    fn from(c: Color) -> Self {
        Self::List(vec![c.r.into(), c.g.into(), c.b.into(), c.a.into()])
    }
}
