//! Removal modes, fill colors, and sampling colors off the rendered surface.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::DisplayPoint;

/// Preset fill colors offered next to the free-form color entry.
pub const PALETTE: [FillColor; 5] = [
    FillColor::rgb(0xff, 0xff, 0xff),
    FillColor::rgb(0xf5, 0xf5, 0xf5),
    FillColor::rgb(0xe8, 0xe8, 0xe8),
    FillColor::rgb(0xf0, 0xf0, 0xf0),
    FillColor::rgb(0x00, 0x00, 0x00),
];

/// How the external removal operation treats the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalMode {
    /// Blur the region.
    #[default]
    Blur,
    /// Paint the region with a flat color.
    Fill,
}

impl RemovalMode {
    /// Lowercase name as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemovalMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blur" => Ok(Self::Blur),
            "fill" => Ok(Self::Fill),
            other => Err(format!("unknown removal mode '{other}' (expected blur or fill)")),
        }
    }
}

/// RGB fill color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl FillColor {
    /// White, the initial fill color.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Build a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for anything else.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        let invalid = || Error::InvalidColor(s.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());

        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for FillColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for FillColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for FillColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Read the color under `pointer` on a rendered surface.
///
/// The pointer is rounded to the nearest pixel; positions off the surface
/// yield `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sample(surface: &RgbaImage, pointer: DisplayPoint) -> Option<FillColor> {
    let x = pointer.x.round();
    let y = pointer.y.round();
    if x < 0.0 || y < 0.0 || !x.is_finite() || !y.is_finite() {
        return None;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= surface.width() || y >= surface.height() {
        return None;
    }
    let px = surface.get_pixel(x, y);
    Some(FillColor::rgb(px[0], px[1], px[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn parse_long_and_short_forms() {
        assert_eq!(FillColor::parse("#1677ff").unwrap(), FillColor::rgb(0x16, 0x77, 0xff));
        assert_eq!(FillColor::parse("1677FF").unwrap(), FillColor::rgb(0x16, 0x77, 0xff));
        assert_eq!(FillColor::parse("#fa0").unwrap(), FillColor::rgb(0xff, 0xaa, 0x00));
        assert_eq!(" #000000 ".parse::<FillColor>().unwrap(), FillColor::rgb(0, 0, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "#", "#12345", "#1234567", "#gg0000", "red", "#+1+2+3"] {
            assert!(FillColor::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn hex_is_lowercase_six_digits() {
        assert_eq!(FillColor::rgb(1, 2, 255).hex(), "#0102ff");
        assert_eq!(FillColor::default().to_string(), "#ffffff");
    }

    #[test]
    fn palette_starts_with_white() {
        assert_eq!(PALETTE[0], FillColor::WHITE);
        assert_eq!(PALETTE[4].hex(), "#000000");
    }

    #[test]
    fn mode_names() {
        assert_eq!(RemovalMode::default(), RemovalMode::Blur);
        assert_eq!("FILL".parse::<RemovalMode>().unwrap(), RemovalMode::Fill);
        assert!("smudge".parse::<RemovalMode>().is_err());
        assert_eq!(RemovalMode::Blur.to_string(), "blur");
    }

    #[test]
    fn sample_reads_pixel_under_pointer() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        img.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        assert_eq!(
            sample(&img, DisplayPoint::new(1.6, 0.7)),
            Some(FillColor::rgb(10, 20, 30))
        );
        assert_eq!(sample(&img, DisplayPoint::new(4.0, 0.0)), None);
        assert_eq!(sample(&img, DisplayPoint::new(-0.6, 0.0)), None);
    }
}
