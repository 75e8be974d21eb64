use std::fmt;
use std::str::FromStr;

use glam::{Vec3, Vec4};
use thiserror::Error;

/// Straight-alpha 8-bit RGBA color.
///
/// The hex form is `#rrggbb`, or `#rrggbbaa` when the color is not fully opaque.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Rejected hex color code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}: \"{code}\"")]
pub struct ColorParseError {
    pub message: String,
    pub code: String,
}

impl ColorParseError {
    fn new(message: &str, code: &str) -> Self {
        Self {
            message: message.to_string(),
            code: code.to_string(),
        }
    }
}

impl Color {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    #[inline]
    pub const fn from_rgb(rgb: u32, opacity: u8) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: opacity,
        }
    }

    /// Like [`from_rgb`](Self::from_rgb) with opacity in `[0, 1]`.
    #[inline]
    pub fn from_rgb_f(rgb: u32, opacity: f32) -> Self {
        Self::from_rgb(rgb, (opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Builds a color from a packed `0xRRGGBBAA` value.
    #[inline]
    pub const fn from_rgba(rgba: u32) -> Self {
        Self {
            r: (rgba >> 24) as u8,
            g: ((rgba >> 16) & 0xff) as u8,
            b: ((rgba >> 8) & 0xff) as u8,
            a: (rgba & 0xff) as u8,
        }
    }

    #[inline]
    pub const fn to_rgba(self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == u8::MAX
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(unit(self.r), unit(self.g), unit(self.b))
    }

    #[inline]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(unit(self.r), unit(self.g), unit(self.b), unit(self.a))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        self.to_vec4().to_array()
    }

    /// Parses `RRGGBB`, `#RRGGBB`, `RRGGBBAA` or `#RRGGBBAA`.
    pub fn parse(code: &str) -> Result<Self, ColorParseError> {
        let digits = code.strip_prefix('#').unwrap_or(code);

        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::new("invalid color code length", code));
        }

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::new("invalid hex digit in color code", code));
        }

        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::new("invalid color code", code))?;

        Ok(if digits.len() == 6 {
            Self::from_rgb(value, u8::MAX)
        } else {
            Self::from_rgba(value)
        })
    }

    /// Lowercase hex code; alpha is omitted when fully opaque.
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[inline]
fn unit(c: u8) -> f32 {
    c as f32 / 255.0
}

impl Default for Color {
    fn default() -> Self {
        palette::basic::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Named colors.
pub mod palette {
    pub mod basic {
        use crate::color::Color;

        pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
        pub const WHITE: Color = Color::from_rgb(0xffffff, 255);
        pub const BLACK: Color = Color::from_rgb(0x000000, 255);
        pub const RED: Color = Color::from_rgb(0xff0000, 255);
        pub const GREEN: Color = Color::from_rgb(0x00ff00, 255);
        pub const BLUE: Color = Color::from_rgb(0x0000ff, 255);
        pub const GRAY: Color = Color::from_rgb(0x7f7f7f, 255);
        pub const YELLOW: Color = Color::from_rgb(0xffff00, 255);
        pub const MAGENTA: Color = Color::from_rgb(0xff00ff, 255);
        pub const CYAN: Color = Color::from_rgb(0x00ffff, 255);
        pub const ORANGE: Color = Color::from_rgb(0xffa500, 255);
        pub const VIOLET: Color = Color::from_rgb(0x9400d3, 255);
        pub const INDIGO: Color = Color::from_rgb(0x4b0082, 255);
        pub const PINK: Color = Color::from_rgb(0xee82ee, 255);
    }

    /// Material design baseline (light theme).
    pub mod material_light {
        use crate::color::Color;

        pub const PRIMARY: Color = Color::from_rgb(0x6200ee, 255);
        pub const PRIMARY_VARIANT: Color = Color::from_rgb(0x3700b3, 255);
        pub const SECONDARY: Color = Color::from_rgb(0x03dac6, 255);
        pub const SECONDARY_VARIANT: Color = Color::from_rgb(0x018786, 255);
        pub const BACKGROUND: Color = Color::from_rgb(0xffffff, 255);
        pub const SURFACE: Color = Color::from_rgb(0xffffff, 255);
        pub const ERROR: Color = Color::from_rgb(0xb00020, 255);
        pub const ON_PRIMARY: Color = Color::from_rgb(0xffffff, 255);
        pub const ON_SECONDARY: Color = Color::from_rgb(0x000000, 255);
        pub const ON_BACKGROUND: Color = Color::from_rgb(0x000000, 255);
        pub const ON_SURFACE: Color = Color::from_rgb(0x000000, 255);
        pub const ON_ERROR: Color = Color::from_rgb(0xffffff, 255);
    }

    /// Material design baseline (dark theme).
    pub mod material_dark {
        use crate::color::Color;

        pub const PRIMARY: Color = Color::from_rgb(0xbb86fc, 255);
        pub const PRIMARY_VARIANT: Color = Color::from_rgb(0x3700b3, 255);
        pub const SECONDARY: Color = Color::from_rgb(0x03dac6, 255);
        pub const BACKGROUND: Color = Color::from_rgb(0x121212, 255);
        pub const SURFACE: Color = Color::from_rgb(0x121212, 255);
        pub const ERROR: Color = Color::from_rgb(0xcf6679, 255);
        pub const ON_PRIMARY: Color = Color::from_rgb(0x000000, 255);
        pub const ON_SECONDARY: Color = Color::from_rgb(0x000000, 255);
        pub const ON_BACKGROUND: Color = Color::from_rgb(0xffffff, 255);
        pub const ON_SURFACE: Color = Color::from_rgb(0xffffff, 255);
        pub const ON_ERROR: Color = Color::from_rgb(0x000000, 255);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse ─────────────────────────────────────────────────────────────

    #[test]
    fn parse_rgb_with_and_without_hash() {
        let expected = Color::new(0x12, 0xab, 0xef, 255);
        assert_eq!(Color::parse("#12abef").unwrap(), expected);
        assert_eq!(Color::parse("12ABEF").unwrap(), expected);
    }

    #[test]
    fn parse_rgba() {
        assert_eq!(Color::parse("#01020304").unwrap(), Color::new(1, 2, 3, 4));
        assert_eq!(Color::parse("ff000080").unwrap(), Color::new(255, 0, 0, 0x80));
    }

    #[test]
    fn parse_rejects_bad_lengths() {
        for code in ["12345", "#1234567", "", "#", "1234567890"] {
            let err = Color::parse(code).unwrap_err();
            assert_eq!(err.code, code);
        }
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = Color::parse("#12345g").unwrap_err();
        assert_eq!(err.code, "#12345g");
        assert!(Color::parse("+12345").is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let c: Color = "#bb86fc".parse().unwrap();
        assert_eq!(c, palette::material_dark::PRIMARY);
    }

    // ── stringify ─────────────────────────────────────────────────────────

    #[test]
    fn rgb_round_trip() {
        for code in ["#000000", "#ffffff", "#121212", "#0a1b2c", "#7f7f7f"] {
            assert_eq!(Color::parse(code).unwrap().to_hex(), code);
        }
    }

    #[test]
    fn rgba_round_trip_keeps_alpha() {
        for code in ["#00000000", "#12345678", "#abcdeffe"] {
            assert_eq!(Color::parse(code).unwrap().to_hex(), code);
        }
    }

    #[test]
    fn opaque_rgba_drops_alpha() {
        assert_eq!(Color::parse("#123456ff").unwrap().to_hex(), "#123456");
        assert_eq!(palette::basic::RED.to_string(), "#ff0000");
    }

    // ── conversions ───────────────────────────────────────────────────────

    #[test]
    fn packed_values() {
        assert_eq!(Color::from_rgb(0x102030, 0x40).to_rgba(), 0x10203040);
        assert_eq!(Color::from_rgba(0x10203040), Color::new(0x10, 0x20, 0x30, 0x40));
        assert_eq!(Color::from_rgb_f(0xffffff, 0.0).a, 0);
        assert_eq!(Color::from_rgb_f(0xffffff, 1.0).a, 255);
    }

    #[test]
    fn float_vectors() {
        let c = palette::basic::WHITE;
        assert_eq!(c.to_vec3(), Vec3::ONE);
        assert_eq!(palette::basic::TRANSPARENT.to_vec4(), Vec4::ZERO);
        assert_eq!(Color::new(255, 0, 0, 255).to_array(), [1.0, 0.0, 0.0, 1.0]);
    }
}
