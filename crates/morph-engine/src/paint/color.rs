use std::fmt;
use std::str::FromStr;

/// Linear, straight-alpha RGBA color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a linear color from sRGB-encoded bytes; alpha is taken as is.
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: srgb_to_linear(r as f32 / 255.0),
            g: srgb_to_linear(g as f32 / 255.0),
            b: srgb_to_linear(b as f32 / 255.0),
            a: a as f32 / 255.0,
        }
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(src: &str) -> Result<Self, ColorParseError> {
        let hex = src.strip_prefix('#').unwrap_or(src);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(ColorParseError::new(src, "expected 6 or 8 hex digits"));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ColorParseError::new(src, "invalid hex digit"))
        };

        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::from_srgb_u8(byte(0)?, byte(2)?, byte(4)?, a))
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Error returned when a hex color literal cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorParseError {
    pub input: String,
    pub message: &'static str,
}

impl ColorParseError {
    fn new(input: &str, message: &'static str) -> Self {
        Self { input: input.to_string(), message }
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color `{}`: {}", self.input, self.message)
    }
}

impl std::error::Error for ColorParseError {}
