use serde::{Deserialize, Serialize};

/// Errors from colour parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex colour {0:?}, expected #rrggbb")]
    InvalidHex(String),
}

/// A render colour in linear RGB.
///
/// The debug panel stores colours as sRGB hex strings; the renderer wants
/// linear components. `from_hex` / `to_hex` convert between the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Build from linear components.
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit sRGB components.
    pub fn from_srgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: srgb_to_linear(rgb[0] as f32 / 255.0),
            g: srgb_to_linear(rgb[1] as f32 / 255.0),
            b: srgb_to_linear(rgb[2] as f32 / 255.0),
        }
    }

    /// 8-bit sRGB components.
    pub fn to_srgb8(self) -> [u8; 3] {
        let q = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Parse `#rrggbb` (or `rrggbb`), interpreted as sRGB.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ColorError::InvalidHex(hex.to_string()))?;
        Ok(Self::from_srgb8([
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ]))
    }

    /// Serialize as lowercase `#rrggbb` sRGB.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_srgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// RGBA array for GPU upload.
    pub fn to_array(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
