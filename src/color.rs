// src/color.rs

//! Defines the `Color` type used for canvas fills, figures, and frame pixels.

use serde::{Deserialize, Serialize};

/// RGBA color in 32-bit format (8 bits per channel).
///
/// Colors are written to frames verbatim (source copy), so the alpha
/// channel is carried through but never used for blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque_alpha")]
    pub a: u8,
}

fn opaque_alpha() -> u8 {
    255
}

impl Color {
    pub const WHITE: Color = Color::opaque(255, 255, 255);
    pub const BLACK: Color = Color::opaque(0, 0, 0);
    /// Pure green, as produced by the `green` command.
    pub const GREEN: Color = Color::opaque(0, 255, 0);
    /// Default figure color.
    pub const YELLOW: Color = Color::opaque(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to RGBA byte array
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    /// White, the background of a freshly constructed canvas.
    fn default() -> Self {
        Color::WHITE
    }
}
