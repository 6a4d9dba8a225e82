//! Wire-ordered pixel
//!
//! WS2812 receivers shift in green first, then red, then blue. Colors are
//! stored as [`Rgb`] everywhere else; the reordering happens here, right
//! before encoding.

use super::Rgb;

/// Color laid out in the order the receiver expects it on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrbPixel {
    pub g: u8,
    pub r: u8,
    pub b: u8,
}

impl GrbPixel {
    pub const fn new(g: u8, r: u8, b: u8) -> Self {
        Self { g, r, b }
    }

    /// Bytes in transmission order
    pub const fn wire_bytes(self) -> [u8; 3] {
        [self.g, self.r, self.b]
    }
}

impl From<Rgb> for GrbPixel {
    fn from(color: Rgb) -> Self {
        Self {
            g: color.g,
            r: color.r,
            b: color.b,
        }
    }
}

impl From<GrbPixel> for Rgb {
    fn from(pixel: GrbPixel) -> Self {
        Rgb {
            r: pixel.r,
            g: pixel.g,
            b: pixel.b,
        }
    }
}
