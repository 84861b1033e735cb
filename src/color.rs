//! Packed pixel format and color codec.
//!
//! Every buffer in this crate stores pixels as a single `u32` with the
//! channel layout R in bits 31-24, G in 23-16, B in 15-8, A in 7-0. This
//! matches SDL's `RGBA8888` format, so a canvas buffer can be handed to a
//! streaming texture without conversion.

use serde::{Deserialize, Serialize};

/// A packed RGBA pixel: R@31-24, G@23-16, B@15-8, A@7-0.
pub type Pixel = u32;

/// An unpacked 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Fully opaque color from RGB channels
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Pack a color into the fixed 32-bit pixel layout.
///
/// No clamping happens here; channels are already `u8`.
#[inline]
pub const fn pack(color: Color) -> Pixel {
    (color.r as u32) << 24 | (color.g as u32) << 16 | (color.b as u32) << 8 | color.a as u32
}

/// Unpack a pixel back into channels. Exact inverse of [`pack`].
#[inline]
pub const fn unpack(pixel: Pixel) -> Color {
    Color {
        r: (pixel >> 24) as u8,
        g: (pixel >> 16) as u8,
        b: (pixel >> 8) as u8,
        a: pixel as u8,
    }
}

impl From<Color> for Pixel {
    #[inline]
    fn from(color: Color) -> Pixel {
        pack(color)
    }
}

impl From<Pixel> for Color {
    #[inline]
    fn from(pixel: Pixel) -> Color {
        unpack(pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let p = pack(Color::rgba(0x12, 0x34, 0x56, 0x78));
        assert_eq!(p, 0x12345678);
    }

    #[test]
    fn test_unpack_is_inverse_of_pack() {
        // Sweep a spread of channel values rather than all 2^32 pixels
        for &v in &[0u8, 1, 7, 127, 128, 200, 254, 255] {
            let c = Color::rgba(v, v.wrapping_add(13), v.wrapping_mul(3), 255 - v);
            assert_eq!(unpack(pack(c)), c);
        }
    }

    #[test]
    fn test_pack_is_inverse_of_unpack() {
        for &p in &[0u32, 0xFFFFFFFF, 0xDEADBEEF, 0x01020304] {
            assert_eq!(pack(unpack(p)), p);
        }
    }

    #[test]
    fn test_rgb_is_opaque() {
        assert_eq!(Color::rgb(10, 20, 30).a, 255);
    }
}
