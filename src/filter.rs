//! Whole-buffer color filters.
//!
//! Filters are stateless transforms over a packed-pixel slice, independent
//! of pixel coordinates, so they work on any buffer view and unit test
//! without a canvas. None of them touch the alpha channel.

use crate::color::{pack, unpack, Color, Pixel};
use serde::{Deserialize, Serialize};

/// Tagged description of a filter, for configs and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    Invert,
    Monochrome,
    Nightvision,
    /// Channels below the matching threshold channel go to 0
    Threshold { r: u8, g: u8, b: u8 },
    /// Add `delta` to every RGB channel, clamped to [0, 255]
    Brightness { delta: i32 },
    /// Per-channel signed shift, clamped to [0, 255]
    ColorShift { dr: i32, dg: i32, db: i32 },
}

/// Apply a filter to every pixel of the buffer in place
pub fn apply(pixels: &mut [Pixel], filter: Filter) {
    match filter {
        Filter::Invert => invert(pixels),
        Filter::Monochrome => monochrome(pixels),
        Filter::Nightvision => nightvision(pixels),
        Filter::Threshold { r, g, b } => threshold(pixels, Color::rgb(r, g, b)),
        Filter::Brightness { delta } => brightness(pixels, delta),
        Filter::ColorShift { dr, dg, db } => color_shift(pixels, dr, dg, db),
    }
}

/// Shared per-pixel walk: unpack, transform RGB, repack with alpha intact
#[inline]
fn for_each_color(pixels: &mut [Pixel], f: impl Fn(&mut Color)) {
    for pixel in pixels {
        let mut color = unpack(*pixel);
        let a = color.a;
        f(&mut color);
        color.a = a;
        *pixel = pack(color);
    }
}

#[inline]
fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// R,G,B -> 255 - channel. Applying twice restores the buffer.
pub fn invert(pixels: &mut [Pixel]) {
    for_each_color(pixels, |c| {
        c.r = 255 - c.r;
        c.g = 255 - c.g;
        c.b = 255 - c.b;
    });
}

/// All three channels become the integer average (R+G+B)/3
pub fn monochrome(pixels: &mut [Pixel]) {
    for_each_color(pixels, |c| {
        let average = ((c.r as u32 + c.g as u32 + c.b as u32) / 3) as u8;
        c.r = average;
        c.g = average;
        c.b = average;
    });
}

/// Green becomes the average of the original channels, red and blue go dark
pub fn nightvision(pixels: &mut [Pixel]) {
    for_each_color(pixels, |c| {
        let average = ((c.r as u32 + c.g as u32 + c.b as u32) / 3) as u8;
        c.r = 0;
        c.g = average;
        c.b = 0;
    });
}

/// Zero out channels below the matching channel of `t`
pub fn threshold(pixels: &mut [Pixel], t: Color) {
    for_each_color(pixels, |c| {
        c.r = if c.r >= t.r { c.r } else { 0 };
        c.g = if c.g >= t.g { c.g } else { 0 };
        c.b = if c.b >= t.b { c.b } else { 0 };
    });
}

/// Shift all RGB channels by `delta`, saturating at the channel range
pub fn brightness(pixels: &mut [Pixel], delta: i32) {
    color_shift(pixels, delta, delta, delta);
}

/// Shift each RGB channel independently, saturating at the channel range
pub fn color_shift(pixels: &mut [Pixel], dr: i32, dg: i32, db: i32) {
    for_each_color(pixels, |c| {
        c.r = clamp_channel(c.r as i32 + dr);
        c.g = clamp_channel(c.g as i32 + dg);
        c.b = clamp_channel(c.b as i32 + db);
    });
}
