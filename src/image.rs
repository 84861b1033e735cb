//! Decoded images and the uncompressed-BMP decoder.
//!
//! Only one layout is supported: a 54-byte header, 24 bits per pixel,
//! uncompressed, no row padding, rows stored bottom-up. Decode failures
//! never produce a partial image.

use crate::color::{pack, Color, Pixel};
use std::path::Path;
use thiserror::Error;

/// Fixed header block preceding the pixel data
const HEADER_LEN: usize = 54;
/// Magic signature at offset 0
const MAGIC: [u8; 2] = *b"BM";
/// Offsets of the signed 32-bit little-endian dimensions
const WIDTH_OFFSET: usize = 18;
const HEIGHT_OFFSET: usize = 22;

/// Why a bitmap failed to decode.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be read at all
    #[error("cannot read bitmap: {0}")]
    Io(#[from] std::io::Error),

    /// The magic signature at offset 0 is not `BM`
    #[error("not a bitmap: bad magic {found:#06x}")]
    BadMagic { found: u16 },

    /// Declared dimensions are zero or negative
    #[error("invalid bitmap dimensions {width}x{height}")]
    Dimensions { width: i32, height: i32 },

    /// Fewer bytes than the header or declared pixel data require
    #[error("bitmap truncated: needed {needed} bytes, found {found}")]
    Truncated { needed: usize, found: usize },
}

/// An immutable-after-decode pixel buffer.
///
/// Lives independently of any canvas; compositing borrows it only for the
/// duration of a single `draw_image` call.
#[derive(Debug)]
pub struct Image {
    width: i32,
    height: i32,
    buffer: Vec<Pixel>,
}

impl Image {
    /// Build an image from an existing packed-pixel buffer.
    /// The buffer length must match the dimensions.
    pub fn from_pixels(width: i32, height: i32, buffer: Vec<Pixel>) -> Self {
        assert_eq!(
            buffer.len(),
            (width * height) as usize,
            "pixel buffer length must equal width * height"
        );
        Self { width, height, buffer }
    }

    /// Read and decode a bitmap file, attaching `alpha` to every pixel.
    pub fn load(path: impl AsRef<Path>, alpha: u8) -> Result<Self, DecodeError> {
        let bytes = std::fs::read(path.as_ref())?;
        let image = decode(&bytes, alpha)?;
        log::debug!(
            "loaded {}: {}x{}",
            path.as_ref().display(),
            image.width,
            image.height
        );
        Ok(image)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The packed pixel sequence, row-major, top row first
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.buffer
    }
}

/// Decode an in-memory bitmap.
///
/// Pixel data is consecutive (B,G,R) byte triplets; `alpha` is attached to
/// every decoded pixel. The file stores rows bottom-up, so row order is
/// reversed (whole rows, keeping each row's left-to-right pixel order) to
/// produce the top-down layout the canvas expects.
pub fn decode(bytes: &[u8], alpha: u8) -> Result<Image, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::Truncated { needed: HEADER_LEN, found: bytes.len() });
    }
    if bytes[0..2] != MAGIC {
        return Err(DecodeError::BadMagic {
            found: u16::from_le_bytes([bytes[0], bytes[1]]),
        });
    }

    let width = i32::from_le_bytes(bytes[WIDTH_OFFSET..WIDTH_OFFSET + 4].try_into().unwrap());
    let height = i32::from_le_bytes(bytes[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].try_into().unwrap());
    if width <= 0 || height <= 0 {
        return Err(DecodeError::Dimensions { width, height });
    }

    let w = width as usize;
    let h = height as usize;
    let data_len = w * h * 3;
    let needed = HEADER_LEN + data_len;
    if bytes.len() < needed {
        return Err(DecodeError::Truncated { needed, found: bytes.len() });
    }

    let data = &bytes[HEADER_LEN..needed];
    let mut bottom_up = Vec::with_capacity(w * h);
    for triplet in data.chunks_exact(3) {
        let color = Color {
            r: triplet[2],
            g: triplet[1],
            b: triplet[0],
            a: alpha,
        };
        bottom_up.push(pack(color));
    }

    let mut buffer = Vec::with_capacity(w * h);
    for row in bottom_up.chunks_exact(w).rev() {
        buffer.extend_from_slice(row);
    }

    Ok(Image { width, height, buffer })
}
