//! The canvas: a row-major packed-pixel buffer with primitive drawing and
//! image compositing.
//!
//! All drawing calls are infallible. Out-of-range coordinates are clipped
//! silently per pixel (rectangles can optionally skip the whole draw, see
//! [`RectClip`]), and degenerate geometry draws little or nothing.

use crate::color::{pack, unpack, Color, Pixel};
use crate::filter::{self, Filter};
use crate::geometry::{Point, Rect};
use crate::image::Image;

// ============================================================================
// Composite Mode
// ============================================================================

/// How a source image is combined with the canvas in [`Canvas::draw_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    /// Per-pixel source-over alpha blending; the written pixel is forced
    /// opaque.
    AlphaBlend,
    /// Source pixels whose full packed value equals the key (alpha included)
    /// are skipped; every other pixel overwrites the destination verbatim.
    ColorKey(Color),
}

/// Clipping policy for [`Canvas::draw_rect_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectClip {
    /// Skip the entire draw when the rect origin lies at or beyond the
    /// canvas extent. Partially off-canvas pixels still clip per pixel.
    SkipWholeShape,
    /// Intersect the rect with the canvas bounds first, then draw.
    ClipToVisible,
}

// ============================================================================
// Canvas
// ============================================================================

/// A fixed-size pixel buffer for software rendering.
pub struct Canvas {
    width: i32,
    height: i32,
    buffer: Vec<Pixel>,
}

impl Canvas {
    /// Create a canvas of the given dimensions, cleared to transparent
    /// black. Dimensions must be positive.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "canvas dimensions must be positive");
        Self {
            width,
            height,
            buffer: vec![0; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Canvas extent as a rect at the origin
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Read a pixel (bounds checked). Returns `None` out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            Some(unpack(self.buffer[(x + y * self.width) as usize]))
        } else {
            None
        }
    }

    /// The packed pixel sequence, row-major
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.buffer
    }

    /// Mutable buffer view for filters and raw effects
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.buffer
    }

    /// Raw bytes for SDL texture upload (stride is `width * 4`).
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: Pixel is a plain u32, so the buffer's allocation is exactly
        // len() * 4 initialized bytes with no padding.
        unsafe {
            std::slice::from_raw_parts(self.buffer.as_ptr() as *const u8, self.buffer.len() * 4)
        }
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Set every pixel to `color`
    pub fn clear(&mut self, color: Color) {
        self.buffer.fill(pack(color));
    }

    /// Set a single pixel; silently skipped out of bounds, no blending.
    #[inline]
    pub fn draw_point(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            self.buffer[(x + y * self.width) as usize] = pack(color);
        }
    }

    /// Draw a line with the incremental slope/intercept rasterizer.
    ///
    /// The far endpoint is never plotted: iteration runs up to but excluding
    /// the ascending endpoint. Rect fills stack these lines, so their right
    /// and bottom edges land one pixel short of `origin + extent`.
    pub fn draw_line(&mut self, p1: Point, p2: Point, color: Color) {
        let dy = p2.y - p1.y;
        let dx = p2.x - p1.x;

        if dx == 0 {
            let (y0, y1) = if p1.y > p2.y { (p2.y, p1.y) } else { (p1.y, p2.y) };
            for y in y0..y1 {
                self.draw_point(p1.x, y, color);
            }
            return;
        }

        let m = dy as f32 / dx as f32;
        let b = p1.y as f32 - m * p1.x as f32;

        if m >= -1.0 && m <= 1.0 {
            let (x0, x1) = if p1.x > p2.x { (p2.x, p1.x) } else { (p1.x, p2.x) };
            for x in x0..x1 {
                let y = (m * x as f32 + b).round() as i32;
                self.draw_point(x, y, color);
            }
        } else {
            let (y0, y1) = if p1.y > p2.y { (p2.y, p1.y) } else { (p1.y, p2.y) };
            for y in y0..y1 {
                let x = ((y as f32 - b) / m).round() as i32;
                self.draw_point(x, y, color);
            }
        }
    }

    /// Draw a polyline through consecutive points. Fewer than two points
    /// draws nothing.
    pub fn draw_line_list(&mut self, points: &[Point], color: Color) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }
    }

    /// Draw a wireframe triangle (three edges, not filled)
    pub fn draw_triangle(&mut self, p1: Point, p2: Point, p3: Point, color: Color) {
        self.draw_line(p1, p2, color);
        self.draw_line(p1, p3, color);
        self.draw_line(p2, p3, color);
    }

    /// Draw a filled rect with the default [`RectClip::SkipWholeShape`]
    /// policy.
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.draw_rect_with(rect, color, RectClip::SkipWholeShape);
    }

    /// Draw a filled rect by stacking horizontal lines, under the chosen
    /// clipping policy. Fill inherits the exclusive far endpoint of
    /// [`Canvas::draw_line`].
    pub fn draw_rect_with(&mut self, rect: Rect, color: Color, clip: RectClip) {
        let rect = match clip {
            RectClip::SkipWholeShape => {
                if rect.x >= self.width || rect.y >= self.height {
                    return;
                }
                rect
            },
            RectClip::ClipToVisible => match rect.intersect(&self.bounds()) {
                Some(visible) => visible,
                None => return,
            },
        };

        for y in rect.y..rect.bottom() {
            self.draw_line(Point::new(rect.x, y), Point::new(rect.right(), y), color);
        }
    }

    /// Draw a circle outline with the integer midpoint algorithm.
    ///
    /// Radius 0 plots exactly the center; negative radius draws nothing.
    pub fn draw_circle(&mut self, center: Point, radius: i32, color: Color) {
        if radius <= 0 {
            if radius == 0 {
                self.draw_point(center.x, center.y, color);
            }
            return;
        }

        let mut px = 0;
        let mut py = radius;
        let mut decision = 3 - 2 * radius;

        self.circle_points(center, px, py, color);
        while py >= px {
            px += 1;
            if decision > 0 {
                py -= 1;
                decision += 4 * (px - py) + 10;
            } else {
                decision += 4 * px + 6;
            }
            self.circle_points(center, px, py, color);
        }
    }

    /// Plot the 8 symmetric reflections of an octant point around `center`
    fn circle_points(&mut self, center: Point, px: i32, py: i32, color: Color) {
        self.draw_point(center.x + px, center.y + py, color);
        self.draw_point(center.x + px, center.y - py, color);
        self.draw_point(center.x - px, center.y + py, color);
        self.draw_point(center.x - px, center.y - py, color);

        self.draw_point(center.x + py, center.y + px, color);
        self.draw_point(center.x + py, center.y - px, color);
        self.draw_point(center.x - py, center.y + px, color);
        self.draw_point(center.x - py, center.y - px, color);
    }

    // ========================================================================
    // Compositor
    // ========================================================================

    /// Composite an image onto the canvas at `origin`.
    ///
    /// Both modes clip per pixel: destination coordinates outside the canvas
    /// are skipped, never an error. The image is only borrowed for the
    /// duration of the call.
    pub fn draw_image(&mut self, image: &Image, origin: Point, mode: Composite) {
        // Pack the key once; the match below is on the full 32-bit value.
        let key = match mode {
            Composite::ColorKey(color) => Some(pack(color)),
            Composite::AlphaBlend => None,
        };

        for sy in 0..image.height() {
            let dy = origin.y + sy;
            if dy < 0 || dy >= self.height {
                continue;
            }
            for sx in 0..image.width() {
                let dx = origin.x + sx;
                if dx < 0 || dx >= self.width {
                    continue;
                }

                let src = image.pixels()[(sx + sy * image.width()) as usize];
                let di = (dx + dy * self.width) as usize;

                match key {
                    Some(key) => {
                        if src == key {
                            continue;
                        }
                        // Raw overwrite, source alpha passed through
                        self.buffer[di] = src;
                    },
                    None => {
                        self.buffer[di] = blend_over(src, self.buffer[di]);
                    },
                }
            }
        }
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Apply a whole-buffer filter in place
    pub fn apply_filter(&mut self, f: Filter) {
        filter::apply(&mut self.buffer, f);
    }
}

/// Source-over blend of two packed pixels weighted by the source alpha.
/// Each channel is `round(src * a) + round(dst * (1 - a))`; the result is
/// always opaque.
#[inline]
fn blend_over(src: Pixel, dst: Pixel) -> Pixel {
    let s = unpack(src);
    let d = unpack(dst);
    let alpha = s.a as f32 / 255.0;

    let blend = |sc: u8, dc: u8| -> u8 {
        let v = (sc as f32 * alpha).round() as u16 + (dc as f32 * (1.0 - alpha)).round() as u16;
        v.min(255) as u8
    };

    pack(Color {
        r: blend(s.r, d.r),
        g: blend(s.g, d.g),
        b: blend(s.b, d.b),
        a: 255,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_8x8() -> Canvas {
        Canvas::new(8, 8)
    }

    /// Count pixels currently equal to `color`
    fn count_set(canvas: &Canvas, color: Color) -> usize {
        canvas.pixels().iter().filter(|&&p| p == pack(color)).count()
    }

    const C: Color = Color::rgb(10, 200, 30);

    #[test]
    fn test_clear_sets_every_pixel() {
        let mut canvas = canvas_8x8();
        canvas.clear(C);
        assert_eq!(count_set(&canvas, C), 64);
        assert_eq!(canvas.pixel(7, 7), Some(C));
    }

    #[test]
    fn test_draw_point_out_of_bounds_is_noop() {
        let mut canvas = canvas_8x8();
        let before = canvas.pixels().to_vec();
        canvas.draw_point(-1, 0, C);
        canvas.draw_point(0, -1, C);
        canvas.draw_point(8, 0, C);
        canvas.draw_point(0, 8, C);
        assert_eq!(canvas.pixels(), &before[..]);
    }

    #[test]
    fn test_horizontal_line_excludes_far_endpoint() {
        let mut canvas = canvas_8x8();
        canvas.draw_line(Point::new(0, 0), Point::new(4, 0), C);
        for x in 0..4 {
            assert_eq!(canvas.pixel(x, 0), Some(C), "x={} should be set", x);
        }
        assert_ne!(canvas.pixel(4, 0), Some(C), "far endpoint must stay unset");
    }

    #[test]
    fn test_vertical_line_excludes_far_endpoint() {
        let mut canvas = canvas_8x8();
        // Endpoints given descending; rasterizer reorders so y ascends
        canvas.draw_line(Point::new(3, 6), Point::new(3, 2), C);
        for y in 2..6 {
            assert_eq!(canvas.pixel(3, y), Some(C));
        }
        assert_ne!(canvas.pixel(3, 6), Some(C));
        assert_eq!(count_set(&canvas, C), 4);
    }

    #[test]
    fn test_steep_line_iterates_y() {
        let mut canvas = canvas_8x8();
        canvas.draw_line(Point::new(1, 0), Point::new(3, 6), C);
        // Slope 3: one pixel per row, rows 0..6
        for y in 0..6 {
            let x = (1.0 + y as f32 / 3.0).round() as i32;
            assert_eq!(canvas.pixel(x, y), Some(C), "row {}", y);
        }
        assert_eq!(count_set(&canvas, C), 6);
    }

    #[test]
    fn test_diagonal_line_plots_one_pixel_per_column() {
        let mut canvas = canvas_8x8();
        canvas.draw_line(Point::new(0, 0), Point::new(5, 5), C);
        for x in 0..5 {
            assert_eq!(canvas.pixel(x, x), Some(C));
        }
        assert_eq!(count_set(&canvas, C), 5);
    }

    #[test]
    fn test_line_list_needs_two_points() {
        let mut canvas = canvas_8x8();
        canvas.draw_line_list(&[], C);
        canvas.draw_line_list(&[Point::new(1, 1)], C);
        assert_eq!(count_set(&canvas, C), 0);

        canvas.draw_line_list(&[Point::new(0, 0), Point::new(3, 0), Point::new(3, 3)], C);
        assert_eq!(canvas.pixel(1, 0), Some(C));
        assert_eq!(canvas.pixel(3, 1), Some(C));
    }

    #[test]
    fn test_triangle_draws_three_edges() {
        let mut canvas = canvas_8x8();
        canvas.draw_triangle(Point::new(0, 0), Point::new(6, 0), Point::new(0, 6), C);
        assert_eq!(canvas.pixel(3, 0), Some(C)); // top edge
        assert_eq!(canvas.pixel(0, 3), Some(C)); // left edge
        assert_eq!(canvas.pixel(3, 3), Some(C)); // hypotenuse
        assert_ne!(canvas.pixel(2, 2), Some(C), "interior stays unfilled");
    }

    #[test]
    fn test_rect_fill_and_exclusive_edges() {
        let mut canvas = canvas_8x8();
        canvas.draw_rect(Rect::new(1, 1, 3, 2), C);
        for y in 1..3 {
            for x in 1..4 {
                assert_eq!(canvas.pixel(x, y), Some(C));
            }
        }
        assert_ne!(canvas.pixel(4, 1), Some(C), "right edge excluded");
        assert_ne!(canvas.pixel(1, 3), Some(C), "bottom edge excluded");
        assert_eq!(count_set(&canvas, C), 6);
    }

    #[test]
    fn test_rect_origin_past_extent_skips_whole_draw() {
        let mut canvas = canvas_8x8();
        canvas.draw_rect(Rect::new(8, 0, 4, 4), C);
        canvas.draw_rect(Rect::new(0, 9, 4, 4), C);
        assert_eq!(count_set(&canvas, C), 0);
    }

    #[test]
    fn test_rect_clip_to_visible_policy() {
        let mut canvas = canvas_8x8();
        // Origin off the left/top edge; SkipWholeShape would rely on
        // per-pixel clipping, ClipToVisible trims the rect first. Both end
        // up drawing the visible region; verify the trimmed variant.
        canvas.draw_rect_with(Rect::new(-2, -2, 5, 5), C, RectClip::ClipToVisible);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(canvas.pixel(x, y), Some(C));
            }
        }
        assert_eq!(count_set(&canvas, C), 9);

        // Fully off-canvas rect draws nothing under either policy
        let mut canvas = canvas_8x8();
        canvas.draw_rect_with(Rect::new(20, 20, 4, 4), C, RectClip::ClipToVisible);
        assert_eq!(count_set(&canvas, C), 0);
    }

    #[test]
    fn test_circle_radius_zero_plots_center_only() {
        let mut canvas = canvas_8x8();
        canvas.draw_circle(Point::new(4, 4), 0, C);
        assert_eq!(canvas.pixel(4, 4), Some(C));
        assert_eq!(count_set(&canvas, C), 1);
    }

    #[test]
    fn test_circle_negative_radius_draws_nothing() {
        let mut canvas = canvas_8x8();
        canvas.draw_circle(Point::new(4, 4), -3, C);
        assert_eq!(count_set(&canvas, C), 0);
    }

    #[test]
    fn test_circle_radius_one() {
        let mut canvas = canvas_8x8();
        canvas.draw_circle(Point::new(4, 4), 1, C);
        assert_eq!(canvas.pixel(4, 3), Some(C));
        assert_eq!(canvas.pixel(4, 5), Some(C));
        assert_eq!(canvas.pixel(3, 4), Some(C));
        assert_eq!(canvas.pixel(5, 4), Some(C));
        assert_ne!(canvas.pixel(4, 4), Some(C), "center stays unset");
        assert_eq!(count_set(&canvas, C), 4);
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut canvas = Canvas::new(16, 16);
        canvas.draw_circle(Point::new(8, 8), 5, C);
        for y in 0..16 {
            for x in 0..16 {
                let set = canvas.pixel(x, y) == Some(C);
                // Reflect across the vertical and horizontal axes through
                // the center
                let rx = 8 - (x - 8);
                let ry = 8 - (y - 8);
                assert_eq!(set, canvas.pixel(rx, y) == Some(C));
                assert_eq!(set, canvas.pixel(x, ry) == Some(C));
            }
        }
    }

    #[test]
    fn test_circle_clips_silently_at_edges() {
        let mut canvas = canvas_8x8();
        canvas.draw_circle(Point::new(0, 0), 5, C);
        // Only the in-canvas quadrant survives; nothing panics
        assert!(count_set(&canvas, C) > 0);
        assert_eq!(canvas.pixel(5, 0), Some(C));
    }

    // ------------------------------------------------------------------
    // Compositor
    // ------------------------------------------------------------------

    fn image_from(width: i32, height: i32, colors: &[Color]) -> Image {
        Image::from_pixels(width, height, colors.iter().map(|&c| pack(c)).collect())
    }

    #[test]
    fn test_alpha_blend_opaque_source_replaces_destination() {
        let mut canvas = canvas_8x8();
        canvas.clear(Color::rgb(40, 40, 40));
        let src = Color::rgba(200, 100, 50, 255);
        let img = image_from(1, 1, &[src]);
        canvas.draw_image(&img, Point::new(2, 2), Composite::AlphaBlend);
        assert_eq!(canvas.pixel(2, 2), Some(Color::rgb(200, 100, 50)));
    }

    #[test]
    fn test_alpha_blend_transparent_source_keeps_destination() {
        let mut canvas = canvas_8x8();
        let dst = Color::rgb(40, 50, 60);
        canvas.clear(dst);
        let img = image_from(1, 1, &[Color::rgba(255, 255, 255, 0)]);
        canvas.draw_image(&img, Point::new(3, 3), Composite::AlphaBlend);
        assert_eq!(canvas.pixel(3, 3), Some(dst));
    }

    #[test]
    fn test_alpha_blend_midpoint() {
        let mut canvas = canvas_8x8();
        canvas.clear(Color::BLACK);
        let img = image_from(1, 1, &[Color::rgba(255, 0, 100, 128)]);
        canvas.draw_image(&img, Point::new(0, 0), Composite::AlphaBlend);
        // round(255 * 128/255) = 128, round(100 * 128/255) = 50, dst is 0
        assert_eq!(canvas.pixel(0, 0), Some(Color::rgb(128, 0, 50)));
    }

    #[test]
    fn test_alpha_blend_forces_opaque_result() {
        let mut canvas = canvas_8x8();
        let img = image_from(1, 1, &[Color::rgba(10, 20, 30, 77)]);
        canvas.draw_image(&img, Point::new(0, 0), Composite::AlphaBlend);
        assert_eq!(canvas.pixel(0, 0).map(|c| c.a), Some(255));
    }

    #[test]
    fn test_draw_image_clips_per_pixel() {
        let mut canvas = canvas_8x8();
        let img = image_from(
            2,
            2,
            &[Color::WHITE, Color::WHITE, Color::WHITE, Color::WHITE],
        );
        // Hang off the bottom-right corner; only (7,7) lands on canvas
        canvas.draw_image(&img, Point::new(7, 7), Composite::AlphaBlend);
        assert_eq!(canvas.pixel(7, 7), Some(Color::WHITE));
        assert_eq!(count_set(&canvas, Color::WHITE), 1);
    }

    #[test]
    fn test_color_key_skips_exact_match_only() {
        let mut canvas = canvas_8x8();
        let dst = Color::rgb(1, 2, 3);
        canvas.clear(dst);

        let key = Color::rgba(0, 255, 0, 255);
        let near_key = Color::rgba(0, 255, 0, 254); // differs only in alpha
        let other = Color::rgba(9, 9, 9, 13);
        let img = image_from(3, 1, &[key, near_key, other]);

        canvas.draw_image(&img, Point::new(0, 0), Composite::ColorKey(key));
        assert_eq!(canvas.pixel(0, 0), Some(dst), "keyed pixel never written");
        assert_eq!(canvas.pixel(1, 0), Some(near_key), "alpha is part of the key match");
        assert_eq!(canvas.pixel(2, 0), Some(other), "alpha passed through verbatim");
    }

    #[test]
    fn test_as_bytes_layout() {
        let mut canvas = Canvas::new(2, 1);
        canvas.draw_point(0, 0, Color::rgba(0x11, 0x22, 0x33, 0x44));
        let bytes = canvas.as_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &0x11223344u32.to_ne_bytes());
    }
}
