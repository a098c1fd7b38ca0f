//! RGBA pixel buffer backing the raster surface.
//!
//! Rows are padded to a 64-byte stride; use [`Framebuffer::to_compact_pixels`]
//! when an encoder needs tightly packed rows.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Row alignment in bytes.
const ROW_ALIGNMENT: usize = 64;

/// RGBA framebuffer in row-major order.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// Each pixel is 4 bytes: [R, G, B, A].
    pixels: Vec<u8>,
    /// Stride in bytes (includes alignment padding).
    stride: usize,
}

impl Framebuffer {
    /// Create a transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use trueno_chart::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);
        let pixels = vec![0; stride * (height as usize)];

        Ok(Self {
            width,
            height,
            pixels,
            stride,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// A row of pixels without padding.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        Some(&self.pixels[start..start + (self.width as usize) * 4])
    }

    /// Clear to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        let row_bytes = (self.width as usize) * 4;
        for row in self.pixels.chunks_exact_mut(self.stride) {
            for px in row[..row_bytes].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Overwrite a rectangular region. Coordinates are clamped to the buffer.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let rgba = color.to_array();
        let span = (x2 - x1) as usize * 4;
        for row_y in y1..y2 {
            let start = (row_y as usize) * self.stride + (x1 as usize) * 4;
            for px in self.pixels[start..start + span].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Alpha-blend a color over a rectangular region.
    pub fn blend_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        if color.a == 255 {
            self.fill_rect(x, y, w, h, color);
            return;
        }
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        for py in y..y2 {
            for px in x..x2 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Color at a pixel, or `None` out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.pixel_index(x, y);
        Some(Rgba::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ))
    }

    /// Blend a pixel with the "over" operator:
    /// `out = src * src_alpha + dst * dst_alpha * (1 - src_alpha)`
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a > 0.0 {
            let blend = |src: u8, dst: u8| -> u8 {
                let src_f = f32::from(src) / 255.0;
                let dst_f = f32::from(dst) / 255.0;
                let out = (src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a;
                (out * 255.0).round() as u8
            };

            self.pixels[idx] = blend(color.r, self.pixels[idx]);
            self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
            self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
            self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
        }
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Pixel data without stride padding, as PNG expects.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;
        if self.stride == row_bytes {
            return self.pixels.clone();
        }
        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for row in self.pixels.chunks_exact(self.stride) {
            compact.extend_from_slice(&row[..row_bytes]);
        }
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert_eq!(fb.stride() % ROW_ALIGNMENT, 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Framebuffer::new(0, 10),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear_and_get() {
        let mut fb = Framebuffer::new(17, 3).unwrap();
        fb.clear(Rgba::RED);
        assert_eq!(fb.get_pixel(16, 2), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(17, 0), None);
    }

    #[test]
    fn test_fill_rect_clamped() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(8, 8, 100, 100, Rgba::BLUE);
        assert_eq!(fb.get_pixel(9, 9), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(7, 7), Some(Rgba::WHITE));
    }

    #[test]
    fn test_blend_pixel_half() {
        let mut fb = Framebuffer::new(1, 1).unwrap();
        fb.clear(Rgba::WHITE);
        fb.blend_pixel(0, 0, Rgba::new(0, 0, 0, 128));
        let px = fb.get_pixel(0, 0).unwrap();
        assert!(px.r > 120 && px.r < 135);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn test_compact_pixels_strip_padding() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        fb.clear(Rgba::GREEN);
        let compact = fb.to_compact_pixels();
        assert_eq!(compact.len(), 3 * 2 * 4);
        assert!(compact.chunks_exact(4).all(|px| px == [0, 255, 0, 255]));
    }

    #[test]
    fn test_row_access() {
        let fb = Framebuffer::new(5, 5).unwrap();
        assert_eq!(fb.row(4).map(<[u8]>::len), Some(20));
        assert!(fb.row(5).is_none());
    }
}
