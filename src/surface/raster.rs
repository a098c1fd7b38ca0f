//! Raster surface over an RGBA [`Framebuffer`].
//!
//! Text is measured with [`ApproxTextMetrics`] so layout matches the vector
//! surface, but glyphs are not rasterized.

use std::path::Path;

use super::{
    dash_segments, ApproxTextMetrics, DrawingSurface, TextAnchor, TextExtent, TextMeasure,
    TransformStack,
};
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::output::PngEncoder;
use crate::render::{
    draw_circle, draw_circle_outline, draw_cross, draw_rect, draw_rect_outline, draw_thick_line,
    draw_triangle,
};
use crate::style::{LineDash, MarkerShape};

/// Pixel surface that encodes to PNG.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    fb: Framebuffer,
    transform: TransformStack,
}

impl RasterSurface {
    /// Create a surface cleared to `background`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`](crate::Error::InvalidDimensions) if
    /// either dimension is zero.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self> {
        let mut fb = Framebuffer::new(width, height)?;
        fb.clear(background);
        Ok(Self {
            fb,
            transform: TransformStack::default(),
        })
    }

    /// Underlying framebuffer.
    #[must_use]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Depth of the saved-transform stack.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.transform.depth()
    }

    /// Encode as PNG and write to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PngEncoder::write_to_file(&self.fb, path)
    }

    /// Canvas rectangle grown by `margin` on every side.
    fn canvas(&self, margin: f64) -> Rect {
        Rect::new(
            -margin,
            -margin,
            f64::from(self.fb.width()) + 2.0 * margin,
            f64::from(self.fb.height()) + 2.0 * margin,
        )
    }
}

impl TextMeasure for RasterSurface {
    fn measure_text(&self, text: &str, font_size: f64) -> TextExtent {
        ApproxTextMetrics.measure_text(text, font_size)
    }
}

impl DrawingSurface for RasterSurface {
    fn width(&self) -> f64 {
        f64::from(self.fb.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.fb.height())
    }

    fn save(&mut self) {
        self.transform.save();
    }

    fn restore(&mut self) {
        self.transform.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.translate(dx, dy);
    }

    fn scale(&mut self, factor: f64) {
        self.transform.scale(factor);
    }

    fn marker(&mut self, center: Point, size: f64, shape: MarkerShape, color: Rgba, filled: bool) {
        let c = self.transform.point(center);
        let size = self.transform.length(size);
        if !self.canvas(size).contains(c) {
            return;
        }
        let r = size / 2.0;
        match shape {
            MarkerShape::Circle => {
                let (cx, cy, ri) = (c.x.round() as i32, c.y.round() as i32, r.round() as i32);
                if filled {
                    draw_circle(&mut self.fb, cx, cy, ri, color);
                } else {
                    draw_circle_outline(&mut self.fb, cx, cy, ri, color);
                }
            }
            MarkerShape::Square => {
                let (x, y, side) = ((c.x - r).round() as i32, (c.y - r).round() as i32, size.round() as u32);
                if filled {
                    draw_rect(&mut self.fb, x, y, side, side, color);
                } else {
                    draw_rect_outline(&mut self.fb, x, y, side, side, color, 1);
                }
            }
            MarkerShape::Triangle => draw_triangle(&mut self.fb, c.x, c.y, size, color, filled),
            MarkerShape::Cross => draw_cross(&mut self.fb, c.x, c.y, size, color),
        }
    }

    fn polyline(&mut self, points: &[Point], color: Rgba, width: f64, dash: LineDash) {
        let device: Vec<Point> = points.iter().map(|&p| self.transform.point(p)).collect();
        let width = self.transform.length(width);
        for run in self.canvas(width).clip_polyline(&device) {
            for (a, b) in dash_segments(&run, dash.pattern(), width) {
                draw_thick_line(&mut self.fb, (a.x, a.y), (b.x, b.y), width, color);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some(r) = self.transform.rect(rect).intersection(&self.canvas(1.0)) else {
            return;
        };
        let (x0, y0) = (r.x.round(), r.y.round());
        let (x1, y1) = (r.right().round(), r.bottom().round());
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        draw_rect(
            &mut self.fb,
            x0 as i32,
            y0 as i32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
            color,
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64) {
        let r = self.transform.rect(rect);
        let thickness = self.transform.length(width).round().max(1.0) as u32;
        draw_rect_outline(
            &mut self.fb,
            r.x.round() as i32,
            r.y.round() as i32,
            r.width.round() as u32,
            r.height.round() as u32,
            color,
            thickness,
        );
    }

    fn text(&mut self, pos: Point, text: &str, _font_size: f64, _color: Rgba, _anchor: TextAnchor) {
        tracing::trace!(x = pos.x, y = pos.y, text, "raster surface skips glyphs");
    }

    fn text_rotated(&mut self, pos: Point, text: &str, _font_size: f64, _color: Rgba) {
        tracing::trace!(x = pos.x, y = pos.y, text, "raster surface skips glyphs");
    }
}
