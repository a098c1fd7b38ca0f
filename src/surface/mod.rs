//! Drawing surface seam.
//!
//! The layout core issues pixel-space calls through [`DrawingSurface`] and measures
//! text through [`TextMeasure`]; it never depends on a concrete backend. Two
//! surfaces ship with the crate: [`SvgSurface`] (vector) and [`RasterSurface`]
//! (RGBA framebuffer, PNG output).

mod raster;
mod svg;

pub use raster::RasterSurface;
pub use svg::SvgSurface;

use std::ops::{Deref, DerefMut};

use crate::color::Rgba;
use crate::geometry::{Point, Rect};
use crate::style::{LineDash, MarkerShape};
use crate::transform::Placement;

/// Measured size of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    /// Advance width in pixels.
    pub width: f64,
    /// Line height in pixels.
    pub height: f64,
}

/// Horizontal alignment of text relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Text metrics provider.
pub trait TextMeasure {
    /// Extent of `text` rendered at `font_size`, in unscaled pixels.
    fn measure_text(&self, text: &str, font_size: f64) -> TextExtent;
}

/// Fixed-advance metrics: each character is `0.6 * font_size` wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMetrics;

impl TextMeasure for ApproxTextMetrics {
    fn measure_text(&self, text: &str, font_size: f64) -> TextExtent {
        TextExtent {
            width: text.chars().count() as f64 * font_size * 0.6,
            height: font_size,
        }
    }
}

/// Pixel-space drawing operations with a save/restore transform stack.
///
/// Coordinates are in the current user space; `translate` and `scale` compose onto
/// the current transform the way a canvas context does.
pub trait DrawingSurface: TextMeasure {
    /// Canvas width in device pixels.
    fn width(&self) -> f64;
    /// Canvas height in device pixels.
    fn height(&self) -> f64;

    /// Push the current transform.
    fn save(&mut self);
    /// Pop the most recently saved transform. Unbalanced calls are ignored.
    fn restore(&mut self);
    /// Translate the current user space.
    fn translate(&mut self, dx: f64, dy: f64);
    /// Uniformly scale the current user space.
    fn scale(&mut self, factor: f64);

    /// Draw a marker glyph of diameter `size` centered on `center`.
    fn marker(&mut self, center: Point, size: f64, shape: MarkerShape, color: Rgba, filled: bool);
    /// Stroke connected line segments.
    fn polyline(&mut self, points: &[Point], color: Rgba, width: f64, dash: LineDash);
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: f64);
    /// Draw a line of text with its baseline at `pos.y`.
    fn text(&mut self, pos: Point, text: &str, font_size: f64, color: Rgba, anchor: TextAnchor);
    /// Draw text rotated 90° counter-clockwise, centered on `pos`.
    fn text_rotated(&mut self, pos: Point, text: &str, font_size: f64, color: Rgba);
}

/// Saves the surface transform on creation and restores it on drop.
///
/// Restoring happens on every exit path, including early returns and `?`.
pub struct Scoped<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> Scoped<'a, S> {
    /// Save `surface` and wrap it.
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for Scoped<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for Scoped<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for Scoped<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Current transform plus the saved stack, shared by the bundled surfaces.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransformStack {
    current: Placement,
    saved: Vec<Placement>,
}

impl TransformStack {
    pub(crate) fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub(crate) fn restore(&mut self) {
        if let Some(p) = self.saved.pop() {
            self.current = p;
        }
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        self.current.offset_x += dx * self.current.scale;
        self.current.offset_y += dy * self.current.scale;
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.current.scale *= factor;
    }

    pub(crate) fn point(&self, p: Point) -> Point {
        self.current.apply(p)
    }

    pub(crate) fn rect(&self, r: Rect) -> Rect {
        self.current.apply_rect(r)
    }

    pub(crate) fn length(&self, l: f64) -> f64 {
        l * self.current.scale
    }

    pub(crate) fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// Split a polyline into the "on" segments of a dash pattern.
///
/// The pattern is scaled by `width`; an empty pattern yields each segment whole.
pub(crate) fn dash_segments(points: &[Point], pattern: &[f64], width: f64) -> Vec<(Point, Point)> {
    let pairs = points.windows(2).map(|w| (w[0], w[1]));
    let scale = width.max(1.0);
    if pattern.is_empty() || pattern.iter().all(|&d| d <= 0.0) {
        return pairs.collect();
    }

    let mut out = Vec::new();
    let mut idx = 0;
    let mut remaining = pattern[0] * scale;
    let mut on = true;
    for (a, b) in pairs {
        let len = a.distance(b);
        if len == 0.0 {
            continue;
        }
        let mut pos = 0.0;
        while pos < len {
            let step = remaining.min(len - pos);
            if on {
                let t0 = pos / len;
                let t1 = (pos + step) / len;
                out.push((lerp(a, b, t0), lerp(a, b, t1)));
            }
            pos += step;
            remaining -= step;
            if remaining <= 1e-9 {
                idx = (idx + 1) % pattern.len();
                remaining = pattern[idx] * scale;
                on = !on;
            }
        }
    }
    out
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_metrics() {
        let e = ApproxTextMetrics.measure_text("abcd", 10.0);
        assert!((e.width - 24.0).abs() < 1e-12);
        assert_eq!(e.height, 10.0);
    }

    #[test]
    fn test_transform_stack_composes() {
        let mut t = TransformStack::default();
        t.translate(10.0, 20.0);
        t.scale(2.0);
        t.translate(5.0, 5.0);
        assert_eq!(t.point(Point::new(1.0, 1.0)), Point::new(22.0, 32.0));
        assert_eq!(t.length(3.0), 6.0);
    }

    #[test]
    fn test_transform_stack_restore() {
        let mut t = TransformStack::default();
        t.save();
        t.scale(4.0);
        t.restore();
        t.restore();
        assert_eq!(t.point(Point::new(1.0, 2.0)), Point::new(1.0, 2.0));
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn test_dash_segments_solid() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 5.0)];
        assert_eq!(dash_segments(&pts, &[], 1.0).len(), 2);
    }

    #[test]
    fn test_dash_segments_pattern() {
        let pts = [Point::new(0.0, 0.0), Point::new(20.0, 0.0)];
        let segs = dash_segments(&pts, &[6.0, 4.0], 1.0);
        // on 0-6, off 6-10, on 10-16, off 16-20
        assert_eq!(segs.len(), 2);
        assert!((segs[1].0.x - 10.0).abs() < 1e-9);
        assert!((segs[1].1.x - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_dash_pattern_carries_across_vertices() {
        let pts = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 4.0)];
        let segs = dash_segments(&pts, &[6.0, 4.0], 1.0);
        // First dash spans the corner: 4 px on the first leg, 2 px on the second.
        assert_eq!(segs.len(), 2);
        assert!((segs[1].1.y - 2.0).abs() < 1e-9);
    }
}
