//! Data-to-pixel coordinate transform.
//!
//! A chart lays itself out in its own canonical pixel space (the local space). When
//! embedded in a subplot grid, one uniform scale and translate ([`Placement`])
//! maps that local space onto the shared canvas.

use crate::bounds::Bounds;
use crate::geometry::{Point, Rect};

/// Pixel insets between the canvas edge and the plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Margins {
    /// Top inset (title space).
    pub top: f64,
    /// Right inset.
    pub right: f64,
    /// Bottom inset (X tick labels and axis label).
    pub bottom: f64,
    /// Left inset (Y tick labels and axis label).
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 60.0,
            right: 40.0,
            bottom: 70.0,
            left: 80.0,
        }
    }
}

impl Margins {
    /// Same inset on every side.
    #[must_use]
    pub const fn uniform(inset: f64) -> Self {
        Self {
            top: inset,
            right: inset,
            bottom: inset,
            left: inset,
        }
    }
}

/// Uniform scale followed by a translate, mapping local pixels onto a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Horizontal offset in canvas pixels.
    pub offset_x: f64,
    /// Vertical offset in canvas pixels.
    pub offset_y: f64,
    /// Uniform scale factor.
    pub scale: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Placement {
    /// No offset, unit scale.
    pub const IDENTITY: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// Create a placement.
    #[must_use]
    pub const fn new(offset_x: f64, offset_y: f64, scale: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale,
        }
    }

    /// Map a local point onto the canvas.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.offset_x + p.x * self.scale,
            self.offset_y + p.y * self.scale,
        )
    }

    /// Map a local rectangle onto the canvas.
    #[must_use]
    pub fn apply_rect(&self, r: Rect) -> Rect {
        let origin = self.apply(Point::new(r.x, r.y));
        Rect::new(origin.x, origin.y, r.width * self.scale, r.height * self.scale)
    }
}

/// Affine map from data space into a margin-inset plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    bounds: Bounds,
    width: f64,
    height: f64,
    margins: Margins,
    placement: Placement,
}

impl CoordinateTransform {
    /// Create a transform for a `width` x `height` local canvas.
    #[must_use]
    pub fn new(bounds: Bounds, width: f64, height: f64, margins: Margins) -> Self {
        Self {
            bounds,
            width,
            height,
            margins,
            placement: Placement::IDENTITY,
        }
    }

    /// Embed the local canvas into a shared one.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Data bounds this transform maps from.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Embedding placement.
    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Plot width in local pixels.
    #[must_use]
    pub fn plot_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    /// Plot height in local pixels.
    #[must_use]
    pub fn plot_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// Plot rectangle in local pixels.
    #[must_use]
    pub fn plot_rect(&self) -> Rect {
        Rect::new(
            self.margins.left,
            self.margins.top,
            self.plot_width(),
            self.plot_height(),
        )
    }

    /// Local pixel X of a data X.
    #[must_use]
    pub fn x_to_local(&self, x: f64) -> f64 {
        self.margins.left + (x - self.bounds.min_x) / span(self.bounds.x_range()) * self.plot_width()
    }

    /// Local pixel Y of a data Y. Larger data values sit higher on screen.
    #[must_use]
    pub fn y_to_local(&self, y: f64) -> f64 {
        self.height
            - self.margins.bottom
            - (y - self.bounds.min_y) / span(self.bounds.y_range()) * self.plot_height()
    }

    /// Map a data point into local pixels.
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(self.x_to_local(p.x), self.y_to_local(p.y))
    }

    /// Map a data point into canvas pixels (local, then placement).
    #[must_use]
    pub fn to_canvas(&self, p: Point) -> Point {
        self.placement.apply(self.to_local(p))
    }

    /// Map a local pixel back into data space.
    #[must_use]
    pub fn to_data(&self, local: Point) -> Point {
        let pw = self.plot_width();
        let ph = self.plot_height();
        let tx = if pw > 0.0 { (local.x - self.margins.left) / pw } else { 0.0 };
        let ty = if ph > 0.0 {
            (self.height - self.margins.bottom - local.y) / ph
        } else {
            0.0
        };
        Point::new(
            self.bounds.min_x + tx * span(self.bounds.x_range()),
            self.bounds.min_y + ty * span(self.bounds.y_range()),
        )
    }

    /// Pixel length of a data-space X distance.
    #[must_use]
    pub fn x_length(&self, dx: f64) -> f64 {
        dx / span(self.bounds.x_range()) * self.plot_width()
    }
}

fn span(range: f64) -> f64 {
    if range == 0.0 {
        1.0
    } else {
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(
            Bounds::new(0.0, 10.0, 0.0, 100.0),
            800.0,
            600.0,
            Margins {
                top: 50.0,
                right: 50.0,
                bottom: 50.0,
                left: 100.0,
            },
        )
    }

    #[test]
    fn test_corners() {
        let t = transform();
        let bl = t.to_local(Point::new(0.0, 0.0));
        assert_relative_eq!(bl.x, 100.0);
        assert_relative_eq!(bl.y, 550.0);
        let tr = t.to_local(Point::new(10.0, 100.0));
        assert_relative_eq!(tr.x, 750.0);
        assert_relative_eq!(tr.y, 50.0);
    }

    #[test]
    fn test_y_axis_points_up() {
        let t = transform();
        assert!(t.y_to_local(0.0) > t.y_to_local(100.0));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = transform();
        let p = Point::new(3.7, 42.0);
        let back = t.to_data(t.to_local(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
    }

    #[test]
    fn test_placement_composition() {
        let placement = Placement::new(20.0, 30.0, 0.5);
        let t = transform().with_placement(placement);
        let p = Point::new(5.0, 50.0);
        let expected = placement.apply(transform().to_local(p));
        assert_eq!(t.to_canvas(p), expected);
        assert_relative_eq!(expected.x, 20.0 + 425.0 * 0.5);
    }

    #[test]
    fn test_zero_range_does_not_divide_by_zero() {
        let t = CoordinateTransform::new(
            Bounds::new(1.0, 1.0, 2.0, 2.0),
            100.0,
            100.0,
            Margins::uniform(10.0),
        );
        assert!(t.to_local(Point::new(1.0, 2.0)).is_finite());
    }

    #[test]
    fn test_plot_rect() {
        let r = transform().plot_rect();
        assert_eq!(r, Rect::new(100.0, 50.0, 650.0, 500.0));
    }
}
