//! Data-space bounds and padding.

use crate::geometry::Point;

/// Axis-aligned data-space rectangle a chart's plot area maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Left edge.
    pub min_x: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge.
    pub min_y: f64,
    /// Top edge.
    pub max_y: f64,
}

/// How raw extents are padded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// 5% of the range on every side (scatter and line charts).
    Points,
    /// 2% on X, Y pinned at zero with 5% headroom (continuous histograms).
    ContinuousHistogram,
}

impl Bounds {
    /// Create bounds. Edges given in the wrong order are swapped.
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    /// Raw extent of the finite points, or `None` if there are none.
    ///
    /// The first point initializes the extent; later points widen it.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut bounds: Option<Self> = None;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            bounds = Some(match bounds {
                None => Self::new(p.x, p.x, p.y, p.y),
                Some(b) => b.include(*p),
            });
        }
        bounds
    }

    /// Widen to contain `point`.
    #[must_use]
    pub fn include(self, point: Point) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            max_x: self.max_x.max(point.x),
            min_y: self.min_y.min(point.y),
            max_y: self.max_y.max(point.y),
        }
    }

    /// Smallest bounds containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Width of the X range.
    #[must_use]
    pub fn x_range(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the Y range.
    #[must_use]
    pub fn y_range(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Apply display padding. A zero range on either axis is treated as 1.
    #[must_use]
    pub fn padded(self, padding: Padding) -> Self {
        let x_range = nonzero(self.x_range());
        let y_range = nonzero(self.y_range());
        match padding {
            Padding::Points => Self {
                min_x: self.min_x - x_range * 0.05,
                max_x: self.max_x + x_range * 0.05,
                min_y: self.min_y - y_range * 0.05,
                max_y: self.max_y + y_range * 0.05,
            },
            Padding::ContinuousHistogram => Self {
                min_x: self.min_x - x_range * 0.02,
                max_x: self.max_x + x_range * 0.02,
                min_y: 0.0,
                max_y: self.max_y + y_range * 0.05,
            },
        }
    }

    /// Bounds of a categorical bar chart with `categories` bars.
    ///
    /// X spans half a bar beyond the first and last category; Y spans
    /// `[0, max_count * 1.05]` (or `[0, 1]` when every count is zero).
    #[must_use]
    pub fn discrete(categories: usize, max_count: u64) -> Self {
        let last = categories.saturating_sub(1) as f64;
        let top = if max_count == 0 { 1.0 } else { max_count as f64 * 1.05 };
        Self::new(-0.5, last + 0.5, 0.0, top)
    }
}

fn nonzero(range: f64) -> f64 {
    if range == 0.0 {
        1.0
    } else {
        range
    }
}
