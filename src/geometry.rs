//! Geometric primitives for chart layout.
//!
//! Data-space points and pixel-space rectangles share the same `f64` types; which
//! space a value lives in is decided by the transform that produced it.

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f64,
    /// Y coordinate of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points, in any order.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
        )
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Get the center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True if the interiors of the two rectangles intersect.
    ///
    /// Rectangles that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlap of two rectangles, or `None` if their interiors are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Clip the segment `a`-`b` to this rectangle (Liang-Barsky).
    ///
    /// Endpoints already inside are returned unchanged. `None` if the segment
    /// misses the rectangle or has a non-finite coordinate.
    #[must_use]
    pub fn clip_segment(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        if !(a.is_finite() && dx.is_finite() && dy.is_finite()) {
            return None;
        }
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [
            (-dx, a.x - self.x),
            (dx, self.right() - a.x),
            (-dy, a.y - self.y),
            (dy, self.bottom() - a.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        let at = |t: f64| Point::new(a.x + dx * t, a.y + dy * t);
        let start = if t0 > 0.0 { at(t0) } else { a };
        let end = if t1 < 1.0 { at(t1) } else { b };
        Some((start, end))
    }

    /// Clip a polyline to this rectangle.
    ///
    /// Each returned run has at least two points; a run breaks wherever the line
    /// leaves the rectangle.
    #[must_use]
    pub fn clip_polyline(&self, points: &[Point]) -> Vec<Vec<Point>> {
        let mut runs = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        for w in points.windows(2) {
            match self.clip_segment(w[0], w[1]) {
                Some((a, b)) => {
                    if current.last() != Some(&a) {
                        flush_run(&mut runs, &mut current);
                        current.push(a);
                    }
                    current.push(b);
                }
                None => flush_run(&mut runs, &mut current),
            }
        }
        flush_run(&mut runs, &mut current);
        runs
    }
}

fn flush_run(runs: &mut Vec<Vec<Point>>, current: &mut Vec<Point>) {
    if current.len() >= 2 {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(p2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_from_tuple() {
        let p: Point = (1.5, -2.0).into();
        assert_eq!(p, Point::new(1.5, -2.0));
    }

    #[test]
    fn test_rect_from_corners_any_order() {
        let r = Rect::from_corners(Point::new(10.0, 8.0), Point::new(2.0, 4.0));
        assert_eq!(r, Rect::new(2.0, 4.0, 8.0, 4.0));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(5.0, 5.0)));
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(!rect.contains(Point::new(15.0, 5.0)));
    }

    #[test]
    fn test_rect_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&touching));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            a.intersection(&Rect::new(5.0, -5.0, 1e9, 8.0)),
            Some(Rect::new(5.0, 0.0, 5.0, 3.0))
        );
        assert!(a.intersection(&Rect::new(10.0, 0.0, 5.0, 5.0)).is_none());
    }

    #[test]
    fn test_clip_segment_inside_unchanged() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let (a, b) = (Point::new(1.0, 2.0), Point::new(8.0, 9.0));
        assert_eq!(r.clip_segment(a, b), Some((a, b)));
    }

    #[test]
    fn test_clip_segment_far_outside_endpoint() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let (a, b) = r
            .clip_segment(Point::new(0.0, 5.0), Point::new(3e9, 5.0))
            .unwrap();
        assert_eq!(a, Point::new(0.0, 5.0));
        assert!((b.x - 10.0).abs() < 1e-6);
        assert!(r.clip_segment(Point::new(-5.0, -5.0), Point::new(-1.0, 20.0)).is_none());
        assert!(r
            .clip_segment(Point::new(1.0, 1.0), Point::new(f64::INFINITY, 1.0))
            .is_none());
    }

    #[test]
    fn test_clip_polyline_breaks_runs() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let pts = [
            Point::new(1.0, 1.0),
            Point::new(5.0, 1.0),
            Point::new(5.0, 50.0),
            Point::new(6.0, 50.0),
            Point::new(6.0, 2.0),
            Point::new(9.0, 2.0),
        ];
        let runs = r.clip_polyline(&pts);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 3);
        assert!(runs[0][2].distance(Point::new(5.0, 10.0)) < 1e-9);
        assert_eq!(runs[1].len(), 3);
        assert!(runs[1][0].distance(Point::new(6.0, 10.0)) < 1e-9);
        assert_eq!(runs[1][2], Point::new(9.0, 2.0));
    }

    #[test]
    fn test_rect_center() {
        let c = Rect::new(10.0, 20.0, 4.0, 6.0).center();
        assert_eq!(c, Point::new(12.0, 23.0));
    }
}
