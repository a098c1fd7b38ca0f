//! Data series attached to a chart: plain series, labeled clusters and
//! reference lines.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::color::{Palette, Rgb};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::style::{LineDash, PlotStyle};
use crate::ticks::format_value;

/// Name given to points added without naming a series.
///
/// A chart whose only regular series carries this name shows no legend rows for it.
pub const DEFAULT_SERIES_NAME: &str = "default";

/// Cluster label marking an outlier.
pub const OUTLIER_LABEL: i32 = -1;

/// Legend name of the outlier group.
pub const OUTLIERS_NAME: &str = "Outliers";

// ============================================================================
// Series
// ============================================================================

/// Named, ordered points drawn with one style.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    points: Vec<Point>,
    style: PlotStyle,
}

impl Series {
    /// Create a series.
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<Point>, style: PlotStyle) -> Self {
        Self {
            name: name.into(),
            points,
            style,
        }
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Legend label: the style label if set, otherwise the series name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.style.label.as_deref().unwrap_or(&self.name)
    }

    /// Points in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Style.
    #[must_use]
    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Append points.
    pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.extend(points);
    }
}

// ============================================================================
// Cluster series
// ============================================================================

/// One label group of a [`ClusterSeries`], resolved for drawing and legends.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroup {
    /// Raw label.
    pub label: i32,
    /// Display name ("Outliers", "Cluster k" or an override).
    pub name: String,
    /// Resolved color.
    pub color: Rgb,
}

/// Points tagged with integer cluster labels.
///
/// Negative labels are outliers; non-negative labels are cluster ids. Names and
/// colors are automatic unless override maps are supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSeries {
    name: String,
    points: Vec<Point>,
    labels: Vec<i32>,
    size: f64,
    alpha: f32,
    names: BTreeMap<i32, String>,
    colors: BTreeMap<i32, Rgb>,
    auto_names: bool,
    auto_colors: bool,
}

impl ClusterSeries {
    /// Create a cluster series from parallel point and label arrays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if the arrays differ in length.
    pub fn new(name: impl Into<String>, points: &[Point], labels: &[i32]) -> Result<Self> {
        check_arity("labels", points.len(), labels.len())?;
        Ok(Self {
            name: name.into(),
            points: points.to_vec(),
            labels: labels.to_vec(),
            size: 6.0,
            alpha: 0.8,
            names: BTreeMap::new(),
            colors: BTreeMap::new(),
            auto_names: true,
            auto_colors: true,
        })
    }

    /// Use custom names; labels missing from the map keep their default name.
    #[must_use]
    pub fn with_names(mut self, names: BTreeMap<i32, String>) -> Self {
        self.names = names;
        self.auto_names = false;
        self
    }

    /// Use custom colors; labels missing from the map keep their default color.
    #[must_use]
    pub fn with_colors(mut self, colors: BTreeMap<i32, Rgb>) -> Self {
        self.colors = colors;
        self.auto_colors = false;
        self
    }

    /// Marker size shared by all points.
    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size.max(0.0);
        self
    }

    /// Opacity shared by all points.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        self
    }

    /// Append labeled points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if the arrays differ in length; nothing is
    /// appended in that case.
    pub fn extend(&mut self, points: &[Point], labels: &[i32]) -> Result<()> {
        check_arity("labels", points.len(), labels.len())?;
        self.points.extend_from_slice(points);
        self.labels.extend_from_slice(labels);
        Ok(())
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Labels parallel to [`points`](Self::points).
    #[must_use]
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Shared marker size.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Shared opacity.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Resolve every label present into a named, colored group.
    ///
    /// Outliers come first (all negative labels share one group), then clusters in
    /// ascending label order numbered from 1.
    #[must_use]
    pub fn groups(&self, palette: &Palette) -> Vec<ClusterGroup> {
        let present: BTreeSet<i32> = self.labels.iter().map(|&l| l.max(OUTLIER_LABEL)).collect();
        let mut groups = Vec::with_capacity(present.len());
        let mut ordinal = 0usize;

        for label in present {
            let (default_name, default_color) = if label == OUTLIER_LABEL {
                (OUTLIERS_NAME.to_string(), Rgb::OUTLIER_GRAY)
            } else {
                ordinal += 1;
                (format!("Cluster {ordinal}"), palette.color(ordinal - 1))
            };
            let name = self
                .names
                .get(&label)
                .filter(|_| !self.auto_names)
                .cloned()
                .unwrap_or(default_name);
            let color = self
                .colors
                .get(&label)
                .filter(|_| !self.auto_colors)
                .copied()
                .unwrap_or(default_color);
            groups.push(ClusterGroup { label, name, color });
        }
        groups
    }
}

// ============================================================================
// Reference lines
// ============================================================================

/// Axis a reference line is drawn across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Constant X value.
    Vertical,
    /// Constant Y value.
    Horizontal,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// A full-width or full-height line at a fixed data value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    orientation: Orientation,
    value: f64,
    style: PlotStyle,
    label: String,
}

impl ReferenceLine {
    /// Create a dashed dark-gray line labeled with its formatted value.
    #[must_use]
    pub fn new(orientation: Orientation, value: f64) -> Self {
        Self {
            orientation,
            value,
            style: PlotStyle::new(Rgb::new(0.25, 0.25, 0.25))
                .with_dash(LineDash::Dashed)
                .with_line_width(1.5),
            label: format_value(value),
        }
    }

    /// Vertical line at `x`.
    #[must_use]
    pub fn vertical(x: f64) -> Self {
        Self::new(Orientation::Vertical, x)
    }

    /// Horizontal line at `y`.
    #[must_use]
    pub fn horizontal(y: f64) -> Self {
        Self::new(Orientation::Horizontal, y)
    }

    /// Replace the automatic label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replace the style.
    #[must_use]
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    /// Orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Data value along the line's axis.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Style.
    #[must_use]
    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Legend label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

pub(crate) fn check_arity(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::ArityMismatch {
            what,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, i as f64)).collect()
    }

    #[test]
    fn test_series_label_prefers_style_label() {
        let s = Series::new("a", pts(2), PlotStyle::default());
        assert_eq!(s.label(), "a");
        let s = Series::new("a", pts(2), PlotStyle::default().with_label("Alpha"));
        assert_eq!(s.label(), "Alpha");
    }

    #[test]
    fn test_cluster_arity_mismatch() {
        let err = ClusterSeries::new("c", &pts(3), &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                what: "labels",
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_cluster_extend_rejects_without_mutation() {
        let mut c = ClusterSeries::new("c", &pts(2), &[0, 0]).unwrap();
        assert!(c.extend(&pts(2), &[1]).is_err());
        assert_eq!(c.points().len(), 2);
        assert_eq!(c.labels().len(), 2);
    }

    #[test]
    fn test_cluster_groups_default_order() {
        let c = ClusterSeries::new("c", &pts(5), &[3, -1, 0, 3, -1]).unwrap();
        let palette = Palette::default();
        let groups = c.groups(&palette);
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Outliers", "Cluster 1", "Cluster 2"]);
        assert_eq!(groups[0].color, Rgb::OUTLIER_GRAY);
        assert_eq!(groups[1].label, 0);
        assert_eq!(groups[1].color, palette.color(0));
        assert_eq!(groups[2].label, 3);
        assert_eq!(groups[2].color, palette.color(1));
    }

    #[test]
    fn test_cluster_partial_overrides() {
        let names = BTreeMap::from([(1, "Big".to_string())]);
        let colors = BTreeMap::from([(-1, Rgb::BLACK)]);
        let c = ClusterSeries::new("c", &pts(3), &[-1, 0, 1])
            .unwrap()
            .with_names(names)
            .with_colors(colors);
        let groups = c.groups(&Palette::default());
        assert_eq!(groups[0].name, "Outliers");
        assert_eq!(groups[0].color, Rgb::BLACK);
        assert_eq!(groups[1].name, "Cluster 1");
        assert_eq!(groups[2].name, "Big");
    }

    #[test]
    fn test_reference_line_auto_label() {
        assert_eq!(ReferenceLine::vertical(2.50).label(), "2.5");
        assert_eq!(ReferenceLine::horizontal(-3.0).label(), "-3");
        assert_eq!(ReferenceLine::vertical(1.0).with_label("mean").label(), "mean");
    }

    #[test]
    fn test_orientation_display() {
        assert_eq!(Orientation::Vertical.to_string(), "vertical");
        assert_eq!(Orientation::Horizontal.to_string(), "horizontal");
    }
}
