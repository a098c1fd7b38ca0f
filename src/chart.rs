//! Charts: one closed set of kinds sharing bounds, axes, legend and render pass.
//!
//! A [`Chart`] owns its data layers, reference lines and palette. Derived state
//! (bounds, ticks, legend rows, the coordinate transform) is recomputed from the
//! layers on demand; only the bounds are cached, and every mutation invalidates
//! that cache.
//!
//! ```
//! use trueno_chart::prelude::*;
//!
//! let mut chart = Chart::scatter();
//! chart.add_points(&[Point::new(0.0, 1.0), Point::new(4.0, 3.0)]).unwrap();
//! chart.add_horizontal_line(2.0).unwrap();
//!
//! let bounds = chart.bounds().unwrap();
//! assert!(bounds.min_x < 0.0 && bounds.max_x > 4.0);
//! assert_eq!(chart.legend_entries().len(), 1);
//! ```

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use tracing::{debug, trace};

use crate::bounds::{Bounds, Padding};
use crate::color::{Palette, Rgb, Rgba};
use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::histogram::{
    ContinuousHistogram, DiscreteHistogram, HistogramMode, HistogramSeries, HistogramSet,
    BAR_WIDTH,
};
use crate::legend::{self, LegendEntry, LegendSources, SymbolKind};
use crate::output::{self, Renderable};
use crate::series::{
    ClusterSeries, Orientation, ReferenceLine, Series, DEFAULT_SERIES_NAME, OUTLIER_LABEL,
};
use crate::style::{LineDash, MarkerShape, PlotStyle};
use crate::surface::{DrawingSurface, TextAnchor};
use crate::ticks::{format_value, nice_ticks};
use crate::transform::CoordinateTransform;

/// Placeholder text drawn when a chart has no data.
pub const EMPTY_PLACEHOLDER: &str = "No data";

const AXIS_COLOR: Rgba = Rgba::BLACK;
const GRID_COLOR: Rgba = Rgba::rgb(225, 225, 225);
const TEXT_COLOR: Rgba = Rgba::rgb(30, 30, 30);
const LEGEND_FILL: Rgba = Rgba::new(255, 255, 255, 230);
const LEGEND_BORDER: Rgba = Rgba::rgb(160, 160, 160);
const TICK_LENGTH: f64 = 5.0;

/// Kind of a chart. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChartKind {
    /// Markers at data points.
    Scatter,
    /// Connected polylines.
    Line,
    /// Continuous or categorical bars.
    Histogram,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scatter => "scatter",
            Self::Line => "line",
            Self::Histogram => "histogram",
        })
    }
}

/// Per-kind data layers.
#[derive(Debug, Clone)]
enum Layers {
    Points {
        series: Vec<Series>,
        clusters: Vec<ClusterSeries>,
    },
    Histogram(HistogramSet),
}

impl Layers {
    fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Scatter | ChartKind::Line => Self::Points {
                series: Vec::new(),
                clusters: Vec::new(),
            },
            ChartKind::Histogram => Self::Histogram(HistogramSet::default()),
        }
    }
}

/// A single chart.
#[derive(Debug, Clone)]
pub struct Chart {
    kind: ChartKind,
    config: ChartConfig,
    palette: Palette,
    layers: Layers,
    reference_lines: Vec<ReferenceLine>,
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    manual_bounds: Option<Bounds>,
    cached_bounds: Cell<Option<Bounds>>,
    hidden: BTreeSet<String>,
}

impl Chart {
    /// Create an empty chart of `kind` with default configuration.
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            config: ChartConfig::default(),
            palette: Palette::default(),
            layers: Layers::for_kind(kind),
            reference_lines: Vec::new(),
            title: None,
            x_label: None,
            y_label: None,
            manual_bounds: None,
            cached_bounds: Cell::new(None),
            hidden: BTreeSet::new(),
        }
    }

    /// Empty scatter chart.
    #[must_use]
    pub fn scatter() -> Self {
        Self::new(ChartKind::Scatter)
    }

    /// Empty line chart.
    #[must_use]
    pub fn line() -> Self {
        Self::new(ChartKind::Line)
    }

    /// Empty histogram chart.
    #[must_use]
    pub fn histogram() -> Self {
        Self::new(ChartKind::Histogram)
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the palette used for automatic colors.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Chart kind.
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Palette.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Regular series (empty for histogram charts).
    #[must_use]
    pub fn series(&self) -> &[Series] {
        match &self.layers {
            Layers::Points { series, .. } => series.as_slice(),
            Layers::Histogram(_) => &[],
        }
    }

    /// Cluster series (empty for histogram charts).
    #[must_use]
    pub fn clusters(&self) -> &[ClusterSeries] {
        match &self.layers {
            Layers::Points { clusters, .. } => clusters.as_slice(),
            Layers::Histogram(_) => &[],
        }
    }

    /// Histogram data, if this is a histogram chart.
    #[must_use]
    pub fn histograms(&self) -> Option<&HistogramSet> {
        match &self.layers {
            Layers::Histogram(set) => Some(set),
            Layers::Points { .. } => None,
        }
    }

    /// Reference lines in add order.
    #[must_use]
    pub fn reference_lines(&self) -> &[ReferenceLine] {
        &self.reference_lines
    }

    /// True if no layer holds data. Reference lines do not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.layers {
            Layers::Points { series, clusters } => {
                series.iter().all(|s| s.points().is_empty())
                    && clusters.iter().all(|c| c.points().is_empty())
            }
            Layers::Histogram(set) => set.is_empty(),
        }
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Style the next automatically styled series gets.
    #[must_use]
    pub fn next_auto_style(&self) -> PlotStyle {
        self.palette.auto_style(self.series().len())
    }

    /// Add a named point series.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] on a histogram chart.
    pub fn add_series(&mut self, series: Series) -> Result<()> {
        let (list, _) = self.points_layers_mut(ChartKind::Scatter)?;
        debug!(series = series.name(), points = series.points().len(), "added series");
        list.push(series);
        self.invalidate();
        Ok(())
    }

    /// Append points to the unnamed placeholder series, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] on a histogram chart.
    pub fn add_points(&mut self, points: &[Point]) -> Result<()> {
        let style = self.next_auto_style();
        let (list, _) = self.points_layers_mut(ChartKind::Scatter)?;
        match list.iter_mut().find(|s| s.name() == DEFAULT_SERIES_NAME) {
            Some(series) => series.extend(points.iter().copied()),
            None => list.push(Series::new(DEFAULT_SERIES_NAME, points.to_vec(), style)),
        }
        debug!(points = points.len(), "added points to placeholder series");
        self.invalidate();
        Ok(())
    }

    /// Add a cluster series as a new legend group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] unless this is a scatter chart.
    pub fn add_clusters(&mut self, clusters: ClusterSeries) -> Result<()> {
        self.expect_kind(ChartKind::Scatter)?;
        let (_, list) = self.points_layers_mut(ChartKind::Scatter)?;
        debug!(
            series = clusters.name(),
            points = clusters.points().len(),
            "added cluster series"
        );
        list.push(clusters);
        self.invalidate();
        Ok(())
    }

    /// Add labeled points as a new cluster series with automatic names and colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if `points` and `labels` differ in length,
    /// or [`Error::KindMismatch`] unless this is a scatter chart. Nothing is added
    /// on error.
    pub fn add_cluster_points(&mut self, points: &[Point], labels: &[i32]) -> Result<()> {
        let name = format!("clusters {}", self.clusters().len() + 1);
        self.add_clusters(ClusterSeries::new(name, points, labels)?)
    }

    /// Add a reference line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedReferenceLineOrientation`] for a vertical line on
    /// a discrete histogram chart.
    pub fn add_reference_line(&mut self, line: ReferenceLine) -> Result<()> {
        let discrete = self
            .histograms()
            .and_then(HistogramSet::mode)
            .is_some_and(|m| m == HistogramMode::Discrete);
        if discrete && line.orientation() == Orientation::Vertical {
            return Err(Error::UnsupportedReferenceLineOrientation {
                orientation: line.orientation(),
            });
        }
        debug!(orientation = %line.orientation(), value = line.value(), "added reference line");
        self.reference_lines.push(line);
        Ok(())
    }

    /// Add a vertical reference line at `x`.
    ///
    /// # Errors
    ///
    /// See [`add_reference_line`](Self::add_reference_line).
    pub fn add_vertical_line(&mut self, x: f64) -> Result<()> {
        self.add_reference_line(ReferenceLine::vertical(x))
    }

    /// Add a horizontal reference line at `y`.
    ///
    /// # Errors
    ///
    /// See [`add_reference_line`](Self::add_reference_line).
    pub fn add_horizontal_line(&mut self, y: f64) -> Result<()> {
        self.add_reference_line(ReferenceLine::horizontal(y))
    }

    /// Add a continuous or discrete histogram.
    ///
    /// # Errors
    ///
    /// - [`Error::KindMismatch`] unless this is a histogram chart.
    /// - [`Error::IncompatibleHistogramMode`] if the chart already holds the other
    ///   mode.
    /// - [`Error::UnsupportedReferenceLineOrientation`] when adding discrete data
    ///   to a chart that carries a vertical reference line.
    pub fn add_histogram(&mut self, histogram: impl Into<HistogramSeries>) -> Result<()> {
        let histogram = histogram.into();
        let mode = histogram.mode();
        self.expect_kind(ChartKind::Histogram)?;
        if let Some(set) = self.histograms() {
            set.check_mode(mode)?;
        }
        if mode == HistogramMode::Discrete {
            if let Some(line) = self
                .reference_lines
                .iter()
                .find(|l| l.orientation() == Orientation::Vertical)
            {
                return Err(Error::UnsupportedReferenceLineOrientation {
                    orientation: line.orientation(),
                });
            }
        }
        let set = self.histogram_set_mut()?;
        set.push(histogram)?;
        debug!(%mode, series = set.len(), "added histogram");
        self.invalidate();
        Ok(())
    }

    /// Add raw samples as a continuous histogram with an automatic style.
    ///
    /// # Errors
    ///
    /// See [`add_histogram`](Self::add_histogram).
    pub fn add_histogram_values(&mut self, name: impl Into<String>, values: &[f64]) -> Result<()> {
        let index = self.histograms().map_or(0, HistogramSet::len);
        let style = self.palette.auto_style(index).with_alpha(0.7);
        let histogram = ContinuousHistogram::new(name, values)
            .with_style(style)
            .with_max_bins(self.config.max_bins);
        self.add_histogram(histogram)
    }

    /// Add categorical bars from parallel counts, names and styles.
    ///
    /// # Errors
    ///
    /// [`Error::ArityMismatch`] if the arrays differ in length, plus everything
    /// [`add_histogram`](Self::add_histogram) returns.
    pub fn add_categories<S: AsRef<str>>(
        &mut self,
        counts: &[u64],
        names: &[S],
        styles: &[PlotStyle],
    ) -> Result<()> {
        self.add_histogram(DiscreteHistogram::new(counts, names, styles)?)
    }

    /// Remove all data and reference lines, and any manual bounds.
    ///
    /// Titles, labels, hidden legend names and configuration are kept.
    pub fn clear(&mut self) {
        self.layers = Layers::for_kind(self.kind);
        self.reference_lines.clear();
        self.manual_bounds = None;
        self.invalidate();
        debug!(kind = %self.kind, "cleared chart");
    }

    fn expect_kind(&self, expected: ChartKind) -> Result<()> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(Error::KindMismatch {
                expected,
                found: self.kind,
            })
        }
    }

    fn points_layers_mut(
        &mut self,
        expected: ChartKind,
    ) -> Result<(&mut Vec<Series>, &mut Vec<ClusterSeries>)> {
        match &mut self.layers {
            Layers::Points { series, clusters } => Ok((series, clusters)),
            Layers::Histogram(_) => Err(Error::KindMismatch {
                expected,
                found: self.kind,
            }),
        }
    }

    fn histogram_set_mut(&mut self) -> Result<&mut HistogramSet> {
        match &mut self.layers {
            Layers::Histogram(set) => Ok(set),
            Layers::Points { .. } => Err(Error::KindMismatch {
                expected: ChartKind::Histogram,
                found: self.kind,
            }),
        }
    }

    fn invalidate(&self) {
        self.cached_bounds.set(None);
    }

    // ========================================================================
    // Annotation
    // ========================================================================

    /// Set the chart title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set the X axis label.
    pub fn set_x_label(&mut self, label: impl Into<String>) {
        self.x_label = Some(label.into());
    }

    /// Set the Y axis label.
    pub fn set_y_label(&mut self, label: impl Into<String>) {
        self.y_label = Some(label.into());
    }

    /// Chart title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Override the computed bounds until [`clear_bounds`](Self::clear_bounds).
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.manual_bounds = Some(bounds);
    }

    /// Return to data-derived bounds.
    pub fn clear_bounds(&mut self) {
        self.manual_bounds = None;
        self.invalidate();
    }

    /// Toggle the legend box.
    pub fn set_legend_enabled(&mut self, enabled: bool) {
        self.config.legend_enabled = enabled;
    }

    /// Hide every legend row named `name`.
    pub fn hide_legend_entry(&mut self, name: impl Into<String>) {
        self.hidden.insert(name.into());
    }

    /// Show legend rows named `name` again.
    pub fn show_legend_entry(&mut self, name: &str) {
        self.hidden.remove(name);
    }

    /// Visible legend rows in display order.
    #[must_use]
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        let empty = HistogramSet::default();
        let series_symbol: fn(&PlotStyle) -> SymbolKind = match self.kind {
            ChartKind::Scatter => legend::marker_symbol,
            ChartKind::Line => legend::line_symbol,
            ChartKind::Histogram => |_| SymbolKind::Bar,
        };
        let sources = LegendSources {
            series: self.series(),
            series_symbol,
            reference_lines: &self.reference_lines,
            clusters: self.clusters(),
            histograms: self.histograms().unwrap_or(&empty),
            palette: &self.palette,
        };
        legend::assemble(&sources, &self.hidden)
    }

    // ========================================================================
    // Derived geometry
    // ========================================================================

    /// Display bounds: the manual override, else padded data bounds.
    ///
    /// `None` when there is no data and no override.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        if let Some(bounds) = self.manual_bounds {
            return Some(bounds);
        }
        if let Some(bounds) = self.cached_bounds.get() {
            return Some(bounds);
        }
        let bounds = self.compute_bounds();
        trace!(?bounds, kind = %self.kind, "recomputed bounds");
        self.cached_bounds.set(bounds);
        bounds
    }

    fn compute_bounds(&self) -> Option<Bounds> {
        match &self.layers {
            Layers::Points { series, clusters } => Bounds::from_points(
                series
                    .iter()
                    .flat_map(Series::points)
                    .chain(clusters.iter().flat_map(ClusterSeries::points)),
            )
            .map(|b| b.padded(Padding::Points)),
            Layers::Histogram(set) => set.bounds(),
        }
    }

    /// True if the X axis is categorical.
    fn is_discrete(&self) -> bool {
        self.histograms()
            .and_then(HistogramSet::mode)
            .is_some_and(|m| m == HistogramMode::Discrete)
    }

    /// X tick positions. Categorical charts tick every category.
    #[must_use]
    pub fn x_ticks(&self) -> Vec<f64> {
        self.x_tick_labels().into_iter().map(|(v, _)| v).collect()
    }

    /// Y tick positions.
    #[must_use]
    pub fn y_ticks(&self) -> Vec<f64> {
        self.bounds().map_or_else(Vec::new, |b| {
            nice_ticks(b.min_y, b.max_y, self.config.tick_count)
        })
    }

    fn x_tick_labels(&self) -> Vec<(f64, String)> {
        if self.is_discrete() {
            return self
                .histograms()
                .into_iter()
                .flat_map(HistogramSet::categories)
                .enumerate()
                .map(|(i, c)| (i as f64, c.name.clone()))
                .collect();
        }
        self.bounds().map_or_else(Vec::new, |b| {
            nice_ticks(b.min_x, b.max_x, self.config.tick_count)
                .into_iter()
                .map(|v| (v, format_value(v)))
                .collect()
        })
    }

    /// Data-to-local-pixel transform for the current bounds.
    #[must_use]
    pub fn transform(&self) -> Option<CoordinateTransform> {
        self.bounds().map(|b| {
            CoordinateTransform::new(
                b,
                f64::from(self.config.width),
                f64::from(self.config.height),
                self.config.margins,
            )
        })
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw the chart into `surface` in the chart's local pixel space.
    ///
    /// Callers embedding the chart apply their own translate and scale first.
    pub fn render<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        let width = f64::from(self.config.width);
        let height = f64::from(self.config.height);
        surface.fill_rect(Rect::new(0.0, 0.0, width, height), self.config.background);

        if let Some(title) = &self.title {
            let size = self.config.title_font_size;
            let y = self.config.margins.top / 2.0 + size / 3.0;
            surface.text(Point::new(width / 2.0, y), title, size, TEXT_COLOR, TextAnchor::Middle);
        }

        let Some(transform) = self.transform() else {
            let plot = CoordinateTransform::new(
                Bounds::new(0.0, 1.0, 0.0, 1.0),
                width,
                height,
                self.config.margins,
            )
            .plot_rect();
            surface.stroke_rect(plot, AXIS_COLOR, 1.0);
            let center = plot.center();
            surface.text(
                center,
                EMPTY_PLACEHOLDER,
                self.config.label_font_size,
                TEXT_COLOR,
                TextAnchor::Middle,
            );
            self.draw_axis_labels(surface, plot);
            return;
        };

        let plot = transform.plot_rect();
        self.draw_axes(surface, &transform);
        surface.stroke_rect(plot, AXIS_COLOR, 1.0);
        self.draw_data(surface, &transform);
        self.draw_reference_lines(surface, &transform);
        self.draw_axis_labels(surface, plot);
        if self.config.legend_enabled {
            self.draw_legend(surface, plot);
        }
    }

    fn draw_axes<S: DrawingSurface + ?Sized>(&self, surface: &mut S, t: &CoordinateTransform) {
        let plot = t.plot_rect();
        let bounds = t.bounds();
        let font = self.config.tick_font_size;
        let discrete = self.is_discrete();

        for (value, label) in self.x_tick_labels() {
            if value < bounds.min_x || value > bounds.max_x {
                continue;
            }
            let x = t.x_to_local(value);
            if self.config.show_grid && !discrete {
                surface.polyline(
                    &[Point::new(x, plot.y), Point::new(x, plot.bottom())],
                    GRID_COLOR,
                    1.0,
                    LineDash::Solid,
                );
            }
            surface.polyline(
                &[Point::new(x, plot.bottom()), Point::new(x, plot.bottom() + TICK_LENGTH)],
                AXIS_COLOR,
                1.0,
                LineDash::Solid,
            );
            surface.text(
                Point::new(x, plot.bottom() + TICK_LENGTH + font + 2.0),
                &label,
                font,
                TEXT_COLOR,
                TextAnchor::Middle,
            );
        }

        for value in self.y_ticks() {
            if value < bounds.min_y || value > bounds.max_y {
                continue;
            }
            let y = t.y_to_local(value);
            if self.config.show_grid {
                surface.polyline(
                    &[Point::new(plot.x, y), Point::new(plot.right(), y)],
                    GRID_COLOR,
                    1.0,
                    LineDash::Solid,
                );
            }
            surface.polyline(
                &[Point::new(plot.x - TICK_LENGTH, y), Point::new(plot.x, y)],
                AXIS_COLOR,
                1.0,
                LineDash::Solid,
            );
            surface.text(
                Point::new(plot.x - TICK_LENGTH - 3.0, y + font * 0.35),
                &format_value(value),
                font,
                TEXT_COLOR,
                TextAnchor::End,
            );
        }
    }

    fn draw_data<S: DrawingSurface + ?Sized>(&self, surface: &mut S, t: &CoordinateTransform) {
        match &self.layers {
            Layers::Points { series, clusters } => {
                for s in series {
                    self.draw_series(surface, t, s);
                }
                for c in clusters {
                    self.draw_clusters(surface, t, c);
                }
            }
            Layers::Histogram(set) => {
                let plot = t.plot_rect();
                let base = t.y_to_local(0.0);
                let mut bar = |rect: Rect, color: Rgba| {
                    if let Some(visible) = rect.intersection(&plot) {
                        surface.fill_rect(visible, color);
                    }
                };
                for (h, bins) in set.continuous() {
                    let color = h.style().rgba();
                    for (left, right, count) in bins.iter() {
                        let x0 = t.x_to_local(left);
                        let x1 = t.x_to_local(right);
                        let top = t.y_to_local(count as f64);
                        bar(Rect::new(x0, top, x1 - x0, base - top), color);
                    }
                }
                for (i, c) in set.categories().enumerate() {
                    let x0 = t.x_to_local(i as f64 - BAR_WIDTH / 2.0);
                    let top = t.y_to_local(c.count as f64);
                    let width = t.x_length(BAR_WIDTH);
                    bar(Rect::new(x0, top, width, base - top), c.style.rgba());
                }
            }
        }
    }

    fn draw_series<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        t: &CoordinateTransform,
        series: &Series,
    ) {
        let style = series.style();
        let color = style.rgba();
        let plot = t.plot_rect();
        match self.kind {
            ChartKind::Line => {
                // Non-finite points break the line.
                for run in series.points().split(|p| !p.is_finite()) {
                    let local: Vec<Point> = run.iter().map(|&p| t.to_local(p)).collect();
                    for piece in plot.clip_polyline(&local) {
                        surface.polyline(&piece, color, style.line_width, style.dash);
                    }
                }
            }
            _ => {
                let visible = series
                    .points()
                    .iter()
                    .filter(|p| p.is_finite())
                    .map(|&p| t.to_local(p))
                    .filter(|&p| plot.contains(p));
                for p in visible {
                    surface.marker(p, style.size, style.marker, color, style.filled);
                }
            }
        }
    }

    fn draw_clusters<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        t: &CoordinateTransform,
        clusters: &ClusterSeries,
    ) {
        let colors: BTreeMap<i32, Rgb> = clusters
            .groups(&self.palette)
            .into_iter()
            .map(|g| (g.label, g.color))
            .collect();
        let plot = t.plot_rect();
        for (p, &label) in clusters.points().iter().zip(clusters.labels()) {
            let local = t.to_local(*p);
            if !(p.is_finite() && plot.contains(local)) {
                continue;
            }
            let color = colors
                .get(&label.max(OUTLIER_LABEL))
                .copied()
                .unwrap_or(Rgb::OUTLIER_GRAY);
            surface.marker(
                local,
                clusters.size(),
                MarkerShape::Circle,
                color.to_rgba(clusters.alpha()),
                true,
            );
        }
    }

    fn draw_reference_lines<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        t: &CoordinateTransform,
    ) {
        let plot = t.plot_rect();
        let bounds = t.bounds();
        for line in &self.reference_lines {
            let v = line.value();
            let ends = match line.orientation() {
                Orientation::Vertical if (bounds.min_x..=bounds.max_x).contains(&v) => {
                    let x = t.x_to_local(v);
                    [Point::new(x, plot.y), Point::new(x, plot.bottom())]
                }
                Orientation::Horizontal if (bounds.min_y..=bounds.max_y).contains(&v) => {
                    let y = t.y_to_local(v);
                    [Point::new(plot.x, y), Point::new(plot.right(), y)]
                }
                _ => {
                    trace!(value = v, "reference line outside bounds");
                    continue;
                }
            };
            let style = line.style();
            surface.polyline(&ends, style.rgba(), style.line_width, style.dash);
        }
    }

    fn draw_axis_labels<S: DrawingSurface + ?Sized>(&self, surface: &mut S, plot: Rect) {
        let size = self.config.label_font_size;
        if let Some(label) = &self.x_label {
            let y = plot.bottom() + TICK_LENGTH + 2.0 * self.config.tick_font_size + size;
            surface.text(
                Point::new(plot.center().x, y),
                label,
                size,
                TEXT_COLOR,
                TextAnchor::Middle,
            );
        }
        if let Some(label) = &self.y_label {
            let x = self.config.margins.left * 0.25;
            surface.text_rotated(Point::new(x, plot.center().y), label, size, TEXT_COLOR);
        }
    }

    fn draw_legend<S: DrawingSurface + ?Sized>(&self, surface: &mut S, plot: Rect) {
        let entries = self.legend_entries();
        let font = self.config.legend_font_size;
        let Some(layout) = legend::layout(&entries, plot, font, &*surface) else {
            return;
        };
        surface.fill_rect(layout.frame, LEGEND_FILL);
        surface.stroke_rect(layout.frame, LEGEND_BORDER, 1.0);

        let half = layout.symbol_width / 2.0;
        for (entry, row) in entries.iter().zip(&layout.rows) {
            let c = row.symbol_center;
            let color = entry.style.rgba();
            match entry.symbol {
                SymbolKind::Marker(shape) => {
                    let size = entry.style.size.min(font);
                    surface.marker(c, size, shape, color, entry.style.filled);
                }
                SymbolKind::Line(dash) => surface.polyline(
                    &[Point::new(c.x - half, c.y), Point::new(c.x + half, c.y)],
                    color,
                    entry.style.line_width,
                    dash,
                ),
                SymbolKind::Bar => {
                    let side = font * 0.8;
                    surface.fill_rect(
                        Rect::new(c.x - side / 2.0, c.y - side / 2.0, side, side),
                        color,
                    );
                }
            }
            surface.text(row.text_origin, &entry.name, font, TEXT_COLOR, TextAnchor::Start);
        }
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Render and write to `path`; the format follows the extension.
    ///
    /// Returns `false` on failure; the cause is logged.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> bool {
        output::save(self, path)
    }

    /// Render and write to `path`, returning the failure cause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for an unknown extension, or the
    /// underlying I/O or encoding error.
    pub fn try_save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        output::try_save(self, path)
    }
}

impl Renderable for Chart {
    fn canvas_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn background(&self) -> Rgba {
        self.config.background
    }

    fn render_to(&self, surface: &mut dyn DrawingSurface) {
        self.render(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{ApproxTextMetrics, RasterSurface, SvgSurface, TextExtent, TextMeasure};
    use approx::assert_relative_eq;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&p| Point::from(p)).collect()
    }

    /// Records strokes and markers in local coordinates.
    #[derive(Default)]
    struct Recorder {
        polylines: Vec<(Vec<Point>, Rgba)>,
        markers: Vec<(Point, Rgba)>,
    }

    impl Recorder {
        fn strokes(&self, color: Rgba) -> Vec<&Vec<Point>> {
            self.polylines
                .iter()
                .filter(|(_, c)| *c == color)
                .map(|(p, _)| p)
                .collect()
        }
    }

    impl TextMeasure for Recorder {
        fn measure_text(&self, text: &str, font_size: f64) -> TextExtent {
            ApproxTextMetrics.measure_text(text, font_size)
        }
    }

    impl DrawingSurface for Recorder {
        fn width(&self) -> f64 {
            800.0
        }
        fn height(&self) -> f64 {
            600.0
        }
        fn save(&mut self) {}
        fn restore(&mut self) {}
        fn translate(&mut self, _dx: f64, _dy: f64) {}
        fn scale(&mut self, _factor: f64) {}
        fn marker(&mut self, center: Point, _size: f64, _shape: MarkerShape, color: Rgba, _filled: bool) {
            self.markers.push((center, color));
        }
        fn polyline(&mut self, points: &[Point], color: Rgba, _width: f64, _dash: LineDash) {
            self.polylines.push((points.to_vec(), color));
        }
        fn fill_rect(&mut self, _rect: Rect, _color: Rgba) {}
        fn stroke_rect(&mut self, _rect: Rect, _color: Rgba, _width: f64) {}
        fn text(&mut self, _pos: Point, _text: &str, _size: f64, _color: Rgba, _anchor: TextAnchor) {}
        fn text_rotated(&mut self, _pos: Point, _text: &str, _size: f64, _color: Rgba) {}
    }

    fn inside(plot: Rect, p: Point) -> bool {
        let grown = Rect::new(plot.x - 1e-6, plot.y - 1e-6, plot.width + 2e-6, plot.height + 2e-6);
        grown.contains(p)
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ChartKind::Scatter.to_string(), "scatter");
        assert_eq!(ChartKind::Histogram.to_string(), "histogram");
    }

    #[test]
    fn test_empty_chart_has_no_bounds() {
        let chart = Chart::scatter();
        assert!(chart.is_empty());
        assert!(chart.bounds().is_none());
        assert!(chart.transform().is_none());
        assert!(chart.x_ticks().is_empty());
    }

    #[test]
    fn test_point_bounds_padded() {
        let mut chart = Chart::scatter();
        chart.add_points(&pts(&[(0.0, 0.0), (10.0, 20.0)])).unwrap();
        let b = chart.bounds().unwrap();
        assert_relative_eq!(b.min_x, -0.5);
        assert_relative_eq!(b.max_x, 10.5);
        assert_relative_eq!(b.min_y, -1.0);
        assert_relative_eq!(b.max_y, 21.0);
    }

    #[test]
    fn test_clusters_contribute_to_bounds() {
        let mut chart = Chart::scatter();
        chart.add_points(&pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        chart
            .add_cluster_points(&pts(&[(5.0, 5.0), (6.0, -6.0)]), &[0, -1])
            .unwrap();
        let b = chart.bounds().unwrap();
        assert!(b.max_x > 6.0 && b.min_y < -6.0);
    }

    #[test]
    fn test_reference_lines_do_not_move_bounds() {
        let mut chart = Chart::scatter();
        chart.add_points(&pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        let before = chart.bounds();
        chart.add_vertical_line(100.0).unwrap();
        assert_eq!(chart.bounds(), before);
    }

    #[test]
    fn test_mutation_invalidates_cache() {
        let mut chart = Chart::scatter();
        chart.add_points(&pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        let first = chart.bounds().unwrap();
        chart.add_points(&pts(&[(9.0, 9.0)])).unwrap();
        assert!(chart.bounds().unwrap().max_x > first.max_x);
        assert_eq!(chart.series().len(), 1);
    }

    #[test]
    fn test_manual_bounds_override() {
        let mut chart = Chart::line();
        chart.add_points(&pts(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        let manual = Bounds::new(-5.0, 5.0, -5.0, 5.0);
        chart.set_bounds(manual);
        chart.add_points(&pts(&[(50.0, 50.0)])).unwrap();
        assert_eq!(chart.bounds(), Some(manual));
        chart.clear_bounds();
        assert!(chart.bounds().unwrap().max_x > 50.0);
    }

    #[test]
    fn test_line_clipped_to_manual_bounds() {
        let style = PlotStyle::new(Rgb::new(0.1, 0.2, 0.3)).with_dash(LineDash::Dashed);
        let color = style.rgba();
        let mut chart = Chart::line();
        chart
            .add_series(Series::new("far", pts(&[(0.0, 0.0), (3e6, 0.5)]), style))
            .unwrap();
        chart.set_bounds(Bounds::new(0.0, 1.0, 0.0, 1.0));
        chart.set_legend_enabled(false);

        let mut rec = Recorder::default();
        chart.render(&mut rec);
        let plot = chart.transform().unwrap().plot_rect();
        let strokes = rec.strokes(color);
        assert_eq!(strokes.len(), 1);
        assert!(strokes[0].iter().all(|&p| inside(plot, p)));

        let mut raster = RasterSurface::new(800, 600, Rgba::WHITE).unwrap();
        chart.render(&mut raster);
    }

    #[test]
    fn test_line_breaks_at_non_finite_points() {
        let style = PlotStyle::new(Rgb::new(0.1, 0.2, 0.3));
        let color = style.rgba();
        let mut chart = Chart::line();
        let points = pts(&[(0.0, 0.0), (1.0, 1.0), (f64::NAN, 2.0), (2.0, 0.0), (3.0, 1.0)]);
        chart.add_series(Series::new("gappy", points, style)).unwrap();
        chart.set_legend_enabled(false);

        let mut rec = Recorder::default();
        chart.render(&mut rec);
        let strokes = rec.strokes(color);
        assert_eq!(strokes.len(), 2);
        assert!(strokes.iter().all(|s| s.len() == 2));
    }

    #[test]
    fn test_markers_outside_plot_skipped() {
        let style = PlotStyle::new(Rgb::new(0.1, 0.2, 0.3));
        let color = style.rgba();
        let mut chart = Chart::scatter();
        chart
            .add_series(Series::new("s", pts(&[(0.5, 0.5), (50.0, 50.0)]), style))
            .unwrap();
        chart
            .add_cluster_points(&pts(&[(0.25, 0.25), (-40.0, 0.5)]), &[0, 0])
            .unwrap();
        chart.set_bounds(Bounds::new(0.0, 1.0, 0.0, 1.0));
        chart.set_legend_enabled(false);

        let mut rec = Recorder::default();
        chart.render(&mut rec);
        let plot = chart.transform().unwrap().plot_rect();
        assert_eq!(rec.markers.len(), 2);
        assert_eq!(rec.markers.iter().filter(|(_, c)| *c == color).count(), 1);
        assert!(rec.markers.iter().all(|&(p, _)| inside(plot, p)));
    }

    #[test]
    fn test_arity_mismatch_leaves_state() {
        let mut chart = Chart::scatter();
        let err = chart
            .add_cluster_points(&pts(&[(0.0, 0.0), (1.0, 1.0)]), &[0])
            .unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { what: "labels", expected: 2, actual: 1 }));
        assert!(chart.clusters().is_empty());
    }

    #[test]
    fn test_kind_mismatch() {
        let mut hist = Chart::histogram();
        assert!(matches!(
            hist.add_points(&[Point::ORIGIN]),
            Err(Error::KindMismatch { found: ChartKind::Histogram, .. })
        ));
        let mut scatter = Chart::scatter();
        assert!(matches!(
            scatter.add_histogram_values("h", &[1.0]),
            Err(Error::KindMismatch { expected: ChartKind::Histogram, found: ChartKind::Scatter })
        ));
        let mut line = Chart::line();
        assert!(matches!(
            line.add_cluster_points(&[Point::ORIGIN], &[0]),
            Err(Error::KindMismatch { expected: ChartKind::Scatter, found: ChartKind::Line })
        ));
    }

    #[test]
    fn test_histogram_mode_exclusive() {
        let mut chart = Chart::histogram();
        chart.add_histogram_values("h", &[1.0, 2.0, 3.0]).unwrap();
        let err = chart
            .add_categories(&[1], &["a"], &[PlotStyle::default()])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::IncompatibleHistogramMode {
                current: HistogramMode::Continuous,
                requested: HistogramMode::Discrete
            }
        ));
        chart.clear();
        chart.add_categories(&[1], &["a"], &[PlotStyle::default()]).unwrap();
        assert!(chart.add_histogram_values("h", &[1.0]).is_err());
    }

    #[test]
    fn test_vertical_line_rejected_on_discrete() {
        let mut chart = Chart::histogram();
        chart
            .add_categories(&[3, 5], &["a", "b"], &[PlotStyle::default(), PlotStyle::default()])
            .unwrap();
        assert!(matches!(
            chart.add_vertical_line(0.5),
            Err(Error::UnsupportedReferenceLineOrientation {
                orientation: Orientation::Vertical
            })
        ));
        chart.add_horizontal_line(4.0).unwrap();
        assert_eq!(chart.reference_lines().len(), 1);
    }

    #[test]
    fn test_discrete_after_vertical_line_rejected() {
        let mut chart = Chart::histogram();
        chart.add_vertical_line(1.0).unwrap();
        assert!(matches!(
            chart.add_categories(&[1], &["a"], &[PlotStyle::default()]),
            Err(Error::UnsupportedReferenceLineOrientation { .. })
        ));
        assert!(chart.histograms().unwrap().is_empty());
        chart.add_histogram_values("h", &[1.0, 2.0]).unwrap();
    }

    #[test]
    fn test_mode_conflict_reported_before_vertical_line() {
        let mut chart = Chart::histogram();
        chart.add_histogram_values("h", &[1.0, 2.0, 3.0]).unwrap();
        chart.add_vertical_line(2.0).unwrap();
        assert!(matches!(
            chart.add_categories(&[1], &["a"], &[PlotStyle::default()]),
            Err(Error::IncompatibleHistogramMode {
                current: HistogramMode::Continuous,
                requested: HistogramMode::Discrete
            })
        ));
        assert_eq!(chart.histograms().unwrap().len(), 1);
    }

    #[test]
    fn test_discrete_ticks_are_categories() {
        let mut chart = Chart::histogram();
        let styles = vec![PlotStyle::default(); 3];
        chart.add_categories(&[2, 0, 7], &["x", "y", "z"], &styles).unwrap();
        assert_eq!(chart.x_ticks(), vec![0.0, 1.0, 2.0]);
        let b = chart.bounds().unwrap();
        assert_relative_eq!(b.min_x, -0.5);
        assert_relative_eq!(b.max_x, 2.5);
        assert_relative_eq!(b.max_y, 7.35, epsilon = 1e-9);
    }

    #[test]
    fn test_legend_hide_and_show() {
        let mut chart = Chart::scatter();
        chart
            .add_series(Series::new("a", pts(&[(0.0, 0.0)]), PlotStyle::default()))
            .unwrap();
        chart.add_horizontal_line(0.5).unwrap();
        chart.hide_legend_entry("a");
        assert_eq!(chart.legend_entries().len(), 1);
        chart.show_legend_entry("a");
        assert_eq!(chart.legend_entries().len(), 2);
    }

    #[test]
    fn test_line_chart_legend_uses_line_symbols() {
        let mut chart = Chart::line();
        chart
            .add_series(Series::new("a", pts(&[(0.0, 0.0), (1.0, 1.0)]), PlotStyle::default()))
            .unwrap();
        assert_eq!(
            chart.legend_entries()[0].symbol,
            SymbolKind::Line(LineDash::Solid)
        );
    }

    #[test]
    fn test_clear_keeps_title() {
        let mut chart = Chart::scatter();
        chart.set_title("t");
        chart.add_points(&[Point::ORIGIN]).unwrap();
        chart.add_vertical_line(0.0).unwrap();
        chart.clear();
        assert!(chart.is_empty());
        assert!(chart.reference_lines().is_empty());
        assert_eq!(chart.title(), Some("t"));
    }

    #[test]
    fn test_render_empty_draws_placeholder() {
        let chart = Chart::scatter();
        let mut svg = SvgSurface::new(800, 600);
        chart.render(&mut svg);
        assert!(svg.render().contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn test_render_with_legend() {
        let mut chart = Chart::scatter();
        chart.set_title("Clusters");
        chart
            .add_cluster_points(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.5)]), &[-1, 0, 1])
            .unwrap();
        let mut svg = SvgSurface::new(800, 600);
        chart.render(&mut svg);
        let doc = svg.render();
        assert!(doc.contains("Clusters"));
        assert!(doc.contains("Outliers"));
        assert!(doc.contains("Cluster 2"));
        assert_eq!(svg.save_depth(), 0);
    }

    #[test]
    fn test_legend_disabled_not_drawn() {
        let mut chart = Chart::scatter();
        chart
            .add_series(Series::new("visible-name", pts(&[(0.0, 0.0)]), PlotStyle::default()))
            .unwrap();
        chart.set_legend_enabled(false);
        let mut svg = SvgSurface::new(800, 600);
        chart.render(&mut svg);
        assert!(!svg.render().contains("visible-name"));
    }
}
