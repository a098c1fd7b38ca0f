//! Legend rows and legend box layout.
//!
//! Rows are gathered from every overlaid source in a fixed order: regular series,
//! reference lines, cluster groups, then non-empty categories. Hidden names are
//! dropped. Outside the cluster groups, exact duplicates (same name, symbol and
//! color) collapse onto the first occurrence; each cluster series always keeps its
//! own rows.

use std::collections::{BTreeSet, HashSet};

use crate::color::Palette;
use crate::geometry::{Point, Rect};
use crate::histogram::HistogramSet;
use crate::series::{ClusterSeries, ReferenceLine, Series, DEFAULT_SERIES_NAME};
use crate::style::{LineDash, MarkerShape, PlotStyle};
use crate::surface::TextMeasure;

/// Glyph drawn beside a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A marker of the given shape.
    Marker(MarkerShape),
    /// A short line segment with the given dash.
    Line(LineDash),
    /// A filled swatch.
    Bar,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Label text.
    pub name: String,
    /// Style used to draw the symbol.
    pub style: PlotStyle,
    /// Symbol kind.
    pub symbol: SymbolKind,
}

impl LegendEntry {
    fn key(&self) -> (String, SymbolKind, [u8; 4]) {
        (
            self.name.clone(),
            self.symbol,
            self.style.color.to_rgba(1.0).to_array(),
        )
    }
}

/// Everything that can contribute legend rows.
#[derive(Debug, Clone, Copy)]
pub struct LegendSources<'a> {
    /// Regular series.
    pub series: &'a [Series],
    /// How regular series are drawn.
    pub series_symbol: fn(&PlotStyle) -> SymbolKind,
    /// Reference lines.
    pub reference_lines: &'a [ReferenceLine],
    /// Cluster series.
    pub clusters: &'a [ClusterSeries],
    /// Histograms (continuous series and discrete categories).
    pub histograms: &'a HistogramSet,
    /// Palette for automatic cluster colors.
    pub palette: &'a Palette,
}

/// Marker symbol in the style's shape.
#[must_use]
pub fn marker_symbol(style: &PlotStyle) -> SymbolKind {
    SymbolKind::Marker(style.marker)
}

/// Line symbol in the style's dash.
#[must_use]
pub fn line_symbol(style: &PlotStyle) -> SymbolKind {
    SymbolKind::Line(style.dash)
}

/// Assemble the ordered, filtered, deduplicated legend rows.
#[must_use]
pub fn assemble(sources: &LegendSources<'_>, hidden: &BTreeSet<String>) -> Vec<LegendEntry> {
    // (entry, collapsible)
    let mut rows: Vec<(LegendEntry, bool)> = Vec::new();

    // Regular series: plain series then continuous histograms, in add order.
    let regular: Vec<(&str, &PlotStyle, SymbolKind)> = sources
        .series
        .iter()
        .map(|s| (s.label(), s.style(), (sources.series_symbol)(s.style())))
        .chain(
            sources
                .histograms
                .continuous()
                .map(|(h, _)| (h.name(), h.style(), SymbolKind::Bar))
                .collect::<Vec<_>>(),
        )
        .collect();
    let placeholder_only = regular.len() == 1 && regular[0].0 == DEFAULT_SERIES_NAME;
    if !placeholder_only {
        for (name, style, symbol) in regular {
            rows.push((
                LegendEntry {
                    name: name.to_string(),
                    style: style.clone(),
                    symbol,
                },
                true,
            ));
        }
    }

    for line in sources.reference_lines {
        rows.push((
            LegendEntry {
                name: line.label().to_string(),
                style: line.style().clone(),
                symbol: SymbolKind::Line(line.style().dash),
            },
            true,
        ));
    }

    for cluster in sources.clusters {
        for group in cluster.groups(sources.palette) {
            rows.push((
                LegendEntry {
                    name: group.name,
                    style: PlotStyle::new(group.color)
                        .with_size(cluster.size())
                        .with_alpha(cluster.alpha()),
                    symbol: SymbolKind::Marker(MarkerShape::Circle),
                },
                false,
            ));
        }
    }

    for category in sources.histograms.categories().filter(|c| c.count > 0) {
        rows.push((
            LegendEntry {
                name: category.name.clone(),
                style: category.style.clone(),
                symbol: SymbolKind::Bar,
            },
            true,
        ));
    }

    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|(row, collapsible)| {
            !hidden.contains(&row.name) && (!collapsible || seen.insert(row.key()))
        })
        .map(|(row, _)| row)
        .collect()
}

// ============================================================================
// Layout
// ============================================================================

/// Positions of one legend row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendRow {
    /// Center of the symbol glyph.
    pub symbol_center: Point,
    /// Left end of the label baseline.
    pub text_origin: Point,
}

/// Legend box and row positions, in the chart's local pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    /// Outer frame.
    pub frame: Rect,
    /// One row per entry, top-down.
    pub rows: Vec<LegendRow>,
    /// Width available to each symbol.
    pub symbol_width: f64,
}

/// Lay out `entries` in the top-right corner of `plot`.
///
/// Returns `None` when there are no entries.
#[must_use]
pub fn layout<M: TextMeasure + ?Sized>(
    entries: &[LegendEntry],
    plot: Rect,
    font_size: f64,
    measure: &M,
) -> Option<LegendLayout> {
    if entries.is_empty() {
        return None;
    }
    let row_height = 1.5 * font_size;
    let padding = 0.5 * font_size;
    let symbol_width = 2.0 * font_size;
    let label_width = entries
        .iter()
        .map(|e| measure.measure_text(&e.name, font_size).width)
        .fold(0.0, f64::max);

    let width = padding + symbol_width + padding + label_width + padding;
    let height = entries.len() as f64 * row_height + 2.0 * padding;
    let frame = Rect::new(plot.right() - width - padding, plot.y + padding, width, height);

    let rows = (0..entries.len())
        .map(|i| {
            let mid_y = frame.y + padding + (i as f64 + 0.5) * row_height;
            LegendRow {
                symbol_center: Point::new(frame.x + padding + symbol_width / 2.0, mid_y),
                text_origin: Point::new(
                    frame.x + padding + symbol_width + padding,
                    mid_y + font_size * 0.35,
                ),
            }
        })
        .collect();

    Some(LegendLayout {
        frame,
        rows,
        symbol_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::geometry::Point as P;
    use crate::histogram::{ContinuousHistogram, DiscreteHistogram};
    use crate::surface::ApproxTextMetrics;

    fn sources<'a>(
        series: &'a [Series],
        lines: &'a [ReferenceLine],
        clusters: &'a [ClusterSeries],
        histograms: &'a HistogramSet,
        palette: &'a Palette,
    ) -> LegendSources<'a> {
        LegendSources {
            series,
            series_symbol: marker_symbol,
            reference_lines: lines,
            clusters,
            histograms,
            palette,
        }
    }

    fn names(rows: &[LegendEntry]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_placeholder_series_skipped() {
        let series = vec![Series::new(DEFAULT_SERIES_NAME, vec![P::ORIGIN], PlotStyle::default())];
        let hs = HistogramSet::default();
        let palette = Palette::default();
        let rows = assemble(&sources(&series, &[], &[], &hs, &palette), &BTreeSet::new());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_placeholder_kept_beside_other_series() {
        let series = vec![
            Series::new(DEFAULT_SERIES_NAME, vec![P::ORIGIN], PlotStyle::default()),
            Series::new("b", vec![P::ORIGIN], PlotStyle::new(Rgb::WHITE)),
        ];
        let hs = HistogramSet::default();
        let palette = Palette::default();
        let rows = assemble(&sources(&series, &[], &[], &hs, &palette), &BTreeSet::new());
        assert_eq!(names(&rows), ["default", "b"]);
    }

    #[test]
    fn test_source_order() {
        let series = vec![Series::new("s", vec![P::ORIGIN], PlotStyle::default())];
        let lines = vec![ReferenceLine::vertical(2.5)];
        let clusters = vec![ClusterSeries::new("c", &[P::ORIGIN, P::ORIGIN], &[-1, 4]).unwrap()];
        let hs = HistogramSet::default();
        let palette = Palette::default();
        let rows = assemble(&sources(&series, &lines, &clusters, &hs, &palette), &BTreeSet::new());
        assert_eq!(names(&rows), ["s", "2.5", "Outliers", "Cluster 1"]);
        assert_eq!(rows[1].symbol, SymbolKind::Line(LineDash::Dashed));
    }

    #[test]
    fn test_cluster_numbering_restarts() {
        let pts = [P::ORIGIN; 3];
        let clusters = vec![
            ClusterSeries::new("a", &pts, &[-1, 0, 1]).unwrap(),
            ClusterSeries::new("b", &pts, &[-1, 0, 1])
                .unwrap()
                .with_colors([(0, Rgb::BLACK), (1, Rgb::WHITE)].into()),
        ];
        let hs = HistogramSet::default();
        let palette = Palette::default();
        let rows = assemble(&sources(&[], &[], &clusters, &hs, &palette), &BTreeSet::new());
        assert_eq!(
            names(&rows),
            ["Outliers", "Cluster 1", "Cluster 2", "Outliers", "Cluster 1", "Cluster 2"]
        );
        assert_eq!(rows[4].style.color, Rgb::BLACK);
    }

    #[test]
    fn test_identical_cluster_series_keep_their_rows() {
        let pts = [P::ORIGIN; 3];
        let clusters = vec![
            ClusterSeries::new("a", &pts, &[-1, 0, 1]).unwrap(),
            ClusterSeries::new("b", &pts, &[-1, 0, 1]).unwrap(),
        ];
        let hs = HistogramSet::default();
        let palette = Palette::default();
        let rows = assemble(&sources(&[], &[], &clusters, &hs, &palette), &BTreeSet::new());
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let series = vec![
            Series::new("a", vec![P::ORIGIN], PlotStyle::default()),
            Series::new("a", vec![P::ORIGIN], PlotStyle::default()),
            Series::new("a", vec![P::ORIGIN], PlotStyle::new(Rgb::WHITE)),
        ];
        let lines = vec![ReferenceLine::horizontal(1.0), ReferenceLine::horizontal(1.0)];
        let hs = HistogramSet::default();
        let palette = Palette::default();
        let rows = assemble(&sources(&series, &lines, &[], &hs, &palette), &BTreeSet::new());
        assert_eq!(names(&rows), ["a", "a", "1"]);
    }

    #[test]
    fn test_hidden_names_filtered() {
        let series = vec![
            Series::new("keep", vec![P::ORIGIN], PlotStyle::default()),
            Series::new("drop", vec![P::ORIGIN], PlotStyle::default()),
        ];
        let hs = HistogramSet::default();
        let palette = Palette::default();
        let hidden = BTreeSet::from(["drop".to_string()]);
        let rows = assemble(&sources(&series, &[], &[], &hs, &palette), &hidden);
        assert_eq!(names(&rows), ["keep"]);
    }

    #[test]
    fn test_zero_count_categories_skipped() {
        let mut hs = HistogramSet::default();
        let styles = vec![PlotStyle::default(); 3];
        hs.push(DiscreteHistogram::new(&[3, 0, 1], &["a", "b", "c"], &styles).unwrap().into())
            .unwrap();
        let palette = Palette::default();
        let rows = assemble(&sources(&[], &[], &[], &hs, &palette), &BTreeSet::new());
        assert_eq!(names(&rows), ["a", "c"]);
        assert!(rows.iter().all(|r| r.symbol == SymbolKind::Bar));
    }

    #[test]
    fn test_continuous_histograms_are_regular_rows() {
        let mut hs = HistogramSet::default();
        hs.push(ContinuousHistogram::new("heights", &[1.0, 2.0]).into())
            .unwrap();
        let palette = Palette::default();
        let rows = assemble(&sources(&[], &[], &[], &hs, &palette), &BTreeSet::new());
        assert_eq!(names(&rows), ["heights"]);
    }

    #[test]
    fn test_layout_top_right() {
        let entries = vec![
            LegendEntry {
                name: "abc".into(),
                style: PlotStyle::default(),
                symbol: SymbolKind::Bar,
            },
            LegendEntry {
                name: "abcdef".into(),
                style: PlotStyle::default(),
                symbol: SymbolKind::Bar,
            },
        ];
        let plot = Rect::new(80.0, 60.0, 680.0, 470.0);
        let l = layout(&entries, plot, 10.0, &ApproxTextMetrics).unwrap();
        // width = 5 + 20 + 5 + 36 + 5
        assert!((l.frame.width - 71.0).abs() < 1e-9);
        assert!((l.frame.right() - (plot.right() - 5.0)).abs() < 1e-9);
        assert!((l.frame.height - 40.0).abs() < 1e-9);
        assert!((l.rows[1].symbol_center.y - l.rows[0].symbol_center.y - 15.0).abs() < 1e-9);
        assert!(layout(&[], plot, 10.0, &ApproxTextMetrics).is_none());
    }
}
