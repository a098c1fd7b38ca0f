//! Histogram binning and categorical bars.
//!
//! Continuous histograms derive equal-width bins from raw samples using Sturges',
//! Scott's or the Freedman-Diaconis rule. Discrete histograms take counts directly,
//! one bar per named category.

use std::fmt;

use crate::bounds::{Bounds, Padding};
use crate::error::{Error, Result};
use crate::series::check_arity;
use crate::style::PlotStyle;

/// Default cap on automatically chosen bin counts.
pub const DEFAULT_MAX_BINS: usize = 20;

/// Relative width of a categorical bar (1.0 would make bars touch).
pub const BAR_WIDTH: f64 = 0.8;

/// Binning strategy for continuous histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinStrategy {
    /// Sturges' rule: ceil(log2(n) + 1)
    #[default]
    Sturges,
    /// Scott's rule: 3.5 * std / n^(1/3)
    Scott,
    /// Freedman-Diaconis rule: 2 * IQR / n^(1/3)
    FreedmanDiaconis,
    /// Fixed number of bins; zero falls back to Sturges
    Fixed(usize),
}

/// Number of bins `strategy` picks for `values`.
///
/// Rule-based strategies are capped at `max_bins`; `Fixed(k)` is used as given.
#[must_use]
pub fn bin_count(values: &[f64], strategy: BinStrategy, max_bins: usize) -> usize {
    let n = values.len();
    if n == 0 {
        return 1;
    }
    let cap = max_bins.max(1);
    let by_width = |width: f64| {
        let range = data_range(values);
        if width > 0.0 && width.is_finite() && range > 0.0 {
            Some((range / width).ceil() as usize)
        } else {
            None
        }
    };

    let count = match strategy {
        BinStrategy::Fixed(k) if k > 0 => return k,
        BinStrategy::Fixed(_) | BinStrategy::Sturges => sturges(n),
        BinStrategy::Scott => {
            by_width(3.5 * std_dev(values) / (n as f64).cbrt()).unwrap_or_else(|| sturges(n))
        }
        BinStrategy::FreedmanDiaconis => {
            by_width(2.0 * iqr(values) / (n as f64).cbrt()).unwrap_or_else(|| sturges(n))
        }
    };
    count.clamp(1, cap)
}

fn sturges(n: usize) -> usize {
    ((n as f64).log2() + 1.0).ceil() as usize
}

fn data_range(values: &[f64]) -> f64 {
    let (min, max) = min_max(values).unwrap_or((0.0, 0.0));
    max - min
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

fn iqr(values: &[f64]) -> f64 {
    if values.len() < 4 {
        return data_range(values);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[3 * sorted.len() / 4] - sorted[sorted.len() / 4]
}

// ============================================================================
// Bins
// ============================================================================

/// Bin edges and per-bin counts.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl HistogramBins {
    /// Bin the finite samples in `values`.
    ///
    /// Returns `None` when there are no finite samples. Equal samples get a unit
    /// wide range centered on the value.
    #[must_use]
    pub fn compute(values: &[f64], strategy: BinStrategy, max_bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (mut lo, mut hi) = min_max(&finite)?;
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let count = bin_count(&finite, strategy, max_bins);
        // Divide before subtracting: `hi - lo` overflows for wide finite data.
        let n = count as f64;
        let width = hi / n - lo / n;
        let mut edges: Vec<f64> = (0..=count)
            .map(|i| if i == 0 { lo } else { lo + i as f64 * width })
            .collect();
        // Half-open bins; nudge the last edge so the maximum sample lands inside.
        edges[count] = hi + (hi / 2.0 - lo / 2.0) * 2e-9;

        let mut counts = vec![0u64; count];
        for v in &finite {
            if let Some(i) = edges.windows(2).position(|w| *v >= w[0] && *v < w[1]) {
                counts[i] += 1;
            }
        }
        Some(Self { edges, counts })
    }

    /// `counts.len() + 1` ascending edges.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Per-bin counts.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if there are no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest single count.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Replace counts with their running prefix sum.
    #[must_use]
    pub fn cumulative(mut self) -> Self {
        let mut running = 0;
        for c in &mut self.counts {
            running += *c;
            *c = running;
        }
        self
    }

    /// `(left edge, right edge, count)` for each bin.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

// ============================================================================
// Series
// ============================================================================

/// Whether a histogram chart holds sampled or categorical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistogramMode {
    /// Raw samples binned into edges/counts.
    Continuous,
    /// Counts supplied per named category.
    Discrete,
}

impl fmt::Display for HistogramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuous => write!(f, "continuous"),
            Self::Discrete => write!(f, "discrete"),
        }
    }
}

/// Raw samples with a binning strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousHistogram {
    name: String,
    values: Vec<f64>,
    style: PlotStyle,
    strategy: BinStrategy,
    max_bins: usize,
    cumulative: bool,
}

impl ContinuousHistogram {
    /// Create from raw samples with the default style and Sturges binning.
    #[must_use]
    pub fn new(name: impl Into<String>, values: &[f64]) -> Self {
        Self {
            name: name.into(),
            values: values.to_vec(),
            style: PlotStyle::default().with_alpha(0.7),
            strategy: BinStrategy::Sturges,
            max_bins: DEFAULT_MAX_BINS,
            cumulative: false,
        }
    }

    /// Set the bar style.
    #[must_use]
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the binning strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: BinStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Cap automatic bin counts.
    #[must_use]
    pub fn with_max_bins(mut self, max_bins: usize) -> Self {
        self.max_bins = max_bins.max(1);
        self
    }

    /// Show running totals instead of per-bin counts.
    #[must_use]
    pub fn cumulative(mut self, cumulative: bool) -> Self {
        self.cumulative = cumulative;
        self
    }

    /// Name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw samples.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Style.
    #[must_use]
    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Whether counts are cumulative.
    #[must_use]
    pub fn is_cumulative(&self) -> bool {
        self.cumulative
    }

    /// Bins as displayed (cumulative if enabled). `None` with no finite samples.
    #[must_use]
    pub fn bins(&self) -> Option<HistogramBins> {
        let bins = HistogramBins::compute(&self.values, self.strategy, self.max_bins)?;
        Some(if self.cumulative { bins.cumulative() } else { bins })
    }
}

/// One bar of a discrete histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Bar height.
    pub count: u64,
    /// Bar style.
    pub style: PlotStyle,
}

/// Categorical bars with one name and style per count.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteHistogram {
    categories: Vec<Category>,
}

impl DiscreteHistogram {
    /// Create from parallel arrays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if `names` or `styles` differ in length from
    /// `counts`.
    pub fn new<S: AsRef<str>>(counts: &[u64], names: &[S], styles: &[PlotStyle]) -> Result<Self> {
        check_arity("names", counts.len(), names.len())?;
        check_arity("styles", counts.len(), styles.len())?;
        let categories = counts
            .iter()
            .zip(names)
            .zip(styles)
            .map(|((&count, name), style)| Category {
                name: name.as_ref().to_string(),
                count,
                style: style.clone(),
            })
            .collect();
        Ok(Self { categories })
    }

    /// Bars in order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

/// A histogram in either mode.
#[derive(Debug, Clone, PartialEq)]
pub enum HistogramSeries {
    /// Binned samples.
    Continuous(ContinuousHistogram),
    /// Categorical bars.
    Discrete(DiscreteHistogram),
}

impl HistogramSeries {
    /// Mode of this series.
    #[must_use]
    pub fn mode(&self) -> HistogramMode {
        match self {
            Self::Continuous(_) => HistogramMode::Continuous,
            Self::Discrete(_) => HistogramMode::Discrete,
        }
    }
}

impl From<ContinuousHistogram> for HistogramSeries {
    fn from(h: ContinuousHistogram) -> Self {
        Self::Continuous(h)
    }
}

impl From<DiscreteHistogram> for HistogramSeries {
    fn from(h: DiscreteHistogram) -> Self {
        Self::Discrete(h)
    }
}

// ============================================================================
// Set
// ============================================================================

/// All histograms of one chart; the first addition fixes the mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSet {
    series: Vec<HistogramSeries>,
}

impl HistogramSet {
    /// Mode fixed by the first addition, if any.
    #[must_use]
    pub fn mode(&self) -> Option<HistogramMode> {
        self.series.first().map(HistogramSeries::mode)
    }

    /// Check that a series of `requested` mode may be added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleHistogramMode`] if the set already holds the
    /// other mode.
    pub fn check_mode(&self, requested: HistogramMode) -> Result<()> {
        match self.mode() {
            Some(current) if current != requested => {
                Err(Error::IncompatibleHistogramMode { current, requested })
            }
            _ => Ok(()),
        }
    }

    /// Add a series.
    ///
    /// # Errors
    ///
    /// See [`check_mode`](Self::check_mode).
    pub fn push(&mut self, series: HistogramSeries) -> Result<()> {
        self.check_mode(series.mode())?;
        self.series.push(series);
        Ok(())
    }

    /// Series in add order.
    #[must_use]
    pub fn series(&self) -> &[HistogramSeries] {
        &self.series
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Continuous series with their bins.
    pub fn continuous(&self) -> impl Iterator<Item = (&ContinuousHistogram, HistogramBins)> {
        self.series.iter().filter_map(|s| match s {
            HistogramSeries::Continuous(h) => h.bins().map(|b| (h, b)),
            HistogramSeries::Discrete(_) => None,
        })
    }

    /// All categories across discrete series, positioned at 0, 1, 2, ...
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.series.iter().flat_map(|s| {
            let categories: &[Category] = match s {
                HistogramSeries::Discrete(h) => h.categories(),
                HistogramSeries::Continuous(_) => &[],
            };
            categories
        })
    }

    /// Padded display bounds, or `None` without data.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        match self.mode()? {
            HistogramMode::Continuous => self
                .continuous()
                .map(|(_, bins)| {
                    let edges = bins.edges();
                    Bounds::new(edges[0], edges[edges.len() - 1], 0.0, bins.max_count() as f64)
                })
                .reduce(Bounds::union)
                .map(|b| b.padded(Padding::ContinuousHistogram)),
            HistogramMode::Discrete => {
                let (n, max) = self
                    .categories()
                    .fold((0usize, 0u64), |(n, max), c| (n + 1, max.max(c.count)));
                (n > 0).then(|| Bounds::discrete(n, max))
            }
        }
    }

    /// Remove every series and reset the mode.
    pub fn clear(&mut self) {
        self.series.clear();
    }
}
