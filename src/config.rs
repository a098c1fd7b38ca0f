//! Chart and grid configuration.
//!
//! Both structs are plain values with `Default` and consuming setters. With the
//! `serde` feature they load from partial documents; missing fields keep their
//! defaults.

use crate::color::Rgba;
use crate::histogram::DEFAULT_MAX_BINS;
use crate::ticks::DEFAULT_TICK_COUNT;
use crate::transform::Margins;

/// Default canonical chart width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default canonical chart height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Layout and appearance of a single chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChartConfig {
    /// Canonical (local) canvas width.
    pub width: u32,
    /// Canonical (local) canvas height.
    pub height: u32,
    /// Insets around the plot rectangle.
    pub margins: Margins,
    /// Title font size.
    pub title_font_size: f64,
    /// Axis label font size.
    pub label_font_size: f64,
    /// Tick label font size.
    pub tick_font_size: f64,
    /// Legend font size.
    pub legend_font_size: f64,
    /// Requested tick count per axis.
    pub tick_count: usize,
    /// Draw grid lines at tick positions.
    pub show_grid: bool,
    /// Draw the legend box when there are rows.
    pub legend_enabled: bool,
    /// Canvas background.
    pub background: Rgba,
    /// Cap on automatic histogram bin counts.
    pub max_bins: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margins: Margins::default(),
            title_font_size: 20.0,
            label_font_size: 14.0,
            tick_font_size: 12.0,
            legend_font_size: 12.0,
            tick_count: DEFAULT_TICK_COUNT,
            show_grid: true,
            legend_enabled: true,
            background: Rgba::WHITE,
            max_bins: DEFAULT_MAX_BINS,
        }
    }
}

impl ChartConfig {
    /// Set the canonical canvas size.
    #[must_use]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the margins.
    #[must_use]
    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the requested tick count.
    #[must_use]
    pub fn tick_count(mut self, count: usize) -> Self {
        self.tick_count = count.max(1);
        self
    }

    /// Toggle grid lines.
    #[must_use]
    pub fn show_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    /// Toggle the legend.
    #[must_use]
    pub fn legend(mut self, enabled: bool) -> Self {
        self.legend_enabled = enabled;
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Set the automatic bin cap.
    #[must_use]
    pub fn max_bins(mut self, max_bins: usize) -> Self {
        self.max_bins = max_bins.max(1);
        self
    }
}

/// Layout of a subplot grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Gap between cells and around the grid, as a fraction of canvas size.
    pub spacing: f64,
    /// Grid title font size.
    pub title_font_size: f64,
    /// Padding added to the measured title height.
    pub title_padding: f64,
    /// Canvas background.
    pub background: Rgba,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: 0.05,
            title_font_size: 24.0,
            title_padding: 20.0,
            background: Rgba::WHITE,
        }
    }
}

impl GridConfig {
    /// Set the spacing fraction, clamped to `[0, 0.5)`.
    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = clamp_spacing(spacing);
        self
    }

    /// Set the title font size.
    #[must_use]
    pub fn title_font_size(mut self, size: f64) -> Self {
        self.title_font_size = size.max(0.0);
        self
    }

    /// Set the title padding.
    #[must_use]
    pub fn title_padding(mut self, padding: f64) -> Self {
        self.title_padding = padding.max(0.0);
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }
}

pub(crate) fn clamp_spacing(spacing: f64) -> f64 {
    if spacing.is_finite() {
        spacing.clamp(0.0, 0.49)
    } else {
        0.0
    }
}
