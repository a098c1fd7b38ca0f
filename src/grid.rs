//! Subplot grids: R×C independently scaled charts on one canvas.
//!
//! Every chart keeps computing its layout in its own local space (800×600 by
//! default). The grid only decides one uniform scale and an offset per cell, and
//! applies them through the surface transform stack around each chart's render.
//!
//! Layout, for a `W`×`H` canvas with spacing fraction `s`:
//!
//! - gaps are `s·W` between and around columns and `s·H` between and around rows
//! - an optional title reserves its measured height plus padding at the top
//! - cells share one aspect-preserving scale and are centered horizontally
//! - rows are packed at the scaled content height and the title plus grid block is
//!   centered vertically as a unit
//!
//! ```
//! use trueno_chart::prelude::*;
//!
//! let mut grid = SubplotGrid::new(2, 2, 1600, 1200, 0.05).unwrap();
//! grid.set_title("Overview");
//! grid.chart_mut(0, 0, ChartKind::Scatter)
//!     .unwrap()
//!     .add_points(&[Point::new(1.0, 2.0)])
//!     .unwrap();
//!
//! let layout = grid.layout(&ApproxTextMetrics);
//! assert_eq!(layout.cells.len(), 4);
//! ```

use std::path::Path;

use tracing::debug;

use crate::chart::{Chart, ChartKind};
use crate::color::Rgba;
use crate::config::{clamp_spacing, GridConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::output::{self, Renderable};
use crate::surface::{DrawingSurface, Scoped, TextAnchor, TextMeasure};
use crate::transform::{CoordinateTransform, Placement};

const TITLE_COLOR: Rgba = Rgba::rgb(20, 20, 20);

/// State of one grid position.
#[derive(Debug, Clone, Default)]
pub enum Cell {
    /// No chart requested yet.
    #[default]
    Unconfigured,
    /// A chart, created on first access.
    Configured(Chart),
}

/// Where one cell lands on the shared canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
    /// Offset and uniform scale from the chart's local space to the canvas.
    pub placement: Placement,
    /// Canvas rectangle covered by the scaled chart.
    pub rect: Rect,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// All R×C cells, row-major.
    pub cells: Vec<CellPlacement>,
    /// Center of the title baseline, when there is a title.
    pub title_origin: Option<Point>,
    /// Height reserved for the title (0 without one).
    pub title_height: f64,
    /// Height of the packed rows including their gaps.
    pub grid_height: f64,
    /// Top of the title plus grid block.
    pub block_top: f64,
    /// Uniform scale for canonically sized charts.
    pub scale: f64,
}

impl GridLayout {
    /// Placement of (`row`, `col`), if inside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellPlacement> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Vertical extent of the title plus grid block.
    #[must_use]
    pub fn block_height(&self) -> f64 {
        self.title_height + self.grid_height
    }
}

/// Grid of charts rendered as one image.
#[derive(Debug, Clone)]
pub struct SubplotGrid {
    rows: usize,
    cols: usize,
    width: u32,
    height: u32,
    config: GridConfig,
    title: Option<String>,
    cells: Vec<Cell>,
}

impl SubplotGrid {
    /// Create an empty `rows`×`cols` grid on a `width`×`height` canvas.
    ///
    /// `spacing` is the gap fraction of canvas size, clamped to `[0, 0.5)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if any count or size is zero.
    pub fn new(rows: usize, cols: usize, width: u32, height: u32, spacing: f64) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions {
                width: u32::try_from(cols).unwrap_or(u32::MAX),
                height: u32::try_from(rows).unwrap_or(u32::MAX),
            });
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let config = GridConfig {
            spacing: clamp_spacing(spacing),
            ..GridConfig::default()
        };
        Ok(Self {
            rows,
            cols,
            width,
            height,
            config,
            title: None,
            cells: vec![Cell::Unconfigured; rows * cols],
        })
    }

    /// Replace the grid configuration.
    #[must_use]
    pub fn with_config(mut self, config: GridConfig) -> Self {
        self.config = GridConfig {
            spacing: clamp_spacing(config.spacing),
            ..config
        };
        self
    }

    /// Row count.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Set the grid title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Grid title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Chart at (`row`, `col`), created as `kind` on first access.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfRange`] outside the grid.
    /// - [`Error::KindMismatch`] if the cell already holds a different kind.
    pub fn chart_mut(&mut self, row: usize, col: usize, kind: ChartKind) -> Result<&mut Chart> {
        let index = self.index(row, col)?;
        let cell = &mut self.cells[index];
        if let Cell::Configured(chart) = &*cell {
            if chart.kind() != kind {
                return Err(Error::KindMismatch {
                    expected: kind,
                    found: chart.kind(),
                });
            }
        } else {
            debug!(row, col, %kind, "configured grid cell");
            *cell = Cell::Configured(Chart::new(kind));
        }
        match cell {
            Cell::Configured(chart) => Ok(chart),
            Cell::Unconfigured => Err(Error::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }

    /// Place a prebuilt chart at (`row`, `col`), replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] outside the grid.
    pub fn set_chart(&mut self, row: usize, col: usize, chart: Chart) -> Result<()> {
        let index = self.index(row, col)?;
        self.cells[index] = Cell::Configured(chart);
        Ok(())
    }

    /// Chart at (`row`, `col`), or `None` if that cell was never configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] outside the grid.
    pub fn chart(&self, row: usize, col: usize) -> Result<Option<&Chart>> {
        let index = self.index(row, col)?;
        Ok(match &self.cells[index] {
            Cell::Configured(chart) => Some(chart),
            Cell::Unconfigured => None,
        })
    }

    /// Cell state at (`row`, `col`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Result<&Cell> {
        let index = self.index(row, col)?;
        Ok(&self.cells[index])
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Compute every cell placement using `measure` for the title extent.
    #[must_use]
    pub fn layout<M: TextMeasure + ?Sized>(&self, measure: &M) -> GridLayout {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let s = self.config.spacing;
        let (rows, cols) = (self.rows as f64, self.cols as f64);
        let gap_x = s * w;
        let gap_y = s * h;

        let title_extent = self
            .title
            .as_deref()
            .map(|t| measure.measure_text(t, self.config.title_font_size));
        let title_height = title_extent.map_or(0.0, |e| e.height + self.config.title_padding);

        let available_w = (w - gap_x * (cols + 1.0)).max(0.0);
        let available_h = (h - gap_y * (rows + 1.0) - title_height).max(0.0);
        let cell_w = available_w / cols;
        let cell_h = available_h / rows;

        let (local_w, local_h) = (f64::from(DEFAULT_WIDTH), f64::from(DEFAULT_HEIGHT));
        let scale = (cell_w / local_w).min(cell_h / local_h);
        let content_w = scale * local_w;
        let content_h = scale * local_h;

        let grid_height = rows * content_h + (rows + 1.0) * gap_y;
        let block_top = (h - (grid_height + title_height)) / 2.0;

        let mut cells = Vec::with_capacity(self.cells.len());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let raw_x = gap_x + col as f64 * (cell_w + gap_x);
                let raw_y = gap_y + row as f64 * (content_h + gap_y);
                let x = raw_x + (cell_w - content_w) / 2.0;
                let y = block_top + title_height + raw_y;

                // Charts with a non-canonical local size fit inside the content box.
                let (cw, ch) = self.local_size(row * self.cols + col);
                let cell_scale = (content_w / cw).min(content_h / ch);
                let (sw, sh) = (cell_scale * cw, cell_scale * ch);
                let x = x + (content_w - sw) / 2.0;
                let y = y + (content_h - sh) / 2.0;

                cells.push(CellPlacement {
                    row,
                    col,
                    placement: Placement::new(x, y, cell_scale),
                    rect: Rect::new(x, y, sw, sh),
                });
            }
        }

        let title_origin = title_extent.map(|e| {
            Point::new(w / 2.0, block_top + self.config.title_padding / 2.0 + e.height * 0.8)
        });

        debug!(
            rows = self.rows,
            cols = self.cols,
            scale,
            title_height,
            block_top,
            "computed grid layout"
        );

        GridLayout {
            cells,
            title_origin,
            title_height,
            grid_height,
            block_top,
            scale,
        }
    }

    fn local_size(&self, index: usize) -> (f64, f64) {
        match &self.cells[index] {
            Cell::Configured(chart) if chart.config().width > 0 && chart.config().height > 0 => (
                f64::from(chart.config().width),
                f64::from(chart.config().height),
            ),
            _ => (f64::from(DEFAULT_WIDTH), f64::from(DEFAULT_HEIGHT)),
        }
    }

    /// Data-to-canvas transform of the chart at (`row`, `col`).
    ///
    /// `None` if the cell is unconfigured or its chart has no bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] outside the grid.
    pub fn cell_transform<M: TextMeasure + ?Sized>(
        &self,
        row: usize,
        col: usize,
        measure: &M,
    ) -> Result<Option<CoordinateTransform>> {
        let Some(chart) = self.chart(row, col)? else {
            return Ok(None);
        };
        let layout = self.layout(measure);
        let placement = layout
            .cell(row, col)
            .map_or(Placement::IDENTITY, |c| c.placement);
        Ok(chart.transform().map(|t| t.with_placement(placement)))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw the title and every configured chart.
    pub fn render<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        let layout = self.layout(&*surface);
        surface.fill_rect(
            Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height)),
            self.config.background,
        );

        if let (Some(title), Some(origin)) = (&self.title, layout.title_origin) {
            surface.text(
                origin,
                title,
                self.config.title_font_size,
                TITLE_COLOR,
                TextAnchor::Middle,
            );
        }

        for (cell, placement) in self.cells.iter().zip(&layout.cells) {
            let Cell::Configured(chart) = cell else {
                continue;
            };
            let mut scoped = Scoped::new(&mut *surface);
            scoped.translate(placement.placement.offset_x, placement.placement.offset_y);
            scoped.scale(placement.placement.scale);
            chart.render(&mut *scoped);
        }
    }

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

impl Renderable for SubplotGrid {
    fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn background(&self) -> Rgba {
        self.config.background
    }

    fn render_to(&self, surface: &mut dyn DrawingSurface) {
        self.render(surface);
    }
}
