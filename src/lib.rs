//! # Trueno-Chart
//!
//! Geometry and layout core for 2D scatter, line and histogram charts, and for
//! grids of independently scaled charts on one canvas.
//!
//! The crate decides where everything goes: padded data bounds, "nice" axis
//! ticks, the data-to-pixel transform, histogram bins, merged legend rows and
//! aspect-preserving subplot placement. Drawing goes through the
//! [`DrawingSurface`](surface::DrawingSurface) trait; an SVG surface and an RGBA
//! raster surface (PNG output) ship with the crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_chart::prelude::*;
//!
//! let mut chart = Chart::scatter();
//! chart.set_title("Clusters");
//! chart
//!     .add_cluster_points(
//!         &[Point::new(0.0, 0.0), Point::new(1.0, 1.5), Point::new(2.0, 0.5)],
//!         &[-1, 0, 1],
//!     )
//!     .unwrap();
//!
//! let names: Vec<_> = chart.legend_entries().into_iter().map(|e| e.name).collect();
//! assert_eq!(names, ["Outliers", "Cluster 1", "Cluster 2"]);
//!
//! let mut svg = SvgSurface::new(800, 600);
//! chart.render(&mut svg);
//! assert!(svg.render().starts_with("<svg"));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialize/deserialize [`ChartConfig`](config::ChartConfig) and
//!   [`GridConfig`](config::GridConfig)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types, named colors and palettes.
pub mod color;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Plot styles: marker shapes, dash patterns, colors.
pub mod style;

/// Chart and grid configuration.
pub mod config;

// ============================================================================
// Layout Modules
// ============================================================================

/// Data bounds and padding.
pub mod bounds;

/// Nice-number axis ticks.
pub mod ticks;

/// Data-to-pixel coordinate transform.
pub mod transform;

/// Point series, cluster series and reference lines.
pub mod series;

/// Histogram binning.
pub mod histogram;

/// Legend assembly and layout.
pub mod legend;

/// Charts and the shared render pass.
pub mod chart;

/// Subplot grids.
pub mod grid;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Rasterization primitives.
pub mod render;

/// Drawing surfaces (SVG, raster).
pub mod surface;

/// File sinks (PNG, SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-chart operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_chart::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bounds::Bounds;
    pub use crate::chart::{Chart, ChartKind};
    pub use crate::color::{named, Palette, Rgb, Rgba};
    pub use crate::config::{ChartConfig, GridConfig};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Rect};
    pub use crate::grid::{GridLayout, SubplotGrid};
    pub use crate::histogram::{BinStrategy, ContinuousHistogram, DiscreteHistogram};
    pub use crate::legend::{LegendEntry, SymbolKind};
    pub use crate::series::{ClusterSeries, Orientation, ReferenceLine, Series};
    pub use crate::style::{LineDash, MarkerShape, PlotStyle};
    pub use crate::surface::{
        ApproxTextMetrics, DrawingSurface, RasterSurface, SvgSurface, TextMeasure,
    };
    pub use crate::ticks::{format_value, nice_ticks};
    pub use crate::transform::{CoordinateTransform, Margins, Placement};
}
