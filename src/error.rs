//! Error types for trueno-chart operations.

use std::io;
use thiserror::Error;

use crate::chart::ChartKind;
use crate::histogram::HistogramMode;
use crate::series::Orientation;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-chart operations.
///
/// Every variant is a deterministic function of caller input; none is transient.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a canvas, framebuffer or grid.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Parallel arrays passed to one add call disagree in length.
    #[error("Arity mismatch for {what}: expected {expected} elements, got {actual}")]
    ArityMismatch {
        /// Which parallel array was wrong (e.g. "labels", "names").
        what: &'static str,
        /// Length of the reference array.
        expected: usize,
        /// Length of the offending array.
        actual: usize,
    },

    /// Continuous and discrete histogram data mixed on one chart.
    #[error("Histogram chart is in {current} mode, cannot add {requested} data")]
    IncompatibleHistogramMode {
        /// Mode fixed by the first histogram addition.
        current: HistogramMode,
        /// Mode of the rejected addition.
        requested: HistogramMode,
    },

    /// Reference line orientation has no numeric axis to anchor to.
    #[error("{orientation} reference lines are not supported on a discrete histogram")]
    UnsupportedReferenceLineOrientation {
        /// Orientation of the rejected line.
        orientation: Orientation,
    },

    /// Grid cell access outside the declared grid.
    #[error("Cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    IndexOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },

    /// Data or cell request does not match the chart kind.
    #[error("Expected a {expected} chart, found {found}")]
    KindMismatch {
        /// Kind the operation needs.
        expected: ChartKind,
        /// Kind actually present.
        found: ChartKind,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Output path has an extension no sink can write.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}
