//! Top-level error type for drawing operations.

use std::io;

use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Result alias used across the crate.
pub type DrawResult<T> = Result<T, XlsxDrawError>;

/// Errors raised while positioning, validating or writing elements.
#[derive(Debug, Error)]
pub enum XlsxDrawError {
    /// Element extent is zero or its region leaves the grid.
    #[error("Invalid extent {height}x{width} at ({row}, {col}): {reason}")]
    InvalidExtent {
        /// Anchor row.
        row: usize,
        /// Anchor column.
        col: usize,
        /// Declared height.
        height: usize,
        /// Declared width.
        width: usize,
        /// Human-readable cause.
        reason: String,
    },
    /// Cursor move or reset would leave the addressable grid.
    #[error("Position ({row}, {col}) is outside the worksheet grid")]
    OutOfGrid {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
    /// Value cannot be written with the selected write method.
    #[error("Cannot write cell ({row}, {col}): {reason}")]
    Write {
        /// Target row.
        row: usize,
        /// Target column.
        col: usize,
        /// Human-readable cause.
        reason: String,
    },
    /// Error reported by the workbook backend.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    /// Dictionary document entry has the wrong shape.
    #[error("Invalid dictionary entry #{index}: {reason}")]
    ConfigShape {
        /// Zero-based entry index within its sequence.
        index: usize,
        /// Human-readable cause.
        reason: String,
    },
    /// Dictionary document is not valid YAML.
    #[error("Failed to parse dictionary document: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    /// Filesystem error while loading a document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// DataFrame access error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),
    /// Dictionary nesting exceeds the supported depth.
    #[error("Dictionary nesting depth {depth} exceeds maximum {max}")]
    NestingTooDeep {
        /// Offending depth.
        depth: usize,
        /// Allowed maximum.
        max: usize,
    },
    /// Named checkpoint was never recorded.
    #[error("Checkpoint not found: {0:?}")]
    CheckpointNotFound(String),
    /// Not enough recorded positions to fall back to.
    #[error("Cannot fall back {steps} step(s): only {available} position(s) recorded")]
    HistoryExhausted {
        /// Requested steps.
        steps: usize,
        /// Recorded positions.
        available: usize,
    },
    /// Cell reference is not valid A1 notation.
    #[error("Invalid cell reference: {0:?}")]
    InvalidCellReference(String),
    /// Table column lookup failed.
    #[error("Column not found: {0:?}")]
    ColumnNotFound(String),
    /// Table row index is past the end of the column.
    #[error("Row {row} out of range for column {column:?} with {len} value(s)")]
    RowOutOfRange {
        /// Column name.
        column: String,
        /// Requested row.
        row: usize,
        /// Column length.
        len: usize,
    },
    /// Per-cell input does not match the number of cells.
    #[error("Expected {expected} item(s), got {actual}")]
    LengthMismatch {
        /// Number of cells.
        expected: usize,
        /// Number of items supplied.
        actual: usize,
    },
    /// Writer was used after `close()`.
    #[error("Cannot write after close().")]
    WriterClosed,
}
