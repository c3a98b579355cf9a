//! Grid construction errors.

/// Errors raised when building an [`ElevationGrid`](crate::ElevationGrid)
/// from caller-supplied data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid needs at least one column and one row.
    #[error("grid dimensions must be non-zero, got {columns}x{rows}")]
    EmptyDimensions { columns: usize, rows: usize },

    /// The supplied height buffer does not match the dimensions.
    #[error("expected {expected} heights for the grid, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
