//! The elevation grid: a dense `columns × rows` array of heights plus its
//! geospatial registration.

use glam::DVec3;

use crate::GridError;

/// Default reserved height meaning "no sample here".
pub const NO_DATA_VALUE: f32 = f32::MIN;

/// A regular grid of height samples covering a rectangle.
///
/// Samples are stored row-major with the column index varying fastest. Row 0
/// is the southern (lower) edge and column 0 the western (left) edge, so
/// sample `(c, r)` sits at `origin + (c * x_interval, r * y_interval)`.
///
/// Per-sample accessors index directly: `(c, r)` outside the grid panics.
/// Use [`get`](Self::get) when the coordinate is not known to be in bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    columns: usize,
    rows: usize,
    heights: Vec<f32>,
    origin: DVec3,
    x_interval: f64,
    y_interval: f64,
    border_width: usize,
    skirt_height: f32,
    no_data_value: f32,
}

impl ElevationGrid {
    /// Allocate a zero-filled grid with unit spacing at the origin.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(columns: usize, rows: usize) -> Self {
        assert!(
            columns >= 1 && rows >= 1,
            "Grid dimensions must be non-zero, got {columns}x{rows}"
        );
        Self {
            columns,
            rows,
            heights: vec![0.0; columns * rows],
            origin: DVec3::ZERO,
            x_interval: 1.0,
            y_interval: 1.0,
            border_width: 0,
            skirt_height: 0.0,
            no_data_value: NO_DATA_VALUE,
        }
    }

    /// Wrap an existing row-major height buffer.
    pub fn from_heights(columns: usize, rows: usize, heights: Vec<f32>) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::EmptyDimensions { columns, rows });
        }
        if heights.len() != columns * rows {
            return Err(GridError::SizeMismatch {
                expected: columns * rows,
                actual: heights.len(),
            });
        }
        let mut grid = Self::new(columns, rows);
        grid.heights = heights;
        Ok(grid)
    }

    /// Builder-style origin setter.
    #[must_use]
    pub fn with_origin(mut self, origin: DVec3) -> Self {
        self.origin = origin;
        self
    }

    /// Builder-style cell spacing setter.
    #[must_use]
    pub fn with_intervals(mut self, x_interval: f64, y_interval: f64) -> Self {
        self.x_interval = x_interval;
        self.y_interval = y_interval;
        self
    }

    /// Builder-style sentinel setter.
    #[must_use]
    pub fn with_no_data_value(mut self, no_data_value: f32) -> Self {
        self.no_data_value = no_data_value;
        self
    }

    /// Samples per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Position of the lower-left sample; `z` is the base elevation offset.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Move the lower-left sample to `origin`.
    pub fn set_origin(&mut self, origin: DVec3) {
        self.origin = origin;
    }

    /// Spacing between adjacent columns, in SRS units.
    pub fn x_interval(&self) -> f64 {
        self.x_interval
    }

    /// Spacing between adjacent rows, in SRS units.
    pub fn y_interval(&self) -> f64 {
        self.y_interval
    }

    /// Set the column spacing.
    pub fn set_x_interval(&mut self, x_interval: f64) {
        self.x_interval = x_interval;
    }

    /// Set the row spacing.
    pub fn set_y_interval(&mut self, y_interval: f64) {
        self.y_interval = y_interval;
    }

    /// Number of padding samples around the logical area.
    pub fn border_width(&self) -> usize {
        self.border_width
    }

    /// Set the number of padding samples.
    pub fn set_border_width(&mut self, border_width: usize) {
        self.border_width = border_width;
    }

    /// Vertical drop used for mesh skirts. Not a height sample.
    pub fn skirt_height(&self) -> f32 {
        self.skirt_height
    }

    /// Set the skirt drop.
    pub fn set_skirt_height(&mut self, skirt_height: f32) {
        self.skirt_height = skirt_height;
    }

    /// Sentinel marking a missing sample.
    pub fn no_data_value(&self) -> f32 {
        self.no_data_value
    }

    /// Change the sentinel. Stored samples are not rewritten.
    pub fn set_no_data_value(&mut self, no_data_value: f32) {
        self.no_data_value = no_data_value;
    }

    /// Whether `height` is this grid's sentinel.
    #[inline]
    pub fn is_no_data(&self, height: f32) -> bool {
        height == self.no_data_value
    }

    #[inline]
    fn index(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    /// Stored height at `(column, row)`, sentinel included.
    #[inline]
    pub fn height(&self, column: usize, row: usize) -> f32 {
        self.heights[self.index(column, row)]
    }

    /// Overwrite the height at `(column, row)`. Panics outside the grid.
    #[inline]
    pub fn set_height(&mut self, column: usize, row: usize, height: f32) {
        let idx = self.index(column, row);
        self.heights[idx] = height;
    }

    /// Bounds-checked lookup; `None` outside the grid.
    pub fn get(&self, column: usize, row: usize) -> Option<f32> {
        (column < self.columns && row < self.rows).then(|| self.height(column, row))
    }

    /// Height at `(column, row)`, or `None` if the sample is the sentinel.
    #[inline]
    pub fn height_or_none(&self, column: usize, row: usize) -> Option<f32> {
        let h = self.height(column, row);
        (!self.is_no_data(h)).then_some(h)
    }

    /// All samples, row-major.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Mutable view of all samples, row-major.
    pub fn heights_mut(&mut self) -> &mut [f32] {
        &mut self.heights
    }

    /// Fill every sample with `height`.
    pub fn fill(&mut self, height: f32) {
        self.heights.fill(height);
    }

    /// World position of sample `(column, row)`, with the sample's height
    /// added to the base elevation.
    pub fn world_position(&self, column: usize, row: usize) -> DVec3 {
        DVec3::new(
            self.origin.x + column as f64 * self.x_interval,
            self.origin.y + row as f64 * self.y_interval,
            self.origin.z + self.height(column, row) as f64,
        )
    }

    /// Horizontal span covered by the samples: `(columns - 1) * x_interval`.
    pub fn span_x(&self) -> f64 {
        (self.columns.saturating_sub(1)) as f64 * self.x_interval
    }

    /// Vertical span covered by the samples: `(rows - 1) * y_interval`.
    pub fn span_y(&self) -> f64 {
        (self.rows.saturating_sub(1)) as f64 * self.y_interval
    }
}
