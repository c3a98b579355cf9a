//! Point sampling of an [`ElevationGrid`] at fractional, world, and
//! normalized coordinates.
//!
//! Every sampler returns `None` when the samples it needs include the grid's
//! no-data sentinel. Callers that write results back into a grid store the
//! sentinel in that case.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::ElevationGrid;

/// How heights between grid samples are reconstructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Value of the closest sample.
    Nearest,
    /// Plane through the triangle (of the cell's two) containing the point.
    /// Matches a triangle mesh built over the grid exactly.
    Triangulated,
    /// Classic bilinear blend of the cell's four corners.
    #[default]
    Bilinear,
    /// Box-filter blend weighted by the fractional parts of the coordinate.
    Average,
}

/// Cell corners enclosing a fractional coordinate, clamped into the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Footprint {
    col_min: usize,
    col_max: usize,
    row_min: usize,
    row_max: usize,
}

impl Footprint {
    /// Floor/ceil window around `(col, row)`, clamped into bounds. May
    /// collapse to a single column and/or row.
    fn clamped(grid: &ElevationGrid, col: f64, row: f64) -> Self {
        let max_col = (grid.columns() - 1) as f64;
        let max_row = (grid.rows() - 1) as f64;
        Self {
            col_min: col.floor().clamp(0.0, max_col) as usize,
            col_max: col.ceil().clamp(0.0, max_col) as usize,
            row_min: row.floor().clamp(0.0, max_row) as usize,
            row_max: row.ceil().clamp(0.0, max_row) as usize,
        }
    }

    /// Widen a collapsed axis to a full cell, toward the larger index unless
    /// already at the last sample.
    fn widened(mut self, grid: &ElevationGrid) -> Self {
        widen_axis(&mut self.col_min, &mut self.col_max, grid.columns());
        widen_axis(&mut self.row_min, &mut self.row_max, grid.rows());
        self
    }

    fn is_degenerate(&self) -> bool {
        self.col_min == self.col_max || self.row_min == self.row_max
    }

    /// Corner heights `[ll, lr, ul, ur]`, or `None` if any is the sentinel.
    fn corners(&self, grid: &ElevationGrid) -> Option<[f64; 4]> {
        let ll = grid.height_or_none(self.col_min, self.row_min)?;
        let lr = grid.height_or_none(self.col_max, self.row_min)?;
        let ul = grid.height_or_none(self.col_min, self.row_max)?;
        let ur = grid.height_or_none(self.col_max, self.row_max)?;
        Some([ll as f64, lr as f64, ul as f64, ur as f64])
    }
}

fn widen_axis(min: &mut usize, max: &mut usize, count: usize) {
    if *min != *max {
        return;
    }
    if *min + 1 < count {
        *max = *min + 1;
    } else if *max > 0 {
        *min = *max - 1;
    }
}

/// Sample the grid at fractional column/row `(col, row)`.
///
/// The coordinate may lie outside `[0, columns-1] × [0, rows-1]`; the
/// footprint is clamped into the grid before any lookup.
pub fn sample_at_fractional_coordinate(
    grid: &ElevationGrid,
    col: f64,
    row: f64,
    mode: InterpolationMode,
) -> Option<f32> {
    match mode {
        InterpolationMode::Nearest => nearest(grid, col, row),
        InterpolationMode::Triangulated => triangulated(grid, col, row),
        InterpolationMode::Bilinear => bilinear(grid, col, row, Footprint::clamped(grid, col, row)),
        InterpolationMode::Average => average(grid, col, row),
    }
}

fn nearest(grid: &ElevationGrid, col: f64, row: f64) -> Option<f32> {
    let c = col.round().clamp(0.0, (grid.columns() - 1) as f64) as usize;
    let r = row.round().clamp(0.0, (grid.rows() - 1) as f64) as usize;
    grid.height_or_none(c, r)
}

fn triangulated(grid: &ElevationGrid, col: f64, row: f64) -> Option<f32> {
    // Evaluate on the grid's edge, never extrapolate past it.
    let col = col.clamp(0.0, (grid.columns() - 1) as f64);
    let row = row.clamp(0.0, (grid.rows() - 1) as f64);
    let fp = Footprint::clamped(grid, col, row).widened(grid);
    if fp.is_degenerate() {
        // Single row or column: no triangle exists, fall back to linear.
        return bilinear(grid, col, row, fp);
    }
    let [ll, lr, ul, ur] = fp.corners(grid)?;

    let (c0, c1) = (fp.col_min as f64, fp.col_max as f64);
    let (r0, r1) = (fp.row_min as f64, fp.row_max as f64);
    let dx = col - c0;
    let dy = row - r0;

    let (v0, v1, v2) = if dx > dy {
        // Lower-right triangle.
        (
            DVec3::new(c0, r0, ll),
            DVec3::new(c1, r0, lr),
            DVec3::new(c1, r1, ur),
        )
    } else {
        // Upper-left triangle.
        (
            DVec3::new(c0, r0, ll),
            DVec3::new(c1, r1, ur),
            DVec3::new(c0, r1, ul),
        )
    };
    Some(plane_height(v0, v1, v2, col, row) as f32)
}

/// Height at `(x, y)` of the plane through three points.
fn plane_height(v0: DVec3, v1: DVec3, v2: DVec3, x: f64, y: f64) -> f64 {
    let n = (v1 - v0).cross(v2 - v0);
    (n.x * (x - v0.x) + n.y * (y - v0.y)) / -n.z + v0.z
}

fn bilinear(grid: &ElevationGrid, col: f64, row: f64, fp: Footprint) -> Option<f32> {
    let [ll, lr, ul, ur] = fp.corners(grid)?;

    let (c0, c1) = (fp.col_min as f64, fp.col_max as f64);
    let (r0, r1) = (fp.row_min as f64, fp.row_max as f64);

    let h = match (fp.col_min == fp.col_max, fp.row_min == fp.row_max) {
        (true, true) => ll,
        (true, false) => (r1 - row) * ll + (row - r0) * ul,
        (false, true) => (c1 - col) * ll + (col - c0) * lr,
        (false, false) => {
            let south = (c1 - col) * ll + (col - c0) * lr;
            let north = (c1 - col) * ul + (col - c0) * ur;
            (r1 - row) * south + (row - r0) * north
        }
    };
    Some(h as f32)
}

fn average(grid: &ElevationGrid, col: f64, row: f64) -> Option<f32> {
    let fp = Footprint::clamped(grid, col, row);
    let [ll, lr, ul, ur] = fp.corners(grid)?;

    // Weights come from the raw coordinate, not the clamped window.
    let x_rem = col - col.trunc();
    let y_rem = row - row.trunc();

    let h = (1.0 - y_rem) * (1.0 - x_rem) * ll
        + (1.0 - y_rem) * x_rem * lr
        + y_rem * (1.0 - x_rem) * ul
        + y_rem * x_rem * ur;
    Some(h as f32)
}

/// Sample at world coordinates `(x, y)` given the grid's lower-left corner
/// `(origin_x, origin_y)` and spacing `(dx, dy)`.
///
/// The derived fractional coordinate is clamped into the grid.
#[allow(clippy::too_many_arguments)]
pub fn sample_at_world_location(
    grid: &ElevationGrid,
    x: f64,
    y: f64,
    origin_x: f64,
    origin_y: f64,
    dx: f64,
    dy: f64,
    mode: InterpolationMode,
) -> Option<f32> {
    let col = ((x - origin_x) / dx).clamp(0.0, (grid.columns() - 1) as f64);
    let row = ((y - origin_y) / dy).clamp(0.0, (grid.rows() - 1) as f64);
    sample_at_fractional_coordinate(grid, col, row, mode)
}

/// Sample at normalized location `(nx, ny)`, each clamped to `[0, 1]` and
/// scaled to the grid's full span.
pub fn sample_at_normalized_location(
    grid: &ElevationGrid,
    nx: f64,
    ny: f64,
    mode: InterpolationMode,
) -> Option<f32> {
    let col = nx.clamp(0.0, 1.0) * (grid.columns() - 1) as f64;
    let row = ny.clamp(0.0, 1.0) * (grid.rows() - 1) as f64;
    sample_at_fractional_coordinate(grid, col, row, mode)
}

/// Average of the up-to-four direct neighbors of `(col, row)`.
///
/// Neighbor values are used as stored, sentinel included. Returns `None` only
/// for a 1×1 grid, where no neighbor exists.
pub fn fill_single_gap(grid: &ElevationGrid, col: usize, row: usize) -> Option<f32> {
    let mut total = 0.0f32;
    let mut count = 0u32;
    if col > 0 {
        total += grid.height(col - 1, row);
        count += 1;
    }
    if col + 1 < grid.columns() {
        total += grid.height(col + 1, row);
        count += 1;
    }
    if row > 0 {
        total += grid.height(col, row - 1);
        count += 1;
    }
    if row + 1 < grid.rows() {
        total += grid.height(col, row + 1);
        count += 1;
    }
    (count > 0).then(|| total / count as f32)
}
