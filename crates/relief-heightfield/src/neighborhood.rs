//! Seamless sampling across tile edges.
//!
//! [`HeightFieldNeighborhood`] pairs a center grid with up to eight adjacent
//! grids. Adjacent tiles share their edge samples: the last column of the
//! west neighbor is the first column of the center, and so on.

use crate::{ElevationGrid, InterpolationMode, sample_at_normalized_location};

/// Offsets of the eight neighbors, in storage order. `+y` is north.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn slot(dx: i32, dy: i32) -> Option<usize> {
    NEIGHBOR_OFFSETS.iter().position(|&o| o == (dx, dy))
}

/// A center grid plus borrowed references to its adjacent grids.
#[derive(Clone, Debug)]
pub struct HeightFieldNeighborhood<'a> {
    center: &'a ElevationGrid,
    neighbors: [Option<&'a ElevationGrid>; 8],
}

/// A normalized location remapped into the grid that covers it.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedLocation<'a> {
    pub grid: &'a ElevationGrid,
    pub nx: f64,
    pub ny: f64,
}

/// Outcome of sampling a neighborhood at a normalized location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NeighborhoodSample {
    /// A height was interpolated.
    Height(f32),
    /// The covering grid has no data there.
    NoData,
    /// No grid in the neighborhood covers the location.
    Uncovered,
}

impl<'a> HeightFieldNeighborhood<'a> {
    /// A neighborhood with no neighbors (a dataset boundary on every side).
    pub fn new(center: &'a ElevationGrid) -> Self {
        Self {
            center,
            neighbors: [None; 8],
        }
    }

    /// Register the neighbor at offset `(dx, dy)`, each in `-1..=1`, `+y`
    /// north. `(0, 0)` and out-of-range offsets are ignored.
    pub fn set_neighbor(&mut self, dx: i32, dy: i32, grid: &'a ElevationGrid) {
        if let Some(i) = slot(dx, dy) {
            self.neighbors[i] = Some(grid);
        }
    }

    /// Builder-style [`set_neighbor`](Self::set_neighbor).
    #[must_use]
    pub fn with_neighbor(mut self, dx: i32, dy: i32, grid: &'a ElevationGrid) -> Self {
        self.set_neighbor(dx, dy, grid);
        self
    }

    pub fn center(&self) -> &'a ElevationGrid {
        self.center
    }

    /// The grid at offset `(dx, dy)`; `(0, 0)` is the center.
    pub fn neighbor(&self, dx: i32, dy: i32) -> Option<&'a ElevationGrid> {
        if (dx, dy) == (0, 0) {
            return Some(self.center);
        }
        slot(dx, dy).and_then(|i| self.neighbors[i])
    }

    /// Find the grid covering normalized location `(nx, ny)` (relative to the
    /// center) and the location in that grid's own normalized frame.
    ///
    /// Returns `None` at a dataset edge, where no neighbor is registered.
    pub fn resolve(&self, nx: f64, ny: f64) -> Option<ResolvedLocation<'a>> {
        let (dx, local_nx) = remap_axis(nx);
        let (dy, local_ny) = remap_axis(ny);
        let grid = self.neighbor(dx, dy)?;
        Some(ResolvedLocation {
            grid,
            nx: local_nx,
            ny: local_ny,
        })
    }

    /// Height at integer `(col, row)` relative to the center grid. Negative
    /// indices or indices past the last sample reach into the neighbors.
    ///
    /// Returns `None` if no grid covers the sample or the sample is no-data.
    pub fn height_at_offset(&self, col: i64, row: i64) -> Option<f32> {
        let columns = self.center.columns() as i64;
        let rows = self.center.rows() as i64;

        let (dx, c) = offset_axis(col, columns);
        let (dy, r) = offset_axis(row, rows);
        let grid = self.neighbor(dx, dy)?;

        // Neighbor-relative index, measured from the shared edge.
        let c = match dx {
            -1 => grid.columns() as i64 - 1 + c,
            _ => c,
        };
        let r = match dy {
            -1 => grid.rows() as i64 - 1 + r,
            _ => r,
        };
        if c < 0 || r < 0 {
            return None;
        }
        let h = grid.get(c as usize, r as usize)?;
        (!grid.is_no_data(h)).then_some(h)
    }
}

/// Which neighbor (-1, 0, 1) covers normalized coordinate `n`, and `n` in
/// that neighbor's frame.
fn remap_axis(n: f64) -> (i32, f64) {
    if n < 0.0 {
        (-1, n + 1.0)
    } else if n > 1.0 {
        (1, n - 1.0)
    } else {
        (0, n)
    }
}

/// Which neighbor covers integer index `i` of an axis with `count` samples,
/// and the index relative to the shared edge (negative for the -1 side).
fn offset_axis(i: i64, count: i64) -> (i32, i64) {
    if i < 0 {
        (-1, i)
    } else if i >= count {
        (1, i - (count - 1))
    } else {
        (0, i)
    }
}

/// Sample a neighborhood at normalized location `(nx, ny)` relative to its
/// center, crossing into a neighbor when the location lies outside `[0, 1]²`.
pub fn sample_neighborhood_normalized(
    hood: &HeightFieldNeighborhood<'_>,
    nx: f64,
    ny: f64,
    mode: InterpolationMode,
) -> NeighborhoodSample {
    match hood.resolve(nx, ny) {
        None => NeighborhoodSample::Uncovered,
        Some(loc) => match sample_at_normalized_location(loc.grid, loc.nx, loc.ny, mode) {
            Some(h) => NeighborhoodSample::Height(h),
            None => NeighborhoodSample::NoData,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_grid(value: f32) -> ElevationGrid {
        let mut grid = ElevationGrid::new(3, 3);
        grid.fill(value);
        grid
    }

    /// Grid whose height encodes the column: `h = base + c`.
    fn ramp_grid(base: f32) -> ElevationGrid {
        let mut grid = ElevationGrid::new(3, 3);
        for r in 0..3 {
            for c in 0..3 {
                grid.set_height(c, r, base + c as f32);
            }
        }
        grid
    }

    #[test]
    fn test_inside_location_resolves_to_center() {
        let center = constant_grid(1.0);
        let hood = HeightFieldNeighborhood::new(&center);
        let loc = hood.resolve(0.3, 0.7).unwrap();
        assert!(std::ptr::eq(loc.grid, &center));
        assert_eq!((loc.nx, loc.ny), (0.3, 0.7));
    }

    #[test]
    fn test_east_location_resolves_to_east_neighbor() {
        let center = constant_grid(1.0);
        let east = constant_grid(2.0);
        let hood = HeightFieldNeighborhood::new(&center).with_neighbor(1, 0, &east);
        let loc = hood.resolve(1.25, 0.5).unwrap();
        assert!(std::ptr::eq(loc.grid, &east));
        assert!((loc.nx - 0.25).abs() < 1e-12);
        assert_eq!(loc.ny, 0.5);
    }

    #[test]
    fn test_diagonal_location_resolves_to_corner_neighbor() {
        let center = constant_grid(1.0);
        let south_west = constant_grid(3.0);
        let hood = HeightFieldNeighborhood::new(&center).with_neighbor(-1, -1, &south_west);
        let loc = hood.resolve(-0.1, -0.2).unwrap();
        assert!(std::ptr::eq(loc.grid, &south_west));
        assert!((loc.nx - 0.9).abs() < 1e-12 && (loc.ny - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_missing_neighbor_is_uncovered() {
        let center = constant_grid(1.0);
        let hood = HeightFieldNeighborhood::new(&center);
        assert!(hood.resolve(-0.5, 0.5).is_none());
        assert_eq!(
            sample_neighborhood_normalized(&hood, -0.5, 0.5, InterpolationMode::Bilinear),
            NeighborhoodSample::Uncovered
        );
    }

    #[test]
    fn test_sample_crosses_into_neighbor() {
        let center = constant_grid(1.0);
        let north = constant_grid(7.0);
        let hood = HeightFieldNeighborhood::new(&center).with_neighbor(0, 1, &north);
        assert_eq!(
            sample_neighborhood_normalized(&hood, 0.5, 1.5, InterpolationMode::Bilinear),
            NeighborhoodSample::Height(7.0)
        );
        assert_eq!(
            sample_neighborhood_normalized(&hood, 0.5, 0.5, InterpolationMode::Bilinear),
            NeighborhoodSample::Height(1.0)
        );
    }

    #[test]
    fn test_sample_reports_no_data() {
        let mut center = constant_grid(1.0);
        center.fill(center.no_data_value());
        let hood = HeightFieldNeighborhood::new(&center);
        assert_eq!(
            sample_neighborhood_normalized(&hood, 0.5, 0.5, InterpolationMode::Nearest),
            NeighborhoodSample::NoData
        );
    }

    #[test]
    fn test_offset_lookup_shares_edges() {
        let center = ramp_grid(0.0);
        let west = ramp_grid(100.0);
        let east = ramp_grid(200.0);
        let hood = HeightFieldNeighborhood::new(&center)
            .with_neighbor(-1, 0, &west)
            .with_neighbor(1, 0, &east);

        assert_eq!(hood.height_at_offset(1, 1), Some(1.0));
        // Column -1 is the west grid's second-to-last column.
        assert_eq!(hood.height_at_offset(-1, 1), Some(101.0));
        // Column 3 is the east grid's second column.
        assert_eq!(hood.height_at_offset(3, 1), Some(201.0));
        // Nothing registered north.
        assert_eq!(hood.height_at_offset(1, 3), None);
    }

    #[test]
    fn test_offset_lookup_sentinel_is_none() {
        let mut center = constant_grid(4.0);
        center.set_height(0, 0, center.no_data_value());
        let hood = HeightFieldNeighborhood::new(&center);
        assert_eq!(hood.height_at_offset(0, 0), None);
        assert_eq!(hood.height_at_offset(1, 0), Some(4.0));
    }

    #[test]
    fn test_center_offset_ignored_by_set_neighbor() {
        let center = constant_grid(1.0);
        let other = constant_grid(2.0);
        let mut hood = HeightFieldNeighborhood::new(&center);
        hood.set_neighbor(0, 0, &other);
        hood.set_neighbor(2, 0, &other);
        assert!(std::ptr::eq(hood.neighbor(0, 0).unwrap(), &center));
        assert!(hood.neighbor(1, 0).is_none());
    }
}
