//! Synthetic terrain for exercising the pipeline without real data.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use relief_geo::GeoExtent;
use relief_heightfield::ElevationGrid;

/// A gaussian hill in geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub lon: f64,
    pub lat: f64,
    /// Standard deviation in degrees.
    pub sigma: f64,
    pub height: f32,
}

impl Peak {
    /// A hill at the center of `extent`, a fifth of its width wide.
    pub fn centered_on(extent: &GeoExtent, height: f32) -> Self {
        let (lon, lat) = extent.center();
        Self {
            lon,
            lat,
            sigma: extent.width() * 0.2,
            height,
        }
    }

    pub fn height_at(&self, lon: f64, lat: f64) -> f32 {
        let d2 = (lon - self.lon).powi(2) + (lat - self.lat).powi(2);
        let falloff = (-d2 / (2.0 * self.sigma * self.sigma)).exp();
        (f64::from(self.height) * falloff) as f32
    }
}

/// A `columns x rows` grid over `extent` sampling `peak`.
///
/// Adjacent extents produce grids that agree on their shared edge.
pub fn synthetic_tile(extent: &GeoExtent, columns: usize, rows: usize, peak: &Peak) -> ElevationGrid {
    let x_interval = extent.width() / (columns - 1) as f64;
    let y_interval = extent.height() / (rows - 1) as f64;
    let mut grid = ElevationGrid::new(columns, rows)
        .with_intervals(x_interval, y_interval)
        .with_origin(DVec3::new(extent.x_min(), extent.y_min(), 0.0));

    for r in 0..rows {
        let lat = extent.y_min() + y_interval * r as f64;
        for c in 0..columns {
            let lon = extent.x_min() + x_interval * c as f64;
            grid.set_height(c, r, peak.height_at(lon, lat));
        }
    }
    grid
}

/// Mark `count` distinct random samples as no-data. Returns the cells hit.
pub fn punch_holes(grid: &mut ElevationGrid, count: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let count = count.min(grid.columns() * grid.rows());
    let no_data = grid.no_data_value();
    let mut holes = Vec::with_capacity(count);

    while holes.len() < count {
        let c = rng.random_range(0..grid.columns());
        let r = rng.random_range(0..grid.rows());
        if !grid.is_no_data(grid.height(c, r)) {
            grid.set_height(c, r, no_data);
            holes.push((c, r));
        }
    }
    holes
}
