//! Surface normals from central differences, at a point or over a whole grid.
//!
//! Normals live in a local tangent frame: `+x` east, `+y` north, `+z` up.
//! Horizontal distances are converted to meters so slopes are not distorted
//! by angular cell spacing.

use glam::{DVec3, Vec3};
use image::{Rgb, RgbImage};
use relief_geo::SpatialReference;

use crate::{
    ElevationGrid, HeightFieldNeighborhood, InterpolationMode, METERS_PER_DEGREE,
    sample_at_normalized_location,
};

/// Surface normal at normalized location `(nx, ny)`.
///
/// Heights are sampled one cell west, east, south, and north of the point
/// (clamped to the grid). On a geographic grid, cell spacing is converted to
/// meters with [`METERS_PER_DEGREE`]. A no-data sample yields a NaN normal.
pub fn normal_at_normalized_location(
    grid: &ElevationGrid,
    nx: f64,
    ny: f64,
    mode: InterpolationMode,
    srs: &SpatialReference,
) -> Vec3 {
    let x_cells = (grid.columns() - 1) as f64;
    let y_cells = (grid.rows() - 1) as f64;

    let to_meters = if srs.is_geographic() {
        METERS_PER_DEGREE
    } else {
        1.0
    };
    let w = grid.x_interval() * x_cells * to_meters;
    let h = grid.y_interval() * y_cells * to_meters;

    let x_min = (nx - 1.0 / x_cells).max(0.0);
    let x_max = (nx + 1.0 / x_cells).min(1.0);
    let y_min = (ny - 1.0 / y_cells).max(0.0);
    let y_max = (ny + 1.0 / y_cells).min(1.0);

    let height = |x: f64, y: f64| {
        sample_at_normalized_location(grid, x, y, mode).map_or(f64::NAN, f64::from)
    };

    let west = DVec3::new(x_min * w, ny * h, height(x_min, ny));
    let east = DVec3::new(x_max * w, ny * h, height(x_max, ny));
    let south = DVec3::new(nx * w, y_min * h, height(nx, y_min));
    let north = DVec3::new(nx * w, y_max * h, height(nx, y_max));

    (east - west).cross(north - south).normalize().as_vec3()
}

/// Per-sample unit normals of a grid, row-major like the grid itself.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalMap {
    columns: usize,
    rows: usize,
    normals: Vec<Vec3>,
}

impl NormalMap {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Normal of sample `(s, t)`.
    pub fn get(&self, s: usize, t: usize) -> Vec3 {
        self.normals[t * self.columns + s]
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Encode as an 8-bit RGB image, mapping each component from `[-1, 1]`
    /// to `[0, 255]`. Pixel `(s, t)` holds sample `(s, t)`, so image row 0 is
    /// the grid's southern edge.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.columns as u32, self.rows as u32, |x, y| {
            let n = self.get(x as usize, y as usize);
            Rgb([encode(n.x), encode(n.y), encode(n.z)])
        })
    }
}

#[inline]
fn encode(component: f32) -> u8 {
    ((component * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Build a normal map for the center grid of `hood`.
///
/// Edge samples read across into the neighbors; a neighbor sample that is
/// missing or no-data is replaced with the center sample's height. On a
/// geographic reference the spacing is converted to meters using the
/// ellipsoid's equatorial circumference, and the east-west spacing is further
/// scaled by the cosine of each row's latitude.
pub fn build_normal_map(hood: &HeightFieldNeighborhood<'_>, srs: &SpatialReference) -> NormalMap {
    let grid = hood.center();
    let columns = grid.columns();
    let rows = grid.rows();
    let geographic = srs.is_geographic();
    let meters_per_degree = srs.ellipsoid().meters_per_degree_at_equator();

    let mut t_interval = grid.y_interval();
    if geographic {
        t_interval *= meters_per_degree;
    }

    let mut normals = Vec::with_capacity(columns * rows);
    for t in 0..rows {
        let mut s_interval = grid.x_interval();
        if geographic {
            let lat = (grid.origin().y + grid.y_interval() * t as f64).to_radians();
            s_interval *= meters_per_degree * lat.cos();
        }

        for s in 0..columns {
            let center = grid.height(s, t);
            let z = |dc: i64, dr: i64| {
                hood.height_at_offset(s as i64 + dc, t as i64 + dr)
                    .unwrap_or(center) as f64
            };

            let west = DVec3::new(-s_interval, 0.0, z(-1, 0));
            let east = DVec3::new(s_interval, 0.0, z(1, 0));
            let south = DVec3::new(0.0, -t_interval, z(0, -1));
            let north = DVec3::new(0.0, t_interval, z(0, 1));

            let n = (east - west).cross(north - south).normalize();
            normals.push(n.as_vec3());
        }
    }

    NormalMap {
        columns,
        rows,
        normals,
    }
}
