//! Horizon-aware bounding cone for a tile on a curved planet.
//!
//! The cone bounds every direction from which some part of the tile can be
//! seen. A viewer outside the cone, and farther from the apex than the cone's
//! radius, cannot see the tile over the horizon.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use relief_geo::Ellipsoid;
use tracing::debug;

use crate::{ElevationGrid, HORIZON_CUTOFF_MARGIN};

/// Bounding cone of a geographic tile, in planet-centered coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CullingCone {
    /// Cone apex, raised above the tile center along the axis.
    pub apex: DVec3,
    /// Outward unit axis through the tile center.
    pub axis: DVec3,
    /// Smallest allowed cosine between the axis and the apex-to-eye direction.
    pub min_dot_product: f64,
    /// Eyes closer than this to the apex are never culled.
    pub radius: f64,
}

impl CullingCone {
    /// Whether a viewer at `eye` is certain not to see the tile.
    pub fn is_culled(&self, eye: DVec3) -> bool {
        if self.min_dot_product <= -1.0 {
            return false;
        }

        let to_eye = eye - self.apex;
        let distance = to_eye.length();
        if distance < self.radius {
            return false;
        }

        to_eye.dot(self.axis) / distance < self.min_dot_product
    }
}

/// Compute the culling cone of a geographic grid lying on `ellipsoid`.
///
/// The grid's origin and intervals are in degrees (longitude, latitude) and
/// its heights in meters, multiplied by `vertical_scale`. The planet is
/// approximated by a sphere of the ellipsoid's polar radius.
///
/// Returns `None` when the tile wraps too far around the planet for a single
/// cone to bound it. No-data samples are ignored.
pub fn compute_culling_cone(
    grid: &ElevationGrid,
    ellipsoid: &Ellipsoid,
    vertical_scale: f32,
) -> Option<CullingCone> {
    let globe_radius = ellipsoid.polar_radius;
    let cutoff = FRAC_PI_2 - HORIZON_CUTOFF_MARGIN;
    let origin = grid.origin();

    let mid_lon = origin.x + grid.x_interval() * (grid.columns() - 1) as f64 * 0.5;
    let mid_lat = origin.y + grid.y_interval() * (grid.rows() - 1) as f64 * 0.5;
    let center_position =
        ellipsoid.geodetic_to_geocentric(mid_lat.to_radians(), mid_lon.to_radians(), origin.z);
    let center_normal = center_position.normalize();

    let mut min_dot_product: f64 = 1.0;
    let mut max_height: f64 = 0.0;
    let mut max_radius: f64 = 0.0;

    for r in 0..grid.rows() {
        let lat = origin.y + grid.y_interval() * r as f64;
        for c in 0..grid.columns() {
            let h = grid.height(c, r);
            if grid.is_no_data(h) {
                continue;
            }

            let lon = origin.x + grid.x_interval() * c as f64;
            let height = origin.z + f64::from(h) * f64::from(vertical_scale);
            let position =
                ellipsoid.geodetic_to_geocentric(lat.to_radians(), lon.to_radians(), height);

            let d = position.distance(center_position);
            let theta = (globe_radius / (globe_radius + height.abs())).acos();
            let phi = 2.0 * (d * 0.5 / globe_radius).asin();
            let beta = theta + phi;

            if !(phi < cutoff && beta < cutoff) {
                debug!(
                    column = c,
                    row = r,
                    phi,
                    beta,
                    "tile wraps past the horizon cutoff, no culling cone"
                );
                return None;
            }

            min_dot_product = min_dot_product.min(-beta.sin());
            max_height = max_height.max(globe_radius * (1.0 / beta.cos() - 1.0));
            max_radius = max_radius.max(globe_radius * beta.tan());
        }
    }

    Some(CullingCone {
        apex: center_position + center_normal * max_height,
        axis: center_normal,
        min_dot_product,
        radius: max_radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 6_371_000.0;

    fn sphere() -> Ellipsoid {
        Ellipsoid::sphere(R)
    }

    /// 3x3 grid covering lon 0..0.2°, lat -0.1..0.1°.
    fn small_tile() -> ElevationGrid {
        ElevationGrid::new(3, 3)
            .with_intervals(0.1, 0.1)
            .with_origin(DVec3::new(0.0, -0.1, 0.0))
    }

    /// Great-circle angle between two lat/lon points (degrees in, radians out).
    fn central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let (lat1, lon1, lat2, lon2) = (
            lat1.to_radians(),
            lon1.to_radians(),
            lat2.to_radians(),
            lon2.to_radians(),
        );
        let a = ((lat2 - lat1) * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * ((lon2 - lon1) * 0.5).sin().powi(2);
        2.0 * a.sqrt().asin()
    }

    #[test]
    fn test_flat_small_tile_cone() {
        let cone = compute_culling_cone(&small_tile(), &sphere(), 0.0).unwrap();
        let corner = central_angle(0.0, 0.1, -0.1, 0.0);

        let mid_lon = 0.1_f64.to_radians();
        let expected_axis = DVec3::new(mid_lon.cos(), mid_lon.sin(), 0.0);
        assert!((cone.axis - expected_axis).length() < 1e-9, "axis {:?}", cone.axis);
        assert!(
            (cone.min_dot_product - -corner.sin()).abs() < 1e-9,
            "threshold {} vs {}",
            cone.min_dot_product,
            -corner.sin()
        );
        assert!(cone.min_dot_product < 0.0 && cone.min_dot_product > -0.01);

        let expected_radius = R * corner.tan();
        assert!(
            (cone.radius - expected_radius).abs() < 1e-3 * expected_radius,
            "radius {} vs {expected_radius}",
            cone.radius
        );

        let expected_height = R * (1.0 / corner.cos() - 1.0);
        let apex_height = cone.apex.length() - R;
        assert!((apex_height - expected_height).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_scale_zero_ignores_heights() {
        let mut tall = small_tile();
        tall.fill(5000.0);
        let flat = compute_culling_cone(&small_tile(), &sphere(), 0.0).unwrap();
        let scaled = compute_culling_cone(&tall, &sphere(), 0.0).unwrap();
        assert_eq!(flat, scaled);
    }

    #[test]
    fn test_elevation_widens_cone() {
        let mut tall = small_tile();
        tall.fill(5000.0);
        let flat = compute_culling_cone(&small_tile(), &sphere(), 1.0).unwrap();
        let raised = compute_culling_cone(&tall, &sphere(), 1.0).unwrap();
        assert!(raised.min_dot_product < flat.min_dot_product);
        assert!(raised.radius > flat.radius);
        assert!(raised.apex.length() > flat.apex.length());
    }

    #[test]
    fn test_whole_globe_tile_has_no_cone() {
        let grid = ElevationGrid::new(3, 3)
            .with_intervals(180.0, 90.0)
            .with_origin(DVec3::new(-180.0, -90.0, 0.0));
        assert!(compute_culling_cone(&grid, &sphere(), 1.0).is_none());
    }

    #[test]
    fn test_extreme_height_has_no_cone() {
        // theta = acos(R / (R + h)) passes the cutoff for very tall samples.
        let mut grid = small_tile();
        grid.set_height(1, 1, (R * 10.0) as f32);
        assert!(compute_culling_cone(&grid, &sphere(), 1.0).is_none());
    }

    #[test]
    fn test_no_data_samples_are_skipped() {
        let mut grid = small_tile();
        grid.set_height(1, 1, grid.no_data_value());
        assert!(compute_culling_cone(&grid, &sphere(), 1.0).is_some());
    }

    #[test]
    fn test_is_culled() {
        let cone = compute_culling_cone(&small_tile(), &sphere(), 0.0).unwrap();

        let overhead = DVec3::X * (R + 1_000_000.0);
        assert!(!cone.is_culled(overhead), "eye above the tile sees it");

        let antipode = -DVec3::X * (R + 10_000.0);
        assert!(cone.is_culled(antipode), "eye on the far side cannot");

        let near_apex = cone.apex + DVec3::Y * (cone.radius * 0.5);
        assert!(!cone.is_culled(near_apex), "eye inside the radius is kept");
    }

    #[test]
    fn test_degenerate_cone_never_culls() {
        let cone = CullingCone {
            apex: DVec3::ZERO,
            axis: DVec3::Z,
            min_dot_product: -1.0,
            radius: 0.0,
        };
        assert!(!cone.is_culled(DVec3::new(0.0, 0.0, -1.0e9)));
    }
}
