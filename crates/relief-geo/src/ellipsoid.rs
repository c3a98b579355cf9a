//! Reference ellipsoid of revolution used for planet-surface conversions.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// An oblate ellipsoid of revolution described by its two semi-axes, in meters.
///
/// Geocentric coordinates use the usual earth-centered, earth-fixed axes:
/// `+X` through (0°, 0°), `+Y` through (0°, 90°E), `+Z` through the north pole.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis (equatorial radius) in meters.
    pub equatorial_radius: f64,
    /// Semi-minor axis (polar radius) in meters.
    pub polar_radius: f64,
}

impl Ellipsoid {
    /// The WGS 84 ellipsoid.
    pub const WGS84: Ellipsoid = Ellipsoid {
        equatorial_radius: 6_378_137.0,
        polar_radius: 6_356_752.314_245,
    };

    /// Create an ellipsoid from its two radii.
    ///
    /// # Panics
    ///
    /// Panics if either radius is not positive.
    pub fn new(equatorial_radius: f64, polar_radius: f64) -> Self {
        assert!(
            equatorial_radius > 0.0 && polar_radius > 0.0,
            "Ellipsoid radii must be positive, got {equatorial_radius} / {polar_radius}"
        );
        Self {
            equatorial_radius,
            polar_radius,
        }
    }

    /// A perfect sphere of the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self::new(radius, radius)
    }

    /// First eccentricity squared, `1 - b²/a²`.
    pub fn eccentricity_squared(&self) -> f64 {
        let ratio = self.polar_radius / self.equatorial_radius;
        1.0 - ratio * ratio
    }

    /// Convert geodetic latitude/longitude (radians) and height above the
    /// ellipsoid (meters) to a planet-centered position.
    pub fn geodetic_to_geocentric(&self, latitude: f64, longitude: f64, height: f64) -> DVec3 {
        let e2 = self.eccentricity_squared();
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_lon, cos_lon) = longitude.sin_cos();

        // Prime vertical radius of curvature.
        let n = self.equatorial_radius / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        DVec3::new(
            (n + height) * cos_lat * cos_lon,
            (n + height) * cos_lat * sin_lon,
            (n * (1.0 - e2) + height) * sin_lat,
        )
    }

    /// Length of one degree of arc along the equator, in meters.
    pub fn meters_per_degree_at_equator(&self) -> f64 {
        std::f64::consts::TAU * self.equatorial_radius / 360.0
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}
