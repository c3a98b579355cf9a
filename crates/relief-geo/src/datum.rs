//! Vertical datums: the offset between mean sea level and the ellipsoid.

use std::fmt::Debug;

/// A vertical datum relating mean-sea-level heights to heights above the
/// ellipsoid (HAE).
///
/// Implementations are shared between spatial references and queried from
/// worker threads, hence the `Send + Sync` bound.
pub trait VerticalDatum: Debug + Send + Sync {
    /// Geoid undulation (meters above the ellipsoid) at the given geodetic
    /// latitude/longitude in degrees.
    fn geoid_height(&self, latitude: f64, longitude: f64) -> f64;

    /// Convert a mean-sea-level height to a height above the ellipsoid.
    fn msl_to_hae(&self, latitude: f64, longitude: f64, msl: f64) -> f64 {
        msl + self.geoid_height(latitude, longitude)
    }

    /// Convert a height above the ellipsoid to a mean-sea-level height.
    fn hae_to_msl(&self, latitude: f64, longitude: f64, hae: f64) -> f64 {
        hae - self.geoid_height(latitude, longitude)
    }
}

/// A geoid with the same undulation everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformGeoid {
    /// Undulation in meters.
    pub offset: f64,
}

impl UniformGeoid {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }
}

impl VerticalDatum for UniformGeoid {
    fn geoid_height(&self, _latitude: f64, _longitude: f64) -> f64 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_geoid_offsets_heights() {
        let geoid = UniformGeoid::new(-30.0);
        assert_eq!(geoid.msl_to_hae(10.0, 20.0, 100.0), 70.0);
        assert_eq!(geoid.hae_to_msl(10.0, 20.0, 70.0), 100.0);
    }
}
