//! Spatial reference systems: geographic (degrees) and spherical Mercator (meters).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Ellipsoid, GeoError, VerticalDatum};

/// The horizontal coordinate system of a [`SpatialReference`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SrsKind {
    /// Longitude/latitude in degrees.
    Geographic,
    /// Spherical Mercator easting/northing in meters, using the ellipsoid's
    /// equatorial radius as the sphere radius.
    SphericalMercator,
}

/// A horizontal coordinate system on an ellipsoid, optionally carrying a
/// vertical datum for mean-sea-level conversions.
#[derive(Clone)]
pub struct SpatialReference {
    kind: SrsKind,
    ellipsoid: Ellipsoid,
    vertical_datum: Option<Arc<dyn VerticalDatum>>,
}

impl SpatialReference {
    /// Geographic WGS 84 with no vertical datum.
    pub fn wgs84() -> Self {
        Self::geographic_on(Ellipsoid::WGS84)
    }

    /// Spherical Mercator on WGS 84 with no vertical datum.
    pub fn spherical_mercator() -> Self {
        Self {
            kind: SrsKind::SphericalMercator,
            ellipsoid: Ellipsoid::WGS84,
            vertical_datum: None,
        }
    }

    /// Geographic coordinates on the given ellipsoid.
    pub fn geographic_on(ellipsoid: Ellipsoid) -> Self {
        Self {
            kind: SrsKind::Geographic,
            ellipsoid,
            vertical_datum: None,
        }
    }

    /// Attach a vertical datum.
    #[must_use]
    pub fn with_vertical_datum(mut self, datum: Arc<dyn VerticalDatum>) -> Self {
        self.vertical_datum = Some(datum);
        self
    }

    pub fn kind(&self) -> SrsKind {
        self.kind
    }

    pub fn is_geographic(&self) -> bool {
        self.kind == SrsKind::Geographic
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn vertical_datum(&self) -> Option<&dyn VerticalDatum> {
        self.vertical_datum.as_deref()
    }

    /// The geographic counterpart of this reference: same ellipsoid and datum.
    pub fn geographic(&self) -> SpatialReference {
        Self {
            kind: SrsKind::Geographic,
            ellipsoid: self.ellipsoid,
            vertical_datum: self.vertical_datum.clone(),
        }
    }

    /// Whether two references describe the same horizontal system.
    pub fn is_horizontally_equivalent(&self, other: &SpatialReference) -> bool {
        self.kind == other.kind && self.ellipsoid == other.ellipsoid
    }

    /// Transform a point in this system to longitude/latitude degrees.
    pub fn to_geographic_point(&self, x: f64, y: f64) -> (f64, f64) {
        match self.kind {
            SrsKind::Geographic => (x, y),
            SrsKind::SphericalMercator => {
                let r = self.ellipsoid.equatorial_radius;
                let lon = (x / r).to_degrees();
                let lat = (2.0 * (y / r).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
                (lon, lat)
            }
        }
    }

    /// Transform a longitude/latitude point (degrees) into this system.
    pub fn from_geographic_point(&self, lon: f64, lat: f64) -> Result<(f64, f64), GeoError> {
        match self.kind {
            SrsKind::Geographic => Ok((lon, lat)),
            SrsKind::SphericalMercator => {
                if lat.abs() >= 90.0 {
                    return Err(GeoError::LatitudeOutOfRange(lat));
                }
                let r = self.ellipsoid.equatorial_radius;
                let x = r * lon.to_radians();
                let y = r * (std::f64::consts::FRAC_PI_4 + lat.to_radians() * 0.5).tan().ln();
                Ok((x, y))
            }
        }
    }

    /// Transform a point from this system into `target`.
    pub fn transform_point(
        &self,
        x: f64,
        y: f64,
        target: &SpatialReference,
    ) -> Result<(f64, f64), GeoError> {
        if self.is_horizontally_equivalent(target) {
            return Ok((x, y));
        }
        let (lon, lat) = self.to_geographic_point(x, y);
        target.from_geographic_point(lon, lat)
    }
}

impl fmt::Debug for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialReference")
            .field("kind", &self.kind)
            .field("ellipsoid", &self.ellipsoid)
            .field("vertical_datum", &self.vertical_datum)
            .finish()
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::wgs84()
    }
}
