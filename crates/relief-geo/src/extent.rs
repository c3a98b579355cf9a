//! Axis-aligned rectangles in a spatial reference.

use crate::{GeoError, SpatialReference};

/// A rectangle `[x_min, x_max] × [y_min, y_max]` expressed in `srs`.
#[derive(Clone, Debug)]
pub struct GeoExtent {
    srs: SpatialReference,
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl GeoExtent {
    /// Build an extent, rejecting inverted or non-finite corners.
    pub fn new(
        srs: SpatialReference,
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    ) -> Result<Self, GeoError> {
        let finite = [x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite());
        if !finite || x_max < x_min || y_max < y_min {
            return Err(GeoError::InvalidExtent {
                x_min,
                y_min,
                x_max,
                y_max,
            });
        }
        Ok(Self {
            srs,
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    pub fn srs(&self) -> &SpatialReference {
        &self.srs
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// An extent is valid when it encloses a non-empty area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Center point `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) * 0.5,
            (self.y_min + self.y_max) * 0.5,
        )
    }

    /// Whether the point lies inside the rectangle (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Reproject the extent by transforming its two corners.
    ///
    /// Both supported projections are monotone per axis, so the corners of the
    /// source rectangle map to the corners of the target rectangle.
    pub fn reproject_to(&self, target: &SpatialReference) -> Result<GeoExtent, GeoError> {
        let (x0, y0) = self.srs.transform_point(self.x_min, self.y_min, target)?;
        let (x1, y1) = self.srs.transform_point(self.x_max, self.y_max, target)?;
        GeoExtent::new(target.clone(), x0, y0, x1, y1)
    }

    /// The same area expressed in longitude/latitude degrees.
    pub fn to_geographic(&self) -> GeoExtent {
        if self.srs.is_geographic() {
            return self.clone();
        }
        let (x0, y0) = self.srs.to_geographic_point(self.x_min, self.y_min);
        let (x1, y1) = self.srs.to_geographic_point(self.x_max, self.y_max);
        Self {
            srs: self.srs.geographic(),
            x_min: x0,
            y_min: y0,
            x_max: x1,
            y_max: y1,
        }
    }
}
