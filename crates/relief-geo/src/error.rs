//! Geodetic error types.

/// Errors raised when building or reprojecting geographic extents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// The extent's max corner lies below or left of its min corner.
    #[error("invalid extent: ({x_min}, {y_min}) .. ({x_max}, {y_max})")]
    InvalidExtent {
        x_min: f64,
        y_min: f64,
        x_max: f64,
        y_max: f64,
    },

    /// A latitude cannot be represented in the target projection.
    #[error("latitude {0} is outside the projectable range")]
    LatitudeOutOfRange(f64),
}
