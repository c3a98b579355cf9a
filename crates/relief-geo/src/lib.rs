//! Geodetic collaborators for elevation processing: ellipsoid models, spatial
//! references, geographic extents, and vertical datums.

mod datum;
mod ellipsoid;
mod error;
mod extent;
mod srs;

pub use datum::{UniformGeoid, VerticalDatum};
pub use ellipsoid::Ellipsoid;
pub use error::GeoError;
pub use extent::GeoExtent;
pub use srs::{SpatialReference, SrsKind};
