//! Elevation-grid sampling and geometry derivation.
//!
//! Point queries (interpolated height, surface normal), grid transforms
//! (resampling, sub-region extraction, reference grids, repair), and the
//! rendering-side summaries derived from a grid: a horizon-aware culling cone
//! and a tangent-space normal map.

mod culling_cone;
mod error;
mod grid;
mod interpolation;
mod neighborhood;
mod normal;
mod repair;
mod transform;

pub use culling_cone::{CullingCone, compute_culling_cone};
pub use error::GridError;
pub use grid::{ElevationGrid, NO_DATA_VALUE};
pub use interpolation::{
    InterpolationMode, fill_single_gap, sample_at_fractional_coordinate,
    sample_at_normalized_location, sample_at_world_location,
};
pub use neighborhood::{
    HeightFieldNeighborhood, NeighborhoodSample, ResolvedLocation, sample_neighborhood_normalized,
};
pub use normal::{NormalMap, build_normal_map, normal_at_normalized_location};
pub use repair::{
    FillNoData, HeightFieldOperator, RejectValue, ReplaceInvalid, ValidRange, ValidityPredicate,
    resolve_invalid_heights,
};
pub use transform::{
    build_reference_grid, extract_sub_region, resample_to_dimensions, scale_heights_to_degrees,
};

/// Fixed degrees-to-meters factor used for point normals on geographic grids.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Meters in one degree of longitude at the equator, used to express heights
/// in degrees.
pub const METERS_PER_DEGREE_EQUATORIAL: f64 = 111_319.0;

/// Safety margin (radians) below a right angle beyond which a culling cone
/// cannot bound a tile.
pub const HORIZON_CUTOFF_MARGIN: f64 = 0.1;
