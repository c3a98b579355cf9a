//! In-place repair of invalid samples.
//!
//! Operators take the grid by `&mut`, so a pass has exclusive access for its
//! whole duration. [`FillNoData`] relies on that: repaired values are written
//! back immediately and feed the repair of later cells in the same pass.

use relief_geo::{GeoExtent, VerticalDatum};
use tracing::debug;

use crate::ElevationGrid;

/// Decides whether a height sample is acceptable.
pub trait ValidityPredicate {
    fn is_valid(&self, height: f32) -> bool;
}

impl<F> ValidityPredicate for F
where
    F: Fn(f32) -> bool,
{
    fn is_valid(&self, height: f32) -> bool {
        self(height)
    }
}

/// Accepts heights within `[min, max]`. NaN is never valid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidRange {
    pub min: f32,
    pub max: f32,
}

impl ValidRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

impl ValidityPredicate for ValidRange {
    fn is_valid(&self, height: f32) -> bool {
        height >= self.min && height <= self.max
    }
}

/// Rejects exactly one value, typically a no-data sentinel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RejectValue(pub f32);

impl ValidityPredicate for RejectValue {
    fn is_valid(&self, height: f32) -> bool {
        height != self.0
    }
}

/// A pass over a whole grid that rewrites samples in place.
pub trait HeightFieldOperator {
    /// Apply the pass, returning how many samples were rewritten.
    fn apply(&self, grid: &mut ElevationGrid) -> usize;
}

/// Overwrites every invalid sample with a fixed value.
#[derive(Clone, Debug)]
pub struct ReplaceInvalid<P> {
    predicate: P,
    replace_with: f32,
}

impl<P: ValidityPredicate> ReplaceInvalid<P> {
    /// Replace invalid samples with zero.
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            replace_with: 0.0,
        }
    }

    #[must_use]
    pub fn with_replacement(mut self, replace_with: f32) -> Self {
        self.replace_with = replace_with;
        self
    }

    pub fn replace_with(&self) -> f32 {
        self.replace_with
    }
}

impl<P: ValidityPredicate> HeightFieldOperator for ReplaceInvalid<P> {
    fn apply(&self, grid: &mut ElevationGrid) -> usize {
        let mut replaced = 0;
        for h in grid.heights_mut() {
            if !self.predicate.is_valid(*h) {
                *h = self.replace_with;
                replaced += 1;
            }
        }
        debug!(replaced, "replaced invalid samples");
        replaced
    }
}

/// Fills invalid samples from their neighbors, falling back to a default.
///
/// Cells are visited row by row, west to east. For each invalid cell:
/// 1. take the west cell if there is one, otherwise the east cell;
/// 2. if that is still invalid, take the cell in the previous row if there is
///    one, otherwise the cell in the next row;
/// 3. if that is still invalid, take the default value.
///
/// The east fallback in step 1 is taken whenever the column is the first one,
/// without checking that an east cell exists. On a single-column grid there
/// is none and the step leaves the value unchanged.
#[derive(Clone, Debug)]
pub struct FillNoData<P> {
    predicate: P,
    default_value: f32,
}

impl<P: ValidityPredicate> FillNoData<P> {
    /// Fill with a default value of zero.
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            default_value: 0.0,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default_value: f32) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn default_value(&self) -> f32 {
        self.default_value
    }
}

impl<P: ValidityPredicate> HeightFieldOperator for FillNoData<P> {
    fn apply(&self, grid: &mut ElevationGrid) -> usize {
        let columns = grid.columns();
        let rows = grid.rows();
        let mut filled = 0;

        for row in 0..rows {
            for col in 0..columns {
                let mut val = grid.height(col, row);
                if self.predicate.is_valid(val) {
                    continue;
                }

                if col > 0 {
                    val = grid.height(col - 1, row);
                } else if col <= columns - 1
                    && let Some(east) = grid.get(col + 1, row)
                {
                    val = east;
                }

                if !self.predicate.is_valid(val) {
                    if row > 0 {
                        val = grid.height(col, row - 1);
                    } else if row + 1 < rows {
                        val = grid.height(col, row + 1);
                    }
                }

                if !self.predicate.is_valid(val) {
                    val = self.default_value;
                }

                grid.set_height(col, row, val);
                filled += 1;
            }
        }

        debug!(filled, "filled no-data samples");
        filled
    }
}

/// Replace every sample equal to `invalid_value` with the geoid height at
/// its location, or with zero when no datum is given.
///
/// `extent` is the area the grid covers; it is expressed in geographic
/// coordinates before the datum is queried.
pub fn resolve_invalid_heights(
    grid: &mut ElevationGrid,
    extent: &GeoExtent,
    invalid_value: f32,
    datum: Option<&dyn VerticalDatum>,
) -> usize {
    let columns = grid.columns();
    let rows = grid.rows();
    let mut resolved = 0;

    match datum {
        Some(datum) => {
            let geodetic = extent.to_geographic();
            let lon_interval = geodetic.width() / columns.saturating_sub(1).max(1) as f64;
            let lat_interval = geodetic.height() / rows.saturating_sub(1).max(1) as f64;

            for r in 0..rows {
                let lat = geodetic.y_min() + lat_interval * r as f64;
                for c in 0..columns {
                    if grid.height(c, r) == invalid_value {
                        let lon = geodetic.x_min() + lon_interval * c as f64;
                        grid.set_height(c, r, datum.geoid_height(lat, lon) as f32);
                        resolved += 1;
                    }
                }
            }
        }
        None => {
            for h in grid.heights_mut() {
                if *h == invalid_value {
                    *h = 0.0;
                    resolved += 1;
                }
            }
        }
    }

    debug!(resolved, "resolved invalid heights");
    resolved
}
