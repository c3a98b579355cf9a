//! Grid-to-grid transforms: sub-region extraction, resampling, and reference
//! grid construction.

use std::borrow::Cow;

use glam::DVec3;
use relief_geo::GeoExtent;
use tracing::debug;

use crate::{
    ElevationGrid, InterpolationMode, METERS_PER_DEGREE_EQUATORIAL, sample_at_normalized_location,
    sample_at_world_location,
};

/// Spacing between `count` samples spread over `span`. A single sample takes
/// the whole span.
fn step(span: f64, count: usize) -> f64 {
    if count > 1 {
        span / (count - 1) as f64
    } else {
        span
    }
}

/// Normalized position of sample `i` of `count`.
fn normalized(i: usize, count: usize) -> f64 {
    if count > 1 {
        i as f64 / (count - 1) as f64
    } else {
        0.0
    }
}

/// Sub-sample `input` (covering `input_extent`) into the strictly narrower
/// `output_extent`.
///
/// The output keeps the input's dimensions and border width; its spacing and
/// skirt height shrink by `output_extent.width() / input_extent.width()`.
/// Returns `None` unless the output extent is narrower than the input extent,
/// or if the input has fewer than two samples along an axis.
pub fn extract_sub_region(
    input: &ElevationGrid,
    input_extent: &GeoExtent,
    output_extent: &GeoExtent,
    mode: InterpolationMode,
) -> Option<ElevationGrid> {
    let div = output_extent.width() / input_extent.width();
    if div.is_nan() || div >= 1.0 {
        debug!(
            div,
            "sub-region is not narrower than its source, skipping extraction"
        );
        return None;
    }

    let columns = input.columns();
    let rows = input.rows();
    if columns < 2 || rows < 2 {
        debug!(columns, rows, "grid too small to sub-sample");
        return None;
    }

    let x_interval = input_extent.width() / (columns - 1) as f64;
    let y_interval = input_extent.height() / (rows - 1) as f64;
    let dx = div * x_interval;
    let dy = div * y_interval;

    let mut dest = ElevationGrid::new(columns, rows)
        .with_intervals(dx, dy)
        .with_no_data_value(input.no_data_value())
        .with_origin(DVec3::new(
            output_extent.x_min(),
            output_extent.y_min(),
            input.origin().z,
        ));
    dest.set_border_width(input.border_width());
    dest.set_skirt_height((input.skirt_height() as f64 * div) as f32);

    for row in 0..rows {
        let y = output_extent.y_min() + row as f64 * dy;
        for col in 0..columns {
            let x = output_extent.x_min() + col as f64 * dx;
            let h = sample_at_world_location(
                input,
                x,
                y,
                input_extent.x_min(),
                input_extent.y_min(),
                x_interval,
                y_interval,
                mode,
            )
            .unwrap_or(input.no_data_value());
            dest.set_height(col, row, h);
        }
    }

    Some(dest)
}

/// Resample `input` to `new_columns × new_rows` samples spread over `extent`.
///
/// Returns `None` for a degenerate request (both dimensions at most one, or
/// either zero) and the input itself, borrowed, when the dimensions already
/// match.
pub fn resample_to_dimensions<'a>(
    input: &'a ElevationGrid,
    extent: &GeoExtent,
    new_columns: usize,
    new_rows: usize,
    mode: InterpolationMode,
) -> Option<Cow<'a, ElevationGrid>> {
    if (new_columns <= 1 && new_rows <= 1) || new_columns == 0 || new_rows == 0 {
        debug!(new_columns, new_rows, "degenerate resample request");
        return None;
    }

    if new_columns == input.columns() && new_rows == input.rows() {
        return Some(Cow::Borrowed(input));
    }

    let mut output = ElevationGrid::new(new_columns, new_rows)
        .with_intervals(step(extent.width(), new_columns), step(extent.height(), new_rows))
        .with_origin(input.origin())
        .with_no_data_value(input.no_data_value());

    for y in 0..new_rows {
        let ny = normalized(y, new_rows);
        for x in 0..new_columns {
            let nx = normalized(x, new_columns);
            let h = sample_at_normalized_location(input, nx, ny, mode)
                .unwrap_or(input.no_data_value());
            output.set_height(x, y, h);
        }
    }

    Some(Cow::Owned(output))
}

/// A flat reference grid over `extent`.
///
/// With `express_as_hae` set and a vertical datum on the extent's spatial
/// reference, each sample holds the datum's sea-level-to-ellipsoid offset at
/// its latitude/longitude; otherwise every sample is zero.
///
/// # Panics
///
/// Panics if either dimension is zero.
pub fn build_reference_grid(
    extent: &GeoExtent,
    num_columns: usize,
    num_rows: usize,
    express_as_hae: bool,
) -> ElevationGrid {
    let mut grid = ElevationGrid::new(num_columns, num_rows)
        .with_origin(DVec3::new(extent.x_min(), extent.y_min(), 0.0))
        .with_intervals(
            step(extent.x_max() - extent.x_min(), num_columns),
            step(extent.y_max() - extent.y_min(), num_rows),
        );
    grid.set_border_width(0);

    let datum = if extent.is_valid() {
        extent.srs().vertical_datum()
    } else {
        None
    };

    match datum {
        Some(datum) if express_as_hae => {
            // Geoid queries need latitude/longitude.
            let geodetic = extent.to_geographic();
            let lon_interval = step(geodetic.width(), num_columns);
            let lat_interval = step(geodetic.height(), num_rows);

            for r in 0..num_rows {
                let lat = geodetic.y_min() + lat_interval * r as f64;
                for c in 0..num_columns {
                    let lon = geodetic.x_min() + lon_interval * c as f64;
                    grid.set_height(c, r, datum.msl_to_hae(lat, lon, 0.0) as f32);
                }
            }
        }
        _ => grid.fill(0.0),
    }

    grid
}

/// Convert heights from meters to degrees of arc at the equator, leaving
/// no-data samples untouched.
pub fn scale_heights_to_degrees(grid: &mut ElevationGrid) {
    let scale = (1.0 / METERS_PER_DEGREE_EQUATORIAL) as f32;
    let no_data = grid.no_data_value();
    for h in grid.heights_mut() {
        if *h != no_data {
            *h *= scale;
        }
    }
}
