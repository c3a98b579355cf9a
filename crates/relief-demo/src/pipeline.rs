//! End-to-end run over a synthetic tile: repair, sample, transform, and
//! derive the culling cone and normal map.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use relief_config::{Config, ConfigError};
use relief_geo::{GeoError, GeoExtent, SpatialReference, UniformGeoid};
use relief_heightfield::{
    CullingCone, ElevationGrid, FillNoData, HeightFieldNeighborhood, HeightFieldOperator,
    NeighborhoodSample, RejectValue, ReplaceInvalid, ValidityPredicate, build_normal_map,
    build_reference_grid, compute_culling_cone, extract_sub_region, fill_single_gap,
    normal_at_normalized_location, resample_to_dimensions, resolve_invalid_heights,
    sample_at_normalized_location, sample_at_world_location, sample_neighborhood_normalized,
    scale_heights_to_degrees,
};
use tracing::{debug, info, warn};

use crate::synthetic::{Peak, punch_holes, synthetic_tile};

/// Geoid offset used for the datum-aware steps.
const DEMO_GEOID_OFFSET: f64 = 47.0;

const HOLE_SEED: u64 = 0x5EED;

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("tile must be at least 2x2 samples, got {columns}x{rows}")]
    TileTooSmall { columns: usize, rows: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("failed to create output directory: {0}")]
    Io(#[source] std::io::Error),

    #[error("failed to write normal map: {0}")]
    Image(#[from] image::ImageError),
}

/// What a pipeline run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub holes: usize,
    pub filled: usize,
    pub replaced: usize,
    pub resolved: usize,
    pub resampled: Option<(usize, usize)>,
    pub sub_region: Option<(usize, usize)>,
    pub culling_cone: Option<CullingCone>,
    pub normal_map: PathBuf,
}

/// Run the full pipeline described by `config`.
pub fn run(config: &Config) -> Result<PipelineReport, DemoError> {
    let demo = &config.demo;
    if demo.columns < 2 || demo.rows < 2 {
        return Err(DemoError::TileTooSmall {
            columns: demo.columns,
            rows: demo.rows,
        });
    }

    let ellipsoid = config.geometry.ellipsoid.ellipsoid();
    let srs = SpatialReference::geographic_on(ellipsoid);
    let extent = GeoExtent::new(
        srs.clone(),
        demo.lon_min,
        demo.lat_min,
        demo.lon_max,
        demo.lat_max,
    )?;
    let peak = Peak::centered_on(&extent, demo.peak_height);
    let mode = config.sampling.interpolation;

    let mut tile = synthetic_tile(&extent, demo.columns, demo.rows, &peak)
        .with_no_data_value(config.sampling.no_data_value);
    let hole_count = (demo.columns * demo.rows) / 20;
    let mut holes = punch_holes(&mut tile, hole_count, HOLE_SEED);

    // A spike no real terrain reaches.
    let spike = (demo.columns / 3, demo.rows / 3);
    tile.set_height(spike.0, spike.1, config.repair.valid_max * 4.0);
    holes.retain(|&cell| cell != spike);
    info!(
        columns = demo.columns,
        rows = demo.rows,
        holes = holes.len(),
        "generated synthetic tile"
    );

    let valid_range = config.repair.valid_range()?;
    let single_gaps = holes
        .iter()
        .filter_map(|&(c, r)| fill_single_gap(&tile, c, r))
        .filter(|&h| valid_range.is_valid(h))
        .count();
    debug!(single_gaps, "holes fillable from their direct neighbors");

    let geoid = UniformGeoid::new(DEMO_GEOID_OFFSET);
    let mut datum_filled = tile.clone();
    let resolved = resolve_invalid_heights(
        &mut datum_filled,
        &extent,
        tile.no_data_value(),
        Some(&geoid),
    );
    info!(resolved, "resolved holes against the geoid");

    let filled = FillNoData::new(RejectValue(tile.no_data_value()))
        .with_default(config.repair.fill_default)
        .apply(&mut tile);
    let replaced = ReplaceInvalid::new(valid_range)
        .with_replacement(config.repair.replace_with)
        .apply(&mut tile);
    info!(filled, replaced, "repaired tile");

    sample_points(&tile, &extent, &peak, config);
    let resampled = resample(&tile, &extent, config);
    let sub_region = extract_quadrant(&tile, &extent, config)?;
    describe_reference_grids(&tile, &extent)?;

    let culling_cone = compute_culling_cone(&tile, &ellipsoid, config.geometry.vertical_scale);
    match &culling_cone {
        Some(cone) => {
            let above = cone.apex + cone.axis * 1_000_000.0;
            info!(
                min_dot_product = cone.min_dot_product,
                radius = cone.radius,
                culled_from_above = cone.is_culled(above),
                culled_from_antipode = cone.is_culled(-above),
                "derived culling cone"
            );
        }
        None => warn!("tile spans too much of the planet for a culling cone"),
    }

    // East neighbor continuing the same hill, so the east edge normals see
    // real slope instead of a flat substitute.
    let east_extent = GeoExtent::new(
        srs.clone(),
        extent.x_max(),
        extent.y_min(),
        extent.x_max() + extent.width(),
        extent.y_max(),
    )?;
    let east = synthetic_tile(&east_extent, demo.columns, demo.rows, &peak)
        .with_no_data_value(config.sampling.no_data_value);
    let hood = HeightFieldNeighborhood::new(&tile).with_neighbor(1, 0, &east);

    match sample_neighborhood_normalized(&hood, 1.25, 0.5, mode) {
        NeighborhoodSample::Height(h) => debug!(height = h, "sampled across the east edge"),
        other => debug!(?other, "east edge sample unavailable"),
    }

    let center_normal = normal_at_normalized_location(&tile, 0.5, 0.5, mode, &srs);
    info!(normal = ?center_normal, "normal at tile center");

    let normal_map = build_normal_map(&hood, &srs);
    std::fs::create_dir_all(&demo.output_dir).map_err(DemoError::Io)?;
    let path = demo.output_dir.join("normal_map.png");
    normal_map.to_rgb_image().save(&path)?;
    info!(path = %path.display(), "wrote normal map");

    Ok(PipelineReport {
        holes: holes.len(),
        filled,
        replaced,
        resolved,
        resampled,
        sub_region,
        culling_cone,
        normal_map: path,
    })
}

fn sample_points(tile: &ElevationGrid, extent: &GeoExtent, peak: &Peak, config: &Config) {
    let mode = config.sampling.interpolation;
    let center = sample_at_normalized_location(tile, 0.5, 0.5, mode);
    let summit = sample_at_world_location(
        tile,
        peak.lon,
        peak.lat,
        extent.x_min(),
        extent.y_min(),
        tile.x_interval(),
        tile.y_interval(),
        mode,
    );
    info!(?mode, ?center, ?summit, "sampled tile");
}

fn resample(tile: &ElevationGrid, extent: &GeoExtent, config: &Config) -> Option<(usize, usize)> {
    let demo = &config.demo;
    match resample_to_dimensions(
        tile,
        extent,
        demo.resample_columns,
        demo.resample_rows,
        config.sampling.interpolation,
    ) {
        Some(Cow::Borrowed(_)) => {
            info!("tile already at the requested resolution");
            Some((tile.columns(), tile.rows()))
        }
        Some(Cow::Owned(grid)) => {
            info!(
                columns = grid.columns(),
                rows = grid.rows(),
                x_interval = grid.x_interval(),
                "resampled tile"
            );
            Some((grid.columns(), grid.rows()))
        }
        None => {
            warn!(
                columns = demo.resample_columns,
                rows = demo.resample_rows,
                "resample request is degenerate"
            );
            None
        }
    }
}

/// Sub-sample the north-east quadrant at the tile's own resolution.
fn extract_quadrant(
    tile: &ElevationGrid,
    extent: &GeoExtent,
    config: &Config,
) -> Result<Option<(usize, usize)>, DemoError> {
    let (mid_x, mid_y) = extent.center();
    let quadrant = GeoExtent::new(
        extent.srs().clone(),
        mid_x,
        mid_y,
        extent.x_max(),
        extent.y_max(),
    )?;

    let sub = extract_sub_region(tile, extent, &quadrant, config.sampling.interpolation);
    match &sub {
        Some(grid) => info!(
            x_interval = grid.x_interval(),
            skirt_height = grid.skirt_height(),
            "extracted north-east quadrant"
        ),
        None => warn!("quadrant extraction not applicable"),
    }
    Ok(sub.map(|g| (g.columns(), g.rows())))
}

fn describe_reference_grids(tile: &ElevationGrid, extent: &GeoExtent) -> Result<(), DemoError> {
    let datum_srs = extent
        .srs()
        .clone()
        .with_vertical_datum(Arc::new(UniformGeoid::new(DEMO_GEOID_OFFSET)));
    let datum_extent = GeoExtent::new(
        datum_srs,
        extent.x_min(),
        extent.y_min(),
        extent.x_max(),
        extent.y_max(),
    )?;
    let reference = build_reference_grid(&datum_extent, 5, 5, true);
    info!(
        origin = ?reference.origin(),
        hae_offset = reference.height(0, 0),
        "built reference grid"
    );

    let mut degrees = tile.clone();
    scale_heights_to_degrees(&mut degrees);
    let max_degrees = degrees
        .heights()
        .iter()
        .copied()
        .filter(|&h| !degrees.is_no_data(h))
        .fold(f32::NEG_INFINITY, f32::max);
    debug!(max_degrees, "heights expressed in degrees");
    Ok(())
}

#[cfg(test)]
mod tests {
    use relief_geo::Ellipsoid;

    use super::*;

    fn small_config(output: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.demo.columns = 17;
        config.demo.rows = 17;
        config.demo.resample_columns = 9;
        config.demo.resample_rows = 9;
        config.demo.output_dir = output.to_path_buf();
        config
    }

    #[test]
    fn test_pipeline_writes_normal_map() {
        let dir = tempfile::tempdir().unwrap();
        let report = run(&small_config(dir.path())).unwrap();

        assert!(report.normal_map.exists());
        let image = image::open(&report.normal_map).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (17, 17));

        assert!(report.holes > 0);
        assert_eq!(report.filled, report.holes);
        assert_eq!(report.resolved, report.holes);
        assert!(report.replaced >= 1, "the spike must be replaced");
        assert_eq!(report.resampled, Some((9, 9)));
        assert_eq!(report.sub_region, Some((17, 17)));
        assert!(report.culling_cone.is_some());
    }

    #[test]
    fn test_pipeline_without_cone_on_huge_tile() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.demo.lon_min = -170.0;
        config.demo.lon_max = 170.0;
        config.demo.lat_min = -80.0;
        config.demo.lat_max = 80.0;
        let report = run(&config).unwrap();
        assert!(report.culling_cone.is_none());
    }

    #[test]
    fn test_pipeline_on_sphere() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.geometry.ellipsoid = relief_config::EllipsoidPreset::Sphere(6_371_000.0);
        let report = run(&config).unwrap();
        let cone = report.culling_cone.unwrap();
        let expected = Ellipsoid::sphere(6_371_000.0).polar_radius;
        assert!(cone.apex.length() > expected);
    }

    #[test]
    fn test_pipeline_rejects_tiny_tile() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.demo.columns = 1;
        assert!(matches!(
            run(&config),
            Err(DemoError::TileTooSmall { columns: 1, .. })
        ));
    }

    #[test]
    fn test_pipeline_rejects_inverted_repair_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.repair.valid_min = 100.0;
        config.repair.valid_max = 0.0;
        assert!(matches!(run(&config), Err(DemoError::Config(_))));
    }
}
