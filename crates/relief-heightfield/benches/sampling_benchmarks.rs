use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use relief_geo::{Ellipsoid, GeoExtent, SpatialReference};
use relief_heightfield::*;

fn noisy_grid(columns: usize, rows: usize) -> ElevationGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let heights = (0..columns * rows)
        .map(|_| rng.random_range(-50.0..3000.0))
        .collect();
    ElevationGrid::from_heights(columns, rows, heights)
        .expect("dimensions match")
        .with_intervals(0.01, 0.01)
        .with_origin(DVec3::new(10.0, 45.0, 0.0))
}

fn bench_point_sampling(c: &mut Criterion) {
    let grid = noisy_grid(257, 257);
    let modes = [
        ("nearest", InterpolationMode::Nearest),
        ("triangulated", InterpolationMode::Triangulated),
        ("bilinear", InterpolationMode::Bilinear),
        ("average", InterpolationMode::Average),
    ];
    for (name, mode) in modes {
        c.bench_function(&format!("sample_{name}"), |bencher| {
            bencher.iter(|| {
                black_box(sample_at_normalized_location(
                    &grid,
                    black_box(0.4321),
                    black_box(0.6789),
                    mode,
                ))
            })
        });
    }
}

fn bench_resample(c: &mut Criterion) {
    let grid = noisy_grid(257, 257);
    let extent = GeoExtent::new(SpatialReference::wgs84(), 10.0, 45.0, 12.56, 47.56)
        .expect("valid extent");
    c.bench_function("resample_257_to_65", |bencher| {
        bencher.iter(|| {
            black_box(resample_to_dimensions(
                &grid,
                &extent,
                65,
                65,
                InterpolationMode::Bilinear,
            ))
        })
    });
}

fn bench_normal_map(c: &mut Criterion) {
    let grid = noisy_grid(65, 65);
    let srs = SpatialReference::wgs84();
    c.bench_function("normal_map_65", |bencher| {
        bencher.iter(|| black_box(build_normal_map(&HeightFieldNeighborhood::new(&grid), &srs)))
    });
}

fn bench_culling_cone(c: &mut Criterion) {
    let grid = noisy_grid(65, 65);
    c.bench_function("culling_cone_65", |bencher| {
        bencher.iter(|| black_box(compute_culling_cone(&grid, &Ellipsoid::WGS84, 1.0)))
    });
}

fn bench_fill_no_data(c: &mut Criterion) {
    let mut template = noisy_grid(129, 129);
    for i in (0..template.heights().len()).step_by(5) {
        template.heights_mut()[i] = NO_DATA_VALUE;
    }
    let op = FillNoData::new(RejectValue(NO_DATA_VALUE));
    c.bench_function("fill_no_data_129", |bencher| {
        bencher.iter(|| {
            let mut grid = template.clone();
            black_box(op.apply(&mut grid))
        })
    });
}

criterion_group!(
    benches,
    bench_point_sampling,
    bench_resample,
    bench_normal_map,
    bench_culling_cone,
    bench_fill_no_data,
);
criterion_main!(benches);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_fixtures_are_valid() {
        let grid = noisy_grid(257, 257);
        assert_eq!(grid.heights().len(), 257 * 257);
        assert!(compute_culling_cone(&noisy_grid(65, 65), &Ellipsoid::WGS84, 1.0).is_some());
    }
}
