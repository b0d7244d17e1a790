//! Benchmarks for point batch construction.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glam::DVec3;

use point_cloud_player::{
    render::{BuildParams, CameraPose, PointBatchBuilder},
    schema::{Color, PointRecord, PointSet},
};

/// Points on a jittered lattice inside the unit cube.
fn lattice(count: usize, colored: bool) -> PointSet {
    let side = (count as f64).cbrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let (x, y, z) = (i % side, (i / side) % side, i / (side * side));
            let position = DVec3::new(x as f64, y as f64, z as f64) / side as f64;
            if colored {
                PointRecord::with_color(position, Color::new(position.x, position.y, position.z))
            } else {
                PointRecord::new(position)
            }
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_batches");
    let builder = PointBatchBuilder::default();
    let camera = CameraPose::look_at(DVec3::new(0.5, 0.5, 3.0), DVec3::splat(0.5));

    for count in [1_000, 16_383, 100_000, 500_000] {
        let points = lattice(count, false);

        for billboard in [false, true] {
            let params = BuildParams {
                billboard,
                ..Default::default()
            };
            let label = if billboard { "billboard" } else { "fixed" };

            group.bench_with_input(
                BenchmarkId::new(label, count),
                &count,
                |b, _| {
                    b.iter(|| builder.build(black_box(&points), Some(&camera), &params, None));
                },
            );
        }
    }

    group.finish();
}

fn bench_colored(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_colored");
    let builder = PointBatchBuilder::default();
    let camera = CameraPose::default();
    let params = BuildParams::default();

    for count in [16_383, 100_000] {
        let points = lattice(count, true);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let colors = points.colors();
                builder.build(black_box(&points), Some(&camera), &params, colors.as_deref())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_colored);
criterion_main!(benches);
