use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gnomonic::{CartesianPointSources, Center, GnomonicPointSources, GnomonicProjector};
use nalgebra::{vector, Vector3};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use simplelog::{Config, LevelFilter, SimpleLogger};

const N_POINTS: usize = 100_000;

/// Random point sources within 0.1 of `center` along each axis, all observed at `t = 1`.
fn point_sources(center: &Vector3<f64>) -> CartesianPointSources<f64> {
    let mut points = Array2::random((N_POINTS, 4), Uniform::new(-0.1, 0.1));
    for c in 0..3 {
        let mut column = points.column_mut(c);
        column += center[c];
    }
    points.column_mut(3).fill(1.);

    CartesianPointSources::try_from(points.view()).unwrap()
}

fn projection_benchmark(c: &mut Criterion) {
    let _ = SimpleLogger::init(LevelFilter::Warn, Config::default());

    let mut projection = c.benchmark_group("projection");
    projection.sample_size(20);

    let center_position = vector![0.9, 0.8, 0.01];
    let center_velocity = vector![-0.05, 0.05, 0.00001];
    let cartesian = point_sources(&center_position);

    let position_only = GnomonicProjector::new(Center::new(center_position));
    projection.bench_function("position only", |b| {
        b.iter_batched(
            || GnomonicPointSources::new(N_POINTS).unwrap(),
            |mut gnomonic| {
                position_only.project(&cartesian, &mut gnomonic).unwrap();
                gnomonic
            },
            BatchSize::LargeInput,
        )
    });

    let with_velocity =
        GnomonicProjector::new(Center::new(center_position).with_velocity(center_velocity));
    projection.bench_function("with velocity", |b| {
        b.iter_batched(
            || GnomonicPointSources::new(N_POINTS).unwrap(),
            |mut gnomonic| {
                with_velocity.project(&cartesian, &mut gnomonic).unwrap();
                gnomonic
            },
            BatchSize::LargeInput,
        )
    });

    #[cfg(feature = "parallel")]
    projection.bench_function("with velocity parallel", |b| {
        b.iter_batched(
            || GnomonicPointSources::new(N_POINTS).unwrap(),
            |mut gnomonic| {
                with_velocity.project_par(&cartesian, &mut gnomonic).unwrap();
                gnomonic
            },
            BatchSize::LargeInput,
        )
    });

    projection.finish();
}

criterion_group!(benches, projection_benchmark);
criterion_main!(benches);
