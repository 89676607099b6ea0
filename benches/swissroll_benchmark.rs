use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use swissroll_kit::distance::distance_differences;
use swissroll_kit::swissroll::make_2d_holes;
use swissroll_kit::{make_swissroll, HoleBoundary, Layout, SwissRollConfig};

#[derive(Clone)]
pub struct SwissRollBenchConfig {
    seed: u64,
    sample_sizes: Vec<usize>,
    hole_counts: Vec<usize>,
    measurement_time: u64,
    sample_size: usize,
}

impl Default for SwissRollBenchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            sample_sizes: vec![500, 1000, 2000],
            hole_counts: vec![1, 3],
            measurement_time: 10,
            sample_size: 10,
        }
    }
}

fn configure_group<'a, M: Measurement>(
    c: &'a mut Criterion<M>,
    name: &str,
    config: &SwissRollBenchConfig,
) -> BenchmarkGroup<'a, M> {
    let mut group = c.benchmark_group(name);
    group.measurement_time(Duration::from_secs(config.measurement_time));
    group.sample_size(config.sample_size);
    group
}

pub fn bench_generation(c: &mut Criterion) {
    let config = SwissRollBenchConfig::default();
    let mut group = configure_group(c, "SwissRoll_Generation", &config);

    for &n in config.sample_sizes.iter() {
        let roll_config = SwissRollConfig::new()
            .n_samples(n)
            .noise(0.5)
            .random_state(config.seed);
        group.bench_with_input(BenchmarkId::new("plain", n), &n, |b, _| {
            b.iter(|| make_swissroll(&roll_config).unwrap());
        });
    }
    group.finish();
}

pub fn bench_holes(c: &mut Criterion) {
    let config = SwissRollBenchConfig::default();
    let mut group = configure_group(c, "SwissRoll_Holes", &config);

    for &n in config.sample_sizes.iter() {
        let roll = make_swissroll(
            &SwissRollConfig::new()
                .n_samples(n)
                .noise(0.0)
                .random_state(config.seed),
        )
        .unwrap();
        let points = roll.points_2d().to_owned();

        for &holes in config.hole_counts.iter() {
            group.bench_with_input(
                BenchmarkId::new("stochastic", format!("n{}_h{}", n, holes)),
                &(n, holes),
                |b, _| {
                    let mut rng = StdRng::seed_from_u64(config.seed);
                    b.iter(|| {
                        make_2d_holes(points.view(), holes, 2.0, HoleBoundary::Stochastic, &mut rng)
                            .unwrap()
                    });
                },
            );
        }
    }
    group.finish();
}

pub fn bench_distance_differences(c: &mut Criterion) {
    let config = SwissRollBenchConfig::default();
    let mut group = configure_group(c, "Distance_Differences", &config);

    for &n in config.sample_sizes.iter() {
        let roll = make_swissroll(
            &SwissRollConfig::new()
                .n_samples(n)
                .noise(0.0)
                .random_state(config.seed),
        )
        .unwrap();
        let embeddings: Vec<Array2<f64>> = (1..=3)
            .map(|k| roll.points_2d().mapv(|v| v * k as f64))
            .collect();

        group.bench_with_input(BenchmarkId::new("three_embeddings", n), &n, |b, _| {
            b.iter(|| {
                distance_differences(roll.data_2d.view(), Layout::Columns, &embeddings).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(
    swissroll_benches,
    bench_generation,
    bench_holes,
    bench_distance_differences
);
criterion_main!(swissroll_benches);
