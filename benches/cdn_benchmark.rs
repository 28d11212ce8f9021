//! CDN fit and prediction benchmarks on random sparse problems.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cycdn::{CscMatrix, FitOptions, SparseVector, CDN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random ±1 problem with a sparse ground-truth weight vector
fn random_problem(n: usize, p: usize, density: f64, seed: u64) -> (CscMatrix, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let truth: Vec<f64> = (0..p)
        .map(|j| if j % 10 == 0 { rng.gen_range(-2.0..2.0) } else { 0.0 })
        .collect();

    let mut rows = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for _ in 0..n {
        let (indices, values): (Vec<usize>, Vec<f64>) = (0..p)
            .filter_map(|j| {
                if rng.gen_bool(density) {
                    Some((j, rng.gen_range(-1.0..1.0)))
                } else {
                    None
                }
            })
            .unzip();
        let row = SparseVector::new(indices, values).expect("valid row");
        let margin = row.dot(&truth) + rng.gen_range(-0.1..0.1);
        y.push(if margin > 0.0 { 1.0 } else { -1.0 });
        rows.push(row);
    }

    (CscMatrix::from_rows(&rows, p).expect("valid matrix"), y)
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cdn/fit");
    group.sample_size(10);

    for &(n, p) in &[(500, 100), (2_000, 500)] {
        let (x, y) = random_problem(n, p, 0.05, 42);
        group.throughput(Throughput::Elements((n * p) as u64));

        for elimination in [false, true] {
            let label = if elimination { "elimination" } else { "full" };
            group.bench_with_input(
                BenchmarkId::new(label, format!("{n}x{p}")),
                &(&x, &y),
                |b, (x, y)| {
                    let options = FitOptions::new(1e-4, 100, true).with_seed(7);
                    b.iter(|| {
                        let mut model = CDN::new(1.0, -1e6, 1e6, elimination).unwrap();
                        model.fit(*x, y, &options).unwrap();
                        black_box(model.get_weights().unwrap())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let (x, y) = random_problem(5_000, 200, 0.05, 11);
    let mut model = CDN::new(1.0, -1e6, 1e6, true).unwrap();
    model
        .fit(&x, &y, &FitOptions::new(1e-4, 100, false))
        .unwrap();

    let mut group = c.benchmark_group("cdn/predict");
    group.throughput(Throughput::Elements(5_000));
    group.bench_function("probabilities", |b| {
        b.iter(|| black_box(model.predict_probabilities(black_box(&x)).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
