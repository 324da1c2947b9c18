use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::prelude::*;
use std::time::Duration;

use gradkit::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Method {
    Newton,
    Bfgs,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Newton => "Newton",
            Method::Bfgs => "BFGS",
        }
    }

    pub fn all() -> Vec<Method> {
        vec![Method::Newton, Method::Bfgs]
    }
}

struct StartPoint {
    name: &'static str,
    x0: Array1<f64>,
}

fn rosenbrock_starts() -> Vec<StartPoint> {
    vec![
        StartPoint {
            name: "near_origin",
            x0: array![0.1, 0.1],
        },
        StartPoint {
            name: "left_arm",
            x0: array![-0.5, 0.7],
        },
        StartPoint {
            name: "classic",
            x0: array![-1.2, 1.0],
        },
    ]
}

fn run(method: Method, x0: &Array1<f64>, options: &Options) -> Option<(f64, usize)> {
    let result = match method {
        Method::Newton => Newton::new(Rosenbrock::default()).minimize(x0, options),
        Method::Bfgs => Bfgs::new(Rosenbrock::default()).minimize(x0, options),
    };
    result.ok().map(|r| (r.f_min, r.iterations))
}

fn bench_rosenbrock(c: &mut Criterion) {
    let options = Options::default().with_max_iter(1000);

    let mut group = c.benchmark_group("rosenbrock");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for start in rosenbrock_starts() {
        for method in Method::all() {
            group.bench_with_input(
                BenchmarkId::new(method.name(), start.name),
                &(method, &start.x0),
                |b, (m, x0)| {
                    b.iter(|| black_box(run(black_box(*m), black_box(x0), &options)));
                },
            );
        }
    }
    group.finish();
}

fn bench_quadratic_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadratic_scaling");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for n in [2, 5, 10, 20] {
        // Diagonally dominant, so positive definite
        let a = Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                n as f64 + i as f64
            } else {
                1.0 / (1.0 + (i as f64 - j as f64).abs())
            }
        });
        let Ok(objective) = QuadraticForm::new(a) else {
            continue;
        };
        let x0 = Array1::from_shape_fn(n, |i| 1.0 + i as f64);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("Newton", n), &x0, |b, x0| {
            let newton = Newton::new(objective.clone());
            b.iter(|| black_box(newton.minimize(black_box(x0), &Options::default()).ok()));
        });
        group.bench_with_input(BenchmarkId::new("BFGS", n), &x0, |b, x0| {
            let bfgs = Bfgs::new(objective.clone());
            b.iter(|| black_box(bfgs.minimize(black_box(x0), &Options::default()).ok()));
        });
    }
    group.finish();
}

criterion_group!(optimizer_benches, bench_rosenbrock, bench_quadratic_scaling);
criterion_main!(optimizer_benches);
