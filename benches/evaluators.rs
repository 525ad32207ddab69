//! Evaluator Benchmarks
//!
//! This benchmark suite measures the cost of the numerical evaluators on closures and on parsed
//! expressions. Every evaluator probes its function many times per query, so the cost of a single
//! function evaluation dominates almost everything measured here.
//!
//! ## Benchmark Structure
//!
//! ### 1. Derivatives (`benchmark_derivatives`)
//! Compares a central-difference derivative of a closure against the same function given as an
//! [`Expression`], and measures higher-order derivatives built by repeated differencing.
//!
//! ### 2. Quadrature (`benchmark_quadrature`)
//! Integrates the same function with each composite rule at a fixed subdivision count, plus an
//! iterated double integral.
//!
//! ### 3. Series (`benchmark_series`)
//! Measures Taylor coefficient extraction and Fourier coefficient computation. Fourier series are
//! rebuilt on every iteration so the cached coefficient table does not hide the integration cost.
//!
//! ## Usage
//!
//! Run with: `cargo bench --bench evaluators`

use std::{f64::consts::PI, hint::black_box};

use calculus_kit::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use strum::IntoEnumIterator;

fn benchmark_derivatives(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivatives");

    let closure = Derivative::new(|x: f64| x.sin() * x.exp());
    group.bench_function("closure", |b| b.iter(|| closure.at(black_box(1.3))));

    if let Ok(expression) = Expression::new("math::sin(x) * math::exp(x)") {
        let parsed = Derivative::new(expression);
        group.bench_function("expression", |b| b.iter(|| parsed.at(black_box(1.3))));
    }

    for order in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::new("nth_at", order), &order, |b, &order| {
            b.iter(|| closure.nth_at(black_box(0.7), order))
        });
    }

    let field = PartialDerivative::new(Trivariate(|x: f64, y: f64, z: f64| x * y.sin() + z * z));
    group.bench_function("hessian_3d", |b| {
        b.iter(|| field.hessian(black_box(&[1.0, 0.5, -2.0])))
    });

    group.finish();
}

fn benchmark_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadrature");

    for method in IntegrationMethod::iter() {
        let integral = Integral::with_method(|x: f64| (x * x).cos(), method);
        group.bench_with_input(
            BenchmarkId::new("integral", method),
            &integral,
            |b, integral| b.iter(|| integral.between(black_box(0.0), black_box(PI))),
        );
    }

    let volume = DoubleIntegral::new(Bivariate(|x: f64, y: f64| (x * y).exp()));
    group.bench_function("double_integral", |b| {
        b.iter(|| volume.over(black_box(0.0), 1.0, 0.0, 1.0))
    });

    group.finish();
}

fn benchmark_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("series");

    for terms in [4usize, 8] {
        if let Ok(series) = TaylorSeries::new(|x: f64| x.exp(), terms) {
            group.bench_with_input(BenchmarkId::new("taylor", terms), &series, |b, series| {
                b.iter(|| series.coefficients(black_box(0.5)))
            });
        }
    }

    for harmonics in [5usize, 20] {
        group.bench_with_input(
            BenchmarkId::new("fourier", harmonics),
            &harmonics,
            |b, &harmonics| {
                b.iter(|| {
                    FourierSeries::new(|x: f64| x.signum(), 2.0 * PI, harmonics)
                        .map(|series| series.at(black_box(1.0)))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_derivatives,
    benchmark_quadrature,
    benchmark_series
);
criterion_main!(benches);
