//! Criterion benchmarks for the 2D overapproximation driver.
//! Focus tolerances: eps in {1e-1, 1e-2, 1e-3, 1e-4}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p lazysets

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lazysets::api::{overapproximate, Ball2, IntoShared, LinearMap, MinkowskiSum, SetRef, Zonotope};
use nalgebra::{dmatrix, dvector};

fn disk() -> SetRef<f64> {
    Ball2::new(dvector![0.0, 0.0], 1.0).unwrap().shared()
}

fn composite() -> SetRef<f64> {
    let z = Zonotope::new(dvector![0.5, -0.5], dmatrix![1.0, 0.3, -0.2; 0.0, 0.4, 0.8])
        .unwrap()
        .shared();
    let ellipse = LinearMap::new(dmatrix![2.0, 0.5; 0.0, 0.5], disk()).unwrap().shared();
    MinkowskiSum::new(z, ellipse).unwrap().shared()
}

fn bench_approx(c: &mut Criterion) {
    let mut group = c.benchmark_group("overapproximate");
    for &eps in &[1e-1f64, 1e-2, 1e-3, 1e-4] {
        group.bench_with_input(BenchmarkId::new("disk", eps), &eps, |b, &eps| {
            let s = disk();
            b.iter(|| {
                let _p = overapproximate(s.clone(), &eps).unwrap();
            })
        });
        group.bench_with_input(BenchmarkId::new("zonotope_plus_ellipse", eps), &eps, |b, &eps| {
            let s = composite();
            b.iter(|| {
                let _p = overapproximate(s.clone(), &eps).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_approx);
criterion_main!(benches);
