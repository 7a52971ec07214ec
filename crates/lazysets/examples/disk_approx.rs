//! Overapproximation size probe for the unit disk.
//!
//! Purpose
//! - Show how the number of constraints and the certified error bound scale
//!   with the tolerance for a smooth set, and time each run.
//!
//! Run: cargo run -p lazysets --example disk_approx

use std::time::Instant;

use lazysets::api::{approximate, Ball2, ConvexSet, IntoShared};
use nalgebra::dvector;

fn main() {
    let disk = Ball2::<f64>::new(dvector![0.0, 0.0], 1.0)
        .expect("radius is nonnegative")
        .shared();
    for eps in [1e-1, 1e-2, 1e-3, 1e-4, 1e-5] {
        let start = Instant::now();
        let p = approximate(disk.clone(), &eps).expect("disk is bounded");
        let elapsed = start.elapsed().as_secs_f64() * 1e3;
        let poly = p.to_hpolygon();
        // worst gap over 3600 directions
        let gap = (0..3600)
            .map(|k| {
                let t = std::f64::consts::TAU * k as f64 / 3600.0;
                let d = dvector![t.cos(), t.sin()];
                poly.rho(&d).expect("bounded") - 1.0
            })
            .fold(0.0f64, f64::max);
        println!(
            "eps={eps:e} constraints={} refinements={} bound={:.3e} sampled_gap={gap:.3e} time_ms={elapsed:.3}",
            poly.len(),
            p.iterations(),
            p.max_error(),
        );
    }
}
