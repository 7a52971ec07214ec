use super::*;
use crate::direction::lt;
use crate::error::SetError;
use crate::geom2::{ApproxCfg, HPolygon, HalfSpace2};
use crate::lazy_set::{ConvexSet, IntoShared, SetRef};
use crate::ops::{CachedMinkowskiSumArray, LinearMap, MinkowskiSum};
use crate::sets::{Ball2, BallInf, HalfSpace, Hyperrectangle, Singleton, VPolytope, Zonotope};
use nalgebra::{dmatrix, dvector, vector, DVector};
use num_rational::BigRational;
use proptest::prelude::*;

fn disk() -> SetRef<f64> {
    Ball2::<f64>::new(dvector![0.0, 0.0], 1.0).unwrap().shared()
}

fn dir(theta: f64) -> DVector<f64> {
    dvector![theta.cos(), theta.sin()]
}

/// `(min, max)` of `ρ(d, P) - ρ(d, S)` over 360 unit directions.
fn support_gap(p: &HPolygon<f64>, s: &dyn ConvexSet<f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for k in 0..360 {
        let d = dir((k as f64).to_radians());
        let g = p.rho(&d).unwrap() - s.rho(&d).unwrap();
        lo = lo.min(g);
        hi = hi.max(g);
    }
    (lo, hi)
}

fn assert_strictly_sorted(hs: &[HalfSpace2<f64>]) {
    for w in hs.windows(2) {
        assert!(lt(&w[0].n, &w[1].n), "{:?} !< {:?}", w[0].n, w[1].n);
    }
}

#[test]
fn unit_disk_within_tolerance() {
    let s = disk();
    let p = overapproximate(s.clone(), &0.1).unwrap();
    assert!((8..=40).contains(&p.len()), "{} constraints", p.len());
    let (lo, hi) = support_gap(&p, s.as_ref());
    assert!(lo >= -1e-9, "polygon does not contain the disk: {lo}");
    assert!(hi <= 0.1, "Hausdorff gap {hi}");
    assert_strictly_sorted(&p.constraints);
}

#[test]
fn unit_square_is_exact() {
    let s = BallInf::<f64>::new(dvector![0.0, 0.0], 1.0).unwrap().shared();
    let p = overapproximate(s, &0.01).unwrap();
    assert_eq!(
        p.constraints,
        vec![
            HalfSpace2::<f64>::new(vector![1.0, 0.0], 1.0),
            HalfSpace2::<f64>::new(vector![0.0, 1.0], 1.0),
            HalfSpace2::<f64>::new(vector![-1.0, 0.0], 1.0),
            HalfSpace2::<f64>::new(vector![0.0, -1.0], 1.0),
        ]
    );
}

#[test]
fn driver_vertices_match_constraint_intersections() {
    let a = approximate(disk(), &0.05).unwrap();
    assert!(a.pending().is_empty());
    let from_lines = a.to_hpolygon().vertices_list();
    assert_eq!(from_lines.len(), a.vertices().len());
    for (u, v) in from_lines.iter().zip(a.vertices()) {
        assert!((u - v).norm() < 1e-9);
    }
    assert!(a.max_error() <= 0.05);
}

#[test]
fn sorted_for_assorted_sets() {
    let z = Zonotope::<f64>::new(dvector![0.5, -0.5], dmatrix![1.0, 0.3, -0.2; 0.0, 0.4, 0.8])
        .unwrap()
        .shared();
    let ellipse = LinearMap::new(dmatrix![2.0, 0.5; 0.0, 0.5], disk()).unwrap().shared();
    let sum = MinkowskiSum::new(z.clone(), ellipse.clone()).unwrap().shared();
    let point = Singleton::<f64>::new(dvector![0.5, -2.0]).shared();
    for s in [z, ellipse, sum, point] {
        let p = overapproximate(s.clone(), &0.02).unwrap();
        assert_strictly_sorted(&p.constraints);
        let (lo, hi) = support_gap(&p, s.as_ref());
        assert!(lo >= -1e-9 && hi <= 0.02 + 1e-9, "{s:?}: gap in [{lo}, {hi}]");
    }
}

#[test]
fn singleton_keeps_a_closed_box() {
    let p = overapproximate(Singleton::<f64>::new(dvector![0.5, -2.0]).shared(), &0.1).unwrap();
    assert_eq!(p.len(), 4);
    assert_eq!(p.sigma(&dvector![1.0, 1.0]).unwrap(), dvector![0.5, -2.0]);
}

/// Flat sets still yield a bounded polygon, degenerate along the segment.
fn assert_bounded_within(s: SetRef<f64>, eps: f64) {
    let p = overapproximate(s.clone(), &eps).unwrap();
    assert!(p.is_bounded().unwrap(), "{s:?}: {:?}", p.constraints);
    assert_strictly_sorted(&p.constraints);
    let (lo, hi) = support_gap(&p, s.as_ref());
    assert!(lo >= -1e-9 && hi <= eps + 1e-9, "{s:?}: gap in [{lo}, {hi}]");
}

#[test]
fn segment_from_two_points_is_closed() {
    let seg = VPolytope::<f64>::new(vec![dvector![0.0, 0.0], dvector![2.0, 1.0]])
        .unwrap()
        .shared();
    assert_bounded_within(seg.clone(), 0.01);
    let p = overapproximate(seg, &0.01).unwrap();
    assert_eq!(p.len(), 4);
}

#[test]
fn zero_width_box_is_closed() {
    let flat = Hyperrectangle::<f64>::new(dvector![0.0, 0.0], dvector![1.0, 0.0])
        .unwrap()
        .shared();
    assert_bounded_within(flat, 0.01);
}

#[test]
fn rank_one_images_are_closed() {
    let onto_diagonal = LinearMap::new(dmatrix![1.0, 0.0; 1.0, 0.0], disk()).unwrap().shared();
    assert_bounded_within(onto_diagonal, 0.01);
    let tilted = LinearMap::new(dmatrix![0.3, 0.6; -0.1, -0.2], disk()).unwrap().shared();
    assert_bounded_within(tilted, 0.01);
    let z = Zonotope::<f64>::new(dvector![0.0, 0.0], dmatrix![1.0; 1.0])
        .unwrap()
        .shared();
    assert_bounded_within(z.clone(), 0.01);
    let p = overapproximate(z, &0.01).unwrap();
    assert!((p.rho(&dvector![1.0, 0.0]).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn idempotent() {
    let s = MinkowskiSum::new(disk(), BallInf::<f64>::new(dvector![1.0, 0.0], 0.25).unwrap().shared())
        .unwrap()
        .shared();
    let a = overapproximate(s.clone(), &0.01).unwrap();
    let b = overapproximate(s, &0.01).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cached_sum_agrees_with_uncached() {
    let parts = vec![disk(), BallInf::<f64>::new(dvector![1.0, 0.0], 0.25).unwrap().shared()];
    let cached = CachedMinkowskiSumArray::new(parts.clone()).unwrap().shared();
    let plain = MinkowskiSum::new(parts[0].clone(), parts[1].clone()).unwrap().shared();
    let a = overapproximate(cached.clone(), &0.01).unwrap();
    let b = overapproximate(plain, &0.01).unwrap();
    assert_eq!(a, b);
    // second pass is served from the cache
    assert_eq!(overapproximate(cached, &0.01).unwrap(), a);
}

#[test]
fn tighter_tolerance_refines_more() {
    let coarse = overapproximate(disk(), &0.1).unwrap();
    let fine = overapproximate(disk(), &0.001).unwrap();
    assert!(fine.len() > coarse.len());
    let (_, hi) = support_gap(&fine, disk().as_ref());
    assert!(hi <= 0.001);
}

#[test]
fn unbounded_set_is_rejected() {
    let h = HalfSpace::<f64>::new(dvector![1.0, 0.0], 1.0).unwrap().shared();
    assert!(matches!(
        approximate(h, &0.1),
        Err(SetError::UnboundedDirection { .. })
    ));
}

#[test]
fn nonpositive_tolerance_is_rejected() {
    assert_eq!(overapproximate(disk(), &0.0).unwrap_err(), SetError::InvalidTolerance);
    assert_eq!(overapproximate(disk(), &-1.0).unwrap_err(), SetError::InvalidTolerance);
    let mut p = PolygonalOverapproximation::new(disk(), ApproxCfg::default()).unwrap();
    assert_eq!(p.refine_until(&0.0), Err(SetError::InvalidTolerance));
}

#[test]
fn wrong_dimension_is_rejected() {
    let b = Ball2::<f64>::new(dvector![0.0, 0.0, 0.0], 1.0).unwrap().shared();
    assert_eq!(
        approximate(b, &0.1).unwrap_err(),
        SetError::DimensionMismatch {
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn iteration_guard_reports_and_finalizes() {
    let cfg = ApproxCfg {
        max_iterations: 3,
        ..ApproxCfg::default()
    };
    let mut p = PolygonalOverapproximation::new(disk(), cfg).unwrap();
    match p.refine_until(&1e-3) {
        Err(SetError::PrecisionNotAchieved {
            achieved,
            iterations,
        }) => {
            assert_eq!(iterations, 3);
            assert!(achieved > 1e-3);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!p.pending().is_empty());
    p.finalize();
    assert!(p.pending().is_empty());
    let poly = p.to_hpolygon();
    assert_strictly_sorted(&poly.constraints);
    let (lo, _) = support_gap(&poly, disk().as_ref());
    assert!(lo >= -1e-9);
}

#[test]
fn depth_guard_reports() {
    let cfg = ApproxCfg {
        max_depth: 1,
        ..ApproxCfg::default()
    };
    assert!(matches!(
        approximate_with(disk(), &0.1, cfg),
        Err(SetError::PrecisionNotAchieved { iterations: 1, .. })
    ));
}

#[test]
fn exact_rational_box() {
    let q = |n: i64, d: i64| BigRational::new(n.into(), d.into());
    let b = Hyperrectangle::new(dvector![q(1, 2), q(1, 3)], dvector![q(1, 4), q(1, 1)])
        .unwrap()
        .shared();
    let p = overapproximate(b, &q(1, 100)).unwrap();
    let e = |x: i64, y: i64, c: BigRational| HalfSpace2::new(vector![q(x, 1), q(y, 1)], c);
    assert_eq!(
        p.constraints,
        vec![
            e(1, 0, q(3, 4)),
            e(0, 1, q(4, 3)),
            e(-1, 0, q(-1, 4)),
            e(0, -1, q(2, 3)),
        ]
    );
}

proptest! {
    #[test]
    fn refinement_never_increases_total_error(theta in 0.0..std::f64::consts::TAU, gap in 0.05..std::f64::consts::FRAC_PI_2) {
        let cfg = ApproxCfg::default();
        let s = Ball2::<f64>::new(dvector![0.3, -0.2], 1.5).unwrap();
        let (d1, d2) = (dir(theta), dir(theta + gap));
        let p1 = s.sigma(&d1).unwrap();
        let p2 = s.sigma(&d2).unwrap();
        let a = LocalApproximation::new(
            vector![p1[0], p1[1]],
            vector![d1[0], d1[1]],
            vector![p2[0], p2[1]],
            vector![d2[0], d2[1]],
            &cfg,
        );
        prop_assume!(a.refinable);
        let (r, l) = a.refine(&s, &cfg).unwrap();
        prop_assert!(r.err + l.err <= a.err + 1e-12);
        prop_assert!(r.err < a.err && l.err < a.err);
    }
}
