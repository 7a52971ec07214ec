//! Local approximations: the certified refinement primitive.
//!
//! A local approximation covers the arc of `S` between two support points
//! `p1 = σ(d1)` and `p2 = σ(d2)`. The chord `[p1, p2]` lies inside `S`, and `S`
//! lies inside both support half-planes, whose boundary lines meet at `q`.
//! The slack of the piece is confined to the triangle `(p1, q, p2)`, so the
//! distance from `q` to the chord bounds its Hausdorff contribution.

use nalgebra::Vector2;

use crate::direction::same_direction;
use crate::error::{SetError, SetResult};
use crate::geom2::{line_intersection, ApproxCfg, HalfSpace2};
use crate::lazy_set::ConvexSet;
use crate::num::{approx_eq2, norm2, to_dvector, to_vector2, Real};

/// One certified piece of a 2D polygonal overapproximation.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalApproximation<N: Real> {
    /// Support point in direction `d1`.
    pub p1: Vector2<N>,
    pub d1: Vector2<N>,
    /// Support point in direction `d2`.
    pub p2: Vector2<N>,
    pub d2: Vector2<N>,
    /// Meeting point of the two support lines.
    pub q: Vector2<N>,
    /// Certified error bound of this piece.
    pub err: N,
    pub refinable: bool,
    /// Number of refinements that produced this piece.
    pub depth: usize,
}

impl<N: Real> LocalApproximation<N> {
    /// Build the piece for support points `p1`, `p2` and their directions.
    pub fn new(
        p1: Vector2<N>,
        d1: Vector2<N>,
        p2: Vector2<N>,
        d2: Vector2<N>,
        cfg: &ApproxCfg<N>,
    ) -> Self {
        Self::with_depth(p1, d1, p2, d2, 0, cfg)
    }

    pub(crate) fn with_depth(
        p1: Vector2<N>,
        d1: Vector2<N>,
        p2: Vector2<N>,
        d2: Vector2<N>,
        depth: usize,
        cfg: &ApproxCfg<N>,
    ) -> Self {
        if approx_eq2(&p1, &p2, &cfg.tol) {
            let q = p1.clone();
            return Self::closed(p1, d1, p2, d2, q, N::zero(), depth);
        }
        // Both points on one support line: the chord is an edge of S.
        if same_direction(&d1, &d2, &cfg.tol) {
            let q = p2.clone();
            return Self::closed(p1, d1, p2, d2, q, N::zero(), depth);
        }
        let h1 = HalfSpace2::through(d1.clone(), &p1);
        let h2 = HalfSpace2::through(d2.clone(), &p2);
        let q = match line_intersection(&h1, &h2) {
            Some(q) if !same_direction(&d1, &-d2.clone(), &cfg.tol) => q,
            // Opposite support lines never meet; only the chord bounds the slack.
            _ => {
                let err = norm2(&(&p2 - &p1));
                let q = p2.clone();
                return Self::closed(p1, d1, p2, d2, q, err, depth);
            }
        };
        let err = distance_to_segment(&q, &p1, &p2);
        let refinable = !(approx_eq2(&p1, &q, &cfg.tol) || approx_eq2(&p2, &q, &cfg.tol));
        Self {
            p1,
            d1,
            p2,
            d2,
            q,
            err,
            refinable,
            depth,
        }
    }

    fn closed(
        p1: Vector2<N>,
        d1: Vector2<N>,
        p2: Vector2<N>,
        d2: Vector2<N>,
        q: Vector2<N>,
        err: N,
        depth: usize,
    ) -> Self {
        Self {
            p1,
            d1,
            p2,
            d2,
            q,
            err,
            refinable: false,
            depth,
        }
    }

    /// Outward normal of the chord `[p1, p2]` (the chord rotated clockwise).
    #[inline]
    pub fn chord_normal(&self) -> Vector2<N> {
        Vector2::new(
            self.p2.y.clone() - self.p1.y.clone(),
            self.p1.x.clone() - self.p2.x.clone(),
        )
    }

    /// Split the piece at `s = σ(ndir)` where `ndir` is the chord normal.
    ///
    /// Returns `(right, left)` in counter-clockwise order: `right` covers
    /// `d1 → ndir`, `left` covers `ndir → d2`.
    pub fn refine(&self, set: &dyn ConvexSet<N>, cfg: &ApproxCfg<N>) -> SetResult<(Self, Self)> {
        if !self.refinable {
            return Err(SetError::DegenerateApproximation);
        }
        let ndir = self.chord_normal();
        let s = to_vector2(&set.sigma(&to_dvector(&ndir))?);
        let depth = self.depth + 1;
        let right = Self::with_depth(
            self.p1.clone(),
            self.d1.clone(),
            s.clone(),
            ndir.clone(),
            depth,
            cfg,
        );
        let left = Self::with_depth(s, ndir, self.p2.clone(), self.d2.clone(), depth, cfg);
        Ok((right, left))
    }

    /// The constraint this piece contributes once accepted: the support line at `p1`.
    #[inline]
    pub fn constraint(&self) -> HalfSpace2<N> {
        HalfSpace2::through(self.d1.clone(), &self.p1)
    }
}

/// Euclidean distance from `q` to the segment `[a, b]` (clamped projection).
pub fn distance_to_segment<N: Real>(q: &Vector2<N>, a: &Vector2<N>, b: &Vector2<N>) -> N {
    let v = b - a;
    let w = q - a;
    let vv = v.dot(&v);
    if vv.is_zero() {
        return norm2(&w);
    }
    let t = w.dot(&v) / vv;
    let t = if t.lt_zero() {
        N::zero()
    } else if t > N::one() {
        N::one()
    } else {
        t
    };
    norm2(&(w - v * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy_set::IntoShared;
    use crate::sets::{Ball2, BallInf};
    use nalgebra::{dvector, vector};

    fn cfg() -> ApproxCfg<f64> {
        ApproxCfg::default()
    }

    #[test]
    fn quarter_disk_piece_bound() {
        let a = LocalApproximation::new(
            vector![1.0, 0.0],
            vector![1.0, 0.0],
            vector![0.0, 1.0],
            vector![0.0, 1.0],
            &cfg(),
        );
        assert_eq!(a.q, vector![1.0, 1.0]);
        assert!((a.err - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(a.refinable);
        assert_eq!(a.chord_normal(), vector![1.0, 1.0]);
    }

    #[test]
    fn collapsed_points_are_not_refinable() {
        let a = LocalApproximation::new(
            vector![1.0, 1.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
            &cfg(),
        );
        assert!(!a.refinable);
        assert_eq!(a.err, 0.0);
        let disk = Ball2::<f64>::new(dvector![0.0, 0.0], 1.0).unwrap().shared();
        assert_eq!(a.refine(disk.as_ref(), &cfg()), Err(SetError::DegenerateApproximation));
    }

    #[test]
    fn corner_piece_has_zero_error() {
        // q coincides with p2: the box corner already closes the piece.
        let a = LocalApproximation::new(
            vector![1.0, 1.0],
            vector![0.0, 1.0],
            vector![-1.0, 1.0],
            vector![-1.0, 0.0],
            &cfg(),
        );
        assert_eq!(a.q, vector![-1.0, 1.0]);
        assert_eq!(a.err, 0.0);
        assert!(!a.refinable);
    }

    #[test]
    fn opposite_directions_fall_back_to_chord() {
        let a = LocalApproximation::new(
            vector![0.0, 1.0],
            vector![0.0, 1.0],
            vector![0.0, -1.0],
            vector![0.0, -1.0],
            &cfg(),
        );
        assert!(!a.refinable);
        assert!((a.err - 2.0).abs() < 1e-12);
    }

    #[test]
    fn refine_splits_and_reduces_error() {
        let c = cfg();
        let disk = Ball2::<f64>::new(dvector![0.0, 0.0], 1.0).unwrap();
        let a = LocalApproximation::new(
            vector![1.0, 0.0],
            vector![1.0, 0.0],
            vector![0.0, 1.0],
            vector![0.0, 1.0],
            &c,
        );
        let (r, l) = a.refine(&disk, &c).unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((r.p2 - vector![h, h]).norm() < 1e-12);
        assert_eq!(r.p1, a.p1);
        assert_eq!(l.p2, a.p2);
        assert_eq!((r.depth, l.depth), (1, 1));
        assert!(r.err + l.err <= a.err);
        // symmetric halves
        assert!((r.err - l.err).abs() < 1e-12);
    }

    #[test]
    fn diagonal_cut_of_box_is_degenerate() {
        let c = cfg();
        let b = BallInf::<f64>::new(dvector![0.0, 0.0], 1.0).unwrap();
        let a = LocalApproximation::new(
            vector![-1.0, 1.0],
            vector![-1.0, 0.0],
            vector![1.0, -1.0],
            vector![0.0, -1.0],
            &c,
        );
        assert!(a.refinable);
        let (r, l) = a.refine(&b, &c).unwrap();
        assert_eq!(r.q, vector![-1.0, -1.0]);
        assert_eq!(l.q, vector![-1.0, -1.0]);
        assert_eq!((r.err, l.err), (0.0, 0.0));
        assert!(!r.refinable && !l.refinable);
    }

    #[test]
    fn segment_distance_clamps() {
        let a = vector![0.0, 0.0];
        let b = vector![2.0, 0.0];
        assert_eq!(distance_to_segment(&vector![1.0, 3.0], &a, &b), 3.0);
        assert_eq!(distance_to_segment(&vector![5.0, 4.0], &a, &b), 5.0);
        assert_eq!(distance_to_segment(&vector![-3.0, 4.0], &a, &a), 5.0);
    }
}
