//! Basic 2D types and tolerances used by ordered H-representations.
//!
//! - `ApproxCfg`: centralizes the identity/redundancy tolerances and the
//!   iteration guards of the overapproximation driver.
//! - `HalfSpace2`: closed half-space `n·x <= c` with helper predicates.

use nalgebra::{Matrix2, Vector2};

use crate::direction::cross;
use crate::num::Real;

/// Approximation configuration (tolerances and guards).
#[derive(Clone, Debug, PartialEq)]
pub struct ApproxCfg<N: Real> {
    /// Point coincidence tolerance (`p1≈p2`, `p≈q`, zero-length edges).
    pub tol: N,
    /// Sine tolerance under which two normals count as duplicates.
    pub redundancy_tol: N,
    /// Maximum number of refinements before `PrecisionNotAchieved`.
    pub max_iterations: usize,
    /// Maximum refinement depth of a single local approximation.
    pub max_depth: usize,
}

impl<N: Real> Default for ApproxCfg<N> {
    fn default() -> Self {
        Self {
            tol: N::default_tolerance(),
            redundancy_tol: N::default_tolerance(),
            max_iterations: 100_000,
            max_depth: 64,
        }
    }
}

/// Closed half-space `n · x <= c` (no normalization required here).
#[derive(Clone, Debug, PartialEq)]
pub struct HalfSpace2<N: Real> {
    pub n: Vector2<N>,
    pub c: N,
}

impl<N: Real> HalfSpace2<N> {
    #[inline]
    pub fn new(n: Vector2<N>, c: N) -> Self {
        Self { n, c }
    }

    /// Half-space whose boundary passes through `p` with outward normal `n`.
    #[inline]
    pub fn through(n: Vector2<N>, p: &Vector2<N>) -> Self {
        let c = n.dot(p);
        Self { n, c }
    }

    #[inline]
    pub fn satisfies_eps(&self, p: &Vector2<N>, eps: &N) -> bool {
        self.n.dot(p) <= self.c.clone() + eps.clone()
    }

    /// Whether `self` is at least as tight as `other`, assuming both normals
    /// point the same way: compares `c/‖n‖` without square roots.
    pub fn tighter_than(&self, other: &HalfSpace2<N>) -> bool {
        // other.n ≈ λ self.n with λ = (self.n·other.n)/(self.n·self.n) > 0;
        // other ⇔ self.n·x <= other.c / λ.
        let lambda_num = self.n.dot(&other.n);
        let lambda_den = self.n.dot(&self.n);
        self.c.clone() * lambda_num <= other.c.clone() * lambda_den
    }
}

/// Intersection point of the boundary lines of two half-spaces, if not parallel.
pub fn line_intersection<N: Real>(h1: &HalfSpace2<N>, h2: &HalfSpace2<N>) -> Option<Vector2<N>> {
    let det = cross(&h1.n, &h2.n);
    if det.is_zero() {
        return None;
    }
    // Cramer's rule on [n1; n2] x = [c1; c2].
    let x = (h1.c.clone() * h2.n.y.clone() - h2.c.clone() * h1.n.y.clone()) / det.clone();
    let y = (h1.n.x.clone() * h2.c.clone() - h2.n.x.clone() * h1.c.clone()) / det;
    Some(Vector2::new(x, y))
}

/// Inverse of a 2×2 matrix, if nonsingular.
pub fn inverse2<N: Real>(m: &Matrix2<N>) -> Option<Matrix2<N>> {
    let det = m[(0, 0)].clone() * m[(1, 1)].clone() - m[(0, 1)].clone() * m[(1, 0)].clone();
    if det.is_zero() {
        return None;
    }
    Some(Matrix2::new(
        m[(1, 1)].clone() / det.clone(),
        -m[(0, 1)].clone() / det.clone(),
        -m[(1, 0)].clone() / det.clone(),
        m[(0, 0)].clone() / det,
    ))
}
