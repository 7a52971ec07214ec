//! Intersection `X ∩ Y` with exact support for a half-space or hyperplane operand.
//!
//! For `H = {a·x <= b}` and `v = σ(d, X)`:
//! - if `a·v <= b`, the constraint is inactive and `v` is the answer;
//! - otherwise the optimum lies on `a·x = b`. The map `λ ↦ a·σ(d - λa, X)` is
//!   nonincreasing, so bisection on `λ` brackets the multiplier between a point
//!   above the boundary and one below it. Their convex combination on the
//!   boundary is an element of `X ∩ H` whose support value converges to
//!   ρ(d, X ∩ H) (exactly, once both ends support the same face of a polytope).
//!
//! Hyperplanes reuse the rule, flipping the constraint when `a·v < b`.
//! Two general operands have no closed form and report `UnsupportedOperation`;
//! callers fall back to an LP backend for those.

use nalgebra::DVector;

use crate::error::{check_dim, SetError, SetResult};
use crate::lazy_set::{ConstraintKind, ConvexSet, LinearConstraint, SetRef};
use crate::num::Real;

/// `X ∩ Y`.
#[derive(Clone, Debug)]
pub struct Intersection<N: Real> {
    pub x: SetRef<N>,
    pub y: SetRef<N>,
    /// Bisection steps on the multiplier.
    pub max_bisections: usize,
}

impl<N: Real> Intersection<N> {
    pub fn new(x: SetRef<N>, y: SetRef<N>) -> SetResult<Self> {
        check_dim(x.dim(), y.dim())?;
        Ok(Self {
            x,
            y,
            max_bisections: 64,
        })
    }

    /// Split operands into (general set, linear constraint).
    fn split(&self) -> SetResult<(&SetRef<N>, LinearConstraint<N>)> {
        if let Some(c) = self.y.as_linear_constraint() {
            return Ok((&self.x, c));
        }
        if let Some(c) = self.x.as_linear_constraint() {
            return Ok((&self.y, c));
        }
        Err(SetError::UnsupportedOperation(
            "support vector of an intersection of two non-linear-constraint sets".into(),
        ))
    }

    /// Boundary point of `X ∩ {a·x <= b}` maximizing `d`, given `a·σ(d, X) > b`.
    fn on_boundary(
        &self,
        set: &SetRef<N>,
        d: &DVector<N>,
        a: &DVector<N>,
        b: &N,
        mut x_lo: DVector<N>,
    ) -> SetResult<DVector<N>> {
        // Feasibility: min_{x∈X} a·x = -ρ(-a, X) must not exceed b.
        let neg_a = -a;
        match set.sigma(&neg_a) {
            Ok(v) if a.dot(&v) > *b => return Err(SetError::EmptySet),
            Ok(_) | Err(SetError::UnboundedDirection { .. }) => {}
            Err(e) => return Err(e),
        }

        let two = N::one() + N::one();
        let mut lo = N::zero();
        let mut hi = N::one();
        let mut x_hi: Option<DVector<N>> = None;
        for _ in 0..self.max_bisections {
            let v = set.sigma(&(d - a * hi.clone()))?;
            if a.dot(&v) <= *b {
                x_hi = Some(v);
                break;
            }
            lo = hi.clone();
            x_lo = v;
            hi = hi.clone() * two.clone();
        }
        // Both ends of the bisection must come from bracketing multipliers.
        let Some(mut x_hi) = x_hi else {
            return Err(SetError::UnsupportedOperation(
                "multiplier search did not bracket the constraint".into(),
            ));
        };

        for _ in 0..self.max_bisections {
            let mid = (lo.clone() + hi.clone()) / two.clone();
            let v = set.sigma(&(d - a * mid.clone()))?;
            if a.dot(&v) > *b {
                lo = mid;
                x_lo = v;
            } else {
                hi = mid;
                x_hi = v;
            }
        }

        let f_lo = a.dot(&x_lo) - b.clone();
        let f_hi = a.dot(&x_hi) - b.clone();
        let denom = f_lo.clone() - f_hi;
        if denom.is_zero() {
            return Ok(x_hi);
        }
        let t = f_lo / denom;
        Ok(&x_lo + (&x_hi - &x_lo) * t)
    }
}

impl<N: Real> ConvexSet<N> for Intersection<N> {
    fn dim(&self) -> usize {
        self.x.dim()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let (set, c) = self.split()?;
        let v = set.sigma(d)?;
        let av = c.a.dot(&v);
        match c.kind {
            ConstraintKind::Inequality => {
                if av <= c.b {
                    Ok(v)
                } else {
                    self.on_boundary(set, d, &c.a, &c.b, v)
                }
            }
            ConstraintKind::Equality => {
                if N::approx_eq(&av, &c.b, &N::default_tolerance()) {
                    Ok(v)
                } else if av > c.b {
                    self.on_boundary(set, d, &c.a, &c.b, v)
                } else {
                    self.on_boundary(set, d, &-&c.a, &-c.b.clone(), v)
                }
            }
        }
    }
}
