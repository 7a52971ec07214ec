//! The support-query protocol shared by every lazy set.
//!
//! Purpose
//! - A single capability trait (`ConvexSet`) with `dim` and `sigma`; every other
//!   query (ρ, an element, boundedness, box/norm/radius) derives from it.
//! - Composite nodes hold operands as `SetRef` (shared, immutable), so the same
//!   child may appear under several parents. Operators only wrap existing sets,
//!   hence the operand graph is acyclic and recursive queries terminate.
//!
//! Conventions
//! - `sigma`/`rho` assume `d.len() == dim()`; the checked entry points are
//!   `support_vector`/`support_function` (trait methods and free functions).
//! - For `d = 0` every set returns *some* element instead of failing.
//! - `+∞` support values are reported as `SetError::UnboundedDirection`.

use std::fmt;
use std::sync::Arc;

use nalgebra::DVector;

use crate::error::{check_dim, SetError, SetResult};
use crate::num::{unit_vector, Real};
use crate::sets::Hyperrectangle;

/// Shared handle to a lazy set.
pub type SetRef<N> = Arc<dyn ConvexSet<N>>;

/// Kind of a single linear constraint `a·x (<= | =) b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    Inequality,
    Equality,
}

/// A single linear constraint, exposed by half-spaces and hyperplanes so that
/// intersections can use the exact constrained support rule.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint<N: Real> {
    pub a: DVector<N>,
    pub b: N,
    pub kind: ConstraintKind,
}

/// Convex set queried only through its support vector.
pub trait ConvexSet<N: Real>: fmt::Debug + Send + Sync {
    /// Ambient dimension.
    fn dim(&self) -> usize;

    /// Support vector σ(d): an element maximizing `⟨d, x⟩`.
    ///
    /// Pre: `d.len() == self.dim()`.
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>>;

    /// Support function ρ(d) = ⟨d, σ(d)⟩.
    ///
    /// Pre: `d.len() == self.dim()`.
    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        Ok(d.dot(&self.sigma(d)?))
    }

    /// Dimension-checked support vector.
    fn support_vector(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        check_dim(self.dim(), d.len())?;
        self.sigma(d)
    }

    /// Dimension-checked support function.
    fn support_function(&self, d: &DVector<N>) -> SetResult<N> {
        check_dim(self.dim(), d.len())?;
        self.rho(d)
    }

    /// Some element of the set; defaults to σ(e1).
    fn an_element(&self) -> SetResult<DVector<N>> {
        if self.dim() == 0 {
            return Err(SetError::EmptySet);
        }
        self.sigma(&unit_vector(0, self.dim()))
    }

    /// Bounded iff ρ(±e_i) is finite for every axis (2n queries, short-circuits).
    fn is_bounded(&self) -> SetResult<bool> {
        let n = self.dim();
        for i in 0..n {
            let e = unit_vector::<N>(i, n);
            for d in [e.clone(), -e] {
                match self.rho(&d) {
                    Ok(_) => {}
                    Err(SetError::UnboundedDirection { .. }) => return Ok(false),
                    Err(other) => return Err(other),
                }
            }
        }
        Ok(true)
    }

    /// The set as a single linear constraint, if it is one.
    fn as_linear_constraint(&self) -> Option<LinearConstraint<N>> {
        None
    }
}

/// Wrap a concrete set into a shared handle.
pub trait IntoShared<N: Real> {
    fn shared(self) -> SetRef<N>;
}

impl<N: Real, S: ConvexSet<N> + 'static> IntoShared<N> for S {
    #[inline]
    fn shared(self) -> SetRef<N> {
        Arc::new(self)
    }
}

/// Dimension-checked σ(d, S).
#[inline]
pub fn support_vector<N: Real>(d: &DVector<N>, set: &dyn ConvexSet<N>) -> SetResult<DVector<N>> {
    set.support_vector(d)
}

/// Dimension-checked ρ(d, S).
#[inline]
pub fn support_function<N: Real>(d: &DVector<N>, set: &dyn ConvexSet<N>) -> SetResult<N> {
    set.support_function(d)
}

/// Ambient dimension of `set`.
#[inline]
pub fn dim<N: Real>(set: &dyn ConvexSet<N>) -> usize {
    set.dim()
}

/// Smallest axis-aligned box containing `set` (2n support queries).
pub fn box_approximation<N: Real>(set: &dyn ConvexSet<N>) -> SetResult<Hyperrectangle<N>> {
    let n = set.dim();
    let two = N::one() + N::one();
    let mut center = DVector::zeros(n);
    let mut radius = DVector::zeros(n);
    for i in 0..n {
        let e = unit_vector::<N>(i, n);
        let hi = set.rho(&e)?;
        let lo = -set.rho(&-e)?;
        center[i] = (hi.clone() + lo.clone()) / two.clone();
        radius[i] = (hi - lo) / two.clone();
    }
    Hyperrectangle::new(center, radius)
}

/// ∞-norm of the set: `max_{x∈S} ‖x‖_∞`.
pub fn norm<N: Real>(set: &dyn ConvexSet<N>) -> SetResult<N> {
    let n = set.dim();
    let mut best = N::zero();
    for i in 0..n {
        let e = unit_vector::<N>(i, n);
        best = N::max_of(best, set.rho(&e)?);
        best = N::max_of(best, set.rho(&-e)?);
    }
    Ok(best)
}

/// ∞-radius of the enclosing box approximation.
pub fn radius<N: Real>(set: &dyn ConvexSet<N>) -> SetResult<N> {
    let b = box_approximation(set)?;
    Ok(b.radius
        .iter()
        .cloned()
        .fold(N::zero(), N::max_of))
}

/// ∞-diameter: twice the radius.
pub fn diameter<N: Real>(set: &dyn ConvexSet<N>) -> SetResult<N> {
    let r = radius(set)?;
    Ok(r.clone() + r)
}
