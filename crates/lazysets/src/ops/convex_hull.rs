//! Convex hulls of unions: σ(d, CH(X ∪ Y)) is the better of σ(d, X), σ(d, Y).

use nalgebra::DVector;

use crate::error::{check_dim, SetError, SetResult};
use crate::lazy_set::{ConvexSet, SetRef};
use crate::num::Real;

/// `CH(X ∪ Y)`; ties prefer `X`.
#[derive(Clone, Debug)]
pub struct ConvexHull<N: Real> {
    pub x: SetRef<N>,
    pub y: SetRef<N>,
}

impl<N: Real> ConvexHull<N> {
    pub fn new(x: SetRef<N>, y: SetRef<N>) -> SetResult<Self> {
        check_dim(x.dim(), y.dim())?;
        Ok(Self { x, y })
    }
}

impl<N: Real> ConvexSet<N> for ConvexHull<N> {
    fn dim(&self) -> usize {
        self.x.dim()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let sx = self.x.sigma(d)?;
        let sy = self.y.sigma(d)?;
        if d.dot(&sy) > d.dot(&sx) {
            Ok(sy)
        } else {
            Ok(sx)
        }
    }
}

/// `CH(X₁ ∪ … ∪ X_k)`; ties prefer the earliest operand.
#[derive(Clone, Debug)]
pub struct ConvexHullArray<N: Real> {
    pub sets: Vec<SetRef<N>>,
}

impl<N: Real> ConvexHullArray<N> {
    pub fn new(sets: Vec<SetRef<N>>) -> SetResult<Self> {
        let first = sets.first().ok_or_else(|| {
            SetError::UnsupportedOperation("convex hull of no sets".into())
        })?;
        for s in &sets[1..] {
            check_dim(first.dim(), s.dim())?;
        }
        Ok(Self { sets })
    }
}

impl<N: Real> ConvexSet<N> for ConvexHullArray<N> {
    fn dim(&self) -> usize {
        self.sets[0].dim()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let mut best: Option<(DVector<N>, N)> = None;
        for s in &self.sets {
            let v = s.sigma(d)?;
            let val = d.dot(&v);
            if best.as_ref().is_none_or(|(_, b)| val > *b) {
                best = Some((v, val));
            }
        }
        best.map(|(v, _)| v).ok_or(SetError::EmptySet)
    }
}
