//! Norm balls: Euclidean (`Ball2`), infinity-norm (`BallInf`), 1-norm (`Ball1`).

use nalgebra::DVector;

use crate::error::{SetError, SetResult};
use crate::lazy_set::ConvexSet;
use crate::num::{is_zero_vector, norm, sign_cadlag, Real};

fn check_radius<N: Real>(radius: &N) -> SetResult<()> {
    if radius.lt_zero() {
        Err(SetError::EmptySet)
    } else {
        Ok(())
    }
}

/// Euclidean ball `{x : ‖x - c‖₂ <= r}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ball2<N: Real> {
    pub center: DVector<N>,
    pub radius: N,
}

impl<N: Real> Ball2<N> {
    /// Fails with `EmptySet` for a negative radius.
    pub fn new(center: DVector<N>, radius: N) -> SetResult<Self> {
        check_radius(&radius)?;
        Ok(Self { center, radius })
    }
}

impl<N: Real> ConvexSet<N> for Ball2<N> {
    fn dim(&self) -> usize {
        self.center.len()
    }

    /// `c + r d/‖d‖`; the center for `d = 0`.
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let nd = norm(d);
        if nd.is_zero() {
            return Ok(self.center.clone());
        }
        Ok(&self.center + d * (self.radius.clone() / nd))
    }

    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        Ok(d.dot(&self.center) + self.radius.clone() * norm(d))
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(self.center.clone())
    }
}

/// Infinity-norm ball (hypercube) `{x : ‖x - c‖_∞ <= r}`.
#[derive(Clone, Debug, PartialEq)]
pub struct BallInf<N: Real> {
    pub center: DVector<N>,
    pub radius: N,
}

impl<N: Real> BallInf<N> {
    /// Fails with `EmptySet` for a negative radius.
    pub fn new(center: DVector<N>, radius: N) -> SetResult<Self> {
        check_radius(&radius)?;
        Ok(Self { center, radius })
    }
}

impl<N: Real> ConvexSet<N> for BallInf<N> {
    fn dim(&self) -> usize {
        self.center.len()
    }

    /// Vertex `c + r sign(d)`; zero components pick the positive side.
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        Ok(DVector::from_fn(self.dim(), |i, _| {
            self.center[i].clone() + sign_cadlag(&d[i]) * self.radius.clone()
        }))
    }

    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        let l1 = d.iter().fold(N::zero(), |acc, x| acc + x.abs());
        Ok(d.dot(&self.center) + self.radius.clone() * l1)
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(self.center.clone())
    }
}

/// 1-norm ball (cross-polytope) `{x : ‖x - c‖₁ <= r}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ball1<N: Real> {
    pub center: DVector<N>,
    pub radius: N,
}

impl<N: Real> Ball1<N> {
    /// Fails with `EmptySet` for a negative radius.
    pub fn new(center: DVector<N>, radius: N) -> SetResult<Self> {
        check_radius(&radius)?;
        Ok(Self { center, radius })
    }
}

impl<N: Real> ConvexSet<N> for Ball1<N> {
    fn dim(&self) -> usize {
        self.center.len()
    }

    /// Vertex along the first coordinate of largest magnitude.
    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let mut out = self.center.clone();
        if is_zero_vector(d) {
            return Ok(out);
        }
        let mut best = 0usize;
        for i in 1..d.len() {
            if d[i].abs() > d[best].abs() {
                best = i;
            }
        }
        out[best] += sign_cadlag(&d[best]) * self.radius.clone();
        Ok(out)
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(self.center.clone())
    }
}
