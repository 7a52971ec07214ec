//! Linear maps: σ(d, M·X) = M · σ(Mᵀ d, X).

use nalgebra::{DMatrix, DVector};

use crate::error::{check_dim, SetResult};
use crate::lazy_set::{ConvexSet, SetRef};
use crate::num::Real;

/// `M·X` for an `m × n` matrix and an `n`-dimensional set.
#[derive(Clone, Debug)]
pub struct LinearMap<N: Real> {
    pub m: DMatrix<N>,
    mt: DMatrix<N>,
    pub x: SetRef<N>,
}

impl<N: Real> LinearMap<N> {
    pub fn new(m: DMatrix<N>, x: SetRef<N>) -> SetResult<Self> {
        check_dim(x.dim(), m.ncols())?;
        let mt = m.transpose();
        Ok(Self { m, mt, x })
    }
}

impl<N: Real> ConvexSet<N> for LinearMap<N> {
    fn dim(&self) -> usize {
        self.m.nrows()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let dx = &self.mt * d;
        Ok(&self.m * self.x.sigma(&dx)?)
    }

    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        self.x.rho(&(&self.mt * d))
    }

    fn an_element(&self) -> SetResult<DVector<N>> {
        Ok(&self.m * self.x.an_element()?)
    }
}
