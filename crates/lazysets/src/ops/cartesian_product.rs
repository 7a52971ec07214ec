//! Cartesian products: σ((d₁,d₂), X × Y) = (σ(d₁, X), σ(d₂, Y)).

use nalgebra::DVector;

use crate::error::{SetError, SetResult};
use crate::lazy_set::{ConvexSet, SetRef};
use crate::num::Real;

/// `X × Y`; directions are split after the first `X.dim()` coordinates.
#[derive(Clone, Debug)]
pub struct CartesianProduct<N: Real> {
    pub x: SetRef<N>,
    pub y: SetRef<N>,
}

impl<N: Real> CartesianProduct<N> {
    #[inline]
    pub fn new(x: SetRef<N>, y: SetRef<N>) -> Self {
        Self { x, y }
    }
}

impl<N: Real> ConvexSet<N> for CartesianProduct<N> {
    fn dim(&self) -> usize {
        self.x.dim() + self.y.dim()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let nx = self.x.dim();
        let d1 = d.rows(0, nx).into_owned();
        let d2 = d.rows(nx, self.y.dim()).into_owned();
        let s1 = self.x.sigma(&d1)?;
        let s2 = self.y.sigma(&d2)?;
        Ok(DVector::from_iterator(
            d.len(),
            s1.iter().chain(s2.iter()).cloned(),
        ))
    }

    fn rho(&self, d: &DVector<N>) -> SetResult<N> {
        let nx = self.x.dim();
        let d1 = d.rows(0, nx).into_owned();
        let d2 = d.rows(nx, self.y.dim()).into_owned();
        Ok(self.x.rho(&d1)? + self.y.rho(&d2)?)
    }
}

/// `X₁ × … × X_k`.
#[derive(Clone, Debug)]
pub struct CartesianProductArray<N: Real> {
    pub sets: Vec<SetRef<N>>,
}

impl<N: Real> CartesianProductArray<N> {
    pub fn new(sets: Vec<SetRef<N>>) -> SetResult<Self> {
        if sets.is_empty() {
            return Err(SetError::UnsupportedOperation(
                "Cartesian product of no sets".into(),
            ));
        }
        Ok(Self { sets })
    }
}

impl<N: Real> ConvexSet<N> for CartesianProductArray<N> {
    fn dim(&self) -> usize {
        self.sets.iter().map(|s| s.dim()).sum()
    }

    fn sigma(&self, d: &DVector<N>) -> SetResult<DVector<N>> {
        let mut out = DVector::zeros(d.len());
        let mut offset = 0usize;
        for s in &self.sets {
            let n = s.dim();
            let block = s.sigma(&d.rows(offset, n).into_owned())?;
            out.rows_mut(offset, n).copy_from(&block);
            offset += n;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy_set::IntoShared;
    use crate::sets::{Ball2, BallInf, Singleton};
    use nalgebra::dvector;

    #[test]
    fn product_splits_direction_by_block() {
        let x = BallInf::<f64>::new(dvector![0.0], 1.0).unwrap().shared();
        let y = Ball2::<f64>::new(dvector![0.0, 0.0], 2.0).unwrap().shared();
        let p = CartesianProduct::new(x, y);
        assert_eq!(p.dim(), 3);
        let s = p.sigma(&dvector![-1.0, 0.0, 5.0]).unwrap();
        assert!((s - dvector![-1.0, 0.0, 2.0]).amax() < 1e-12);
        assert!((p.rho(&dvector![-1.0, 0.0, 5.0]).unwrap() - 11.0).abs() < 1e-12);
    }

    #[test]
    fn array_product_matches_binary_product() {
        let a = Singleton::<f64>::new(dvector![1.0]).shared();
        let b = BallInf::<f64>::new(dvector![0.0, 0.0], 1.0).unwrap().shared();
        let arr = CartesianProductArray::new(vec![a.clone(), b.clone()]).unwrap();
        let bin = CartesianProduct::new(a, b);
        let d = dvector![0.5, -1.0, 1.0];
        assert_eq!(arr.sigma(&d).unwrap(), bin.sigma(&d).unwrap());
        assert!(CartesianProductArray::<f64>::new(vec![]).is_err());
    }
}
